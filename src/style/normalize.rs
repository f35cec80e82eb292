//! Style normalization
//!
//! Resolves a partial [`PresetStyle`](crate::style::PresetStyle) into a
//! complete [`StyleConfig`] by overlaying it onto a fixed default record and
//! validating every field. Later pipeline stages never see partial data.
//!
//! Defaults (fields absent from the preset keep these):
//!
//! | field           | default   |
//! |-----------------|-----------|
//! | line_spacing    | 0         |
//! | letter_spacing  | 0         |
//! | show_stroke     | false     |
//! | stroke_color    | `#ffffff` |
//! | stroke_width    | 0         |
//! | show_shadow     | false     |
//! | shadow_color    | `#ffffff` |
//! | shadow_blur     | 0         |
//! | shadow_offset_x | 0         |
//! | shadow_offset_y | 0         |
//! | bold / italic   | false     |
//!
//! `content`, `font_size`, `font_family`, `color`, `opacity` and `align`
//! have no default; a preset that omits them fails validation.

use crate::error::ValidationError;
use crate::style::color::Rgba;
use crate::style::preset::{PresetStyle, TextPreset};

/// Horizontal alignment of lines within the text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Lines begin at x = 0
    Left,
    /// Each line centered on the widest line's midpoint
    #[default]
    Center,
    /// Right edges flush with the widest line
    Right,
}

impl TextAlign {
    /// Parses an alignment keyword (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            _ => None,
        }
    }

    /// Keyword form, as it appears in preset records
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// A fully-resolved style configuration
///
/// Every field is populated and validated; this is the only input the
/// layout and compositing stages accept. Immutable value, owned by a
/// single render call.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    /// Text to render; `\n` separates lines
    pub content: String,
    /// Pixel size, > 0
    pub font_size: f32,
    /// Font family name, resolved by the font backend at layout time
    pub font_family: String,
    /// Weight selector (weight 700 vs 400)
    pub bold: bool,
    /// Slant selector
    pub italic: bool,
    /// Fill color
    pub color: Rgba,
    /// Fill opacity percentage, 0-100
    pub opacity: f32,
    /// Additional pixels between baselines; may be negative
    pub line_spacing: f32,
    /// Additional pixels per inter-glyph gap; may be negative
    pub letter_spacing: f32,
    /// Horizontal alignment per line
    pub align: TextAlign,
    /// Shadow pass enabled
    pub show_shadow: bool,
    /// Shadow fill color
    pub shadow_color: Rgba,
    /// Gaussian blur radius, >= 0
    pub shadow_blur: f32,
    /// Shadow displacement
    pub shadow_offset_x: f32,
    /// Shadow displacement
    pub shadow_offset_y: f32,
    /// Outline pass enabled
    pub show_stroke: bool,
    /// Outline color
    pub stroke_color: Rgba,
    /// Outline thickness in pixels, >= 0, centered on the glyph contour
    pub stroke_width: f32,
}

impl StyleConfig {
    /// Converts back to a (fully-populated) partial record
    ///
    /// Feeding the result through [`normalize`] again yields an identical
    /// config, which is what makes normalization idempotent.
    pub fn to_preset_style(&self) -> PresetStyle {
        PresetStyle {
            content: Some(self.content.clone()),
            font_size: Some(self.font_size),
            font_family: Some(self.font_family.clone()),
            bold: Some(self.bold),
            italic: Some(self.italic),
            color: Some(self.color.to_string()),
            opacity: Some(self.opacity),
            line_spacing: Some(self.line_spacing),
            letter_spacing: Some(self.letter_spacing),
            align: Some(self.align.as_str().to_string()),
            show_shadow: Some(self.show_shadow),
            shadow_color: Some(self.shadow_color.to_string()),
            shadow_blur: Some(self.shadow_blur),
            shadow_offset_x: Some(self.shadow_offset_x),
            shadow_offset_y: Some(self.shadow_offset_y),
            show_stroke: Some(self.show_stroke),
            stroke_color: Some(self.stroke_color.to_string()),
            stroke_width: Some(self.stroke_width),
        }
    }
}

/// Default stroke/shadow color when the preset leaves them unset
const DEFAULT_EFFECT_COLOR: Rgba = Rgba::WHITE;

/// Normalizes a preset into a complete, validated style configuration
///
/// Pure function: overlays `preset.style` field-by-field onto the defaults,
/// parses color strings, and checks every value against its declared domain.
///
/// # Errors
///
/// [`ValidationError`] when a required field is missing or a value is out
/// of its domain (non-positive font size, opacity outside 0-100, negative
/// stroke width or shadow blur, unparseable color, empty content).
pub fn normalize(preset: &TextPreset) -> std::result::Result<StyleConfig, ValidationError> {
    normalize_style(&preset.style)
}

/// Normalizes a bare partial style (same rules as [`normalize`])
pub fn normalize_style(style: &PresetStyle) -> std::result::Result<StyleConfig, ValidationError> {
    let content = style
        .content
        .clone()
        .ok_or(ValidationError::MissingField { field: "content" })?;
    if content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }

    let font_size = style
        .font_size
        .ok_or(ValidationError::MissingField { field: "fontSize" })?;
    if !font_size.is_finite() || font_size <= 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "fontSize",
            value: font_size,
            expected: "> 0",
        });
    }

    let font_family = style
        .font_family
        .clone()
        .ok_or(ValidationError::MissingField { field: "fontFamily" })?;

    let color = parse_color_field("color", style.color.as_deref())?
        .ok_or(ValidationError::MissingField { field: "color" })?;

    let opacity = style
        .opacity
        .ok_or(ValidationError::MissingField { field: "opacity" })?;
    if !opacity.is_finite() || !(0.0..=100.0).contains(&opacity) {
        return Err(ValidationError::OutOfRange {
            field: "opacity",
            value: opacity,
            expected: "0-100",
        });
    }

    let align_str = style
        .align
        .clone()
        .ok_or(ValidationError::MissingField { field: "align" })?;
    let align = TextAlign::parse(&align_str).ok_or(ValidationError::InvalidAlign { value: align_str })?;

    let stroke_width = style.stroke_width.unwrap_or(0.0);
    if !stroke_width.is_finite() || stroke_width < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "strokeWidth",
            value: stroke_width,
            expected: ">= 0",
        });
    }

    let shadow_blur = style.shadow_blur.unwrap_or(0.0);
    if !shadow_blur.is_finite() || shadow_blur < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "shadowBlur",
            value: shadow_blur,
            expected: ">= 0",
        });
    }

    let stroke_color =
        parse_color_field("strokeColor", style.stroke_color.as_deref())?.unwrap_or(DEFAULT_EFFECT_COLOR);
    let shadow_color =
        parse_color_field("shadowColor", style.shadow_color.as_deref())?.unwrap_or(DEFAULT_EFFECT_COLOR);

    Ok(StyleConfig {
        content,
        font_size,
        font_family,
        bold: style.bold.unwrap_or(false),
        italic: style.italic.unwrap_or(false),
        color,
        opacity,
        line_spacing: style.line_spacing.unwrap_or(0.0),
        letter_spacing: style.letter_spacing.unwrap_or(0.0),
        align,
        show_shadow: style.show_shadow.unwrap_or(false),
        shadow_color,
        shadow_blur,
        shadow_offset_x: style.shadow_offset_x.unwrap_or(0.0),
        shadow_offset_y: style.shadow_offset_y.unwrap_or(0.0),
        show_stroke: style.show_stroke.unwrap_or(false),
        stroke_color,
        stroke_width,
    })
}

fn parse_color_field(
    field: &'static str,
    value: Option<&str>,
) -> std::result::Result<Option<Rgba>, ValidationError> {
    match value {
        None => Ok(None),
        Some(s) => Rgba::parse(s)
            .map(Some)
            .map_err(|_| ValidationError::InvalidColor {
                field,
                value: s.to_string(),
            }),
    }
}
