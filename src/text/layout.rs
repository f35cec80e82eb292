//! Text block layout
//!
//! Positions shaped lines within a canvas sized to the text plus the
//! padding its effects need. Layout is pure measurement: nothing is
//! rasterized here, the compositor consumes the positioned result.
//!
//! The canvas is sized tightly around the content: the widest line sets the
//! content width, the baseline grid sets the content height, and stroke and
//! shadow extents are added as padding so no effect pass ever clips.

use crate::error::{LayoutError, Result};
use crate::style::{StyleConfig, TextAlign};
use crate::text::font_db::ScaledMetrics;
use crate::text::font_loader::FontContext;
use crate::text::shaper::{compute_synthetic_styles, shape_line, ShapedLine};
use std::sync::Arc;

/// Extra canvas space reserved for paint effects, per edge, in pixels.
///
/// Stroke contributes its full width on every edge; the stroke is centered
/// on the contour so this leaves slack for round joins on sharp corners.
/// Shadow contributes its blur extent on every edge plus the offset on the
/// edge it shifts toward. Synthetic bold widens every pass by its stroke
/// width, so it contributes on every edge too. All contributions are
/// additive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectPadding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl EffectPadding {
    /// Computes the padding a style's enabled effects require
    pub fn for_style(config: &StyleConfig, synthetic_bold: f32) -> Self {
        let mut padding = EffectPadding::default();

        if synthetic_bold > 0.0 {
            padding.left += synthetic_bold;
            padding.top += synthetic_bold;
            padding.right += synthetic_bold;
            padding.bottom += synthetic_bold;
        }

        if config.show_stroke && config.stroke_width > 0.0 {
            padding.left += config.stroke_width;
            padding.top += config.stroke_width;
            padding.right += config.stroke_width;
            padding.bottom += config.stroke_width;
        }

        if config.show_shadow {
            // Gaussian tail is negligible past 3 sigma; sigma = blur / 2
            let blur_extent = (config.shadow_blur * 1.5).ceil();
            padding.left += blur_extent + (-config.shadow_offset_x).max(0.0);
            padding.right += blur_extent + config.shadow_offset_x.max(0.0);
            padding.top += blur_extent + (-config.shadow_offset_y).max(0.0);
            padding.bottom += blur_extent + config.shadow_offset_y.max(0.0);
        }

        padding
    }

    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// A shaped line placed at its final canvas position.
#[derive(Debug, Clone)]
pub struct PositionedLine {
    pub shaped: ShapedLine,
    /// X of the line's left edge in canvas coordinates
    pub x: f32,
    /// Y of the line's baseline in canvas coordinates
    pub baseline_y: f32,
}

/// The measured and positioned text block.
#[derive(Debug, Clone)]
pub struct TextLayout {
    /// Lines in top-to-bottom order; blank source lines shape to empty lines
    pub lines: Vec<PositionedLine>,
    /// Width of the widest line in pixels
    pub content_width: f32,
    /// Height of the baseline grid plus ascent and descent
    pub content_height: f32,
    /// Effect padding applied around the content box
    pub padding: EffectPadding,
    /// Final canvas width in pixels
    pub width: u32,
    /// Final canvas height in pixels
    pub height: u32,
    /// Scaled font metrics shared by every line
    pub metrics: ScaledMetrics,
    /// Synthetic bold stroke width in pixels (0 = none)
    pub synthetic_bold: f32,
    /// Synthetic oblique shear factor (0 = none)
    pub synthetic_oblique: f32,
}

/// Lays out the content of a resolved style into positioned lines.
///
/// Resolves the font (warning and substituting sans-serif when the named
/// family is missing), shapes each `\n`-separated line, aligns lines
/// against the widest one, and places baselines on a fixed grid:
/// baseline i sits at `ascent + i * (line_height + line_spacing)` inside
/// the content box.
///
/// # Errors
///
/// [`LayoutError::FontNotFound`] when neither the named family nor any
/// fallback resolves, and shaping errors from the shaper.
pub fn layout_text(config: &StyleConfig, font_context: &FontContext) -> Result<TextLayout> {
    let weight: u16 = if config.bold { 700 } else { 400 };

    let families = vec![config.font_family.clone()];
    let font = match font_context.get_font(&families, weight, config.italic) {
        Some(font) => font,
        None => {
            log::warn!(
                "font family '{}' not found, substituting sans-serif",
                config.font_family
            );
            font_context
                .get_sans_serif()
                .ok_or_else(|| LayoutError::FontNotFound {
                    family: config.font_family.clone(),
                })?
        }
    };
    let font = Arc::new(font);

    let metrics = font.metrics()?.scale(config.font_size);

    let (synthetic_bold, synthetic_oblique) =
        compute_synthetic_styles(&font, config.font_size, config.bold, config.italic);

    // Normalize Windows line endings before splitting
    let content = config.content.replace("\r\n", "\n");
    let line_texts: Vec<&str> = content.split('\n').collect();

    let shaped: Vec<ShapedLine> = line_texts
        .iter()
        .map(|text| shape_line(text, &font, config.font_size, config.letter_spacing))
        .collect::<Result<_>>()?;

    let content_width = shaped.iter().map(|line| line.width).fold(0.0_f32, f32::max);

    let line_count = shaped.len();
    let baseline_step = metrics.line_height + config.line_spacing;
    let content_height = metrics.ascent + ((line_count - 1) as f32) * baseline_step + metrics.descent;
    let content_height = content_height.max(0.0);

    let padding = EffectPadding::for_style(config, synthetic_bold);

    let width = (content_width + padding.horizontal()).ceil().max(1.0) as u32;
    let height = (content_height + padding.vertical()).ceil().max(1.0) as u32;

    let lines = shaped
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let align_offset = match config.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => (content_width - line.width) / 2.0,
                TextAlign::Right => content_width - line.width,
            };
            let baseline_y = padding.top + metrics.ascent + (i as f32) * baseline_step;
            PositionedLine {
                shaped: line,
                x: padding.left + align_offset,
                baseline_y,
            }
        })
        .collect();

    Ok(TextLayout {
        lines,
        content_width,
        content_height,
        padding,
        width,
        height,
        metrics,
        synthetic_bold,
        synthetic_oblique,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::normalize_style;
    use crate::style::PresetStyle;

    fn style(content: &str) -> StyleConfig {
        normalize_style(&PresetStyle {
            content: Some(content.to_string()),
            font_size: Some(24.0),
            font_family: Some("sans-serif".to_string()),
            color: Some("#000000".to_string()),
            opacity: Some(100.0),
            align: Some("left".to_string()),
            ..PresetStyle::default()
        })
        .unwrap()
    }

    #[test]
    fn padding_zero_without_effects() {
        let config = style("Hi");
        assert_eq!(EffectPadding::for_style(&config, 0.0), EffectPadding::default());
    }

    #[test]
    fn stroke_pads_all_edges_equally() {
        let mut config = style("Hi");
        config.show_stroke = true;
        config.stroke_width = 3.0;

        let padding = EffectPadding::for_style(&config, 0.0);
        assert_eq!(padding.left, 3.0);
        assert_eq!(padding.top, 3.0);
        assert_eq!(padding.right, 3.0);
        assert_eq!(padding.bottom, 3.0);
    }

    #[test]
    fn disabled_stroke_adds_no_padding() {
        let mut config = style("Hi");
        config.show_stroke = false;
        config.stroke_width = 10.0;
        assert_eq!(EffectPadding::for_style(&config, 0.0), EffectPadding::default());
    }

    #[test]
    fn synthetic_bold_pads_all_edges() {
        let config = style("Hi");
        let padding = EffectPadding::for_style(&config, 1.5);
        assert_eq!(padding.left, 1.5);
        assert_eq!(padding.top, 1.5);
        assert_eq!(padding.right, 1.5);
        assert_eq!(padding.bottom, 1.5);
    }

    #[test]
    fn synthetic_bold_padding_adds_to_stroke() {
        let mut config = style("Hi");
        config.show_stroke = true;
        config.stroke_width = 3.0;

        let padding = EffectPadding::for_style(&config, 1.5);
        assert_eq!(padding.left, 4.5);
        assert_eq!(padding.right, 4.5);
        assert_eq!(padding.horizontal(), 9.0);
    }

    #[test]
    fn shadow_offset_pads_the_edge_it_shifts_toward() {
        let mut config = style("Hi");
        config.show_shadow = true;
        config.shadow_blur = 10.0;
        config.shadow_offset_x = 4.0;
        config.shadow_offset_y = -2.0;

        let padding = EffectPadding::for_style(&config, 0.0);
        let blur_extent = 15.0; // ceil(10 * 1.5)
        assert_eq!(padding.left, blur_extent);
        assert_eq!(padding.right, blur_extent + 4.0);
        assert_eq!(padding.top, blur_extent + 2.0);
        assert_eq!(padding.bottom, blur_extent);
    }

    #[test]
    fn stroke_and_shadow_padding_are_additive() {
        let mut config = style("Hi");
        config.show_stroke = true;
        config.stroke_width = 2.0;
        config.show_shadow = true;
        config.shadow_blur = 4.0;

        let padding = EffectPadding::for_style(&config, 0.0);
        assert_eq!(padding.left, 2.0 + 6.0);
        assert_eq!(padding.right, 2.0 + 6.0);
    }

    #[test]
    fn single_line_layout_dimensions() {
        let ctx = FontContext::new();
        if !ctx.has_fonts() {
            return;
        }

        let layout = layout_text(&style("Hello"), &ctx).unwrap();
        assert_eq!(layout.lines.len(), 1);
        assert!(layout.content_width > 0.0);
        assert!(layout.width >= layout.content_width as u32);
        assert!(layout.height >= 1);
        // First baseline sits one ascent below the top
        assert!((layout.lines[0].baseline_y - layout.metrics.ascent).abs() < 1e-3);
    }

    #[test]
    fn multi_line_baselines_form_a_grid() {
        let ctx = FontContext::new();
        if !ctx.has_fonts() {
            return;
        }

        let mut config = style("one\ntwo\nthree");
        config.line_spacing = 5.0;
        let layout = layout_text(&config, &ctx).unwrap();
        assert_eq!(layout.lines.len(), 3);

        let step = layout.metrics.line_height + 5.0;
        let b0 = layout.lines[0].baseline_y;
        assert!((layout.lines[1].baseline_y - b0 - step).abs() < 1e-3);
        assert!((layout.lines[2].baseline_y - b0 - 2.0 * step).abs() < 1e-3);
    }

    #[test]
    fn widest_line_sets_content_width() {
        let ctx = FontContext::new();
        if !ctx.has_fonts() {
            return;
        }

        let layout = layout_text(&style("i\nwwww"), &ctx).unwrap();
        let widths: Vec<f32> = layout.lines.iter().map(|l| l.shaped.width).collect();
        assert!((layout.content_width - widths[1]).abs() < 1e-3);
        assert!(widths[0] < widths[1]);
    }

    #[test]
    fn alignment_offsets_lines_within_block() {
        let ctx = FontContext::new();
        if !ctx.has_fonts() {
            return;
        }

        let mut config = style("i\nwwww");

        config.align = TextAlign::Left;
        let left = layout_text(&config, &ctx).unwrap();
        assert!((left.lines[0].x - left.lines[1].x).abs() < 1e-3);

        config.align = TextAlign::Right;
        let right = layout_text(&config, &ctx).unwrap();
        let short = &right.lines[0];
        let long = &right.lines[1];
        assert!(
            ((short.x + short.shaped.width) - (long.x + long.shaped.width)).abs() < 1e-3,
            "right edges should be flush"
        );

        config.align = TextAlign::Center;
        let center = layout_text(&config, &ctx).unwrap();
        let short = &center.lines[0];
        let long = &center.lines[1];
        let short_mid = short.x + short.shaped.width / 2.0;
        let long_mid = long.x + long.shaped.width / 2.0;
        assert!((short_mid - long_mid).abs() < 1e-3);
    }

    #[test]
    fn blank_lines_keep_their_vertical_slot() {
        let ctx = FontContext::new();
        if !ctx.has_fonts() {
            return;
        }

        let two = layout_text(&style("a\nb"), &ctx).unwrap();
        let three = layout_text(&style("a\n\nb"), &ctx).unwrap();
        assert_eq!(three.lines.len(), 3);
        assert!(three.lines[1].shaped.is_empty());
        assert!(three.height > two.height);
    }

    #[test]
    fn unknown_family_substitutes_a_real_font() {
        let ctx = FontContext::new();
        if !ctx.has_fonts() {
            return;
        }

        let mut config = style("Hello");
        config.font_family = "NoSuchFamily987".to_string();
        let layout = layout_text(&config, &ctx).unwrap();
        assert!(layout.content_width > 0.0);
    }

    #[test]
    fn no_fonts_at_all_is_an_error() {
        let ctx = FontContext::empty();
        let err = layout_text(&style("Hello"), &ctx).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Layout(LayoutError::FontNotFound { .. })
        ));
    }

    #[test]
    fn effect_padding_grows_the_canvas() {
        let ctx = FontContext::new();
        if !ctx.has_fonts() {
            return;
        }

        let plain = layout_text(&style("Hello"), &ctx).unwrap();

        let mut config = style("Hello");
        config.show_stroke = true;
        config.stroke_width = 3.0;
        config.show_shadow = true;
        config.shadow_blur = 10.0;
        config.shadow_offset_x = 4.0;
        config.shadow_offset_y = 4.0;
        let padded = layout_text(&config, &ctx).unwrap();

        assert!(padded.width > plain.width);
        assert!(padded.height > plain.height);
        // Content box is unchanged, only the padding differs
        assert!((padded.content_width - plain.content_width).abs() < 1e-3);
    }

    #[test]
    fn synthetic_bold_margin_is_reserved_in_the_canvas() {
        let ctx = FontContext::new();
        if !ctx.has_fonts() {
            return;
        }

        let mut config = style("Hello");
        config.bold = true;
        let layout = layout_text(&config, &ctx).unwrap();

        // Whatever bold widening the paint passes apply must fit inside
        // the padding on every edge
        assert!(layout.padding.left >= layout.synthetic_bold);
        assert!(layout.padding.right >= layout.synthetic_bold);
        assert!(layout.padding.top >= layout.synthetic_bold);
        assert!(layout.padding.bottom >= layout.synthetic_bold);
    }
}
