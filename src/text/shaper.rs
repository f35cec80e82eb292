//! Text shaping
//!
//! Shapes a single line of text into positioned glyphs using HarfBuzz (via
//! rustybuzz). Presets carry one style for the whole text, so every line is
//! a single left-to-right run; the shaper applies letter spacing on top of
//! the shaped advances and reports the resulting line width.

use crate::error::{LayoutError, Result};
use crate::text::font_db::{FontStyle, LoadedFont};
use rustybuzz::{Direction, Face, UnicodeBuffer};
use std::sync::Arc;

/// A single positioned glyph within a line.
#[derive(Debug, Clone, Copy)]
pub struct GlyphPosition {
    /// Glyph ID in the font.
    pub glyph_id: u32,
    /// Cluster index (maps back to a byte position in the line text).
    pub cluster: u32,
    /// X position of the glyph origin relative to the line start.
    pub x_offset: f32,
    /// Y offset from the baseline (positive = up, in shaping convention).
    pub y_offset: f32,
    /// Horizontal advance to the next glyph origin, letter spacing included.
    pub x_advance: f32,
}

/// A shaped line of text, ready for positioning and painting.
#[derive(Debug, Clone)]
pub struct ShapedLine {
    /// The line text.
    pub text: String,
    /// Positioned glyphs in visual order.
    pub glyphs: Vec<GlyphPosition>,
    /// Total advance width of the line in pixels.
    pub width: f32,
    /// Font used to shape this line.
    pub font: Arc<LoadedFont>,
    /// Font size in pixels.
    pub font_size: f32,
}

impl ShapedLine {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    #[inline]
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

/// Shapes one line of text into positioned glyphs.
///
/// `letter_spacing` is added once per glyph boundary (after every glyph but
/// the last). A large negative spacing could otherwise walk the pen
/// backwards, so each spaced advance is clamped at zero; glyph origins stay
/// monotonically non-decreasing for any spacing value.
pub fn shape_line(
    text: &str,
    font: &Arc<LoadedFont>,
    font_size: f32,
    letter_spacing: f32,
) -> Result<ShapedLine> {
    if text.is_empty() {
        return Ok(ShapedLine {
            text: String::new(),
            glyphs: Vec::new(),
            width: 0.0,
            font: Arc::clone(font),
            font_size,
        });
    }

    let rb_face = Face::from_slice(&font.data, font.index).ok_or_else(|| LayoutError::ShapingFailed {
        line: text.to_string(),
        reason: "Failed to create HarfBuzz face".to_string(),
    })?;

    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);
    buffer.set_direction(Direction::LeftToRight);

    let output = rustybuzz::shape(&rb_face, &[], buffer);

    let units_per_em = rb_face.units_per_em() as f32;
    let scale = font_size / units_per_em;

    let glyph_infos = output.glyph_infos();
    let glyph_positions = output.glyph_positions();

    let mut glyphs = Vec::with_capacity(glyph_infos.len());
    let mut pen_x = 0.0_f32;
    let glyph_count = glyph_infos.len();

    for (i, (info, pos)) in glyph_infos.iter().zip(glyph_positions.iter()).enumerate() {
        let x_offset = pen_x + (pos.x_offset as f32 * scale);
        let y_offset = pos.y_offset as f32 * scale;

        let mut x_advance = pos.x_advance as f32 * scale;
        if i + 1 < glyph_count {
            x_advance = (x_advance + letter_spacing).max(0.0);
        }

        glyphs.push(GlyphPosition {
            glyph_id: info.glyph_id,
            cluster: info.cluster,
            x_offset,
            y_offset,
            x_advance,
        });

        pen_x += x_advance;
    }

    Ok(ShapedLine {
        text: text.to_string(),
        glyphs,
        width: pen_x,
        font: Arc::clone(font),
        font_size,
    })
}

/// Computes synthetic style adjustments for a resolved font.
///
/// When the matched face cannot provide the requested weight or slant, the
/// painter fakes them: an extra stroke for missing bold, a shear for missing
/// italic. Returns `(synthetic_bold_width_px, synthetic_oblique_skew)`.
pub fn compute_synthetic_styles(font: &LoadedFont, font_size: f32, bold: bool, italic: bool) -> (f32, f32) {
    let mut synthetic_bold = 0.0;
    let mut synthetic_oblique = 0.0;

    if bold && font.weight.value() < 600 {
        let delta = (700.0 - font.weight.value() as f32).max(0.0);
        let strength = (delta / 400.0).clamp(0.0, 1.0);
        synthetic_bold = font_size * 0.04 * strength;
    }

    if italic && matches!(font.style, FontStyle::Normal) {
        synthetic_oblique = 14.0_f32.to_radians().tan();
    }

    (synthetic_bold, synthetic_oblique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::font_loader::FontContext;

    fn test_font() -> Option<(FontContext, Arc<LoadedFont>)> {
        let ctx = FontContext::new();
        if !ctx.has_fonts() {
            return None;
        }
        let font = ctx.get_sans_serif()?;
        Some((ctx, Arc::new(font)))
    }

    #[test]
    fn empty_line_shapes_to_nothing() {
        let Some((_ctx, font)) = test_font() else { return };

        let line = shape_line("", &font, 16.0, 0.0).unwrap();
        assert!(line.is_empty());
        assert_eq!(line.width, 0.0);
    }

    #[test]
    fn ascii_line_has_one_glyph_per_char() {
        let Some((_ctx, font)) = test_font() else { return };

        let line = shape_line("Hello", &font, 16.0, 0.0).unwrap();
        assert_eq!(line.glyph_count(), 5);
        assert!(line.width > 0.0);
    }

    #[test]
    fn letter_spacing_widens_line() {
        let Some((_ctx, font)) = test_font() else { return };

        let plain = shape_line("Hello", &font, 16.0, 0.0).unwrap();
        let spaced = shape_line("Hello", &font, 16.0, 4.0).unwrap();

        // Four boundaries between five glyphs
        assert!((spaced.width - plain.width - 16.0).abs() < 1e-3);
    }

    #[test]
    fn letter_spacing_ignored_for_single_glyph() {
        let Some((_ctx, font)) = test_font() else { return };

        let plain = shape_line("A", &font, 16.0, 0.0).unwrap();
        let spaced = shape_line("A", &font, 16.0, 10.0).unwrap();
        assert!((spaced.width - plain.width).abs() < 1e-6);
    }

    #[test]
    fn negative_spacing_keeps_origins_monotonic() {
        let Some((_ctx, font)) = test_font() else { return };

        let line = shape_line("Hello", &font, 16.0, -100.0).unwrap();
        let mut last_origin = f32::NEG_INFINITY;
        let mut pen = 0.0_f32;
        for glyph in &line.glyphs {
            assert!(glyph.x_offset >= last_origin);
            last_origin = glyph.x_offset;
            assert!(glyph.x_advance >= 0.0);
            pen += glyph.x_advance;
        }
        assert!(line.width >= 0.0);
        assert!((line.width - pen).abs() < 1e-6);
    }

    #[test]
    fn width_scales_with_font_size() {
        let Some((_ctx, font)) = test_font() else { return };

        let small = shape_line("Hello", &font, 16.0, 0.0).unwrap();
        let large = shape_line("Hello", &font, 32.0, 0.0).unwrap();
        assert!(large.width > small.width * 1.8);
        assert!(large.width < small.width * 2.2);
    }

    #[test]
    fn synthetic_bold_only_when_face_is_light() {
        let Some((_ctx, font)) = test_font() else { return };

        let (bold, oblique) = compute_synthetic_styles(&font, 48.0, false, false);
        assert_eq!(bold, 0.0);
        assert_eq!(oblique, 0.0);

        let (bold, _) = compute_synthetic_styles(&font, 48.0, true, false);
        if font.weight.value() < 600 {
            assert!(bold > 0.0);
        } else {
            assert_eq!(bold, 0.0);
        }
    }

    #[test]
    fn synthetic_oblique_for_upright_face() {
        let Some((_ctx, font)) = test_font() else { return };

        let (_, oblique) = compute_synthetic_styles(&font, 48.0, false, true);
        if matches!(font.style, FontStyle::Normal) {
            assert!((oblique - 14.0_f32.to_radians().tan()).abs() < 1e-6);
        }
    }
}
