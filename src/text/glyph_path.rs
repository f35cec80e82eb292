//! Glyph outline to path conversion.
//!
//! Outlines are emitted in font design units (y-up). Callers apply the
//! scale/skew/flip transform at paint time via [`glyph_transform`], so one
//! cached path per glyph id serves every pass that draws it.

use tiny_skia::{Path, PathBuilder, Transform};

/// Converts ttf-parser glyph outlines to tiny-skia paths.
///
/// Implements `ttf_parser::OutlineBuilder` to receive outline drawing
/// commands and build a tiny-skia `Path`.
struct GlyphOutlineBuilder {
  builder: PathBuilder,
}

impl GlyphOutlineBuilder {
  fn new() -> Self {
    Self {
      builder: PathBuilder::new(),
    }
  }

  fn finish(self) -> Option<Path> {
    self.builder.finish()
  }
}

impl ttf_parser::OutlineBuilder for GlyphOutlineBuilder {
  fn move_to(&mut self, x: f32, y: f32) {
    self.builder.move_to(x, y);
  }

  fn line_to(&mut self, x: f32, y: f32) {
    self.builder.line_to(x, y);
  }

  fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
    self.builder.quad_to(x1, y1, x, y);
  }

  fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
    self.builder.cubic_to(x1, y1, x2, y2, x, y);
  }

  fn close(&mut self) {
    self.builder.close();
  }
}

/// Builds the outline path for a glyph, in design units.
///
/// Returns `None` for glyphs with no outline (whitespace, .notdef in some
/// fonts) or when the face has no entry for the id.
pub fn build_glyph_path(face: &ttf_parser::Face<'_>, glyph_id: u16) -> Option<Path> {
  let mut builder = GlyphOutlineBuilder::new();
  face.outline_glyph(ttf_parser::GlyphId(glyph_id), &mut builder)?;
  builder.finish()
}

/// Transform mapping font design units to device pixels.
///
/// `scale` converts design units to pixels; `skew` applies synthetic oblique;
/// `(x, y)` is the pen position (baseline origin) in device space. The
/// transform flips the Y axis to match tiny-skia's Y-down coordinates.
#[inline]
pub fn glyph_transform(scale: f32, skew: f32, x: f32, y: f32) -> Transform {
  Transform::from_row(scale, 0.0, skew * scale, -scale, x, y)
}

#[cfg(test)]
mod tests {
  use super::*;
  use ttf_parser::OutlineBuilder;

  #[test]
  fn builder_produces_closed_path() {
    let mut builder = GlyphOutlineBuilder::new();
    OutlineBuilder::move_to(&mut builder, 0.0, 0.0);
    OutlineBuilder::line_to(&mut builder, 10.0, 0.0);
    OutlineBuilder::quad_to(&mut builder, 15.0, 5.0, 20.0, 0.0);
    OutlineBuilder::curve_to(&mut builder, 20.0, 5.0, 25.0, 5.0, 30.0, 0.0);
    OutlineBuilder::close(&mut builder);

    let path = builder.finish().expect("non-empty path");
    assert!(path.bounds().width() > 0.0);
  }

  #[test]
  fn empty_outline_yields_none() {
    let builder = GlyphOutlineBuilder::new();
    assert!(builder.finish().is_none());
  }

  #[test]
  fn glyph_transform_matches_expected_matrix() {
    let transform = glyph_transform(2.0, 0.25, 10.0, 20.0);
    assert!((transform.sx - 2.0).abs() < 1e-6);
    assert!((transform.kx - 0.5).abs() < 1e-6);
    assert!((transform.sy + 2.0).abs() < 1e-6);
    assert_eq!(transform.tx, 10.0);
    assert_eq!(transform.ty, 20.0);
  }
}
