//! Effect compositing.
//!
//! Draws a positioned text layout onto a transparent canvas in three
//! passes, back to front: shadow, stroke, fill. Every pass reuses the same
//! cached glyph outlines in design units; only the paint and the transform
//! differ. The shadow pass renders into a scratch layer so the blur never
//! touches ink from the other passes.

use crate::error::{RenderError, Result};
use crate::paint::blur::blur_coverage;
use crate::style::{Rgba, StyleConfig};
use crate::text::glyph_path::{build_glyph_path, glyph_transform};
use crate::text::layout::TextLayout;
use std::collections::HashMap;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, Path, Pixmap, PixmapPaint, Stroke, Transform};

/// Hard ceiling on canvas width and height, in pixels.
///
/// A runaway font size or padding combination fails fast instead of
/// attempting a multi-gigabyte allocation.
pub const MAX_CANVAS_DIMENSION: u32 = 8192;

/// How the style's opacity percentage is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpacityScope {
  /// Opacity scales the whole composited result: fill, stroke and shadow
  #[default]
  Composite,
  /// Opacity scales only the fill pass; stroke and shadow stay at the
  /// alpha their own colors carry
  FillOnly,
}

/// Composites a layout onto a fresh transparent canvas.
pub struct Compositor {
  max_dimension: u32,
  opacity_scope: OpacityScope,
}

impl Compositor {
  pub fn new() -> Self {
    Self {
      max_dimension: MAX_CANVAS_DIMENSION,
      opacity_scope: OpacityScope::default(),
    }
  }

  pub fn with_options(max_dimension: u32, opacity_scope: OpacityScope) -> Self {
    Self {
      max_dimension,
      opacity_scope,
    }
  }

  /// Renders all enabled passes for `layout` and returns the canvas.
  ///
  /// # Errors
  ///
  /// [`RenderError::CanvasTooLarge`] when the layout wants a canvas above
  /// the configured maximum, [`RenderError::CanvasCreationFailed`] when
  /// allocation fails.
  pub fn composite(&self, config: &StyleConfig, layout: &TextLayout) -> Result<Pixmap> {
    if layout.width > self.max_dimension || layout.height > self.max_dimension {
      return Err(
        RenderError::CanvasTooLarge {
          width: layout.width,
          height: layout.height,
          max: self.max_dimension,
        }
        .into(),
      );
    }

    let mut canvas = Pixmap::new(layout.width, layout.height).ok_or(RenderError::CanvasCreationFailed {
      width: layout.width,
      height: layout.height,
    })?;

    let opacity = (config.opacity / 100.0).clamp(0.0, 1.0);

    // Composite scope scales the finished image once at the end; scaling
    // each pass separately would over-darken wherever passes overlap.
    let (effect_opacity, fill_opacity) = match self.opacity_scope {
      OpacityScope::Composite if opacity == 0.0 => return Ok(canvas),
      OpacityScope::Composite => (1.0, 1.0),
      OpacityScope::FillOnly => (1.0, opacity),
    };

    let Some(font) = layout.lines.first().map(|line| &line.shaped.font) else {
      return Ok(canvas);
    };
    let face = font.as_ttf_face()?;
    let paths = build_path_cache(&face, layout);

    // Shadow pass
    if config.show_shadow && effect_opacity > 0.0 && !config.shadow_color.is_transparent() {
      let mut scratch = Pixmap::new(layout.width, layout.height).ok_or(RenderError::CanvasCreationFailed {
        width: layout.width,
        height: layout.height,
      })?;

      // Full-alpha coverage; the blur applies the shadow color's own alpha
      let silhouette = Rgba { a: 1.0, ..config.shadow_color };
      fill_glyphs(
        &mut scratch,
        layout,
        &paths,
        silhouette,
        1.0,
        config.shadow_offset_x,
        config.shadow_offset_y,
      );

      let sigma = config.shadow_blur / 2.0;
      blur_coverage(&mut scratch, sigma, config.shadow_color);

      let pixmap_paint = PixmapPaint {
        opacity: effect_opacity,
        ..PixmapPaint::default()
      };
      canvas.draw_pixmap(0, 0, scratch.as_ref(), &pixmap_paint, Transform::identity(), None);
    }

    // Stroke pass
    if config.show_stroke
      && config.stroke_width > 0.0
      && effect_opacity > 0.0
      && !config.stroke_color.is_transparent()
    {
      stroke_glyphs(
        &mut canvas,
        layout,
        &paths,
        config.stroke_color,
        effect_opacity,
        config.stroke_width,
      );
    }

    // Fill pass
    if fill_opacity > 0.0 && !config.color.is_transparent() {
      fill_glyphs(&mut canvas, layout, &paths, config.color, fill_opacity, 0.0, 0.0);
    }

    if self.opacity_scope == OpacityScope::Composite && opacity < 1.0 {
      scale_alpha(&mut canvas, opacity);
    }

    Ok(canvas)
  }
}

/// Scales every (premultiplied) pixel by a group opacity.
fn scale_alpha(pixmap: &mut Pixmap, opacity: f32) {
  for px in pixmap.pixels_mut() {
    let r = (px.red() as f32 * opacity).round() as u8;
    let g = (px.green() as f32 * opacity).round() as u8;
    let b = (px.blue() as f32 * opacity).round() as u8;
    let a = (px.alpha() as f32 * opacity).round() as u8;
    *px = tiny_skia::PremultipliedColorU8::from_rgba(r, g, b, a)
      .unwrap_or(tiny_skia::PremultipliedColorU8::TRANSPARENT);
  }
}

impl Default for Compositor {
  fn default() -> Self {
    Self::new()
  }
}

/// Builds outlines for every distinct glyph id in the layout, in design units.
fn build_path_cache(face: &ttf_parser::Face<'_>, layout: &TextLayout) -> HashMap<u32, Option<Path>> {
  let mut paths = HashMap::new();
  for line in &layout.lines {
    for glyph in &line.shaped.glyphs {
      paths
        .entry(glyph.glyph_id)
        .or_insert_with(|| build_glyph_path(face, glyph.glyph_id as u16));
    }
  }
  paths
}

fn make_paint<'a>(color: Rgba, pass_opacity: f32) -> Paint<'a> {
  let mut paint = Paint::default();
  let alpha = (color.a * pass_opacity).clamp(0.0, 1.0);
  paint.set_color_rgba8(color.r, color.g, color.b, (alpha * 255.0).round() as u8);
  paint.anti_alias = true;
  paint
}

/// Fills every glyph in the layout, optionally displaced by `(dx, dy)`.
///
/// Synthetic bold adds an outline stroke in the fill color on top of the
/// fill, the same trick used when a face lacks a true bold variant.
fn fill_glyphs(
  pixmap: &mut Pixmap,
  layout: &TextLayout,
  paths: &HashMap<u32, Option<Path>>,
  color: Rgba,
  pass_opacity: f32,
  dx: f32,
  dy: f32,
) {
  let paint = make_paint(color, pass_opacity);
  let scale = layout.metrics.scale;
  let skew = layout.synthetic_oblique;

  let bold_stroke = (layout.synthetic_bold > 0.0).then(|| Stroke {
    width: layout.synthetic_bold * 2.0,
    line_join: LineJoin::Round,
    line_cap: LineCap::Round,
    ..Stroke::default()
  });

  for_each_glyph(layout, |glyph_id, x, y| {
    if let Some(Some(path)) = paths.get(&glyph_id) {
      let transform = glyph_transform(scale, skew, x + dx, y + dy);
      pixmap.fill_path(path, &paint, FillRule::Winding, transform, None);
      if let Some(ref stroke) = bold_stroke {
        pixmap.stroke_path(path, &paint, stroke, transform, None);
      }
    }
  });
}

/// Strokes every glyph outline, centered on the contour with round joins.
fn stroke_glyphs(
  pixmap: &mut Pixmap,
  layout: &TextLayout,
  paths: &HashMap<u32, Option<Path>>,
  color: Rgba,
  pass_opacity: f32,
  width: f32,
) {
  let paint = make_paint(color, pass_opacity);
  let scale = layout.metrics.scale;
  let skew = layout.synthetic_oblique;

  // Stroke width is given in device pixels but the path is in design
  // units; the transform scales it back down.
  let stroke = Stroke {
    width: (width + layout.synthetic_bold * 2.0) / scale,
    line_join: LineJoin::Round,
    line_cap: LineCap::Round,
    ..Stroke::default()
  };

  for_each_glyph(layout, |glyph_id, x, y| {
    if let Some(Some(path)) = paths.get(&glyph_id) {
      let transform = glyph_transform(scale, skew, x, y);
      pixmap.stroke_path(path, &paint, &stroke, transform, None);
    }
  });
}

/// Visits every glyph with its baseline origin in canvas coordinates.
fn for_each_glyph<F: FnMut(u32, f32, f32)>(layout: &TextLayout, mut f: F) {
  for line in &layout.lines {
    for glyph in &line.shaped.glyphs {
      let x = line.x + glyph.x_offset;
      let y = line.baseline_y - glyph.y_offset;
      f(glyph.glyph_id, x, y);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::style::{normalize_style, PresetStyle};
  use crate::text::font_loader::FontContext;
  use crate::text::layout::layout_text;

  fn style(content: &str) -> StyleConfig {
    normalize_style(&PresetStyle {
      content: Some(content.to_string()),
      font_size: Some(32.0),
      font_family: Some("sans-serif".to_string()),
      color: Some("#000000".to_string()),
      opacity: Some(100.0),
      align: Some("left".to_string()),
      ..PresetStyle::default()
    })
    .unwrap()
  }

  fn total_alpha(pixmap: &Pixmap) -> u64 {
    pixmap.pixels().iter().map(|p| p.alpha() as u64).sum()
  }

  fn ink_bounds(pixmap: &Pixmap) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..pixmap.height() {
      for x in 0..pixmap.width() {
        let px = pixmap.pixels()[(y * pixmap.width() + x) as usize];
        if px.alpha() > 0 {
          bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x), b.max(y)),
          });
        }
      }
    }
    bounds
  }

  fn render(config: &StyleConfig, ctx: &FontContext) -> Pixmap {
    let layout = layout_text(config, ctx).unwrap();
    Compositor::new().composite(config, &layout).unwrap()
  }

  #[test]
  fn plain_fill_produces_ink() {
    let ctx = FontContext::new();
    if !ctx.has_fonts() {
      return;
    }

    let canvas = render(&style("Hello"), &ctx);
    assert!(total_alpha(&canvas) > 0);
  }

  #[test]
  fn canvas_matches_layout_dimensions() {
    let ctx = FontContext::new();
    if !ctx.has_fonts() {
      return;
    }

    let config = style("Hello");
    let layout = layout_text(&config, &ctx).unwrap();
    let canvas = Compositor::new().composite(&config, &layout).unwrap();
    assert_eq!(canvas.width(), layout.width);
    assert_eq!(canvas.height(), layout.height);
  }

  #[test]
  fn zero_opacity_leaves_canvas_transparent() {
    let ctx = FontContext::new();
    if !ctx.has_fonts() {
      return;
    }

    let mut config = style("Hello");
    config.opacity = 0.0;
    config.show_stroke = true;
    config.stroke_width = 3.0;
    config.show_shadow = true;
    config.shadow_blur = 4.0;

    let canvas = render(&config, &ctx);
    assert_eq!(total_alpha(&canvas), 0);
  }

  #[test]
  fn fill_only_scope_keeps_effects_opaque() {
    let ctx = FontContext::new();
    if !ctx.has_fonts() {
      return;
    }

    let mut config = style("Hello");
    config.opacity = 0.0;
    config.show_stroke = true;
    config.stroke_width = 3.0;
    config.stroke_color = Rgba::RED;

    let layout = layout_text(&config, &ctx).unwrap();
    let compositor = Compositor::with_options(MAX_CANVAS_DIMENSION, OpacityScope::FillOnly);
    let canvas = compositor.composite(&config, &layout).unwrap();
    // Stroke ink survives a zero fill opacity
    assert!(total_alpha(&canvas) > 0);
  }

  #[test]
  fn stroke_extends_beyond_fill() {
    let ctx = FontContext::new();
    if !ctx.has_fonts() {
      return;
    }

    let plain = render(&style("H"), &ctx);
    let plain_bounds = ink_bounds(&plain).unwrap();
    let plain_w = plain_bounds.2 - plain_bounds.0;

    let mut config = style("H");
    config.show_stroke = true;
    config.stroke_width = 4.0;
    config.stroke_color = Rgba::RED;
    let stroked = render(&config, &ctx);
    let stroked_bounds = ink_bounds(&stroked).unwrap();
    let stroked_w = stroked_bounds.2 - stroked_bounds.0;

    assert!(stroked_w > plain_w);
  }

  #[test]
  fn zero_width_stroke_is_skipped() {
    let ctx = FontContext::new();
    if !ctx.has_fonts() {
      return;
    }

    let mut config = style("H");
    config.show_stroke = true;
    config.stroke_width = 0.0;
    config.stroke_color = Rgba::RED;
    let canvas = render(&config, &ctx);

    // No red anywhere: every inked pixel is pure (black) fill
    for px in canvas.pixels() {
      if px.alpha() > 0 {
        assert_eq!(px.red(), px.green());
      }
    }
  }

  #[test]
  fn shadow_spreads_ink_past_the_glyphs() {
    let ctx = FontContext::new();
    if !ctx.has_fonts() {
      return;
    }

    let plain = render(&style("H"), &ctx);
    let plain_area = {
      let b = ink_bounds(&plain).unwrap();
      ((b.2 - b.0) as u64) * ((b.3 - b.1) as u64)
    };

    let mut config = style("H");
    config.show_shadow = true;
    config.shadow_blur = 8.0;
    config.shadow_color = Rgba::new(59, 59, 59, 1.0);
    let shadowed = render(&config, &ctx);
    let shadow_area = {
      let b = ink_bounds(&shadowed).unwrap();
      ((b.2 - b.0) as u64) * ((b.3 - b.1) as u64)
    };

    assert!(shadow_area > plain_area);
  }

  #[test]
  fn transparent_shadow_color_draws_nothing_extra() {
    let ctx = FontContext::new();
    if !ctx.has_fonts() {
      return;
    }

    let plain = render(&style("H"), &ctx);

    let mut config = style("H");
    config.show_shadow = true;
    config.shadow_blur = 8.0;
    config.shadow_color = Rgba::TRANSPARENT;
    let shadowed = render(&config, &ctx);

    assert_eq!(total_alpha(&plain), total_alpha(&shadowed));
  }

  #[test]
  fn oversized_canvas_is_rejected() {
    let ctx = FontContext::new();
    if !ctx.has_fonts() {
      return;
    }

    let config = style("Hello");
    let mut layout = layout_text(&config, &ctx).unwrap();
    layout.width = MAX_CANVAS_DIMENSION + 1;

    let err = Compositor::new().composite(&config, &layout).unwrap_err();
    assert!(matches!(
      err,
      crate::error::Error::Render(RenderError::CanvasTooLarge { .. })
    ));
  }

  #[test]
  fn shadow_offset_shifts_the_shadow() {
    let ctx = FontContext::new();
    if !ctx.has_fonts() {
      return;
    }

    let mut config = style("H");
    config.show_shadow = true;
    config.shadow_blur = 0.0;
    config.shadow_offset_x = 6.0;
    config.shadow_offset_y = 6.0;
    config.shadow_color = Rgba::new(255, 0, 0, 1.0);
    config.color = Rgba::BLACK;

    let canvas = render(&config, &ctx);
    let bounds = ink_bounds(&canvas).unwrap();

    let plain = render(&style("H"), &ctx);
    let plain_bounds = ink_bounds(&plain).unwrap();

    // Shadow shifted right/down extends the ink box by about the offset
    assert!(bounds.2 >= plain_bounds.2 + 4);
    assert!(bounds.3 >= plain_bounds.3 + 4);
  }
}
