//! Gaussian blur for shadow layers.
//!
//! The shadow scratch layer holds glyphs in a single color, so only the
//! coverage (alpha) plane needs blurring. The blur extracts alpha, runs a
//! separable two-pass convolution with edge clamping, and rewrites each
//! pixel as the shadow color premultiplied by the blurred coverage.

use crate::style::Rgba;
use tiny_skia::Pixmap;

/// Builds a normalized 1-D Gaussian kernel.
///
/// Radius is `ceil(3 * sigma)`; past three sigma the tail contributes
/// nothing visible. Returns an empty kernel for sigma so small the radius
/// rounds to zero.
pub(crate) fn gaussian_kernel(sigma: f32) -> (Vec<f32>, usize) {
  let radius = (sigma.abs() * 3.0).ceil() as usize;
  if radius == 0 {
    return (Vec::new(), 0);
  }

  let sigma_sq = sigma * sigma;
  let mut kernel = Vec::with_capacity(radius * 2 + 1);
  let mut sum = 0.0;

  for i in 0..=radius * 2 {
    let x = i as f32 - radius as f32;
    let value = (-x * x / (2.0 * sigma_sq)).exp();
    kernel.push(value);
    sum += value;
  }

  if sum != 0.0 {
    for k in &mut kernel {
      *k /= sum;
    }
  }
  (kernel, radius)
}

/// Blurs a single-color coverage layer in place.
///
/// The layer must have been drawn with `color` at full alpha; the blur
/// convolves the coverage plane, then rewrites every pixel as `color`
/// (including its alpha) scaled by the blurred coverage. A sigma that
/// rounds to zero radius skips the convolution but still applies the
/// color's alpha.
pub(crate) fn blur_coverage(pixmap: &mut Pixmap, sigma: f32, color: Rgba) {
  let (kernel, radius) = gaussian_kernel(sigma);

  let width = pixmap.width() as usize;
  let height = pixmap.height() as usize;

  let src: Vec<f32> = pixmap.pixels().iter().map(|p| p.alpha() as f32 / 255.0).collect();

  let dst = if kernel.is_empty() {
    src
  } else {
    let mut temp = vec![0.0_f32; src.len()];
    let mut dst = vec![0.0_f32; src.len()];

    // Horizontal pass
    for y in 0..height {
      for x in 0..width {
        let mut accum = 0.0;
        for (i, weight) in kernel.iter().enumerate() {
          let offset = i as isize - radius as isize;
          let cx = (x as isize + offset).clamp(0, width as isize - 1) as usize;
          accum += src[y * width + cx] * weight;
        }
        temp[y * width + x] = accum;
      }
    }

    // Vertical pass
    for y in 0..height {
      for x in 0..width {
        let mut accum = 0.0;
        for (i, weight) in kernel.iter().enumerate() {
          let offset = i as isize - radius as isize;
          let cy = (y as isize + offset).clamp(0, height as isize - 1) as usize;
          accum += temp[cy * width + x] * weight;
        }
        dst[y * width + x] = accum;
      }
    }
    dst
  };

  for (px, coverage) in pixmap.pixels_mut().iter_mut().zip(dst.iter()) {
    let a = (coverage * color.a).clamp(0.0, 1.0);
    let alpha = (a * 255.0).round() as u8;
    // Premultiplied channels
    let r = (color.r as f32 * a).round().clamp(0.0, 255.0) as u8;
    let g = (color.g as f32 * a).round().clamp(0.0, 255.0) as u8;
    let b = (color.b as f32 * a).round().clamp(0.0, 255.0) as u8;
    *px = tiny_skia::PremultipliedColorU8::from_rgba(r, g, b, alpha)
      .unwrap_or(tiny_skia::PremultipliedColorU8::TRANSPARENT);
  }
}
