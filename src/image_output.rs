//! Output image encoding.
//!
//! Converts a composited pixmap (premultiplied RGBA) into an encoded image
//! buffer. PNG is the default; lossless WebP is available for hosts that
//! prefer it. Both formats keep the alpha channel intact, transparent
//! background included.

use crate::error::{EncodeError, Result};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use tiny_skia::Pixmap;

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    /// Lossless WebP (alpha preserved)
    WebP,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }

    fn name(self) -> &'static str {
        match self {
            OutputFormat::Png => "PNG",
            OutputFormat::WebP => "WebP",
        }
    }
}

/// Encodes a pixmap into the requested format.
///
/// tiny-skia stores premultiplied RGBA; encoders expect straight alpha, so
/// each pixel is unpremultiplied first. Fully transparent pixels come out
/// as (0, 0, 0, 0).
pub fn encode_image(pixmap: &Pixmap, format: OutputFormat) -> Result<Vec<u8>> {
    let width = pixmap.width();
    let height = pixmap.height();

    let mut rgba_data = Vec::with_capacity((width * height * 4) as usize);
    for px in pixmap.pixels() {
        let a = px.alpha();
        if a > 0 {
            let alpha = a as f32 / 255.0;
            rgba_data.push(((px.red() as f32 / alpha).min(255.0)).round() as u8);
            rgba_data.push(((px.green() as f32 / alpha).min(255.0)).round() as u8);
            rgba_data.push(((px.blue() as f32 / alpha).min(255.0)).round() as u8);
        } else {
            rgba_data.extend_from_slice(&[0, 0, 0]);
        }
        rgba_data.push(a);
    }

    let img = RgbaImage::from_raw(width, height, rgba_data).ok_or(EncodeError::BufferMismatch { width, height })?;

    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    match format {
        OutputFormat::Png => {
            img.write_to(&mut cursor, ImageFormat::Png)
                .map_err(|e| EncodeError::EncodeFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?;
        }
        OutputFormat::WebP => {
            let encoder = image::codecs::webp::WebPEncoder::new_lossless(&mut cursor);
            img.write_with_encoder(encoder).map_err(|e| EncodeError::EncodeFailed {
                format: format.name().to_string(),
                reason: e.to_string(),
            })?;
        }
    }

    Ok(buffer)
}
