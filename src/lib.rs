//! textrender: text style preset rendering
//!
//! Renders named text style presets (font, fill, stroke, shadow, spacing,
//! alignment) to tightly-sized transparent images, for generating the
//! preview thumbnails a preset picker shows.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use textrender::{builtin_presets, TextRenderer};
//!
//! let renderer = TextRenderer::new();
//! for preset in builtin_presets() {
//!     let png = renderer.render_preview(preset)?;
//!     std::fs::write(format!("{}.png", preset.name), png)?;
//! }
//! # Ok::<(), textrender::Error>(())
//! ```
//!
//! # Pipeline
//!
//! Rendering is a pure function of the preset: normalize the partial style
//! onto the documented defaults, lay out the shaped lines, composite
//! shadow/stroke/fill onto a transparent canvas sized to the text plus its
//! effect extents, and encode.

pub mod error;
pub mod image_output;
pub mod paint;
pub mod renderer;
pub mod style;
pub mod text;

pub use error::{EncodeError, Error, LayoutError, RenderError, Result, ValidationError};
pub use image_output::{encode_image, OutputFormat};
pub use paint::{Compositor, OpacityScope, MAX_CANVAS_DIMENSION};
pub use renderer::{TextRenderer, TextRendererBuilder};
pub use style::{builtin_presets, normalize, normalize_style, PresetStyle, Rgba, StyleConfig, TextAlign, TextPreset};
pub use text::{layout_text, FontContext, TextLayout};
