//! Style model: colors, presets, and normalization
//!
//! A [`TextPreset`] carries a partial [`PresetStyle`]; [`normalize`] overlays
//! it onto the documented defaults and validates every field, producing the
//! [`StyleConfig`] the rest of the pipeline consumes.

pub mod color;
pub mod normalize;
pub mod preset;

pub use color::{ColorParseError, Rgba};
pub use normalize::{normalize, normalize_style, StyleConfig, TextAlign};
pub use preset::{builtin_presets, PresetStyle, TextPreset};
