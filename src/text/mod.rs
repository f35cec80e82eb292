//! Text subsystem: font access, shaping, and layout
//!
//! The pipeline runs font resolution ([`font_loader::FontContext`]),
//! HarfBuzz shaping ([`shaper`]), and block layout ([`layout`]) before any
//! pixel is touched. Glyph outlines come from [`glyph_path`] at paint time.

pub mod font_db;
pub mod font_loader;
pub mod glyph_path;
pub mod layout;
pub mod shaper;

pub use font_db::{FontDatabase, FontMetrics, FontStyle, FontWeight, LoadedFont, ScaledMetrics};
pub use font_loader::FontContext;
pub use layout::{layout_text, EffectPadding, PositionedLine, TextLayout};
pub use shaper::{shape_line, GlyphPosition, ShapedLine};
