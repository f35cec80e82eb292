//! Font loading utilities
//!
//! High-level font access for layout and rendering. Combines the font
//! database with caching and style-aware fallback.
//!
//! # Example
//!
//! ```rust,ignore
//! use textrender::text::font_loader::FontContext;
//!
//! let ctx = FontContext::new();
//! let families = vec!["Arial".to_string(), "sans-serif".to_string()];
//! if let Some(font) = ctx.get_font(&families, 700, false) {
//!     println!("Using font: {}", font.family);
//! }
//! ```

use crate::text::font_db::{FontDatabase, FontStyle, FontWeight, LoadedFont};
use std::fs;
use std::sync::Arc;

/// Font context for text operations
///
/// The main interface for resolving style properties to actual fonts.
/// Cheap to clone; clones share the underlying database.
///
/// # Thread Safety
///
/// FontContext is thread-safe and can be shared across threads. The
/// underlying font database uses interior mutability for caching.
#[derive(Clone)]
pub struct FontContext {
    db: Arc<FontDatabase>,
}

impl FontContext {
    /// Creates a new font context with system fonts loaded
    ///
    /// Scans system font directories; the operation may take a moment on
    /// systems with many fonts.
    pub fn new() -> Self {
        let mut db = FontDatabase::new();

        // Some minimal container environments ship without system fonts.
        // Attempt to load a few common sans-serif files so shaping can proceed.
        if db.font_count() == 0 {
            const FALLBACK_FONT_FILES: &[&str] = &[
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
                "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
            ];

            for path in FALLBACK_FONT_FILES {
                if let Ok(data) = fs::read(path) {
                    let _ = db.load_font_data(data);
                    if db.font_count() > 0 {
                        break;
                    }
                }
            }
        }

        Self { db: Arc::new(db) }
    }

    /// Creates a font context with a custom font database
    ///
    /// Useful for testing or when sharing a database between contexts.
    pub fn with_database(db: Arc<FontDatabase>) -> Self {
        Self { db }
    }

    /// Creates an empty font context (no fonts loaded)
    ///
    /// Useful for testing.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(FontDatabase::empty()),
        }
    }

    /// Gets a reference to the underlying font database
    #[inline]
    pub fn database(&self) -> &FontDatabase {
        &self.db
    }

    /// Returns the number of available fonts
    #[inline]
    pub fn font_count(&self) -> usize {
        self.db.font_count()
    }

    /// Returns whether any fonts are available
    #[inline]
    pub fn has_fonts(&self) -> bool {
        !self.db.is_empty()
    }

    /// Gets a font matching the given properties
    ///
    /// Tries each family in priority order. If no face matches the requested
    /// slope, retries with the other slopes (a normal face can stand in for a
    /// missing italic via synthetic oblique at paint time, and vice versa).
    ///
    /// # Arguments
    ///
    /// * `families` - Font family names in priority order
    /// * `weight` - Numeric weight (100-900, 400=normal, 700=bold)
    /// * `italic` - Whether italic style is requested
    pub fn get_font(&self, families: &[String], weight: u16, italic: bool) -> Option<LoadedFont> {
        let requested_style = if italic { FontStyle::Italic } else { FontStyle::Normal };
        let font_weight = FontWeight::new(weight);

        for slope in Self::slope_preference_order(requested_style) {
            if let Some(id) = self.db.resolve_family_list(families, font_weight, slope) {
                if let Some(font) = self.db.load_font(id) {
                    return Some(font);
                }
            }
        }
        None
    }

    /// Slope fallback order: requested slope first, then the nearest substitutes
    fn slope_preference_order(style: FontStyle) -> [FontStyle; 3] {
        match style {
            FontStyle::Normal => [FontStyle::Normal, FontStyle::Oblique, FontStyle::Italic],
            FontStyle::Italic => [FontStyle::Italic, FontStyle::Oblique, FontStyle::Normal],
            FontStyle::Oblique => [FontStyle::Oblique, FontStyle::Italic, FontStyle::Normal],
        }
    }

    /// Gets a font by simple family name query
    ///
    /// Convenience method for simple queries without fallback chain.
    pub fn get_font_simple(&self, family: &str, weight: u16, style: FontStyle) -> Option<LoadedFont> {
        let font_weight = FontWeight::new(weight);
        let id = self.db.query(family, font_weight, style)?;
        self.db.load_font(id)
    }

    /// Gets a sans-serif fallback font
    ///
    /// Returns a generic sans-serif font, or any font as a last resort.
    pub fn get_sans_serif(&self) -> Option<LoadedFont> {
        self.get_font_simple("sans-serif", 400, FontStyle::Normal)
            .or_else(|| self.db.first_font())
    }

    /// Clears the font data cache
    ///
    /// Frees memory used by cached font data. Fonts are reloaded from disk
    /// on next access.
    pub fn clear_cache(&self) {
        self.db.clear_cache();
    }
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}
