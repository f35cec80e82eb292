//! Font database
//!
//! Wraps `fontdb` and provides font loading, caching, and querying.
//! System fonts are loaded automatically on creation.
//!
//! # Thread Safety
//!
//! `FontDatabase` uses interior mutability with `RwLock` for thread-safe
//! cache access. Multiple threads can query and load fonts concurrently;
//! loading a given face is idempotent and the data ends up shared via `Arc`.

use crate::error::{LayoutError, Result};
use fontdb::Database as FontDbDatabase;
use fontdb::Family as FontDbFamily;
use fontdb::Query as FontDbQuery;
use fontdb::ID;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Font weight on the CSS 100-900 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: Self = Self(400);
    pub const BOLD: Self = Self(700);

    /// Creates a weight, clamped to the valid 100-900 range
    pub fn new(weight: u16) -> Self {
        Self(weight.clamp(100, 900))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Font slant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl From<FontStyle> for fontdb::Style {
    fn from(style: FontStyle) -> Self {
        match style {
            FontStyle::Normal => fontdb::Style::Normal,
            FontStyle::Italic => fontdb::Style::Italic,
            FontStyle::Oblique => fontdb::Style::Oblique,
        }
    }
}

impl From<fontdb::Style> for FontStyle {
    fn from(style: fontdb::Style) -> Self {
        match style {
            fontdb::Style::Normal => FontStyle::Normal,
            fontdb::Style::Italic => FontStyle::Italic,
            fontdb::Style::Oblique => FontStyle::Oblique,
        }
    }
}

/// A loaded font with cached data
///
/// Contains the font binary data (shared via `Arc`) along with metadata
/// from the font file.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    /// Font binary data (shared via Arc for efficiency)
    pub data: Arc<Vec<u8>>,
    /// Font index within the file (for TTC font collections)
    pub index: u32,
    /// Font family name
    pub family: String,
    /// Font weight
    pub weight: FontWeight,
    /// Font style
    pub style: FontStyle,
}

impl LoadedFont {
    /// Extracts font metrics by parsing the font tables
    pub fn metrics(&self) -> Result<FontMetrics> {
        FontMetrics::from_data(&self.data, self.index).map_err(|reason| {
            LayoutError::FontLoadFailed {
                family: self.family.clone(),
                reason,
            }
            .into()
        })
    }

    /// Gets a ttf-parser face for glyph outline access
    pub fn as_ttf_face(&self) -> Result<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).map_err(|e| {
            LayoutError::FontLoadFailed {
                family: self.family.clone(),
                reason: format!("Failed to parse font: {:?}", e),
            }
            .into()
        })
    }
}

/// Generic font families as defined by CSS
///
/// Abstract families that map to actual system fonts through fontdb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericFamily {
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

impl GenericFamily {
    /// Parses a generic family name; returns None for concrete family names
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "serif" => Some(GenericFamily::Serif),
            "sans-serif" => Some(GenericFamily::SansSerif),
            "monospace" => Some(GenericFamily::Monospace),
            "cursive" => Some(GenericFamily::Cursive),
            "fantasy" => Some(GenericFamily::Fantasy),
            _ => None,
        }
    }

    /// Converts to a fontdb family for querying
    pub fn to_fontdb(self) -> FontDbFamily<'static> {
        match self {
            Self::Serif => FontDbFamily::Serif,
            Self::SansSerif => FontDbFamily::SansSerif,
            Self::Monospace => FontDbFamily::Monospace,
            Self::Cursive => FontDbFamily::Cursive,
            Self::Fantasy => FontDbFamily::Fantasy,
        }
    }
}

/// Font database
///
/// # Example
///
/// ```rust,ignore
/// let db = FontDatabase::new();
/// if let Some(id) = db.query("Arial", FontWeight::BOLD, FontStyle::Normal) {
///     let font = db.load_font(id).expect("font should load");
///     println!("Loaded {}", font.family);
/// }
/// ```
pub struct FontDatabase {
    /// Underlying fontdb database
    db: FontDbDatabase,
    /// Cached font data (font ID -> binary data)
    cache: RwLock<HashMap<ID, Arc<Vec<u8>>>>,
}

impl FontDatabase {
    /// Creates a new font database and loads system fonts
    pub fn new() -> Self {
        let mut db = FontDbDatabase::new();
        db.load_system_fonts();

        Self {
            db,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Creates an empty font database without loading system fonts
    ///
    /// Useful for testing or when loading specific fonts only.
    pub fn empty() -> Self {
        Self {
            db: FontDbDatabase::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Loads fonts from a directory (recursive)
    pub fn load_fonts_dir<P: AsRef<Path>>(&mut self, path: P) {
        self.db.load_fonts_dir(path);
    }

    /// Loads a font from binary data
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a valid font file.
    pub fn load_font_data(&mut self, data: Vec<u8>) -> Result<()> {
        ttf_parser::Face::parse(&data, 0).map_err(|e| LayoutError::FontLoadFailed {
            family: "(memory)".to_string(),
            reason: format!("{:?}", e),
        })?;

        self.db.load_font_data(data);
        Ok(())
    }

    /// Queries for a font matching the given criteria
    ///
    /// `family` may be a concrete family name or a CSS generic family;
    /// fontdb handles fuzzy matching for weight and style.
    pub fn query(&self, family: &str, weight: FontWeight, style: FontStyle) -> Option<ID> {
        let families = if let Some(generic) = GenericFamily::parse(family) {
            vec![generic.to_fontdb()]
        } else {
            vec![FontDbFamily::Name(family)]
        };

        let query = FontDbQuery {
            families: &families,
            weight: fontdb::Weight(weight.0),
            style: style.into(),
            stretch: fontdb::Stretch::Normal,
        };

        self.db.query(&query)
    }

    /// Resolves a prioritized family list to the first matching font
    pub fn resolve_family_list(&self, families: &[String], weight: FontWeight, style: FontStyle) -> Option<ID> {
        families.iter().find_map(|family| self.query(family, weight, style))
    }

    /// Loads font data for a given font ID
    ///
    /// Caches the data for subsequent requests; the cached bytes are shared
    /// via `Arc` to avoid duplication.
    pub fn load_font(&self, id: ID) -> Option<LoadedFont> {
        // Check cache first
        {
            let cache = self.cache.read().ok()?;
            if let Some(data) = cache.get(&id) {
                let info = self.db.face(id)?;
                return Some(Self::loaded_font_from_info(Arc::clone(data), info));
            }
        }

        // fontdb stores font data internally; copy it out once
        let data = self.db.with_face_data(id, |font_data, _face_index| Arc::new(font_data.to_vec()))?;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(id, Arc::clone(&data));
        }

        let info = self.db.face(id)?;
        Some(Self::loaded_font_from_info(data, info))
    }

    fn loaded_font_from_info(data: Arc<Vec<u8>>, info: &fontdb::FaceInfo) -> LoadedFont {
        LoadedFont {
            data,
            index: info.index,
            family: info
                .families
                .first()
                .map(|(name, _)| name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            weight: FontWeight(info.weight.0),
            style: info.style.into(),
        }
    }

    /// Returns the number of available font faces
    pub fn font_count(&self) -> usize {
        self.db.faces().count()
    }

    /// Returns whether the database has no fonts
    pub fn is_empty(&self) -> bool {
        self.db.faces().next().is_none()
    }

    /// Returns any available font, used as a last-resort fallback
    pub fn first_font(&self) -> Option<LoadedFont> {
        let id = self.db.faces().next()?.id;
        self.load_font(id)
    }

    /// Clears the font data cache
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Font-wide dimensional metrics in design units
///
/// Extracted from the font tables; scale with [`FontMetrics::scale`] to get
/// pixel values for a specific font size.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Units per em (typically 1000 or 2048)
    pub units_per_em: u16,
    /// Ascent (distance from baseline to top, positive)
    pub ascent: i16,
    /// Descent (distance from baseline to bottom, typically negative)
    pub descent: i16,
    /// Line gap (additional spacing between lines)
    pub line_gap: i16,
    /// Calculated line height (ascent - descent + line_gap)
    pub line_height: i16,
    /// Is bold (from OS/2 table)
    pub is_bold: bool,
    /// Is italic (from OS/2 table)
    pub is_italic: bool,
}

impl FontMetrics {
    /// Extracts metrics from font data
    pub fn from_data(data: &[u8], index: u32) -> std::result::Result<Self, String> {
        let face = ttf_parser::Face::parse(data, index).map_err(|e| format!("Failed to parse font: {:?}", e))?;
        Ok(Self::from_face(&face))
    }

    /// Extracts metrics from a parsed face
    pub fn from_face(face: &ttf_parser::Face) -> Self {
        let units_per_em = face.units_per_em();
        let ascent = face.ascender();
        let descent = face.descender();
        let line_gap = face.line_gap();

        Self {
            units_per_em,
            ascent,
            descent,
            line_gap,
            line_height: ascent - descent + line_gap,
            is_bold: face.is_bold(),
            is_italic: face.is_italic(),
        }
    }

    /// Scales metrics to pixel values for a font size
    pub fn scale(&self, font_size: f32) -> ScaledMetrics {
        let scale = font_size / (self.units_per_em as f32);

        ScaledMetrics {
            font_size,
            scale,
            ascent: (self.ascent as f32) * scale,
            descent: -(self.descent as f32) * scale, // Make positive
            line_gap: (self.line_gap as f32) * scale,
            line_height: (self.line_height as f32) * scale,
        }
    }
}

/// Scaled font metrics in pixels
#[derive(Debug, Clone, Copy)]
pub struct ScaledMetrics {
    /// Font size in pixels
    pub font_size: f32,
    /// Scale factor (font_size / units_per_em)
    pub scale: f32,
    /// Ascent in pixels (above baseline)
    pub ascent: f32,
    /// Descent in pixels (positive, below baseline)
    pub descent: f32,
    /// Line gap in pixels
    pub line_gap: f32,
    /// Line height in pixels
    pub line_height: f32,
}

impl ScaledMetrics {
    /// Total height of one line of glyph ink (ascent + descent)
    #[inline]
    pub fn total_height(&self) -> f32 {
        self.ascent + self.descent
    }
}
