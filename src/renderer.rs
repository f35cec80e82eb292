//! Preset to image renderer
//!
//! The main entry point for turning a text preset into an encoded image.
//!
//! # Pipeline
//!
//! 1. **Normalize**: partial preset style → validated config
//! 2. **Layout**: config → shaped, positioned lines + canvas size
//! 3. **Composite**: layout → pixmap (shadow, stroke, fill)
//! 4. **Encode**: pixmap → PNG/WebP bytes

use crate::error::Result;
use crate::image_output::{self, OutputFormat};
use crate::paint::{Compositor, OpacityScope, MAX_CANVAS_DIMENSION};
use crate::style::{normalize, normalize_style, PresetStyle, StyleConfig, TextPreset};
use crate::text::font_loader::FontContext;
use crate::text::layout::layout_text;
use tiny_skia::Pixmap;

/// Renders preset previews to images
///
/// Holds the font context so repeated renders share font data and caches.
/// Cheap to clone; clones share the font database.
#[derive(Clone)]
pub struct TextRenderer {
    font_context: FontContext,
    max_dimension: u32,
    opacity_scope: OpacityScope,
    format: OutputFormat,
}

impl TextRenderer {
    /// Creates a renderer with system fonts and default options
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TextRendererBuilder {
        TextRendererBuilder::new()
    }

    /// The font context this renderer resolves fonts with
    #[inline]
    pub fn font_context(&self) -> &FontContext {
        &self.font_context
    }

    /// Renders a preset's preview image, encoded in the configured format
    pub fn render_preview(&self, preset: &TextPreset) -> Result<Vec<u8>> {
        let config = normalize(preset)?;
        self.render_config(&config)
    }

    /// Renders a bare partial style (same pipeline as [`render_preview`])
    ///
    /// [`render_preview`]: TextRenderer::render_preview
    pub fn render_style(&self, style: &PresetStyle) -> Result<Vec<u8>> {
        let config = normalize_style(style)?;
        self.render_config(&config)
    }

    /// Renders an already-validated config to encoded bytes
    pub fn render_config(&self, config: &StyleConfig) -> Result<Vec<u8>> {
        let pixmap = self.rasterize(config)?;
        image_output::encode_image(&pixmap, self.format)
    }

    /// Runs layout and compositing, returning the raw canvas
    ///
    /// Useful for callers that want pixel access instead of encoded bytes.
    pub fn rasterize(&self, config: &StyleConfig) -> Result<Pixmap> {
        log::debug!(
            "rendering {} chars at {}px (stroke: {}, shadow: {})",
            config.content.chars().count(),
            config.font_size,
            config.show_stroke,
            config.show_shadow
        );

        let layout = layout_text(config, &self.font_context)?;
        let compositor = Compositor::with_options(self.max_dimension, self.opacity_scope);
        compositor.composite(config, &layout)
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`TextRenderer`]
pub struct TextRendererBuilder {
    font_context: Option<FontContext>,
    max_dimension: u32,
    opacity_scope: OpacityScope,
    format: OutputFormat,
}

impl TextRendererBuilder {
    pub fn new() -> Self {
        Self {
            font_context: None,
            max_dimension: MAX_CANVAS_DIMENSION,
            opacity_scope: OpacityScope::default(),
            format: OutputFormat::default(),
        }
    }

    /// Uses an existing font context instead of loading system fonts
    pub fn font_context(mut self, ctx: FontContext) -> Self {
        self.font_context = Some(ctx);
        self
    }

    /// Overrides the maximum canvas dimension
    pub fn max_dimension(mut self, max: u32) -> Self {
        self.max_dimension = max;
        self
    }

    /// Chooses how the opacity percentage is applied
    pub fn opacity_scope(mut self, scope: OpacityScope) -> Self {
        self.opacity_scope = scope;
        self
    }

    /// Output encoding (PNG by default)
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn build(self) -> TextRenderer {
        TextRenderer {
            font_context: self.font_context.unwrap_or_default(),
            max_dimension: self.max_dimension,
            opacity_scope: self.opacity_scope,
            format: self.format,
        }
    }
}

impl Default for TextRendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}
