//! Error types for the preset rendering pipeline
//!
//! Each pipeline stage has its own error enum:
//! - Validation errors (malformed or incomplete preset styles)
//! - Layout errors (font resolution, content issues)
//! - Render errors (canvas bounds, rasterization)
//! - Encode errors (output serialization)
//!
//! All errors use the `thiserror` crate for minimal boilerplate and
//! proper error trait implementations. A failed stage fails the whole
//! render call; no partial image is ever returned.

use thiserror::Error;

/// Result type alias for rendering operations
///
/// # Examples
///
/// ```
/// use textrender::Result;
///
/// fn check_size(size: f32) -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
///
/// Covers every error the pipeline can produce. Each variant wraps the
/// error type of one stage so callers can match on where a render failed.
#[derive(Error, Debug)]
pub enum Error {
    /// Preset style validation error
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Text layout error
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Rendering or rasterization error
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Output serialization error
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    /// I/O error (catalog reading, preview writing)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for miscellaneous issues
    #[error("{0}")]
    Other(String),
}

/// Errors raised while normalizing a preset style
///
/// These indicate the partial style could not be resolved into a complete,
/// in-domain configuration.
///
/// # Examples
///
/// ```
/// use textrender::error::ValidationError;
///
/// let error = ValidationError::MissingField { field: "fontSize" };
/// assert!(format!("{}", error).contains("fontSize"));
/// ```
#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    /// A required field is absent from both the preset and the defaults
    #[error("Required style field '{field}' is missing")]
    MissingField { field: &'static str },

    /// A supplied value is outside its declared domain
    #[error("Value {value} for '{field}' is out of range: {expected}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },

    /// A color string could not be parsed
    #[error("Invalid color for '{field}': {value}")]
    InvalidColor { field: &'static str, value: String },

    /// Content resolved to the empty string
    #[error("Preset content is empty")]
    EmptyContent,

    /// Unknown alignment keyword
    #[error("Unknown alignment '{value}' (expected left, center or right)")]
    InvalidAlign { value: String },
}

/// Errors raised while laying out text
#[derive(Error, Debug, Clone)]
pub enum LayoutError {
    /// No font resolved for the requested family (or any fallback)
    #[error("Font family not found: '{family}'")]
    FontNotFound { family: String },

    /// Font data could not be parsed
    #[error("Failed to load font '{family}': {reason}")]
    FontLoadFailed { family: String, reason: String },

    /// Text shaping failed
    #[error("Text shaping failed for line '{line}': {reason}")]
    ShapingFailed { line: String, reason: String },

    /// Content had no lines left after splitting
    #[error("No content lines to lay out")]
    EmptyContent,
}

/// Errors raised during compositing
#[derive(Error, Debug, Clone)]
pub enum RenderError {
    /// Canvas dimensions exceed the configured maximum
    #[error("Canvas {width}x{height} exceeds maximum dimension {max}")]
    CanvasTooLarge { width: u32, height: u32, max: u32 },

    /// Canvas allocation failed
    #[error("Failed to create canvas: {width}x{height}")]
    CanvasCreationFailed { width: u32, height: u32 },

    /// Rasterization failed
    #[error("Rasterization failed: {reason}")]
    RasterizationFailed { reason: String },
}

/// Errors raised while serializing the output image
#[derive(Error, Debug, Clone)]
pub enum EncodeError {
    /// Pixel buffer does not match the declared dimensions
    #[error("Pixel buffer mismatch for {width}x{height} image")]
    BufferMismatch { width: u32, height: u32 },

    /// The underlying encoder reported a failure
    #[error("Failed to encode image as {format}: {reason}")]
    EncodeFailed { format: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_missing_field() {
        let error = ValidationError::MissingField { field: "opacity" };
        assert!(format!("{}", error).contains("opacity"));
    }

    #[test]
    fn validation_error_out_of_range() {
        let error = ValidationError::OutOfRange {
            field: "opacity",
            value: 140.0,
            expected: "0-100",
        };
        let display = format!("{}", error);
        assert!(display.contains("opacity"));
        assert!(display.contains("140"));
        assert!(display.contains("0-100"));
    }

    #[test]
    fn validation_error_invalid_color() {
        let error = ValidationError::InvalidColor {
            field: "strokeColor",
            value: "#zzz".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("strokeColor"));
        assert!(display.contains("#zzz"));
    }

    #[test]
    fn layout_error_font_not_found() {
        let error = LayoutError::FontNotFound {
            family: "Comic Sans".to_string(),
        };
        assert!(format!("{}", error).contains("Comic Sans"));
    }

    #[test]
    fn layout_error_shaping_failed() {
        let error = LayoutError::ShapingFailed {
            line: "Hello".to_string(),
            reason: "bad face".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Hello"));
        assert!(display.contains("bad face"));
    }

    #[test]
    fn render_error_canvas_too_large() {
        let error = RenderError::CanvasTooLarge {
            width: 20000,
            height: 64,
            max: 8192,
        };
        let display = format!("{}", error);
        assert!(display.contains("20000"));
        assert!(display.contains("8192"));
    }

    #[test]
    fn encode_error_display() {
        let error = EncodeError::EncodeFailed {
            format: "PNG".to_string(),
            reason: "out of memory".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("PNG"));
        assert!(display.contains("out of memory"));
    }

    #[test]
    fn error_from_validation() {
        let error: Error = ValidationError::EmptyContent.into();
        assert!(matches!(error, Error::Validation(_)));
    }

    #[test]
    fn error_from_layout() {
        let error: Error = LayoutError::EmptyContent.into();
        assert!(matches!(error, Error::Layout(_)));
    }

    #[test]
    fn error_from_render() {
        let error: Error = RenderError::CanvasCreationFailed { width: 0, height: 0 }.into();
        assert!(matches!(error, Error::Render(_)));
    }

    #[test]
    fn error_from_encode() {
        let error: Error = EncodeError::BufferMismatch { width: 1, height: 1 }.into();
        assert!(matches!(error, Error::Encode(_)));
    }

    #[test]
    fn error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
    }

    #[test]
    fn error_trait_implemented() {
        let error = Error::Other("test".to_string());
        let _: &dyn std::error::Error = &error;
    }
}
