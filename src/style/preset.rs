//! Preset catalog types
//!
//! A preset is a named, partially-specified text style. The catalog is plain
//! data: loaded once, read-only, never mutated afterwards. Field names use
//! camelCase on the wire so JSON catalogs exported from the host editor load
//! unchanged.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A partial style record: every field optional
///
/// Fields absent here fall back to the documented defaults during
/// normalization (or fail validation, for the fields with no default).
/// The schema is flat; overlay is field-by-field, never a deep merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresetStyle {
    pub content: Option<String>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<String>,
    pub opacity: Option<f32>,
    pub line_spacing: Option<f32>,
    pub letter_spacing: Option<f32>,
    pub align: Option<String>,
    pub show_shadow: Option<bool>,
    pub shadow_color: Option<String>,
    pub shadow_blur: Option<f32>,
    pub shadow_offset_x: Option<f32>,
    pub shadow_offset_y: Option<f32>,
    pub show_stroke: Option<bool>,
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f32>,
}

/// A named preset: preview asset key, display name, partial style
///
/// `preview` and `name` are consumed by the host's listing UI; the renderer
/// only reads `style`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPreset {
    /// Logical asset key for the preview image (e.g. `text/1.png`)
    pub preview: String,
    /// Display name shown in the preset picker
    pub name: String,
    /// Partial style overlaid onto the defaults at render time
    pub style: PresetStyle,
}

/// The built-in preset catalog
///
/// Mirrors the presets shipped with the host editor. Constructed on first
/// access and shared for the life of the process.
pub fn builtin_presets() -> &'static [TextPreset] {
    static PRESETS: OnceLock<Vec<TextPreset>> = OnceLock::new();
    PRESETS.get_or_init(|| {
        vec![
            TextPreset {
                preview: "text/1.png".to_string(),
                name: "Outline Title".to_string(),
                style: PresetStyle {
                    content: Some("Outlined Text Effect".to_string()),
                    font_size: Some(48.0),
                    font_family: Some("Microsoft YaHei".to_string()),
                    bold: Some(true),
                    italic: Some(false),
                    color: Some("#FFFFFF".to_string()),
                    opacity: Some(100.0),
                    line_spacing: Some(0.0),
                    letter_spacing: Some(0.0),
                    align: Some("center".to_string()),
                    show_shadow: Some(false),
                    shadow_color: Some("#000000".to_string()),
                    shadow_blur: Some(0.0),
                    shadow_offset_x: Some(0.0),
                    shadow_offset_y: Some(0.0),
                    show_stroke: Some(true),
                    stroke_color: Some("red".to_string()),
                    stroke_width: Some(3.0),
                },
            },
            TextPreset {
                preview: "text/2.png".to_string(),
                name: "Shadow Title".to_string(),
                style: PresetStyle {
                    content: Some("Shadow Text Effect".to_string()),
                    font_size: Some(52.0),
                    font_family: Some("Microsoft YaHei".to_string()),
                    bold: Some(true),
                    italic: Some(false),
                    color: Some("#FFD93D".to_string()),
                    opacity: Some(100.0),
                    line_spacing: Some(0.0),
                    letter_spacing: Some(0.0),
                    align: Some("center".to_string()),
                    show_shadow: Some(true),
                    shadow_color: Some("rgba(59, 59, 59, 1)".to_string()),
                    shadow_blur: Some(10.0),
                    shadow_offset_x: Some(4.0),
                    shadow_offset_y: Some(4.0),
                    show_stroke: Some(false),
                    stroke_color: Some("#000000".to_string()),
                    stroke_width: Some(0.0),
                },
            },
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_stable() {
        let presets = builtin_presets();
        assert_eq!(presets.len(), 2);
        assert_eq!(presets[0].name, "Outline Title");
        assert_eq!(presets[1].name, "Shadow Title");
        // Same allocation on every access
        assert!(std::ptr::eq(presets, builtin_presets()));
    }

    #[test]
    fn preset_style_deserializes_camel_case() {
        let json = r#"{
            "content": "Hi",
            "fontSize": 48,
            "fontFamily": "Arial",
            "showStroke": true,
            "strokeColor": "red",
            "strokeWidth": 3
        }"#;
        let style: PresetStyle = serde_json::from_str(json).unwrap();
        assert_eq!(style.content.as_deref(), Some("Hi"));
        assert_eq!(style.font_size, Some(48.0));
        assert_eq!(style.show_stroke, Some(true));
        assert_eq!(style.stroke_color.as_deref(), Some("red"));
        // Unset fields stay None
        assert_eq!(style.shadow_blur, None);
        assert_eq!(style.align, None);
    }

    #[test]
    fn preset_roundtrips_through_json() {
        let preset = &builtin_presets()[0];
        let json = serde_json::to_string(preset).unwrap();
        let back: TextPreset = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, preset);
    }
}
