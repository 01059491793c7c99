//! # Registry Configuration
//!
//! Prefab defaults, the property-editor table and the read-only display
//! shapes are loaded once at startup from TOML:
//!
//! ```toml
//! [controls.button]
//! caption = "Button"
//! style_class = "btn"
//!
//! [controls.button.sizing]
//! min_height = 24.0
//!
//! [editors]
//! bool = "toggle"
//! "Vector3" = "text_field"
//!
//! [[shapes]]
//! value_type = "image"
//! control = "image"
//! slot = "sprite"
//! ```
//!
//! Every section is optional. Missing sections fall back to the built-in
//! tables of [`UiConfig::default`].

use std::collections::BTreeMap;
use std::path::Path;

use autoui_widgets::{ControlType, Sizing, WidgetProperty};
use serde::Deserialize;

use crate::error::ConfigError;

/// Defaults applied to every widget created for a control type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrefabConfig {
    /// Caption preset on the prefab.
    pub caption: Option<String>,
    /// Sizing residue carried by the prefab.
    pub sizing: Option<Sizing>,
    /// Style class preset on the prefab.
    pub style_class: Option<String>,
}

/// One read-only display shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShapeConfig {
    /// Value-type key the shape applies to.
    pub value_type: String,
    /// Control used for display.
    pub control: ControlType,
    /// Widget property that receives the value.
    pub slot: WidgetProperty,
}

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Prefab defaults per control type.
    pub controls: BTreeMap<ControlType, PrefabConfig>,
    /// Value-type key to editor control.
    pub editors: BTreeMap<String, ControlType>,
    /// Read-only display shapes.
    pub shapes: Vec<ShapeConfig>,
}

impl Default for UiConfig {
    fn default() -> Self {
        let editors = [
            ("bool", ControlType::Toggle),
            ("int", ControlType::IntField),
            ("float", ControlType::FloatField),
            ("text", ControlType::TextField),
            ("enum", ControlType::Dropdown),
            ("color", ControlType::ColorField),
        ]
        .into_iter()
        .map(|(key, control)| (key.to_owned(), control))
        .collect();

        let shapes = [
            ("image", ControlType::Image, WidgetProperty::Sprite),
            ("spacer", ControlType::Spacer, WidgetProperty::Size),
            ("text", ControlType::Label, WidgetProperty::Text),
        ]
        .into_iter()
        .map(|(value_type, control, slot)| ShapeConfig {
            value_type: value_type.to_owned(),
            control,
            slot,
        })
        .collect();

        Self {
            controls: BTreeMap::new(),
            editors,
            shapes,
        }
    }
}

impl UiConfig {
    /// Parses a TOML document.
    ///
    /// Tables present in the document replace the built-in ones; absent
    /// tables keep the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        tracing::debug!(
            controls = config.controls.len(),
            editors = config.editors.len(),
            shapes = config.shapes.len(),
            "loaded ui config"
        );
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not valid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let config = UiConfig::default();
        assert_eq!(config.editors.get("bool"), Some(&ControlType::Toggle));
        assert_eq!(config.shapes.len(), 3);
        assert!(config.controls.is_empty());
    }

    #[test]
    fn test_parse_sections() {
        let config = UiConfig::from_toml_str(
            r#"
            [controls.button]
            caption = "Press"
            style_class = "btn"

            [controls.button.sizing]
            min_height = 24.0

            [editors]
            "Vector3" = "text_field"

            [[shapes]]
            value_type = "image"
            control = "image"
            slot = "sprite"
            "#,
        )
        .unwrap();

        let button = &config.controls[&ControlType::Button];
        assert_eq!(button.caption.as_deref(), Some("Press"));
        let sizing = button.sizing.unwrap();
        assert_eq!(sizing.min_height, 24.0);
        assert_eq!(sizing.min_width, Sizing::UNSET);

        assert_eq!(config.editors.len(), 1);
        assert_eq!(config.editors["Vector3"], ControlType::TextField);
        assert_eq!(config.shapes[0].slot, WidgetProperty::Sprite);
    }

    #[test]
    fn test_missing_sections_keep_defaults() {
        let config = UiConfig::from_toml_str("[controls.label]\ncaption = \"x\"\n").unwrap();
        assert_eq!(config.editors, UiConfig::default().editors);
        assert_eq!(config.shapes.len(), 3);
    }

    #[test]
    fn test_unknown_control_is_rejected() {
        let err = UiConfig::from_toml_str("[editors]\nbool = \"slider\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = UiConfig::load("/nonexistent/autoui.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
