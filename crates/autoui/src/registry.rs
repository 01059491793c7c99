//! Control, property-editor and display-shape lookup.
//!
//! Registries are filled once (from [`UiConfig`] or by hand) and are
//! read-only afterwards.

use std::collections::HashMap;

use autoui_widgets::{ControlType, StyleHint, Value, WidgetNode, WidgetProperty};

use crate::config::{PrefabConfig, UiConfig};
use crate::metadata::ValueType;

/// Read-only display of a value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayShape {
    /// Control used for display.
    pub control: ControlType,
    /// Widget property receiving the value.
    pub slot: WidgetProperty,
}

/// Lookup tables used by the builder.
#[derive(Debug, Clone)]
pub struct ControlRegistry {
    prefabs: HashMap<ControlType, PrefabConfig>,
    editors: HashMap<String, ControlType>,
    shapes: HashMap<String, DisplayShape>,
}

impl ControlRegistry {
    /// Registry with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            prefabs: HashMap::new(),
            editors: HashMap::new(),
            shapes: HashMap::new(),
        }
    }

    /// Registry built from configuration.
    #[must_use]
    pub fn from_config(config: &UiConfig) -> Self {
        let mut registry = Self::empty();
        for (control, prefab) in &config.controls {
            registry.register_prefab(*control, prefab.clone());
        }
        for (key, control) in &config.editors {
            registry.register_editor(key.clone(), *control);
        }
        for shape in &config.shapes {
            registry.register_shape(
                shape.value_type.clone(),
                DisplayShape {
                    control: shape.control,
                    slot: shape.slot,
                },
            );
        }
        registry
    }

    /// Sets prefab defaults for a control type.
    pub fn register_prefab(&mut self, control: ControlType, prefab: PrefabConfig) {
        self.prefabs.insert(control, prefab);
    }

    /// Maps a value-type key to an editor control.
    pub fn register_editor(&mut self, key: impl Into<String>, control: ControlType) {
        self.editors.insert(key.into(), control);
    }

    /// Maps a value-type key to a read-only display.
    pub fn register_shape(&mut self, key: impl Into<String>, shape: DisplayShape) {
        self.shapes.insert(key.into(), shape);
    }

    /// Fresh widget for `control`, with prefab defaults applied.
    #[must_use]
    pub fn control(&self, control: ControlType) -> WidgetNode {
        let mut node = WidgetNode::new(control);
        if let Some(prefab) = self.prefabs.get(&control) {
            if let Some(caption) = &prefab.caption {
                node.set_property(WidgetProperty::Caption, Value::Text(caption.clone()));
            }
            if let Some(sizing) = prefab.sizing {
                node.sizing = sizing;
            }
            if let Some(class) = &prefab.style_class {
                node.style.merge(&StyleHint {
                    class: Some(class.clone()),
                    ..StyleHint::default()
                });
            }
        }
        node
    }

    /// Editor control registered for `value_type`.
    #[must_use]
    pub fn editor_control(&self, value_type: &ValueType) -> Option<ControlType> {
        self.editors.get(value_type.key()).copied()
    }

    /// Fresh editor widget for `value_type`, if one is registered.
    #[must_use]
    pub fn property_editor(&self, value_type: &ValueType) -> Option<WidgetNode> {
        self.editor_control(value_type).map(|control| self.control(control))
    }

    /// Display shape registered for `value_type`.
    #[must_use]
    pub fn display_shape(&self, value_type: &ValueType) -> Option<DisplayShape> {
        self.shapes.get(value_type.key()).copied()
    }
}

impl Default for ControlRegistry {
    fn default() -> Self {
        Self::from_config(&UiConfig::default())
    }
}
