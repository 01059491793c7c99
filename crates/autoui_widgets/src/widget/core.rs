//! Core widget types.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::layout::{PanelLayout, Rect, Sizing};
use crate::style::StyleHint;
use crate::value::Value;

/// Unique identifier for a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl WidgetId {
    /// Id of a node that has not been inserted into a tree yet.
    pub const UNASSIGNED: Self = Self(0);

    /// Creates a new widget ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Widget state flags (bitfield for efficiency).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetFlags(u32);

impl WidgetFlags {
    /// Widget is active (its own visibility, driven by bindings).
    pub const VISIBLE: u32 = 1 << 0;
    /// Widget is interactable.
    pub const ENABLED: u32 = 1 << 1;
    /// Widget is held hidden while its tree is under construction.
    pub const SUPPRESSED: u32 = 1 << 2;
    /// Widget belongs to an item template and is never shown directly.
    pub const TEMPLATE: u32 = 1 << 3;
    /// Widget needs layout recalculation.
    pub const DIRTY_LAYOUT: u32 = 1 << 4;

    /// Default flags for a new widget.
    pub const DEFAULT: Self = Self(Self::VISIBLE | Self::ENABLED | Self::DIRTY_LAYOUT);

    /// Creates new flags with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets a flag.
    #[inline]
    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clears a flag.
    #[inline]
    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Sets or clears a flag.
    #[inline]
    pub fn assign(&mut self, flag: u32, on: bool) {
        if on {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Kind of control a widget node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    /// Layout container.
    Panel,
    /// Clickable trigger.
    Button,
    /// Read-only text.
    Label,
    /// Read-only image.
    Image,
    /// Empty gap.
    Spacer,
    /// Boolean editor.
    Toggle,
    /// Integer editor.
    IntField,
    /// Float editor.
    FloatField,
    /// Text editor.
    TextField,
    /// Choice editor.
    Dropdown,
    /// Color editor.
    ColorField,
    /// Virtualized flat list.
    ListView,
    /// Virtualized hierarchical list.
    TreeView,
    /// Stand-in for a missing editor.
    Placeholder,
    /// Container populated by user code.
    Custom,
    /// Modal window shell.
    Window,
}

impl ControlType {
    /// Snake-case name, as used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Panel => "panel",
            Self::Button => "button",
            Self::Label => "label",
            Self::Image => "image",
            Self::Spacer => "spacer",
            Self::Toggle => "toggle",
            Self::IntField => "int_field",
            Self::FloatField => "float_field",
            Self::TextField => "text_field",
            Self::Dropdown => "dropdown",
            Self::ColorField => "color_field",
            Self::ListView => "list_view",
            Self::TreeView => "tree_view",
            Self::Placeholder => "placeholder",
            Self::Custom => "custom",
            Self::Window => "window",
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named slot in a widget's property bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetProperty {
    /// Caption text.
    Caption,
    /// Whether the caption is shown.
    CaptionVisible,
    /// Displayed text.
    Text,
    /// Displayed image.
    Sprite,
    /// Fixed size along the parent's axis.
    Size,
    /// Edited value.
    Value,
    /// Rows of a list.
    Items,
    /// Selected row of a list.
    SelectedIndex,
    /// Interactable flag (maps onto [`WidgetFlags::ENABLED`]).
    Interactable,
    /// Active flag (maps onto [`WidgetFlags::VISIBLE`]).
    Active,
}

impl WidgetProperty {
    /// Snake-case property name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Caption => "caption",
            Self::CaptionVisible => "caption_visible",
            Self::Text => "text",
            Self::Sprite => "sprite",
            Self::Size => "size",
            Self::Value => "value",
            Self::Items => "items",
            Self::SelectedIndex => "selected_index",
            Self::Interactable => "interactable",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for WidgetProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sibling-index chain locating a widget below some ancestor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ControlPath(Vec<usize>);

impl ControlPath {
    /// The empty path (the ancestor itself).
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Path extended by one sibling index.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        Self(segments)
    }

    /// Path with the first `count` segments removed.
    #[must_use]
    pub fn skip(&self, count: usize) -> Self {
        Self(self.0.iter().skip(count).copied().collect())
    }

    /// The segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the empty path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment (the sibling index of the addressed node).
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }
}

impl From<Vec<usize>> for ControlPath {
    fn from(segments: Vec<usize>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for ControlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "/{}", parts.join("/"))
    }
}

/// A node of the widget tree.
#[derive(Debug, Clone)]
pub struct WidgetNode {
    /// Widget identifier (assigned on insertion).
    pub id: WidgetId,
    /// Control kind.
    pub control: ControlType,
    /// Diagnostic name, usually the bound member.
    pub name: String,
    /// State flags.
    pub flags: WidgetFlags,
    /// Sizing descriptor.
    pub sizing: Sizing,
    /// Style hints.
    pub style: StyleHint,
    /// Layout component (panels only; at most one).
    pub layout: Option<PanelLayout>,
    /// Bounding rectangle (set after reflow).
    pub rect: Rect,
    /// Parent widget ID (None for root).
    pub parent: Option<WidgetId>,
    /// Binding key of the view model scoped to this panel.
    pub data_context: Option<String>,
    properties: BTreeMap<WidgetProperty, Value>,
}

impl WidgetNode {
    /// Creates a detached node.
    #[must_use]
    pub fn new(control: ControlType) -> Self {
        Self {
            id: WidgetId::UNASSIGNED,
            control,
            name: String::new(),
            flags: WidgetFlags::DEFAULT,
            sizing: Sizing::NEUTRAL,
            style: StyleHint::default(),
            layout: None,
            rect: Rect::ZERO,
            parent: None,
            data_context: None,
            properties: BTreeMap::new(),
        }
    }

    /// Sets the diagnostic name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Reads a property.
    #[must_use]
    pub fn property(&self, property: WidgetProperty) -> Option<&Value> {
        match property {
            WidgetProperty::Interactable | WidgetProperty::Active => None,
            _ => self.properties.get(&property),
        }
    }

    /// Writes a property.
    ///
    /// [`WidgetProperty::Interactable`] and [`WidgetProperty::Active`] are
    /// routed onto the flag bits.
    pub fn set_property(&mut self, property: WidgetProperty, value: Value) {
        match property {
            WidgetProperty::Interactable => {
                self.flags
                    .assign(WidgetFlags::ENABLED, value.as_bool().unwrap_or(true));
            }
            WidgetProperty::Active => {
                self.flags
                    .assign(WidgetFlags::VISIBLE, value.as_bool().unwrap_or(true));
            }
            _ => {
                self.properties.insert(property, value);
            }
        }
    }

    /// Caption text, if any.
    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        self.property(WidgetProperty::Caption).and_then(Value::as_text)
    }

    /// Returns true if the widget is interactable.
    #[inline]
    #[must_use]
    pub fn is_interactable(&self) -> bool {
        self.flags.has(WidgetFlags::ENABLED)
    }

    /// Returns true if the widget is active.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.flags.has(WidgetFlags::VISIBLE)
    }

    /// Returns true if the widget is suppressed or part of a template.
    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.flags.has(WidgetFlags::SUPPRESSED) || self.flags.has(WidgetFlags::TEMPLATE)
    }

    /// Returns true if the widget would be drawn (ignoring ancestors).
    #[inline]
    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.is_active() && !self.is_hidden()
    }
}
