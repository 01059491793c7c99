//! Declarative markers attached to view-model members.
//!
//! Markers are plain values built with small builder helpers:
//!
//! ```rust,ignore
//! MemberInfo::method("save")
//!     .with(ActionMarker::new().caption("Save").interactable_when("can_save"))
//! ```

use autoui_widgets::{Alignment, Color, Direction, Padding, StyleHint, TextAlignment};

use super::types::ServiceType;

/// Reference to a boolean companion property, optionally inverted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Companion {
    /// Companion property name.
    pub member: String,
    /// Negate the companion's value.
    pub invert: bool,
}

impl Companion {
    /// Companion read as-is.
    #[must_use]
    pub fn new(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            invert: false,
        }
    }

    /// Companion read negated.
    #[must_use]
    pub fn inverted(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            invert: true,
        }
    }
}

/// Renders a method as a trigger widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionMarker {
    /// Caption; defaults to the member name.
    pub caption: Option<String>,
    /// Drives the widget's interactable flag.
    pub interactable: Option<Companion>,
    /// Drives the widget's visibility.
    pub active: Option<Companion>,
}

impl ActionMarker {
    /// Marker with no options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the caption.
    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Interactable while `member` is true.
    #[must_use]
    pub fn interactable_when(mut self, member: impl Into<String>) -> Self {
        self.interactable = Some(Companion::new(member));
        self
    }

    /// Interactable while `member` is false.
    #[must_use]
    pub fn interactable_unless(mut self, member: impl Into<String>) -> Self {
        self.interactable = Some(Companion::inverted(member));
        self
    }

    /// Visible while `member` is true.
    #[must_use]
    pub fn active_when(mut self, member: impl Into<String>) -> Self {
        self.active = Some(Companion::new(member));
        self
    }

    /// Visible while `member` is false.
    #[must_use]
    pub fn active_unless(mut self, member: impl Into<String>) -> Self {
        self.active = Some(Companion::inverted(member));
        self
    }
}

/// Renders a property as an editor or a read-only display.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMarker {
    /// Caption; defaults to the member name.
    pub caption: Option<String>,
    /// Drives the widget's interactable flag.
    pub interactable: Option<Companion>,
    /// Force the read-only display path.
    pub readonly: bool,
    /// Drives the widget's visibility.
    pub active: Option<Companion>,
    /// Show the caption next to the editor.
    pub show_caption: bool,
}

impl Default for PropertyMarker {
    fn default() -> Self {
        Self {
            caption: None,
            interactable: None,
            readonly: false,
            active: None,
            show_caption: true,
        }
    }
}

impl PropertyMarker {
    /// Marker with no options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the caption.
    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Hides the caption.
    #[must_use]
    pub fn hide_caption(mut self) -> Self {
        self.show_caption = false;
        self
    }

    /// Display the value even if the property is settable.
    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Interactable while `member` is true.
    #[must_use]
    pub fn interactable_when(mut self, member: impl Into<String>) -> Self {
        self.interactable = Some(Companion::new(member));
        self
    }

    /// Visible while `member` is true.
    #[must_use]
    pub fn active_when(mut self, member: impl Into<String>) -> Self {
        self.active = Some(Companion::new(member));
        self
    }

    /// Visible while `member` is false.
    #[must_use]
    pub fn active_unless(mut self, member: impl Into<String>) -> Self {
        self.active = Some(Companion::inverted(member));
        self
    }
}

/// Renders a collection as a virtualized list or tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionMarker {
    /// Shared property options.
    pub property: PropertyMarker,
    /// Property holding the selected row index. Required.
    pub selected_index: Option<String>,
}

impl CollectionMarker {
    /// Marker with no options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the selected-index companion.
    #[must_use]
    pub fn selected_index(mut self, member: impl Into<String>) -> Self {
        self.selected_index = Some(member.into());
        self
    }

    /// Sets the caption.
    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.property.caption = Some(caption.into());
        self
    }

    /// Visible while `member` is true.
    #[must_use]
    pub fn active_when(mut self, member: impl Into<String>) -> Self {
        self.property.active = Some(Companion::new(member));
        self
    }
}

/// Lets a method build or bind its own widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProceduralMarker {
    /// Method invoked at bind time with the generated widget.
    pub binding_method: Option<String>,
}

impl ProceduralMarker {
    /// Marker with no bind hook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the bind hook.
    #[must_use]
    pub fn bind_with(mut self, method: impl Into<String>) -> Self {
        self.binding_method = Some(method.into());
        self
    }
}

/// Variant of a layout group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Children left to right.
    Horizontal,
    /// Children top to bottom.
    Vertical,
    /// Grid arrangement (not supported by the builder).
    Grid,
}

impl Orientation {
    /// Panel direction, if the builder supports this variant.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Horizontal => Some(Direction::Horizontal),
            Self::Vertical => Some(Direction::Vertical),
            Self::Grid => None,
        }
    }

    /// Variant name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Grid => "grid",
        }
    }
}

/// Opens a nested panel for a sub-view-model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGroupMarker {
    /// Group variant.
    pub orientation: Orientation,
    /// Gap between children.
    pub spacing: f32,
    /// Padding around content.
    pub padding: Padding,
    /// Alignment of the child block.
    pub alignment: Alignment,
    /// Panel drives child widths.
    pub control_child_width: bool,
    /// Panel drives child heights.
    pub control_child_height: bool,
    /// Children fill leftover width.
    pub expand_child_width: bool,
    /// Children fill leftover height.
    pub expand_child_height: bool,
}

impl LayoutGroupMarker {
    fn with_orientation(orientation: Orientation) -> Self {
        Self {
            orientation,
            spacing: 4.0,
            padding: Padding::default(),
            alignment: Alignment::Start,
            control_child_width: true,
            control_child_height: true,
            expand_child_width: orientation == Orientation::Vertical,
            expand_child_height: orientation == Orientation::Horizontal,
        }
    }

    /// Horizontal group.
    #[must_use]
    pub fn horizontal() -> Self {
        Self::with_orientation(Orientation::Horizontal)
    }

    /// Vertical group.
    #[must_use]
    pub fn vertical() -> Self {
        Self::with_orientation(Orientation::Vertical)
    }

    /// Grid group.
    #[must_use]
    pub fn grid() -> Self {
        Self::with_orientation(Orientation::Grid)
    }

    /// Sets the gap between children.
    #[must_use]
    pub const fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets per-side padding.
    #[must_use]
    pub const fn padding(mut self, left: f32, right: f32, top: f32, bottom: f32) -> Self {
        self.padding = Padding {
            left,
            right,
            top,
            bottom,
        };
        self
    }

    /// Sets child alignment.
    #[must_use]
    pub const fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets which child sizes the panel drives.
    #[must_use]
    pub const fn control(mut self, width: bool, height: bool) -> Self {
        self.control_child_width = width;
        self.control_child_height = height;
        self
    }

    /// Sets which child sizes grow into leftover space.
    #[must_use]
    pub const fn expand(mut self, width: bool, height: bool) -> Self {
        self.expand_child_width = width;
        self.expand_child_height = height;
        self
    }
}

/// Sizing hints for the generated widget.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutMarker {
    /// Exclude the widget from its panel's layout.
    pub ignore: bool,
    /// Layout priority.
    pub priority: Option<i32>,
    /// Minimum size (width, height).
    pub min: Option<(f32, f32)>,
    /// Preferred size (width, height).
    pub preferred: Option<(f32, f32)>,
    /// Flexible share (width, height).
    pub flexible: Option<(f32, f32)>,
}

impl LayoutMarker {
    /// Marker with no hints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes the widget from layout.
    #[must_use]
    pub const fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Sets the layout priority.
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the minimum size.
    #[must_use]
    pub const fn min_size(mut self, width: f32, height: f32) -> Self {
        self.min = Some((width, height));
        self
    }

    /// Sets the preferred size.
    #[must_use]
    pub const fn preferred_size(mut self, width: f32, height: f32) -> Self {
        self.preferred = Some((width, height));
        self
    }

    /// Sets the flexible share.
    #[must_use]
    pub const fn flexible(mut self, width: f32, height: f32) -> Self {
        self.flexible = Some((width, height));
        self
    }
}

/// Cosmetic hints for the generated widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMarker(pub StyleHint);

impl StyleMarker {
    /// Marker with no hints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the style class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.0.class = Some(class.into());
        self
    }

    /// Sets the tint.
    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.0.color = Some(color);
        self
    }

    /// Sets the text alignment.
    #[must_use]
    pub fn alignment(mut self, alignment: TextAlignment) -> Self {
        self.0.alignment = Some(alignment);
        self
    }
}

/// Which notification a change handler listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A property of the sender changed.
    Property,
    /// A collection owned by the sender changed.
    Collection,
}

/// Subscribes a method to notifications of an injected dependency type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeHandlerMarker {
    /// Notification kind.
    pub kind: ChangeKind,
    /// Sender type.
    pub sender: ServiceType,
}

impl ChangeHandlerMarker {
    /// Handles property changes of `T`.
    #[must_use]
    pub fn property_changes<T: 'static>() -> Self {
        Self {
            kind: ChangeKind::Property,
            sender: ServiceType::of::<T>(),
        }
    }

    /// Handles collection changes of `T`.
    #[must_use]
    pub fn collection_changes<T: 'static>() -> Self {
        Self {
            kind: ChangeKind::Collection,
            sender: ServiceType::of::<T>(),
        }
    }
}

/// Button slot of a modal dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogRole {
    /// Confirms the dialog.
    Accept,
    /// Dismisses the dialog.
    Cancel,
    /// Third, alternate choice.
    Alternate,
}

impl DialogRole {
    /// All roles in button order.
    pub const ALL: [Self; 3] = [Self::Accept, Self::Cancel, Self::Alternate];

    /// Caption used when no member declares one.
    #[must_use]
    pub const fn default_caption(self) -> &'static str {
        match self {
            Self::Accept => "OK",
            Self::Cancel => "Cancel",
            Self::Alternate => "Other",
        }
    }
}

/// Wires a method into a dialog button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogMarker {
    /// Button slot.
    pub role: DialogRole,
    /// Button caption.
    pub caption: Option<String>,
}

impl DialogMarker {
    /// Accept callback.
    #[must_use]
    pub fn accept() -> Self {
        Self {
            role: DialogRole::Accept,
            caption: None,
        }
    }

    /// Cancel callback.
    #[must_use]
    pub fn cancel() -> Self {
        Self {
            role: DialogRole::Cancel,
            caption: None,
        }
    }

    /// Alternate callback.
    #[must_use]
    pub fn alternate() -> Self {
        Self {
            role: DialogRole::Alternate,
            caption: None,
        }
    }

    /// Sets the button caption.
    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Any marker a member can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    /// Trigger widget.
    Action(ActionMarker),
    /// Editor or display widget.
    Property(PropertyMarker),
    /// List or tree widget.
    Collection(CollectionMarker),
    /// Build-time or bind-time hook.
    Procedural(ProceduralMarker),
    /// Filled from the dependency list.
    Inject,
    /// Nested panel.
    LayoutGroup(LayoutGroupMarker),
    /// Sizing hints.
    Layout(LayoutMarker),
    /// Cosmetic hints.
    Style(StyleMarker),
    /// Dependency notification handler.
    ChangeHandler(ChangeHandlerMarker),
    /// Dialog button callback.
    Dialog(DialogMarker),
}

impl Marker {
    /// Marker name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Action(_) => "Action",
            Self::Property(_) => "Property",
            Self::Collection(_) => "CollectionProperty",
            Self::Procedural(_) => "Procedural",
            Self::Inject => "Inject",
            Self::LayoutGroup(_) => "LayoutGroup",
            Self::Layout(_) => "Layout",
            Self::Style(_) => "Style",
            Self::ChangeHandler(_) => "ChangeHandler",
            Self::Dialog(_) => "Dialog",
        }
    }
}

macro_rules! marker_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Marker {
                fn from(marker: $ty) -> Self {
                    Self::$variant(marker)
                }
            }
        )*
    };
}

marker_from! {
    ActionMarker => Action,
    PropertyMarker => Property,
    CollectionMarker => Collection,
    ProceduralMarker => Procedural,
    LayoutGroupMarker => LayoutGroup,
    LayoutMarker => Layout,
    StyleMarker => Style,
    ChangeHandlerMarker => ChangeHandler,
    DialogMarker => Dialog,
}
