//! Static type descriptions of view models.
//!
//! A [`TypeInfo`] is built once per view-model type (typically in a lazy
//! static) and lists the members in declaration order.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use autoui_widgets::{WidgetId, WidgetTree};

use super::markers::Marker;
use crate::builder::Builder;
use crate::model::ViewModel;

/// Lazy reference to another type's table.
pub type TypeRef = fn() -> &'static TypeInfo;

/// Creates a default instance of a view-model type.
pub type Constructor = fn() -> Box<dyn ViewModel>;

/// Procedural member that populates a panel directly.
pub type ConfigurePanelFn = fn(&mut WidgetTree, WidgetId);

/// Procedural member that drives the builder.
pub type ConfigureBuilderFn = fn(&mut Builder<'_>, &mut WidgetTree);

/// Runtime identity of an injectable dependency type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceType {
    /// Type id used for exact matching.
    pub id: TypeId,
    /// Type name used in diagnostics.
    pub name: &'static str,
}

impl ServiceType {
    /// Identity of `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// Declared type of a property.
#[derive(Clone, Copy)]
pub enum ValueType {
    /// Boolean.
    Bool,
    /// Integer.
    Int,
    /// Floating point.
    Float,
    /// Text.
    Text,
    /// Choice among named options (value is the option index).
    Enum(&'static [&'static str]),
    /// Color.
    Color,
    /// Image handle.
    Image,
    /// Spacer marker.
    Spacer,
    /// Nested view model.
    Model(TypeRef),
    /// Collection of item view models.
    Collection {
        /// Item type.
        item: TypeRef,
        /// Items expose child collections.
        hierarchical: bool,
    },
    /// Injectable service.
    Service(fn() -> ServiceType),
    /// Anything else, keyed by name.
    Other(&'static str),
}

impl ValueType {
    /// Key used by the editor and display-shape tables.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Enum(_) => "enum",
            Self::Color => "color",
            Self::Image => "image",
            Self::Spacer => "spacer",
            Self::Model(ty) => ty().name,
            Self::Collection { .. } => "collection",
            Self::Service(service) => service().name,
            Self::Other(name) => *name,
        }
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection { item, hierarchical } => f
                .debug_struct("Collection")
                .field("item", &item().name)
                .field("hierarchical", hierarchical)
                .finish(),
            _ => f.write_str(self.key()),
        }
    }
}

/// How a method member can be invoked by the builder.
#[derive(Clone, Copy)]
pub enum MethodSignature {
    /// Ordinary method, invoked through [`ViewModel::invoke`].
    Plain,
    /// Receives the current panel.
    ConfigurePanel(ConfigurePanelFn),
    /// Receives the builder itself.
    ConfigureBuilder(ConfigureBuilderFn),
}

impl fmt::Debug for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "Plain",
            Self::ConfigurePanel(_) => "ConfigurePanel",
            Self::ConfigureBuilder(_) => "ConfigureBuilder",
        })
    }
}

/// Property or method.
#[derive(Debug, Clone, Copy)]
pub enum MemberKind {
    /// Data member.
    Property {
        /// Declared type.
        value_type: ValueType,
        /// Has a public setter.
        settable: bool,
    },
    /// Callable member.
    Method {
        /// Invocation shape.
        signature: MethodSignature,
    },
}

/// One member of a view-model type.
#[derive(Debug, Clone)]
pub struct MemberInfo {
    /// Member name, also the binding member name.
    pub name: &'static str,
    /// Property or method.
    pub kind: MemberKind,
    /// Attached markers, in declaration order.
    pub markers: Vec<Marker>,
}

impl MemberInfo {
    /// A settable property.
    #[must_use]
    pub fn property(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            kind: MemberKind::Property {
                value_type,
                settable: true,
            },
            markers: Vec::new(),
        }
    }

    /// A plain method.
    #[must_use]
    pub fn method(name: &'static str) -> Self {
        Self {
            name,
            kind: MemberKind::Method {
                signature: MethodSignature::Plain,
            },
            markers: Vec::new(),
        }
    }

    /// Removes the setter.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        if let MemberKind::Property { settable, .. } = &mut self.kind {
            *settable = false;
        }
        self
    }

    /// Makes the method a panel configurator.
    #[must_use]
    pub fn configure_panel(mut self, f: ConfigurePanelFn) -> Self {
        self.kind = MemberKind::Method {
            signature: MethodSignature::ConfigurePanel(f),
        };
        self
    }

    /// Makes the method a builder configurator.
    #[must_use]
    pub fn configure_builder(mut self, f: ConfigureBuilderFn) -> Self {
        self.kind = MemberKind::Method {
            signature: MethodSignature::ConfigureBuilder(f),
        };
        self
    }

    /// Attaches a marker.
    #[must_use]
    pub fn with(mut self, marker: impl Into<Marker>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Declared property type, if this is a property.
    #[must_use]
    pub fn value_type(&self) -> Option<ValueType> {
        match self.kind {
            MemberKind::Property { value_type, .. } => Some(value_type),
            MemberKind::Method { .. } => None,
        }
    }

    /// Returns true for methods.
    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method { .. })
    }

    /// Returns true if any attached marker satisfies `pred`.
    #[must_use]
    pub fn has_marker(&self, pred: impl Fn(&Marker) -> bool) -> bool {
        self.markers.iter().any(pred)
    }
}

/// Metadata table of one view-model type.
#[derive(Debug)]
pub struct TypeInfo {
    /// Type name, first segment of binding keys.
    pub name: &'static str,
    /// Members in declaration order.
    pub members: Vec<MemberInfo>,
    /// Default constructor for lazily created sub-objects.
    pub construct: Option<Constructor>,
}

fn construct_default<T: ViewModel + Default + 'static>() -> Box<dyn ViewModel> {
    Box::new(T::default())
}

impl TypeInfo {
    /// Starts an empty table.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            members: Vec::new(),
            construct: None,
        }
    }

    /// Registers `T::default` as the constructor.
    #[must_use]
    pub fn constructible<T: ViewModel + Default + 'static>(mut self) -> Self {
        self.construct = Some(construct_default::<T>);
        self
    }

    /// Appends a member.
    #[must_use]
    pub fn member(mut self, member: MemberInfo) -> Self {
        self.members.push(member);
        self
    }

    /// Looks a member up by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&MemberInfo> {
        self.members.iter().find(|m| m.name == name)
    }
}
