//! Member classification.
//!
//! Each member is resolved into one [`RenderKind`] plus optional sizing and
//! style hints. When several render markers are present the strongest one
//! wins:
//!
//! ```text
//! Action > CollectionProperty > Property > Procedural > LayoutGroup
//! ```
//!
//! Members that resolve to nothing are not renderable and are dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use autoui_widgets::{PanelLayout, Sizing, StyleHint};
use parking_lot::RwLock;

use super::markers::{
    ActionMarker, CollectionMarker, LayoutGroupMarker, LayoutMarker, Marker, ProceduralMarker,
    PropertyMarker,
};
use super::types::{
    ConfigureBuilderFn, ConfigurePanelFn, MemberInfo, MemberKind, MethodSignature, TypeInfo,
    TypeRef, ValueType,
};
use crate::error::ConfigurationError;
use crate::registry::{ControlRegistry, DisplayShape};

/// How a property widget is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyMode {
    /// Editor from the property-editor table.
    Editor,
    /// Read-only display from the shape table.
    Display(DisplayShape),
}

/// How a procedural member is invoked at build time.
#[derive(Clone, Copy)]
pub enum ProceduralInvoke {
    /// Receives the generated container.
    Panel(ConfigurePanelFn),
    /// Receives the builder, with the container as current panel.
    Builder(ConfigureBuilderFn),
}

impl fmt::Debug for ProceduralInvoke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Panel(_) => "Panel",
            Self::Builder(_) => "Builder",
        })
    }
}

/// Render classification of one member.
#[derive(Debug, Clone)]
pub enum RenderKind {
    /// Trigger widget bound to a method.
    Action(ActionMarker),
    /// List or tree widget.
    Collection {
        /// Marker options.
        marker: CollectionMarker,
        /// Selected-index companion property.
        selected_index: String,
        /// Item view-model type.
        item: TypeRef,
        /// Items expose children.
        hierarchical: bool,
    },
    /// Editor or display widget.
    Property {
        /// Marker options.
        marker: PropertyMarker,
        /// Declared type.
        value_type: ValueType,
        /// Editor or display.
        mode: PropertyMode,
    },
    /// User-populated container.
    Procedural {
        /// Bind-time hook.
        binding_method: Option<String>,
        /// Build-time hook.
        invoke: ProceduralInvoke,
    },
    /// Nested panel backed by a sub-view-model.
    LayoutGroup {
        /// Layout copied onto the panel.
        layout: PanelLayout,
        /// Sub-view-model type.
        model: TypeRef,
    },
}

impl RenderKind {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Action(_) => "action",
            Self::Collection { .. } => "collection",
            Self::Property {
                mode: PropertyMode::Editor,
                ..
            } => "editor",
            Self::Property { .. } => "display",
            Self::Procedural { .. } => "procedural",
            Self::LayoutGroup { .. } => "layout_group",
        }
    }

    /// Returns true for members that produce a registration record.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        !matches!(self, Self::LayoutGroup { .. })
    }
}

/// A renderable member with its hints.
#[derive(Debug, Clone)]
pub struct ResolvedMember {
    /// The member.
    pub member: &'static MemberInfo,
    /// Render classification.
    pub render: RenderKind,
    /// Sizing requested by a Layout marker.
    pub layout: Option<Sizing>,
    /// Style requested by a Style marker.
    pub style: Option<StyleHint>,
}

/// All renderable members of a type, in declaration order.
#[derive(Debug)]
pub struct ResolvedType {
    /// The type.
    pub info: &'static TypeInfo,
    /// Renderable members.
    pub members: Vec<ResolvedMember>,
}

impl ResolvedType {
    /// Number of members that produce a registration record.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.members.iter().filter(|m| m.render.is_registered()).count()
    }
}

/// Classifies members and caches the result per type table.
pub struct MetadataResolver {
    registry: Arc<ControlRegistry>,
    cache: RwLock<HashMap<usize, Arc<ResolvedType>>>,
}

/// Identity of a metadata table; distinct tables may share a name.
fn table_key(info: &'static TypeInfo) -> usize {
    std::ptr::addr_of!(*info) as usize
}

impl MetadataResolver {
    /// Creates a resolver over the given registry.
    #[must_use]
    pub fn new(registry: Arc<ControlRegistry>) -> Self {
        Self {
            registry,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The registry used for display-shape lookups.
    #[must_use]
    pub fn registry(&self) -> &Arc<ControlRegistry> {
        &self.registry
    }

    /// Resolves every member of `info`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if a marker is invalid for its member.
    pub fn resolve(
        &self,
        info: &'static TypeInfo,
    ) -> Result<Arc<ResolvedType>, ConfigurationError> {
        if let Some(resolved) = self.cache.read().get(&table_key(info)) {
            return Ok(Arc::clone(resolved));
        }

        let mut members = Vec::with_capacity(info.members.len());
        for member in &info.members {
            if let Some(render) = self.classify(info, member)? {
                members.push(ResolvedMember {
                    member,
                    render,
                    layout: layout_hint(member),
                    style: style_hint(member),
                });
            }
        }
        tracing::debug!(
            type_name = info.name,
            renderable = members.len(),
            "resolved view-model type"
        );

        let resolved = Arc::new(ResolvedType { info, members });
        self.cache
            .write()
            .insert(table_key(info), Arc::clone(&resolved));
        Ok(resolved)
    }

    fn classify(
        &self,
        info: &TypeInfo,
        member: &'static MemberInfo,
    ) -> Result<Option<RenderKind>, ConfigurationError> {
        let mismatch = |marker: &'static str, expected: &'static str| {
            ConfigurationError::MarkerMismatch {
                type_name: info.name,
                member: member.name,
                marker,
                expected,
            }
        };

        if let Some(action) = find(member, |m| match m {
            Marker::Action(a) => Some(a),
            _ => None,
        }) {
            if !member.is_method() {
                return Err(mismatch("Action", "a method"));
            }
            return Ok(Some(RenderKind::Action(action.clone())));
        }

        if let Some(collection) = find(member, |m| match m {
            Marker::Collection(c) => Some(c),
            _ => None,
        }) {
            let Some(ValueType::Collection { item, hierarchical }) = member.value_type() else {
                return Err(mismatch("CollectionProperty", "a collection property"));
            };
            let Some(selected_index) = collection.selected_index.clone() else {
                return Err(ConfigurationError::MissingSelectedIndex {
                    type_name: info.name,
                    member: member.name,
                });
            };
            return Ok(Some(RenderKind::Collection {
                marker: collection.clone(),
                selected_index,
                item,
                hierarchical,
            }));
        }

        if let Some(property) = find(member, |m| match m {
            Marker::Property(p) => Some(p),
            _ => None,
        }) {
            let MemberKind::Property {
                value_type,
                settable,
            } = member.kind
            else {
                return Err(mismatch("Property", "a property"));
            };
            if let Some(mode) = self.property_mode(property, value_type, settable) {
                return Ok(Some(RenderKind::Property {
                    marker: property.clone(),
                    value_type,
                    mode,
                }));
            }
            tracing::trace!(member = member.name, "property has no editor or display shape");
        }

        if let Some(procedural) = find(member, |m| match m {
            Marker::Procedural(p) => Some(p),
            _ => None,
        }) {
            let MemberKind::Method { signature } = member.kind else {
                return Err(mismatch("Procedural", "a method"));
            };
            if let Some(render) = procedural_kind(procedural, signature) {
                return Ok(Some(render));
            }
        }

        if let Some(group) = find(member, |m| match m {
            Marker::LayoutGroup(g) => Some(g),
            _ => None,
        }) {
            let Some(ValueType::Model(model)) = member.value_type() else {
                return Err(mismatch("LayoutGroup", "a view-model property"));
            };
            let layout = panel_layout(group).ok_or(ConfigurationError::UnsupportedLayoutGroup {
                type_name: info.name,
                member: member.name,
                variant: group.orientation.name(),
            })?;
            return Ok(Some(RenderKind::LayoutGroup { layout, model }));
        }

        Ok(None)
    }

    fn property_mode(
        &self,
        marker: &PropertyMarker,
        value_type: ValueType,
        settable: bool,
    ) -> Option<PropertyMode> {
        if settable && !marker.readonly {
            return Some(PropertyMode::Editor);
        }
        self.registry
            .display_shape(&value_type)
            .map(PropertyMode::Display)
    }
}

impl fmt::Debug for MetadataResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataResolver")
            .field("cached_types", &self.cache.read().len())
            .finish_non_exhaustive()
    }
}

fn find<'a, T>(
    member: &'a MemberInfo,
    pick: impl Fn(&'a Marker) -> Option<&'a T>,
) -> Option<&'a T> {
    member.markers.iter().find_map(pick)
}

fn procedural_kind(marker: &ProceduralMarker, signature: MethodSignature) -> Option<RenderKind> {
    let invoke = match signature {
        MethodSignature::Plain => return None,
        MethodSignature::ConfigurePanel(f) => ProceduralInvoke::Panel(f),
        MethodSignature::ConfigureBuilder(f) => ProceduralInvoke::Builder(f),
    };
    Some(RenderKind::Procedural {
        binding_method: marker.binding_method.clone(),
        invoke,
    })
}

fn panel_layout(group: &LayoutGroupMarker) -> Option<PanelLayout> {
    let direction = group.orientation.direction()?;
    Some(PanelLayout {
        direction,
        alignment: group.alignment,
        spacing: group.spacing,
        padding: group.padding,
        control_child_width: group.control_child_width,
        control_child_height: group.control_child_height,
        expand_child_width: group.expand_child_width,
        expand_child_height: group.expand_child_height,
    })
}

fn layout_hint(member: &MemberInfo) -> Option<Sizing> {
    member.markers.iter().find_map(|m| match m {
        Marker::Layout(layout) => Some(sizing_from(layout)),
        _ => None,
    })
}

fn sizing_from(layout: &LayoutMarker) -> Sizing {
    let mut sizing = Sizing::NEUTRAL;
    sizing.ignore_layout = layout.ignore;
    if let Some(priority) = layout.priority {
        sizing.priority = priority;
    }
    if let Some((w, h)) = layout.min {
        sizing.min_width = w;
        sizing.min_height = h;
    }
    if let Some((w, h)) = layout.preferred {
        sizing.preferred_width = w;
        sizing.preferred_height = h;
    }
    if let Some((w, h)) = layout.flexible {
        sizing.flexible_width = w;
        sizing.flexible_height = h;
    }
    sizing
}

fn style_hint(member: &MemberInfo) -> Option<StyleHint> {
    let mut found = None;
    for marker in &member.markers {
        if let Marker::Style(style) = marker {
            found
                .get_or_insert_with(StyleHint::default)
                .merge(&style.0);
        }
    }
    found
}
