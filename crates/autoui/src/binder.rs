//! # Binder
//!
//! Consumes a [`BuildOutput`] against a live view model:
//!
//! ```text
//! for each record:
//!     widget  = root / control_path
//!     model   = view model / member_path      (null → skipped, stays hidden)
//!     scope   = widget's panel                (first record opens it)
//!     binding = primary + companions
//! initialize queued scopes → reveal hidden widgets → request layout
//! ```
//!
//! The records are moved in and dropped with the output, so a build can be
//! bound exactly once.

use std::collections::HashSet;

use autoui_widgets::{Value, WidgetFlags, WidgetId, WidgetProperty, WidgetTree};

use crate::binding::{Binding, BindingKey, BindingKind, BindingSet, BindingTarget};
use crate::builder::{BuildOutput, RegistrationRecord};
use crate::error::Diagnostic;
use crate::metadata::{Companion, PropertyMode, RenderKind};
use crate::model::ViewModel;
use crate::template::TemplateLibrary;

/// Non-fatal problems found while binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindReport {
    /// Build and bind diagnostics, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
    /// Widgets left hidden because their view model was null.
    pub kept_hidden: Vec<WidgetId>,
}

/// A bound widget tree.
#[derive(Debug)]
pub struct BoundView {
    /// Wrapper panel of the build.
    pub root: WidgetId,
    /// Live bindings.
    pub bindings: BindingSet,
    /// Item templates of hierarchical lists.
    pub templates: TemplateLibrary,
    /// Non-fatal problems.
    pub report: BindReport,
}

/// Turns registration records into bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binder;

impl Binder {
    /// Binds a build against `model` and reveals the widgets.
    pub fn bind(
        tree: &mut WidgetTree,
        output: BuildOutput,
        model: &mut dyn ViewModel,
    ) -> BoundView {
        let BuildOutput {
            root,
            records,
            hidden,
            templates,
            diagnostics,
        } = output;
        let mut report = BindReport {
            diagnostics,
            kept_hidden: Vec::new(),
        };

        let mut bindings = BindingSet::new();
        let mut queued = Vec::new();
        for record in &records {
            let Some(widget) = tree.resolve_path(root, &record.control_path) else {
                tracing::warn!(
                    key = %record.binding_key(),
                    path = %record.control_path,
                    "record widget not found"
                );
                continue;
            };
            let panel = tree.parent(widget).unwrap_or(root);

            let Some(owner) = record.member_path.resolve_mut(model) else {
                tracing::warn!(
                    key = %record.binding_key(),
                    path = %record.member_path,
                    "view model is null, widget left hidden"
                );
                report.diagnostics.push(Diagnostic::NullViewModel {
                    key: record.binding_key(),
                });
                report.kept_hidden.push(widget);
                continue;
            };

            if bindings.open_scope(panel, &record.member_path) {
                queued.push(panel);
            }
            let binding = bind_record(tree, record, widget, panel);
            if let (RenderKind::Procedural { binding_method: Some(method), .. }, Some(node)) =
                (&record.render, tree.get_mut(widget))
            {
                if !owner.bind_widget(method, node) {
                    tracing::warn!(
                        key = %record.binding_key(),
                        method = %method,
                        "bind hook not found"
                    );
                }
            }
            bindings.push(binding);
        }

        for panel in queued {
            bindings.initialize_scope(tree, panel, &*model);
        }

        let kept: HashSet<WidgetId> = report.kept_hidden.iter().copied().collect();
        for id in hidden.into_iter().filter(|id| !kept.contains(id)) {
            if let Some(node) = tree.get_mut(id) {
                node.flags.clear(WidgetFlags::SUPPRESSED);
            }
        }
        tree.request_layout(root);

        tracing::debug!(
            records = records.len(),
            bindings = bindings.len(),
            skipped = report.kept_hidden.len(),
            "bound view"
        );
        BoundView {
            root,
            bindings,
            templates,
            report,
        }
    }

    /// Binds a build without an instance, for item templates.
    ///
    /// Every record gets a binding; scopes stay uninitialized and widgets
    /// stay hidden.
    pub fn bind_template(tree: &mut WidgetTree, output: BuildOutput) -> BindingSet {
        let mut bindings = BindingSet::new();
        for record in &output.records {
            let Some(widget) = tree.resolve_path(output.root, &record.control_path) else {
                continue;
            };
            let panel = tree.parent(widget).unwrap_or(output.root);
            bindings.open_scope(panel, &record.member_path);
            bindings.push(bind_record(tree, record, widget, panel));
        }
        bindings
    }
}

fn companion(
    kind: BindingKind,
    key: &BindingKey,
    companion: &Companion,
    property: WidgetProperty,
) -> BindingTarget {
    BindingTarget::new(kind, key.sibling(companion.member.as_str()))
        .to_property(property)
        .inverted(companion.invert)
}

fn bind_record(
    tree: &mut WidgetTree,
    record: &RegistrationRecord,
    widget: WidgetId,
    scope: WidgetId,
) -> Binding {
    let key = BindingKey {
        path: record.member_path.clone(),
        type_name: record.owner.name,
        member: record.member.name.to_owned(),
    };
    let mut companions = Vec::new();
    let mut template = None;

    let primary = match &record.render {
        RenderKind::Action(marker) => {
            if let Some(c) = &marker.interactable {
                companions.push(companion(
                    BindingKind::OneWayProperty,
                    &key,
                    c,
                    WidgetProperty::Interactable,
                ));
            }
            if let Some(c) = &marker.active {
                companions.push(companion(BindingKind::IsActive, &key, c, WidgetProperty::Active));
            }
            BindingTarget::new(BindingKind::Action, key.clone())
        }
        RenderKind::Collection {
            marker,
            selected_index,
            item,
            hierarchical,
        } => {
            let selection = key.sibling(selected_index.as_str());
            companions.push(
                BindingTarget::new(BindingKind::TwoWayProperty, selection)
                    .to_property(WidgetProperty::SelectedIndex),
            );
            if let Some(c) = &marker.property.active {
                companions.push(companion(BindingKind::IsActive, &key, c, WidgetProperty::Active));
            }
            if *hierarchical {
                template = Some(item().name);
            }
            BindingTarget::new(BindingKind::OneWayProperty, key.clone())
                .to_property(WidgetProperty::Items)
        }
        RenderKind::Property {
            marker,
            mode: PropertyMode::Editor,
            ..
        } => {
            if let Some(node) = tree.get_mut(widget) {
                let caption = marker.caption.as_deref().unwrap_or(record.member.name);
                node.set_property(WidgetProperty::Caption, Value::from(caption));
                node.set_property(WidgetProperty::CaptionVisible, Value::Bool(marker.show_caption));
            }
            if let Some(c) = &marker.interactable {
                companions.push(companion(
                    BindingKind::OneWayProperty,
                    &key,
                    c,
                    WidgetProperty::Interactable,
                ));
            }
            if let Some(c) = &marker.active {
                companions.push(companion(BindingKind::IsActive, &key, c, WidgetProperty::Active));
            }
            BindingTarget::new(BindingKind::TwoWayProperty, key.clone())
                .to_property(WidgetProperty::Value)
        }
        RenderKind::Property {
            marker,
            mode: PropertyMode::Display(shape),
            ..
        } => {
            if let Some(c) = &marker.active {
                companions.push(companion(BindingKind::IsActive, &key, c, WidgetProperty::Active));
            }
            BindingTarget::new(BindingKind::OneWayProperty, key.clone()).to_property(shape.slot)
        }
        RenderKind::Procedural { binding_method, .. } => {
            let member = binding_method.as_deref().unwrap_or(record.member.name);
            BindingTarget::new(BindingKind::Procedural, key.sibling(member))
        }
        RenderKind::LayoutGroup { .. } => BindingTarget::new(BindingKind::Procedural, key.clone()),
    };

    Binding {
        widget,
        control_path: record.control_path.clone(),
        scope,
        primary,
        companions,
        template,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::metadata::{
        ActionMarker, MemberInfo, MetadataResolver, PropertyMarker, TypeInfo, ValueType,
    };
    use crate::registry::ControlRegistry;
    use autoui_widgets::{ControlType, WidgetNode};
    use once_cell::sync::Lazy;
    use std::sync::Arc;

    static PANEL: Lazy<TypeInfo> = Lazy::new(|| {
        TypeInfo::new("Panel")
            .member(
                MemberInfo::property("title", ValueType::Text)
                    .read_only()
                    .with(PropertyMarker::new()),
            )
            .member(
                MemberInfo::property("volume", ValueType::Int)
                    .with(PropertyMarker::new().caption("Volume").active_unless("muted")),
            )
            .member(MemberInfo::method("mute").with(ActionMarker::new()))
    });

    struct PanelModel {
        muted: bool,
    }

    impl ViewModel for PanelModel {
        fn type_info(&self) -> &'static TypeInfo {
            &PANEL
        }

        fn get(&self, member: &str) -> Value {
            match member {
                "title" => Value::from("Audio"),
                "volume" => Value::Int(7),
                "muted" => Value::Bool(self.muted),
                _ => Value::Null,
            }
        }
    }

    #[test]
    fn test_bind_reveals_and_evaluates() {
        let resolver = MetadataResolver::new(Arc::new(ControlRegistry::default()));
        let mut tree = WidgetTree::new();
        let parent = tree.add_root(WidgetNode::new(ControlType::Panel));
        let output = Builder::new(&resolver).build(&mut tree, parent, &PANEL).unwrap();
        let mut model = PanelModel { muted: true };

        let view = Binder::bind(&mut tree, output, &mut model);

        assert_eq!(view.bindings.len(), 3);
        assert_eq!(view.bindings.scopes().len(), 1);
        assert!(tree.is_visible(view.root));

        let widgets = tree.children(view.root).to_vec();
        let title = tree.get(widgets[0]).unwrap();
        assert_eq!(title.property(WidgetProperty::Text), Some(&Value::from("Audio")));

        let volume = tree.get(widgets[1]).unwrap();
        assert_eq!(volume.caption(), Some("Volume"));
        assert_eq!(volume.property(WidgetProperty::Value), Some(&Value::Int(7)));
        assert!(!volume.is_active());
        assert!(!tree.is_visible(widgets[1]));
        assert!(tree.is_visible(widgets[2]));
    }

    #[test]
    fn test_template_bind_leaves_scopes_uninitialized() {
        let resolver = MetadataResolver::new(Arc::new(ControlRegistry::default()));
        let mut tree = WidgetTree::new();
        let parent = tree.add_root(WidgetNode::new(ControlType::Panel));
        let output = Builder::new(&resolver).build(&mut tree, parent, &PANEL).unwrap();
        let root = output.root;

        let bindings = Binder::bind_template(&mut tree, output);

        assert_eq!(bindings.len(), 3);
        assert!(bindings.scopes().iter().all(|s| !s.initialized));
        assert!(!tree.is_visible(root));
    }
}
