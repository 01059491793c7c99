//! View-model instantiation.
//!
//! Runs against the live root before binding:
//! 1. Deep-fills null layout-group sub-objects with default instances.
//! 2. Injects dependencies into null `Inject` properties (exact type match).
//! 3. Subscribes change handlers to the notifiers of matching dependencies.

use std::sync::{Arc, Weak};

use autoui_widgets::Value;

use crate::dependency::{Dependency, Subscriptions};
use crate::error::Diagnostic;
use crate::metadata::{ChangeHandlerMarker, Marker, MemberInfo, ValueType};
use crate::model::{MemberPath, PendingCall, ViewModel, ViewRoot};

/// Counts and problems of one instantiation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstantiateReport {
    /// Sub-objects constructed.
    pub created: usize,
    /// Properties injected.
    pub injected: usize,
    /// Handlers subscribed.
    pub subscribed: usize,
    /// Non-fatal problems.
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of [`Instantiator::instantiate`].
#[derive(Debug)]
pub struct Instantiation {
    /// Handle keeping the change handlers subscribed.
    pub subscriptions: Subscriptions,
    /// What was done.
    pub report: InstantiateReport,
}

/// Fills and wires a view-model graph.
#[derive(Debug, Clone, Copy)]
pub struct Instantiator<'d> {
    dependencies: &'d [Dependency],
}

impl<'d> Instantiator<'d> {
    /// Instantiator drawing from `dependencies`.
    #[must_use]
    pub fn new(dependencies: &'d [Dependency]) -> Self {
        Self { dependencies }
    }

    /// Fills, injects and subscribes the graph under `root`.
    pub fn instantiate(&self, root: &Arc<ViewRoot>) -> Instantiation {
        let mut report = InstantiateReport::default();
        let mut subscriptions = Subscriptions::new();
        let weak = Arc::downgrade(root);

        root.with(|model| {
            fill(model, &mut Vec::new(), &mut report);
            self.wire(model, &MemberPath::root(), &weak, &mut subscriptions, &mut report);
        });

        tracing::debug!(
            created = report.created,
            injected = report.injected,
            subscribed = report.subscribed,
            "instantiated view model"
        );
        Instantiation {
            subscriptions,
            report,
        }
    }

    fn wire(
        &self,
        model: &mut dyn ViewModel,
        path: &MemberPath,
        root: &Weak<ViewRoot>,
        subscriptions: &mut Subscriptions,
        report: &mut InstantiateReport,
    ) {
        let info = model.type_info();
        for member in &info.members {
            if member.has_marker(|m| matches!(m, Marker::Inject)) {
                self.inject(model, info.name, member, report);
            }
            for marker in &member.markers {
                if let Marker::ChangeHandler(handler) = marker {
                    self.subscribe(path, member, *handler, root, subscriptions, report);
                }
            }
        }

        for member in layout_groups(&info.members) {
            if let Some(child) = model.child_mut(member.name) {
                self.wire(child, &path.child(member.name), root, subscriptions, report);
            }
        }
    }

    fn inject(
        &self,
        model: &mut dyn ViewModel,
        type_name: &str,
        member: &MemberInfo,
        report: &mut InstantiateReport,
    ) {
        if model.has_dependency(member.name) {
            return;
        }
        let Some(ValueType::Service(service)) = member.value_type() else {
            tracing::warn!(
                type_name,
                member = member.name,
                "inject marker on non-service property"
            );
            return;
        };
        let service = service();
        match self.dependencies.iter().find(|d| d.is(service)) {
            Some(dependency) if model.inject(member.name, dependency) => {
                report.injected += 1;
            }
            Some(_) => {
                tracing::warn!(type_name, member = member.name, "view model refused dependency");
            }
            None => {
                tracing::debug!(
                    type_name,
                    member = member.name,
                    service = service.name,
                    "no dependency of the requested type"
                );
                report.diagnostics.push(Diagnostic::MissingCollaborator {
                    member: format!("{type_name}.{}", member.name),
                    what: format!("dependency {}", service.name),
                });
            }
        }
    }

    fn subscribe(
        &self,
        path: &MemberPath,
        member: &MemberInfo,
        handler: ChangeHandlerMarker,
        root: &Weak<ViewRoot>,
        subscriptions: &mut Subscriptions,
        report: &mut InstantiateReport,
    ) {
        let senders = self.dependencies.iter().filter(|d| d.is(handler.sender));
        for dependency in senders {
            let Some(notifier) = dependency.notifier(handler.kind) else {
                tracing::warn!(
                    sender = handler.sender.name,
                    handler = %path.child(member.name),
                    "dependency cannot raise the handled notification"
                );
                report.diagnostics.push(Diagnostic::UnsupportedSender {
                    sender: handler.sender.name,
                    handler: path.child(member.name).to_string(),
                });
                continue;
            };

            let root = Weak::clone(root);
            let owner = path.clone();
            let method = member.name;
            let id = notifier.subscribe(move |change| {
                if let Some(root) = root.upgrade() {
                    let member = change.member.clone().unwrap_or_default();
                    root.post(PendingCall {
                        path: owner.clone(),
                        method: method.to_owned(),
                        args: vec![Value::Text(member)],
                    });
                }
            });
            subscriptions.track(notifier, id);
            report.subscribed += 1;
        }
    }
}

fn layout_groups(members: &[MemberInfo]) -> impl Iterator<Item = &MemberInfo> {
    members
        .iter()
        .filter(|m| m.has_marker(|marker| matches!(marker, Marker::LayoutGroup(_))))
}

/// Constructs null layout-group sub-objects, depth-first.
fn fill(
    model: &mut dyn ViewModel,
    visiting: &mut Vec<&'static str>,
    report: &mut InstantiateReport,
) {
    let info = model.type_info();
    if visiting.contains(&info.name) {
        return;
    }
    visiting.push(info.name);

    for member in layout_groups(&info.members) {
        let Some(ValueType::Model(model_type)) = member.value_type() else {
            continue;
        };
        if model.child(member.name).is_none() {
            let model_type = model_type();
            match model_type.construct {
                Some(construct) if model.attach_child(member.name, construct()) => {
                    report.created += 1;
                }
                Some(_) => {
                    tracing::warn!(
                        type_name = info.name,
                        member = member.name,
                        "sub-object not attached"
                    );
                }
                None => {
                    tracing::warn!(
                        type_name = info.name,
                        member = member.name,
                        model_type = model_type.name,
                        "layout group type has no default constructor"
                    );
                }
            }
        }
        if let Some(child) = model.child_mut(member.name) {
            fill(child, visiting, report);
        }
    }

    visiting.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{LayoutGroupMarker, TypeInfo};
    use once_cell::sync::Lazy;

    static OUTER: Lazy<TypeInfo> = Lazy::new(|| {
        TypeInfo::new("Outer").member(
            MemberInfo::property("inner", ValueType::Model(inner_info))
                .with(LayoutGroupMarker::vertical()),
        )
    });
    static INNER: Lazy<TypeInfo> = Lazy::new(|| {
        TypeInfo::new("Inner")
            .constructible::<Inner>()
            .member(
                MemberInfo::property("leaf", ValueType::Model(leaf_info))
                    .with(LayoutGroupMarker::horizontal()),
            )
    });
    static LEAF: Lazy<TypeInfo> = Lazy::new(|| TypeInfo::new("Leaf").constructible::<Leaf>());

    fn inner_info() -> &'static TypeInfo {
        &INNER
    }

    fn leaf_info() -> &'static TypeInfo {
        &LEAF
    }

    #[derive(Default)]
    struct Outer {
        inner: Option<Box<dyn ViewModel>>,
    }

    #[derive(Default)]
    struct Inner {
        leaf: Option<Box<dyn ViewModel>>,
    }

    #[derive(Default)]
    struct Leaf;

    macro_rules! slot_model {
        ($ty:ident, $info:expr, $slot:ident) => {
            impl ViewModel for $ty {
                fn type_info(&self) -> &'static crate::metadata::TypeInfo {
                    $info
                }

                fn child(&self, member: &str) -> Option<&dyn ViewModel> {
                    (member == stringify!($slot)).then_some(())?;
                    self.$slot.as_deref()
                }

                fn child_mut(&mut self, member: &str) -> Option<&mut dyn ViewModel> {
                    (member == stringify!($slot)).then_some(())?;
                    match &mut self.$slot {
                        Some(child) => Some(&mut **child),
                        None => None,
                    }
                }

                fn attach_child(&mut self, member: &str, child: Box<dyn ViewModel>) -> bool {
                    if member != stringify!($slot) {
                        return false;
                    }
                    self.$slot = Some(child);
                    true
                }
            }
        };
    }

    slot_model!(Outer, &OUTER, inner);
    slot_model!(Inner, &INNER, leaf);

    impl ViewModel for Leaf {
        fn type_info(&self) -> &'static TypeInfo {
            &LEAF
        }
    }

    #[test]
    fn test_fill_is_deep() {
        let root = ViewRoot::new(Box::new(Outer::default()));
        let result = Instantiator::new(&[]).instantiate(&root);

        assert_eq!(result.report.created, 2);
        root.with(|m| {
            let leaf = MemberPath::from(vec!["inner", "leaf"]).resolve(m).unwrap();
            assert_eq!(leaf.type_info().name, "Leaf");
        });
    }

    #[test]
    fn test_existing_children_are_kept() {
        let root = ViewRoot::new(Box::new(Outer {
            inner: Some(Box::new(Inner::default())),
        }));
        let result = Instantiator::new(&[]).instantiate(&root);
        assert_eq!(result.report.created, 1);
    }
}
