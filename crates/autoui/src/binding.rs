//! Live bindings between widgets and view-model members.
//!
//! One [`Binding`] exists per bound registration record. Its primary target
//! carries the member itself; companion targets carry the interactable,
//! visibility and selection properties named by the marker.

use std::collections::HashMap;
use std::fmt;

use autoui_widgets::{ControlPath, Value, WidgetId, WidgetProperty, WidgetTree};

use crate::error::{AutoUiError, AutoUiResult};
use crate::model::{MemberPath, ViewModel};

/// What a binding target does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Widget interaction invokes a method.
    Action,
    /// Member value flows into a widget property.
    OneWayProperty,
    /// Member value and widget property are kept in sync.
    TwoWayProperty,
    /// Member value drives the widget's visibility.
    IsActive,
    /// Custom bind hook.
    Procedural,
}

/// Fully qualified member reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    /// Sub-view-model path from the scope root.
    pub path: MemberPath,
    /// Declaring type.
    pub type_name: &'static str,
    /// Member name.
    pub member: String,
}

impl BindingKey {
    /// Same owner, different member.
    #[must_use]
    pub fn sibling(&self, member: impl Into<String>) -> Self {
        Self {
            path: self.path.clone(),
            type_name: self.type_name,
            member: member.into(),
        }
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.member)
    }
}

/// One binding edge.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingTarget {
    /// Edge kind.
    pub kind: BindingKind,
    /// Member on the view-model side.
    pub key: BindingKey,
    /// Property on the widget side.
    pub property: Option<WidgetProperty>,
    /// Negate boolean values.
    pub invert: bool,
}

impl BindingTarget {
    /// Target without a widget property or inversion.
    #[must_use]
    pub fn new(kind: BindingKind, key: BindingKey) -> Self {
        Self {
            kind,
            key,
            property: None,
            invert: false,
        }
    }

    /// Sets the widget property.
    #[must_use]
    pub fn to_property(mut self, property: WidgetProperty) -> Self {
        self.property = Some(property);
        self
    }

    /// Sets inversion.
    #[must_use]
    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }
}

/// The binding of one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Bound widget.
    pub widget: WidgetId,
    /// Widget location below the build root.
    pub control_path: ControlPath,
    /// Panel owning the binding scope.
    pub scope: WidgetId,
    /// The member binding.
    pub primary: BindingTarget,
    /// Companion bindings.
    pub companions: Vec<BindingTarget>,
    /// Item type of a hierarchical list's template.
    pub template: Option<&'static str>,
}

impl Binding {
    /// Primary followed by companions.
    pub fn targets(&self) -> impl Iterator<Item = &BindingTarget> {
        std::iter::once(&self.primary).chain(&self.companions)
    }
}

/// A panel owning one binding scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateScope {
    /// The panel.
    pub panel: WidgetId,
    /// Sub-view-model the scope binds against.
    pub path: MemberPath,
    /// Child bindings have been initialized.
    pub initialized: bool,
}

/// All bindings produced by one bind pass.
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
    bindings: Vec<Binding>,
    scopes: Vec<TemplateScope>,
    by_widget: HashMap<WidgetId, usize>,
}

impl BindingSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding.
    pub fn push(&mut self, binding: Binding) {
        self.by_widget.insert(binding.widget, self.bindings.len());
        self.bindings.push(binding);
    }

    /// Opens a scope for `panel` unless it already has one.
    ///
    /// Returns true if the scope is new.
    pub fn open_scope(&mut self, panel: WidgetId, path: &MemberPath) -> bool {
        if self.scope(panel).is_some() {
            return false;
        }
        self.scopes.push(TemplateScope {
            panel,
            path: path.clone(),
            initialized: false,
        });
        true
    }

    /// Scope owned by `panel`.
    #[must_use]
    pub fn scope(&self, panel: WidgetId) -> Option<&TemplateScope> {
        self.scopes.iter().find(|s| s.panel == panel)
    }

    /// Scopes in the order they were opened.
    #[must_use]
    pub fn scopes(&self) -> &[TemplateScope] {
        &self.scopes
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if there are no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All bindings in record order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Binding of `widget`.
    #[must_use]
    pub fn binding_for(&self, widget: WidgetId) -> Option<&Binding> {
        self.by_widget.get(&widget).map(|&i| &self.bindings[i])
    }

    /// Sets the scope's data context and evaluates its bindings.
    ///
    /// Returns false if the scope's view model cannot be reached from `root`.
    pub fn initialize_scope(
        &mut self,
        tree: &mut WidgetTree,
        panel: WidgetId,
        root: &dyn ViewModel,
    ) -> bool {
        let Some(index) = self.scopes.iter().position(|s| s.panel == panel) else {
            return false;
        };
        let Some(model) = self.scopes[index].path.resolve(root) else {
            return false;
        };

        if let Some(node) = tree.get_mut(panel) {
            node.data_context = Some(context_name(&self.scopes[index].path, model));
        }
        self.scopes[index].initialized = true;
        for binding in self.bindings.iter().filter(|b| b.scope == panel) {
            evaluate(tree, binding, root);
        }
        true
    }

    /// Initializes every scope that is not initialized yet.
    ///
    /// Returns the number of scopes initialized.
    pub fn initialize_all(&mut self, tree: &mut WidgetTree, root: &dyn ViewModel) -> usize {
        let pending: Vec<WidgetId> = self
            .scopes
            .iter()
            .filter(|s| !s.initialized)
            .map(|s| s.panel)
            .collect();
        pending
            .into_iter()
            .filter(|&panel| self.initialize_scope(tree, panel, root))
            .count()
    }

    /// Re-evaluates the bindings of initialized scopes.
    pub fn refresh(&self, tree: &mut WidgetTree, root: &dyn ViewModel) {
        for binding in &self.bindings {
            if self.scope(binding.scope).is_some_and(|s| s.initialized) {
                evaluate(tree, binding, root);
            }
        }
    }

    /// Runs the action bound to `widget`.
    ///
    /// Returns false if the widget is not interactable.
    ///
    /// # Errors
    ///
    /// Returns [`AutoUiError::NotBound`] if the widget has no action
    /// binding, or [`AutoUiError::Unresolved`] if the method cannot be
    /// reached.
    pub fn dispatch(
        &self,
        tree: &WidgetTree,
        widget: WidgetId,
        root: &mut dyn ViewModel,
    ) -> AutoUiResult<bool> {
        let binding = self
            .binding_for(widget)
            .filter(|b| b.primary.kind == BindingKind::Action)
            .ok_or(AutoUiError::NotBound {
                widget,
                expected: "action",
            })?;

        if !tree.get(widget).is_some_and(|n| n.is_interactable()) {
            tracing::debug!(
                %widget,
                key = %binding.primary.key,
                "ignored event on non-interactable widget"
            );
            return Ok(false);
        }

        let key = &binding.primary.key;
        let invoked = key
            .path
            .resolve_mut(root)
            .is_some_and(|owner| owner.invoke(&key.member, &[]));
        if !invoked {
            return Err(AutoUiError::Unresolved {
                key: key.to_string(),
            });
        }
        tracing::debug!(%widget, %key, "dispatched action");
        Ok(true)
    }

    /// Pushes a widget-side edit into the bound member.
    ///
    /// # Errors
    ///
    /// Returns [`AutoUiError::NotBound`] if no two-way target of the widget
    /// uses `property`, or [`AutoUiError::Unresolved`] if the member rejects
    /// the value.
    pub fn commit(
        &self,
        tree: &mut WidgetTree,
        widget: WidgetId,
        property: WidgetProperty,
        value: Value,
        root: &mut dyn ViewModel,
    ) -> AutoUiResult<()> {
        let target = self
            .binding_for(widget)
            .and_then(|b| {
                b.targets().find(|t| {
                    t.kind == BindingKind::TwoWayProperty && t.property == Some(property)
                })
            })
            .ok_or(AutoUiError::NotBound {
                widget,
                expected: "two-way",
            })?;

        let written = target
            .key
            .path
            .resolve_mut(root)
            .is_some_and(|owner| owner.set(&target.key.member, value.clone()));
        if !written {
            return Err(AutoUiError::Unresolved {
                key: target.key.to_string(),
            });
        }
        if let Some(node) = tree.get_mut(widget) {
            node.set_property(property, value);
        }
        self.refresh(tree, root);
        Ok(())
    }
}

fn context_name(path: &MemberPath, model: &dyn ViewModel) -> String {
    if path.is_empty() {
        model.type_info().name.to_owned()
    } else {
        format!("{}:{}", model.type_info().name, path)
    }
}

/// Writes the current member values of one binding onto its widget.
fn evaluate(tree: &mut WidgetTree, binding: &Binding, root: &dyn ViewModel) {
    let Some(model) = binding.primary.key.path.resolve(root) else {
        tracing::trace!(key = %binding.primary.key, "binding target unreachable");
        return;
    };
    let Some(node) = tree.get_mut(binding.widget) else {
        return;
    };

    for target in binding.targets() {
        let value = match target.kind {
            BindingKind::Action | BindingKind::Procedural => continue,
            BindingKind::OneWayProperty if target.property == Some(WidgetProperty::Items) => {
                row_count(model, &target.key.member)
            }
            BindingKind::OneWayProperty | BindingKind::TwoWayProperty => {
                model.get(&target.key.member)
            }
            BindingKind::IsActive => model.get(&target.key.member),
        };
        let value = if target.invert {
            Value::Bool(!value.as_bool().unwrap_or(false))
        } else {
            value
        };
        if let Some(property) = target.property {
            node.set_property(property, value);
        }
    }
}

fn row_count(model: &dyn ViewModel, member: &str) -> Value {
    let rows = model
        .items(member)
        .map_or(0, |items| crate::model::flatten(items).len());
    Value::Int(i64::try_from(rows).unwrap_or(i64::MAX))
}
