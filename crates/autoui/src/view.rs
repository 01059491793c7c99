//! A built, instantiated and bound view.

use std::collections::HashMap;
use std::sync::Arc;

use autoui_widgets::{Value, WidgetId, WidgetProperty, WidgetTree};

use crate::binder::{BindReport, BoundView};
use crate::binding::BindingSet;
use crate::dependency::Subscriptions;
use crate::error::{AutoUiError, AutoUiResult};
use crate::instantiate::{InstantiateReport, Instantiation};
use crate::model::{self, RowPath, ViewRoot};
use crate::template::{row_label, RealizedRow, TemplateLibrary};

/// Everything produced by one Build → Instantiate → Bind cycle.
///
/// Dropping the view releases its change-handler subscriptions.
#[derive(Debug)]
pub struct View {
    /// Wrapper panel of the generated widgets.
    pub root: WidgetId,
    /// Live bindings.
    pub bindings: BindingSet,
    /// Item templates of hierarchical lists.
    pub templates: TemplateLibrary,
    /// Build and bind problems.
    pub bind_report: BindReport,
    /// Instantiation counts and problems.
    pub instantiate_report: InstantiateReport,
    subscriptions: Subscriptions,
    realized: HashMap<WidgetId, Vec<WidgetId>>,
}

impl View {
    pub(crate) fn assemble(bound: BoundView, instantiation: Instantiation) -> Self {
        Self {
            root: bound.root,
            bindings: bound.bindings,
            templates: bound.templates,
            bind_report: bound.report,
            instantiate_report: instantiation.report,
            subscriptions: instantiation.subscriptions,
            realized: HashMap::new(),
        }
    }

    /// Change-handler subscriptions held by the view.
    #[must_use]
    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    /// Re-evaluates every binding against the current model state.
    pub fn refresh(&self, tree: &mut WidgetTree, root: &Arc<ViewRoot>) {
        root.with(|model| self.bindings.refresh(tree, model));
    }

    /// Routes a click on `widget` to its action, then refreshes.
    ///
    /// # Errors
    ///
    /// See [`BindingSet::dispatch`].
    pub fn dispatch(
        &self,
        tree: &mut WidgetTree,
        widget: WidgetId,
        root: &Arc<ViewRoot>,
    ) -> AutoUiResult<bool> {
        let ran = root.with(|model| self.bindings.dispatch(tree, widget, model))?;
        self.refresh(tree, root);
        Ok(ran)
    }

    /// Writes a widget edit back into the model, then refreshes.
    ///
    /// # Errors
    ///
    /// See [`BindingSet::commit`].
    pub fn commit(
        &self,
        tree: &mut WidgetTree,
        widget: WidgetId,
        property: WidgetProperty,
        value: Value,
        root: &Arc<ViewRoot>,
    ) -> AutoUiResult<()> {
        root.with(|model| self.bindings.commit(tree, widget, property, value, model))?;
        self.refresh(tree, root);
        Ok(())
    }

    /// Realizes one row per item of a hierarchical list, parents first.
    ///
    /// Rows realized by an earlier call for the same list are removed from
    /// the tree first.
    ///
    /// # Errors
    ///
    /// Returns [`AutoUiError::NotBound`] if `list` is not a hierarchical list,
    /// or [`AutoUiError::Unresolved`] if its collection cannot be reached.
    pub fn realize_rows(
        &mut self,
        tree: &mut WidgetTree,
        list: WidgetId,
        root: &Arc<ViewRoot>,
    ) -> AutoUiResult<Vec<(RowPath, RealizedRow)>> {
        let not_bound = || AutoUiError::NotBound {
            widget: list,
            expected: "hierarchical list",
        };
        let binding = self.bindings.binding_for(list).ok_or_else(not_bound)?;
        let template = binding
            .template
            .and_then(|name| self.templates.get(name))
            .ok_or_else(not_bound)?;
        let key = &binding.primary.key;
        let unresolved = || AutoUiError::Unresolved {
            key: key.to_string(),
        };

        if let Some(stale) = self.realized.remove(&list) {
            tracing::trace!(rows = stale.len(), "removing realized rows");
            for row in stale {
                tree.remove(row);
            }
        }

        let mut rows = Vec::new();
        let result = root.with(|vm| {
            let items = key
                .path
                .resolve(vm)
                .and_then(|owner| owner.items(&key.member))
                .ok_or_else(unresolved)?;
            for path in model::flatten(items) {
                let item = model::row(items, &path).ok_or_else(unresolved)?;
                let row = template.realize(tree, list, item)?;
                tracing::trace!(row = %row_label(&key.path, &key.member, &path), "row realized");
                rows.push((path, row));
            }
            Ok::<_, AutoUiError>(())
        });
        self.realized
            .insert(list, rows.iter().map(|(_, row)| row.root).collect());
        result.map(|()| rows)
    }

    /// Releases the subscriptions and drops the view.
    pub fn release(self) {
        self.subscriptions.release();
    }
}
