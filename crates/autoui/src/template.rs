//! Item templates for virtualized lists.
//!
//! A hierarchical list compiles its item type once into an [`ItemTemplate`]:
//! a hidden widget subtree plus template-mode bindings. Rows are realized by
//! cloning the subtree and binding the clone against one item.
//!
//! ```text
//! TreeView
//! ├── template holder (TEMPLATE flag, never shown)
//! │   └── item wrapper ── K widgets, K records
//! ├── row 0  (clone, bound to item [0])
//! ├── row 1  (clone, bound to item [0, 0])
//! └── ...
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use autoui_widgets::{WidgetFlags, WidgetId, WidgetTree};

use crate::binding::{Binding, BindingSet};
use crate::error::{AutoUiError, AutoUiResult};
use crate::metadata::TypeInfo;
use crate::model::{MemberPath, ViewModel};

/// A compiled item template.
#[derive(Debug)]
pub struct ItemTemplate {
    item_type: &'static TypeInfo,
    holder: WidgetId,
    root: WidgetId,
    record_count: usize,
    bindings: BindingSet,
}

/// One realized row.
#[derive(Debug)]
pub struct RealizedRow {
    /// Root widget of the row.
    pub root: WidgetId,
    /// Bindings of the row, initialized against its item.
    pub bindings: BindingSet,
}

impl ItemTemplate {
    /// Wraps a compiled template subtree.
    #[must_use]
    pub fn new(
        item_type: &'static TypeInfo,
        holder: WidgetId,
        root: WidgetId,
        record_count: usize,
        bindings: BindingSet,
    ) -> Self {
        Self {
            item_type,
            holder,
            root,
            record_count,
            bindings,
        }
    }

    /// Item view-model type.
    #[must_use]
    pub fn item_type(&self) -> &'static TypeInfo {
        self.item_type
    }

    /// Hidden holder attached to the list widget.
    #[must_use]
    pub fn holder(&self) -> WidgetId {
        self.holder
    }

    /// Root of the template subtree.
    #[must_use]
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// Number of registration records the template was compiled from.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Template-mode bindings (uninitialized).
    #[must_use]
    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    /// Clones the template under `parent` and binds the copy to `item`.
    ///
    /// # Errors
    ///
    /// Returns [`AutoUiError::Unresolved`] if the template subtree is gone
    /// from `tree`.
    pub fn realize(
        &self,
        tree: &mut WidgetTree,
        parent: WidgetId,
        item: &dyn ViewModel,
    ) -> AutoUiResult<RealizedRow> {
        let unresolved = || AutoUiError::Unresolved {
            key: format!("template {}", self.item_type.name),
        };
        let root = tree.clone_subtree(self.root, parent).ok_or_else(unresolved)?;

        let copies: Vec<WidgetId> = tree.descendants(root).collect();
        for id in copies {
            if let Some(node) = tree.get_mut(id) {
                node.flags.clear(WidgetFlags::TEMPLATE);
                node.flags.clear(WidgetFlags::SUPPRESSED);
            }
        }

        let mut bindings = BindingSet::new();
        let mut scopes: HashMap<WidgetId, WidgetId> = HashMap::new();
        for scope in self.bindings.scopes() {
            let copy = tree
                .path_from(self.root, scope.panel)
                .and_then(|path| tree.resolve_path(root, &path))
                .ok_or_else(unresolved)?;
            bindings.open_scope(copy, &scope.path);
            scopes.insert(scope.panel, copy);
        }
        for binding in self.bindings.iter() {
            let widget = tree
                .resolve_path(root, &binding.control_path)
                .ok_or_else(unresolved)?;
            let scope = scopes.get(&binding.scope).copied().unwrap_or(root);
            bindings.push(Binding {
                widget,
                scope,
                ..binding.clone()
            });
        }

        let initialized = bindings.initialize_all(tree, item);
        tracing::trace!(
            item_type = self.item_type.name,
            bindings = bindings.len(),
            scopes = initialized,
            "realized row"
        );
        Ok(RealizedRow { root, bindings })
    }
}

/// Item templates compiled during one build, keyed by item type.
#[derive(Debug, Default)]
pub struct TemplateLibrary {
    templates: HashMap<&'static str, Arc<ItemTemplate>>,
    pending: HashSet<&'static str>,
    compilations: usize,
}

impl TemplateLibrary {
    /// Returns true if `item_type` is compiled or being compiled.
    #[must_use]
    pub fn contains(&self, item_type: &str) -> bool {
        self.templates.contains_key(item_type) || self.pending.contains(item_type)
    }

    /// Marks `item_type` as being compiled.
    pub fn begin(&mut self, item_type: &'static str) {
        self.pending.insert(item_type);
    }

    /// Stores a finished template.
    pub fn finish(&mut self, template: ItemTemplate) {
        let name = template.item_type.name;
        self.pending.remove(name);
        self.compilations += 1;
        self.templates.insert(name, Arc::new(template));
    }

    /// Template for `item_type`.
    #[must_use]
    pub fn get(&self, item_type: &str) -> Option<&Arc<ItemTemplate>> {
        self.templates.get(item_type)
    }

    /// Number of compiled templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if no template was compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Number of compilations performed.
    #[must_use]
    pub fn compilations(&self) -> usize {
        self.compilations
    }
}

/// Path from the list's owner to a row item, for logging.
#[must_use]
pub fn row_label(owner: &MemberPath, member: &str, row: &[usize]) -> String {
    let indices: Vec<String> = row.iter().map(ToString::to_string).collect();
    if owner.is_empty() {
        format!("{member}[{}]", indices.join("."))
    } else {
        format!("{owner}.{member}[{}]", indices.join("."))
    }
}
