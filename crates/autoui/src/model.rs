//! Live view-model access.
//!
//! The builder only needs [`TypeInfo`] tables. Binding and instantiation
//! need the instance, reached through the dynamic [`ViewModel`] accessors.
//! Every accessor has a "not supported" default so a type only implements
//! what its table declares.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use autoui_widgets::{Value, WidgetNode};
use parking_lot::Mutex;

use crate::dependency::Dependency;
use crate::metadata::TypeInfo;

/// Dynamic access to a view-model instance.
pub trait ViewModel: Send {
    /// Static metadata of the concrete type.
    fn type_info(&self) -> &'static TypeInfo;

    /// Reads a property.
    fn get(&self, _member: &str) -> Value {
        Value::Null
    }

    /// Writes a property. Returns false if the member is unknown or read-only.
    fn set(&mut self, _member: &str, _value: Value) -> bool {
        false
    }

    /// Nested view model stored in a property, if present.
    fn child(&self, _member: &str) -> Option<&dyn ViewModel> {
        None
    }

    /// Mutable nested view model.
    fn child_mut(&mut self, _member: &str) -> Option<&mut dyn ViewModel> {
        None
    }

    /// Stores a freshly constructed sub-view-model.
    fn attach_child(&mut self, _member: &str, _child: Box<dyn ViewModel>) -> bool {
        false
    }

    /// Returns true if an injectable property already holds a dependency.
    fn has_dependency(&self, _member: &str) -> bool {
        false
    }

    /// Fills an injectable property.
    fn inject(&mut self, _member: &str, _dependency: &Dependency) -> bool {
        false
    }

    /// Calls a method. Returns false if the method is unknown.
    fn invoke(&mut self, _method: &str, _args: &[Value]) -> bool {
        false
    }

    /// Custom bind hook of a procedural member.
    fn bind_widget(&mut self, _method: &str, _widget: &mut WidgetNode) -> bool {
        false
    }

    /// Items of a collection property.
    fn items(&self, _member: &str) -> Option<&dyn ItemSource> {
        None
    }
}

/// Rows behind a list or tree widget.
pub trait ItemSource {
    /// Number of top-level items.
    fn len(&self) -> usize;

    /// Returns true if there are no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at `index`.
    fn item(&self, index: usize) -> Option<&dyn ViewModel>;

    /// Child items of a hierarchical item.
    fn children(&self, _index: usize) -> Option<&dyn ItemSource> {
        None
    }
}

impl<T: ViewModel> ItemSource for Vec<T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn item(&self, index: usize) -> Option<&dyn ViewModel> {
        self.get(index).map(|item| item as &dyn ViewModel)
    }
}

/// Index chain of one row in a (possibly hierarchical) item source.
pub type RowPath = Vec<usize>;

/// Every row of `source`, parents before their children.
#[must_use]
pub fn flatten(source: &dyn ItemSource) -> Vec<RowPath> {
    let mut rows = Vec::new();
    collect_rows(source, &mut Vec::new(), &mut rows);
    rows
}

fn collect_rows(source: &dyn ItemSource, prefix: &mut RowPath, rows: &mut Vec<RowPath>) {
    for index in 0..source.len() {
        prefix.push(index);
        rows.push(prefix.clone());
        if let Some(children) = source.children(index) {
            collect_rows(children, prefix, rows);
        }
        prefix.pop();
    }
}

/// Row addressed by `path`.
#[must_use]
pub fn row<'a>(source: &'a dyn ItemSource, path: &[usize]) -> Option<&'a dyn ViewModel> {
    let (&last, parents) = path.split_last()?;
    let mut current = source;
    for &index in parents {
        current = current.children(index)?;
    }
    current.item(last)
}

/// Member chain from the root view model to a nested sub-view-model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MemberPath(Vec<&'static str>);

impl MemberPath {
    /// Path of the root itself.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Path extended by one member.
    #[must_use]
    pub fn child(&self, member: &'static str) -> Self {
        let mut members = self.0.clone();
        members.push(member);
        Self(members)
    }

    /// The members, outermost first.
    #[must_use]
    pub fn members(&self) -> &[&'static str] {
        &self.0
    }

    /// Number of layout-group boundaries crossed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Walks the path from `root`.
    #[must_use]
    pub fn resolve<'a>(&self, root: &'a dyn ViewModel) -> Option<&'a dyn ViewModel> {
        let mut current = root;
        for member in &self.0 {
            current = current.child(member)?;
        }
        Some(current)
    }

    /// Walks the path from `root`, mutably.
    pub fn resolve_mut<'a>(&self, root: &'a mut dyn ViewModel) -> Option<&'a mut dyn ViewModel> {
        let mut current = root;
        for member in &self.0 {
            current = current.child_mut(member)?;
        }
        Some(current)
    }
}

impl From<Vec<&'static str>> for MemberPath {
    fn from(members: Vec<&'static str>) -> Self {
        Self(members)
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// A method call waiting for the root model to become free.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCall {
    /// Owner of the method.
    pub path: MemberPath,
    /// Method name.
    pub method: String,
    /// Arguments.
    pub args: Vec<Value>,
}

/// Shared cell around the root view model.
///
/// Notifications raised while the model is locked (for example from inside
/// a handler) are queued and run by the lock holder once it is done.
pub struct ViewRoot {
    model: Mutex<Box<dyn ViewModel>>,
    inbox: Mutex<VecDeque<PendingCall>>,
}

impl ViewRoot {
    /// Wraps a root view model.
    #[must_use]
    pub fn new(model: Box<dyn ViewModel>) -> Arc<Self> {
        Arc::new(Self {
            model: Mutex::new(model),
            inbox: Mutex::new(VecDeque::new()),
        })
    }

    /// Static metadata of the root.
    #[must_use]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.model.lock().type_info()
    }

    /// Runs `f` against the root, then drains queued calls.
    ///
    /// Must not be called from inside a view-model method; use [`ViewRoot::post`].
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn ViewModel) -> R) -> R {
        let result = {
            let mut model = self.model.lock();
            f(&mut **model)
        };
        self.pump();
        result
    }

    /// Queues a call and runs it as soon as the root is free.
    pub fn post(&self, call: PendingCall) {
        self.inbox.lock().push_back(call);
        self.pump();
    }

    /// Number of calls waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inbox.lock().len()
    }

    fn pump(&self) {
        loop {
            let Some(mut model) = self.model.try_lock() else {
                return;
            };
            let Some(call) = self.inbox.lock().pop_front() else {
                return;
            };
            let invoked = call
                .path
                .resolve_mut(&mut **model)
                .is_some_and(|owner| owner.invoke(&call.method, &call.args));
            if !invoked {
                tracing::warn!(path = %call.path, method = %call.method, "queued call dropped");
            }
        }
    }
}

impl fmt::Debug for ViewRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRoot")
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}
