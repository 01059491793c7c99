//! # Modal Dialogs
//!
//! A dialog is a view model whose methods (at any depth) carry
//! accept/cancel/alternate markers:
//!
//! ```text
//! scan type graph ──► callbacks per role ──► WindowManager shell
//!                                                │
//!                        Build → Instantiate → Bind into shell content
//! ```
//!
//! Each role with at least one callback gets one button. Pressing it runs
//! every callback of the role in declaration order.

use std::collections::BTreeMap;
use std::sync::Arc;

use autoui_widgets::{
    ControlType, PanelLayout, Value, WidgetId, WidgetNode, WidgetProperty, WidgetTree,
};

use crate::metadata::{DialogRole, Marker, TypeInfo, ValueType};
use crate::model::{MemberPath, ViewRoot};
use crate::view::View;

/// One dialog callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogCallback {
    /// Owner of the method.
    pub path: MemberPath,
    /// Method name.
    pub method: &'static str,
    /// Caption declared on the marker.
    pub caption: Option<String>,
}

/// Callbacks grouped by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogCallbacks {
    by_role: BTreeMap<u8, Vec<DialogCallback>>,
}

const fn role_key(role: DialogRole) -> u8 {
    match role {
        DialogRole::Accept => 0,
        DialogRole::Cancel => 1,
        DialogRole::Alternate => 2,
    }
}

impl DialogCallbacks {
    /// Callbacks of `role` in declaration order.
    #[must_use]
    pub fn get(&self, role: DialogRole) -> &[DialogCallback] {
        self.by_role.get(&role_key(role)).map_or(&[], Vec::as_slice)
    }

    /// Composite caption: first declared caption, else the role default.
    #[must_use]
    pub fn caption(&self, role: DialogRole) -> String {
        self.get(role)
            .iter()
            .find_map(|cb| cb.caption.clone())
            .unwrap_or_else(|| role.default_caption().to_owned())
    }

    /// Roles with at least one callback, in button order.
    #[must_use]
    pub fn roles(&self) -> Vec<DialogRole> {
        DialogRole::ALL
            .into_iter()
            .filter(|&role| !self.get(role).is_empty())
            .collect()
    }

    /// Total number of callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_role.values().map(Vec::len).sum()
    }

    /// Returns true if no callback was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, role: DialogRole, callback: DialogCallback) {
        self.by_role.entry(role_key(role)).or_default().push(callback);
    }
}

/// Finds dialog callbacks in a view-model type graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogAssembler;

impl DialogAssembler {
    /// Scans `info` and every view-model-typed property below it.
    #[must_use]
    pub fn scan(info: &'static TypeInfo) -> DialogCallbacks {
        let mut callbacks = DialogCallbacks::default();
        scan_type(info, &MemberPath::root(), &mut Vec::new(), &mut callbacks);
        callbacks
    }
}

fn scan_type(
    info: &'static TypeInfo,
    path: &MemberPath,
    visiting: &mut Vec<&'static str>,
    callbacks: &mut DialogCallbacks,
) {
    if visiting.contains(&info.name) {
        return;
    }
    visiting.push(info.name);

    for member in &info.members {
        for marker in &member.markers {
            if let Marker::Dialog(dialog) = marker {
                callbacks.push(
                    dialog.role,
                    DialogCallback {
                        path: path.clone(),
                        method: member.name,
                        caption: dialog.caption.clone(),
                    },
                );
            }
        }
        if let Some(ValueType::Model(model)) = member.value_type() {
            scan_type(model(), &path.child(member.name), visiting, callbacks);
        }
    }

    visiting.pop();
}

/// What the window manager is asked to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    /// Window title.
    pub title: String,
    /// Buttons in display order.
    pub buttons: Vec<(DialogRole, String)>,
}

/// A modal window created by a window manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogShell {
    /// Window widget.
    pub window: WidgetId,
    /// Panel receiving the generated view.
    pub content: WidgetId,
    /// Button widget per role.
    pub buttons: Vec<(DialogRole, WidgetId)>,
}

/// Creates modal window shells.
pub trait WindowManager {
    /// Creates a window with a content region and one button per request entry.
    fn create_dialog_window(
        &mut self,
        tree: &mut WidgetTree,
        request: &DialogRequest,
    ) -> DialogShell;
}

/// Window manager building shells inside the widget tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultWindowManager {
    /// Number of windows created.
    pub opened: usize,
}

impl WindowManager for DefaultWindowManager {
    fn create_dialog_window(
        &mut self,
        tree: &mut WidgetTree,
        request: &DialogRequest,
    ) -> DialogShell {
        let mut window = WidgetNode::new(ControlType::Window).named(request.title.as_str());
        window.layout = Some(PanelLayout::vertical());
        window.set_property(WidgetProperty::Caption, Value::from(request.title.as_str()));
        let window = tree.add_root(window);

        let mut content = WidgetNode::new(ControlType::Panel).named("content");
        content.layout = Some(PanelLayout::vertical());
        let content = tree.add_child(window, content);

        let mut row = WidgetNode::new(ControlType::Panel).named("buttons");
        row.layout = Some(PanelLayout::horizontal().with_spacing(8.0));
        let row = tree.add_child(window, row);

        let buttons = request
            .buttons
            .iter()
            .map(|(role, caption)| {
                let mut button = WidgetNode::new(ControlType::Button).named(caption.as_str());
                button.set_property(WidgetProperty::Caption, Value::from(caption.as_str()));
                (*role, tree.add_child(row, button))
            })
            .collect();

        self.opened += 1;
        DialogShell {
            window,
            content,
            buttons,
        }
    }
}

/// An open dialog.
#[derive(Debug)]
pub struct Dialog {
    /// Window shell.
    pub shell: DialogShell,
    /// Generated content view.
    pub view: View,
    /// Callbacks per role.
    pub callbacks: DialogCallbacks,
}

impl Dialog {
    /// Runs every callback of `role`. Returns the number that ran.
    pub fn press(&self, role: DialogRole, root: &Arc<ViewRoot>) -> usize {
        let callbacks = self.callbacks.get(role);
        let ran = root.with(|model| {
            let mut ran = 0;
            for cb in callbacks {
                let invoked = cb
                    .path
                    .resolve_mut(&mut *model)
                    .is_some_and(|owner| owner.invoke(cb.method, &[]));
                if invoked {
                    ran += 1;
                } else {
                    tracing::warn!(
                        path = %cb.path,
                        method = cb.method,
                        "dialog callback unresolved"
                    );
                }
            }
            ran
        });
        tracing::debug!(?role, ran, "dialog button pressed");
        ran
    }

    /// Handles a click on one of the shell's buttons.
    ///
    /// Returns `None` if `widget` is not a dialog button.
    pub fn click(&self, widget: WidgetId, root: &Arc<ViewRoot>) -> Option<usize> {
        let role = self
            .shell
            .buttons
            .iter()
            .find_map(|&(role, id)| (id == widget).then_some(role))?;
        Some(self.press(role, root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{DialogMarker, MemberInfo};
    use once_cell::sync::Lazy;

    static CONFIRM: Lazy<TypeInfo> = Lazy::new(|| {
        TypeInfo::new("Confirm")
            .member(MemberInfo::method("ok").with(DialogMarker::accept().caption("Delete")))
            .member(MemberInfo::method("close").with(DialogMarker::cancel()))
            .member(MemberInfo::property("extra", ValueType::Model(extra)))
            .member(MemberInfo::property("again", ValueType::Model(confirm)))
    });
    static EXTRA: Lazy<TypeInfo> = Lazy::new(|| {
        TypeInfo::new("Extra")
            .member(MemberInfo::method("log").with(DialogMarker::accept().caption("Ignored")))
    });

    fn confirm() -> &'static TypeInfo {
        &CONFIRM
    }

    fn extra() -> &'static TypeInfo {
        &EXTRA
    }

    #[test]
    fn test_scan_descends_and_groups() {
        let callbacks = DialogAssembler::scan(&CONFIRM);

        assert_eq!(callbacks.len(), 3);
        assert_eq!(callbacks.get(DialogRole::Accept).len(), 2);
        assert_eq!(callbacks.get(DialogRole::Accept)[1].path.to_string(), "extra");
        assert_eq!(callbacks.caption(DialogRole::Accept), "Delete");
        assert_eq!(callbacks.caption(DialogRole::Cancel), "Cancel");
        assert_eq!(callbacks.roles(), vec![DialogRole::Accept, DialogRole::Cancel]);
    }

    #[test]
    fn test_default_window_manager_builds_shell() {
        let mut tree = WidgetTree::new();
        let mut manager = DefaultWindowManager::default();
        let shell = manager.create_dialog_window(
            &mut tree,
            &DialogRequest {
                title: "Confirm".into(),
                buttons: vec![
                    (DialogRole::Accept, "OK".into()),
                    (DialogRole::Cancel, "Cancel".into()),
                ],
            },
        );

        assert_eq!(tree.children(shell.window).len(), 2);
        assert_eq!(shell.buttons.len(), 2);
        assert_eq!(tree.get(shell.buttons[1].1).unwrap().caption(), Some("Cancel"));
        assert_eq!(manager.opened, 1);
    }
}
