//! Widget system for UI components.
//!
//! Widgets are plain data nodes. Behaviour comes from the bindings AutoUI
//! attaches to them.

mod core;
mod tree;

pub use core::{ControlPath, ControlType, WidgetFlags, WidgetId, WidgetNode, WidgetProperty};
pub use tree::WidgetTree;
