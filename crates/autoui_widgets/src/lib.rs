//! # AutoUI Widgets
//!
//! Retained widget tree that AutoUI compiles view models into:
//! - Id-addressed nodes with a property bag
//! - Sibling-index control paths for locating nodes
//! - Horizontal / vertical panel layouts with sizing descriptors
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                    WIDGET PIPELINE                      │
//! ├────────────────────────────────────────────────────────┤
//! │  Prefab → WidgetNode → WidgetTree → Reflow → Host draw │
//! │              ↓             ↓           ↓               │
//! │          Properties   ControlPath   PanelLayout        │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering and input are the host's business. This crate only holds
//! structure, state and geometry.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod layout;
pub mod style;
pub mod value;
pub mod widget;

pub use layout::{Alignment, Direction, Padding, PanelLayout, Rect, Sizing};
pub use style::{Color, StyleHint, TextAlignment};
pub use value::{ImageHandle, Value};
pub use widget::{
    ControlPath, ControlType, WidgetFlags, WidgetId, WidgetNode, WidgetProperty, WidgetTree,
};
