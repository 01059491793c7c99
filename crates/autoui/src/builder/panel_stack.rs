//! Current insertion panel.

use autoui_widgets::WidgetId;

/// Stack of open panels, innermost last.
///
/// Pushes mirror nested layout groups one to one.
#[derive(Debug, Default, Clone)]
pub struct LayoutPanelStack {
    panels: Vec<WidgetId>,
}

impl LayoutPanelStack {
    /// Empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a panel.
    pub fn push(&mut self, panel: WidgetId) {
        self.panels.push(panel);
    }

    /// Closes the innermost panel.
    pub fn pop(&mut self) -> Option<WidgetId> {
        self.panels.pop()
    }

    /// Innermost open panel.
    #[must_use]
    pub fn current(&self) -> Option<WidgetId> {
        self.panels.last().copied()
    }

    /// Number of open panels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.panels.len()
    }

    /// Closes every panel.
    pub fn clear(&mut self) {
        self.panels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut stack = LayoutPanelStack::new();
        stack.push(WidgetId::new(1));
        stack.push(WidgetId::new(2));
        assert_eq!(stack.current(), Some(WidgetId::new(2)));
        assert_eq!(stack.pop(), Some(WidgetId::new(2)));
        assert_eq!(stack.depth(), 1);
        stack.clear();
        assert_eq!(stack.current(), None);
    }
}
