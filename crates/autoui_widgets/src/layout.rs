//! Layout system for panel positioning.
//!
//! Panels stack their children along one axis. Each child carries a
//! [`Sizing`] descriptor; unset fields hold [`Sizing::UNSET`].

use serde::Deserialize;

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrinks the rectangle by per-side padding.
    #[must_use]
    pub fn inset(&self, padding: Padding) -> Self {
        Self::new(
            self.x + padding.left,
            self.y + padding.top,
            (self.width - padding.left - padding.right).max(0.0),
            (self.height - padding.top - padding.bottom).max(0.0),
        )
    }
}

/// Per-side padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Left padding.
    pub left: f32,
    /// Right padding.
    pub right: f32,
    /// Top padding.
    pub top: f32,
    /// Bottom padding.
    pub bottom: f32,
}

impl Padding {
    /// Same padding on every side.
    #[must_use]
    pub const fn uniform(amount: f32) -> Self {
        Self {
            left: amount,
            right: amount,
            top: amount,
            bottom: amount,
        }
    }
}

/// Sizing descriptor attached to every generated widget.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Sizing {
    /// Minimum width.
    pub min_width: f32,
    /// Minimum height.
    pub min_height: f32,
    /// Preferred width.
    pub preferred_width: f32,
    /// Preferred height.
    pub preferred_height: f32,
    /// Share of leftover width.
    pub flexible_width: f32,
    /// Share of leftover height.
    pub flexible_height: f32,
    /// Excluded from the parent's layout pass.
    pub ignore_layout: bool,
    /// Layout priority.
    pub priority: i32,
}

impl Sizing {
    /// Sentinel for "not specified".
    pub const UNSET: f32 = -1.0;

    /// Descriptor with every size unset.
    pub const NEUTRAL: Self = Self {
        min_width: Self::UNSET,
        min_height: Self::UNSET,
        preferred_width: Self::UNSET,
        preferred_height: Self::UNSET,
        flexible_width: Self::UNSET,
        flexible_height: Self::UNSET,
        ignore_layout: false,
        priority: 1,
    };

    /// Returns true if every size field holds the sentinel.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_unset(&self) -> bool {
        [
            self.min_width,
            self.min_height,
            self.preferred_width,
            self.preferred_height,
            self.flexible_width,
            self.flexible_height,
        ]
        .iter()
        .all(|v| *v == Self::UNSET)
    }

    /// Size the layout pass uses along one axis: preferred, then min, then zero.
    #[must_use]
    pub fn extent(&self, direction: Direction) -> f32 {
        let (preferred, min) = match direction {
            Direction::Horizontal => (self.preferred_width, self.min_width),
            Direction::Vertical => (self.preferred_height, self.min_height),
        };
        if preferred >= 0.0 {
            preferred.max(min)
        } else {
            min.max(0.0)
        }
    }

    fn flex(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Horizontal => self.flexible_width.max(0.0),
            Direction::Vertical => self.flexible_height.max(0.0),
        }
    }
}

impl Default for Sizing {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Horizontal (left to right).
    Horizontal,
    /// Vertical (top to bottom).
    #[default]
    Vertical,
}

impl Direction {
    /// The perpendicular direction.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Layout alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Align to start (left/top).
    #[default]
    Start,
    /// Align to center.
    Center,
    /// Align to end (right/bottom).
    End,
}

/// The single layout component a panel may carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    /// Stacking direction.
    pub direction: Direction,
    /// Alignment of the child block inside the panel.
    pub alignment: Alignment,
    /// Gap between children.
    pub spacing: f32,
    /// Padding around content.
    pub padding: Padding,
    /// Panel drives child widths.
    pub control_child_width: bool,
    /// Panel drives child heights.
    pub control_child_height: bool,
    /// Children grow to fill leftover width.
    pub expand_child_width: bool,
    /// Children grow to fill leftover height.
    pub expand_child_height: bool,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            direction: Direction::Vertical,
            alignment: Alignment::Start,
            spacing: 4.0,
            padding: Padding::default(),
            control_child_width: true,
            control_child_height: true,
            expand_child_width: true,
            expand_child_height: false,
        }
    }
}

impl PanelLayout {
    /// Creates a horizontal layout.
    #[must_use]
    pub fn horizontal() -> Self {
        Self {
            direction: Direction::Horizontal,
            expand_child_width: false,
            expand_child_height: true,
            ..Default::default()
        }
    }

    /// Creates a vertical layout.
    #[must_use]
    pub fn vertical() -> Self {
        Self::default()
    }

    /// Sets the gap between elements.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets padding around content.
    #[must_use]
    pub const fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    fn expands(&self, direction: Direction) -> bool {
        match direction {
            Direction::Horizontal => self.control_child_width && self.expand_child_width,
            Direction::Vertical => self.control_child_height && self.expand_child_height,
        }
    }

    /// Lays out children within the given bounds.
    ///
    /// Returns one rect per child. Children that ignore layout get the full
    /// content rect.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn arrange(&self, bounds: Rect, children: &[Sizing]) -> Vec<Rect> {
        let content = bounds.inset(self.padding);
        let main = self.direction;
        let cross = main.cross();

        let laid_out: Vec<&Sizing> = children.iter().filter(|s| !s.ignore_layout).collect();
        if laid_out.is_empty() {
            return vec![content; children.len()];
        }

        let (content_main, content_cross) = match main {
            Direction::Horizontal => (content.width, content.height),
            Direction::Vertical => (content.height, content.width),
        };

        let total_gap = self.spacing * (laid_out.len() - 1) as f32;
        let mut extents: Vec<f32> = laid_out.iter().map(|s| s.extent(main)).collect();
        let used: f32 = extents.iter().sum::<f32>() + total_gap;
        let mut leftover = (content_main - used).max(0.0);

        if self.expands(main) && leftover > 0.0 {
            let weights: Vec<f32> = laid_out.iter().map(|s| s.flex(main)).collect();
            let total_weight: f32 = weights.iter().sum();
            for (extent, weight) in extents.iter_mut().zip(&weights) {
                *extent += if total_weight > 0.0 {
                    leftover * weight / total_weight
                } else {
                    leftover / laid_out.len() as f32
                };
            }
            leftover = 0.0;
        }

        let mut cursor = match self.alignment {
            Alignment::Start => 0.0,
            Alignment::Center => leftover * 0.5,
            Alignment::End => leftover,
        };

        let mut placed = laid_out.iter().zip(extents).map(|(sizing, extent)| {
            let cross_extent = if self.expands(cross) {
                content_cross
            } else {
                sizing.extent(cross).min(content_cross)
            };
            let offset = cursor;
            cursor += extent + self.spacing;
            match main {
                Direction::Horizontal => {
                    Rect::new(content.x + offset, content.y, extent, cross_extent)
                }
                Direction::Vertical => {
                    Rect::new(content.x, content.y + offset, cross_extent, extent)
                }
            }
        });

        children
            .iter()
            .map(|s| {
                if s.ignore_layout {
                    content
                } else {
                    placed.next().unwrap_or(content)
                }
            })
            .collect()
    }
}
