#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are CSS pixels in document coordinates (origin at the top-left
//! of the document, not the viewport). Fractions are preserved; rounding only
//! happens when an offset is applied to a node.

/// An axis-aligned box in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top edge.
    pub top: f64,
    /// Left edge.
    pub left: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Horizontal centre.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Vertical centre.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Shrink the rectangle by `padding` on every side.
    ///
    /// Never produces a negative size.
    pub fn inset(&self, padding: f64) -> Rect {
        let width = (self.width - padding * 2.0).max(0.0);
        let height = (self.height - padding * 2.0).max(0.0);
        Rect::new(self.top + padding, self.left + padding, width, height)
    }

    /// Check if the point lies inside the rectangle.
    pub fn contains(&self, top: f64, left: f64) -> bool {
        top >= self.top && top < self.bottom() && left >= self.left && left < self.right()
    }

    /// Rectangle with the same size whose top-left corner is at `offset`.
    pub fn at(&self, offset: Offset) -> Rect {
        Rect::new(offset.top, offset.left, self.width, self.height)
    }
}

/// Width and height of a measured box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top/left position of a tooltip, the result of placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub top: f64,
    pub left: f64,
}

impl Offset {
    /// Create a new offset.
    #[inline]
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// Offset with both coordinates rounded to whole pixels.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self::new(self.top.round(), self.left.round())
    }

    /// Component-wise sum.
    #[must_use]
    pub fn translate(self, delta: Offset) -> Self {
        Self::new(self.top + delta.top, self.left + delta.left)
    }
}

/// The visible window onto the document.
///
/// `scroll_top`/`scroll_left` are the document coordinates of the viewport's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_top: f64,
    pub scroll_left: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a new viewport.
    pub const fn new(scroll_top: f64, scroll_left: f64, width: f64, height: f64) -> Self {
        Self {
            scroll_top,
            scroll_left,
            width,
            height,
        }
    }

    /// The visible region in document coordinates.
    pub fn visible_rect(&self) -> Rect {
        Rect::new(self.scroll_top, self.scroll_left, self.width, self.height)
    }
}
