//! Integer geometry used by the drawing API
//!
//! All coordinates are signed 16-bit values. Rectangles are half-open:
//! `x0..x1` horizontally and `y0..y1` vertically.

/// A 2-D offset (or point) in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Offset {
    /// Horizontal component
    pub x: i16,
    /// Vertical component
    pub y: i16,
}

impl Offset {
    /// Create a new offset
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// The `(0, 0)` offset
    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }
}

impl core::ops::Add for Offset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl core::ops::Sub for Offset {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Size of a surface or bitmap in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    /// Width in pixels
    pub width: i16,
    /// Height in pixels
    pub height: i16,
}

impl Size {
    /// Create a new size
    pub const fn new(width: i16, height: i16) -> Self {
        Self { width, height }
    }

    /// The zero size, returned for contexts without a bitmap
    pub const fn zero() -> Self {
        Self {
            width: 0,
            height: 0,
        }
    }

    /// Returns true if either dimension is not positive
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Half-open rectangle `[x0, x1) x [y0, y1)`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// Left edge (inclusive)
    pub x0: i16,
    /// Top edge (inclusive)
    pub y0: i16,
    /// Right edge (exclusive)
    pub x1: i16,
    /// Bottom edge (exclusive)
    pub y1: i16,
}

impl Rect {
    /// Create a rectangle from its edges
    pub const fn new(x0: i16, y0: i16, x1: i16, y1: i16) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a rectangle from its top-left corner and size
    pub fn from_top_left_and_size(top_left: Offset, size: Size) -> Self {
        Self {
            x0: top_left.x,
            y0: top_left.y,
            x1: top_left.x.saturating_add(size.width),
            y1: top_left.y.saturating_add(size.height),
        }
    }

    /// Top-left corner
    pub const fn top_left(&self) -> Offset {
        Offset::new(self.x0, self.y0)
    }

    /// Width (may be negative for degenerate rectangles)
    pub const fn width(&self) -> i16 {
        self.x1.saturating_sub(self.x0)
    }

    /// Height (may be negative for degenerate rectangles)
    pub const fn height(&self) -> i16 {
        self.y1.saturating_sub(self.y0)
    }

    /// Returns true if the point lies inside the rectangle
    pub const fn contains(&self, x: i16, y: i16) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}
