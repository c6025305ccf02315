//! Page-local integer geometry.
//!
//! # Responsibility
//! - Define the point/size/rect primitives shared by widgets and input code.
//! - Provide total clamping helpers for drag and resize paths.
//!
//! # Invariants
//! - Coordinates are page-local pixels; the page origin is its top-left corner.
//! - Clamping never fails: out-of-range inputs are moved to the nearest legal
//!   value instead of returning an error.

use serde::{Deserialize, Serialize};

/// A page-local position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A widget extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle described by its top-left origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn right(&self) -> i32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> i32 {
        self.origin.y + self.size.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x < self.right()
            && point.y >= self.origin.y
            && point.y < self.bottom()
    }

    /// Returns this rect translated by `(dx, dy)` without any clamping.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            origin: Point::new(self.origin.x + dx, self.origin.y + dy),
            size: self.size,
        }
    }

    /// Moves the origin so the whole rect stays inside `bounds`.
    ///
    /// A rect larger than `bounds` is pinned to the bounds origin; the size is
    /// never altered here, only the position.
    pub fn clamped_within(&self, bounds: Size) -> Self {
        let max_x = (bounds.width - self.size.width).max(0);
        let max_y = (bounds.height - self.size.height).max(0);
        Self {
            origin: Point::new(
                self.origin.x.clamp(0, max_x),
                self.origin.y.clamp(0, max_y),
            ),
            size: self.size,
        }
    }

    /// Limits the size so the rect does not extend past `bounds`, keeping the
    /// origin fixed and honoring `min` as a floor.
    pub fn sized_within(&self, requested: Size, min: Size, bounds: Size) -> Self {
        let max_width = (bounds.width - self.origin.x).max(min.width);
        let max_height = (bounds.height - self.origin.y).max(min.height);
        Self {
            origin: self.origin,
            size: Size::new(
                requested.width.clamp(min.width, max_width),
                requested.height.clamp(min.height, max_height),
            ),
        }
    }
}
