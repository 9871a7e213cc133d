mod polygon;
mod rect;
mod render;
mod session;

pub use polygon::{Polygon, PolygonTool, CLOSE_RADIUS};
pub use rect::{RectTool, Selection};
pub use session::{preview_region, select_polygon, select_rect};

/// Integer pixel coordinate in image space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy)
    }
}

impl From<Point> for (i32, i32) {
    fn from(point: Point) -> Self {
        (point.x, point.y)
    }
}

impl From<Point> for (f32, f32) {
    fn from(point: Point) -> Self {
        (point.x as f32, point.y as f32)
    }
}

/// Keyboard commands understood while a selection is being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `r`: discard everything and start over
    Reset,
    /// `c`: accept the current selection
    Confirm,
    /// `x`: remove the last polygon point
    Undo,
}

impl Command {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'r' => Some(Self::Reset),
            'c' => Some(Self::Confirm),
            'x' => Some(Self::Undo),
            _ => None,
        }
    }
}
