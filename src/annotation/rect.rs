use super::Point;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no rectangle has been dragged yet")]
    Incomplete,

    #[error("the selected rectangle has no area")]
    Empty,
}

/// Axis-aligned rectangle covering columns `x..x + width` and rows `y..y + height`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Selection {
    /// Normalise two opposite corners, clamping negative coordinates to zero
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x0 = a.x.min(b.x).max(0);
        let y0 = a.y.min(b.y).max(0);
        let x1 = a.x.max(b.x).max(0);
        let y1 = a.y.max(b.y).max(0);
        Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Press-drag-release rectangle selection
#[derive(Debug, Default, Clone)]
pub struct RectTool {
    anchor: Option<Point>,
    corner: Option<Point>,
}

impl RectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, point: Point) {
        self.anchor = Some(point);
        self.corner = None;
    }

    pub fn pointer_up(&mut self, point: Point) {
        if self.anchor.is_some() {
            self.corner = Some(point);
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        Some(Selection::from_corners(self.anchor?, self.corner?))
    }

    pub fn reset(&mut self) {
        self.anchor = None;
        self.corner = None;
    }

    pub fn confirm(&self) -> Result<Selection, SelectionError> {
        let selection = self.selection().ok_or(SelectionError::Incomplete)?;
        if selection.is_empty() {
            return Err(SelectionError::Empty);
        }
        Ok(selection)
    }
}
