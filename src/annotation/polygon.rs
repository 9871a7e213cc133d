use super::Point;
use thiserror::Error;

/// A click closer than this to the first point closes the loop instead of
/// adding a vertex. Also the radius of the target ring drawn around it.
pub const CLOSE_RADIUS: f64 = 12.0;

const MIN_POINTS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolygonError {
    #[error("a field polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("the polygon has already been confirmed")]
    AlreadyConfirmed,
}

/// Confirmed field boundary. Always holds at least three points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Result<Self, PolygonError> {
        if points.len() < MIN_POINTS {
            return Err(PolygonError::TooFewPoints(points.len()));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolState {
    Empty,
    Drawing,
    Closed,
}

/// What a pointer-down did to the polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// First vertex placed
    Started,
    /// New vertex appended
    Appended,
    /// Click landed on the closing ring; no vertex was added
    ClosedLoop,
    /// Tool already confirmed
    Ignored,
}

/// Point-capture state for drawing the field boundary
#[derive(Debug, Default, Clone)]
pub struct PolygonTool {
    points: Vec<Point>,
    loop_closed: bool,
    confirmed: bool,
}

impl PolygonTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ToolState {
        if self.confirmed {
            ToolState::Closed
        } else if self.points.is_empty() {
            ToolState::Empty
        } else {
            ToolState::Drawing
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Whether the last click closed the loop back onto the first point
    pub fn is_loop_closed(&self) -> bool {
        self.loop_closed
    }

    pub fn pointer_down(&mut self, point: Point) -> ClickOutcome {
        if self.confirmed {
            return ClickOutcome::Ignored;
        }

        let Some(&first) = self.points.first() else {
            self.points.push(point);
            return ClickOutcome::Started;
        };

        // Only the first point is a closing target
        if point.distance_to(first) < CLOSE_RADIUS {
            self.loop_closed = true;
            return ClickOutcome::ClosedLoop;
        }

        self.points.push(point);
        self.loop_closed = false;
        ClickOutcome::Appended
    }

    /// Remove the most recent point. No-op on an empty polygon.
    pub fn undo(&mut self) -> Option<Point> {
        if self.confirmed {
            return None;
        }
        let removed = self.points.pop();
        self.loop_closed = false;
        removed
    }

    pub fn reset(&mut self) {
        self.points.clear();
        self.loop_closed = false;
        self.confirmed = false;
    }

    /// Finalise the current points. The tool stays editable when this fails.
    pub fn confirm(&mut self) -> Result<Polygon, PolygonError> {
        if self.confirmed {
            return Err(PolygonError::AlreadyConfirmed);
        }
        let polygon = Polygon::new(self.points.clone())?;
        self.confirmed = true;
        Ok(polygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_with(points: &[(i32, i32)]) -> PolygonTool {
        let mut tool = PolygonTool::new();
        for &(x, y) in points {
            tool.pointer_down(Point::new(x, y));
        }
        tool
    }

    #[test]
    fn first_click_starts_drawing() {
        let mut tool = PolygonTool::new();
        assert_eq!(tool.state(), ToolState::Empty);
        assert_eq!(tool.pointer_down(Point::new(10, 10)), ClickOutcome::Started);
        assert_eq!(tool.state(), ToolState::Drawing);
        assert_eq!(tool.points(), &[Point::new(10, 10)]);
    }

    #[test]
    fn far_clicks_append() {
        let mut tool = tool_with(&[(10, 10)]);
        assert_eq!(tool.pointer_down(Point::new(50, 10)), ClickOutcome::Appended);
        assert_eq!(tool.pointer_down(Point::new(50, 50)), ClickOutcome::Appended);
        assert_eq!(tool.points().len(), 3);
    }

    #[test]
    fn closing_click_does_not_add_a_point() {
        let mut tool = tool_with(&[(10, 10), (60, 10), (60, 60)]);
        let before = tool.points().to_vec();

        assert_eq!(tool.pointer_down(Point::new(15, 14)), ClickOutcome::ClosedLoop);
        assert_eq!(tool.points(), before.as_slice());
        assert!(tool.is_loop_closed());
    }

    #[test]
    fn closing_radius_boundary_is_exclusive() {
        // Exactly 12px away appends
        let mut tool = tool_with(&[(10, 10), (60, 10), (60, 60)]);
        assert_eq!(tool.pointer_down(Point::new(22, 10)), ClickOutcome::Appended);

        let mut tool = tool_with(&[(10, 10), (60, 10), (60, 60)]);
        assert_eq!(tool.pointer_down(Point::new(21, 10)), ClickOutcome::ClosedLoop);
    }

    #[test]
    fn only_the_first_point_closes() {
        let mut tool = tool_with(&[(10, 10), (60, 10), (60, 60)]);
        assert_eq!(tool.pointer_down(Point::new(62, 58)), ClickOutcome::Appended);
        assert_eq!(tool.points().len(), 4);
    }

    #[test]
    fn appending_after_closing_reopens_the_loop() {
        let mut tool = tool_with(&[(10, 10), (60, 10), (60, 60), (12, 12)]);
        assert!(tool.is_loop_closed());
        tool.pointer_down(Point::new(10, 60));
        assert!(!tool.is_loop_closed());
    }

    #[test]
    fn undo_then_readd_restores_polygon() {
        let mut tool = tool_with(&[(10, 10), (60, 10), (60, 60), (10, 60)]);
        let before = tool.points().to_vec();

        let removed = tool.undo().unwrap();
        assert_eq!(removed, Point::new(10, 60));
        assert_eq!(tool.points().len(), 3);

        tool.pointer_down(removed);
        assert_eq!(tool.points(), before.as_slice());
    }

    #[test]
    fn undo_on_empty_is_a_no_op() {
        let mut tool = PolygonTool::new();
        assert_eq!(tool.undo(), None);
        assert_eq!(tool.state(), ToolState::Empty);
    }

    #[test]
    fn undo_last_point_returns_to_empty() {
        let mut tool = tool_with(&[(10, 10)]);
        tool.undo();
        assert_eq!(tool.state(), ToolState::Empty);
    }

    #[test]
    fn reset_always_empties() {
        let mut drawing = tool_with(&[(10, 10), (60, 10)]);
        drawing.reset();
        assert_eq!(drawing.state(), ToolState::Empty);
        assert!(drawing.points().is_empty());

        let mut closed = tool_with(&[(10, 10), (60, 10), (60, 60)]);
        closed.confirm().unwrap();
        assert_eq!(closed.state(), ToolState::Closed);
        closed.reset();
        assert_eq!(closed.state(), ToolState::Empty);

        let mut empty = PolygonTool::new();
        empty.reset();
        assert_eq!(empty.state(), ToolState::Empty);
    }

    #[test]
    fn confirm_needs_three_points() {
        let mut tool = tool_with(&[(10, 10), (60, 10)]);
        assert_eq!(tool.confirm(), Err(PolygonError::TooFewPoints(2)));
        assert_eq!(tool.state(), ToolState::Drawing);

        tool.pointer_down(Point::new(60, 60));
        let polygon = tool.confirm().unwrap();
        assert_eq!(polygon.len(), 3);
        assert_eq!(tool.state(), ToolState::Closed);
    }

    #[test]
    fn confirm_does_not_require_a_closed_loop() {
        let mut tool = tool_with(&[(10, 10), (60, 10), (60, 60)]);
        assert!(!tool.is_loop_closed());
        assert!(tool.confirm().is_ok());
    }

    #[test]
    fn confirmed_tool_ignores_input() {
        let mut tool = tool_with(&[(10, 10), (60, 10), (60, 60)]);
        tool.confirm().unwrap();
        assert_eq!(tool.pointer_down(Point::new(90, 90)), ClickOutcome::Ignored);
        assert_eq!(tool.undo(), None);
        assert_eq!(tool.confirm(), Err(PolygonError::AlreadyConfirmed));
        assert_eq!(tool.points().len(), 3);
    }
}
