use super::{Point, PolygonTool, RectTool, CLOSE_RADIUS};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut,
};
use imageproc::rect::Rect;

const POLYGON_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const SELECTION_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const MARKER_RADIUS: i32 = 4;

/// Draw the polygon tool's points over a copy of `image`.
///
/// Rebuilt from the point list every time, so undo and reset never leave
/// stale strokes behind.
pub fn polygon_canvas(image: &RgbImage, tool: &PolygonTool) -> RgbImage {
    let mut canvas = image.clone();
    let points = tool.points();

    if let Some(&first) = points.first() {
        draw_hollow_circle_mut(&mut canvas, first.into(), CLOSE_RADIUS as i32, POLYGON_COLOR);
    }

    for pair in points.windows(2) {
        segment(&mut canvas, pair[0], pair[1]);
    }

    if tool.is_loop_closed() {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            segment(&mut canvas, last, first);
        }
    }

    for &point in points {
        draw_filled_circle_mut(&mut canvas, point.into(), MARKER_RADIUS, POLYGON_COLOR);
    }

    canvas
}

pub fn rect_canvas(image: &RgbImage, tool: &RectTool) -> RgbImage {
    let mut canvas = image.clone();
    if let Some(selection) = tool.selection().filter(|s| !s.is_empty()) {
        let rect = Rect::at(selection.x as i32, selection.y as i32)
            .of_size(selection.width, selection.height);
        draw_hollow_rect_mut(&mut canvas, rect, SELECTION_COLOR);
    }
    canvas
}

fn segment(canvas: &mut RgbImage, from: Point, to: Point) {
    draw_line_segment_mut(canvas, from.into(), to.into(), POLYGON_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> RgbImage {
        RgbImage::new(100, 100)
    }

    #[test]
    fn empty_tool_renders_the_original() {
        let image = blank();
        assert_eq!(polygon_canvas(&image, &PolygonTool::new()), image);
    }

    #[test]
    fn first_point_gets_marker_and_ring() {
        let mut tool = PolygonTool::new();
        tool.pointer_down(Point::new(50, 50));
        let canvas = polygon_canvas(&blank(), &tool);

        assert_eq!(*canvas.get_pixel(50, 50), POLYGON_COLOR);
        assert_eq!(*canvas.get_pixel(62, 50), POLYGON_COLOR);
        // Between marker and ring stays untouched
        assert_eq!(*canvas.get_pixel(57, 50), Rgb([0, 0, 0]));
    }

    #[test]
    fn segments_connect_consecutive_points() {
        let mut tool = PolygonTool::new();
        tool.pointer_down(Point::new(10, 80));
        tool.pointer_down(Point::new(90, 80));
        let canvas = polygon_canvas(&blank(), &tool);
        assert_eq!(*canvas.get_pixel(50, 80), POLYGON_COLOR);
    }

    #[test]
    fn undo_redraw_matches_fresh_drawing() {
        let mut tool = PolygonTool::new();
        tool.pointer_down(Point::new(10, 80));
        tool.pointer_down(Point::new(90, 80));
        let before = polygon_canvas(&blank(), &tool);

        tool.pointer_down(Point::new(90, 10));
        tool.undo();
        assert_eq!(polygon_canvas(&blank(), &tool), before);
    }

    #[test]
    fn closed_loop_draws_the_closing_edge() {
        let mut tool = PolygonTool::new();
        for (x, y) in [(20, 20), (80, 20), (80, 80), (20, 80)] {
            tool.pointer_down(Point::new(x, y));
        }
        let open = polygon_canvas(&blank(), &tool);
        assert_eq!(*open.get_pixel(20, 50), Rgb([0, 0, 0]));

        tool.pointer_down(Point::new(21, 21));
        let closed = polygon_canvas(&blank(), &tool);
        assert_eq!(*closed.get_pixel(20, 50), POLYGON_COLOR);
    }

    #[test]
    fn rectangle_outline_is_drawn() {
        let mut tool = RectTool::new();
        tool.pointer_down(Point::new(10, 10));
        tool.pointer_up(Point::new(40, 30));
        let canvas = rect_canvas(&blank(), &tool);

        assert_eq!(*canvas.get_pixel(10, 10), SELECTION_COLOR);
        assert_eq!(*canvas.get_pixel(25, 10), SELECTION_COLOR);
        assert_eq!(*canvas.get_pixel(25, 20), Rgb([0, 0, 0]));
    }
}
