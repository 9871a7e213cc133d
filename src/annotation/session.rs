use super::render::{polygon_canvas, rect_canvas};
use super::{Command, Polygon, PolygonTool, RectTool, Selection};
use crate::display::{PointerEvent, Window};
use crate::mask::RegionMask;
use anyhow::Result;
use image::RgbImage;

/// How long each poll for keys and clicks blocks
const POLL_INTERVAL_MS: i32 = 20;

/// Let the operator outline the field on `image`.
///
/// Left click adds a point, clicking inside the ring around the first point
/// closes the loop, `x` undoes, `r` starts over and `c` confirms. Blocks
/// until a polygon with at least three points is confirmed.
pub fn select_polygon<W: Window + ?Sized>(window: &mut W, image: &RgbImage) -> Result<Polygon> {
    let mut tool = PolygonTool::new();
    let mut dirty = true;

    tracing::info!("Outline the field: click to add points, x to undo, r to reset, c to confirm");

    loop {
        if dirty {
            window.show_rgb(&polygon_canvas(image, &tool))?;
            dirty = false;
        }

        let key = window.wait_key(POLL_INTERVAL_MS)?;

        for event in window.pointer_events() {
            if let PointerEvent::Down(point) = event {
                let outcome = tool.pointer_down(point);
                tracing::debug!(
                    "Click at ({}, {}): {:?}, now {:?}",
                    point.x,
                    point.y,
                    outcome,
                    tool.state()
                );
                dirty = true;
            }
        }

        match key.and_then(Command::from_key) {
            Some(Command::Reset) => {
                tracing::debug!("Selection reset");
                tool.reset();
                dirty = true;
            }
            Some(Command::Undo) => {
                match tool.undo() {
                    Some(point) => tracing::debug!("Removed point ({}, {})", point.x, point.y),
                    None => tracing::debug!("Nothing to undo"),
                }
                dirty = true;
            }
            Some(Command::Confirm) => match tool.confirm() {
                Ok(polygon) => {
                    tracing::info!("Field polygon confirmed with {} points", polygon.len());
                    return Ok(polygon);
                }
                Err(err) => tracing::warn!("Cannot confirm yet: {}", err),
            },
            None => {}
        }
    }
}

/// Let the operator drag a rectangle on `image`. `r` clears, `c` confirms.
pub fn select_rect<W: Window + ?Sized>(window: &mut W, image: &RgbImage) -> Result<Selection> {
    let mut tool = RectTool::new();
    let mut dirty = true;

    tracing::info!("Drag a rectangle over the grass, r to reset, c to confirm");

    loop {
        if dirty {
            window.show_rgb(&rect_canvas(image, &tool))?;
            dirty = false;
        }

        let key = window.wait_key(POLL_INTERVAL_MS)?;

        for event in window.pointer_events() {
            match event {
                PointerEvent::Down(point) => tool.pointer_down(point),
                PointerEvent::Up(point) => tool.pointer_up(point),
            }
            dirty = true;
        }

        match key.and_then(Command::from_key) {
            Some(Command::Reset) => {
                tool.reset();
                dirty = true;
            }
            Some(Command::Confirm) => match tool.confirm() {
                Ok(selection) => {
                    tracing::info!(
                        "Sample rectangle confirmed: {}x{} at ({}, {})",
                        selection.width,
                        selection.height,
                        selection.x,
                        selection.y
                    );
                    return Ok(selection);
                }
                Err(err) => tracing::warn!("Cannot confirm yet: {}", err),
            },
            Some(Command::Undo) | None => {}
        }
    }
}

/// Show the frame restricted to the region and wait for any key
pub fn preview_region<W: Window + ?Sized>(
    window: &mut W,
    frame: &RgbImage,
    region: &RegionMask,
) -> Result<()> {
    window.show_rgb(&region.apply_to_frame(frame)?)?;
    window.wait_key(0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Point;
    use crate::display::testing::{ScriptedWindow, Step};

    fn frame() -> RgbImage {
        RgbImage::new(100, 100)
    }

    #[test]
    fn clicks_then_confirm_yield_polygon() {
        let mut window = ScriptedWindow::strict(vec![
            Step::click(10, 10),
            Step::click(90, 10),
            Step::click(90, 90),
            Step::click(10, 90),
            Step::click(12, 11),
            Step::key('c'),
        ]);

        let polygon = select_polygon(&mut window, &frame()).unwrap();
        assert_eq!(
            polygon.points(),
            &[
                Point::new(10, 10),
                Point::new(90, 10),
                Point::new(90, 90),
                Point::new(10, 90)
            ]
        );
        // Initial draw plus one redraw per click
        assert_eq!(window.shown_rgb.len(), 6);
    }

    #[test]
    fn premature_confirm_keeps_session_open() {
        let mut window = ScriptedWindow::strict(vec![
            Step::click(10, 10),
            Step::click(90, 10),
            Step::key('c'),
            Step::click(90, 90),
            Step::key('c'),
        ]);

        let polygon = select_polygon(&mut window, &frame()).unwrap();
        assert_eq!(polygon.len(), 3);
        assert_eq!(window.waits, 5);
    }

    #[test]
    fn reset_and_undo_edit_the_point_list() {
        let mut window = ScriptedWindow::strict(vec![
            Step::click(50, 50),
            Step::click(70, 70),
            Step::key('r'),
            Step::key('x'),
            Step::click(10, 10),
            Step::click(90, 10),
            Step::click(90, 90),
            Step::click(10, 90),
            Step::key('x'),
            Step::key('c'),
        ]);

        let polygon = select_polygon(&mut window, &frame()).unwrap();
        assert_eq!(
            polygon.points(),
            &[Point::new(10, 10), Point::new(90, 10), Point::new(90, 90)]
        );
    }

    #[test]
    fn reset_redraws_the_original_image() {
        let image = frame();
        let mut window = ScriptedWindow::strict(vec![Step::click(50, 50), Step::key('r')]);

        assert!(select_polygon(&mut window, &image).is_err());
        assert_eq!(window.shown_rgb.last(), Some(&image));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut window = ScriptedWindow::strict(vec![
            Step::click(10, 10),
            Step::key('q'),
            Step::click(90, 10),
            Step::click(90, 90),
            Step::key('c'),
        ]);
        assert_eq!(select_polygon(&mut window, &frame()).unwrap().len(), 3);
    }

    #[test]
    fn annotated_rectangle_rasterizes_to_its_interior() {
        let mut window = ScriptedWindow::strict(vec![
            Step::click(20, 30),
            Step::click(60, 30),
            Step::click(60, 80),
            Step::click(20, 80),
            Step::key('c'),
        ]);

        let polygon = select_polygon(&mut window, &frame()).unwrap();
        let region = RegionMask::from_polygon(&polygon, 100, 100);

        for y in 0..100 {
            for x in 0..100 {
                let inside = (20..60).contains(&x) && (30..80).contains(&y);
                assert_eq!(region.contains(x, y), inside, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn preview_shows_masked_frame_and_waits() {
        let polygon = Polygon::new(vec![
            Point::new(0, 0),
            Point::new(50, 0),
            Point::new(50, 100),
            Point::new(0, 100),
        ])
        .unwrap();
        let region = RegionMask::from_polygon(&polygon, 100, 100);
        let image = RgbImage::from_pixel(100, 100, image::Rgb([9, 9, 9]));
        let mut window = ScriptedWindow::strict(vec![Step::key(' ')]);

        preview_region(&mut window, &image, &region).unwrap();
        let shown = &window.shown_rgb[0];
        assert_eq!(shown.get_pixel(10, 10)[0], 9);
        assert_eq!(shown.get_pixel(90, 10)[0], 0);
    }

    #[test]
    fn drag_then_confirm_yields_selection() {
        let mut window = ScriptedWindow::strict(vec![
            Step::key('c'),
            Step::drag((20, 30), (60, 50)),
            Step::key('c'),
        ]);

        let selection = select_rect(&mut window, &frame()).unwrap();
        assert_eq!(
            selection,
            Selection {
                x: 20,
                y: 30,
                width: 40,
                height: 20
            }
        );
    }

    #[test]
    fn rect_reset_discards_the_drag() {
        let mut window = ScriptedWindow::strict(vec![
            Step::drag((20, 30), (60, 50)),
            Step::key('r'),
            Step::key('c'),
        ]);
        assert!(select_rect(&mut window, &frame()).is_err());
    }
}
