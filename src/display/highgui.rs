use super::{PointerEvent, Window};
use crate::annotation::Point;
use crate::convert;
use anyhow::{Context, Result};
use image::{GrayImage, RgbImage};
use opencv::highgui;
use std::sync::mpsc::{self, Receiver};

/// Named OpenCV window. Destroyed when dropped.
pub struct HighguiWindow {
    name: String,
    events: Receiver<PointerEvent>,
}

impl HighguiWindow {
    pub fn open(name: &str) -> Result<Self> {
        tracing::debug!("Opening window {:?}", name);

        highgui::named_window(name, highgui::WINDOW_AUTOSIZE)
            .with_context(|| format!("Failed to open window {:?}", name))?;

        // The callback fires on OpenCV's event thread; forward to whoever
        // owns the selection state
        let (sender, events) = mpsc::channel();
        highgui::set_mouse_callback(
            name,
            Some(Box::new(move |event, x, y, _flags| {
                let point = Point::new(x, y);
                let pointer = match event {
                    highgui::EVENT_LBUTTONDOWN => PointerEvent::Down(point),
                    highgui::EVENT_LBUTTONUP => PointerEvent::Up(point),
                    _ => return,
                };
                // Receiver gone means the window is being torn down
                let _ = sender.send(pointer);
            })),
        )
        .with_context(|| format!("Failed to attach mouse handler to {:?}", name))?;

        Ok(Self {
            name: name.to_string(),
            events,
        })
    }
}

impl Window for HighguiWindow {
    fn show_rgb(&mut self, image: &RgbImage) -> Result<()> {
        let mat = convert::rgb_to_bgr_mat(image)?;
        highgui::imshow(&self.name, &mat)
            .with_context(|| format!("Failed to draw window {:?}", self.name))?;
        Ok(())
    }

    fn show_mask(&mut self, mask: &GrayImage) -> Result<()> {
        let mat = convert::gray_to_mat(mask)?;
        highgui::imshow(&self.name, &mat)
            .with_context(|| format!("Failed to draw window {:?}", self.name))?;
        Ok(())
    }

    fn wait_key(&mut self, delay_ms: i32) -> Result<Option<char>> {
        let key = highgui::wait_key(delay_ms)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(Some(char::from((key & 0xFF) as u8)))
    }

    fn pointer_events(&mut self) -> Vec<PointerEvent> {
        self.events.try_iter().collect()
    }
}

impl Drop for HighguiWindow {
    fn drop(&mut self) {
        tracing::debug!("Closing window {:?}", self.name);
        if let Err(err) = highgui::destroy_window(&self.name) {
            tracing::warn!("Failed to close window {:?}: {}", self.name, err);
        }
    }
}
