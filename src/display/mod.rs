mod highgui;

pub use highgui::HighguiWindow;

use crate::annotation::Point;
use anyhow::Result;
use image::{GrayImage, RgbImage};

/// Mouse button transitions delivered by a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(Point),
    Up(Point),
}

/// Trait for interactive display windows
pub trait Window {
    /// Replace the window contents with a colour image
    fn show_rgb(&mut self, image: &RgbImage) -> Result<()>;

    /// Replace the window contents with a single-channel mask
    fn show_mask(&mut self, mask: &GrayImage) -> Result<()>;

    /// Wait up to `delay_ms` for a key press; `0` waits forever
    fn wait_key(&mut self, delay_ms: i32) -> Result<Option<char>>;

    /// Drain pointer events received since the last call
    fn pointer_events(&mut self) -> Vec<PointerEvent>;
}
