use crate::background::{BackgroundModel, LearningRate};
use crate::capture::FrameSource;
use crate::display::Window;
use crate::edges;
use crate::mask::RegionMask;
use anyhow::{Context, Result};
use std::time::{Duration, Instant};

const QUIT_KEY: char = 'q';

#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    /// Process frame `i` only when `i % process_every == 0`
    pub process_every: usize,
    /// Model update rate during the live pass
    pub learning_rate: LearningRate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames_read: u64,
    pub frames_processed: u64,
    /// Stopped by the operator rather than end of stream
    pub quit: bool,
}

/// Live pass: subtract the background from every `process_every`-th frame,
/// keep only foreground on the field and show it.
///
/// Runs until the operator presses `q` or the source is exhausted.
pub fn run_pipeline<S, M, W>(
    source: &mut S,
    model: &mut M,
    region: &RegionMask,
    window: &mut W,
    mut edges_window: Option<&mut dyn Window>,
    settings: &PipelineSettings,
) -> Result<PipelineStats>
where
    S: FrameSource + ?Sized,
    M: BackgroundModel + ?Sized,
    W: Window + ?Sized,
{
    let every = settings.process_every.max(1) as u64;
    let mut stats = PipelineStats::default();
    let mut total_subtract_time = Duration::ZERO;

    tracing::info!(
        "Starting live pass: every {} frames, learning rate {:?}",
        every,
        settings.learning_rate
    );
    tracing::info!("Press q in the frame window to stop");

    loop {
        let index = stats.frames_read;

        if index % every != 0 {
            if !source.skip_frame()? {
                break;
            }
            stats.frames_read += 1;
            continue;
        }

        let Some(frame) = source.read_frame()? else {
            break;
        };
        stats.frames_read += 1;

        let subtract_start = Instant::now();
        let foreground = model
            .apply(&frame, settings.learning_rate)
            .context("Failed to subtract background")?;
        total_subtract_time += subtract_start.elapsed();

        let players = region
            .intersect(&foreground)
            .context("Foreground mask does not match the field mask")?;
        window.show_mask(&players)?;

        if let Some(edges) = edges_window.as_deref_mut() {
            edges.show_mask(&edges::otsu_canny(&frame))?;
        }

        stats.frames_processed += 1;

        // Log stats every 30 processed frames
        if stats.frames_processed % 30 == 0 {
            let avg_subtract_ms =
                total_subtract_time.as_secs_f64() * 1000.0 / stats.frames_processed as f64;
            let on_field = players.pixels().filter(|p| p[0] != 0).count() as f64;
            let field = region.coverage().max(1) as f64;
            tracing::info!(
                "Frame {}: subtract={:.1}ms, foreground={:.2}% of field",
                index,
                avg_subtract_ms,
                on_field * 100.0 / field
            );
        }

        if window.wait_key(1)? == Some(QUIT_KEY) {
            stats.quit = true;
            break;
        }
    }

    tracing::info!(
        "Live pass finished after {} frames ({} processed{})",
        stats.frames_read,
        stats.frames_processed,
        if stats.quit { ", stopped by operator" } else { "" }
    );

    Ok(stats)
}
