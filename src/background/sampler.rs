use super::{BackgroundModel, LearningRate};
use crate::capture::FrameSource;
use crate::display::Window;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerSettings {
    /// Frames consumed per sample; the last one of each stride is fed
    pub step: usize,
    /// Samples to feed before the live pass
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleReport {
    pub samples: usize,
    pub frames_consumed: usize,
}

/// Seed `model` with `count` frames spaced `step` frames apart.
///
/// Running out of frames is not an error: the model is simply primed on
/// fewer samples and the shortfall is logged.
pub fn prime_background<S, M>(
    source: &mut S,
    model: &mut M,
    settings: SamplerSettings,
    mut preview: Option<&mut dyn Window>,
) -> Result<SampleReport>
where
    S: FrameSource + ?Sized,
    M: BackgroundModel + ?Sized,
{
    let _span = tracing::info_span!("prime_background").entered();
    let mut report = SampleReport::default();

    'samples: for sample in 0..settings.count {
        for _ in 1..settings.step {
            if !source.skip_frame()? {
                break 'samples;
            }
            report.frames_consumed += 1;
        }

        let Some(frame) = source.read_frame()? else {
            break;
        };
        report.frames_consumed += 1;

        model.apply(&frame, LearningRate::Auto)?;
        report.samples += 1;
        tracing::debug!(
            "Background sample {}/{} after {} frames",
            sample + 1,
            settings.count,
            report.frames_consumed
        );

        if let Some(window) = preview.as_deref_mut() {
            window.show_rgb(&frame)?;
            window.wait_key(1)?;
        }
    }

    if report.samples < settings.count {
        tracing::warn!(
            "Video ended after {} frames; background primed on {} of {} samples",
            report.frames_consumed,
            report.samples,
            settings.count
        );
    } else {
        tracing::info!(
            "Background primed on {} samples ({} frames)",
            report.samples,
            report.frames_consumed
        );
    }

    Ok(report)
}
