mod annotation;
mod background;
mod capture;
mod convert;
mod display;
mod edges;
mod mask;
mod pipeline;

use anyhow::{Context, Result};
use background::{KnnSubtractor, LearningRate, SamplerSettings};
use capture::{FrameSource, VideoFileSource, WebcamCapture};
use clap::{Parser, ValueEnum};
use display::{HighguiWindow, Window};
use mask::RegionMask;
use pipeline::PipelineSettings;
use std::path::PathBuf;

const FIELD_WINDOW: &str = "Field selection";
const SAMPLER_WINDOW: &str = "bckg_generator";
const FRAME_WINDOW: &str = "frame";
const EDGES_WINDOW: &str = "Edges";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FieldMode {
    /// Click the corners of the pitch
    Polygon,
    /// Drag a rectangle over the grass and keep every pixel of that colour
    Color,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video file recorded by the static pitch camera
    #[arg(required_unless_present = "camera")]
    video: Option<PathBuf>,

    /// Read from a local camera instead of a video file
    #[arg(long, conflicts_with = "video")]
    camera: Option<u32>,

    /// How the field region is marked
    #[arg(long, value_enum, default_value_t = FieldMode::Polygon)]
    field_mode: FieldMode,

    /// Frames consumed per background sample
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    sample_step: u32,

    /// Background samples taken before the live pass
    #[arg(long, default_value_t = 10)]
    sample_count: u32,

    /// Process only every Nth frame during the live pass
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    process_every: u32,

    /// Background learning rate during the live pass
    #[arg(long, default_value_t = 0.01)]
    learning_rate: f64,

    /// Stop adapting the background once it has been primed
    #[arg(long)]
    freeze_background: bool,

    /// Frames of history kept by the KNN subtractor
    #[arg(long, default_value_t = 500)]
    knn_history: i32,

    /// Squared distance threshold of the KNN subtractor
    #[arg(long, default_value_t = 400.0)]
    knn_threshold: f64,

    /// Show Canny edges of each processed frame
    #[arg(long)]
    show_edges: bool,

    /// Skip the preview window while sampling the background
    #[arg(long)]
    no_preview: bool,

    /// Let OpenCV use OpenCL where available
    #[arg(long)]
    opencl: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn live_learning_rate(&self) -> LearningRate {
        if self.freeze_background {
            LearningRate::Frozen
        } else {
            LearningRate::Fixed(self.learning_rate)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("pitchmask starting");

    opencv::core::set_use_opencl(args.opencl).context("Failed to configure OpenCL")?;

    let region = select_field(&args).context("Field selection failed")?;
    let (width, height) = region.dimensions();
    tracing::info!(
        "Field mask covers {} of {} pixels",
        region.coverage(),
        u64::from(width) * u64::from(height)
    );

    let mut model = KnnSubtractor::new(args.knn_history, args.knn_threshold)?;

    {
        let mut source = open_source(&args)?;
        let mut preview = if args.no_preview {
            None
        } else {
            Some(HighguiWindow::open(SAMPLER_WINDOW)?)
        };
        let settings = SamplerSettings {
            step: args.sample_step as usize,
            count: args.sample_count as usize,
        };
        background::prime_background(
            &mut source,
            &mut model,
            settings,
            preview.as_mut().map(|w| w as &mut dyn Window),
        )
        .context("Background sampling failed")?;
    }

    let mut source = open_source(&args)?;
    if source.resolution() != region.dimensions() {
        tracing::warn!(
            "Live source is {:?} but the field mask is {:?}",
            source.resolution(),
            region.dimensions()
        );
    }

    let mut window = HighguiWindow::open(FRAME_WINDOW)?;
    let mut edges_window = if args.show_edges {
        Some(HighguiWindow::open(EDGES_WINDOW)?)
    } else {
        None
    };

    let settings = PipelineSettings {
        process_every: args.process_every as usize,
        learning_rate: args.live_learning_rate(),
    };

    pipeline::run_pipeline(
        &mut source,
        &mut model,
        &region,
        &mut window,
        edges_window.as_mut().map(|w| w as &mut dyn Window),
        &settings,
    )?;

    Ok(())
}

fn open_source(args: &Args) -> Result<Box<dyn FrameSource>> {
    if let Some(index) = args.camera {
        let camera = WebcamCapture::new(index).context("Failed to initialize camera capture")?;
        return Ok(Box::new(camera));
    }

    let path = args.video.as_ref().context("No video file given")?;
    let video = VideoFileSource::open(path)?;
    Ok(Box::new(video))
}

/// Mark the field on the first frame and derive the region mask from it
fn select_field(args: &Args) -> Result<RegionMask> {
    let mut source = open_source(args)?;
    let first = source
        .read_frame()?
        .context("Video source produced no frames")?;
    let (width, height) = first.dimensions();

    let mut window = HighguiWindow::open(FIELD_WINDOW)?;

    let region = match args.field_mode {
        FieldMode::Polygon => {
            let polygon = annotation::select_polygon(&mut window, &first)?;
            tracing::debug!("Field polygon: {:?}", polygon.points());
            RegionMask::from_polygon(&polygon, width, height)
        }
        FieldMode::Color => {
            let selection = annotation::select_rect(&mut window, &first)?;
            let region = mask::field_mask_from_sample(&first, &selection, mask::DEFAULT_SPREAD)?;
            annotation::preview_region(&mut window, &first, &region)?;
            region
        }
    };

    Ok(region)
}
