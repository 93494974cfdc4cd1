//! object_dimensions - measure objects in a video feed against a single reference object

use std::path::{Path, PathBuf};
use anyhow::{anyhow, Result};
use clap::Parser;

use bvr_dimensions::common::{FixedAdvance, InferenceDevice, ModelConfig, ModelVersion, TextMeasure};
use bvr_dimensions::data::{FsAccess, MeasureConfig, REFERENCE_WIDTH_CM};
use bvr_dimensions::display::{DisplaySink, ImageDirSink};
use bvr_dimensions::frame_sources::{FrameSource, ImageDirSource};
use bvr_dimensions::rendering::{find_system_font, FontMeasure, FrameRenderer};
use bvr_dimensions::session::MeasureSession;
use bvr_dimensions::init_detector;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// ONNX model file.
    #[arg(long)]
    model: String,
    /// Path to the ONNX Runtime shared library. Uses the system library when empty.
    #[arg(long, default_value = "")]
    ort_lib: String,
    /// Execution provider: cpu, cuda, tensorrt or coreml.
    #[arg(long, default_value = "cpu")]
    device: String,
    /// Device index for GPU execution providers.
    #[arg(long, default_value_t = 0)]
    device_id: usize,
    /// YOLO release the model was exported from, e.g. v8 or yolov11.
    #[arg(long, default_value = "v11")]
    yolo_version: String,
    /// TrueType font for labels. Falls back to a system font.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Read frames from this image directory instead of a camera.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Write annotated frames here (headless mode). Defaults to ./runs/measure.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also write the annotation instructions of each frame as JSON.
    #[arg(long)]
    json: bool,
    /// Camera index for live capture.
    #[arg(long, default_value_t = 0)]
    camera: i32,
    /// Do not mirror frames left to right.
    #[arg(long)]
    no_mirror: bool,
    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let inference_device = InferenceDevice::from_str(&args.device, args.device_id).ok_or_else(|| {
        anyhow!(
            "Unknown device '{}', expected one of {}",
            args.device,
            InferenceDevice::all_inference_devices().join(", ")
        )
    })?;
    let model_version = ModelVersion::from_name(&args.yolo_version)
        .ok_or_else(|| anyhow!("Unknown YOLO version '{}'", args.yolo_version))?;

    let model_details = ModelConfig::new(args.model.clone(), args.ort_lib.clone(), inference_device, model_version);
    log::info!("Model configuration:\n{}", model_details);

    let config = MeasureConfig::new()
        .with_mirror(!args.no_mirror)
        .with_max_frames(args.max_frames);

    println!("Instructions:");
    println!("1. Place a reference object of {REFERENCE_WIDTH_CM}cm width in front of the camera first.");
    println!("2. The first detected object becomes the reference.");
    println!("3. Click anywhere in the window to reset the reference.");
    println!("4. Press 'q' to quit.");

    let detector = init_detector(&model_details)?;

    let font = load_font(args.font.as_deref())?;
    let text: Box<dyn TextMeasure> = match &font {
        Some(font) => Box::new(font.clone()),
        None => Box::new(FixedAdvance::default()),
    };
    let renderer = FrameRenderer::new(font);

    let source = open_source(&args, &config)?;
    let display = open_display(&args)?;

    let mut session = MeasureSession::new(source, detector, display, renderer, text, config);
    let summary = session.run()?;

    log::info!(
        "Processed {} frames, {} calibration resets, stopped: {}",
        summary.frames,
        summary.resets,
        summary.stop_reason
    );
    Ok(())
}

fn load_font(explicit: Option<&Path>) -> Result<Option<FontMeasure>> {
    if let Some(path) = explicit {
        return Ok(Some(FontMeasure::from_file(path)?));
    }

    match find_system_font() {
        Some(path) => match FontMeasure::from_file(&path) {
            Ok(font) => {
                log::info!("Using font {}", path.display());
                Ok(Some(font))
            }
            Err(e) => {
                log::warn!("{e:#}");
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

#[cfg(feature = "camera")]
fn open_source(args: &Args, config: &MeasureConfig) -> Result<Box<dyn FrameSource>> {
    match &args.input {
        Some(dir) => Ok(Box::new(ImageDirSource::open(dir)?)),
        None => Ok(Box::new(bvr_dimensions::frame_sources::CameraSource::open(
            args.camera,
            config.capture_width,
            config.capture_height,
        )?)),
    }
}

#[cfg(not(feature = "camera"))]
fn open_source(args: &Args, _config: &MeasureConfig) -> Result<Box<dyn FrameSource>> {
    match &args.input {
        Some(dir) => Ok(Box::new(ImageDirSource::open(dir)?)),
        None => Err(anyhow!(
            "Built without the `camera` feature; pass --input <dir> (camera {} unavailable)",
            args.camera
        )),
    }
}

#[cfg(feature = "camera")]
fn open_display(args: &Args) -> Result<Box<dyn DisplaySink>> {
    if args.input.is_none() && args.output.is_none() {
        let window = bvr_dimensions::display::HighGuiDisplay::new(bvr_dimensions::data::WINDOW_TITLE)?;
        return Ok(Box::new(window));
    }
    open_image_sink(args)
}

#[cfg(not(feature = "camera"))]
fn open_display(args: &Args) -> Result<Box<dyn DisplaySink>> {
    open_image_sink(args)
}

fn open_image_sink(args: &Args) -> Result<Box<dyn DisplaySink>> {
    let dir = match &args.output {
        Some(dir) => dir.clone(),
        None => FsAccess::save_out(&["runs", "measure"])?,
    };
    Ok(Box::new(ImageDirSink::new(&dir, args.json)?))
}
