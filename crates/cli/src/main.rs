use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

#[cfg(feature = "highgui")]
mod opencv_camera_source;
#[cfg(feature = "highgui")]
mod opencv_display;
#[cfg(feature = "highgui")]
mod opencv_painter;

use facelock_core::camera::domain::frame_source::FrameSource;
use facelock_core::camera::infrastructure::image_file_source::ImageFileSource;
use facelock_core::detection::infrastructure::model_resolver::ProgressFn;
use facelock_core::detection::infrastructure::onnx_face_analyzer::OnnxFaceAnalyzer;
use facelock_core::display::domain::display::Display;
use facelock_core::display::infrastructure::headless_display::HeadlessDisplay;
use facelock_core::enrollment::infrastructure::image_file_loader::ImageFileLoader;
use facelock_core::pipeline::access_loop::AccessLoop;
use facelock_core::pipeline::config::AccessConfig;
use facelock_core::pipeline::enroll_identity_use_case::EnrollIdentityUseCase;
use facelock_core::pipeline::loop_logger::StdoutLoopLogger;
use facelock_core::pipeline::startup_error::StartupError;
use facelock_core::rendering::domain::decision_renderer::DecisionRenderer;
use facelock_core::rendering::domain::painter::Painter;

/// Exit status for configuration and runtime errors.
const EXIT_FAILURE: i32 = 1;
/// Exit status after a second Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

/// Unlocks when the enrolled owner is in front of the camera.
#[derive(Parser)]
#[command(name = "facelock")]
struct Cli {
    /// JSON config file (default: <config dir>/FaceLock/config.json if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Photo of the owner's face.
    #[arg(long)]
    enrollment: Option<PathBuf>,

    /// Replay an image or a directory of images instead of a camera.
    #[arg(long)]
    images: Option<PathBuf>,

    /// Camera device (path or name for ffmpeg, index for OpenCV).
    #[arg(long)]
    device: Option<String>,

    /// Maximum encoding distance still accepted as the owner.
    #[arg(long)]
    tolerance: Option<f64>,

    /// Analysis scale relative to the capture resolution (0.0-1.0].
    #[arg(long)]
    downscale: Option<f64>,

    /// Capture width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Capture height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long)]
    confidence: Option<f64>,

    /// Pause after a failed capture, in milliseconds.
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Extra directory to search for ONNX models (repeatable).
    #[arg(long)]
    model_dir: Vec<PathBuf>,

    /// Run without windows; stop with Ctrl-C or --max-cycles.
    #[arg(long)]
    headless: bool,

    /// Stop after this many displayed cycles.
    #[arg(long)]
    max_cycles: Option<u64>,
}

impl Cli {
    /// Overlays command-line values on top of the loaded config.
    fn apply(&self, config: &mut AccessConfig) {
        if let Some(path) = &self.enrollment {
            config.enrollment_path = path.clone();
        }
        if let Some(v) = self.tolerance {
            config.tolerance = v;
        }
        if let Some(v) = self.downscale {
            config.downscale_factor = v;
        }
        if let Some(v) = self.width {
            config.capture_width = v;
        }
        if let Some(v) = self.height {
            config.capture_height = v;
        }
        if let Some(v) = self.confidence {
            config.confidence = v;
        }
        if let Some(v) = self.retry_delay_ms {
            config.retry_delay_ms = v;
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    process::exit(run(cli));
}

/// Runs the loop and returns the process exit status.
fn run(cli: Cli) -> i32 {
    let mut config = match AccessConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return EXIT_FAILURE;
        }
    };
    cli.apply(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        return EXIT_FAILURE;
    }

    if let Err(e) = check_enrollment(&config) {
        eprintln!("Error: {e}");
        return e.exit_code();
    }

    let mut access_loop = match build_loop(&cli, &config) {
        Ok(access_loop) => access_loop,
        Err(e) => {
            eprintln!("Error: {e}");
            return EXIT_FAILURE;
        }
    };

    if let Err(e) = access_loop.start() {
        eprintln!("Error: {e}");
        return e.exit_code();
    }

    match access_loop.run() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_FAILURE
        }
    }
}

/// Fails on a missing owner photo before any model is resolved or downloaded.
fn check_enrollment(config: &AccessConfig) -> Result<(), StartupError> {
    if config.enrollment_path.is_file() {
        Ok(())
    } else {
        Err(StartupError::EnrollmentNotFound(config.enrollment_path.clone()))
    }
}

fn build_loop(cli: &Cli, config: &AccessConfig) -> Result<AccessLoop, Box<dyn std::error::Error>> {
    let mut search_dirs = cli.model_dir.clone();
    search_dirs.push(PathBuf::from("models"));
    let analyzer = OnnxFaceAnalyzer::from_model_dirs(&search_dirs, config.confidence, download_progress)?;

    let source = build_source(cli, config)?;
    let display = build_display(cli, config)?;
    let renderer = DecisionRenderer::new(
        build_painter(),
        config.panel_width,
        config.panel_height,
    );

    let access_loop = AccessLoop::new(
        config,
        source,
        Box::new(analyzer),
        EnrollIdentityUseCase::new(Box::new(ImageFileLoader::new())),
        renderer,
        display,
        Box::new(StdoutLoopLogger::new()),
    )?;
    Ok(access_loop)
}

fn build_source(cli: &Cli, config: &AccessConfig) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    let (width, height) = (config.capture_width, config.capture_height);
    if let Some(images) = &cli.images {
        return Ok(Box::new(ImageFileSource::new(images, width, height)));
    }
    camera_source(cli.device.as_deref(), width, height)
}

#[cfg(feature = "highgui")]
fn camera_source(
    device: Option<&str>,
    width: u32,
    height: u32,
) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    let index = match device {
        Some(d) => d
            .parse::<i32>()
            .map_err(|_| format!("OpenCV camera device must be an index, got '{d}'"))?,
        None => 0,
    };
    Ok(Box::new(opencv_camera_source::OpencvCameraSource::new(
        index, width, height,
    )))
}

#[cfg(all(feature = "ffmpeg", not(feature = "highgui")))]
fn camera_source(
    device: Option<&str>,
    width: u32,
    height: u32,
) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    use facelock_core::camera::infrastructure::ffmpeg_camera_source::{
        default_device, FfmpegCameraSource,
    };
    let device = device.unwrap_or_else(default_device);
    Ok(Box::new(FfmpegCameraSource::new(device, width, height)))
}

#[cfg(not(any(feature = "ffmpeg", feature = "highgui")))]
fn camera_source(
    _device: Option<&str>,
    _width: u32,
    _height: u32,
) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    Err("This build has no camera backend; pass --images or rebuild with --features ffmpeg or highgui".into())
}

#[cfg(feature = "highgui")]
fn build_painter() -> Box<dyn Painter> {
    Box::new(opencv_painter::OpencvPainter::new())
}

#[cfg(not(feature = "highgui"))]
fn build_painter() -> Box<dyn Painter> {
    Box::new(facelock_core::rendering::infrastructure::bitmap_painter::BitmapPainter::new())
}

fn build_display(cli: &Cli, config: &AccessConfig) -> Result<Box<dyn Display>, Box<dyn std::error::Error>> {
    #[cfg(feature = "highgui")]
    if !cli.headless {
        return Ok(Box::new(opencv_display::OpencvDisplay::new(
            config.quit_key,
            cli.max_cycles,
        )));
    }
    #[cfg(not(feature = "highgui"))]
    if !cli.headless {
        log::info!("Built without window support; running headless");
    }

    log::info!("Press Ctrl-C to quit (default quit key '{}' needs a window).", config.quit_key);
    Ok(Box::new(HeadlessDisplay::new(stop_on_ctrl_c(), cli.max_cycles)))
}

/// Raises the returned flag on the first Ctrl-C; a second one exits at once.
fn stop_on_ctrl_c() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            process::exit(EXIT_INTERRUPTED);
        }
    }) {
        log::warn!("Could not install Ctrl-C handler: {e}");
    }
    stop
}

fn download_progress(model: &str) -> Option<ProgressFn> {
    let model = model.to_string();
    Some(Box::new(move |downloaded: u64, total: u64| {
        if total > 0 {
            let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
            eprint!("\rDownloading {model}... {pct}%");
            if downloaded >= total {
                eprintln!();
            }
        } else {
            eprint!("\rDownloading {model}... {downloaded} bytes");
        }
    }))
}
