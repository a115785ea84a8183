use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use impaired_vision::assets::{SettingsLoader, SettingsSource};
use impaired_vision::models::Settings;
use impaired_vision::rendering::{rgb_png_bytes, PngSequenceTarget};
use impaired_vision::services::{
    CaptureDevice, RawFileCapture, SettingsWatcher, TestPatternCapture, VisionController,
};
use vision_core::{try_decode, FrameSize, RgbBuffer, Vision, VisionCycle};

#[derive(Parser)]
#[command(name = "impaired-vision")]
#[command(about = "Impaired Vision - camera frames through simulated vision impairments")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the visions in cycle order
    Visions,
    /// Decode one NV21 frame, apply a vision and write a PNG
    Render {
        /// Raw NV21 file (one or more concatenated frames)
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        /// Zero-based frame number within the file
        #[arg(short, long, default_value_t = 0)]
        frame: u64,

        /// Vision name or slug (e.g. "deuteranopia")
        #[arg(short, long, default_value = "normal")]
        vision: String,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Run the full pipeline over a recording or a test pattern
    Replay {
        /// Raw NV21 recording; frame size comes from the settings
        #[arg(short, long, conflicts_with = "pattern")]
        input: Option<PathBuf>,

        /// Generate this many test pattern frames instead of reading a file
        #[arg(short, long)]
        pattern: Option<u64>,

        /// Settings file (overrides SETTINGS_FILE)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Directory receiving frame_NNNNNN.png files
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Stop after this many frames
        #[arg(long)]
        frames: Option<u64>,

        /// Advance to the next vision every K rendered frames
        #[arg(long)]
        cycle_every: Option<u64>,

        /// Reload the throttle settings when the settings file changes
        #[arg(long)]
        watch: bool,
    },
    /// Write the default settings file for customization
    Init {
        /// Target path (defaults to SETTINGS_FILE, then ./settings.yaml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "impaired_vision=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Visions) => {
            run_visions_command();
            Ok(())
        }
        Some(Commands::Render {
            input,
            width,
            height,
            frame,
            vision,
            output,
        }) => run_render_command(&input, width, height, frame, &vision, &output),
        Some(Commands::Replay {
            input,
            pattern,
            settings,
            output_dir,
            frames,
            cycle_every,
            watch,
        }) => run_replay_command(ReplayArgs {
            input,
            pattern,
            settings,
            output_dir,
            frames,
            cycle_every,
            watch,
        }),
        Some(Commands::Init { path, force }) => run_init_command(path.as_deref(), force),
        None => run_status_command(),
    }
}

fn run_visions_command() {
    for (index, vision) in VisionCycle::new().iter().enumerate() {
        match vision.capture_hint() {
            Some(hint) => println!("{index}  {:<14} {vision} ({hint})", vision.slug()),
            None => println!("{index}  {:<14} {vision}", vision.slug()),
        }
    }
}

/// Decode a single frame to PNG (no session, no throttle)
fn run_render_command(
    input: &Path,
    width: u32,
    height: u32,
    frame: u64,
    vision: &str,
    output: &Path,
) -> anyhow::Result<()> {
    let size = FrameSize::new(width, height)?;
    let vision: Vision = vision.parse()?;
    let mut capture = RawFileCapture::open(input, size)
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let mut rgb = RgbBuffer::new(size);
    let mut decoded = None;
    for index in 0..=frame {
        let mut result = None;
        let delivered = capture.next_frame(&mut |raw| {
            if index == frame {
                result = Some(try_decode(raw, rgb.pixels_mut(), size));
            }
        })?;
        if !delivered {
            anyhow::bail!(
                "{} holds only {index} frame(s) of {size}",
                input.display()
            );
        }
        decoded = result;
    }
    decoded.context("Frame was not delivered")??;

    let png = rgb_png_bytes(rgb.pixels(), size, &vision.color_matrix())?;
    std::fs::write(output, &png)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Rendered frame {frame} as {vision} to {}", output.display());
    println!("  Size: {size}, {} bytes", png.len());
    Ok(())
}

struct ReplayArgs {
    input: Option<PathBuf>,
    pattern: Option<u64>,
    settings: Option<PathBuf>,
    output_dir: PathBuf,
    frames: Option<u64>,
    cycle_every: Option<u64>,
    watch: bool,
}

fn run_replay_command(args: ReplayArgs) -> anyhow::Result<()> {
    let loader = SettingsLoader::from_env_or(args.settings);
    let settings = Settings::load_from_assets(&loader);
    let size = settings.frame_size()?;

    let device: Box<dyn CaptureDevice> = match (args.input, args.pattern) {
        (Some(path), _) => Box::new(
            RawFileCapture::open(&path, size)
                .with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        (None, pattern) => Box::new(TestPatternCapture::new(size, pattern.or(Some(60)))),
    };

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;
    let target = PngSequenceTarget::new(&args.output_dir);

    let mut controller = VisionController::new(target);
    match settings.initial_vision() {
        Ok(vision) => {
            controller.cycle().select(vision);
        }
        Err(e) => tracing::warn!(error = %e, "Starting with Normal vision"),
    }
    // an invalid rate is logged and the default stays in effect
    let _ = controller.apply_settings(&settings.throttle);
    controller.attach(device)?;

    let watcher = if args.watch {
        Some(SettingsWatcher::new(loader.settings_file()))
    } else {
        None
    };

    let cycle_every = args.cycle_every.filter(|&k| k > 0);
    let mut switched_at = 0u64;
    let stats = controller.run(args.frames, |controller| {
        if let Some(every) = cycle_every {
            let rendered = controller.stats().rendered;
            if rendered >= switched_at + every {
                switched_at = rendered;
                if let Err(e) = controller.advance(1) {
                    tracing::warn!(error = %e, "Failed to switch vision");
                }
            }
        }
        if let Some(change) = watcher.as_ref().and_then(SettingsWatcher::poll) {
            tracing::info!(path = %change.path.display(), "Reloading settings");
            // failures are logged and the previous throttle stays in effect
            let _ = controller.reload_settings(&loader);
        }
    })?;
    let final_vision = controller.current();
    controller.detach()?;

    println!("Replay finished: {stats}");
    println!("  Final vision: {final_vision}");
    println!("  Output: {}", args.output_dir.display());
    Ok(())
}

fn run_init_command(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let loader = SettingsLoader::from_env_or(None);
    let report = loader.init(path, force)?;

    for file in &report.written {
        println!("Wrote {file}");
    }
    for file in &report.skipped {
        println!("Skipped {file} (exists, use --force to overwrite)");
    }
    Ok(())
}

fn run_status_command() -> anyhow::Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Impaired Vision v{VERSION}");
    println!("Camera frames through simulated vision impairments\n");

    let settings_env = std::env::var(impaired_vision::assets::SETTINGS_FILE_ENV).ok();
    println!("Environment Variables:");
    println!(
        "  SETTINGS_FILE = {}",
        settings_env.as_deref().unwrap_or("(not set)")
    );

    let loader = SettingsLoader::from_env_or(None);
    let source = match loader.source() {
        SettingsSource::File(path) => path.display().to_string(),
        SettingsSource::Embedded => "embedded".to_string(),
        SettingsSource::EmbeddedFallback(_) => "embedded (file not found)".to_string(),
    };
    let settings = Settings::load_from_assets(&loader);

    println!("\nSettings:  {source}");
    println!(
        "  Capture:  {}x{}",
        settings.capture.width, settings.capture.height
    );
    match settings.throttle.skip_rate() {
        Ok(rate) if settings.throttle.skip_frames => println!("  Throttle: skip {rate}"),
        Ok(_) => println!("  Throttle: off"),
        Err(e) => println!("  Throttle: invalid ({e})"),
    }
    println!("  Vision:   {}", settings.vision);

    println!("\nCommands:");
    println!("  impaired-vision visions    List visions");
    println!("  impaired-vision render     Render one NV21 frame to PNG");
    println!("  impaired-vision replay     Run the pipeline over frames");
    println!("  impaired-vision init       Write the default settings");
    Ok(())
}
