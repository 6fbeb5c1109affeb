use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hand_snake::config::AppConfig;
use hand_snake::game::GameEngine;
use hand_snake::modes::{PlayMode, SimulateMode};
use hand_snake::vision::{CaptureWorker, GestureClassifier, GestureInput, LandmarkReplay, PassthroughDetector};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Parser)]
#[command(name = "hand_snake")]
#[command(version, about = "Snake with phase and boost abilities, steered by keyboard or hand gestures")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recorded hand landmarks, one JSON frame per line
    #[arg(long)]
    landmarks: Option<PathBuf>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Number of frames to run in simulate mode
    #[arg(long, default_value = "900")]
    frames: u64,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play in the terminal with keyboard and optional gesture input
    Play,
    /// Run headless and print the final game state as JSON
    Simulate,
}

fn init_tracing(log_file: &Path) -> Result<()> {
    let file = File::create(log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(width) = cli.width {
        config.game.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.game.grid_height = height;
    }
    config.validate().context("Invalid configuration")?;

    Ok(config)
}

fn start_gesture_input(
    path: &Path,
    config: &AppConfig,
    classifier: GestureClassifier,
) -> Result<GestureInput<PassthroughDetector>> {
    let replay = LandmarkReplay::open(path)?;
    let worker = CaptureWorker::spawn(replay, config.frame_interval())?;
    Ok(GestureInput::new(worker, PassthroughDetector, classifier))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the game, so logs only go to a file
    if let Some(log_file) = &cli.log_file {
        init_tracing(log_file)?;
    }

    let config = load_config(&cli)?;

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config.game.clone(), seed),
        None => GameEngine::new(config.game.clone()),
    };
    let classifier = GestureClassifier::new(config.gesture.clone());

    match cli.mode {
        Mode::Play => {
            // Gesture input is optional; without it the game is keyboard only
            let gesture_input = match cli.landmarks.as_deref() {
                Some(path) => match start_gesture_input(path, &config, classifier) {
                    Ok(gesture_input) => Some(gesture_input),
                    Err(err) => {
                        tracing::warn!(error = %err, "gesture input unavailable");
                        eprintln!("Gesture input unavailable ({err:#}), using keyboard only");
                        None
                    }
                },
                None => None,
            };

            let mut play_mode = PlayMode::new(&config, engine, gesture_input);
            play_mode.run().await?;
        }
        Mode::Simulate => {
            let replay = cli
                .landmarks
                .as_deref()
                .map(LandmarkReplay::open)
                .transpose()
                .context("Failed to load landmark recording")?;

            let mut simulate_mode =
                SimulateMode::new(engine, replay, classifier, config.frame_interval());
            simulate_mode.run(cli.frames);
            println!("{}", simulate_mode.snapshot_json()?);
        }
    }

    Ok(())
}
