use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use snake3d_common::GameConfig;
use snake3d_input::{Action, Controller, InputScript, Key, Response};
use snake3d_kernel::{Game, GameClock};
use snake3d_render::{
    Background, Camera, DebugTextRenderer, Frame, Renderer, compose_frame, upload_standard_meshes,
};
use snake3d_tools::{Autopilot, GameInspector};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake3d-cli", about = "Headless runner for the snake3d game")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info and the default configuration
    Info,
    /// Run the frame loop on a simulated clock
    Simulate {
        /// Board size, overrides the config file
        #[arg(short = 'n', long)]
        size: Option<u32>,
        /// Food placement seed, overrides the config file
        #[arg(short, long)]
        seed: Option<u64>,
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Simulated frames per second
        #[arg(long, default_value = "60")]
        fps: f64,
        /// Simulated run length in seconds
        #[arg(long, default_value = "20")]
        seconds: f64,
        /// Timed key presses, e.g. "0:space 0.5:right 1.2:up"
        #[arg(long)]
        script: Option<String>,
        /// Steer greedily toward the food and restart after each death
        #[arg(short, long)]
        autopilot: bool,
        /// Print the event log as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the key bindings
    Bindings,
}

struct RunOptions {
    fps: f64,
    seconds: f64,
    script: Option<InputScript>,
    autopilot: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = GameConfig::default();
            println!("snake3d-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("tools: {}", snake3d_tools::crate_info());
            println!(
                "kernel: tick interval at size {} = {:.3}s",
                config.size,
                GameClock::base_interval_for(config.size)
            );
            println!("default config:");
            print!("{}", serde_yaml::to_string(&config)?);
        }
        Commands::Simulate {
            size,
            seed,
            config,
            fps,
            seconds,
            script,
            autopilot,
            json,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(size) = size {
                config.size = size;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if !(fps.is_finite() && fps > 0.0) {
                bail!("--fps must be positive, got {fps}");
            }
            if !(seconds.is_finite() && seconds >= 0.0) {
                bail!("--seconds must be non-negative, got {seconds}");
            }
            let script = script
                .as_deref()
                .map(InputScript::parse)
                .transpose()
                .context("invalid --script")?;

            let mut renderer = DebugTextRenderer::new();
            let meshes = upload_standard_meshes(&mut renderer, config.size);
            let mut game = Game::with_meshes(config, meshes.entities)?;
            let background = Background::new(game.board(), meshes.background);
            let mut camera = Camera::default();

            let options = RunOptions {
                fps,
                seconds,
                script,
                autopilot,
            };
            let frame = run(&mut game, &mut camera, &background, options)?;

            println!("{}", GameInspector::summary(&game));
            println!("{}", GameInspector::inspect_snake(&game));
            print!("{}", GameInspector::occupancy_map(&game));
            print!("{}", renderer.render(&frame));
            if json {
                println!("{}", serde_json::to_string_pretty(game.events())?);
            }
        }
        Commands::Bindings => {
            print!("{}", Controller::default().bindings());
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = GameConfig::from_yaml_str(&text)
        .with_context(|| format!("failed to load {}", path.display()))?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Drive the frame loop: input, clock, at most one tick, compose.
/// Returns the last composed frame.
fn run(
    game: &mut Game,
    camera: &mut Camera,
    background: &Background,
    mut options: RunOptions,
) -> anyhow::Result<Frame> {
    let controller = Controller::default();
    let pilot = Autopilot;
    let frames = (options.seconds * options.fps).ceil() as u64;

    // without a script there is nobody to press start
    if options.script.is_none() {
        controller.handle_key(game, camera, Key::Space);
    }

    let mut frame = compose_frame(game, camera, background)?;
    for index in 0..=frames {
        let now = index as f64 / options.fps;

        if let Some(script) = options.script.as_mut() {
            for key in script.due(now) {
                if controller.handle_key(game, camera, key) == Response::Quit {
                    tracing::info!(now, "quit from script");
                    return Ok(frame);
                }
            }
        }

        if options.autopilot {
            if game.is_dead() {
                controller.apply(game, camera, Action::Confirm);
            } else if game.is_running() && !game.input_locked() {
                if let Some(action) = pilot.choose(game).and_then(Action::from_direction) {
                    controller.apply(game, camera, action);
                }
            }
        }

        game.advance(now);
        frame = compose_frame(game, camera, background)?;
    }
    tracing::info!(
        frames,
        ticks = game.tick_count(),
        score = game.score(),
        "simulation finished"
    );
    Ok(frame)
}
