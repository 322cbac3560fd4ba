use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use log::{LevelFilter, info};
use match_snake::config::{FRAME_INTERVAL_MS, GameConfig};
use match_snake::game::GameState;
use match_snake::input::GameInput;
use match_snake::renderer;
use match_snake::terminal_runtime::{TerminalSession, poll_input};
use match_snake::ui::hud::HudInfo;
use simplelog::{Config, WriteLogger};

#[derive(Debug, Parser)]
#[command(version, about = "Match-3 tiles and a wall-hunting snake in the terminal")]
struct Cli {
    /// JSON file with game settings; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting grid size (odd, within the configured limits).
    #[arg(long)]
    size: Option<u16>,

    /// Seed for tile and fruit placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file. The terminal itself is never logged to.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log per-step detail.
    #[arg(long)]
    debug: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path, cli.debug)?;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Invalid configuration: {error}");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, error));
        }
    };

    let state = match cli.seed {
        Some(seed) => GameState::new_with_seed(config, seed),
        None => GameState::new(config),
    };

    info!("starting session");
    let mut session = TerminalSession::enter()?;
    run(&mut session, state)
}

fn load_config(cli: &Cli) -> Result<GameConfig, match_snake::error::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(size) = cli.size {
        config = config.with_initial_size(size);
    }
    config.validate()?;
    Ok(config)
}

fn init_logging(path: &Path, debug: bool) -> io::Result<()> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    WriteLogger::init(level, Config::default(), File::create(path)?)
        .map_err(io::Error::other)
}

fn run(session: &mut TerminalSession, mut state: GameState) -> io::Result<()> {
    let frame_interval = Duration::from_millis(FRAME_INTERVAL_MS);
    let mut hud_info = HudInfo::default();
    let mut last_frame = Instant::now();

    loop {
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &state, &hud_info))?;

        if let Some(input) = poll_input(frame_interval)? {
            match input {
                GameInput::Quit => break,
                GameInput::ToggleHelp => hud_info.show_help = !hud_info.show_help,
                _ if hud_info.show_help => hud_info.show_help = false,
                other => state.apply_input(other),
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_frame);
        last_frame = now;

        if !hud_info.show_help {
            state.advance(elapsed);
        }
    }

    info!("session ended with score {}", state.score);
    Ok(())
}
