//! Skaterolltui: skate trick roulette in the terminal. Four reels spin and land on a trick to try.

mod app;
mod catalog;
mod coordinator;
mod formatter;
mod history;
mod input;
mod motion;
mod reel;
mod resolver;
mod settings;
mod store;
mod theme;
mod ui;

use anyhow::Result;
use app::{App, Coordinator};
use clap::{Parser, ValueEnum};
use coordinator::{RngSource, SpinCoordinator};
use history::{HISTORY_FILE, HistoryStore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use settings::{SETTINGS_FILE, Settings, SettingsSource, SettingsStore};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "skaterolltui.log";
const LOG_ENV: &str = "SKATEROLL_LOG";
/// Clock step for `--roll`.
const SIM_TICK: Duration = Duration::from_millis(16);

/// Options derived from CLI that affect the roll loop.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub min_spin: Duration,
    pub frame_rate: f64,
    pub no_animation: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let dir = args.config_dir.clone().unwrap_or_else(store::config_dir);
    init_logging(&dir);

    let (mut settings, history) = if args.ephemeral {
        (
            SettingsStore::in_memory(Settings::default()),
            HistoryStore::in_memory(),
        )
    } else {
        (
            SettingsStore::load(dir.join(SETTINGS_FILE)),
            HistoryStore::load(dir.join(HISTORY_FILE)),
        )
    };
    if let Some(mode) = args.mode {
        settings.set_mode(mode);
    }
    if let Some(difficulty) = args.difficulty {
        settings.set_difficulty(difficulty);
    }
    info!(
        mode = ?settings.current().mode,
        difficulty = ?settings.current().difficulty,
        history = history.len(),
        "starting"
    );

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let config = GameConfig {
        min_spin: Duration::from_millis(args.spin_ms),
        frame_rate: args.frame_rate.max(1.0),
        no_animation: args.no_animation,
    };
    let mut coordinator = SpinCoordinator::new(settings, history, RngSource(rng), config.min_spin);

    if let Some(count) = args.roll {
        return roll_headless(&mut coordinator, count);
    }
    let mut app = App::new(config, coordinator, theme::Theme::default());
    app.run()
}

/// Roll `count` tricks on a simulated clock and print them, one per line.
fn roll_headless(coordinator: &mut Coordinator, count: u32) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for _ in 0..count {
        coordinator.request_spin();
        let outcome = loop {
            if let Some(outcome) = coordinator.tick(SIM_TICK) {
                break outcome;
            }
        };
        writeln!(out, "{}", outcome.text.replace('\n', " | "))?;
    }
    Ok(())
}

/// Log to a file in the config dir; the terminal belongs to the UI. Runs without logs on failure.
fn init_logging(dir: &Path) {
    if fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    else {
        return;
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// Skate trick roulette in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "skaterolltui",
    version,
    about = "Skate trick roulette in the terminal: four reels spin and land on a trick to try.",
    long_about = "Skaterolltui spins four reels (stance, rotation, degree and flip for flatground; \
        stance, grind, rotation and tries for ledge) and composes the landed faces into a trick.\n\n\
        CONTROLS:\n  Space/Enter  Spin (roll) / toggle (lists)   Tab / Shift-Tab  Switch screen\n  \
        m            Toggle mode                   d                Cycle difficulty\n  \
        Up/Down j/k  Move selection                x                Delete history entry\n  \
        c then y     Clear history                 q / Esc          Quit\n\n\
        Settings and history are stored in $XDG_CONFIG_HOME/skaterolltui (or ~/.config/skaterolltui). \
        Set SKATEROLL_LOG to change the log filter (default info)."
)]
pub struct Args {
    /// Game mode to switch to (saved for next time).
    #[arg(short, long)]
    pub mode: Option<GameMode>,

    /// Difficulty to switch to (saved for next time). Custom uses the toggles on the settings screen.
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Seed for the random source; rolls are reproducible with the same seed and settings.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Minimum time in ms the reels spin before they start to settle.
    #[arg(long, default_value_t = coordinator::MIN_SPIN_MS, value_name = "MS")]
    pub spin_ms: u64,

    /// Target render frames per second (also the animation tick rate).
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Disable the fade-in of the rolled trick.
    #[arg(long)]
    pub no_animation: bool,

    /// Directory for settings, history and the log file.
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Keep settings and history in memory only.
    #[arg(long)]
    pub ephemeral: bool,

    /// Roll N tricks without the UI, print them and exit.
    #[arg(long, value_name = "N")]
    pub roll: Option<u32>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Flatground,
    Ledge,
}

impl GameMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Flatground => Self::Ledge,
            Self::Ledge => Self::Flatground,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Flatground => "FLATGROUND",
            Self::Ledge => "LEDGE",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Custom,
}

impl Difficulty {
    pub const ALL: [Self; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Custom];

    pub fn next(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Custom,
            Self::Custom => Self::Easy,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Easy => Self::Custom,
            Self::Medium => Self::Easy,
            Self::Hard => Self::Medium,
            Self::Custom => Self::Hard,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
            Self::Custom => "CUSTOM",
        }
    }
}
