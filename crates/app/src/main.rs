use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use playlist_visualiser_core::{
    AppConfig, Control, ControlPanel, PlaybackController, RecordingSurface, Reschedule,
    SimulatedHost,
};
use tracing_subscriber::EnvFilter;

fn main() -> playlist_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Tracks => run_tracks(&config),
        Commands::Session {
            auto_advance,
            controls,
        } => run_session(config, auto_advance, &controls),
        Commands::Frames { count, track } => run_frames(config, count, track),
    }
}

fn load_config(path: Option<&Path>) -> playlist_visualiser_core::Result<AppConfig> {
    match path {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            AppConfig::load(path)
        }
        None => Ok(AppConfig::default()),
    }
}

fn run_tracks(config: &AppConfig) -> playlist_visualiser_core::Result<()> {
    for (index, track) in config.tracks.iter().enumerate() {
        println!("{index}: {} ({})", track.name, track.source);
    }
    Ok(())
}

fn run_session(
    mut config: AppConfig,
    auto_advance: bool,
    controls: &[String],
) -> playlist_visualiser_core::Result<()> {
    config.player.auto_advance |= auto_advance;
    let player = PlaybackController::from_config(SimulatedHost::new(), &config)?;
    let mut panel = ControlPanel::new(player);
    let mut surface = RecordingSurface::new();

    for raw in controls {
        let control: Control = raw.parse()?;
        let status = panel.press(control).clone();
        let drawing = panel.refresh(&mut surface) == Reschedule::Continue;
        println!(
            "[{}] {status} (auto-advance {}, drawing: {drawing})",
            panel.auto_advance_indicator(),
            if panel.player().auto_advance() { "on" } else { "off" },
        );
    }

    tracing::info!(frames = surface.strokes(), "session finished");
    Ok(())
}

fn run_frames(
    config: AppConfig,
    count: usize,
    track: usize,
) -> playlist_visualiser_core::Result<()> {
    let mut player = PlaybackController::from_config(SimulatedHost::new(), &config)?;
    if track != player.current_index() {
        player.select(track)?;
    }
    player.play()?;

    let mut surface = RecordingSurface::new();
    for _ in 0..count {
        if player.refresh(&mut surface)? == Reschedule::Done {
            break;
        }
        println!("{}", serde_json::to_string(&surface.last_path())?);
    }
    player.stop()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Playlist widget with a spectrum line", long_about = None)]
struct Cli {
    /// JSON configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the configured tracks.
    Tracks,
    /// Press the given controls in order against a simulated audio host.
    Session {
        /// Start with auto-advance enabled.
        #[arg(short, long)]
        auto_advance: bool,
        /// Controls such as `play`, `next`, `prev`, `vol+`, `vol-`, `stop`, `auto`.
        controls: Vec<String>,
    },
    /// Play a track and print each spectrum frame as a JSON polyline.
    Frames {
        /// Number of display refreshes to run.
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
        /// Index of the track to play.
        #[arg(short, long, default_value_t = 0)]
        track: usize,
    },
}
