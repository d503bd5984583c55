/// Platten - line-driven music player
use clap::{Parser, Subcommand};
use crossbeam_channel::Receiver;
use platten_core::LibraryIndex;
use platten_metadata::{LibraryScanner, LoftyTagStore};
use platten_playback::{EndOfQueue, PresenceTracker, SessionController, SessionEvent};
use platten_storage::JsonSessionStore;
use platten_cli::{ClockTransport, PlayerConfig, Repl};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "platten")]
#[command(about = "Platten playback session over a local music directory", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PLATTEN_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory and list the albums found
    Scan {
        /// Directory to scan (defaults to the configured music directory)
        path: Option<PathBuf>,
    },
    /// Start the interactive player
    Play {
        /// Directory to play from (defaults to the configured music directory)
        path: Option<PathBuf>,

        /// Clock speed factor
        #[arg(long)]
        speed: Option<f64>,

        /// Start over at the end of the queue instead of stopping
        #[arg(long = "loop")]
        looping: bool,

        /// Do not save or resume the queue
        #[arg(long)]
        no_persist: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "platten=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = PlayerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan { path } => {
            if let Some(path) = path {
                config.library.music_dir = path;
            }
            scan(&config)?;
        }
        Commands::Play {
            path,
            speed,
            looping,
            no_persist,
        } => {
            if let Some(path) = path {
                config.library.music_dir = path;
            }
            if let Some(speed) = speed {
                config.transport.speed = speed;
            }
            if looping {
                config.playback.end_of_queue = EndOfQueue::Loop;
            }
            if no_persist {
                config.session.persist = false;
            }
            play(config)?;
        }
    }

    Ok(())
}

fn scan(config: &PlayerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let (library, stats) = LibraryScanner::new().scan(&config.library.music_dir)?;
    for album in library.albums()? {
        println!("{}  {} - {} ({} tracks)", album.id, album.artist, album.title, album.track_count);
    }
    println!(
        "{} tracks in {} albums, {} files skipped",
        stats.tracks_added,
        stats.albums,
        stats.errors.len()
    );
    for (path, reason) in &stats.errors {
        tracing::warn!("Skipped {}: {}", path.display(), reason);
    }

    Ok(())
}

fn play(config: PlayerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Scanning {}", config.library.music_dir.display());
    let (library, stats) = LibraryScanner::new().scan(&config.library.music_dir)?;
    tracing::info!("{} tracks in {} albums", stats.tracks_added, stats.albums);

    let mut builder = SessionController::builder(Arc::new(library))
        .with_tags(Arc::new(LoftyTagStore::new()))
        .with_config(config.playback.clone());
    if config.session.persist {
        builder = builder.with_persistence(Arc::new(JsonSessionStore::new(
            config.session.state_file.clone(),
        )));
    }
    let controller = builder.spawn(ClockTransport::new(config.transport.speed))?;

    let events = controller.subscribe();
    let printer = thread::Builder::new()
        .name("platten-events".to_string())
        .spawn(move || print_events(&events))?;

    println!("platten ready, type `help` for commands");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    Repl::new(&controller).run(stdin.lock(), &mut stdout)?;

    controller.shutdown();
    if printer.join().is_err() {
        tracing::warn!("Event printer panicked");
    }

    Ok(())
}

/// Mirror session events on the terminal until the session ends
fn print_events(events: &Receiver<SessionEvent>) {
    let mut presence = PresenceTracker::new();

    for event in events {
        match event {
            SessionEvent::MetadataBroadcast(meta) => {
                println!("> {} - {} ({})", meta.title, meta.artist, meta.album);
            }
            SessionEvent::LyricsLoaded { lyrics, .. } => {
                let first = lyrics.lines().next().unwrap_or_default();
                println!("  lyrics: {} ...", first);
            }
            SessionEvent::Error { message } => {
                eprintln!("! {}", message);
            }
            SessionEvent::Snapshot(snapshot) => {
                if let Some(change) = presence.observe(&snapshot) {
                    tracing::info!(
                        presence = ?change.presence,
                        notification = change.presence.shows_notification(),
                        "{} - {}",
                        change.title.as_deref().unwrap_or("nothing playing"),
                        change.text.as_deref().unwrap_or_default()
                    );
                }
            }
            SessionEvent::StateChanged { .. } | SessionEvent::TrackChanged { .. } => {}
        }
    }
}
