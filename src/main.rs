use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use vibewise::mood::FaceSample;
use vibewise::spotify::parse_playlist_ref;
use vibewise::{
    BuildRequest, Config, Credential, JsonPlaylistStore, MoodLabelSource, MoodTable,
    MusicCatalog, PlaylistBuilder, RandomMoodLabeler, SpotifyCatalog,
};

#[derive(Parser)]
#[command(name = "vibewise")]
#[command(about = "Build Spotify playlists that match your mood")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve,

    /// Build one playlist and exit
    Build {
        /// Mood to build for; a placeholder label is used when omitted
        #[arg(short, long)]
        mood: Option<String>,

        /// Spotify access token (or set SPOTIFY_ACCESS_TOKEN env var)
        #[arg(long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
        token: String,

        /// Spotify user id of the playlist owner
        #[arg(long)]
        owner_id: Option<String>,

        /// Mean face brightness (0-255) fed to the placeholder labeler
        #[arg(long, requires = "variance")]
        brightness: Option<f64>,

        /// Face pixel variance fed to the placeholder labeler
        #[arg(long, requires = "brightness")]
        variance: Option<f64>,
    },

    /// List supported moods
    Moods,

    /// Show the current track count of a playlist
    Status {
        /// Playlist URL, URI or id
        playlist: String,

        /// Spotify access token (or set SPOTIFY_ACCESS_TOKEN env var)
        #[arg(long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Show setup guide
    Setup,
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before parsing so `.env` can supply `env = ...` flags
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Serve => {
            serve().await?;
        }
        Commands::Build {
            mood,
            token,
            owner_id,
            brightness,
            variance,
        } => {
            let face = brightness
                .zip(variance)
                .map(|(brightness, variance)| FaceSample {
                    brightness,
                    variance,
                });
            build(mood, &token, owner_id, face).await?;
        }
        Commands::Moods => {
            list_moods();
        }
        Commands::Status { playlist, token } => {
            status(&playlist, &token).await?;
        }
        Commands::Setup => {
            show_setup_guide();
        }
    }

    Ok(())
}

fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let problems = config.get_config_problems();
    if !problems.is_empty() {
        println!("{}", "Invalid configuration:".red());
        for item in &problems {
            println!("   - {}", item);
        }
        std::process::exit(1);
    }

    Ok(config)
}

fn credential(token: &str) -> Result<Credential> {
    Credential::new(token).context("Spotify access token is empty")
}

async fn serve() -> Result<()> {
    println!("{}", "VibeWise Playlist Service".cyan().bold());
    println!("{}", "=".repeat(50));

    let config = load_config()?;
    println!("Listening on {}", config.bind_addr.green());

    vibewise::server::start(&config)
        .await
        .context("HTTP server stopped")?;

    Ok(())
}

async fn build(
    mood: Option<String>,
    token: &str,
    owner_id: Option<String>,
    face: Option<FaceSample>,
) -> Result<()> {
    println!("{}", "VibeWise Playlist Builder".cyan().bold());
    println!("{}", "=".repeat(50));

    let config = load_config()?;
    let credential = credential(token)?;

    let request = match mood {
        Some(mood) => BuildRequest::new(mood, credential),
        None => {
            let label = RandomMoodLabeler.label(face);
            println!(
                "Detected mood: {} (confidence {:.2})",
                label.mood.yellow(),
                label.confidence
            );
            BuildRequest::from_label(label, credential)
        }
    };
    let request = BuildRequest {
        owner_id,
        ..request
    };

    let catalog = Arc::new(SpotifyCatalog::new(config.request_timeout));
    let store = Arc::new(
        JsonPlaylistStore::open(&config.data_dir)
            .await
            .context("Failed to open playlist records")?,
    );
    let builder = PlaylistBuilder::new(catalog, store, config.pipeline);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid progress template")?,
    );
    spinner.set_message("Building playlist...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = builder.build(request).await;
    spinner.finish_and_clear();

    let report = result.context("Playlist build failed")?;

    println!("\n{}", report.message.green());
    println!("   Playlist: {}", report.playlist.name.bold());
    println!("   URL:      {}", report.spotify_url.cyan());
    println!(
        "   Tracks:   {} of {} requested",
        report.total_tracks, report.stats.requested_tracks
    );
    if report.stats.fallback_used {
        println!(
            "   Fallback: {} tracks from {} searches",
            report.stats.fallback_added, report.stats.fallback_queries
        );
    }
    if report.is_partial() {
        println!(
            "\n{}",
            format!(
                "{} of {} track batches failed to add",
                report.stats.batches_failed, report.stats.batches_submitted
            )
            .yellow()
        );
    }

    Ok(())
}

fn list_moods() {
    println!("{}", "Supported Moods".cyan().bold());
    println!("{}", "=".repeat(50));

    let table = MoodTable::global();
    for policy in table.policies() {
        let window = policy.preferred_rank_window;
        println!(
            "{:12} energy {:.1}-{:.1}  ranks {:>2}..{:<3} {}",
            policy.mood.green(),
            policy.energy_range.0,
            policy.energy_range.1,
            window.start,
            window.end,
            table.keywords(policy.mood).join(", ").cyan()
        );
    }
}

async fn status(playlist: &str, token: &str) -> Result<()> {
    let config = load_config()?;
    let credential = credential(token)?;
    let playlist_id = parse_playlist_ref(playlist).context("Invalid playlist reference")?;

    let catalog = SpotifyCatalog::new(config.request_timeout);
    let snapshot = catalog
        .get_playlist(&credential, &playlist_id)
        .await
        .context("Failed to fetch playlist")?;

    println!("{} ({} tracks)", snapshot.name.green(), snapshot.total_tracks);
    println!("   https://open.spotify.com/playlist/{}", snapshot.id);

    Ok(())
}

fn show_setup_guide() {
    println!("{}", "VibeWise Setup Guide".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "1. Spotify API Setup".yellow());
    println!("   - Go to https://developer.spotify.com/dashboard/");
    println!("   - Create a new app and complete the authorization code flow");
    println!("   - Request the scopes user-top-read, playlist-modify-public");
    println!("   - Keep the resulting access token at hand");

    println!("\n{}", "2. Configuration".yellow());
    println!("   - Create a .env file with any of:");
    println!("     SPOTIFY_ACCESS_TOKEN=your_access_token");
    println!("     VIBEWISE_BIND_ADDR=127.0.0.1:8080");
    println!("     VIBEWISE_DATA_DIR=playlist_records");
    println!("     VIBEWISE_REQUEST_TIMEOUT_SECS=10");
    println!("     VIBEWISE_TARGET_TRACKS=30");
    println!("     VIBEWISE_MIN_TRACKS=20");

    println!("\n{}", "3. Usage".yellow());
    println!("   - vibewise moods                   (to see supported moods)");
    println!("   - vibewise build --mood sad        (to build one playlist)");
    println!("   - vibewise status <playlist url>   (to check a playlist)");
    println!("   - vibewise serve                   (to run the HTTP API)");

    println!("\n{}", "Ready to find your vibe!".green());
}
