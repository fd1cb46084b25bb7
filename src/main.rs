//! CLI entry point for the bike-share traffic tool.
//!
//! Loads the station list and a month of trips, then either renders a single
//! time filter or sweeps the filter across the day the way the map slider
//! would.

use anyhow::Result;
use bikeshare_traffic::{
    config::SourceConfig,
    infra::bluebikes::BluebikesClient,
    output::{append_frame, append_stats, print_json, print_pretty},
    overlay::RouteOverlay,
    projection::WebMercator,
    session::TrafficSession,
    stats::FrameStats,
    traffic::types::MINUTES_PER_DAY,
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_traffic")]
#[command(about = "Time-of-day traffic for bike-share stations", long_about = None)]
struct Cli {
    /// JSON file naming the station and trip sources
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Station metadata source (file path or URL)
    #[arg(long, global = true)]
    stations: Option<String>,

    /// Trip CSV source (file path or URL, `.gz` allowed)
    #[arg(long, global = true)]
    trips: Option<String>,

    /// GeoJSON source for the bike-lane overlay
    #[arg(long, global = true)]
    route_overlay: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the station markers for one slider position
    Snapshot {
        /// Minute of day (0-1439), or -1 for any time
        #[arg(short, long, default_value_t = -1, allow_hyphen_values = true)]
        minute: i32,

        /// CSV file to append marker rows to
        #[arg(short, long)]
        output: Option<String>,

        /// Also log the whole frame as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Move the slider across the whole day and summarize each position
    Sweep {
        /// Minutes between slider positions
        #[arg(short, long, default_value_t = 60)]
        step: usize,

        /// CSV file to append one summary row per position to
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_traffic.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_traffic.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let sources = match &cli.config {
        Some(path) => SourceConfig::load(path)?,
        None => SourceConfig::default(),
    }
    .with_env()
    .with_overrides(cli.stations, cli.trips)
    .with_overlay_override(cli.route_overlay);

    info!(stations = %sources.stations, trips = %sources.trips, "Loading dataset");
    let overlay = RouteOverlay::bike_lanes(sources.route_overlay.clone());
    let client = BluebikesClient::new(sources);
    let mut session = match TrafficSession::load(&client).await {
        Ok(session) => session.with_overlay(overlay),
        Err(e) => {
            error!(error = ?e, "Dataset load failed, nothing to render");
            return Err(e);
        }
    };

    let overlay = session.overlay();
    info!(
        layer = %overlay.id,
        source = %overlay.source,
        color = %overlay.color,
        "Route overlay registered"
    );

    match cli.command {
        Commands::Snapshot {
            minute,
            output,
            json,
        } => {
            let frame = session.on_filter_change(minute)?;
            let stats = FrameStats::from_frame(frame);
            print_pretty(&stats);
            log_stats(&stats);

            let positions = session.on_viewport_change(&WebMercator::default());
            let on_screen = positions
                .iter()
                .filter(|p| (0.0..1024.0).contains(&p.x) && (0.0..768.0).contains(&p.y))
                .count();
            info!(on_screen, total = positions.len(), "Markers in default viewport");

            if json {
                print_json(session.frame())?;
            }
            if let Some(path) = output {
                append_frame(&path, session.frame())?;
                info!(path = %path, "Marker rows written");
            }
        }
        Commands::Sweep { step, output } => {
            let step = step.clamp(1, MINUTES_PER_DAY);
            for minute in (0..MINUTES_PER_DAY).step_by(step) {
                let started = Instant::now();
                let frame = session.on_filter_change(minute as i32)?;
                let elapsed_us = started.elapsed().as_micros() as u64;

                let stats = FrameStats::from_frame(frame);
                info!(elapsed_us, "Filter pass complete");
                log_stats(&stats);

                if let Some(path) = &output {
                    append_stats(path, &stats)?;
                }
            }
        }
    }

    Ok(())
}

fn log_stats(stats: &FrameStats) {
    info!(
        filter = %stats.filter_label,
        departures = stats.departures_in_window,
        arrivals = stats.arrivals_in_window,
        active = stats.active_stations,
        active_pct = stats.active_pct(),
        more_departures = stats.more_departures,
        more_arrivals = stats.more_arrivals,
        balanced = stats.balanced,
        busiest = stats.busiest_station.as_deref().unwrap_or("-"),
        busiest_total = stats.busiest_total,
        "Frame"
    );
}
