//! Tsunami advisory map service.
//!
//! Loads region boundaries, renders the current advisory snapshot onto
//! them and serves the overlay over HTTP.

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use advisory_pipeline::Mode;
use tsunami_map::{router, AppState, MapConfig};

#[derive(Parser, Debug)]
#[command(name = "tsunami-map")]
#[command(about = "Tsunami advisory map overlay service")]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "TSUNAMI_CONFIG")]
    config: Option<String>,

    /// Startup mode (live or fixture), overrides the config file
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Render once, print the overlay GeoJSON to stdout and exit
    #[arg(long)]
    once: bool,

    /// Listen address, overrides the config file
    #[arg(short, long)]
    listen: Option<String>,

    /// Log level, overrides the config file
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MapConfig::from_file(path)?,
        None => MapConfig::default(),
    };
    config.apply_env()?;
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(listen) = &args.listen {
        config.server.listen = listen.clone();
    }
    config.validate()?;

    let level_name = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let level = match level_name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the overlay in --once mode
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(mode = %config.mode, regions = %config.regions_path.display(), "Starting tsunami map service");

    let state = Arc::new(AppState::from_config(config)?);

    if args.once {
        state
            .controller
            .set(state.config.mode)
            .await
            .context("Advisory render failed")?;
        let overlay = state
            .controller
            .pipeline()
            .with_surface(|surface| surface.to_feature_collection())
            .await;
        println!("{}", serde_json::to_string_pretty(&overlay)?);
        return Ok(());
    }

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    state.initial_load().await;

    if state.config.poll_interval_secs > 0 {
        tokio::spawn(state.clone().run_forever());
    }

    let addr: SocketAddr = state
        .config
        .server
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", state.config.server.listen))?;
    let app = router(state, Some(prometheus_handle));

    info!(address = %addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
