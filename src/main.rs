//! Wanderers - avatar icons wandering a map
//!
//! Main entry point for the CLI application.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wanderers::{
    config::Config,
    map::PointStore,
    output::browser::BrowserServer,
    scene::{Command, FrameLoop},
    web::WebServer,
    AppState,
};

/// Wanderers - avatars walking between points on a map
#[derive(Parser, Debug)]
#[command(name = "wanderers", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Points JSON file (overrides config)
    #[arg(long)]
    points: Option<PathBuf>,

    /// Number of avatars (overrides config)
    #[arg(short, long)]
    avatars: Option<usize>,

    /// RNG seed for reproducible motion (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// HTTP server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", wanderers::NAME, wanderers::VERSION);

    let runtime = tokio::runtime::Runtime::new()?;

    let state = runtime.block_on(async { setup_and_spawn_services(&args).await })?;

    // Wait for Ctrl+C / SIGTERM
    runtime.block_on(async {
        shutdown_signal().await;
        info!("Shutdown signal received");
        state.shutdown();

        // Give tasks a moment to clean up
        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
    });

    info!("Wanderers stopped");
    Ok(())
}

/// Setup config, create AppState, and spawn all background services.
async fn setup_and_spawn_services(args: &Args) -> anyhow::Result<Arc<AppState>> {
    // Load configuration
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    if let Some(ref points) = args.points {
        config.map.points_path = points.clone();
    }
    if let Some(count) = args.avatars {
        config.avatars.count = count;
    }
    if let Some(seed) = args.seed {
        config.motion.seed = Some(seed);
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }

    // Validate configuration
    config.validate()?;

    info!("Points file: {}", config.map.points_path.display());
    info!("Avatars: {}", config.avatars.count);
    info!("Motion mode: {:?}", config.motion.mode);
    info!("HTTP server: {}", config.http.enabled);

    let (state, commands_rx) = AppState::new(config.clone());

    // The frame loop starts right away; it idles until points arrive
    spawn_frame_loop(Arc::clone(&state), &config, commands_rx);

    // Load points once, in the background
    let points_state = Arc::clone(&state);
    let points_path = config.map.points_path.clone();
    tokio::spawn(async move {
        if let Err(e) = load_points(points_state, points_path).await {
            error!("Error loading points: {}", e);
        }
    });

    // Start HTTP server if enabled
    if config.http.enabled {
        let http_state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = run_http_server(http_state).await {
                error!("HTTP server error: {}", e);
            }
        });
    } else {
        info!("HTTP server disabled");
    }

    Ok(state)
}

fn spawn_frame_loop(state: Arc<AppState>, config: &Config, commands_rx: mpsc::Receiver<Command>) {
    let frame_loop = FrameLoop::new(config, commands_rx);
    tokio::spawn(frame_loop.run(state));
}

/// Read the points document and hand it to the frame loop. No retry.
async fn load_points(state: Arc<AppState>, path: PathBuf) -> anyhow::Result<()> {
    let store = PointStore::load(&path).await?;
    let count = state.config.read().await.avatars.count;
    state.assets.scan(count).await;
    state.set_points(store.to_document()).await;
    state.send(Command::LoadPoints(store)).await?;
    Ok(())
}

async fn run_http_server(state: Arc<AppState>) -> anyhow::Result<()> {
    let config = state.config.read().await.clone();

    // Map page, frame stream and images
    let browser_server = BrowserServer::new(state.clone(), &config);

    // JSON API
    let web_server = WebServer::new(state.clone(), &config.http);

    let addr = format!("{}:{}", config.http.host, config.http.port);
    info!("HTTP server listening on {}", addr);

    let app = web_server.router().merge(browser_server.router());

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let mut shutdown_rx = state.subscribe_shutdown();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
