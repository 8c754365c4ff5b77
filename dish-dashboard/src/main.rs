//! Dish Dashboard
//!
//! Terminal front end for the dish manager service:
//! - initial fetch of the dish list
//! - live updates over the push channel, reconnecting on its own
//! - optimistic publish/unpublish toggles from the console

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::sync::watch;
use tracing::{error, info};

use dish_core::config::load_environment;
use dish_core::{DashboardConfig, DashboardState};
use dish_sync::{HttpDishApi, SyncConfig, SyncController, WsPushConnector};

mod console;
mod render;
mod view;

use view::DashboardView;

#[derive(Parser, Debug)]
#[command(name = "dish-dashboard")]
#[command(about = "Live dish list with publish toggles")]
struct Args {
    /// Base URL of the dish service REST API
    #[arg(long)]
    service_url: Option<String>,

    /// WebSocket URL of the push channel
    #[arg(long)]
    push_url: Option<String>,

    /// Seconds to wait before reconnecting a closed push channel
    #[arg(long)]
    reconnect_secs: Option<u64>,

    /// Fetch and print the list once, without the push channel
    #[arg(long)]
    once: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn resolve_config(&self) -> Result<DashboardConfig> {
        let mut config = DashboardConfig::from_env()?;

        if let Some(url) = &self.service_url {
            config.service_url = url.clone();
        }
        if let Some(url) = &self.push_url {
            config.push_url = url.clone();
        }
        if let Some(secs) = self.reconnect_secs {
            config.reconnect_delay = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Load environment from /etc/dish-dashboard/environment (if exists).
    // Must run before any worker thread exists.
    load_environment();

    let args = Args::parse();
    build_runtime()?.block_on(run(args))
}

fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

async fn run(args: Args) -> Result<()> {
    // Logs go to stderr; stdout belongs to the dashboard
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("dish_dashboard=info".parse()?)
        .add_directive("dish_sync=info".parse()?);
    if args.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = args.resolve_config()?;
    info!(
        "Using dish service at {} (push channel {})",
        config.service_url, config.push_url
    );

    let api = Arc::new(HttpDishApi::from_config(&config)?);
    let connector = Arc::new(WsPushConnector::from_config(&config));
    let controller = SyncController::new(api, connector, SyncConfig::from(&config));

    if args.once {
        controller.load_initial().await;
        let view = DashboardView::from_state(&controller.store().snapshot());
        print!("{}", render::render(&view));
        return Ok(());
    }

    controller.start();
    let renderer = tokio::spawn(render_loop(controller.store().subscribe()));
    println!("{}", console::USAGE);

    let input = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = console::run(&controller, input, std::io::stdout()) => {
            if let Err(e) = result {
                error!("Console input failed: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
        }
    }

    controller.shutdown().await;
    renderer.abort();
    Ok(())
}

/// Redraw the dashboard on every state change
async fn render_loop(mut state: watch::Receiver<DashboardState>) {
    loop {
        let text = render::render(&DashboardView::from_state(&state.borrow_and_update()));
        {
            let mut stdout = std::io::stdout().lock();
            let _ = write!(stdout, "\n{}", text);
            let _ = stdout.flush();
        }

        if state.changed().await.is_err() {
            break;
        }
    }
}
