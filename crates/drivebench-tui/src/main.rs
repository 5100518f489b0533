//! Drivebench - terminal upload workbench for a simulated cloud drive
//!
//! Built with Ratatui and crossterm.

mod app;
mod config;
mod files;
mod handlers;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use drivebench_core::{DriveClient, MockStore, SeededRandom, SimulatedDriveClient, Workbench};
use ratatui::prelude::*;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::{App, AppState};
use config::Config;

/// Drivebench - browse a simulated drive and upload images to it
#[derive(Parser, Debug)]
#[command(name = "drivebench")]
#[command(about = "A terminal upload workbench for a simulated cloud drive")]
struct Args {
    /// Path to a config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the simulator's progress and failure rolls
    #[arg(long)]
    seed: Option<u64>,

    /// File that receives log output
    #[arg(long, default_value = "drivebench.log")]
    log_file: PathBuf,

    /// Image files to queue on startup
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to a file so they do not tear the TUI
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("Failed to create log file: {}", args.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("drivebench=info".parse()?)
                .add_directive("drivebench_core=info".parse()?),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let config = Config::load(args.config)?;
    let settings = config.simulation.sanitized();
    tracing::info!("Starting Drivebench with {:?}", settings);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let store = if settings.seed_demo_data {
        MockStore::with_demo_data()
    } else {
        MockStore::new()
    };
    let mut client = SimulatedDriveClient::new(Arc::new(store), settings);
    if let Some(seed) = args.seed {
        client = client.with_random(Arc::new(SeededRandom::new(seed)));
    }
    let client: Arc<dyn DriveClient> = Arc::new(client);
    let workbench = Arc::new(Workbench::new(client));

    let mut app = App::new(workbench, runtime.handle().clone());
    if !args.files.is_empty() {
        app.add_files(&args.files);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let tick_rate = Duration::from_millis(config.tick_rate_ms.max(10));
    let result = run_app(&mut terminal, &mut app, tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // In-flight intents are abandoned on exit
    runtime.shutdown_timeout(Duration::from_millis(200));

    if let Err(e) = result {
        tracing::error!("Exited with error: {:#}", e);
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        app.drain_events();
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll with a timeout so background progress keeps redrawing
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handlers::handle_key(app, key) {
                    break;
                }
            }
        }

        if matches!(app.state, AppState::Quit) {
            break;
        }
    }

    Ok(())
}
