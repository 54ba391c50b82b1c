mod client;
mod compare;
mod config;
mod detector;
mod error;
mod filter;
mod state;
mod tui;
mod types;

#[cfg(test)]
mod test_support;

use std::io;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::client::BackendClient;
use crate::config::{Config, TICK_RATE_MS};
use crate::error::Result;
use crate::state::AppState;
use crate::tui::{handle_key, render, run_command, Command};

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&cfg) {
        eprintln!("Logging setup failed: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        eprintln!("Fatal error: {e}");
        std::process::exit(1);
    }
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(cfg: &Config) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(cfg: Config) -> Result<()> {
    let client = BackendClient::new(&cfg)?;
    info!(backend = %client.base_url(), "dashboard starting");

    let mut app = AppState::new();

    // Initial fetch before rendering
    app.refresh(&client).await;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &client).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("dashboard stopped");
    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    client: &BackendClient,
) -> Result<()> {
    let tick = Duration::from_millis(TICK_RATE_MS);

    loop {
        terminal.draw(|f| render(f, app))?;

        if !event::poll(tick)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key(app, key) {
            Command::Quit => return Ok(()),
            command if command.needs_backend() => {
                // Show the loading screen before blocking on the request.
                app.loading = true;
                terminal.draw(|f| render(f, app))?;
                run_command(app, client, command).await;
            }
            _ => {}
        }
    }
}
