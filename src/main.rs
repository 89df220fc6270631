mod app;
mod backend;
mod campaign;
mod config;
mod error;
mod export;
mod imaging;
mod logging;
mod selection;
mod trend;
mod ui;
mod venue;
mod worker;

use anyhow::{Context, Result};
use app::App;
use backend::HttpBackend;
use crate::config::AppConfig;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tracing::{error, info};

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logger()?;

    let config = AppConfig::load().context("loading configuration")?;
    info!(backend = %config.backend_url, policy = ?config.join_policy, "starting");
    let backend = Arc::new(HttpBackend::new(&config).context("building HTTP client")?);
    let mut app = App::new(config, backend);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "exiting with error");
    }
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.drain_events();
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                app.handle_key(key.code);
                if app.should_quit {
                    break;
                }
            }
        }
    }

    info!("bye");
    Ok(())
}
