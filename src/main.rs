use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

mod app;
mod cli;
mod clock;
mod config;
mod error;
mod input;
mod logging;
mod models;
mod stopwatch;
mod store;
mod tracker;
mod transfer;
mod ui;

use app::App;
use config::Config;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let config = config::load_or_init()?;

    let data_dir = config.data_dir()?;
    if let Err(e) = logging::init(&data_dir, &config.log_filter) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    tracing::info!(target: "app", "starting with data dir {}", data_dir.display());

    if !cli::handle_cli(cli, &config)? {
        return Ok(());
    }

    let tracker = app::open_tracker(&config)?;
    let mut app = App::new(tracker, &config);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if config.mouse {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &config);

    // Restore the terminal
    disable_raw_mode()?;
    if config.mouse {
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    } else {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(target: "app", "board exited with error: {:?}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    config: &Config,
) -> Result<()> {
    let tick_rate = Duration::from_millis(config.tick_rate_ms);

    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !app.handle_key(key) {
                        tracing::info!(target: "app", "quit");
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }
}
