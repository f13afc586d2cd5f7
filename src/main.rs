//! Coindash - Crypto prices in the terminal or over HTTP
//!
//! Runs either an interactive terminal dashboard or a small JSON endpoint, both
//! backed by the same cached market-data feed.

use std::io;
use std::panic;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};

use coindash::app::App;
use coindash::cli::{Cli, Command};
use coindash::config::DashboardConfig;
use coindash::refresh::{LoadKind, RefreshHandle};
use coindash::{server, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Runs the terminal dashboard until the user quits
async fn run_dashboard(config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let cache = config.build_cache();
    let mut app = App::new(&config);
    let mut loader = RefreshHandle::new();
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(250));

    // Trigger initial data load
    app.begin_load();
    loader.spawn(cache.clone(), LoadKind::Initial);

    // Main event loop
    let result: Result<(), Box<dyn std::error::Error>> = loop {
        if let Err(err) = terminal.draw(|f| ui::render(f, &app)) {
            break Err(err.into());
        }

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Some(Ok(_)) => {}
                Some(Err(err)) => break Err(err.into()),
                None => break Ok(()),
            },
            Some(message) = loader.recv() => app.apply_refresh(message),
            _ = ticker.tick() => app.tick(),
        }

        if app.take_refresh_request() {
            loader.spawn(cache.clone(), LoadKind::Manual);
        }

        // Check if we should quit
        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match cli.to_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(2);
        }
    };

    match cli.command() {
        Command::Serve { .. } => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
            actix_web::rt::System::new().block_on(server::run(config))?;
        }
        Command::Tui => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_dashboard(config))?;
        }
    }

    Ok(())
}
