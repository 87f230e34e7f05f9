//! Wirepad TUI
//!
//! A single shared text area with a connection indicator, mirroring the
//! web pad.
//!
//! ## Keys
//!
//! - i / Enter: start editing (inbound updates held off while you type)
//! - Esc: stop editing (inbound updates apply again)
//! - Ctrl-S: save the pad
//! - Ctrl-K: clear the pad (asks for confirmation)
//! - q (while not editing) or Ctrl-C: quit

mod app;
mod ui;

use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing_subscriber::EnvFilter;
use wirepad_core::SessionConfig;

use app::App;

/// Run the terminal pad against the given session config.
pub async fn run(config: SessionConfig) -> Result<()> {
    init_logging();

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(config);
    let result = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

/// Initialize logging (stderr, only if WIREPAD_LOG is set).
///
/// The TUI owns the screen, so logs stay off unless explicitly asked
/// for; redirect stderr to a file to capture them.
fn init_logging() {
    if std::env::var("WIREPAD_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_env("WIREPAD_LOG"))
            .with_writer(std::io::stderr)
            .try_init();
    }
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Apply whatever the sync session produced since the last frame,
        // in arrival order.
        while let Some(event) = app.session.try_event() {
            app.on_session_event(event);
        }

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Handle terminal events with a short timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                app.on_key(key.code, key.modifiers);
            }
        }

        if app.should_quit {
            app.session.shutdown();
            break;
        }
    }

    Ok(())
}
