//! Trackboard TUI entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use trackboard_core::TrackerApi;
use trackboard_tui::api_client::RestClient;
use trackboard_tui::config::TuiConfig;
use trackboard_tui::error::TuiError;
use trackboard_tui::events::TuiEvent;
use trackboard_tui::logging::init_logging;
use trackboard_tui::persistence;
use trackboard_tui::state::App;
use trackboard_tui::views::render_view;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    init_logging(&config)?;
    tracing::info!(api = %config.api_base_url, "Starting trackboard");

    let api: Arc<dyn TrackerApi> = Arc::new(RestClient::new(&config)?);
    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);

    let mut app = App::new(config, api, event_tx.clone());
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.restore(state),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable UI state"),
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    spawn_input_reader(event_tx.clone());
    app.start();

    let period = Duration::from_millis(app.config.refresh_interval_ms);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.handle_event(TuiEvent::Tick);
            }
            Some(event) = event_rx.recv() => {
                if app.handle_event(event) {
                    break;
                }
            }
        }
    }

    if let Err(err) = persistence::save(&app.config.persistence_path, &app.persisted_state()) {
        tracing::warn!(error = %err, "Failed to save UI state");
    }
    tracing::info!("Shutting down");

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let event = match evt {
                    CrosstermEvent::Key(key) => TuiEvent::Input(key),
                    CrosstermEvent::Resize(width, height) => TuiEvent::Resize { width, height },
                    _ => continue,
                };
                if sender.blocking_send(event).is_err() {
                    break;
                }
            }
        }
    });
}
