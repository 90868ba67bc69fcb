//! reefview: a touch-kiosk species carousel for the terminal.
//!
//! Architecture:
//! - **UI task** (main): runs the ratatui render loop and applies every input
//!   to the `Kiosk` state, one handler at a time.
//! - **Fetch task** (tokio): reads the record source once and reports back
//!   over an `mpsc` channel. Until it does, the carousel stays empty.
//!
//! The fetch task never touches the terminal; the UI never blocks on IO.

mod app;
mod carousel;
mod config;
mod detail;
mod event;
mod i18n;
mod idle;
mod language;
mod records;
mod session;
mod source;
mod status;
mod theme;
mod tui;
mod ui;
mod visibility;
mod wiring;

use std::time::Instant;

use color_eyre::Result;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{AppAction, Kiosk};
use event::Event;

#[tokio::main]
async fn main() -> Result<()> {
    // ── Error handling & logging ─────────────────────────────────────────
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr) // TUI owns stdout; logs go to stderr
        .init();

    info!("reefview starting");
    config::init()?;
    let cfg = config::get();

    // ── Spawn record fetch ──────────────────────────────────────────────
    let (records_tx, records_rx) = mpsc::channel(1);
    source::spawn_fetch(cfg.general.data_path.clone(), records_tx);

    // ── Initialise terminal ─────────────────────────────────────────────
    let mut terminal = tui::init()?;

    // ── Kiosk state ─────────────────────────────────────────────────────
    let mut kiosk = Kiosk::new(cfg);
    let mut events = event::EventHandler::new(cfg.general.tick_rate_ms, records_rx);
    let size = terminal.size()?;
    kiosk.sync_layout(Rect::new(0, 0, size.width, size.height));

    // ── Main event loop ─────────────────────────────────────────────────
    while kiosk.running {
        // Render.
        terminal.draw(|frame| ui::render(frame, &kiosk))?;

        // Await next event (input / tick / records / idle).
        match events.next(kiosk.idle_deadline()).await? {
            Event::Key(key) => {
                if kiosk.handle_key(key, Instant::now()) == AppAction::Quit {
                    kiosk.running = false;
                }
            }
            Event::Mouse(mouse) => {
                kiosk.handle_mouse(mouse, Instant::now());
            }
            Event::Resize(width, height) => {
                kiosk.sync_layout(Rect::new(0, 0, width, height));
            }
            Event::Tick => {
                kiosk.on_tick();
                kiosk.poll_idle(Instant::now());
            }
            Event::Records(outcome) => {
                kiosk.records_loaded(outcome, Instant::now());
            }
            Event::IdleDeadline => {
                kiosk.poll_idle(Instant::now());
            }
        }
    }

    // ── Cleanup ─────────────────────────────────────────────────────────
    tui::restore()?;
    info!("reefview exiting");
    Ok(())
}
