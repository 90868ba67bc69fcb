//! Unified event loop that merges crossterm terminal events, the record-load
//! channel, the idle deadline and a fixed-rate tick into a single async stream.
//!
//! The main loop awaits `EventHandler::next()` to process every source
//! without blocking the render path.

use std::time::{Duration, Instant};

use color_eyre::Result;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::source::LoadOutcome;

/// Unified event type consumed by the main loop.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed (only `Press` kind — ignores release/repeat on
    /// platforms that emit them).
    Key(KeyEvent),
    /// Pointer input: taps, drags, wheel.
    Mouse(MouseEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Animation / state tick.
    Tick,
    /// The startup record fetch finished.
    Records(LoadOutcome),
    /// The idle deadline passed.
    IdleDeadline,
}

/// Multiplexes crossterm events, a tick timer, the record channel and the idle
/// countdown into a single `Event` stream.
pub struct EventHandler {
    /// Async crossterm event reader.
    crossterm_stream: EventStream,
    /// Tick interval for animations.
    tick_interval: tokio::time::Interval,
    /// Receiver end of the fetch task → UI channel.
    records_rx: mpsc::Receiver<LoadOutcome>,
}

impl EventHandler {
    pub fn new(tick_ms: u64, records_rx: mpsc::Receiver<LoadOutcome>) -> Self {
        let mut tick_interval = tokio::time::interval(Duration::from_millis(tick_ms));
        // Don't try to "catch up" missed ticks — just keep going.
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        Self {
            crossterm_stream: EventStream::new(),
            tick_interval,
            records_rx,
        }
    }

    /// Await the next event from any source. `idle_deadline` is the current
    /// countdown, if armed.
    pub async fn next(&mut self, idle_deadline: Option<Instant>) -> Result<Event> {
        let idle = async {
            match idle_deadline {
                Some(deadline) => {
                    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await
                }
                None => std::future::pending().await,
            }
        };
        tokio::pin!(idle);

        loop {
            tokio::select! {
                // ── Record load (once) ──────────────────────────────────
                Some(outcome) = self.records_rx.recv() => {
                    return Ok(Event::Records(outcome));
                }

                // ── Idle countdown ──────────────────────────────────────
                _ = &mut idle => {
                    return Ok(Event::IdleDeadline);
                }

                // ── Terminal events ─────────────────────────────────────
                Some(ct_result) = self.crossterm_stream.next() => {
                    match ct_result? {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            return Ok(Event::Key(key));
                        }
                        CrosstermEvent::Mouse(mouse) => return Ok(Event::Mouse(mouse)),
                        CrosstermEvent::Resize(w, h) => return Ok(Event::Resize(w, h)),
                        // Swallow key release/repeat and focus/paste events.
                        _ => continue,
                    }
                }

                // ── Tick timer ──────────────────────────────────────────
                _ = self.tick_interval.tick() => {
                    return Ok(Event::Tick);
                }
            }
        }
    }
}
