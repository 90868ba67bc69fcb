//! Terminal lifecycle management.
//!
//! Handles entering/leaving the alternate screen, raw mode and mouse capture,
//! and installs a panic hook that restores the terminal before printing the
//! report. An unattended kiosk must never be left in a broken terminal.

use std::io::{stdout, Stdout};

use color_eyre::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Convenience alias.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enter the alternate screen, enable raw mode and mouse capture, and install
/// the panic hook.
pub fn init() -> Result<Tui> {
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    enable_raw_mode()?;
    install_panic_hook();
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

/// Leave the alternate screen and disable raw mode and mouse capture.
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal *before* printing the
/// default panic message. Without this, a panic leaves raw mode active and
/// the alternate screen visible, making the error unreadable.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort restore — ignore errors since we're already panicking.
        let _ = restore();
        original_hook(panic_info);
    }));
}
