//! Top-level UI render dispatch.
//!
//! Splits the terminal frame into four regions:
//! - Header (top, 3 lines): title + language selector
//! - Carousel (middle, fills the rest)
//! - Progress bar + key hints (bottom)
//! - Detail overlay (full screen, on top of everything while open)

pub mod carousel;
pub mod detail;
pub mod header;
pub mod key_bar;
pub mod layout;
pub mod progress;
pub mod spinner;

use ratatui::Frame;

use crate::app::{Kiosk, LoadState};
use crate::i18n;
use layout::KioskLayout;

/// Render the entire UI.
pub fn render(frame: &mut Frame, kiosk: &Kiosk) {
    let layout = KioskLayout::compute(frame.area(), kiosk);

    header::render(frame, kiosk, &layout);

    if kiosk.load_state == LoadState::Pending {
        let label = i18n::labels(&kiosk.session.language).loading;
        spinner::render(frame, kiosk.tick_count, layout.carousel, label);
    } else {
        carousel::render(frame, kiosk, layout.carousel);
    }

    progress::render(frame, kiosk.progress_bar, layout.progress);
    key_bar::render(frame, kiosk, layout.key_bar);

    // ── Detail overlay (rendered last so it's on top) ───────────────────
    if let (Some(view), Some(geometry)) = (kiosk.detail.view(), layout.detail) {
        detail::render(frame, kiosk, view, &geometry, &layout.languages);
    }
}
