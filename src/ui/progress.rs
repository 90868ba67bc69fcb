//! Thin scroll-progress bar under the carousel.

use ratatui::layout::Rect;
use ratatui::widgets::Gauge;
use ratatui::Frame;

use crate::theme;

/// `percent` is the carousel's published progress, `0.0..=100.0`.
pub fn render(frame: &mut Frame, percent: f32, area: Rect) {
    if area.is_empty() {
        return;
    }
    let ratio = f64::from(percent.clamp(0.0, 100.0)) / 100.0;
    let gauge = Gauge::default()
        .gauge_style(theme::progress())
        .ratio(ratio)
        .label("")
        .use_unicode(true);
    frame.render_widget(gauge, area);
}
