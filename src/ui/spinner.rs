//! Animated loading spinner, centred in the carousel area.

use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme;

/// Render the spinner on the middle row of `area`.
pub fn render(frame: &mut Frame, tick: u64, area: Rect, label: &str) {
    if area.is_empty() {
        return;
    }
    let spinner_char = theme::spinner_frame(tick);
    let line = Line::from(vec![
        Span::styled(format!("{spinner_char} "), theme::title()),
        Span::styled(label.to_string(), theme::dim()),
    ]);

    let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
}
