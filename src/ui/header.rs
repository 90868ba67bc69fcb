//! Kiosk header: title on the left, language selector on the right.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::Kiosk;
use crate::theme;
use crate::ui::layout::KioskLayout;

const TITLE: &str = " ◆ Reef Explorer ";

pub fn render(frame: &mut Frame, kiosk: &Kiosk, layout: &KioskLayout) {
    let area = layout.header;
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(theme::border());
    frame.render_widget(block, area);

    if area.height >= 2 {
        let row = Rect::new(area.x, area.y + 1, area.width, 1);
        let count = kiosk.store.len();
        let line = Line::from(vec![
            Span::styled(TITLE, theme::title()),
            Span::styled("│ ", theme::dim()),
            Span::styled(format!("{count} species"), theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(line), row);
    }

    // Buttons are drawn after the title so they win where the two overlap.
    // While the detail view is open they live on its close bar instead.
    if layout.detail.is_none() {
        language_buttons(frame, kiosk, &layout.languages);
    }
}

/// Draw the language selector, highlighting the session language.
pub fn language_buttons(frame: &mut Frame, kiosk: &Kiosk, buttons: &[(String, Rect)]) {
    for (code, rect) in buttons {
        let style = if *code == kiosk.session.language {
            theme::language_selected()
        } else {
            theme::language_idle()
        };
        let label = Span::styled(format!(" {} ", code.to_uppercase()), style);
        frame.render_widget(Paragraph::new(Line::from(label)), *rect);
    }
}
