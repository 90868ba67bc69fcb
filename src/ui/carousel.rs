//! Card strip.
//!
//! Each card is drawn into its own off-screen buffer at full size and then
//! the columns that fall inside the viewport are copied onto the frame, so a
//! card scrolled half out of view is clipped instead of squashed.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};
use ratatui::Frame;

use crate::app::Kiosk;
use crate::carousel::CardView;
use crate::theme;

/// Water pattern standing in for the card image.
const IMAGE_FILL: &str = "≈ ";

pub fn render(frame: &mut Frame, kiosk: &Kiosk, area: Rect) {
    if area.is_empty() {
        return;
    }
    let carousel = &kiosk.carousel;
    let offset = carousel.offset();
    let view_end = offset + u32::from(area.width);

    for (index, card) in carousel.cards().iter().enumerate() {
        let span = carousel.card_span(index);
        if span.end <= offset || span.start >= view_end {
            continue;
        }
        let Ok(width) = u16::try_from(span.len()) else {
            continue;
        };
        let card_area = Rect::new(0, 0, width, area.height);
        let mut card_buf = Buffer::empty(card_area);
        card_widget(card, area.height).render(card_area, &mut card_buf);

        let buf = frame.buffer_mut();
        for x in span.start.max(offset)..span.end.min(view_end) {
            let (Ok(src_x), Ok(dst_x)) = (u16::try_from(x - span.start), u16::try_from(x - offset))
            else {
                continue;
            };
            for y in 0..area.height {
                buf[(area.x + dst_x, area.y + y)] = card_buf[(src_x, y)].clone();
            }
        }
    }
}

fn card_widget(card: &CardView, height: u16) -> Paragraph<'static> {
    let border_style = if card.active {
        theme::card_active()
    } else {
        theme::card_inactive()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);

    // Border (2) + blank + name + hint.
    let image_rows = height.saturating_sub(5);
    let mut lines: Vec<Line<'static>> = Vec::with_capacity(usize::from(height));
    for row in 0..image_rows {
        if row == image_rows / 2 && !card.image.is_empty() {
            lines.push(Line::styled(format!("[ {} ]", card.image), theme::dim()));
        } else {
            lines.push(Line::styled(IMAGE_FILL.repeat(32), theme::dim()));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(card.name.clone(), theme::title())));
    lines.push(Line::from(Span::styled(card.hint, theme::dim())));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::config::Config;
    use crate::records::tests::sample_store;
    use crate::source::LoadOutcome;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn scrolled_card_is_clipped_at_the_left_edge() {
        let mut kiosk = Kiosk::new(&Config::default());
        kiosk.sync_layout(Rect::new(0, 0, 60, 20));
        kiosk.records_loaded(LoadOutcome::Loaded(sample_store()), Instant::now());
        let area = kiosk.layout().carousel;

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| render(frame, &kiosk, area)).unwrap();
        let top = row_text(terminal.backend().buffer(), area.y);
        // Inset of two columns, then the rounded corner of the first card.
        assert!(top.starts_with("  ╭"), "{top:?}");

        kiosk.carousel.scroll_by(10);
        terminal.draw(|frame| render(frame, &kiosk, area)).unwrap();
        let top = row_text(terminal.backend().buffer(), area.y);
        assert!(top.starts_with('─'), "{top:?}");
    }
}
