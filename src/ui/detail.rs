//! Full-screen detail overlay.
//!
//! The scrollable body is the hero block (exactly `hero_height` rows)
//! followed by the wrapped text: fact sections and the status widget. Both
//! move with the same scroll offset; `content_height` gives the combined row
//! count that `Kiosk::sync_layout` clamps scrolling against.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Padding, Paragraph, Widget, Wrap};
use ratatui::Frame;

use crate::app::Kiosk;
use crate::detail::{DetailView, Hero, StatusWidget};
use crate::theme;
use crate::ui::layout::DetailLayout;
use crate::ui::{header, key_bar};

const TEXT_MARGIN: Margin = Margin {
    horizontal: 2,
    vertical: 0,
};

pub fn render(
    frame: &mut Frame,
    kiosk: &Kiosk,
    view: &DetailView,
    geometry: &DetailLayout,
    languages: &[(String, Rect)],
) {
    frame.render_widget(Clear, geometry.area);

    // ── Close bar ───────────────────────────────────────────────────────
    if let Some(button) = kiosk.detail.close_button() {
        let close = Paragraph::new(Line::from(button.label))
            .alignment(Alignment::Center)
            .style(theme::close_button());
        frame.render_widget(close, geometry.close);
    }
    header::language_buttons(frame, kiosk, languages);

    let hint_x = geometry.close.right();
    let hint_end = languages
        .first()
        .map(|(_, rect)| rect.x.saturating_sub(1))
        .unwrap_or(geometry.area.right());
    let hint_area = Rect::new(
        hint_x,
        geometry.close.y,
        hint_end.saturating_sub(hint_x),
        geometry.close.height,
    );
    if !hint_area.is_empty() {
        let keys = kiosk.keys();
        let hints = Line::from(vec![
            Span::styled(
                format!("{}/{}", key_bar::label(keys.scroll_up), key_bar::label(keys.scroll_down)),
                theme::title(),
            ),
            Span::styled(" Scroll  ", theme::dim()),
            Span::styled(key_bar::label(keys.close), theme::title()),
            Span::styled(" Back ", theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(hints).alignment(Alignment::Right), hint_area);
    }

    // ── Scrollable body ─────────────────────────────────────────────────
    let body = geometry.body;
    let scroll = kiosk.detail.scroll_top();
    let hero_visible = geometry
        .hero_height
        .saturating_sub(scroll)
        .min(body.height);

    if hero_visible > 0 {
        let hero = hero_buffer(&view.hero, body.width, geometry.hero_height);
        let buf = frame.buffer_mut();
        for y in 0..hero_visible {
            for x in 0..body.width {
                buf[(body.x + x, body.y + y)] = hero[(x, scroll + y)].clone();
            }
        }
    }

    let text_area = Rect {
        y: body.y + hero_visible,
        height: body.height - hero_visible,
        ..body
    }
    .inner(TEXT_MARGIN);
    let text = text_paragraph(view).scroll((scroll.saturating_sub(geometry.hero_height), 0));
    frame.render_widget(text, text_area);
}

/// Rows the body occupies at `width` columns: the hero plus the wrapped text.
pub fn content_height(view: &DetailView, width: u16, hero_height: u16) -> u16 {
    let text_width = width.saturating_sub(2 * TEXT_MARGIN.horizontal);
    let rows = text_paragraph(view).line_count(text_width);
    hero_height.saturating_add(u16::try_from(rows).unwrap_or(u16::MAX))
}

/// Image area with the name, summary and badge overlaid at the bottom. The
/// whole block fades into the page background with `hero.opacity`.
fn hero_buffer(hero: &Hero, width: u16, hero_height: u16) -> Buffer {
    let area = Rect::new(0, 0, width, hero_height);
    let mut buf = Buffer::empty(area);
    let fill = Style::default().bg(theme::hero_background(hero.opacity));
    let text = fill.fg(theme::hero_text(hero.opacity));

    let block = Block::default()
        .style(fill)
        .padding(Padding::horizontal(TEXT_MARGIN.horizontal));
    let inner = block.inner(area);
    block.render(area, &mut buf);
    if inner.is_empty() {
        return buf;
    }

    if !hero.image.is_empty() {
        let row = Rect::new(inner.x, inner.y + inner.height / 3, inner.width, 1);
        Paragraph::new(format!("[ {} ]", hero.image))
            .style(text.add_modifier(Modifier::DIM))
            .render(row, &mut buf);
    }

    let mut lines = Vec::with_capacity(3);
    if let Some(badge) = hero.badge {
        lines.push(Line::from(Span::styled(
            format!(" {} ", badge.label),
            theme::badge(badge.color),
        )));
    }
    lines.push(Line::styled(
        hero.name.clone(),
        text.add_modifier(Modifier::BOLD),
    ));
    if !hero.summary.is_empty() {
        lines.push(Line::styled(hero.summary.clone(), text));
    }
    let overlay = Paragraph::new(lines).wrap(Wrap { trim: false });

    // Anchor the overlay one row above the bottom edge; the top gets clipped
    // first when the hero is short.
    let rows = u16::try_from(overlay.line_count(inner.width)).unwrap_or(u16::MAX);
    let visible = rows.min(inner.height - 1);
    let overlay_area = Rect::new(inner.x, inner.bottom() - 1 - visible, inner.width, visible);
    overlay
        .scroll((rows - visible, 0))
        .render(overlay_area, &mut buf);
    buf
}

fn text_paragraph(view: &DetailView) -> Paragraph<'static> {
    Paragraph::new(text_lines(view)).wrap(Wrap { trim: false })
}

fn text_lines(view: &DetailView) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for section in &view.sections {
        lines.push(Line::raw(""));
        lines.push(Line::styled(section.title, theme::heading()));
        lines.extend(
            section
                .body
                .lines()
                .map(|line| Line::styled(line.to_string(), theme::text())),
        );
    }

    if let Some(status) = &view.status {
        lines.push(Line::raw(""));
        lines.extend(status_lines(status));
    }
    lines.push(Line::raw(""));
    lines
}

fn status_lines(status: &StatusWidget) -> Vec<Line<'static>> {
    let mut chips = Vec::with_capacity(status.scale.len() * 2);
    let mut marker = String::new();
    for entry in &status.scale {
        let chip = format!(" {} ", entry.code);
        let chip_width = chip.chars().count();
        if entry.active {
            chips.push(Span::styled(chip, theme::badge(entry.color)));
            let left = (chip_width - 1) / 2;
            marker.push_str(&" ".repeat(left));
            marker.push('▲');
            marker.push_str(&" ".repeat(chip_width - left - 1));
        } else {
            chips.push(Span::styled(
                chip,
                Style::default().fg(theme::status_color(entry.color)),
            ));
            marker.push_str(&" ".repeat(chip_width));
        }
        chips.push(Span::raw(" "));
        marker.push(' ');
    }

    let explanation = status.explanation;
    let accent = Style::default()
        .fg(theme::status_color(explanation.color))
        .add_modifier(Modifier::BOLD);

    vec![
        Line::styled(status.heading, theme::heading()),
        Line::from(chips),
        Line::styled(marker.trim_end().to_string(), accent),
        Line::styled(explanation.label, accent),
        Line::styled(explanation.description, theme::text()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::detail::DetailController;
    use crate::records::tests::sample_store;
    use crate::session::Session;

    fn open(id: &str) -> DetailView {
        let store = sample_store();
        let mut session = Session::new("en");
        let mut detail = DetailController::new(Config::default().detail);
        detail.open(&mut session, &store, id);
        detail.view().cloned().unwrap()
    }

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn hero_overlay_sits_above_the_bottom_edge() {
        let view = open("a2");
        let hero = hero_buffer(&view.hero, 40, 10);
        assert!(row_text(&hero, 3).contains("[ img/shark.jpg ]"));
        assert_eq!(row_text(&hero, 7).trim(), "Vulnerable");
        assert_eq!(row_text(&hero, 8).trim(), "Shark");
        assert_eq!(row_text(&hero, 9).trim(), "");
    }

    #[test]
    fn faded_hero_uses_page_background() {
        let mut view = open("a1");
        let bright = hero_buffer(&view.hero, 20, 4)[(0, 0)].bg;
        view.hero.opacity = 0.0;
        let faded = hero_buffer(&view.hero, 20, 4)[(0, 0)].bg;
        assert_eq!(bright, theme::hero_background(1.0));
        assert_eq!(faded, theme::hero_background(0.0));
        assert_ne!(bright, faded);
    }

    #[test]
    fn short_hero_does_not_panic() {
        let view = open("a2");
        for height in 0..3 {
            hero_buffer(&view.hero, 8, height);
        }
        hero_buffer(&view.hero, 3, 5);
    }

    #[test]
    fn sections_in_order() {
        let view = open("a1");
        let text: Vec<String> = text_lines(&view).iter().map(plain).collect();
        assert_eq!(
            text,
            [
                "",
                "Fun Fact",
                "Lives in anemones.",
                "",
                "Habitat & Lifestyle",
                "Found in the Pacific.",
                "",
            ]
        );
    }

    #[test]
    fn content_height_counts_wrapped_rows() {
        let mut view = open("a1");
        assert_eq!(content_height(&view, 100, 5), 5 + 7);

        view.sections[0].body = "word ".repeat(40);
        let wide = content_height(&view, 400, 5);
        let narrow = content_height(&view, 24, 5);
        assert_eq!(wide, 5 + 7);
        assert!(narrow > wide, "narrow {narrow}, wide {wide}");
    }

    #[test]
    fn marker_sits_under_the_active_chip() {
        let view = open("a2");
        let text: Vec<String> = text_lines(&view).iter().map(plain).collect();
        let chips = text.iter().position(|l| l.contains(" LC ")).unwrap();
        assert_eq!(text[chips - 1], "Conservation Status");
        let vu = text[chips].find("VU").unwrap();
        assert_eq!(text[chips + 1].find('▲'), Some(vu));
        assert_eq!(text[chips + 2], "Vulnerable");
    }
}
