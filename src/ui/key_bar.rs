//! Persistent key instruction bar at the bottom of the screen.
//!
//! Shows the configured keybindings for whichever surface is in front:
//! the carousel or the detail view.

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::Kiosk;
use crate::theme;

/// Render the key-hint bar into the given area.
pub fn render(frame: &mut Frame, kiosk: &Kiosk, area: Rect) {
    // The detail overlay covers this row; nothing to show underneath it.
    if kiosk.detail.is_open() {
        return;
    }
    let line = Line::from(carousel_hints(kiosk));
    frame.render_widget(Paragraph::new(line), area);
}

/// Key style: accented, bold.
fn key(s: String) -> Span<'static> {
    Span::styled(s, theme::title())
}

/// Description style: dimmed.
fn desc(s: &'static str) -> Span<'static> {
    Span::styled(s, theme::dim())
}

/// Separator between groups.
fn sep() -> Span<'static> {
    Span::styled("  │  ", theme::border())
}

/// Short on-screen name for a key.
pub fn label(code: KeyCode) -> String {
    match code {
        KeyCode::Left => "←".into(),
        KeyCode::Right => "→".into(),
        KeyCode::Up => "↑".into(),
        KeyCode::Down => "↓".into(),
        KeyCode::Enter => "⏎".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        other => format!("{other:?}"),
    }
}

fn carousel_hints(kiosk: &Kiosk) -> Vec<Span<'static>> {
    let keys = kiosk.keys();
    let mut hints = vec![
        Span::raw(" "),
        key(format!("{}/{}", label(keys.swipe_left), label(keys.swipe_right))),
        desc(" Swipe "),
        sep(),
        key(label(keys.open)),
        desc(" Open "),
    ];

    let slots = kiosk.languages.supported().len();
    if slots > 0 {
        hints.push(sep());
        let range = if slots == 1 {
            "1".to_string()
        } else {
            format!("1-{}", slots.min(9))
        };
        hints.push(key(range));
        hints.push(desc(" Language "));
    }

    if kiosk.allows_quit() {
        hints.push(sep());
        hints.push(key(label(keys.quit)));
        hints.push(desc(" Quit "));
    }
    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_render_as_glyphs() {
        assert_eq!(label(KeyCode::Left), "←");
        assert_eq!(label(KeyCode::Char('q')), "q");
        assert_eq!(label(KeyCode::Char(' ')), "Space");
    }
}
