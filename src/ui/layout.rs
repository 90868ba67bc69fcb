//! Screen geometry shared by drawing and hit-testing.
//!
//! `KioskLayout::compute` is a pure function of the frame area and the kiosk
//! state, so the renderer and the mouse handler always agree on where things
//! are.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::text::Span;

use crate::app::Kiosk;
use crate::i18n;
use crate::wiring::Target;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KioskLayout {
    pub header: Rect,
    /// One button per selector language, left to right. They sit in the
    /// header, or on the close bar while the detail view is open.
    pub languages: Vec<(String, Rect)>,
    pub carousel: Rect,
    pub progress: Rect,
    pub key_bar: Rect,
    pub detail: Option<DetailLayout>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailLayout {
    pub area: Rect,
    pub close: Rect,
    /// Scrollable part below the close bar.
    pub body: Rect,
    pub hero_height: u16,
}

impl KioskLayout {
    pub fn compute(area: Rect, kiosk: &Kiosk) -> Self {
        let progress_height = kiosk.carousel.progress_height();
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),               // header
                Constraint::Min(0),                  // carousel
                Constraint::Length(progress_height), // progress bar
                Constraint::Length(1),               // key hints
            ])
            .split(area);

        let header = outer[0];
        let codes = kiosk.languages.supported();

        let detail = kiosk.detail.is_open().then(|| {
            let label = kiosk
                .detail
                .close_button()
                .map(|b| b.label)
                .unwrap_or(i18n::labels(&kiosk.session.language).back);
            let close_width = (Span::raw(label).width() as u16 + 4).min(area.width);
            let body = Rect {
                x: area.x,
                y: area.y.saturating_add(1),
                width: area.width,
                height: area.height.saturating_sub(1),
            };
            let hero_height =
                (u32::from(body.height) * u32::from(kiosk.detail.hero_percent()) / 100) as u16;
            DetailLayout {
                area,
                close: Rect::new(area.x, area.y, close_width, area.height.min(1)),
                body,
                hero_height,
            }
        });

        let languages = match &detail {
            Some(d) => language_buttons(
                Rect::new(
                    d.close.right(),
                    d.close.y,
                    d.area.right().saturating_sub(d.close.right()),
                    d.close.height,
                ),
                codes,
            ),
            None if header.height >= 2 => {
                language_buttons(Rect::new(header.x, header.y + 1, header.width, 1), codes)
            }
            None => Vec::new(),
        };

        Self {
            header,
            languages,
            carousel: outer[1],
            progress: outer[2],
            key_bar: outer[3],
            detail,
        }
    }

    /// What lies under the pointer. The detail view covers everything except
    /// the language buttons.
    pub fn hit_test(&self, kiosk: &Kiosk, column: u16, row: u16) -> Target {
        let pos = Position::new(column, row);

        if let Some((code, _)) = self.languages.iter().find(|(_, r)| r.contains(pos)) {
            return Target::LanguageButton(code.clone());
        }

        if let Some(detail) = &self.detail {
            if detail.close.contains(pos) {
                return Target::CloseButton;
            }
            if detail.body.contains(pos) {
                return Target::DetailView;
            }
            return Target::Body;
        }

        if self.carousel.contains(pos) {
            return match kiosk.carousel.card_at(column - self.carousel.x) {
                Some(id) => Target::Card(id.to_string()),
                None => Target::Carousel,
            };
        }
        Target::Body
    }
}

/// Right-aligned ` CODE ` buttons on the first line of `strip`.
fn language_buttons(strip: Rect, codes: &[String]) -> Vec<(String, Rect)> {
    if strip.is_empty() {
        return Vec::new();
    }
    let row = strip.y;
    let mut right = strip.x + strip.width.saturating_sub(1);
    let mut buttons = Vec::with_capacity(codes.len());
    for code in codes.iter().rev() {
        let width = code.chars().count() as u16 + 2;
        if right < strip.x + width {
            break;
        }
        right -= width;
        buttons.push((code.clone(), Rect::new(right, row, width, 1)));
        right = right.saturating_sub(1);
    }
    buttons.reverse();
    buttons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_buttons_are_right_aligned_in_order() {
        let strip = Rect::new(0, 1, 40, 1);
        let buttons = language_buttons(strip, &["en".into(), "es".into()]);
        assert_eq!(
            buttons,
            [
                ("en".to_string(), Rect::new(30, 1, 4, 1)),
                ("es".to_string(), Rect::new(35, 1, 4, 1)),
            ]
        );
    }

    #[test]
    fn buttons_that_do_not_fit_are_dropped() {
        let strip = Rect::new(0, 1, 6, 1);
        let buttons = language_buttons(strip, &["en".into(), "es".into()]);
        assert_eq!(buttons, [("es".to_string(), Rect::new(1, 1, 4, 1))]);
    }
}
