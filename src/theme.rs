//! "Reef" colour palette and composite styles.
//!
//! Colours come from the `[theme.palette]` config section; status colours
//! come from the compiled-in status scale and are parsed here.

use ratatui::style::{Color, Modifier, Style};

use crate::config::{self, parse_hex_color, Palette};

fn palette() -> &'static Palette {
    &config::get().theme.palette
}

// ─── Composite styles ───────────────────────────────────────────────────────

/// Title / header style.
pub fn title() -> Style {
    Style::default()
        .fg(palette().accent_primary)
        .add_modifier(Modifier::BOLD)
}

/// Body text.
pub fn text() -> Style {
    Style::default().fg(palette().text_primary)
}

/// Dimmed / secondary label.
pub fn dim() -> Style {
    Style::default().fg(palette().text_dim)
}

/// Section headings in the detail view.
pub fn heading() -> Style {
    Style::default()
        .fg(palette().accent_secondary)
        .add_modifier(Modifier::BOLD)
}

/// Card border while the card is the active one.
pub fn card_active() -> Style {
    Style::default()
        .fg(palette().accent_secondary)
        .add_modifier(Modifier::BOLD)
}

pub fn card_inactive() -> Style {
    Style::default().fg(palette().text_dim)
}

/// Selected language button.
pub fn language_selected() -> Style {
    Style::default()
        .fg(palette().background)
        .bg(palette().accent_primary)
        .add_modifier(Modifier::BOLD)
}

pub fn language_idle() -> Style {
    Style::default().fg(palette().accent_primary)
}

/// Close / back affordance.
pub fn close_button() -> Style {
    Style::default()
        .fg(palette().background)
        .bg(palette().accent_secondary)
        .add_modifier(Modifier::BOLD)
}

pub fn progress() -> Style {
    Style::default().fg(palette().progress)
}

pub fn border() -> Style {
    Style::default().fg(palette().accent_primary)
}

// ─── Hero fade ──────────────────────────────────────────────────────────────

/// Hero background at `opacity`, blended into the page background.
pub fn hero_background(opacity: f32) -> Color {
    blend(palette().hero, palette().background, opacity)
}

/// Hero overlay text at `opacity`.
pub fn hero_text(opacity: f32) -> Color {
    blend(palette().text_primary, palette().background, opacity)
}

/// Linear mix of `fg` over `bg`. Non-RGB colours snap at the midpoint.
pub fn blend(fg: Color, bg: Color, opacity: f32) -> Color {
    let t = opacity.clamp(0.0, 1.0);
    match (fg, bg) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| (f32::from(b) + (f32::from(a) - f32::from(b)) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t >= 0.5 => fg,
        _ => bg,
    }
}

// ─── Status colours ─────────────────────────────────────────────────────────

/// Colour of a status descriptor (`#RRGGBB`).
pub fn status_color(hex: &str) -> Color {
    parse_hex_color(hex).unwrap_or(Color::Reset)
}

/// Readable text on top of `bg`: dark on light colours, light on dark ones.
pub fn contrast_on(bg: Color) -> Color {
    match bg {
        Color::Rgb(r, g, b) => {
            let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
            if luma > 140.0 {
                Color::Black
            } else {
                Color::White
            }
        }
        _ => Color::White,
    }
}

/// Filled badge for a status colour.
pub fn badge(hex: &str) -> Style {
    let bg = status_color(hex);
    Style::default()
        .fg(contrast_on(bg))
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

// ─── Spinner frames ─────────────────────────────────────────────────────────

/// Braille-dot spinner frames for the loading animation.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Get the current spinner frame for a given tick count.
pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints() {
        let fg = Color::Rgb(200, 100, 0);
        let bg = Color::Rgb(0, 0, 100);
        assert_eq!(blend(fg, bg, 1.0), fg);
        assert_eq!(blend(fg, bg, 0.0), bg);
        assert_eq!(blend(fg, bg, 0.5), Color::Rgb(100, 50, 50));
        assert_eq!(blend(Color::Red, bg, 0.2), bg);
    }

    #[test]
    fn badge_text_stays_readable() {
        assert_eq!(contrast_on(status_color("#F9E814")), Color::Black);
        assert_eq!(contrast_on(status_color("#000000")), Color::White);
    }
}
