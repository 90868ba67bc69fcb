//! Configuration system with embedded defaults and XDG-compliant paths.
//!
//! Boot sequence:
//! 1. Parse the embedded `default_config.toml` (compile-time guarantee it exists).
//! 2. Resolve `~/.config/reefview/config.toml` via the `directories` crate.
//! 3. If the user file doesn't exist, create the directory tree and write the default.
//! 4. Parse the user file (falling back to embedded defaults on any error).
//! 5. Store the resolved `Config` in a `OnceLock` for zero-cost global access.
//!
//! The UI layer calls `config::get()`; controllers receive their section by
//! value so they can be built in tests without touching the global.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use crossterm::event::KeyCode;
use ratatui::style::Color;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{info, warn};

/// Embedded default configuration — baked into the binary at compile time.
const DEFAULT_CONFIG_STR: &str = include_str!("../default_config.toml");

/// Application-wide config singleton.
static CONFIG: OnceLock<Config> = OnceLock::new();

// ─── Public API ─────────────────────────────────────────────────────────────

/// Initialise the configuration system.  Must be called exactly once at
/// startup, **after** tracing and before the first frame is drawn.
pub fn init() -> Result<()> {
    let config = load()?;
    CONFIG
        .set(config)
        .map_err(|_| eyre!("Config already initialised"))?;
    Ok(())
}

/// Return a static reference to the loaded configuration, or the built-in
/// defaults if `init()` has not run (unit tests render without a config file).
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

// ─── Loading logic ──────────────────────────────────────────────────────────

fn load() -> Result<Config> {
    // 1. Parse compiled-in defaults — the infallible baseline.
    let defaults: RawConfig = toml::from_str(DEFAULT_CONFIG_STR)
        .wrap_err("BUG: failed to parse embedded default_config.toml")?;

    // 2. Resolve user config path.
    let user_path = config_path();
    info!("Config path: {}", user_path.display());

    // 3. Bootstrap on first run.
    ensure_config_file(&user_path)?;

    // 4. Parse user file; fall back to embedded defaults on *any* error.
    let raw = match fs::read_to_string(&user_path) {
        Ok(contents) => match toml::from_str::<RawConfig>(&contents) {
            Ok(parsed) => {
                info!("Loaded user config from {}", user_path.display());
                parsed
            }
            Err(e) => {
                warn!(
                    "Parse error in {}: {e} — falling back to defaults",
                    user_path.display()
                );
                defaults
            }
        },
        Err(e) => {
            warn!(
                "Cannot read {}: {e} — falling back to defaults",
                user_path.display()
            );
            defaults
        }
    };

    Ok(Config::from(raw))
}

/// Resolve the XDG-compliant config file path.
fn config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "reefview")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".config/reefview/config.toml"))
}

/// Create the config directory tree and write the default file if absent.
fn ensure_config_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create config dir: {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_STR)
        .wrap_err_with(|| format!("Failed to write default config to {}", path.display()))?;
    info!("Created default config at {}", path.display());
    Ok(())
}

// ─── Hex colour helper ─────────────────────────────────────────────────────

/// Parse a `#RRGGBB` hex string into an RGB `Color`.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Newtype that serialises as `"#RRGGBB"` and deserialises from the same.
#[derive(Debug, Clone, Copy)]
pub struct HexColor(pub Color);

impl Default for HexColor {
    fn default() -> Self {
        HexColor(Color::Reset)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Color::Rgb(r, g, b) => s.serialize_str(&format!("#{r:02X}{g:02X}{b:02X}")),
            _ => s.serialize_str("#FFFFFF"),
        }
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(HexColor(parse_hex_color(&s).unwrap_or(Color::Reset)))
    }
}

// ─── Raw TOML structures (serde targets) ────────────────────────────────────
//
// Each struct carries `#[serde(default)]` so that missing keys or entire
// sections gracefully fill in from the compiled defaults.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawConfig {
    general: RawGeneral,
    carousel: RawCarousel,
    detail: RawDetail,
    theme: RawTheme,
    keybindings: RawKeybindings,
}

// ── General ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawGeneral {
    tick_rate_ms: u64,
    idle_timeout_secs: u64,
    data_path: String,
    default_language: String,
    languages: Vec<String>,
    allow_quit: bool,
}

impl Default for RawGeneral {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            idle_timeout_secs: 45,
            data_path: "data.json".into(),
            default_language: "en".into(),
            languages: vec!["en".into(), "es".into(), "fr".into()],
            allow_quit: true,
        }
    }
}

// ── Carousel ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawCarousel {
    card_width: u16,
    card_gap: u16,
    inset: u16,
    active_threshold: f32,
    wheel_step: u16,
    smooth_scroll_speed: f32,
    progress_height: u16,
}

impl Default for RawCarousel {
    fn default() -> Self {
        Self {
            card_width: 32,
            card_gap: 2,
            inset: 2,
            active_threshold: 0.7,
            wheel_step: 6,
            smooth_scroll_speed: 0.2,
            progress_height: 1,
        }
    }
}

// ── Detail ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawDetail {
    hero_percent: u16,
    fade_ratio: f32,
    scroll_step: u16,
}

impl Default for RawDetail {
    fn default() -> Self {
        Self {
            hero_percent: 45,
            fade_ratio: 0.7,
            scroll_step: 2,
        }
    }
}

// ── Theme ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawTheme {
    palette: RawPalette,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawPalette {
    accent_primary: HexColor,
    accent_secondary: HexColor,
    text_primary: HexColor,
    text_dim: HexColor,
    hero: HexColor,
    background: HexColor,
    progress: HexColor,
}

impl Default for RawPalette {
    fn default() -> Self {
        Self {
            accent_primary: HexColor(Color::Rgb(64, 200, 224)),
            accent_secondary: HexColor(Color::Rgb(255, 160, 90)),
            text_primary: HexColor(Color::Rgb(230, 240, 245)),
            text_dim: HexColor(Color::Rgb(120, 140, 160)),
            hero: HexColor(Color::Rgb(16, 72, 110)),
            background: HexColor(Color::Rgb(6, 20, 34)),
            progress: HexColor(Color::Rgb(64, 200, 224)),
        }
    }
}

// ── Keybindings ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawKeybindings {
    quit: String,
    swipe_left: String,
    swipe_right: String,
    open: String,
    close: String,
    scroll_up: String,
    scroll_down: String,
}

impl Default for RawKeybindings {
    fn default() -> Self {
        Self {
            quit: "q".into(),
            swipe_left: "Left".into(),
            swipe_right: "Right".into(),
            open: "Enter".into(),
            close: "Esc".into(),
            scroll_up: "Up".into(),
            scroll_down: "Down".into(),
        }
    }
}

// ─── Resolved runtime config ────────────────────────────────────────────────
//
// These are the structs the rest of the app interacts with.  All values are
// validated, clamped, and ready to use — no further parsing at render time.

/// Fully resolved, runtime-ready configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub general: GeneralConfig,
    pub carousel: CarouselConfig,
    pub detail: DetailConfig,
    pub theme: ThemeConfig,
    pub keys: KeybindingsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config::from(RawConfig::default())
    }
}

#[derive(Debug, Clone)]
pub struct GeneralConfig {
    pub tick_rate_ms: u64,
    pub idle_timeout: Duration,
    pub data_path: PathBuf,
    pub default_language: String,
    /// Languages offered by the selector, in button order.
    pub languages: Vec<String>,
    pub allow_quit: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    pub card_width: u16,
    pub card_gap: u16,
    pub inset: u16,
    pub active_threshold: f32,
    pub wheel_step: u16,
    /// Fraction of the remaining distance covered per tick.
    pub smooth_scroll_speed: f32,
    pub progress_height: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailConfig {
    /// Hero height as a share of the detail view.
    pub hero_percent: u16,
    /// Hero is fully faded after scrolling this share of its height.
    pub fade_ratio: f32,
    pub scroll_step: u16,
}

#[derive(Debug, Clone)]
pub struct ThemeConfig {
    pub palette: Palette,
}

/// Resolved colour palette — every field is a ready-to-use `Color`.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent_primary: Color,
    pub accent_secondary: Color,
    pub text_primary: Color,
    pub text_dim: Color,
    pub hero: Color,
    pub background: Color,
    pub progress: Color,
}

/// Pre-parsed keybindings — each field is a `KeyCode` ready for matching.
#[derive(Debug, Clone)]
pub struct KeybindingsConfig {
    pub quit: KeyCode,
    pub swipe_left: KeyCode,
    pub swipe_right: KeyCode,
    pub open: KeyCode,
    pub close: KeyCode,
    pub scroll_up: KeyCode,
    pub scroll_down: KeyCode,
}

// ─── Raw → Resolved conversion ─────────────────────────────────────────────

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let languages = valid_languages(raw.general.languages);
        let default_language = if is_language_code(&raw.general.default_language) {
            raw.general.default_language
        } else {
            warn!(
                "Invalid default_language \"{}\"; using \"en\"",
                raw.general.default_language
            );
            "en".to_string()
        };

        Self {
            general: GeneralConfig {
                tick_rate_ms: raw.general.tick_rate_ms.clamp(4, 200),
                idle_timeout: Duration::from_secs(raw.general.idle_timeout_secs.clamp(5, 3600)),
                data_path: PathBuf::from(raw.general.data_path),
                default_language,
                languages,
                allow_quit: raw.general.allow_quit,
            },
            carousel: CarouselConfig {
                card_width: raw.carousel.card_width.clamp(8, 120),
                card_gap: raw.carousel.card_gap.min(20),
                inset: raw.carousel.inset.min(20),
                active_threshold: raw.carousel.active_threshold.clamp(0.05, 1.0),
                wheel_step: raw.carousel.wheel_step.clamp(1, 60),
                smooth_scroll_speed: raw.carousel.smooth_scroll_speed.clamp(0.01, 1.0),
                progress_height: raw.carousel.progress_height.clamp(1, 3),
            },
            detail: DetailConfig {
                hero_percent: raw.detail.hero_percent.clamp(10, 90),
                fade_ratio: raw.detail.fade_ratio.clamp(0.05, 1.0),
                scroll_step: raw.detail.scroll_step.clamp(1, 20),
            },
            theme: ThemeConfig {
                palette: Palette {
                    accent_primary: raw.theme.palette.accent_primary.0,
                    accent_secondary: raw.theme.palette.accent_secondary.0,
                    text_primary: raw.theme.palette.text_primary.0,
                    text_dim: raw.theme.palette.text_dim.0,
                    hero: raw.theme.palette.hero.0,
                    background: raw.theme.palette.background.0,
                    progress: raw.theme.palette.progress.0,
                },
            },
            keys: KeybindingsConfig {
                quit: parse_key(&raw.keybindings.quit),
                swipe_left: parse_key(&raw.keybindings.swipe_left),
                swipe_right: parse_key(&raw.keybindings.swipe_right),
                open: parse_key(&raw.keybindings.open),
                close: parse_key(&raw.keybindings.close),
                scroll_up: parse_key(&raw.keybindings.scroll_up),
                scroll_down: parse_key(&raw.keybindings.scroll_down),
            },
        }
    }
}

/// `en`, `pt-BR`, `haw` style tags.
fn is_language_code(s: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-z]{2,3}(-[A-Z]{2})?$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}

/// Keep well-formed, distinct language codes; never return an empty list.
fn valid_languages(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for code in raw {
        if !is_language_code(&code) {
            warn!("Invalid language code \"{code}\" in config; ignoring");
        } else if !out.contains(&code) {
            out.push(code);
        }
    }
    if out.is_empty() {
        out.push("en".to_string());
    }
    out
}

/// Parse a human-readable key name into a crossterm `KeyCode`.
fn parse_key(s: &str) -> KeyCode {
    let mut chars = s.chars();
    match (s, chars.next(), chars.next()) {
        ("Enter", ..) => KeyCode::Enter,
        ("Esc", ..) => KeyCode::Esc,
        ("Tab", ..) => KeyCode::Tab,
        ("Backspace", ..) => KeyCode::Backspace,
        ("Space", ..) => KeyCode::Char(' '),
        ("Up", ..) => KeyCode::Up,
        ("Down", ..) => KeyCode::Down,
        ("Left", ..) => KeyCode::Left,
        ("Right", ..) => KeyCode::Right,
        ("Home", ..) => KeyCode::Home,
        ("End", ..) => KeyCode::End,
        ("PageUp", ..) => KeyCode::PageUp,
        ("PageDown", ..) => KeyCode::PageDown,
        (_, Some(c), None) => KeyCode::Char(c),
        (other, ..) => {
            warn!("Unknown keybinding \"{other}\" in config; ignoring");
            KeyCode::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse_and_match_code_defaults() {
        let raw: RawConfig = toml::from_str(DEFAULT_CONFIG_STR).unwrap();
        let from_file = Config::from(raw);
        let builtin = Config::default();
        assert_eq!(from_file.general.idle_timeout, Duration::from_secs(45));
        assert_eq!(from_file.general.languages, builtin.general.languages);
        assert_eq!(from_file.carousel, builtin.carousel);
        assert_eq!(from_file.detail, builtin.detail);
    }

    #[test]
    fn partial_file_fills_in_defaults_and_clamps() {
        let raw: RawConfig = toml::from_str(
            "[general]\nidle_timeout_secs = 1\nlanguages = [\"en\", \"EN!\", \"de\", \"de\"]\n",
        )
        .unwrap();
        let config = Config::from(raw);
        assert_eq!(config.general.idle_timeout, Duration::from_secs(5));
        assert_eq!(config.general.languages, ["en", "de"]);
        assert_eq!(config.carousel.active_threshold, 0.7);
    }

    #[test]
    fn language_codes() {
        assert!(is_language_code("en"));
        assert!(is_language_code("pt-BR"));
        assert!(!is_language_code("english"));
        assert_eq!(valid_languages(vec!["???".into()]), ["en"]);
    }

    #[test]
    fn key_names() {
        assert_eq!(parse_key("Esc"), KeyCode::Esc);
        assert_eq!(parse_key("x"), KeyCode::Char('x'));
        assert_eq!(parse_key("é"), KeyCode::Char('é'));
        assert_eq!(parse_key("Nope"), KeyCode::Null);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#F9E814"), Some(Color::Rgb(0xF9, 0xE8, 0x14)));
        assert_eq!(parse_hex_color("zzzzzz"), None);
        assert_eq!(parse_hex_color("#fff"), None);
    }
}
