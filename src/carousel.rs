//! Horizontally scrolling card list.
//!
//! Owns the card view model, the scroll position (in columns) and the
//! intersection observer that marks cards "active". Drawing lives in
//! `ui::carousel`; this module only decides *what* is on screen.

use tracing::debug;

use crate::config::CarouselConfig;
use crate::i18n;
use crate::records::RecordStore;
use crate::visibility::{IntersectionObserver, Span};

/// One rendered card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: String,
    pub name: String,
    pub hint: &'static str,
    pub image: String,
    pub active: bool,
}

/// What the current card list was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderKey {
    language: String,
    record_ids: Vec<String>,
}

#[derive(Debug)]
pub struct Carousel {
    settings: CarouselConfig,
    cards: Vec<CardView>,
    key: Option<RenderKey>,
    rebuilds: u64,
    viewport_width: u16,
    offset: u32,
    /// Target offset of an in-flight smooth scroll.
    animation: Option<u32>,
    observer: IntersectionObserver,
    progress: f32,
}

impl Carousel {
    pub fn new(settings: CarouselConfig) -> Self {
        let observer = IntersectionObserver::new(settings.active_threshold);
        Self {
            settings,
            cards: Vec::new(),
            key: None,
            rebuilds: 0,
            viewport_width: 0,
            offset: 0,
            animation: None,
            observer,
            progress: 0.0,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    /// Build the card list for `language`. Returns `false` when the list
    /// already reflects exactly these records in this language.
    pub fn render(&mut self, store: &RecordStore, language: &str) -> bool {
        let key = RenderKey {
            language: language.to_string(),
            record_ids: store.iter().map(|r| r.id.clone()).collect(),
        };
        if self.key.as_ref() == Some(&key) {
            return false;
        }

        let hint = i18n::labels(language).tap_hint;
        self.cards = store
            .iter()
            .map(|record| CardView {
                id: record.id.clone(),
                name: record.name(language).to_string(),
                hint,
                image: record.image.clone(),
                active: false,
            })
            .collect();
        self.key = Some(key);
        self.rebuilds += 1;
        debug!("Carousel rebuilt: {} cards ({language})", self.cards.len());

        // Fresh elements: re-observe from scratch.
        self.observer.disconnect();
        self.offset = self.offset.min(self.max_offset());
        self.refresh();
        true
    }

    pub fn cards(&self) -> &[CardView] {
        &self.cards
    }

    /// Number of times the card list was actually rebuilt.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    // ── Geometry ────────────────────────────────────────────────────────

    pub fn set_viewport(&mut self, width: u16) {
        if width == self.viewport_width {
            return;
        }
        self.viewport_width = width;
        self.offset = self.offset.min(self.max_offset());
        self.refresh();
    }

    /// Content span of the card at `index`.
    pub fn card_span(&self, index: usize) -> Span {
        let s = &self.settings;
        let stride = u32::from(s.card_width) + u32::from(s.card_gap);
        Span::new(
            u32::from(s.inset) + index as u32 * stride,
            u32::from(s.card_width),
        )
    }

    /// Total content width including insets and gaps.
    pub fn scroll_width(&self) -> u32 {
        let s = &self.settings;
        let n = self.cards.len() as u32;
        if n == 0 {
            return 2 * u32::from(s.inset);
        }
        2 * u32::from(s.inset) + n * u32::from(s.card_width) + (n - 1) * u32::from(s.card_gap)
    }

    pub fn max_offset(&self) -> u32 {
        self.scroll_width()
            .saturating_sub(u32::from(self.viewport_width))
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Card whose area covers viewport column `column` (gaps and insets miss).
    pub fn card_at(&self, column: u16) -> Option<&str> {
        let x = self.offset + u32::from(column);
        self.cards
            .iter()
            .enumerate()
            .find(|(i, _)| {
                let span = self.card_span(*i);
                x >= span.start && x < span.end
            })
            .map(|(_, card)| card.id.as_str())
    }

    /// First card currently marked active.
    pub fn active_card(&self) -> Option<&str> {
        self.cards
            .iter()
            .find(|c| c.active)
            .map(|c| c.id.as_str())
    }

    // ── Scrolling ───────────────────────────────────────────────────────

    /// User scroll. Cancels any smooth scroll; returns whether the offset moved.
    pub fn scroll_by(&mut self, delta: i32) -> bool {
        self.animation = None;
        let target = (i64::from(self.offset) + i64::from(delta)).max(0) as u32;
        self.set_offset(target)
    }

    /// Columns moved per wheel notch or key swipe.
    pub fn wheel_step(&self) -> i32 {
        i32::from(self.settings.wheel_step)
    }

    pub fn progress_height(&self) -> u16 {
        self.settings.progress_height
    }

    /// Programmatic scroll, optionally animated over subsequent ticks.
    pub fn scroll_to(&mut self, x: u32, smooth: bool) {
        let x = x.min(self.max_offset());
        if smooth && x != self.offset {
            self.animation = Some(x);
        } else {
            self.animation = None;
            self.set_offset(x);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Advance a smooth scroll by one frame.
    pub fn on_tick(&mut self) {
        let Some(target) = self.animation else {
            return;
        };
        let remaining = i64::from(target) - i64::from(self.offset);
        let step = ((remaining.abs() as f32) * self.settings.smooth_scroll_speed).ceil() as i64;
        let next = i64::from(self.offset) + remaining.signum() * step.max(1);
        self.set_offset(next.max(0) as u32);
        if self.offset == target {
            self.animation = None;
        }
    }

    fn set_offset(&mut self, x: u32) -> bool {
        let x = x.min(self.max_offset());
        if x == self.offset {
            return false;
        }
        self.offset = x;
        self.refresh();
        true
    }

    // ── Progress & visibility ───────────────────────────────────────────

    /// Scroll progress in percent, `0.0..=100.0`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Recompute progress and card visibility after any geometry change.
    fn refresh(&mut self) {
        self.progress = scroll_progress(self.offset, self.scroll_width(), self.viewport_width);

        let spans: Vec<Span> = (0..self.cards.len()).map(|i| self.card_span(i)).collect();
        let root = Span::new(self.offset, u32::from(self.viewport_width));
        for entry in self.observer.observe(&spans, root) {
            if let Some(card) = self.cards.get_mut(entry.index) {
                debug!(
                    "Card {} {} ({:.0}% visible)",
                    card.id,
                    if entry.is_intersecting { "active" } else { "inactive" },
                    entry.ratio * 100.0
                );
                card.active = entry.is_intersecting;
            }
        }
    }
}

/// `offset / (scroll_width - viewport_width)` as a percentage; `0` when the
/// content does not overflow.
pub fn scroll_progress(offset: u32, scroll_width: u32, viewport_width: u16) -> f32 {
    let max = scroll_width.saturating_sub(u32::from(viewport_width));
    if max == 0 {
        return 0.0;
    }
    (offset as f32 / max as f32 * 100.0).clamp(0.0, 100.0)
}
