//! Full-screen detail view for one record.
//!
//! The controller keeps a view model instead of widgets: a persistent close
//! affordance, the hero (image, overlay text, optional badge), the fact
//! sections and the status widget. Elements carry ids from a monotonic
//! allocator so replacement is observable: the close button is created once
//! and reused, the status widget is discarded and recreated on every render.

use tracing::debug;

use crate::config::DetailConfig;
use crate::i18n;
use crate::records::{split_facts, RecordStore, SubjectRecord};
use crate::session::Session;
use crate::status::{self, StatusCode, StatusDescriptor};

pub type ElementId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseButton {
    pub element: ElementId,
    pub label: &'static str,
}

/// Compact status badge shown in the hero overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hero {
    pub image: String,
    pub opacity: f32,
    pub name: String,
    pub summary: String,
    pub badge: Option<Badge>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleEntry {
    pub code: StatusCode,
    pub label: &'static str,
    pub color: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusWidget {
    pub element: ElementId,
    pub heading: &'static str,
    pub scale: Vec<ScaleEntry>,
    pub explanation: &'static StatusDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub record_id: String,
    pub hero: Hero,
    pub sections: Vec<Section>,
    pub status: Option<StatusWidget>,
}

/// Linear hero fade: 1 at the top, 0 once `fade_ratio * hero_height` rows
/// have scrolled past.
pub fn hero_opacity(scroll_top: u16, hero_height: u16, fade_ratio: f32) -> f32 {
    let distance = f32::from(hero_height) * fade_ratio;
    if distance <= 0.0 {
        return if scroll_top == 0 { 1.0 } else { 0.0 };
    }
    (1.0 - f32::from(scroll_top) / distance).clamp(0.0, 1.0)
}

#[derive(Debug)]
pub struct DetailController {
    settings: DetailConfig,
    view: Option<DetailView>,
    close_button: Option<CloseButton>,
    next_element: ElementId,
    rendered: Option<(String, String)>,
    scroll_top: u16,
    hero_height: u16,
    viewport_height: u16,
    content_height: u16,
}

impl DetailController {
    pub fn new(settings: DetailConfig) -> Self {
        Self {
            settings,
            view: None,
            close_button: None,
            next_element: 1,
            rendered: None,
            scroll_top: 0,
            hero_height: 0,
            viewport_height: 0,
            content_height: 0,
        }
    }

    // ── Transitions ─────────────────────────────────────────────────────

    /// `closed → open(id)` (or re-open). Unknown ids leave everything as is.
    pub fn open(&mut self, session: &mut Session, store: &RecordStore, id: &str) -> bool {
        let Some(record) = store.find_by_id(id) else {
            debug!("Open ignored: no record \"{id}\"");
            return false;
        };
        session.selection = Some(record.id.clone());
        self.ensure_close_button(&session.language);
        self.scroll_top = 0;
        self.render(record, &session.language);
        debug!("Detail opened: {id}");
        true
    }

    /// `open → closed`. The close affordance stays attached for the next open.
    pub fn close(&mut self, session: &mut Session) {
        if session.selection.take().is_some() {
            debug!("Detail closed");
        }
        self.view = None;
        self.rendered = None;
        self.scroll_top = 0;
    }

    /// `open(id) → open(id)` in the session's current language. Skipped when
    /// the view already shows this record in this language.
    pub fn refresh(&mut self, session: &mut Session, store: &RecordStore) -> bool {
        let Some(id) = session.selection.clone() else {
            return false;
        };
        if self.rendered.as_ref() == Some(&(id.clone(), session.language.clone())) {
            return false;
        }
        let Some(record) = store.find_by_id(&id) else {
            self.close(session);
            return false;
        };
        self.ensure_close_button(&session.language);
        self.render(record, &session.language);
        true
    }

    fn ensure_close_button(&mut self, language: &str) {
        let label = i18n::labels(language).back;
        if self.close_button.is_none() {
            let element = self.allocate();
            self.close_button = Some(CloseButton { element, label });
        }
        if let Some(button) = &mut self.close_button {
            button.label = label;
        }
    }

    fn allocate(&mut self) -> ElementId {
        let id = self.next_element;
        self.next_element += 1;
        id
    }

    fn render(&mut self, record: &SubjectRecord, language: &str) {
        let labels = i18n::labels(language);
        let descriptor = status::describe(record.conservation.as_deref());

        let facts = split_facts(record.long_text(language));
        let mut sections = vec![Section {
            title: labels.fun_fact,
            body: facts.primary_fact,
        }];
        if !facts.habitat_fact.is_empty() {
            sections.push(Section {
                title: labels.habitat,
                body: facts.habitat_fact,
            });
        }

        // Remove the previous widget before building its replacement.
        if let Some(view) = &mut self.view {
            view.status = None;
        }
        let status = descriptor.map(|d| StatusWidget {
            element: self.allocate(),
            heading: labels.status_heading,
            scale: status::all_codes()
                .map(|s| ScaleEntry {
                    code: s.code,
                    label: s.label,
                    color: s.color,
                    active: s.code == d.code,
                })
                .collect(),
            explanation: d,
        });

        self.view = Some(DetailView {
            record_id: record.id.clone(),
            hero: Hero {
                image: record.image.clone(),
                opacity: self.current_opacity(),
                name: record.name(language).to_string(),
                summary: record.short_fact(language).to_string(),
                badge: descriptor.map(|d| Badge {
                    label: d.label,
                    color: d.color,
                }),
            },
            sections,
            status,
        });
        self.rendered = Some((record.id.clone(), language.to_string()));
    }

    // ── Scrolling & fade ────────────────────────────────────────────────

    /// Geometry from the last layout pass, in rows.
    pub fn set_layout(&mut self, viewport_height: u16, hero_height: u16, content_height: u16) {
        self.viewport_height = viewport_height;
        self.hero_height = hero_height;
        self.content_height = content_height;
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    pub fn max_scroll(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Scroll the view; returns whether the offset moved.
    pub fn scroll_by(&mut self, delta: i32) -> bool {
        if self.view.is_none() {
            return false;
        }
        let target = (i32::from(self.scroll_top) + delta).clamp(0, i32::from(self.max_scroll()));
        let target = target as u16;
        if target == self.scroll_top {
            return false;
        }
        self.scroll_top = target;
        true
    }

    /// Re-derive hero opacity from the scroll offset.
    pub fn fade_hero(&mut self) {
        let opacity = self.current_opacity();
        if let Some(view) = &mut self.view {
            view.hero.opacity = opacity;
        }
    }

    fn current_opacity(&self) -> f32 {
        hero_opacity(self.scroll_top, self.hero_height, self.settings.fade_ratio)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&DetailView> {
        self.view.as_ref()
    }

    pub fn close_button(&self) -> Option<&CloseButton> {
        self.close_button.as_ref()
    }

    pub fn scroll_top(&self) -> u16 {
        self.scroll_top
    }

    pub fn scroll_step(&self) -> u16 {
        self.settings.scroll_step
    }

    pub fn hero_percent(&self) -> u16 {
        self.settings.hero_percent
    }
}
