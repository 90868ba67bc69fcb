//! Kiosk state and input handling.
//!
//! `Kiosk` is the single source of truth for the whole display. It owns the
//! record store, the session and every controller, and is only mutated from
//! the main event loop, one handler at a time. No `Arc<Mutex<>>` needed.
//!
//! Raw terminal input is translated into [`UiEvent`]s, routed through the
//! [`Subscriptions`] table, and the resulting [`Action`]s are applied here.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, error, info};

use crate::carousel::Carousel;
use crate::config::{Config, KeybindingsConfig};
use crate::detail::DetailController;
use crate::idle::IdleTimer;
use crate::language::LanguageController;
use crate::records::RecordStore;
use crate::session::Session;
use crate::source::LoadOutcome;
use crate::ui;
use crate::ui::layout::KioskLayout;
use crate::wiring::{Action, Subscriptions, Target, UiEvent};

// ─── Actions produced by input handling ─────────────────────────────────────

/// Actions that the main loop should execute after processing input.
#[derive(Debug, PartialEq, Eq)]
pub enum AppAction {
    /// Quit the application.
    Quit,
    /// No-op (event was consumed but requires no further action).
    Consumed,
}

/// Progress of the startup record load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

/// A pointer press that has not been released yet.
#[derive(Debug, Clone)]
struct Press {
    target: Target,
    column: u16,
    row: u16,
    moved: bool,
}

// ─── Kiosk state ────────────────────────────────────────────────────────────

pub struct Kiosk {
    pub store: RecordStore,
    pub session: Session,
    pub carousel: Carousel,
    pub detail: DetailController,
    pub languages: LanguageController,
    pub subscriptions: Subscriptions,
    pub load_state: LoadState,
    /// Width of the progress bar in percent, as last published.
    pub progress_bar: f32,
    /// Monotonic tick counter for animations.
    pub tick_count: u64,
    /// Whether the application should keep running.
    pub running: bool,
    idle: IdleTimer,
    area: Rect,
    layout: KioskLayout,
    press: Option<Press>,
    keys: KeybindingsConfig,
    allow_quit: bool,
}

impl Kiosk {
    pub fn new(config: &Config) -> Self {
        let mut subscriptions = Subscriptions::new();
        subscriptions.attach_defaults();

        Self {
            store: RecordStore::default(),
            session: Session::new(config.general.default_language.clone()),
            carousel: Carousel::new(config.carousel.clone()),
            detail: DetailController::new(config.detail.clone()),
            languages: LanguageController::new(
                config.general.languages.clone(),
                config.general.default_language.clone(),
            ),
            subscriptions,
            load_state: LoadState::Pending,
            progress_bar: 0.0,
            tick_count: 0,
            running: true,
            idle: IdleTimer::new(config.general.idle_timeout),
            area: Rect::default(),
            layout: KioskLayout::default(),
            press: None,
            keys: config.keys.clone(),
            allow_quit: config.general.allow_quit,
        }
    }

    // ── Startup ─────────────────────────────────────────────────────────

    /// Apply the result of the one-shot record fetch.
    pub fn records_loaded(&mut self, outcome: LoadOutcome, now: Instant) {
        match outcome {
            LoadOutcome::Loaded(store) => {
                info!("{} records ready", store.len());
                self.store = store;
                self.load_state = LoadState::Ready;
                self.carousel.render(&self.store, &self.session.language);
                self.progress_bar = self.carousel.progress();
                self.sync_layout(self.area);
                self.idle.arm(now);
            }
            LoadOutcome::Failed(message) => {
                error!("Error loading records: {message}");
                self.load_state = LoadState::Failed;
                self.idle.cancel();
            }
        }
    }

    // ── Layout ──────────────────────────────────────────────────────────

    /// Recompute geometry for a frame of `area` and push it into the
    /// controllers that depend on it.
    pub fn sync_layout(&mut self, area: Rect) {
        self.area = area;
        let layout = KioskLayout::compute(area, self);
        self.carousel.set_viewport(layout.carousel.width);
        self.progress_bar = self.carousel.progress();

        if let (Some(view), Some(geometry)) = (self.detail.view(), layout.detail) {
            let content_height =
                ui::detail::content_height(view, geometry.body.width, geometry.hero_height);
            self.detail
                .set_layout(geometry.body.height, geometry.hero_height, content_height);
            self.detail.fade_hero();
        }
        self.layout = layout;
    }

    pub fn layout(&self) -> &KioskLayout {
        &self.layout
    }

    pub fn keys(&self) -> &KeybindingsConfig {
        &self.keys
    }

    pub fn allows_quit(&self) -> bool {
        self.allow_quit
    }

    // ── Event routing ───────────────────────────────────────────────────

    /// Run every listener bound to `event`.
    pub fn emit(&mut self, event: UiEvent, now: Instant) {
        for action in self.subscriptions.dispatch(&event) {
            self.apply(action, now);
        }
    }

    fn apply(&mut self, action: Action, now: Instant) {
        match action {
            Action::ResetIdle => self.idle.arm(now),
            Action::UpdateProgress => self.progress_bar = self.carousel.progress(),
            Action::ScrollCarouselBy(delta) => {
                if self.carousel.scroll_by(delta) {
                    self.emit(UiEvent::Scroll(Target::Carousel), now);
                }
            }
            Action::ScrollDetailBy(delta) => {
                if self.detail.scroll_by(delta) {
                    self.emit(UiEvent::Scroll(Target::DetailView), now);
                }
            }
            Action::FadeHero => self.detail.fade_hero(),
            Action::OpenDetail(id) => self.open_detail(&id, now),
            Action::CloseDetail => self.close_detail(),
            Action::SetLanguage(code) => self.set_language(&code, now),
        }
    }

    // ── Operations ──────────────────────────────────────────────────────

    pub fn open_detail(&mut self, id: &str, now: Instant) {
        if self.detail.open(&mut self.session, &self.store, id) {
            self.sync_layout(self.area);
        }
        self.idle.arm(now);
    }

    pub fn close_detail(&mut self) {
        self.detail.close(&mut self.session);
        self.press = None;
        self.sync_layout(self.area);
    }

    pub fn set_language(&mut self, code: &str, now: Instant) {
        self.apply_language(code);
        self.idle.arm(now);
    }

    fn apply_language(&mut self, code: &str) {
        self.languages.set_language(&mut self.session, code);
        self.carousel.render(&self.store, &self.session.language);
        self.detail.refresh(&mut self.session, &self.store);
        self.sync_layout(self.area);
    }

    // ── Idle handling ───────────────────────────────────────────────────

    pub fn idle_deadline(&self) -> Option<Instant> {
        self.idle.deadline()
    }

    pub fn idle_armed(&self) -> bool {
        self.idle.is_armed()
    }

    /// Check the countdown; on expiry return the kiosk to its attract state.
    /// None of the reset steps count as interaction, so the timer stays
    /// dormant afterwards.
    pub fn poll_idle(&mut self, now: Instant) -> bool {
        if !self.idle.poll(now) {
            return false;
        }
        info!("Idle timeout: resetting kiosk");
        self.close_detail();
        self.carousel.scroll_to(0, true);
        let default = self.languages.default_language().to_string();
        self.apply_language(&default);
        true
    }

    // ── Tick handling ───────────────────────────────────────────────────

    /// Called on every animation tick.
    pub fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if self.carousel.is_animating() {
            self.carousel.on_tick();
            self.progress_bar = self.carousel.progress();
        }
    }

    // ── Input handling ──────────────────────────────────────────────────

    /// Process a key event. Every key press counts as a touch.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> AppAction {
        // Ctrl+C always quits (system convention, non-configurable).
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return AppAction::Quit;
        }
        if self.allow_quit && key.code == self.keys.quit {
            return AppAction::Quit;
        }

        self.emit(UiEvent::TouchStart(Target::Body), now);

        let step = self.carousel.wheel_step();
        let detail_step = i32::from(self.detail.scroll_step());
        let detail_open = self.detail.is_open();
        let kb = &self.keys;

        let event = match key.code {
            c if c == kb.close && detail_open => Some(UiEvent::Click(Target::CloseButton)),
            c if c == kb.scroll_down && detail_open => Some(UiEvent::Wheel {
                target: Target::DetailView,
                dx: 0,
                dy: detail_step,
            }),
            c if c == kb.scroll_up && detail_open => Some(UiEvent::Wheel {
                target: Target::DetailView,
                dx: 0,
                dy: -detail_step,
            }),
            c if c == kb.swipe_right && !detail_open => Some(UiEvent::Wheel {
                target: Target::Carousel,
                dx: step,
                dy: 0,
            }),
            c if c == kb.swipe_left && !detail_open => Some(UiEvent::Wheel {
                target: Target::Carousel,
                dx: -step,
                dy: 0,
            }),
            c if c == kb.open && !detail_open => self
                .carousel
                .active_card()
                .map(|id| UiEvent::Click(Target::Card(id.to_string()))),
            KeyCode::Char(d) if d.is_ascii_digit() => d
                .to_digit(10)
                .and_then(|n| self.languages.by_slot(n as usize))
                .map(|code| UiEvent::Click(Target::LanguageButton(code.to_string()))),
            _ => None,
        };

        if let Some(event) = event {
            self.emit(event, now);
        }
        AppAction::Consumed
    }

    /// Process a mouse event: presses are touches, a release without
    /// movement is a click, drags swipe and the wheel scrolls.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let target = self.layout.hit_test(self, column, row);
                self.emit(UiEvent::TouchStart(target.clone()), now);
                self.press = Some(Press {
                    target,
                    column,
                    row,
                    moved: false,
                });
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(press) = &mut self.press else {
                    return;
                };
                let dx = i32::from(press.column) - i32::from(column);
                let dy = i32::from(press.row) - i32::from(row);
                if dx == 0 && dy == 0 {
                    return;
                }
                press.column = column;
                press.row = row;
                press.moved = true;
                let event = match &press.target {
                    Target::Card(_) | Target::Carousel => UiEvent::Wheel {
                        target: Target::Carousel,
                        dx,
                        dy: 0,
                    },
                    Target::DetailView => UiEvent::Wheel {
                        target: Target::DetailView,
                        dx: 0,
                        dy,
                    },
                    _ => return,
                };
                self.emit(event, now);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(press) = self.press.take() {
                    if !press.moved {
                        debug!("Click on {:?}", press.target);
                        self.emit(UiEvent::Click(press.target), now);
                    }
                }
            }
            MouseEventKind::ScrollDown
            | MouseEventKind::ScrollUp
            | MouseEventKind::ScrollLeft
            | MouseEventKind::ScrollRight => {
                let target = self.layout.hit_test(self, column, row);
                let step = if target == Target::DetailView {
                    i32::from(self.detail.scroll_step())
                } else {
                    self.carousel.wheel_step()
                };
                let (dx, dy) = match mouse.kind {
                    MouseEventKind::ScrollDown => (0, step),
                    MouseEventKind::ScrollUp => (0, -step),
                    MouseEventKind::ScrollRight => (step, 0),
                    _ => (-step, 0),
                };
                self.emit(UiEvent::Wheel { target, dx, dy }, now);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::records::tests::sample_store;
    use crate::records::{RecordStore, SubjectRecord};

    const IDLE: Duration = Duration::from_secs(45);

    fn kiosk_with(store: RecordStore, now: Instant) -> Kiosk {
        let mut kiosk = Kiosk::new(&Config::default());
        kiosk.sync_layout(Rect::new(0, 0, 100, 30));
        kiosk.records_loaded(LoadOutcome::Loaded(store), now);
        kiosk
    }

    fn many(n: usize) -> RecordStore {
        RecordStore::new((0..n).map(|i| SubjectRecord {
            id: format!("r{i}"),
            names: [("en".to_string(), format!("Fish {i}"))].into(),
            ..SubjectRecord::default()
        }))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn nothing_renders_before_records_arrive() {
        let kiosk = Kiosk::new(&Config::default());
        assert_eq!(kiosk.load_state, LoadState::Pending);
        assert!(kiosk.carousel.cards().is_empty());
        assert!(!kiosk.idle_armed());
    }

    #[test]
    fn load_failure_leaves_display_empty() {
        let mut kiosk = Kiosk::new(&Config::default());
        kiosk.records_loaded(LoadOutcome::Failed("boom".into()), Instant::now());
        assert_eq!(kiosk.load_state, LoadState::Failed);
        assert!(kiosk.carousel.cards().is_empty());
        assert!(!kiosk.idle_armed());
    }

    #[test]
    fn zero_records_still_arm_idle() {
        let kiosk = kiosk_with(RecordStore::default(), Instant::now());
        assert!(kiosk.carousel.cards().is_empty());
        assert!(kiosk.idle_armed());
        assert_eq!(kiosk.progress_bar, 0.0);
    }

    #[test]
    fn tapping_a_card_opens_its_detail() {
        let now = Instant::now();
        let mut kiosk = kiosk_with(sample_store(), now);
        // Second card starts at column 2 + 32 + 2 = 36.
        kiosk.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 40, 10), now);
        kiosk.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 40, 10), now);

        assert_eq!(kiosk.session.selection.as_deref(), Some("a2"));
        let view = kiosk.detail.view().unwrap();
        assert_eq!(view.hero.badge.unwrap().label, "Vulnerable");
        assert_eq!(view.hero.badge.unwrap().color, "#F9E814");

        // Close affordance sits at the top-left of the overlay.
        kiosk.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 1, 0), now);
        kiosk.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 1, 0), now);
        assert!(!kiosk.detail.is_open());
        assert_eq!(kiosk.session.selection, None);
    }

    #[test]
    fn dragging_swipes_instead_of_clicking() {
        let now = Instant::now();
        let mut kiosk = kiosk_with(many(8), now);
        kiosk.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 10), now);
        kiosk.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 10), now);
        kiosk.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 30, 10), now);

        assert!(!kiosk.detail.is_open());
        assert_eq!(kiosk.carousel.offset(), 20);
        assert!(kiosk.progress_bar > 0.0);
    }

    #[test]
    fn wheel_scrolls_carousel_and_rearms() {
        let start = Instant::now();
        let mut kiosk = kiosk_with(many(8), start);
        let later = start + Duration::from_secs(30);
        kiosk.handle_mouse(mouse(MouseEventKind::ScrollDown, 10, 10), later);
        assert_eq!(kiosk.carousel.offset(), 6);
        assert_eq!(kiosk.idle_deadline(), Some(later + IDLE));
    }

    #[test]
    fn language_buttons_switch_language() {
        let now = Instant::now();
        let mut kiosk = kiosk_with(sample_store(), now);
        let (_, button) = kiosk.layout().languages[1].clone();
        kiosk.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), button.x, button.y), now);
        kiosk.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), button.x, button.y), now);
        assert_eq!(kiosk.session.language, "es");
        assert_eq!(kiosk.carousel.cards()[0].name, "Pez payaso");

        kiosk.handle_key(key(KeyCode::Char('1')), now);
        assert_eq!(kiosk.session.language, "en");
    }

    #[test]
    fn language_buttons_stay_tappable_over_the_detail_view() {
        let start = Instant::now();
        let mut kiosk = kiosk_with(sample_store(), start);
        kiosk.open_detail("a1", start);

        let (code, button) = kiosk.layout().languages[1].clone();
        assert_eq!(code, "es");
        assert_eq!(button.y, 0, "buttons move onto the close bar");
        assert_eq!(
            kiosk.layout().hit_test(&kiosk, button.x, button.y),
            Target::LanguageButton("es".into())
        );

        let later = start + Duration::from_secs(20);
        kiosk.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), button.x, button.y), later);
        kiosk.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), button.x, button.y), later);

        assert_eq!(kiosk.session.language, "es");
        assert!(kiosk.detail.is_open());
        assert_eq!(kiosk.session.selection.as_deref(), Some("a1"));
        assert_eq!(kiosk.detail.view().unwrap().hero.name, "Pez payaso");
        assert_eq!(kiosk.idle_deadline(), Some(later + IDLE));
    }

    #[test]
    fn language_change_rerenders_open_detail() {
        let now = Instant::now();
        let mut kiosk = kiosk_with(sample_store(), now);
        kiosk.open_detail("a1", now);
        kiosk.set_language("xx", now);

        let view = kiosk.detail.view().unwrap();
        assert_eq!(view.hero.name, "");
        assert_eq!(view.sections.len(), 1);
        assert_eq!(view.sections[0].body, "");
        assert_eq!(kiosk.carousel.cards()[0].name, "");
    }

    #[test]
    fn idle_expiry_resets_everything_once() {
        let start = Instant::now();
        let mut kiosk = kiosk_with(many(8), start);
        kiosk.carousel.scroll_by(40);
        kiosk.set_language("es", start);
        kiosk.open_detail("r3", start);

        assert!(!kiosk.poll_idle(start + IDLE - Duration::from_millis(1)));
        assert!(kiosk.poll_idle(start + IDLE));

        assert!(!kiosk.detail.is_open());
        assert_eq!(kiosk.session.selection, None);
        assert_eq!(kiosk.session.language, "en");
        while kiosk.carousel.is_animating() {
            kiosk.on_tick();
        }
        assert_eq!(kiosk.carousel.offset(), 0);
        assert_eq!(kiosk.progress_bar, 0.0);

        // Reset is not an interaction: the timer stays dormant.
        assert!(!kiosk.idle_armed());
        assert!(!kiosk.poll_idle(start + IDLE * 3));
    }

    #[test]
    fn steady_interaction_never_times_out() {
        let start = Instant::now();
        let mut kiosk = kiosk_with(sample_store(), start);
        kiosk.open_detail("a1", start);
        let mut now = start;
        for _ in 0..100 {
            now += Duration::from_millis(44_900);
            assert!(!kiosk.poll_idle(now));
            kiosk.emit(UiEvent::TouchStart(Target::Body), now);
        }
        assert!(kiosk.detail.is_open());
    }

    #[test]
    fn keyboard_drives_the_kiosk() {
        let now = Instant::now();
        let mut kiosk = kiosk_with(sample_store(), now);
        kiosk.handle_key(key(KeyCode::Enter), now);
        assert_eq!(kiosk.session.selection.as_deref(), Some("a1"));
        kiosk.handle_key(key(KeyCode::Esc), now);
        assert!(!kiosk.detail.is_open());
        assert_eq!(kiosk.handle_key(key(KeyCode::Char('q')), now), AppAction::Quit);
        assert_eq!(
            kiosk.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now),
            AppAction::Quit
        );
    }

    #[test]
    fn detached_touch_listener_stops_rearming() {
        let start = Instant::now();
        let mut kiosk = kiosk_with(sample_store(), start);
        kiosk.subscriptions.clear();
        let later = start + Duration::from_secs(10);
        kiosk.handle_key(key(KeyCode::Char('x')), later);
        assert_eq!(kiosk.idle_deadline(), Some(start + IDLE));
    }

    #[test]
    fn detail_scroll_fades_hero() {
        let now = Instant::now();
        let mut store_records: Vec<SubjectRecord> = sample_store().iter().cloned().collect();
        store_records[0]
            .facts
            .insert("en".into(), "Long. ".repeat(400));
        let mut kiosk = kiosk_with(RecordStore::new(store_records), now);
        kiosk.open_detail("a1", now);
        assert_eq!(kiosk.detail.view().unwrap().hero.opacity, 1.0);

        kiosk.handle_mouse(mouse(MouseEventKind::ScrollDown, 10, 10), now);
        let opacity = kiosk.detail.view().unwrap().hero.opacity;
        assert!(opacity < 1.0 && opacity > 0.0, "opacity {opacity}");
        // Carousel untouched by detail scrolling.
        assert_eq!(kiosk.carousel.offset(), 0);
    }
}
