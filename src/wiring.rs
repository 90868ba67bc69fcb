//! Listener registry binding UI events to kiosk actions.
//!
//! Nothing listens implicitly: the coordinator owns a [`Subscriptions`] table,
//! attaches the default bindings at startup, and turns every [`UiEvent`] into
//! the [`Action`]s of the listeners that match it, in registration order.

use std::fmt;

/// Hit-testable parts of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Anywhere, including empty space.
    Body,
    Carousel,
    Card(String),
    CloseButton,
    LanguageButton(String),
    DetailView,
}

impl Target {
    fn kind(&self) -> TargetKind {
        match self {
            Target::Body => TargetKind::Body,
            Target::Carousel => TargetKind::Carousel,
            Target::Card(_) => TargetKind::Card,
            Target::CloseButton => TargetKind::CloseButton,
            Target::LanguageButton(_) => TargetKind::LanguageButton,
            Target::DetailView => TargetKind::DetailView,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Matches every target: events bubble up to the body.
    Body,
    Carousel,
    Card,
    CloseButton,
    LanguageButton,
    DetailView,
}

impl TargetKind {
    fn matches(self, target: &Target) -> bool {
        self == TargetKind::Body || self == target.kind()
    }
}

/// Input as seen by listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    TouchStart(Target),
    Click(Target),
    /// The target's scroll offset changed because of the user.
    Scroll(Target),
    /// Wheel or swipe over the target, in columns/rows.
    Wheel { target: Target, dx: i32, dy: i32 },
}

impl UiEvent {
    fn kind(&self) -> EventKind {
        match self {
            UiEvent::TouchStart(_) => EventKind::TouchStart,
            UiEvent::Click(_) => EventKind::Click,
            UiEvent::Scroll(_) => EventKind::Scroll,
            UiEvent::Wheel { .. } => EventKind::Wheel,
        }
    }

    fn target(&self) -> &Target {
        match self {
            UiEvent::TouchStart(t) | UiEvent::Click(t) | UiEvent::Scroll(t) => t,
            UiEvent::Wheel { target, .. } => target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    TouchStart,
    Click,
    Scroll,
    Wheel,
}

/// What a listener does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    ResetIdle,
    UpdateProgress,
    ScrollCarousel,
    ScrollDetail,
    FadeHero,
    OpenDetail,
    CloseDetail,
    SetLanguage,
}

/// A handler resolved against a concrete event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ResetIdle,
    UpdateProgress,
    ScrollCarouselBy(i32),
    ScrollDetailBy(i32),
    FadeHero,
    OpenDetail(String),
    CloseDetail,
    SetLanguage(String),
}

impl Handler {
    fn resolve(self, event: &UiEvent) -> Option<Action> {
        match (self, event) {
            (Handler::ResetIdle, _) => Some(Action::ResetIdle),
            (Handler::UpdateProgress, _) => Some(Action::UpdateProgress),
            (Handler::FadeHero, _) => Some(Action::FadeHero),
            (Handler::CloseDetail, _) => Some(Action::CloseDetail),
            (Handler::ScrollCarousel, UiEvent::Wheel { dx, dy, .. }) => {
                Some(Action::ScrollCarouselBy(dx + dy))
            }
            (Handler::ScrollDetail, UiEvent::Wheel { dy, .. }) => Some(Action::ScrollDetailBy(*dy)),
            (Handler::OpenDetail, e) => match e.target() {
                Target::Card(id) => Some(Action::OpenDetail(id.clone())),
                _ => None,
            },
            (Handler::SetLanguage, e) => match e.target() {
                Target::LanguageButton(code) => Some(Action::SetLanguage(code.clone())),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Listener {
    id: SubscriptionId,
    event: EventKind,
    target: TargetKind,
    handler: Handler,
}

#[derive(Debug, Clone, Default)]
pub struct Subscriptions {
    listeners: Vec<Listener>,
    next_id: u32,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, event: EventKind, target: TargetKind, handler: Handler) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push(Listener {
            id,
            event,
            target,
            handler,
        });
        id
    }

    /// Remove one listener. Returns whether it was attached.
    pub fn detach(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// The kiosk's standard bindings.
    pub fn attach_defaults(&mut self) -> Vec<SubscriptionId> {
        use EventKind::*;
        [
            (TouchStart, TargetKind::Body, Handler::ResetIdle),
            (Scroll, TargetKind::Carousel, Handler::ResetIdle),
            (Scroll, TargetKind::Carousel, Handler::UpdateProgress),
            (Wheel, TargetKind::Carousel, Handler::ScrollCarousel),
            (Wheel, TargetKind::Card, Handler::ScrollCarousel),
            (Wheel, TargetKind::DetailView, Handler::ScrollDetail),
            (Scroll, TargetKind::DetailView, Handler::FadeHero),
            (Click, TargetKind::Card, Handler::OpenDetail),
            (Click, TargetKind::CloseButton, Handler::CloseDetail),
            (Click, TargetKind::LanguageButton, Handler::SetLanguage),
        ]
        .into_iter()
        .map(|(event, target, handler)| self.attach(event, target, handler))
        .collect()
    }

    /// Resolve the actions triggered by `event`.
    pub fn dispatch(&self, event: &UiEvent) -> Vec<Action> {
        let kind = event.kind();
        self.listeners
            .iter()
            .filter(|l| l.event == kind && l.target.matches(event.target()))
            .filter_map(|l| l.handler.resolve(event))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> (Subscriptions, Vec<SubscriptionId>) {
        let mut subs = Subscriptions::new();
        let ids = subs.attach_defaults();
        (subs, ids)
    }

    #[test]
    fn touch_anywhere_resets_idle() {
        let (subs, _) = defaults();
        for target in [Target::Body, Target::Card("a1".into()), Target::DetailView] {
            assert_eq!(
                subs.dispatch(&UiEvent::TouchStart(target)),
                [Action::ResetIdle]
            );
        }
    }

    #[test]
    fn carousel_scroll_resets_idle_then_updates_progress() {
        let (subs, _) = defaults();
        assert_eq!(
            subs.dispatch(&UiEvent::Scroll(Target::Carousel)),
            [Action::ResetIdle, Action::UpdateProgress]
        );
    }

    #[test]
    fn wheel_sums_both_axes_on_carousel() {
        let (subs, _) = defaults();
        let event = UiEvent::Wheel {
            target: Target::Carousel,
            dx: 2,
            dy: 3,
        };
        assert_eq!(subs.dispatch(&event), [Action::ScrollCarouselBy(5)]);
        let event = UiEvent::Wheel {
            target: Target::DetailView,
            dx: 2,
            dy: -3,
        };
        assert_eq!(subs.dispatch(&event), [Action::ScrollDetailBy(-3)]);
    }

    #[test]
    fn clicks_carry_target_data() {
        let (subs, _) = defaults();
        assert_eq!(
            subs.dispatch(&UiEvent::Click(Target::Card("a2".into()))),
            [Action::OpenDetail("a2".into())]
        );
        assert_eq!(
            subs.dispatch(&UiEvent::Click(Target::LanguageButton("fr".into()))),
            [Action::SetLanguage("fr".into())]
        );
        assert!(subs.dispatch(&UiEvent::Click(Target::Body)).is_empty());
    }

    #[test]
    fn detached_listener_no_longer_fires() {
        let (mut subs, ids) = defaults();
        assert!(subs.detach(ids[0]));
        assert!(!subs.detach(ids[0]));
        assert!(subs.dispatch(&UiEvent::TouchStart(Target::Body)).is_empty());
        subs.clear();
        assert!(subs
            .dispatch(&UiEvent::Click(Target::CloseButton))
            .is_empty());
    }
}
