//! Horizontal intersection observer for carousel cards.
//!
//! Mirrors a browser `IntersectionObserver` rooted at the carousel: every time
//! the geometry changes the observer recomputes each target's visible ratio
//! and reports the targets whose intersecting state flipped. The ratio is
//! measured on widths, so gaps and insets between cards are accounted for.

/// Half-open column range `[start, end)` in carousel content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fraction of `self` that lies inside `root`, in `[0, 1]`.
    pub fn ratio_within(&self, root: Span) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let start = self.start.max(root.start);
        let end = self.end.min(root.end);
        end.saturating_sub(start) as f32 / self.len() as f32
    }
}

/// A state change for one observed target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub index: usize,
    pub ratio: f32,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    threshold: f32,
    states: Vec<Option<bool>>,
}

impl IntersectionObserver {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            states: Vec::new(),
        }
    }

    /// Forget every target, as when the observed elements are replaced.
    pub fn disconnect(&mut self) {
        self.states.clear();
    }

    /// Recompute all targets against `root`. Freshly observed targets always
    /// produce an entry; known targets only when their state flips.
    pub fn observe(&mut self, targets: &[Span], root: Span) -> Vec<IntersectionEntry> {
        self.states.resize(targets.len(), None);
        let mut entries = Vec::new();
        for (index, target) in targets.iter().enumerate() {
            let ratio = target.ratio_within(root);
            let is_intersecting = !target.is_empty() && ratio >= self.threshold;
            if self.states[index] != Some(is_intersecting) {
                self.states[index] = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    index,
                    ratio,
                    is_intersecting,
                });
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_accounts_for_partial_overlap() {
        let card = Span::new(10, 20);
        assert_eq!(card.ratio_within(Span::new(0, 100)), 1.0);
        assert_eq!(card.ratio_within(Span::new(20, 100)), 0.5);
        assert_eq!(card.ratio_within(Span::new(40, 10)), 0.0);
    }

    #[test]
    fn flips_exactly_at_threshold() {
        let mut observer = IntersectionObserver::new(0.7);
        let cards = [Span::new(0, 10)];

        let first = observer.observe(&cards, Span::new(0, 40));
        assert_eq!(first.len(), 1);
        assert!(first[0].is_intersecting);

        // 7 of 10 columns visible: still active, no change reported.
        assert!(observer.observe(&cards, Span::new(3, 40)).is_empty());

        // 6 of 10: drops below.
        let out = observer.observe(&cards, Span::new(4, 40));
        assert_eq!(out.len(), 1);
        assert!(!out[0].is_intersecting);
    }

    #[test]
    fn disconnect_reports_every_target_again() {
        let mut observer = IntersectionObserver::new(0.7);
        let cards = [Span::new(0, 10), Span::new(12, 10)];
        let root = Span::new(0, 15);
        assert_eq!(observer.observe(&cards, root).len(), 2);
        assert!(observer.observe(&cards, root).is_empty());
        observer.disconnect();
        assert_eq!(observer.observe(&cards, root).len(), 2);
    }
}
