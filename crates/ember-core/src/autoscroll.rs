//! Keep a focused descendant visible inside a scrollable, unless the user has
//! just scrolled by hand.

use web_time::{Duration, Instant};

use crate::focus::ScopeInfo;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoScroll {
    pub cooldown: Duration,
    last_manual: Option<Instant>,
}

impl Default for AutoScroll {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_AUTO_SCROLL_COOLDOWN)
    }
}

impl AutoScroll {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_manual: None,
        }
    }

    /// Wheel, drag or scrollbar input. Suppresses auto-scroll for `cooldown`.
    pub fn note_manual_scroll(&mut self, now: Instant) {
        self.last_manual = Some(now);
    }

    pub fn cooling_down(&self, now: Instant) -> bool {
        self.last_manual
            .is_some_and(|t| now.saturating_duration_since(t) < self.cooldown)
    }

    /// New offset bringing the focused child into view, or `None` when it is
    /// already visible, nothing is focused, or the cooldown is active.
    ///
    /// `info.child_y` must be in content space (0 = top of the content).
    /// A child taller than the viewport is aligned to its top edge.
    pub fn target_offset(
        &self,
        offset: f32,
        viewport_height: f32,
        content_height: f32,
        info: &ScopeInfo,
        now: Instant,
    ) -> Option<f32> {
        if !info.has_focused_child || self.cooling_down(now) {
            return None;
        }
        let top = info.child_y;
        let bottom = info.child_y + info.child_height;
        let wanted = if top < offset || info.child_height > viewport_height {
            top
        } else if bottom > offset + viewport_height {
            bottom - viewport_height
        } else {
            return None;
        };
        let max = (content_height - viewport_height).max(0.0);
        let wanted = wanted.clamp(0.0, max);
        ((wanted - offset).abs() > f32::EPSILON).then_some(wanted)
    }
}
