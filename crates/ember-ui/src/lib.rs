#![allow(non_snake_case)]
//! Widgets built on the Ember frame core.
//!
//! Layout is the caller's job: every widget takes the screen rect it should
//! occupy. Widgets register with the focus registry, keep their state in
//! caches owned by [`UiStores`], and draw into the scheduler's draw list.
//!
//! Containers come in `begin`/`end` pairs:
//!
//! ```rust
//! use ember_core::*;
//! use ember_ui::*;
//!
//! let mut sched = Scheduler::new();
//! let ui = UiStores::new(&sched);
//!
//! sched.frame(InputSnapshot::default(), |s| {
//!     let area = ScrollArea::begin(s, &ui, "log", Rect::new(0.0, 0.0, 300.0, 100.0));
//!     let origin = area.content_origin();
//!     for i in 0..20 {
//!         let rect = Rect::new(origin.x, origin.y + i as f32 * 24.0, 300.0, 24.0);
//!         Row(s, &ui.theme, i, rect);
//!     }
//!     area.end(s, &ui, 20.0 * 24.0);
//! });
//! ```

pub mod button;
pub mod panel;
pub mod scroll;
pub mod section;

pub use button::{Button, Response, Row};
pub use panel::Panel;
pub use scroll::{ScrollArea, ScrollState};
pub use section::Section;

use ember_core::{Color, Rect, Scheduler, StateCache, draw::DrawList};

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    /// Window background / app root.
    pub background: Color,
    /// Default container surface (panels, section headers).
    pub surface: Color,
    /// Rows and buttons.
    pub button_bg: Color,
    /// Focused rows and buttons.
    pub button_bg_focused: Color,
    /// Color for focus rings.
    pub focus: Color,
    /// Disclosure arrows on section headers.
    pub on_surface: Color,
    /// Scrollbar track background (low emphasis).
    pub scrollbar_track: Color,
    /// Scrollbar thumb (higher emphasis).
    pub scrollbar_thumb: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_hex("#121212"),
            surface: Color::from_hex("#1E1E1E"),
            button_bg: Color::from_hex("#2A2A2A"),
            button_bg_focused: Color::from_hex("#34AF82"),
            focus: Color::from_hex("#88CCFF"),
            on_surface: Color::from_hex("#DDDDDD"),
            scrollbar_track: Color(0xDD, 0xDD, 0xDD, 32),
            scrollbar_thumb: Color(0xDD, 0xDD, 0xDD, 140),
        }
    }
}

/// Widget state caches, registered with one scheduler's store registry.
pub struct UiStores {
    pub theme: Theme,
    scroll: StateCache<ScrollState>,
    sections: StateCache<bool>,
}

impl UiStores {
    pub fn new(sched: &Scheduler) -> Self {
        Self::with_theme(sched, Theme::default())
    }

    pub fn with_theme(sched: &Scheduler, theme: Theme) -> Self {
        Self {
            theme,
            scroll: sched.cache("ember-ui/scroll"),
            sections: sched.cache("ember-ui/section-open"),
        }
    }
}

/// Four edge quads around `rect`, inside it.
pub(crate) fn stroke_rect(draw: &mut DrawList, rect: Rect, width: f32, color: Color) {
    let w = width.min(rect.w * 0.5).min(rect.h * 0.5);
    draw.add_rect(Rect::new(rect.x, rect.y, rect.w, w), color);
    draw.add_rect(Rect::new(rect.x, rect.bottom() - w, rect.w, w), color);
    draw.add_rect(Rect::new(rect.x, rect.y + w, w, rect.h - 2.0 * w), color);
    draw.add_rect(Rect::new(rect.right() - w, rect.y + w, w, rect.h - 2.0 * w), color);
}
