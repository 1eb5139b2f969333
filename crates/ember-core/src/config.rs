use web_time::Duration;

use crate::Size;

pub const DEFAULT_AUTO_SCROLL_COOLDOWN: Duration = Duration::from_millis(500);

/// Engine-wide knobs. Everything has a sensible default.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoreConfig {
    /// How long a manual scroll blocks auto-scroll-to-focus.
    pub auto_scroll_cooldown: Duration,
    /// Weight of vertical distance when navigating left/right.
    pub horizontal_nav_vertical_penalty: f32,
    /// Root clip until the platform reports a surface size.
    pub initial_viewport: Size,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            auto_scroll_cooldown: DEFAULT_AUTO_SCROLL_COOLDOWN,
            horizontal_nav_vertical_penalty: 2.0,
            initial_viewport: Size::new(1280.0, 800.0),
        }
    }
}
