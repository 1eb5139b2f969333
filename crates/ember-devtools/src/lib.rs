use web_time::Instant;

use ember_canvas::Painter;
use ember_core::draw::DrawList;
use ember_core::focus::FocusRegistry;
use ember_core::input::Key;
use ember_core::{Color, Rect, Scheduler, Vec2};

pub struct Hud {
    pub inspector_enabled: bool,
    pub hovered: Option<Rect>,
    frame_count: u64,
    last_frame: Option<Instant>,
    fps_smooth: f32,
    pub metrics: Option<Metrics>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            inspector_enabled: false,
            hovered: None,
            frame_count: 0,
            last_frame: None,
            fps_smooth: 0.0,
            metrics: None,
        }
    }
    pub fn toggle_inspector(&mut self) {
        self.inspector_enabled = !self.inspector_enabled;
    }
    pub fn set_hovered(&mut self, r: Option<Rect>) {
        self.hovered = r;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f32 {
        self.fps_smooth
    }

    pub fn tick(&mut self, now: Instant) {
        self.frame_count += 1;
        if let Some(prev) = self.last_frame.replace(now) {
            let dt = now.saturating_duration_since(prev).as_secs_f32();
            if dt > 0.0 {
                let fps = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.fps_smooth = if self.fps_smooth == 0.0 {
                    fps
                } else {
                    (1.0 - a) * self.fps_smooth + a * fps
                };
            }
        }
    }

    pub fn status_line(&self) -> String {
        let mut lines = vec![
            format!("frame: {}", self.frame_count),
            format!("fps: {:.1}", self.fps_smooth),
        ];
        if let Some(m) = &self.metrics {
            lines.push(format!("cmds: {}", m.draw_commands));
            lines.push(format!("verts: {}", m.vertices));
            lines.push(format!("focusables: {}", m.focusables));
            lines.push(format!("cached: {}", m.cached_entries));
        }
        lines.join("  |  ")
    }

    /// Outline last frame's focusables. Plain containers are skipped; the
    /// focused entry and the hovered rect get their own colours.
    pub fn overlay(&self, draw: &mut DrawList, focus: &FocusRegistry) {
        let focused = focus.focused();
        let mut p = Painter::new(draw, Vec2::ZERO);
        for f in focus.previous() {
            if !f.category.highlight_in_debug() {
                continue;
            }
            let (color, width) = if Some(f.id) == focused {
                (Color::from_hex("#88CCFF"), 2.0)
            } else {
                (Color(0x55, 0x55, 0x55, 160), 1.0)
            };
            p.draw_rect_stroke(f.rect, color, 0.0, width);
        }
        if let Some(r) = self.hovered {
            p.draw_rect_stroke(r, Color::from_hex("#44AAFF"), 0.0, 2.0);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    pub draw_commands: usize,
    pub vertices: usize,
    pub focusables: usize,
    pub cached_entries: usize,
}

impl Metrics {
    /// Snapshot of the frame being built.
    pub fn collect(s: &Scheduler) -> Self {
        let draw = s.draw.stats();
        Self {
            draw_commands: draw.commands,
            vertices: draw.vertices,
            focusables: s.focus.current().len(),
            cached_entries: s.stores().total_entries(),
        }
    }
}

pub struct Inspector {
    pub hud: Hud,
    pub toggle_key: Key,
}
impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self {
            hud: Hud::new(),
            toggle_key: Key::F(12),
        }
    }

    /// Call after the UI is built and before `end_frame`.
    pub fn frame(&mut self, s: &mut Scheduler) {
        if s.input.key_pressed(self.toggle_key) {
            self.hud.toggle_inspector();
            log::info!(
                "inspector {}",
                if self.hud.inspector_enabled { "on" } else { "off" }
            );
        }
        self.hud.tick(s.input.now);
        self.hud.metrics = Some(Metrics::collect(s));
        if self.hud.inspector_enabled {
            let hovered = s.input.pointer.and_then(|p| {
                s.focus
                    .previous()
                    .iter()
                    .rev()
                    .find(|f| f.category.highlight_in_debug() && f.hit(p))
                    .map(|f| f.visible_rect())
            });
            self.hud.set_hovered(hovered);
            self.hud.overlay(&mut s.draw, &s.focus);
        }
    }
}
