//! Headless walk through a scroll area of collapsible sections.
//!
//! Run with `RUST_LOG=focus_walk=info` (or `debug` for per-frame detail).

use ember_canvas::Painter;
use ember_core::prelude::*;
use ember_devtools::Inspector;
use ember_ui::*;
use web_time::{Duration, Instant};

const ROW_H: f32 = 22.0;
const SECTIONS: [(&str, u64); 3] = [("sources", 12), ("assets", 6), ("tests", 9)];

/// Counts frames instead of drawing them.
#[derive(Default)]
struct RecordingBackend {
    surface: (u32, u32),
    frames: usize,
    commands: usize,
    vertices: usize,
}

impl RenderBackend for RecordingBackend {
    fn configure_surface(&mut self, width: u32, height: u32) {
        self.surface = (width, height);
    }

    fn render(&mut self, data: &DrawData<'_>) -> Result<(), RenderError> {
        for cmd in data.commands {
            if cmd.texture != self.default_font_texture() {
                return Err(RenderError::UnknownTexture(cmd.texture));
            }
        }
        self.frames += 1;
        self.commands += data.commands.len();
        self.vertices += data.vertices.len();
        Ok(())
    }
}

/// Returns the scroll offset used this frame.
fn app(s: &mut Scheduler, ui: &UiStores) -> f32 {
    let panel = Panel::begin(s, "toolbar", Vec2::new(10.0, 10.0), 380.0);
    let o = panel.content_origin();
    let w = (panel.content_width() - 8.0) / 2.0;
    if Button(s, &ui.theme, "refresh", Rect::new(o.x, o.y, w, ROW_H)).activated {
        log::info!("refresh pressed");
    }
    let status = Button(s, &ui.theme, "status", Rect::new(o.x + w + 8.0, o.y, w, ROW_H));
    let _ = panel.end(s, ui, ROW_H);

    // Status light next to the toolbar.
    let light = if status.focused {
        Color::from_hex("#34AF82")
    } else {
        Color::from_hex("#555555")
    };
    Painter::new(&mut s.draw, Vec2::new(405.0, 29.0)).draw_circle(Vec2::ZERO, 6.0, light);

    let area = ScrollArea::begin(s, ui, "tree", Rect::new(10.0, 60.0, 380.0, 200.0));
    let origin = area.content_origin();
    let mut y = 0.0;
    for (label, rows) in SECTIONS {
        let sec = Section::begin(s, ui, label, Rect::new(origin.x, origin.y + y, 380.0, ROW_H));
        y += ROW_H;
        if sec.is_open() {
            for i in 0..rows {
                let rect = Rect::new(origin.x + 16.0, origin.y + y, 364.0, ROW_H);
                if Row(s, &ui.theme, i, rect).activated {
                    log::info!("{label}/{i} activated");
                }
                y += ROW_H;
            }
        }
        let _ = sec.end(s);
    }
    let offset = area.offset();
    let info = area.end(s, ui, y);
    if info.has_focused_child {
        log::debug!("focused row at y={} h={}", info.child_y, info.child_height);
    }
    offset
}

/// Input for frame `n`, taken at `now`.
fn script(n: u32, now: Instant) -> InputSnapshot {
    let input = InputSnapshot::new(now);
    match n {
        1 => input.with_key(Key::F(12)),
        2 => input.with_key(Key::Tab),
        3 => input.with_key(Key::ArrowRight),
        4..=20 => input.with_key(Key::ArrowDown),
        // Scroll back up by hand, then keep moving before the cooldown ends.
        21 => input
            .with_pointer(Vec2::new(200.0, 150.0))
            .with_wheel(0.0, -120.0),
        22..=24 => input.with_key(Key::ArrowDown),
        25 => input.with_key(Key::Enter),
        60 => input
            .with_pointer(Vec2::new(200.0, 70.0))
            .with_press(PointerButton::Primary),
        61 => input.with_key(Key::Enter),
        62 => input.with_key(Key::Escape),
        _ => input,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut sched = Scheduler::new();
    sched.set_clipboard(Box::new(MemoryClipboard::new()));
    let ui = UiStores::new(&sched);
    let mut inspector = Inspector::new();
    let mut backend = RecordingBackend::default();
    let size = sched.size();
    backend.configure_surface(size.width as u32, size.height as u32);

    let t0 = Instant::now();
    for n in 0..64u32 {
        let now = t0 + Duration::from_millis(16 * n as u64);
        sched.begin_frame(script(n, now));
        sched.apply_navigation_input();
        let offset = app(&mut sched, &ui);
        inspector.frame(&mut sched);
        let stats = sched.present(&mut backend)?;

        let focused = sched
            .focus
            .focused_entry()
            .map(|f| f.name.clone())
            .unwrap_or_else(|| "-".to_string());
        log::info!(
            "frame {n:>2}: focus={focused:<10} scroll={offset:>6.1} cmds={} verts={}",
            stats.commands,
            stats.vertices
        );
        log::debug!("{}", inspector.hud.status_line());
    }

    if let Some(clip) = sched.clipboard.as_mut() {
        clip.set_text(&inspector.hud.status_line());
        log::info!("copied: {}", clip.get_text().unwrap_or_default());
    }
    log::info!(
        "{} frames at {}x{}, {} draw commands, {} vertices",
        backend.frames,
        backend.surface.0,
        backend.surface.1,
        backend.commands,
        backend.vertices
    );
    Ok(())
}
