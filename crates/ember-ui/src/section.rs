use ember_core::input::{Key, PointerButton};
use ember_core::{FocusCategory, Rect, Scheduler, ScopeInfo, Vec2, WidgetId};

use crate::{UiStores, stroke_rect};

/// Collapsible group with a focusable header. The open flag is cached per
/// section and starts open.
#[must_use = "a Section must be closed with end()"]
pub struct Section {
    id: WidgetId,
    header: Rect,
    open: bool,
}

impl Section {
    pub fn begin(s: &mut Scheduler, ui: &UiStores, label: &str, header: Rect) -> Section {
        let id = s.ids.push_scope(label);
        let focused = s.focus.is_focused(id);
        let clip = s.draw.clip();
        let visible = header.intersect(&clip);
        let clicked = s.input.pressed(PointerButton::Primary)
            && !visible.is_empty()
            && s.input.pointer.is_some_and(|p| visible.contains(p));
        let keyed = focused && (s.input.key_pressed(Key::Enter) || s.input.key_pressed(Key::Space));

        let open = {
            let flag = ui.sections.get(id, || true);
            let mut open = flag.lock();
            if clicked || keyed {
                *open = !*open;
                log::debug!("section '{label}' {}", if *open { "expanded" } else { "collapsed" });
            }
            *open
        };

        let handle = s.focus.begin_scope(id, label, FocusCategory::Section, header);
        s.focus.set_clip(handle, clip);
        s.focus.report_if_focused(id, header);

        let theme = &ui.theme;
        let bg = if focused {
            theme.button_bg_focused
        } else {
            theme.surface
        };
        s.draw.add_rect(header, bg);
        if focused {
            stroke_rect(&mut s.draw, header, 2.0, theme.focus);
        }
        let [a, b, c] = disclosure_arrow(header, open);
        s.draw.add_triangle(a, b, c, theme.on_surface);

        Section { id, header, open }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn header(&self) -> Rect {
        self.header
    }

    /// Whether to draw the children this frame.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn end(self, s: &mut Scheduler) -> ScopeInfo {
        let info = s.focus.end_scope();
        s.ids.pop_scope();
        info
    }
}

fn disclosure_arrow(header: Rect, open: bool) -> [Vec2; 3] {
    let r = header.h * 0.2;
    let cx = header.x + header.h * 0.5;
    let cy = header.y + header.h * 0.5;
    if open {
        [
            Vec2::new(cx - r, cy - r * 0.5),
            Vec2::new(cx + r, cy - r * 0.5),
            Vec2::new(cx, cy + r * 0.5),
        ]
    } else {
        [
            Vec2::new(cx - r * 0.5, cy - r),
            Vec2::new(cx + r * 0.5, cy),
            Vec2::new(cx - r * 0.5, cy + r),
        ]
    }
}
