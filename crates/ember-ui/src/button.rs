use ember_core::input::{Key, PointerButton};
use ember_core::{FocusCategory, Rect, Scheduler, WidgetId};

use crate::{Theme, stroke_rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Response {
    pub id: WidgetId,
    pub focused: bool,
    pub hovered: bool,
    /// Clicked, or Enter/Space while focused.
    pub activated: bool,
}

pub fn Button(s: &mut Scheduler, theme: &Theme, label: &str, rect: Rect) -> Response {
    let id = s.ids.id(label);
    leaf(s, theme, id, label, rect)
}

/// List item keyed by position rather than by label.
pub fn Row(s: &mut Scheduler, theme: &Theme, index: u64, rect: Rect) -> Response {
    let id = s.ids.id_index(index);
    leaf(s, theme, id, &format!("row {index}"), rect)
}

fn leaf(s: &mut Scheduler, theme: &Theme, id: WidgetId, name: &str, rect: Rect) -> Response {
    let clip = s.draw.clip();
    let handle = s.focus.register(id, name, rect, FocusCategory::Leaf);
    s.focus.set_clip(handle, clip);
    let focused = s.focus.report_if_focused(id, rect);

    let visible = rect.intersect(&clip);
    let hovered = !visible.is_empty() && s.input.pointer.is_some_and(|p| visible.contains(p));
    let activated = (hovered && s.input.pressed(PointerButton::Primary))
        || (focused && (s.input.key_pressed(Key::Enter) || s.input.key_pressed(Key::Space)));
    if activated {
        log::debug!("activated {id} '{name}'");
    }

    if !visible.is_empty() {
        let bg = if focused {
            theme.button_bg_focused
        } else {
            theme.button_bg
        };
        s.draw.add_rect(rect, bg);
        if focused {
            stroke_rect(&mut s.draw, rect, 2.0, theme.focus);
        }
    }

    Response {
        id,
        focused,
        hovered,
        activated,
    }
}
