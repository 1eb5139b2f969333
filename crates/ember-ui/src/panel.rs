use ember_core::{FocusCategory, FocusHandle, Rect, Scheduler, ScopeInfo, Vec2, WidgetId};

use crate::UiStores;

/// A background that fits its content. Children are drawn first; `end`
/// measures them and slides the background underneath with
/// `DrawList::insert_at_front`.
#[must_use = "a Panel must be closed with end()"]
pub struct Panel {
    id: WidgetId,
    handle: FocusHandle,
    origin: Vec2,
    width: f32,
}

impl Panel {
    pub const PADDING: f32 = 8.0;

    pub fn begin(s: &mut Scheduler, label: &str, origin: Vec2, width: f32) -> Panel {
        let id = s.ids.push_scope(label);
        let handle = s.focus.begin_scope(
            id,
            label,
            FocusCategory::Container,
            Rect::new(origin.x, origin.y, width, 0.0),
        );
        s.focus.set_clip(handle, s.draw.clip());
        Panel {
            id,
            handle,
            origin,
            width,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Top-left of the padded content area.
    pub fn content_origin(&self) -> Vec2 {
        self.origin + Vec2::new(Self::PADDING, Self::PADDING)
    }

    pub fn content_width(&self) -> f32 {
        (self.width - 2.0 * Self::PADDING).max(0.0)
    }

    /// Returns the panel's final rect with what its scope learned about focus.
    pub fn end(self, s: &mut Scheduler, ui: &UiStores, content_height: f32) -> (Rect, ScopeInfo) {
        let rect = Rect::new(
            self.origin.x,
            self.origin.y,
            self.width,
            content_height.max(0.0) + 2.0 * Self::PADDING,
        );
        let color = ui.theme.surface;
        s.draw.insert_at_front(|bg| bg.add_rect(rect, color));
        s.focus.set_rect(self.handle, rect);
        let info = s.focus.end_scope();
        s.ids.pop_scope();
        (rect, info)
    }
}
