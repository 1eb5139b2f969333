//! # Scroll areas
//!
//! A [`ScrollArea`] is a vertical viewport over content laid out by the
//! caller. Its [`ScrollState`] lives in a frame-scoped cache keyed on the
//! area's identity, so the offset survives as long as the area keeps being
//! drawn.
//!
//! Offsets move three ways:
//!
//! - the mouse wheel over the visible part of the viewport. Nested areas
//!   close inside out, so the innermost one takes the wheel first and hands
//!   what it could not use to its parent,
//! - dragging the scrollbar thumb,
//! - auto-scroll: when a descendant holds focus, `end` nudges the offset so
//!   the focused widget is visible on the next frame.
//!
//! The first two count as manual scrolling and pause auto-scroll for the
//! configured cooldown, so keyboard focus does not yank the view back while
//! the user is reading elsewhere.

use ember_core::input::{ButtonFlags, PointerButton};
use ember_core::{
    AutoScroll, FocusCategory, Rect, Scheduler, ScopeInfo, StateRef, Vec2, WidgetId,
};
use web_time::Duration;

use crate::UiStores;

const SCROLLBAR_THICKNESS: f32 = 6.0;
const SCROLLBAR_MARGIN: f32 = 2.0;
const MIN_THUMB: f32 = 24.0;

#[derive(Clone, Debug)]
pub struct ScrollState {
    offset: f32,
    viewport_height: f32,
    content_height: f32,
    dragging: bool,
    pub auto: AutoScroll,
}

impl ScrollState {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            offset: 0.0,
            viewport_height: 0.0,
            content_height: 0.0,
            dragging: false,
            auto: AutoScroll::new(cooldown),
        }
    }

    pub fn get(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    pub fn set_viewport_height(&mut self, h: f32) {
        self.viewport_height = h.max(0.0);
        self.clamp_offset();
    }

    pub fn set_content_height(&mut self, h: f32) {
        self.content_height = h.max(0.0);
        self.clamp_offset();
    }

    pub fn set_offset(&mut self, off: f32) {
        self.offset = off.clamp(0.0, self.max_offset());
    }

    /// Consume `dy` pixels, clamp to bounds, return the leftover for an
    /// enclosing scrollable.
    pub fn scroll_immediate(&mut self, dy: f32) -> f32 {
        let before = self.offset;
        self.set_offset(before + dy);
        dy - (self.offset - before)
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    /// Track and thumb rects for `viewport`, or `None` if everything fits.
    fn scrollbar(&self, viewport: Rect) -> Option<(Rect, Rect)> {
        if self.content_height <= viewport.h + 0.5 {
            return None;
        }
        let track = Rect::new(
            viewport.right() - SCROLLBAR_MARGIN - SCROLLBAR_THICKNESS,
            viewport.y + SCROLLBAR_MARGIN,
            SCROLLBAR_THICKNESS,
            (viewport.h - 2.0 * SCROLLBAR_MARGIN).max(0.0),
        );
        let ratio = (viewport.h / self.content_height).clamp(0.0, 1.0);
        let thumb_h = (track.h * ratio).clamp(MIN_THUMB.min(track.h), track.h);
        let t = (self.offset / self.max_offset().max(1.0)).clamp(0.0, 1.0);
        let thumb_y = track.y + t * (track.h - thumb_h).max(0.0);
        Some((track, Rect::new(track.x, thumb_y, track.w, thumb_h)))
    }

    /// Offset that puts the thumb's centre under pointer y `py`.
    fn offset_for_thumb(&self, track: Rect, thumb_h: f32, py: f32) -> f32 {
        let max_pos = (track.h - thumb_h).max(0.0);
        let pos = (py - track.y - thumb_h * 0.5).clamp(0.0, max_pos);
        let t = if max_pos > 0.0 { pos / max_pos } else { 0.0 };
        t * self.max_offset()
    }
}

/// An open scroll area. Close it with [`ScrollArea::end`].
#[must_use = "a ScrollArea must be closed with end()"]
pub struct ScrollArea {
    id: WidgetId,
    viewport: Rect,
    offset: f32,
    state: StateRef<ScrollState>,
}

impl ScrollArea {
    pub fn begin(s: &mut Scheduler, ui: &UiStores, label: &str, viewport: Rect) -> ScrollArea {
        let id = s.ids.push_scope(label);
        let cooldown = s.config().auto_scroll_cooldown;
        let state = ui.scroll.get(id, || ScrollState::new(cooldown));

        let offset = {
            let mut st = state.lock();
            st.set_viewport_height(viewport.h);
            st.get()
        };

        let handle = s.focus.begin_scope(id, label, FocusCategory::List, viewport);
        s.focus.set_clip(handle, s.draw.clip());
        s.draw.push_clip(viewport);
        ScrollArea {
            id,
            viewport,
            offset,
            state,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Offset used for this frame's content.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Screen position of content coordinate (0, 0).
    pub fn content_origin(&self) -> Vec2 {
        Vec2::new(self.viewport.x, self.viewport.y - self.offset)
    }

    /// Close the area. `content_height` is the height the caller laid out.
    /// Offset changes (wheel, drag, auto-scroll) show from the next frame.
    /// Wheel delta this area consumes is removed from `s.input.wheel`.
    pub fn end(self, s: &mut Scheduler, ui: &UiStores, content_height: f32) -> ScopeInfo {
        s.draw.pop_clip();
        let info = s.focus.end_scope();
        s.ids.pop_scope();

        let mut st = self.state.lock();
        st.set_content_height(content_height);

        let visible = self.viewport.intersect(&s.draw.clip());
        let over = !visible.is_empty() && s.input.pointer.is_some_and(|p| visible.contains(p));
        if over && s.input.wheel.y != 0.0 {
            let before = st.get();
            let leftover = st.scroll_immediate(s.input.wheel.y);
            if st.get() != before {
                st.auto.note_manual_scroll(s.input.now);
            }
            s.input.wheel.y = leftover;
        }

        if let Some((track, thumb)) = st.scrollbar(self.viewport) {
            let primary = s.input.button(PointerButton::Primary);
            if let Some(p) = s.input.pointer {
                if primary.contains(ButtonFlags::PRESSED) && thumb.expand(2.0).contains(p) {
                    st.dragging = true;
                }
                if st.dragging && primary.contains(ButtonFlags::HELD) {
                    let off = st.offset_for_thumb(track, thumb.h, p.y);
                    st.set_offset(off);
                    st.auto.note_manual_scroll(s.input.now);
                }
            }
            if !primary.contains(ButtonFlags::HELD) {
                st.dragging = false;
            }
        }

        // Reported y is screen space; auto-scroll wants content space.
        let local = ScopeInfo {
            child_y: info.child_y - self.viewport.y + self.offset,
            ..info
        };
        let (offset, viewport_h, content_h) = (st.get(), self.viewport.h, st.content_height);
        if let Some(target) = st
            .auto
            .target_offset(offset, viewport_h, content_h, &local, s.input.now)
        {
            log::trace!("scroll {}: auto-scroll {offset} -> {target}", self.id);
            st.set_offset(target);
        }

        if let Some((track, thumb)) = st.scrollbar(self.viewport) {
            s.draw.add_rect(track, ui.theme.scrollbar_track);
            s.draw.add_rect(thumb, ui.theme.scrollbar_thumb);
        }
        info
    }
}
