//! # Focus registry
//!
//! Keyboard focus in an immediate-mode UI has an ordering problem: input is
//! handled *before* the draw pass that tells us which widgets exist. The
//! registry resolves it with two lists:
//!
//! - `current` is rebuilt during this frame's draw pass by [`FocusRegistry::register`],
//! - `previous` is last frame's list, complete and immutable; every
//!   navigation and "is focused" query reads it.
//!
//! [`FocusRegistry::reset_for_frame`] swaps them at frame start.
//!
//! ## Scopes
//!
//! Containers wrap their children in `begin_scope` / `end_scope`. A focused
//! leaf calls [`FocusRegistry::report_child_focus`] with its position; the
//! nearest enclosing scope picks the report up when it closes and passes it
//! on to its own parent. A scroll area three levels up therefore learns
//! where the focused row is without knowing anything about the row.
//!
//! ```rust
//! use ember_core::Rect;
//! use ember_core::focus::{FocusCategory, FocusRegistry};
//! use ember_core::id::WidgetId;
//!
//! let mut focus = FocusRegistry::new();
//! focus.reset_for_frame(1);
//! focus.begin_scope(WidgetId(1), "list", FocusCategory::List, Rect::new(0.0, 0.0, 200.0, 100.0));
//! focus.report_child_focus(40.0, 20.0);
//! let info = focus.end_scope();
//! assert!(info.has_focused_child);
//! assert_eq!(info.child_y, 40.0);
//! ```

use smallvec::SmallVec;

use crate::id::WidgetId;
use crate::{Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn slot(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// What kind of thing registered. Closed set; scopes use everything but `Leaf`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusCategory {
    Leaf,
    Container,
    Section,
    List,
}

impl FocusCategory {
    pub fn focusable_by_default(self) -> bool {
        match self {
            FocusCategory::Leaf | FocusCategory::Section => true,
            FocusCategory::Container | FocusCategory::List => false,
        }
    }

    /// Debug overlays outline everything except plain containers.
    pub fn highlight_in_debug(self) -> bool {
        match self {
            FocusCategory::Container => false,
            FocusCategory::Leaf | FocusCategory::Section | FocusCategory::List => true,
        }
    }
}

/// Explicit per-direction navigation targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavOverrides {
    targets: [Option<WidgetId>; 4],
}

impl NavOverrides {
    pub fn get(&self, dir: Direction) -> Option<WidgetId> {
        self.targets[dir.slot()]
    }

    pub fn set(&mut self, dir: Direction, target: Option<WidgetId>) {
        self.targets[dir.slot()] = target;
    }
}

#[derive(Clone, Debug)]
pub struct Focusable {
    pub id: WidgetId,
    pub name: String,
    pub rect: Rect,
    /// Clip the widget was drawn under. `None` means unclipped.
    pub clip: Option<Rect>,
    pub category: FocusCategory,
    /// Index (in the same list) of the enclosing scope's own entry.
    pub parent: Option<usize>,
    pub overrides: NavOverrides,
    pub can_focus: bool,
}

impl Focusable {
    /// The part of `rect` that was actually on screen.
    pub fn visible_rect(&self) -> Rect {
        match self.clip {
            Some(clip) => self.rect.intersect(&clip),
            None => self.rect,
        }
    }

    /// Hit test against the visible part only.
    pub fn hit(&self, p: Vec2) -> bool {
        let visible = self.visible_rect();
        !visible.is_empty() && visible.contains(p)
    }
}

/// Refers to an entry registered this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusHandle(usize);

impl FocusHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a closing scope learned about focus among its descendants.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScopeInfo {
    pub has_focused_child: bool,
    pub child_y: f32,
    pub child_height: f32,
    /// Entry of the focused descendant in this frame's list, if it registered
    /// before reporting.
    pub child_index: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ChildFocus {
    y: f32,
    height: f32,
}

#[derive(Debug)]
struct ScopeNode {
    /// The scope's own entry in `current`.
    index: usize,
    focused_child: Option<usize>,
    // Parent's pending report, restored if nothing inside reports.
    saved: Option<ChildFocus>,
}

pub struct FocusRegistry {
    current: Vec<Focusable>,
    previous: Vec<Focusable>,
    focused: Option<WidgetId>,
    focused_prev: Option<usize>,
    focused_cur: Option<usize>,
    last_reset: Option<u64>,
    scopes: SmallVec<[ScopeNode; 8]>,
    pending: Option<ChildFocus>,
    vertical_penalty: f32,
}

impl Default for FocusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusRegistry {
    pub fn new() -> Self {
        Self::with_vertical_penalty(2.0)
    }

    /// `penalty` weighs vertical distance in horizontal navigation.
    pub fn with_vertical_penalty(penalty: f32) -> Self {
        Self {
            current: Vec::new(),
            previous: Vec::new(),
            focused: None,
            focused_prev: None,
            focused_cur: None,
            last_reset: None,
            scopes: SmallVec::new(),
            pending: None,
            vertical_penalty: penalty,
        }
    }

    /// Swap the lists. A second call for the same frame does nothing and
    /// returns false.
    pub fn reset_for_frame(&mut self, frame: u64) -> bool {
        if self.last_reset == Some(frame) {
            log::debug!("FocusRegistry::reset_for_frame({frame}) called twice; ignoring");
            return false;
        }
        if !self.scopes.is_empty() {
            log::warn!(
                "FocusRegistry: {} scope(s) left open at frame end; discarding",
                self.scopes.len()
            );
            self.scopes.clear();
        }
        std::mem::swap(&mut self.current, &mut self.previous);
        self.current.clear();
        self.focused_prev = self.focused_cur.take();
        self.pending = None;
        self.last_reset = Some(frame);
        true
    }

    pub fn register(
        &mut self,
        id: WidgetId,
        name: impl Into<String>,
        rect: Rect,
        category: FocusCategory,
    ) -> FocusHandle {
        let index = self.current.len();
        self.current.push(Focusable {
            id,
            name: name.into(),
            rect,
            clip: None,
            category,
            parent: self.scopes.last().map(|s| s.index),
            overrides: NavOverrides::default(),
            can_focus: category.focusable_by_default(),
        });
        if self.focused == Some(id) {
            self.focused_cur = Some(index);
        }
        FocusHandle(index)
    }

    pub fn set_nav_override(&mut self, handle: FocusHandle, dir: Direction, target: WidgetId) {
        if let Some(f) = self.current.get_mut(handle.0) {
            f.overrides.set(dir, Some(target));
        }
    }

    pub fn set_can_focus(&mut self, handle: FocusHandle, can_focus: bool) {
        if let Some(f) = self.current.get_mut(handle.0) {
            f.can_focus = can_focus;
        }
    }

    /// For containers whose size is only known once their children are done.
    pub fn set_rect(&mut self, handle: FocusHandle, rect: Rect) {
        if let Some(f) = self.current.get_mut(handle.0) {
            f.rect = rect;
        }
    }

    /// Record the clip the entry is drawn under; hit tests ignore the part
    /// outside it.
    pub fn set_clip(&mut self, handle: FocusHandle, clip: Rect) {
        if let Some(f) = self.current.get_mut(handle.0) {
            f.clip = Some(clip);
        }
    }

    pub fn entry(&self, handle: FocusHandle) -> Option<&Focusable> {
        self.current.get(handle.0)
    }

    /// Focus `id`. Returns whether it was registered last frame; if not, the
    /// request is remembered and resolves once the widget registers.
    pub fn set_focus(&mut self, id: WidgetId) -> bool {
        self.focused = Some(id);
        self.focused_prev = self.previous.iter().position(|f| f.id == id);
        self.focused_cur = self.current.iter().rposition(|f| f.id == id);
        self.focused_prev.is_some()
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
        self.focused_prev = None;
        self.focused_cur = None;
    }

    /// Focused widget as resolved against last frame's list.
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused_prev.map(|i| self.previous[i].id)
    }

    /// The requested focus, resolved or not.
    pub fn focus_request(&self) -> Option<WidgetId> {
        self.focused
    }

    pub fn is_focused(&self, id: WidgetId) -> bool {
        self.focused() == Some(id)
    }

    pub fn focused_entry(&self) -> Option<&Focusable> {
        self.focused_prev.map(|i| &self.previous[i])
    }

    pub fn previous(&self) -> &[Focusable] {
        &self.previous
    }

    pub fn current(&self) -> &[Focusable] {
        &self.current
    }

    /// Move focus one step. False means nothing changed: no candidates, or
    /// already at the edge.
    pub fn navigate(&mut self, dir: Direction) -> bool {
        let Some(from) = self.focused_prev else {
            return self.focus_first();
        };

        if let Some(target) = self.previous[from].overrides.get(dir) {
            match self.find_focusable(target) {
                Some(i) => return self.land(i),
                None => log::debug!("nav override {target} ({dir:?}) is gone; using heuristics"),
            }
        }

        let next = match dir {
            Direction::Down => self.step_linear(from, true),
            Direction::Up => self.step_linear(from, false),
            Direction::Left | Direction::Right => self.nearest_horizontal(from, dir),
        };
        match next {
            Some(i) => self.land(i),
            None => false,
        }
    }

    /// Tab order: like `navigate(Down)` but wraps around.
    pub fn focus_next(&mut self) -> bool {
        self.cycle(true)
    }

    pub fn focus_prev(&mut self) -> bool {
        self.cycle(false)
    }

    /// Click focus: the last registered (topmost) focusable whose visible
    /// part contains `p`.
    pub fn focus_at(&mut self, p: Vec2) -> bool {
        match self
            .previous
            .iter()
            .rposition(|f| f.can_focus && f.hit(p))
        {
            Some(i) => self.land(i),
            None => false,
        }
    }

    pub fn begin_scope(
        &mut self,
        id: WidgetId,
        name: impl Into<String>,
        category: FocusCategory,
        rect: Rect,
    ) -> FocusHandle {
        let handle = self.register(id, name, rect, category);
        self.scopes.push(ScopeNode {
            index: handle.0,
            focused_child: None,
            saved: self.pending.take(),
        });
        handle
    }

    pub fn end_scope(&mut self) -> ScopeInfo {
        let Some(node) = self.scopes.pop() else {
            log::warn!("FocusRegistry::end_scope with no open scope");
            return ScopeInfo::default();
        };
        match self.pending {
            // Left in place so the enclosing scope sees it too.
            Some(child) => {
                if let Some(scope) = self.current.get(node.index) {
                    log::trace!(
                        "scope {} ({:?}) has focused child {:?} at y={}",
                        scope.id,
                        scope.category,
                        node.focused_child,
                        child.y
                    );
                }
                ScopeInfo {
                    has_focused_child: true,
                    child_y: child.y,
                    child_height: child.height,
                    child_index: node.focused_child,
                }
            }
            None => {
                self.pending = node.saved;
                ScopeInfo::default()
            }
        }
    }

    /// Report the focused descendant's position to the enclosing scopes.
    /// Every open scope records which entry it was.
    pub fn report_child_focus(&mut self, y: f32, height: f32) {
        let index = self.focused_cur;
        for scope in self.scopes.iter_mut() {
            scope.focused_child = index;
        }
        self.pending = Some(ChildFocus { y, height });
    }

    /// Convenience for leaves: report `rect` if `id` holds focus.
    pub fn report_if_focused(&mut self, id: WidgetId, rect: Rect) -> bool {
        let focused = self.is_focused(id);
        if focused {
            self.report_child_focus(rect.y, rect.h);
        }
        focused
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn current_scope(&self) -> Option<(WidgetId, Rect)> {
        let node = self.scopes.last()?;
        self.current.get(node.index).map(|f| (f.id, f.rect))
    }

    fn land(&mut self, i: usize) -> bool {
        let id = self.previous[i].id;
        log::trace!("focus -> {} '{}'", id, self.previous[i].name);
        self.focused = Some(id);
        self.focused_prev = Some(i);
        self.focused_cur = self.current.iter().rposition(|f| f.id == id);
        true
    }

    fn focus_first(&mut self) -> bool {
        match self.previous.iter().position(|f| f.can_focus) {
            Some(i) => self.land(i),
            None => false,
        }
    }

    fn find_focusable(&self, id: WidgetId) -> Option<usize> {
        self.previous.iter().position(|f| f.id == id && f.can_focus)
    }

    fn step_linear(&self, from: usize, forward: bool) -> Option<usize> {
        if forward {
            (from + 1..self.previous.len()).find(|&i| self.previous[i].can_focus)
        } else {
            (0..from).rev().find(|&i| self.previous[i].can_focus)
        }
    }

    fn nearest_horizontal(&self, from: usize, dir: Direction) -> Option<usize> {
        let origin = self.previous[from].rect;
        self.previous
            .iter()
            .enumerate()
            .filter(|(i, f)| {
                *i != from
                    && f.can_focus
                    && match dir {
                        Direction::Right => f.rect.x > origin.x,
                        Direction::Left => f.rect.x < origin.x,
                        Direction::Up | Direction::Down => false,
                    }
            })
            .map(|(i, f)| {
                let dx = (f.rect.x - origin.x).abs();
                let dy = (f.rect.y - origin.y).abs();
                (i, dx + self.vertical_penalty * dy)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn cycle(&mut self, forward: bool) -> bool {
        let n = self.previous.len();
        let Some(from) = self.focused_prev else {
            let first = if forward {
                self.previous.iter().position(|f| f.can_focus)
            } else {
                self.previous.iter().rposition(|f| f.can_focus)
            };
            return first.is_some_and(|i| self.land(i));
        };
        let next = (1..n)
            .map(|k| if forward { (from + k) % n } else { (from + n - k) % n })
            .find(|&i| self.previous[i].can_focus);
        match next {
            Some(i) => self.land(i),
            None => false,
        }
    }
}
