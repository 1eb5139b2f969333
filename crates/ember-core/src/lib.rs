//! # Identity, State, Draw Lists, and Focus
//!
//! Ember redraws the whole UI from application code every frame. There is no
//! widget tree; continuity between frames comes from four pieces:
//!
//! - `IdStack`: turns each widget call into a stable `WidgetId`.
//! - `StateCache<T>`: per-widget state keyed on that id, evicted once a
//!   widget stops being drawn.
//! - `DrawList`: batches primitives into a few draw commands.
//! - `FocusRegistry`: keyboard focus and navigation, double-buffered so the
//!   input pass can see last frame's widgets.
//!
//! `Scheduler` owns one of each and runs them in order.
//!
//! ## A frame
//!
//! ```rust
//! use ember_core::*;
//!
//! let mut sched = Scheduler::new();
//! let clicks: StateCache<u32> = sched.cache("clicks");
//!
//! let data = sched.frame(InputSnapshot::default(), |s| {
//!     let id = s.ids.id("ok");
//!     let rect = Rect::new(10.0, 10.0, 80.0, 24.0);
//!     s.focus.register(id, "ok", rect, FocusCategory::Leaf);
//!     let count = clicks.get(id, || 0);
//!     *count.lock() += 1;
//!     s.draw.add_rect(rect, Color::from_hex("#3366ff"));
//! });
//! assert_eq!(data.commands.len(), 1);
//! ```
//!
//! ## Identity
//!
//! An id hashes the enclosing scope, a per-frame call counter and the label.
//! Loops should use `id_index` or open a scope per item:
//!
//! ```rust
//! use ember_core::id::IdStack;
//!
//! let mut ids = IdStack::new();
//! let rows: Vec<_> = ids.with_scope("rows", |ids| (0..3).map(|i| ids.id_index(i)).collect());
//! assert_eq!(rows.len(), 3);
//! ```
//!
//! - Ids are stable while the sequence of calls before them is unchanged.
//! - Conditionally skipping a widget renumbers the widgets after it in the
//!   same frame; wrap conditional regions in their own scope to contain that.
//!
//! ## Focus and scroll
//!
//! Navigation and `is_focused` read the list registered *last* frame, so the
//! input pass can run before anything is drawn. Containers open scopes; a
//! focused leaf reports its position and the nearest scrollable learns about
//! it when its scope closes (see `focus` and `autoscroll`).

pub mod autoscroll;
pub mod cache;
pub mod clipboard;
pub mod color;
pub mod config;
pub mod draw;
pub mod focus;
pub mod geometry;
pub mod id;
pub mod input;
pub mod prelude;
pub mod render_api;
pub mod runtime;
mod tests;

pub use color::*;
pub use geometry::*;
pub use prelude::*;
