pub use crate::autoscroll::AutoScroll;
pub use crate::cache::{StateCache, StateRef, StoreRegistry};
pub use crate::clipboard::{Clipboard, MemoryClipboard};
pub use crate::color::Color;
pub use crate::config::CoreConfig;
pub use crate::draw::{DrawCmd, DrawData, DrawList, DrawStats, GlyphQuad, TextureId, Vertex};
pub use crate::focus::{Direction, FocusCategory, FocusHandle, FocusRegistry, ScopeInfo};
pub use crate::geometry::{Rect, Size, Vec2};
pub use crate::id::{IdStack, WidgetId};
pub use crate::input::{ButtonFlags, InputSnapshot, Key, KeyEvent, Modifiers, PointerButton};
pub use crate::render_api::{RenderBackend, RenderError};
pub use crate::runtime::Scheduler;
