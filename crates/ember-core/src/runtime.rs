use crate::cache::{StateCache, StoreRegistry};
use crate::clipboard::Clipboard;
use crate::config::CoreConfig;
use crate::draw::{DrawData, DrawList, DrawStats};
use crate::focus::{Direction, FocusRegistry};
use crate::id::IdStack;
use crate::input::{InputSnapshot, Key, PointerButton};
use crate::render_api::{RenderBackend, RenderError};
use crate::{Rect, Size};

/// Owns one of each frame component and drives the per-frame sequence:
///
/// 1. `begin_frame`: sweep caches, swap focus lists, clear the draw list,
///    reset identities, install the new input;
/// 2. input pass: navigation against last frame's focusables;
/// 3. draw pass: the application builds the UI;
/// 4. `end_frame`: finalize the draw list for the backend.
///
/// Components are public fields so widget code can borrow several at once.
pub struct Scheduler {
    pub ids: IdStack,
    pub draw: DrawList,
    pub focus: FocusRegistry,
    pub input: InputSnapshot,
    pub clipboard: Option<Box<dyn Clipboard>>,
    stores: StoreRegistry,
    config: CoreConfig,
    frame: u64,
    in_frame: bool,
    size: Size,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    pub fn with_config(config: CoreConfig) -> Self {
        let size = config.initial_viewport;
        Self {
            ids: IdStack::new(),
            draw: DrawList::new(Rect::from_size(size)),
            focus: FocusRegistry::with_vertical_penalty(config.horizontal_nav_vertical_penalty),
            input: InputSnapshot::default(),
            clipboard: None,
            stores: StoreRegistry::new(),
            config,
            frame: 0,
            in_frame: false,
            size,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn stores(&self) -> &StoreRegistry {
        &self.stores
    }

    /// New cache swept by this scheduler.
    pub fn cache<T: Send + 'static>(&self, name: &'static str) -> StateCache<T> {
        StateCache::new(&self.stores, name)
    }

    pub fn frame_number(&self) -> u64 {
        self.frame
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Surface size changed. Applies from the next frame.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.draw.set_viewport(Rect::from_size(size));
    }

    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.clipboard = Some(clipboard);
    }

    pub fn begin_frame(&mut self, input: InputSnapshot) -> u64 {
        if self.in_frame {
            log::warn!("begin_frame: frame {} was never ended", self.frame);
        }
        self.frame += 1;
        let evicted = self.stores.advance(self.frame);
        self.focus.reset_for_frame(self.frame);
        self.draw.clear();
        self.ids.reset();
        self.input = input;
        self.in_frame = true;
        if evicted > 0 {
            log::debug!("frame {}: evicted {evicted} stale state record(s)", self.frame);
        }
        self.frame
    }

    pub fn end_frame(&mut self) -> DrawData<'_> {
        if !self.in_frame {
            log::warn!("end_frame without begin_frame");
        }
        self.in_frame = false;
        if self.focus.scope_depth() > 0 {
            log::warn!("end_frame: {} focus scope(s) still open", self.focus.scope_depth());
        }
        self.draw.finalize()
    }

    /// One whole frame: begin, keyboard/pointer navigation, `build`, end.
    pub fn frame<F>(&mut self, input: InputSnapshot, build: F) -> DrawData<'_>
    where
        F: FnOnce(&mut Scheduler),
    {
        self.begin_frame(input);
        self.apply_navigation_input();
        build(self);
        self.end_frame()
    }

    /// End the frame if needed and submit it.
    pub fn present<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<DrawStats, RenderError> {
        let data = if self.in_frame {
            self.end_frame()
        } else {
            self.draw.finalize()
        };
        let stats = data.stats();
        backend.render(&data)?;
        Ok(stats)
    }

    /// Map this frame's keys and clicks onto focus operations. Runs against
    /// last frame's focusables, so it belongs before the draw pass.
    /// Returns whether focus moved.
    pub fn apply_navigation_input(&mut self) -> bool {
        let mut changed = false;
        for ev in &self.input.keys {
            changed |= match ev.key {
                Key::ArrowUp => self.focus.navigate(Direction::Up),
                Key::ArrowDown => self.focus.navigate(Direction::Down),
                Key::ArrowLeft => self.focus.navigate(Direction::Left),
                Key::ArrowRight => self.focus.navigate(Direction::Right),
                Key::Tab if ev.modifiers.shift => self.focus.focus_prev(),
                Key::Tab => self.focus.focus_next(),
                Key::Escape => {
                    let had = self.focus.focus_request().is_some();
                    self.focus.clear_focus();
                    had
                }
                _ => false,
            };
        }
        if self.input.pressed(PointerButton::Primary)
            && let Some(p) = self.input.pointer
        {
            changed |= self.focus.focus_at(p);
        }
        changed
    }
}
