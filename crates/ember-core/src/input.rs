//! What the platform adapter hands the core each frame.
//!
//! The core never talks to a window system. An adapter collects events since
//! the last frame into an [`InputSnapshot`] and passes it to
//! `Scheduler::begin_frame`; widgets and the navigation pass only read it.

use bitflags::bitflags;
use smallvec::SmallVec;
use web_time::Instant;

use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,   // Left mouse, touch
    Secondary, // Right mouse
    Tertiary,  // Middle mouse
}

impl PointerButton {
    fn slot(self) -> usize {
        match self {
            PointerButton::Primary => 0,
            PointerButton::Secondary => 1,
            PointerButton::Tertiary => 2,
        }
    }
}

bitflags! {
    /// Per-button state for this frame. `PRESSED`/`RELEASED` are edges,
    /// `HELD` is level.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ButtonFlags: u8 {
        const PRESSED = 1 << 0;
        const HELD = 1 << 1;
        const RELEASED = 1 << 2;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on Mac, Win key on Windows
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    F(u8), // F1-F12
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub is_repeat: bool,
}

#[derive(Clone, Debug)]
pub struct InputSnapshot {
    /// Time the snapshot was taken; all time-based widget logic uses this.
    pub now: Instant,
    /// `None` when the pointer is outside the surface.
    pub pointer: Option<Vec2>,
    pub buttons: [ButtonFlags; 3],
    /// Scroll delta in pixels, positive y scrolls content up.
    pub wheel: Vec2,
    /// Text typed this frame, already composed.
    pub chars: String,
    /// Key presses in arrival order.
    pub keys: SmallVec<[KeyEvent; 8]>,
    /// Modifier state at snapshot time.
    pub modifiers: Modifiers,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl InputSnapshot {
    pub fn new(now: Instant) -> Self {
        Self {
            now,
            pointer: None,
            buttons: [ButtonFlags::empty(); 3],
            wheel: Vec2::ZERO,
            chars: String::new(),
            keys: SmallVec::new(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn button(&self, b: PointerButton) -> ButtonFlags {
        self.buttons[b.slot()]
    }

    pub fn pressed(&self, b: PointerButton) -> bool {
        self.button(b).contains(ButtonFlags::PRESSED)
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys.iter().any(|k| k.key == key)
    }

    // Builders for adapters and tests.

    pub fn with_pointer(mut self, p: Vec2) -> Self {
        self.pointer = Some(p);
        self
    }

    pub fn with_press(mut self, b: PointerButton) -> Self {
        self.buttons[b.slot()] |= ButtonFlags::PRESSED | ButtonFlags::HELD;
        self
    }

    pub fn with_release(mut self, b: PointerButton) -> Self {
        let slot = &mut self.buttons[b.slot()];
        slot.remove(ButtonFlags::HELD);
        slot.insert(ButtonFlags::RELEASED);
        self
    }

    pub fn with_wheel(mut self, dx: f32, dy: f32) -> Self {
        self.wheel = self.wheel + Vec2::new(dx, dy);
        self
    }

    pub fn with_key(self, key: Key) -> Self {
        let mods = self.modifiers;
        self.with_key_mods(key, mods)
    }

    pub fn with_key_mods(mut self, key: Key, modifiers: Modifiers) -> Self {
        self.keys.push(KeyEvent {
            key,
            modifiers,
            is_repeat: false,
        });
        self
    }

    pub fn with_text(mut self, s: &str) -> Self {
        self.chars.push_str(s);
        self
    }
}
