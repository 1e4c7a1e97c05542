//! Window event payloads
//!
//! Every event category has its own type so each can travel on its own
//! channel. All payloads are plain `Copy` data and may be sent to other
//! threads.

use crate::geometry::Point;

/// Keyboard key, as reported by GLFW
pub type Key = glfw::Key;

/// Mouse button, as reported by GLFW
pub type Button = glfw::MouseButton;

bitflags::bitflags! {
    /// Keyboard modifiers held down while an event happened
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Mod: u8 {
        /// Either shift key
        const SHIFT = 1;
        /// Either control key
        const CONTROL = 1 << 1;
        /// Either alt key
        const ALT = 1 << 2;
        /// Either super (logo) key
        const SUPER = 1 << 3;
    }
}

impl From<glfw::Modifiers> for Mod {
    fn from(mods: glfw::Modifiers) -> Self {
        let mut out = Self::empty();
        if mods.contains(glfw::Modifiers::Shift) {
            out |= Self::SHIFT;
        }
        if mods.contains(glfw::Modifiers::Control) {
            out |= Self::CONTROL;
        }
        if mods.contains(glfw::Modifiers::Alt) {
            out |= Self::ALT;
        }
        if mods.contains(glfw::Modifiers::Super) {
            out |= Self::SUPER;
        }
        out
    }
}

/// The user asked to close the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Close;

/// The client area was resized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    /// New width in screen coordinates
    pub width: i32,
    /// New height in screen coordinates
    pub height: i32,
}

/// A key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// Key
    pub key: Key,
    /// Held modifiers
    pub mods: Mod,
}

/// A key was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRelease {
    /// Key
    pub key: Key,
    /// Held modifiers
    pub mods: Mod,
}

/// A key was held down until it repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRepeat {
    /// Key
    pub key: Key,
    /// Held modifiers
    pub mods: Mod,
}

/// A unicode character was typed
///
/// Holding `a` and shift produces `'A'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRune(pub char);

/// A mouse button was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MousePress {
    /// Cursor position
    pub point: Point,
    /// Button
    pub button: Button,
    /// Held modifiers
    pub mods: Mod,
}

/// A mouse button was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseRelease {
    /// Cursor position
    pub point: Point,
    /// Button
    pub button: Button,
    /// Held modifiers
    pub mods: Mod,
}

/// The cursor moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseMove {
    /// New position
    pub point: Point,
    /// Previous position
    pub from: Point,
}

/// The cursor moved while a mouse button was held down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseDrag {
    /// New position
    pub point: Point,
    /// Previous position
    pub from: Point,
    /// The held button
    pub button: Button,
    /// Held modifiers
    pub mods: Mod,
}

/// The cursor entered (`true`) or left (`false`) the client area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEnter(pub bool);

/// The mouse wheel scrolled on the horizontal axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollX {
    /// Scroll offset
    pub off: i32,
    /// Held modifiers
    pub mods: Mod,
}

/// The mouse wheel scrolled on the vertical axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollY {
    /// Scroll offset
    pub off: i32,
    /// Held modifiers
    pub mods: Mod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_conversion_drops_locks() {
        let mods = glfw::Modifiers::Shift | glfw::Modifiers::Super | glfw::Modifiers::CapsLock;
        assert_eq!(Mod::from(mods), Mod::SHIFT | Mod::SUPER);
    }

    #[test]
    fn test_mod_bits() {
        assert_eq!(Mod::SHIFT.bits(), 1);
        assert_eq!(Mod::CONTROL.bits(), 2);
        assert_eq!(Mod::ALT.bits(), 4);
        assert_eq!(Mod::SUPER.bits(), 8);
        assert_eq!(Mod::from(glfw::Modifiers::empty()), Mod::empty());
    }

    #[test]
    fn test_events_are_send() {
        fn assert_send<T: Send + 'static>() {}
        assert_send::<KeyPress>();
        assert_send::<MouseDrag>();
        assert_send::<ScrollY>();
    }
}
