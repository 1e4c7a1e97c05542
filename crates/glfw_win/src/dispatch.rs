//! Translation of native GLFW events into per-category channel sends
//!
//! Each event category has an optional channel. Nothing is delivered for a
//! category until the caller opts in by enabling its channel. Delivery is a
//! blocking send, so a full channel stalls the thread pumping events until
//! the receiver drains it. A category whose receiver was dropped is switched
//! off on the next send.

use crossbeam::channel::{bounded, Receiver, Sender};
use glfw::{Action, WindowEvent};

use crate::event::{
    Button, Close, Key, KeyPress, KeyRelease, KeyRepeat, KeyRune, Mod, MouseDrag, MouseEnter,
    MouseMove, MousePress, MouseRelease, Resize, ScrollX, ScrollY,
};
use crate::geometry::Point;

/// Live input state the dispatcher starts tracking from
///
/// Implemented by the window; tests substitute a fixed state.
pub trait InputState {
    /// Current cursor position in window coordinates
    fn cursor_pos(&self) -> Point;

    /// Modifier keys currently held down
    fn modifiers(&self) -> Mod;
}

/// Send on an optional channel, switching it off if the receiver is gone
fn deliver<T>(slot: &mut Option<Sender<T>>, category: &str, event: T) {
    let Some(sender) = slot.as_ref() else {
        return;
    };
    if sender.send(event).is_err() {
        log::debug!("{} receiver dropped, disabling channel", category);
        *slot = None;
    }
}

macro_rules! channels {
    ($($field:ident: $ty:ident => $enable:ident, $disable:ident;)*) => {
        /// The set of opted-in event channels
        pub struct EventChannels {
            capacity: usize,
            $($field: Option<Sender<$ty>>,)*
        }

        impl EventChannels {
            /// No channels enabled; new channels buffer `capacity` events
            pub fn new(capacity: usize) -> Self {
                Self {
                    capacity,
                    $($field: None,)*
                }
            }

            $(
                #[doc = concat!("Enable delivery of [`", stringify!($ty), "`] events.")]
                ///
                /// The caller must keep receiving on the returned channel;
                /// event delivery blocks while it is full. Enabling again
                /// replaces the previous channel.
                pub fn $enable(&mut self) -> Receiver<$ty> {
                    let (sender, receiver) = bounded(self.capacity);
                    self.$field = Some(sender);
                    receiver
                }

                #[doc = concat!("Stop delivering [`", stringify!($ty), "`] events.")]
                pub fn $disable(&mut self) {
                    self.$field = None;
                }
            )*

            /// Number of enabled channels
            pub fn enabled_count(&self) -> usize {
                0 $(+ usize::from(self.$field.is_some()))*
            }
        }
    };
}

channels! {
    close: Close => enable_close, disable_close;
    resize: Resize => enable_resize, disable_resize;
    key_press: KeyPress => enable_key_press, disable_key_press;
    key_release: KeyRelease => enable_key_release, disable_key_release;
    key_repeat: KeyRepeat => enable_key_repeat, disable_key_repeat;
    key_rune: KeyRune => enable_key_rune, disable_key_rune;
    mouse_press: MousePress => enable_mouse_press, disable_mouse_press;
    mouse_release: MouseRelease => enable_mouse_release, disable_mouse_release;
    mouse_move: MouseMove => enable_mouse_move, disable_mouse_move;
    mouse_drag: MouseDrag => enable_mouse_drag, disable_mouse_drag;
    mouse_enter: MouseEnter => enable_mouse_enter, disable_mouse_enter;
    scroll_x: ScrollX => enable_scroll_x, disable_scroll_x;
    scroll_y: ScrollY => enable_scroll_y, disable_scroll_y;
}

impl Default for EventChannels {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Left and right variants of each modifier key
const MODIFIER_KEYS: [(Key, Mod); 8] = [
    (Key::LeftShift, Mod::SHIFT),
    (Key::RightShift, Mod::SHIFT),
    (Key::LeftControl, Mod::CONTROL),
    (Key::RightControl, Mod::CONTROL),
    (Key::LeftAlt, Mod::ALT),
    (Key::RightAlt, Mod::ALT),
    (Key::LeftSuper, Mod::SUPER),
    (Key::RightSuper, Mod::SUPER),
];

/// Modifier keys held as of the last translated key event
#[derive(Debug, Default)]
struct ModifierKeys {
    // One bit per entry of `MODIFIER_KEYS`.
    down: u8,
    // Initial state for modifiers no key event has reported yet.
    seed: Mod,
}

impl ModifierKeys {
    fn update(&mut self, key: Key, action: Action) {
        let Some(index) = MODIFIER_KEYS.iter().position(|(k, _)| *k == key) else {
            return;
        };
        self.seed.remove(MODIFIER_KEYS[index].1);
        let bit = 1u8 << index;
        match action {
            Action::Release => self.down &= !bit,
            Action::Press | Action::Repeat => self.down |= bit,
        }
    }

    fn current(&self) -> Mod {
        MODIFIER_KEYS
            .iter()
            .enumerate()
            .filter(|&(index, _)| self.down & (1u8 << index) != 0)
            .fold(self.seed, |mods, (_, (_, flag))| mods | *flag)
    }
}

/// Translates GLFW events and tracks the state needed to synthesize drags
///
/// GLFW events are buffered and translated after the poll returns, so the
/// cursor position and modifier keys are followed through the events
/// themselves rather than queried from the window.
pub struct Dispatcher {
    channels: EventChannels,
    // Most recently pressed button, until any button is released.
    held: Option<Button>,
    prev: Point,
    mods: ModifierKeys,
    seeded: bool,
}

impl Dispatcher {
    /// Create a dispatcher with no channels enabled
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: EventChannels::new(capacity),
            held: None,
            prev: Point::ZERO,
            mods: ModifierKeys::default(),
            seeded: false,
        }
    }

    /// Start tracking from the live cursor position and modifier keys
    ///
    /// Called once the window exists. Without it the state of the first
    /// dispatched event's `input` is used.
    pub fn seed(&mut self, input: &dyn InputState) {
        self.prev = input.cursor_pos();
        self.mods = ModifierKeys {
            down: 0,
            seed: input.modifiers(),
        };
        self.seeded = true;
    }

    /// Enabled channels
    pub const fn channels(&self) -> &EventChannels {
        &self.channels
    }

    /// Enabled channels, for opting in or out
    pub fn channels_mut(&mut self) -> &mut EventChannels {
        &mut self.channels
    }

    /// Button currently recorded as held, if any
    ///
    /// Recorded on every press, even with the press channel disabled, and
    /// cleared by the release of any button.
    pub const fn held_button(&self) -> Option<Button> {
        self.held
    }

    /// True while cursor moves produce drag events
    pub const fn is_dragging(&self) -> bool {
        self.held.is_some()
    }

    /// Cursor position as of the last translated move
    pub const fn cursor_pos(&self) -> Point {
        self.prev
    }

    /// Modifier keys held as of the last translated key event
    pub fn modifiers(&self) -> Mod {
        self.mods.current()
    }

    /// Deliver one native event to the matching channels
    pub fn dispatch(&mut self, event: WindowEvent, input: &dyn InputState) {
        if !self.seeded {
            self.seed(input);
        }
        let ch = &mut self.channels;
        match event {
            WindowEvent::Close => deliver(&mut ch.close, "close", Close),
            WindowEvent::Size(width, height) => {
                deliver(&mut ch.resize, "resize", Resize { width, height });
            }
            WindowEvent::Key(key, _scancode, action, mods) => {
                self.mods.update(key, action);
                let mods = Mod::from(mods);
                match action {
                    Action::Press => deliver(&mut ch.key_press, "key press", KeyPress { key, mods }),
                    Action::Release => {
                        deliver(&mut ch.key_release, "key release", KeyRelease { key, mods });
                    }
                    Action::Repeat => {
                        deliver(&mut ch.key_repeat, "key repeat", KeyRepeat { key, mods });
                    }
                }
            }
            WindowEvent::Char(rune) => deliver(&mut ch.key_rune, "key rune", KeyRune(rune)),
            WindowEvent::MouseButton(button, action, mods) => {
                let point = self.prev;
                let mods = Mod::from(mods);
                match action {
                    Action::Press => {
                        deliver(&mut ch.mouse_press, "mouse press", MousePress { point, button, mods });
                        self.held = Some(button);
                    }
                    Action::Release => {
                        deliver(
                            &mut ch.mouse_release,
                            "mouse release",
                            MouseRelease { point, button, mods },
                        );
                        self.held = None;
                    }
                    Action::Repeat => {}
                }
            }
            WindowEvent::CursorPos(x, y) => {
                let point = Point::from_cursor(x, y);
                let from = self.prev;
                deliver(&mut ch.mouse_move, "mouse move", MouseMove { point, from });
                if let Some(button) = self.held {
                    let mods = self.mods.current();
                    deliver(
                        &mut ch.mouse_drag,
                        "mouse drag",
                        MouseDrag { point, from, button, mods },
                    );
                }
                self.prev = point;
            }
            WindowEvent::CursorEnter(entered) => {
                deliver(&mut ch.mouse_enter, "mouse enter", MouseEnter(entered));
            }
            WindowEvent::Scroll(xoff, yoff) => {
                let mods = self.mods.current();
                if xoff != 0.0 {
                    deliver(&mut ch.scroll_x, "scroll x", ScrollX { off: xoff as i32, mods });
                }
                if yoff != 0.0 {
                    deliver(&mut ch.scroll_y, "scroll y", ScrollY { off: yoff as i32, mods });
                }
            }
            other => log::trace!("Ignoring event {:?}", other),
        }
    }
}
