//! The application window
//!
//! Only one window may be open at a time. The window owns an OpenGL 2.1
//! context, the blit renderer and the event dispatcher. All methods must be
//! called from the thread that opened it.
//!
//! Events are only delivered while the window is pumped through
//! [`Window::poll_events`], [`Window::wait_events`] or
//! [`Window::run_event_loop`]. Since channel sends block, consumers either
//! live on other threads or the channels are given a buffer through
//! [`WindowConfig::channel_capacity`].

use std::io::{BufRead, Seek};
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use glfw::{Action, Context, CursorMode, Key, WindowEvent, WindowHint, WindowMode};
use image::Rgba;

use crate::config::WindowConfig;
use crate::dispatch::{Dispatcher, EventChannels, InputState};
use crate::error::{last_error_description, Result, WinError};
use crate::event::Mod;
use crate::geometry::Point;
use crate::image_data::ImageData;
use crate::library::Library;
use crate::renderer::Renderer;
use crate::texture::Image;

static WINDOW_OPEN: AtomicBool = AtomicBool::new(false);

/// Claim on the single window slot, released on drop
#[derive(Debug)]
pub(crate) struct WindowSlot {
    flag: &'static AtomicBool,
}

impl WindowSlot {
    /// Claim `flag`, failing if it is already taken
    pub(crate) fn claim(flag: &'static AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| WinError::WindowAlreadyOpen)?;
        Ok(Self { flag })
    }
}

impl Drop for WindowSlot {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl InputState for glfw::Window {
    fn cursor_pos(&self) -> Point {
        let (x, y) = self.get_cursor_pos();
        Point::from_cursor(x, y)
    }

    fn modifiers(&self) -> Mod {
        let down = |left: Key, right: Key| {
            self.get_key(left) == Action::Press || self.get_key(right) == Action::Press
        };
        let mut mods = Mod::empty();
        mods.set(Mod::SHIFT, down(Key::LeftShift, Key::RightShift));
        mods.set(Mod::CONTROL, down(Key::LeftControl, Key::RightControl));
        mods.set(Mod::ALT, down(Key::LeftAlt, Key::RightAlt));
        mods.set(Mod::SUPER, down(Key::LeftSuper, Key::RightSuper));
        mods
    }
}

/// A window with an OpenGL context
///
/// Field order is drop order: channels close first, GL objects are deleted
/// while the context still exists, and the library is released last.
pub struct Window {
    dispatcher: Dispatcher,
    renderer: Rc<Renderer>,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    window: glfw::PWindow,
    library: Library,
    _slot: WindowSlot,
}

/// Swap interval for the configured vsync setting
fn swap_interval(vsync: bool) -> glfw::SwapInterval {
    if vsync {
        glfw::SwapInterval::Sync(1)
    } else {
        glfw::SwapInterval::None
    }
}

impl Window {
    /// Open the window
    ///
    /// Fails with [`WinError::WindowAlreadyOpen`] if another window exists.
    pub fn open(config: &WindowConfig) -> Result<Self> {
        let slot = WindowSlot::claim(&WINDOW_OPEN)?;
        let mut library = Library::acquire()?;

        let glfw = library.glfw_mut();
        glfw.default_window_hints();
        glfw.window_hint(WindowHint::ContextVersion(2, 1));
        glfw.window_hint(WindowHint::Resizable(config.resizable));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, WindowMode::Windowed)
            .ok_or_else(|| WinError::CreateWindow(last_error_description()))?;
        window.make_current();

        glfw.set_swap_interval(swap_interval(config.vsync));

        let gl = unsafe {
            glow::Context::from_loader_function(|name| window.get_proc_address(name) as *const _)
        };
        let (width, height) = window.get_size();
        let renderer = Renderer::new(gl, width, height)?;
        let (fb_width, fb_height) = window.get_framebuffer_size();
        renderer.set_viewport(fb_width, fb_height);

        window.set_close_polling(true);
        window.set_size_polling(true);
        window.set_framebuffer_size_polling(true);
        window.set_key_polling(true);
        window.set_char_polling(true);
        window.set_mouse_button_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_cursor_enter_polling(true);
        window.set_scroll_polling(true);

        log::info!("Opened {}x{} window {:?}", config.width, config.height, config.title);

        let mut dispatcher = Dispatcher::new(config.channel_capacity);
        dispatcher.seed(&*window);

        Ok(Self {
            dispatcher,
            renderer: Rc::new(renderer),
            events,
            window,
            library,
            _slot: slot,
        })
    }

    /// Close the window; same as dropping it
    pub fn close(self) {}

    /// Event channels
    pub const fn events(&self) -> &EventChannels {
        self.dispatcher.channels()
    }

    /// Event channels, for opting in to event categories
    pub fn events_mut(&mut self) -> &mut EventChannels {
        self.dispatcher.channels_mut()
    }

    /// Set the window title
    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    /// Size of the client area in screen coordinates
    pub fn size(&self) -> (i32, i32) {
        self.window.get_size()
    }

    /// Width of the client area in screen coordinates
    pub fn width(&self) -> i32 {
        self.size().0
    }

    /// Height of the client area in screen coordinates
    pub fn height(&self) -> i32 {
        self.size().1
    }

    /// Resize the client area
    pub fn set_size(&mut self, width: i32, height: i32) {
        self.window.set_size(width, height);
    }

    /// Last reported cursor position
    pub fn mouse_pos(&self) -> Point {
        self.window.cursor_pos()
    }

    /// Move the cursor
    ///
    /// The window must have focus; otherwise this does nothing.
    pub fn set_mouse_pos(&mut self, pt: Point) {
        self.window.set_cursor_pos(f64::from(pt.x), f64::from(pt.y));
    }

    /// Show or hide the cursor while it is over the window
    pub fn show_cursor(&mut self, visible: bool) {
        let mode = if visible {
            CursorMode::Normal
        } else {
            CursorMode::Hidden
        };
        self.window.set_cursor_mode(mode);
    }

    /// True once the user asked to close the window
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Set or clear the close request flag
    pub fn set_should_close(&mut self, value: bool) {
        self.window.set_should_close(value);
    }

    /// Swap front and back buffers
    ///
    /// With vsync enabled this waits for one screen update.
    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    /// Show what has been drawn so far
    pub fn display(&mut self) {
        self.swap_buffers();
    }

    /// Fill the whole window with `color`
    pub fn fill(&self, color: Rgba<u8>) {
        self.renderer.fill(color);
    }

    /// Process pending events without waiting
    pub fn poll_events(&mut self) {
        self.library.glfw_mut().poll_events();
        self.dispatch_pending();
    }

    /// Sleep until at least one event arrives, then process it
    pub fn wait_events(&mut self) {
        self.library.glfw_mut().wait_events();
        self.dispatch_pending();
    }

    /// Like [`Window::wait_events`], giving up after `timeout` seconds
    pub fn wait_events_timeout(&mut self, timeout: f64) {
        self.library.glfw_mut().wait_events_timeout(timeout);
        self.dispatch_pending();
    }

    /// Deliver events until the user asks to close the window
    ///
    /// Intended for programs whose event consumers run on other threads.
    pub fn run_event_loop(&mut self) {
        log::debug!("Entering event loop");
        while !self.should_close() {
            self.wait_events();
        }
        log::debug!("Leaving event loop");
    }

    fn dispatch_pending(&mut self) {
        for (_, event) in glfw::flush_messages(&self.events) {
            match event {
                WindowEvent::Size(width, height) => self.renderer.set_resolution(width, height),
                WindowEvent::FramebufferSize(width, height) => {
                    self.renderer.set_viewport(width, height);
                }
                _ => {}
            }
            self.dispatcher.dispatch(event, &*self.window);
        }
    }

    /// Load an image file into a texture
    pub fn open_image<P: AsRef<Path>>(&self, path: P) -> Result<Image> {
        self.image_from_data(&ImageData::from_file(path)?)
    }

    /// Decode an image from `reader` into a texture
    pub fn read_image<R: BufRead + Seek>(&self, reader: R) -> Result<Image> {
        self.image_from_data(&ImageData::from_reader(reader)?)
    }

    /// Upload decoded pixels into a texture
    pub fn image_from_data(&self, data: &ImageData) -> Result<Image> {
        Image::upload(&self.renderer, data)
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        log::debug!("Closing window");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_claim_fails_while_first_held() {
        static FLAG: AtomicBool = AtomicBool::new(false);

        let first = WindowSlot::claim(&FLAG).unwrap();
        assert!(matches!(WindowSlot::claim(&FLAG), Err(WinError::WindowAlreadyOpen)));

        drop(first);
        assert!(WindowSlot::claim(&FLAG).is_ok());
    }

    #[test]
    fn test_slot_released_on_drop() {
        static FLAG: AtomicBool = AtomicBool::new(false);

        {
            let _slot = WindowSlot::claim(&FLAG).unwrap();
            assert!(FLAG.load(Ordering::Acquire));
        }
        assert!(!FLAG.load(Ordering::Acquire));
    }

    #[test]
    fn test_swap_interval_follows_vsync() {
        assert!(matches!(swap_interval(true), glfw::SwapInterval::Sync(1)));
        assert!(matches!(swap_interval(false), glfw::SwapInterval::None));
    }
}
