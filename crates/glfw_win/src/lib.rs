//! # glfw_win
//!
//! A small GLFW wrapper: one window, channels instead of callbacks for
//! events, and a 2D texture blit.
//!
//! ## Features
//!
//! - **Shared library lifecycle**: GLFW is initialized by the first
//!   [`Library`] client and terminated by the last
//! - **Single window**: opening a second window while one is open fails
//! - **Channel events**: each event category has its own opt-in channel
//! - **Image drawing**: PNG and JPEG images uploaded as textures and drawn in
//!   window coordinates
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glfw_win::prelude::*;
//!
//! fn main() -> Result<(), WinError> {
//!     let mut config = WindowConfig::with_size(480, 270);
//!     config.channel_capacity = 16;
//!
//!     let mut window = Window::open(&config)?;
//!     let close = window.events_mut().enable_close();
//!     let image = window.open_image("a.png")?;
//!
//!     while !window.should_close() && close.try_recv().is_err() {
//!         image.draw(Point::ZERO)?;
//!         window.swap_buffers();
//!         window.poll_events();
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod geometry;
pub mod image_data;
pub mod library;
pub mod logging;
pub mod renderer;
pub mod texture;
pub mod window;

pub use config::{Config, ConfigError, WindowConfig};
pub use dispatch::{Dispatcher, EventChannels, InputState};
pub use error::{last_error, GlfwError, Result, WinError};
pub use geometry::{Point, Rect};
pub use image_data::ImageData;
pub use library::{init, Library};
pub use texture::Image;
pub use window::Window;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, WindowConfig},
        error::WinError,
        event::{
            Button, Close, Key, KeyPress, KeyRelease, KeyRepeat, KeyRune, Mod, MouseDrag,
            MouseEnter, MouseMove, MousePress, MouseRelease, Resize, ScrollX, ScrollY,
        },
        geometry::{Point, Rect},
        image_data::ImageData,
        texture::Image,
        window::Window,
    };
    pub use image::Rgba;
}
