//! Alternates between two images at 60 frames per second until the window
//! is closed.
//!
//! Usage: `simple [config.toml|config.ron]`. Images are read from
//! `demo_app/assets/a.png` and `demo_app/assets/b.png`; when missing, solid
//! color placeholders are drawn instead.

use std::path::Path;
use std::time::Duration;

use crossbeam::channel::{select, tick};
use glfw_win::prelude::*;

const FPS: u64 = 60;
const CHANNEL_CAPACITY: usize = 16;

fn load_or_placeholder(window: &Window, path: &Path, color: [u8; 4]) -> Result<Image, WinError> {
    if path.exists() {
        window.open_image(path)
    } else {
        log::warn!("{} not found, using a placeholder", path.display());
        window.image_from_data(&ImageData::solid_color(480, 270, color))
    }
}

fn run() -> Result<(), WinError> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => WindowConfig::load_from_file(path)?,
        None => WindowConfig::with_size(480, 270),
    };
    // Events are consumed on this thread, so channels need room for every
    // event one poll can pump (a double click on the close button sends two).
    config.channel_capacity = config.channel_capacity.max(CHANNEL_CAPACITY);

    let mut window = Window::open(&config)?;
    let close = window.events_mut().enable_close();

    let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    let img_a = load_or_placeholder(&window, &assets.join("a.png"), [200, 40, 40, 255])?;
    let img_b = load_or_placeholder(&window, &assets.join("b.png"), [40, 40, 200, 255])?;

    let ticker = tick(Duration::from_secs(1) / FPS as u32);
    let mut draw_a = false;
    while !window.should_close() {
        if draw_a {
            img_a.draw(Point::ZERO)?;
        } else {
            img_b.draw(Point::ZERO)?;
        }
        draw_a = !draw_a;

        // Swap buffers to display all drawings since the last screen update.
        window.swap_buffers();
        window.poll_events();

        select! {
            recv(close) -> _ => break,
            recv(ticker) -> _ => {}
        }
    }
    Ok(())
}

fn main() {
    glfw_win::logging::init();
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
