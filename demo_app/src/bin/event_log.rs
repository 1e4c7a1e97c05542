//! Logs every window event from a consumer thread.
//!
//! The main thread only pumps events; all channels are rendezvous channels,
//! so each event is handed directly to the logger thread.

use std::thread;

use crossbeam::channel::{select, RecvError};
use glfw_win::prelude::*;

/// Log a received event; true once the channel has disconnected
fn report<T: std::fmt::Debug>(event: Result<T, RecvError>) -> bool {
    match event {
        Ok(event) => {
            log::info!("{:?}", event);
            false
        }
        Err(RecvError) => true,
    }
}

fn run() -> Result<(), WinError> {
    let mut config = WindowConfig::with_size(640, 480);
    config.title = "event log".to_string();

    let mut window = Window::open(&config)?;
    let events = window.events_mut();
    let close = events.enable_close();
    let resize = events.enable_resize();
    let key_press = events.enable_key_press();
    let key_release = events.enable_key_release();
    let key_repeat = events.enable_key_repeat();
    let key_rune = events.enable_key_rune();
    let mouse_press = events.enable_mouse_press();
    let mouse_release = events.enable_mouse_release();
    let mouse_move = events.enable_mouse_move();
    let mouse_drag = events.enable_mouse_drag();
    let mouse_enter = events.enable_mouse_enter();
    let scroll_x = events.enable_scroll_x();
    let scroll_y = events.enable_scroll_y();

    let logger = thread::spawn(move || loop {
        // Every channel disconnects once the window is dropped.
        let done = select! {
            recv(close) -> e => report(e),
            recv(resize) -> e => report(e),
            recv(key_press) -> e => report(e),
            recv(key_release) -> e => report(e),
            recv(key_repeat) -> e => report(e),
            recv(key_rune) -> e => report(e),
            recv(mouse_press) -> e => report(e),
            recv(mouse_release) -> e => report(e),
            recv(mouse_move) -> e => report(e),
            recv(mouse_drag) -> e => report(e),
            recv(mouse_enter) -> e => report(e),
            recv(scroll_x) -> e => report(e),
            recv(scroll_y) -> e => report(e),
        };
        if done {
            break;
        }
    });

    window.fill(Rgba([30, 30, 30, 255]));
    window.display();
    window.run_event_loop();
    window.close();

    if logger.join().is_err() {
        log::error!("logger thread panicked");
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
