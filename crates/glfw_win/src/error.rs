//! Error types and the GLFW error side channel
//!
//! GLFW reports failures through a global callback rather than return values.
//! The callback stores the most recent error in a single slot which the next
//! library call that cares about it reads destructively.

use std::sync::Mutex;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced by the window library
#[derive(Error, Debug)]
pub enum WinError {
    /// GLFW could not be initialized
    #[error("GLFW initialization failed: {0}")]
    Init(String),

    /// The native window (or its GL context) could not be created
    #[error("window creation failed: {0}")]
    CreateWindow(String),

    /// A window is already open; only one may exist at a time
    #[error("a window is already open")]
    WindowAlreadyOpen,

    /// The window backing this resource has been closed
    #[error("the window has been closed")]
    WindowClosed,

    /// OpenGL object creation or shader compilation failed
    #[error("OpenGL error: {0}")]
    Gl(String),

    /// Image decoding failed
    #[error("unable to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, WinError>;

/// An error reported by the GLFW error callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlfwError {
    /// GLFW error code
    pub code: glfw::Error,
    /// Human readable description provided by GLFW
    pub description: String,
}

impl std::fmt::Display for GlfwError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?})", self.description, self.code)
    }
}

impl std::error::Error for GlfwError {}

/// Holds the most recent error until somebody takes it
///
/// A newer error replaces an older unread one.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    latest: Mutex<Option<GlfwError>>,
}

impl ErrorSlot {
    /// Create an empty slot
    pub const fn new() -> Self {
        Self {
            latest: Mutex::new(None),
        }
    }

    /// Store an error, replacing any unread one
    pub fn record(&self, error: GlfwError) {
        let mut latest = self.latest.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(previous) = latest.replace(error) {
            log::trace!("Discarding unread GLFW error: {}", previous);
        }
    }

    /// Take the stored error, leaving the slot empty
    pub fn take(&self) -> Option<GlfwError> {
        self.latest
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
    }
}

static LAST_ERROR: ErrorSlot = ErrorSlot::new();

/// GLFW error callback, registered when the library is initialized
#[allow(clippy::needless_pass_by_value)] // signature dictated by glfw::init
pub fn record_glfw_error(code: glfw::Error, description: String) {
    log::error!("GLFW error {:?}: {}", code, description);
    LAST_ERROR.record(GlfwError { code, description });
}

/// Take the most recent GLFW error, if any
pub fn last_error() -> Option<GlfwError> {
    LAST_ERROR.take()
}

/// Describe the most recent GLFW error for embedding in a [`WinError`]
pub(crate) fn last_error_description() -> String {
    last_error().map_or_else(|| "unknown error".to_string(), |e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(description: &str) -> GlfwError {
        GlfwError {
            code: glfw::Error::PlatformError,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_take_is_destructive() {
        let slot = ErrorSlot::new();
        slot.record(error("no display"));

        assert_eq!(slot.take(), Some(error("no display")));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_newer_error_replaces_unread() {
        let slot = ErrorSlot::new();
        slot.record(error("first"));
        slot.record(error("second"));

        assert_eq!(slot.take().map(|e| e.description), Some("second".to_string()));
        assert!(slot.take().is_none());
    }

    #[test]
    fn test_global_callback_feeds_last_error() {
        record_glfw_error(glfw::Error::InvalidValue, "bad size".to_string());

        let taken = last_error().expect("callback should record the error");
        assert_eq!(taken.code, glfw::Error::InvalidValue);
        assert_eq!(taken.description, "bad size");
    }

    #[test]
    fn test_display_includes_description() {
        let text = error("context lost").to_string();
        assert!(text.contains("context lost"));
    }
}
