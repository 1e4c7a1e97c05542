//! GLFW library lifecycle
//!
//! Several parts of a program may need GLFW at the same time. Each one holds
//! a [`Library`] handle; GLFW is initialized when the first handle is
//! acquired and terminated when the last one is released.
//!
//! GLFW may only be used from the main thread, so the client count lives in
//! thread-local storage and [`Library`] is neither `Send` nor `Sync`.

use std::cell::RefCell;
use std::marker::PhantomData;

use crate::error::{last_error_description, record_glfw_error, Result, WinError};

/// Reference count of clients sharing one lazily created instance
#[derive(Debug)]
pub struct ClientCount<T> {
    clients: usize,
    instance: Option<T>,
}

impl<T: Clone> ClientCount<T> {
    /// No clients and no instance
    pub const fn new() -> Self {
        Self {
            clients: 0,
            instance: None,
        }
    }

    /// Register a client, creating the instance with `init` if none exists
    ///
    /// A failed `init` registers nothing.
    pub fn acquire<E>(
        &mut self,
        init: impl FnOnce() -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let instance = match &self.instance {
            Some(instance) => instance.clone(),
            None => {
                let instance = init()?;
                self.instance = Some(instance.clone());
                instance
            }
        };
        self.clients += 1;
        Ok(instance)
    }

    /// Unregister a client
    ///
    /// Returns the instance when the last client leaves so the caller can
    /// tear it down. Releasing without clients does nothing.
    pub fn release(&mut self) -> Option<T> {
        match self.clients {
            0 => None,
            1 => {
                self.clients = 0;
                self.instance.take()
            }
            _ => {
                self.clients -= 1;
                None
            }
        }
    }

    /// Number of registered clients
    pub const fn clients(&self) -> usize {
        self.clients
    }

    /// True while an instance exists
    pub const fn is_initialized(&self) -> bool {
        self.instance.is_some()
    }
}

impl<T: Clone> Default for ClientCount<T> {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static REGISTRY: RefCell<ClientCount<glfw::Glfw>> = const { RefCell::new(ClientCount::new()) };
}

/// A client of the GLFW library
///
/// Dropping the handle releases it.
pub struct Library {
    glfw: glfw::Glfw,
    // GLFW is bound to the thread that initialized it.
    _not_send: PhantomData<*const ()>,
}

impl Library {
    /// Acquire the library, initializing GLFW if this is the first client
    pub fn acquire() -> Result<Self> {
        let glfw = REGISTRY.with(|registry| {
            registry.borrow_mut().acquire(|| {
                log::debug!("Initializing GLFW");
                glfw::init(record_glfw_error)
                    .map_err(|e| WinError::Init(format!("{e:?}: {}", last_error_description())))
            })
        })?;
        Ok(Self {
            glfw,
            _not_send: PhantomData,
        })
    }

    /// Number of active clients on this thread
    pub fn clients() -> usize {
        REGISTRY.with(|registry| registry.borrow().clients())
    }

    /// The shared GLFW instance
    pub fn glfw(&self) -> &glfw::Glfw {
        &self.glfw
    }

    /// The shared GLFW instance
    pub fn glfw_mut(&mut self) -> &mut glfw::Glfw {
        &mut self.glfw
    }

    /// Release this client; same as dropping it
    pub fn quit(self) {}
}

impl Drop for Library {
    fn drop(&mut self) {
        let last = REGISTRY.with(|registry| registry.borrow_mut().release());
        if let Some(glfw) = last {
            log::debug!("Terminating GLFW");
            // GLFW terminates once the registry copy and ours are both gone.
            drop(glfw);
        }
    }
}

/// Acquire the GLFW library
pub fn init() -> Result<Library> {
    Library::acquire()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    struct Instance(u32);

    #[test]
    fn test_only_first_client_initializes() {
        let inits = Cell::new(0);
        let mut count = ClientCount::new();
        let init = || -> std::result::Result<Instance, ()> {
            inits.set(inits.get() + 1);
            Ok(Instance(7))
        };

        assert_eq!(count.acquire(init), Ok(Instance(7)));
        assert_eq!(count.acquire(init), Ok(Instance(7)));
        assert_eq!(count.acquire(init), Ok(Instance(7)));

        assert_eq!(inits.get(), 1);
        assert_eq!(count.clients(), 3);
    }

    #[test]
    fn test_only_last_client_tears_down() {
        let mut count = ClientCount::new();
        count.acquire(|| Ok::<_, ()>(Instance(1))).unwrap();
        count.acquire(|| Ok::<_, ()>(Instance(2))).unwrap();

        assert_eq!(count.release(), None);
        assert!(count.is_initialized());
        assert_eq!(count.release(), Some(Instance(1)));
        assert!(!count.is_initialized());
    }

    #[test]
    fn test_failed_init_registers_nothing() {
        let mut count: ClientCount<Instance> = ClientCount::new();
        assert_eq!(count.acquire(|| Err("no display")), Err("no display"));
        assert_eq!(count.clients(), 0);
        assert!(!count.is_initialized());
    }

    #[test]
    fn test_release_without_clients() {
        let mut count: ClientCount<Instance> = ClientCount::default();
        assert_eq!(count.release(), None);
        assert_eq!(count.clients(), 0);
    }

    #[test]
    fn test_reinitializes_after_full_release() {
        let mut count = ClientCount::new();
        count.acquire(|| Ok::<_, ()>(Instance(1))).unwrap();
        count.release();
        assert_eq!(count.acquire(|| Ok::<_, ()>(Instance(2))), Ok(Instance(2)));
    }
}
