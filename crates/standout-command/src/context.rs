//! Invocation context passed through to handlers.
//!
//! The dispatcher never looks inside a [`Context`]. It carries two things for
//! the handler's own use:
//!
//! - a cancellation flag, shared by every clone and settable from another
//!   thread through [`Context::cancel_handle`]
//! - [`Extensions`], a type-keyed map for state the caller wants handlers to
//!   see (API clients, configuration, ...)

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Type-safe container for caller-provided state.
///
/// # Example
///
/// ```rust
/// use standout_command::Context;
///
/// struct ApiClient { base_url: String }
///
/// let ctx = Context::new().with(ApiClient { base_url: "https://api.example.com".into() });
///
/// let api = ctx.extensions.get::<ApiClient>().unwrap();
/// assert_eq!(api.base_url, "https://api.example.com");
/// ```
#[derive(Default)]
pub struct Extensions {
    map: HashMap<TypeId, Box<dyn Any>>,
}

impl Extensions {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, keyed by its type. A value of the same type stored
    /// earlier is handed back.
    pub fn insert<T: 'static>(&mut self, value: T) -> Option<T> {
        let previous = self.map.insert(TypeId::of::<T>(), Box::new(value))?;
        previous.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// The stored value of type `T`, if any.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.map.get(&TypeId::of::<T>())?.downcast_ref::<T>()
    }

    /// Whether a value of type `T` is stored.
    pub fn contains<T: 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}

/// Context threaded from [`Command::run`](crate::Command::run) to the handler.
#[derive(Debug, Default)]
pub struct Context {
    cancelled: Arc<AtomicBool>,

    /// State made available to handlers and middlewares.
    pub extensions: Extensions,
}

impl Context {
    /// A context that is not cancelled and carries no extensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value to the extensions, builder style.
    pub fn with<T: 'static>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }

    /// Marks the context as cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether [`cancel`](Self::cancel) was called on this context or a
    /// handle to it.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// The underlying flag, for cancelling from a signal handler or another
    /// thread.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}
