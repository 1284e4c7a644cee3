//! Ordered, named middleware chain with a memoized build.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Executor, Middleware};

/// Key identifying an entry in a [`MiddlewareStack`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MiddlewareKey {
    /// Entry pushed with an explicit name
    Named(String),
    /// Entry pushed without a name, numbered in push order
    Index(usize),
}

impl fmt::Display for MiddlewareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Index(index) => write!(f, "#{index}"),
        }
    }
}

#[derive(Clone)]
struct Entry {
    key: MiddlewareKey,
    middleware: Arc<dyn Middleware>,
}

/// An ordered collection of middleware around a terminal executor.
///
/// Entries keep their insertion order. Pushing under a name that is
/// already present replaces that entry where it stands; unnamed entries
/// are always appended.
///
/// [`build`](Self::build) composes the chain once and caches it. Any
/// change to the entries drops the cache, and [`reset`](Self::reset)
/// drops it explicitly. The cache sits behind a lock, so concurrent first
/// builds produce a single chain and run the handler factory once.
///
/// # Example
///
/// ```
/// use hookline::middleware::{Executor, MiddlewareStack};
/// use hookline::transport::{HttpError, HttpResponse};
///
/// let mut stack = MiddlewareStack::new();
/// stack.push(|next: Executor| next, Some("noop"));
///
/// let chain = stack.build(|| {
///     Executor::from_fn(|_req| async {
///         Ok::<_, HttpError>(HttpResponse::new(
///             http::StatusCode::OK,
///             http::HeaderMap::new(),
///             Vec::new(),
///         ))
///     })
/// });
/// assert!(chain.ptr_eq(&stack.build(|| unreachable!())));
/// ```
#[derive(Default)]
pub struct MiddlewareStack {
    entries: Vec<Entry>,
    next_index: usize,
    built: Mutex<Option<Executor>>,
}

impl MiddlewareStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a middleware, optionally under a name.
    ///
    /// A name already in the stack is replaced in place, keeping its
    /// position. Without a name the middleware is appended under the next
    /// positional index.
    pub fn push<M>(&mut self, middleware: M, name: Option<&str>) -> &mut Self
    where
        M: Middleware + 'static,
    {
        self.push_arc(Arc::new(middleware), name)
    }

    /// Adds a shared middleware, optionally under a name.
    ///
    /// Same ordering rules as [`push`](Self::push).
    pub fn push_arc(&mut self, middleware: Arc<dyn Middleware>, name: Option<&str>) -> &mut Self {
        self.invalidate();

        let Some(name) = name else {
            let key = MiddlewareKey::Index(self.next_index);
            self.next_index += 1;
            self.entries.push(Entry { key, middleware });
            return self;
        };

        let key = MiddlewareKey::Named(name.to_string());
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == key) {
            entry.middleware = middleware;
        } else {
            self.entries.push(Entry { key, middleware });
        }
        self
    }

    /// Removes the entry registered under `name`.
    ///
    /// Returns true if an entry was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !matches!(&entry.key, MiddlewareKey::Named(n) if n == name));

        let removed = self.entries.len() != before;
        if removed {
            self.invalidate();
        }
        removed
    }

    /// Returns true if an entry is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(&entry.key, MiddlewareKey::Named(n) if n == name))
    }

    /// Returns the entry keys in chain order, outermost first.
    pub fn keys(&self) -> impl Iterator<Item = &MiddlewareKey> {
        self.entries.iter().map(|entry| &entry.key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no middleware is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if a built chain is cached.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built.lock().is_some()
    }

    /// Drops the cached chain so the next build composes it again.
    pub fn reset(&mut self) {
        self.invalidate();
    }

    /// Composes the entries around `handler` without touching the cache.
    ///
    /// The first entry ends up outermost.
    #[must_use]
    pub fn compose(&self, handler: Executor) -> Executor {
        self.entries
            .iter()
            .rev()
            .fold(handler, |next, entry| entry.middleware.wrap(next))
    }

    /// Returns the cached chain, composing it around `handler()` first if
    /// needed.
    pub fn build<F>(&self, handler: F) -> Executor
    where
        F: FnOnce() -> Executor,
    {
        let mut built = self.built.lock();
        if let Some(chain) = built.as_ref() {
            return chain.clone();
        }

        let chain = self.compose(handler());
        *built = Some(chain.clone());
        chain
    }

    /// Fallible variant of [`build`](Self::build).
    ///
    /// # Errors
    ///
    /// Returns the handler factory's error; nothing is cached in that case.
    pub fn try_build<F, E>(&self, handler: F) -> Result<Executor, E>
    where
        F: FnOnce() -> Result<Executor, E>,
    {
        let mut built = self.built.lock();
        if let Some(chain) = built.as_ref() {
            return Ok(chain.clone());
        }

        let chain = self.compose(handler()?);
        *built = Some(chain.clone());
        Ok(chain)
    }

    fn invalidate(&mut self) {
        *self.built.get_mut() = None;
    }
}

impl Clone for MiddlewareStack {
    /// Clones the entries; the clone starts without a cached chain.
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            next_index: self.next_index,
            built: Mutex::new(None),
        }
    }
}

impl fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareStack")
            .field("keys", &self.entries.iter().map(|e| &e.key).collect::<Vec<_>>())
            .field("built", &self.is_built())
            .finish()
    }
}
