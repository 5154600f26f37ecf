//! In-memory collections held by a view.
//!
//! A listing is a cache of backend data: it is replaced from fetch results or
//! extended with a record that finished its creation sequence, never filled
//! from raw user input.

use std::sync::Arc;

use tokio::sync::RwLock;

/// Tri-state collection. `Empty` ("searched, nothing found") is observably
/// different from `Untouched` ("never fetched").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Listing<T> {
    #[default]
    Untouched,
    Empty,
    Populated(Vec<T>),
}

impl<T> Listing<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            Listing::Empty
        } else {
            Listing::Populated(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Listing::Populated(items) => items,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn is_untouched(&self) -> bool {
        matches!(self, Listing::Untouched)
    }

    /// Adds to the end without re-sorting.
    pub fn push(&mut self, item: T) {
        match self {
            Listing::Populated(items) => items.push(item),
            _ => *self = Listing::Populated(vec![item]),
        }
    }
}

/// Shared handle to one listing. The lock is never held across a remote call.
#[derive(Debug)]
pub struct ListStore<T> {
    inner: Arc<RwLock<Listing<T>>>,
}

impl<T> Clone for ListStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for ListStore<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Listing::Untouched)),
        }
    }
}

impl<T: Clone> ListStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Listing<T> {
        self.inner.read().await.clone()
    }

    /// Replaces the whole collection with fetched data.
    pub async fn replace(&self, items: Vec<T>) {
        *self.inner.write().await = Listing::from_items(items);
    }

    pub async fn append(&self, item: T) {
        self.inner.write().await.push(item);
    }

    pub async fn reset(&self) {
        *self.inner.write().await = Listing::Untouched;
    }
}
