//! # View State
//!
//! The locked state snapshot every view owns.
//!
//! ## Locking Rule
//! The lock is a `std::sync::Mutex` and is only ever taken inside the
//! closures passed to [`ViewState::with`] / [`ViewState::with_mut`], which
//! are synchronous. No guard can therefore live across an `.await`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  view.delete(id)                                                       │
//! │    state.with_mut(|s| s.loading = true)        lock → set → unlock     │
//! │    api.delete_sweet(id).await                  (no lock held)          │
//! │    state.with_mut(|s| s.notice.set(...))       lock → set → unlock     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct ViewState<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for ViewState<T> {
    fn clone(&self) -> Self {
        ViewState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> ViewState<T> {
    pub fn new(value: T) -> Self {
        ViewState {
            inner: Arc::new(Mutex::new(value)),
        }
    }

    /// Executes a function with read access to the state.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let state = self.inner.lock().expect("View state mutex poisoned");
        f(&state)
    }

    /// Executes a function with write access to the state.
    pub fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut state = self.inner.lock().expect("View state mutex poisoned");
        f(&mut state)
    }
}

impl<T: Clone> ViewState<T> {
    /// A copy of the whole state, for rendering.
    pub fn snapshot(&self) -> T {
        self.with(T::clone)
    }
}
