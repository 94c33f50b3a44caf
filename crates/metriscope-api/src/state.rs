//! Shared application state.
//!
//! The only thing handlers share is the immutable store client built at
//! process start. It is `None` when no connection string was supplied;
//! every store-backed handler checks this before doing any work, so an
//! unconfigured server answers requests instead of crashing.

use std::sync::Arc;

use metriscope_store::TableStore;

use crate::error::ApiError;

/// Immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    store: Option<Arc<dyn TableStore>>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn TableStore>>) -> Self {
        Self { store }
    }

    /// The store client, or the fixed not-configured error. Checked
    /// before any store call is attempted.
    pub fn store(&self) -> Result<&Arc<dyn TableStore>, ApiError> {
        self.store.as_ref().ok_or(ApiError::NotConfigured)
    }
}
