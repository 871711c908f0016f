//! Shared server state.
//!
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Clone is required by Axum; the repository is behind an `Arc`.

use std::sync::Arc;

use crate::services::moments::{MemoryMomentRepository, MomentRepository};

#[derive(Clone)]
pub struct AppState {
    pub moments: Arc<dyn MomentRepository>,
}

impl AppState {
    #[must_use]
    pub fn new(moments: Arc<dyn MomentRepository>) -> Self {
        Self { moments }
    }

    /// State backed by a fresh in-memory repository.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryMomentRepository::new()))
    }
}
