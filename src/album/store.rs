//! Client-side mirror of the remote moments collection.
//!
//! DESIGN
//! ======
//! The local list is only ever replaced wholesale by `load()`. Mutations
//! never patch it: a successful create/update/delete is followed by a full
//! reload, so the server's answer is always what the album shows. New ids
//! are learned from that reload, never from the mutation response.
//!
//! State lives in a `watch` channel so a presentation layer can subscribe
//! and re-render after each transition:
//!
//! ```text
//! Uninitialized -> Loading -> Ready
//!                          -> Error   (load() again to retry)
//! ```
//!
//! SINGLE FLIGHT
//! =============
//! Each logical operation (`Create`, `Update(id)`, `Delete(id)`) may have at
//! most one request in flight. A repeat while the first is still running is
//! rejected locally with `StoreError::InFlight` and sends nothing. The slot
//! is released by a drop guard, so a cancelled future frees it too.
//!
//! A `LoadFailed` returned from create/update/delete always means the
//! mutation itself was applied and only the reload after it failed. Any
//! failure before the mutation is sent is reported as `MutationFailed`.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::moment::{DEFAULT_IMAGE_URL, Moment, MomentFields, ValidationError};
use crate::net::api::{ApiError, MomentsApi};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreStatus {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Error,
}

/// Everything a view needs to render the album.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub status: StoreStatus,
    /// Server order, as last loaded.
    pub moments: Vec<Moment>,
    /// True once any load has succeeded.
    pub loaded: bool,
}

/// A mutating intent, used as the single-flight key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update(i64),
    Delete(i64),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Update(id) => write!(f, "update of moment {id}"),
            Self::Delete(id) => write!(f, "delete of moment {id}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to load moments: {0}")]
    LoadFailed(#[source] ApiError),

    #[error("{op} failed: {source}")]
    MutationFailed {
        op: Operation,
        #[source]
        source: ApiError,
    },

    #[error("{0} already in progress")]
    InFlight(Operation),

    #[error("moment {0} not found")]
    UnknownMoment(i64),
}

// =============================================================================
// STORE
// =============================================================================

pub struct MomentStore {
    api: Arc<dyn MomentsApi>,
    state: watch::Sender<StoreSnapshot>,
    in_flight: Mutex<HashSet<Operation>>,
}

impl MomentStore {
    #[must_use]
    pub fn new(api: Arc<dyn MomentsApi>) -> Self {
        let (state, _) = watch::channel(StoreSnapshot::default());
        Self { api, state, in_flight: Mutex::new(HashSet::new()) }
    }

    /// Receive a fresh snapshot after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn status(&self) -> StoreStatus {
        self.state.borrow().status
    }

    #[must_use]
    pub fn moments(&self) -> Vec<Moment> {
        self.state.borrow().moments.clone()
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<Moment> {
        self.state
            .borrow()
            .moments
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    /// Whether `op` currently has a request outstanding.
    #[must_use]
    pub fn is_in_flight(&self, op: Operation) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&op)
    }

    /// Replace the local list with the server's collection.
    ///
    /// # Errors
    ///
    /// Returns `LoadFailed` on any transport error or non-2xx status. The
    /// previous list is kept and the status moves to `Error`.
    pub async fn load(&self) -> Result<(), StoreError> {
        self.state.send_modify(|s| s.status = StoreStatus::Loading);

        match self.api.list().await {
            Ok(moments) => {
                let count = moments.len();
                self.state.send_modify(|s| {
                    s.moments = moments;
                    s.loaded = true;
                    s.status = StoreStatus::Ready;
                });
                info!(count, "moments loaded");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "moments load failed");
                self.state.send_modify(|s| s.status = StoreStatus::Error);
                Err(StoreError::LoadFailed(e))
            }
        }
    }

    /// Create a moment, then reload.
    ///
    /// # Errors
    ///
    /// `Validation` before any request if a required field is empty,
    /// `InFlight` if a create is already running, `MutationFailed` if the
    /// server rejects it, `LoadFailed` if the follow-up reload fails.
    pub async fn create(&self, fields: MomentFields) -> Result<(), StoreError> {
        fields.validate()?;
        let op = Operation::Create;
        let _slot = self.begin(op)?;

        let payload = fields.into_payload(DEFAULT_IMAGE_URL);
        self.api
            .create(&payload)
            .await
            .map_err(|e| mutation_failed(op, e))?;
        info!(title = %payload.title, date = %payload.date, "moment created");

        self.load().await
    }

    /// Replace every field of moment `id`, then reload.
    ///
    /// Without a new image the moment keeps its current one. If `id` is not
    /// in the local list, the list is fetched first to find that image.
    ///
    /// # Errors
    ///
    /// Same as [`MomentStore::create`]. `UnknownMoment` if no new image was
    /// picked and the server has no moment `id`; nothing is sent then.
    pub async fn update(&self, id: i64, fields: MomentFields) -> Result<(), StoreError> {
        fields.validate()?;
        let op = Operation::Update(id);
        let _slot = self.begin(op)?;

        let payload = if fields.has_image() {
            fields.into_payload(DEFAULT_IMAGE_URL)
        } else {
            let previous_image = self.current_image(id).await?;
            fields.into_payload(&previous_image)
        };
        self.api
            .update(id, &payload)
            .await
            .map_err(|e| mutation_failed(op, e))?;
        info!(id, title = %payload.title, "moment updated");

        self.load().await
    }

    /// Delete moment `id`, then reload.
    ///
    /// # Errors
    ///
    /// `InFlight`, `MutationFailed` or `LoadFailed` as for create.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let op = Operation::Delete(id);
        let _slot = self.begin(op)?;

        self.api
            .delete(id)
            .await
            .map_err(|e| mutation_failed(op, e))?;
        info!(id, "moment deleted");

        self.load().await
    }

    /// Image moment `id` holds on the server, fetching the list if the
    /// local copy does not know it.
    async fn current_image(&self, id: i64) -> Result<String, StoreError> {
        if let Some(moment) = self.get(id) {
            return Ok(moment.image);
        }
        debug!(id, "moment not known locally, fetching list before update");
        let moments = self
            .api
            .list()
            .await
            .map_err(|e| mutation_failed(Operation::Update(id), e))?;
        let image = moments.iter().find(|m| m.id == id).map(|m| m.image.clone());
        self.state.send_modify(|s| {
            s.moments = moments;
            s.loaded = true;
            s.status = StoreStatus::Ready;
        });
        image.ok_or(StoreError::UnknownMoment(id))
    }

    fn begin(&self, op: Operation) -> Result<InFlightSlot<'_>, StoreError> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(op) {
            debug!(%op, "duplicate submission rejected");
            return Err(StoreError::InFlight(op));
        }
        Ok(InFlightSlot { in_flight: &self.in_flight, op })
    }
}

fn mutation_failed(op: Operation, source: ApiError) -> StoreError {
    warn!(%op, error = %source, "moment mutation failed");
    StoreError::MutationFailed { op, source }
}

/// Holds an operation's single-flight slot until dropped.
struct InFlightSlot<'a> {
    in_flight: &'a Mutex<HashSet<Operation>>,
    op: Operation,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.op);
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
