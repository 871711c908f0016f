//! Moment persistence: validation plus Postgres and in-memory stores.
//!
//! DESIGN
//! ======
//! Handlers talk to `MomentRepository` only. `PgMomentRepository` is the
//! production store; `MemoryMomentRepository` backs local runs without a
//! database and the end-to-end tests.
//!
//! Both list in the same order: newest `date` first, ties by ascending id.
//! Dates are stored as calendar dates and handed back as `YYYY-MM-DD` text,
//! so a valid submitted date round-trips unchanged.

use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::info;

use crate::display::parse_date;
use crate::moment::{Moment, MomentPayload};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MomentError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Moment not found")]
    NotFound(i64),
    /// Body was not a JSON object; the detail is logged, not returned.
    #[error("Invalid request body")]
    InvalidBody(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Server-side check: every field, including the image, must be present.
///
/// # Errors
///
/// `MissingFields` for an empty field, `InvalidDate` if `date` is not
/// `YYYY-MM-DD`.
pub fn validate_payload(payload: &MomentPayload) -> Result<(), MomentError> {
    let fields = [&payload.title, &payload.date, &payload.description, &payload.image];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(MomentError::MissingFields);
    }
    if parse_date(&payload.date).is_none() {
        return Err(MomentError::InvalidDate(payload.date.clone()));
    }
    Ok(())
}

// =============================================================================
// REPOSITORY
// =============================================================================

#[async_trait::async_trait]
pub trait MomentRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Moment>, MomentError>;
    async fn create(&self, payload: &MomentPayload) -> Result<Moment, MomentError>;
    /// `Ok(None)` when `id` does not exist.
    async fn update(&self, id: i64, payload: &MomentPayload) -> Result<Option<Moment>, MomentError>;
    /// `Ok(false)` when `id` does not exist.
    async fn delete(&self, id: i64) -> Result<bool, MomentError>;
}

// =============================================================================
// POSTGRES
// =============================================================================

type MomentRow = (i64, String, String, String, String);

fn row_to_moment((id, title, date, description, image): MomentRow) -> Moment {
    Moment { id, title, date, description, image }
}

pub struct PgMomentRepository {
    pool: PgPool,
}

impl PgMomentRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MomentRepository for PgMomentRepository {
    async fn list(&self) -> Result<Vec<Moment>, MomentError> {
        let rows = sqlx::query_as::<_, MomentRow>(
            "SELECT id, title, date::text, description, image
             FROM moments
             ORDER BY date DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_moment).collect())
    }

    async fn create(&self, payload: &MomentPayload) -> Result<Moment, MomentError> {
        let row = sqlx::query_as::<_, MomentRow>(
            "INSERT INTO moments (title, date, description, image)
             VALUES ($1, $2::date, $3, $4)
             RETURNING id, title, date::text, description, image",
        )
        .bind(&payload.title)
        .bind(&payload.date)
        .bind(&payload.description)
        .bind(&payload.image)
        .fetch_one(&self.pool)
        .await?;

        let moment = row_to_moment(row);
        info!(id = moment.id, "moment inserted");
        Ok(moment)
    }

    async fn update(&self, id: i64, payload: &MomentPayload) -> Result<Option<Moment>, MomentError> {
        let row = sqlx::query_as::<_, MomentRow>(
            "UPDATE moments
             SET title = $2, date = $3::date, description = $4, image = $5, updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING id, title, date::text, description, image",
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.date)
        .bind(&payload.description)
        .bind(&payload.image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_moment))
    }

    async fn delete(&self, id: i64) -> Result<bool, MomentError> {
        let result = sqlx::query("DELETE FROM moments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// IN-MEMORY
// =============================================================================

#[derive(Default)]
struct MemoryInner {
    moments: Vec<Moment>,
    last_id: i64,
}

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryMomentRepository {
    inner: RwLock<MemoryInner>,
}

impl MemoryMomentRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MomentRepository for MemoryMomentRepository {
    async fn list(&self) -> Result<Vec<Moment>, MomentError> {
        let inner = self.inner.read().await;
        let mut moments = inner.moments.clone();
        // ISO dates sort lexically.
        moments.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Ok(moments)
    }

    async fn create(&self, payload: &MomentPayload) -> Result<Moment, MomentError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let moment = Moment {
            id: inner.last_id,
            title: payload.title.clone(),
            date: payload.date.clone(),
            description: payload.description.clone(),
            image: payload.image.clone(),
        };
        inner.moments.push(moment.clone());
        info!(id = moment.id, "moment inserted");
        Ok(moment)
    }

    async fn update(&self, id: i64, payload: &MomentPayload) -> Result<Option<Moment>, MomentError> {
        let mut inner = self.inner.write().await;
        let Some(moment) = inner.moments.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        moment.title.clone_from(&payload.title);
        moment.date.clone_from(&payload.date);
        moment.description.clone_from(&payload.description);
        moment.image.clone_from(&payload.image);
        Ok(Some(moment.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, MomentError> {
        let mut inner = self.inner.write().await;
        let before = inner.moments.len();
        inner.moments.retain(|m| m.id != id);
        Ok(inner.moments.len() != before)
    }
}

#[cfg(test)]
#[path = "moments_test.rs"]
mod tests;
