//! Moment collection routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::moment::{Moment, MomentPayload};
use crate::services::moments::{MomentError, validate_payload};
use crate::state::AppState;

impl IntoResponse for MomentError {
    fn into_response(self) -> Response {
        let status = moment_error_to_status(&self);
        let message = match &self {
            MomentError::Database(e) => {
                error!(error = %e, "moment query failed");
                "Internal server error".to_owned()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub(crate) fn moment_error_to_status(err: &MomentError) -> StatusCode {
    match err {
        MomentError::MissingFields | MomentError::InvalidDate(_) | MomentError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        MomentError::NotFound(_) => StatusCode::NOT_FOUND,
        MomentError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<JsonRejection> for MomentError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection, "moment body rejected");
        MomentError::InvalidBody(rejection.body_text())
    }
}

/// Request body for create/update. Fields are optional so an absent one is
/// reported as a missing field rather than a JSON rejection.
#[derive(Deserialize)]
pub struct MomentBody {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl MomentBody {
    fn into_payload(self) -> Result<MomentPayload, MomentError> {
        let (Some(title), Some(date), Some(description), Some(image)) =
            (self.title, self.date, self.description, self.image)
        else {
            return Err(MomentError::MissingFields);
        };
        let payload = MomentPayload { title, date, description, image };
        validate_payload(&payload)?;
        Ok(payload)
    }
}

/// `GET /`: every moment, newest date first.
pub async fn list_moments(State(state): State<AppState>) -> Result<Json<Vec<Moment>>, MomentError> {
    Ok(Json(state.moments.list().await?))
}

/// `POST /`: create a moment.
pub async fn create_moment(
    State(state): State<AppState>,
    body: Result<Json<MomentBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Moment>), MomentError> {
    let Json(body) = body?;
    let payload = body.into_payload()?;
    let moment = state.moments.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(moment)))
}

/// `PUT /{id}`: replace every field of a moment.
pub async fn update_moment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<MomentBody>, JsonRejection>,
) -> Result<Json<Moment>, MomentError> {
    let Json(body) = body?;
    let payload = body.into_payload()?;
    let moment = state
        .moments
        .update(id, &payload)
        .await?
        .ok_or(MomentError::NotFound(id))?;
    Ok(Json(moment))
}

/// `DELETE /{id}`: remove a moment.
pub async fn delete_moment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, MomentError> {
    if !state.moments.delete(id).await? {
        return Err(MomentError::NotFound(id));
    }
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
#[path = "moments_test.rs"]
mod tests;
