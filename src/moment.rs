//! Moment records and the fields a user submits for them.
//!
//! DESIGN
//! ======
//! `Moment` mirrors one row of the remote collection. Its `id` is only ever
//! assigned by the server, so client code never constructs one with a
//! fabricated id; it only deserializes what the server returns.
//!
//! `MomentFields` is the editable subset. `MomentPayload` is the wire body
//! sent on create/update, with the image already resolved.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Image used when a moment is created without one.
pub const DEFAULT_IMAGE_URL: &str = "https://cdn.poehali.dev/projects/e40605ee-62aa-45c2-8830-c9a2a736e37a/files/101a60e7-03ec-4926-ac6e-b5ae9fb1bdaf.jpg";

// =============================================================================
// MOMENT
// =============================================================================

/// One memory in the album, exactly as the server reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moment {
    pub id: i64,
    pub title: String,
    /// `YYYY-MM-DD`, kept as submitted.
    pub date: String,
    pub description: String,
    /// Remote URL or `data:` URL. Never inspected.
    pub image: String,
}

// =============================================================================
// FIELDS & PAYLOAD
// =============================================================================

/// User-supplied fields for a create or update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MomentFields {
    pub title: String,
    pub date: String,
    pub description: String,
    pub image: Option<String>,
}

impl MomentFields {
    #[must_use]
    pub fn new(title: impl Into<String>, date: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), date: date.into(), description: description.into(), image: None }
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Check that every required field has content.
    ///
    /// Whitespace-only values count as missing. Values are not trimmed or
    /// otherwise rewritten.
    ///
    /// # Errors
    ///
    /// Returns the full list of missing fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<RequiredField> = [
            (RequiredField::Title, &self.title),
            (RequiredField::Date, &self.date),
            (RequiredField::Description, &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() { Ok(()) } else { Err(ValidationError { missing }) }
    }

    /// Whether a new image was picked. An empty string counts as none.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|image| !image.is_empty())
    }

    /// Build the wire body, using `fallback_image` when no image was picked.
    #[must_use]
    pub fn into_payload(self, fallback_image: &str) -> MomentPayload {
        let image = match self.image {
            Some(image) if !image.is_empty() => image,
            _ => fallback_image.to_owned(),
        };
        MomentPayload { title: self.title, date: self.date, description: self.description, image }
    }
}

/// JSON body for `POST /` and `PUT /{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentPayload {
    pub title: String,
    pub date: String,
    pub description: String,
    pub image: String,
}

// =============================================================================
// VALIDATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Date,
    Description,
}

impl RequiredField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Date => "date",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A create/update was rejected before any request was sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required fields: {}", join_fields(.missing))]
pub struct ValidationError {
    pub missing: Vec<RequiredField>,
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "moment_test.rs"]
mod tests;
