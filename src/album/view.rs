//! Presentation state for the album: section, dialogs, form and toasts.
//!
//! DESIGN
//! ======
//! The store knows nothing about dialogs. `AlbumView` owns every piece of
//! UI state that would otherwise be ambient (which dialog is open, the
//! record being edited, form fields) and turns store results into toasts.
//! A renderer reads it and calls the transition methods; nothing else
//! mutates it.

use std::collections::VecDeque;

use super::store::{MomentStore, StoreError};
use crate::display::{Locale, format_long_date};
use crate::moment::{Moment, MomentFields};

/// Oldest toasts are dropped past this many.
pub const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Home,
    Moments,
}

/// Editable form contents shared by the create and edit dialogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MomentForm {
    pub title: String,
    pub date: String,
    pub description: String,
    /// Newly picked image, if any. Edit keeps the stored image when `None`.
    pub image: Option<String>,
}

impl MomentForm {
    #[must_use]
    pub fn to_fields(&self) -> MomentFields {
        MomentFields {
            title: self.title.clone(),
            date: self.date.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Dialog {
    #[default]
    Closed,
    Create(MomentForm),
    Edit { id: i64, form: MomentForm },
    ConfirmDelete { id: i64, title: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// A moment prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MomentCard {
    pub id: i64,
    pub title: String,
    pub date_label: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Default)]
pub struct AlbumView {
    pub section: Section,
    pub dialog: Dialog,
    pub locale: Locale,
    toasts: VecDeque<Toast>,
}

impl AlbumView {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self { locale, ..Self::default() }
    }

    pub fn show_home(&mut self) {
        self.section = Section::Home;
    }

    pub fn show_moments(&mut self) {
        self.section = Section::Moments;
    }

    pub fn open_create(&mut self) {
        self.dialog = Dialog::Create(MomentForm::default());
    }

    /// Open the edit dialog prefilled from `moment`. The image stays unset
    /// so an untouched edit keeps the stored one.
    pub fn open_edit(&mut self, moment: &Moment) {
        self.dialog = Dialog::Edit {
            id: moment.id,
            form: MomentForm {
                title: moment.title.clone(),
                date: moment.date.clone(),
                description: moment.description.clone(),
                image: None,
            },
        };
    }

    pub fn open_delete(&mut self, moment: &Moment) {
        self.dialog = Dialog::ConfirmDelete { id: moment.id, title: moment.title.clone() };
    }

    pub fn close_dialog(&mut self) {
        self.dialog = Dialog::Closed;
    }

    /// The form of the open create/edit dialog.
    pub fn form_mut(&mut self) -> Option<&mut MomentForm> {
        match &mut self.dialog {
            Dialog::Create(form) | Dialog::Edit { form, .. } => Some(form),
            Dialog::Closed | Dialog::ConfirmDelete { .. } => None,
        }
    }

    /// Cards for the moments section, in store order.
    #[must_use]
    pub fn cards(&self, moments: &[Moment]) -> Vec<MomentCard> {
        moments
            .iter()
            .map(|m| MomentCard {
                id: m.id,
                title: m.title.clone(),
                date_label: format_long_date(&m.date, self.locale),
                description: m.description.clone(),
                image: m.image.clone(),
            })
            .collect()
    }

    /// Reload the album, toasting on failure.
    ///
    /// # Errors
    ///
    /// Passes through the store's `LoadFailed`.
    pub async fn refresh(&mut self, store: &MomentStore) -> Result<(), StoreError> {
        let result = store.load().await;
        if let Err(e) = &result {
            self.push_toast(ToastKind::Error, failure_message(e));
        }
        result
    }

    /// Submit the open dialog.
    ///
    /// Once the mutation is applied the dialog closes with a success toast,
    /// even if the reload after it fails; that failure gets its own error
    /// toast. If the mutation was not applied the dialog stays open with its
    /// contents so the user can fix or resend them. With no actionable
    /// dialog open this is a no-op.
    ///
    /// # Errors
    ///
    /// Passes through whatever the store operation returned.
    pub async fn submit(&mut self, store: &MomentStore) -> Result<(), StoreError> {
        let (result, success) = match &self.dialog {
            Dialog::Closed => return Ok(()),
            Dialog::Create(form) => (store.create(form.to_fields()).await, "Moment added"),
            Dialog::Edit { id, form } => (store.update(*id, form.to_fields()).await, "Moment updated"),
            Dialog::ConfirmDelete { id, .. } => (store.delete(*id).await, "Moment deleted"),
        };

        match &result {
            Ok(()) => {
                self.close_dialog();
                self.push_toast(ToastKind::Success, success.to_owned());
            }
            // Applied remotely; resubmitting would repeat it.
            Err(e @ StoreError::LoadFailed(_)) => {
                self.close_dialog();
                self.push_toast(ToastKind::Success, success.to_owned());
                self.push_toast(ToastKind::Error, failure_message(e));
            }
            Err(e) => self.push_toast(ToastKind::Error, failure_message(e)),
        }
        result
    }

    pub fn push_toast(&mut self, kind: ToastKind, message: String) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast { kind, message });
    }

    #[must_use]
    pub fn toasts(&self) -> &VecDeque<Toast> {
        &self.toasts
    }

    /// Drain queued toasts, oldest first.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }
}

fn failure_message(err: &StoreError) -> String {
    match err {
        StoreError::Validation(_) => "Please fill in the title, date and description".to_owned(),
        StoreError::LoadFailed(_) => "Could not load moments".to_owned(),
        StoreError::MutationFailed { .. } => "Could not save changes".to_owned(),
        StoreError::InFlight(_) => "Still saving, please wait".to_owned(),
        StoreError::UnknownMoment(_) => "This moment no longer exists".to_owned(),
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
