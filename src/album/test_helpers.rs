//! Shared fixtures for album tests.

use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use super::store::MomentStore;
use crate::moment::{Moment, MomentPayload};
use crate::net::api::{ApiError, MomentsApi};

// =========================================================================
// MockApi
// =========================================================================

#[derive(Default)]
struct MockState {
    moments: Vec<Moment>,
    next_id: i64,
    calls: Vec<String>,
    fail_list: Option<u16>,
    fail_mutations: Option<u16>,
    last_payload: Option<MomentPayload>,
}

/// In-memory stand-in for the collection resource.
///
/// With `hold_create` set, `create` signals `create_entered` and then waits
/// for `create_release` before applying.
#[derive(Default)]
pub struct MockApi {
    state: Mutex<MockState>,
    pub hold_create: bool,
    pub create_entered: Notify,
    pub create_release: Notify,
}

impl MockApi {
    pub fn with_moments(moments: Vec<Moment>) -> Arc<Self> {
        let next_id = moments.iter().map(|m| m.id).max().unwrap_or(0);
        Arc::new(Self { state: Mutex::new(MockState { moments, next_id, ..MockState::default() }), ..Self::default() })
    }

    /// Empty collection whose `create` waits for `create_release`.
    pub fn holding_create() -> Arc<Self> {
        Arc::new(Self { hold_create: true, ..Self::default() })
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn fail_list(&self, status: Option<u16>) {
        self.state.lock().unwrap().fail_list = status;
    }

    pub fn fail_mutations(&self, status: Option<u16>) {
        self.state.lock().unwrap().fail_mutations = status;
    }

    pub fn last_payload(&self) -> Option<MomentPayload> {
        self.state.lock().unwrap().last_payload.clone()
    }

    fn record(&self, call: String) -> Option<u16> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state.fail_mutations
    }
}

fn status_error(status: u16) -> ApiError {
    ApiError::Status { status, body: String::new() }
}

#[async_trait::async_trait]
impl MomentsApi for MockApi {
    async fn list(&self) -> Result<Vec<Moment>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list".into());
        match state.fail_list {
            Some(status) => Err(status_error(status)),
            None => Ok(state.moments.clone()),
        }
    }

    async fn create(&self, payload: &MomentPayload) -> Result<(), ApiError> {
        if let Some(status) = self.record("create".into()) {
            return Err(status_error(status));
        }
        if self.hold_create {
            self.create_entered.notify_one();
            self.create_release.notified().await;
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.moments.push(Moment {
            id,
            title: payload.title.clone(),
            date: payload.date.clone(),
            description: payload.description.clone(),
            image: payload.image.clone(),
        });
        state.last_payload = Some(payload.clone());
        Ok(())
    }

    async fn update(&self, id: i64, payload: &MomentPayload) -> Result<(), ApiError> {
        if let Some(status) = self.record(format!("update {id}")) {
            return Err(status_error(status));
        }
        let mut state = self.state.lock().unwrap();
        state.last_payload = Some(payload.clone());
        let Some(moment) = state.moments.iter_mut().find(|m| m.id == id) else {
            return Err(status_error(404));
        };
        moment.title = payload.title.clone();
        moment.date = payload.date.clone();
        moment.description = payload.description.clone();
        moment.image = payload.image.clone();
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        if let Some(status) = self.record(format!("delete {id}")) {
            return Err(status_error(status));
        }
        let mut state = self.state.lock().unwrap();
        let before = state.moments.len();
        state.moments.retain(|m| m.id != id);
        if state.moments.len() == before { Err(status_error(404)) } else { Ok(()) }
    }
}

pub fn moment(id: i64, title: &str) -> Moment {
    Moment {
        id,
        title: title.into(),
        date: "2023-06-15".into(),
        description: "desc".into(),
        image: format!("https://img.test/{id}.jpg"),
    }
}

pub fn store_for(api: &Arc<MockApi>) -> MomentStore {
    MomentStore::new(api.clone() as Arc<dyn MomentsApi>)
}

