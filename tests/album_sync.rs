//! End-to-end: `MomentStore` over HTTP against the moments router.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use moments::album::store::{MomentStore, StoreError, StoreStatus};
use moments::config::ClientTimeouts;
use moments::moment::{DEFAULT_IMAGE_URL, MomentFields};
use moments::net::api::HttpMomentsApi;
use moments::routes;
use moments::state::AppState;

/// Serve the router; while `fail` is set every request gets a 500.
async fn spawn_server(fail: Arc<AtomicBool>) -> String {
    let app = routes::app(AppState::in_memory()).layer(middleware::from_fn(move |req: Request, next: Next| {
        let fail = fail.clone();
        async move {
            if fail.load(Ordering::SeqCst) {
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
            next.run(req).await
        }
    }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    format!("http://{addr}")
}

fn store_for(base_url: String) -> MomentStore {
    let api = HttpMomentsApi::new(base_url, ClientTimeouts::default()).expect("http client");
    MomentStore::new(Arc::new(api))
}

#[tokio::test]
async fn create_update_delete_round_trip() {
    let store = store_for(spawn_server(Arc::new(AtomicBool::new(false))).await);

    store.load().await.expect("initial load");
    assert!(store.moments().is_empty());
    assert_eq!(store.status(), StoreStatus::Ready);

    store
        .create(MomentFields::new("A", "2023-02-14", "d"))
        .await
        .expect("create");
    let moments = store.moments();
    assert_eq!(moments.len(), 1);
    assert_eq!(moments[0].id, 1);
    assert_eq!(moments[0].title, "A");
    assert_eq!(moments[0].date, "2023-02-14");
    assert_eq!(moments[0].image, DEFAULT_IMAGE_URL);

    store
        .update(1, MomentFields::new("B", "2023-02-14", "d2"))
        .await
        .expect("update");
    let moments = store.moments();
    assert_eq!(moments.len(), 1);
    assert_eq!(moments[0].title, "B");
    assert_eq!(moments[0].description, "d2");
    assert_eq!(moments[0].image, DEFAULT_IMAGE_URL);

    store.delete(1).await.expect("delete");
    assert!(store.moments().is_empty());
}

#[tokio::test]
async fn uploaded_image_survives_untouched_edit() {
    let store = store_for(spawn_server(Arc::new(AtomicBool::new(false))).await);
    let data_url = moments::image::image_data_url("image/png", b"\x89PNG");

    store
        .create(MomentFields::new("Trip", "2023-06-15", "sea").with_image(data_url.clone()))
        .await
        .expect("create");
    let id = store.moments()[0].id;

    store
        .update(id, MomentFields::new("Trip", "2023-06-15", "sea and sun"))
        .await
        .expect("update");

    let moment = store.get(id).expect("moment present");
    assert_eq!(moment.image, data_url);
    assert_eq!(moment.description, "sea and sun");
}

#[tokio::test]
async fn server_error_keeps_last_good_list() {
    let fail = Arc::new(AtomicBool::new(false));
    let store = store_for(spawn_server(fail.clone()).await);
    store
        .create(MomentFields::new("A", "2023-02-14", "d"))
        .await
        .expect("create");

    fail.store(true, Ordering::SeqCst);
    let err = store.load().await.expect_err("load should fail");

    assert!(matches!(err, StoreError::LoadFailed(_)));
    assert_eq!(store.status(), StoreStatus::Error);
    assert_eq!(store.moments().len(), 1);

    fail.store(false, Ordering::SeqCst);
    store.load().await.expect("retry");
    assert_eq!(store.status(), StoreStatus::Ready);
}

#[tokio::test]
async fn server_error_on_create_is_mutation_failure() {
    let fail = Arc::new(AtomicBool::new(false));
    let store = store_for(spawn_server(fail.clone()).await);
    store.load().await.expect("load");

    fail.store(true, Ordering::SeqCst);
    let err = store
        .create(MomentFields::new("A", "2023-02-14", "d"))
        .await
        .expect_err("create should fail");

    assert!(matches!(err, StoreError::MutationFailed { .. }));
    assert!(store.moments().is_empty());
    assert_eq!(store.status(), StoreStatus::Ready);
}

#[tokio::test]
async fn deleting_unknown_id_fails_without_touching_list() {
    let store = store_for(spawn_server(Arc::new(AtomicBool::new(false))).await);
    store
        .create(MomentFields::new("A", "2023-02-14", "d"))
        .await
        .expect("create");

    let err = store.delete(404).await.expect_err("unknown id");

    assert!(matches!(err, StoreError::MutationFailed { .. }));
    assert_eq!(store.moments().len(), 1);
}
