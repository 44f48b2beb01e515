#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test — panics are the assertion mechanism")]

use std::sync::Arc;

use herbiverse_client::{
    ClientConfig, ClientError, HerbiverseClient, MemoryStorage, SessionStorage, SNAPSHOT_KEY,
    TOKEN_KEY,
};
use herbiverse_types::{AuthFailureReason, Session};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(base_url: &str, storage: &Arc<MemoryStorage>) -> HerbiverseClient {
    let storage: Arc<dyn SessionStorage> = Arc::clone(storage) as Arc<dyn SessionStorage>;
    HerbiverseClient::new(ClientConfig::default().with_base_url(base_url), storage)
        .expect("client should build")
}

fn logged_in_storage() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::with_entries([
        (TOKEN_KEY, "T"),
        (SNAPSHOT_KEY, r#"{"email":"a@b.com","name":"Cached"}"#),
    ]))
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_json(json!({"email": "a@b.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T"})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("authorization", "Bearer T"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "Asha", "email": "a@b.com"})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_initialize_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::with_entries([(SNAPSHOT_KEY, r#"{"email":"old"}"#)]));
    let client = client_for(&server.uri(), &storage);
    assert!(client.session().is_loading());

    client.session().initialize().await;

    assert_eq!(client.session().session(), Session::signed_out());
    assert!(storage.is_empty(), "stale snapshot should be dropped");
}

#[tokio::test]
async fn test_initialize_refreshes_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("authorization", "Bearer T"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "Fresh", "email": "a@b.com"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let storage = logged_in_storage();
    let client = client_for(&server.uri(), &storage);
    client.session().initialize().await;

    let session = client.session().session();
    assert!(session.is_authenticated);
    assert!(!session.loading);
    assert_eq!(session.user.as_ref().and_then(|u| u.name()), Some("Fresh"));

    let snapshot = storage.snapshot().expect("snapshot readable").expect("snapshot stored");
    assert_eq!(snapshot.name(), Some("Fresh"));
}

#[tokio::test]
async fn test_initialize_offline_keeps_cached_session() {
    let storage = logged_in_storage();
    let client = client_for("http://127.0.0.1:1", &storage);

    client.session().initialize().await;

    let session = client.session().session();
    assert!(session.is_authenticated);
    assert!(!session.loading);
    assert_eq!(session.user.as_ref().and_then(|u| u.email()), Some("a@b.com"));
    assert_eq!(storage.token().expect("token readable").as_deref(), Some("T"));
}

#[tokio::test]
async fn test_initialize_server_error_keeps_cached_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let storage = logged_in_storage();
    let client = client_for(&server.uri(), &storage);
    client.session().initialize().await;

    assert!(client.session().is_authenticated());
    assert_eq!(client.session().user().and_then(|u| u.name().map(String::from)).as_deref(), Some("Cached"));
}

#[tokio::test]
async fn test_initialize_rejected_token_clears_storage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .mount(&server)
        .await;

    let storage = logged_in_storage();
    let client = client_for(&server.uri(), &storage);
    client.session().initialize().await;

    assert_eq!(client.session().session(), Session::signed_out());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_login_persists_token_and_profile() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let storage = Arc::new(MemoryStorage::new());
    let client = client_for(&server.uri(), &storage);
    client.session().initialize().await;
    let mut updates = client.session().subscribe();

    let profile = client.session().login("a@b.com", "pw").await.expect("login should succeed");

    assert_eq!(profile.name(), Some("Asha"));
    assert!(client.session().is_authenticated());
    assert_eq!(storage.token().expect("token readable").as_deref(), Some("T"));
    let snapshot = storage.snapshot().expect("snapshot readable").expect("snapshot stored");
    assert_eq!(snapshot.email(), Some("a@b.com"));

    assert!(updates.has_changed().expect("sender alive"));
    assert!(updates.borrow_and_update().is_authenticated);
}

#[tokio::test]
async fn test_login_falls_back_to_response_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": "T", "user": {"name": "Asha"}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let client = client_for(&server.uri(), &storage);

    let profile = client.session().login("a@b.com", "pw").await.expect("login should succeed");

    assert_eq!(profile.name(), Some("Asha"));
    assert_eq!(profile.email(), Some("a@b.com"));
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_login_rejected_leaves_state_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "bad creds"})))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let client = client_for(&server.uri(), &storage);
    client.session().initialize().await;

    let failure = client.session().login("a@b.com", "wrong").await.expect_err("login should fail");

    assert_eq!(failure.reason, AuthFailureReason::InvalidCredentials);
    assert_eq!(failure.message, "bad creds");
    assert_eq!(client.session().session(), Session::signed_out());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_login_invalid_email_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let client = client_for(&server.uri(), &storage);

    let failure = client.session().login("not-an-email", "pw").await.expect_err("should fail");
    assert_eq!(failure.reason, AuthFailureReason::InvalidInput);
}

#[tokio::test]
async fn test_signup_fills_name_and_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/signup"))
        .and(body_json(json!({"name": "Asha", "email": "a@b.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"token": "S"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let client = client_for(&server.uri(), &storage);

    let profile = client.session().signup("Asha", "a@b.com", "pw").await.expect("signup");

    assert_eq!(profile.name(), Some("Asha"));
    assert_eq!(profile.email(), Some("a@b.com"));
    assert_eq!(storage.token().expect("token readable").as_deref(), Some("S"));
}

#[tokio::test]
async fn test_login_then_logout_restores_initial_state() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/users/logout"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let client = client_for(&server.uri(), &storage);
    client.session().initialize().await;
    let initial = client.session().session();

    client.session().login("a@b.com", "pw").await.expect("login should succeed");
    client.session().logout().await;

    assert_eq!(client.session().session(), initial);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_logout_survives_server_failure() {
    let storage = logged_in_storage();
    let client = client_for("http://127.0.0.1:1", &storage);
    client.session().initialize().await;
    assert!(client.session().is_authenticated());

    client.session().logout().await;

    assert!(!client.session().is_authenticated());
    assert!(client.session().user().is_none());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_refresh_failure_keeps_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "Asha", "email": "a@b.com"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let storage = logged_in_storage();
    let client = client_for(&server.uri(), &storage);
    client.session().initialize().await;
    let before = client.session().session();

    assert!(!client.session().refresh_profile().await);
    assert_eq!(client.session().session(), before);
    assert_eq!(storage.snapshot().expect("snapshot readable"), client.session().user());
}

#[tokio::test]
async fn test_login_snapshot_serves_offline_restart() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let storage = Arc::new(MemoryStorage::new());
    let online = client_for(&server.uri(), &storage);
    online.session().initialize().await;
    let profile = online.session().login("a@b.com", "pw").await.expect("login should succeed");

    let offline = client_for("http://127.0.0.1:1", &storage);
    offline.session().initialize().await;

    assert!(offline.session().is_authenticated());
    assert_eq!(offline.session().user(), Some(profile));
}

#[tokio::test]
async fn test_refresh_when_logged_out_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let client = client_for(&server.uri(), &storage);
    client.session().initialize().await;

    assert!(!client.session().refresh_profile().await);
}

#[tokio::test]
async fn test_rejected_favourites_call_ends_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "a@b.com"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/favourite"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let storage = logged_in_storage();
    let client = client_for(&server.uri(), &storage);
    client.session().initialize().await;
    assert!(client.session().is_authenticated());

    let err = client.favourites().list().await.expect_err("should be rejected");

    assert!(err.is_unauthorized());
    assert!(!client.session().is_authenticated());
    assert!(client.session().user().is_none());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_calls_without_token_fail_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let client = client_for(&server.uri(), &storage);

    assert!(matches!(client.favourites().list().await, Err(ClientError::NotAuthenticated)));
    assert!(matches!(client.notes().list_all().await, Err(ClientError::NotAuthenticated)));
}
