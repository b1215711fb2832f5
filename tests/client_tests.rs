//! Integration tests: the real client against an in-process mock service.
//!
//! The mock speaks the same JSON/multipart dialect as the DATUS backend
//! and records enough (request counts, received multipart field names) to
//! assert on what actually went over the wire.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use datus::api::{ApiClient, ApiError, ClearSessionOnReject};
use datus::models::{ProfileUpdate, SalesSummary};
use datus::routes::{AuthState, Resolution, Route, RouteGuard};
use datus::session::SessionStore;
use datus::storage::Database;
use datus::views::{LoginView, Outcome, UploadView, ViewLifetime};

const TOKEN: &str = "abc123";

#[derive(Clone, Default)]
struct MockState {
    /// Total requests that reached the mock.
    hits: Arc<AtomicUsize>,
    /// Multipart field names received by the profile update endpoint.
    patched_fields: Arc<Mutex<Vec<String>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Token {}", TOKEN))
        .unwrap_or(false)
}

fn summary_body() -> Value {
    json!({
        "summary": {
            "total_rows": 1200,
            "total_sales": 45678.9,
            "start_date": "2024-01-01",
            "end_date": "2024-12-31"
        },
        "summary_month": { "best_month": "July", "avg_sales_by_month": 3806.57 },
        "summary_products": { "highest_selling_product": "Widget", "best_selling_quantity": 320 },
        "summary_sales": { "highest_sale_recorded": 999.99 },
        "summary_trends": { "summary_message": "Sales trending upward" }
    })
}

fn profile_body(mobile: &str) -> Value {
    json!({
        "username": "alice",
        "email": "alice@example.com",
        "first_name": "Alice",
        "last_name": "Smith",
        "company_name": "Acme",
        "gender": "female",
        "mobile_number": mobile,
        "profile_picture": null
    })
}

async fn login_handler(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let username = body.get("username").and_then(|v| v.as_str());
    let password = body.get("password").and_then(|v| v.as_str());
    if username == Some("alice") && password == Some("secret") {
        (StatusCode::OK, Json(json!({ "token": TOKEN })))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid credentials" })),
        )
    }
}

async fn signup_handler(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if body.get("username").and_then(|v| v.as_str()) == Some("taken") {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Username already exists" })),
        )
    } else {
        (StatusCode::OK, Json(json!({ "token": TOKEN })))
    }
}

async fn profile_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid token." })),
        );
    }
    (StatusCode::OK, Json(profile_body("000-0000")))
}

async fn profile_update_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid token." })),
        );
    }

    let mut mobile = "000-0000".to_string();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap_or_default();
        if name == "mobile_number" {
            mobile = value;
        }
        state.patched_fields.lock().await.push(name);
    }
    (StatusCode::OK, Json(profile_body(&mobile)))
}

async fn upload_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid token." })),
        );
    }

    let mut filename = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("file") {
            filename = field.file_name().unwrap_or_default().to_string();
            let _ = field.bytes().await.unwrap();
        }
    }

    if filename.ends_with(".csv") || filename.ends_with(".xlsx") {
        (StatusCode::OK, Json(summary_body()))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Unsupported file type" })),
        )
    }
}

async fn latest_summary_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    }
    (StatusCode::OK, Json(summary_body()))
}

async fn summary_by_id_handler(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if id == "1" {
        (StatusCode::OK, Json(summary_body()))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Not found." })),
        )
    }
}

async fn stats_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid token." })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "total_sales": 45678.9,
            "best_selling_product": "Widget",
            "avg_sales_by_month": 3806.57,
            "sales_by_month_x": ["Jan", "Feb"],
            "sales_by_month_y": [100.0, 200.0],
            "product_sales_x": ["Widget"],
            "product_sales_y": [300.0],
            "total_sales_x": ["2024-01", "2024-02"],
            "total_sales_y": [100.0, 300.0]
        })),
    )
}

async fn spawn_mock(state: MockState) -> String {
    let app = Router::new()
        .route("/api/login/", post(login_handler))
        .route("/api/signup/", post(signup_handler))
        .route("/profile/", get(profile_handler))
        .route("/profile/update/", patch(profile_update_handler))
        .route("/upload/", post(upload_handler))
        .route("/api/summary/", get(latest_summary_handler))
        .route("/get/summary/:id/", get(summary_by_id_handler))
        .route("/api/dashboard/stats/", get(stats_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/", addr)
}

struct Fixture {
    api: ApiClient,
    session: SessionStore,
    mock: MockState,
    _dir: tempfile::TempDir,
}

async fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(Database::init_at(dir.path()).await.unwrap());
    let session = SessionStore::new(db);
    let mock = MockState::default();
    let base_url = spawn_mock(mock.clone()).await;
    let api = ApiClient::new(base_url, session.clone(), Duration::from_secs(5));
    Fixture {
        api,
        session,
        mock,
        _dir: dir,
    }
}

#[tokio::test]
async fn profile_without_token_fails_before_any_network_call() {
    let f = fixture().await;

    let err = f.api.get_profile().await.unwrap_err();
    assert!(err.is_auth(), "expected Auth, got {:?}", err);
    assert_eq!(f.mock.hits.load(Ordering::SeqCst), 0);

    let err = f.api.get_dashboard_stats().await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(f.mock.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn login_stores_token_and_next_call_carries_it() {
    let f = fixture().await;

    let lifetime = ViewLifetime::new();
    let mut handle = lifetime.handle();
    let mut view = LoginView::new();
    view.username = "alice".to_string();
    view.password = "secret".to_string();

    let outcome = view.submit(&f.api, &mut handle).await;
    assert_eq!(outcome, Outcome::Navigate(Route::Home));
    assert_eq!(f.session.get().await.as_deref(), Some(TOKEN));

    // The mock 401s unless the header is exactly `Token abc123`.
    let profile = f.api.get_profile().await.unwrap();
    assert_eq!(profile.username, "alice");
}

#[tokio::test]
async fn login_failure_surfaces_server_message_and_stores_nothing() {
    let f = fixture().await;

    let err = f.api.login("alice", "wrong").await.unwrap_err();
    match err {
        ApiError::Auth(message) => assert_eq!(message, "Invalid credentials"),
        other => panic!("expected Auth, got {:?}", other),
    }
    assert_eq!(f.session.get().await, None);
}

#[tokio::test]
async fn duplicate_registration_is_a_validation_error() {
    let f = fixture().await;

    let err = f
        .api
        .register("bob@example.com", "taken", "secret")
        .await
        .unwrap_err();
    match err {
        ApiError::Validation(message) => assert_eq!(message, "Username already exists"),
        other => panic!("expected Validation, got {:?}", other),
    }

    let token = f
        .api
        .register("bob@example.com", "bob", "secret")
        .await
        .unwrap();
    assert_eq!(token, TOKEN);
    assert!(f.session.is_authenticated().await);
}

#[tokio::test]
async fn rejected_upload_leaves_previous_summary_untouched() {
    let f = fixture().await;
    f.api.login("alice", "secret").await.unwrap();

    let lifetime = ViewLifetime::new();
    let mut handle = lifetime.handle();
    let mut view = UploadView::new();

    view.select_file("q1.csv", b"date,product,amount\n".to_vec());
    view.submit(&f.api, &mut handle).await;
    let previous: SalesSummary = view.summary.clone().expect("first upload should succeed");

    view.select_file("notes.txt", b"not a spreadsheet".to_vec());
    let outcome = view.submit(&f.api, &mut handle).await;

    assert_eq!(outcome, Outcome::Stay);
    assert_eq!(view.error.as_deref(), Some("Unsupported file type"));
    assert_eq!(view.summary.as_ref(), Some(&previous));
}

#[tokio::test]
async fn upload_success_parses_the_summary() {
    let f = fixture().await;
    f.api.login("alice", "secret").await.unwrap();

    let summary = f
        .api
        .upload_sales_file("sales.xlsx", vec![1, 2, 3])
        .await
        .unwrap();
    assert_eq!(summary.summary.total_rows, 1200);
    assert_eq!(summary.summary_month.best_month, "July");
    assert_eq!(
        summary.summary_trends.summary_message.as_deref(),
        Some("Sales trending upward")
    );
}

#[tokio::test]
async fn logout_clears_token_and_guard_redirects_protected_routes() {
    let f = fixture().await;
    let guard = RouteGuard::new(f.session.clone());

    f.api.login("alice", "secret").await.unwrap();
    assert_eq!(guard.auth_state().await, AuthState::Authorized);
    assert_eq!(
        guard.resolve(Route::Home).await,
        Resolution::Render(Route::Home)
    );

    f.session.clear().await.unwrap();

    assert_eq!(guard.auth_state().await, AuthState::Unauthorized);
    for route in [Route::Home, Route::UploadSales, Route::Settings] {
        assert_eq!(
            guard.resolve(route).await,
            Resolution::Redirect(Route::Login),
            "{:?}",
            route
        );
    }
}

#[tokio::test]
async fn partial_update_transmits_only_the_changed_field() {
    let f = fixture().await;
    f.api.login("alice", "secret").await.unwrap();

    let update = ProfileUpdate {
        mobile_number: Some("555-1234".to_string()),
        ..Default::default()
    };
    let profile = f.api.update_profile(&update).await.unwrap();

    assert_eq!(profile.mobile_number, "555-1234");
    // Unrelated fields came back untouched.
    assert_eq!(profile.first_name, "Alice");
    assert_eq!(profile.company_name, "Acme");

    let fields = f.mock.patched_fields.lock().await.clone();
    assert_eq!(fields, vec!["mobile_number".to_string()]);
}

#[tokio::test]
async fn auth_rejection_clears_the_session_via_the_observer() {
    let f = fixture().await;
    f.api
        .register_observer(Arc::new(ClearSessionOnReject::new(f.session.clone())))
        .await;

    // A stale token the mock will reject.
    f.session.set("expired-token").await.unwrap();

    let err = f.api.get_profile().await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(err.user_message(), "Invalid token.");
    assert_eq!(f.session.get().await, None);

    let guard = RouteGuard::new(f.session.clone());
    assert_eq!(
        guard.resolve(Route::Settings).await,
        Resolution::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn summary_endpoints_cover_latest_and_by_id() {
    let f = fixture().await;

    // Logged out: the service has nothing for this session.
    assert!(f.api.get_summary().await.unwrap().is_none());

    f.api.login("alice", "secret").await.unwrap();
    let latest = f.api.get_summary().await.unwrap().unwrap();
    assert_eq!(latest.summary.total_rows, 1200);

    let by_id = f.api.fetch_summary("1").await.unwrap();
    assert_eq!(by_id.summary.total_sales, 45678.9);

    let err = f.api.fetch_summary("999").await.unwrap_err();
    match err {
        ApiError::Network(message) => assert_eq!(message, "Not found."),
        other => panic!("expected Network for unclassified 404, got {:?}", other),
    }
}

#[tokio::test]
async fn dashboard_stats_parse_the_chart_series() {
    let f = fixture().await;
    f.api.login("alice", "secret").await.unwrap();

    let stats = f.api.get_dashboard_stats().await.unwrap();
    assert!(!stats.is_empty());
    assert_eq!(stats.best_selling_product.as_deref(), Some("Widget"));
    assert_eq!(stats.sales_by_month_x, vec!["Jan", "Feb"]);
    assert_eq!(stats.total_sales_y, vec![100.0, 300.0]);
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(Database::init_at(dir.path()).await.unwrap());
    let session = SessionStore::new(db);
    // Nothing listens here.
    let api = ApiClient::new("http://127.0.0.1:1/", session, Duration::from_secs(1));

    let err = api.login("alice", "secret").await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
}
