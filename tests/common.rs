use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use tutoring_backend::{
    api::router::create_router,
    config::Config,
    domain::models::actor::{Claims, Role},
    domain::models::booking::Booking,
    domain::ports::BookingNotifier,
    error::AppError,
    infra::repositories::{
        sqlite_availability_repo::SqliteAvailabilityRepo, sqlite_booking_repo::SqliteBookingRepo,
    },
    state::AppState,
};
use uuid::Uuid;

const TEST_AUDIENCE: &str = "tutoring-api";

/// Records booking.created events instead of calling the messaging service.
pub struct MockNotifier {
    pub notified: Mutex<Vec<String>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            notified: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BookingNotifier for MockNotifier {
    async fn booking_created(&self, booking: &Booking) -> Result<(), AppError> {
        self.notified.lock().unwrap().push(booking.id.clone());
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub notifier: Arc<MockNotifier>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_public_key: pub_key_pem.to_string(),
            auth_audience: TEST_AUDIENCE.to_string(),
            messaging_service_url: "http://localhost".to_string(),
            messaging_service_token: "token".to_string(),
        };

        let notifier = Arc::new(MockNotifier::new());

        let state = Arc::new(AppState {
            config,
            availability_repo: Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            notifier: notifier.clone(),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            notifier,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

/// Mints a token the way the identity service would.
pub fn token_for(actor_id: &str, role: Role) -> String {
    let priv_key_pem = include_str!("keys/test_private.pem");
    let key = EncodingKey::from_ed_pem(priv_key_pem.as_bytes()).expect("Invalid test private key");

    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: actor_id.to_string(),
        aud: TEST_AUDIENCE.to_string(),
        exp: now + 3600,
        iat: now,
        role,
    };

    encode(&Header::new(Algorithm::EdDSA), &claims, &key).expect("Failed to mint test token")
}

#[allow(dead_code)]
pub fn provider_token(provider_id: &str) -> String {
    token_for(provider_id, Role::Provider)
}

#[allow(dead_code)]
pub fn requester_token(requester_id: &str) -> String {
    token_for(requester_id, Role::Requester)
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn send_json(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };

    app.router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}
