// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use comment_service::{
    auth::{AuthError, JwtTokenStore, TokenStore},
    config::Config,
    models::comment::Comment,
    routes,
    state::AppState,
    store::{CommentStore, InMemoryCommentStore, Page, StoreError, StoreResult},
    utils::jwt::sign_jwt,
};
use uuid::Uuid;

pub const APP_ID: &str = "gateway";
pub const JWT_SECRET: &str = "test_secret_for_integration_tests";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    /// Bearer token accepted by the token store.
    pub token: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Creates a comment through the API and returns its JSON body.
    pub async fn create_comment(
        &self,
        post_uid: Uuid,
        parent_uid: Option<Uuid>,
        user_uid: Uuid,
        body: &str,
    ) -> serde_json::Value {
        let response = self
            .client
            .post(self.url(&format!("/api/posts/{}/comments", post_uid)))
            .header("Authorization", self.bearer())
            .json(&serde_json::json!({
                "body": body,
                "parent_uid": parent_uid.map(|p| p.to_string()),
                "user_uid": user_uid.to_string(),
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Failed to parse comment json")
    }
}

/// Test configuration. `known_apps` values are Argon2 hashes; pass real ones
/// only when the token endpoint is exercised.
pub fn test_config(known_apps: HashMap<String, String>) -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        port: 0,
        known_apps,
        max_page_size: 100,
        store_timeout_secs: 5,
        db_max_connections: 1,
        sanitize_bodies: false,
    }
}

/// Spawns the app backed by an in-memory store.
pub async fn spawn_app() -> TestApp {
    let config = test_config(HashMap::from([(APP_ID.to_string(), "unused".to_string())]));
    let tokens = JwtTokenStore::from_config(&config);
    spawn_with(AppState::new(InMemoryCommentStore::new(), tokens, config)).await
}

/// Spawns the app on a random port for the given state.
pub async fn spawn_with(state: AppState) -> TestApp {
    let token = sign_jwt(APP_ID, &state.config.jwt_secret, 600).expect("Failed to sign token");
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        client: reqwest::Client::new(),
        token,
    }
}

/// Store whose every call fails with a storage error and is counted.
#[derive(Clone, Default)]
pub struct FailingStore {
    pub calls: Arc<AtomicUsize>,
}

impl FailingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> StoreResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Storage("connection refused".to_string()))
    }
}

#[async_trait]
impl CommentStore for FailingStore {
    async fn list_by_post(&self, _: Uuid, _: Option<Uuid>, _: Page) -> StoreResult<Vec<Comment>> {
        self.fail()
    }

    async fn create(&self, _: Uuid, _: &str, _: Option<Uuid>, _: Uuid) -> StoreResult<Comment> {
        self.fail()
    }

    async fn get(&self, _: Uuid) -> StoreResult<Comment> {
        self.fail()
    }

    async fn update(&self, _: Uuid, _: &str) -> StoreResult<()> {
        self.fail()
    }

    async fn remove_content(&self, _: Uuid) -> StoreResult<()> {
        self.fail()
    }

    async fn delete(&self, _: Uuid) -> StoreResult<()> {
        self.fail()
    }

    async fn get_owner(&self, _: Uuid) -> StoreResult<Uuid> {
        self.fail()
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.fail()
    }
}

/// Token store whose backend is down.
pub struct UnavailableTokenStore;

#[async_trait]
impl TokenStore for UnavailableTokenStore {
    async fn exists(&self, _: &str) -> Result<bool, AuthError> {
        Err(AuthError::Unavailable("token backend timed out".to_string()))
    }
}
