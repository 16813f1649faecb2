use std::net::SocketAddr;
use std::sync::Arc;

use ::common::StoreConfig;
use ::common::storage::{EntityStore, MemoryStore};
use reqwest::Client;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use blog_server::config::{AppConfig, CorsConfig, ServerConfig};
use blog_server::state::AppState;

pub mod routes {
    pub const USERS: &str = "/api/v1/user";
    pub const BLOGS: &str = "/api/v1/blog";
    pub const COMMENTS: &str = "/api/v1/comment";

    pub fn user(id: &str) -> String {
        format!("/api/v1/user/{id}")
    }

    pub fn blog(id: &str) -> String {
        format!("/api/v1/blog/{id}")
    }

    pub fn comment(blog_id: &str, user_id: &str) -> String {
        format!("/api/v1/comment/{blog_id}/{user_id}")
    }
}

/// A running test server over a fresh in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<MemoryStore>,
    pub shutdown: CancellationToken,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    /// The `id` field of the body as a string.
    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .unwrap_or_else(|| panic!("Response has no string id: {}", self.text))
            .to_string()
    }

    /// The `data` array of a list response.
    pub fn data(&self) -> &Vec<Value> {
        self.body["data"]
            .as_array()
            .unwrap_or_else(|| panic!("Response has no data array: {}", self.text))
    }

    /// The `deleted` array of a delete response.
    pub fn deleted(&self) -> &Vec<Value> {
        self.body["deleted"]
            .as_array()
            .unwrap_or_else(|| panic!("Response has no deleted array: {}", self.text))
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(MemoryStore::new())).await
    }

    pub async fn spawn_with_store(store: Arc<MemoryStore>) -> Self {
        let shared: Arc<dyn EntityStore> = store.clone();
        Self::spawn_over(shared, store).await
    }

    /// Serve over `backend`, keeping `store` for direct inspection.
    pub async fn spawn_over(backend: Arc<dyn EntityStore>, store: Arc<MemoryStore>) -> Self {
        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            store: StoreConfig {
                request_timeout_ms: 500,
                ..Default::default()
            },
        };

        let shutdown = CancellationToken::new();
        let state = AppState::new(backend, app_config, shutdown.clone());
        let app = blog_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            store,
            shutdown,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_query(&self, path: &str, query: &[(&str, &str)]) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Create a user via the API and return its `id`.
    pub async fn create_user(&self, name: &str) -> String {
        let res = self
            .post(
                routes::USERS,
                &json!({
                    "name": name,
                    "email": format!("{}@example.com", name.to_lowercase()),
                    "password": "correct horse",
                }),
            )
            .await;
        assert_eq!(res.status, 201, "create_user failed: {}", res.text);
        res.id()
    }

    /// Create a blog via the API and return its `id`.
    pub async fn create_blog(&self, user_id: &str, title: &str) -> String {
        let res = self
            .post(
                routes::BLOGS,
                &json!({"user_id": user_id, "title": title, "score": 4.5}),
            )
            .await;
        assert_eq!(res.status, 201, "create_blog failed: {}", res.text);
        res.id()
    }

    /// Create a comment via the API.
    pub async fn create_comment(&self, blog_id: &str, user_id: &str, message: &str) {
        let res = self
            .post(
                routes::COMMENTS,
                &json!({"blog_id": blog_id, "user_id": user_id, "message": message}),
            )
            .await;
        assert_eq!(res.status, 201, "create_comment failed: {}", res.text);
    }
}
