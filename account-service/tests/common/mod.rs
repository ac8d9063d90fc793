use std::sync::Arc;
use std::time::Duration;

use account_service::account::service::AccountService;
use account_service::inbound::http::router::create_router;
use account_service::repositories::InMemoryAccountRepository;
use auth::Claims;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth::WorkFactor;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryAccountRepository>,
    pub api_client: reqwest::Client,
    pub token_codec: TokenCodec,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryAccountRepository::new());

        // Cheap work factor keeps the suite fast
        let password_hasher = PasswordHasher::with_work_factor(WorkFactor {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");

        let account_service = Arc::new(AccountService::new(
            Arc::clone(&repository),
            password_hasher,
            Arc::new(TokenCodec::new(TEST_SECRET)),
            Duration::from_secs(3),
            Some(chrono::Duration::hours(24)),
        ));

        let router = create_router(account_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            repository,
            api_client: reqwest::Client::new(),
            token_codec: TokenCodec::new(TEST_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an account and return the token from the response
    pub async fn sign_up(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/signup")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("token in response")
            .to_string()
    }

    /// Decode a token issued by this app
    pub fn claims(&self, token: &str) -> Claims {
        self.token_codec.decode(token).expect("Failed to decode token")
    }
}
