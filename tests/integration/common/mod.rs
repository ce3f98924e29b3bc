use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;
use tempfile::TempDir;

use photovault::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig,
};
use photovault::state::AppState;
use photovault::storage::FilesystemMediaStore;

pub mod routes {
    pub const HOME: &str = "/";
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const LOGOUT: &str = "/api/v1/auth/logout";
    pub const ME: &str = "/api/v1/auth/me";
    pub const PHOTOS: &str = "/api/v1/photos";

    pub fn photo(id: i64) -> String {
        format!("/api/v1/photos/{id}")
    }

    pub fn photo_file(id: i64) -> String {
        format!("/api/v1/photos/{id}/file")
    }
}

/// A running test server over a throwaway sqlite database and media root.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub media_root: PathBuf,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    /// `Location` header, if present.
    pub location: Option<String>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("photovault-test.db");
        let media_root = dir.path().join("media");

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = photovault::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig { url: db_url },
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
            },
            storage: StorageConfig {
                media_root: media_root.display().to_string(),
                max_photo_size: 1024 * 1024, // 1 MB keeps oversize tests cheap
            },
        };

        let media = FilesystemMediaStore::new(media_root.clone(), config.storage.max_photo_size)
            .await
            .expect("Failed to create media store");

        let state = AppState {
            db,
            media: Arc::new(media),
            config,
        };

        let app = photovault::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Redirects stay visible to assertions.
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            addr,
            client,
            media_root,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn parse(res: reqwest::Response) -> TestResponse {
        let status = res.status().as_u16();
        let location = res
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        TestResponse {
            status,
            text,
            body,
            location,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        Self::parse(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .unwrap();
        Self::parse(res).await
    }

    pub async fn get_bytes(&self, path: &str, token: &str) -> (u16, Option<String>, Vec<u8>) {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .unwrap();
        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get("Content-Type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let bytes = res.bytes().await.unwrap().to_vec();
        (status, content_type, bytes)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap();
        Self::parse(res).await
    }

    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .unwrap();
        Self::parse(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .unwrap();
        Self::parse(res).await
    }

    pub async fn delete_without_token(&self, path: &str) -> TestResponse {
        let res = self.client.delete(self.url(path)).send().await.unwrap();
        Self::parse(res).await
    }

    /// Multipart photo upload with the `photo` and `name` fields.
    pub async fn upload(
        &self,
        token: &str,
        name: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("name", name.to_string())
            .part("photo", part);

        let res = self
            .client
            .post(self.url(routes::PHOTOS))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        Self::parse(res).await
    }

    /// Register a user (email derived from the username) and return the
    /// session token.
    pub async fn register(&self, username: &str) -> String {
        let email = format!("{username}@example.com");
        let res = self
            .post_form(
                routes::REGISTER,
                &[
                    ("username", username),
                    ("email", email.as_str()),
                    ("password1", "securepass"),
                    ("password2", "securepass"),
                ],
            )
            .await;
        assert_eq!(res.status, 201, "Registration failed: {}", res.text);
        res.body["token"].as_str().expect("token in response").to_string()
    }

    /// Number of files currently stored under the `photos/` media namespace.
    pub fn stored_photo_count(&self) -> usize {
        let photos_dir = self.media_root.join("photos");
        match std::fs::read_dir(&photos_dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .count(),
            Err(_) => 0,
        }
    }
}
