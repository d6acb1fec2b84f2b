//! Common test utilities for taskmate integration tests.
//!
//! Provides `TestEnv` for CLI tests against a throwaway database, and
//! `TestClient` for driving the web application in-process.

#![allow(dead_code)]

use assert_cmd::Command;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
pub use tempfile::TempDir;
use tower::ServiceExt;

use taskmate::storage::Storage;
use taskmate::web::{self, AppState, SESSION_COOKIE, Settings};

/// A test environment with an isolated database and config path.
///
/// `taskmate()` returns a `Command` with `TASKMATE_DATABASE` and
/// `TASKMATE_CONFIG` set per invocation, so tests never read the user's
/// real configuration.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment and run `taskmate init`.
    pub fn init() -> Self {
        let env = Self::new();
        env.taskmate().arg("init").assert().success();
        env
    }

    pub fn db_path(&self) -> std::path::PathBuf {
        self.data_dir.path().join("taskmate.db")
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.data_dir.path().join("config.kdl")
    }

    /// Write config.kdl; commands pick it up through `TASKMATE_CONFIG`.
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).unwrap();
    }

    pub fn taskmate(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_taskmate"));
        cmd.current_dir(self.data_dir.path());
        cmd.env("TASKMATE_DATABASE", self.db_path());
        if self.config_path().exists() {
            cmd.env("TASKMATE_CONFIG", self.config_path());
        } else {
            cmd.env_remove("TASKMATE_CONFIG");
        }
        cmd.env_remove("TASKMATE_HOST");
        cmd.env_remove("TASKMATE_PORT");
        cmd.env_remove("TASKMATE_PASSWORD");
        cmd
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// A response with the body collected into a string.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Assert a 302 to `to`.
    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::FOUND, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(to));
    }

    pub fn assert_ok(&self) {
        assert_eq!(self.status, StatusCode::OK, "body: {}", self.body);
    }
}

/// In-process browser: one router, one cookie jar.
pub struct TestClient {
    pub state: AppState,
    app: Router,
    session: Option<String>,
}

impl TestClient {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let state = AppState::new(Storage::open_in_memory().unwrap(), settings);
        Self {
            app: web::router(state.clone()),
            state,
            session: None,
        }
    }

    /// A second browser against the same application state.
    pub fn fork(&self) -> Self {
        Self {
            state: self.state.clone(),
            app: self.app.clone(),
            session: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn get_with_language(&mut self, uri: &str, accept: &str) -> TestResponse {
        let request = self
            .request("GET", uri)
            .header(header::ACCEPT_LANGUAGE, accept)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(fields)))
            .unwrap();
        self.send(request).await
    }

    /// POST an arbitrary body, with or without a Content-Type.
    pub async fn post_raw(
        &mut self,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> TestResponse {
        let mut builder = self.request("POST", uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.send(request).await
    }

    /// Follow a redirect response with a GET, as a browser would.
    pub async fn follow(&mut self, response: &TestResponse) -> TestResponse {
        let to = response.location.clone().expect("response is not a redirect");
        self.get(&to).await
    }

    pub async fn register(&mut self, username: &str, password: &str) {
        let first_name = format!("{}-first", username);
        let last_name = format!("{}-last", username);
        let response = self
            .post(
                "/users/create/",
                &[
                    ("first_name", first_name.as_str()),
                    ("last_name", last_name.as_str()),
                    ("username", username),
                    ("password1", password),
                    ("password2", password),
                ],
            )
            .await;
        response.assert_redirect("/login/");
    }

    pub async fn login(&mut self, username: &str, password: &str) {
        let response = self
            .post("/login/", &[("username", username), ("password", password)])
            .await;
        response.assert_redirect("/");
    }

    /// Register and log in.
    pub async fn sign_up(&mut self, username: &str) {
        self.register(username, "pass123").await;
        self.login(username, "pass123").await;
    }

    pub fn session_token(&self) -> Option<String> {
        self.session.clone()
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(ref token) = self.session {
            builder = builder.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let pair = value.split(';').next().unwrap_or_default();
            if let Some(token) = pair.strip_prefix(&format!("{}=", SESSION_COOKIE)) {
                self.session = Some(token.to_string());
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// `application/x-www-form-urlencoded` encoding.
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(fields).unwrap()
}
