//! Integration tests for the session identity layer.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p session-identity-integration-tests
//! ```
//!
//! The tests drive a real axum router with a `tower-sessions` layer over an
//! in-memory store. No server or database is needed: requests go through
//! `tower::ServiceExt::oneshot`, and [`TestApp`] carries the session cookie
//! from one request to the next the way a browser would.
//!
//! The `/auth/login` route stands in for the application's real login
//! handler: it binds whatever identity it is given without checking
//! credentials.

use axum::{
    Json, Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;
use session_identity::{
    CurrentIdentity, IconFormatter, IdentityConfig, IdentityError, IdentityView, Login,
    RequireAdmin, RequireUser, create_session_layer,
};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};

/// Login payload accepted by the test login route.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
    pub icon: Option<String>,
    pub history: Option<String>,
}

impl From<LoginForm> for Login {
    fn from(form: LoginForm) -> Self {
        let mut login = Self::new(form.username, form.email).admin(form.admin);
        if let Some(icon) = form.icon {
            login = login.icon(icon);
        }
        if let Some(history) = form.history {
            login = login.history(history);
        }
        login
    }
}

async fn login(
    session: Session,
    axum::extract::State(icons): axum::extract::State<IconFormatter>,
    Json(form): Json<LoginForm>,
) -> Result<StatusCode, IdentityError> {
    session_identity::bind(&session, form.into(), &icons).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn logout(session: Session) -> Result<StatusCode, IdentityError> {
    session_identity::clear(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn whoami(identity: CurrentIdentity) -> Json<IdentityView> {
    Json(identity.view())
}

async fn history(identity: CurrentIdentity) -> String {
    identity
        .history_or_none()
        .map_or_else(|| "none".to_string(), |id| id.to_string())
}

async fn account(RequireUser(user): RequireUser) -> String {
    user.username
}

async fn api_me(RequireUser(user): RequireUser) -> Json<Value> {
    Json(serde_json::json!({ "username": user.username, "email": user.email }))
}

async fn admin(RequireAdmin(user): RequireAdmin) -> String {
    format!("admin: {}", user.username)
}

/// Build the test router for the given configuration.
#[must_use]
pub fn router(config: &IdentityConfig) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/whoami", get(whoami))
        .route("/history", get(history))
        .route("/account", get(account))
        .route("/api/me", get(api_me))
        .route("/admin", get(admin))
        .layer(create_session_layer(MemoryStore::default(), config))
        .with_state(IconFormatter::from(config))
}

/// Install a test log subscriber (once per process).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A response collected in full.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Body as UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    /// The `Set-Cookie` header, if any.
    #[must_use]
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }
}

/// A browser-like client over the test router.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new(&IdentityConfig::default())
    }
}

impl TestApp {
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        init_tracing();
        Self {
            router: router(config),
            cookie: None,
        }
    }

    /// Send a request, attaching and updating the session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body")
            .to_vec();

        let response = TestResponse {
            status,
            headers,
            body,
        };

        if let Some(pair) = response
            .set_cookie()
            .and_then(|c| c.split(';').next())
        {
            self.cookie = Some(pair.to_string());
        }

        response
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Log in through the test login route.
    ///
    /// # Panics
    ///
    /// Panics if the login route does not answer 204.
    pub async fn login(&mut self, body: Value) {
        let response = self.post("/auth/login", body).await;
        assert_eq!(response.status, StatusCode::NO_CONTENT, "{}", response.text());
    }

    /// The cookie the client currently holds.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }
}
