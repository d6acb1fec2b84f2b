//! Web server for the task tracker pages.
//!
//! Every page is rendered on the server. A request flows through:
//!
//! 1. [`RequestContext`] extraction: session cookie, current user, locale
//! 2. the handler body, which runs the guards in [`guards`] in a fixed
//!    order and produces a [`Reply`] or a [`Halt`]
//! 3. [`RequestContext::finish`], which queues notices, renders the page
//!    and attaches the session cookie

pub mod context;
pub mod guards;
mod handlers;
pub mod render;

pub use context::{Reply, RequestContext};
pub use guards::{Denial, Halt};

use axum::{
    Router,
    routing::{get, post},
};
use chrono::Duration;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ResolvedConfig;
use crate::i18n::Locale;
use crate::storage::Storage;
use crate::{Error, Result};
use handlers::catalog::{self, Labels, Statuses};
use handlers::{auth, tasks, users};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "taskmate_session";

/// Runtime settings the handlers need.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Language used when the browser expresses no usable preference
    pub language: Locale,
    pub session_ttl: Duration,
    pub password_min_length: usize,
    pub secure_cookies: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Locale::En,
            session_ttl: Duration::hours(
                i64::from(crate::config::resolver::DEFAULT_SESSION_TTL_HOURS),
            ),
            password_min_length: crate::config::resolver::DEFAULT_PASSWORD_MIN_LENGTH as usize,
            secure_cookies: false,
        }
    }
}

impl Settings {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            language: config.language.value,
            session_ttl: config.session_ttl(),
            password_min_length: config.password_min_length.value as usize,
            secure_cookies: config.secure_cookies.value,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage instance (wrapped in Mutex for thread safety)
    pub storage: Arc<Mutex<Storage>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(storage: Storage, settings: Settings) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            settings: Arc::new(settings),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(auth::home))
        .route("/login/", get(auth::login_form).post(auth::login))
        .route("/logout/", post(auth::logout))
        .route("/users/", get(users::index))
        .route("/users/create/", get(users::create_form).post(users::create))
        .route(
            "/users/{id}/update/",
            get(users::update_form).post(users::update),
        )
        .route(
            "/users/{id}/delete/",
            get(users::delete_confirm).post(users::delete),
        )
        .route("/statuses/", get(catalog::index::<Statuses>))
        .route(
            "/statuses/create/",
            get(catalog::create_form::<Statuses>).post(catalog::create::<Statuses>),
        )
        .route(
            "/statuses/{id}/update/",
            get(catalog::update_form::<Statuses>).post(catalog::update::<Statuses>),
        )
        .route(
            "/statuses/{id}/delete/",
            get(catalog::delete_confirm::<Statuses>).post(catalog::delete::<Statuses>),
        )
        .route("/labels/", get(catalog::index::<Labels>))
        .route(
            "/labels/create/",
            get(catalog::create_form::<Labels>).post(catalog::create::<Labels>),
        )
        .route(
            "/labels/{id}/update/",
            get(catalog::update_form::<Labels>).post(catalog::update::<Labels>),
        )
        .route(
            "/labels/{id}/delete/",
            get(catalog::delete_confirm::<Labels>).post(catalog::delete::<Labels>),
        )
        .route("/tasks/", get(tasks::index))
        .route("/tasks/create/", get(tasks::create_form).post(tasks::create))
        .route("/tasks/{id}/", get(tasks::detail))
        .route(
            "/tasks/{id}/update/",
            get(tasks::update_form).post(tasks::update),
        )
        .route(
            "/tasks/{id}/delete/",
            get(tasks::delete_confirm).post(tasks::delete),
        )
        .fallback(handlers::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Start the web server and run until Ctrl+C.
pub async fn start_server(config: &ResolvedConfig) -> Result<()> {
    let storage = Storage::init(config.database_path())?;
    let state = AppState::new(storage, Settings::from_config(config));
    let app = router(state);

    let host = config.host.value.as_str();
    let port = config.port.value;
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| Error::Config(format!("cannot bind {}:{}: {}", host, port, e)))?;
    let addr = listener.local_addr()?;

    tracing::info!(%addr, database = %config.database_path().display(), "taskmate listening");
    println!("Starting taskmate at http://{}", addr);
    println!("Press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
