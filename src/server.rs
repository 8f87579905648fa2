//! HTTP interface over a shared [`Directory`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`    | `/` | Full HTML page with the contact list |
//! | `POST`   | `/contacts` | Add a contact (form fields `name`, `phone`) |
//! | `PUT`    | `/contacts/{name}` | Change a contact's phone (form field `phone`) |
//! | `DELETE` | `/contacts/{name}` | Delete a contact |
//! | `GET`    | `/search?q=` | Search results fragment |
//! | `GET`    | `/health` | Health check (returns version) |
//!
//! Mutating routes respond with the re-rendered `#contact-list` fragment.
//! Any other method on these paths is answered with `405`.
//!
//! # Error Contract
//!
//! Errors are plain-text bodies with status `400`: missing form fields,
//! undecodable path segments and every directory error (duplicate, not
//! found, storage failure) are reported verbatim.
//!
//! The `{name}` segment is decoded with query-string rules: `+` is a space
//! and every `%` must start a two-digit hex escape. Anything else, or a
//! result that is not UTF-8, is `400 Invalid contact name`.
//!
//! Requests that take longer than 15 seconds are answered with `408`.
//!
//! # Concurrency
//!
//! The directory is not thread-safe on its own. It lives behind one
//! `tokio::sync::Mutex` and each handler holds the lock for the whole
//! operation, including rendering.

use anyhow::Context;
use axum::{
    extract::{rejection::FormRejection, Form, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::directory::Directory;
use crate::error::DirectoryError;
use crate::render;
use crate::storage::{JsonStorage, Storage};

/// Upper bound on the time spent handling one request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared application state passed to all route handlers via Axum's `State` extractor.
struct AppState<S: Storage> {
    directory: Arc<Mutex<Directory<S>>>,
}

impl<S: Storage> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
        }
    }
}

/// Starts the HTTP server for the data file named in `config`.
///
/// Loads the directory once, binds to `[server].host:[server].port` and
/// serves until Ctrl-C is received.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let data_file = config.resolve_data_file()?;
    let directory = Directory::new(JsonStorage::new(&data_file))
        .context("Error initializing directory")?;

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    info!(
        addr = %bind_addr,
        file = %data_file.display(),
        contacts = directory.len(),
        "starting web server"
    );
    println!("Starting web server on http://localhost:{}", config.server.port);

    axum::serve(listener, router(directory))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("web server stopped");
    Ok(())
}

/// Builds the router for `directory`. Exposed so other binaries and tests can
/// serve a directory over any [`Storage`] backend.
pub fn router<S: Storage + 'static>(directory: Directory<S>) -> Router {
    let state = AppState {
        directory: Arc::new(Mutex::new(directory)),
    };

    let routes = Router::new()
        .route("/", get(handle_index::<S>))
        .route("/contacts", post(handle_add::<S>))
        .route(
            "/contacts/{name}",
            put(handle_update::<S>).delete(handle_delete::<S>),
        )
        .route("/search", get(handle_search::<S>))
        .route("/health", get(handle_health));

    with_middleware(routes, REQUEST_TIMEOUT).with_state(state)
}

/// Request timeout, tracing and CORS, applied to every route.
fn with_middleware<T>(routes: Router<T>, timeout: Duration) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}

// ============ Error response ============

/// Internal error type that converts into a plain-text HTTP response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

/// Decode a raw path segment the way a query-string value is decoded.
///
/// Returns `None` for a `%` not followed by two hex digits or for bytes that
/// do not form valid UTF-8.
fn decode_path_segment(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = |j: usize| bytes.get(j).is_some_and(u8::is_ascii_hexdigit);
            if !(hex(i + 1) && hex(i + 2)) {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .ok()
        .map(|name| name.into_owned())
}

/// The contact name addressed by a `/contacts/{name}` request.
fn contact_name(uri: &Uri) -> Result<String, AppError> {
    uri.path()
        .strip_prefix("/contacts/")
        .and_then(decode_path_segment)
        .ok_or_else(|| bad_request("Invalid contact name"))
}

/// Form bodies sent without a form content type are read as empty forms, so
/// the handler reports the missing field instead of a parse failure.
fn form_or_default<T: Default>(form: Result<Form<T>, FormRejection>) -> Result<T, AppError> {
    match form {
        Ok(Form(form)) => Ok(form),
        Err(FormRejection::InvalidFormContentType(_)) => Ok(T::default()),
        Err(_) => Err(bad_request("Failed to parse form")),
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        if !err.is_user_error() {
            error!(error = %err, "directory operation failed");
        }
        bad_request(err.to_string())
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET / ============

async fn handle_index<S: Storage + 'static>(State(state): State<AppState<S>>) -> Html<String> {
    let directory = state.directory.lock().await;
    Html(render::index_page(directory.list_contacts()))
}

// ============ POST /contacts ============

#[derive(Deserialize, Default)]
struct AddForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    phone: String,
}

/// Handler for `POST /contacts`.
///
/// Both fields are trimmed and must be non-empty. On success the full
/// contact list fragment is returned.
async fn handle_add<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    form: Result<Form<AddForm>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let form = form_or_default(form)?;
    let name = form.name.trim();
    let phone = form.phone.trim();
    if name.is_empty() || phone.is_empty() {
        return Err(bad_request("Name and phone are required"));
    }

    let mut directory = state.directory.lock().await;
    directory.add_contact(name, phone)?;
    Ok(Html(render::contact_list(directory.list_contacts())))
}

// ============ PUT /contacts/{name} ============

#[derive(Deserialize, Default)]
struct UpdateForm {
    #[serde(default)]
    phone: String,
}

/// Handler for `PUT /contacts/{name}`.
///
/// A malformed path segment is rejected with `400 Invalid contact name`.
async fn handle_update<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
    form: Result<Form<UpdateForm>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let name = contact_name(&uri)?;
    let form = form_or_default(form)?;
    let phone = form.phone.trim();
    if phone.is_empty() {
        return Err(bad_request("Phone is required"));
    }

    let mut directory = state.directory.lock().await;
    directory.edit_contact(&name, phone)?;
    Ok(Html(render::contact_list(directory.list_contacts())))
}

// ============ DELETE /contacts/{name} ============

async fn handle_delete<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    uri: Uri,
) -> Result<Html<String>, AppError> {
    let name = contact_name(&uri)?;

    let mut directory = state.directory.lock().await;
    directory.delete_contact(&name)?;
    Ok(Html(render::contact_list(directory.list_contacts())))
}

// ============ GET /search ============

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Handler for `GET /search`.
///
/// An empty (or whitespace-only) query returns `200` with an empty body.
async fn handle_search<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.trim();
    if query.is_empty() {
        return StatusCode::OK.into_response();
    }

    let directory = state.directory.lock().await;
    let matches = directory.search_contacts(query);
    Html(render::search_results(&matches, query)).into_response()
}
