use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;

pub use axum::http::StatusCode;

#[derive(Clone, Debug, Default)]
pub struct Addon {
    pub logs: String,
    pub changelog: String,
}

/// Error envelope the supervisor returns alongside a 400.
#[derive(Clone, Debug, Serialize)]
pub struct ErrorBody {
    pub result: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct Supervisor {
    addons: HashMap<String, Addon>,
    token: Option<String>,
    faults: HashMap<String, StatusCode>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_addon(mut self, slug: &str, logs: &str, changelog: &str) -> Self {
        self.addons.insert(
            slug.to_string(),
            Addon {
                logs: logs.to_string(),
                changelog: changelog.to_string(),
            },
        );
        self
    }

    /// Require `Authorization: Bearer <token>` or `X-Hassio-Key: <token>`.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Answer every request for `slug` with `status` and an empty body.
    pub fn with_fault(mut self, slug: &str, status: StatusCode) -> Self {
        self.faults.insert(slug.to_string(), status);
        self
    }

    /// Add-ons used by the standalone binary.
    pub fn demo() -> Self {
        Self::new()
            .with_addon(
                "core_ssh",
                "[services.d] starting services\n[services.d] done.\n",
                "## 9.6.1\n\n- Bump base image\n",
            )
            .with_addon(
                "core_mosquitto",
                "[INFO] Setup mosquitto configuration\n",
                "## 6.1.3\n\n- Fix discovery\n",
            )
            .with_fault("broken", StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(token) = self.token.as_deref() else {
            return true;
        };
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        let key = headers.get("x-hassio-key").and_then(|v| v.to_str().ok());
        bearer == Some(token) || key == Some(token)
    }
}

pub type Shared = Arc<Supervisor>;

#[derive(Clone, Copy)]
enum Document {
    Logs,
    Changelog,
}

pub fn app() -> Router {
    router(Supervisor::demo())
}

pub fn router(supervisor: Supervisor) -> Router {
    Router::new()
        .route("/addons/{slug}/logs", get(addon_logs))
        .route("/addons/{slug}/changelog", get(addon_changelog))
        .with_state(Arc::new(supervisor))
}

pub async fn run(listener: TcpListener, supervisor: Supervisor) -> Result<(), std::io::Error> {
    axum::serve(listener, router(supervisor)).await
}

async fn addon_logs(
    State(state): State<Shared>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    addon_document(&state, &slug, &headers, Document::Logs)
}

async fn addon_changelog(
    State(state): State<Shared>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    addon_document(&state, &slug, &headers, Document::Changelog)
}

fn addon_document(state: &Supervisor, slug: &str, headers: &HeaderMap, doc: Document) -> Response {
    if !state.authorized(headers) {
        return (StatusCode::UNAUTHORIZED, "401: Unauthorized").into_response();
    }
    if let Some(status) = state.faults.get(slug) {
        return (*status).into_response();
    }
    match state.addons.get(slug) {
        Some(addon) => {
            let text = match doc {
                Document::Logs => addon.logs.clone(),
                Document::Changelog => addon.changelog.clone(),
            };
            ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response()
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                result: "error",
                message: "Addon does not exist".to_string(),
            }),
        )
            .into_response(),
    }
}
