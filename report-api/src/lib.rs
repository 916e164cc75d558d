//! Development HTTP backend for the incident report mini-app
//!
//! Accepts the multipart report the mini-app posts and answers with the JSON
//! contract the client expects. Reports are kept in memory only.

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};
use uuid::Uuid;

/// Largest accepted request body (form fields plus one photo)
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub const SUBMIT_PATH: &str = "/web/submit_report";

const USER_ID_FIELD: &str = "telegram_user_id";
const USER_FULLNAME_FIELD: &str = "telegram_user_fullname";

// ==================== Types ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentInfo {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: Uuid,
    pub telegram_user_id: i64,
    pub telegram_user_fullname: String,
    pub fields: BTreeMap<String, String>,
    pub attachment: Option<AttachmentInfo>,
    pub received_at: DateTime<Utc>,
}

/// Body of every `/web/submit_report` answer
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub status: String,
    pub message: String,
}

impl ReportResponse {
    fn success(message: String) -> Self {
        Self {
            status: "success".to_string(),
            message,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

type ApiError = (StatusCode, Json<ReportResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ReportResponse::error(message)))
}

fn multipart_error(e: MultipartError) -> ApiError {
    warn!("Rejected multipart body: {}", e);
    (e.status(), Json(ReportResponse::error(e.body_text())))
}

// ==================== App State ====================

#[derive(Clone)]
pub struct AppState {
    reports: Arc<Mutex<Vec<StoredReport>>>,
    api_secret: String,
}

impl AppState {
    pub fn new(api_secret: impl Into<String>) -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            api_secret: api_secret.into(),
        }
    }

    /// Snapshot of every report received so far, oldest first
    pub fn reports(&self) -> Vec<StoredReport> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }

    fn store(&self, report: StoredReport) -> Result<(), ApiError> {
        let mut reports = self.reports.lock().map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ReportResponse::error("Report store unavailable")),
            )
        })?;
        reports.push(report);
        Ok(())
    }
}

// ==================== Middleware ====================

/// Middleware to verify API-Secret header (constant-time comparison)
async fn require_api_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    use constant_time_eq::constant_time_eq;

    let header = request
        .headers()
        .get("API-Secret")
        .and_then(|h| h.to_str().ok());

    let provided = header.map(|h| h.as_bytes()).unwrap_or(&[]);
    if !constant_time_eq(provided, state.api_secret.as_bytes()) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}

// ==================== Handlers ====================

/// GET /health - Health check (no auth required)
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// POST /web/submit_report - Accept one multipart report (public, like the mini-app page)
async fn submit_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ReportResponse>, ApiError> {
    let mut fields = BTreeMap::new();
    let mut attachment = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part for an untouched file input
                if bytes.is_empty() && file_name.is_empty() {
                    continue;
                }
                if attachment.is_none() {
                    attachment = Some(AttachmentInfo {
                        field: name,
                        file_name,
                        content_type,
                        size: bytes.len(),
                    });
                }
            }
            None => {
                let value = field.text().await.map_err(multipart_error)?;
                fields.insert(name, value);
            }
        }
    }

    let telegram_user_id = fields
        .remove(USER_ID_FIELD)
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|id| *id != 0)
        .ok_or_else(|| bad_request("telegram_user_id is required"))?;
    let telegram_user_fullname = fields.remove(USER_FULLNAME_FIELD).unwrap_or_default();

    let report = StoredReport {
        id: Uuid::new_v4(),
        telegram_user_id,
        telegram_user_fullname,
        fields,
        attachment,
        received_at: Utc::now(),
    };
    let id = report.id;

    info!(
        "Received report {} from user {} ({} fields, attachment: {})",
        id,
        report.telegram_user_id,
        report.fields.len(),
        report.attachment.is_some()
    );
    state.store(report)?;

    Ok(Json(ReportResponse::success(format!("Report {} received", id))))
}

/// GET /web/reports - List received reports (auth required)
async fn list_reports(State(state): State<AppState>) -> Json<Vec<StoredReport>> {
    Json(state.reports())
}

// ==================== Router ====================

pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/web/reports", get(list_reports))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_secret,
        ));

    let public_routes = Router::new()
        .route("/health", get(health))
        .route(SUBMIT_PATH, post(submit_report));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
