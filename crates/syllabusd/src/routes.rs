//! API routes for syllabusd
//!
//! The query routes (`/generate`, `/scenarios`, `/titles`) always answer 200
//! with either the payload or `{"error": ...}`. Intake routes use status codes
//! for unknown sessions.

use crate::server::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use syllabus_shared::rpc::{
    ApiResult, ErrorBody, GenerateQuery, GenerateResponse, HealthResponse, ScenariosQuery,
    ScenariosResponse, SessionMessageRequest, StartSessionRequest, TitlesResponse,
    DEFAULT_LIST_LIMIT,
};
use syllabus_shared::{GenerationRequest, Language, SyllabusError, VERSION};
use tracing::{error, info};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Query Routes
// ============================================================================

pub fn query_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/generate", get(generate))
        .route("/scenarios", get(scenarios))
        .route("/titles", get(titles))
}

async fn generate(
    State(state): State<AppStateArc>,
    query: Result<Query<GenerateQuery>, QueryRejection>,
) -> Json<ApiResult<GenerateResponse>> {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return Json(ApiResult::error(e.body_text())),
    };

    let title = query.course_title.trim();
    if title.is_empty() {
        return Json(ApiResult::error("course_title must not be empty"));
    }

    info!("  Generate request: {:?} (level {:?})", title, query.level);
    let request = GenerationRequest::from_title(Language::En, title, query.level.as_deref());

    match state.pipeline.run(&request).await {
        Ok(outcome) => Json(ApiResult::Ok(GenerateResponse {
            record_id: outcome.record_id().map(str::to_string),
            file_path: outcome.file_path().map(str::to_string),
            warnings: outcome.warnings(),
            scenario: outcome.scenario,
        })),
        Err(e) => {
            error!("  Generate request failed: {}", e);
            Json(ApiResult::error(e.to_string()))
        }
    }
}

async fn scenarios(
    State(state): State<AppStateArc>,
    query: Result<Query<ScenariosQuery>, QueryRejection>,
) -> Json<ApiResult<ScenariosResponse>> {
    let limit = match query {
        Ok(Query(q)) => q.limit.unwrap_or(DEFAULT_LIST_LIMIT),
        Err(e) => return Json(ApiResult::error(e.body_text())),
    };

    match state.pipeline.store().list_recent(limit).await {
        Ok(scenarios) => Json(ApiResult::Ok(ScenariosResponse { scenarios })),
        Err(e) => {
            error!("  Listing scenarios failed: {}", e);
            Json(ApiResult::error(e.to_string()))
        }
    }
}

async fn titles(State(state): State<AppStateArc>) -> Json<TitlesResponse> {
    Json(TitlesResponse {
        titles: state.pipeline.store().list_titles().await,
    })
}

// ============================================================================
// Intake Routes
// ============================================================================

pub fn intake_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/intake/sessions", post(open_session))
        .route(
            "/v1/intake/sessions/:id",
            get(session_snapshot).delete(abandon_session),
        )
        .route("/v1/intake/sessions/:id/messages", post(session_message))
}

fn error_response(e: SyllabusError) -> Response {
    let status = match e {
        SyllabusError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorBody::new(e.to_string()))).into_response()
}

async fn open_session(
    State(state): State<AppStateArc>,
    body: Option<Json<StartSessionRequest>>,
) -> Response {
    let language = body.map(|Json(req)| req.language).unwrap_or_default();
    Json(state.intake.open(language).await).into_response()
}

async fn session_message(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    Json(req): Json<SessionMessageRequest>,
) -> Response {
    match state.intake.turn(&id, &req.text).await {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => error_response(e),
    }
}

async fn session_snapshot(State(state): State<AppStateArc>, Path(id): Path<String>) -> Response {
    match state.intake.snapshot(&id).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => error_response(e),
    }
}

async fn abandon_session(State(state): State<AppStateArc>, Path(id): Path<String>) -> Response {
    match state.intake.abandon(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    let backend = state.pipeline.generator().status().await;
    let status = if backend.reachable && backend.model_present {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: VERSION.to_string(),
        backend,
        file_host_configured: state.pipeline.files().is_configured(),
        active_sessions: state.intake.active_sessions().await,
    })
}
