use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sme_lending::error::AppError;
use sme_lending::identity::IdentityProvider;
use sme_lending::workflows::loan_application::{
    loan_application_router, LoanApplicationRepository, LoanApplicationService,
    LoanApplicationStatus, PipelineStatus, WorkflowNotifier,
};
use sme_lending::workflows::onboarding::{
    completion_breakdown, BusinessProfile, CompletionBreakdown, DocumentType, UploadedDocuments,
};
use sme_lending::workflows::roster::{EntrepreneurRosterImporter, ScoredRosterEntry};
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionRequest {
    pub(crate) incorporation_type: String,
    #[serde(default)]
    pub(crate) profile: Option<BusinessProfile>,
    #[serde(default)]
    pub(crate) documents: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompletionResponse {
    #[serde(flatten)]
    pub(crate) breakdown: CompletionBreakdown,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) unrecognized_documents: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RosterRequest {
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RosterResponse {
    pub(crate) entries: Vec<ScoredRosterEntry>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusEntry {
    pub(crate) id: &'static str,
    pub(crate) label: &'static str,
    pub(crate) terminal: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusCatalog {
    pub(crate) loan_application: Vec<StatusEntry>,
    pub(crate) pipeline: Vec<StatusEntry>,
}

pub(crate) fn with_lending_routes<R, N, I>(
    service: Arc<LoanApplicationService<R, N>>,
    identity: Arc<I>,
) -> axum::Router
where
    R: LoanApplicationRepository + 'static,
    N: WorkflowNotifier + 'static,
    I: IdentityProvider + 'static,
{
    loan_application_router(service, identity)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/onboarding/completion",
            axum::routing::post(completion_endpoint),
        )
        .route(
            "/api/v1/onboarding/roster",
            axum::routing::post(roster_endpoint),
        )
        .route(
            "/api/v1/workflow/statuses",
            axum::routing::get(status_catalog_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(
    Extension(state): Extension<AppState>,
) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(
    Extension(state): Extension<AppState>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn completion_endpoint(
    Json(payload): Json<CompletionRequest>,
) -> Json<CompletionResponse> {
    let CompletionRequest {
        incorporation_type,
        profile,
        documents,
    } = payload;

    let (uploaded, unrecognized_documents) = split_documents(documents);
    let breakdown = completion_breakdown(&incorporation_type, profile.as_ref(), &uploaded);

    Json(CompletionResponse {
        breakdown,
        unrecognized_documents,
    })
}

pub(crate) async fn roster_endpoint(
    Json(payload): Json<RosterRequest>,
) -> Result<Json<RosterResponse>, AppError> {
    let reader = Cursor::new(payload.csv.into_bytes());
    let entries = EntrepreneurRosterImporter::from_reader(reader)?
        .iter()
        .map(|entry| entry.scored())
        .collect();

    Ok(Json(RosterResponse { entries }))
}

pub(crate) async fn status_catalog_endpoint() -> Json<StatusCatalog> {
    Json(StatusCatalog {
        loan_application: LoanApplicationStatus::ordered()
            .into_iter()
            .map(|status| StatusEntry {
                id: status.as_str(),
                label: status.label(),
                terminal: status.is_terminal(),
            })
            .collect(),
        pipeline: PipelineStatus::ordered()
            .into_iter()
            .map(|status| StatusEntry {
                id: status.as_str(),
                label: status.label(),
                terminal: status.is_terminal(),
            })
            .collect(),
    })
}

/// Split raw document ids into known types and the ids nothing matched.
pub(crate) fn split_documents<I, S>(raw: I) -> (UploadedDocuments, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut uploaded = UploadedDocuments::new();
    let mut unrecognized = Vec::new();
    for item in raw {
        let item = item.as_ref().trim();
        if item.is_empty() {
            continue;
        }
        match item.parse::<DocumentType>() {
            Ok(document) => {
                uploaded.insert(document);
            }
            Err(_) => unrecognized.push(item.to_string()),
        }
    }
    (uploaded, unrecognized)
}
