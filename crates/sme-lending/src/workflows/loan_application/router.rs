use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::dispatch::ActionRequest;
use super::domain::{LoanApplicationDraft, LoanApplicationId};
use super::repository::{LoanApplicationRepository, RepositoryError, WorkflowNotifier};
use super::service::{LoanApplicationService, LoanApplicationServiceError};
use super::transitions::{actions_for_raw, describe};
use crate::identity::{bearer_token, CurrentUser, IdentityProvider};

/// Shared state for the loan application routes.
pub struct LoanApplicationRouterState<R, N, I> {
    pub service: Arc<LoanApplicationService<R, N>>,
    pub identity: Arc<I>,
}

impl<R, N, I> Clone for LoanApplicationRouterState<R, N, I> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            identity: Arc::clone(&self.identity),
        }
    }
}

/// Router builder exposing the loan application workflow over HTTP.
pub fn loan_application_router<R, N, I>(
    service: Arc<LoanApplicationService<R, N>>,
    identity: Arc<I>,
) -> Router
where
    R: LoanApplicationRepository + 'static,
    N: WorkflowNotifier + 'static,
    I: IdentityProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/loan-applications",
            axum::routing::post(open_handler::<R, N, I>),
        )
        .route(
            "/api/v1/loan-applications/:application_id",
            get(view_handler::<R, N, I>),
        )
        .route(
            "/api/v1/loan-applications/:application_id/actions",
            get(actions_handler::<R, N, I>).post(dispatch_handler::<R, N, I>),
        )
        .route("/api/v1/workflow/actions", get(status_actions_handler))
        .with_state(LoanApplicationRouterState { service, identity })
}

fn authenticate<I: IdentityProvider>(
    headers: &HeaderMap,
    identity: &I,
) -> Result<CurrentUser, Response> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .and_then(|token| identity.resolve(token))
        .ok_or_else(|| {
            let payload = json!({ "error": "missing or unrecognized bearer token" });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        })
}

pub(crate) fn error_response(error: LoanApplicationServiceError) -> Response {
    let status = match &error {
        LoanApplicationServiceError::Dispatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LoanApplicationServiceError::Transition(_) => StatusCode::CONFLICT,
        LoanApplicationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        LoanApplicationServiceError::Repository(
            RepositoryError::Conflict | RepositoryError::StaleRevision { .. },
        ) => StatusCode::CONFLICT,
        LoanApplicationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn open_handler<R, N, I>(
    State(state): State<LoanApplicationRouterState<R, N, I>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<LoanApplicationDraft>,
) -> Response
where
    R: LoanApplicationRepository + 'static,
    N: WorkflowNotifier + 'static,
    I: IdentityProvider + 'static,
{
    let actor = match authenticate(&headers, state.identity.as_ref()) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match state.service.open(draft, &actor) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn view_handler<R, N, I>(
    State(state): State<LoanApplicationRouterState<R, N, I>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: LoanApplicationRepository + 'static,
    N: WorkflowNotifier + 'static,
    I: IdentityProvider + 'static,
{
    match state.service.get(&LoanApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn actions_handler<R, N, I>(
    State(state): State<LoanApplicationRouterState<R, N, I>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: LoanApplicationRepository + 'static,
    N: WorkflowNotifier + 'static,
    I: IdentityProvider + 'static,
{
    match state.service.actions(&LoanApplicationId(application_id)) {
        Ok(actions) => (StatusCode::OK, axum::Json(actions)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dispatch_handler<R, N, I>(
    State(state): State<LoanApplicationRouterState<R, N, I>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<ActionRequest>,
) -> Response
where
    R: LoanApplicationRepository + 'static,
    N: WorkflowNotifier + 'static,
    I: IdentityProvider + 'static,
{
    let actor = match authenticate(&headers, state.identity.as_ref()) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let id = LoanApplicationId(application_id);
    match state.service.dispatch(&id, request, &actor) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusActionsQuery {
    status: String,
}

pub(crate) async fn status_actions_handler(Query(query): Query<StatusActionsQuery>) -> Response {
    let actions = describe(actions_for_raw(&query.status));
    (StatusCode::OK, axum::Json(actions)).into_response()
}
