use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{FacultyId, SubjectId};
use super::repository::{AllocationStore, FacultyDirectory, SubjectCatalog};
use super::service::{AllocationRunOutcome, AllocationService, AllocationServiceError};

/// Router builder exposing allocation, lookup, and preference endpoints.
pub fn allocation_router<F, S, A>(service: Arc<AllocationService<F, S, A>>) -> Router
where
    F: FacultyDirectory + 'static,
    S: SubjectCatalog + 'static,
    A: AllocationStore + 'static,
{
    Router::new()
        .route("/api/v1/allocations", get(list_allocations_handler::<F, S, A>))
        .route("/api/v1/allocations/run", post(run_handler::<F, S, A>))
        .route("/api/v1/allocations/stats", get(stats_handler::<F, S, A>))
        .route(
            "/api/v1/allocations/faculty/:faculty_id",
            get(faculty_allocation_handler::<F, S, A>),
        )
        .route(
            "/api/v1/subjects/:subject_id",
            get(subject_handler::<F, S, A>),
        )
        .route(
            "/api/v1/faculty/:faculty_id/eligible-subjects",
            get(eligible_subjects_handler::<F, S, A>),
        )
        .route(
            "/api/v1/faculty/:faculty_id/preferences",
            post(submit_preferences_handler::<F, S, A>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreferenceSubmission {
    pub(crate) preferences: Vec<SubjectId>,
}

pub(crate) async fn run_handler<F, S, A>(
    State(service): State<Arc<AllocationService<F, S, A>>>,
) -> Response
where
    F: FacultyDirectory + 'static,
    S: SubjectCatalog + 'static,
    A: AllocationStore + 'static,
{
    match service.try_run_allocation(Utc::now()) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => (
            status_for(&error),
            axum::Json(AllocationRunOutcome::failed(&error)),
        )
            .into_response(),
    }
}

pub(crate) async fn list_allocations_handler<F, S, A>(
    State(service): State<Arc<AllocationService<F, S, A>>>,
) -> Response
where
    F: FacultyDirectory + 'static,
    S: SubjectCatalog + 'static,
    A: AllocationStore + 'static,
{
    match service.allocations() {
        Ok(allocations) => (StatusCode::OK, axum::Json(allocations)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn stats_handler<F, S, A>(
    State(service): State<Arc<AllocationService<F, S, A>>>,
) -> Response
where
    F: FacultyDirectory + 'static,
    S: SubjectCatalog + 'static,
    A: AllocationStore + 'static,
{
    match service.stats() {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn faculty_allocation_handler<F, S, A>(
    State(service): State<Arc<AllocationService<F, S, A>>>,
    Path(faculty_id): Path<String>,
) -> Response
where
    F: FacultyDirectory + 'static,
    S: SubjectCatalog + 'static,
    A: AllocationStore + 'static,
{
    let id = FacultyId(faculty_id);
    match service.allocation_for_faculty(&id) {
        Ok(allocation) => {
            let payload = json!({
                "faculty_id": id.0,
                "allocation": allocation,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn subject_handler<F, S, A>(
    State(service): State<Arc<AllocationService<F, S, A>>>,
    Path(subject_id): Path<String>,
) -> Response
where
    F: FacultyDirectory + 'static,
    S: SubjectCatalog + 'static,
    A: AllocationStore + 'static,
{
    let id = SubjectId(subject_id);
    match service.subject(&id) {
        Ok(Some(subject)) => (StatusCode::OK, axum::Json(subject)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("subject {id} not found"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn eligible_subjects_handler<F, S, A>(
    State(service): State<Arc<AllocationService<F, S, A>>>,
    Path(faculty_id): Path<String>,
) -> Response
where
    F: FacultyDirectory + 'static,
    S: SubjectCatalog + 'static,
    A: AllocationStore + 'static,
{
    match service.eligible_subjects(&FacultyId(faculty_id)) {
        Ok(subjects) => (StatusCode::OK, axum::Json(subjects)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn submit_preferences_handler<F, S, A>(
    State(service): State<Arc<AllocationService<F, S, A>>>,
    Path(faculty_id): Path<String>,
    axum::Json(submission): axum::Json<PreferenceSubmission>,
) -> Response
where
    F: FacultyDirectory + 'static,
    S: SubjectCatalog + 'static,
    A: AllocationStore + 'static,
{
    let id = FacultyId(faculty_id);
    match service.submit_preferences(&id, submission.preferences) {
        Ok(member) => {
            let payload = json!({
                "faculty_id": member.id.0,
                "preferences": member.preferences,
                "submitted_at": member.submitted_at,
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

fn status_for(error: &AllocationServiceError) -> StatusCode {
    match error {
        AllocationServiceError::FacultyNotFound(_) => StatusCode::NOT_FOUND,
        AllocationServiceError::Preferences(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AllocationServiceError::NoEligibleInput => StatusCode::UNPROCESSABLE_ENTITY,
        AllocationServiceError::CollaboratorRead { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AllocationServiceError::Store(_) | AllocationServiceError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(error: AllocationServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status_for(&error), axum::Json(payload)).into_response()
}
