use crate::data::{ResponseStatus, ScheduleRequest, ScheduleResponse};
use crate::engine::SolveStatus;
use crate::error::SolveError;
use crate::solver::{self, SolveReport};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;

struct AppState {
    started: Instant,
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "solve": "POST /v1/schedule/solve",
            "health": "GET /health"
        }
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "solver": "highs",
        "uptimeSecs": state.started.elapsed().as_secs()
    }))
}

async fn solve_schedule(
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, (StatusCode, String)> {
    // solves can run for the whole time budget; keep them off the async workers
    let report = tokio::task::spawn_blocking(move || solver::solve(request))
        .await
        .map_err(|e| {
            error!("solver task aborted: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("solver task aborted: {e}"),
            )
        })?;

    match report {
        Ok(report) => Ok(Json(respond(report))),
        Err(SolveError::Validation(e)) => Err((StatusCode::BAD_REQUEST, e.to_string())),
        Err(e) => {
            error!("solve failed: {e}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

fn respond(report: SolveReport) -> ScheduleResponse {
    let scheduled_students = report.schedule.len();
    if scheduled_students == 0 {
        return ScheduleResponse {
            status: ResponseStatus::Infeasible,
            message: "no feasible schedule found: check faculty availability, examiner expertise, and the session grid".to_string(),
            total_students: report.total_students,
            scheduled_students: 0,
            schedule: Vec::new(),
        };
    }

    let message = match report.status {
        SolveStatus::Optimal => format!(
            "scheduled {scheduled_students} of {} students (optimal)",
            report.total_students
        ),
        _ => format!(
            "scheduled {scheduled_students} of {} students (best effort within the time budget)",
            report.total_students
        ),
    };
    ScheduleResponse {
        status: ResponseStatus::Success,
        message,
        total_students: report.total_students,
        scheduled_students,
        schedule: report.schedule,
    }
}

pub fn router() -> Router {
    let state = Arc::new(AppState {
        started: Instant::now(),
    });
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/v1/schedule/solve", post(solve_schedule))
        .with_state(state)
}

pub async fn run(bind: &str) {
    let app = router();

    let listener = tokio::net::TcpListener::bind(bind).await.unwrap();

    info!(
        "defense scheduler listening at http://{}",
        listener.local_addr().unwrap()
    );

    axum::serve(listener, app).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_from_json(value: Value) -> ScheduleRequest {
        serde_json::from_value(value).unwrap()
    }

    fn solvable_payload() -> Value {
        json!({
            "students": [{
                "name": "Ana",
                "title": "Mesh routing in sparse topologies",
                "field": "networks",
                "advisor1": "Dr. Klein",
                "advisor2": "Dr. Osei"
            }],
            "faculty": [
                {"name": "Dr. Klein", "expertise": ["networks"]},
                {"name": "Dr. Osei", "expertise": ["security"]},
                {"name": "Dr. Vidal", "expertise": ["networks"]},
                {"name": "Dr. Mora", "expertise": ["networks"]}
            ],
            "availability": [
                {"name": "Dr. Klein", "available": ["Monday 08:00-10:00"]},
                {"name": "Dr. Osei", "available": ["Monday 08:00-10:00"]},
                {"name": "Dr. Vidal", "available": ["Monday 08:00-10:00"]},
                {"name": "Dr. Mora", "available": ["Monday 08:00-10:00"]}
            ],
            "rooms": ["Room A"],
            "days": ["Monday"],
            "timeSlots": ["08:00-10:00"],
            "maxTimeSeconds": 10
        })
    }

    #[tokio::test]
    async fn solve_endpoint_schedules_a_student() {
        let request = request_from_json(solvable_payload());
        let Json(response) = solve_schedule(Json(request)).await.unwrap();

        assert_eq!(response.status, ResponseStatus::Success);
        assert_eq!(response.total_students, 1);
        assert_eq!(response.scheduled_students, 1);
        assert_eq!(response.schedule.len(), 1);
        assert!(response.message.contains("1 of 1"));
    }

    #[tokio::test]
    async fn unplaceable_committee_reports_infeasible() {
        // the only faculty covering the field are the student's advisors
        let request = request_from_json(json!({
            "students": [{
                "name": "Ana",
                "title": "Type-level proofs",
                "field": "theory",
                "advisor1": "Dr. Klein",
                "advisor2": "Dr. Osei"
            }],
            "faculty": [
                {"name": "Dr. Klein", "expertise": ["theory"]},
                {"name": "Dr. Osei", "expertise": ["theory"]},
                {"name": "Dr. Vidal", "expertise": ["security"]}
            ],
            "availability": [
                {"name": "Dr. Klein", "available": ["Monday 08:00-10:00"]},
                {"name": "Dr. Osei", "available": ["Monday 08:00-10:00"]},
                {"name": "Dr. Vidal", "available": ["Monday 08:00-10:00"]}
            ],
            "rooms": ["Room A"],
            "days": ["Monday"],
            "timeSlots": ["08:00-10:00"],
            "maxTimeSeconds": 10
        }));
        let Json(response) = solve_schedule(Json(request)).await.unwrap();

        assert_eq!(response.status, ResponseStatus::Infeasible);
        assert_eq!(response.scheduled_students, 0);
        assert!(response.schedule.is_empty());
    }

    #[tokio::test]
    async fn empty_student_list_is_a_bad_request() {
        let request = request_from_json(json!({
            "students": [],
            "faculty": [{"name": "Dr. Klein", "expertise": ["networks"]}]
        }));
        let (code, message) = solve_schedule(Json(request)).await.unwrap_err();

        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(message.contains("student"));
    }

    #[tokio::test]
    async fn unknown_advisor_is_a_bad_request() {
        let mut payload = solvable_payload();
        payload["students"][0]["advisor2"] = json!("Dr. Ghost");
        let request = request_from_json(payload);
        let (code, message) = solve_schedule(Json(request)).await.unwrap_err();

        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(message.contains("Dr. Ghost"));
    }

    #[tokio::test]
    async fn health_reports_the_solver_backend() {
        let state = State(Arc::new(AppState {
            started: Instant::now(),
        }));
        let Json(body) = health(state).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["solver"], "highs");
        assert!(body["uptimeSecs"].is_u64());
    }

    #[tokio::test]
    async fn service_info_lists_the_solve_endpoint() {
        let Json(body) = service_info().await;

        assert_eq!(body["service"], env!("CARGO_PKG_NAME"));
        assert_eq!(body["status"], "running");
        let solve = body["endpoints"]["solve"].as_str().unwrap();
        assert!(solve.contains("/v1/schedule/solve"));
    }
}
