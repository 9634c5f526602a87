//! REST API handlers.
//!
//! Each handler delegates to the `Actions` façade (or the scheduler it
//! wraps) and returns JSON responses.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use arena_actions::ActionsError;
use arena_core::Verdict;
use arena_scheduler::SchedulerError;
use arena_state::StateError;

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse + use<> {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

/// Map an orchestration failure onto an HTTP status.
fn actions_error(e: &ActionsError) -> impl IntoResponse {
    let status = match e {
        ActionsError::IncompleteExecution { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ActionsError::UserNotFound(_) | ActionsError::BotNotFound(_) => StatusCode::NOT_FOUND,
        ActionsError::Codec(_) => StatusCode::BAD_REQUEST,
        ActionsError::State(StateError::InvalidScore(_) | StateError::SelfPlay(_)) => {
            StatusCode::BAD_REQUEST
        }
        ActionsError::Scheduler(SchedulerError::LevelOutOfRange { .. }) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(&e.to_string(), status)
}

// ── Accounts ───────────────────────────────────────────────────

/// Create-user request body.
#[derive(serde::Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<ApiState>,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    match state.actions.create_user(&req.email, &req.name) {
        Ok(user) => (StatusCode::CREATED, ApiResponse::ok(user)).into_response(),
        Err(e) => actions_error(&e).into_response(),
    }
}

/// Create-bot request body.
#[derive(serde::Deserialize)]
pub struct CreateBotRequest {
    pub user_id: String,
    pub name: String,
    pub code: String,
}

/// GET /api/v1/bots
pub async fn list_bots(State(state): State<ApiState>) -> impl IntoResponse {
    match state.actions.store().list_bots() {
        Ok(bots) => ApiResponse::ok(bots).into_response(),
        Err(e) => error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}

/// POST /api/v1/bots
pub async fn create_bot(
    State(state): State<ApiState>,
    Json(req): Json<CreateBotRequest>,
) -> impl IntoResponse {
    match state.actions.create_bot(&req.user_id, &req.name, &req.code) {
        Ok(bot) => (StatusCode::CREATED, ApiResponse::ok(bot)).into_response(),
        Err(e) => actions_error(&e).into_response(),
    }
}

/// POST /api/v1/bots/:id/activate
pub async fn activate_bot(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.actions.set_bot_active(&id) {
        Ok(bot) => ApiResponse::ok(bot).into_response(),
        Err(e) => actions_error(&e).into_response(),
    }
}

// ── Standings ──────────────────────────────────────────────────

/// GET /api/v1/standings
pub async fn standings(State(state): State<ApiState>) -> impl IntoResponse {
    match state.actions.standings() {
        Ok(rows) => ApiResponse::ok(rows).into_response(),
        Err(e) => actions_error(&e).into_response(),
    }
}

// ── Queues ─────────────────────────────────────────────────────

/// GET /api/v1/queues
pub async fn queue_depths(State(state): State<ApiState>) -> impl IntoResponse {
    let depths = state.actions.scheduler().queue_depths().await;
    ApiResponse::ok(depths).into_response()
}

/// GET /api/v1/queues/:level
pub async fn queue_jobs(
    State(state): State<ApiState>,
    Path(level): Path<usize>,
) -> impl IntoResponse {
    match state.actions.scheduler().queue_jobs(level).await {
        Ok(jobs) => ApiResponse::ok(jobs).into_response(),
        Err(e) => error_response(&e.to_string(), StatusCode::BAD_REQUEST).into_response(),
    }
}

// ── Scheduling ─────────────────────────────────────────────────

/// POST /api/v1/schedule
///
/// Runs a full pass: queues are cleared first so the pass starts from a
/// known baseline, then every active pairing is scheduled.
pub async fn schedule_all(State(state): State<ApiState>) -> impl IntoResponse {
    state.actions.scheduler().clear_all().await;
    match state.actions.request_all_games().await {
        Ok(queued) => ApiResponse::ok(serde_json::json!({ "queued": queued })).into_response(),
        Err(e) => actions_error(&e).into_response(),
    }
}

/// POST /api/v1/schedule/:bot
pub async fn schedule_bot(
    State(state): State<ApiState>,
    Path(bot): Path<String>,
) -> impl IntoResponse {
    match state.actions.request_games_for_bot(&bot).await {
        Ok(queued) => ApiResponse::ok(serde_json::json!({ "queued": queued })).into_response(),
        Err(e) => actions_error(&e).into_response(),
    }
}

// ── Workers ────────────────────────────────────────────────────

/// POST /api/v1/jobs/next
pub async fn next_job(State(state): State<ApiState>) -> impl IntoResponse {
    match state.actions.scheduler().next_job().await {
        Some(job) => ApiResponse::ok(job).into_response(),
        None => error_response("no jobs queued", StatusCode::NOT_FOUND).into_response(),
    }
}

/// Result-report request body.
#[derive(serde::Deserialize)]
pub struct ReportResultRequest {
    pub first: String,
    pub second: String,
    pub verdict: Verdict,
}

/// POST /api/v1/results
pub async fn report_result(
    State(state): State<ApiState>,
    Json(req): Json<ReportResultRequest>,
) -> impl IntoResponse {
    match state
        .actions
        .report_result(&req.first, &req.second, &req.verdict)
    {
        Ok(record) => (StatusCode::CREATED, ApiResponse::ok(record)).into_response(),
        Err(e) => actions_error(&e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arena_actions::Actions;
    use arena_core::VerdictKind;
    use arena_scheduler::Scheduler;
    use arena_state::StateStore;

    fn test_state(num_rounds: usize) -> ApiState {
        let store = StateStore::open_in_memory().unwrap();
        let scheduler = Arc::new(Scheduler::new(Arc::new(store.clone()), num_rounds));
        ApiState {
            actions: Arc::new(Actions::new(store, scheduler)),
        }
    }

    fn complete_verdict(score: i32) -> Verdict {
        Verdict::complete(score, vec![0, 1, 4, 7, 8])
    }

    #[tokio::test]
    async fn create_user_returns_created() {
        let state = test_state(5);
        let req = CreateUserRequest {
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
        };

        let resp = create_user(State(state), Json(req)).await.into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn create_bot_requires_existing_user() {
        let state = test_state(5);
        let req = CreateBotRequest {
            user_id: "user-missing".to_string(),
            name: "randobot".to_string(),
            code: "...".to_string(),
        };

        let resp = create_bot(State(state), Json(req)).await.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_bots_empty() {
        let state = test_state(5);
        let resp = list_bots(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn activate_unknown_bot_is_not_found() {
        let state = test_state(5);
        let resp = activate_bot(State(state), Path("bot-missing".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn standings_empty() {
        let state = test_state(5);
        let resp = standings(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn queue_inspection_checks_bounds() {
        let state = test_state(5);

        let resp = queue_jobs(State(state.clone()), Path(4)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = queue_jobs(State(state), Path(5)).await.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn schedule_all_then_pop_jobs() {
        let state = test_state(2);
        let user1 = state.actions.create_user("a@example.com", "A").unwrap();
        let user2 = state.actions.create_user("b@example.com", "B").unwrap();
        state.actions.create_bot(&user1.id, "one", "...").unwrap();
        state.actions.create_bot(&user2.id, "two", "...").unwrap();

        let resp = schedule_all(State(state.clone())).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.actions.scheduler().queue_depths().await, vec![2, 2]);

        // 4 queued jobs pop, then the well runs dry.
        for _ in 0..4 {
            let resp = next_job(State(state.clone())).await.into_response();
            assert_eq!(resp.status(), StatusCode::OK);
        }
        let resp = next_job(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn report_result_records_game() {
        let state = test_state(5);
        let req = ReportResultRequest {
            first: "b1".to_string(),
            second: "b2".to_string(),
            verdict: complete_verdict(1),
        };

        let resp = report_result(State(state.clone()), Json(req)).await.into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            state
                .actions
                .store()
                .games_played_as_first(&"b1".to_string(), &"b2".to_string())
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn incomplete_verdict_is_unprocessable() {
        let state = test_state(5);
        let req = ReportResultRequest {
            first: "b1".to_string(),
            second: "b2".to_string(),
            verdict: Verdict::failed(VerdictKind::Exception, "IndexError: ..."),
        };

        let resp = report_result(State(state), Json(req)).await.into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn self_play_report_is_bad_request() {
        let state = test_state(5);
        let req = ReportResultRequest {
            first: "b1".to_string(),
            second: "b1".to_string(),
            verdict: complete_verdict(0),
        };

        let resp = report_result(State(state), Json(req)).await.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
