//! arena-api — REST API for the bot arena.
//!
//! Provides axum route handlers for account management, standings,
//! scheduler inspection, and the worker-facing job/result endpoints.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/api/v1/users` | Create a user |
//! | GET | `/api/v1/bots` | List all bots |
//! | POST | `/api/v1/bots` | Create a bot |
//! | POST | `/api/v1/bots/{id}/activate` | Make a bot its user's entrant |
//! | GET | `/api/v1/standings` | Per-bot score table |
//! | GET | `/api/v1/queues` | Job counts per scheduling level |
//! | GET | `/api/v1/queues/{level}` | Jobs waiting in one level |
//! | POST | `/api/v1/schedule` | Clear queues and schedule all unplayed games |
//! | POST | `/api/v1/schedule/{bot}` | Schedule one bot's unplayed games |
//! | POST | `/api/v1/jobs/next` | Pop the highest-priority job (worker pull) |
//! | POST | `/api/v1/results` | Report an execution verdict |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use arena_actions::Actions;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub actions: Arc<Actions>,
}

/// Build the complete API router.
pub fn build_router(actions: Arc<Actions>) -> Router {
    let api_state = ApiState { actions };

    let api_routes = Router::new()
        .route("/users", post(handlers::create_user))
        .route("/bots", get(handlers::list_bots).post(handlers::create_bot))
        .route("/bots/{id}/activate", post(handlers::activate_bot))
        .route("/standings", get(handlers::standings))
        .route("/queues", get(handlers::queue_depths))
        .route("/queues/{level}", get(handlers::queue_jobs))
        .route("/schedule", post(handlers::schedule_all))
        .route("/schedule/{bot}", post(handlers::schedule_bot))
        .route("/jobs/next", post(handlers::next_job))
        .route("/results", post(handlers::report_result))
        .with_state(api_state);

    Router::new().nest("/api/v1", api_routes)
}
