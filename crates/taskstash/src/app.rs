use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::{healthz, livez},
        projects::{
            create_project, delete_project, get_project, list_projects, update_project,
        },
        tasks::{create_task, delete_task, get_task, list_tasks, update_task},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Resource routes with CORS
    let api_routes = Router::new()
        // Task routes
        .route("/task/", get(list_tasks).post(create_task))
        .route(
            "/task/{id}/",
            get(get_task).put(update_task).delete(delete_task),
        )
        // Project routes
        .route("/project/", get(list_projects).post(create_project))
        .route(
            "/project/{id}/",
            get(get_project).put(update_project).delete(delete_project),
        )
        .layer(cors);

    // Main application router
    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
