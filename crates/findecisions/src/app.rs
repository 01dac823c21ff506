use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        auth::{
            change_password, get_session, login, logout, request_password_reset, reset_password,
            resend_verify_email, signup, verify_email,
        },
        decisions::{
            create_decision, delete_decision, get_decision, list_decisions, update_decision,
        },
        health::health,
        invites::{
            accept_invite, create_invite, list_received_invites, list_sent_invites, reject_invite,
        },
        projects::{
            create_project, delete_project, get_project, list_members, list_projects,
            list_public_projects, update_project,
        },
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

    let auth_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/verify-email", get(verify_email))
        .route("/resend-verify-email", post(resend_verify_email))
        .route("/logout", post(logout))
        .route("/request-password-reset", post(request_password_reset))
        .route("/reset-password", post(reset_password))
        .route("/change-password", post(change_password))
        .route("/session", get(get_session));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        // Project routes
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/public", get(list_public_projects))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/projects/{id}/members", get(list_members))
        // Decision routes
        .route("/decisions", get(list_decisions).post(create_decision))
        .route(
            "/decisions/{id}",
            get(get_decision)
                .put(update_decision)
                .delete(delete_decision),
        )
        // Invite routes
        .route("/invites", post(create_invite))
        .route("/invites/sent", get(list_sent_invites))
        .route("/invites/received", get(list_received_invites))
        .route("/invites/{id}/accept", post(accept_invite))
        .route("/invites/{id}/reject", post(reject_invite))
        .layer(cors);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
