use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::handler::user_handler::{
    create_user_handler,
    delete_user_handler,
    list_users_handler,
    ping_handler,
    update_user_handler,
    UserHandlerState,
};
use crate::util::error::{HandlerError, HandlerErrorKind};

pub fn user_router(state: UserHandlerState) -> Router {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route("/users/{userID}", put(update_user_handler).delete(delete_user_handler))
        .with_state(state)
}

/// Every route the service exposes, with request tracing and a per-request
/// timeout.
pub fn app_router(state: UserHandlerState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(user_router(state))
        .route("/ping", get(ping_handler))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(map_response(timeout_envelope))
        .layer(TraceLayer::new_for_http())
}

// The timeout layer answers with an empty body; give it the error envelope.
async fn timeout_envelope(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    HandlerError::new(HandlerErrorKind::Timeout, "Request took too long to complete").into_response()
}
