use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::dto::user_dto::{DeleteUserResponse, UserListParams, UserListResponse, UserRequest, UserResponse};
use crate::model::user::User;
use crate::repository::user_query::UserQuery;
use crate::service::user_service::UserService;
use crate::util::error::{HandlerError, ServiceError};
use crate::util::notifier::{notify_best_effort, NotificationAction, Notifier};

/// Shared state of the user routes.
#[derive(Clone)]
pub struct UserHandlerState {
    pub service: Arc<dyn UserService>,
    pub notifier: Arc<dyn Notifier>,
}

impl UserHandlerState {
    pub fn new(service: Arc<dyn UserService>, notifier: Arc<dyn Notifier>) -> Self {
        Self { service, notifier }
    }
}

fn bind_user(payload: Result<Json<UserRequest>, JsonRejection>) -> Result<User, HandlerError> {
    let Json(request) = payload
        .map_err(|e| ServiceError::InputFormat(format!("Invalid user body: {}", e.body_text())))?;
    Ok(User::from(request).escaped())
}

fn bind_user_id(path: Result<Path<String>, PathRejection>) -> Result<String, HandlerError> {
    let Path(user_id) = path
        .map_err(|e| ServiceError::InputFormat(format!("Invalid user id: {}", e.body_text())))?;
    Ok(user_id)
}

// GET /users
pub async fn list_users_handler(
    State(state): State<UserHandlerState>,
    params: Result<Query<UserListParams>, QueryRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Query(params) = params
        .map_err(|e| ServiceError::InputFormat(format!("Invalid query string: {}", e.body_text())))?;
    debug!(?params, "Listing users");
    let query = UserQuery::from_params(&params)?;
    let (users, count) = state.service.list_users(query).await?;
    Ok(Json(UserListResponse::new(users, count)))
}

// POST /users
pub async fn create_user_handler(
    State(state): State<UserHandlerState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = bind_user(payload)?;
    let created = state.service.create_user(user).await?;
    info!(user_id = ?created.id, "User created");
    notify_best_effort(state.notifier.as_ref(), NotificationAction::Created, &created).await;
    Ok(Json(UserResponse::new(created)))
}

// PUT /users/{userID}
pub async fn update_user_handler(
    State(state): State<UserHandlerState>,
    user_id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = bind_user_id(user_id)?;
    let user = bind_user(payload)?;
    let updated = state.service.update_user(&user_id, user).await?;
    notify_best_effort(state.notifier.as_ref(), NotificationAction::Updated, &updated).await;
    Ok(Json(UserResponse::new(updated)))
}

// DELETE /users/{userID}
pub async fn delete_user_handler(
    State(state): State<UserHandlerState>,
    user_id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = bind_user_id(user_id)?;
    let deleted_id = state.service.delete_user(&user_id).await?;
    notify_best_effort(state.notifier.as_ref(), NotificationAction::Deleted, &User::identified_by(deleted_id)).await;
    Ok(Json(DeleteUserResponse {
        success: true,
        id: user_id,
    }))
}

// GET /ping
pub async fn ping_handler() -> &'static str {
    "pong"
}
