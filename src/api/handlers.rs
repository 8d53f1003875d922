use super::protocol::*;
use crate::auth::{self, AuthUser};
use crate::config::Config;
use crate::engine::dispatcher::Dispatcher;
use crate::engine::reducer;
use crate::engine::types::ExpressionStatus;
use crate::storage::memory::Storage;

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(e) => {
                tracing::error!("internal error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

pub async fn handle_register(
    Extension(storage): Extension<Arc<Storage>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<StatusResponse>, ApiError> {
    if credentials.login.is_empty() || credentials.password.is_empty() {
        return Err(ApiError::BadRequest(
            "login and password are required".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&credentials.password)?;

    storage
        .create_user(&credentials.login, &password_hash)
        .map_err(|e| ApiError::Conflict(e.to_string()))?;

    Ok(Json(StatusResponse {
        status: "ok".to_string(),
    }))
}

pub async fn handle_login(
    Extension(storage): Extension<Arc<Storage>>,
    Extension(config): Extension<Arc<Config>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    if credentials.login.is_empty() || credentials.password.is_empty() {
        return Err(ApiError::BadRequest(
            "login and password are required".to_string(),
        ));
    }

    let user = storage
        .user_by_login(&credentials.login)
        .map_err(|_| ApiError::Unauthorized)?;

    if !auth::verify_password(&credentials.password, &user.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    let token = auth::issue_token(user.id, &config.jwt_secret)?;

    Ok(Json(TokenResponse { token }))
}

pub async fn handle_calculate(
    AuthUser(user_id): AuthUser,
    Extension(storage): Extension<Arc<Storage>>,
    Extension(dispatcher): Extension<Arc<Dispatcher>>,
    Json(request): Json<CalculateRequest>,
) -> Result<(StatusCode, Json<CalculateResponse>), ApiError> {
    let id = storage.next_expression_id();

    storage.save_expression(
        id,
        user_id,
        &request.expression,
        ExpressionStatus::Processing,
        0.0,
    )?;

    // One reducer per expression; it persists the terminal state itself.
    let storage = storage.clone();
    let dispatcher = dispatcher.clone();
    tokio::spawn(async move {
        reducer::reduce(storage, dispatcher, id, user_id, request.expression).await;
    });

    Ok((StatusCode::CREATED, Json(CalculateResponse { id })))
}

pub async fn handle_expressions(
    AuthUser(user_id): AuthUser,
    Extension(storage): Extension<Arc<Storage>>,
) -> Result<Json<ExpressionsResponse>, ApiError> {
    let expressions = storage
        .expressions_for_user(user_id)
        .into_iter()
        .map(ExpressionView::from)
        .collect();

    Ok(Json(ExpressionsResponse { expressions }))
}

pub async fn handle_expression_by_id(
    AuthUser(user_id): AuthUser,
    Extension(storage): Extension<Arc<Storage>>,
    Path(id): Path<i64>,
) -> Result<Json<ExpressionResponse>, ApiError> {
    let expression = storage
        .expression(id, user_id)
        .map_err(|_| ApiError::NotFound)?;

    Ok(Json(ExpressionResponse {
        expression: expression.into(),
    }))
}
