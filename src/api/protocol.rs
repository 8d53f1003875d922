use crate::engine::types::{Expression, ExpressionStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub expression: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub id: i64,
}

/// An expression as rendered to API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpressionView {
    pub id: i64,
    pub expression: String,
    pub status: ExpressionStatus,
    pub result: f64,
}

impl From<Expression> for ExpressionView {
    fn from(expr: Expression) -> Self {
        Self {
            id: expr.id,
            expression: expr.source,
            status: expr.status,
            result: expr.result,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExpressionsResponse {
    pub expressions: Vec<ExpressionView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExpressionResponse {
    pub expression: ExpressionView,
}
