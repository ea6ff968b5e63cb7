//! API request handlers for expression operations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use exprguard_common::{bindings_from_json, Error, Expression};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::AppState;

/// Request to save an expression
#[derive(Debug, Deserialize)]
pub struct SaveExpressionRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub expression: Option<String>,
}

/// Request to evaluate a stored expression
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub id: Option<serde_json::Value>,

    #[serde(default)]
    pub variables: Option<serde_json::Value>,
}

/// Request to validate expression text
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub expression: Option<String>,
}

/// Response from validation
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });

        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::InvalidArgument(_) | Error::InvalidSyntax(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "expression-service"
    }))
}

/// Save an expression, returning its id as plain text
pub async fn save_expression_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveExpressionRequest>,
) -> Result<String, ApiError> {
    let name = payload
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| bad_request("Name cannot be blank"))?;
    let expression = payload
        .expression
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| bad_request("Expression cannot be blank"))?;

    info!("Received request to save expression: {}", expression);
    let id = state.service.save_expression(&name, &expression).await?;
    info!("Expression saved with ID: {}", id);

    Ok(id)
}

/// List all stored expressions
pub async fn list_expressions_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Expression>>, ApiError> {
    let expressions = state.service.list_all().await?;
    Ok(Json(expressions))
}

/// Get a stored expression by id
pub async fn get_expression_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Expression>, ApiError> {
    info!("Getting expression: {}", id);
    let expression = state.service.get_expression_by_id(&id).await?;
    Ok(Json(expression))
}

/// Evaluate a stored expression with the supplied variables
pub async fn evaluate_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<bool>, ApiError> {
    let (Some(id), Some(variables)) = (payload.id, payload.variables) else {
        return Err(bad_request("Missing required fields: 'id' or 'variables'"));
    };

    let id = match id {
        serde_json::Value::String(id) => id,
        _ => return Err(bad_request("Field 'id' must be a string")),
    };
    let serde_json::Value::Object(variables) = variables else {
        return Err(bad_request("Field 'variables' must be a JSON object"));
    };

    let bindings = bindings_from_json(&variables)?;

    match state.service.evaluate_expression(&id, &bindings).await {
        Ok(result) => Ok(Json(result)),
        Err(e @ Error::Evaluation(_)) => {
            error!("Evaluation failed for {}: {}", id, e);
            Err(ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Error during evaluation: {}", e),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Validate expression text without storing it
pub async fn validate_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let expression = payload.expression.unwrap_or_default();

    match state.service.validate_expression(&expression) {
        Ok(()) => Ok(Json(ValidateResponse {
            valid: true,
            error: None,
        })),
        Err(e @ (Error::InvalidArgument(_) | Error::InvalidSyntax(_))) => {
            info!("Expression validation failed: {}", e);
            Ok(Json(ValidateResponse {
                valid: false,
                error: Some(e.to_string()),
            }))
        }
        Err(e) => Err(e.into()),
    }
}
