use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use json::Json;
use postsmith_common::model::ModelValidationError;
use postsmith_content::client::{ContentClient, ContentError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::error;

mod authoring;
mod json;
mod routes;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub content_client: Arc<ContentClient>,
    pub mode: AppMode,
}

/// Post creation is a local authoring tool and is switched off in
/// production deployments.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub enum AppMode {
    #[default]
    Development,
    Production,
}

impl AppMode {
    #[must_use]
    pub fn from_app_env(app_env: Option<&str>) -> Self {
        match app_env {
            Some(app_env) if app_env.trim().eq_ignore_ascii_case("production") => {
                AppMode::Production
            }
            _ => AppMode::Development,
        }
    }
}

pub fn routes() -> ServerRouter {
    routes::routes().fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error("Post creation is disabled in production")]
    NotAvailableInProduction,
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("Content task did not complete: {0}")]
    ContentTask(#[from] JoinError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_) | ServerError::PathRejection(_) => StatusCode::NOT_FOUND,
            ServerError::JsonRejection(_) | ServerError::Content(ContentError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::NotAvailableInProduction => StatusCode::FORBIDDEN,
            ServerError::Content(ContentError::Conflict { .. }) => StatusCode::CONFLICT,
            ServerError::JsonResponse(_)
            | ServerError::Content(ContentError::Storage(_) | ContentError::Serialize { .. })
            | ServerError::ContentTask(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the author.
    pub fn message(&self) -> String {
        match self {
            ServerError::UnknownRoute(_) | ServerError::PathRejection(_) => "Not found".to_owned(),
            ServerError::JsonRejection(_) => "Invalid JSON data received.".to_owned(),
            ServerError::NotAvailableInProduction => "Not available in production".to_owned(),
            ServerError::Content(ContentError::Validation(ModelValidationError::MissingFields(
                err,
            ))) => err.to_string(),
            ServerError::Content(ContentError::Validation(ModelValidationError::InvalidDate(
                _,
            ))) => "Error processing post data.".to_owned(),
            ServerError::Content(err @ ContentError::Conflict { .. }) => err.to_string(),
            ServerError::JsonResponse(_)
            | ServerError::Content(ContentError::Storage(_) | ContentError::Serialize { .. })
            | ServerError::ContentTask(_) => "Error creating post.".to_owned(),
        }
    }

    /// Diagnostic text for `errorDetail`.
    pub fn detail(&self) -> Option<String> {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::NotAvailableInProduction
            | ServerError::Content(ContentError::Conflict { .. }) => None,
            ServerError::JsonRejection(rejection) => Some(rejection.body_text()),
            ServerError::Content(ContentError::Validation(ModelValidationError::MissingFields(
                err,
            ))) => Some(format!("Missing: {}", err.missing().join(", "))),
            ServerError::Content(err) => Some(err.to_string()),
            ServerError::PathRejection(_)
            | ServerError::JsonResponse(_)
            | ServerError::ContentTask(_) => Some(self.to_string()),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,
}

impl From<&ServerError> for ErrorResponse {
    fn from(value: &ServerError) -> Self {
        Self {
            message: value.message(),
            error_detail: value.detail(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
