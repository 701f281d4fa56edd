use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::bson::oid::ObjectId;
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for the API boundary. Everything a handler can fail with is
/// normalized into one of these kinds before it leaves the process.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request parameters.
    #[error("{0}")]
    Validation(String),

    /// Caller is authenticated but not allowed to touch this resource.
    #[error("{0}")]
    Forbidden(String),

    /// Resort, time slot, or booking absent from the store.
    #[error("{0} not found")]
    NotFound(String),

    /// The requested write collides with existing state.
    #[error("{0}")]
    Conflict(String),

    /// The owner's pricing configuration cannot answer this request. The
    /// detail payload enumerates the valid options so the client can render
    /// them.
    #[error("{message}")]
    Configuration {
        message: String,
        detail: serde_json::Value,
    },

    /// External store unreachable or misbehaving. Not retried here.
    #[error("storage error: {0}")]
    Upstream(#[from] mongodb::error::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Configuration { .. } => "configuration",
            ApiError::Upstream(_) => "upstream",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Configuration { .. } => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });

        match self {
            ApiError::Configuration { detail, .. } => {
                body["detail"] = detail.clone();
            }
            ApiError::Upstream(err) => {
                // Driver internals stay in the logs, not on the wire.
                log::error!("upstream storage error: {:?}", err);
                body["error"] = json!("storage unavailable");
            }
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Parse a path/query ObjectId, turning driver parse errors into a 400.
pub fn parse_object_id(value: &str, what: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::validation(format!("Invalid {}", what)))
}
