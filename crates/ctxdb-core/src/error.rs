use anyhow::Error as AnyError;
use serde_json::json;
use thiserror::Error;

use crate::body::Body;
use crate::http::{header::CONTENT_TYPE, HeaderValue, Response, StatusCode};
use crate::response::{response_with_body, IntoResponse};

/// Pipeline-level error that carries an HTTP status code.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{message}")]
    BadRequest { message: String },
    #[error("not found: {what}")]
    NotFound { what: String },
    #[error("configuration error: {message}")]
    Configuration { message: String },
    #[error("internal error: {source}")]
    Internal {
        #[from]
        source: AnyError,
    },
}

impl CoreError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        CoreError::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        CoreError::NotFound { what: what.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        CoreError::Configuration {
            message: message.into(),
        }
    }

    pub fn internal<E>(error: E) -> Self
    where
        E: Into<AnyError>,
    {
        CoreError::Internal {
            source: error.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            CoreError::Configuration { .. } | CoreError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, CoreError::Configuration { .. })
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let payload = json!({
            "error": {
                "status": self.status().as_u16(),
                "message": self.message(),
            }
        });

        let body = Body::json(&payload).unwrap_or_else(|_| Body::text("internal error"));
        let mut response = response_with_body(self.status(), body);
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_sets_status_and_message() {
        let err = CoreError::bad_request("oops");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "oops");
    }

    #[test]
    fn configuration_is_a_server_error() {
        let err = CoreError::configuration("missing binding");
        assert!(err.is_configuration());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "configuration error: missing binding");
    }

    #[test]
    fn internal_wraps_source_error() {
        let err = CoreError::internal(anyhow::anyhow!("boom"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().contains("internal error: boom"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn into_response_sets_json_payload() {
        let response = CoreError::not_found("widget").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );

        let payload: serde_json::Value = response.body().to_json().expect("json payload");
        assert_eq!(payload["error"]["status"], 404);
        assert_eq!(payload["error"]["message"], "not found: widget");
    }
}
