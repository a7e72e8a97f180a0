use ctxdb_core::CoreError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::client::ClientError;

/// Errors raised while configuring or using a database binding.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error(
        "a database client is required; supply one with PluginOptions::client or PluginOptions::per_request"
    )]
    MissingClient,

    #[error("context key must not be empty")]
    EmptyKey,

    #[error("invalid binding settings: {0}")]
    InvalidSettings(ValidationErrors),

    #[error(
        "binding \"{key}\" is scoped, which disconnects its client after every request; \
         a shared client would be closed while other requests still use it, \
         so scoped bindings need a per-request client source"
    )]
    ScopedSharedClient { key: String },

    #[error(
        "database client not found in context with key \"{key}\"; \
         make sure the database middleware is applied"
    )]
    ClientNotFound { key: String },

    #[error("context key \"{key}\" does not hold a {expected} client handle")]
    ClientTypeMismatch { key: String, expected: &'static str },

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl PluginError {
    /// `true` for mistakes in how the binding was set up, as opposed to client failures.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, PluginError::Client(_))
    }
}

impl From<ValidationErrors> for PluginError {
    fn from(errors: ValidationErrors) -> Self {
        if errors.field_errors().contains_key("key") {
            PluginError::EmptyKey
        } else {
            PluginError::InvalidSettings(errors)
        }
    }
}

impl From<PluginError> for CoreError {
    fn from(err: PluginError) -> Self {
        match err {
            PluginError::Client(source) => CoreError::internal(source),
            other => CoreError::configuration(other.to_string()),
        }
    }
}
