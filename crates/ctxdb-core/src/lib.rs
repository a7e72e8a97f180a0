//! Request pipeline primitives: a per-request context with a variable store, an async
//! middleware chain, and a `tower_service::Service` front door.

pub mod body;
pub mod context;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod pipeline;
pub mod response;
pub mod vars;

pub use body::Body;
pub use context::RequestContext;
pub use error::CoreError;
pub use extractor::FromRequest;
pub use middleware::{BoxMiddleware, Middleware, Next, RequestLogger};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use response::IntoResponse;
pub use vars::ContextVars;
