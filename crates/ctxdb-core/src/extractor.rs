use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::CoreError;

/// Pull a typed value out of the request context.
///
/// Extractors read request-scoped state that earlier middleware published, so a failed
/// extraction usually means the pipeline was assembled without the middleware that provides it.
#[async_trait(?Send)]
pub trait FromRequest: Sized {
    async fn from_request(ctx: &RequestContext) -> Result<Self, CoreError>;
}
