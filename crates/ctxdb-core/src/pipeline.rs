use std::sync::Arc;
use std::task::{Context, Poll};

use tower_service::Service;

use crate::context::RequestContext;
use crate::error::CoreError;
use crate::handler::{BoxHandler, IntoHandler};
use crate::http::{HandlerFuture, Request, Response};
use crate::middleware::{BoxMiddleware, Middleware, Next};
use crate::response::IntoResponse;

/// Collects middlewares in registration order and closes the chain with a terminal handler.
#[derive(Default)]
pub struct PipelineBuilder {
    middlewares: Vec<BoxMiddleware>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware,
    {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn handler<H>(self, handler: H) -> Pipeline
    where
        H: IntoHandler,
    {
        Pipeline {
            inner: Arc::new(PipelineInner {
                middlewares: self.middlewares,
                handler: handler.into_handler(),
            }),
        }
    }
}

/// A middleware chain bound to a handler, callable as a `tower_service::Service`.
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    middlewares: Vec<BoxMiddleware>,
    handler: BoxHandler,
}

impl PipelineInner {
    async fn dispatch(&self, request: Request) -> Result<Response, CoreError> {
        let ctx = RequestContext::new(request);
        Next::new(&self.middlewares, self.handler.as_ref())
            .run(ctx)
            .await
    }
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn middleware_count(&self) -> usize {
        self.inner.middlewares.len()
    }

    /// Dispatch a request, rendering any error as its JSON error response.
    pub async fn oneshot(&self, request: Request) -> Response {
        let mut service = self.clone();
        match service.call(request).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }
}

impl Service<Request> for Pipeline {
    type Response = Response;
    type Error = CoreError;
    type Future = HandlerFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move { inner.dispatch(request).await })
    }
}
