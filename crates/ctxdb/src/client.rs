//! Database client abstraction bound into the request context.
//!
//! ```text
//!  Handler code          ClientHandle<C>  (Deref<Target = C>)
//!      │                       │
//!      └── Db<C> extractor ───►│  cloned out of ContextVars
//!                              │
//!                           Arc<C: DatabaseClient>
//!                              │
//!                    externally constructed client
//! ```
//!
//! The plugin never constructs a client on its own. It either borrows one shared instance for
//! every request, or asks a [`ClientFactory`] for a fresh one per request when the binding is
//! scoped.

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

/// Errors raised by a database client while connecting or disconnecting.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The client was already disconnected.
    #[error("database client already disconnected")]
    Disconnected,

    /// Connecting a new client failed.
    #[error("database connection failed: {0}")]
    Connect(String),

    /// Any other client failure.
    #[error("database client error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// The capability the plugin needs from a database client.
///
/// Query execution, pooling and transactions stay with the implementation; the plugin only ever
/// calls [`DatabaseClient::disconnect`], and only for scoped bindings.
#[async_trait(?Send)]
pub trait DatabaseClient: Send + Sync + 'static {
    /// Release the client's connections. Called once per request for scoped bindings.
    async fn disconnect(&self) -> Result<(), ClientError>;

    /// Short label used in diagnostics.
    fn name(&self) -> &str {
        "database"
    }
}

/// A cloneable reference to an externally owned database client.
pub struct ClientHandle<C> {
    client: Arc<C>,
}

impl<C: DatabaseClient> ClientHandle<C> {
    pub fn new(client: C) -> Self {
        Self::from_arc(Arc::new(client))
    }

    pub fn from_arc(client: Arc<C>) -> Self {
        Self { client }
    }

    /// `true` when both handles point at the same client instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.client, &other.client)
    }

    pub fn as_arc(&self) -> &Arc<C> {
        &self.client
    }

    pub fn name(&self) -> &str {
        self.client.name()
    }

    pub async fn disconnect(&self) -> Result<(), ClientError> {
        self.client.disconnect().await
    }
}

impl<C> Clone for ClientHandle<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C> std::ops::Deref for ClientHandle<C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl<C> fmt::Debug for ClientHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("client", &type_name::<C>())
            .finish_non_exhaustive()
    }
}

impl<C: DatabaseClient> From<C> for ClientHandle<C> {
    fn from(client: C) -> Self {
        Self::new(client)
    }
}

/// Builds a fresh client for a single request.
#[async_trait(?Send)]
pub trait ClientFactory<C>: Send + Sync + 'static {
    async fn connect(&self) -> Result<C, ClientError>;
}

pub struct FnClientFactory<F> {
    f: F,
}

#[async_trait(?Send)]
impl<C, F, Fut> ClientFactory<C> for FnClientFactory<F>
where
    C: DatabaseClient,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<C, ClientError>>,
{
    async fn connect(&self) -> Result<C, ClientError> {
        (self.f)().await
    }
}

/// Wrap an async closure as a [`ClientFactory`].
pub fn connect_fn<C, F, Fut>(f: F) -> FnClientFactory<F>
where
    C: DatabaseClient,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<C, ClientError>>,
{
    FnClientFactory { f }
}

/// Where the middleware gets the client it binds for a request.
pub enum ClientSource<C> {
    /// One client borrowed by every request.
    Shared(ClientHandle<C>),
    /// A new client per request, produced by the factory.
    PerRequest(Arc<dyn ClientFactory<C>>),
}

impl<C: DatabaseClient> ClientSource<C> {
    pub fn shared(client: impl Into<ClientHandle<C>>) -> Self {
        Self::Shared(client.into())
    }

    pub fn per_request<F>(factory: F) -> Self
    where
        F: ClientFactory<C>,
    {
        Self::PerRequest(Arc::new(factory))
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared(_))
    }

    pub(crate) async fn acquire(&self) -> Result<ClientHandle<C>, ClientError> {
        match self {
            Self::Shared(handle) => Ok(handle.clone()),
            Self::PerRequest(factory) => factory.connect().await.map(ClientHandle::new),
        }
    }
}

impl<C> Clone for ClientSource<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Shared(handle) => Self::Shared(handle.clone()),
            Self::PerRequest(factory) => Self::PerRequest(Arc::clone(factory)),
        }
    }
}

impl<C> fmt::Debug for ClientSource<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared(handle) => f.debug_tuple("Shared").field(handle).finish(),
            Self::PerRequest(_) => f.debug_tuple("PerRequest").finish(),
        }
    }
}

impl<C: DatabaseClient> From<ClientHandle<C>> for ClientSource<C> {
    fn from(handle: ClientHandle<C>) -> Self {
        Self::Shared(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingClient {
        disconnects: AtomicUsize,
    }

    #[async_trait(?Send)]
    impl DatabaseClient for CountingClient {
        async fn disconnect(&self) -> Result<(), ClientError> {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn clones_share_the_client() {
        let handle = ClientHandle::new(CountingClient::default());
        let other = handle.clone();
        assert!(handle.ptr_eq(&other));

        block_on(other.disconnect()).expect("disconnect");
        assert_eq!(handle.disconnects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn distinct_clients_are_not_ptr_eq() {
        let a = ClientHandle::new(CountingClient::default());
        let b = ClientHandle::new(CountingClient::default());
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn default_name_and_debug_hide_the_client() {
        let handle = ClientHandle::new(CountingClient::default());
        assert_eq!(handle.name(), "database");
        let debug = format!("{:?}", handle);
        assert!(debug.starts_with("ClientHandle"));
        assert!(debug.contains("CountingClient"));
    }

    #[test]
    fn shared_source_hands_out_the_same_client() {
        let handle = ClientHandle::new(CountingClient::default());
        let source = ClientSource::Shared(handle.clone());
        assert!(source.is_shared());

        let acquired = block_on(source.acquire()).expect("acquire");
        assert!(acquired.ptr_eq(&handle));
    }

    #[test]
    fn per_request_source_connects_each_time() {
        let connects = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&connects);
        let source = ClientSource::per_request(connect_fn(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(CountingClient::default())
            }
        }));
        assert!(!source.is_shared());

        let first = block_on(source.acquire()).expect("first");
        let second = block_on(source.acquire()).expect("second");
        assert!(!first.ptr_eq(&second));
        assert_eq!(connects.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn factory_errors_propagate() {
        let source: ClientSource<CountingClient> =
            ClientSource::per_request(connect_fn(|| async {
                Err(ClientError::Connect("refused".into()))
            }));
        let err = block_on(source.acquire()).expect_err("connect error");
        assert_eq!(err.to_string(), "database connection failed: refused");
    }
}
