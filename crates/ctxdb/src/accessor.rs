use std::any::type_name;
use std::fmt;
use std::ops::Deref;

use async_trait::async_trait;
use ctxdb_core::{CoreError, FromRequest, RequestContext};

use crate::client::{ClientHandle, DatabaseClient};
use crate::error::PluginError;
use crate::options::DEFAULT_CONTEXT_KEY;

/// Read the client bound under `key` (default `"prisma"`) for the current request.
///
/// Fails with [`PluginError::ClientNotFound`] when nothing is bound under the key, and with
/// [`PluginError::ClientTypeMismatch`] when the key holds something other than a
/// `ClientHandle<C>`.
pub fn get_client<C: DatabaseClient>(
    ctx: &RequestContext,
    key: Option<&str>,
) -> Result<ClientHandle<C>, PluginError> {
    let key = key.unwrap_or(DEFAULT_CONTEXT_KEY);
    let value = ctx
        .vars()
        .get_raw(key)
        .ok_or_else(|| PluginError::ClientNotFound {
            key: key.to_string(),
        })?;

    value
        .downcast_ref::<ClientHandle<C>>()
        .cloned()
        .ok_or_else(|| PluginError::ClientTypeMismatch {
            key: key.to_string(),
            expected: type_name::<C>(),
        })
}

/// Client lookups directly on the request context.
pub trait ClientContextExt {
    /// The client bound under the default key.
    fn database<C: DatabaseClient>(&self) -> Result<ClientHandle<C>, PluginError>;

    fn database_at<C: DatabaseClient>(&self, key: &str) -> Result<ClientHandle<C>, PluginError>;
}

impl ClientContextExt for RequestContext {
    fn database<C: DatabaseClient>(&self) -> Result<ClientHandle<C>, PluginError> {
        get_client(self, None)
    }

    fn database_at<C: DatabaseClient>(&self, key: &str) -> Result<ClientHandle<C>, PluginError> {
        get_client(self, Some(key))
    }
}

/// Extracts the client bound under the default key.
///
/// # Example
/// ```ignore
/// async fn list_users(ctx: RequestContext) -> Result<String, CoreError> {
///     let Db(db) = Db::<AppDb>::from_request(&ctx).await?;
///     Ok(db.user_names().join(","))
/// }
/// ```
pub struct Db<C>(pub ClientHandle<C>);

impl<C> fmt::Debug for Db<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Db").field(&self.0).finish()
    }
}

#[async_trait(?Send)]
impl<C: DatabaseClient> FromRequest for Db<C> {
    async fn from_request(ctx: &RequestContext) -> Result<Self, CoreError> {
        get_client(ctx, None).map(Db).map_err(CoreError::from)
    }
}

impl<C> Deref for Db<C> {
    type Target = ClientHandle<C>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<C> Db<C> {
    #[must_use]
    pub fn into_inner(self) -> ClientHandle<C> {
        self.0
    }
}
