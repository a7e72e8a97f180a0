use async_trait::async_trait;
use ctxdb_core::http::Response;
use ctxdb_core::{CoreError, Middleware, Next, RequestContext};
use validator::Validate;

use crate::client::{ClientHandle, ClientSource, DatabaseClient};
use crate::error::PluginError;
use crate::options::{BindingSettings, PluginOptions};

/// Binds a database client into every request's context.
///
/// For each request the middleware stores a [`ClientHandle`] under the configured key, runs the
/// rest of the chain, and, when the binding is scoped, disconnects that client once the chain has
/// settled. Downstream errors are logged and returned unchanged.
pub struct DatabaseMiddleware<C> {
    source: ClientSource<C>,
    settings: BindingSettings,
}

impl<C: DatabaseClient> DatabaseMiddleware<C> {
    /// Validate `options` and build the middleware.
    ///
    /// Fails with [`PluginError::MissingClient`] when no client was supplied, with
    /// [`PluginError::EmptyKey`] for an empty key, and with [`PluginError::ScopedSharedClient`]
    /// when a scoped binding would disconnect a client shared across requests.
    pub fn new(options: PluginOptions<C>) -> Result<Self, PluginError> {
        let PluginOptions { client, settings } = options;
        let source = client.ok_or(PluginError::MissingClient)?;
        settings.validate()?;

        match (&source, settings.scoped) {
            (ClientSource::Shared(_), true) => {
                return Err(PluginError::ScopedSharedClient { key: settings.key });
            }
            (ClientSource::PerRequest(_), false) => {
                log::warn!(
                    "binding \"{}\" connects a client per request but is not scoped; \
                     those clients are never disconnected",
                    settings.key
                );
            }
            _ => {}
        }

        Ok(Self { source, settings })
    }

    /// Build from a client source plus settings loaded from configuration.
    pub fn from_settings(
        source: impl Into<ClientSource<C>>,
        settings: &BindingSettings,
    ) -> Result<Self, PluginError> {
        Self::new(PluginOptions {
            client: Some(source.into()),
            settings: settings.clone(),
        })
    }

    pub fn key(&self) -> &str {
        &self.settings.key
    }

    pub fn is_scoped(&self) -> bool {
        self.settings.scoped
    }

    async fn release(&self, client: &ClientHandle<C>) -> Result<(), PluginError> {
        match client.disconnect().await {
            Ok(()) => {
                log::debug!(
                    "disconnected {} client bound under \"{}\"",
                    client.name(),
                    self.settings.key
                );
                Ok(())
            }
            Err(err) => {
                log::warn!(
                    "failed to disconnect {} client bound under \"{}\": {}",
                    client.name(),
                    self.settings.key,
                    err
                );
                Err(err.into())
            }
        }
    }
}

#[async_trait(?Send)]
impl<C: DatabaseClient> Middleware for DatabaseMiddleware<C> {
    async fn handle(&self, mut ctx: RequestContext, next: Next<'_>) -> Result<Response, CoreError> {
        let key = self.settings.key.as_str();
        let client = self.source.acquire().await.map_err(PluginError::from)?;

        if ctx.set(key, client.clone()) {
            log::debug!("replaced earlier binding under \"{}\"", key);
        }
        log::debug!("bound {} client under \"{}\"", client.name(), key);

        let result = next.run(ctx).await;
        if let Err(err) = &result {
            log::error!("error in database middleware (key \"{}\"): {}", key, err);
        }

        let released = if self.settings.scoped {
            self.release(&client).await
        } else {
            Ok(())
        };

        match (result, released) {
            (Ok(response), Ok(())) => Ok(response),
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), _) => Err(err),
        }
    }
}

/// Build the database middleware from `options`.
pub fn database<C: DatabaseClient>(
    options: PluginOptions<C>,
) -> Result<DatabaseMiddleware<C>, PluginError> {
    DatabaseMiddleware::new(options)
}

/// Build the database middleware from a client and the remaining settings.
pub fn create_plugin<C: DatabaseClient>(
    client: impl Into<ClientSource<C>>,
    settings: BindingSettings,
) -> Result<DatabaseMiddleware<C>, PluginError> {
    DatabaseMiddleware::from_settings(client, &settings)
}
