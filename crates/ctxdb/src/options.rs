use serde::Deserialize;
use validator::Validate;

use crate::client::{ClientFactory, ClientHandle, ClientSource, DatabaseClient};

/// Context key used when a binding does not name one.
pub const DEFAULT_CONTEXT_KEY: &str = "prisma";

fn default_key() -> String {
    DEFAULT_CONTEXT_KEY.to_string()
}

/// Client-independent part of a binding: where it lives in the context and whether the client is
/// disconnected when the request finishes.
///
/// ```toml
/// [database]
/// key = "prisma"   # default
/// scoped = false   # default
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Validate)]
pub struct BindingSettings {
    #[serde(default = "default_key")]
    #[validate(length(min = 1))]
    pub key: String,
    #[serde(default)]
    pub scoped: bool,
}

impl Default for BindingSettings {
    fn default() -> Self {
        Self {
            key: default_key(),
            scoped: false,
        }
    }
}

impl BindingSettings {
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_scoped(mut self, scoped: bool) -> Self {
        self.scoped = scoped;
        self
    }
}

/// Everything the database middleware is built from.
///
/// `client` starts empty; building a middleware without one fails with
/// [`crate::PluginError::MissingClient`].
pub struct PluginOptions<C> {
    pub client: Option<ClientSource<C>>,
    pub settings: BindingSettings,
}

impl<C> Default for PluginOptions<C> {
    fn default() -> Self {
        Self {
            client: None,
            settings: BindingSettings::default(),
        }
    }
}

impl<C: DatabaseClient> PluginOptions<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings applied when a binding names nothing: the `"prisma"` key, unscoped.
    pub fn default_settings() -> BindingSettings {
        BindingSettings::default()
    }

    /// Bind one shared client for every request.
    pub fn client(mut self, client: impl Into<ClientHandle<C>>) -> Self {
        self.client = Some(ClientSource::Shared(client.into()));
        self
    }

    /// Connect a fresh client for every request.
    pub fn per_request<F>(mut self, factory: F) -> Self
    where
        F: ClientFactory<C>,
    {
        self.client = Some(ClientSource::per_request(factory));
        self
    }

    pub fn source(mut self, source: ClientSource<C>) -> Self {
        self.client = Some(source);
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.settings.key = key.into();
        self
    }

    pub fn scoped(mut self, scoped: bool) -> Self {
        self.settings.scoped = scoped;
        self
    }

    pub fn settings(mut self, settings: BindingSettings) -> Self {
        self.settings = settings;
        self
    }
}
