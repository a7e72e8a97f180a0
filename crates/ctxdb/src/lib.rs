//! Request-scoped database client binding for `ctxdb-core` pipelines.
//!
//! [`DatabaseMiddleware`] stores a client in each request's context under a string key
//! (`"prisma"` unless configured otherwise); handlers read it back with [`get_client`], the
//! [`ClientContextExt`] methods, or the [`Db`] extractor.
//!
//! ```rust,ignore
//! let pipeline = Pipeline::builder()
//!     .middleware(ctxdb::database(PluginOptions::new().client(app_db))?)
//!     .handler(|ctx: RequestContext| async move {
//!         let db = ctx.database::<AppDb>()?;
//!         Ok::<_, CoreError>(db.user_names().join(","))
//!     });
//! ```

pub mod accessor;
pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod options;

pub use accessor::{get_client, ClientContextExt, Db};
pub use client::{
    connect_fn, ClientError, ClientFactory, ClientHandle, ClientSource, DatabaseClient,
};
pub use config::{ConfigError, Settings, SettingsLoader};
pub use error::PluginError;
pub use middleware::{create_plugin, database, DatabaseMiddleware};
pub use options::{BindingSettings, PluginOptions, DEFAULT_CONTEXT_KEY};
