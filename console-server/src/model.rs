//! Service global model

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_graphql::{EmptySubscription, ErrorExtensions};
use color_eyre::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;

pub mod auth;
pub mod notification;
pub mod router;
pub mod session;
pub mod storage;
pub mod validation;
pub mod workspace;

use crate::config;
use crate::model::auth::{Directory, UserProfile};
use crate::model::session::SessionGate;
use crate::model::storage::{ConsoleId, LocalStorage};
use crate::model::workspace::Workspace;
use crate::mutation::Mutation;
use crate::query::Query;
use crate::service::Schema;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Invalid SQLite path: {path}")]
    InvalidSQLitePath { path: PathBuf },
}

/// Context for GraphQL schema
#[derive(Clone)]
pub struct Model {
    /// Database access
    db: sqlx::SqlitePool,
    /// Accounts allowed to sign in
    directory: Arc<Directory>,
    /// Dashboard state per console
    workspaces: Arc<RwLock<HashMap<ConsoleId, Workspace>>>,
    /// Console behaviour settings
    console: config::Console,
}

impl Model {
    /// Context for testing purposes - using the in-memory SQLite database and no login latency
    pub async fn test() -> Result<Self> {
        let opts = SqliteConnectOptions::new()
            .filename(":memory:")
            .create_if_missing(true)
            .shared_cache(true);

        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_lazy_with(opts);

        sqlx::migrate!("model/migrations").run(&db).await?;

        let console = config::Console {
            login_delay_ms: 0,
            ..Default::default()
        };
        Ok(Self::new(db, Directory::demo(), console))
    }

    /// Context from configuration
    ///
    /// If the database is created in-memory, the migrations are being executed automatically. If database is
    /// file based migrations would be executed only if requested by configuration.
    pub async fn with_config(db: config::Database, console: config::Console) -> Result<Self> {
        use config::Database::*;

        let db = match db {
            Memory { max_connections } => {
                let opts = SqliteConnectOptions::new()
                    .filename(":memory:")
                    .create_if_missing(true)
                    .shared_cache(true);

                let pool = SqlitePoolOptions::new()
                    .max_connections(max_connections)
                    .connect_lazy_with(opts);

                sqlx::migrate!("model/migrations").run(&pool).await?;
                pool
            }

            SqLite {
                path,
                max_connections,
                migrate,
            } => {
                let path = path
                    .as_path()
                    .to_str()
                    .ok_or_else(|| Error::InvalidSQLitePath { path: path.clone() })?;

                let opts = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);

                let pool = SqlitePoolOptions::new()
                    .max_connections(max_connections)
                    .connect_lazy_with(opts);

                if migrate {
                    sqlx::migrate!("model/migrations").run(&pool).await?;
                }

                pool
            }
        };

        Ok(Self::new(db, Directory::demo(), console))
    }

    fn new(db: sqlx::SqlitePool, directory: Directory, console: config::Console) -> Self {
        Self {
            db,
            directory: Arc::new(directory),
            workspaces: Arc::default(),
            console,
        }
    }

    /// Buids schema with attached context
    pub fn schema(&self) -> Schema {
        Schema::build(Query::new(), Mutation::new(), EmptySubscription)
            .data(self.clone())
            .finish()
    }

    /// Accesses the DB pool
    pub fn db(&self) -> &sqlx::SqlitePool {
        &self.db
    }

    /// Session gate for the console
    pub fn gate(&self, console: ConsoleId) -> SessionGate<'_> {
        SessionGate::new(
            self.db(),
            &self.directory,
            LocalStorage::new(console),
            self.console.login_delay(),
        )
    }

    /// Delay before following redirects which come with a notification
    pub fn redirect_delay_ms(&self) -> u64 {
        self.console.redirect_delay_ms
    }

    /// Runs `f` on the console workspace, creating a fresh one if needed
    pub async fn with_workspace<T>(
        &self,
        console: ConsoleId,
        f: impl FnOnce(&mut Workspace) -> T,
    ) -> T {
        let mut workspaces = self.workspaces.write().await;
        f(workspaces.entry(console).or_default())
    }

    /// Replaces the console workspace with a fresh one, as on a page load
    pub async fn reset_workspace(&self, console: ConsoleId) -> Workspace {
        let workspace = Workspace::default();
        self.workspaces
            .write()
            .await
            .insert(console, workspace.clone());
        workspace
    }

    /// Drops the console workspace
    pub async fn close_workspace(&self, console: ConsoleId) {
        self.workspaces.write().await.remove(&console);
    }
}

/// Extracts the console attached to the request
pub fn console(ctx: &async_graphql::Context<'_>) -> async_graphql::Result<ConsoleId> {
    ctx.data_opt::<ConsoleId>()
        .copied()
        .ok_or_else(|| "Missing console id".into())
}

/// Runs the session gate for the request console
///
/// Failures are reported as `Unauthorized` errors, with the reason and the login redirect in the
/// error extensions.
pub async fn authorize(
    ctx: &async_graphql::Context<'_>,
) -> async_graphql::Result<(ConsoleId, UserProfile)> {
    let console = console(ctx)?;
    let model: &Model = ctx.data()?;

    match model.gate(console).check_session().await {
        Ok(profile) => Ok((console, profile)),
        Err(err) => {
            warn!(%console, %err, "Unauthorized access");
            if matches!(err, session::SessionError::Expired | session::SessionError::Malformed) {
                model.close_workspace(console).await;
            }

            let redirect = err.redirect();
            Err(async_graphql::Error::new("Unauthorized").extend_with(|_, e| {
                e.set("reason", err.reason());
                e.set("message", err.notification().message);
                if let Some(redirect) = redirect {
                    e.set("redirect", redirect.target.as_str());
                }
            }))
        }
    }
}
