//! Per-console key-value storage
//!
//! Every console (a single client, like a browser profile) owns a flat string-to-string store.
//! The store has no schema: readers must treat any missing key as absent data, never as an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;
use thiserror::Error;
use uuid::Uuid;

/// Session token key
pub const AUTH_TOKEN: &str = "authToken";
/// Serialized user profile key
pub const USER_DATA: &str = "userData";
/// Remember flag key, holds `"true"` when set
pub const REMEMBER_ME: &str = "rememberMe";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid console id format")]
    InvalidConsoleId,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("Cannot encode stored value: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Newtype for console id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct ConsoleId(Uuid);

impl ConsoleId {
    /// Generates a fresh random console id
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConsoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ConsoleId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Uuid::parse_str(s).map_err(|_| Error::InvalidConsoleId)?;
        Ok(Self(id))
    }
}

/// Storage accessor scoped to a single console
#[derive(Debug, Clone, Copy)]
pub struct LocalStorage {
    console: ConsoleId,
}

impl LocalStorage {
    pub fn new(console: ConsoleId) -> Self {
        Self { console }
    }

    pub fn console(&self) -> ConsoleId {
        self.console
    }

    /// Reads a single value
    pub async fn get(
        &self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
        key: &str,
    ) -> Result<Option<String>, Error> {
        let row: Option<(String,)> =
            sqlx::query_as("select value from local_storage where console_id = ? and key = ?")
                .bind(self.console)
                .bind(key)
                .fetch_optional(db)
                .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Stores a value, replacing the previous one
    pub async fn set(
        &self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
        key: &str,
        value: &str,
    ) -> Result<(), Error> {
        sqlx::query(
            "insert into local_storage (console_id, key, value) values (?, ?, ?)
                on conflict(console_id, key) do update set value = excluded.value",
        )
        .bind(self.console)
        .bind(key)
        .bind(value)
        .execute(db)
        .await?;

        Ok(())
    }

    /// Reads every value of the console in a single statement
    pub async fn entries(
        &self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    ) -> Result<HashMap<String, String>, Error> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("select key, value from local_storage where console_id = ?")
                .bind(self.console)
                .fetch_all(db)
                .await?;

        Ok(rows.into_iter().collect())
    }

    /// Removes `keys`, but only while `guard` still holds `expected`
    ///
    /// Runs as a single statement. Returns whether anything was removed.
    pub async fn remove_if(
        &self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
        keys: &[&str],
        guard: &str,
        expected: &str,
    ) -> Result<bool, Error> {
        let placeholders = vec!["?"; keys.len()].join(", ");
        let sql = format!(
            "delete from local_storage where console_id = ? and key in ({placeholders})
                and exists (
                    select 1 from local_storage where console_id = ? and key = ? and value = ?
                )"
        );

        let query = keys
            .iter()
            .fold(sqlx::query(&sql).bind(self.console), |query, key| {
                query.bind(*key)
            })
            .bind(self.console)
            .bind(guard)
            .bind(expected);

        let result = query.execute(db).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Removes a value, missing keys are not an error
    pub async fn remove(
        &self,
        db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
        key: &str,
    ) -> Result<(), Error> {
        sqlx::query("delete from local_storage where console_id = ? and key = ?")
            .bind(self.console)
            .bind(key)
            .execute(db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqlitePoolOptions;

    pub(crate) async fn setup_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("model/migrations").run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let pool = setup_pool().await;
        let storage = LocalStorage::new(ConsoleId::random());

        assert_eq!(storage.get(&pool, AUTH_TOKEN).await.unwrap(), None);
        // Removing missing key is fine
        storage.remove(&pool, AUTH_TOKEN).await.unwrap();
    }

    #[tokio::test]
    async fn set_replaces_value() {
        let pool = setup_pool().await;
        let storage = LocalStorage::new(ConsoleId::random());

        storage.set(&pool, REMEMBER_ME, "true").await.unwrap();
        storage.set(&pool, REMEMBER_ME, "false").await.unwrap();
        assert_eq!(
            storage.get(&pool, REMEMBER_ME).await.unwrap().as_deref(),
            Some("false")
        );

        storage.remove(&pool, REMEMBER_ME).await.unwrap();
        assert_eq!(storage.get(&pool, REMEMBER_ME).await.unwrap(), None);
    }

    #[tokio::test]
    async fn consoles_are_isolated() {
        let pool = setup_pool().await;
        let first = LocalStorage::new(ConsoleId::random());
        let second = LocalStorage::new(ConsoleId::random());

        first.set(&pool, AUTH_TOKEN, "first").await.unwrap();
        second.set(&pool, AUTH_TOKEN, "second").await.unwrap();
        first.remove(&pool, AUTH_TOKEN).await.unwrap();

        assert_eq!(first.get(&pool, AUTH_TOKEN).await.unwrap(), None);
        assert_eq!(
            second.get(&pool, AUTH_TOKEN).await.unwrap().as_deref(),
            Some("second")
        );
    }

    #[tokio::test]
    async fn entries_of_console() {
        let pool = setup_pool().await;
        let storage = LocalStorage::new(ConsoleId::random());
        let other = LocalStorage::new(ConsoleId::random());

        storage.set(&pool, AUTH_TOKEN, "token").await.unwrap();
        storage.set(&pool, USER_DATA, "{}").await.unwrap();
        other.set(&pool, REMEMBER_ME, "true").await.unwrap();

        let entries = storage.entries(&pool).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get(AUTH_TOKEN).map(String::as_str), Some("token"));
        assert_eq!(entries.get(USER_DATA).map(String::as_str), Some("{}"));
    }

    #[tokio::test]
    async fn guarded_remove() {
        let pool = setup_pool().await;
        let storage = LocalStorage::new(ConsoleId::random());

        storage.set(&pool, AUTH_TOKEN, "new").await.unwrap();
        storage.set(&pool, USER_DATA, "{}").await.unwrap();

        // Guard doesn't hold, nothing goes
        let keys = [AUTH_TOKEN, USER_DATA, REMEMBER_ME];
        assert!(!storage.remove_if(&pool, &keys, AUTH_TOKEN, "old").await.unwrap());
        assert_eq!(storage.entries(&pool).await.unwrap().len(), 2);

        // Guard key itself is removed as well
        assert!(storage.remove_if(&pool, &keys, AUTH_TOKEN, "new").await.unwrap());
        assert!(storage.entries(&pool).await.unwrap().is_empty());
    }

    #[test]
    fn parsing_console_id() {
        let id = ConsoleId::random();
        assert_eq!(id.to_string().parse::<ConsoleId>().unwrap(), id);
        assert!(matches!(
            "not-a-console".parse::<ConsoleId>(),
            Err(Error::InvalidConsoleId)
        ));
    }
}
