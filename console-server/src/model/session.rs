//! Session gate
//!
//! The gate owns the console session record: it issues the record on successful login, verifies
//! it on every protected page load and removes it on logout. The record is kept in the console
//! local storage under three independent keys:
//!
//! * [`AUTH_TOKEN`] - the [`AuthToken`],
//! * [`USER_DATA`] - JSON serialized [`UserProfile`],
//! * [`REMEMBER_ME`] - `"true"` if the user asked to be remembered.
//!
//! All three are always written in a single transaction, so overlapping logins on the same console
//! never leave a record mixing two accounts - the last login to complete wins.

use std::time::Duration;

use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::model::auth::{AuthToken, Credential, Directory, UserProfile};
use crate::model::notification::Notification;
use crate::model::storage::{self, AUTH_TOKEN, LocalStorage, REMEMBER_ME, USER_DATA};
use crate::model::validation::{ValidationErrors, validate_login};

/// Login failure
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// Deliberately doesn't tell which of the fields is wrong
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Cannot store the session: {0}")]
    Transport(#[from] storage::Error),
}

impl AuthError {
    pub fn notification(&self) -> Notification {
        match self {
            Self::Validation(_) => Notification::warning("Please correct the highlighted fields"),
            Self::InvalidCredentials => Notification::error("Invalid username or password!"),
            Self::Transport(_) => Notification::error("Something went wrong, please try again!"),
        }
    }
}

/// Session verification failure
///
/// Every variant is resolved the same way: the user has to sign in again.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No active session")]
    NoSession,
    #[error("Malformed session record")]
    Malformed,
    #[error("Session expired")]
    Expired,
    #[error("Cannot read the session: {0}")]
    Transport(#[from] storage::Error),
}

impl SessionError {
    /// Short machine readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoSession => "NO_SESSION",
            Self::Malformed => "MALFORMED",
            Self::Expired => "EXPIRED",
            Self::Transport(_) => "TRANSPORT",
        }
    }

    pub fn notification(&self) -> Notification {
        match self {
            Self::NoSession | Self::Malformed => Notification::info("Please sign in"),
            Self::Expired => Notification::warning("Your session has expired, please sign in again"),
            Self::Transport(_) => Notification::error("Something went wrong, please try again!"),
        }
    }

    /// Forced logout, sends the user straight back to the login page
    ///
    /// Storage failures don't tell anything about the session, so the user stays where they are.
    pub fn redirect(&self) -> Option<Redirect> {
        match self {
            Self::Transport(_) => None,
            _ => Some(Redirect::now(Destination::Login)),
        }
    }
}

/// Entry point the client should navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum Destination {
    /// Login page
    Login,
    /// Main dashboard page
    Main,
}

impl Destination {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Main => "MAIN",
        }
    }
}

/// Navigation request for the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, SimpleObject)]
pub struct Redirect {
    pub target: Destination,
    /// How long to keep displaying the current page before navigating
    pub delay_ms: u64,
}

impl Redirect {
    pub fn now(target: Destination) -> Self {
        Self {
            target,
            delay_ms: 0,
        }
    }

    pub fn after(target: Destination, delay_ms: u64) -> Self {
        Self { target, delay_ms }
    }
}

/// Console session record
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub token: AuthToken,
    pub profile: UserProfile,
    pub login_time: DateTime<Utc>,
    pub remember: bool,
}

impl SessionRecord {
    /// Creates a fresh record for the account
    pub fn issue(credential: &Credential, login_time: DateTime<Utc>, remember: bool) -> Self {
        Self {
            token: AuthToken::issue(credential, login_time),
            profile: UserProfile::snapshot(credential, login_time),
            login_time,
            remember,
        }
    }

    /// Persists the record, replacing the previous one
    pub async fn store(&self, db: &SqlitePool, storage: &LocalStorage) -> Result<(), storage::Error> {
        let profile = serde_json::to_string(&self.profile)?;

        let mut tx = db.begin().await?;
        storage.set(&mut *tx, AUTH_TOKEN, self.token.as_str()).await?;
        storage.set(&mut *tx, USER_DATA, &profile).await?;
        if self.remember {
            storage.set(&mut *tx, REMEMBER_ME, "true").await?;
        } else {
            storage.remove(&mut *tx, REMEMBER_ME).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    /// Removes the record judged by the `token`
    ///
    /// Record stored by a login completing after the judgement stays in place.
    pub async fn clear_stale(
        db: &SqlitePool,
        storage: &LocalStorage,
        token: &str,
    ) -> Result<(), storage::Error> {
        let removed = storage
            .remove_if(db, &[AUTH_TOKEN, USER_DATA, REMEMBER_ME], AUTH_TOKEN, token)
            .await?;
        if !removed {
            debug!("Session record replaced in the meantime, keeping it");
        }

        Ok(())
    }

    /// Removes any stored record, no matter how incomplete
    pub async fn clear(db: &SqlitePool, storage: &LocalStorage) -> Result<(), storage::Error> {
        let mut tx = db.begin().await?;
        for key in [AUTH_TOKEN, USER_DATA, REMEMBER_ME] {
            storage.remove(&mut *tx, key).await?;
        }
        tx.commit().await?;

        Ok(())
    }
}

/// Session gate bound to a single console
pub struct SessionGate<'a> {
    db: &'a SqlitePool,
    directory: &'a Directory,
    storage: LocalStorage,
    login_delay: Duration,
}

impl<'a> SessionGate<'a> {
    pub fn new(
        db: &'a SqlitePool,
        directory: &'a Directory,
        storage: LocalStorage,
        login_delay: Duration,
    ) -> Self {
        Self {
            db,
            directory,
            storage,
            login_delay,
        }
    }

    /// Signs the user in, replacing any session stored on the console
    ///
    /// Form is validated before the directory is consulted. The directory lookup is preceded by
    /// the simulated service latency, which can't be cancelled.
    #[instrument(skip(self, password), fields(console = %self.storage.console()))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<SessionRecord, AuthError> {
        let username = username.trim();
        let password = password.trim();
        validate_login(username, password)?;

        tokio::time::sleep(self.login_delay).await;

        let Some(credential) = self.directory.authenticate(username, password) else {
            info!("Invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };

        // Token carries milliseconds only, keep the profile in sync with it
        let login_time = Utc::now().trunc_subsecs(3);
        let record = SessionRecord::issue(credential, login_time, remember);
        record.store(self.db, &self.storage).await?;

        info!(user = credential.id, remember, "Signed in");
        Ok(record)
    }

    /// Verifies the stored session, returning the signed in user
    pub async fn check_session(&self) -> Result<UserProfile, SessionError> {
        self.check_session_at(Utc::now()).await
    }

    /// Verifies the stored session as of `now`
    ///
    /// Malformed and expired records are removed from the storage, unless a newer login replaced
    /// them in the meantime.
    #[instrument(skip(self), fields(console = %self.storage.console()))]
    pub async fn check_session_at(&self, now: DateTime<Utc>) -> Result<UserProfile, SessionError> {
        let mut entries = self.storage.entries(self.db).await?;
        let (Some(token), Some(user_data)) = (entries.remove(AUTH_TOKEN), entries.remove(USER_DATA))
        else {
            return Err(SessionError::NoSession);
        };

        let decoded = serde_json::from_str::<UserProfile>(&user_data)
            .ok()
            .zip(AuthToken::from(token.clone()).decode().ok());
        let Some((profile, claims)) = decoded else {
            warn!("Malformed session record, signing out");
            SessionRecord::clear_stale(self.db, &self.storage, &token).await?;
            return Err(SessionError::Malformed);
        };

        if claims.is_expired_at(now) {
            info!(user = claims.user_id, issued_at = %claims.issued_at, "Session expired, signing out");
            SessionRecord::clear_stale(self.db, &self.storage, &token).await?;
            return Err(SessionError::Expired);
        }

        Ok(profile)
    }

    /// Checks if the console holds any session record, regardless of its validity
    pub async fn has_session(&self) -> Result<bool, storage::Error> {
        let entries = self.storage.entries(self.db).await?;
        Ok(entries.contains_key(AUTH_TOKEN) && entries.contains_key(USER_DATA))
    }

    /// Removes the stored session, idempotent
    #[instrument(skip(self), fields(console = %self.storage.console()))]
    pub async fn logout(&self) -> Result<(), storage::Error> {
        SessionRecord::clear(self.db, &self.storage).await?;
        info!("Signed out");
        Ok(())
    }
}
