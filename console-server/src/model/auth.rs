//! Authentication data: demo directory, user profiles and session tokens

use async_graphql::{SimpleObject, scalar};
use base64::prelude::*;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use catalog::Role;

/// How long a session token stays valid after it was issued
pub const SESSION_TTL_HOURS: i64 = 24;

const AVATAR_PLACEHOLDER: &str = "https://via.placeholder.com/40";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid token format")]
    InvalidTokenFormat,
    #[error("Invalid user id on a token")]
    InvalidUserId,
    #[error("Invalid issue timestamp on a token")]
    InvalidTimestamp,
}

/// Account known to the directory
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub id: u32,
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub avatar: String,
}

impl Credential {
    /// Helper to create an account with the placeholder avatar
    pub fn new(
        id: u32,
        username: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            name: name.into(),
            role,
            email: email.into(),
            avatar: AVATAR_PLACEHOLDER.to_owned(),
        }
    }
}

/// Read-only user directory
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    credentials: Vec<Credential>,
}

impl Directory {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    /// Directory with the three demo accounts
    pub fn demo() -> Self {
        Self::new(vec![
            Credential::new(
                1,
                "admin",
                "admin123",
                "Administrator",
                Role::Admin,
                "admin@example.com",
            ),
            Credential::new(
                2,
                "user",
                "user123",
                "Regular User",
                Role::User,
                "user@example.com",
            ),
            Credential::new(
                3,
                "moderator",
                "mod123",
                "Moderator",
                Role::Moderator,
                "mod@example.com",
            ),
        ])
    }

    /// Finds the account matching both username (ignoring case) and password (exactly)
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&Credential> {
        let username = username.to_lowercase();
        self.credentials
            .iter()
            .find(|c| c.username.to_lowercase() == username && c.password == password)
    }
}

/// Snapshot of the signed-in user, persisted with the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u32,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub avatar: String,
    /// When the session was opened
    pub login_time: DateTime<Utc>,
}

impl UserProfile {
    pub fn snapshot(credential: &Credential, login_time: DateTime<Utc>) -> Self {
        Self {
            id: credential.id,
            username: credential.username.clone(),
            name: credential.name.clone(),
            role: credential.role,
            email: credential.email.clone(),
            avatar: credential.avatar.clone(),
            login_time,
        }
    }
}

/// Data carried by a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: u32,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub nonce: String,
}

impl TokenClaims {
    /// Checks whether the token validity window has passed at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at > TimeDelta::hours(SESSION_TTL_HOURS)
    }
}

/// Session token
///
/// Token is a base64 of `{user_id}:{username}:{issued_at_millis}:{nonce}`. It is only an opaque
/// handle: anyone can decode and forge it, so it must never be trusted as a proof of identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

scalar!(AuthToken);

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl std::fmt::Display for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AuthToken {
    /// Issues a new token for the account with a random nonce
    pub fn issue(credential: &Credential, issued_at: DateTime<Utc>) -> Self {
        Self::encode(&TokenClaims {
            user_id: credential.id,
            username: credential.username.clone(),
            issued_at,
            nonce: Uuid::new_v4().simple().to_string(),
        })
    }

    pub fn encode(claims: &TokenClaims) -> Self {
        let TokenClaims {
            user_id,
            username,
            issued_at,
            nonce,
        } = claims;

        let data = format!(
            "{user_id}:{username}:{}:{nonce}",
            issued_at.timestamp_millis()
        );
        Self(BASE64_STANDARD.encode(data))
    }

    pub fn decode(&self) -> Result<TokenClaims, Error> {
        let data = BASE64_STANDARD
            .decode(&self.0)
            .map_err(|_| Error::InvalidTokenFormat)?;
        let data = String::from_utf8(data).map_err(|_| Error::InvalidTokenFormat)?;

        let parts: Vec<&str> = data.split(':').collect();
        let [user_id, username, issued_at, nonce, ..] = parts.as_slice() else {
            return Err(Error::InvalidTokenFormat);
        };

        let user_id = user_id.parse().map_err(|_| Error::InvalidUserId)?;
        let issued_at = issued_at
            .parse()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or(Error::InvalidTimestamp)?;

        Ok(TokenClaims {
            user_id,
            username: (*username).to_owned(),
            issued_at,
            nonce: (*nonce).to_owned(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod directory {
        use super::*;

        #[test]
        fn username_ignores_case() {
            let directory = Directory::demo();

            for username in ["admin", "Admin", "ADMIN"] {
                let credential = directory.authenticate(username, "admin123").unwrap();
                assert_eq!(credential.id, 1);
                assert_eq!(credential.role, Role::Admin);
            }
        }

        #[test]
        fn password_is_exact() {
            let directory = Directory::demo();

            assert_eq!(directory.authenticate("admin", "wrong"), None);
            assert_eq!(directory.authenticate("admin", "ADMIN123"), None);
            assert_eq!(directory.authenticate("admin", "admin123 "), None);
        }

        #[test]
        fn every_demo_account_signs_in() {
            let directory = Directory::demo();

            for (username, password, role) in [
                ("admin", "admin123", Role::Admin),
                ("user", "user123", Role::User),
                ("moderator", "mod123", Role::Moderator),
            ] {
                let credential = directory.authenticate(username, password).unwrap();
                assert_eq!(credential.role, role);
            }

            // Passwords are not interchangeable between accounts
            assert_eq!(directory.authenticate("user", "admin123"), None);
        }
    }

    mod token {
        use super::*;

        #[test]
        fn decodes_issued_token() {
            let directory = Directory::demo();
            let credential = directory.authenticate("moderator", "mod123").unwrap();
            let issued_at = DateTime::from_timestamp_millis(1_707_523_200_123).unwrap();

            let token = AuthToken::issue(credential, issued_at);
            let claims = token.decode().unwrap();

            assert_eq!(claims.user_id, 3);
            assert_eq!(claims.username, "moderator");
            assert_eq!(claims.issued_at, issued_at);
            assert!(!claims.nonce.is_empty());
        }

        #[test]
        fn encoding_layout() {
            let claims = TokenClaims {
                user_id: 2,
                username: "user".to_owned(),
                issued_at: DateTime::from_timestamp_millis(1000).unwrap(),
                nonce: "abc".to_owned(),
            };

            let token = AuthToken::encode(&claims);
            assert_eq!(token.as_str(), BASE64_STANDARD.encode("2:user:1000:abc"));
        }

        #[test]
        fn nonces_differ() {
            let directory = Directory::demo();
            let credential = directory.authenticate("admin", "admin123").unwrap();
            let now = Utc::now();

            assert_ne!(
                AuthToken::issue(credential, now),
                AuthToken::issue(credential, now)
            );
        }

        #[test]
        fn malformed_tokens() {
            let cases = [
                ("not base64!".to_owned(), Error::InvalidTokenFormat),
                (BASE64_STANDARD.encode("1:admin:1000"), Error::InvalidTokenFormat),
                (BASE64_STANDARD.encode("x:admin:1000:n"), Error::InvalidUserId),
                (BASE64_STANDARD.encode("1:admin:soon:n"), Error::InvalidTimestamp),
                (BASE64_STANDARD.encode([0xff, 0xfe]), Error::InvalidTokenFormat),
            ];

            for (token, err) in cases {
                assert_eq!(AuthToken::from(token).decode().unwrap_err(), err);
            }
        }

        #[test]
        fn expiry_window() {
            let issued_at = Utc::now();
            let claims = TokenClaims {
                user_id: 1,
                username: "admin".to_owned(),
                issued_at,
                nonce: "n".to_owned(),
            };

            assert!(!claims.is_expired_at(issued_at));
            assert!(!claims.is_expired_at(issued_at + TimeDelta::hours(SESSION_TTL_HOURS)));
            assert!(claims.is_expired_at(issued_at + TimeDelta::hours(25)));
        }
    }

    #[test]
    fn profile_layout() {
        let directory = Directory::demo();
        let credential = directory.authenticate("admin", "admin123").unwrap();
        let login_time = DateTime::from_timestamp_millis(0).unwrap();

        let profile = UserProfile::snapshot(credential, login_time);
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "username": "admin",
                "name": "Administrator",
                "role": "admin",
                "email": "admin@example.com",
                "avatar": "https://via.placeholder.com/40",
                "loginTime": "1970-01-01T00:00:00Z",
            })
        );
    }
}
