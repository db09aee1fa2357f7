//! Login form validation

use async_graphql::{Enum, SimpleObject};
use thiserror::Error;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Login form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum Field {
    Username,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum Violation {
    Missing,
    TooShort,
}

/// Single field problem, to be displayed next to the field
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct FieldError {
    pub field: Field,
    pub violation: Violation,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, violation: Violation) -> Self {
        let message = match (field, violation) {
            (Field::Username, Violation::Missing) => "Please enter your username".to_owned(),
            (Field::Username, Violation::TooShort) => {
                format!("Username must be at least {MIN_USERNAME_LEN} characters")
            }
            (Field::Password, Violation::Missing) => "Please enter your password".to_owned(),
            (Field::Password, Violation::TooShort) => {
                format!("Password must be at least {MIN_PASSWORD_LEN} characters")
            }
        };

        Self {
            field,
            violation,
            message,
        }
    }
}

/// All problems found in the login form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid login form")]
pub struct ValidationErrors(pub Vec<FieldError>);

fn check(field: Field, value: &str, min_len: usize) -> Option<FieldError> {
    if value.is_empty() {
        Some(FieldError::new(field, Violation::Missing))
    } else if value.chars().count() < min_len {
        Some(FieldError::new(field, Violation::TooShort))
    } else {
        None
    }
}

/// Validates already trimmed login form input, reporting every violation at once
pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationErrors> {
    let errors: Vec<_> = [
        check(Field::Username, username, MIN_USERNAME_LEN),
        check(Field::Password, password, MIN_PASSWORD_LEN),
    ]
    .into_iter()
    .flatten()
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
