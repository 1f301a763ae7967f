use serde::Serialize;
use thiserror::Error;

pub const USERNAME_MAX_LEN: usize = 128;
pub const EMAIL_MAX_LEN: usize = 120;

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub active: bool,
}

/// Reasons a candidate user is refused before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewUserError {
    #[error("username is required")]
    MissingUsername,
    #[error("email is required")]
    MissingEmail,
    #[error("username exceeds {} characters", USERNAME_MAX_LEN)]
    UsernameTooLong,
    #[error("email exceeds {} characters", EMAIL_MAX_LEN)]
    EmailTooLong,
}

/// A validated user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn try_new(
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, NewUserError> {
        let username = username.into();
        let email = email.into();

        if username.trim().is_empty() {
            return Err(NewUserError::MissingUsername);
        }
        if email.trim().is_empty() {
            return Err(NewUserError::MissingEmail);
        }
        if username.chars().count() > USERNAME_MAX_LEN {
            return Err(NewUserError::UsernameTooLong);
        }
        if email.chars().count() > EMAIL_MAX_LEN {
            return Err(NewUserError::EmailTooLong);
        }

        Ok(Self { username, email })
    }
}

/// Records inserted by the `seed-db` command.
pub fn fixture_users() -> Vec<NewUser> {
    vec![
        NewUser {
            username: "testuser".to_string(),
            email: "testuser@gmail.com".to_string(),
        },
        NewUser {
            username: "testuser2".to_string(),
            email: "testuser2@gmail.com".to_string(),
        },
    ]
}
