//! Handlers for the `/users` resource.
//!
//! ```text
//! GET  /users/ping
//! POST /users {"username":"test user","email":"testuser@mail.com"}
//! GET  /users/{id}
//! GET  /users
//! ```

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::error::ApiError;
use crate::api::response::Envelope;
use crate::api::server::AppState;
use crate::db::models::{NewUser, NewUserError, User};

/// Body of `POST /users`. Both keys are optional here so that a missing key
/// is reported by validation rather than by the deserializer.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = NewUserError;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        let username = value.username.ok_or(NewUserError::MissingUsername)?;
        let email = value.email.ok_or(NewUserError::MissingEmail)?;
        NewUser::try_new(username, email)
    }
}

/// `data` of `GET /users/{id}`.
#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub active: bool,
}

impl From<User> for UserDetail {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            active: user.active,
        }
    }
}

/// One entry of `GET /users`; the flag is named `is_active` in listings.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<UserSummary>,
}

pub async fn ping() -> Json<Envelope<()>> {
    Json(Envelope::message("pong"))
}

pub async fn add_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<()>>), ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!(%rejection, "unreadable create-user body");
        ApiError::InvalidPayload
    })?;
    // serde would also accept a positional array for the struct.
    if !body.is_object() {
        return Err(ApiError::InvalidPayload);
    }
    let request: CreateUserRequest = serde_json::from_value(body).map_err(|err| {
        debug!(error = %err, "create-user body has the wrong shape");
        ApiError::InvalidPayload
    })?;
    let new_user = NewUser::try_from(request).map_err(|err| {
        debug!(error = %err, "create-user body failed validation");
        ApiError::InvalidPayload
    })?;

    if state.store.find_by_email(&new_user.email).await?.is_some() {
        return Err(ApiError::EmailInUse);
    }

    let user = state.store.insert(&new_user).await?;
    info!(user_id = user.id, email = %user.email, "user added");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::message(format!("{} was added", user.email))),
    ))
}

pub async fn get_single_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Envelope<UserDetail>>, ApiError> {
    let id: i64 = user_id.parse().map_err(|_| ApiError::UserNotFound)?;
    let user = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(Envelope::data(UserDetail::from(user))))
}

pub async fn get_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<UserList>>, ApiError> {
    let users = state.store.list_all().await?;

    Ok(Json(Envelope::data(UserList {
        users: users.into_iter().map(UserSummary::from).collect(),
    })))
}
