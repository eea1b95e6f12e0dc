use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::router::Valid;
use crate::user::{Profile, User, UserRepository};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(custom(
        function = "crate::router::validate_not_blank",
        message = "Name cannot be empty."
    ))]
    pub name: String,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty."))]
    pub password: String,
    #[validate(length(max = 160, message = "Bio must be at most 160 characters."))]
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
    pub user: Profile,
}

/// Handler to create a user. The stored email is case-normalized so
/// uniqueness is case-insensitive.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Response>)> {
    let email = body.email.trim().to_lowercase();
    let users = UserRepository::new(state.db.sqlite.clone());

    if users.find_by_email(&email).await?.is_some() {
        return Err(ServerError::Conflict("Email is already registered"));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: body.name.trim().to_owned(),
        email,
        password: state.crypto.hash_password(&body.password)?,
        bio: body.bio.unwrap_or_default(),
        created_at: Utc::now(),
    };
    users.insert(&user).await?;

    Ok((
        StatusCode::CREATED,
        Json(Response {
            message: "User registered successfully".to_owned(),
            user: user.into(),
        }),
    ))
}
