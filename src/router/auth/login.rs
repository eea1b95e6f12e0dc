use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::router::Valid;
use crate::user::{Profile, UserRepository};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(length(min = 1, message = "Email cannot be empty."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty."))]
    pub password: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
    pub token: String,
    pub user: Profile,
}

/// Handler to log a user in. Unknown emails and wrong passwords are
/// indistinguishable to the caller.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>> {
    let email = body.email.trim().to_lowercase();
    let users = UserRepository::new(state.db.sqlite.clone());

    let Some(user) = users.find_by_email(&email).await? else {
        return Err(ServerError::InvalidCredentials);
    };

    if !state.crypto.verify_password(&body.password, &user.password)? {
        return Err(ServerError::InvalidCredentials);
    }

    let token = state.token.create(&user.id)?;

    Ok(Json(Response {
        message: "Login successful".to_owned(),
        token,
        user: user.into(),
    }))
}
