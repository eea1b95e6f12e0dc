use axum::{Extension, Json};
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::middleware::AuthenticatedUser;
use crate::user::{Profile, UserRepository};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub user: Profile,
}

/// Resolve the identity behind the verified token. The subject may have
/// disappeared since the token was issued.
pub async fn handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Response>> {
    let users = UserRepository::new(state.db.sqlite.clone());
    let user = users
        .find_by_id(&auth.0)
        .await?
        .ok_or(ServerError::NotFound("User not found"))?;

    Ok(Json(Response { user: user.into() }))
}
