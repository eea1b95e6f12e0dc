use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::middleware::AuthenticatedUser;
use crate::router::Valid;
use crate::user::{Profile, UserRepository};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(custom(
        function = "crate::router::validate_not_blank",
        message = "Name cannot be empty"
    ))]
    pub name: String,
    /// Absent means unchanged.
    #[validate(length(max = 160, message = "Bio must be at most 160 characters."))]
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
    pub user: Profile,
}

/// Handler to let a user modify their own profile.
pub async fn handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>> {
    Uuid::parse_str(&user_id)
        .map_err(|_| ServerError::BadRequest("Invalid user ID"))?;

    if auth.0 != user_id {
        return Err(ServerError::Forbidden(
            "Forbidden: You can only edit your own profile.",
        ));
    }

    let users = UserRepository::new(state.db.sqlite.clone());
    let user = users
        .find_by_id(&user_id)
        .await?
        .ok_or(ServerError::NotFound("User not found"))?;

    let name = body.name.trim().to_owned();
    let bio = body.bio.unwrap_or(user.bio);
    users.update_profile(&user_id, &name, &bio).await?;

    Ok(Json(Response {
        message: "Profile updated successfully".to_owned(),
        user: Profile {
            id: user.id,
            name,
            email: user.email,
            bio,
        },
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;

    use super::*;
    use crate::router::tests::{register_and_login, state};
    use crate::{app, make_request};

    async fn fetch_profile(
        app: &axum::Router,
        token: &str,
        id: &str,
    ) -> Profile {
        let response = make_request(
            app.clone(),
            Method::GET,
            &format!("/users/{id}"),
            Some(token),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: super::super::get::Response =
            serde_json::from_slice(&body).unwrap();
        body.user.profile
    }

    #[tokio::test]
    async fn test_patch_own_profile() {
        let state = state().await;
        let app = app(state);

        let (token, profile) =
            register_and_login(&app, "Ada", "ada@x.com").await;

        let body = json!({ "name": "Ada Lovelace", "bio": "first programmer" })
            .to_string();
        let response = make_request(
            app.clone(),
            Method::PATCH,
            &format!("/users/{}", profile.id),
            Some(&token),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.user.name, "Ada Lovelace");
        assert_eq!(body.user.bio, "first programmer");

        let stored = fetch_profile(&app, &token, &profile.id).await;
        assert_eq!(stored, body.user);
    }

    #[tokio::test]
    async fn test_patch_keeps_bio_when_absent() {
        let state = state().await;
        let app = app(state);

        let (token, profile) =
            register_and_login(&app, "Ada", "ada@x.com").await;

        let body = json!({ "name": "Ada", "bio": "mathematician" }).to_string();
        let response = make_request(
            app.clone(),
            Method::PATCH,
            &format!("/users/{}", profile.id),
            Some(&token),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json!({ "name": "Countess" }).to_string();
        let response = make_request(
            app.clone(),
            Method::PATCH,
            &format!("/users/{}", profile.id),
            Some(&token),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let stored = fetch_profile(&app, &token, &profile.id).await;
        assert_eq!(stored.name, "Countess");
        assert_eq!(stored.bio, "mathematician");
    }

    #[tokio::test]
    async fn test_patch_someone_else_is_forbidden() {
        let state = state().await;
        let app = app(state);

        let (_, target) = register_and_login(&app, "Ada", "ada@x.com").await;
        let (intruder, _) =
            register_and_login(&app, "Grace", "grace@x.com").await;

        let body = json!({ "name": "Hacked" }).to_string();
        let response = make_request(
            app.clone(),
            Method::PATCH,
            &format!("/users/{}", target.id),
            Some(&intruder),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_patch_blank_name_leaves_profile_unchanged() {
        let state = state().await;
        let app = app(state);

        let (token, profile) =
            register_and_login(&app, "Ada", "ada@x.com").await;

        let body = json!({ "name": "   " }).to_string();
        let response = make_request(
            app.clone(),
            Method::PATCH,
            &format!("/users/{}", profile.id),
            Some(&token),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let stored = fetch_profile(&app, &token, &profile.id).await;
        assert_eq!(stored.name, "Ada");
    }
}
