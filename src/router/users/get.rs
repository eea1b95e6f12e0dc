use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::post::{Post, PostRepository};
use crate::user::{Profile, UserRepository};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct UserWithPosts {
    #[serde(flatten)]
    pub profile: Profile,
    pub posts: Vec<Post>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub user: UserWithPosts,
}

/// Single-profile view: the profile plus its posts, newest first.
pub async fn handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Response>> {
    Uuid::parse_str(&user_id)
        .map_err(|_| ServerError::BadRequest("Invalid user ID"))?;

    let users = UserRepository::new(state.db.sqlite.clone());
    let user = users
        .find_by_id(&user_id)
        .await?
        .ok_or(ServerError::NotFound("User not found"))?;

    let posts = PostRepository::new(state.db.sqlite.clone())
        .find_by_author(&user_id)
        .await?;

    Ok(Json(Response {
        user: UserWithPosts {
            profile: user.into(),
            posts,
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

    #[tokio::test]
    async fn test_get_user_with_posts() {
        let state = state().await;
        let app = app(state);

        let (token, profile) =
            register_and_login(&app, "Ada", "ada@x.com").await;

        let body = json!({ "content": "hello" }).to_string();
        let response = make_request(
            app.clone(),
            Method::POST,
            "/posts/create",
            Some(&token),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = make_request(
            app.clone(),
            Method::GET,
            &format!("/users/{}", profile.id),
            Some(&token),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.user.profile, profile);
        assert_eq!(body.user.posts.len(), 1);
        assert_eq!(body.user.posts[0].content, "hello");
    }

    #[tokio::test]
    async fn test_get_user_invalid_id() {
        let state = state().await;
        let app = app(state);

        let (token, _) = register_and_login(&app, "Ada", "ada@x.com").await;

        let response = make_request(
            app.clone(),
            Method::GET,
            "/users/not-a-uuid",
            Some(&token),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let state = state().await;
        let app = app(state);

        let (token, _) = register_and_login(&app, "Ada", "ada@x.com").await;

        let response = make_request(
            app.clone(),
            Method::GET,
            &format!("/users/{}", uuid::Uuid::new_v4()),
            Some(&token),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_user_requires_token() {
        let state = state().await;
        let app = app(state);

        let (_, profile) = register_and_login(&app, "Ada", "ada@x.com").await;

        let response = make_request(
            app.clone(),
            Method::GET,
            &format!("/users/{}", profile.id),
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
