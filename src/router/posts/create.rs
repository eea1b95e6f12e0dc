use axum::http::StatusCode;
use axum::extract::State;
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::middleware::AuthenticatedUser;
use crate::post::{FeedPost, Post, PostAuthor, PostRepository};
use crate::router::Valid;
use crate::user::UserRepository;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(custom(
        function = "crate::router::validate_not_blank",
        message = "Post content cannot be empty"
    ))]
    pub content: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
    pub post: FeedPost,
}

/// Handler to create a post owned by the verified identity.
pub async fn handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Response>)> {
    let users = UserRepository::new(state.db.sqlite.clone());
    let author = users
        .find_by_id(&auth.0)
        .await?
        .ok_or(ServerError::NotFound("User not found"))?;

    let post = Post {
        id: Uuid::new_v4().to_string(),
        author_id: author.id.clone(),
        content: body.content.trim().to_owned(),
        created_at: Utc::now(),
    };
    PostRepository::new(state.db.sqlite.clone()).insert(&post).await?;

    Ok((
        StatusCode::CREATED,
        Json(Response {
            message: "Post created successfully".to_owned(),
            post: FeedPost {
                id: post.id,
                content: post.content,
                created_at: post.created_at,
                author: PostAuthor {
                    id: author.id,
                    name: author.name,
                },
            },
        }),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use http_body_util::BodyExt;
    use serde_json::json;

    use super::*;
    use crate::router::tests::{register_and_login, state};
    use crate::{app, make_request};

    #[tokio::test]
    async fn test_create_post_handler() {
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

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.post.content, "hello");
        assert_eq!(body.post.author.id, profile.id);
        assert_eq!(body.post.author.name, "Ada");
    }

    #[tokio::test]
    async fn test_create_post_blank_content() {
        let state = state().await;
        let app = app(state);

        let (token, _) = register_and_login(&app, "Ada", "ada@x.com").await;

        let body = json!({ "content": "  \n " }).to_string();
        let response = make_request(
            app.clone(),
            Method::POST,
            "/posts/create",
            Some(&token),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_post_without_token() {
        let state = state().await;
        let app = app(state);

        let body = json!({ "content": "hello" }).to_string();
        let response = make_request(
            app.clone(),
            Method::POST,
            "/posts/create",
            None,
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
