use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::middleware::AuthenticatedUser;
use crate::post::PostRepository;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
}

/// Handler to delete a post. Only its owner may do so; a mismatch leaks
/// nothing beyond the post's existence.
pub async fn handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(post_id): Path<String>,
) -> Result<Json<Response>> {
    let posts = PostRepository::new(state.db.sqlite.clone());
    let post = posts
        .find_by_id(&post_id)
        .await?
        .ok_or(ServerError::NotFound("Post not found"))?;

    if post.author_id != auth.0 {
        return Err(ServerError::Forbidden(
            "Forbidden: You can only delete your own posts.",
        ));
    }

    posts.delete(&post_id).await?;

    Ok(Json(Response {
        message: "Post deleted successfully".to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;

    use crate::post::FeedPost;
    use crate::router::tests::{register_and_login, state};
    use crate::{app, make_request};

    async fn create_post(app: &Router, token: &str, content: &str) -> String {
        let body = json!({ "content": content }).to_string();
        let response = make_request(
            app.clone(),
            Method::POST,
            "/posts/create",
            Some(token),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: super::super::create::Response =
            serde_json::from_slice(&body).unwrap();
        body.post.id
    }

    async fn feed(app: &Router) -> Vec<FeedPost> {
        let response = make_request(
            app.clone(),
            Method::GET,
            "/posts/feed",
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_owner_can_delete_own_post() {
        let state = state().await;
        let app = app(state);

        let (token, _) = register_and_login(&app, "Ada", "ada@x.com").await;
        let post_id = create_post(&app, &token, "hello").await;

        let response = make_request(
            app.clone(),
            Method::DELETE,
            &format!("/posts/{post_id}"),
            Some(&token),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        assert!(feed(&app).await.iter().all(|post| post.id != post_id));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_delete_post() {
        let state = state().await;
        let app = app(state);

        let (owner, _) = register_and_login(&app, "Ada", "ada@x.com").await;
        let (intruder, _) =
            register_and_login(&app, "Grace", "grace@x.com").await;
        let post_id = create_post(&app, &owner, "hello").await;

        let response = make_request(
            app.clone(),
            Method::DELETE,
            &format!("/posts/{post_id}"),
            Some(&intruder),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // The post must still be there.
        assert!(feed(&app).await.iter().any(|post| post.id == post_id));
    }

    #[tokio::test]
    async fn test_delete_unknown_post() {
        let state = state().await;
        let app = app(state);

        let (token, _) = register_and_login(&app, "Ada", "ada@x.com").await;

        let response = make_request(
            app.clone(),
            Method::DELETE,
            "/posts/does-not-exist",
            Some(&token),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_without_token() {
        let state = state().await;
        let app = app(state);

        let (token, _) = register_and_login(&app, "Ada", "ada@x.com").await;
        let post_id = create_post(&app, &token, "hello").await;

        let response = make_request(
            app.clone(),
            Method::DELETE,
            &format!("/posts/{post_id}"),
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
