use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::Result;
use crate::post::{FeedPost, PostRepository};

/// Public reverse-chronological feed.
pub async fn handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<FeedPost>>> {
    let posts = PostRepository::new(state.db.sqlite.clone()).feed().await?;

    Ok(Json(posts))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;

    use crate::post::FeedPost;
    use crate::router::tests::{register_and_login, state};
    use crate::{app, make_request};

    #[tokio::test]
    async fn test_empty_feed() {
        let state = state().await;
        let app = app(state);

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
        let body: Vec<FeedPost> = serde_json::from_slice(&body).unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_feed_is_reverse_chronological() {
        let state = state().await;
        let app = app(state);

        let (token, _) = register_and_login(&app, "Ada", "ada@x.com").await;

        for content in ["first", "second", "third"] {
            let body = json!({ "content": content }).to_string();
            let response = make_request(
                app.clone(),
                Method::POST,
                "/posts/create",
                Some(&token),
                body,
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = make_request(
            app.clone(),
            Method::GET,
            "/posts/feed",
            None,
            String::default(),
        )
        .await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let feed: Vec<FeedPost> = serde_json::from_slice(&body).unwrap();

        let contents: Vec<&str> =
            feed.iter().map(|post| post.content.as_str()).collect();
        assert_eq!(contents, ["third", "second", "first"]);
        assert!(feed.iter().all(|post| post.author.name == "Ada"));
    }
}
