//! Session-holding API client.
//!
//! [`SessionClient`] plays the role a browser session plays for the web
//! front-end: it caches the bearer token and the last-known profile, attaches
//! the token to outgoing requests, and drops both on sign-out or when the
//! token stops verifying. Every non-GET call requires a cached token and is
//! rejected locally before any network I/O.

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::post::FeedPost;
use crate::router::auth::{login, me, register};
use crate::router::users::{get as users_get, patch as users_patch};
use crate::router::posts::{create as posts_create, remove as posts_remove};
use crate::user::Profile;

/// Client-side errors. A structured message from the server and an
/// unexpected transport failure both render as readable text.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Unauthorized: No token found")]
    NoToken,
    #[error("{detail}")]
    Api { status: StatusCode, detail: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Clone, Debug)]
struct Session {
    token: String,
    profile: Profile,
}

/// Cached session and the API calls it guards.
pub struct SessionClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<Session>,
}

impl SessionClient {
    /// Create a signed-out client against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Last-known profile of the signed-in user.
    pub fn profile(&self) -> Option<&Profile> {
        self.session.as_ref().map(|session| &session.profile)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.token.as_str())
    }

    /// Resolve the identity behind a previously stored token ("who am I").
    /// On any failure the token is discarded and the caller is expected to
    /// route back to sign-in.
    pub async fn resume(&mut self, token: String) -> Result<Profile, ClientError> {
        self.session = None;

        let response = self
            .http
            .get(format!("{}/auth/me", self.base_url))
            .bearer_auth(&token)
            .send()
            .await?;
        let body: me::Response = Self::parse(response).await?;

        self.session = Some(Session {
            token,
            profile: body.user.clone(),
        });
        Ok(body.user)
    }

    /// Create an account. Does not open a session.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        bio: Option<String>,
    ) -> Result<Profile, ClientError> {
        let response = self
            .http
            .post(format!("{}/auth/register", self.base_url))
            .json(&register::Body {
                name: name.to_owned(),
                email: email.to_owned(),
                password: password.to_owned(),
                bio,
            })
            .send()
            .await?;
        let body: register::Response = Self::parse(response).await?;

        Ok(body.user)
    }

    /// Exchange credentials for a token and cache the session.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Profile, ClientError> {
        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&login::Body {
                email: email.to_owned(),
                password: password.to_owned(),
            })
            .send()
            .await?;
        let body: login::Response = Self::parse(response).await?;

        self.session = Some(Session {
            token: body.token,
            profile: body.user.clone(),
        });
        Ok(body.user)
    }

    /// Drop the cached token and profile.
    pub fn logout(&mut self) {
        self.session = None;
    }

    pub async fn feed(&self) -> Result<Vec<FeedPost>, ClientError> {
        self.request::<(), _>(Method::GET, "/posts/feed", None).await
    }

    pub async fn create_post(
        &self,
        content: &str,
    ) -> Result<FeedPost, ClientError> {
        let body: posts_create::Response = self
            .request(
                Method::POST,
                "/posts/create",
                Some(&posts_create::Body {
                    content: content.to_owned(),
                }),
            )
            .await?;

        Ok(body.post)
    }

    pub async fn delete_post(&self, post_id: &str) -> Result<(), ClientError> {
        let _: posts_remove::Response = self
            .request::<(), _>(
                Method::DELETE,
                &format!("/posts/{post_id}"),
                None,
            )
            .await?;

        Ok(())
    }

    pub async fn user(
        &self,
        user_id: &str,
    ) -> Result<users_get::UserWithPosts, ClientError> {
        let body: users_get::Response = self
            .request::<(), _>(Method::GET, &format!("/users/{user_id}"), None)
            .await?;

        Ok(body.user)
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        name: &str,
        bio: Option<String>,
    ) -> Result<Profile, ClientError> {
        let body: users_patch::Response = self
            .request(
                Method::PATCH,
                &format!("/users/{user_id}"),
                Some(&users_patch::Body {
                    name: name.to_owned(),
                    bio,
                }),
            )
            .await?;

        Ok(body.user)
    }

    /// Send one request with the cached token attached. Mutating calls
    /// without a token never reach the network.
    async fn request<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<R, ClientError> {
        let token = self.token();
        if token.is_none() && method != Method::GET {
            return Err(ClientError::NoToken);
        }

        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        Self::parse(request.send().await?).await
    }

    async fn parse<R: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<R, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => format!("request failed with status {status}"),
        };

        Err(ClientError::Api { status, detail })
    }
}
