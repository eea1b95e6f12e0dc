//! ripple is a minimal social networking API: identities, short posts and a
//! public reverse-chronological feed, guarded by bearer tokens.

pub mod client;
pub mod config;
mod crypto;
mod database;
pub mod error;
mod middleware;
pub mod post;
pub mod router;
pub mod telemetry;
mod token;
pub mod user;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode, header};
use axum::routing::{delete, get, patch, post};
use axum::{Router, middleware as AxumMiddleware};
pub use error::ServerError;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

/// MUST NEVER be used in production.
#[cfg(test)]
pub(crate) async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use tower::util::ServiceExt;

    let mut builder = axum::http::Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder =
            builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    app.oneshot(builder.body(axum::body::Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub db: database::Database,
    pub crypto: Arc<crypto::PasswordManager>,
    pub token: token::TokenManager,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new()),
        )
        // Set a timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        // Remove sensitive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION]))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers(Any)
                .vary([header::AUTHORIZATION]),
        );

    let auth_router = Router::new()
        // `POST /auth/register` goes to `register`.
        .route("/register", post(router::auth::register::handler))
        // `POST /auth/login` goes to `login`.
        .route("/login", post(router::auth::login::handler))
        // `GET /auth/me` goes to `me`. Covered by the gate.
        .route("/me", get(router::auth::me::handler));

    // `/posts/{id}` sits outside the protected-prefix set, so deletion
    // carries its own authentication layer. Verification still happens
    // only in middleware code.
    let delete_post_router = Router::new()
        .route("/{post_id}", delete(router::posts::remove::handler))
        .route_layer(AxumMiddleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    let posts_router = Router::new()
        // `POST /posts/create` goes to `create`. Covered by the gate.
        .route("/create", post(router::posts::create::handler))
        // `GET /posts/feed` goes to `feed`. Public.
        .route("/feed", get(router::posts::feed::handler))
        .merge(delete_post_router);

    let users_router = Router::new()
        // `GET /users/{id}` goes to `get`. Covered by the gate.
        .route("/{user_id}", get(router::users::get::handler))
        // `PATCH /users/{id}` goes to `patch`. Owner only.
        .route("/{user_id}", patch(router::users::patch::handler));

    Router::new()
        // `GET /status.json` goes to `status`.
        .route("/status.json", get(router::status::status))
        .nest("/auth", auth_router)
        .nest("/posts", posts_router)
        .nest("/users", users_router)
        .route_layer(AxumMiddleware::from_fn_with_state(
            state.clone(),
            middleware::gate,
        ))
        .with_state(state)
        .layer(middleware)
}

/// Initialize the application state.
pub async fn initialize_state() -> Result<AppState, Box<dyn std::error::Error>>
{
    // read configuration file. let it in memory.
    let config = config::Configuration::default().read();

    let db_config = config.database.clone().unwrap_or_default();
    let db = database::Database::new(
        &db_config
            .path
            .unwrap_or(database::DEFAULT_DATABASE_PATH.into()),
        db_config.pool_size.unwrap_or(database::DEFAULT_POOL_SIZE),
    )
    .await?;

    // execute migrations scripts on start.
    sqlx::migrate!().run(&db.sqlite).await?;

    let crypto =
        Arc::new(crypto::PasswordManager::new(config.argon2.clone())?);

    // handle jwt.
    let secret = config
        .token
        .as_ref()
        .and_then(|token| token.secret.clone())
        .or_else(|| std::env::var("JWT_SECRET").ok());
    let Some(secret) = secret else {
        tracing::error!(
            "missing token secret: set `token.secret` on `config.yaml` or the `JWT_SECRET` environment variable"
        );
        std::process::exit(0);
    };
    let token = token::TokenManager::new(&secret);

    Ok(AppState {
        config,
        db,
        crypto,
        token,
    })
}
