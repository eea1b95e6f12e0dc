//! Request gate: verifies bearer tokens before handlers run.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::AppState;
use crate::error::{Result, ServerError};

/// Paths requiring a valid bearer token, matched literally with
/// `starts_with`. A prefix like `/users/` protects everything nested
/// beneath it, reads included; this looseness is intentional.
pub const PROTECTED_PREFIXES: &[&str] =
    &["/posts/create", "/auth/me", "/users/"];

const BEARER: &str = "Bearer ";

/// Identity verified by the gate, attached as a request extension. Handlers
/// trust this value and never re-verify the raw header.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub String);

fn verify(state: &AppState, req: &mut Request) -> Result<()> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix(BEARER));

    let Some(token) = token else {
        return Err(ServerError::MissingToken);
    };

    match state.token.decode(token) {
        Ok(claims) => {
            req.extensions_mut().insert(AuthenticatedUser(claims.sub));
            Ok(())
        },
        Err(_) => Err(ServerError::InvalidToken),
    }
}

/// Middleware guarding the protected-prefix set. Requests to other paths
/// pass through untouched.
pub async fn gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let path = req.uri().path();
    if PROTECTED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        verify(&state, &mut req)?;
    }

    Ok(next.run(req).await)
}

/// Unconditional variant for routes outside the prefix set, so
/// verification still happens in exactly one place.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    verify(&state, &mut req)?;
    Ok(next.run(req).await)
}
