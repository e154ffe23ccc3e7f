//! Bearer token identification middleware.
//!
//! Extracts `Authorization: Bearer <token>` and compares it against the
//! configured API token. A match injects the configured identity; anything
//! else — missing header, wrong token, no token configured — falls back to
//! the fixed development identity instead of rejecting the request. This is
//! an explicitly permissive default for single-user deployments, not a
//! security boundary.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::{ApiContext, UserContext};

/// Resolve the request identity and inject it as a `UserContext` extension.
pub async fn identify(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let settings = req
        .extensions()
        .get::<ApiContext>()
        .and_then(|ctx| ctx.auth.clone());

    let user = match settings {
        Some(settings) => {
            let presented = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "));

            match presented {
                Some(token) if token == settings.token => UserContext {
                    user: settings.user.clone(),
                    authenticated: true,
                },
                Some(_) => {
                    tracing::warn!("Invalid bearer token, continuing as development identity");
                    UserContext::development()
                }
                None => UserContext::development(),
            }
        }
        None => UserContext::development(),
    };

    req.extensions_mut().insert(user);
    next.run(req).await
}
