//! Authentication middleware and extractors.
//!
//! The bearer token is decoded once per request and the caller identity is
//! attached to request extensions; everything downstream trusts that value
//! verbatim. Token issuance happens elsewhere - this service only decodes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use cantina_core::{Roles, UserId};

use crate::models::Actor;
use crate::state::AppState;

/// JWT claims carried by Cantina access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: String,
    /// Role flags decoded alongside the identity.
    #[serde(default)]
    pub roles: Roles,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Issued-at (unix seconds).
    pub iat: i64,
}

/// Decode a bearer token and attach the caller identity to the request.
///
/// Requests without a valid token pass through without an identity;
/// [`RequireAuth`] is what rejects them per route.
pub async fn attach_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let actor = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| decode_actor(value, state.config().jwt_secret.expose_secret()));

    if let Some(actor) = actor {
        req.extensions_mut().insert(actor);
    }

    next.run(req).await
}

/// Decode an `Authorization` header value into a caller identity.
fn decode_actor(authorization: &str, secret: &str) -> Option<Actor> {
    let token = authorization.strip_prefix("Bearer ")?;

    let key = DecodingKey::from_secret(secret.as_bytes());
    let claims = jsonwebtoken::decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256))
        .ok()?
        .claims;

    let user_id: UserId = claims.sub.parse().ok()?;
    Some(Actor {
        user_id,
        roles: claims.roles,
    })
}

/// Extractor that requires an authenticated caller.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(actor): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", actor.user_id)
/// }
/// ```
pub struct RequireAuth(pub Actor);

/// Error returned when authentication is required but no valid identity was
/// attached to the request.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .copied()
            .map(Self)
            .ok_or(AuthRejection)
    }
}
