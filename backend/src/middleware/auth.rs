//! Session authentication middleware
//!
//! The gate itself is a pure function of the decoded session and the
//! configured policy; the middleware only gathers the token and acts on the
//! decision.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization, HeaderMapExt},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ErrorResponse;
use crate::AppState;

/// Session cookie names, plain and secure-prefixed
pub const SESSION_COOKIES: [&str; 2] = [
    "next-auth.session-token",
    "__Secure-next-auth.session-token",
];

/// Where unauthenticated visitors are sent
pub const SIGN_IN_PATH: &str = "/";

/// Operator key used when the gate lets a request through without a session
pub const ANONYMOUS_OPERATOR: &str = "anonymous";

/// Access policy for protected routes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPolicy {
    /// Only requests with a valid session pass
    #[default]
    Enforce,
    /// Every request passes
    AllowAll,
}

/// Outcome of the auth gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

/// Claims carried by the session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// Decide whether a request may reach a protected route
pub fn gate(session: Option<&SessionClaims>, policy: AuthPolicy) -> GateDecision {
    match (policy, session) {
        (AuthPolicy::AllowAll, _) => GateDecision::Allow,
        (AuthPolicy::Enforce, Some(_)) => GateDecision::Allow,
        (AuthPolicy::Enforce, None) => GateDecision::Redirect(SIGN_IN_PATH),
    }
}

/// Decode and validate a session token
pub fn decode_session_token(token: &str, secret: &str) -> Result<SessionClaims, String> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

/// Read the session token from the cookies, falling back to a bearer header
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    SESSION_COOKIES
        .iter()
        .find_map(|name| jar.get(name).map(|c| c.value().to_string()))
        .filter(|token| !token.is_empty())
        .or_else(|| {
            headers
                .typed_get::<Authorization<Bearer>>()
                .map(|auth| auth.token().to_string())
        })
}

/// Gate protected routes on the session token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = extract_token(request.headers()).and_then(|token| {
        decode_session_token(&token, &state.config.auth.secret)
            .map_err(|e| tracing::debug!("Rejected session token: {}", e))
            .ok()
    });

    match gate(session.as_ref(), state.config.auth.policy) {
        GateDecision::Allow => {
            tracing::debug!(
                "Allowing {} {} for {}",
                request.method(),
                request.uri().path(),
                session.as_ref().map_or(ANONYMOUS_OPERATOR, |s| s.sub.as_str())
            );
            if let Some(claims) = session {
                request.extensions_mut().insert(claims);
            }
            next.run(request).await
        }
        GateDecision::Redirect(to) => {
            tracing::debug!("Redirecting {} to {}", request.uri().path(), to);
            Redirect::temporary(to).into_response()
        }
    }
}

/// Extractor for the operator behind a request
///
/// Falls back to [`ANONYMOUS_OPERATOR`] when the gate allowed the request
/// without a session.
#[derive(Clone, Debug)]
pub struct Operator(pub String);

impl Operator {
    pub fn key(&self) -> &str {
        &self.0
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for Operator
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SessionClaims>()
            .map(|claims| Operator(claims.sub.clone()))
            .unwrap_or_else(|| Operator(ANONYMOUS_OPERATOR.to_string())))
    }
}
