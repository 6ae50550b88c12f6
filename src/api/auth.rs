use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use super::json::Json;
use super::response::ApiResponse;
use super::rooms::request_context;
use crate::auth::{Claims, TokenError};
use crate::db::{LoginRequest, LoginResponse, User};
use crate::AppState;

/// Returned when the Authorization header is missing or not `Bearer <token>`
pub const INVALID_CREDENTIAL: &str = "token not valid!";
pub const INVALID_LOGIN: &str = "invalid credentials";

lazy_static! {
    /// Checked on unknown emails so they cost as much as a wrong password
    static ref DUMMY_HASH: String = hash_password("kosan-unknown-user").unwrap_or_default();
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Identity of the caller, placed in request extensions by [`auth_middleware`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
        }
    }
}

/// Why the credential could not even be handed to the token codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    Missing,
    NotText,
    Malformed,
    UnsupportedScheme,
}

impl std::fmt::Display for CredentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialError::Missing => write!(f, "authorization header is missing"),
            CredentialError::NotText => write!(f, "authorization header is not valid text"),
            CredentialError::Malformed => write!(f, "authorization header is not `<scheme> <token>`"),
            CredentialError::UnsupportedScheme => write!(f, "authorization scheme is not Bearer"),
        }
    }
}

/// Extract the bearer token from the Authorization header.
///
/// The header must be exactly a scheme and a token separated by whitespace.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, CredentialError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(CredentialError::Missing)?
        .to_str()
        .map_err(|_| CredentialError::NotText)?;

    let mut parts = header.split_whitespace();
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CredentialError::Malformed);
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(CredentialError::UnsupportedScheme);
    }

    Ok(token)
}

/// Map a verification failure to the response the gate sends back
fn rejection_for(err: &TokenError) -> ApiResponse {
    match err {
        TokenError::InvalidSignature => ApiResponse::unauthorized("invalid token signature"),
        TokenError::Expired => ApiResponse::unauthorized("token has expired"),
        TokenError::Malformed(_) | TokenError::Signing(_) => ApiResponse::bad_request(INVALID_CREDENTIAL),
    }
}

/// Auth middleware that validates bearer tokens.
///
/// Rejects before any cryptographic work when the header is absent or
/// malformed. On success the caller's [`AuthUser`] is stored in the request
/// extensions for the handlers downstream.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(request.headers()) {
        Ok(token) => token,
        Err(e) => {
            warn!(error = %e, "authorization token not valid");
            return ApiResponse::bad_request(INVALID_CREDENTIAL).into_response();
        }
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "authorization failed");
            return rejection_for(&e).into_response();
        }
    };

    request.extensions_mut().insert(AuthUser::from(claims));
    next.run(request).await
}

/// Extractor for the identity bound by [`auth_middleware`]
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiResponse::unauthorized("authentication required"))
    }
}

/// Login endpoint: exchange email and password for an access token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResponse {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return ApiResponse::bad_request("email and password are required");
    }

    let ctx = request_context(&state);
    let _guard = ctx.drop_guard();

    let user = match ctx
        .run(User::find_by_email(&state.db, request.email.trim()))
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            verify_password(&request.password, &DUMMY_HASH);
            return ApiResponse::unauthorized(INVALID_LOGIN);
        }
        Err(e) => {
            error!(error = %e, "error fetching user data from db");
            return ApiResponse::internal();
        }
    };

    if !verify_password(&request.password, &user.password_hash) {
        warn!(email = %user.email, "login rejected");
        return ApiResponse::unauthorized(INVALID_LOGIN);
    }

    match state.tokens.issue(&user.identity()) {
        Ok(token) => ApiResponse::ok(&LoginResponse {
            token,
            expires_in: state.tokens.lifetime().num_seconds(),
        }),
        Err(e) => {
            error!(error = %e, "failed to issue token");
            ApiResponse::internal()
        }
    }
}

/// Who am I: echoes the authenticated identity
pub async fn me(user: AuthUser) -> ApiResponse {
    ApiResponse::ok(&user)
}
