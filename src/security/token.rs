//! Signed access tokens.
//!
//! Tokens are HS256 JWTs carrying the user's identity and role. Issuer and audience come
//! from [`AuthSettings`] and are enforced on decode, as is expiry.

use crate::config::settings::AuthSettings;
use crate::entities::{UserRole, user};
use crate::errors::{Error, Result};
use crate::models::AccessToken;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How long an issued token stays valid
pub const TOKEN_LIFETIME_HOURS: i64 = 3;

/// Claims embedded in every access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Username, if the account has one
    pub name: Option<String>,
    /// E-mail address
    pub email: String,
    /// Authorization role
    pub role: UserRole,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Expiry, seconds since the UNIX epoch
    pub exp: i64,
    /// Issue time, seconds since the UNIX epoch
    pub iat: i64,
}

/// Identity recovered from a valid token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// User id
    pub id: i64,
    /// Username, if the account has one
    pub username: Option<String>,
    /// E-mail address
    pub email: String,
    /// Authorization role
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Whether the caller holds the `Admin` role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Issues a token for `user`, valid for [`TOKEN_LIFETIME_HOURS`].
pub fn issue_token(user: &user::Model, settings: &AuthSettings) -> Result<AccessToken> {
    issue_token_at(user, settings, Utc::now())
}

fn issue_token_at(
    user: &user::Model,
    settings: &AuthSettings,
    issued_at: DateTime<Utc>,
) -> Result<AccessToken> {
    let expires_at = issued_at + Duration::hours(TOKEN_LIFETIME_HOURS);
    let claims = Claims {
        sub: user.id.to_string(),
        name: user.username.clone(),
        email: user.email.clone(),
        role: user.role,
        iss: settings.issuer.clone(),
        aud: settings.audience.clone(),
        exp: expires_at.timestamp(),
        iat: issued_at.timestamp(),
    };

    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(settings.secret_key.as_bytes()),
    )?;
    debug!(user_id = user.id, "Issued access token");

    Ok(AccessToken {
        token,
        username: user.username.clone(),
        role: user.role,
        expires_at,
    })
}

/// Verifies signature, expiry, issuer and audience, and returns the embedded identity.
///
/// Any failure is reported as [`Error::NotAuthorized`].
pub fn decode_token(token: &str, settings: &AuthSettings) -> Result<AuthenticatedUser> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[settings.issuer.as_str()]);
    validation.set_audience(&[settings.audience.as_str()]);

    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret_key.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        warn!("Rejected access token: {e}");
        Error::not_authorized("Token", "Invalid or expired access token")
    })?;

    let claims = data.claims;
    let id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| Error::not_authorized("Token", "Token subject is not a user id"))?;

    Ok(AuthenticatedUser {
        id,
        username: claims.name,
        email: claims.email,
        role: claims.role,
    })
}
