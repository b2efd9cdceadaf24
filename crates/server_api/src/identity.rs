use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::protocol::SessionProfile;
use tracing::debug;

/// Claims carried by the session token the identity provider issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl From<SessionClaims> for SessionProfile {
    fn from(claims: SessionClaims) -> Self {
        Self {
            name: claims.name,
            email: claims.email,
            image: claims.picture,
        }
    }
}

pub fn mint_session_token(
    secret: &str,
    subject: &str,
    profile: &SessionProfile,
    ttl_seconds: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: subject.to_string(),
        name: profile.name.clone(),
        email: profile.email.clone(),
        picture: profile.image.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Reads the display profile out of a session token.
///
/// Only used for presentation; a token that fails here still counts as a session.
pub fn decode_profile(secret: &str, token: &str) -> Option<SessionProfile> {
    match decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    ) {
        Ok(data) => Some(data.claims.into()),
        Err(error) => {
            debug!(%error, "session token carries no readable profile");
            None
        }
    }
}
