use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_derive::{Deserialize, Serialize};

use crate::{errors::ServerError, utils::get_token, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing material for bearer tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    header: Header,
    validation: Validation,
    expiry: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, expiry_secs: i64) -> Self {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            header: Header::new(Algorithm::HS256),
            validation: Validation::new(Algorithm::HS256),
            expiry: Duration::seconds(expiry_secs),
        }
    }

    pub fn issue(&self, user_id: &str, username: &str) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_owned(),
            username: username.to_owned(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };
        Ok(encode(&self.header, &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ServerError> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => {
                log::warn!("rejected bearer token: {e}");
                Err(ServerError::Unauthorized)
            }
        }
    }
}

/// The caller, as proven by a verified bearer token. This is the only source
/// of user identity handlers may scope a request by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
}

impl AuthenticatedUser {
    fn from_http(req: &HttpRequest) -> Result<Self, ServerError> {
        let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
            log::error!("application state is not registered");
            ServerError::EnvironmentError
        })?;
        let token = get_token(req).ok_or(ServerError::Unauthorized)?;
        let claims = state.jwt.verify(token)?;
        Ok(AuthenticatedUser {
            id: claims.sub,
            username: claims.username,
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(AuthenticatedUser::from_http(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let keys = JwtKeys::new("secret", 60);
        let token = keys.issue("aaaaaaaaaaaaaaaaaaaaaa01", "alice").unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, "aaaaaaaaaaaaaaaaaaaaaa01");
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = JwtKeys::new("other", 60).issue("x", "mallory").unwrap();
        assert!(matches!(
            JwtKeys::new("secret", 60).verify(&token),
            Err(ServerError::Unauthorized)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        // well past the default validation leeway
        let keys = JwtKeys::new("secret", -3600);
        let token = keys.issue("x", "alice").unwrap();
        assert!(matches!(keys.verify(&token), Err(ServerError::Unauthorized)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            JwtKeys::new("secret", 60).verify("not-a-token"),
            Err(ServerError::Unauthorized)
        ));
    }
}
