// JWT issuance for authenticated users

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::auth::models::UserView;
use crate::error::ServiceError;

/// JWT claims structure
///
/// Identity only. No `exp` is issued, so tokens stay valid until the signing
/// secret changes; there is no refresh or revocation protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub iat: i64,
}

/// Signs and reads bearer tokens with an HMAC secret
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `user`
    pub fn issue(&self, user: &UserView) -> Result<String, ServiceError> {
        let claims = Claims {
            sub: user.user_id.clone(),
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            iat: Utc::now().timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Credential(format!("token signing failed: {}", e)))
    }

    /// Read the identity back out of a token signed with the same secret
    pub fn decode(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| ServiceError::Unauthenticated)
    }
}
