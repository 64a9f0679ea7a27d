// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token signing and verification (HS256).

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::TokenClaims;
use super::error::AuthError;

/// Scheme prefix on issued tokens (`JWT <token>`).
pub const TOKEN_SCHEME: &str = "JWT";

/// Signing and verification keys derived from the server secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens carry no exp, iss or aud
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for a user. Returns the bare JWT without the scheme prefix.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: Utc::now().timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::InternalError(format!("token signing failed: {e}")))
    }

    /// Verify a bare JWT and return its claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let keys = TokenKeys::from_secret("test-secret");
        let token = keys.issue("user-1", "alice@example.com").unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "alice@example.com");
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = TokenKeys::from_secret("secret-a").issue("user-1", "a@example.com").unwrap();
        let err = TokenKeys::from_secret("secret-b").verify(&token).unwrap_err();
        assert_eq!(err, AuthError::InvalidSignature);
    }

    #[test]
    fn garbage_is_malformed() {
        let keys = TokenKeys::from_secret("test-secret");
        assert_eq!(keys.verify("not-a-jwt").unwrap_err(), AuthError::MalformedToken);
        assert_eq!(keys.verify("").unwrap_err(), AuthError::MalformedToken);
    }
}
