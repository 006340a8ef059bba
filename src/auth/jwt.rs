use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};

use super::{Claims, Role};
use crate::error::AppError;

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

/// Why a token was rejected. Both cases are a 401 to the caller; they are
/// only logged differently.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("token expired")]
    Expired,
    #[error("token invalid: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

pub fn make_access_claims(user_id: &uuid::Uuid, email: &str, role: Role, ttl_secs: usize) -> Claims {
    let iat = now_unix();
    let exp = iat + ttl_secs;
    Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        iat,
        exp,
    }
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal(format!("Token encoding failed: {err}")))
}

/// Verify signature and expiry; signature problems and elapsed expiry are
/// reported as distinct conditions.
pub fn verify_token(keys: &JwtKeys, token: &str) -> Result<Claims, VerifyError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    match decode::<Claims>(token, &keys.dec, &validation) {
        Ok(data) => Ok(data.claims),
        Err(err) => match err.kind() {
            ErrorKind::ExpiredSignature => Err(VerifyError::Expired),
            _ => Err(VerifyError::Invalid(err)),
        },
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{JwtKeys, Role, VerifyError, encode_token, make_access_claims, verify_token};
    use crate::auth::Claims;

    #[test]
    fn makes_claims_with_expected_subject_role_and_ttl() {
        let user_id = Uuid::new_v4();
        let claims = make_access_claims(&user_id, "alice@demo.com", Role::Manager, 60);

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "alice@demo.com");
        assert_eq!(claims.role, Role::Manager);
        assert_eq!(claims.exp.saturating_sub(claims.iat), 60);
    }

    #[test]
    fn verify_accepts_freshly_issued_token() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let claims = make_access_claims(&Uuid::new_v4(), "alice@demo.com", Role::Admin, 600);
        let token = encode_token(&keys, &claims).expect("token should encode");

        let verified = verify_token(&keys, &token).expect("token should verify");
        assert_eq!(verified.sub, claims.sub);
        assert_eq!(verified.role, Role::Admin);
    }

    #[test]
    fn expired_token_is_reported_as_expired_not_invalid() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let mut claims = make_access_claims(&Uuid::new_v4(), "alice@demo.com", Role::Admin, 600);
        claims.iat = claims.iat.saturating_sub(7200);
        claims.exp = claims.iat + 60;
        let token = encode_token(&keys, &claims).expect("token should encode");

        let err = verify_token(&keys, &token).expect_err("expired token should fail");
        assert!(matches!(err, VerifyError::Expired));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let keys = JwtKeys::from_secret(b"secret-a");
        let other = JwtKeys::from_secret(b"secret-b");
        let claims = make_access_claims(&Uuid::new_v4(), "alice@demo.com", Role::Admin, 600);
        let token = encode_token(&other, &claims).expect("token should encode");

        let err = verify_token(&keys, &token).expect_err("mismatched secret should fail");
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn tampered_payload_fails_signature_verification() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let claims = make_access_claims(&Uuid::new_v4(), "alice@demo.com", Role::Cashier, 600);
        let token = encode_token(&keys, &claims).expect("token should encode");

        // Swap the payload segment for one claiming the admin role.
        let mut elevated = claims.clone();
        elevated.role = Role::Admin;
        let forged_payload = {
            use jsonwebtoken::{Algorithm, Header, encode};
            let token = encode(
                &Header::new(Algorithm::HS256),
                &elevated,
                &JwtKeys::from_secret(b"attacker-secret").enc,
            )
            .expect("forged token should encode");
            token.split('.').nth(1).expect("payload segment").to_string()
        };
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = &forged_payload;
        let tampered = parts.join(".");

        let err = verify_token(&keys, &tampered).expect_err("tampered token should fail");
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn malformed_token_is_invalid() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let err = verify_token(&keys, "not-a-jwt").expect_err("garbage should fail");
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn tokens_issued_at_different_times_differ_but_share_subject() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let user_id = Uuid::new_v4();
        let mut first = make_access_claims(&user_id, "alice@demo.com", Role::Manager, 600);
        let mut second = first.clone();
        first.iat = first.iat.saturating_sub(30);
        second.iat = second.iat.saturating_sub(10);

        let token_a = encode_token(&keys, &first).expect("token should encode");
        let token_b = encode_token(&keys, &second).expect("token should encode");
        assert_ne!(token_a, token_b);

        let claims_a = verify_token(&keys, &token_a).expect("token should verify");
        let claims_b = verify_token(&keys, &token_b).expect("token should verify");
        assert_eq!(claims_a.sub, claims_b.sub);
    }

    #[test]
    fn claims_roundtrip_preserves_email_claim() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "owner@demo.com".to_string(),
            role: Role::Owner,
            iat: super::now_unix(),
            exp: super::now_unix() + 300,
        };
        let token = encode_token(&keys, &claims).expect("token should encode");

        let verified = verify_token(&keys, &token).expect("token should verify");
        assert_eq!(verified.email, "owner@demo.com");
    }
}
