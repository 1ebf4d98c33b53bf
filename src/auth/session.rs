use std::time::Duration;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::SessionClaims;
use crate::{config::JwtConfig, users::repo_types::User};

/// Signing and verification keys for session tokens, built once at start-up.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl SessionKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_hours as u64) * 60 * 60),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        self.sign_at(user, OffsetDateTime::now_utc())
    }

    /// Mint a token whose lifetime starts at `issued_at`.
    pub fn sign_at(&self, user: &User, issued_at: OffsetDateTime) -> anyhow::Result<String> {
        let exp = issued_at + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = SessionClaims {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            iat: issued_at.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "session token signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<SessionClaims> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<SessionClaims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "session token verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo_types::{Gender, VerificationStatus};
    use time::macros::date;
    use uuid::Uuid;

    fn test_config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_hours: 24,
        }
    }

    fn sample_user(email: &str) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            name: "Adnan".into(),
            email: email.into(),
            phone: Some("+8801700000000".into()),
            password_hash: "$argon2id$not-in-token".into(),
            date_of_birth: date!(2001 - 09 - 03),
            age: 23,
            gender: Gender::Male,
            address: "Dhaka".into(),
            is_verified: false,
            verification_status: VerificationStatus::Pending,
            verified_at: None,
            profile_image: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = SessionKeys::from_config(&test_config("dev-secret"));
        let user = sample_user("adnan@gmail.com");
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "adnan@gmail.com");
        assert_eq!(claims.phone.as_deref(), Some("+8801700000000"));
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[test]
    fn token_never_carries_the_digest() {
        let keys = SessionKeys::from_config(&test_config("dev-secret"));
        let token = keys.sign(&sample_user("a@uni.edu")).unwrap();
        let claims = serde_json::to_string(&keys.verify(&token).unwrap()).unwrap();
        assert!(!claims.contains("not-in-token"));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = SessionKeys::from_config(&test_config("dev-secret"));
        let issued = OffsetDateTime::now_utc() - TimeDuration::hours(25);
        let token = keys.sign_at(&sample_user("a@uni.edu"), issued).unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("expired"));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let ours = SessionKeys::from_config(&test_config("ours"));
        let theirs = SessionKeys::from_config(&test_config("theirs"));
        let token = theirs.sign(&sample_user("a@uni.edu")).unwrap();
        assert!(ours.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good = SessionKeys::from_config(&test_config("same-secret"));
        let mut cfg = test_config("same-secret");
        cfg.issuer = "other-iss".into();
        cfg.audience = "other-aud".into();
        let bad = SessionKeys::from_config(&cfg);
        let token = good.sign(&sample_user("a@uni.edu")).unwrap();
        assert!(bad.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = SessionKeys::from_config(&test_config("dev-secret"));
        assert!(keys.verify("not.a.jwt").is_err());
        assert!(keys.verify("").is_err());
    }
}
