use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload carried in the `auth` cookie. Identity fields only, never the digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,             // user ID
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub iat: usize,            // issued at (unix timestamp)
    pub exp: usize,            // expires at (unix timestamp)
    pub iss: String,           // issuer
    pub aud: String,           // audience
}
