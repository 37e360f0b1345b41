//! Patron model and related types

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use super::loan::Loan;

/// Secret presented at login.
///
/// Kept as given, with no hashing. Debug output is redacted so the secret
/// never ends up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A registered borrower
#[derive(Debug, Clone)]
pub struct Patron {
    pub id: i32,
    pub username: String,
    pub credential: Credential,
    /// Active loans in borrow order. The same item id may appear more than once.
    pub active_loans: Vec<Loan>,
}

impl Patron {
    pub fn new(id: i32, username: impl Into<String>, credential: Credential) -> Self {
        Self {
            id,
            username: username.into(),
            credential,
            active_loans: Vec::new(),
        }
    }

    /// Number of copies of `item_id` this patron currently holds
    pub fn copies_held(&self, item_id: i32) -> usize {
        self.active_loans.iter().filter(|l| l.item_id == item_id).count()
    }
}

impl fmt::Display for Patron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.id, self.username)
    }
}

/// Public view of a patron, without credential or loans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatronShort {
    pub id: i32,
    pub username: String,
}

impl From<&Patron> for PatronShort {
    fn from(patron: &Patron) -> Self {
        Self {
            id: patron.id,
            username: patron.username.clone(),
        }
    }
}

/// The patrons every fresh desk starts with
pub fn seed_patrons() -> Vec<Patron> {
    vec![
        Patron::new(1, "alice", Credential::new("password123")),
        Patron::new(2, "bob", Credential::new("password456")),
    ]
}

/// JWT claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub patron_id: i32,
    /// Session id, recognized by the desk until logout
    pub sid: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(patron: &Patron, sid: Uuid, valid_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: patron.username.clone(),
            patron_id: patron.id,
            sid,
            exp: now + (valid_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let patron = Patron::new(1, "alice", Credential::new("password123"));
        let debug = format!("{:?}", patron);
        assert!(!debug.contains("password123"));
        assert_eq!(patron.to_string(), "1 | alice");
    }

    #[test]
    fn test_token_roundtrip_and_wrong_secret() {
        let patron = Patron::new(7, "carol", Credential::new("x"));
        let sid = Uuid::new_v4();
        let token = SessionClaims::new(&patron, sid, 1).create_token("secret").unwrap();

        let claims = SessionClaims::from_token(&token, "secret").unwrap();
        assert_eq!(claims.patron_id, 7);
        assert_eq!(claims.sid, sid);

        assert!(SessionClaims::from_token(&token, "other").is_err());
    }
}
