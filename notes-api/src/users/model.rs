use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::ident::RecordId;

pub type UserId = RecordId;

pub const PASSWORD_MIN_CHARS: usize = 7;

#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// Argon2 PHC string; never serialized.
    #[serde(skip)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
}

impl RegisterUser {
    /// Light structural checks; anything stronger belongs to an upstream
    /// identity provider.
    pub fn validate(&self) -> Result<(), Error> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::Validation("Invalid Email".into()));
        }
        if self.password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(Error::Validation("Password Too Short".into()));
        }
        Ok(())
    }

    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

impl LoginUser {
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str) -> RegisterUser {
        RegisterUser {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn rejects_invalid_email() {
        assert!(register("", "long-enough").validate().is_err());
        assert!(register("   ", "long-enough").validate().is_err());
        assert!(register("no-at-sign", "long-enough").validate().is_err());
        assert!(register("a@b", "long-enough").validate().is_ok());
    }

    #[test]
    fn rejects_short_password() {
        assert!(register("a@b", "short1").validate().is_err());
        assert!(register("a@b", "exactly7").validate().is_ok());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(register("  Someone@Example.COM ", "x").normalized_email(), "someone@example.com");
    }

    #[test]
    fn password_never_serializes() {
        let user = User {
            id: RecordId::generate(),
            email: "a@b".into(),
            password: "$argon2id$secret".into(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(!format!("{user:?}").contains("argon2"));
    }
}
