//! # Wire Types
//!
//! Request and response bodies exchanged with user-service and auth-service.
//! All bodies are camelCase JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Identifier user-service assigns to a user record.
pub type UserId = i64;

/// Roles a user can be registered with. Matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// The wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// Parse a role name. Only the exact wire names are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "USER" => Some(Self::User),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical user body sent to both user-service and auth-service.
///
/// Custom `Debug` redacts the password.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub birth_date: NaiveDate,
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: Zeroizing<String>,
    pub role: Role,
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Zeroizing<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.as_str())
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("birth_date", &self.birth_date)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// A user record as returned by user-service on create and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: UserId,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    pub email: String,
}

/// Tokens issued by auth-service for a newly registered user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Body of a Spring-style `/actuator/health` response. Only `status` is
/// read; other fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HealthBody {
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            name: "TestName".into(),
            surname: "TestSurName".into(),
            birth_date: NaiveDate::from_ymd_opt(2000, 2, 2).unwrap(),
            email: "test@test.by".into(),
            password: Zeroizing::new("pass_test".into()),
            role: Role::User,
        }
    }

    #[test]
    fn role_parse_is_case_sensitive() {
        assert_eq!(Role::parse("USER"), Some(Role::User));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("MODERATOR"), None);
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn new_user_serializes_camel_case_with_password() {
        let json = serde_json::to_value(new_user()).unwrap();
        assert_eq!(json["birthDate"], "2000-02-02");
        assert_eq!(json["password"], "pass_test");
        assert_eq!(json["role"], "USER");
    }

    #[test]
    fn new_user_debug_redacts_password() {
        let debug = format!("{:?}", new_user());
        assert!(!debug.contains("pass_test"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn user_record_deserializes_from_user_service_shape() {
        let record: UserRecord = serde_json::from_value(serde_json::json!({
            "userId": 42,
            "name": "TestName",
            "surname": "TestSurName",
            "birthDate": "2000-02-02",
            "email": "test@test.by",
            "createdAt": "ignored"
        }))
        .unwrap();
        assert_eq!(record.user_id, 42);
        assert_eq!(record.birth_date, NaiveDate::from_ymd_opt(2000, 2, 2));
    }

    #[test]
    fn token_pair_debug_redacts_tokens() {
        let tokens = TokenPair {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
        };
        let debug = format!("{tokens:?}");
        assert!(!debug.contains("\"access\""));
        assert!(!debug.contains("\"refresh\""));
        assert!(debug.contains("[REDACTED]"));
    }
}
