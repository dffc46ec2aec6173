//! Identity and role types for the donation admin client
//!
//! Every entity has exactly one identity representation. The backend is not
//! consistent about sending ids as JSON numbers or numeric strings, so the
//! conversion happens here, once, at the serde boundary.

use crate::error::AdminError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Entity Identifiers
// ============================================================================

/// Wire shape accepted for ids: `7` or `"7"`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw backend id
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// The raw backend id
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AdminError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self).map_err(|_| {
                    AdminError::validation(format!("Invalid {} id: '{}'", $label, s))
                })
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match RawId::deserialize(deserializer)? {
                    RawId::Number(n) => Ok(Self(n)),
                    RawId::Text(s) => s.parse().map_err(serde::de::Error::custom),
                }
            }
        }
    };
}

define_id!(
    /// Server-assigned user identity
    UserId,
    "user"
);

define_id!(
    /// Server-assigned donation identity
    DonationId,
    "donation"
);

// ============================================================================
// Role
// ============================================================================

/// Account role as understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account
    #[default]
    #[serde(alias = "USER", alias = "User")]
    User,
    /// Administrator
    #[serde(alias = "ADMIN", alias = "Admin")]
    Admin,
}

impl Role {
    /// All roles, in the order they are offered in forms
    pub fn all() -> &'static [Role] {
        &[Role::User, Role::Admin]
    }

    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Label used in forms and tables
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(AdminError::validation(format!(
                "Unknown role '{}', expected 'user' or 'admin'",
                other
            ))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_id_accepts_number_and_string() {
        let from_number: DonationId = serde_json::from_str("1").unwrap();
        let from_string: DonationId = serde_json::from_str("\"1\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.value(), 1);
    }

    #[test]
    fn test_id_serializes_as_number() {
        let id = UserId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn test_id_rejects_non_numeric_string() {
        let result: Result<UserId, _> = serde_json::from_str("\"abc\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_id_from_str() {
        assert_eq!(" 12 ".parse::<UserId>().unwrap(), UserId::new(12));
        let err = "x1".parse::<DonationId>().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Invalid donation id: 'x1'");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert!(role.is_admin());
    }
}
