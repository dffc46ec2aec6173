//! Authenticated session model
//!
//! A session is written once at login and read by everything that needs the
//! current identity (request authentication, donation attribution, navigation
//! filtering). The token expiry comes from the token's own `exp` claim.

use crate::error::{AdminError, AdminResult};
use crate::models::{Contributor, LoginResponse};
use crate::types::{Role, UserId};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of the logged-in operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub username: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
}

impl AuthUser {
    /// Attribution used when this operator records a donation
    pub fn as_contributor(&self) -> Contributor {
        Contributor::new(self.id, self.name.clone())
    }
}

/// A persisted login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    /// `None` when the token carries no `exp` claim
    pub expires_at: Option<DateTime<Utc>>,
    pub is_admin: bool,
    pub user: AuthUser,
}

impl Session {
    /// Build a session from a successful login response
    pub fn from_login(response: LoginResponse) -> AdminResult<Self> {
        let expires_at = token_expiry(&response.token)?;
        let profile = response.data;
        Ok(Self {
            token: response.token,
            expires_at,
            is_admin: response.is_admin || profile.role.is_admin(),
            user: AuthUser {
                id: profile.id,
                username: profile.username,
                name: profile.name,
                email: profile.email,
                role: profile.role,
            },
        })
    }

    /// Effective role; the backend's admin flag wins over the profile role
    pub fn role(&self) -> Role {
        if self.is_admin { Role::Admin } else { self.user.role }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| now >= expiry)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<serde_json::Value>,
}

/// Read the expiry from a JWT's payload segment.
///
/// The signature is not checked; the backend does that. A token that is not
/// a three-part JWT with a JSON payload is rejected.
pub fn token_expiry(token: &str) -> AdminResult<Option<DateTime<Utc>>> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AdminError::InvalidToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AdminError::InvalidToken(format!("payload is not base64url: {}", e)))?;
    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|e| AdminError::InvalidToken(format!("payload is not JSON: {}", e)))?;

    let Some(exp) = claims.exp else {
        return Ok(None);
    };
    let seconds = exp
        .as_i64()
        .or_else(|| exp.as_f64().map(|f| f as i64))
        .or_else(|| exp.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
        .ok_or_else(|| AdminError::InvalidToken("exp claim is not numeric".to_string()))?;

    DateTime::from_timestamp(seconds, 0)
        .map(Some)
        .ok_or_else(|| AdminError::InvalidToken(format!("exp {} is out of range", seconds)))
}

// ============================================================================
// Tests
// ============================================================================
