//! Authenticated user claims extracted from the identity cookie.
//!
//! Session issuance lives in an external auth collaborator; this application
//! only deserializes the claims it stored and enforces expiry and roles.

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpRequest, error::ErrorUnauthorized};
use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, UserId};

/// Claims describing the signed-in user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// User identifier, stringly-typed as issued by the auth service.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    /// Unix timestamp after which the claims are stale.
    pub exp: i64,
}

impl AuthenticatedUser {
    /// Parses the `sub` claim into a typed user identifier.
    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        let raw: i32 = self
            .sub
            .parse()
            .map_err(|_| TypeConstraintError::InvalidValue(format!("user id: {}", self.sub)))?;
        UserId::new(raw)
    }
}

/// Whether `role` appears in the user's role list.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = Identity::from_request(req, payload)
            .into_inner()
            .ok()
            .and_then(|identity| identity.id().ok())
            .and_then(|raw| serde_json::from_str::<AuthenticatedUser>(&raw).ok())
            .filter(|user| user.exp > chrono::Utc::now().timestamp());

        ready(user.ok_or_else(|| ErrorUnauthorized("authentication required")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_sub_claims() {
        let user = AuthenticatedUser {
            sub: "42".into(),
            email: "user@example.com".into(),
            name: "User".into(),
            roles: vec![],
            exp: 0,
        };
        assert_eq!(user.user_id().unwrap().get(), 42);
    }

    #[test]
    fn rejects_non_numeric_sub_claims() {
        let user = AuthenticatedUser {
            sub: "abc".into(),
            email: "user@example.com".into(),
            name: "User".into(),
            roles: vec![],
            exp: 0,
        };
        assert!(user.user_id().is_err());
    }

    #[test]
    fn check_role_matches_exactly() {
        let roles = vec!["provider".to_string()];
        assert!(check_role("provider", &roles));
        assert!(!check_role("admin", &roles));
    }
}
