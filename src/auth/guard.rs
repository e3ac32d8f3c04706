//! Authorization guard: pure allow/deny decisions, no I/O.
//!
//! Routes look the resource up first, so a missing resource surfaces as
//! `NotFound` and an authorization failure - once the resource is found -
//! always surfaces as `Forbidden`.

use uuid::Uuid;

use crate::database::models::{Role, UserPublic};
use crate::error::ApiError;

/// Gate an action on the caller holding an exact role.
pub fn require_role(principal: &UserPublic, role: Role) -> Result<(), ApiError> {
    if principal.role == role {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "Access denied. {} role required.",
            capitalize(role.as_str())
        )))
    }
}

/// Gate an action on the caller being one of the principals entitled to act
/// on the resource instance.
pub fn require_ownership(principal: &UserPublic, owner_ids: &[Uuid]) -> Result<(), ApiError> {
    if owner_ids.contains(&principal.id) {
        Ok(())
    } else {
        Err(ApiError::forbidden("Not authorized"))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> UserPublic {
        UserPublic {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            phone: None,
            role,
        }
    }

    #[test]
    fn role_gate_allows_matching_role() {
        let landlord = principal(Role::Landlord);
        assert!(require_role(&landlord, Role::Landlord).is_ok());
    }

    #[test]
    fn role_gate_denies_other_role() {
        let customer = principal(Role::Customer);
        let err = require_role(&customer, Role::Landlord).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn ownership_allows_member_of_set() {
        let caller = principal(Role::Customer);
        let other = Uuid::new_v4();
        assert!(require_ownership(&caller, &[other, caller.id]).is_ok());
    }

    #[test]
    fn ownership_denies_non_member() {
        let caller = principal(Role::Landlord);
        let err = require_ownership(&caller, &[Uuid::new_v4()]).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn ownership_denies_empty_set() {
        let caller = principal(Role::Landlord);
        assert!(require_ownership(&caller, &[]).is_err());
    }
}
