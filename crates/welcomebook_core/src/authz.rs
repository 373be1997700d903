//! crates/welcomebook_core/src/authz.rs
//!
//! The role-based authorization policy.
//!
//! Only SUPER_ADMIN is operationally gated: user management, cross-tenant
//! visibility, and welcomebook transfer. ADMIN carries no extra capability
//! beyond USER here; it exists for role badges. Every check takes the acting
//! identity explicitly - there is no ambient current-user state.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::Role;

/// The authenticated identity a handler acts on behalf of.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

/// A denied authorization check. Always distinct from "not found": callers
/// resolve existence first, then ask the policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[error("{0}")]
pub struct Forbidden(pub String);

/// Operations a SUPER_ADMIN must not apply to their own account through the
/// admin endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfAction {
    Deactivate,
    ChangeRole,
    Delete,
    ResetPassword,
}

impl SelfAction {
    fn restriction(&self) -> &'static str {
        match self {
            SelfAction::Deactivate => "you cannot deactivate your own account",
            SelfAction::ChangeRole => "you cannot change your own role",
            SelfAction::Delete => "you cannot delete your own account",
            SelfAction::ResetPassword => {
                "you cannot reset your own password here; use the change-password option"
            }
        }
    }
}

/// Whether the actor may list every tenant's welcomebooks (and see owner
/// identities) rather than only their own.
pub fn can_view_all_welcomebooks(actor: &Actor) -> bool {
    actor.role.is_super_admin()
}

/// User management, password resets for other accounts, and welcomebook
/// transfer are SUPER_ADMIN only.
pub fn ensure_super_admin(actor: &Actor) -> Result<(), Forbidden> {
    if actor.role.is_super_admin() {
        Ok(())
    } else {
        Err(Forbidden("super admin privileges required".to_string()))
    }
}

/// A caller may always touch resources they own; SUPER_ADMIN may touch any.
pub fn ensure_owner_or_super_admin(actor: &Actor, owner_id: Uuid) -> Result<(), Forbidden> {
    if actor.id == owner_id || actor.role.is_super_admin() {
        Ok(())
    } else {
        Err(Forbidden(
            "you do not have permission to access this welcomebook".to_string(),
        ))
    }
}

/// Self-protection: admin endpoints may not demote, deactivate, delete, or
/// password-reset the acting account. The rejection names the restriction.
pub fn ensure_not_self(actor: &Actor, target_id: Uuid, action: SelfAction) -> Result<(), Forbidden> {
    if actor.id == target_id {
        Err(Forbidden(action.restriction().to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor::new(Uuid::new_v4(), role)
    }

    #[test]
    fn roles_are_strictly_ordered() {
        assert!(Role::SuperAdmin > Role::Admin);
        assert!(Role::Admin > Role::User);
    }

    #[test]
    fn only_super_admin_passes_the_admin_gate() {
        assert!(ensure_super_admin(&actor(Role::SuperAdmin)).is_ok());
        assert!(ensure_super_admin(&actor(Role::Admin)).is_err());
        assert!(ensure_super_admin(&actor(Role::User)).is_err());
    }

    #[test]
    fn admin_gains_nothing_over_user_for_cross_tenant_visibility() {
        assert!(can_view_all_welcomebooks(&actor(Role::SuperAdmin)));
        assert!(!can_view_all_welcomebooks(&actor(Role::Admin)));
        assert!(!can_view_all_welcomebooks(&actor(Role::User)));
    }

    #[test]
    fn owners_and_super_admins_may_touch_a_welcomebook() {
        let owner = actor(Role::User);
        assert!(ensure_owner_or_super_admin(&owner, owner.id).is_ok());
        assert!(ensure_owner_or_super_admin(&actor(Role::SuperAdmin), owner.id).is_ok());

        let stranger = actor(Role::Admin);
        assert!(ensure_owner_or_super_admin(&stranger, owner.id).is_err());
    }

    #[test]
    fn self_protection_names_the_specific_restriction() {
        let admin = actor(Role::SuperAdmin);

        let err = ensure_not_self(&admin, admin.id, SelfAction::Deactivate).unwrap_err();
        assert!(err.0.contains("deactivate"));

        let err = ensure_not_self(&admin, admin.id, SelfAction::Delete).unwrap_err();
        assert!(err.0.contains("delete"));

        let err = ensure_not_self(&admin, admin.id, SelfAction::ChangeRole).unwrap_err();
        assert!(err.0.contains("role"));

        let err = ensure_not_self(&admin, admin.id, SelfAction::ResetPassword).unwrap_err();
        assert!(err.0.contains("change-password"));
    }

    #[test]
    fn self_protection_does_not_block_other_targets() {
        let admin = actor(Role::SuperAdmin);
        assert!(ensure_not_self(&admin, Uuid::new_v4(), SelfAction::Delete).is_ok());
    }
}
