//! Access decisions for ownership- and role-gated actions.
//!
//! Pure functions: no store, no crypto. Callers resolve whatever the action
//! refers to (for example the owner's email) before asking.

use crate::auth::models::{AuthenticatedPrincipal, Role};
use crate::errors::{ServiceError, ServiceResult};

/// An action a principal wants to perform.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    /// Delete the account whose owner authenticates as `owner_email`.
    DeleteAccount { owner_email: &'a str },
    /// Anything reserved to administrators.
    Administer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotOwner,
    NotAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    /// `Ok(())` on allow, `PermissionDenied` otherwise.
    pub fn into_result(self) -> ServiceResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::NotOwner) => Err(ServiceError::permission_denied(
                "Only the account owner may perform this action",
            )),
            Decision::Deny(DenyReason::NotAdmin) => Err(ServiceError::permission_denied(
                "Administrator role required",
            )),
        }
    }
}

/// Decide whether `principal` may perform `action`.
///
/// Ownership is compared by email, the credential the principal logged in
/// with. Admins get no bypass on ownership checks.
pub fn authorize(principal: &AuthenticatedPrincipal, action: Action<'_>) -> Decision {
    match action {
        Action::DeleteAccount { owner_email } => {
            if principal.email == owner_email {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotOwner)
            }
        }
        Action::Administer => match principal.role {
            Role::Admin => Decision::Allow,
            Role::Regular => Decision::Deny(DenyReason::NotAdmin),
        },
    }
}
