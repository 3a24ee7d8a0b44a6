//! Well-known role names carried in access-token claims.

/// Super-admin: manages templates, domains and tenants.
pub const ROLE_ADMIN: &str = "admin";

/// Site owner: builds and publishes their own tenant's pages.
pub const ROLE_OWNER: &str = "owner";

/// Returns `true` if the role may mutate a tenant's pages and components.
pub fn can_edit_site(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_OWNER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owners_and_admins_can_edit() {
        assert!(can_edit_site(ROLE_OWNER));
        assert!(can_edit_site(ROLE_ADMIN));
    }

    #[test]
    fn other_roles_cannot_edit() {
        assert!(!can_edit_site("viewer"));
        assert!(!can_edit_site(""));
        assert!(!can_edit_site("ADMIN"));
    }
}
