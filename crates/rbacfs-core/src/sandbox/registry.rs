//! Role registry and permission resolution

use crate::error::{Error, RegistryError, Result};
use crate::types::{Permission, Role};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// In-memory registry of roles and user role assignments
///
/// Owns both the role → permission-set map and the user → role-list map.
/// Effective permissions are recomputed on every query, so a redefined
/// role is visible to every holder on their next check.
#[derive(Debug, Default)]
pub struct AccessControlRegistry {
    /// Role definitions keyed by name
    roles: HashMap<String, Role>,
    /// Assigned role names per user, in assignment order
    users: HashMap<String, Vec<String>>,
    /// Trim and lowercase tokens on define and check
    normalize_tokens: bool,
}

impl AccessControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that trims and lowercases permission tokens
    pub fn with_normalization() -> Self {
        Self {
            normalize_tokens: true,
            ..Self::default()
        }
    }

    pub fn normalizes_tokens(&self) -> bool {
        self.normalize_tokens
    }

    /// Define a role, replacing any existing role of the same name
    pub fn define_role<I, P>(&mut self, name: impl Into<String>, permissions: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        let mut role = Role::new(name, permissions);
        if self.normalize_tokens {
            role.permissions = role.permissions.iter().map(Permission::normalized).collect();
        }

        info!("Defined role '{}' with permissions: {:?}", role.name, role.sorted_permissions());

        self.roles.insert(role.name.clone(), role);
    }

    /// Append a role to a user's role list, creating the user if needed
    pub fn assign_role(&mut self, user: &str, role: &str) -> Result<()> {
        if !self.roles.contains_key(role) {
            warn!("Cannot assign '{}' to '{}': role does not exist", role, user);
            return Err(Error::Registry(RegistryError::RoleNotFound(role.to_string())));
        }

        self.users
            .entry(user.to_string())
            .or_default()
            .push(role.to_string());

        info!("Assigned role '{}' to user '{}'", role, user);
        Ok(())
    }

    /// Union of the permission sets of every role assigned to the user
    ///
    /// Unknown users resolve to the empty set. Role names that no longer
    /// resolve contribute nothing.
    pub fn effective_permissions(&self, user: &str) -> HashSet<Permission> {
        let mut permissions = HashSet::new();

        let Some(assigned) = self.users.get(user) else {
            return permissions;
        };

        for role_name in assigned {
            if let Some(role) = self.roles.get(role_name) {
                permissions.extend(role.permissions.iter().cloned());
            }
        }

        permissions
    }

    /// Whether any of the user's roles grants the permission
    pub fn has_permission(&self, user: &str, permission: &str) -> bool {
        let wanted = if self.normalize_tokens {
            Permission::from(permission).normalized()
        } else {
            Permission::from(permission)
        };

        let granted = self.effective_permissions(user).contains(&wanted);
        debug!("Permission check: user={} permission={} granted={}", user, wanted, granted);
        granted
    }

    /// Look up a role by name
    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    /// All roles sorted by name
    pub fn roles(&self) -> Vec<&Role> {
        let mut roles: Vec<&Role> = self.roles.values().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        roles
    }

    /// Role names assigned to a user, or `None` for an unknown user
    pub fn roles_of(&self, user: &str) -> Option<&[String]> {
        self.users.get(user).map(Vec::as_slice)
    }

    pub fn user_exists(&self, user: &str) -> bool {
        self.users.contains_key(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn perms(tokens: &[&str]) -> HashSet<Permission> {
        tokens.iter().map(|t| Permission::from(*t)).collect()
    }

    #[test]
    fn test_single_role_resolves_to_its_permissions() {
        let mut registry = AccessControlRegistry::new();
        registry.define_role("admin", ["crear", "leer", "escribir", "eliminar"]);
        registry.assign_role("root", "admin").unwrap();

        assert_eq!(
            registry.effective_permissions("root"),
            perms(&["crear", "leer", "escribir", "eliminar"])
        );
    }

    #[test]
    fn test_multiple_roles_union() {
        let mut registry = AccessControlRegistry::new();
        registry.define_role("reader", ["leer"]);
        registry.define_role("janitor", ["eliminar", "leer"]);
        registry.assign_role("bob", "reader").unwrap();
        registry.assign_role("bob", "janitor").unwrap();

        assert_eq!(
            registry.effective_permissions("bob"),
            perms(&["leer", "eliminar"])
        );
    }

    #[test]
    fn test_assign_missing_role_fails_without_mutation() {
        let mut registry = AccessControlRegistry::new();
        registry.define_role("reader", ["leer"]);
        registry.assign_role("carol", "reader").unwrap();

        for _ in 0..2 {
            let err = registry.assign_role("carol", "nonexistent-role").unwrap_err();
            assert!(err.is_role_not_found());
            assert_eq!(registry.roles_of("carol"), Some(&["reader".to_string()][..]));
        }

        // A failed assignment never materializes a new user
        assert!(registry.assign_role("dave", "nonexistent-role").is_err());
        assert!(!registry.user_exists("dave"));
    }

    #[test]
    fn test_unknown_user_has_no_permissions() {
        let mut registry = AccessControlRegistry::new();
        registry.define_role("admin", ["crear"]);

        assert!(registry.effective_permissions("ghost").is_empty());
        assert!(!registry.has_permission("ghost", "crear"));
        assert!(!registry.has_permission("ghost", "anything"));
    }

    #[test]
    fn test_redefine_role_overwrites_and_is_visible_immediately() {
        let mut registry = AccessControlRegistry::new();
        registry.define_role("editor", ["leer", "escribir"]);
        registry.assign_role("alice", "editor").unwrap();
        assert!(registry.has_permission("alice", "escribir"));

        registry.define_role("editor", ["leer", "crear"]);

        assert_eq!(registry.effective_permissions("alice"), perms(&["leer", "crear"]));
        assert!(!registry.has_permission("alice", "escribir"));
    }

    #[test]
    fn test_duplicate_assignment_is_kept() {
        let mut registry = AccessControlRegistry::new();
        registry.define_role("reader", ["leer"]);
        registry.assign_role("erin", "reader").unwrap();
        registry.assign_role("erin", "reader").unwrap();

        assert_eq!(registry.roles_of("erin").map(|r| r.len()), Some(2));
        assert_eq!(registry.effective_permissions("erin"), perms(&["leer"]));
    }

    #[test]
    fn test_tokens_are_exact_without_normalization() {
        let mut registry = AccessControlRegistry::new();
        registry.define_role("reader", ["Leer"]);
        registry.assign_role("frank", "reader").unwrap();

        assert!(registry.has_permission("frank", "Leer"));
        assert!(!registry.has_permission("frank", "leer"));
    }

    #[test]
    fn test_normalization_trims_and_folds_case() {
        let mut registry = AccessControlRegistry::with_normalization();
        registry.define_role("reader", [" Leer "]);
        registry.assign_role("grace", "reader").unwrap();

        assert!(registry.has_permission("grace", "LEER"));
        assert_eq!(registry.effective_permissions("grace"), perms(&["leer"]));
    }

    #[test]
    fn test_roles_sorted_by_name() {
        let mut registry = AccessControlRegistry::new();
        registry.define_role("viewer", ["leer"]);
        registry.define_role("admin", ["crear"]);

        let names: Vec<&str> = registry.roles().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["admin", "viewer"]);
        assert!(registry.role("admin").is_some());
        assert!(registry.role("missing").is_none());
    }
}
