//! Role and user assignment types

use super::Permission;
use std::collections::HashSet;

/// A named set of permission tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub name: String,
    pub permissions: HashSet<Permission>,
}

impl Role {
    pub fn new<I, P>(name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self {
            name: name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Permission tokens sorted for display
    pub fn sorted_permissions(&self) -> Vec<&Permission> {
        let mut permissions: Vec<&Permission> = self.permissions.iter().collect();
        permissions.sort();
        permissions
    }
}
