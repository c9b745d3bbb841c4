//! Operation → required permission table

use crate::types::{FileOperation, Permission};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps each guarded file operation to the permission token it requires
///
/// Deserializes from a partial table; operations left out keep their
/// default token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<FileOperation, Permission>",
    into = "BTreeMap<FileOperation, Permission>"
)]
pub struct OperationPolicy {
    create: Permission,
    read: Permission,
    write: Permission,
    delete: Permission,
}

impl Default for OperationPolicy {
    fn default() -> Self {
        Self {
            create: Permission::from("crear"),
            read: Permission::from("leer"),
            write: Permission::from("escribir"),
            delete: Permission::from("eliminar"),
        }
    }
}

impl OperationPolicy {
    pub fn new(
        create: impl Into<Permission>,
        read: impl Into<Permission>,
        write: impl Into<Permission>,
        delete: impl Into<Permission>,
    ) -> Self {
        Self {
            create: create.into(),
            read: read.into(),
            write: write.into(),
            delete: delete.into(),
        }
    }

    /// Token required to perform the operation
    pub fn required(&self, operation: FileOperation) -> &Permission {
        match operation {
            FileOperation::Create => &self.create,
            FileOperation::Read => &self.read,
            FileOperation::Write => &self.write,
            FileOperation::Delete => &self.delete,
        }
    }

    /// Replace the token for one operation
    pub fn with(mut self, operation: FileOperation, permission: impl Into<Permission>) -> Self {
        let slot = match operation {
            FileOperation::Create => &mut self.create,
            FileOperation::Read => &mut self.read,
            FileOperation::Write => &mut self.write,
            FileOperation::Delete => &mut self.delete,
        };
        *slot = permission.into();
        self
    }
}

impl From<BTreeMap<FileOperation, Permission>> for OperationPolicy {
    fn from(table: BTreeMap<FileOperation, Permission>) -> Self {
        table
            .into_iter()
            .fold(Self::default(), |policy, (op, permission)| policy.with(op, permission))
    }
}

impl From<OperationPolicy> for BTreeMap<FileOperation, Permission> {
    fn from(policy: OperationPolicy) -> Self {
        FileOperation::ALL
            .into_iter()
            .map(|op| (op, policy.required(op).clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_tokens() {
        let policy = OperationPolicy::default();
        assert_eq!(policy.required(FileOperation::Create).as_str(), "crear");
        assert_eq!(policy.required(FileOperation::Read).as_str(), "leer");
        assert_eq!(policy.required(FileOperation::Write).as_str(), "escribir");
        assert_eq!(policy.required(FileOperation::Delete).as_str(), "eliminar");
    }

    #[test]
    fn test_partial_table_fills_defaults() {
        let policy: OperationPolicy =
            serde_json::from_str(r#"{"read": "read", "delete": "remove"}"#).unwrap();

        assert_eq!(policy.required(FileOperation::Read).as_str(), "read");
        assert_eq!(policy.required(FileOperation::Delete).as_str(), "remove");
        assert_eq!(policy.required(FileOperation::Create).as_str(), "crear");
    }

    #[test]
    fn test_serializes_full_table() {
        let policy = OperationPolicy::new("c", "r", "w", "d");
        let value = serde_json::to_value(&policy).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"create": "c", "read": "r", "write": "w", "delete": "d"})
        );
    }

    #[test]
    fn test_unknown_operation_is_rejected() {
        let result: Result<OperationPolicy, _> = serde_json::from_str(r#"{"rename": "mv"}"#);
        assert!(result.is_err());
    }
}
