/// Admin entity registry
///
/// Holds the entities exposed through the generic admin screens, each
/// with its schema definition and per-entity include/exclude column
/// configuration. Registration order is presentation order.

use crate::schema::{columns, ColumnDescriptor, EntityDef};

/// One registered admin entity
#[derive(Debug)]
pub struct AdminEntry {
    /// Schema definition for the entity
    pub def: EntityDef,

    /// Column allowlist; empty means all columns
    pub include: Vec<&'static str>,

    /// Column denylist; always wins over include
    pub exclude: Vec<&'static str>,
}

impl AdminEntry {
    /// Column descriptors for this entity's admin screens.
    pub fn columns(&self) -> Vec<ColumnDescriptor> {
        columns(&self.def, &self.include, &self.exclude)
    }
}

/// Registry of admin-exposed entities
#[derive(Debug, Default)]
pub struct AdminRegistry {
    entries: Vec<AdminEntry>,
}

impl AdminRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity with its column configuration.
    pub fn register(
        &mut self,
        def: EntityDef,
        include: Vec<&'static str>,
        exclude: Vec<&'static str>,
    ) {
        self.entries.push(AdminEntry { def, include, exclude });
    }

    /// Looks up an entry by entity name.
    pub fn get(&self, name: &str) -> Option<&AdminEntry> {
        self.entries.iter().find(|e| e.def.name == name)
    }

    /// Entity names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.def.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;

    #[test]
    fn test_register_and_get() {
        let mut registry = AdminRegistry::new();
        registry.register(User::entity_def(), vec![], vec!["password_hash"]);

        assert_eq!(registry.names(), vec!["user"]);
        assert!(registry.get("user").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_entry_columns_honor_exclude() {
        let mut registry = AdminRegistry::new();
        registry.register(User::entity_def(), vec![], vec!["password_hash", "login_token"]);

        let entry = registry.get("user").unwrap();
        let names: Vec<String> = entry.columns().into_iter().map(|c| c.name).collect();
        assert!(!names.contains(&"password_hash".to_string()));
        assert!(!names.contains(&"login_token".to_string()));
        assert!(names.contains(&"email".to_string()));
    }
}
