/// Declarative entity metadata for generic admin rendering
///
/// Every persisted model describes its own schema as an [`EntityDef`]: an
/// ordered list of fields, each tagged with a [`FieldKind`]. The admin
/// layer consumes this metadata through [`introspect::columns`] and never
/// inspects model types at runtime — field classification is declared once,
/// when the entity definition is built, not re-derived per call.
///
/// # Field kinds
///
/// - `Column`: a field backed by exactly one column of the entity's table
///   (plain value, primary key, or foreign key — flags on the column).
/// - `CompositeColumn`: a field backed by several candidate columns, e.g.
///   a property spanning a joined table. Introspection resolves the single
///   candidate belonging to the entity's own table.
/// - `Relationship`: a to-one reference to another entity, exposed in the
///   admin UI through the related entity's display label instead of the
///   raw foreign key value.
///
/// # Example
///
/// ```
/// use teambase_shared::schema::{BackingColumn, EntityDef, FieldDef, FieldKind};
///
/// let def = EntityDef {
///     name: "team",
///     table: "teams",
///     fields: vec![
///         FieldDef {
///             name: "id",
///             kind: FieldKind::Column(BackingColumn {
///                 table: "teams",
///                 sql_type: "bigint",
///                 primary_key: true,
///                 foreign_key: false,
///             }),
///         },
///         FieldDef {
///             name: "owner",
///             kind: FieldKind::Relationship {
///                 target_table: "users",
///                 target_pk: "id",
///                 fk_column: "owner_id",
///                 label_column: "name",
///             },
///         },
///     ],
/// };
///
/// assert_eq!(def.primary_key_columns(), vec!["id"]);
/// ```

use serde::{Deserialize, Serialize};

pub mod introspect;

pub use introspect::columns;

/// One physical column that may back a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackingColumn {
    /// Table the column belongs to
    pub table: &'static str,

    /// Semantic SQL type (e.g. "bigint", "varchar", "smallint")
    pub sql_type: &'static str,

    /// Whether the column is part of the table's primary key
    pub primary_key: bool,

    /// Whether the column backs a foreign key
    pub foreign_key: bool,
}

/// Declarative classification of a persisted field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Many-to-one reference to another entity
    Relationship {
        /// Table of the related entity
        target_table: &'static str,

        /// Primary key column on the target table (the join key)
        target_pk: &'static str,

        /// Foreign key column on this entity's table
        fk_column: &'static str,

        /// Column on the target table used as the display label
        label_column: &'static str,
    },

    /// Field backed by a single column of the entity's table
    Column(BackingColumn),

    /// Field backed by several candidate columns (composite key / join)
    CompositeColumn(Vec<BackingColumn>),
}

/// One declared field of an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name (also the column name for `Column` fields)
    pub name: &'static str,

    /// Declared kind
    pub kind: FieldKind,
}

/// Schema definition of a persisted entity
///
/// Field order is declaration order and is the order the admin UI renders
/// columns in — introspection output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDef {
    /// Entity name used in admin URLs (e.g. "user", "team")
    pub name: &'static str,

    /// Backing table name
    pub table: &'static str,

    /// Declared fields, in declaration order
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Returns the names of the primary key columns, in declaration order.
    ///
    /// A single-column key yields one name; composite keys yield the
    /// corresponding tuple of names.
    pub fn primary_key_columns(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter_map(|f| match &f.kind {
                FieldKind::Column(c) if c.primary_key => Some(f.name),
                _ => None,
            })
            .collect()
    }

    /// Looks up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Metadata describing one field of an entity for generic UI rendering
///
/// Produced on demand by [`introspect::columns`]; a read model over entity
/// metadata, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Field name
    pub name: String,

    /// Semantic SQL type; `None` for relationships
    pub sql_type: Option<String>,

    /// Whether the field is (part of) the entity's primary key
    pub is_primary_key: bool,

    /// Whether the field is a to-one relationship
    pub is_relationship: bool,

    /// Whether the listing may be sorted by this field
    pub is_sortable: bool,
}
