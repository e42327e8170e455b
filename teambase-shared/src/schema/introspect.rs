/// Entity introspection: schema metadata to column descriptors
///
/// Turns an [`EntityDef`] into the ordered list of [`ColumnDescriptor`]s
/// that drives the generic admin table and edit form. Pure function of the
/// entity metadata: no I/O, no side effects, deterministic output order
/// (field declaration order).
///
/// # Classification rules
///
/// - Names in `exclude` are always skipped, regardless of `include`.
/// - A non-empty `include` restricts candidates to the named fields.
/// - A relationship field is reported with no semantic type, not sortable.
/// - A field backed by a foreign key column is skipped entirely — it is
///   exposed through the relationship it backs.
/// - A primary key field is reported typed but not sortable.
/// - Any other plain field is a sortable, typed column.
/// - A composite-backed field resolves to the single candidate column
///   belonging to the entity's own table; zero or multiple matches skip
///   the field.

use super::{ColumnDescriptor, EntityDef, FieldKind};

/// Enumerates an entity's fields as column descriptors.
///
/// `include` and `exclude` hold field names; an empty `include` means "all
/// fields". See the module docs for the classification rules.
///
/// # Example
///
/// ```
/// use teambase_shared::models::team::Team;
/// use teambase_shared::schema::columns;
///
/// let def = Team::entity_def();
/// let cols = columns(&def, &[], &["deleted"]);
///
/// assert!(cols.iter().all(|c| c.name != "deleted"));
/// assert!(cols.iter().any(|c| c.is_relationship));
/// ```
pub fn columns(def: &EntityDef, include: &[&str], exclude: &[&str]) -> Vec<ColumnDescriptor> {
    let mut out = Vec::new();

    for field in &def.fields {
        if exclude.contains(&field.name) {
            continue;
        }
        if !include.is_empty() && !include.contains(&field.name) {
            continue;
        }

        match &field.kind {
            FieldKind::Relationship { .. } => {
                out.push(ColumnDescriptor {
                    name: field.name.to_string(),
                    sql_type: None,
                    is_primary_key: false,
                    is_relationship: true,
                    is_sortable: false,
                });
            }
            FieldKind::Column(col) => {
                push_column(&mut out, field.name, col);
            }
            FieldKind::CompositeColumn(cols) => {
                // Resolve the single candidate column on the entity's own
                // table; anything else is a malformed mapping and the
                // field is skipped.
                let mut own = cols.iter().filter(|c| c.table == def.table);
                match (own.next(), own.next()) {
                    (Some(col), None) => push_column(&mut out, field.name, col),
                    _ => continue,
                }
            }
        }
    }

    out
}

fn push_column(out: &mut Vec<ColumnDescriptor>, name: &str, col: &super::BackingColumn) {
    // Foreign key columns are surfaced through their relationship instead.
    if col.foreign_key {
        return;
    }

    if col.primary_key {
        out.push(ColumnDescriptor {
            name: name.to_string(),
            sql_type: Some(col.sql_type.to_string()),
            is_primary_key: true,
            is_relationship: false,
            is_sortable: false,
        });
    } else {
        out.push(ColumnDescriptor {
            name: name.to_string(),
            sql_type: Some(col.sql_type.to_string()),
            is_primary_key: false,
            is_relationship: false,
            is_sortable: true,
        });
    }
}
