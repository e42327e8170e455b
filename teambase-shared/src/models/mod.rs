/// Database models for Teambase
///
/// All models take their database handle explicitly (`&PgPool` or a
/// transaction's executor) — there is no shared type-level session state.
/// Every model carries the base columns `created` and `deleted`; read
/// paths filter `deleted = FALSE` by default, so a soft-deleted row
/// disappears from the application without losing its storage.
///
/// # Models
///
/// - `user`: accounts and login identity
/// - `team`: resource-sharing groups
/// - `team_member`: user-team join entity with its own status and role

pub mod team;
pub mod team_member;
pub mod user;
