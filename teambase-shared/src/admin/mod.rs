/// Generic admin screens for Teambase
///
/// A registry of entity definitions plus view builders that derive list,
/// detail, and update behavior from schema metadata, so adding an entity
/// to the admin area is one `register` call.

pub mod registry;
pub mod validate;
pub mod view;

pub use registry::{AdminEntry, AdminRegistry};
pub use view::{fetch_list, fetch_row, update_row, AdminError, AdminRow, ListView, PkValue};
