/// Database layer for Teambase
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with startup health check
/// - `migrations`: embedded migration runner and test database helpers
///
/// Models live in the `models` module at crate root.

pub mod migrations;
pub mod pool;
