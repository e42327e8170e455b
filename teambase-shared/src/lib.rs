//! # Teambase Shared Library
//!
//! This crate contains the data model and business logic used by the
//! Teambase API server: users, teams, and memberships; schema
//! introspection; the generic admin views; session authentication; and
//! account provisioning.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `schema`: Declarative entity definitions and column introspection
//! - `admin`: Registry and generic list/detail/update views
//! - `auth`: Password hashing, login tokens, and the session gate
//! - `account`: Transactional provisioning flows
//! - `db`: Connection pool and migrations

pub mod account;
pub mod admin;
pub mod auth;
pub mod db;
pub mod models;
pub mod schema;

/// Current version of the Teambase shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
