/// Authentication for Teambase
///
/// Three pieces: Argon2id password hashing, opaque login token
/// generation, and the session gate middleware that resolves
/// `Authorization: Bearer` credentials to users.

pub mod gate;
pub mod password;
pub mod token;

pub use gate::{bearer_token, login_required, resolve_current_user, CurrentUser, GateError};
pub use password::{hash_password, verify_password, PasswordError};
pub use token::generate_login_token;
