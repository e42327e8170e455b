/// Login token generation
///
/// A login token is the opaque session credential stored on the user row
/// and presented by clients on every authenticated request. Tokens carry
/// no structure and no embedded claims; possession of the string is the
/// whole credential, and revocation is a single column update.

use rand::RngCore;

/// Token length in random bytes (hex-encoded to twice this length).
const TOKEN_BYTES: usize = 32;

/// Generates a new login token.
///
/// 32 bytes from the OS CSPRNG, hex-encoded to a 64-character string that
/// fits the `login_token VARCHAR(64)` column.
pub fn generate_login_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
