//! Password gate helpers

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// SHA-256 of `secret`, hex-encoded.
pub fn sha256_hex(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Constant-time equality for hex strings.
pub fn ct_eq_hex(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Compare a submitted password with the configured one.
/// Both sides are hashed first so the comparison length never depends on the input.
pub fn verify_password(submitted: &str, expected: &str) -> bool {
    ct_eq_hex(&sha256_hex(submitted), &sha256_hex(expected))
}
