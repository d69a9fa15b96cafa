//! Short, loggable identifier for the active session key.
//!
//! The server logs it at start-up so operators can tell which key file a
//! replica loaded without the key itself reaching the logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// Lower-case hex of the first eight bytes of SHA-256 over the signing key.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use step_challenge::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fingerprint = key_fingerprint(&Key::generate());
/// assert_eq!(fingerprint.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
