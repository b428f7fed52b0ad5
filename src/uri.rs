//! Enrollment URIs for authenticator apps.

use crate::secret::Secret;

/// Builds the URI an authenticator app scans to enroll a secret.
///
/// The format is `otpauth://totp/{username}@{host}?secret={base32}`. Authenticator apps parse
/// this exact shape, so the components are inserted verbatim; callers are responsible for
/// passing a username and host that need no escaping. The app assumes the default parameters
/// (SHA1, 30-second steps, 6 digits).
///
/// # Examples
///
/// ```
/// use rfc_6238::{enrollment_uri, Secret};
///
/// let secret = Secret::from_bytes(b"12345678901234567890");
/// assert_eq!(
///     enrollment_uri("alice", "example.com", &secret),
///     "otpauth://totp/alice@example.com?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"
/// );
/// ```
pub fn enrollment_uri(username: &str, host: &str, secret: &Secret) -> String {
    format!(
        "otpauth://totp/{}@{}?secret={}",
        username,
        host,
        secret.to_base32()
    )
}
