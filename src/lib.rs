//! Time-based one-time passwords ([RFC 6238][6238]).
//!
//! TOTP is HOTP ([RFC 4226][4226]) with a moving factor derived from the clock: the number of
//! whole time steps elapsed since an epoch offset. This crate provides:
//!
//! - [`Secret`]: generation of shared secrets and their Base32/hex encodings,
//! - [`TotpConfig`]: validated parameters (algorithm, step, code length, T0, tolerance),
//! - [`TotpEngine`]: counter derivation, code generation and validation against a window of
//!   recent time steps,
//! - [`enrollment_uri`]: the `otpauth://` URI scanned by authenticator apps.
//!
//! The default configuration is compatible with standard authenticator apps.
//!
//! ```
//! use rfc_6238::{Secret, TotpConfig, TotpEngine};
//!
//! let secret = Secret::generate().unwrap();
//! let engine = TotpEngine::new(TotpConfig::default());
//! let code = engine.generate_current_code(&secret);
//! assert!(engine.validate(&secret, code.as_str()));
//! ```
//!
//! [4226]: https://datatracker.ietf.org/doc/html/rfc4226
//! [6238]: https://datatracker.ietf.org/doc/html/rfc6238

use core::fmt;

use subtle::ConstantTimeEq;

pub mod clock;
pub mod config;
pub mod digest;
pub mod engine;
pub mod error;
pub mod length;
pub mod secret;
pub mod uri;

pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use config::{TotpConfig, TotpConfigBuilder};
pub use digest::Algorithm;
pub use engine::TotpEngine;
pub use error::{EncodingKind, Error, Result};
pub use length::Digits;
pub use secret::{Secret, SecretSize};
pub use uri::enrollment_uri;

use digest::Digest;

/// Synchronized moving factor: the number of whole time steps since the epoch offset.
pub type Counter = u64;

/// A one-time code: `digits` decimal characters, zero-padded on the left.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Code(String);

impl Code {
    fn new(value: u32, digits: Digits) -> Self {
        Self(format!("{:0width$}", value, width = digits.width()))
    }

    /// The code's decimal characters.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the code, returning its characters.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Compares a presented code against this one in constant time.
    ///
    /// Codes of a different length never match.
    pub fn matches(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Code").field(&self.0).finish()
    }
}

impl PartialEq<str> for Code {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Code {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.0
    }
}

/// Computes the "raw" HOTP value for the given secret and counter.
///
/// This is the 31-bit result of dynamic truncation; no reduction to a number of digits is
/// performed. For a code of a fixed length, see [`hotp`].
pub fn raw_hotp(algorithm: Algorithm, secret: &[u8], counter: Counter) -> u32 {
    Digest::compute(algorithm, secret, counter).truncate()
}

/// Computes an HOTP code of the desired length given a secret and counter value.
///
/// The truncated value is reduced modulo `10^digits` and rendered zero-padded, so the result
/// always has exactly `digits` characters. The same inputs always produce the same code.
pub fn hotp(algorithm: Algorithm, secret: &[u8], counter: Counter, digits: Digits) -> Code {
    Code::new(raw_hotp(algorithm, secret, counter) % digits.modulus(), digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"12345678901234567890";

    #[test]
    fn test_raw_hotp() {
        let raw = |counter| raw_hotp(Algorithm::Sha1, SECRET, counter);
        assert_eq!(raw(0), 0x4c93cf18);
        assert_eq!(raw(1), 0x41397eea);
        assert_eq!(raw(2), 0x82fef30);
        assert_eq!(raw(3), 0x66ef7655);
        assert_eq!(raw(4), 0x61c5938a);
        assert_eq!(raw(5), 0x33c083d4);
        assert_eq!(raw(6), 0x7256c032);
        assert_eq!(raw(7), 0x4e5b397);
        assert_eq!(raw(8), 0x2823443f);
        assert_eq!(raw(9), 0x2679dc69);
    }

    #[test]
    fn test_hotp() {
        let expected = [
            "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583",
            "399871", "520489",
        ];
        for (counter, code) in expected.iter().enumerate() {
            assert_eq!(
                hotp(Algorithm::Sha1, SECRET, counter as Counter, Digits::SIX),
                *code
            );
        }
    }

    #[test]
    fn codes_are_zero_padded() {
        // Counter 1 truncates to 0x41397eea = 1094287082; mod 10^2 is 82, mod 10^8 is 94287082
        assert_eq!(hotp(Algorithm::Sha1, SECRET, 1, Digits::new(2).unwrap()), "82");
        // 0x82fef30 = 137359152
        assert_eq!(hotp(Algorithm::Sha1, SECRET, 2, Digits::EIGHT), "37359152");
        assert_eq!(Code::new(7, Digits::SIX).as_str(), "000007");
        assert_eq!(Code::new(7081804, Digits::EIGHT).as_str(), "07081804");
    }

    #[test]
    fn code_length_matches_digits() {
        for n in Digits::MIN..=Digits::MAX {
            let digits = Digits::new(n).unwrap();
            for counter in 0..50 {
                let code = hotp(Algorithm::Sha256, SECRET, counter, digits);
                assert_eq!(code.as_str().len(), usize::from(n));
                assert!(code.as_str().bytes().all(|b| b.is_ascii_digit()));
            }
        }
    }

    #[test]
    fn matches_requires_exact_code() {
        let code = Code::new(287082, Digits::SIX);
        assert!(code.matches("287082"));
        assert!(!code.matches("287083"));
        assert!(!code.matches("28708"));
        assert!(!code.matches("0287082"));
        assert!(!code.matches(""));
    }
}
