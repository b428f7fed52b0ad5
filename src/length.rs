//! Validated one-time code lengths.

use core::convert::TryFrom;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// Index is the number of digits
const DIGITS_POWER: [u32; 9] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
];

/// Number of decimal digits in a generated code.
///
/// The reference implementation in [RFC 6238][6238] reduces the truncated HMAC value modulo a
/// power of ten taken from a table covering 10^0 through 10^8, so codes of 1 through 8 digits are
/// representable. `Digits` can only hold a value in that range; out-of-range lengths are rejected
/// with [`Error::InvalidConfig`] when the `Digits` is built, never when a code is generated.
///
/// Standard authenticator apps display 6 digits, which is the [`Default`].
///
/// [6238]: https://datatracker.ietf.org/doc/html/rfc6238
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digits(u8);

impl Digits {
    /// Shortest allowed code length.
    pub const MIN: u8 = 1;
    /// Longest allowed code length.
    pub const MAX: u8 = 8;
    /// Six-digit codes.
    pub const SIX: Digits = Digits(6);
    /// Eight-digit codes, as used by the RFC 6238 test vectors.
    pub const EIGHT: Digits = Digits(8);

    /// Validates a code length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] unless `Digits::MIN <= digits <= Digits::MAX`.
    pub fn new(digits: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&digits) {
            Ok(Self(digits))
        } else {
            Err(Error::invalid_config(format!(
                "digits must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                digits
            )))
        }
    }

    /// The code length as a plain integer.
    pub const fn get(self) -> u8 {
        self.0
    }

    pub(crate) fn modulus(self) -> u32 {
        DIGITS_POWER[usize::from(self.0)]
    }

    pub(crate) fn width(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for Digits {
    fn default() -> Self {
        Self::SIX
    }
}

impl TryFrom<u8> for Digits {
    type Error = Error;
    fn try_from(digits: u8) -> Result<Self> {
        Self::new(digits)
    }
}

impl From<Digits> for u8 {
    fn from(digits: Digits) -> Self {
        digits.0
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
