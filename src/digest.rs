//! HMAC algorithms and dynamic truncation.

use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;

use ring::hmac;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// HMAC hash function used to derive codes.
///
/// [RFC 4226][4226] prescribes HMAC-SHA1. [RFC 6238][6238] extends TOTP to HMAC-SHA256 and
/// HMAC-SHA512. SHA1 remains the default because it is the only algorithm every authenticator
/// app supports.
///
/// Algorithm names parse case-insensitively, with or without an `Hmac` prefix and separators, so
/// `"SHA1"`, `"sha-256"` and `"HmacSHA512"` are all accepted. Any other name is an
/// [`Error::InvalidConfig`].
///
/// [4226]: https://datatracker.ietf.org/doc/html/rfc4226
/// [6238]: https://datatracker.ietf.org/doc/html/rfc6238
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum Algorithm {
    /// HMAC-SHA1.
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl Algorithm {
    /// Canonical upper-case name (`SHA1`, `SHA256` or `SHA512`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }

    fn hmac_algorithm(self) -> hmac::Algorithm {
        match self {
            Self::Sha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            Self::Sha256 => hmac::HMAC_SHA256,
            Self::Sha512 => hmac::HMAC_SHA512,
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Sha1
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;
    fn from_str(name: &str) -> Result<Self> {
        let upper: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        match upper.strip_prefix("HMAC").unwrap_or(upper.as_str()) {
            "SHA1" => Ok(Self::Sha1),
            "SHA256" => Ok(Self::Sha256),
            "SHA512" => Ok(Self::Sha512),
            _ => Err(Error::invalid_config(format!(
                "unsupported HMAC algorithm `{}`",
                name
            ))),
        }
    }
}

impl TryFrom<String> for Algorithm {
    type Error = Error;
    fn try_from(name: String) -> Result<Self> {
        name.parse()
    }
}

impl Serialize for Algorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// HMAC digest of a moving factor.
pub struct Digest(hmac::Tag);

impl Digest {
    /// Computes `HMAC(key, counter)`, with the counter serialized as an eight-byte big-endian
    /// unsigned integer (RFC 4226 §5.2).
    pub fn compute(algorithm: Algorithm, key: &[u8], counter: u64) -> Self {
        let key = hmac::Key::new(algorithm.hmac_algorithm(), key);
        Self(hmac::sign(&key, &counter.to_be_bytes()))
    }

    /// Dynamic truncation of the digest to a 31-bit integer ([RFC 4226 §5.3][4226]).
    ///
    /// Every supported algorithm produces at least 20 bytes, so the four bytes selected by the
    /// low nibble of the last byte (offset at most 15) are always in range.
    ///
    /// [4226]: https://datatracker.ietf.org/doc/html/rfc4226#section-5.3
    pub fn truncate(&self) -> u32 {
        truncate(self.0.as_ref())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

fn truncate(digest: &[u8]) -> u32 {
    let len = digest.len();
    debug_assert!(len >= 20);
    // Use the four lowest-order bits of the digest to calculate the offset
    let index = usize::from(digest[len - 1] & 0xf);
    let bytes = [
        // Strip leading bit to remove signed/unsigned ambiguity
        digest[index] & 0x7f,
        digest[index + 1],
        digest[index + 2],
        digest[index + 3],
    ];
    u32::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_section_5_4() {
        let digest = [
            0x1f, 0x86, 0x98, 0x69, 0x0e, 0x02, 0xca, 0x16, 0x61, 0x85, 0x50, 0xef, 0x7f, 0x19,
            0xda, 0x8e, 0x94, 0x5b, 0x55, 0x5a,
        ];
        assert_eq!(truncate(&digest), 0x50ef7f19);
        assert_eq!(truncate(&digest) % 1_000_000, 872921);
    }

    #[test]
    fn truncate_masks_high_bit() {
        let mut digest = [0xff_u8; 20];
        digest[19] = 0xf0;
        assert_eq!(truncate(&digest), 0x7fff_ffff);
    }

    #[test]
    fn digest_lengths() {
        let key = b"12345678901234567890";
        assert_eq!(Digest::compute(Algorithm::Sha1, key, 0).as_ref().len(), 20);
        assert_eq!(Digest::compute(Algorithm::Sha256, key, 0).as_ref().len(), 32);
        assert_eq!(Digest::compute(Algorithm::Sha512, key, 0).as_ref().len(), 64);
    }

    #[test]
    fn parse_algorithm_names() {
        assert_eq!("SHA1".parse::<Algorithm>(), Ok(Algorithm::Sha1));
        assert_eq!("sha1".parse::<Algorithm>(), Ok(Algorithm::Sha1));
        assert_eq!("HmacSHA1".parse::<Algorithm>(), Ok(Algorithm::Sha1));
        assert_eq!("SHA-256".parse::<Algorithm>(), Ok(Algorithm::Sha256));
        assert_eq!("hmac-sha512".parse::<Algorithm>(), Ok(Algorithm::Sha512));
        assert!(matches!(
            "MD5".parse::<Algorithm>(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            "HmacSHA384".parse::<Algorithm>(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn default_algorithm_is_sha1() {
        assert_eq!(Algorithm::default(), Algorithm::Sha1);
        assert_eq!(Algorithm::Sha256.to_string(), "SHA256");
    }
}
