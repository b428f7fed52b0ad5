//! Shared secrets and their textual encodings.

use core::fmt;

use data_encoding::{Encoding, Specification, BASE32_NOPAD, HEXLOWER, HEXLOWER_PERMISSIVE};
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{EncodingKind, Error, Result};

const BASE32_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

// Unpadded RFC 4648 Base32 that ignores leftover bits in the final symbol
fn relaxed_base32() -> core::result::Result<Encoding, data_encoding::SpecificationError> {
    let mut spec = Specification::new();
    spec.symbols.push_str(BASE32_ALPHABET);
    spec.check_trailing_bits = false;
    spec.encoding()
}

/// Length presets for generated secrets.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SecretSize {
    /// 20 bytes (160 bits), the length recommended by RFC 4226 and the HMAC-SHA1 output size.
    Default,
    /// 32 bytes, the HMAC-SHA256 output size.
    Medium,
    /// 64 bytes, the HMAC-SHA512 output size.
    Large,
    /// Any other number of bytes. Zero is rejected.
    Custom(usize),
}

impl SecretSize {
    /// Number of bytes this size generates.
    pub const fn len(self) -> usize {
        match self {
            Self::Default => 20,
            Self::Medium => 32,
            Self::Large => 64,
            Self::Custom(len) => len,
        }
    }
}

impl Default for SecretSize {
    fn default() -> Self {
        Self::Default
    }
}

/// Shared secret.
///
/// As per [RFC 4226][4226], "each HOTP generator has a different and unique secret." A `Secret`
/// is an opaque, immutable byte string. Authenticator apps exchange it as RFC 4648 Base32; hex is
/// supported as an alternate transport encoding. Both round-trip exactly.
///
/// The `Debug` representation only reveals the secret's length.
///
/// [4226]: https://datatracker.ietf.org/doc/html/rfc4226
#[derive(Clone, Eq, PartialEq)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Generates a 20-byte secret from the system's secure random source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomSourceUnavailable`] if the random source cannot be read.
    pub fn generate() -> Result<Self> {
        Self::generate_with_size(SecretSize::Default)
    }

    /// Generates a secret of the given size from the system's secure random source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a zero size and [`Error::RandomSourceUnavailable`] if
    /// the random source cannot be read.
    pub fn generate_with_size(size: SecretSize) -> Result<Self> {
        Self::generate_from(&SystemRandom::new(), size)
    }

    /// Generates a secret using an existing system random source.
    ///
    /// `SystemRandom` is `Sync`, so one source may be shared between threads.
    ///
    /// # Errors
    ///
    /// See [`Secret::generate_with_size`]. [`Error::RandomSourceUnavailable`] only occurs when the
    /// operating system refuses to supply entropy, which tests cannot provoke.
    pub fn generate_from(rng: &SystemRandom, size: SecretSize) -> Result<Self> {
        let len = size.len();
        if len == 0 {
            return Err(Error::invalid_config("secret size must be positive"));
        }
        let mut bytes = vec![0; len];
        rng.fill(&mut bytes)
            .map_err(|_| Error::RandomSourceUnavailable)?;
        Ok(Self(bytes))
    }

    /// Wraps raw secret bytes.
    ///
    /// No length check is made, so an empty slice yields an empty secret (HMAC accepts it). Use
    /// [`Secret::try_from_bytes`] where a secret of positive length must be guaranteed.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self(bytes.as_ref().to_vec())
    }

    /// Wraps raw secret bytes, refusing an empty secret.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `bytes` is empty.
    pub fn try_from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self> {
        let bytes = bytes.as_ref();
        if bytes.is_empty() {
            return Err(Error::invalid_config("secret must not be empty"));
        }
        Ok(Self::from_bytes(bytes))
    }

    /// The raw secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the secret.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret has no bytes. Only possible through [`Secret::from_bytes`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encodes the secret as upper-case RFC 4648 Base32 without padding.
    pub fn to_base32(&self) -> String {
        BASE32_NOPAD.encode(&self.0)
    }

    /// Decodes a Base32 secret.
    ///
    /// Decoding accepts secrets the way authenticator apps show them: letters in either case,
    /// ASCII whitespace between groups, and optional trailing `=` padding. Bits that do not make
    /// up a whole byte at the end of the input are discarded, so any run of Base32 letters
    /// decodes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEncoding`] if the input contains characters outside the Base32
    /// alphabet or carries too few bits to form a single byte.
    pub fn from_base32(encoded: &str) -> Result<Self> {
        let compact: String = encoded
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let mut normalized = compact.trim_end_matches('=').to_ascii_uppercase();
        if let Some((position, symbol)) = normalized
            .char_indices()
            .find(|(_, c)| !BASE32_ALPHABET.contains(*c))
        {
            return Err(Error::invalid_encoding(
                EncodingKind::Base32,
                format!("invalid symbol {:?} at {}", symbol, position),
            ));
        }
        // 1, 3 or 6 trailing symbols hold no more whole bytes than one symbol fewer
        if let 1 | 3 | 6 = normalized.len() % 8 {
            normalized.pop();
        }
        let base32 = relaxed_base32()
            .map_err(|err| Error::invalid_encoding(EncodingKind::Base32, err.to_string()))?;
        let bytes = base32
            .decode(normalized.as_bytes())
            .map_err(|err| Error::invalid_encoding(EncodingKind::Base32, err.to_string()))?;
        if bytes.is_empty() {
            return Err(Error::invalid_encoding(
                EncodingKind::Base32,
                "no complete byte in input",
            ));
        }
        Ok(Self(bytes))
    }

    /// Encodes the secret as lower-case hex, two characters per byte.
    pub fn to_hex(&self) -> String {
        HEXLOWER.encode(&self.0)
    }

    /// Decodes a hex secret. Either letter case is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEncoding`] on empty or odd-length input or on non-hex characters.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(Error::invalid_encoding(EncodingKind::Hex, "empty input"));
        }
        HEXLOWER_PERMISSIVE
            .decode(encoded.as_bytes())
            .map(Self)
            .map_err(|err| Error::invalid_encoding(EncodingKind::Hex, err.to_string()))
    }
}

impl AsRef<[u8]> for Secret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Secret {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Secret {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC_SECRET: &[u8] = b"12345678901234567890";

    #[test]
    fn generate_sizes() {
        assert_eq!(Secret::generate().unwrap().len(), 20);
        assert_eq!(Secret::generate_with_size(SecretSize::Medium).unwrap().len(), 32);
        assert_eq!(Secret::generate_with_size(SecretSize::Large).unwrap().len(), 64);
        assert_eq!(Secret::generate_with_size(SecretSize::Custom(7)).unwrap().len(), 7);
    }

    #[test]
    fn generate_zero_size() {
        assert!(matches!(
            Secret::generate_with_size(SecretSize::Custom(0)),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn generated_secrets_differ() {
        let rng = SystemRandom::new();
        let a = Secret::generate_from(&rng, SecretSize::Default).unwrap();
        let b = Secret::generate_from(&rng, SecretSize::Default).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn base32_known_values() {
        let secret = Secret::from_bytes(RFC_SECRET);
        assert_eq!(secret.to_base32(), "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ");
        // RFC 4648 §10
        assert_eq!(Secret::from_bytes(b"foobar").to_base32(), "MZXW6YTBOI");
    }

    #[test]
    fn base32_relaxed_decoding() {
        let expected = Secret::from_bytes(b"foobar");
        assert_eq!(Secret::from_base32("MZXW6YTBOI").unwrap(), expected);
        assert_eq!(Secret::from_base32("mzxw6ytboi").unwrap(), expected);
        assert_eq!(Secret::from_base32("MZXW6YTBOI======").unwrap(), expected);
        assert_eq!(Secret::from_base32("mzxw 6ytb oi").unwrap(), expected);
    }

    #[test]
    fn base32_ignores_trailing_bits() {
        // 26 symbols carry 130 bits: 16 bytes plus two set leftover bits
        let secret = Secret::from_base32("77777777777777777777777777").unwrap();
        assert_eq!(secret.as_bytes(), &[0xff_u8; 16][..]);
        // A sixth symbol cannot complete a fourth byte
        assert_eq!(Secret::from_base32("MZXW6Y").unwrap(), Secret::from_bytes(b"foo"));
        assert_eq!(Secret::from_base32("mzx").unwrap(), Secret::from_bytes(b"f"));
    }

    #[test]
    fn base32_rejects_malformed() {
        for input in &["not-base32!", "", "====", "MZXW6YTB01", "MZXW6!", "A", "a ="] {
            assert!(
                matches!(
                    Secret::from_base32(input),
                    Err(Error::InvalidEncoding {
                        kind: EncodingKind::Base32,
                        ..
                    })
                ),
                "{:?} should not decode",
                input
            );
        }
    }

    #[test]
    fn try_from_bytes_rejects_empty() {
        assert!(matches!(
            Secret::try_from_bytes(b""),
            Err(Error::InvalidConfig(_))
        ));
        assert_eq!(
            Secret::try_from_bytes(RFC_SECRET).unwrap(),
            Secret::from_bytes(RFC_SECRET)
        );
        assert!(Secret::from_bytes(b"").is_empty());
    }

    #[test]
    fn hex_keeps_leading_zeros() {
        let secret = Secret::from_bytes([0x00_u8, 0x0a, 0xff]);
        assert_eq!(secret.to_hex(), "000aff");
        assert_eq!(Secret::from_hex("000aff").unwrap(), secret);
        assert_eq!(Secret::from_hex("000AFF").unwrap(), secret);
    }

    #[test]
    fn hex_rejects_malformed() {
        for input in &["abc", "zz", "", "0x0a"] {
            assert!(
                matches!(
                    Secret::from_hex(input),
                    Err(Error::InvalidEncoding {
                        kind: EncodingKind::Hex,
                        ..
                    })
                ),
                "{:?} should not decode",
                input
            );
        }
    }

    #[test]
    fn generated_secrets_round_trip() {
        for size in &[SecretSize::Default, SecretSize::Medium, SecretSize::Large] {
            let secret = Secret::generate_with_size(*size).unwrap();
            assert_eq!(Secret::from_base32(&secret.to_base32()).unwrap(), secret);
            assert_eq!(Secret::from_hex(&secret.to_hex()).unwrap(), secret);
        }
    }

    #[test]
    fn debug_hides_bytes() {
        let debug = format!("{:?}", Secret::from_bytes(RFC_SECRET));
        assert_eq!(debug, "Secret { len: 20, .. }");
    }
}
