//! Error types.

use core::fmt;

/// Textual secret encodings understood by [`Secret`](crate::Secret).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EncodingKind {
    /// RFC 4648 Base32.
    Base32,
    /// Base16 (hexadecimal).
    Hex,
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base32 => write!(f, "Base32"),
            Self::Hex => write!(f, "hex"),
        }
    }
}

/// TOTP error type.
///
/// Every error is reported synchronously to the immediate caller. Validation of a presented code
/// never produces an error: a wrong, expired, or malformed code is simply not accepted.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The configuration is unusable (code length outside [1, 8], zero time step, unsupported
    /// algorithm name, or a zero-length secret request).
    #[error("invalid TOTP configuration: {0}")]
    InvalidConfig(String),
    /// Text handed to a secret decoder was not valid in that encoding.
    #[error("invalid {kind} secret: {reason}")]
    InvalidEncoding {
        /// The encoding that was being decoded.
        kind: EncodingKind,
        /// What was wrong with the input.
        reason: String,
    },
    /// The operating system's secure random source could not be read.
    #[error("secure random source unavailable")]
    RandomSourceUnavailable,
}

impl Error {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    pub(crate) fn invalid_encoding(kind: EncodingKind, reason: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            kind,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
