//! TOTP parameters.

use core::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::digest::Algorithm;
use crate::error::{Error, Result};
use crate::length::Digits;

/// Default time step in seconds.
pub const DEFAULT_STEP_SECONDS: u64 = 30;
/// Default number of past time steps accepted besides the current one.
pub const DEFAULT_BACKWARD_STEPS: u32 = 1;

/// Immutable, validated TOTP parameters.
///
/// The defaults (HMAC-SHA1, 30-second steps, 6 digits, T0 = 0, one backward step) are
/// compatible with standard authenticator apps.
///
/// A `TotpConfig` can only be obtained through [`TotpConfig::builder`], [`TotpConfig::new`],
/// [`Default`], or deserialization, all of which validate the parameters, so every engine is
/// built from a usable configuration.
///
/// # Examples
///
/// ```
/// use rfc_6238::{Algorithm, TotpConfig};
///
/// let config = TotpConfig::builder()
///     .algorithm(Algorithm::Sha256)
///     .digits(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.digits().get(), 8);
///
/// assert!(TotpConfig::builder().digits(9).build().is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TotpConfigBuilder")]
pub struct TotpConfig {
    algorithm: Algorithm,
    step_seconds: u64,
    digits: Digits,
    epoch_offset_seconds: i64,
    backward_steps: u32,
}

impl TotpConfig {
    /// Validates a full set of parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `digits` is outside [1, 8] or `step_seconds` is zero.
    pub fn new(
        algorithm: Algorithm,
        step_seconds: u64,
        digits: u8,
        epoch_offset_seconds: i64,
        backward_steps: u32,
    ) -> Result<Self> {
        if step_seconds == 0 {
            return Err(Error::invalid_config("step_seconds must be positive"));
        }
        Ok(Self {
            algorithm,
            step_seconds,
            digits: Digits::new(digits)?,
            epoch_offset_seconds,
            backward_steps,
        })
    }

    /// Starts from the defaults; see [`TotpConfigBuilder`].
    pub fn builder() -> TotpConfigBuilder {
        TotpConfigBuilder::default()
    }

    /// HMAC algorithm used to derive codes.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Length of one time step (the RFC's X).
    pub fn step_seconds(&self) -> u64 {
        self.step_seconds
    }

    /// Length of generated codes.
    pub fn digits(&self) -> Digits {
        self.digits
    }

    /// Unix time at which counting starts (the RFC's T0).
    pub fn epoch_offset_seconds(&self) -> i64 {
        self.epoch_offset_seconds
    }

    /// Number of past counters accepted by validation besides the current one.
    pub fn backward_steps(&self) -> u32 {
        self.backward_steps
    }
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            step_seconds: DEFAULT_STEP_SECONDS,
            digits: Digits::default(),
            epoch_offset_seconds: 0,
            backward_steps: DEFAULT_BACKWARD_STEPS,
        }
    }
}

impl TryFrom<TotpConfigBuilder> for TotpConfig {
    type Error = Error;
    fn try_from(builder: TotpConfigBuilder) -> Result<Self> {
        builder.build()
    }
}

/// Unvalidated TOTP parameters.
///
/// Also the serialized shape of [`TotpConfig`]: every field is optional and falls back to its
/// default, and unknown fields are rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TotpConfigBuilder {
    algorithm: Algorithm,
    step_seconds: u64,
    digits: u8,
    epoch_offset_seconds: i64,
    backward_steps: u32,
}

impl Default for TotpConfigBuilder {
    fn default() -> Self {
        let defaults = TotpConfig::default();
        Self {
            algorithm: defaults.algorithm,
            step_seconds: defaults.step_seconds,
            digits: defaults.digits.get(),
            epoch_offset_seconds: defaults.epoch_offset_seconds,
            backward_steps: defaults.backward_steps,
        }
    }
}

impl TotpConfigBuilder {
    #[must_use]
    pub const fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub const fn step_seconds(mut self, step_seconds: u64) -> Self {
        self.step_seconds = step_seconds;
        self
    }

    #[must_use]
    pub const fn digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    #[must_use]
    pub const fn epoch_offset_seconds(mut self, epoch_offset_seconds: i64) -> Self {
        self.epoch_offset_seconds = epoch_offset_seconds;
        self
    }

    #[must_use]
    pub const fn backward_steps(mut self, backward_steps: u32) -> Self {
        self.backward_steps = backward_steps;
        self
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// See [`TotpConfig::new`].
    pub fn build(self) -> Result<TotpConfig> {
        TotpConfig::new(
            self.algorithm,
            self.step_seconds,
            self.digits,
            self.epoch_offset_seconds,
            self.backward_steps,
        )
    }
}
