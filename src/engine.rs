//! TOTP generation and validation.

use core::convert::TryFrom;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::config::TotpConfig;
use crate::secret::Secret;
use crate::{hotp, Code, Counter};

/// Generates and validates time-based one-time codes for one [`TotpConfig`].
///
/// The engine holds no mutable state. Given the same clock reading it is a pure function of its
/// inputs, and it can be shared between threads freely (it is `Send + Sync` whenever its clock
/// is).
///
/// Time is read through the [`Clock`] the engine was built with; [`TotpEngine::new`] uses the
/// system clock.
///
/// # Validation window
///
/// [`validate`](TotpEngine::validate) accepts the code for the current counter and for up to
/// [`backward_steps`](TotpConfig::backward_steps) earlier counters, most recent first. Codes
/// for future counters are never accepted: the verifying side is expected to run at or ahead
/// of the client's clock.
#[derive(Clone, Debug)]
pub struct TotpEngine<C = SystemClock> {
    config: TotpConfig,
    clock: C,
}

impl TotpEngine<SystemClock> {
    /// Creates an engine reading the system clock.
    pub fn new(config: TotpConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for TotpEngine<SystemClock> {
    fn default() -> Self {
        Self::new(TotpConfig::default())
    }
}

impl<C: Clock> TotpEngine<C> {
    /// Creates an engine reading time from `clock`.
    pub fn with_clock(config: TotpConfig, clock: C) -> Self {
        tracing::debug!(
            algorithm = %config.algorithm(),
            step_seconds = config.step_seconds(),
            digits = config.digits().get(),
            epoch_offset_seconds = config.epoch_offset_seconds(),
            backward_steps = config.backward_steps(),
            "configured TOTP engine"
        );
        Self { config, clock }
    }

    /// The parameters this engine was built with.
    pub fn config(&self) -> &TotpConfig {
        &self.config
    }

    /// The clock this engine reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Counter for a point in time: `floor((time - T0) / step)`.
    ///
    /// Times before the epoch offset map to counter 0. Sub-second precision never changes the
    /// result, since T0 and the step are whole seconds.
    pub fn counter_at(&self, time: Duration) -> Counter {
        let elapsed =
            i128::from(time.as_secs()) - i128::from(self.config.epoch_offset_seconds());
        if elapsed <= 0 {
            return 0;
        }
        // elapsed < 2^64 + 2^63, so the quotient fits a u64 for any step >= 2
        let counter = elapsed / i128::from(self.config.step_seconds());
        Counter::try_from(counter).unwrap_or(Counter::MAX)
    }

    /// Counter for the clock's current reading.
    pub fn current_counter(&self) -> Counter {
        self.counter_at(self.clock.now())
    }

    /// Code for an explicit counter.
    pub fn generate_code(&self, secret: &Secret, counter: Counter) -> Code {
        hotp(
            self.config.algorithm(),
            secret.as_bytes(),
            counter,
            self.config.digits(),
        )
    }

    /// Code for the time step containing `time`.
    pub fn generate_code_at(&self, secret: &Secret, time: Duration) -> Code {
        self.generate_code(secret, self.counter_at(time))
    }

    /// Code for the current time step.
    pub fn generate_current_code(&self, secret: &Secret) -> Code {
        self.generate_code(secret, self.current_counter())
    }

    /// Checks a presented code against the current counter and the configured number of
    /// earlier counters.
    ///
    /// Comparison is constant-time per candidate. A code of the wrong length, with non-digit
    /// characters, or from outside the window simply returns `false`.
    pub fn validate(&self, secret: &Secret, code: &str) -> bool {
        let current = self.current_counter();
        for steps_back in 0..=self.config.backward_steps() {
            let counter = match current.checked_sub(Counter::from(steps_back)) {
                Some(counter) => counter,
                None => break,
            };
            if self.generate_code(secret, counter).matches(code) {
                tracing::trace!(current, steps_back, "TOTP code accepted");
                return true;
            }
        }
        tracing::trace!(current, "TOTP code rejected");
        false
    }
}
