//! Core types shared across the Fresnel framework.
//!
//! This module defines the small value types that flow between the field
//! evaluator, the frequency-domain scaler and the assembly interface:
//! points, complex 3-vectors, and the frequency context supplied by the
//! host physics model.

use num_complex::Complex64;
use thiserror::Error;

/// A point in physical space (x, y, z).
pub type Point = [f64; 3];

/// A complex-valued 3-vector, ordered (x, y, z).
pub type ComplexVector = [Complex64; 3];

/// The complex zero vector.
pub const ZERO_VECTOR: ComplexVector = [Complex64::new(0.0, 0.0); 3];

/// Errors raised when the host does not provide a usable frequency.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("No frequency context is available from the physics model")]
    MissingFrequency,

    #[error("Angular frequency must be finite and non-negative (got {0})")]
    InvalidOmega(f64),
}

/// Solve frequency and the matching angular frequency.
///
/// The pair is read-only to the boundary code. Construction enforces that
/// $\omega$ is finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyContext {
    /// Frequency $f$ (Hz).
    freq: f64,
    /// Angular frequency $\omega = 2\pi f$ (rad/s).
    omega: f64,
}

impl FrequencyContext {
    /// Build a context from an explicit `(f, ω)` pair.
    pub fn new(freq: f64, omega: f64) -> Result<Self, ConfigurationError> {
        if !omega.is_finite() || omega < 0.0 {
            return Err(ConfigurationError::InvalidOmega(omega));
        }
        Ok(Self { freq, omega })
    }

    /// Build a context from a frequency, with $\omega = 2\pi f$.
    pub fn from_frequency(freq: f64) -> Result<Self, ConfigurationError> {
        Self::new(freq, 2.0 * std::f64::consts::PI * freq)
    }

    pub fn freq(&self) -> f64 {
        self.freq
    }

    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// The `(f, ω)` pair, in the order the host framework reports it.
    pub fn freq_omega(&self) -> (f64, f64) {
        (self.freq, self.omega)
    }
}
