//! Frequency-domain scaling of surface current sources.
//!
//! In the time-harmonic formulation the tangential curl term on a boundary
//! carrying a surface current satisfies
//!
//! $$\hat{\mathbf{n}} \times \mu^{-1} \nabla \times \mathbf{E}
//!   = -\mu^{-1} \partial_t \mathbf{B} = \frac{i\omega}{\mu} \mathbf{J}_{\text{surf}}$$
//!
//! so the weak-form residual picks up $\int \mathbf{W} \cdot (i\omega \mathbf{J}_{\text{surf}})\,d\Gamma$.
//! Moved to the right-hand side, the coefficient handed to the linear-form
//! integrator is $f \mathbf{J}(\mathbf{x})$ with $f = -i\omega$.
//!
//! Real arithmetic assemblers take the real and imaginary parts in two
//! separate passes; the two passes satisfy
//! $\text{re}(\mathbf{x}) + i\,\text{im}(\mathbf{x}) = -i\omega\mathbf{J}(\mathbf{x})$.

use num_complex::Complex64;

use crate::assembly::VectorCoefficient;
use crate::field::{ComplexVectorField, EvaluationError};
use crate::types::{ComplexVector, FrequencyContext, Point};

/// Which half of the complex system is being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    Real,
    Imaginary,
}

impl Pass {
    pub const BOTH: [Pass; 2] = [Pass::Real, Pass::Imaginary];

    pub fn from_real_flag(real: bool) -> Self {
        if real {
            Pass::Real
        } else {
            Pass::Imaginary
        }
    }

    /// Project a complex number onto this pass.
    pub fn project(self, z: Complex64) -> f64 {
        match self {
            Pass::Real => z.re,
            Pass::Imaginary => z.im,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pass::Real => "real",
            Pass::Imaginary => "imag",
        }
    }
}

/// The factor $-i\omega$.
pub fn curl_factor(omega: f64) -> Complex64 {
    Complex64::new(0.0, -omega)
}

/// Scale a raw vector by $-i\omega$ and keep the part requested by `pass`.
///
/// No special case for $\omega = 0$: the result is the zero vector.
/// `omega` must be finite and non-negative, as [`FrequencyContext`] guarantees.
pub fn scale(v: &ComplexVector, omega: f64, pass: Pass) -> [f64; 3] {
    debug_assert!(omega.is_finite() && omega >= 0.0, "invalid angular frequency {omega}");
    let fac = curl_factor(omega);
    [
        pass.project(fac * v[0]),
        pass.project(fac * v[1]),
        pass.project(fac * v[2]),
    ]
}

/// A field wrapped with the frequency-domain factor for one assembly pass.
///
/// Instances are immutable; the real and imaginary passes use two separate
/// instances sharing the same underlying field.
#[derive(Debug, Clone)]
pub struct FrequencyScaled<F> {
    field: F,
    omega: f64,
    pass: Pass,
    mu_r: f64,
}

impl<F: ComplexVectorField> FrequencyScaled<F> {
    pub fn new(field: F, omega: f64, pass: Pass) -> Self {
        debug_assert!(omega.is_finite() && omega >= 0.0, "invalid angular frequency {omega}");
        Self {
            field,
            omega,
            pass,
            mu_r: 1.0,
        }
    }

    pub fn for_context(field: F, ctx: &FrequencyContext, pass: Pass) -> Self {
        Self::new(field, ctx.omega(), pass)
    }

    /// Record the relative permeability of the adjacent medium.
    ///
    /// The value is carried with the coefficient but not applied to the
    /// scaling factor.
    pub fn with_mu_r(mut self, mu_r: f64) -> Self {
        self.mu_r = mu_r;
        self
    }

    pub fn factor(&self) -> Complex64 {
        curl_factor(self.omega)
    }

    pub fn omega(&self) -> f64 {
        self.omega
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    pub fn mu_r(&self) -> f64 {
        self.mu_r
    }

    /// The full complex value $-i\omega\mathbf{J}(\mathbf{x})$, independent of the pass.
    pub fn evaluate_complex(&self, point: &Point) -> Result<ComplexVector, EvaluationError> {
        let v = self.field.evaluate(point)?;
        let fac = self.factor();
        Ok([fac * v[0], fac * v[1], fac * v[2]])
    }
}

impl<F: ComplexVectorField> VectorCoefficient for FrequencyScaled<F> {
    fn eval(&self, point: &Point) -> Result<[f64; 3], EvaluationError> {
        let v = self.field.evaluate(point)?;
        Ok(scale(&v, self.omega, self.pass))
    }
}
