//! Boundary conditions and their contribution protocol.
//!
//! The host assembly loop asks each boundary, per finite-element space,
//! whether it has a linear-form contribution and then asks it to add that
//! contribution once for the real pass and once for the imaginary pass.

pub mod surface_current;

use thiserror::Error;

use crate::assembly::AssemblyTarget;
use crate::field::{EvaluationError, SpecificationError};
use crate::physics::FrequencySource;
use crate::scaling::Pass;
use crate::types::ConfigurationError;

pub use surface_current::SurfaceCurrent;

/// Errors surfaced by a boundary while registering its contribution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundaryError {
    #[error("Specification error: {0}")]
    Specification(#[from] SpecificationError),

    /// Registration itself never evaluates a field. Evaluation failures
    /// surface when the host samples the registered coefficients (see
    /// [`LinearFormCollector::sample`](crate::assembly::LinearFormCollector::sample))
    /// and convert into this variant at the host's boundary.
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// A boundary condition as seen by the assembly loop.
pub trait BoundaryCondition: Send + Sync {
    /// Parameter name used for registered integrators.
    fn name(&self) -> &str;

    /// Boundary attributes this condition applies to.
    fn selection(&self) -> &[usize];

    /// Essential conditions constrain DOFs instead of adding load terms.
    fn is_essential(&self) -> bool {
        false
    }

    fn has_lf_contribution(&self, field_index: usize) -> bool;

    fn add_lf_contribution(
        &self,
        physics: &dyn FrequencySource,
        target: &mut dyn AssemblyTarget,
        field_index: usize,
        pass: Pass,
    ) -> Result<(), BoundaryError>;
}

/// Register both passes of every applicable boundary for one field index.
///
/// Stops at the first error.
///
/// # Returns
/// The number of `(boundary, pass)` registrations performed.
pub fn add_lf_contributions(
    boundaries: &[Box<dyn BoundaryCondition>],
    physics: &dyn FrequencySource,
    target: &mut dyn AssemblyTarget,
    field_index: usize,
) -> Result<usize, BoundaryError> {
    let mut count = 0;
    for bc in boundaries.iter().filter(|bc| bc.has_lf_contribution(field_index)) {
        for pass in Pass::BOTH {
            bc.add_lf_contribution(physics, target, field_index, pass)?;
            count += 1;
        }
    }
    Ok(count)
}
