//! Surface current boundary source.
//!
//! On an external surface the condition is $\hat{\mathbf{n}} \times \mathbf{B} = \mathbf{J}_{\text{surf}}$;
//! on an internal surface it reads $\hat{\mathbf{n}} \times (\mathbf{B}_1 - \mathbf{B}_2) = \mathbf{J}_{\text{surf}}$.
//! Either way the boundary term of the weak form becomes a load vector
//! $\int_\Gamma \mathbf{W} \cdot (-i\omega \mathbf{J}_{\text{surf}})\, d\Gamma$, integrated with
//! [`IntegratorKind::VectorFeDomainLf`]. See [`crate::scaling`] for the
//! derivation of the factor.
//!
//! The user-facing field is resolved once when the boundary is built. Both
//! assembly passes share that resolved field through an `Arc` and differ only
//! in which half of the complex value they project out.

use std::sync::Arc;

use super::{BoundaryCondition, BoundaryError};
use crate::assembly::{AssemblyTarget, BoundaryLinearForm, IntegratorKind};
use crate::field::{
    AxisEntry, Environment, ExpressionCompiler, SpecificationError, SymbolCompiler, VectorFieldEvaluator,
    VectorFieldSpec,
};
use crate::physics::FrequencySource;
use crate::scaling::{FrequencyScaled, Pass};
use crate::types::{ConfigurationError, FrequencyContext};

/// A natural boundary condition imposing a surface current density.
#[derive(Debug, Clone)]
pub struct SurfaceCurrent {
    selection: Vec<usize>,
    spec: VectorFieldSpec,
    mu_r: f64,
    field: Arc<VectorFieldEvaluator>,
}

impl SurfaceCurrent {
    /// Parameter name under which integrators are registered.
    pub const PARAM_NAME: &'static str = "surfJ";
    /// Display label of the parameter, used in host logs.
    pub const LABEL: &'static str = "Surface J";

    /// Build a surface current on `selection`, resolving `spec` with the
    /// built-in [`SymbolCompiler`].
    pub fn new(selection: Vec<usize>, spec: VectorFieldSpec, env: &Environment) -> Result<Self, SpecificationError> {
        Self::with_compiler(selection, spec, env, &SymbolCompiler)
    }

    pub fn with_compiler(
        selection: Vec<usize>,
        spec: VectorFieldSpec,
        env: &Environment,
        compiler: &dyn ExpressionCompiler,
    ) -> Result<Self, SpecificationError> {
        let field = spec.resolve(env, compiler)?;
        Ok(Self {
            selection,
            spec,
            mu_r: 1.0,
            field: Arc::new(field),
        })
    }

    /// Build from an unchecked list of axis entries.
    pub fn from_entries(
        selection: Vec<usize>,
        entries: Vec<AxisEntry>,
        env: &Environment,
    ) -> Result<Self, SpecificationError> {
        Self::new(selection, VectorFieldSpec::from_entries(entries)?, env)
    }

    /// Relative permeability of the adjacent medium.
    ///
    /// Stored and passed to the coefficient; it does not enter the scaling.
    pub fn with_mu_r(mut self, mu_r: f64) -> Self {
        self.mu_r = mu_r;
        self
    }

    pub fn spec(&self) -> &VectorFieldSpec {
        &self.spec
    }

    pub fn mu_r(&self) -> f64 {
        self.mu_r
    }

    /// Only the first finite-element space (the electric field) receives
    /// a contribution.
    pub fn is_applicable(&self, field_index: usize) -> bool {
        field_index == 0
    }

    /// The scaled coefficient for one pass at the given frequency.
    pub fn coefficient(&self, ctx: &FrequencyContext, pass: Pass) -> FrequencyScaled<Arc<VectorFieldEvaluator>> {
        FrequencyScaled::for_context(Arc::clone(&self.field), ctx, pass).with_mu_r(self.mu_r)
    }

    /// Append this boundary's linear form for `pass` to `target`.
    ///
    /// A no-op for field indices other than 0. Fails before touching the
    /// target when no frequency is available.
    pub fn contribute(
        &self,
        physics: &dyn FrequencySource,
        target: &mut dyn AssemblyTarget,
        field_index: usize,
        pass: Pass,
    ) -> Result<(), BoundaryError> {
        if !self.is_applicable(field_index) {
            return Ok(());
        }
        log::debug!("Add LF contribution({}) {:?}", pass.label(), self.selection);

        let ctx = physics.frequency().ok_or(ConfigurationError::MissingFrequency)?;
        let coefficient = self.coefficient(&ctx, pass);

        target.add_boundary_linear_form(BoundaryLinearForm {
            name: Self::PARAM_NAME.to_string(),
            field_index,
            selection: self.selection.clone(),
            integrator: IntegratorKind::VectorFeDomainLf,
            pass,
            coefficient: Arc::new(coefficient),
        });
        Ok(())
    }
}

impl BoundaryCondition for SurfaceCurrent {
    fn name(&self) -> &str {
        Self::PARAM_NAME
    }

    fn selection(&self) -> &[usize] {
        &self.selection
    }

    fn has_lf_contribution(&self, field_index: usize) -> bool {
        self.is_applicable(field_index)
    }

    fn add_lf_contribution(
        &self,
        physics: &dyn FrequencySource,
        target: &mut dyn AssemblyTarget,
        field_index: usize,
        pass: Pass,
    ) -> Result<(), BoundaryError> {
        self.contribute(physics, target, field_index, pass)
    }
}
