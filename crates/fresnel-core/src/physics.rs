//! The physics-model side of the boundary interface.
//!
//! Boundaries read the solve frequency and their symbol environment from the
//! physics model that owns them. [`PhysicsModel`] is a minimal owner that
//! hosts (and the CLI) can fill in directly.

use crate::field::{Environment, Symbol};
use crate::types::{ConfigurationError, FrequencyContext};

/// Supplies the frequency of the current solve.
pub trait FrequencySource {
    /// `None` when no frequency has been configured.
    fn frequency(&self) -> Option<FrequencyContext>;
}

impl FrequencySource for FrequencyContext {
    fn frequency(&self) -> Option<FrequencyContext> {
        Some(*self)
    }
}

/// Frequency plus evaluation environment for one frequency-domain model.
#[derive(Debug, Clone, Default)]
pub struct PhysicsModel {
    frequency: Option<FrequencyContext>,
    environment: Environment,
}

impl PhysicsModel {
    /// Set the solve frequency (Hz); $\omega = 2\pi f$.
    pub fn with_frequency(mut self, freq: f64) -> Result<Self, ConfigurationError> {
        self.frequency = Some(FrequencyContext::from_frequency(freq)?);
        Ok(self)
    }

    pub fn with_context(mut self, ctx: FrequencyContext) -> Self {
        self.frequency = Some(ctx);
        self
    }

    /// Add or replace a namespace symbol.
    ///
    /// Boundaries already resolved against this model keep the namespace
    /// they captured.
    pub fn with_symbol(mut self, name: impl Into<String>, symbol: Symbol) -> Self {
        self.environment = self.environment.with_symbol(name, symbol);
        self
    }

    /// Replace the independent-variable names.
    pub fn with_ind_vars<I, S>(mut self, ind_vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environment = self.environment.with_ind_vars(ind_vars);
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }
}

impl FrequencySource for PhysicsModel {
    fn frequency(&self) -> Option<FrequencyContext> {
        self.frequency
    }
}
