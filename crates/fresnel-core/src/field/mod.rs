//! Vector field specification and evaluation.
//!
//! A [`VectorFieldSpec`] holds three per-axis entries (x, y, z), each either a
//! numeric constant or an expression string. Resolving the spec against an
//! [`Environment`] produces a [`VectorFieldEvaluator`], an immutable
//! [`ComplexVectorField`] that can be evaluated concurrently at any point.
//!
//! Expression text is handed to an [`ExpressionCompiler`]. The crate ships
//! [`SymbolCompiler`], which only understands literals, coordinates and
//! namespace symbols; hosts with a real expression language plug in their own
//! compiler at the same seam.

pub mod evaluator;
pub mod namespace;

use std::sync::Arc;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ComplexVector, Point};

pub use evaluator::{CompiledExpression, ExpressionCompiler, ResolvedAxis, SymbolCompiler, VectorFieldEvaluator};
pub use namespace::{Environment, Namespace, ScalarFunction, Symbol};

/// Axis labels in storage order.
pub const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

/// Errors detected while resolving a field specification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecificationError {
    #[error("Vector field needs exactly {expected} axis entries, got {found}")]
    Arity { expected: usize, found: usize },

    #[error("Invalid expression '{text}': {reason}")]
    InvalidExpression { text: String, reason: String },
}

/// Errors raised while evaluating a resolved field at a point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("Non-finite {axis} component at ({}, {}, {})", point[0], point[1], point[2])]
    NonFinite { axis: &'static str, point: Point },
}

/// Anything that yields a complex 3-vector at a point.
///
/// Implementations must be pure: the same point always gives the same value,
/// and evaluation never mutates shared state.
pub trait ComplexVectorField: Send + Sync {
    fn evaluate(&self, point: &Point) -> Result<ComplexVector, EvaluationError>;
}

impl<F: ComplexVectorField + ?Sized> ComplexVectorField for Arc<F> {
    fn evaluate(&self, point: &Point) -> Result<ComplexVector, EvaluationError> {
        (**self).evaluate(point)
    }
}

/// One axis of a [`VectorFieldSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AxisValue", into = "AxisValue")]
pub enum AxisEntry {
    Constant(Complex64),
    Expression(String),
}

impl Default for AxisEntry {
    fn default() -> Self {
        AxisEntry::Constant(Complex64::new(0.0, 0.0))
    }
}

impl From<f64> for AxisEntry {
    fn from(v: f64) -> Self {
        AxisEntry::Constant(Complex64::from(v))
    }
}

impl From<Complex64> for AxisEntry {
    fn from(v: Complex64) -> Self {
        AxisEntry::Constant(v)
    }
}

impl From<&str> for AxisEntry {
    fn from(text: &str) -> Self {
        AxisEntry::Expression(text.to_string())
    }
}

/// Persisted form of an [`AxisEntry`]: a number, a `[re, im]` pair, or text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Real(f64),
    Complex([f64; 2]),
    Text(String),
}

impl From<AxisValue> for AxisEntry {
    fn from(value: AxisValue) -> Self {
        match value {
            AxisValue::Real(v) => AxisEntry::Constant(Complex64::from(v)),
            AxisValue::Complex([re, im]) => AxisEntry::Constant(Complex64::new(re, im)),
            AxisValue::Text(text) => AxisEntry::Expression(text),
        }
    }
}

impl From<AxisEntry> for AxisValue {
    fn from(entry: AxisEntry) -> Self {
        match entry {
            AxisEntry::Constant(v) if v.im == 0.0 => AxisValue::Real(v.re),
            AxisEntry::Constant(v) => AxisValue::Complex([v.re, v.im]),
            AxisEntry::Expression(text) => AxisValue::Text(text),
        }
    }
}

/// Per-axis specification of a vector field, always (x, y, z).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<AxisEntry>", into = "Vec<AxisEntry>")]
pub struct VectorFieldSpec {
    axes: [AxisEntry; 3],
}

impl VectorFieldSpec {
    pub fn new(x: impl Into<AxisEntry>, y: impl Into<AxisEntry>, z: impl Into<AxisEntry>) -> Self {
        Self {
            axes: [x.into(), y.into(), z.into()],
        }
    }

    /// A spatially uniform field.
    pub fn constant(v: ComplexVector) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Build from an arbitrary list, rejecting anything that is not exactly
    /// three entries.
    pub fn from_entries(entries: Vec<AxisEntry>) -> Result<Self, SpecificationError> {
        let found = entries.len();
        let axes: [AxisEntry; 3] = entries
            .try_into()
            .map_err(|_| SpecificationError::Arity { expected: 3, found })?;
        Ok(Self { axes })
    }

    pub fn axes(&self) -> &[AxisEntry; 3] {
        &self.axes
    }

    /// True when every axis is a constant (the field ignores the point).
    pub fn is_constant(&self) -> bool {
        self.axes.iter().all(|a| matches!(a, AxisEntry::Constant(_)))
    }

    /// Resolve every axis once against `env`.
    ///
    /// Fails with the first [`SpecificationError`]; no partial evaluator is
    /// returned.
    pub fn resolve(
        &self,
        env: &Environment,
        compiler: &dyn ExpressionCompiler,
    ) -> Result<VectorFieldEvaluator, SpecificationError> {
        let x = ResolvedAxis::resolve(&self.axes[0], env, compiler)?;
        let y = ResolvedAxis::resolve(&self.axes[1], env, compiler)?;
        let z = ResolvedAxis::resolve(&self.axes[2], env, compiler)?;
        Ok(VectorFieldEvaluator::new([x, y, z]))
    }
}

impl TryFrom<Vec<AxisEntry>> for VectorFieldSpec {
    type Error = SpecificationError;

    fn try_from(entries: Vec<AxisEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<VectorFieldSpec> for Vec<AxisEntry> {
    fn from(spec: VectorFieldSpec) -> Self {
        spec.axes.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_is_zero() {
        let spec = VectorFieldSpec::default();
        assert!(spec.is_constant());
        for axis in spec.axes() {
            assert_eq!(*axis, AxisEntry::Constant(Complex64::new(0.0, 0.0)));
        }
    }

    #[test]
    fn test_two_entries_is_arity_error() {
        let err = VectorFieldSpec::from_entries(vec![1.0.into(), 0.0.into()]).unwrap_err();
        assert_eq!(err, SpecificationError::Arity { expected: 3, found: 2 });
    }

    #[test]
    fn test_four_entries_is_arity_error() {
        let entries = vec![AxisEntry::default(); 4];
        assert!(matches!(
            VectorFieldSpec::from_entries(entries),
            Err(SpecificationError::Arity { found: 4, .. })
        ));
    }

    #[test]
    fn test_axis_value_conversion() {
        let entry: AxisEntry = AxisValue::Complex([1.0, -2.0]).into();
        assert_eq!(entry, AxisEntry::Constant(Complex64::new(1.0, -2.0)));

        let back: AxisValue = AxisEntry::from(3.0).into();
        assert!(matches!(back, AxisValue::Real(v) if v == 3.0));

        let text: AxisEntry = AxisValue::Text("Jy".into()).into();
        assert_eq!(text, AxisEntry::Expression("Jy".into()));
    }

    #[test]
    fn test_mixed_spec_is_not_constant() {
        let spec = VectorFieldSpec::new(1.0, "x", 0.0);
        assert!(!spec.is_constant());
    }
}
