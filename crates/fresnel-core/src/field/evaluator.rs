//! Resolution of axis entries into callable per-axis closures.

use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;

use super::namespace::Environment;
use super::{AxisEntry, ComplexVectorField, EvaluationError, SpecificationError, AXIS_NAMES};
use crate::types::{ComplexVector, Point, ZERO_VECTOR};

/// A compiled scalar expression of position.
pub type CompiledExpression = Arc<dyn Fn(&Point) -> Result<Complex64, EvaluationError> + Send + Sync>;

/// Turns expression text into a [`CompiledExpression`].
///
/// This is the seam to the host's expression language. Compilation happens
/// once per boundary, never per evaluation.
pub trait ExpressionCompiler: Send + Sync {
    fn compile(&self, text: &str, env: &Environment) -> Result<CompiledExpression, SpecificationError>;
}

/// Minimal compiler for literals, coordinates and namespace symbols.
///
/// Accepted forms:
/// - a real literal, `"1.5"` or `"-2e3"`
/// - an imaginary literal, `"2j"`
/// - an independent variable, e.g. `"x"`, evaluating to that coordinate
/// - a namespace symbol name
///
/// Symbol lookup is deferred to evaluation so an unknown name surfaces as
/// [`EvaluationError::UndefinedSymbol`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolCompiler;

impl ExpressionCompiler for SymbolCompiler {
    fn compile(&self, text: &str, env: &Environment) -> Result<CompiledExpression, SpecificationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(invalid(text, "empty expression"));
        }

        if is_numeric(text) {
            if let Ok(v) = text.parse::<f64>() {
                return Ok(literal(Complex64::from(v)));
            }
            if let Some(im) = text.strip_suffix('j').and_then(|s| s.parse::<f64>().ok()) {
                return Ok(literal(Complex64::new(0.0, im)));
            }
        }

        if !is_identifier(text) {
            return Err(invalid(
                text,
                "only literals, coordinates and namespace symbols are supported",
            ));
        }

        if let Some(i) = env.coordinate_index(text) {
            let coordinate = move |p: &Point| -> Result<Complex64, EvaluationError> { Ok(Complex64::from(p[i])) };
            return Ok(Arc::new(coordinate));
        }

        let namespace = Arc::clone(env.namespace());
        let name = text.to_string();
        Ok(Arc::new(move |p: &Point| -> Result<Complex64, EvaluationError> {
            namespace
                .get(&name)
                .map(|sym| sym.value_at(p))
                .ok_or_else(|| EvaluationError::UndefinedSymbol(name.clone()))
        }))
    }
}

fn literal(value: Complex64) -> CompiledExpression {
    Arc::new(move |_: &Point| -> Result<Complex64, EvaluationError> { Ok(value) })
}

fn invalid(text: &str, reason: &str) -> SpecificationError {
    SpecificationError::InvalidExpression {
        text: text.to_string(),
        reason: reason.to_string(),
    }
}

/// Literals start with a digit or `.`, after an optional sign. This keeps
/// names such as `inf` or `nan` out of the float parser.
fn is_numeric(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.')
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// One resolved axis.
#[derive(Clone)]
pub enum ResolvedAxis {
    Constant(Complex64),
    Compiled {
        source: String,
        expr: CompiledExpression,
    },
}

impl ResolvedAxis {
    pub fn resolve(
        entry: &AxisEntry,
        env: &Environment,
        compiler: &dyn ExpressionCompiler,
    ) -> Result<Self, SpecificationError> {
        match entry {
            AxisEntry::Constant(v) => Ok(ResolvedAxis::Constant(*v)),
            AxisEntry::Expression(text) => Ok(ResolvedAxis::Compiled {
                source: text.clone(),
                expr: compiler.compile(text, env)?,
            }),
        }
    }

    fn value_at(&self, point: &Point) -> Result<Complex64, EvaluationError> {
        match self {
            ResolvedAxis::Constant(v) => Ok(*v),
            ResolvedAxis::Compiled { expr, .. } => expr(point),
        }
    }
}

impl fmt::Debug for ResolvedAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedAxis::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            ResolvedAxis::Compiled { source, .. } => f.debug_tuple("Compiled").field(source).finish(),
        }
    }
}

/// A fully resolved vector field.
#[derive(Debug, Clone)]
pub struct VectorFieldEvaluator {
    axes: [ResolvedAxis; 3],
}

impl VectorFieldEvaluator {
    pub fn new(axes: [ResolvedAxis; 3]) -> Self {
        Self { axes }
    }
}

impl ComplexVectorField for VectorFieldEvaluator {
    fn evaluate(&self, point: &Point) -> Result<ComplexVector, EvaluationError> {
        let mut out = ZERO_VECTOR;
        for (c, axis) in self.axes.iter().enumerate() {
            let v = axis.value_at(point)?;
            if !v.re.is_finite() || !v.im.is_finite() {
                return Err(EvaluationError::NonFinite {
                    axis: AXIS_NAMES[c],
                    point: *point,
                });
            }
            out[c] = v;
        }
        Ok(out)
    }
}
