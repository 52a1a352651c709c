//! Interface to the host's right-hand-side assembly.
//!
//! Boundary conditions never integrate anything themselves. They append
//! [`BoundaryLinearForm`] entries to an [`AssemblyTarget`]; the host later
//! integrates each entry's coefficient against the test functions on the
//! boundary elements of its selection. Targets are shared by many boundaries,
//! so the only allowed operation is an append.
//!
//! [`LinearFormCollector`] is an in-memory target that records every entry and
//! can probe the accumulated source at boundary points, which is what the CLI
//! and the tests use in place of a full FE assembler.

use std::fmt;
use std::sync::Arc;

use ndarray::Array2;
use rayon::prelude::*;

use crate::field::EvaluationError;
use crate::scaling::Pass;
use crate::types::Point;

/// A real-valued vector coefficient, as consumed by linear-form integrators.
pub trait VectorCoefficient: Send + Sync {
    fn eval(&self, point: &Point) -> Result<[f64; 3], EvaluationError>;
}

/// Integrator used to turn a coefficient into load-vector entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegratorKind {
    /// $\int_\Gamma \mathbf{W} \cdot \mathbf{f}\, d\Gamma$ for vector (Nédélec) test functions.
    VectorFeDomainLf,
}

/// One boundary linear-form contribution.
#[derive(Clone)]
pub struct BoundaryLinearForm {
    /// Parameter name of the contributing boundary (e.g. `"surfJ"`).
    pub name: String,
    /// Finite-element space the contribution belongs to.
    pub field_index: usize,
    /// Boundary attributes the coefficient is restricted to.
    pub selection: Vec<usize>,
    pub integrator: IntegratorKind,
    pub pass: Pass,
    pub coefficient: Arc<dyn VectorCoefficient>,
}

impl BoundaryLinearForm {
    /// Whether boundary attribute `attribute` is inside this form's selection.
    pub fn restricts_to(&self, attribute: usize) -> bool {
        self.selection.contains(&attribute)
    }
}

impl fmt::Debug for BoundaryLinearForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryLinearForm")
            .field("name", &self.name)
            .field("field_index", &self.field_index)
            .field("selection", &self.selection)
            .field("integrator", &self.integrator)
            .field("pass", &self.pass)
            .finish_non_exhaustive()
    }
}

/// Append-only sink for boundary contributions.
pub trait AssemblyTarget {
    fn add_boundary_linear_form(&mut self, form: BoundaryLinearForm);
}

/// A point on the boundary, tagged with the attribute of its element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySample {
    pub attribute: usize,
    pub position: Point,
}

/// In-memory [`AssemblyTarget`] that keeps every registered form in order.
#[derive(Debug, Default)]
pub struct LinearFormCollector {
    forms: Vec<BoundaryLinearForm>,
}

impl AssemblyTarget for LinearFormCollector {
    fn add_boundary_linear_form(&mut self, form: BoundaryLinearForm) {
        log::trace!(
            "collector: form '{}' (kfes={}, {}) on {:?}",
            form.name,
            form.field_index,
            form.pass.label(),
            form.selection
        );
        self.forms.push(form);
    }
}

impl LinearFormCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forms(&self) -> &[BoundaryLinearForm] {
        &self.forms
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Forms registered for one field index and pass, in registration order.
    pub fn forms_for(&self, field_index: usize, pass: Pass) -> impl Iterator<Item = &BoundaryLinearForm> {
        self.forms
            .iter()
            .filter(move |f| f.field_index == field_index && f.pass == pass)
    }

    /// Evaluate the summed source of every matching form at each sample.
    ///
    /// Forms only contribute at samples whose attribute is in their
    /// selection. Contributions add; nothing is overwritten. Samples are
    /// evaluated in parallel.
    ///
    /// # Returns
    /// An `(N, 3)` array, one row per sample.
    pub fn sample(
        &self,
        field_index: usize,
        pass: Pass,
        samples: &[BoundarySample],
    ) -> Result<Array2<f64>, EvaluationError> {
        let forms: Vec<&BoundaryLinearForm> = self.forms_for(field_index, pass).collect();

        let rows: Vec<[f64; 3]> = samples
            .par_iter()
            .map(|s| -> Result<[f64; 3], EvaluationError> {
                let mut acc = [0.0; 3];
                for form in forms.iter().filter(|f| f.restricts_to(s.attribute)) {
                    let v = form.coefficient.eval(&s.position)?;
                    for c in 0..3 {
                        acc[c] += v[c];
                    }
                }
                Ok(acc)
            })
            .collect::<Result<_, EvaluationError>>()?;

        let mut out = Array2::<f64>::zeros((samples.len(), 3));
        for (i, row) in rows.iter().enumerate() {
            for c in 0..3 {
                out[[i, c]] = row[c];
            }
        }
        Ok(out)
    }
}
