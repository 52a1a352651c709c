//! Symbol namespace and evaluation environment.
//!
//! The namespace is captured by `Arc` when a field is resolved and is never
//! mutated afterwards, so resolved fields can be evaluated from any thread.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;

use crate::types::Point;

/// A user-supplied scalar function of position.
pub type ScalarFunction = Arc<dyn Fn(&Point) -> Complex64 + Send + Sync>;

/// A named entry in the namespace.
#[derive(Clone)]
pub enum Symbol {
    Value(Complex64),
    Function(ScalarFunction),
}

impl Symbol {
    pub fn value_at(&self, point: &Point) -> Complex64 {
        match self {
            Symbol::Value(v) => *v,
            Symbol::Function(f) => f(point),
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Symbol::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// User-defined symbols visible to field expressions.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    symbols: BTreeMap<String, Symbol>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.symbols.insert(name.into(), symbol);
    }

    pub fn with_value(mut self, name: impl Into<String>, value: Complex64) -> Self {
        self.insert(name, Symbol::Value(value));
        self
    }

    pub fn with_function<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Point) -> Complex64 + Send + Sync + 'static,
    {
        self.insert(name, Symbol::Function(Arc::new(f)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Independent-variable names plus the namespace, as owned by the physics
/// model a boundary belongs to.
#[derive(Debug, Clone)]
pub struct Environment {
    ind_vars: Vec<String>,
    namespace: Arc<Namespace>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(["x", "y", "z"], Namespace::default())
    }
}

impl Environment {
    pub fn new<I, S>(ind_vars: I, namespace: Namespace) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ind_vars: ind_vars.into_iter().map(Into::into).collect(),
            namespace: Arc::new(namespace),
        }
    }

    pub fn ind_vars(&self) -> &[String] {
        &self.ind_vars
    }

    pub fn namespace(&self) -> &Arc<Namespace> {
        &self.namespace
    }

    /// A copy of this environment with one more symbol.
    ///
    /// The namespace is copied into a new `Arc`; fields resolved earlier
    /// still see the old one.
    pub fn with_symbol(mut self, name: impl Into<String>, symbol: Symbol) -> Self {
        let mut namespace = Namespace::clone(&self.namespace);
        namespace.insert(name, symbol);
        self.namespace = Arc::new(namespace);
        self
    }

    pub fn with_ind_vars<I, S>(mut self, ind_vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ind_vars = ind_vars.into_iter().map(Into::into).collect();
        self
    }

    /// Coordinate slot bound to an independent variable, if any.
    ///
    /// Only the first three names map to coordinates.
    pub fn coordinate_index(&self, name: &str) -> Option<usize> {
        self.ind_vars
            .iter()
            .take(3)
            .position(|v| v == name)
    }
}
