//! Heuristics for ordering the candidate values of the branching variable.

use tracing::debug;

use crate::{
    error::Result,
    solver::csp::{Csp, Value, Variable},
};

/// A trait for strategies that determine the order in which values are tried.
pub trait ValueOrderingHeuristic {
    /// The variable's remaining candidate values, in trial order.
    fn order_values(&self, csp: &Csp, variable: Variable) -> Result<Vec<Value>>;
}

/// Least-constraining-value ordering: candidates sorted ascending by
/// [`Csp::constraint_count`], preferring values that leave the most options
/// open in neighboring scopes. The sort is stable, so equally constraining
/// values keep their domain order. This is an ordering only, never a pruning
/// step.
pub struct LeastConstrainingValueHeuristic;

impl ValueOrderingHeuristic for LeastConstrainingValueHeuristic {
    fn order_values(&self, csp: &Csp, variable: Variable) -> Result<Vec<Value>> {
        let mut values: Vec<Value> = csp.domain(variable)?.iter().copied().collect();
        values.sort_by_key(|&value| csp.constraint_count(variable, value));
        debug!(%variable, ?values, "LCV ordered values");
        Ok(values)
    }
}

/// Tries values in their current domain order.
pub struct IdentityValueHeuristic;

impl ValueOrderingHeuristic for IdentityValueHeuristic {
    fn order_values(&self, csp: &Csp, variable: Variable) -> Result<Vec<Value>> {
        Ok(csp.domain(variable)?.iter().copied().collect())
    }
}
