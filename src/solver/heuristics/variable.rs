//! Heuristics for selecting which variable to branch on next.

use std::cmp::Reverse;

use tracing::debug;

use crate::solver::csp::{Csp, Variable};

/// A trait for variable-selection heuristics.
///
/// Implementors define a strategy for choosing which unassigned variable the
/// search should branch on next.
pub trait VariableSelectionHeuristic {
    /// Selects the next variable to be assigned, or `None` if every variable
    /// already carries a committed value.
    fn select_variable(&self, csp: &Csp) -> Option<Variable>;
}

/// Selects the unassigned variable with the fewest remaining domain values.
///
/// This is a "fail-first" strategy that prioritizes the most constrained
/// variable. Ties fall to whichever variable was registered first.
pub struct MinimumRemainingValuesHeuristic;

impl VariableSelectionHeuristic for MinimumRemainingValuesHeuristic {
    fn select_variable(&self, csp: &Csp) -> Option<Variable> {
        let choice = csp
            .variables()
            .iter()
            .filter(|&&variable| !csp.is_assigned(variable))
            .min_by_key(|&&variable| {
                csp.domains()
                    .get(&variable)
                    .map_or(usize::MAX, |domain| domain.len())
            })
            .copied();
        if let Some(variable) = choice {
            debug!(%variable, "MRV selected");
        }
        choice
    }
}

/// Selects the unassigned variable touched by the most constraints.
///
/// An alternative signal to MRV; it is not part of the default policy but can
/// be plugged into the search in its place. Ties fall to registration order.
pub struct DegreeHeuristic;

impl VariableSelectionHeuristic for DegreeHeuristic {
    fn select_variable(&self, csp: &Csp) -> Option<Variable> {
        csp.variables()
            .iter()
            .filter(|&&variable| !csp.is_assigned(variable))
            .min_by_key(|&&variable| Reverse(csp.constraints_on(variable).len()))
            .copied()
    }
}
