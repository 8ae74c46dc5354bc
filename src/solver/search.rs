use tracing::debug;

use crate::{
    error::Result,
    solver::{
        ac3::ac3,
        csp::{Assignment, Csp},
        heuristics::{
            value::{LeastConstrainingValueHeuristic, ValueOrderingHeuristic},
            variable::{MinimumRemainingValuesHeuristic, VariableSelectionHeuristic},
        },
        stats::SearchStats,
        work_list::Arc,
    },
};

/// Depth-first backtracking search with pluggable variable and value
/// heuristics and incremental arc-consistency propagation after every
/// committed assignment.
///
/// The search owns the CSP's mutable state for its whole run: each recursion
/// level snapshots the domain map before propagating a trial value and
/// restores it before handing control back, so a failed branch leaves no
/// residue.
pub struct BacktrackingSearch {
    variable_heuristic: Box<dyn VariableSelectionHeuristic>,
    value_heuristic: Box<dyn ValueOrderingHeuristic>,
}

impl BacktrackingSearch {
    pub fn new(
        variable_heuristic: Box<dyn VariableSelectionHeuristic>,
        value_heuristic: Box<dyn ValueOrderingHeuristic>,
    ) -> Self {
        Self {
            variable_heuristic,
            value_heuristic,
        }
    }

    /// Attempts to solve the problem.
    ///
    /// Runs a full arc-consistency pass over the whole constraint graph to
    /// prune early, then searches. Returns the complete assignment (letters
    /// and carry slots) when one satisfies every constraint, or `None` when
    /// the space is exhausted; exhaustion is a normal outcome, not an error.
    pub fn solve(&self, csp: &mut Csp) -> Result<(Option<Assignment>, SearchStats)> {
        let mut stats = SearchStats::default();
        if !ac3(csp, None, &mut stats)? {
            return Ok((None, stats));
        }
        let solution = self.search(csp, &mut stats)?;
        Ok((solution, stats))
    }

    fn search(&self, csp: &mut Csp, stats: &mut SearchStats) -> Result<Option<Assignment>> {
        stats.nodes_visited += 1;

        if csp.is_complete() {
            return Ok(Some(csp.assignment().clone()));
        }

        let Some(variable) = self.variable_heuristic.select_variable(csp) else {
            return Ok(Some(csp.assignment().clone()));
        };

        for value in self.value_heuristic.order_values(csp, variable)? {
            if !csp.is_consistent(variable, value)? {
                continue;
            }
            debug!(%variable, value, "trying assignment");
            csp.assign(variable, value);

            // Re-check only the arcs this assignment can tighten: the
            // variable against each neighbor scope that still has unassigned
            // variables.
            let arcs: Vec<Arc> = csp
                .variable_neighbors(variable)
                .into_iter()
                .filter(|&neighbor| !csp.scope_fully_assigned(neighbor))
                .map(|neighbor| (variable, neighbor))
                .collect();

            let snapshot = csp.snapshot_domains();
            if ac3(csp, Some(arcs), stats)? && csp.domain(variable)?.contains(&value) {
                if let Some(solution) = self.search(csp, stats)? {
                    return Ok(Some(solution));
                }
            }

            debug!(%variable, value, "assignment failed, backtracking");
            csp.unassign(variable);
            csp.restore_domains(snapshot);
            stats.backtracks += 1;
        }

        Ok(None)
    }
}

impl Default for BacktrackingSearch {
    fn default() -> Self {
        Self::new(
            Box::new(MinimumRemainingValuesHeuristic),
            Box::new(LeastConstrainingValueHeuristic),
        )
    }
}
