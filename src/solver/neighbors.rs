//! Structural adjacency between constraint scopes.
//!
//! Adjacency mirrors the puzzle's coupling between letters, carries, and
//! column sums rather than generic constraint-graph adjacency: letters relate
//! to the column sums they appear in, carries to the columns they thread
//! through, and the all-different constraint to the letters' unary digit
//! constraints. The propagation frontier of the AC-3 pass is defined by these
//! rules, so they must hold exactly.

use crate::solver::{
    constraint::{Constraint, ConstraintId, ConstraintKind},
    csp::{Csp, Value, Variable},
};

/// True when `anchored`'s first scope variable appears anywhere in `other`'s
/// scope.
fn anchor_in(anchored: &Constraint, other: &Constraint) -> bool {
    anchored
        .scope
        .first()
        .is_some_and(|variable| other.scope.contains(variable))
}

impl Csp {
    /// Every other registered constraint structurally adjacent to the given
    /// one, in registration order.
    pub fn neighbors(&self, id: ConstraintId) -> Vec<ConstraintId> {
        use ConstraintKind::*;

        let this = self.constraint(id);
        let mut neighbors = Vec::new();
        for (other_id, other) in self.constraints().iter().enumerate() {
            if other_id == id {
                continue;
            }
            let adjacent = match (this.kind, other.kind) {
                (AllDifferent, Digit) => true,
                (Digit | MostSignificantDigit, AllDifferent) => true,
                (Digit | MostSignificantDigit, FirstColumnSum | ColumnSum) => {
                    anchor_in(this, other)
                }
                (FirstColumnSum | ColumnSum, Digit | Carry) => anchor_in(other, this),
                (Carry, FirstColumnSum | ColumnSum) => anchor_in(this, other),
                _ => false,
            };
            if adjacent {
                neighbors.push(other_id);
            }
        }
        neighbors
    }

    /// The unary constraint registered for `variable`, if any. Every variable
    /// the puzzle compiler emits carries exactly one (digit,
    /// most-significant-digit, or carry).
    pub fn unary_constraint(&self, variable: Variable) -> Option<ConstraintId> {
        self.constraints_on(variable)
            .iter()
            .copied()
            .find(|&id| self.constraint(id).scope == [variable])
    }

    /// Neighbors of the variable's unary constraint. A variable without a
    /// unary constraint has no resolvable neighbors.
    pub fn variable_neighbors(&self, variable: Variable) -> Vec<ConstraintId> {
        self.unary_constraint(variable)
            .map(|id| self.neighbors(id))
            .unwrap_or_default()
    }

    /// Counts, among the variable's neighbors, how many still hold `value` in
    /// the domain of the scope slot aligned with `variable`. Used by
    /// least-constraining-value ordering.
    pub fn constraint_count(&self, variable: Variable, value: Value) -> usize {
        let mut count = 0;
        for id in self.variable_neighbors(variable) {
            let aligned = self
                .constraint(id)
                .scope
                .iter()
                .find(|&&v| v == variable)
                .copied();
            if let Some(aligned) = aligned {
                if self
                    .domains()
                    .get(&aligned)
                    .is_some_and(|domain| domain.contains(&value))
                {
                    count += 1;
                }
            }
        }
        count
    }
}
