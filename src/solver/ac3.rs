//! The AC-3 arc-consistency engine.
//!
//! Revision works on directed arcs `(variable, constraint)`: a candidate
//! value survives only if some combination of values for the constraint's
//! other scope variables (drawn from their current domains, or pinned to
//! their committed assignment) satisfies the predicate. The cross product is
//! enumerated lazily with an early exit on the first support, which keeps the
//! exponential worst case confined to the small scopes the puzzle produces.

use std::time::Instant;

use tracing::debug;

use crate::{
    error::Result,
    solver::{
        constraint::{ConstraintId, ConstraintKind},
        csp::{Csp, Value, Variable},
        stats::SearchStats,
        work_list::{Arc, WorkList},
    },
};

/// Enforces arc consistency, pruning domains in place.
///
/// When `arcs` is `None` the worklist is seeded with every
/// `(variable, neighbor)` pair in the problem; otherwise only the supplied
/// arcs (and whatever they transitively enqueue) are processed.
///
/// Returns `Ok(false)` when a domain wipes out or a committed assignment is
/// pruned from its own domain. Domains may be left partially pruned in that
/// case; the caller restores from its snapshot before retrying.
pub fn ac3(csp: &mut Csp, arcs: Option<Vec<Arc>>, stats: &mut SearchStats) -> Result<bool> {
    debug!(domains = ?csp.domains(), "domains before propagation");

    let mut work_list = match arcs {
        Some(arcs) => WorkList::from_arcs(arcs),
        None => {
            let mut work_list = WorkList::new();
            for &variable in csp.variables() {
                for neighbor in csp.variable_neighbors(variable) {
                    work_list.push(variable, neighbor);
                }
            }
            work_list
        }
    };

    while let Some((variable, constraint)) = work_list.pop() {
        let started = Instant::now();
        let constraint_stats = stats.constraint_stats.entry(constraint).or_default();
        constraint_stats.revisions += 1;

        let revised = revise(csp, variable, constraint)?;
        constraint_stats.time_spent_micros += started.elapsed().as_micros() as u64;

        if !revised {
            continue;
        }
        constraint_stats.prunings += 1;

        if csp.domain(variable)?.is_empty() {
            debug!(%variable, "domain wiped out");
            return Ok(false);
        }
        if let Some(committed) = csp.assigned_value(variable) {
            if !csp.domain(variable)?.contains(&committed) {
                debug!(%variable, committed, "committed value pruned from its own domain");
                return Ok(false);
            }
        }
        // The tightened domain can invalidate support in the variable's other
        // neighbor scopes.
        for neighbor in csp.variable_neighbors(variable) {
            if neighbor != constraint {
                work_list.push(variable, neighbor);
            }
        }
    }

    debug!(domains = ?csp.domains(), "domains after propagation");
    Ok(true)
}

/// Removes from `variable`'s domain every value without support in
/// `constraint`'s scope. Returns whether anything was removed.
///
/// An assigned variable contributes only its committed value, both as the
/// revision target and in the scope slots of other assigned variables.
pub fn revise(csp: &mut Csp, variable: Variable, constraint: ConstraintId) -> Result<bool> {
    let record = csp.constraint(constraint).clone();

    // Deduplicate the scope, remembering for each scope position which pool
    // it draws from; duplicate scope entries share a slot so they always see
    // the same value.
    let mut slot_variables: Vec<Variable> = Vec::new();
    let mut slots: Vec<usize> = Vec::with_capacity(record.scope.len());
    for &scoped in &record.scope {
        let slot = match slot_variables.iter().position(|&v| v == scoped) {
            Some(existing) => existing,
            None => {
                slot_variables.push(scoped);
                slot_variables.len() - 1
            }
        };
        slots.push(slot);
    }

    let candidates: Vec<Value> = match csp.assigned_value(variable) {
        Some(committed) => vec![committed],
        None => csp.domain(variable)?.iter().copied().collect(),
    };

    let mut revised = false;
    for candidate in candidates {
        let mut pools: Vec<Vec<Value>> = Vec::with_capacity(slot_variables.len());
        for &slot_variable in &slot_variables {
            if slot_variable == variable {
                pools.push(vec![candidate]);
            } else if let Some(committed) = csp.assigned_value(slot_variable) {
                pools.push(vec![committed]);
            } else {
                pools.push(csp.domain(slot_variable)?.iter().copied().collect());
            }
        }
        if !has_support(&record.kind, &slots, &pools)? {
            csp.remove_value(variable, candidate)?;
            revised = true;
        }
    }
    Ok(revised)
}

/// Walks the cross product of the pools, scope-ordered via `slots`, until a
/// combination satisfies the predicate.
///
/// All-different takes a dedicated path: its support is exactly an injective
/// choice of values, one per slot, which an augmenting-path matching finds
/// without walking the cross product (the generic walk would visit millions
/// of tuples for a wide letter scope).
fn has_support(kind: &ConstraintKind, slots: &[usize], pools: &[Vec<Value>]) -> Result<bool> {
    if pools.iter().any(|pool| pool.is_empty()) {
        return Ok(false);
    }
    if *kind == ConstraintKind::AllDifferent {
        // A repeated scope variable can never satisfy all-different: both
        // positions always carry the same value.
        if slots.len() > pools.len() {
            return Ok(false);
        }
        return Ok(distinct_assignment_exists(pools));
    }
    let mut indices = vec![0usize; pools.len()];
    loop {
        let values: Vec<Value> = slots
            .iter()
            .map(|&slot| pools[slot][indices[slot]])
            .collect();
        if kind.satisfied(&values)? {
            return Ok(true);
        }
        // Advance the odometer, last pool fastest.
        let mut position = pools.len();
        loop {
            if position == 0 {
                return Ok(false);
            }
            position -= 1;
            indices[position] += 1;
            if indices[position] < pools[position].len() {
                break;
            }
            indices[position] = 0;
        }
    }
}

/// True when every pool can be assigned its own value with no value shared (a
/// system of distinct representatives), found via augmenting paths.
fn distinct_assignment_exists(pools: &[Vec<Value>]) -> bool {
    let mut values: Vec<Value> = pools.iter().flatten().copied().collect();
    values.sort_unstable();
    values.dedup();

    fn augment(
        slot: usize,
        pools: &[Vec<Value>],
        values: &[Value],
        owner: &mut [Option<usize>],
        visited: &mut [bool],
    ) -> bool {
        for value in &pools[slot] {
            let Ok(index) = values.binary_search(value) else {
                continue;
            };
            if visited[index] {
                continue;
            }
            visited[index] = true;
            let can_take = match owner[index] {
                None => true,
                Some(previous) => augment(previous, pools, values, owner, visited),
            };
            if can_take {
                owner[index] = Some(slot);
                return true;
            }
        }
        false
    }

    let mut owner: Vec<Option<usize>> = vec![None; values.len()];
    for slot in 0..pools.len() {
        let mut visited = vec![false; values.len()];
        if !augment(slot, pools, &values, &mut owner, &mut visited) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::{constraint::ConstraintKind, csp::{Csp, Variable}, stats::SearchStats};

    fn letter(c: char) -> Variable {
        Variable::Letter(c)
    }

    /// A + B = C in a single column with a dead carry.
    fn single_column() -> Csp {
        let mut csp = Csp::new();
        for c in ['A', 'B', 'C'] {
            csp.add_variable(letter(c), 0..=9);
        }
        csp.add_constraint(ConstraintKind::Digit, vec![letter('A')]);
        csp.add_constraint(ConstraintKind::Digit, vec![letter('B')]);
        csp.add_constraint(ConstraintKind::MostSignificantDigit, vec![letter('C')]);
        csp.add_constraint(
            ConstraintKind::AllDifferent,
            vec![letter('A'), letter('B'), letter('C')],
        );
        csp.add_constraint(
            ConstraintKind::FirstColumnSum,
            vec![letter('A'), letter('B'), letter('C'), Variable::Carry(1)],
        );
        csp.add_variable(Variable::Carry(1), [0]);
        csp.add_constraint(ConstraintKind::Carry, vec![Variable::Carry(1)]);
        csp
    }

    #[test]
    fn revise_prunes_unsupported_values() {
        let mut csp = single_column();
        let column = 4;

        // With B pinned to 7 and the carry dead, A + 7 must stay a digit.
        csp.assign(letter('B'), 7);
        assert!(revise(&mut csp, letter('A'), column).unwrap());
        assert_eq!(
            csp.domain(letter('A')).unwrap().iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn revise_uses_the_committed_value_for_assigned_targets() {
        let mut csp = single_column();
        let column = 4;
        csp.assign(letter('A'), 9);
        csp.assign(letter('B'), 7);

        // 9 + 7 = 16 needs a carry, but c1 is pinned to 0: the committed
        // value loses support and is pruned from A's own domain.
        assert!(revise(&mut csp, letter('A'), column).unwrap());
        assert!(!csp.domain(letter('A')).unwrap().contains(&9));
        // Only the committed value was considered; the rest of A's domain is
        // untouched.
        assert_eq!(csp.domain(letter('A')).unwrap().len(), 9);
    }

    #[test]
    fn revise_handles_duplicate_scope_variables() {
        // A + A = B: both summand slots must take the same value.
        let mut csp = Csp::new();
        csp.add_variable(letter('A'), 0..=9);
        csp.add_variable(letter('B'), 0..=9);
        csp.add_variable(Variable::Carry(1), [0]);
        let column = csp.add_constraint(
            ConstraintKind::FirstColumnSum,
            vec![letter('A'), letter('A'), letter('B'), Variable::Carry(1)],
        );

        assert!(revise(&mut csp, letter('A'), column).unwrap());
        // 2A must stay a digit.
        assert_eq!(
            csp.domain(letter('A')).unwrap().iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn ac3_reports_wipeout() {
        let mut csp = Csp::new();
        csp.add_variable(letter('A'), 0..=9);
        csp.add_variable(letter('B'), [9]);
        csp.add_variable(Variable::Carry(1), [0]);
        csp.add_constraint(ConstraintKind::Digit, vec![letter('A')]);
        let column = csp.add_constraint(
            ConstraintKind::ColumnSum,
            vec![Variable::Carry(1), letter('A'), Variable::Carry(1), letter('B')],
        );
        // A = 0 + 9 - 10 * 0 has support (A = 9); shrink A so nothing works.
        csp.remove_value(letter('A'), 9).unwrap();

        let mut stats = SearchStats::default();
        let consistent = ac3(&mut csp, Some(vec![(letter('A'), column)]), &mut stats).unwrap();
        assert!(!consistent);
        assert!(csp.domain(letter('A')).unwrap().is_empty());
    }

    #[test]
    fn ac3_reports_pruned_committed_assignment() {
        let mut csp = single_column();
        let column = 4;
        csp.assign(letter('A'), 9);
        csp.assign(letter('B'), 7);

        let mut stats = SearchStats::default();
        let consistent = ac3(&mut csp, Some(vec![(letter('A'), column)]), &mut stats).unwrap();
        assert!(!consistent);
    }

    #[test]
    fn ac3_full_pass_is_idempotent() {
        let mut csp = single_column();
        let mut stats = SearchStats::default();
        assert!(ac3(&mut csp, None, &mut stats).unwrap());
        let pruned = csp.domains().clone();

        assert!(ac3(&mut csp, None, &mut stats).unwrap());
        assert_eq!(csp.domains(), &pruned);
    }

    #[test]
    fn all_different_support_requires_an_injective_choice() {
        // A, B, C all confined to {1, 2}: no value of A leaves distinct
        // values for B and C.
        let mut csp = Csp::new();
        for c in ['A', 'B', 'C'] {
            csp.add_variable(letter(c), [1, 2]);
        }
        let alldiff = csp.add_constraint(
            ConstraintKind::AllDifferent,
            vec![letter('A'), letter('B'), letter('C')],
        );

        assert!(revise(&mut csp, letter('A'), alldiff).unwrap());
        assert!(csp.domain(letter('A')).unwrap().is_empty());
    }

    #[test]
    fn all_different_support_survives_when_values_suffice() {
        let mut csp = Csp::new();
        for c in ['A', 'B', 'C'] {
            csp.add_variable(letter(c), [1, 2, 3]);
        }
        let alldiff = csp.add_constraint(
            ConstraintKind::AllDifferent,
            vec![letter('A'), letter('B'), letter('C')],
        );

        assert!(!revise(&mut csp, letter('A'), alldiff).unwrap());
        assert_eq!(csp.domain(letter('A')).unwrap().len(), 3);
    }

    #[test]
    fn all_different_over_a_repeated_variable_never_holds() {
        let mut csp = Csp::new();
        csp.add_variable(letter('A'), 0..=9);
        let alldiff =
            csp.add_constraint(ConstraintKind::AllDifferent, vec![letter('A'), letter('A')]);

        assert!(revise(&mut csp, letter('A'), alldiff).unwrap());
        assert!(csp.domain(letter('A')).unwrap().is_empty());
    }
}
