use std::collections::HashMap as StdHashMap;
use std::fmt;

use im::{HashMap, Vector};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    error::{Result, SolverError},
    solver::constraint::{Constraint, ConstraintId, ConstraintKind},
};

/// A variable in the problem: a letter drawn from one of the puzzle words, or
/// one of the carry slots introduced per column.
///
/// Variables are unique across a problem; registering the same variable twice
/// is a no-op.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Variable {
    Letter(char),
    Carry(u16),
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Letter(c) => write!(f, "{c}"),
            Variable::Carry(i) => write!(f, "c{i}"),
        }
    }
}

pub type Value = i64;
pub type Domain = Vector<Value>;
pub type Domains = HashMap<Variable, Domain>;
pub type Assignment = HashMap<Variable, Value>;

/// A constraint satisfaction problem instance.
///
/// Owns the variable list (in registration order), the current domain of each
/// variable, the registered constraints with a per-variable index, and the
/// partial assignment built up during search. Domains shrink under
/// propagation and are restored from snapshots on backtrack; the persistent
/// map makes a snapshot a cheap structural clone rather than a deep copy.
#[derive(Debug, Clone, Default)]
pub struct Csp {
    variables: Vec<Variable>,
    domains: Domains,
    constraints: Vec<Constraint>,
    by_variable: StdHashMap<Variable, Vec<ConstraintId>>,
    assignment: Assignment,
}

impl Csp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a variable with its candidate domain. Re-registering an
    /// existing variable leaves its current domain untouched.
    pub fn add_variable<I>(&mut self, variable: Variable, domain: I)
    where
        I: IntoIterator<Item = Value>,
    {
        if self.domains.contains_key(&variable) {
            return;
        }
        self.variables.push(variable);
        self.domains.insert(variable, domain.into_iter().collect());
    }

    /// Appends a constraint record and indexes it under each scope variable.
    ///
    /// Records are independent: several constraints may share a scope.
    pub fn add_constraint(&mut self, kind: ConstraintKind, scope: Vec<Variable>) -> ConstraintId {
        let id = self.constraints.len();
        for &variable in &scope {
            let ids = self.by_variable.entry(variable).or_default();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        self.constraints.push(Constraint::new(kind, scope));
        id
    }

    /// Variables in registration order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id]
    }

    /// Ids of every constraint whose scope contains `variable`, in
    /// registration order.
    pub fn constraints_on(&self, variable: Variable) -> &[ConstraintId] {
        self.by_variable
            .get(&variable)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn domain(&self, variable: Variable) -> Result<&Domain> {
        self.domains
            .get(&variable)
            .ok_or_else(|| SolverError::UnknownVariable(variable.to_string()).into())
    }

    /// Removes the first occurrence of `value` from `variable`'s domain, if
    /// present.
    pub fn remove_value(&mut self, variable: Variable, value: Value) -> Result<()> {
        let domain = self
            .domains
            .get_mut(&variable)
            .ok_or_else(|| SolverError::UnknownVariable(variable.to_string()))?;
        if let Some(index) = domain.index_of(&value) {
            domain.remove(index);
        }
        Ok(())
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn assigned_value(&self, variable: Variable) -> Option<Value> {
        self.assignment.get(&variable).copied()
    }

    pub fn is_assigned(&self, variable: Variable) -> bool {
        self.assignment.contains_key(&variable)
    }

    pub fn assign(&mut self, variable: Variable, value: Value) {
        self.assignment.insert(variable, value);
    }

    pub fn unassign(&mut self, variable: Variable) {
        self.assignment.remove(&variable);
    }

    /// True once every registered variable carries a committed value.
    pub fn is_complete(&self) -> bool {
        self.assignment.len() == self.variables.len()
    }

    /// True when every variable in the constraint's scope is assigned.
    pub fn scope_fully_assigned(&self, id: ConstraintId) -> bool {
        self.constraints[id]
            .scope
            .iter()
            .all(|variable| self.assignment.contains_key(variable))
    }

    /// Tentatively assigns `value` to `variable` and checks every constraint
    /// on `variable` whose scope is then fully assigned, in registration
    /// order. The tentative assignment is rolled back before returning on
    /// every path, so no side effect is observable.
    ///
    /// Constraints with unassigned scope variables are skipped; this is a
    /// forward-checking style partial check, with arc consistency left to the
    /// propagation pass.
    pub fn is_consistent(&mut self, variable: Variable, value: Value) -> Result<bool> {
        self.assignment.insert(variable, value);
        let verdict = self.check_fully_assigned(variable);
        self.assignment.remove(&variable);
        verdict
    }

    fn check_fully_assigned(&self, variable: Variable) -> Result<bool> {
        for &id in self.constraints_on(variable) {
            let constraint = &self.constraints[id];
            let Some(values) = constraint
                .scope
                .iter()
                .map(|v| self.assignment.get(v).copied())
                .collect::<Option<Vec<Value>>>()
            else {
                continue;
            };
            if !constraint.kind.satisfied(&values)? {
                trace!(%variable, constraint = %constraint.kind, "consistency check failed");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// A snapshot of the full domain map, to be restored on backtrack.
    pub fn snapshot_domains(&self) -> Domains {
        self.domains.clone()
    }

    pub fn restore_domains(&mut self, snapshot: Domains) {
        self.domains = snapshot;
    }
}
