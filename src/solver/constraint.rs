use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SolverError},
    solver::csp::{Value, Variable},
};

pub type ConstraintId = usize;

/// The fixed taxonomy of constraint kinds the engine understands.
///
/// Both predicate evaluation and the structural neighbor rules dispatch on
/// this tag, so a constraint's behavior is fully determined by its kind and
/// the order of its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// `0 <= d <= 9` for a single letter.
    Digit,
    /// `1 <= d <= 9`; applied to the sum's leading letter instead of `Digit`.
    MostSignificantDigit,
    /// `0 <= c <= 1` for a carry slot.
    Carry,
    /// Pairwise distinct values over the whole scope.
    AllDifferent,
    /// `s1 + s2 == s + 10 * carry` over `(s1, s2, s, carry)` for the least
    /// significant column.
    FirstColumnSum,
    /// `carry_in + t1 + t2 == s + 10 * carry_out` over
    /// `(carry_in, s, carry_out, t1?, t2?)` for interior columns. Summand
    /// slots a shorter word leaves empty are simply absent from the scope.
    ColumnSum,
}

impl ConstraintKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::Digit => "Digit",
            ConstraintKind::MostSignificantDigit => "MostSignificantDigit",
            ConstraintKind::Carry => "Carry",
            ConstraintKind::AllDifferent => "AllDifferent",
            ConstraintKind::FirstColumnSum => "FirstColumnSum",
            ConstraintKind::ColumnSum => "ColumnSum",
        }
    }

    /// Evaluates the predicate over `values`, which must line up with the
    /// constraint's scope order.
    pub fn satisfied(&self, values: &[Value]) -> Result<bool> {
        match self {
            ConstraintKind::Digit => match values {
                [d] => Ok((0..=9).contains(d)),
                _ => Err(self.arity_error(values.len())),
            },
            ConstraintKind::MostSignificantDigit => match values {
                [d] => Ok((1..=9).contains(d)),
                _ => Err(self.arity_error(values.len())),
            },
            ConstraintKind::Carry => match values {
                [c] => Ok((0..=1).contains(c)),
                _ => Err(self.arity_error(values.len())),
            },
            ConstraintKind::AllDifferent => {
                let distinct: HashSet<Value> = values.iter().copied().collect();
                Ok(distinct.len() == values.len())
            }
            ConstraintKind::FirstColumnSum => match values {
                [s1, s2, s, carry] => Ok(s1 + s2 == s + 10 * carry),
                _ => Err(self.arity_error(values.len())),
            },
            ConstraintKind::ColumnSum => match values {
                [carry_in, s, carry_out, summands @ ..] if summands.len() <= 2 => {
                    Ok(carry_in + summands.iter().sum::<Value>() == s + 10 * carry_out)
                }
                _ => Err(self.arity_error(values.len())),
            },
        }
    }

    fn arity_error(&self, arity: usize) -> crate::error::Error {
        SolverError::ScopeArity {
            kind: self.name(),
            arity,
        }
        .into()
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single registered constraint: its kind plus the ordered scope the
/// predicate is evaluated over. Arity and argument order are fixed at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub scope: Vec<Variable>,
}

impl Constraint {
    pub fn new(kind: ConstraintKind, scope: Vec<Variable>) -> Self {
        Self { kind, scope }
    }

    pub fn descriptor(&self) -> ConstraintDescriptor {
        let scope = self
            .scope
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        ConstraintDescriptor {
            name: self.kind.name().to_string(),
            description: format!("{}({})", self.kind.name(), scope),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstraintDescriptor {
    pub name: String,
    pub description: String,
}
