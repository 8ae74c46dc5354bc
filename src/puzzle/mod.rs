//! The puzzle frontend: validates three words, compiles them into a [`Csp`],
//! and decodes the engine's assignment back into a letter→digit solution.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{PuzzleError, Result},
    solver::{
        constraint::ConstraintKind,
        csp::{Assignment, Csp, Value, Variable},
        search::BacktrackingSearch,
        stats::SearchStats,
    },
};

/// A cryptarithmetic addition puzzle: `summand1 + summand2 = sum`, where each
/// letter stands for a distinct digit and the sum's leading letter is
/// nonzero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    summand1: String,
    summand2: String,
    sum: String,
}

impl Puzzle {
    /// Validates the words and builds a puzzle.
    ///
    /// Words must be non-empty uppercase ASCII letters. The sum may be at
    /// most one digit longer than the longer summand and no shorter than the
    /// shorter one.
    pub fn new(summand1: &str, summand2: &str, sum: &str) -> Result<Self> {
        for word in [summand1, summand2, sum] {
            if word.is_empty() || !word.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(PuzzleError::NotUppercase(word.to_string()).into());
            }
        }
        if sum.len() > summand1.len().max(summand2.len()) + 1 {
            return Err(PuzzleError::SumTooLong.into());
        }
        if sum.len() < summand1.len().min(summand2.len()) {
            return Err(PuzzleError::SumTooShort.into());
        }
        Ok(Self {
            summand1: summand1.to_string(),
            summand2: summand2.to_string(),
            sum: sum.to_string(),
        })
    }

    pub fn summand1(&self) -> &str {
        &self.summand1
    }

    pub fn summand2(&self) -> &str {
        &self.summand2
    }

    pub fn sum(&self) -> &str {
        &self.sum
    }

    /// Unique letters in first-appearance order across the three words.
    pub fn letters(&self) -> Vec<char> {
        let mut letters = Vec::new();
        for c in self
            .summand1
            .chars()
            .chain(self.summand2.chars())
            .chain(self.sum.chars())
        {
            if !letters.contains(&c) {
                letters.push(c);
            }
        }
        letters
    }

    /// Compiles the puzzle into a CSP instance.
    ///
    /// Each letter becomes a variable over `0..=9` with a unary digit
    /// constraint (the sum's leading letter gets the most-significant-digit
    /// constraint instead), plus one all-different constraint over every
    /// letter. Each column (least significant first) contributes a column-sum
    /// constraint whose scope skips summand slots the right-alignment leaves
    /// empty, and a carry variable constrained to `[0, 1]` (pinned to `[0]`
    /// for the final column, which must not overflow).
    pub fn compile(&self) -> Csp {
        let letters = self.letters();
        let leading = self.sum.chars().next();

        let mut csp = Csp::new();
        for &letter in &letters {
            let variable = Variable::Letter(letter);
            csp.add_variable(variable, 0..=9);
            let kind = if Some(letter) == leading {
                ConstraintKind::MostSignificantDigit
            } else {
                ConstraintKind::Digit
            };
            csp.add_constraint(kind, vec![variable]);
        }
        csp.add_constraint(
            ConstraintKind::AllDifferent,
            letters.iter().map(|&c| Variable::Letter(c)).collect(),
        );

        let width = self.sum.chars().count();
        let left = column_letters(&self.summand1, width);
        let right = column_letters(&self.summand2, width);
        let sum_digits: Vec<char> = self.sum.chars().rev().collect();

        for (index, &s) in sum_digits.iter().enumerate() {
            let column = (index + 1) as u16;
            let carry = Variable::Carry(column);
            let sum_variable = Variable::Letter(s);

            if index == 0 {
                let mut scope = Vec::new();
                if let Some(l) = left[index] {
                    scope.push(Variable::Letter(l));
                }
                if let Some(r) = right[index] {
                    scope.push(Variable::Letter(r));
                }
                scope.push(sum_variable);
                scope.push(carry);
                csp.add_constraint(ConstraintKind::FirstColumnSum, scope);
            } else {
                let mut scope = vec![Variable::Carry(index as u16), sum_variable, carry];
                if let Some(l) = left[index] {
                    scope.push(Variable::Letter(l));
                }
                if let Some(r) = right[index] {
                    scope.push(Variable::Letter(r));
                }
                csp.add_constraint(ConstraintKind::ColumnSum, scope);
            }

            let carry_domain: &[Value] = if usize::from(column) == width {
                &[0]
            } else {
                &[0, 1]
            };
            csp.add_variable(carry, carry_domain.iter().copied());
            csp.add_constraint(ConstraintKind::Carry, vec![carry]);
        }

        csp
    }

    /// Solves the puzzle with the default MRV/LCV search.
    pub fn solve(&self) -> Result<Option<Solution>> {
        self.solve_with(&BacktrackingSearch::default())
            .map(|(solution, _)| solution)
    }

    /// Solves the puzzle with a caller-supplied search, also returning the
    /// search statistics.
    pub fn solve_with(
        &self,
        search: &BacktrackingSearch,
    ) -> Result<(Option<Solution>, SearchStats)> {
        // More than ten distinct letters cannot map to distinct digits.
        if self.letters().len() > 10 {
            debug!(puzzle = %self, "more than ten distinct letters, unsatisfiable");
            return Ok((None, SearchStats::default()));
        }
        let mut csp = self.compile();
        let (assignment, stats) = search.solve(&mut csp)?;
        Ok((assignment.map(|a| Solution::from_assignment(&a)), stats))
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = {}", self.summand1, self.summand2, self.sum)
    }
}

/// The word's letters by column (least significant first), right-aligned to
/// `width`. Columns past the word's length are `None`; letters past `width`
/// do not participate in any column.
fn column_letters(word: &str, width: usize) -> Vec<Option<char>> {
    let mut columns: Vec<Option<char>> = word.chars().rev().map(Some).collect();
    columns.truncate(width);
    columns.resize(width, None);
    columns
}

/// A letter→digit assignment for a solved puzzle. Internal carry slots are
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    digits: BTreeMap<char, Value>,
}

impl Solution {
    /// Extracts the letter digits from a complete engine assignment.
    pub fn from_assignment(assignment: &Assignment) -> Self {
        let digits = assignment
            .iter()
            .filter_map(|(variable, &value)| match variable {
                Variable::Letter(c) => Some((*c, value)),
                Variable::Carry(_) => None,
            })
            .collect();
        Self { digits }
    }

    pub fn digit(&self, letter: char) -> Option<Value> {
        self.digits.get(&letter).copied()
    }

    pub fn digits(&self) -> &BTreeMap<char, Value> {
        &self.digits
    }

    /// The numeric value of a word under this assignment, or `None` if the
    /// word contains a letter the puzzle does not.
    pub fn value_of(&self, word: &str) -> Option<Value> {
        word.chars()
            .try_fold(0, |acc, c| self.digit(c).map(|d| acc * 10 + d))
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (letter, digit) in &self.digits {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{letter}={digit}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::{Error, PuzzleError};
    use crate::solver::constraint::ConstraintKind;

    fn letter(c: char) -> Variable {
        Variable::Letter(c)
    }

    #[test]
    fn rejects_words_that_are_not_uppercase() {
        for bad in ["send", "SEN1", "SEN D", ""] {
            let err = Puzzle::new(bad, "MORE", "MONEY").unwrap_err();
            assert!(matches!(err, Error::Puzzle(PuzzleError::NotUppercase(_))));
        }
    }

    #[test]
    fn rejects_impossible_lengths() {
        let err = Puzzle::new("AB", "CD", "ABCDE").unwrap_err();
        assert!(matches!(err, Error::Puzzle(PuzzleError::SumTooLong)));

        let err = Puzzle::new("ABC", "ABC", "AB").unwrap_err();
        assert!(matches!(err, Error::Puzzle(PuzzleError::SumTooShort)));
    }

    #[test]
    fn letters_are_unique_in_first_appearance_order() {
        let puzzle = Puzzle::new("SEND", "MORE", "MONEY").unwrap();
        assert_eq!(
            puzzle.letters(),
            vec!['S', 'E', 'N', 'D', 'M', 'O', 'R', 'Y']
        );
    }

    #[test]
    fn compile_builds_one_variable_per_letter_and_column() {
        let puzzle = Puzzle::new("SEND", "MORE", "MONEY").unwrap();
        let csp = puzzle.compile();

        // 8 letters + 5 carry slots.
        assert_eq!(csp.variables().len(), 13);
        // 8 unary digit constraints + all-different + 5 column sums + 5
        // carries.
        assert_eq!(csp.constraints().len(), 19);
    }

    #[test]
    fn compile_marks_the_sum_leading_letter_as_most_significant() {
        let puzzle = Puzzle::new("SEND", "MORE", "MONEY").unwrap();
        let csp = puzzle.compile();

        let unary_m = csp.unary_constraint(letter('M')).unwrap();
        assert_eq!(
            csp.constraint(unary_m).kind,
            ConstraintKind::MostSignificantDigit
        );
        let unary_s = csp.unary_constraint(letter('S')).unwrap();
        assert_eq!(csp.constraint(unary_s).kind, ConstraintKind::Digit);
    }

    #[test]
    fn compile_pins_the_final_carry_to_zero() {
        let puzzle = Puzzle::new("SEND", "MORE", "MONEY").unwrap();
        let csp = puzzle.compile();

        for column in 1..=4u16 {
            assert_eq!(csp.domain(Variable::Carry(column)).unwrap().len(), 2);
        }
        let last = csp.domain(Variable::Carry(5)).unwrap();
        assert_eq!(last.iter().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn compile_orders_column_scopes_positionally() {
        let puzzle = Puzzle::new("SEND", "MORE", "MONEY").unwrap();
        let csp = puzzle.compile();

        let columns: Vec<_> = csp
            .constraints()
            .iter()
            .filter(|c| {
                matches!(
                    c.kind,
                    ConstraintKind::FirstColumnSum | ConstraintKind::ColumnSum
                )
            })
            .collect();
        assert_eq!(columns.len(), 5);

        // D + E = Y + 10*c1
        assert_eq!(
            columns[0].scope,
            vec![letter('D'), letter('E'), letter('Y'), Variable::Carry(1)]
        );
        // c1 + N + R = E + 10*c2
        assert_eq!(
            columns[1].scope,
            vec![
                Variable::Carry(1),
                letter('E'),
                Variable::Carry(2),
                letter('N'),
                letter('R'),
            ]
        );
        // Top column: only the carry feeds M.
        assert_eq!(
            columns[4].scope,
            vec![Variable::Carry(4), letter('M'), Variable::Carry(5)]
        );
    }

    #[test]
    fn compile_skips_summand_slots_beyond_word_length() {
        // "A" contributes to column 1 only; column 2 of the sum sees just the
        // carry chain.
        let puzzle = Puzzle::new("A", "BC", "DE").unwrap();
        let csp = puzzle.compile();

        let columns: Vec<_> = csp
            .constraints()
            .iter()
            .filter(|c| {
                matches!(
                    c.kind,
                    ConstraintKind::FirstColumnSum | ConstraintKind::ColumnSum
                )
            })
            .collect();
        assert_eq!(
            columns[0].scope,
            vec![letter('A'), letter('C'), letter('E'), Variable::Carry(1)]
        );
        assert_eq!(
            columns[1].scope,
            vec![
                Variable::Carry(1),
                letter('D'),
                Variable::Carry(2),
                letter('B'),
            ]
        );
    }

    #[test]
    fn solution_display_and_value_of() {
        let assignment: Assignment = [
            (letter('A'), 1),
            (letter('B'), 0),
            (Variable::Carry(1), 0),
        ]
        .into_iter()
        .collect();
        let solution = Solution::from_assignment(&assignment);

        assert_eq!(solution.to_string(), "A=1 B=0");
        assert_eq!(solution.value_of("AB"), Some(10));
        assert_eq!(solution.value_of("BA"), Some(1));
        assert_eq!(solution.value_of("AZ"), None);
        assert_eq!(solution.digit('A'), Some(1));
    }
}
