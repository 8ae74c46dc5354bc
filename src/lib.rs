//! Cryptarithm is a solver for cryptarithmetic puzzles such as
//! `SEND + MORE = MONEY`.
//!
//! Letter-to-digit assignment is modelled as a constraint satisfaction
//! problem and solved with AC-3 arc-consistency preprocessing combined with
//! backtracking search guided by variable- and value-ordering heuristics.
//!
//! # Core Concepts
//!
//! - **[`Csp`]**: the problem instance: variables, domains, constraint
//!   records, and the partial assignment the search mutates in place.
//! - **[`ConstraintKind`]**: the fixed taxonomy of puzzle constraints (digit
//!   ranges, carries, all-different, column sums) that both predicate
//!   evaluation and the propagation frontier dispatch on.
//! - **[`BacktrackingSearch`]**: the search engine, parameterized over
//!   pluggable heuristics (minimum-remaining-values and
//!   least-constraining-value by default).
//! - **[`Puzzle`]**: the frontend that validates three words and compiles
//!   them into a [`Csp`], then decodes the engine's assignment back into a
//!   letter→digit [`Solution`](puzzle::Solution).
//!
//! # Example
//!
//! ```
//! use cryptarithm::puzzle::Puzzle;
//!
//! let puzzle = Puzzle::new("SEND", "MORE", "MONEY").unwrap();
//! let solution = puzzle
//!     .solve()
//!     .unwrap()
//!     .expect("SEND + MORE = MONEY has a solution");
//!
//! let send = solution.value_of("SEND").unwrap();
//! let more = solution.value_of("MORE").unwrap();
//! let money = solution.value_of("MONEY").unwrap();
//! assert_eq!(send + more, money);
//! ```
//!
//! [`Csp`]: solver::csp::Csp
//! [`ConstraintKind`]: solver::constraint::ConstraintKind
//! [`BacktrackingSearch`]: solver::search::BacktrackingSearch
//! [`Puzzle`]: puzzle::Puzzle

pub mod error;
pub mod puzzle;
pub mod solver;
