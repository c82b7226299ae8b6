//! Error types.
//!
//! Contradictions on the board are never errors: they are recorded in the
//! marks and reported as insights.  These errors mean a caller asked for
//! something its own inputs can't support.

use crate::core::Asgmt;
use thiserror::Error;

/// Caller misuse detected by the marks or the insight constructors.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
  #[error("no recorded insight eliminates {0}")]
  Unjustified(Asgmt),
  #[error("an antecedent candidate list is empty")]
  EmptyJustification,
  #[error("no recorded insight assigns {0}")]
  NoAssignmentInsight(Asgmt),
  #[error("{0} has already been applied")]
  AlreadyApplied(Asgmt),
  #[error("an implication needs at least one antecedent")]
  NoAntecedents,
  #[error("a disproved assignment must end in an error, not {0}")]
  NotAnError(String),
}

/// Failure to parse a `Grid` from a string.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseGridError {
  #[error("more than 81 locations")]
  TooManyLocations,
  #[error("only {0} locations, need 81")]
  TooFewLocations(usize),
}
