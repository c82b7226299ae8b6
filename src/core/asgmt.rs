//! Defines `Asgmt`, the assignment of a numeral to a location.

use super::{loc::*, num::*};
use std::fmt;

/// An assignment: a numeral written in a location.  Also stands for the
/// possibility of such a write, as when it is eliminated.
///
/// Orders by numeral, then location.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Asgmt {
  pub num: Num,
  pub loc: Loc,
}

impl Asgmt {
  /// How many distinct assignments there are.
  pub const COUNT: usize = Num::COUNT * Loc::COUNT;

  /// Makes a new Asgmt.
  pub const fn new(num: Num, loc: Loc) -> Self {
    Asgmt { num, loc }
  }

  /// A dense index in 0..COUNT, numeral-major.
  pub const fn index(self) -> usize {
    self.num.index() * Loc::COUNT + self.loc.index()
  }
}

impl fmt::Display for Asgmt {
  /// Prints as (r, c)=n.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}={}", self.loc, self.num)
  }
}

impl fmt::Debug for Asgmt {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}={:?}", self.loc, self.num)
  }
}
