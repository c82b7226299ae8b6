//! The numerals that go in a Sudoku's locations, and sets of them.

use super::bits::{Bits, Bits9};
use super::set::Set;
use crate::define_set_operators;
use core::fmt;
use paste::paste;
use seq_macro::seq;
use std::num::NonZeroI8;

/// One of the 9 numerals that can occupy a location of a Sudoku grid.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Num(NonZeroI8);

// N1 through N9.
seq!(K in 1..=9 {
  paste! {
    pub const [<N K>]: Num = Num(unsafe {
      // Safe because K in 1..=9
      NonZeroI8::new_unchecked(K)
    });
  }
});

impl Num {
  /// How many distinct numerals there are.
  pub const COUNT: usize = 9;

  /// Makes a Num from an int in 1..=9.
  ///
  /// # Safety
  ///
  /// Callers must ensure the argument is in `1..=9`.
  pub const unsafe fn new_unchecked(num: i8) -> Self {
    Num(NonZeroI8::new_unchecked(num))
  }

  /// Makes a Num from an int, if it's in 1..=9.
  pub const fn new(num: i8) -> Option<Self> {
    if num > 0 && num <= 9 {
      // Safe because we just checked the range.
      Some(unsafe { Self::new_unchecked(num) })
    } else {
      None
    }
  }

  /// Makes a Num from an index in 0..9.
  ///
  /// # Safety
  ///
  /// Callers must ensure the argument is in `0..9`.
  pub const unsafe fn from_index_unchecked(i: usize) -> Self {
    Num::new_unchecked(i as i8 + 1)
  }

  /// Makes a Num from an index, if it's in 0..9.
  pub const fn from_index(i: usize) -> Option<Self> {
    if i < 9 {
      // Safe because we just checked the range.
      Some(unsafe { Self::from_index_unchecked(i) })
    } else {
      None
    }
  }

  /// The numeral's value, in 1..=9.
  pub const fn get(self) -> i8 {
    self.0.get()
  }

  /// The numeral's value minus 1, for indexing.
  pub const fn index(self) -> usize {
    (self.get() - 1) as usize
  }

  /// Iterates N1 through N9.
  pub fn all() -> impl Iterator<Item = Self> + Clone {
    // Safe because the range is exactly the valid values.
    (1..=9).map(|n| unsafe { Self::new_unchecked(n) })
  }

  /// The set containing just this numeral.
  pub fn as_set(self) -> NumSet {
    NumSet::singleton(self)
  }
}

impl fmt::Debug for Num {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "N{}", self.get())
  }
}

impl fmt::Display for Num {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.get())
  }
}

/// A set of `Num`s.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct NumSet(pub Bits9);

impl NumSet {
  /// The empty set.
  pub const fn new() -> Self {
    NumSet(Bits9::from_backing_int(0))
  }

  /// The set of just `num`.
  pub fn singleton(num: Num) -> Self {
    NumSet(Bits9::singleton(num.index() as i32))
  }

  /// The set of all 9 numerals.
  pub const fn all() -> Self {
    NumSet(Bits9::from_backing_int(0o777))
  }

  /// The numeral, if this set holds exactly one.
  pub fn only(self) -> Option<Num> {
    if self.len() == 1 {
      self.smallest_item()
    } else {
      None
    }
  }
}

impl FromIterator<Num> for NumSet {
  fn from_iter<I: IntoIterator<Item = Num>>(iter: I) -> Self {
    let mut set = Self::new();
    for num in iter {
      set.insert(num);
    }
    set
  }
}

/// Returns a NumSet containing the given numerals.
#[macro_export]
macro_rules! num_set {
  ($($num:expr),*) => {
    $crate::core::NumSet::from_iter([$($num),*])
  };
}

impl<'a> Set<'a> for NumSet {
  type Item = Num;
  type Bits = Bits9;

  fn bits(&self) -> &Self::Bits {
    &self.0
  }

  fn mut_bits(&mut self) -> &mut Self::Bits {
    &mut self.0
  }

  fn to_bits_value(&self, item: Self::Item) -> i32 {
    item.index() as i32
  }

  fn from_bits_value(&self, value: i32) -> Self::Item {
    // Safe because Bits9 only returns values in 0..9.
    unsafe { Num::new_unchecked((value + 1) as i8) }
  }
}

define_set_operators!(NumSet);

impl fmt::Debug for NumSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.iter()).finish()
  }
}

/// Displays the numerals run together, like `{127}`.
impl fmt::Display for NumSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{{")?;
    for num in self.iter() {
      write!(f, "{}", num)?;
    }
    write!(f, "}}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn check_eq(set: NumSet, nums: &[Num]) {
    let contents: Vec<_> = set.iter().collect();
    assert_eq!(contents[..], *nums);
  }

  #[test]
  fn insert_and_remove() {
    let mut set = NumSet::new();
    assert!(set.insert(N1));
    assert!(set.insert(N5));
    assert!(!set.insert(N5));
    check_eq(set, &[N1, N5]);

    assert!(!set.remove(N4));
    assert!(set.remove(N1));
    check_eq(set, &[N5]);
    assert_eq!(Some(N5), set.only());
  }

  #[test]
  fn operators() {
    let pair = num_set!(N2, N7);
    assert_eq!(num_set!(N1, N3, N4, N5, N6, N8, N9), !pair);
    assert_eq!(N7.as_set(), pair - N2.as_set());
    assert!(N2.as_set() < pair);
    assert_eq!(None, N2.as_set().partial_cmp(&N3.as_set()));
    assert_eq!(NumSet::all(), pair | !pair);
    assert_eq!(None, NumSet::all().only());
  }

  #[test]
  fn formatting() {
    assert_eq!("{279}", format!("{}", num_set!(N9, N2, N7)));
    assert_eq!("{N2, N7}", format!("{:?}", num_set!(N2, N7)));
    assert_eq!("{}", format!("{}", NumSet::new()));
  }
}
