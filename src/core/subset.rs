//! Defines `UnitSubset`, a set of locations confined to a single unit.

use super::bits::{Bits, Bits9, BitsIterable};
use super::set::Set;
use super::{loc::*, units::*};
use crate::define_set_operators;
use std::fmt;

/// A subset of the locations of one unit, stored as 9 bits indexed by
/// position within the unit (see `UnitId::loc_at`).
///
/// Combining subsets of different units with the set operators is
/// meaningless; the result keeps the left operand's unit.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct UnitSubset {
  unit: UnitId,
  bits: Bits9,
}

impl UnitSubset {
  /// Makes a subset from its unit and position bits.
  pub const fn new(unit: UnitId, bits: Bits9) -> Self {
    UnitSubset { unit, bits }
  }

  /// The empty subset of `unit`.
  pub const fn empty(unit: UnitId) -> Self {
    Self::new(unit, Bits9::from_backing_int(0))
  }

  /// All the locations of `unit`.
  pub const fn full(unit: UnitId) -> Self {
    Self::new(unit, Bits9::from_backing_int(0o777))
  }

  /// The subset of `unit` holding the given locations.  Locations outside
  /// the unit are ignored.
  pub fn of(unit: UnitId, locs: impl IntoIterator<Item = Loc>) -> Self {
    let mut answer = Self::empty(unit);
    for loc in locs {
      if let Some(i) = unit.index_of(loc) {
        answer.bits.insert(i as i32);
      }
    }
    answer
  }

  /// The unit these locations belong to.
  pub const fn unit(self) -> UnitId {
    self.unit
  }

  /// The position bits.
  pub const fn bits9(self) -> Bits9 {
    self.bits
  }

  /// The same locations as a board-wide set.
  pub fn to_loc_set(self) -> LocSet {
    self.bits.value_iter().map(|i| self.unit.loc_at(i as usize)).collect()
  }

  /// The locations of this subset that are not in `locs`.
  pub fn minus_locs(self, locs: LocSet) -> Self {
    let mut answer = self;
    for loc in self.iter() {
      if locs.contains(loc) {
        answer.remove(loc);
      }
    }
    answer
  }
}

impl UnitId {
  /// The locations of `locs` that lie in this unit.
  pub fn subset(self, locs: LocSet) -> UnitSubset {
    UnitSubset::of(self, (locs & self.locs()).iter())
  }
}

impl<'a> Set<'a> for UnitSubset {
  type Item = Loc;
  type Bits = Bits9;

  fn bits(&self) -> &Self::Bits {
    &self.bits
  }

  fn mut_bits(&mut self) -> &mut Self::Bits {
    &mut self.bits
  }

  fn to_bits_value(&self, item: Self::Item) -> i32 {
    self.unit.index_of(item).map_or(-1, |i| i as i32)
  }

  fn from_bits_value(&self, value: i32) -> Self::Item {
    self.unit.loc_at(value as usize)
  }
}

define_set_operators!(UnitSubset);

impl fmt::Display for UnitSubset {
  /// Prints as the unit followed by the 1-based positions, like `B4{147}`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{{", self.unit)?;
    for i in self.bits.value_iter() {
      write!(f, "{}", i + 1)?;
    }
    write!(f, "}}")
  }
}

impl fmt::Debug for UnitSubset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.unit)?;
    f.debug_set().entries(self.iter()).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::super::*;
  use super::*;

  #[test]
  fn positions() {
    let b4 = B4.unit_id();
    let set = UnitSubset::of(b4, [L41, L53, L99]);
    assert_eq!(2, set.len());
    assert!(set.contains(L53));
    assert!(!set.contains(L99));
    assert_eq!(vec![L41, L53], set.iter().collect::<Vec<_>>());
    assert_eq!(L41.as_set() | L53.as_set(), set.to_loc_set());
    assert_eq!(set, b4.subset(L41.as_set() | L53.as_set() | L11.as_set()));
    assert_eq!("B4{16}", set.to_string());
  }

  #[test]
  fn operators() {
    let r5 = R5.unit_id();
    let set = UnitSubset::of(r5, [L51, L52]);
    assert_eq!(7, (!set).len());
    assert_eq!(UnitSubset::full(r5), set | !set);
    assert_eq!(UnitSubset::of(r5, [L52]), set - UnitSubset::of(r5, [L51]));
    assert!(UnitSubset::of(r5, [L52]) < set);
    assert_eq!(
      UnitSubset::of(r5, [L52]),
      set.minus_locs(B4.unit_id().locs() & C1.unit_id().locs())
    );
  }
}
