//! The Loc type, which identifies the locations (squares, cells) of a Sudoku
//! grid, and LocSet, a set of them.

use super::bits::*;
use super::set::Set;
use super::units::*;
use crate::define_id_types;
use crate::define_set_operators;
use paste::paste;
use seq_macro::seq;
use serde::Serialize;
use std::fmt;

define_id_types! {
  /// Identifies one of the 81 locations in a Sudoku grid.
  ///
  /// Locations are numbered in row-major order: `Loc(0)` is the top left
  /// square of the grid, and `Loc(80)` is the bottom right.
  Loc: i8[81];
}

// L11 through L99.
seq!(R in 1..=9 {
  seq!(C in 1..=9 {
    paste! {
      #[allow(clippy::identity_op, clippy::erasing_op, clippy::eq_op)]
      pub const [<L R C>]: Loc = Loc((R - 1) * 9 + (C - 1));
    }
  });
});

impl Loc {
  /// The location at the intersection of a row and column.
  pub const fn at(row: Row, col: Col) -> Loc {
    Loc(row.get() * 9 + col.get())
  }

  fn data(self) -> &'static Data {
    // Safe because the DATA array ranges over 0..81.
    unsafe { DATA.get_unchecked(self.index()) }
  }

  /// This location's row.
  pub fn row(self) -> Row {
    self.data().row
  }

  /// This location's column.
  pub fn col(self) -> Col {
    self.data().col
  }

  /// This location's block.
  pub fn blk(self) -> Blk {
    self.data().blk
  }

  /// Where this location falls within its block, in 0..9 row-major.
  pub fn blk_index(self) -> usize {
    self.data().blk_index as usize
  }

  /// The three units containing this location: block, row, column.
  pub fn unit_ids(self) -> [UnitId; 3] {
    let data = self.data();
    [data.blk.unit_id(), data.row.unit_id(), data.col.unit_id()]
  }

  const fn const_row(self) -> Row {
    // Safe because self.0 is in 0..81.
    unsafe { Row::new_unchecked(self.0 / 9) }
  }

  const fn const_col(self) -> Col {
    // Safe because self.0 % 9 is in 0..9.
    unsafe { Col::new_unchecked(self.0 % 9) }
  }

  const fn const_blk(self) -> Blk {
    // Safe because both terms are in 0..3.
    unsafe { Blk::new_unchecked(self.0 / 27 * 3 + self.0 % 9 / 3) }
  }

  /// The locations sharing a row, column, or block with this one.
  pub fn peers(self) -> LocSet {
    // Safe because Locs' IDs are in 0..81.
    unsafe { *PEERS.get_unchecked(self.index()) }
  }

  const fn calc_peers(self) -> LocSet {
    let unit_bits = self
      .const_row()
      .const_locs()
      .0
      .const_bitor(self.const_col().const_locs().0)
      .const_bitor(self.const_blk().const_locs().0);
    LocSet(unit_bits.const_bitxor(Bits81::from_backing_int(1 << self.0)))
  }

  /// The set of just this location.
  pub fn as_set(self) -> LocSet {
    LocSet::singleton(self)
  }
}

impl fmt::Display for Loc {
  /// Prints as (r, c), using row and column ordinals.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.row().ordinal(), self.col().ordinal())
  }
}

impl fmt::Debug for Loc {
  /// Prints as Lrc, using row and column ordinals.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "L{}{}", self.row().ordinal(), self.col().ordinal())
  }
}

/// A set of `Loc`s.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct LocSet(pub Bits81);

impl LocSet {
  /// The empty set.
  pub const fn new() -> Self {
    LocSet(Bits81::from_backing_int(0))
  }

  /// The set of just `loc`.
  pub fn singleton(loc: Loc) -> Self {
    LocSet(Bits81::singleton(loc.index() as i32))
  }

  /// The set of every location.
  pub const fn all() -> Self {
    LocSet(Bits81::from_backing_int(u128::MAX))
  }
}

impl FromIterator<Loc> for LocSet {
  fn from_iter<I: IntoIterator<Item = Loc>>(iter: I) -> Self {
    let mut set = Self::new();
    for loc in iter {
      set.insert(loc);
    }
    set
  }
}

impl<'a> Set<'a> for LocSet {
  type Item = Loc;
  type Bits = Bits81;

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
    // Safe because Bits81 only returns values in 0..81.
    unsafe { Loc::new_unchecked(value as i8) }
  }
}
define_set_operators!(LocSet);

impl fmt::Debug for LocSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "LocSet")?;
    f.debug_set().entries(self.iter()).finish()
  }
}

/// Translates a bare int ID into a Loc, then calculates its peers.
const fn calc_peers(id: i8) -> LocSet {
  // Safe because this is only called with IDs in 0..81.
  unsafe { Loc::new_unchecked(id).calc_peers() }
}

seq!(L in 0..81 {
  /// Memoizes all locations' peers.
  static PEERS: [LocSet; 81] = [
    #(
      calc_peers(L),
    )*
  ];
});

struct Data {
  row: Row,
  col: Col,
  blk: Blk,
  blk_index: i8,
}

seq!(L in 0..81 {
  /// Memoizes the units of each location.
  #[allow(clippy::identity_op, clippy::erasing_op, clippy::eq_op)]
  static DATA: [Data; 81] = [
    #(
      Data {
        row: Loc(L).const_row(),
        col: Loc(L).const_col(),
        blk: Loc(L).const_blk(),
        blk_index: L / 9 % 3 * 3 + L % 3,
      },
    )*
  ];
});

#[cfg(test)]
mod tests {
  use super::*;

  fn check_eq(set: LocSet, locs: &[Loc]) {
    let contents: Vec<_> = set.iter().collect();
    assert_eq!(contents[..], *locs);
  }

  #[test]
  fn set_basics() {
    let mut set = LocSet::new();
    assert!(set.insert(L11));
    assert!(set.insert(L99));
    assert!(set.insert(L45));
    check_eq(set, &[L11, L45, L99]);

    assert!(!set.remove(L21));
    assert!(set.remove(L45));
    check_eq(set, &[L11, L99]);
    assert_eq!(81, LocSet::all().len());
    assert_eq!(79, (!set).len());
  }

  #[test]
  fn coordinates() {
    assert_eq!(R4, L45.row());
    assert_eq!(C5, L45.col());
    assert_eq!(B5, L45.blk());
    assert_eq!(1, L45.blk_index());
    assert_eq!(4, L55.blk_index());
    assert_eq!(B9, L99.blk());
    assert_eq!(8, L99.blk_index());
    assert_eq!(B3, L27.blk());
    assert_eq!(3, L27.blk_index());
    assert_eq!(
      [B5.unit_id(), R4.unit_id(), C5.unit_id()],
      L45.unit_ids()
    );
    assert_eq!("(4, 5)", format!("{}", L45));
    assert_eq!("L45", format!("{:?}", L45));
  }

  #[test]
  fn peers() {
    for loc in Loc::all() {
      assert_eq!(20, loc.peers().len());
      let mut same = [0; 3];
      for peer in loc.peers().iter() {
        assert_ne!(loc, peer);
        assert_eq!(Loc::new(peer.get()), Some(peer));
        let same_row = loc.row() == peer.row();
        let same_col = loc.col() == peer.col();
        let same_blk = loc.blk() == peer.blk();
        assert!(same_row || same_col || same_blk);
        same[0] += same_row as i32;
        same[1] += same_col as i32;
        same[2] += same_blk as i32;
      }
      assert_eq!([8, 8, 8], same);
    }
  }
}
