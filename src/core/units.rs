//! The Sudoku "units": the rows, columns and blocks of the grid, each of which
//! must contain every numeral in a solution.

use super::bits::*;
use super::loc::*;
use super::num::Num;
use crate::define_id_types;
use paste::paste;
use seq_macro::seq;
use serde::Serialize;
use std::fmt;

define_id_types! {
  /// One of the 9 rows, numbered top to bottom.
  Row: i8[9];

  /// One of the 9 columns, numbered left to right.
  Col: i8[9];

  /// One of the 9 3x3 blocks, numbered in row-major order.
  Blk: i8[9];

  /// One of the 27 units of a Sudoku grid.
  ///
  /// Blocks come first (0..9), then rows (9..18), then columns (18..27).  All
  /// scans over units go in this order.
  UnitId: i8[27];

  /// A unit paired with a numeral: the slot that numeral must fill somewhere
  /// in the unit.  Indexed unit-major.
  UnitNum: i16[243];
}

/// One of a block, row, or column.
///
/// The variant order matches `UnitId`'s, so both sort the same way.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Unit {
  Blk(Blk),
  Row(Row),
  Col(Col),
}

pub trait UnitTrait {
  /// Tells which generic unit this is.
  fn unit_id(self) -> UnitId;

  /// Converts this unit to the generic Unit type.
  fn to_unit(self) -> Unit;

  /// The locations that this unit comprises.
  fn locs(self) -> LocSet;
}

// R1 through R9, C1 through C9, B1 through B9.
seq!(N in 1..=9 {
  paste! {
    #[allow(clippy::eq_op)]
    pub const [<R N>]: Row = Row(N - 1);
    #[allow(clippy::eq_op)]
    pub const [<C N>]: Col = Col(N - 1);
    #[allow(clippy::eq_op)]
    pub const [<B N>]: Blk = Blk(N - 1);
  }
});

const COL_BITS: u128 = 0o_001_001_001_001_001_001_001_001_001;
const BLK_BITS: u128 = 0o_007_007_007;

impl Row {
  /// The row's locations, in const form.
  pub const fn const_locs(self) -> LocSet {
    LocSet(Bits81::from_backing_int(0o777 << (9 * self.0 as u32)))
  }
}

impl Col {
  /// The column's locations, in const form.
  pub const fn const_locs(self) -> LocSet {
    LocSet(Bits81::from_backing_int(COL_BITS << self.0 as u32))
  }
}

impl Blk {
  /// The block's locations, in const form.
  pub const fn const_locs(self) -> LocSet {
    let shift = 27 * (self.0 / 3) as u32 + 3 * (self.0 % 3) as u32;
    LocSet(Bits81::from_backing_int(BLK_BITS << shift))
  }
}

impl UnitId {
  pub const fn from_blk(blk: Blk) -> Self {
    Self(blk.get())
  }

  pub const fn from_row(row: Row) -> Self {
    Self(9 + row.get())
  }

  pub const fn from_col(col: Col) -> Self {
    Self(18 + col.get())
  }

  /// Whether this unit is a block.
  pub const fn is_blk(self) -> bool {
    self.0 < 9
  }

  /// The location at position `i` (0..9) of this unit.  Rows go left to
  /// right, columns top to bottom, and blocks in row-major order.
  pub fn loc_at(self, i: usize) -> Loc {
    debug_assert!(i < 9);
    UNIT_LOCS[self.index()][i]
  }

  /// The position of `loc` within this unit, if it belongs here.
  pub fn index_of(self, loc: Loc) -> Option<usize> {
    match self.to_unit() {
      Unit::Blk(blk) => (loc.blk() == blk).then(|| loc.blk_index()),
      Unit::Row(row) => (loc.row() == row).then(|| loc.col().index()),
      Unit::Col(col) => (loc.col() == col).then(|| loc.row().index()),
    }
  }
}

const fn unit_loc(id: i8, i: i8) -> Loc {
  let (row, col) = match id / 9 {
    0 => (id / 3 * 3 + i / 3, id % 3 * 3 + i % 3),
    1 => (id - 9, i),
    _ => (i, id - 18),
  };
  // Safe because row and col are both in 0..9.
  unsafe { Loc::new_unchecked(row * 9 + col) }
}

const fn calc_unit_locs(id: i8) -> [Loc; 9] {
  seq!(I in 0..9 {
    return [#(unit_loc(id, I),)*];
  });
}

seq!(U in 0..27 {
  /// Memoizes the locations of each unit, in unit order.
  static UNIT_LOCS: [[Loc; 9]; 27] = [
    #(
      calc_unit_locs(U),
    )*
  ];
});

impl UnitNum {
  /// The slot for `num` within `unit`.
  pub const fn of(unit: UnitId, num: Num) -> Self {
    Self(unit.get() as i16 * 9 + num.index() as i16)
  }

  pub const fn unit(self) -> UnitId {
    // Safe because self.0 is in 0..243.
    unsafe { UnitId::new_unchecked((self.0 / 9) as i8) }
  }

  pub const fn num(self) -> Num {
    // Safe because the remainder is in 0..9.
    unsafe { Num::from_index_unchecked((self.0 % 9) as usize) }
  }
}

impl UnitTrait for Unit {
  fn unit_id(self) -> UnitId {
    match self {
      Self::Blk(blk) => UnitId::from_blk(blk),
      Self::Row(row) => UnitId::from_row(row),
      Self::Col(col) => UnitId::from_col(col),
    }
  }

  fn to_unit(self) -> Unit {
    self
  }

  fn locs(self) -> LocSet {
    match self {
      Self::Blk(blk) => blk.locs(),
      Self::Row(row) => row.locs(),
      Self::Col(col) => col.locs(),
    }
  }
}

macro_rules! impl_unit_trait {
  ($($type:ident => $variant:ident, $from:ident;)*) => {
    $(
      impl UnitTrait for $type {
        fn unit_id(self) -> UnitId {
          UnitId::$from(self)
        }

        fn to_unit(self) -> Unit {
          Unit::$variant(self)
        }

        fn locs(self) -> LocSet {
          self.const_locs()
        }
      }
    )*
  };
}

impl_unit_trait! {
  Blk => Blk, from_blk;
  Row => Row, from_row;
  Col => Col, from_col;
}

impl UnitTrait for UnitId {
  fn unit_id(self) -> UnitId {
    self
  }

  fn to_unit(self) -> Unit {
    let id = self.get();
    // Safe because each arm's result is in 0..9.
    unsafe {
      match id {
        0..=8 => Unit::Blk(Blk::new_unchecked(id)),
        9..=17 => Unit::Row(Row::new_unchecked(id - 9)),
        _ => Unit::Col(Col::new_unchecked(id - 18)),
      }
    }
  }

  fn locs(self) -> LocSet {
    self.to_unit().locs()
  }
}

impl fmt::Display for Row {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "R{}", self.ordinal())
  }
}

impl fmt::Display for Col {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "C{}", self.ordinal())
  }
}

impl fmt::Display for Blk {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "B{}", self.ordinal())
  }
}

macro_rules! debug_as_display {
  ($($type:ty),*) => {
    $(
      impl fmt::Debug for $type {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
          fmt::Display::fmt(self, f)
        }
      }
    )*
  };
}

debug_as_display!(Row, Col, Blk, UnitId, UnitNum);

impl fmt::Display for Unit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Blk(blk) => fmt::Display::fmt(blk, f),
      Self::Row(row) => fmt::Display::fmt(row, f),
      Self::Col(col) => fmt::Display::fmt(col, f),
    }
  }
}

impl fmt::Display for UnitId {
  /// Prints as the block, row or column this identifies, like `B4`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.to_unit(), f)
  }
}

impl fmt::Display for UnitNum {
  /// Prints as unit:numeral, like `R3:7`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.unit(), self.num())
  }
}

#[cfg(test)]
mod tests {
  use super::super::*;
  use super::*;

  #[test]
  fn unit_locs() {
    for loc in Loc::all() {
      assert!(loc.row().locs().contains(loc));
      assert!(loc.col().locs().contains(loc));
      assert!(loc.blk().locs().contains(loc));
      assert_eq!(loc.as_set(), loc.row().locs() & loc.col().locs());
      assert_eq!(
        loc.peers(),
        (loc.row().locs() | loc.col().locs() | loc.blk().locs()) - loc.as_set()
      );
    }
  }

  #[test]
  fn unit_order() {
    let units: Vec<_> = UnitId::all().map(|u| u.to_string()).collect();
    assert_eq!("B1", units[0]);
    assert_eq!("B9", units[8]);
    assert_eq!("R1", units[9]);
    assert_eq!("C9", units[26]);
    assert!(Unit::Blk(B9) < Unit::Row(R1));
    assert!(B9.unit_id() < R1.unit_id());
    for unit in UnitId::all() {
      assert_eq!(unit, unit.to_unit().unit_id());
      assert_eq!(unit.is_blk(), matches!(unit.to_unit(), Unit::Blk(_)));
    }
  }

  #[test]
  fn positions_within_units() {
    assert_eq!(L41, B4.unit_id().loc_at(0));
    assert_eq!(L53, B4.unit_id().loc_at(5));
    assert_eq!(L27, R2.unit_id().loc_at(6));
    assert_eq!(L72, C2.unit_id().loc_at(6));
    for unit in UnitId::all() {
      let mut locs = LocSet::new();
      for i in 0..9 {
        let loc = unit.loc_at(i);
        assert_eq!(Some(i), unit.index_of(loc));
        locs.insert(loc);
      }
      assert_eq!(unit.locs(), locs);
      for loc in Loc::all() {
        assert_eq!(unit.locs().contains(loc), unit.index_of(loc).is_some());
      }
    }
  }

  #[test]
  fn unit_nums() {
    for un in UnitNum::all() {
      assert_eq!(un, UnitNum::of(un.unit(), un.num()));
    }
    assert_eq!("R3:7", UnitNum::of(R3.unit_id(), N7).to_string());
    assert_eq!(0, UnitNum::of(B1.unit_id(), N1).index());
    assert_eq!(242, UnitNum::of(C9.unit_id(), N9).index());
  }
}
