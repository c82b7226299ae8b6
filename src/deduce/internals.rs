//! Lookup tables for recognizing when a unit's locations lie within a single
//! overlapping unit.

use crate::core::*;
use once_cell::sync::Lazy;

/// Position bits for 2 or 3 locations among 3 consecutive positions of a unit.
/// In a block these share a row; in a row or column they share a block.
pub(crate) static CONSECUTIVE_OVERLAPS: Lazy<Vec<u16>> =
  Lazy::new(|| sorted_patterns([0o7, 0o6, 0o5, 0o3], [1, 0o10, 0o100]));

/// Position bits for 2 or 3 locations spaced 3 apart within a unit.  In a
/// block these share a column.
pub(crate) static STRIDED_OVERLAPS: Lazy<Vec<u16>> =
  Lazy::new(|| sorted_patterns([0o111, 0o110, 0o101, 0o011], [1, 2, 4]));

fn sorted_patterns(patterns: [u16; 4], multipliers: [u16; 3]) -> Vec<u16> {
  let mut answer: Vec<u16> = multipliers
    .iter()
    .flat_map(|m| patterns.iter().map(move |p| p * m))
    .collect();
  answer.sort_unstable();
  answer
}

/// Tells whether the position bits are in the given table.
pub(crate) fn matches(table: &[u16], bits: u16) -> bool {
  table.binary_search(&bits).is_ok()
}

/// Finds the unit, other than `locs`'s own, that holds all of `locs`.  Only
/// sets of 2 or 3 locations can have one.
pub fn find_overlapping_unit(locs: UnitSubset) -> Option<UnitId> {
  if !(2..=3).contains(&locs.len()) {
    return None;
  }
  let bits = locs.bits9().backing_int();
  let first = locs.smallest_item()?;
  if locs.unit().is_blk() {
    if matches(&CONSECUTIVE_OVERLAPS, bits) {
      Some(first.row().unit_id())
    } else if matches(&STRIDED_OVERLAPS, bits) {
      Some(first.col().unit_id())
    } else {
      None
    }
  } else if matches(&CONSECUTIVE_OVERLAPS, bits) {
    Some(first.blk().unit_id())
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tables() {
    assert_eq!(12, CONSECUTIVE_OVERLAPS.len());
    assert_eq!(12, STRIDED_OVERLAPS.len());
    assert!(CONSECUTIVE_OVERLAPS.windows(2).all(|w| w[0] < w[1]));
    assert!(STRIDED_OVERLAPS.windows(2).all(|w| w[0] < w[1]));
    assert!(matches(&CONSECUTIVE_OVERLAPS, 0o700));
    assert!(matches(&STRIDED_OVERLAPS, 0o404));
    assert!(!matches(&CONSECUTIVE_OVERLAPS, 0o011));
  }

  #[test]
  fn overlapping_units() {
    let b1 = B1.unit_id();
    assert_eq!(Some(R1.unit_id()), find_overlapping_unit(UnitSubset::of(b1, [L11, L13])));
    assert_eq!(Some(C2.unit_id()), find_overlapping_unit(UnitSubset::of(b1, [L12, L32])));
    assert_eq!(None, find_overlapping_unit(UnitSubset::of(b1, [L11, L22])));
    assert_eq!(None, find_overlapping_unit(UnitSubset::of(b1, [L11])));
    assert_eq!(
      None,
      find_overlapping_unit(UnitSubset::of(b1, [L11, L12, L13, L21]))
    );

    let r5 = R5.unit_id();
    assert_eq!(Some(B6.unit_id()), find_overlapping_unit(UnitSubset::of(r5, [L57, L59])));
    assert_eq!(None, find_overlapping_unit(UnitSubset::of(r5, [L53, L54])));
    let c2 = C2.unit_id();
    assert_eq!(Some(B7.unit_id()), find_overlapping_unit(UnitSubset::of(c2, [L72, L82, L92])));
  }
}
