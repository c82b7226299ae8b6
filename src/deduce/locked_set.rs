use super::internals::find_overlapping_unit;
use super::{subset_key, Insight};
use crate::core::*;
use crate::error::Error;
use crate::marks::Marks;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A set of numerals and a same-size set of locations within one unit that
/// must hold each other.
///
/// A naked set is found from the locations' possible numerals: no other
/// numeral can go in those locations, so these numerals are eliminated from
/// the rest of the unit.  A hidden set is found from the numerals' possible
/// locations: those locations can hold no other numerals.  When the locations
/// also lie within a second unit, the numerals are eliminated from the rest of
/// that unit too.
#[derive(Clone, Debug)]
pub struct LockedSet {
  nums: NumSet,
  locs: UnitSubset,
  is_naked: bool,
  overlap: Option<UnitId>,
  eliminations: Arc<[Asgmt]>,
}

impl LockedSet {
  /// Makes a locked set, working out its overlapping unit and eliminations
  /// from the board geometry alone.
  pub fn new(nums: NumSet, locs: UnitSubset, is_naked: bool) -> Self {
    let overlap = find_overlapping_unit(locs);
    let eliminations = Self::make_eliminations(nums, locs, is_naked, overlap, None);
    Self::with_eliminations(nums, locs, is_naked, overlap, eliminations)
  }

  pub(crate) fn with_eliminations(
    nums: NumSet,
    locs: UnitSubset,
    is_naked: bool,
    overlap: Option<UnitId>,
    eliminations: Vec<Asgmt>,
  ) -> Self {
    LockedSet {
      nums,
      locs,
      is_naked,
      overlap,
      eliminations: eliminations.into(),
    }
  }

  /// Lists the assignments a locked set rules out.
  ///
  /// With `marks`, skips assignments that an assigned peer already rules out;
  /// without, lists everything the set implies.  Numerals vary slowest.
  pub fn make_eliminations(
    nums: NumSet,
    locs: UnitSubset,
    is_naked: bool,
    overlap: Option<UnitId>,
    marks: Option<&Marks>,
  ) -> Vec<Asgmt> {
    let mut answer = vec![];
    let mut add = |num: Num, loc: Loc| {
      let wanted = match marks {
        None => true,
        Some(marks) => {
          marks.is_possible_assignment(loc, num) || !marks.is_eliminated_by_assignment(loc, num)
        }
      };
      if wanted {
        answer.push(Asgmt::new(num, loc));
      }
    };
    let (target_nums, target_locs) = if is_naked {
      (nums, !locs)
    } else {
      (!nums, locs)
    };
    for num in target_nums.iter() {
      for loc in target_locs.iter() {
        add(num, loc);
      }
    }
    if let Some(overlap) = overlap {
      let extra = UnitSubset::full(overlap).minus_locs(locs.unit().locs());
      for num in nums.iter() {
        for loc in extra.iter() {
          add(num, loc);
        }
      }
    }
    answer
  }

  pub fn nums(&self) -> NumSet {
    self.nums
  }

  pub fn locs(&self) -> UnitSubset {
    self.locs
  }

  pub fn unit(&self) -> UnitId {
    self.locs.unit()
  }

  /// How many numerals (and locations) the set has.
  pub fn size(&self) -> i32 {
    self.nums.len()
  }

  pub fn is_naked(&self) -> bool {
    self.is_naked
  }

  pub fn is_hidden(&self) -> bool {
    !self.is_naked
  }

  /// The second unit holding all the locations, if any.
  pub fn overlapping_unit(&self) -> Option<UnitId> {
    self.overlap
  }

  pub fn eliminations(&self) -> &[Asgmt] {
    &self.eliminations
  }

  pub(crate) fn collect_antecedents(&self, marks: &Marks) -> Result<Vec<Insight>, Error> {
    if self.is_naked {
      marks.collect_antecedents(self.locs, !self.nums)
    } else {
      marks.collect_antecedents(!self.locs, self.nums)
    }
  }

  pub(crate) fn key(&self) -> ((UnitId, u16), u16, bool) {
    (subset_key(self.locs), self.nums.0.backing_int(), self.is_naked)
  }
}

impl PartialEq for LockedSet {
  fn eq(&self, other: &Self) -> bool {
    self.nums == other.nums && self.locs == other.locs && self.is_naked == other.is_naked
  }
}

impl Eq for LockedSet {}

impl Hash for LockedSet {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.nums.hash(state);
    self.locs.hash(state);
    self.is_naked.hash(state);
  }
}

impl fmt::Display for LockedSet {
  /// Prints as numerals, a two-headed arrow, the locations, and `n` or `h`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} \u{2194} {}{}",
      self.nums,
      self.locs,
      if self.is_naked { "n" } else { "h" }
    )
  }
}
