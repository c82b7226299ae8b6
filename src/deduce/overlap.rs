use super::Insight;
use crate::core::*;
use crate::error::Error;
use crate::marks::Marks;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A numeral whose possible locations in one unit all lie within a second,
/// overlapping unit, so it can't go anywhere else in the second unit.
///
/// Two overlaps are equal when they name the same unit, numeral and
/// overlapping unit, whatever locations they eliminate.
#[derive(Clone, Debug)]
pub struct Overlap {
  unit: UnitId,
  num: Num,
  eliminated: UnitSubset,
  antecedents: Option<Arc<[Insight]>>,
}

impl Overlap {
  /// Makes an overlap of `num` from `unit` into `eliminated`'s unit,
  /// eliminating `num` from `eliminated`'s locations.
  pub fn new(unit: UnitId, num: Num, eliminated: UnitSubset) -> Self {
    Self::with_antecedents(unit, num, eliminated, None)
  }

  /// Makes an overlap whose antecedents were worked out when it was found.
  pub(crate) fn with_antecedents(
    unit: UnitId,
    num: Num,
    eliminated: UnitSubset,
    antecedents: Option<Vec<Insight>>,
  ) -> Self {
    Overlap {
      unit,
      num,
      eliminated,
      antecedents: antecedents.map(Arc::from),
    }
  }

  /// The unit the numeral is confined within.
  pub fn unit(&self) -> UnitId {
    self.unit
  }

  pub fn num(&self) -> Num {
    self.num
  }

  /// The unit the numeral is eliminated from.
  pub fn overlapping_unit(&self) -> UnitId {
    self.eliminated.unit()
  }

  /// The locations the numeral is eliminated from.
  pub fn eliminated_locs(&self) -> UnitSubset {
    self.eliminated
  }

  pub fn eliminations(&self) -> Vec<Asgmt> {
    self
      .eliminated
      .iter()
      .map(|loc| Asgmt::new(self.num, loc))
      .collect()
  }

  pub(crate) fn collect_antecedents(&self, marks: &Marks) -> Result<Vec<Insight>, Error> {
    if let Some(antecedents) = &self.antecedents {
      return Ok(antecedents.to_vec());
    }
    let outside = UnitSubset::full(self.unit).minus_locs(self.overlapping_unit().locs());
    marks.collect_antecedents(outside, self.num.as_set())
  }

  pub(crate) fn key(&self) -> (UnitId, Num, UnitId) {
    (self.unit, self.num, self.overlapping_unit())
  }
}

impl PartialEq for Overlap {
  fn eq(&self, other: &Self) -> bool {
    self.key() == other.key()
  }
}

impl Eq for Overlap {}

impl Hash for Overlap {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.key().hash(state)
  }
}

impl fmt::Display for Overlap {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} \u{2208} {} \u{2229} {}",
      self.num,
      self.unit,
      self.overlapping_unit()
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identity_ignores_eliminated_locations() {
    let r5 = R5.unit_id();
    let a = Overlap::new(B4.unit_id(), N1, UnitSubset::of(r5, [L54, L55]));
    let b = Overlap::new(B4.unit_id(), N1, UnitSubset::of(r5, [L59]));
    let c = Overlap::new(B4.unit_id(), N2, UnitSubset::of(r5, [L59]));
    assert_eq!(a, b);
    assert_ne!(b, c);
    assert_eq!(R5.unit_id(), a.overlapping_unit());
    assert_eq!(
      vec![Asgmt::new(N1, L54), Asgmt::new(N1, L55)],
      a.eliminations()
    );
    assert_eq!("1 \u{2208} B4 \u{2229} R5", a.to_string());
  }
}
