//! Ranks insights by how easily a person would see them.

use super::Marks;
use crate::core::*;
use crate::deduce::Insight;
use std::cmp::Ordering;

impl Marks {
  /// Orders insights from most to least plausible: cheapest first, then by
  /// type, then by how crowded their part of the board is.  Distinct
  /// insights can be equally plausible.
  pub fn plausibility(&self, a: &Insight, b: &Insight) -> Ordering {
    a.cost()
      .cmp(&b.cost())
      .then_with(|| a.kind().cmp(&b.kind()))
      .then_with(|| {
        let (a, b) = (a.nub(), b.nub());
        a.kind().cmp(&b.kind()).then_with(|| self.compare_nubs(a, b))
      })
  }

  /// A strict total order: `plausibility`, with ties broken by the
  /// insights' contents.
  pub fn compare(&self, a: &Insight, b: &Insight) -> Ordering {
    self
      .plausibility(a, b)
      .then_with(|| a.cmp_structure(b))
  }

  /// Compares insights of the same type.
  fn compare_nubs(&self, a: &Insight, b: &Insight) -> Ordering {
    match (a, b) {
      (Insight::Overlap(a), Insight::Overlap(b)) => self.compare_units(a.unit(), b.unit()),
      (Insight::LockedSet(a), Insight::LockedSet(b)) => a
        .size()
        .cmp(&b.size())
        .then(a.is_naked().cmp(&b.is_naked()))
        .then_with(|| self.compare_units(a.unit(), b.unit())),
      _ => match (a.assignment(), b.assignment()) {
        (Some(x), Some(y)) => self.compare_assignments(a, b, x.loc, y.loc),
        _ => Ordering::Equal,
      },
    }
  }

  fn compare_assignments(&self, a: &Insight, b: &Insight, la: Loc, lb: Loc) -> Ordering {
    let mut result = match (a, b) {
      (Insight::ForcedLoc { unit: ua, .. }, Insight::ForcedLoc { unit: ub, .. }) => {
        blocks_first(*ua, *ub)
      }
      _ => Ordering::Equal,
    };
    if result == Ordering::Equal && la != lb {
      result = self.open_counts(la).cmp(&self.open_counts(lb));
    }
    result.then(la.cmp(&lb))
  }

  /// The open-location counts of the location's units, smallest first.
  fn open_counts(&self, loc: Loc) -> [usize; 3] {
    let mut counts = loc.unit_ids().map(|unit| self.num_open_locations_in(unit));
    counts.sort_unstable();
    counts
  }

  fn compare_units(&self, a: UnitId, b: UnitId) -> Ordering {
    blocks_first(a, b)
      .then_with(|| {
        self
          .num_open_locations_in(a)
          .cmp(&self.num_open_locations_in(b))
      })
      .then(a.cmp(&b))
  }
}

fn blocks_first(a: UnitId, b: UnitId) -> Ordering {
  (!a.is_blk()).cmp(&!b.is_blk())
}
