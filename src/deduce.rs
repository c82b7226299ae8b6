//! Insights: the facts a human solver can deduce from a Sudoku's marks.
//!
//! Every insight is an assignment, an elimination, or an error.  Insights that
//! depend on earlier insights are wrapped in an [`Implication`] naming those
//! antecedents, and each insight's cost counts the assigned locations its
//! justification ultimately rests on.

use crate::core::*;
use crate::error::Error;
use crate::marks::Marks;
use std::cmp::Ordering;
use std::fmt;

mod implication;
pub(crate) mod internals;
mod locked_set;
mod overlap;

pub use implication::{DisprovedAssignment, Implication};
pub use internals::find_overlapping_unit;
pub use locked_set::LockedSet;
pub use overlap::Overlap;

/// A fact deduced about a Sudoku's marks.
///
/// The variant order is the type order used when ranking insights.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Insight {
  /// Assignment: a numeral written in a location from outside, as a given or
  /// a player's move.
  ExplicitAssignment { asgmt: Asgmt },
  /// Assignment: the numeral has only one possible location in the unit.
  /// (Also known as a "hidden single.")
  ForcedLoc { unit: UnitId, num: Num, loc: Loc },
  /// Assignment: the location has only one possible numeral.  (Also known as
  /// a "naked single.")
  ForcedNum { loc: Loc, num: Num },
  /// Elimination: a possible assignment removed from outside.
  ExplicitElimination { asgmt: Asgmt },
  /// Elimination: a numeral confined to the intersection of two units.
  Overlap(Overlap),
  /// Elimination: same-size sets of numerals and locations within a unit
  /// that must match each other.
  LockedSet(LockedSet),
  /// Elimination: an assignment that leads to an error.
  DisprovedAssignment(DisprovedAssignment),
  /// Error: the numeral is assigned to more than one location in a unit.
  Conflict { num: Num, locs: UnitSubset },
  /// Error: the location has no possible numeral.
  BarredLoc { loc: Loc },
  /// Error: the numeral has no possible location in the unit.
  BarredNum { unit: UnitId, num: Num },
  /// An insight together with the insights it follows from.
  Implication(Implication),
}

/// The kinds of insight, in ranking order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum InsightType {
  ExplicitAssignment,
  ForcedLoc,
  ForcedNum,
  ExplicitElimination,
  Overlap,
  LockedSet,
  DisprovedAssignment,
  Conflict,
  BarredLoc,
  BarredNum,
  Implication,
}

impl InsightType {
  pub fn is_assignment(self) -> bool {
    matches!(
      self,
      InsightType::ExplicitAssignment | InsightType::ForcedLoc | InsightType::ForcedNum
    )
  }

  pub fn is_elimination(self) -> bool {
    matches!(
      self,
      InsightType::ExplicitElimination
        | InsightType::Overlap
        | InsightType::LockedSet
        | InsightType::DisprovedAssignment
    )
  }

  pub fn is_error(self) -> bool {
    matches!(
      self,
      InsightType::Conflict | InsightType::BarredLoc | InsightType::BarredNum
    )
  }
}

impl Insight {
  /// This insight's type.  Implications are their own type; see `nub` for
  /// what they imply.
  pub fn kind(&self) -> InsightType {
    match self {
      Insight::ExplicitAssignment { .. } => InsightType::ExplicitAssignment,
      Insight::ForcedLoc { .. } => InsightType::ForcedLoc,
      Insight::ForcedNum { .. } => InsightType::ForcedNum,
      Insight::ExplicitElimination { .. } => InsightType::ExplicitElimination,
      Insight::Overlap(_) => InsightType::Overlap,
      Insight::LockedSet(_) => InsightType::LockedSet,
      Insight::DisprovedAssignment(_) => InsightType::DisprovedAssignment,
      Insight::Conflict { .. } => InsightType::Conflict,
      Insight::BarredLoc { .. } => InsightType::BarredLoc,
      Insight::BarredNum { .. } => InsightType::BarredNum,
      Insight::Implication(_) => InsightType::Implication,
    }
  }

  /// The innermost consequent: this insight itself unless it's an
  /// implication.
  pub fn nub(&self) -> &Insight {
    match self {
      Insight::Implication(imp) => imp.consequent().nub(),
      _ => self,
    }
  }

  /// Tells whether this insight (or what it implies) is an assignment.
  pub fn is_assignment(&self) -> bool {
    self.nub().kind().is_assignment()
  }

  /// Tells whether this insight (or what it implies) is an elimination.
  pub fn is_elimination(&self) -> bool {
    self.nub().kind().is_elimination()
  }

  /// Tells whether this insight (or what it implies) is an error.
  pub fn is_error(&self) -> bool {
    self.nub().kind().is_error()
  }

  /// The assignment this insight makes, if it makes one.
  pub fn assignment(&self) -> Option<Asgmt> {
    match *self.nub() {
      Insight::ExplicitAssignment { asgmt } => Some(asgmt),
      Insight::ForcedLoc { num, loc, .. } => Some(Asgmt::new(num, loc)),
      Insight::ForcedNum { loc, num } => Some(Asgmt::new(num, loc)),
      _ => None,
    }
  }

  /// The assignments this insight rules out.  Empty unless it's an
  /// elimination.
  pub fn eliminations(&self) -> Vec<Asgmt> {
    match self.nub() {
      Insight::ExplicitElimination { asgmt } => vec![*asgmt],
      Insight::Overlap(overlap) => overlap.eliminations(),
      Insight::LockedSet(set) => set.eliminations().to_vec(),
      Insight::DisprovedAssignment(disproved) => vec![disproved.asgmt()],
      _ => vec![],
    }
  }

  /// How many distinct assigned locations this insight's justification
  /// depends on.  Zero for anything that isn't an implication or a disproved
  /// assignment.
  pub fn cost(&self) -> i32 {
    match self {
      Insight::Implication(imp) => imp.cost(),
      Insight::DisprovedAssignment(disproved) => disproved.cost(),
      _ => 0,
    }
  }

  /// The locations of the assignments this insight's justification rests on,
  /// not counting the insight's own assignment.
  pub fn assignment_locations(&self) -> LocSet {
    let mut locs = LocSet::new();
    self.add_assignment_locations(false, &mut locs);
    locs
  }

  pub(crate) fn add_assignment_locations(&self, include_consequent: bool, locs: &mut LocSet) {
    match self {
      Insight::Implication(imp) => {
        for antecedent in imp.antecedents() {
          antecedent.add_assignment_locations(true, locs);
        }
        imp
          .consequent()
          .add_assignment_locations(include_consequent, locs);
      }
      Insight::DisprovedAssignment(disproved) => {
        locs.insert(disproved.asgmt().loc);
        disproved
          .resulting_error()
          .add_assignment_locations(include_consequent, locs);
      }
      _ => {
        if include_consequent {
          if let Some(asgmt) = self.assignment() {
            locs.insert(asgmt.loc);
          }
        }
      }
    }
  }

  /// Finds the insights recorded in `marks` that this insight follows from.
  ///
  /// Empty for insights that need no antecedents: explicit ones, and those
  /// that already carry their justification.
  pub fn collect_antecedents(&self, marks: &Marks) -> Result<Vec<Insight>, Error> {
    match self {
      Insight::ExplicitAssignment { .. }
      | Insight::ExplicitElimination { .. }
      | Insight::DisprovedAssignment(_)
      | Insight::Implication(_) => Ok(vec![]),
      Insight::ForcedLoc { unit, num, loc } => {
        let others = UnitSubset::full(*unit).minus_locs(loc.as_set());
        marks.collect_antecedents(others, num.as_set())
      }
      Insight::ForcedNum { loc, num } => {
        let blk = loc.blk().unit_id();
        marks.collect_antecedents(UnitSubset::of(blk, [*loc]), !num.as_set())
      }
      Insight::Overlap(overlap) => overlap.collect_antecedents(marks),
      Insight::LockedSet(set) => set.collect_antecedents(marks),
      Insight::Conflict { num, locs } => locs
        .iter()
        .map(|loc| marks.assignment_insight(Asgmt::new(*num, loc)))
        .collect(),
      Insight::BarredLoc { loc } => {
        let blk = loc.blk().unit_id();
        marks.collect_antecedents(UnitSubset::of(blk, [*loc]), NumSet::all())
      }
      Insight::BarredNum { unit, num } => {
        marks.collect_antecedents(UnitSubset::full(*unit), num.as_set())
      }
    }
  }

  /// A total order over insights' contents, consistent with equality.  Used
  /// to break ties among equally plausible insights.
  pub fn cmp_structure(&self, other: &Insight) -> Ordering {
    use Insight::*;
    let by_kind = self.kind().cmp(&other.kind());
    if by_kind != Ordering::Equal {
      return by_kind;
    }
    match (self, other) {
      (ExplicitAssignment { asgmt: a }, ExplicitAssignment { asgmt: b })
      | (ExplicitElimination { asgmt: a }, ExplicitElimination { asgmt: b }) => a.cmp(b),
      (
        ForcedLoc { unit: u1, num: n1, loc: l1 },
        ForcedLoc { unit: u2, num: n2, loc: l2 },
      ) => (u1, n1, l1).cmp(&(u2, n2, l2)),
      (ForcedNum { loc: l1, num: n1 }, ForcedNum { loc: l2, num: n2 }) => {
        (l1, n1).cmp(&(l2, n2))
      }
      (Overlap(a), Overlap(b)) => a.key().cmp(&b.key()),
      (LockedSet(a), LockedSet(b)) => a.key().cmp(&b.key()),
      (DisprovedAssignment(a), DisprovedAssignment(b)) => a
        .asgmt()
        .cmp(&b.asgmt())
        .then_with(|| a.resulting_error().cmp_structure(b.resulting_error())),
      (Conflict { num: n1, locs: s1 }, Conflict { num: n2, locs: s2 }) => {
        (n1, subset_key(*s1)).cmp(&(n2, subset_key(*s2)))
      }
      (BarredLoc { loc: a }, BarredLoc { loc: b }) => a.cmp(b),
      (BarredNum { unit: u1, num: n1 }, BarredNum { unit: u2, num: n2 }) => {
        (u1, n1).cmp(&(u2, n2))
      }
      (Implication(a), Implication(b)) => {
        let by_consequent = a.consequent().cmp_structure(b.consequent());
        if by_consequent != Ordering::Equal {
          return by_consequent;
        }
        for (x, y) in a.antecedents().iter().zip(b.antecedents()) {
          let by_antecedent = x.cmp_structure(y);
          if by_antecedent != Ordering::Equal {
            return by_antecedent;
          }
        }
        a.antecedents().len().cmp(&b.antecedents().len())
      }
      _ => Ordering::Equal,
    }
  }
}

/// A sortable stand-in for a unit subset.
pub(crate) fn subset_key(subset: UnitSubset) -> (UnitId, u16) {
  (subset.unit(), subset.bits9().backing_int())
}

impl fmt::Display for Insight {
  /// Prints the insight in symbolic form.  The alternate form (`{:#}`)
  /// abbreviates implications to their nub and cost.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Insight::ExplicitAssignment { asgmt } => write!(f, "{}", asgmt),
      Insight::ForcedLoc { unit, num, loc } => write!(f, "{} \u{2208} {} \u{2192} {}", num, unit, loc),
      Insight::ForcedNum { loc, num } => write!(f, "{} \u{2190} {}", loc, num),
      Insight::ExplicitElimination { asgmt } => write!(f, "{} \u{2260} {}", asgmt.loc, asgmt.num),
      Insight::Overlap(overlap) => write!(f, "{}", overlap),
      Insight::LockedSet(set) => write!(f, "{}", set),
      Insight::DisprovedAssignment(disproved) => {
        write!(f, "{} \u{219b} {} \u{2235} ", disproved.asgmt().num, disproved.asgmt().loc)?;
        fmt::Display::fmt(disproved.resulting_error(), f)
      }
      Insight::Conflict { num, locs } => write!(f, "{} \u{2208} {}", num, locs),
      Insight::BarredLoc { loc } => write!(f, "{} \u{2190} \u{2205}", loc),
      Insight::BarredNum { unit, num } => write!(f, "{} \u{2209} {}", num, unit),
      Insight::Implication(imp) => {
        if f.alternate() {
          write!(f, "{} \u{2235} \u{2026} [{}]", self.nub(), imp.cost())
        } else {
          write!(f, "{} \u{2235} [", imp.consequent())?;
          for (i, antecedent) in imp.antecedents().iter().enumerate() {
            if i > 0 {
              f.write_str(", ")?;
            }
            write!(f, "{}", antecedent)?;
          }
          f.write_str("]")
        }
      }
    }
  }
}
