//! Marks: the numerals that could still go in each location, and the
//! locations that could still hold each numeral within each unit, like the
//! pencil marks people write in Sudoku grids.  Marks also remember which
//! insights eliminated each assignment.
//!
//! A `Marks` is immutable and cheap to clone.  Changes go through a
//! `Builder`, which copies shared state only when it's about to change it.

mod ledger;
mod order;

use crate::core::bits::{Bits, Bits9};
use crate::core::*;
use crate::deduce::Insight;
use crate::error::Error;
use ledger::Ledger;
use std::fmt;
use static_assertions::assert_impl_all;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct LocMarks {
  possible: NumSet,
  assigned: Option<Num>,
  explicit: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct UnitNumMarks {
  /// Position bits within the unit.
  possible: Bits9,
  assigned: Option<Loc>,
}

/// The fixed-size arrays behind a `Marks`, indexed by location, unit-numeral
/// and unit.
#[derive(Clone, Debug, Eq, PartialEq)]
struct State {
  locs: [LocMarks; Loc::COUNT],
  unit_nums: [UnitNumMarks; UnitNum::COUNT],
  unassigned_nums: [NumSet; UnitId::COUNT],
  unassigned_locs: [Bits9; UnitId::COUNT],
  has_errors: bool,
}

impl State {
  fn new() -> Self {
    State {
      locs: [LocMarks {
        possible: NumSet::all(),
        assigned: None,
        explicit: false,
      }; Loc::COUNT],
      unit_nums: [UnitNumMarks {
        possible: Bits9::ONES,
        assigned: None,
      }; UnitNum::COUNT],
      unassigned_nums: [NumSet::all(); UnitId::COUNT],
      unassigned_locs: [Bits9::ONES; UnitId::COUNT],
      has_errors: false,
    }
  }
}

/// An immutable snapshot of a Sudoku's marks.
///
/// Safe to share between threads: the only interior mutability is the
/// per-assignment sorting of the elimination ledger.
#[derive(Clone, Debug)]
pub struct Marks {
  state: Arc<State>,
  ledger: Arc<Ledger>,
}

assert_impl_all!(Marks: Send, Sync);

impl Marks {
  /// Starts a builder from the given grid, whose assignments are all
  /// explicit.
  pub fn builder(grid: &Grid) -> Builder {
    Builder::new(grid)
  }

  /// Shorthand for building marks straight from a grid.
  pub fn from_grid(grid: &Grid) -> Marks {
    Builder::new(grid).build()
  }

  /// A builder that starts from these marks.
  pub fn to_builder(&self) -> Builder {
    Builder {
      marks: self.clone(),
    }
  }

  /// The grid of assigned numerals.
  pub fn to_grid(&self) -> Grid {
    Loc::all()
      .filter_map(|loc| self.assigned_numeral(loc).map(|num| Asgmt::new(num, loc)))
      .collect()
  }

  /// Tells whether any of the assignments or eliminations that led to these
  /// marks broke the rules of Sudoku.  Once set, this stays set for every
  /// descendant.
  pub fn has_errors(&self) -> bool {
    self.state.has_errors
  }

  pub fn possible_numerals(&self, loc: Loc) -> NumSet {
    self.state.locs[loc.index()].possible
  }

  /// The one numeral that could go in the location, if there is just one.
  pub fn only_possible_numeral(&self, loc: Loc) -> Option<Num> {
    self.possible_numerals(loc).only()
  }

  pub fn assigned_numeral(&self, loc: Loc) -> Option<Num> {
    self.state.locs[loc.index()].assigned
  }

  /// The numeral assigned to the location from outside, if any.
  pub fn explicitly_assigned_numeral(&self, loc: Loc) -> Option<Num> {
    let marks = &self.state.locs[loc.index()];
    if marks.explicit {
      marks.assigned
    } else {
      None
    }
  }

  pub fn has_assignment(&self, loc: Loc) -> bool {
    self.assigned_numeral(loc).is_some()
  }

  pub fn assigned_locations(&self) -> LocSet {
    Loc::all().filter(|&loc| self.has_assignment(loc)).collect()
  }

  pub fn num_assignments(&self) -> usize {
    Loc::all().filter(|&loc| self.has_assignment(loc)).count()
  }

  pub fn num_open_locations(&self) -> usize {
    Loc::COUNT - self.num_assignments()
  }

  /// How many of the unit's locations are unassigned.
  pub fn num_open_locations_in(&self, unit: UnitId) -> usize {
    self.state.unassigned_locs[unit.index()].len() as usize
  }

  /// Every location assigned, with no rules broken.
  pub fn is_solved(&self) -> bool {
    self.num_open_locations() == 0 && !self.has_errors()
  }

  /// The locations within the unit that could hold the numeral.
  pub fn possible_locations(&self, un: UnitNum) -> UnitSubset {
    UnitSubset::new(un.unit(), self.state.unit_nums[un.index()].possible)
  }

  pub fn size_of_possible_locations(&self, un: UnitNum) -> i32 {
    self.state.unit_nums[un.index()].possible.len()
  }

  pub fn only_possible_location(&self, un: UnitNum) -> Option<Loc> {
    let locs = self.possible_locations(un);
    if locs.len() == 1 {
      locs.smallest_item()
    } else {
      None
    }
  }

  /// The location within the unit assigned the numeral, if any.
  pub fn assigned_location(&self, un: UnitNum) -> Option<Loc> {
    self.state.unit_nums[un.index()].assigned
  }

  pub fn has_unit_assignment(&self, un: UnitNum) -> bool {
    self.assigned_location(un).is_some()
  }

  /// The numerals that don't yet have a location in the unit.
  pub fn unassigned_numerals(&self, unit: UnitId) -> NumSet {
    self.state.unassigned_nums[unit.index()]
  }

  /// The unit's locations that don't yet have a numeral.
  pub fn unassigned_locations(&self, unit: UnitId) -> UnitSubset {
    UnitSubset::new(unit, self.state.unassigned_locs[unit.index()])
  }

  pub fn is_possible_assignment(&self, loc: Loc, num: Num) -> bool {
    self.possible_numerals(loc).contains(num)
  }

  /// Tells whether the assignment is ruled out by an assignment already made,
  /// either to the location itself or of the numeral to one of its peers.
  pub fn is_eliminated_by_assignment(&self, loc: Loc, num: Num) -> bool {
    if let Some(assigned) = self.assigned_numeral(loc) {
      return assigned != num;
    }
    for unit in loc.unit_ids() {
      if let Some(assigned) = self.assigned_location(UnitNum::of(unit, num)) {
        return assigned != loc;
      }
    }
    false
  }

  /// The insights that eliminated the given assignment, most plausible
  /// first.  Empty if the assignment hasn't been eliminated.
  pub fn elimination_insights(&self, asgmt: Asgmt) -> Vec<Insight> {
    self
      .ledger
      .read_sorted(asgmt, |a, b| self.plausibility(a, b), <[Insight]>::to_vec)
  }

  /// Finds the insight that made the given assignment.
  pub fn assignment_insight(&self, asgmt: Asgmt) -> Result<Insight, Error> {
    // Every assignment eliminates its numeral from all the location's peers.
    let peer = asgmt
      .loc
      .peers()
      .smallest_item()
      .ok_or(Error::NoAssignmentInsight(asgmt))?;
    let found = self.ledger.read_sorted(
      Asgmt::new(asgmt.num, peer),
      |a, b| self.plausibility(a, b),
      |insights| {
        insights
          .iter()
          .find(|insight| insight.assignment() == Some(asgmt))
          .cloned()
      },
    );
    found.ok_or(Error::NoAssignmentInsight(asgmt))
  }

  /// Finds insights that together eliminate every assignment of the given
  /// numerals to the given locations.  Locations explicitly assigned some
  /// other numeral are skipped.
  pub fn collect_antecedents(&self, locs: UnitSubset, nums: NumSet) -> Result<Vec<Insight>, Error> {
    let mut lists = Vec::with_capacity((locs.len() * nums.len()) as usize);
    for loc in locs.iter() {
      let explicit = self.explicitly_assigned_numeral(loc);
      for num in nums.iter() {
        if explicit.map_or(false, |n| n != num) {
          continue;
        }
        let asgmt = Asgmt::new(num, loc);
        let list = self.elimination_insights(asgmt);
        if list.is_empty() {
          return Err(Error::Unjustified(asgmt));
        }
        lists.push(list);
      }
    }
    self.collect_antecedents_from(lists)
  }

  /// Picks insights covering every one of the given lists, each of which
  /// names the insights that could justify one fact.
  ///
  /// The lists are ranked by their most plausible insights.  The
  /// last-ranked list's best insight is taken first, then every list
  /// containing it is dropped, and so on until no lists are left.  Finally,
  /// any pick whose lists all hold some other pick is let go, so every
  /// insight returned is the only one in at least one list.
  pub fn collect_antecedents_from(&self, mut lists: Vec<Vec<Insight>>) -> Result<Vec<Insight>, Error> {
    if lists.iter().any(Vec::is_empty) {
      return Err(Error::EmptyJustification);
    }
    lists.sort_by(|a, b| self.plausibility(&a[0], &b[0]));
    let mut remaining: Vec<&Vec<Insight>> = lists.iter().collect();
    let mut answer = vec![];
    while let Some(list) = remaining.pop() {
      let Some(insight) = list.first() else {
        continue;
      };
      remaining.retain(|other| !other.contains(insight));
      answer.push(insight.clone());
    }
    // Plausibility ties can let later picks cover an earlier one.
    let mut i = 0;
    while i < answer.len() {
      let redundant = lists
        .iter()
        .filter(|list| list.contains(&answer[i]))
        .all(|list| {
          answer
            .iter()
            .enumerate()
            .any(|(j, other)| j != i && list.contains(other))
        });
      if redundant {
        answer.remove(i);
      } else {
        i += 1;
      }
    }
    Ok(answer)
  }

  /// Renders one location's possible numerals centered in `width` columns.
  fn fmt_loc(&self, loc: Loc, width: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let nums = self.possible_numerals(loc);
    let assigned = self.has_assignment(loc);
    let size = (nums.len() as usize).max(1) + usize::from(assigned);
    let pad = width.saturating_sub(size);
    write!(f, "{:1$}", "", pad / 2)?;
    if nums.is_empty() {
      f.write_str("?")?;
    } else {
      for num in nums.iter() {
        write!(f, "{}", num)?;
      }
      if assigned {
        f.write_str("!")?;
      }
    }
    write!(f, "{:1$}", "", pad - pad / 2)
  }
}

impl fmt::Display for Marks {
  /// Prints the possible numerals of every location, with assigned locations
  /// marked by `!` and locations with no possible numerals shown as `?`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut width = 1;
    for loc in Loc::all() {
      width = width.max(self.possible_numerals(loc).len() as usize);
      if width == 1 && self.has_assignment(loc) {
        width = 2;
      }
    }
    let dashes = "-".repeat(3 * width + 4);
    for row in Row::all() {
      for col in Col::all() {
        f.write_str(" ")?;
        self.fmt_loc(Loc::at(row, col), width, f)?;
        if col.index() == 2 || col.index() == 5 {
          f.write_str(" |")?;
        }
      }
      f.write_str("\n")?;
      if row.index() == 2 || row.index() == 5 {
        writeln!(f, "{0}+{0}+{0}", dashes)?;
      }
    }
    Ok(())
  }
}

/// Applies insights to marks.  Not for concurrent use; hand out the results
/// of `build` instead.
#[derive(Clone, Debug)]
pub struct Builder {
  marks: Marks,
}

impl Builder {
  /// Starts from empty marks and explicitly assigns everything in the grid.
  pub fn new(grid: &Grid) -> Self {
    let mut builder = Builder {
      marks: Marks {
        state: Arc::new(State::new()),
        ledger: Arc::new(Ledger::new()),
      },
    };
    for asgmt in grid.iter() {
      builder.assign(&Insight::ExplicitAssignment { asgmt }, asgmt);
    }
    builder
  }

  /// Freezes the current state.  The builder remains usable; its next change
  /// copies whatever this snapshot shares with it.
  pub fn build(&self) -> Marks {
    self.marks.clone()
  }

  pub fn has_errors(&self) -> bool {
    self.marks.has_errors()
  }

  pub fn possible_numerals(&self, loc: Loc) -> NumSet {
    self.marks.possible_numerals(loc)
  }

  pub fn possible_locations(&self, un: UnitNum) -> UnitSubset {
    self.marks.possible_locations(un)
  }

  pub fn to_grid(&self) -> Grid {
    self.marks.to_grid()
  }

  /// Applies the insight: makes its assignment, or eliminates everything it
  /// eliminates, recording the insight against each elimination.  Errors
  /// change nothing.
  ///
  /// Breaking the rules of Sudoku isn't a failure here: it sets the error
  /// flag.  Making the same assignment twice is.
  pub fn add(&mut self, insight: &Insight) -> Result<&mut Self, Error> {
    if let Some(asgmt) = insight.assignment() {
      if self.marks.assigned_numeral(asgmt.loc) == Some(asgmt.num) {
        return Err(Error::AlreadyApplied(asgmt));
      }
      self.assign(insight, asgmt);
    } else if insight.is_elimination() {
      for asgmt in insight.eliminations() {
        self.eliminate(asgmt, Some(insight));
      }
    }
    Ok(self)
  }

  fn assign(&mut self, insight: &Insight, asgmt: Asgmt) {
    let Asgmt { num, loc } = asgmt;
    let explicit = matches!(insight, Insight::ExplicitAssignment { .. });
    let mut ok = true;

    for peer in loc.peers().iter() {
      ok &= self.eliminate(Asgmt::new(num, peer), Some(insight));
    }
    // Givens don't justify the eliminations at their own locations.
    let others = self.marks.possible_numerals(loc) - num.as_set();
    for other in others.iter() {
      ok &= self.eliminate(Asgmt::new(other, loc), if explicit { None } else { Some(insight) });
    }

    let state = Arc::make_mut(&mut self.marks.state);
    let slot = &mut state.locs[loc.index()];
    slot.assigned = Some(num);
    slot.explicit |= explicit;
    for unit in loc.unit_ids() {
      state.unit_nums[UnitNum::of(unit, num).index()].assigned = Some(loc);
      state.unassigned_nums[unit.index()].remove(num);
      if let Some(i) = unit.index_of(loc) {
        state.unassigned_locs[unit.index()].remove(i as i32);
      }
    }

    if ok {
      ok = state.locs[loc.index()].possible == num.as_set();
    }
    if !ok {
      self.raise_error(Some(insight));
    }
  }

  /// Removes the assignment from the possibilities, tagging it with the
  /// insight if there is one.  Returns false if that leaves a location with
  /// no possible numerals, or an unassigned numeral with nowhere to go in a
  /// unit.
  fn eliminate(&mut self, asgmt: Asgmt, insight: Option<&Insight>) -> bool {
    let Asgmt { num, loc } = asgmt;
    let state = Arc::make_mut(&mut self.marks.state);
    let possible = &mut state.locs[loc.index()].possible;
    possible.remove(num);
    let mut ok = !possible.is_empty();
    for unit in loc.unit_ids() {
      let slot = &mut state.unit_nums[UnitNum::of(unit, num).index()];
      if let Some(i) = unit.index_of(loc) {
        slot.possible.remove(i as i32);
      }
      if slot.possible.is_empty() && slot.assigned.is_none() {
        ok = false;
      }
    }
    if let Some(insight) = insight {
      Arc::make_mut(&mut self.marks.ledger).push(asgmt, insight.clone());
    }
    if !ok {
      self.raise_error(insight);
    }
    ok
  }

  fn raise_error(&mut self, cause: Option<&Insight>) {
    let state = Arc::make_mut(&mut self.marks.state);
    if !state.has_errors {
      match cause {
        Some(insight) => debug!(%insight, "marks now break the rules"),
        None => debug!("marks now break the rules"),
      }
      state.has_errors = true;
    }
  }
}
