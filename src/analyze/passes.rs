//! The discovery passes.  Each scans one snapshot of the marks and hands what
//! it finds to a callback; none of them changes the marks.

use super::{Callback, Stop};
use crate::core::*;
use crate::deduce::internals::{matches, CONSECUTIVE_OVERLAPS, STRIDED_OVERLAPS};
use crate::deduce::{find_overlapping_unit, Insight, LockedSet, Overlap};
use crate::error::Error;
use crate::marks::Marks;
use itertools::Itertools;
use std::collections::HashSet;

/// Finds numerals whose possible locations in one unit lie within a second
/// unit, where the second unit has other possible locations to eliminate.
///
/// For each numeral, checks blocks against rows, blocks against columns, rows
/// against blocks, and columns against blocks.
pub fn find_overlaps(marks: &Marks, callback: &mut dyn Callback) -> Result<(), Stop> {
  let blks = || Blk::all().map(Blk::unit_id);
  let rows = || Row::all().map(Row::unit_id);
  let cols = || Col::all().map(Col::unit_id);
  for num in Num::all() {
    find_overlaps_in(marks, callback, num, blks(), &CONSECUTIVE_OVERLAPS, |loc| {
      loc.row().unit_id()
    })?;
    find_overlaps_in(marks, callback, num, blks(), &STRIDED_OVERLAPS, |loc| {
      loc.col().unit_id()
    })?;
    find_overlaps_in(marks, callback, num, rows(), &CONSECUTIVE_OVERLAPS, |loc| {
      loc.blk().unit_id()
    })?;
    find_overlaps_in(marks, callback, num, cols(), &CONSECUTIVE_OVERLAPS, |loc| {
      loc.blk().unit_id()
    })?;
  }
  Ok(())
}

fn find_overlaps_in(
  marks: &Marks,
  callback: &mut dyn Callback,
  num: Num,
  units: impl Iterator<Item = UnitId>,
  table: &[u16],
  overlapping_unit_of: fn(Loc) -> UnitId,
) -> Result<(), Stop> {
  for unit in units {
    let set = marks.possible_locations(UnitNum::of(unit, num));
    if !matches(table, set.bits9().backing_int()) && set.len() != 1 {
      continue;
    }
    let Some(first) = set.smallest_item() else {
      continue;
    };
    let overlapping_unit = overlapping_unit_of(first);
    let overlapping_set = marks.possible_locations(UnitNum::of(overlapping_unit, num));
    if overlapping_set.len() <= set.len() {
      continue;
    }
    let antecedents = if set.len() > 1 {
      None
    } else {
      // A lone location is a forced location, not an overlap, unless that
      // location is forced only by eliminations in other units.
      match forced_location_antecedents(marks, num, set, overlapping_unit)? {
        None => continue,
        found => found,
      }
    };
    let eliminated = overlapping_set.minus_locs(set.to_loc_set());
    callback.take(Insight::Overlap(Overlap::with_antecedents(
      unit,
      num,
      eliminated,
      antecedents,
    )))?;
  }
  Ok(())
}

/// Decides whether a numeral with only one possible location in a unit also
/// makes an overlap, and if so finds the overlap's antecedents.
///
/// The overlap is real when some other possible location in the intersection
/// was eliminated by an insight that eliminates none of the numeral's
/// locations outside the intersection.  Its antecedents are then the insights
/// eliminating those outside locations, leaving out the ones that also
/// eliminate such an intersection location.
fn forced_location_antecedents(
  marks: &Marks,
  num: Num,
  set: UnitSubset,
  overlapping_unit: UnitId,
) -> Result<Option<Vec<Insight>>, Error> {
  let unit = set.unit();
  let intersection = unit.subset(overlapping_unit.locs());
  let unassigned = marks.unassigned_locations(unit);
  let possibles = (intersection & unassigned) - set;
  if possibles.is_empty() {
    return Ok(None);
  }
  let required = unassigned - intersection;
  let mut required_insights: Option<Vec<Vec<Insight>>> = None;
  for loc in possibles.iter() {
    let insights: HashSet<Insight> = marks
      .elimination_insights(Asgmt::new(num, loc))
      .into_iter()
      .collect();
    let lists = match &required_insights {
      Some(lists) => lists.clone(),
      None => required
        .iter()
        .map(|other| marks.elimination_insights(Asgmt::new(num, other)))
        .collect(),
    };
    if lists
      .iter()
      .any(|list| list.iter().all(|insight| insights.contains(insight)))
    {
      continue;
    }
    required_insights = Some(
      lists
        .into_iter()
        .map(|list| list.into_iter().filter(|insight| !insights.contains(insight)).collect())
        .collect(),
    );
  }
  required_insights
    .map(|lists| marks.collect_antecedents_from(lists))
    .transpose()
}

/// Finds locked sets of sizes 2 through `max_size` that eliminate something.
/// For each unit and size, looks for hidden sets and then naked ones.  Sizes
/// above the size of a unit are treated as the size of a unit.
pub fn find_sets(marks: &Marks, max_size: usize, callback: &mut dyn Callback) -> Result<(), Stop> {
  let max_size = max_size.min(Num::COUNT);
  for unit in UnitId::all() {
    for size in 2..=max_size {
      find_hidden_sets(marks, callback, unit, size)?;
      find_naked_sets(marks, callback, unit, size)?;
    }
  }
  Ok(())
}

fn find_hidden_sets(
  marks: &Marks,
  callback: &mut dyn Callback,
  unit: UnitId,
  size: usize,
) -> Result<(), Stop> {
  let unassigned = marks.unassigned_numerals(unit);
  if (unassigned.len() as usize) < size {
    return Ok(());
  }
  // Numerals with a single location can join a set, but two of them can't.
  let mut singleton_included = false;
  let mut candidates = vec![];
  for num in unassigned.iter() {
    let count = marks.size_of_possible_locations(UnitNum::of(unit, num)) as usize;
    if count > size {
      continue;
    }
    if count == 1 {
      if singleton_included {
        continue;
      }
      singleton_included = true;
    }
    candidates.push(num);
  }
  for combo in candidates.into_iter().combinations(size) {
    let locs = combo.iter().fold(UnitSubset::empty(unit), |locs, &num| {
      locs | marks.possible_locations(UnitNum::of(unit, num))
    });
    if locs.len() as usize != size {
      continue;
    }
    let nums: NumSet = combo.into_iter().collect();
    let overlap = find_overlapping_unit(locs);
    let eliminations = LockedSet::make_eliminations(nums, locs, false, overlap, Some(marks));
    if !eliminations.is_empty() {
      callback.take(Insight::LockedSet(LockedSet::with_eliminations(
        nums,
        locs,
        false,
        overlap,
        eliminations,
      )))?;
    }
  }
  Ok(())
}

fn find_naked_sets(
  marks: &Marks,
  callback: &mut dyn Callback,
  unit: UnitId,
  size: usize,
) -> Result<(), Stop> {
  let unassigned = marks.unassigned_locations(unit);
  if (unassigned.len() as usize) < size {
    return Ok(());
  }
  let candidates: Vec<Loc> = unassigned
    .iter()
    .filter(|&loc| (2..=size).contains(&(marks.possible_numerals(loc).len() as usize)))
    .collect();
  for combo in candidates.into_iter().combinations(size) {
    let nums = combo
      .iter()
      .fold(NumSet::new(), |nums, &loc| nums | marks.possible_numerals(loc));
    if nums.len() as usize != size {
      continue;
    }
    let locs = UnitSubset::of(unit, combo);
    let overlap = find_overlapping_unit(locs);
    // The block holds the same naked set.
    if overlap.is_some_and(UnitId::is_blk) {
      continue;
    }
    let eliminations = LockedSet::make_eliminations(nums, locs, true, overlap, Some(marks));
    if !eliminations.is_empty() {
      callback.take(Insight::LockedSet(LockedSet::with_eliminations(
        nums,
        locs,
        true,
        overlap,
        eliminations,
      )))?;
    }
  }
  Ok(())
}

/// Reports the marks' errors: conflicting assignments in each unit, then
/// numerals with no possible location in a unit, then locations with no
/// possible numeral.  Once a conflict is found, barred numerals and
/// locations that come from assignments are left out.
pub fn find_errors(marks: &Marks, callback: &mut dyn Callback) -> Result<(), Stop> {
  let mut conflict_found = false;
  for unit in UnitId::all() {
    let mut seen = NumSet::new();
    let mut conflicting = NumSet::new();
    for loc in UnitSubset::full(unit).iter() {
      if let Some(num) = marks.assigned_numeral(loc) {
        if !seen.insert(num) {
          conflicting.insert(num);
        }
      }
    }
    for num in conflicting.iter() {
      let locs = UnitSubset::of(
        unit,
        UnitSubset::full(unit)
          .iter()
          .filter(|&loc| marks.assigned_numeral(loc) == Some(num)),
      );
      callback.take(Insight::Conflict { num, locs })?;
      conflict_found = true;
    }
  }

  for un in UnitNum::all() {
    if marks.size_of_possible_locations(un) == 0 && !(conflict_found && marks.has_unit_assignment(un)) {
      callback.take(Insight::BarredNum {
        unit: un.unit(),
        num: un.num(),
      })?;
    }
  }

  for loc in Loc::all() {
    if marks.possible_numerals(loc).is_empty() && !(conflict_found && marks.has_assignment(loc)) {
      callback.take(Insight::BarredLoc { loc })?;
    }
  }
  Ok(())
}

/// Reports each unassigned numeral that has just one possible location in a
/// unit.
pub fn find_singleton_locations(marks: &Marks, callback: &mut dyn Callback) -> Result<(), Stop> {
  for un in UnitNum::all() {
    if let Some(loc) = marks.only_possible_location(un) {
      if !marks.has_assignment(loc) {
        callback.take(Insight::ForcedLoc {
          unit: un.unit(),
          num: un.num(),
          loc,
        })?;
      }
    }
  }
  Ok(())
}

/// Reports each unassigned location that has just one possible numeral.
pub fn find_singleton_numerals(marks: &Marks, callback: &mut dyn Callback) -> Result<(), Stop> {
  for loc in Loc::all() {
    if marks.has_assignment(loc) {
      continue;
    }
    if let Some(num) = marks.only_possible_numeral(loc) {
      callback.take(Insight::ForcedNum { loc, num })?;
    }
  }
  Ok(())
}
