//! Defines the Analyzer, which finds every insight available from a Sudoku's
//! marks.
//!
//! Analysis first runs the overlap and locked-set passes, folding their
//! eliminations into fresh marks until neither finds anything new.  Then, if
//! the marks have errors, it reports them; last come the forced locations and
//! forced numerals.  Each insight is reported once, wrapped in an
//! [`Implication`](crate::deduce::Implication) when it depends on earlier
//! insights.

use crate::deduce::Insight;
use crate::error::Error;
use crate::marks::Marks;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

mod collector;
mod passes;

use collector::Collector;
pub use passes::*;

/// Receives the insights an analysis finds.
pub trait Callback {
  /// Takes one insight.  Returning an error ends the analysis.
  fn take(&mut self, insight: Insight) -> Result<(), Stop>;
}

impl<F> Callback for F
where
  F: FnMut(Insight) -> Result<(), Stop>,
{
  fn take(&mut self, insight: Insight) -> Result<(), Stop> {
    self(insight)
  }
}

/// Why an analysis ended early.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Stop {
  /// The callback asked to stop.
  #[error("stop requested")]
  Requested,
  /// The analysis's cancel token was set.
  #[error("analysis cancelled")]
  Cancelled,
  /// The marks or an insight were misused.
  #[error(transparent)]
  Failed(#[from] Error),
}

/// Lets another thread cancel an analysis.  Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
  /// Makes a token that is not yet cancelled.
  pub fn new() -> Self {
    Self::default()
  }

  /// Cancels every analysis using this token or one of its clones.
  pub fn cancel(&self) {
    self.0.store(true, Ordering::Relaxed);
  }

  /// Whether `cancel` has been called on this token or a clone.
  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::Relaxed)
  }
}

/// Settings for the Analyzer.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct AnalyzerConfig {
  /// The largest locked set to look for.  Below 2, locked sets are skipped;
  /// above 9, it's the same as 9.
  pub max_set_size: usize,
}

impl Default for AnalyzerConfig {
  fn default() -> Self {
    AnalyzerConfig { max_set_size: 4 }
  }
}

/// Finds insights, checking a cancel token between passes.
#[derive(Clone, Debug, Default)]
pub struct Analyzer {
  config: AnalyzerConfig,
  cancel: CancelToken,
}

impl Analyzer {
  /// Makes an analyzer with the given settings and its own cancel token.
  pub fn new(config: AnalyzerConfig) -> Self {
    Analyzer {
      config,
      cancel: CancelToken::new(),
    }
  }

  /// Makes this analyzer stop when `token` is cancelled.
  pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
    self.cancel = token;
    self
  }

  /// The settings this analyzer runs with.
  pub fn config(&self) -> &AnalyzerConfig {
    &self.config
  }

  /// The token that cancels this analyzer.  Clone it to cancel from
  /// another thread.
  pub fn cancel_token(&self) -> &CancelToken {
    &self.cancel
  }

  /// Hands every insight available from `marks` to the callback.  Returns
  /// true if the analysis ran to completion, false if the callback stopped
  /// it or it was cancelled.
  pub fn analyze(&self, marks: &Marks, callback: &mut dyn Callback) -> Result<bool, Error> {
    debug!(
      open = marks.num_open_locations(),
      has_errors = marks.has_errors(),
      "analysis starting"
    );
    let mut index = HashSet::new();
    let mut passes = 0;
    let complete = match self.find_insights(marks.clone(), callback, &mut index, &mut passes) {
      Ok(()) => true,
      Err(Stop::Requested) | Err(Stop::Cancelled) => false,
      Err(Stop::Failed(e)) => {
        debug!(error = %e, passes, "analysis failed");
        return Err(e);
      }
    };
    debug!(complete, insights = index.len(), passes, "analysis finished");
    Ok(complete)
  }

  fn find_insights(
    &self,
    mut marks: Marks,
    callback: &mut dyn Callback,
    index: &mut HashSet<Insight>,
    passes: &mut usize,
  ) -> Result<(), Stop> {
    loop {
      loop {
        let mut collector = Collector::new(marks.clone(), callback, index);
        find_overlaps(&marks, &mut collector)?;
        let found = collector.into_builder();
        *passes += 1;
        trace!(pass = "overlaps", found = found.is_some());
        self.check_cancelled()?;
        match found {
          Some(builder) => marks = builder.build(),
          None => break,
        }
      }
      let mut collector = Collector::new(marks.clone(), callback, index);
      find_sets(&marks, self.config.max_set_size, &mut collector)?;
      let found = collector.into_builder();
      *passes += 1;
      trace!(pass = "sets", found = found.is_some());
      self.check_cancelled()?;
      match found {
        Some(builder) => marks = builder.build(),
        None => break,
      }
    }

    let mut collector = Collector::new(marks.clone(), callback, index);
    if marks.has_errors() {
      find_errors(&marks, &mut collector)?;
      *passes += 1;
      trace!(pass = "errors");
      self.check_cancelled()?;
    }
    find_singleton_locations(&marks, &mut collector)?;
    find_singleton_numerals(&marks, &mut collector)?;
    *passes += 1;
    trace!(pass = "singletons");
    self.check_cancelled()
  }

  fn check_cancelled(&self) -> Result<(), Stop> {
    if self.cancel.is_cancelled() {
      Err(Stop::Cancelled)
    } else {
      Ok(())
    }
  }
}

/// Analyzes `marks` with the default settings.
pub fn analyze(marks: &Marks, callback: &mut dyn Callback) -> Result<bool, Error> {
  Analyzer::default().analyze(marks, callback)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::*;
  use crate::deduce::Overlap;
  use proptest::prelude::*;
  use serde::de::value::{Error as ValueError, MapDeserializer};
  use std::str::FromStr;

  const SOLUTION: &str = "
    5 3 4 | 6 7 8 | 9 1 2
    6 7 2 | 1 9 5 | 3 4 8
    1 9 8 | 3 4 2 | 5 6 7
    ------+-------+------
    8 5 9 | 7 6 1 | 4 2 3
    4 2 6 | 8 5 3 | 7 9 1
    7 1 3 | 9 2 4 | 8 5 6
    ------+-------+------
    9 6 1 | 5 3 7 | 2 8 4
    2 8 7 | 4 1 9 | 6 3 5
    3 4 5 | 2 8 6 | 1 7 9";

  const EASY: &str = "
    1 . . | . . . | . . .
    . . . | 2 . 3 | . . .
    . . . | 4 5 6 | . . .
    ------+-------+------
    . 2 3 | . . . | . . .
    . . 4 | . . . | . . .
    . 5 6 | . . . | . . .
    ------+-------+------
    . . . | . . . | . . .
    . . . | . . . | . . .
    . . . | . . . | . . .";

  // Puzzle 1:2:2017-2:67
  const REAL: &str = "
    . . . | 1 . 9 | . . 6
    . 2 . | . 5 8 | 1 . .
    . . . | 6 . . | . . 3
    ------+-------+------
    . . 9 | 2 . . | . 1 .
    . . 8 | . . . | 5 . .
    . 6 . | . . 4 | 7 . .
    ------+-------+------
    4 . . | . . 3 | . . .
    . . 3 | 7 . . | . . .
    9 . . | 8 . 1 | . . 5";

  fn marks(s: &str) -> Marks {
    Marks::from_grid(&Grid::from_str(s).unwrap())
  }

  fn ea(num: Num, loc: Loc) -> Insight {
    Insight::ExplicitAssignment {
      asgmt: Asgmt::new(num, loc),
    }
  }

  fn run(analyzer: &Analyzer, marks: &Marks) -> (Result<bool, Error>, Vec<Insight>) {
    let mut taken = vec![];
    let result = analyzer.analyze(marks, &mut |insight: Insight| -> Result<(), Stop> {
      taken.push(insight);
      Ok(())
    });
    (result, taken)
  }

  /// The antecedents of the implication whose consequent is `consequent`.
  fn antecedents_of(taken: &[Insight], consequent: &Insight) -> HashSet<Insight> {
    taken
      .iter()
      .find_map(|insight| match insight {
        Insight::Implication(imp) if imp.consequent() == consequent => {
          Some(imp.antecedents().iter().cloned().collect())
        }
        _ => None,
      })
      .unwrap_or_default()
  }

  #[test]
  fn stopped() {
    let complete = analyze(&marks(EASY), &mut |_: Insight| -> Result<(), Stop> {
      Err(Stop::Requested)
    });
    assert_eq!(Ok(false), complete);
  }

  #[test]
  fn cancelled() {
    let token = CancelToken::new();
    let analyzer = Analyzer::default().with_cancel_token(token.clone());
    let mut count = 0;
    let complete = analyzer.analyze(&marks(EASY), &mut |_: Insight| -> Result<(), Stop> {
      count += 1;
      token.cancel();
      Ok(())
    });
    assert_eq!(Ok(false), complete);
    assert!(count > 0);
    assert!(analyzer.cancel_token().is_cancelled());
  }

  #[test]
  fn complete() {
    let (result, taken) = run(&Analyzer::default(), &marks(EASY));
    assert_eq!(Ok(true), result);
    assert!(!taken.is_empty());
  }

  #[test]
  fn real_puzzle() {
    let (result, taken) = run(&Analyzer::default(), &marks(REAL));
    assert_eq!(Ok(true), result);

    let forced = Insight::ForcedLoc {
      unit: B1.unit_id(),
      num: N9,
      loc: L32,
    };
    assert_eq!(
      HashSet::from([ea(N9, L43), ea(N9, L91), ea(N9, L16)]),
      antecedents_of(&taken, &forced)
    );

    let overlap = Insight::Overlap(Overlap::new(
      B4.unit_id(),
      N4,
      UnitSubset::of(C2.unit_id(), [L12, L32]),
    ));
    assert_eq!(
      HashSet::from([ea(N4, L71), ea(N4, L66)]),
      antecedents_of(&taken, &overlap)
    );
  }

  #[test]
  fn insights_are_delivered_once() {
    let (_, taken) = run(&Analyzer::default(), &marks(REAL));
    let unique: HashSet<&Insight> = taken.iter().collect();
    assert_eq!(taken.len(), unique.len());
  }

  #[test]
  fn small_sets_are_optional() {
    let no_sets = Analyzer::new(AnalyzerConfig { max_set_size: 0 });
    let (result, taken) = run(&no_sets, &marks(REAL));
    assert_eq!(Ok(true), result);
    assert!(taken.iter().all(|insight| !matches!(insight.nub(), Insight::LockedSet(_))));
  }

  #[test]
  fn oversized_sets_are_unit_sized() {
    let huge = Analyzer::new(AnalyzerConfig {
      max_set_size: usize::MAX,
    });
    let nine = Analyzer::new(AnalyzerConfig { max_set_size: 9 });
    let (result, taken) = run(&huge, &marks(REAL));
    assert_eq!(Ok(true), result);
    assert_eq!(run(&nine, &marks(REAL)).1, taken);
  }

  #[test]
  fn config_defaults() {
    let empty = MapDeserializer::<_, ValueError>::new(std::iter::empty::<(&str, usize)>());
    assert_eq!(AnalyzerConfig::default(), AnalyzerConfig::deserialize(empty).unwrap());

    let two = MapDeserializer::<_, ValueError>::new([("max_set_size", 2usize)].into_iter());
    assert_eq!(2, AnalyzerConfig::deserialize(two).unwrap().max_set_size);
  }

  fn solution() -> Grid {
    Grid::from_str(SOLUTION).unwrap()
  }

  /// Givens drawn from the solution, one per true entry of `keep`.
  fn givens(keep: &[bool]) -> Grid {
    solution()
      .iter()
      .filter(|asgmt| keep[asgmt.loc.index()])
      .collect()
  }

  fn keep_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(prop::bool::weighted(0.4), Loc::COUNT)
  }

  /// The marks after applying every elimination an analysis finds.
  fn settled(grid: &Grid) -> Marks {
    let start = Marks::from_grid(grid);
    let mut builder = start.to_builder();
    analyze(&start, &mut |insight: Insight| -> Result<(), Stop> {
      if insight.is_elimination() {
        builder.add(&insight)?;
      }
      Ok(())
    })
    .unwrap();
    builder.build()
  }

  /// Checks that the picks cover every list, and that dropping any one pick
  /// leaves some list uncovered.
  fn check_minimal(marks: &Marks, lists: Vec<Vec<Insight>>) -> Result<(), TestCaseError> {
    let picked = marks.collect_antecedents_from(lists.clone()).unwrap();
    for list in &lists {
      prop_assert!(picked.iter().any(|insight| list.contains(insight)));
    }
    for (i, insight) in picked.iter().enumerate() {
      let needed = lists.iter().any(|list| {
        list.contains(insight)
          && picked
            .iter()
            .enumerate()
            .all(|(j, other)| j == i || !list.contains(other))
      });
      prop_assert!(needed, "{} is redundant", insight);
    }
    Ok(())
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn analysis_is_deterministic(keep in keep_strategy()) {
      let marks = Marks::from_grid(&givens(&keep));
      let (first_result, first) = run(&Analyzer::default(), &marks);
      let (second_result, second) = run(&Analyzer::default(), &marks);
      prop_assert_eq!(first_result, second_result);
      prop_assert_eq!(
        first.iter().map(Insight::cost).collect::<Vec<_>>(),
        second.iter().map(Insight::cost).collect::<Vec<_>>()
      );
      prop_assert_eq!(first, second);
    }

    #[test]
    fn insights_agree_with_the_solution(keep in keep_strategy()) {
      let solution = solution();
      let marks = Marks::from_grid(&givens(&keep));
      let (result, taken) = run(&Analyzer::default(), &marks);
      prop_assert_eq!(Ok(true), result);
      for insight in &taken {
        prop_assert!(!insight.is_error(), "{}", insight);
        for asgmt in insight.eliminations() {
          prop_assert_ne!(solution[asgmt.loc], Some(asgmt.num), "{}", insight);
        }
        if let Some(asgmt) = insight.assignment() {
          prop_assert_eq!(solution[asgmt.loc], Some(asgmt.num), "{}", insight);
        }
      }
    }

    #[test]
    fn antecedents_come_first(keep in keep_strategy()) {
      let marks = Marks::from_grid(&givens(&keep));
      let (_, taken) = run(&Analyzer::default(), &marks);
      let mut seen = HashSet::new();
      for insight in taken {
        if let Insight::Implication(imp) = &insight {
          let distinct: HashSet<&Insight> = imp.antecedents().iter().collect();
          prop_assert_eq!(distinct.len(), imp.antecedents().len());
          for antecedent in imp.antecedents() {
            prop_assert!(
              matches!(antecedent, Insight::ExplicitAssignment { .. }) || seen.contains(antecedent),
              "{} before {}", antecedent, insight
            );
          }
        }
        seen.insert(insight);
      }
    }

    #[test]
    fn rediscovery_delivers_nothing(keep in keep_strategy()) {
      let marks = Marks::from_grid(&givens(&keep));
      let mut index = HashSet::new();
      let mut first = |_: Insight| -> Result<(), Stop> { Ok(()) };
      let mut collector = Collector::new(marks.clone(), &mut first, &mut index);
      find_overlaps(&marks, &mut collector).unwrap();
      find_sets(&marks, 4, &mut collector).unwrap();
      drop(collector);

      let mut again = vec![];
      let mut second = |insight: Insight| -> Result<(), Stop> {
        again.push(insight);
        Ok(())
      };
      let mut collector = Collector::new(marks.clone(), &mut second, &mut index);
      find_overlaps(&marks, &mut collector).unwrap();
      find_sets(&marks, 4, &mut collector).unwrap();
      prop_assert!(collector.into_builder().is_none());
      prop_assert!(again.is_empty(), "{:?}", again);
    }

    #[test]
    fn singletons_are_exactly_the_lone_possibilities(keep in keep_strategy()) {
      let marks = settled(&givens(&keep));
      let mut found = HashSet::new();
      let mut callback = |insight: Insight| -> Result<(), Stop> {
        found.insert(insight);
        Ok(())
      };
      find_singleton_locations(&marks, &mut callback).unwrap();
      find_singleton_numerals(&marks, &mut callback).unwrap();

      let mut expected = HashSet::new();
      for un in UnitNum::all() {
        let possible = marks.possible_locations(un);
        if let (1, Some(loc)) = (possible.len(), possible.smallest_item()) {
          if !marks.has_assignment(loc) {
            expected.insert(Insight::ForcedLoc { unit: un.unit(), num: un.num(), loc });
          }
        }
      }
      for loc in Loc::all() {
        let possible = marks.possible_numerals(loc);
        if let (1, Some(num)) = (possible.len(), possible.smallest_item()) {
          if !marks.has_assignment(loc) {
            expected.insert(Insight::ForcedNum { loc, num });
          }
        }
      }
      prop_assert_eq!(expected, found);
    }

    #[test]
    fn set_eliminations_skip_only_assignment_eliminations(keep in keep_strategy()) {
      let solution = solution();
      let marks = settled(&givens(&keep));
      let mut found = vec![];
      find_sets(&marks, 4, &mut |insight: Insight| -> Result<(), Stop> {
        found.push(insight);
        Ok(())
      })
      .unwrap();
      for insight in &found {
        prop_assert!(!insight.eliminations().is_empty(), "{}", insight);
        for asgmt in insight.eliminations() {
          prop_assert!(
            marks.is_possible_assignment(asgmt.loc, asgmt.num)
              || !marks.is_eliminated_by_assignment(asgmt.loc, asgmt.num),
            "{} in {}", asgmt, insight
          );
          prop_assert_ne!(solution[asgmt.loc], Some(asgmt.num), "{}", insight);
        }
      }
    }

    #[test]
    fn antecedents_are_locally_minimal(keep in keep_strategy()) {
      let marks = settled(&givens(&keep));
      let ruled_out = |asgmts: Vec<Asgmt>| -> Vec<Vec<Insight>> {
        asgmts
          .into_iter()
          .map(|asgmt| marks.elimination_insights(asgmt))
          .filter(|list| !list.is_empty())
          .collect()
      };
      for loc in Loc::all() {
        if marks.has_assignment(loc) {
          continue;
        }
        let gone = !marks.possible_numerals(loc);
        let lists = ruled_out(gone.iter().map(|num| Asgmt::new(num, loc)).collect());
        check_minimal(&marks, lists)?;
      }
      for un in UnitNum::all() {
        if marks.has_unit_assignment(un) {
          continue;
        }
        let gone = UnitSubset::full(un.unit()) - marks.possible_locations(un);
        let lists = ruled_out(gone.iter().map(|loc| Asgmt::new(un.num(), loc)).collect());
        check_minimal(&marks, lists)?;
      }
    }

    #[test]
    fn eliminations_are_idempotent(keep in keep_strategy()) {
      let marks = Marks::from_grid(&givens(&keep));
      let (_, taken) = run(&Analyzer::default(), &marks);
      let eliminations: Vec<Insight> = taken.into_iter().filter(Insight::is_elimination).collect();
      let mut builder = marks.to_builder();
      for insight in &eliminations {
        builder.add(insight).unwrap();
      }
      let once = builder.build();
      for insight in &eliminations {
        builder.add(insight).unwrap();
      }
      let twice = builder.build();
      prop_assert!(!twice.has_errors());
      for loc in Loc::all() {
        prop_assert_eq!(once.possible_numerals(loc), twice.possible_numerals(loc));
      }
    }

    #[test]
    fn error_flag_never_clears(
      keep in keep_strategy(),
      removals in prop::collection::vec((0..Loc::COUNT, 0..Num::COUNT), 1..40),
    ) {
      let mut builder = Marks::builder(&givens(&keep));
      let mut had_errors = builder.has_errors();
      for (loc, num) in removals {
        let (Some(loc), Some(num)) = (Loc::from_index(loc), Num::from_index(num)) else {
          continue;
        };
        let insight = Insight::ExplicitElimination { asgmt: Asgmt::new(num, loc) };
        builder.add(&insight).unwrap();
        prop_assert!(!had_errors || builder.has_errors());
        had_errors = builder.has_errors();
      }
    }
  }
}
