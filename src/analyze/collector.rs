//! Defines the Collector, which stands between the discovery passes and the
//! analysis callback.

use super::{Callback, Stop};
use crate::deduce::{Implication, Insight};
use crate::marks::{Builder, Marks};
use std::collections::HashSet;

/// Drops insights already seen in this analysis, wraps the rest in
/// implications naming their antecedents, and applies the eliminations among
/// them to a copy of the marks.
pub(super) struct Collector<'a> {
  marks: Marks,
  delegate: &'a mut dyn Callback,
  index: &'a mut HashSet<Insight>,
  builder: Option<Builder>,
}

impl<'a> Collector<'a> {
  pub(super) fn new(
    marks: Marks,
    delegate: &'a mut dyn Callback,
    index: &'a mut HashSet<Insight>,
  ) -> Self {
    Collector {
      marks,
      delegate,
      index,
      builder: None,
    }
  }

  /// The marks with every collected elimination applied, if there were any.
  pub(super) fn into_builder(self) -> Option<Builder> {
    self.builder
  }
}

impl Callback for Collector<'_> {
  fn take(&mut self, insight: Insight) -> Result<(), Stop> {
    if !self.index.insert(insight.clone()) {
      return Ok(());
    }
    let antecedents = insight.collect_antecedents(&self.marks)?;
    let insight = if antecedents.is_empty() {
      insight
    } else {
      Insight::Implication(Implication::new(antecedents, insight)?)
    };
    if insight.is_elimination() {
      self
        .builder
        .get_or_insert_with(|| self.marks.to_builder())
        .add(&insight)?;
    }
    self.delegate.take(insight)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::*;
  use std::str::FromStr;

  #[test]
  fn wraps_dedups_and_applies() {
    let marks = Marks::from_grid(
      &Grid::from_str(
        "
        1 . . | . . . | . . .
        . . . | . . . | . . .
        . . . | . . . | . . .
        ------+-------+------
        . . . | . . . | . . .
        . . . | . . . | . . .
        . . . | . . . | . . .
        ------+-------+------
        . . . | . . . | . . .
        . . . | . . . | . . .
        . . . | . . . | . . .",
      )
      .unwrap(),
    );
    let mut taken = vec![];
    let mut index = HashSet::new();
    let mut delegate = |insight: Insight| -> Result<(), Stop> {
      taken.push(insight);
      Ok(())
    };
    let mut collector = Collector::new(marks.clone(), &mut delegate, &mut index);

    let forced = Insight::ForcedLoc {
      unit: B1.unit_id(),
      num: N1,
      loc: L11,
    };
    let elim = Insight::ExplicitElimination {
      asgmt: Asgmt::new(N2, L55),
    };
    collector.take(forced.clone()).unwrap();
    collector.take(forced.clone()).unwrap();
    collector.take(elim.clone()).unwrap();
    let builder = collector.into_builder().unwrap();
    assert!(!builder.possible_numerals(L55).contains(N2));
    assert!(marks.possible_numerals(L55).contains(N2));

    assert_eq!(2, taken.len());
    match &taken[0] {
      Insight::Implication(imp) => {
        assert_eq!(&forced, imp.consequent());
        assert_eq!(
          &[Insight::ExplicitAssignment {
            asgmt: Asgmt::new(N1, L11)
          }],
          imp.antecedents()
        );
      }
      other => panic!("not an implication: {}", other),
    }
    assert_eq!(elim, taken[1]);
  }
}
