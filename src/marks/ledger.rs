//! Defines the Ledger, which records the insights behind every elimination.

use crate::core::*;
use crate::deduce::Insight;
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// For every assignment, the insights that eliminated it, in the order they
/// were applied until someone reads them.
///
/// Each entry has its own lock, so readers of different assignments never
/// contend.  An entry is sorted at most once per append.
pub(crate) struct Ledger {
  entries: Box<[Mutex<Entry>]>,
}

#[derive(Clone, Debug, Default)]
struct Entry {
  insights: Vec<Insight>,
  /// Set when `insights` may be out of order.
  dirty: bool,
}

impl Ledger {
  pub(crate) fn new() -> Self {
    Ledger {
      entries: (0..Asgmt::COUNT).map(|_| Mutex::default()).collect(),
    }
  }

  /// Records that the insight eliminated the assignment.
  pub(crate) fn push(&mut self, asgmt: Asgmt, insight: Insight) {
    let entry = self.entries[asgmt.index()]
      .get_mut()
      .unwrap_or_else(PoisonError::into_inner);
    entry.insights.push(insight);
    entry.dirty = entry.insights.len() > 1;
  }

  /// Hands the assignment's insights to `f`, first sorting them with
  /// `order` if anything was appended since they were last sorted.  The sort
  /// is stable.
  pub(crate) fn read_sorted<R>(
    &self,
    asgmt: Asgmt,
    order: impl FnMut(&Insight, &Insight) -> Ordering,
    f: impl FnOnce(&[Insight]) -> R,
  ) -> R {
    let mut entry = self.entries[asgmt.index()]
      .lock()
      .unwrap_or_else(PoisonError::into_inner);
    if entry.dirty {
      entry.insights.sort_by(order);
      entry.dirty = false;
    }
    f(&entry.insights)
  }

  #[cfg(test)]
  fn is_dirty(&self, asgmt: Asgmt) -> bool {
    self.entries[asgmt.index()]
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .dirty
  }
}

impl Clone for Ledger {
  fn clone(&self) -> Self {
    Ledger {
      entries: self
        .entries
        .iter()
        .map(|entry| Mutex::new(entry.lock().unwrap_or_else(PoisonError::into_inner).clone()))
        .collect(),
    }
  }
}

impl fmt::Debug for Ledger {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let recorded = self
      .entries
      .iter()
      .filter(|entry| {
        !entry
          .lock()
          .unwrap_or_else(PoisonError::into_inner)
          .insights
          .is_empty()
      })
      .count();
    write!(f, "Ledger({} eliminations)", recorded)
  }
}
