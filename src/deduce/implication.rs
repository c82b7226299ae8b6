use super::Insight;
use crate::core::*;
use crate::error::Error;
use itertools::Itertools;
use std::sync::Arc;

/// An insight together with the earlier insights it follows from.
///
/// Duplicate antecedents are dropped, keeping the first of each.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Implication {
  antecedents: Arc<[Insight]>,
  consequent: Arc<Insight>,
  cost: i32,
}

impl Implication {
  pub fn new(antecedents: Vec<Insight>, consequent: Insight) -> Result<Self, Error> {
    if antecedents.is_empty() {
      return Err(Error::NoAntecedents);
    }
    let antecedents: Arc<[Insight]> = antecedents.into_iter().unique().collect();
    let mut locs = LocSet::new();
    for antecedent in antecedents.iter() {
      antecedent.add_assignment_locations(true, &mut locs);
    }
    consequent.add_assignment_locations(false, &mut locs);
    Ok(Implication {
      antecedents,
      consequent: Arc::new(consequent),
      cost: locs.len(),
    })
  }

  pub fn antecedents(&self) -> &[Insight] {
    &self.antecedents
  }

  pub fn consequent(&self) -> &Insight {
    &self.consequent
  }

  /// How many distinct assigned locations the antecedents rest on.
  pub fn cost(&self) -> i32 {
    self.cost
  }
}

/// An assignment shown to be impossible because making it leads to an error.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DisprovedAssignment {
  asgmt: Asgmt,
  error: Arc<Insight>,
  cost: i32,
}

impl DisprovedAssignment {
  /// Fails unless `error` is an error insight, or implies one.
  pub fn new(asgmt: Asgmt, error: Insight) -> Result<Self, Error> {
    if !error.is_error() {
      return Err(Error::NotAnError(error.to_string()));
    }
    let mut locs = asgmt.loc.as_set();
    error.add_assignment_locations(false, &mut locs);
    Ok(DisprovedAssignment {
      asgmt,
      error: Arc::new(error),
      cost: locs.len(),
    })
  }

  /// The assignment ruled out.
  pub fn asgmt(&self) -> Asgmt {
    self.asgmt
  }

  pub fn resulting_error(&self) -> &Insight {
    &self.error
  }

  pub fn cost(&self) -> i32 {
    self.cost
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn explicit(num: Num, loc: Loc) -> Insight {
    Insight::ExplicitAssignment {
      asgmt: Asgmt::new(num, loc),
    }
  }

  #[test]
  fn duplicate_antecedents_are_dropped() {
    let imp = Implication::new(
      vec![explicit(N1, L11), explicit(N2, L22), explicit(N1, L11)],
      Insight::BarredLoc { loc: L33 },
    )
    .unwrap();
    assert_eq!(&[explicit(N1, L11), explicit(N2, L22)], imp.antecedents());
    assert_eq!(2, imp.cost());
  }

  #[test]
  fn shared_locations_count_once() {
    let inner = Insight::Implication(
      Implication::new(
        vec![explicit(N1, L11)],
        Insight::ForcedNum { loc: L22, num: N2 },
      )
      .unwrap(),
    );
    let outer = Implication::new(
      vec![inner, explicit(N1, L11)],
      Insight::BarredLoc { loc: L33 },
    )
    .unwrap();
    assert_eq!(2, outer.cost());
  }

  #[test]
  fn disproved_cost_includes_its_own_location() {
    let disproved = DisprovedAssignment::new(Asgmt::new(N4, L11), Insight::BarredLoc { loc: L12 }).unwrap();
    assert_eq!(1, disproved.cost());
    assert_eq!(&Insight::BarredLoc { loc: L12 }, disproved.resulting_error());
  }
}
