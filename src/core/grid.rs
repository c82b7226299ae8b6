//! The Grid type: a Sudoku board with some of its locations filled in.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use super::*;
use crate::error::ParseGridError;

/// A Sudoku grid: a 9x9 array with each location holding an optional numeral
/// from 1 through 9.  Also viewable as a collection of `Asgmt`s.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Grid([Option<Num>; 81]);

impl Grid {
  /// Makes an empty Grid.
  pub const fn new() -> Grid {
    Grid([None; 81])
  }

  /// Empties the grid.
  pub fn clear(&mut self) {
    self.0.fill(None);
  }

  /// How many locations have numerals.
  pub fn len(&self) -> usize {
    self.0.iter().filter(|optional| optional.is_some()).count()
  }

  /// Whether no location has a numeral.
  pub fn is_empty(&self) -> bool {
    self.0.iter().all(Option::is_none)
  }

  /// Iterates the assignments in this grid, in location order.
  pub fn iter(&self) -> impl Iterator<Item = Asgmt> + '_ {
    Loc::all()
      .zip(self.0.iter())
      .filter_map(|(loc, optional)| optional.map(|num| Asgmt::new(num, loc)))
  }
}

impl Default for Grid {
  fn default() -> Self {
    Self::new()
  }
}

impl Index<Loc> for Grid {
  type Output = Option<Num>;

  fn index(&self, loc: Loc) -> &Option<Num> {
    // Safe because `loc.index()` is in 0..81.
    unsafe { self.0.get_unchecked(loc.index()) }
  }
}

impl IndexMut<Loc> for Grid {
  fn index_mut(&mut self, loc: Loc) -> &mut Option<Num> {
    // Safe because `loc.index()` is in 0..81.
    unsafe { self.0.get_unchecked_mut(loc.index()) }
  }
}

impl FromIterator<Asgmt> for Grid {
  fn from_iter<I: IntoIterator<Item = Asgmt>>(iter: I) -> Self {
    let mut grid = Grid::new();
    for asgmt in iter {
      grid[asgmt.loc] = Some(asgmt.num);
    }
    grid
  }
}

impl fmt::Display for Grid {
  /// Prints the grid in row-major order, with `.` for blanks.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for optional in self.0 {
      match optional {
        Some(num) => write!(f, "{}", num)?,
        None => f.write_str(".")?,
      }
    }
    Ok(())
  }
}

impl fmt::Debug for Grid {
  /// Prints the grid as ASCII art.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for row in Row::all() {
      if row.get() > 0 && row.get() % 3 == 0 {
        f.write_str("- - - + - - - + - - -\n")?;
      }
      for col in Col::all() {
        if col.get() > 0 {
          f.write_str(if col.get() % 3 == 0 { " | " } else { " " })?;
        }
        match self[Loc::at(row, col)] {
          Some(num) => write!(f, "{}", num)?,
          None => f.write_str(".")?,
        }
      }
      if row.get() < 8 {
        f.write_str("\n")?;
      }
    }
    Ok(())
  }
}

impl FromStr for Grid {
  type Err = ParseGridError;

  /// Parses a grid from a string holding exactly 81 location characters,
  /// plus any number of other characters.
  ///
  /// Location characters are `1` through `9` for a numeral, or `0` or `.` for
  /// a blank.  Everything else is skipped, so both the Display and Debug forms
  /// parse back to the same grid.
  fn from_str(s: &str) -> Result<Grid, ParseGridError> {
    let mut i = 0;
    let mut grid = Grid::new();
    for c in s.chars() {
      let num = match c {
        '.' | '0' => None,
        '1'..='9' => c.to_digit(10).and_then(|d| Num::new(d as i8)),
        _ => continue,
      };
      if i >= Loc::COUNT {
        return Err(ParseGridError::TooManyLocations);
      }
      grid.0[i] = num;
      i += 1;
    }
    if i == Loc::COUNT {
      Ok(grid)
    } else {
      Err(ParseGridError::TooFewLocations(i))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sized_correctly() {
    assert_eq!(std::mem::size_of::<Grid>(), Loc::COUNT);
  }

  #[test]
  fn clear() {
    let mut grid = Grid::new();
    assert!(grid.is_empty());
    grid[L55] = Some(N5);
    assert_eq!(grid.len(), 1);
    let grid2 = grid;
    grid.clear();
    assert_eq!(grid.len(), 0);
    assert_eq!(grid2.len(), 1);
    assert_eq!(vec![Asgmt::new(N5, L55)], grid2.iter().collect::<Vec<_>>());
  }

  #[test]
  fn strings() {
    let s = ".1..5..8.4.89.62.1..6...7....5.3.9.....8.7.....1.4.3....4...1..2.93.16.7.7..6..2.";
    let g = s.parse::<Grid>().unwrap();
    assert_eq!(s, g.to_string());
    let art = format!("{:?}", g);
    assert_eq!(
      art,
      r"
. 1 . | . 5 . | . 8 .
4 . 8 | 9 . 6 | 2 . 1
. . 6 | . . . | 7 . .
- - - + - - - + - - -
. . 5 | . 3 . | 9 . .
. . . | 8 . 7 | . . .
. . 1 | . 4 . | 3 . .
- - - + - - - + - - -
. . 4 | . . . | 1 . .
2 . 9 | 3 . 1 | 6 . 7
. 7 . | . 6 . | . 2 ."[1..]
    );
    assert_eq!(g, art.parse::<Grid>().unwrap());
    assert_eq!(g, g.iter().collect::<Grid>());
  }

  #[test]
  fn bad_strings() {
    assert_eq!(Err(ParseGridError::TooFewLocations(3)), "1.2".parse::<Grid>());
    let long = ".".repeat(82);
    assert_eq!(Err(ParseGridError::TooManyLocations), long.parse::<Grid>());
  }
}
