//! The board primitives the deduction engine is built from.
//!
//! Among these are:
//!
//! - Grid: the 9x9 Sudoku board
//! - Num: the 9 numerals that go in the grid's squares
//! - Loc: the 81 locations of the grid
//! - Row, Col, Blk and UnitId: the units of the grid
//! - UnitNum: a unit paired with a numeral
//! - NumSet, LocSet and UnitSubset: sets of the above

mod asgmt;
pub mod bits;
mod grid;
mod id_types;
mod loc;
mod num;
mod set;
mod subset;
mod units;

pub use asgmt::*;
pub use grid::*;
pub use loc::*;
pub use num::*;
pub use set::Set;
pub use subset::*;
pub use units::*;
