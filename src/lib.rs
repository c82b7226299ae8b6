//! Finds the insights a person could use to make progress on a Sudoku, and
//! ranks them by how easy they are to see.

pub mod analyze;
pub mod core;
pub mod deduce;
pub mod error;
pub mod marks;
