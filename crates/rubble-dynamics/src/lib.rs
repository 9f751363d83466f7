pub mod bodies;
pub mod solver;

pub use bodies::{Bodies, BodyDesc, AutoDisable};
pub use solver::{Row, RowBound, solve_rows};
