//! Linear temporal logic formulas and standard formula families.

pub mod formula;
pub mod patterns;

pub use formula::{Formula, Literal};
