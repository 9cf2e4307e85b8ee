//! Errors of the translation and checking procedures.

use thiserror::Error;

use ltl::Formula;

use crate::automaton::{Label, StateIndex};

/// Errors are precondition violations and are surfaced to the caller
/// immediately; none of them are retried.
#[derive(Debug, Error)]
pub enum Error {
    /// A formula outside the canonical basis reached the tableau.
    #[error("unsupported operator in normalized formula: {formula}")]
    UnsupportedOperator { formula: Formula },
    /// A state assumed to be deterministic has several successors for the same label.
    #[error("state {state} has more than one successor for label {label}")]
    NonDeterministic { state: StateIndex, label: Label },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
