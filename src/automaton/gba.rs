use std::fmt;

use fixedbitset::FixedBitSet;
use ltl::Formula;

use crate::automaton::{Automaton, Edge, StateIndex};

/// Where the acceptance sets of a generalized Büchi automaton live.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AcceptanceEncoding {
    /// Acceptance sets are sets of states; every edge carries the
    /// acceptance of its source state.
    States,
    /// Acceptance sets are sets of transitions.
    Transitions,
}

impl fmt::Display for AcceptanceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::States => write!(f, "state-based"),
            Self::Transitions => write!(f, "transition-based"),
        }
    }
}

/// A generalized Büchi automaton with `num_sets` acceptance sets.
///
/// Acceptance set `i` corresponds to the `i`-th Until subformula of the
/// normalized formula. An edge is in set `i` iff bit `i` of its
/// acceptance is set, independent of the encoding.
#[derive(Clone, Debug)]
pub struct Gba {
    automaton: Automaton<FixedBitSet, FixedBitSet>,
    num_sets: usize,
    encoding: AcceptanceEncoding,
    conditions: Vec<Formula>,
}

impl Gba {
    pub(crate) fn new(
        automaton: Automaton<FixedBitSet, FixedBitSet>,
        encoding: AcceptanceEncoding,
        conditions: Vec<Formula>,
    ) -> Self {
        Self {
            automaton,
            num_sets: conditions.len(),
            encoding,
            conditions,
        }
    }

    /// The underlying labelled graph.
    pub fn graph(&self) -> &Automaton<FixedBitSet, FixedBitSet> {
        &self.automaton
    }

    pub(crate) fn graph_mut(&mut self) -> &mut Automaton<FixedBitSet, FixedBitSet> {
        &mut self.automaton
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    pub fn encoding(&self) -> AcceptanceEncoding {
        self.encoding
    }

    /// The Until subformulas inducing the acceptance sets, in index order.
    pub fn conditions(&self) -> &[Formula] {
        &self.conditions
    }

    pub fn initial_state(&self) -> StateIndex {
        self.automaton.initial_state()
    }

    pub fn num_states(&self) -> usize {
        self.automaton.num_states()
    }

    pub fn edges(&self, state: StateIndex) -> &[Edge<FixedBitSet>] {
        self.automaton.edges(state)
    }

    /// Returns true if no edge is in some acceptance set, so that no run
    /// can be accepting.
    pub fn has_empty_acceptance(&self) -> bool {
        if self.automaton.num_transitions() == 0 {
            return true;
        }
        (0..self.num_sets).any(|i| {
            !self
                .automaton
                .transitions()
                .any(|(_, e)| e.acceptance().contains(i))
        })
    }
}

fn format_sets(sets: &FixedBitSet) -> String {
    let indices: Vec<_> = sets.ones().map(|i| i.to_string()).collect();
    format!(" {{{}}}", indices.join(","))
}

impl fmt::Display for Gba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "acceptance: {} sets, {}",
            self.num_sets, self.encoding
        )?;
        for (i, condition) in self.conditions.iter().enumerate() {
            writeln!(f, "  {}: {}", i, condition)?;
        }
        match self.encoding {
            AcceptanceEncoding::States => {
                self.automaton
                    .write_listing(f, "gba", format_sets, |_| String::new())
            }
            AcceptanceEncoding::Transitions => {
                self.automaton
                    .write_listing(f, "gba", |_| String::new(), format_sets)
            }
        }
    }
}
