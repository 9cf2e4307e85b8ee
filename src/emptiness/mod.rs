//! Emptiness checks for Büchi automata.
//!
//! A Büchi automaton has a non-empty language iff some accepting state is
//! reachable from an initial state and lies on a cycle. Such a lasso is
//! searched with a nested depth-first search on any [`BuchiGraph`], which
//! includes the on-the-fly [`Product`] of a property with a system.
//! Generalized automata can be checked without degeneralization
//! by [`check_generalized`].

mod generalized;
mod nested_dfs;
mod product;

use std::fmt;
use std::hash::Hash;

use crate::automaton::{Ba, Label, StateIndex};

pub use generalized::check_generalized;
pub use nested_dfs::{find_accepting_lasso, find_lasso_from};
pub use product::Product;

/// A graph with Büchi acceptance on its states, explored on demand.
pub trait BuchiGraph {
    type State: Copy + Eq + Hash + fmt::Debug;
    type Label: Clone;

    fn initial_states(&self) -> Vec<Self::State>;

    /// The labelled edges leaving the state, in a fixed order.
    fn successors(&self, state: Self::State) -> Vec<(Self::Label, Self::State)>;

    fn is_accepting(&self, state: Self::State) -> bool;

    /// Returns true if it is known without search that no state is accepting.
    fn has_empty_acceptance(&self) -> bool {
        false
    }
}

impl BuchiGraph for Ba {
    type State = StateIndex;
    type Label = Label;

    fn initial_states(&self) -> Vec<StateIndex> {
        if self.num_states() == 0 {
            Vec::new()
        } else {
            vec![self.initial_state()]
        }
    }

    fn successors(&self, state: StateIndex) -> Vec<(Label, StateIndex)> {
        self.edges(state)
            .iter()
            .map(|e| (e.label().clone(), e.successor()))
            .collect()
    }

    fn is_accepting(&self, state: StateIndex) -> bool {
        *self.state_acceptance(state)
    }

    fn has_empty_acceptance(&self) -> bool {
        self.accepting_states().next().is_none()
    }
}

/// An infinite run in the shape of a lasso: a finite prefix from the
/// initial state followed by a cycle that is repeated forever.
///
/// Each step is the label of the edge taken together with the state reached.
/// The cycle starts in the state reached by the prefix and its last step
/// returns to that state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lasso<S, L> {
    pub initial: S,
    pub prefix: Vec<(L, S)>,
    pub cycle: Vec<(L, S)>,
}

impl<S: Copy, L> Lasso<S, L> {
    /// The state in which the cycle starts and ends.
    pub fn cycle_start(&self) -> S {
        self.prefix.last().map_or(self.initial, |&(_, s)| s)
    }

    /// All states of the cycle, starting with its first state.
    pub fn cycle_states(&self) -> impl Iterator<Item = S> + '_ {
        std::iter::once(self.cycle_start()).chain(self.cycle.iter().map(|&(_, s)| s))
    }
}

impl<S: fmt::Display, L: fmt::Display> fmt::Display for Lasso<S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.initial)?;
        for (label, state) in &self.prefix {
            write!(f, " -[{}]-> {}", label, state)?;
        }
        write!(f, " (")?;
        for (i, (label, state)) in self.cycle.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "-[{}]-> {}", label, state)?;
        }
        write!(f, ")^ω")
    }
}

/// The result of an emptiness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<S, L> {
    /// No run is accepting.
    Empty,
    /// Some run is accepting. The lasso is a witness,
    /// if the search produces one.
    NonEmpty(Option<Lasso<S, L>>),
}

impl<S, L> Verdict<S, L> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn lasso(&self) -> Option<&Lasso<S, L>> {
        match self {
            Self::Empty => None,
            Self::NonEmpty(lasso) => lasso.as_ref(),
        }
    }

    pub fn into_lasso(self) -> Option<Lasso<S, L>> {
        match self {
            Self::Empty => None,
            Self::NonEmpty(lasso) => lasso,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Asserts that the lasso is a run of the graph through an accepting cycle.
    pub(crate) fn assert_valid_lasso<G>(graph: &G, lasso: &Lasso<G::State, G::Label>)
    where
        G: BuchiGraph,
        G::Label: PartialEq + fmt::Debug,
    {
        assert!(graph.initial_states().contains(&lasso.initial));
        let mut current = lasso.initial;
        for (label, state) in lasso.prefix.iter().chain(lasso.cycle.iter()) {
            assert!(
                graph.successors(current).contains(&(label.clone(), *state)),
                "no edge {:?} -[{:?}]-> {:?}",
                current,
                label,
                state
            );
            current = *state;
        }
        assert!(!lasso.cycle.is_empty());
        assert_eq!(current, lasso.cycle_start());
        assert!(lasso.cycle_states().any(|s| graph.is_accepting(s)));
    }

    #[test]
    fn test_lasso_display() {
        let lasso = Lasso {
            initial: 0,
            prefix: vec![("a", 1)],
            cycle: vec![("b", 2), ("c", 1)],
        };
        assert_eq!(lasso.cycle_start(), 1);
        assert_eq!(lasso.cycle_states().collect::<Vec<_>>(), vec![1, 2, 1]);
        assert_eq!(lasso.to_string(), "0 -[a]-> 1 (-[b]-> 2 -[c]-> 1)^ω");
    }
}
