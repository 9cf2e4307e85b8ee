use std::collections::BTreeSet;
use std::fmt;

use fixedbitset::FixedBitSet;

use crate::automaton::{Automaton, Edge, Label, StateIndex};
use crate::error::Result;

/// A Rabin pair `(E, F)`: a run satisfies the pair if it visits states
/// of `E` only finitely often and states of `F` infinitely often.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RabinPair {
    id: usize,
    avoid: FixedBitSet,
    visit: FixedBitSet,
}

impl RabinPair {
    pub(crate) fn new(id: usize, avoid: FixedBitSet, visit: FixedBitSet) -> Self {
        Self { id, avoid, visit }
    }

    /// The Safra node id this pair was derived from.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns true if the state is in the set `E` of states to visit finitely often.
    pub fn avoids(&self, state: StateIndex) -> bool {
        self.avoid.contains(state.index())
    }

    /// Returns true if the state is in the set `F` of states to visit infinitely often.
    pub fn visits(&self, state: StateIndex) -> bool {
        self.visit.contains(state.index())
    }
}

/// A deterministic Rabin automaton.
#[derive(Clone, Debug, Default)]
pub struct RabinAutomaton {
    automaton: Automaton<(), ()>,
    pairs: Vec<RabinPair>,
}

impl RabinAutomaton {
    pub(crate) fn new(automaton: Automaton<(), ()>, pairs: Vec<RabinPair>) -> Self {
        Self { automaton, pairs }
    }

    pub fn graph(&self) -> &Automaton<(), ()> {
        &self.automaton
    }

    pub fn initial_state(&self) -> StateIndex {
        self.automaton.initial_state()
    }

    pub fn num_states(&self) -> usize {
        self.automaton.num_states()
    }

    pub fn edges(&self, state: StateIndex) -> &[Edge<()>] {
        self.automaton.edges(state)
    }

    pub fn pairs(&self) -> &[RabinPair] {
        &self.pairs
    }

    /// The successor of a state for exactly the given label, if any.
    pub fn post(&self, state: StateIndex, label: &Label) -> Result<Option<StateIndex>> {
        self.automaton.successor(state, label)
    }

    /// The indices of the pairs whose `E` resp. `F` set contain the state.
    pub fn acceptance(&self, state: StateIndex) -> (Vec<usize>, Vec<usize>) {
        let avoid = (0..self.pairs.len())
            .filter(|&i| self.pairs[i].avoids(state))
            .collect();
        let visit = (0..self.pairs.len())
            .filter(|&i| self.pairs[i].visits(state))
            .collect();
        (avoid, visit)
    }

    /// Returns true if a run visiting exactly the given states infinitely
    /// often is accepting.
    pub fn accepts_infinity_set(&self, states: &BTreeSet<StateIndex>) -> bool {
        self.pairs.iter().any(|pair| {
            states.iter().all(|&s| !pair.avoids(s)) && states.iter().any(|&s| pair.visits(s))
        })
    }
}

impl fmt::Display for RabinAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "acceptance: {} pairs", self.pairs.len())?;
        for (i, pair) in self.pairs.iter().enumerate() {
            let avoid: Vec<_> = pair.avoid.ones().map(|s| s.to_string()).collect();
            let visit: Vec<_> = pair.visit.ones().map(|s| s.to_string()).collect();
            writeln!(
                f,
                "  {} (node {}): E = {{{}}}, F = {{{}}}",
                i,
                pair.id,
                avoid.join(","),
                visit.join(",")
            )?;
        }
        self.automaton
            .write_listing(f, "rabin", |_| String::new(), |_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::tests::label;

    #[test]
    fn test_rabin_acceptance() {
        let mut automaton = Automaton::default();
        let q0 = automaton.add_state("q0", ());
        let q1 = automaton.add_state("q1", ());
        automaton.add_edge(q0, Edge::new(q1, label(&["a"]), ()));
        automaton.add_edge(q1, Edge::new(q1, label(&["a"]), ()));
        automaton.add_edge(q1, Edge::new(q0, label(&["b"]), ()));

        let mut avoid = FixedBitSet::with_capacity(2);
        avoid.insert(q0.index());
        let mut visit = FixedBitSet::with_capacity(2);
        visit.insert(q1.index());
        let rabin = RabinAutomaton::new(automaton, vec![RabinPair::new(1, avoid, visit)]);

        assert_eq!(rabin.acceptance(q0), (vec![0], vec![]));
        assert_eq!(rabin.acceptance(q1), (vec![], vec![0]));
        assert_eq!(rabin.post(q0, &label(&["a"])).unwrap(), Some(q1));
        assert_eq!(rabin.post(q0, &label(&["b"])).unwrap(), None);

        let only_q1: BTreeSet<_> = vec![q1].into_iter().collect();
        let both: BTreeSet<_> = vec![q0, q1].into_iter().collect();
        assert!(rabin.accepts_infinity_set(&only_q1));
        assert!(!rabin.accepts_infinity_set(&both));
    }
}
