//! Degeneralization of generalized Büchi automata.
//!
//! The generalized automaton is synchronized with a counter automaton over
//! the acceptance sets. Counter state `i < k` waits for acceptance set `i`,
//! and counter state `k` is reached whenever all sets were seen in order.

use std::collections::HashMap;

use fixedbitset::FixedBitSet;
use log::{debug, info, trace};
use ltl::Literal;

use crate::automaton::{AcceptanceEncoding, Ba, BaBuilder, Edge, Gba, Label, StateIndex};
use crate::error::Result;

fn acceptance_label<I: IntoIterator<Item = usize>>(sets: I) -> Label {
    sets.into_iter()
        .map(|i| Literal::positive(format!("acc{}", i)))
        .collect()
}

/// The counter automaton over `k` acceptance sets.
///
/// Its letters are sets of acceptance indices, encoded as labels over the
/// propositions `acc<i>`. An edge labelled with a set claims that all these
/// sets are visited. The edge with the empty label is the default edge.
pub struct Counter {
    automaton: Ba,
    num_sets: usize,
}

impl Counter {
    pub fn new(num_sets: usize) -> Self {
        let mut builder = BaBuilder::new();
        let states: Vec<_> = (0..=num_sets)
            .map(|i| builder.state(i.to_string(), i == num_sets))
            .collect();
        for i in 0..num_sets {
            for j in i..num_sets {
                builder.edge(states[i], acceptance_label(i..=j), states[j + 1]);
            }
            builder.edge(states[i], Label::top(), states[i]);
        }
        // the collector starts over with set 0
        for j in 0..num_sets {
            builder.edge(states[num_sets], acceptance_label(0..=j), states[j + 1]);
        }
        builder.edge(states[num_sets], Label::top(), states[0]);
        builder.initial(states[num_sets]);
        Self {
            automaton: builder.build(),
            num_sets,
        }
    }

    pub fn automaton(&self) -> &Ba {
        &self.automaton
    }

    /// The successor of the counter state for an edge visiting the given
    /// acceptance sets.
    ///
    /// Non-default edges are scanned by ascending size of their label, and
    /// the first one not claiming any unvisited set is taken. The default
    /// edge is taken if there is no such edge.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NonDeterministic`] if the chosen label leads
    /// to more than one counter state.
    pub fn step(&self, state: StateIndex, visited: &FixedBitSet) -> Result<StateIndex> {
        let visited = acceptance_label(visited.ones());
        let mut candidates: Vec<&Edge<()>> = self
            .automaton
            .edges(state)
            .iter()
            .filter(|e| !e.label().is_empty())
            .collect();
        candidates.sort_by_key(|e| e.label().len());
        let label = candidates
            .into_iter()
            .map(Edge::label)
            .find(|label| visited.entails(label))
            .cloned()
            .unwrap_or_else(Label::top);
        Ok(self.automaton.successor(state, &label)?.unwrap_or(state))
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }
}

/// Converts a generalized Büchi automaton into a language-equivalent
/// Büchi automaton.
///
/// Automata without acceptance sets, and state-based automata with one
/// acceptance set, are converted by the identity transform. Otherwise the
/// reachable part of the product with the [`Counter`] is built, where a
/// product state is accepting if the counter is in its final state.
pub fn degeneralize(gba: &Gba) -> Result<Ba> {
    info!("Degeneralizing automaton with {} acceptance sets", gba.num_sets());
    let ba = match (gba.num_sets(), gba.encoding()) {
        (0, _) => identity(gba, |_| true),
        (1, AcceptanceEncoding::States) => {
            identity(gba, |s| gba.graph().state_acceptance(s).contains(0))
        }
        _ => product(gba, &Counter::new(gba.num_sets()))?,
    };
    debug!(
        "Degeneralized automaton has {} states and {} transitions",
        ba.num_states(),
        ba.num_transitions()
    );
    Ok(ba)
}

fn identity<F: Fn(StateIndex) -> bool>(gba: &Gba, accepting: F) -> Ba {
    let graph = gba.graph();
    let mut builder = BaBuilder::new();
    for state in graph.states() {
        builder.state(graph.name(state), accepting(state));
    }
    for (state, edge) in graph.transitions() {
        builder.edge(state, edge.label().clone(), edge.successor());
    }
    builder.initial(graph.initial_state());
    builder.build()
}

fn product(gba: &Gba, counter: &Counter) -> Result<Ba> {
    let graph = gba.graph();
    let counter_final = counter.automaton().initial_state();
    let mut builder = BaBuilder::new();
    let mut indices: HashMap<(StateIndex, StateIndex), StateIndex> = HashMap::new();

    let initial = (graph.initial_state(), counter_final);
    let index = builder.state(
        format!("{},{}", graph.name(initial.0), initial.1),
        initial.1 == counter_final,
    );
    indices.insert(initial, index);
    builder.initial(index);

    let mut stack = vec![initial];
    while let Some((state, count)) = stack.pop() {
        let source = indices[&(state, count)];
        for edge in graph.edges(state) {
            let next_count = counter.step(count, edge.acceptance())?;
            let target = (edge.successor(), next_count);
            let successor = match indices.get(&target) {
                Some(&successor) => successor,
                None => {
                    let successor = builder.state(
                        format!("{},{}", graph.name(target.0), target.1),
                        target.1 == counter_final,
                    );
                    trace!("New product state {} for {:?}", successor, target);
                    indices.insert(target, successor);
                    stack.push(target);
                    successor
                }
            };
            builder.edge(source, edge.label().clone(), successor);
        }
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Automaton;
    use crate::automaton::tests::label;
    use crate::options::TableauVariant;
    use crate::tableau::expand;
    use ltl::{patterns, Formula};

    fn sets(ones: &[usize]) -> FixedBitSet {
        let mut sets = FixedBitSet::with_capacity(3);
        for &i in ones {
            sets.insert(i);
        }
        sets
    }

    #[test]
    fn test_counter_steps() {
        let counter = Counter::new(3);
        let s = StateIndex::new;
        assert_eq!(counter.automaton().num_states(), 4);
        assert_eq!(counter.automaton().initial_state(), s(3));
        assert!(counter.automaton().is_deterministic());

        // smallest satisfied claim first
        assert_eq!(counter.step(s(0), &sets(&[0, 1])).unwrap(), s(1));
        assert_eq!(counter.step(s(0), &sets(&[1, 2])).unwrap(), s(0));
        assert_eq!(counter.step(s(2), &sets(&[2])).unwrap(), s(3));
        // the collector starts over with set 0, or falls back to waiting for it
        assert_eq!(counter.step(s(3), &sets(&[0])).unwrap(), s(1));
        assert_eq!(counter.step(s(3), &sets(&[1, 2])).unwrap(), s(0));
        assert_eq!(counter.step(s(3), &sets(&[])).unwrap(), s(0));
    }

    #[test]
    fn test_single_set_identity() {
        let gba = expand(&patterns::until_chain(2), TableauVariant::Gpvw).unwrap();
        let ba = degeneralize(&gba).unwrap();
        assert_eq!(ba.num_states(), gba.num_states());
        assert_eq!(ba.num_transitions(), gba.graph().num_transitions());
        assert_eq!(ba.initial_state(), gba.initial_state());
        for state in gba.graph().states() {
            assert_eq!(
                ba.is_accepting(state),
                gba.graph().state_acceptance(state).contains(0)
            );
            let gba_edges: Vec<_> = gba
                .edges(state)
                .iter()
                .map(|e| (e.successor(), e.label().clone()))
                .collect();
            let ba_edges: Vec<_> = ba
                .edges(state)
                .iter()
                .map(|e| (e.successor(), e.label().clone()))
                .collect();
            assert_eq!(gba_edges, ba_edges);
        }
    }

    #[test]
    fn test_until_product() {
        let gba = expand(&patterns::until_chain(2), TableauVariant::BitVector).unwrap();
        let ba = degeneralize(&gba).unwrap();
        // (init,1), (X{},1), (X{p1 U p2},0)
        assert_eq!(ba.num_states(), 3);
        assert!(ba.is_accepting(ba.initial_state()));
        let accepting_loops: Vec<_> = ba
            .accepting_states()
            .filter(|&s| ba.edges(s).iter().any(|e| e.successor() == s))
            .collect();
        assert_eq!(accepting_loops.len(), 1);
        let state = accepting_loops[0];
        assert_eq!(
            ba.edges(state)
                .iter()
                .map(|e| e.label().clone())
                .collect::<Vec<_>>(),
            vec![Label::top()]
        );
        assert!(ba
            .edges(ba.initial_state())
            .iter()
            .any(|e| e.label() == &label(&["p2"]) && e.successor() == state));
    }

    #[test]
    fn test_false_stays_empty() {
        let gba = expand(&Formula::False, TableauVariant::BitVector).unwrap();
        let ba = degeneralize(&gba).unwrap();
        assert_eq!(ba.num_transitions(), 0);
    }

    #[test]
    fn test_two_sets_need_both() {
        let gba = expand(&patterns::gf_conjunction(2), TableauVariant::BitVector).unwrap();
        assert_eq!(gba.num_sets(), 2);
        let ba: Automaton<bool, ()> = degeneralize(&gba).unwrap();
        assert!(!ba.has_empty_acceptance());
        // the counter reaches its final state only through a visit to the last set
        let p2 = Literal::positive("p2");
        for (source, edge) in ba.transitions() {
            if source != ba.initial_state() && ba.is_accepting(edge.successor()) {
                assert!(edge.label().contains(&p2));
            }
        }
    }
}
