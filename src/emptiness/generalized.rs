use std::collections::HashMap;

use fixedbitset::FixedBitSet;
use log::{debug, info, trace};

use crate::automaton::{Gba, Label, StateIndex};

use super::Verdict;

/// A root of a strongly connected component on the search path,
/// with the acceptance sets collected inside the component so far.
struct Root {
    index: usize,
    label: FixedBitSet,
}

/// Search state for the emptiness check of generalized Büchi automata.
///
/// This is the check of Couvreur: states are numbered in depth-first order,
/// and every partially explored strongly connected component is represented
/// by its root on a separate stack. Closing a cycle merges all components on
/// the cycle and propagates their collected acceptance sets to the new root.
struct Search<'a> {
    gba: &'a Gba,
    all_sets: FixedBitSet,
    /// Depth-first numbers, where 0 marks states of completed components.
    numbers: HashMap<StateIndex, usize>,
    roots: Vec<Root>,
    /// The acceptance sets of the edge by which each root was entered.
    arcs: Vec<FixedBitSet>,
    /// States of components that are not yet completed.
    live: Vec<StateIndex>,
    /// The explicit depth-first search stack of states and next edge positions.
    stack: Vec<(StateIndex, usize)>,
}

impl<'a> Search<'a> {
    fn new(gba: &'a Gba) -> Self {
        let mut all_sets = FixedBitSet::with_capacity(gba.num_sets());
        all_sets.insert_range(..);
        Self {
            gba,
            all_sets,
            numbers: HashMap::new(),
            roots: Vec::new(),
            arcs: Vec::new(),
            live: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn enter(&mut self, state: StateIndex, arc: FixedBitSet) {
        let number = self.numbers.len() + 1;
        self.numbers.insert(state, number);
        self.roots.push(Root {
            index: number,
            label: FixedBitSet::with_capacity(self.gba.num_sets()),
        });
        self.arcs.push(arc);
        self.live.push(state);
        self.stack.push((state, 0));
    }

    /// Merges all components entered after the target of a back edge into
    /// the component of the target and returns the collected acceptance sets.
    fn propagate(&mut self, target: usize, arc: &FixedBitSet) -> FixedBitSet {
        let mut collected = arc.clone();
        while let Some(root) = self.roots.last() {
            if root.index <= target {
                break;
            }
            if let Some(root) = self.roots.pop() {
                collected.union_with(&root.label);
            }
            if let Some(arc) = self.arcs.pop() {
                collected.union_with(&arc);
            }
        }
        if let Some(root) = self.roots.last_mut() {
            root.label.union_with(&collected);
            root.label.clone()
        } else {
            collected
        }
    }

    /// Removes the completed component rooted in the state.
    fn close(&mut self, state: StateIndex) {
        self.roots.pop();
        self.arcs.pop();
        while let Some(live) = self.live.pop() {
            self.numbers.insert(live, 0);
            if live == state {
                break;
            }
        }
    }

    fn run(&mut self) -> bool {
        let gba = self.gba;
        self.enter(
            gba.initial_state(),
            FixedBitSet::with_capacity(gba.num_sets()),
        );
        while let Some(&(state, position)) = self.stack.last() {
            let edges = gba.edges(state);
            if position < edges.len() {
                if let Some(top) = self.stack.last_mut() {
                    top.1 += 1;
                }
                let edge = &edges[position];
                match self.numbers.get(&edge.successor()) {
                    None => self.enter(edge.successor(), edge.acceptance().clone()),
                    Some(0) => {}
                    Some(&number) => {
                        let collected = self.propagate(number, edge.acceptance());
                        trace!(
                            "Cycle through {} collects {} of {} sets",
                            edge.successor(),
                            collected.count_ones(..),
                            gba.num_sets()
                        );
                        if self.all_sets.is_subset(&collected) {
                            return true;
                        }
                    }
                }
            } else {
                self.stack.pop();
                let number = self.numbers.get(&state).copied().unwrap_or(0);
                if self.roots.last().map_or(false, |r| r.index == number) {
                    self.close(state);
                }
            }
        }
        false
    }
}

/// Checks emptiness of a generalized Büchi automaton directly.
///
/// The language is non-empty iff some reachable strongly connected component
/// contains edges from every acceptance set. For an automaton without
/// acceptance sets any reachable cycle is accepting. No witness is produced.
pub fn check_generalized(gba: &Gba) -> Verdict<StateIndex, Label> {
    info!("Checking emptiness of generalized automaton");
    if gba.num_states() == 0 || gba.has_empty_acceptance() {
        debug!("Acceptance cannot be satisfied, skipping search");
        return Verdict::Empty;
    }
    let mut search = Search::new(gba);
    if search.run() {
        Verdict::NonEmpty(None)
    } else {
        debug!("Explored {} states without accepting cycle", search.numbers.len());
        Verdict::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::tests::label;
    use crate::automaton::{AcceptanceEncoding, Automaton, Edge};
    use ltl::Formula;

    fn sets(ones: &[usize]) -> FixedBitSet {
        let mut sets = FixedBitSet::with_capacity(2);
        for &i in ones {
            sets.insert(i);
        }
        sets
    }

    /// q0 -> q1 -> q2 -> q1 and q2 -> q3 -> q3, with edge acceptance as given.
    fn gba(loop_sets: (&[usize], &[usize]), sink_sets: &[usize]) -> Gba {
        let mut automaton = Automaton::default();
        let q: Vec<_> = (0..4)
            .map(|i| automaton.add_state(format!("q{}", i), sets(&[])))
            .collect();
        automaton.add_edge(q[0], Edge::new(q[1], label(&["a"]), sets(&[])));
        automaton.add_edge(q[1], Edge::new(q[2], label(&["b"]), sets(loop_sets.0)));
        automaton.add_edge(q[2], Edge::new(q[1], label(&["c"]), sets(loop_sets.1)));
        automaton.add_edge(q[2], Edge::new(q[3], label(&["d"]), sets(&[0, 1])));
        automaton.add_edge(q[3], Edge::new(q[3], label(&["e"]), sets(sink_sets)));
        let conditions = vec![
            Formula::until(Formula::prop("a"), Formula::prop("b")),
            Formula::until(Formula::prop("c"), Formula::prop("d")),
        ];
        Gba::new(automaton, AcceptanceEncoding::Transitions, conditions)
    }

    #[test]
    fn test_sets_collected_along_cycle() {
        assert!(!check_generalized(&gba((&[0], &[1]), &[])).is_empty());
        assert!(check_generalized(&gba((&[0], &[0]), &[1])).is_empty());
        // the edge into the sink is in both sets but not on a cycle
        assert!(check_generalized(&gba((&[], &[]), &[])).is_empty());
        assert!(!check_generalized(&gba((&[], &[]), &[0, 1])).is_empty());
    }

    #[test]
    fn test_no_sets_needs_cycle() {
        let mut automaton = Automaton::default();
        let q0 = automaton.add_state("q0", FixedBitSet::new());
        let q1 = automaton.add_state("q1", FixedBitSet::new());
        automaton.add_edge(q0, Edge::new(q1, label(&["a"]), FixedBitSet::new()));
        let acyclic = Gba::new(automaton.clone(), AcceptanceEncoding::Transitions, vec![]);
        assert!(check_generalized(&acyclic).is_empty());

        automaton.add_edge(q1, Edge::new(q1, Label::top(), FixedBitSet::new()));
        let cyclic = Gba::new(automaton, AcceptanceEncoding::Transitions, vec![]);
        assert!(!check_generalized(&cyclic).is_empty());
    }
}
