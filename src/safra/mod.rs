//! Determinization of Büchi automata into Rabin automata by Safra's construction.
//!
//! Described in:
//! [On the complexity of ω-automata](https://doi.org/10.1109/SFCS.1988.21948),
//! S. Safra, FOCS 1988.

mod tree;

use std::collections::{BTreeSet, HashMap};

use fixedbitset::FixedBitSet;
use log::{debug, info, trace};

use crate::automaton::{Automaton, Ba, Edge, RabinAutomaton, RabinPair, StateIndex};
use crate::options::ExplorationStrategy;
use crate::queue::Worklist;
pub use tree::SafraNode;

/// Determinizes the automaton, exploring Safra trees in breadth-first order.
pub fn determinize(ba: &Ba) -> RabinAutomaton {
    determinize_with(ba, ExplorationStrategy::Bfs)
}

/// Determinizes the automaton, exploring Safra trees in the order
/// given by the strategy. The strategy only affects state numbering.
///
/// Edge labels are treated as letters: a tree has one successor per
/// distinct label leaving the states of its root.
pub fn determinize_with(ba: &Ba, strategy: ExplorationStrategy) -> RabinAutomaton {
    info!("Determinizing automaton with {} states", ba.num_states());
    let rabin = Determinizer::new(ba).run(Worklist::new(strategy));
    debug!(
        "Rabin automaton has {} states and {} pairs",
        rabin.num_states(),
        rabin.pairs().len()
    );
    rabin
}

struct Determinizer<'a> {
    ba: &'a Ba,
    accepting: BTreeSet<StateIndex>,
    trees: Vec<SafraNode>,
    indices: HashMap<SafraNode, StateIndex>,
    automaton: Automaton<(), ()>,
}

impl<'a> Determinizer<'a> {
    fn new(ba: &'a Ba) -> Self {
        Self {
            ba,
            accepting: ba.accepting_states().collect(),
            trees: Vec::new(),
            indices: HashMap::new(),
            automaton: Automaton::default(),
        }
    }

    /// Returns the state for the tree, and whether it is new.
    fn intern(&mut self, tree: SafraNode) -> (StateIndex, bool) {
        if let Some(&state) = self.indices.get(&tree) {
            return (state, false);
        }
        let state = self.automaton.add_state(tree.to_string(), ());
        trace!("New Safra tree {}: {}", state, tree);
        self.indices.insert(tree.clone(), state);
        self.trees.push(tree);
        (state, true)
    }

    fn run(mut self, mut worklist: Worklist<StateIndex, usize>) -> RabinAutomaton {
        if self.ba.num_states() == 0 {
            return RabinAutomaton::default();
        }
        let mut initial_macro = BTreeSet::new();
        initial_macro.insert(self.ba.initial_state());
        let (initial, _) = self.intern(SafraNode::leaf(0, initial_macro));
        self.automaton.set_initial_state(initial);
        worklist.push_first(initial);

        while let Some(state) = worklist.pop() {
            let tree = self.trees[state.index()].clone();
            let letters: Vec<_> = self
                .ba
                .alphabet(tree.macro_state())
                .into_iter()
                .cloned()
                .collect();
            for letter in letters {
                if let Some(successor) = tree.successor(self.ba, &self.accepting, &letter) {
                    let score = successor.size();
                    let (index, new) = self.intern(successor);
                    if new {
                        worklist.push(index, score);
                    }
                    self.automaton.add_edge(state, Edge::new(index, letter, ()));
                }
            }
        }
        let pairs = self.pairs();
        RabinAutomaton::new(self.automaton, pairs)
    }

    /// One pair per node id: the states whose tree lacks the id are
    /// visited finitely often, the states where it is marked infinitely often.
    fn pairs(&self) -> Vec<RabinPair> {
        let ids: BTreeSet<usize> = self
            .trees
            .iter()
            .flat_map(|t| t.nodes().map(SafraNode::id))
            .collect();
        ids.into_iter()
            .map(|id| {
                let mut avoid = FixedBitSet::with_capacity(self.trees.len());
                let mut visit = FixedBitSet::with_capacity(self.trees.len());
                for (i, tree) in self.trees.iter().enumerate() {
                    match tree.find(id) {
                        None => avoid.insert(i),
                        Some(node) if node.is_marked() => visit.insert(i),
                        Some(_) => {}
                    }
                }
                RabinPair::new(id, avoid, visit)
            })
            .collect()
    }
}
