use std::collections::HashSet;

use log::{debug, info, trace};

use super::{BuchiGraph, Lasso, Verdict};

/// A frame of an explicit depth-first search stack.
struct Frame<G: BuchiGraph> {
    state: G::State,
    /// The label of the edge by which the state was entered, if any.
    label: Option<G::Label>,
    successors: Vec<(G::Label, G::State)>,
    next: usize,
}

impl<G: BuchiGraph> Frame<G> {
    fn new(graph: &G, state: G::State, label: Option<G::Label>) -> Self {
        Self {
            state,
            label,
            successors: graph.successors(state),
            next: 0,
        }
    }

    fn next_successor(&mut self) -> Option<(G::Label, G::State)> {
        let successor = self.successors.get(self.next).cloned();
        self.next += 1;
        successor
    }
}

/// Nested depth-first search in the style of Courcoubetis, Vardi, Wolper
/// and Yannakakis, with explicit stacks.
///
/// The outer search starts the inner search from each accepting state
/// when it is backtracked from. The inner search succeeds when it reaches
/// a state on the outer stack. States visited by the inner search are
/// shared between all inner searches.
struct NestedDfs<'a, G: BuchiGraph> {
    graph: &'a G,
    visited1: HashSet<G::State>,
    visited2: HashSet<G::State>,
    on_stack1: HashSet<G::State>,
    stack1: Vec<Frame<G>>,
    stack2: Vec<Frame<G>>,
}

impl<'a, G: BuchiGraph> NestedDfs<'a, G> {
    fn new(graph: &'a G) -> Self {
        Self {
            graph,
            visited1: HashSet::new(),
            visited2: HashSet::new(),
            on_stack1: HashSet::new(),
            stack1: Vec::new(),
            stack2: Vec::new(),
        }
    }

    fn dfs1(&mut self, start: G::State) -> Option<Lasso<G::State, G::Label>> {
        if !self.visited1.insert(start) {
            return None;
        }
        self.on_stack1.insert(start);
        self.stack1.push(Frame::new(self.graph, start, None));
        while let Some(frame) = self.stack1.last_mut() {
            match frame.next_successor() {
                Some((label, successor)) => {
                    if self.visited1.insert(successor) {
                        self.on_stack1.insert(successor);
                        self.stack1
                            .push(Frame::new(self.graph, successor, Some(label)));
                    }
                }
                None => {
                    let state = frame.state;
                    if self.graph.is_accepting(state) {
                        if let Some(lasso) = self.dfs2(state) {
                            return Some(lasso);
                        }
                    }
                    self.on_stack1.remove(&state);
                    self.stack1.pop();
                }
            }
        }
        None
    }

    fn dfs2(&mut self, seed: G::State) -> Option<Lasso<G::State, G::Label>> {
        trace!("Starting inner search from {:?}", seed);
        self.stack2.clear();
        if !self.visited2.insert(seed) {
            return None;
        }
        self.stack2.push(Frame::new(self.graph, seed, None));
        while let Some(frame) = self.stack2.last_mut() {
            match frame.next_successor() {
                Some((label, successor)) => {
                    if self.on_stack1.contains(&successor) {
                        trace!("Closed lasso at {:?}", successor);
                        return Some(self.lasso(label, successor));
                    }
                    if self.visited2.insert(successor) {
                        self.stack2
                            .push(Frame::new(self.graph, successor, Some(label)));
                    }
                }
                None => {
                    self.stack2.pop();
                }
            }
        }
        None
    }

    /// Reconstructs the lasso closed by the edge to a state on the outer stack.
    ///
    /// The prefix follows the outer stack up to the repeated state, the cycle
    /// follows the rest of the outer stack, then the inner stack, and then
    /// the closing edge.
    fn lasso(&self, label: G::Label, repeated: G::State) -> Lasso<G::State, G::Label> {
        let steps = |frames: &[Frame<G>]| -> Vec<(G::Label, G::State)> {
            frames
                .iter()
                .filter_map(|f| f.label.clone().map(|l| (l, f.state)))
                .collect()
        };
        let initial = self.stack1[0].state;
        let position = self
            .stack1
            .iter()
            .position(|f| f.state == repeated)
            .unwrap_or(0);
        let prefix = steps(&self.stack1[..=position]);
        let mut cycle = steps(&self.stack1[position + 1..]);
        cycle.extend(steps(&self.stack2));
        cycle.push((label, repeated));
        Lasso {
            initial,
            prefix,
            cycle,
        }
    }
}

/// Searches for an accepting lasso from any initial state of the graph.
pub fn find_accepting_lasso<G: BuchiGraph>(graph: &G) -> Verdict<G::State, G::Label> {
    info!("Checking emptiness with nested depth-first search");
    if graph.has_empty_acceptance() {
        debug!("No accepting states, skipping search");
        return Verdict::Empty;
    }
    let mut search = NestedDfs::new(graph);
    for initial in graph.initial_states() {
        if let Some(lasso) = search.dfs1(initial) {
            debug!(
                "Found lasso with prefix length {} and cycle length {}",
                lasso.prefix.len(),
                lasso.cycle.len()
            );
            return Verdict::NonEmpty(Some(lasso));
        }
    }
    debug!("Explored {} states without lasso", search.visited1.len());
    Verdict::Empty
}

/// Searches for an accepting lasso starting in the given state.
pub fn find_lasso_from<G: BuchiGraph>(graph: &G, state: G::State) -> Verdict<G::State, G::Label> {
    if graph.has_empty_acceptance() {
        return Verdict::Empty;
    }
    match NestedDfs::new(graph).dfs1(state) {
        Some(lasso) => Verdict::NonEmpty(Some(lasso)),
        None => Verdict::Empty,
    }
}
