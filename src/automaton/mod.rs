//! Automata for ω-words with transitions labelled by conjunctions of literals.

pub mod gba;
pub mod minimize;
pub mod rabin;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::iter::FromIterator;

use ltl::Literal;

use crate::error::{Error, Result};

pub use gba::{AcceptanceEncoding, Gba};
pub use minimize::minimize;
pub use rabin::{RabinAutomaton, RabinPair};

/// An index for a state of an automaton.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StateIndex(usize);

impl fmt::Display for StateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StateIndex {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// A conjunction of literals. The empty conjunction is `true`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(BTreeSet<Literal>);

impl Label {
    /// The label `true`, which every valuation satisfies.
    pub fn top() -> Self {
        Self(BTreeSet::new())
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if this is the label `true`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.0.contains(literal)
    }

    pub fn insert(&mut self, literal: Literal) -> bool {
        self.0.insert(literal)
    }

    pub fn remove(&mut self, literal: &Literal) -> bool {
        self.0.remove(literal)
    }

    /// Returns true if no proposition occurs both positively and negatively.
    pub fn is_consistent(&self) -> bool {
        self.0
            .iter()
            .filter(|l| l.is_positive())
            .all(|l| !self.0.contains(&l.negate()))
    }

    /// Returns true if every literal required by `other` is asserted by this label,
    /// i.e. this conjunction implies the other one.
    pub fn entails(&self, other: &Self) -> bool {
        other.0.is_subset(&self.0)
    }

    /// The conjunction of both labels, or `None` if it is contradictory.
    pub fn conjoin(&self, other: &Self) -> Option<Self> {
        let label = Self(self.0.union(&other.0).cloned().collect());
        if label.is_consistent() {
            Some(label)
        } else {
            None
        }
    }
}

impl FromIterator<Literal> for Label {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "true");
        }
        for (i, literal) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " & ")?;
            }
            write!(f, "{}", literal)?;
        }
        Ok(())
    }
}

/// An edge of an automaton, carrying acceptance information of type `E`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge<E> {
    /// The index of the successor state.
    successor: StateIndex,
    /// The label of the edge.
    label: Label,
    /// The acceptance information of the edge.
    acceptance: E,
}

impl<E> Edge<E> {
    pub(crate) fn new(successor: StateIndex, label: Label, acceptance: E) -> Self {
        Self {
            successor,
            label,
            acceptance,
        }
    }

    /// The index of the successor state of the edge.
    pub const fn successor(&self) -> StateIndex {
        self.successor
    }

    /// The label of the edge.
    pub const fn label(&self) -> &Label {
        &self.label
    }

    /// The acceptance information of the edge.
    pub const fn acceptance(&self) -> &E {
        &self.acceptance
    }
}

#[derive(Clone, Debug)]
struct State<S, E> {
    name: String,
    acceptance: S,
    edges: Vec<Edge<E>>,
}

/// An automaton with state acceptance information of type `S`
/// and edge acceptance information of type `E`.
#[derive(Clone, Debug)]
pub struct Automaton<S, E> {
    states: Vec<State<S, E>>,
    initial_state: StateIndex,
}

impl<S, E> Default for Automaton<S, E> {
    fn default() -> Self {
        Self {
            states: Vec::new(),
            initial_state: StateIndex(0),
        }
    }
}

impl<S, E> Automaton<S, E> {
    pub(crate) fn add_state<N: Into<String>>(&mut self, name: N, acceptance: S) -> StateIndex {
        let index = StateIndex(self.states.len());
        self.states.push(State {
            name: name.into(),
            acceptance,
            edges: Vec::new(),
        });
        index
    }

    pub(crate) fn add_edge(&mut self, from: StateIndex, edge: Edge<E>) {
        self.states[from.0].edges.push(edge);
    }

    pub(crate) fn set_initial_state(&mut self, state: StateIndex) {
        self.initial_state = state;
    }

    /// Replaces the edges of a state.
    pub(crate) fn replace_edges(&mut self, state: StateIndex, edges: Vec<Edge<E>>) {
        self.states[state.0].edges = edges;
    }

    pub fn initial_state(&self) -> StateIndex {
        self.initial_state
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.states.iter().map(|s| s.edges.len()).sum()
    }

    /// Iterates over the indices of all states.
    pub fn states(&self) -> impl Iterator<Item = StateIndex> {
        (0..self.states.len()).map(StateIndex)
    }

    /// Iterates over all transitions as pairs of source state and edge.
    pub fn transitions(&self) -> impl Iterator<Item = (StateIndex, &Edge<E>)> {
        self.states
            .iter()
            .enumerate()
            .flat_map(|(i, s)| s.edges.iter().map(move |e| (StateIndex(i), e)))
    }

    pub fn name(&self, state: StateIndex) -> &str {
        &self.states[state.0].name
    }

    pub fn state_acceptance(&self, state: StateIndex) -> &S {
        &self.states[state.0].acceptance
    }

    pub fn edges(&self, state: StateIndex) -> &[Edge<E>] {
        &self.states[state.0].edges
    }

    /// The labels of all edges leaving any of the given states.
    pub fn alphabet<'a, I>(&self, states: I) -> BTreeSet<&Label>
    where
        I: IntoIterator<Item = &'a StateIndex>,
    {
        states
            .into_iter()
            .flat_map(|&s| self.edges(s).iter().map(Edge::label))
            .collect()
    }

    /// The set of states reached from any of the given states by
    /// an edge with exactly the given label.
    pub fn post<'a, I>(&self, states: I, label: &Label) -> BTreeSet<StateIndex>
    where
        I: IntoIterator<Item = &'a StateIndex>,
    {
        states
            .into_iter()
            .flat_map(|&s| self.edges(s).iter())
            .filter(|e| e.label() == label)
            .map(Edge::successor)
            .collect()
    }

    /// The unique successor of the state for exactly the given label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonDeterministic`] if there is more than one successor.
    pub fn successor(&self, state: StateIndex, label: &Label) -> Result<Option<StateIndex>> {
        let successors = self.post(&[state], label);
        let mut iter = successors.into_iter();
        match (iter.next(), iter.next()) {
            (Some(_), Some(_)) => Err(Error::NonDeterministic {
                state,
                label: label.clone(),
            }),
            (successor, _) => Ok(successor),
        }
    }

    /// Returns true if every state has at most one successor for each exact label.
    pub fn is_deterministic(&self) -> bool {
        self.states().all(|state| {
            let mut successors: BTreeMap<&Label, StateIndex> = BTreeMap::new();
            self.edges(state).iter().all(|e| {
                *successors.entry(e.label()).or_insert(e.successor()) == e.successor()
            })
        })
    }

    /// Writes a listing of all states and transitions, using the given
    /// functions to describe the acceptance information of states and edges.
    pub(crate) fn write_listing<FS, FE>(
        &self,
        f: &mut fmt::Formatter<'_>,
        header: &str,
        state_info: FS,
        edge_info: FE,
    ) -> fmt::Result
    where
        FS: Fn(&S) -> String,
        FE: Fn(&E) -> String,
    {
        writeln!(
            f,
            "{} {} states, initial {};",
            header,
            self.num_states(),
            self.initial_state
        )?;
        for (i, state) in self.states.iter().enumerate() {
            writeln!(f, "{} \"{}\"{}:", i, state.name, state_info(&state.acceptance))?;
            for edge in &state.edges {
                writeln!(
                    f,
                    "  -> {} [{}]{}",
                    edge.successor,
                    edge.label,
                    edge_info(&edge.acceptance)
                )?;
            }
        }
        Ok(())
    }
}

/// A Büchi automaton with one set of accepting states.
pub type Ba = Automaton<bool, ()>;

impl Automaton<bool, ()> {
    pub fn is_accepting(&self, state: StateIndex) -> bool {
        *self.state_acceptance(state)
    }

    pub fn accepting_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.states().filter(move |&s| self.is_accepting(s))
    }

    /// Returns true if the acceptance condition cannot be satisfied at all.
    pub fn has_empty_acceptance(&self) -> bool {
        self.accepting_states().next().is_none()
    }
}

impl fmt::Display for Automaton<bool, ()> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_listing(
            f,
            "buchi",
            |&accepting| String::from(if accepting { " accepting" } else { "" }),
            |_| String::new(),
        )
    }
}

/// Builds Büchi automata by hand, mainly for systems and tests.
#[derive(Debug, Default)]
pub struct BaBuilder {
    automaton: Ba,
}

impl BaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state and returns its index. The first state added is initial.
    pub fn state<N: Into<String>>(&mut self, name: N, accepting: bool) -> StateIndex {
        self.automaton.add_state(name, accepting)
    }

    pub fn edge(&mut self, from: StateIndex, label: Label, to: StateIndex) -> &mut Self {
        self.automaton.add_edge(from, Edge::new(to, label, ()));
        self
    }

    pub fn initial(&mut self, state: StateIndex) -> &mut Self {
        self.automaton.set_initial_state(state);
        self
    }

    pub fn build(self) -> Ba {
        self.automaton
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn label(literals: &[&str]) -> Label {
        literals
            .iter()
            .map(|l| match l.strip_prefix('!') {
                Some(p) => Literal::negative(p),
                None => Literal::positive(*l),
            })
            .collect()
    }

    #[test]
    fn test_label_algebra() {
        let ab = label(&["a", "b"]);
        let a = label(&["a"]);
        assert!(ab.entails(&a));
        assert!(!a.entails(&ab));
        assert!(a.entails(&Label::top()));
        assert_eq!(a.conjoin(&label(&["!a"])), None);
        assert_eq!(a.conjoin(&label(&["b"])), Some(ab.clone()));
        assert!(!label(&["a", "!a"]).is_consistent());
        assert_eq!(ab.to_string(), "a & b");
        assert_eq!(Label::top().to_string(), "true");
    }

    #[test]
    fn test_post_and_determinism() {
        let mut builder = BaBuilder::new();
        let q0 = builder.state("q0", false);
        let q1 = builder.state("q1", true);
        builder
            .edge(q0, label(&["a"]), q0)
            .edge(q0, label(&["a"]), q1)
            .edge(q1, label(&["b"]), q1);
        let ba = builder.build();

        assert_eq!(
            ba.post(&[q0], &label(&["a"])),
            vec![q0, q1].into_iter().collect::<BTreeSet<_>>()
        );
        assert!(ba.post(&[q0], &label(&["b"])).is_empty());
        assert!(!ba.is_deterministic());
        assert!(matches!(
            ba.successor(q0, &label(&["a"])),
            Err(Error::NonDeterministic { .. })
        ));
        assert_eq!(ba.successor(q1, &label(&["b"])).unwrap(), Some(q1));
        assert_eq!(ba.accepting_states().collect::<Vec<_>>(), vec![q1]);
        assert_eq!(ba.num_transitions(), 3);
    }
}
