use std::collections::BTreeSet;
use std::fmt;

use crate::automaton::{Ba, Label, StateIndex};

/// A node of a Safra tree.
///
/// The macro state of a node is a subset of the macro state of its parent,
/// and the macro states of siblings are pairwise disjoint. Children are
/// ordered from oldest to youngest. Two trees are equal iff they agree on
/// ids, macro states, marks and the order of children.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SafraNode {
    id: usize,
    macro_state: BTreeSet<StateIndex>,
    children: Vec<SafraNode>,
    mark: bool,
}

impl SafraNode {
    pub(super) fn leaf(id: usize, macro_state: BTreeSet<StateIndex>) -> Self {
        Self {
            id,
            macro_state,
            children: Vec::new(),
            mark: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn macro_state(&self) -> &BTreeSet<StateIndex> {
        &self.macro_state
    }

    pub fn children(&self) -> &[SafraNode] {
        &self.children
    }

    pub fn is_marked(&self) -> bool {
        self.mark
    }

    /// The number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(SafraNode::size).sum::<usize>()
    }

    /// Iterates over all nodes of the tree in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = &SafraNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn find(&self, id: usize) -> Option<&SafraNode> {
        self.nodes().find(|n| n.id == id)
    }

    /// The tree reached by reading the label, or `None` if no state of
    /// the automaton has a successor under the label.
    pub(super) fn successor(
        &self,
        ba: &Ba,
        accepting: &BTreeSet<StateIndex>,
        label: &Label,
    ) -> Option<Self> {
        let mut tree = self.clone();
        tree.unmark();
        let mut ids = IdAllocator::new(&tree);
        tree.spawn(accepting, &mut ids);
        tree.post(ba, label);
        tree.merge_horizontally();
        if tree.macro_state.is_empty() {
            return None;
        }
        tree.remove_empty();
        tree.merge_vertically();
        Some(tree)
    }

    fn unmark(&mut self) {
        self.mark = false;
        for child in &mut self.children {
            child.unmark();
        }
    }

    /// Appends a youngest child with the accepting part of the macro state
    /// to every node of the tree whose macro state has one. Ids are
    /// allocated top-down, a parent before its children.
    fn spawn(&mut self, accepting: &BTreeSet<StateIndex>, ids: &mut IdAllocator) {
        let intersection: BTreeSet<_> = self
            .macro_state
            .intersection(accepting)
            .copied()
            .collect();
        let spawned = if intersection.is_empty() {
            None
        } else {
            Some(Self::leaf(ids.next(), intersection))
        };
        for child in &mut self.children {
            child.spawn(accepting, ids);
        }
        self.children.extend(spawned);
    }

    fn post(&mut self, ba: &Ba, label: &Label) {
        self.macro_state = ba.post(&self.macro_state, label);
        for child in &mut self.children {
            child.post(ba, label);
        }
    }

    /// Removes states from every node that already belong to an older sibling.
    fn merge_horizontally(&mut self) {
        let mut claimed = BTreeSet::new();
        for child in &mut self.children {
            child.remove_states(&claimed);
            claimed.extend(child.macro_state.iter().copied());
            child.merge_horizontally();
        }
    }

    fn remove_states(&mut self, states: &BTreeSet<StateIndex>) {
        if states.is_empty() {
            return;
        }
        self.macro_state.retain(|s| !states.contains(s));
        for child in &mut self.children {
            child.remove_states(states);
        }
    }

    fn remove_empty(&mut self) {
        self.children.retain(|c| !c.macro_state.is_empty());
        for child in &mut self.children {
            child.remove_empty();
        }
    }

    /// Collapses every node whose macro state is covered by its children
    /// into a marked leaf, bottom-up.
    fn merge_vertically(&mut self) {
        for child in &mut self.children {
            child.merge_vertically();
        }
        if self.children.is_empty() {
            return;
        }
        let covered: BTreeSet<_> = self
            .children
            .iter()
            .flat_map(|c| c.macro_state.iter().copied())
            .collect();
        if covered == self.macro_state {
            self.children.clear();
            self.mark = true;
        }
    }
}

impl fmt::Display for SafraNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states: Vec<_> = self.macro_state.iter().map(|s| s.to_string()).collect();
        write!(f, "{}{{{}}}", self.id, states.join(","))?;
        if self.mark {
            write!(f, "!")?;
        }
        if !self.children.is_empty() {
            write!(f, "(")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", child)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Hands out the smallest ids not used by a tree.
struct IdAllocator {
    used: BTreeSet<usize>,
    candidate: usize,
}

impl IdAllocator {
    fn new(tree: &SafraNode) -> Self {
        Self {
            used: tree.nodes().map(SafraNode::id).collect(),
            candidate: 0,
        }
    }

    fn next(&mut self) -> usize {
        while self.used.contains(&self.candidate) {
            self.candidate += 1;
        }
        self.used.insert(self.candidate);
        self.candidate
    }
}
