//! Minimization of edge labels given as disjunctions of literal conjunctions.

use std::collections::BTreeSet;

use log::trace;

use crate::automaton::{Automaton, Edge, Label};

/// Returns the consensus of two conjunctions, if they clash in exactly one
/// proposition: `(a & x) | (b & !x)` implies `a & b`.
fn consensus(first: &Label, second: &Label) -> Option<Label> {
    let mut clashes = first.literals().filter(|l| second.contains(&l.negate()));
    let clash = clashes.next()?;
    if clashes.next().is_some() {
        return None;
    }
    let mut result = first.clone();
    result.remove(clash);
    for literal in second.literals() {
        if literal != &clash.negate() {
            result.insert(literal.clone());
        }
    }
    Some(result)
}

/// Removes every conjunction that implies another conjunction of the set.
fn absorb(terms: &mut BTreeSet<Label>) {
    let snapshot: Vec<_> = terms.iter().cloned().collect();
    terms.retain(|term| {
        !snapshot
            .iter()
            .any(|other| other != term && term.entails(other))
    });
}

/// Returns true if every valuation satisfying `term` satisfies one of `others`.
fn covered(term: &Label, others: &[&Label]) -> bool {
    let mut stack = vec![term.clone()];
    while let Some(cube) = stack.pop() {
        if others.iter().any(|other| cube.entails(other)) {
            continue;
        }
        // split on a literal of a conjunction that the cube leaves open
        let open = others
            .iter()
            .filter(|other| cube.conjoin(other).is_some())
            .find_map(|other| other.literals().find(|l| !cube.contains(l)));
        match open {
            Some(literal) => {
                for branch in &[literal.clone(), literal.negate()] {
                    let mut next = cube.clone();
                    next.insert(branch.clone());
                    stack.push(next);
                }
            }
            None => return false,
        }
    }
    true
}

/// Minimizes a disjunction of conjunctions of literals.
///
/// The disjunction of the result is equivalent to the disjunction of the
/// input, and the result is minimal by inclusion: no proper subset of it
/// is equivalent. Every conjunction of the result is a prime implicant,
/// and the result is never longer than the input. Contradictory
/// conjunctions are dropped, so an input that is equivalent to `false`
/// yields an empty list.
pub fn minimize(labels: &[Label]) -> Vec<Label> {
    let mut terms: BTreeSet<Label> = labels
        .iter()
        .filter(|l| l.is_consistent())
        .cloned()
        .collect();
    absorb(&mut terms);
    let inputs: Vec<_> = terms.iter().cloned().collect();
    loop {
        let snapshot: Vec<_> = terms.iter().cloned().collect();
        let mut changed = false;
        for (i, first) in snapshot.iter().enumerate() {
            for second in &snapshot[i + 1..] {
                if let Some(term) = consensus(first, second) {
                    if !terms.iter().any(|t| term.entails(t)) {
                        terms.insert(term);
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            break;
        }
        absorb(&mut terms);
    }
    // widen every input conjunction to a prime implicant it implies
    let mut cover: BTreeSet<Label> = inputs
        .iter()
        .filter_map(|input| terms.iter().find(|prime| input.entails(prime)).cloned())
        .collect();
    // drop primes covered by the remaining ones, most specific first
    let mut candidates: Vec<_> = cover.iter().cloned().collect();
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| b.cmp(a)));
    for candidate in candidates {
        let others: Vec<_> = cover.iter().filter(|t| **t != candidate).collect();
        if covered(&candidate, &others) {
            cover.remove(&candidate);
        }
    }
    cover.into_iter().collect()
}

impl<S, E: Clone + Eq> Automaton<S, E> {
    /// Compacts parallel edges: edges between the same two states with equal
    /// acceptance information are replaced by the minimized disjunction of
    /// their labels.
    pub fn fold_labels(&mut self) {
        let states: Vec<_> = self.states().collect();
        for state in states {
            // snapshot the edges, group them by successor and acceptance
            let mut groups: Vec<(Edge<E>, Vec<Label>)> = Vec::new();
            for edge in self.edges(state) {
                match groups.iter_mut().find(|(e, _)| {
                    e.successor() == edge.successor() && e.acceptance() == edge.acceptance()
                }) {
                    Some((_, labels)) => labels.push(edge.label().clone()),
                    None => groups.push((edge.clone(), vec![edge.label().clone()])),
                }
            }
            let before = self.edges(state).len();
            let edges: Vec<_> = groups
                .into_iter()
                .flat_map(|(edge, labels)| {
                    minimize(&labels).into_iter().map(move |label| {
                        Edge::new(edge.successor(), label, edge.acceptance().clone())
                    })
                })
                .collect();
            trace!(
                "Folded edges of state {} from {} to {}",
                state,
                before,
                edges.len()
            );
            self.replace_edges(state, edges);
        }
    }
}
