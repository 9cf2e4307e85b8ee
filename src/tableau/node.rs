use std::collections::BTreeSet;

use fixedbitset::FixedBitSet;
use ltl::Formula;

use crate::automaton::{Label, StateIndex};

/// A node of the tableau under expansion.
///
/// `new` holds the pending obligations for the current position,
/// `old` the obligations that were already processed and `next`
/// the obligations deferred to the successor position.
#[derive(Clone, Debug)]
pub(super) struct Node {
    pub(super) incoming: StateIndex,
    pub(super) new: Vec<Formula>,
    pub(super) old: BTreeSet<Formula>,
    pub(super) next: BTreeSet<Formula>,
    /// The until obligations that were opened in this node.
    pub(super) untils: FixedBitSet,
    /// The until obligations whose right operand holds in this node.
    pub(super) right_of_untils: FixedBitSet,
}

impl Node {
    pub(super) fn new<I>(incoming: StateIndex, obligations: I, num_untils: usize) -> Self
    where
        I: IntoIterator<Item = Formula>,
    {
        let mut node = Self {
            incoming,
            new: Vec::new(),
            old: BTreeSet::new(),
            next: BTreeSet::new(),
            untils: FixedBitSet::with_capacity(num_untils),
            right_of_untils: FixedBitSet::with_capacity(num_untils),
        };
        for formula in obligations {
            node.add_obligation(formula);
        }
        node
    }

    /// Adds an obligation for the current position, unless it
    /// was already processed or is pending anyway.
    pub(super) fn add_obligation(&mut self, formula: Formula) {
        if !self.old.contains(&formula) && !self.new.contains(&formula) {
            self.new.push(formula);
        }
    }

    /// Returns true if the formula is already implied by the processed
    /// obligations of this node together with its deferred obligations.
    pub(super) fn is_satisfied(&self, formula: &Formula) -> bool {
        if self.old.contains(formula) {
            return true;
        }
        match formula {
            Formula::True => true,
            Formula::Until(a, b) | Formula::Unless(a, b) => {
                self.is_satisfied(b) || (self.is_satisfied(a) && self.next.contains(formula))
            }
            Formula::Release(a, b) => {
                self.is_satisfied(b) && (self.is_satisfied(a) || self.next.contains(formula))
            }
            Formula::And(a, b) => self.is_satisfied(a) && self.is_satisfied(b),
            Formula::Or(a, b) => self.is_satisfied(a) || self.is_satisfied(b),
            Formula::Next(a) => self.next.contains(&**a),
            _ => false,
        }
    }

    /// Returns true if the negation of the literal was already processed.
    pub(super) fn contradicts(&self, formula: &Formula) -> bool {
        self.old.contains(&formula.negate())
    }

    /// The literals of the processed obligations, i.e. the label
    /// of the position this node describes.
    pub(super) fn label(&self) -> Label {
        self.old
            .iter()
            .filter_map(|f| match f {
                Formula::Literal(literal) => Some(literal.clone()),
                _ => None,
            })
            .collect()
    }

    /// Records which until obligations have their right operand fulfilled
    /// and returns the acceptance sets this node belongs to.
    ///
    /// The node is in set `i` unless until `i` was opened
    /// and its right operand does not hold.
    pub(super) fn close(&mut self, untils: &[Formula]) -> FixedBitSet {
        for (i, until) in untils.iter().enumerate() {
            if let Formula::Until(_, b) = until {
                if self.untils.contains(i) && self.is_satisfied(b) {
                    self.right_of_untils.insert(i);
                }
            }
        }
        let mut acceptance = FixedBitSet::with_capacity(untils.len());
        for i in 0..untils.len() {
            if !self.untils.contains(i) || self.right_of_untils.contains(i) {
                acceptance.insert(i);
            }
        }
        acceptance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satisfied_predicate() {
        let a = Formula::prop("a");
        let b = Formula::prop("b");
        let until = Formula::until(a.clone(), b.clone());
        let release = Formula::release(a.clone(), b.clone());

        let mut node = Node::new(StateIndex::new(0), vec![], 1);
        assert!(node.is_satisfied(&Formula::True));
        assert!(!node.is_satisfied(&Formula::False));
        assert!(!node.is_satisfied(&until));

        node.old.insert(a.clone());
        assert!(!node.is_satisfied(&until));
        assert!(node.is_satisfied(&Formula::or(a.clone(), b.clone())));
        assert!(!node.is_satisfied(&Formula::and(a.clone(), b.clone())));
        node.next.insert(until.clone());
        assert!(node.is_satisfied(&until));
        assert!(!node.is_satisfied(&release));
        assert!(node.is_satisfied(&Formula::next(until.clone())));

        node.old.insert(b);
        assert!(node.is_satisfied(&release));
    }

    #[test]
    fn test_close_acceptance() {
        let a = Formula::prop("a");
        let b = Formula::prop("b");
        let untils = vec![Formula::until(a.clone(), b.clone()), Formula::until(b, a.clone())];

        let mut node = Node::new(StateIndex::new(0), vec![], 2);
        node.untils.insert(0);
        node.untils.insert(1);
        node.old.insert(a);
        let acceptance = node.close(&untils);
        assert!(!acceptance.contains(0));
        assert!(acceptance.contains(1));
        assert_eq!(node.right_of_untils.ones().collect::<Vec<_>>(), vec![1]);
    }
}
