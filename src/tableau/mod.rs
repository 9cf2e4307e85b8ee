//! Translation of LTL formulas into generalized Büchi automata
//! by tableau expansion.

mod node;

use std::collections::{BTreeSet, HashMap};

use fixedbitset::FixedBitSet;
use log::{debug, info, trace};
use ltl::Formula;

use crate::automaton::{AcceptanceEncoding, Automaton, Edge, Gba, StateIndex};
use crate::error::{Error, Result};
pub use crate::options::TableauVariant;
use node::Node;

/// Translates the formula into a generalized Büchi automaton
/// accepting exactly the words satisfying the formula.
///
/// The formula is normalized first. Acceptance set `i` of the result
/// belongs to the `i`-th until subformula of the normalized formula.
///
/// # Errors
///
/// Returns [`Error::UnsupportedOperator`] if the normalized formula
/// still contains an operator outside the canonical basis.
pub fn expand(formula: &Formula, variant: TableauVariant) -> Result<Gba> {
    info!("Normalizing formula");
    let normalized = formula.normalize();
    debug!("Normalized formula: {}", normalized);
    expand_normalized(normalized, variant)
}

/// Expands a formula that is already in the canonical basis.
pub(crate) fn expand_normalized(formula: Formula, variant: TableauVariant) -> Result<Gba> {
    info!("Expanding tableau with {} construction", variant);
    let mut tableau = Tableau::new(variant, formula.until_subformulas());
    tableau.run(formula)?;
    let gba = tableau.into_gba();
    debug!(
        "Tableau has {} states, {} transitions and {} acceptance sets",
        gba.num_states(),
        gba.graph().num_transitions(),
        gba.num_sets()
    );
    Ok(gba)
}

/// The state of an ongoing tableau expansion.
struct Tableau {
    variant: TableauVariant,
    untils: Vec<Formula>,
    until_indices: HashMap<Formula, usize>,
    automaton: Automaton<FixedBitSet, FixedBitSet>,
    /// The states created so far, by their current and next obligations.
    /// The current obligations are only used for merging in the GPVW construction.
    states: HashMap<(BTreeSet<Formula>, BTreeSet<Formula>), StateIndex>,
    stack: Vec<Node>,
}

impl Tableau {
    fn new(variant: TableauVariant, untils: Vec<Formula>) -> Self {
        let until_indices = untils
            .iter()
            .enumerate()
            .map(|(i, f)| (f.clone(), i))
            .collect();
        Self {
            variant,
            untils,
            until_indices,
            automaton: Automaton::default(),
            states: HashMap::new(),
            stack: Vec::new(),
        }
    }

    fn num_untils(&self) -> usize {
        self.untils.len()
    }

    fn run(&mut self, formula: Formula) -> Result<()> {
        let mut init_acceptance = FixedBitSet::with_capacity(self.num_untils());
        if self.variant == TableauVariant::Gpvw {
            init_acceptance.insert_range(..);
        }
        let init = self.automaton.add_state("init", init_acceptance);
        self.automaton.set_initial_state(init);
        self.stack
            .push(Node::new(init, std::iter::once(formula), self.num_untils()));

        while let Some(mut node) = self.stack.pop() {
            match node.new.pop() {
                None => self.finish(node),
                Some(formula) => self.expand_obligation(node, formula)?,
            }
        }
        Ok(())
    }

    /// Processes one pending obligation of the node and pushes the
    /// resulting nodes. Nodes for which the obligation is contradictory
    /// are dropped.
    fn expand_obligation(&mut self, mut node: Node, formula: Formula) -> Result<()> {
        match &formula {
            Formula::False => {
                trace!("Pruning node from {}: false", node.incoming);
                return Ok(());
            }
            Formula::True => {}
            Formula::Literal(_) => {
                if node.contradicts(&formula) {
                    trace!("Pruning node from {}: {} contradicts", node.incoming, formula);
                    return Ok(());
                }
                node.old.insert(formula.clone());
            }
            Formula::Until(a, b) => {
                if let Some(&index) = self.until_indices.get(&formula) {
                    node.untils.insert(index);
                }
                // an open until is only redundant if its right operand holds
                if node.old.contains(&formula) || node.is_satisfied(b) {
                    node.old.insert(formula.clone());
                    self.stack.push(node);
                } else {
                    // a U b is b | (a & X(a U b))
                    let mut first = node.clone();
                    first.old.insert(formula.clone());
                    first.add_obligation((**a).clone());
                    first.next.insert(formula.clone());
                    let mut second = node;
                    second.add_obligation((**b).clone());
                    second.old.insert(formula.clone());
                    self.stack.push(first);
                    self.stack.push(second);
                }
                return Ok(());
            }
            _ if node.is_satisfied(&formula) => {
                trace!("Skipping {}: already satisfied", formula);
                node.old.insert(formula.clone());
            }
            Formula::And(a, b) => {
                node.add_obligation((**a).clone());
                node.add_obligation((**b).clone());
                node.old.insert(formula.clone());
            }
            Formula::Or(a, b) => {
                let mut first = node.clone();
                first.add_obligation((**a).clone());
                first.old.insert(formula.clone());
                let mut second = node;
                second.add_obligation((**b).clone());
                second.old.insert(formula.clone());
                self.stack.push(first);
                self.stack.push(second);
                return Ok(());
            }
            Formula::Release(a, b) => {
                // a R b is b & (a | X(a R b))
                let mut first = node.clone();
                first.add_obligation((**b).clone());
                first.old.insert(formula.clone());
                first.next.insert(formula.clone());
                let mut second = node;
                second.add_obligation((**a).clone());
                second.add_obligation((**b).clone());
                second.old.insert(formula.clone());
                self.stack.push(first);
                self.stack.push(second);
                return Ok(());
            }
            Formula::Next(a) => {
                node.next.insert((**a).clone());
                node.old.insert(formula.clone());
            }
            Formula::Implies(..)
            | Formula::Equiv(..)
            | Formula::Finally(_)
            | Formula::Globally(_)
            | Formula::Unless(..)
            | Formula::StrongImplies(..)
            | Formula::StrongEquiv(..) => {
                return Err(Error::UnsupportedOperator {
                    formula: formula.clone(),
                });
            }
        }
        self.stack.push(node);
        Ok(())
    }

    /// Turns a fully expanded node into an edge, creating its target state
    /// if no state with equal obligations exists yet.
    fn finish(&mut self, mut node: Node) {
        let acceptance = node.close(&self.untils);
        let label = node.label();
        let current = match self.variant {
            TableauVariant::Gpvw => node.old.clone(),
            TableauVariant::BitVector => BTreeSet::new(),
        };
        let key = (current, node.next.clone());
        let state = match self.states.get(&key) {
            Some(&state) => state,
            None => {
                let name = match self.variant {
                    TableauVariant::Gpvw => {
                        format!("{} X{}", format_set(&node.old), format_set(&node.next))
                    }
                    TableauVariant::BitVector => format!("X{}", format_set(&node.next)),
                };
                let state_acceptance = match self.variant {
                    TableauVariant::Gpvw => acceptance.clone(),
                    TableauVariant::BitVector => FixedBitSet::with_capacity(self.num_untils()),
                };
                let state = self.automaton.add_state(name, state_acceptance);
                trace!("New state {}: {}", state, self.automaton.name(state));
                self.states.insert(key, state);
                self.stack.push(Node::new(
                    state,
                    node.next.iter().cloned(),
                    self.num_untils(),
                ));
                state
            }
        };

        let edge_acceptance = match self.variant {
            // the run leaves the source state along the edge
            TableauVariant::Gpvw => self.automaton.state_acceptance(node.incoming).clone(),
            TableauVariant::BitVector => acceptance,
        };
        let edge = Edge::new(state, label, edge_acceptance);
        if !self.automaton.edges(node.incoming).contains(&edge) {
            self.automaton.add_edge(node.incoming, edge);
        }
    }

    fn into_gba(self) -> Gba {
        let encoding = match self.variant {
            TableauVariant::Gpvw => AcceptanceEncoding::States,
            TableauVariant::BitVector => AcceptanceEncoding::Transitions,
        };
        Gba::new(self.automaton, encoding, self.untils)
    }
}

fn format_set(formulas: &BTreeSet<Formula>) -> String {
    let formulas: Vec<_> = formulas.iter().map(|f| f.to_string()).collect();
    format!("{{{}}}", formulas.join(", "))
}
