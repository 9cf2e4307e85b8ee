use crate::automaton::{Ba, Label, StateIndex};

use super::BuchiGraph;

/// The synchronous product of a property automaton with a system,
/// explored on the fly.
///
/// A property edge can be taken together with a system edge if the system
/// label asserts every literal the property label requires. The product
/// edge carries the system label. Acceptance is that of the property.
#[derive(Debug, Clone, Copy)]
pub struct Product<'a> {
    property: &'a Ba,
    system: &'a Ba,
}

impl<'a> Product<'a> {
    pub fn new(property: &'a Ba, system: &'a Ba) -> Self {
        Self { property, system }
    }

    pub fn property(&self) -> &'a Ba {
        self.property
    }

    pub fn system(&self) -> &'a Ba {
        self.system
    }
}

impl<'a> BuchiGraph for Product<'a> {
    type State = (StateIndex, StateIndex);
    type Label = Label;

    fn initial_states(&self) -> Vec<Self::State> {
        if self.property.num_states() == 0 || self.system.num_states() == 0 {
            return Vec::new();
        }
        vec![(self.property.initial_state(), self.system.initial_state())]
    }

    fn successors(&self, (property, system): Self::State) -> Vec<(Label, Self::State)> {
        let mut successors = Vec::new();
        for property_edge in self.property.edges(property) {
            for system_edge in self.system.edges(system) {
                if system_edge.label().entails(property_edge.label()) {
                    successors.push((
                        system_edge.label().clone(),
                        (property_edge.successor(), system_edge.successor()),
                    ));
                }
            }
        }
        successors
    }

    fn is_accepting(&self, (property, _): Self::State) -> bool {
        *self.property.state_acceptance(property)
    }

    fn has_empty_acceptance(&self) -> bool {
        self.property.accepting_states().next().is_none()
    }
}
