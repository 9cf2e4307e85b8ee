//! Translation of LTL formulas into ω-automata and emptiness checking.
//!
//! A formula is normalized and expanded by a tableau into a generalized Büchi
//! automaton. Its emptiness is decided either directly or by degeneralizing
//! it and searching for an accepting lasso with a nested depth-first search.
//! The degeneralized automaton can further be determinized into a Rabin
//! automaton, and checked against a system given as another Büchi automaton.

pub mod automaton;
pub mod degeneralize;
pub mod emptiness;
mod error;
pub mod options;
pub mod queue;
pub mod safra;
pub mod tableau;

use std::fmt::{self, Display};

use log::{debug, info};

use ltl::Formula;

use automaton::{Ba, Gba, Label, RabinAutomaton, StateIndex};
use emptiness::{check_generalized, find_accepting_lasso, Lasso, Product, Verdict};
use options::{CheckOptions, EmptinessMethod, OutputKind};
pub use error::{Error, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Status {
    Empty,
    NonEmpty,
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Status::Empty => "EMPTY",
                Status::NonEmpty => "NON-EMPTY",
            }
        )
    }
}

impl<S, L> From<&Verdict<S, L>> for Status {
    fn from(verdict: &Verdict<S, L>) -> Self {
        if verdict.is_empty() {
            Status::Empty
        } else {
            Status::NonEmpty
        }
    }
}

/// An automaton produced along the check, as selected by [`OutputKind`].
#[derive(Debug, Clone)]
pub enum OutputAutomaton {
    Gba(Gba),
    Ba(Ba),
    Rabin(RabinAutomaton),
}

impl OutputAutomaton {
    pub fn write<W: std::io::Write>(&self, mut writer: W) -> std::io::Result<()> {
        match self {
            Self::Gba(gba) => write!(writer, "{}", gba),
            Self::Ba(ba) => write!(writer, "{}", ba),
            Self::Rabin(rabin) => write!(writer, "{}", rabin),
        }
    }
}

/// Sizes of the automata built during a check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub gba_states: usize,
    pub gba_transitions: usize,
    pub acceptance_sets: usize,
    /// Only present if the generalized automaton was degeneralized.
    pub ba_states: Option<usize>,
    pub ba_transitions: Option<usize>,
}

/// The result of checking a formula for satisfiability.
#[derive(Debug, Clone)]
pub struct CheckResult {
    status: Status,
    lasso: Option<Lasso<StateIndex, Label>>,
    automaton: Option<OutputAutomaton>,
    statistics: Statistics,
}

impl CheckResult {
    pub fn status(&self) -> Status {
        self.status
    }

    /// An accepting run of the degeneralized automaton, if the language
    /// is non-empty and the emptiness check produces witnesses.
    pub fn lasso(&self) -> Option<&Lasso<StateIndex, Label>> {
        self.lasso.as_ref()
    }

    pub fn automaton(&self) -> Option<&OutputAutomaton> {
        self.automaton.as_ref()
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }
}

/// Checks whether the formula has a model, with the default options.
///
/// # Examples
///
/// ```
/// use ltlauto::{check, Status};
/// use ltl::Formula;
///
/// let formula = Formula::until(Formula::prop("a"), Formula::prop("b"));
/// assert_eq!(check(&formula).unwrap().status(), Status::NonEmpty);
/// assert_eq!(check(&Formula::False).unwrap().status(), Status::Empty);
/// ```
///
/// # Errors
///
/// See [`check_with`].
pub fn check(formula: &Formula) -> Result<CheckResult> {
    check_with(formula, &CheckOptions::default())
}

/// Checks whether the formula has a model.
///
/// # Errors
///
/// Returns [`Error::UnsupportedOperator`] if normalization leaves an operator
/// the tableau cannot expand, and [`Error::NonDeterministic`] if the counter
/// automaton of the degeneralization is not deterministic.
pub fn check_with(formula: &Formula, options: &CheckOptions) -> Result<CheckResult> {
    info!("Checking formula {}", formula);
    let mut gba = tableau::expand(formula, options.tableau)?;
    if options.fold_labels {
        gba.graph_mut().fold_labels();
    }
    let mut statistics = Statistics {
        gba_states: gba.num_states(),
        gba_transitions: gba.graph().num_transitions(),
        acceptance_sets: gba.num_sets(),
        ..Statistics::default()
    };
    debug!(
        "Generalized automaton has {} states, {} transitions and {} acceptance sets",
        statistics.gba_states, statistics.gba_transitions, statistics.acceptance_sets
    );

    let ba = if options.emptiness == EmptinessMethod::NestedDfs
        || matches!(options.output, OutputKind::Ba | OutputKind::Rabin)
    {
        let mut ba = degeneralize::degeneralize(&gba)?;
        if options.fold_labels {
            ba.fold_labels();
        }
        statistics.ba_states = Some(ba.num_states());
        statistics.ba_transitions = Some(ba.num_transitions());
        Some(ba)
    } else {
        None
    };

    let (status, lasso) = match (&ba, options.emptiness) {
        (Some(ba), EmptinessMethod::NestedDfs) => {
            let verdict = find_accepting_lasso(ba);
            (Status::from(&verdict), verdict.into_lasso())
        }
        _ => {
            let verdict = check_generalized(&gba);
            (Status::from(&verdict), None)
        }
    };
    info!("Language is {}", status);

    let automaton = match (options.output, ba) {
        (OutputKind::Verdict, _) => None,
        (OutputKind::Gba, _) => Some(OutputAutomaton::Gba(gba)),
        (OutputKind::Ba, Some(ba)) => Some(OutputAutomaton::Ba(ba)),
        (OutputKind::Rabin, Some(ba)) => Some(OutputAutomaton::Rabin(
            safra::determinize_with(&ba, options.exploration),
        )),
        (_, None) => None,
    };

    Ok(CheckResult {
        status,
        lasso,
        automaton,
        statistics,
    })
}

/// The result of checking a system against a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelCheckResult {
    /// Every run of the system satisfies the property.
    Holds,
    /// A run of the system violating the property, as a lasso through
    /// pairs of states of the automaton for the negated property and the system.
    Violated(Lasso<(StateIndex, StateIndex), Label>),
}

impl ModelCheckResult {
    pub fn holds(&self) -> bool {
        matches!(self, Self::Holds)
    }
}

/// Checks whether all runs of the system satisfy the property, with the default options.
///
/// # Errors
///
/// See [`check_system_with`].
pub fn check_system(property: &Formula, system: &Ba) -> Result<ModelCheckResult> {
    check_system_with(property, system, &CheckOptions::default())
}

/// Checks whether all runs of the system satisfy the property.
///
/// The system is given as a Büchi automaton whose edge labels describe the
/// propositions that hold, and whose accepting states are ignored. The negated
/// property is translated and searched for a common run with the system.
/// Only the tableau and label folding options are used.
///
/// # Errors
///
/// Same as [`check_with`].
pub fn check_system_with(
    property: &Formula,
    system: &Ba,
    options: &CheckOptions,
) -> Result<ModelCheckResult> {
    info!(
        "Checking system with {} states against {}",
        system.num_states(),
        property
    );
    let mut gba = tableau::expand(&property.negate(), options.tableau)?;
    if options.fold_labels {
        gba.graph_mut().fold_labels();
    }
    let negation = degeneralize::degeneralize(&gba)?;
    let product = Product::new(&negation, system);
    // the nested search always produces a witness for non-emptiness
    match find_accepting_lasso(&product).into_lasso() {
        None => Ok(ModelCheckResult::Holds),
        Some(lasso) => {
            info!(
                "Property violated by {}",
                format_lasso(&negation, system, &lasso)
            );
            Ok(ModelCheckResult::Violated(lasso))
        }
    }
}

fn format_lasso(
    property: &Ba,
    system: &Ba,
    lasso: &Lasso<(StateIndex, StateIndex), Label>,
) -> String {
    let name = |(p, s): (StateIndex, StateIndex)| {
        format!("({},{})", property.name(p), system.name(s))
    };
    let steps = |steps: &[(Label, (StateIndex, StateIndex))]| -> Vec<String> {
        steps
            .iter()
            .map(|(label, state)| format!("-[{}]-> {}", label, name(*state)))
            .collect()
    };
    format!(
        "{} {} ({})^ω",
        name(lasso.initial),
        steps(&lasso.prefix).join(" "),
        steps(&lasso.cycle).join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::tests::label;
    use crate::automaton::BaBuilder;
    use crate::options::{ExplorationStrategy, TableauVariant};
    use ltl::patterns;

    /// A system that alternates `p1` and `p2` forever, starting with `p1`.
    fn alternating() -> Ba {
        let mut builder = BaBuilder::new();
        let s0 = builder.state("s0", false);
        let s1 = builder.state("s1", false);
        builder
            .edge(s0, label(&["p1", "!p2"]), s1)
            .edge(s1, label(&["!p1", "p2"]), s0);
        builder.build()
    }

    #[test]
    fn test_check_until() {
        let result = check(&patterns::until_chain(2)).unwrap();
        assert_eq!(result.status(), Status::NonEmpty);
        assert!(result.lasso().is_some());
        assert!(result.automaton().is_none());
        let statistics = result.statistics();
        assert_eq!(statistics.acceptance_sets, 1);
        assert!(statistics.ba_states.is_some());
    }

    #[test]
    fn test_generalized_has_no_witness() {
        let options = CheckOptions {
            emptiness: EmptinessMethod::Generalized,
            ..CheckOptions::default()
        };
        let result = check_with(&patterns::until_chain(2), &options).unwrap();
        assert_eq!(result.status(), Status::NonEmpty);
        assert!(result.lasso().is_none());
        assert_eq!(result.statistics().ba_states, None);
    }

    #[test]
    fn test_output_automata() {
        let formula = patterns::gf_conjunction(2);
        for &output in &[OutputKind::Gba, OutputKind::Ba, OutputKind::Rabin] {
            let options = CheckOptions {
                tableau: TableauVariant::Gpvw,
                emptiness: EmptinessMethod::Generalized,
                output,
                exploration: ExplorationStrategy::MinMax,
                fold_labels: true,
            };
            let result = check_with(&formula, &options).unwrap();
            assert_eq!(result.status(), Status::NonEmpty);
            match (output, result.automaton()) {
                (OutputKind::Gba, Some(OutputAutomaton::Gba(gba))) => {
                    assert_eq!(gba.num_sets(), 2)
                }
                (OutputKind::Ba, Some(OutputAutomaton::Ba(ba))) => {
                    assert!(ba.accepting_states().next().is_some())
                }
                (OutputKind::Rabin, Some(OutputAutomaton::Rabin(rabin))) => {
                    assert!(rabin.graph().is_deterministic())
                }
                (output, automaton) => panic!("unexpected {:?} for {}", automaton, output),
            }
        }
    }

    #[test]
    fn test_check_system() {
        let system = alternating();
        // p1 holds initially and p2 holds infinitely often
        let holds = Formula::and(
            Formula::prop("p1"),
            Formula::globally(Formula::finally(Formula::prop("p2"))),
        );
        assert!(check_system(&holds, &system).unwrap().holds());

        // p1 does not hold forever
        let violated = Formula::globally(Formula::prop("p1"));
        match check_system(&violated, &system).unwrap() {
            ModelCheckResult::Violated(lasso) => {
                assert!(!lasso.cycle.is_empty());
                assert_eq!(lasso.initial.1, StateIndex::new(0));
            }
            ModelCheckResult::Holds => panic!("G p1 does not hold"),
        }
    }
}
