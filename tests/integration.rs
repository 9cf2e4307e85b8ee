//! Integration tests that check formulas along every construction path
//! and compare the verdicts.

use std::io::Read;

use ltl::{patterns, Formula, Literal};

use ltlauto::automaton::{BaBuilder, Label};
use ltlauto::options::*;
use ltlauto::{
    check_system, check_with, OutputAutomaton,
    Status::{self, Empty, NonEmpty},
};

fn p(i: usize) -> Formula {
    patterns::p(i)
}

/// Check the formula with the given options and compare the status.
fn verify_with(formula: &Formula, expected_status: Status, options: &CheckOptions) {
    let result = check_with(formula, options).unwrap();
    assert_eq!(
        result.status(),
        expected_status,
        "{} with {:?}",
        formula,
        options
    );
}

/// Check the generalized automaton of the tableau directly.
fn verify_generalized(formula: &Formula, expected_status: Status) {
    let options = CheckOptions {
        emptiness: EmptinessMethod::Generalized,
        ..CheckOptions::default()
    };
    verify_with(formula, expected_status, &options);
}

/// Degeneralize the automaton of the bit-vector tableau and search for
/// a lasso, which must be present exactly for non-empty languages.
fn verify_nested_dfs(formula: &Formula, expected_status: Status) {
    let options = CheckOptions::default();
    verify_with(formula, expected_status, &options);
    let result = check_with(formula, &options).unwrap();
    assert_eq!(result.lasso().is_some(), expected_status == NonEmpty);
}

/// Degeneralize the automaton of the state-based tableau and search for a lasso.
fn verify_gpvw(formula: &Formula, expected_status: Status) {
    let options = CheckOptions {
        tableau: TableauVariant::Gpvw,
        ..CheckOptions::default()
    };
    verify_with(formula, expected_status, &options);
}

/// Fold parallel edges in both automata before the search.
fn verify_folded(formula: &Formula, expected_status: Status) {
    for &tableau in &[TableauVariant::Gpvw, TableauVariant::BitVector] {
        let options = CheckOptions {
            tableau,
            fold_labels: true,
            ..CheckOptions::default()
        };
        verify_with(formula, expected_status, &options);
    }
}

/// Determinize the degeneralized automaton and check that the result is deterministic.
fn verify_rabin(formula: &Formula, expected_status: Status) {
    let options = CheckOptions {
        output: OutputKind::Rabin,
        ..CheckOptions::default()
    };
    let result = check_with(formula, &options).unwrap();
    assert_eq!(result.status(), expected_status);
    match result.automaton() {
        Some(OutputAutomaton::Rabin(rabin)) => {
            assert!(rabin.graph().is_deterministic());
        }
        _ => panic!("no rabin automaton produced"),
    }
}

/// Generate tests for the given list of formulas, checking the verdict
/// on every construction path.
macro_rules! emptiness_tests {
    ($($name:ident: ($formula:expr, $expected_status:expr),)*) => {
        mod generalized {
            use super::*;
            $(
                #[test]
                fn $name() {
                    verify_generalized(&$formula, $expected_status);
                }
            )*
        }

        mod nested_dfs {
            use super::*;
            $(
                #[test]
                fn $name() {
                    verify_nested_dfs(&$formula, $expected_status);
                }
            )*
        }

        mod gpvw {
            use super::*;
            $(
                #[test]
                fn $name() {
                    verify_gpvw(&$formula, $expected_status);
                }
            )*
        }

        mod folded {
            use super::*;
            $(
                #[test]
                fn $name() {
                    verify_folded(&$formula, $expected_status);
                }
            )*
        }

        mod rabin {
            use super::*;
            $(
                #[test]
                fn $name() {
                    verify_rabin(&$formula, $expected_status);
                }
            )*
        }
    };
}

emptiness_tests! {
    false_formula: (Formula::False, Empty),
    true_formula: (Formula::True, NonEmpty),
    until: (Formula::until(p(1), p(2)), NonEmpty),
    until_nested: (patterns::until_chain(3), NonEmpty),
    until_nested_negated: (patterns::negated_until_chain(3), NonEmpty),
    gf_implication: (patterns::gf_implication(2), NonEmpty),
    release: (Formula::release(p(1), p(2)), NonEmpty),
    release_nested: (patterns::release_chain(3), NonEmpty),
    gf_conjunction: (patterns::gf_conjunction(3), NonEmpty),
    fg_disjunction: (patterns::fg_disjunction(2), NonEmpty),
    contradiction: (Formula::and(p(1), Formula::not_prop("p1")), Empty),
    globally_and_finally_not: (
        Formula::and(
            Formula::globally(p(1)),
            Formula::finally(Formula::not_prop("p1"))
        ),
        Empty
    ),
    gf_and_fg_not: (
        Formula::and(
            Formula::globally(Formula::finally(p(1))),
            Formula::finally(Formula::globally(Formula::not_prop("p1")))
        ),
        Empty
    ),
    next_contradiction: (
        Formula::and(Formula::next(p(1)), Formula::next(Formula::not_prop("p1"))),
        Empty
    ),
    pending_until: (
        Formula::and(
            Formula::globally(Formula::and(p(1), Formula::next(Formula::until(p(1), p(2))))),
            Formula::globally(Formula::not_prop("p2"))
        ),
        Empty
    ),
}

#[test]
fn test_until_lasso_reaches_p2() {
    let result = check_with(&Formula::until(p(1), p(2)), &CheckOptions::default()).unwrap();
    let lasso = result.lasso().unwrap();
    let p1 = Literal::positive("p1");
    let p2 = Literal::positive("p2");
    let labels: Vec<&Label> = lasso
        .prefix
        .iter()
        .chain(lasso.cycle.iter())
        .map(|(label, _)| label)
        .collect();
    let first_p2 = labels.iter().position(|l| l.contains(&p2)).unwrap();
    assert!(labels[..first_p2].iter().all(|l| l.contains(&p1)));
    assert!(!lasso.cycle.is_empty());
}

#[test]
fn test_normalize_into_basis() {
    let formulas = vec![
        patterns::gf_implication(3),
        patterns::fg_disjunction(3),
        Formula::equiv(p(1), Formula::unless(p(2), p(3))),
        Formula::strong_implies(p(1), Formula::next(p(2))),
        Formula::strong_equiv(p(1), Formula::finally(p(2))),
    ];
    for formula in formulas {
        let normalized = formula.normalize();
        assert!(normalized.is_basis(), "{}", normalized);
        assert_eq!(formula.negate().normalize(), normalized.negate());
        assert_eq!(normalized.negate().negate(), normalized);
    }
}

#[test]
fn test_negation_agrees() {
    // a formula and its negation are both satisfiable unless one is valid
    for n in 1..4 {
        let formula = patterns::until_chain(n);
        for path in &[EmptinessMethod::NestedDfs, EmptinessMethod::Generalized] {
            let options = CheckOptions {
                emptiness: *path,
                ..CheckOptions::default()
            };
            let positive = check_with(&formula, &options).unwrap();
            let negative = check_with(&formula.negate(), &options).unwrap();
            assert_eq!(positive.status(), NonEmpty);
            assert_eq!(negative.status(), NonEmpty);
        }
    }
}

/// The label asserting `p1` and `p2` as given.
fn assignment(p1: bool, p2: bool) -> Label {
    let literal = |name: &str, positive: bool| {
        if positive {
            Literal::positive(name)
        } else {
            Literal::negative(name)
        }
    };
    vec![literal("p1", p1), literal("p2", p2)].into_iter().collect()
}

#[test]
fn test_check_system() {
    // a system that reads p1 once and then p2 forever
    let mut builder = BaBuilder::new();
    let s0 = builder.state("s0", false);
    let s1 = builder.state("s1", false);
    builder
        .edge(s0, assignment(true, false), s1)
        .edge(s1, assignment(false, true), s1);
    let system = builder.build();

    assert!(check_system(&Formula::until(p(1), p(2)), &system)
        .unwrap()
        .holds());
    assert!(check_system(&Formula::finally(Formula::globally(p(2))), &system)
        .unwrap()
        .holds());
    assert!(!check_system(&Formula::globally(p(1)), &system)
        .unwrap()
        .holds());
    assert!(!check_system(&Formula::next(p(1)), &system)
        .unwrap()
        .holds());
}

#[test]
fn test_write_automaton() {
    let options = CheckOptions {
        output: OutputKind::Gba,
        ..CheckOptions::default()
    };
    let result = check_with(&patterns::gf_conjunction(2), &options).unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    result.automaton().unwrap().write(file.as_file_mut()).unwrap();

    let mut contents = String::new();
    file.reopen()
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert!(contents.starts_with("acceptance: 2 sets, transition-based"));
    assert!(contents.contains("gba "));
}
