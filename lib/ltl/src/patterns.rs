//! Parameterized families of LTL formulas over the propositions `p1, p2, ...`.
//!
//! These are the usual scalable benchmark formulas for LTL translators.

use crate::formula::Formula;

/// The proposition `p<i>`.
pub fn p(i: usize) -> Formula {
    Formula::prop(format!("p{}", i))
}

fn props(n: usize) -> impl DoubleEndedIterator<Item = Formula> {
    (1..=n.max(1)).map(p)
}

/// `p1 U (p2 U (... U pn))`.
pub fn until_chain(n: usize) -> Formula {
    let mut props = props(n).rev();
    let last = props.next().unwrap_or(Formula::True);
    props.fold(last, |acc, left| Formula::until(left, acc))
}

/// `p1 R (p2 R (... R pn))`.
pub fn release_chain(n: usize) -> Formula {
    let mut props = props(n).rev();
    let last = props.next().unwrap_or(Formula::False);
    props.fold(last, |acc, left| Formula::release(left, acc))
}

/// `!(p1 U (p2 U (... U pn)))`.
pub fn negated_until_chain(n: usize) -> Formula {
    until_chain(n).negate()
}

/// `(GF p1 & ... & GF p(n-1)) -> GF pn`.
pub fn gf_implication(n: usize) -> Formula {
    let n = n.max(2);
    let gf = |i| Formula::globally(Formula::finally(p(i)));
    Formula::implies(Formula::conjunction((1..n).map(gf)), gf(n))
}

/// `GF p1 & ... & GF pn`.
pub fn gf_conjunction(n: usize) -> Formula {
    Formula::conjunction(props(n).map(|f| Formula::globally(Formula::finally(f))))
}

/// `FG p1 | ... | FG pn`.
pub fn fg_disjunction(n: usize) -> Formula {
    Formula::disjunction(props(n).map(|f| Formula::finally(Formula::globally(f))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chains() {
        assert_eq!(until_chain(1), p(1));
        assert_eq!(
            until_chain(3),
            Formula::until(p(1), Formula::until(p(2), p(3)))
        );
        assert_eq!(release_chain(2), Formula::release(p(1), p(2)));
        assert_eq!(
            negated_until_chain(2),
            Formula::release(Formula::not_prop("p1"), Formula::not_prop("p2"))
        );
    }

    #[test]
    fn test_gf_families() {
        assert_eq!(gf_conjunction(3).until_subformulas().len(), 0);
        assert_eq!(gf_conjunction(3).normalize().until_subformulas().len(), 3);
        assert_eq!(fg_disjunction(2).propositions().len(), 2);
        assert_eq!(gf_implication(2).normalize().until_subformulas().len(), 2);
    }
}
