//! LTL formulas.

use std::collections::BTreeSet;
use std::fmt;

/// An atomic proposition or its negation.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    /// The name of the atomic proposition.
    proposition: String,
    /// Whether the proposition occurs positively.
    positive: bool,
}

impl Literal {
    /// Creates the positive literal for the given proposition.
    pub fn positive<S: Into<String>>(proposition: S) -> Self {
        Self {
            proposition: proposition.into(),
            positive: true,
        }
    }

    /// Creates the negative literal for the given proposition.
    pub fn negative<S: Into<String>>(proposition: S) -> Self {
        Self {
            proposition: proposition.into(),
            positive: false,
        }
    }

    /// The name of the atomic proposition of this literal.
    pub fn proposition(&self) -> &str {
        &self.proposition
    }

    /// Returns true if the proposition occurs positively.
    pub const fn is_positive(&self) -> bool {
        self.positive
    }

    /// Returns the complementary literal.
    pub fn negate(&self) -> Self {
        Self {
            proposition: self.proposition.clone(),
            positive: !self.positive,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.proposition)
        } else {
            write!(f, "!{}", self.proposition)
        }
    }
}

/// An LTL formula over the full operator set.
///
/// Downstream constructions only accept formulas in the canonical basis
/// {literal, true, false, and, or, next, until, release}, which is what
/// [`Formula::normalize`] produces.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Formula {
    True,
    False,
    Literal(Literal),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Equiv(Box<Formula>, Box<Formula>),
    Next(Box<Formula>),
    Finally(Box<Formula>),
    Globally(Box<Formula>),
    Until(Box<Formula>, Box<Formula>),
    Release(Box<Formula>, Box<Formula>),
    /// Weak until: `a W b` holds if `a U b` holds or `a` holds forever.
    Unless(Box<Formula>, Box<Formula>),
    /// `a => b` is the invariant `G (a -> b)`.
    StrongImplies(Box<Formula>, Box<Formula>),
    /// `a <=> b` is the invariant `G (a <-> b)`.
    StrongEquiv(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn prop<S: Into<String>>(proposition: S) -> Self {
        Self::Literal(Literal::positive(proposition))
    }

    pub fn not_prop<S: Into<String>>(proposition: S) -> Self {
        Self::Literal(Literal::negative(proposition))
    }

    pub fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    pub fn implies(left: Self, right: Self) -> Self {
        Self::Implies(Box::new(left), Box::new(right))
    }

    pub fn equiv(left: Self, right: Self) -> Self {
        Self::Equiv(Box::new(left), Box::new(right))
    }

    pub fn next(operand: Self) -> Self {
        Self::Next(Box::new(operand))
    }

    pub fn finally(operand: Self) -> Self {
        Self::Finally(Box::new(operand))
    }

    pub fn globally(operand: Self) -> Self {
        Self::Globally(Box::new(operand))
    }

    pub fn until(left: Self, right: Self) -> Self {
        Self::Until(Box::new(left), Box::new(right))
    }

    pub fn release(left: Self, right: Self) -> Self {
        Self::Release(Box::new(left), Box::new(right))
    }

    pub fn unless(left: Self, right: Self) -> Self {
        Self::Unless(Box::new(left), Box::new(right))
    }

    pub fn strong_implies(left: Self, right: Self) -> Self {
        Self::StrongImplies(Box::new(left), Box::new(right))
    }

    pub fn strong_equiv(left: Self, right: Self) -> Self {
        Self::StrongEquiv(Box::new(left), Box::new(right))
    }

    /// Folds the given formulas into a right-nested conjunction,
    /// or `true` if there are none.
    pub fn conjunction<I: IntoIterator<Item = Self>>(operands: I) -> Self {
        Self::fold(operands, Self::True, Self::and)
    }

    /// Folds the given formulas into a right-nested disjunction,
    /// or `false` if there are none.
    pub fn disjunction<I: IntoIterator<Item = Self>>(operands: I) -> Self {
        Self::fold(operands, Self::False, Self::or)
    }

    fn fold<I, F>(operands: I, unit: Self, combine: F) -> Self
    where
        I: IntoIterator<Item = Self>,
        F: Fn(Self, Self) -> Self,
    {
        let mut operands: Vec<_> = operands.into_iter().collect();
        match operands.pop() {
            None => unit,
            Some(last) => operands
                .into_iter()
                .rev()
                .fold(last, |acc, operand| combine(operand, acc)),
        }
    }

    /// Returns a formula equivalent to the negation of this formula.
    ///
    /// The negation is pushed inwards to the literals, so the result never
    /// contains a negation above a non-literal subformula. On formulas in the
    /// canonical basis this is an involution.
    pub fn negate(&self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Literal(literal) => Self::Literal(literal.negate()),
            Self::And(a, b) => Self::or(a.negate(), b.negate()),
            Self::Or(a, b) => Self::and(a.negate(), b.negate()),
            Self::Implies(a, b) => Self::and((**a).clone(), b.negate()),
            Self::Equiv(a, b) => Self::or(
                Self::and((**a).clone(), b.negate()),
                Self::and(a.negate(), (**b).clone()),
            ),
            Self::Next(a) => Self::next(a.negate()),
            Self::Finally(a) => Self::globally(a.negate()),
            Self::Globally(a) => Self::finally(a.negate()),
            Self::Until(a, b) => Self::release(a.negate(), b.negate()),
            Self::Release(a, b) => Self::until(a.negate(), b.negate()),
            Self::Unless(a, b) => Self::until(b.negate(), Self::and(a.negate(), b.negate())),
            Self::StrongImplies(a, b) => Self::finally(Self::and((**a).clone(), b.negate())),
            Self::StrongEquiv(a, b) => {
                Self::finally(Self::equiv((**a).clone(), (**b).clone()).negate())
            }
        }
    }

    /// Rewrites the formula into the canonical basis.
    ///
    /// Normalization commutes with negation: `f.negate().normalize()` is
    /// structurally equal to `f.normalize().negate()`.
    pub fn normalize(&self) -> Self {
        match self {
            Self::True | Self::False | Self::Literal(_) => self.clone(),
            Self::And(a, b) => Self::and(a.normalize(), b.normalize()),
            Self::Or(a, b) => Self::or(a.normalize(), b.normalize()),
            Self::Implies(a, b) => Self::or(a.negate().normalize(), b.normalize()),
            Self::Equiv(a, b) => Self::and(
                Self::or(a.negate().normalize(), b.normalize()),
                Self::or(a.normalize(), b.negate().normalize()),
            ),
            Self::Next(a) => Self::next(a.normalize()),
            Self::Finally(a) => Self::until(Self::True, a.normalize()),
            Self::Globally(a) => Self::release(Self::False, a.normalize()),
            Self::Until(a, b) => Self::until(a.normalize(), b.normalize()),
            Self::Release(a, b) => Self::release(a.normalize(), b.normalize()),
            Self::Unless(a, b) => {
                let b = b.normalize();
                Self::release(b.clone(), Self::or(a.normalize(), b))
            }
            Self::StrongImplies(a, b) => Self::release(
                Self::False,
                Self::implies((**a).clone(), (**b).clone()).normalize(),
            ),
            Self::StrongEquiv(a, b) => Self::release(
                Self::False,
                Self::equiv((**a).clone(), (**b).clone()).normalize(),
            ),
        }
    }

    /// Returns true if the formula only uses operators of the canonical basis.
    pub fn is_basis(&self) -> bool {
        match self {
            Self::True | Self::False | Self::Literal(_) => true,
            Self::Next(a) => a.is_basis(),
            Self::And(a, b) | Self::Or(a, b) | Self::Until(a, b) | Self::Release(a, b) => {
                a.is_basis() && b.is_basis()
            }
            Self::Implies(..)
            | Self::Equiv(..)
            | Self::Finally(_)
            | Self::Globally(_)
            | Self::Unless(..)
            | Self::StrongImplies(..)
            | Self::StrongEquiv(..) => false,
        }
    }

    /// Returns true if the formula is a literal or a boolean constant.
    pub fn is_atomic(&self) -> bool {
        matches!(self, Self::True | Self::False | Self::Literal(_))
    }

    /// The direct operands of the top-level operator.
    pub fn operands(&self) -> Vec<&Self> {
        match self {
            Self::True | Self::False | Self::Literal(_) => Vec::new(),
            Self::Next(a) | Self::Finally(a) | Self::Globally(a) => vec![&**a],
            Self::And(a, b)
            | Self::Or(a, b)
            | Self::Implies(a, b)
            | Self::Equiv(a, b)
            | Self::Until(a, b)
            | Self::Release(a, b)
            | Self::Unless(a, b)
            | Self::StrongImplies(a, b)
            | Self::StrongEquiv(a, b) => vec![&**a, &**b],
        }
    }

    /// Iterates over all subformulas in pre-order, including the formula itself.
    /// Repeated subformulas are visited repeatedly.
    pub fn preorder(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let formula = stack.pop()?;
            stack.extend(formula.operands().into_iter().rev());
            Some(formula)
        })
    }

    /// The closure of the formula: the set of all its subformulas.
    pub fn subformulas(&self) -> BTreeSet<Self> {
        self.preorder().cloned().collect()
    }

    /// The distinct until-subformulas in order of their first occurrence
    /// in a pre-order traversal.
    pub fn until_subformulas(&self) -> Vec<Self> {
        let mut seen = BTreeSet::new();
        self.preorder()
            .filter(|f| matches!(f, Self::Until(..)))
            .filter(|f| seen.insert(*f))
            .cloned()
            .collect()
    }

    /// The names of all atomic propositions occurring in the formula.
    pub fn propositions(&self) -> BTreeSet<&str> {
        self.preorder()
            .filter_map(|f| match f {
                Self::Literal(literal) => Some(literal.proposition()),
                _ => None,
            })
            .collect()
    }

    /// The number of operators and atoms in the formula.
    pub fn size(&self) -> usize {
        self.preorder().count()
    }
}

impl std::ops::Not for Formula {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl From<Literal> for Formula {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Literal(literal) => write!(f, "{}", literal),
            Self::Next(a) => write!(f, "X {}", a),
            Self::Finally(a) => write!(f, "F {}", a),
            Self::Globally(a) => write!(f, "G {}", a),
            Self::And(a, b) => write!(f, "({} & {})", a, b),
            Self::Or(a, b) => write!(f, "({} | {})", a, b),
            Self::Implies(a, b) => write!(f, "({} -> {})", a, b),
            Self::Equiv(a, b) => write!(f, "({} <-> {})", a, b),
            Self::Until(a, b) => write!(f, "({} U {})", a, b),
            Self::Release(a, b) => write!(f, "({} R {})", a, b),
            Self::Unless(a, b) => write!(f, "({} W {})", a, b),
            Self::StrongImplies(a, b) => write!(f, "({} => {})", a, b),
            Self::StrongEquiv(a, b) => write!(f, "({} <=> {})", a, b),
        }
    }
}
