//! Options for the translation and emptiness checking procedure.

use clap::{Args, Parser, ValueEnum};
use ltl::{patterns, Formula};

/// Implement [`Display`](std::fmt::Display) with the information in [`clap::ValueEnum`].
///
/// This ensures consistent names for parsing of the default argument.
macro_rules! clap_display {
    ($t:ty) => {
        impl std::fmt::Display for $t
        where
            $t: clap::ValueEnum,
        {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                use clap::ValueEnum as _;
                match self.to_possible_value() {
                    Some(value) => write!(f, "{}", value.get_name()),
                    None => Ok(()),
                }
            }
        }
    };
}

/// The tableau construction used to translate a formula
/// into a generalized Büchi automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableauVariant {
    /// The original construction by Gerth, Peled, Vardi and Wolper,
    /// which merges nodes with equal current and next obligations
    /// and puts acceptance on states.
    #[value(name = "gpvw")]
    Gpvw,
    /// Merge nodes with equal next obligations only and put acceptance
    /// on transitions, tracking fulfilled until obligations with bit vectors.
    ///
    /// Described in:
    /// [From States to Transitions: Improving Translation of LTL Formulae to Büchi Automata](https://doi.org/10.1007/3-540-36135-9_20),
    /// D. Giannakopoulou and F. Lerda, FORTE 2002.
    #[value(name = "bitvector")]
    BitVector,
}
impl Default for TableauVariant {
    fn default() -> Self {
        Self::BitVector
    }
}
clap_display!(TableauVariant);

/// The method to decide emptiness of the translated automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmptinessMethod {
    /// Degeneralize the automaton and search for an accepting
    /// lasso with a nested depth-first search.
    ///
    /// Described in:
    /// [Memory-efficient algorithms for the verification of temporal properties](https://doi.org/10.1007/BF00121128),
    /// C. Courcoubetis, M. Vardi, P. Wolper and M. Yannakakis, FMSD 1992.
    #[value(name = "nested-dfs")]
    NestedDfs,
    /// Search the generalized automaton directly with Couvreur's
    /// SCC-based check, which unions the acceptance sets seen inside each
    /// strongly connected component instead of labelling single states.
    ///
    /// Described in:
    /// [On-the-fly verification of linear temporal logic](https://doi.org/10.1007/3-540-48119-2_16),
    /// J.-M. Couvreur, FM 1999.
    #[value(name = "generalized")]
    Generalized,
}
impl Default for EmptinessMethod {
    fn default() -> Self {
        Self::NestedDfs
    }
}
clap_display!(EmptinessMethod);

/// The automaton that is emitted in addition to the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputKind {
    /// Only output the verdict.
    #[value(name = "verdict")]
    Verdict,
    /// Output the generalized Büchi automaton of the tableau.
    #[value(name = "gba")]
    Gba,
    /// Output the degeneralized Büchi automaton.
    #[value(name = "ba")]
    Ba,
    /// Output the deterministic Rabin automaton obtained
    /// by Safra's construction from the degeneralized automaton.
    #[value(name = "rabin")]
    Rabin,
}
impl Default for OutputKind {
    fn default() -> Self {
        Self::Verdict
    }
}
clap_display!(OutputKind);

/// The strategy to use for choosing the next Safra tree
/// during determinization.
///
/// The min, max and minmax strategies score trees by their number of nodes.
/// The strategy only influences the numbering of the states of the
/// resulting automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExplorationStrategy {
    /// Explore trees in a breadth-first search, i.e.
    /// choose the tree that was discovered the earliest as the next tree.
    #[value(name = "bfs")]
    Bfs,
    /// Explore trees in a depth-first search, i.e.
    /// choose the tree that was discovered the latest as the next tree.
    #[value(name = "dfs")]
    Dfs,
    /// Explore trees by choosing the tree with the minimum score
    /// as the next tree.
    #[value(name = "min")]
    Min,
    /// Explore trees by choosing the tree with the maximum score
    /// as the next tree.
    #[value(name = "max")]
    Max,
    /// Explore trees by alternatingly choosing the tree with the
    /// minimum and maximum score next.
    #[value(name = "minmax")]
    MinMax,
}
impl Default for ExplorationStrategy {
    fn default() -> Self {
        Self::Bfs
    }
}
clap_display!(ExplorationStrategy);

/// A parameterized family of formulas over the propositions `p1, p2, ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormulaFamily {
    /// The formula `false`.
    #[value(name = "false")]
    False,
    /// `p1 U (p2 U (... U pn))`.
    #[value(name = "until-chain")]
    UntilChain,
    /// `p1 R (p2 R (... R pn))`.
    #[value(name = "release-chain")]
    ReleaseChain,
    /// `!(p1 U (p2 U (... U pn)))`.
    #[value(name = "negated-until-chain")]
    NegatedUntilChain,
    /// `(GF p1 & ... & GF p(n-1)) -> GF pn`.
    #[value(name = "gf-implication")]
    GfImplication,
    /// `GF p1 & ... & GF pn`.
    #[value(name = "gf-conjunction")]
    GfConjunction,
    /// `FG p1 | ... | FG pn`.
    #[value(name = "fg-disjunction")]
    FgDisjunction,
}
impl Default for FormulaFamily {
    fn default() -> Self {
        Self::UntilChain
    }
}
clap_display!(FormulaFamily);

impl FormulaFamily {
    /// The member of the family with parameter `n`.
    pub fn instantiate(self, n: usize) -> Formula {
        match self {
            Self::False => Formula::False,
            Self::UntilChain => patterns::until_chain(n),
            Self::ReleaseChain => patterns::release_chain(n),
            Self::NegatedUntilChain => patterns::negated_until_chain(n),
            Self::GfImplication => patterns::gf_implication(n),
            Self::GfConjunction => patterns::gf_conjunction(n),
            Self::FgDisjunction => patterns::fg_disjunction(n),
        }
    }
}

/// The trace level / verbosity for the logging framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraceLevel {
    /// Turn logging off.
    #[value(name = "off")]
    Off,
    /// Only print errors.
    #[value(name = "error")]
    Error,
    /// Print errors and warnings.
    #[value(name = "warn")]
    Warn,
    /// Print errors, warnings and useful information.
    #[value(name = "info")]
    Info,
    /// Print errors, warnings, useful and debug information.
    #[value(name = "debug")]
    Debug,
    /// Print all information, including very verbose output.
    #[value(name = "trace")]
    Trace,
}
impl Default for TraceLevel {
    fn default() -> Self {
        Self::Error
    }
}
clap_display!(TraceLevel);

impl From<TraceLevel> for log::LevelFilter {
    fn from(level: TraceLevel) -> Self {
        match level {
            TraceLevel::Off => Self::Off,
            TraceLevel::Error => Self::Error,
            TraceLevel::Warn => Self::Warn,
            TraceLevel::Info => Self::Info,
            TraceLevel::Debug => Self::Debug,
            TraceLevel::Trace => Self::Trace,
        }
    }
}

/// A group of options used for parsing the arguments of the
/// command-line interface.
///
/// This struct should mainly be used with [`clap`] and not
/// instantiated manually. For using this crate as library,
/// please use [`CheckOptions`] directly instead. This struct
/// only includes additional fields for choosing the formula
/// and the output.
#[derive(Debug, Clone, Default, Parser)]
#[command(version, about)]
pub struct CliOptions {
    /// The family from which the formula is taken.
    #[arg(
        value_enum,
        short = 'f',
        long = "family",
        default_value_t,
        help = "Family of the LTL formula to check",
        display_order = 0
    )]
    pub family: FormulaFamily,
    /// The parameter of the formula family.
    #[arg(
        short = 'n',
        long = "size",
        default_value_t = 2,
        help = "Parameter of the formula family",
        display_order = 1
    )]
    pub size: usize,
    /// Check the negation of the formula instead.
    #[arg(long = "negate", help = "Negate the formula", display_order = 2)]
    pub negate: bool,
    /// The output file where the automaton should be written to.
    #[arg(
        short = 'O',
        long = "output-file",
        help = "Write automaton to the given file",
        display_order = 3
    )]
    pub output_file: Option<String>,
    /// The trace level to use for instantiating the logging framework.
    #[arg(
        value_enum,
        short = 't',
        long = "trace",
        value_name = "LEVEL",
        default_value_t,
        help = "Trace level",
        display_order = 10
    )]
    pub trace_level: TraceLevel,
    /// The set of options for the checking procedure.
    #[command(flatten)]
    pub check_options: CheckOptions,
}

impl CliOptions {
    /// The formula selected by the family, size and negation options.
    pub fn formula(&self) -> Formula {
        let formula = self.family.instantiate(self.size);
        if self.negate {
            formula.negate()
        } else {
            formula
        }
    }
}

/// Options to control the translation and the emptiness check.
///
/// These options can then be used with [`check_with`](crate::check_with).
///
/// # Examples
///
/// ```
/// use ltlauto::options::*;
/// let options = CheckOptions {
///     tableau: TableauVariant::Gpvw,
///     emptiness: EmptinessMethod::Generalized,
///     ..CheckOptions::default()
/// };
/// ```
#[derive(Debug, Clone, Default, Args)]
pub struct CheckOptions {
    /// The tableau construction to translate the formula.
    #[arg(
        value_enum,
        short = 'c',
        long = "tableau",
        default_value_t,
        help = "Tableau construction for the generalized Büchi automaton",
        display_order = 4
    )]
    pub tableau: TableauVariant,
    /// The method to decide emptiness.
    #[arg(
        value_enum,
        short = 'e',
        long = "emptiness",
        default_value_t,
        help = "Emptiness check (nested DFS on degeneralized automaton or generalized search)",
        display_order = 5
    )]
    pub emptiness: EmptinessMethod,
    /// Compact parallel edges by minimizing their labels.
    #[arg(
        long = "fold",
        help = "Merge labels of parallel edges",
        display_order = 6
    )]
    pub fold_labels: bool,
    /// The automaton to produce alongside the verdict.
    #[arg(
        value_enum,
        short = 'o',
        long = "output",
        default_value_t,
        help = "Automaton to output (none, GBA, BA or deterministic Rabin automaton)",
        display_order = 7
    )]
    pub output: OutputKind,
    /// The strategy to order Safra trees during determinization.
    #[arg(
        value_enum,
        short = 'x',
        long = "exploration",
        default_value_t,
        help = "Exploration strategy for Safra's construction",
        display_order = 8
    )]
    pub exploration: ExplorationStrategy,
}
