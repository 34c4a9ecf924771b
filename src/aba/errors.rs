use thiserror::Error;

/// An error raised when a framework does not satisfy the well-formedness conditions of flat ABA frameworks.
///
/// Each variant corresponds to one condition.
/// Atoms are given by the textual representation of their labels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An assumption is not an atom of the language.
    #[error("assumption {0} is not part of the language")]
    AssumptionNotInLanguage(String),
    /// A rule refers to an atom that is not part of the language.
    #[error("rule with index {rule} refers to atom {atom} which is not part of the language")]
    RuleAtomNotInLanguage {
        /// the index of the rule
        rule: usize,
        /// the unknown atom
        atom: String,
    },
    /// The contrary of an assumption is not part of the language.
    #[error("the contrary {contrary} of assumption {assumption} is not part of the language")]
    ContraryNotInLanguage {
        /// the assumption
        assumption: String,
        /// its contrary
        contrary: String,
    },
    /// The keys of the contrary map differ from the set of assumptions.
    #[error("the contrary map and the assumption set disagree on {0}")]
    ContraryKeysMismatch(String),
    /// An assumption is the head of a rule.
    #[error("the framework is not flat: assumption {0} is the head of a rule")]
    NotFlat(String),
}

/// An error raised when the answer of an external oracle cannot be reconciled with a framework.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A backdoor element does not name an assumption of the framework.
    #[error("backdoor element {0} does not refer to an assumption of the framework")]
    UnknownBackdoorElement(String),
    /// The oracle output does not follow the expected protocol.
    #[error("malformed backdoor oracle answer: {0}")]
    MalformedAnswer(String),
}
