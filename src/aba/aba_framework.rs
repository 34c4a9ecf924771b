use super::{
    closure_engine::ClosureEngine,
    errors::ValidationError,
    language::{Atom, Language},
};
use crate::{
    sat::{default_oracle_factory, ClosureOracleFactory},
    utils::LabelType,
};
use anyhow::{anyhow, Context, Result};
use std::{collections::HashSet, rc::Rc};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AtomType {
    NotAssumption,
    Assumption { contrary_index: Option<usize> },
}

/// The identifiers involved in a rule: its own one, the one of its head and the ones of its body.
///
/// Bodies are sorted and contain no duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RuleIds {
    pub(crate) id: usize,
    pub(crate) head: usize,
    pub(crate) body: Vec<usize>,
}

impl RuleIds {
    pub(crate) fn new(id: usize, head: usize, mut body: Vec<usize>) -> Self {
        body.sort_unstable();
        body.dedup();
        Self { id, head, body }
    }
}

/// A rule in an ABA framework.
///
/// Two rules are the same iff they have the same identifier.
pub struct Rule<'a, T>
where
    T: LabelType,
{
    rule_ids: &'a RuleIds,
    language: &'a Language<T>,
}

impl<'a, T> Rule<'a, T>
where
    T: LabelType,
{
    /// Returns the identifier of the rule.
    pub fn id(&self) -> usize {
        self.rule_ids.id
    }

    /// Returns the head of the rule.
    pub fn head(&self) -> &'a Atom<T> {
        self.language.get_atom_by_id(self.rule_ids.head)
    }

    /// Returns the body of the rule, sorted by atom identifiers.
    pub fn iter_body(&self) -> impl Iterator<Item = &'a Atom<T>> + 'a {
        let language = self.language;
        self.rule_ids
            .body
            .iter()
            .map(move |i| language.get_atom_by_id(*i))
    }

    pub(crate) fn body_ids(&self) -> &[usize] {
        &self.rule_ids.body
    }
}

impl<T> PartialEq for Rule<'_, T>
where
    T: LabelType,
{
    fn eq(&self, other: &Self) -> bool {
        self.rule_ids.id == other.rule_ids.id
    }
}

/// Handles a flat ABA framework.
///
/// A framework is made of a language, a set of rules, a set of assumptions and a contrary function mapping each assumption to an atom, or to nothing.
/// The well-formedness conditions are checked when the framework is built, and again each time it is transformed:
///
/// * assumptions are atoms of the language,
/// * rules only involve atoms of the language,
/// * contraries are atoms of the language,
/// * the contrary function is defined exactly on the assumptions,
/// * no assumption is the head of a rule (flatness).
///
/// A violation is reported as a [`ValidationError`](super::ValidationError) and the framework is not built.
///
/// The framework owns a closure oracle answering deductive closure queries on its rules.
/// The oracle is built from the rules at construction time and rebuilt when the rules change.
///
/// # Example
///
/// ```
/// # use abadoor::aba::ABAFramework;
/// let framework = ABAFramework::new(
///     &["a", "b", "c", "p", "q", "r", "s", "t"],
///     &[("p", vec!["q", "a"]), ("q", vec![]), ("r", vec!["b", "c"])],
///     &["a", "b", "c"],
///     &[("a", Some("r")), ("b", Some("s")), ("c", Some("t"))],
/// ).unwrap();
/// assert_eq!(3, framework.n_assumptions());
/// assert_eq!(3, framework.n_rules());
/// ```
pub struct ABAFramework<T>
where
    T: LabelType,
{
    language: Language<T>,
    atom_type: Vec<AtomType>,
    assumption_indices: Vec<usize>,
    rules: Vec<RuleIds>,
    closure_engine: ClosureEngine,
}

impl<T> ABAFramework<T>
where
    T: LabelType,
{
    /// Builds a framework, using the embedded oracle for closure queries.
    ///
    /// Atoms are given by their labels.
    /// Rules are given as pairs made of a head and a body; their identifiers are their indices in the slice.
    /// Each assumption must appear exactly once in the contrary list, with `None` if it has no contrary.
    ///
    /// If a well-formedness condition is not met, an error is returned.
    /// Its root cause is a [`ValidationError`](super::ValidationError).
    ///
    /// # Example
    ///
    /// ```
    /// # use abadoor::aba::{ABAFramework, ValidationError};
    /// let err = ABAFramework::new(
    ///     &["a", "b"],
    ///     &[("a", vec!["b"])],
    ///     &["a"],
    ///     &[("a", None)],
    /// ).err().unwrap();
    /// assert_eq!(
    ///     Some(&ValidationError::NotFlat("a".to_string())),
    ///     err.downcast_ref::<ValidationError>()
    /// );
    /// ```
    pub fn new(
        language: &[T],
        rules: &[(T, Vec<T>)],
        assumptions: &[T],
        contraries: &[(T, Option<T>)],
    ) -> Result<Self> {
        Self::new_with_oracle_factory(
            language,
            rules,
            assumptions,
            contraries,
            default_oracle_factory(),
        )
    }

    /// Builds a framework, using the provided factory to create its closure oracle.
    ///
    /// See [`new`](Self::new) for the meaning of the other parameters.
    pub fn new_with_oracle_factory(
        language: &[T],
        rules: &[(T, Vec<T>)],
        assumptions: &[T],
        contraries: &[(T, Option<T>)],
        oracle_factory: Rc<dyn ClosureOracleFactory>,
    ) -> Result<Self> {
        let language = Language::new_with_labels(language);
        let context = "while building an ABA framework";
        let assumption_ids = assumptions
            .iter()
            .map(|a| {
                language
                    .try_get_id(a)
                    .ok_or_else(|| ValidationError::AssumptionNotInLanguage(a.to_string()))
            })
            .collect::<Result<HashSet<usize>, _>>()
            .context(context)?;
        let atom_id = |rule: usize, label: &T| {
            language
                .try_get_id(label)
                .ok_or_else(|| ValidationError::RuleAtomNotInLanguage {
                    rule,
                    atom: label.to_string(),
                })
        };
        let rules = rules
            .iter()
            .enumerate()
            .map(|(i, (head, body))| {
                let head_id = atom_id(i, head)?;
                let body_ids = body
                    .iter()
                    .map(|b| atom_id(i, b))
                    .collect::<Result<Vec<usize>, _>>()?;
                Ok(RuleIds::new(i, head_id, body_ids))
            })
            .collect::<Result<Vec<RuleIds>, ValidationError>>()
            .context(context)?;
        let mut atom_type = vec![AtomType::NotAssumption; language.len()];
        let mut has_contrary_entry = vec![false; language.len()];
        for (assumption, contrary) in contraries {
            let contrary_index = match contrary {
                Some(c) => Some(language.try_get_id(c).ok_or_else(|| {
                    ValidationError::ContraryNotInLanguage {
                        assumption: assumption.to_string(),
                        contrary: c.to_string(),
                    }
                })?),
                None => None,
            };
            match language.try_get_id(assumption) {
                Some(i) if assumption_ids.contains(&i) && !has_contrary_entry[i] => {
                    has_contrary_entry[i] = true;
                    atom_type[i] = AtomType::Assumption { contrary_index };
                }
                _ => {
                    return Err(ValidationError::ContraryKeysMismatch(assumption.to_string()))
                        .context(context)
                }
            }
        }
        let mut assumption_indices = assumption_ids.into_iter().collect::<Vec<usize>>();
        assumption_indices.sort_unstable();
        if let Some(i) = assumption_indices.iter().find(|i| !has_contrary_entry[**i]) {
            return Err(ValidationError::ContraryKeysMismatch(
                language.get_atom_by_id(*i).label().to_string(),
            ))
            .context(context);
        }
        Self::from_parts(language, atom_type, rules, oracle_factory)
    }

    /// Builds a framework from its identifier-level representation, checking its well-formedness.
    ///
    /// The assumption list is deduced from the atom types.
    pub(crate) fn from_parts(
        language: Language<T>,
        atom_type: Vec<AtomType>,
        rules: Vec<RuleIds>,
        oracle_factory: Rc<dyn ClosureOracleFactory>,
    ) -> Result<Self> {
        let assumption_indices = atom_type
            .iter()
            .enumerate()
            .filter_map(|(i, t)| match t {
                AtomType::Assumption { .. } => Some(i),
                AtomType::NotAssumption => None,
            })
            .collect();
        let closure_engine = ClosureEngine::new(oracle_factory, &rules);
        let framework = ABAFramework {
            language,
            atom_type,
            assumption_indices,
            rules,
            closure_engine,
        };
        framework
            .check_well_formedness()
            .context("while building an ABA framework")?;
        Ok(framework)
    }

    /// Checks the well-formedness conditions on the identifier-level representation.
    pub(crate) fn check_well_formedness(&self) -> Result<(), ValidationError> {
        let n_atoms = self.language.len();
        let label_of = |i: usize| {
            if i < n_atoms {
                self.language.get_atom_by_id(i).label().to_string()
            } else {
                format!("#{}", i)
            }
        };
        if let Some(i) = self.assumption_indices.iter().find(|i| **i >= n_atoms) {
            return Err(ValidationError::AssumptionNotInLanguage(label_of(*i)));
        }
        for r in self.rules.iter() {
            if let Some(i) = std::iter::once(&r.head)
                .chain(r.body.iter())
                .find(|i| **i >= n_atoms)
            {
                return Err(ValidationError::RuleAtomNotInLanguage {
                    rule: r.id,
                    atom: label_of(*i),
                });
            }
        }
        for a in self.assumption_indices.iter() {
            if let AtomType::Assumption {
                contrary_index: Some(c),
            } = self.atom_type[*a]
            {
                if c >= n_atoms {
                    return Err(ValidationError::ContraryNotInLanguage {
                        assumption: label_of(*a),
                        contrary: label_of(c),
                    });
                }
            }
        }
        if self.atom_type.len() != n_atoms {
            return Err(ValidationError::ContraryKeysMismatch(format!(
                "{} atom types for {} atoms",
                self.atom_type.len(),
                n_atoms
            )));
        }
        if let Some(r) = self
            .rules
            .iter()
            .find(|r| matches!(self.atom_type[r.head], AtomType::Assumption { .. }))
        {
            return Err(ValidationError::NotFlat(label_of(r.head)));
        }
        Ok(())
    }

    /// Returns the number of atoms in the language.
    pub fn n_atoms(&self) -> usize {
        self.language.len()
    }

    /// Returns the number of assumptions.
    pub fn n_assumptions(&self) -> usize {
        self.assumption_indices.len()
    }

    /// Returns the number of rules.
    pub fn n_rules(&self) -> usize {
        self.rules.len()
    }

    /// Returns the underlying language.
    pub fn language(&self) -> &Language<T> {
        &self.language
    }

    /// Returns `true` iff the provided atom (given by its label) corresponds to an assumption.
    ///
    /// An error is returned if the provided label does not refer to a valid language element.
    pub fn is_assumption(&self, s: &T) -> Result<bool> {
        let index = self
            .language
            .get_atom(s)
            .context("cannot check if the atom is an assumption")?
            .id();
        Ok(self.is_assumption_id(index))
    }

    /// Returns an iterator to the assumptions, in increasing order of identifiers.
    pub fn iter_assumptions(&self) -> impl Iterator<Item = &Atom<T>> + '_ {
        self.assumption_indices
            .iter()
            .map(move |i| self.language.get_atom_by_id(*i))
    }

    /// Returns the contrary of an assumption given by its label.
    ///
    /// `None` is returned if the assumption has no contrary.
    /// If the provided label does not refer to an assumption, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// # use abadoor::aba::ABAFramework;
    /// let framework = ABAFramework::new(
    ///     &["a", "b", "c"],
    ///     &[("c", vec![])],
    ///     &["a", "b"],
    ///     &[("a", Some("c")), ("b", None)],
    /// ).unwrap();
    /// assert_eq!(&"c", framework.get_contrary(&"a").unwrap().unwrap().label());
    /// assert!(framework.get_contrary(&"b").unwrap().is_none());
    /// assert!(framework.get_contrary(&"c").is_err());
    /// ```
    pub fn get_contrary(&self, s: &T) -> Result<Option<&Atom<T>>> {
        let index = self
            .language
            .get_atom(s)
            .context("cannot get the contrary of the assumption")?
            .id();
        match self.atom_type[index] {
            AtomType::NotAssumption => Err(anyhow!("atom {} is not an assumption", s)),
            AtomType::Assumption { contrary_index } => {
                Ok(contrary_index.map(|c| self.language.get_atom_by_id(c)))
            }
        }
    }

    /// Provides an iterator to the rules.
    pub fn iter_rules(&self) -> impl Iterator<Item = Rule<T>> + '_ {
        self.rules.iter().map(move |r| Rule {
            rule_ids: r,
            language: &self.language,
        })
    }

    /// Provides an iterator to the rules which head is the provided atom.
    ///
    /// An error is returned if the label does not refer to an atom of the language.
    pub fn iter_rules_by_head(&self, head: &T) -> Result<impl Iterator<Item = Rule<T>> + '_> {
        let head_id = self
            .language
            .get_atom(head)
            .context("cannot look for the rules with this head")?
            .id();
        Ok(self.iter_rules().filter(move |r| r.rule_ids.head == head_id))
    }

    pub(crate) fn assumption_ids(&self) -> &[usize] {
        &self.assumption_indices
    }

    pub(crate) fn is_assumption_id(&self, id: usize) -> bool {
        matches!(self.atom_type[id], AtomType::Assumption { .. })
    }

    /// Returns the identifier of the contrary of an assumption, if it has one.
    ///
    /// `None` is also returned for atoms that are not assumptions.
    pub(crate) fn contrary_id(&self, id: usize) -> Option<usize> {
        match self.atom_type[id] {
            AtomType::NotAssumption => None,
            AtomType::Assumption { contrary_index } => contrary_index,
        }
    }

    pub(crate) fn rule_ids(&self) -> &[RuleIds] {
        &self.rules
    }

    pub(crate) fn oracle_factory(&self) -> Rc<dyn ClosureOracleFactory> {
        Rc::clone(self.closure_engine.oracle_factory())
    }

    /// Converts assumption labels into a membership vector indexed by atom identifiers.
    ///
    /// An error is returned if a label does not refer to an assumption.
    pub(crate) fn assumption_labels_to_membership(&self, labels: &[&T]) -> Result<Vec<bool>> {
        let mut membership = vec![false; self.language.len()];
        for l in labels {
            if !self.is_assumption(l)? {
                return Err(anyhow!("atom {} is not an assumption", l));
            }
            membership[self.language.get_atom(l)?.id()] = true;
        }
        Ok(membership)
    }

    /// Returns the atoms derivable from the assumptions flagged in the membership vector.
    ///
    /// Flags on atoms that are not assumptions are ignored.
    pub(crate) fn closure_by_ids(&mut self, assumptions: &[bool]) -> Vec<bool> {
        let assumed = self
            .assumption_indices
            .iter()
            .copied()
            .filter(|a| assumptions[*a]);
        self.closure_engine.closure(self.language.len(), assumed)
    }

    /// Returns the assumptions which contrary is derivable from the flagged assumptions.
    pub(crate) fn attacked_by_ids(&mut self, assumptions: &[bool]) -> Vec<bool> {
        let derivable = self.closure_by_ids(assumptions);
        let mut attacked = vec![false; self.language.len()];
        for a in self.assumption_indices.iter() {
            if let Some(c) = self.contrary_id(*a) {
                attacked[*a] = derivable[c];
            }
        }
        attacked
    }

    /// Releases the closure oracle.
    ///
    /// The compiled rules are kept; a new oracle is built from them if a closure query is made later.
    pub fn release_oracle(&mut self) {
        self.closure_engine.release_oracle();
    }

    /// Replaces the language and the rules of this framework, rebuilding the closure oracle.
    pub(crate) fn replace_structure(
        &mut self,
        language: Language<T>,
        atom_type: Vec<AtomType>,
        rules: Vec<RuleIds>,
    ) -> Result<()> {
        self.closure_engine.release_oracle();
        let oracle_factory = self.oracle_factory();
        *self = Self::from_parts(language, atom_type, rules, oracle_factory)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn toni_tutorial_ex() -> ABAFramework<&'static str> {
        ABAFramework::new(
            &["a", "b", "c", "p", "q", "r", "s", "t"],
            &[("p", vec!["q", "a"]), ("q", vec![]), ("r", vec!["b", "c"])],
            &["a", "b", "c"],
            &[("a", Some("r")), ("b", Some("s")), ("c", Some("t"))],
        )
        .unwrap()
    }

    fn validation_error(err: anyhow::Error) -> ValidationError {
        err.downcast_ref::<ValidationError>().unwrap().clone()
    }

    #[test]
    fn test_new_ok() {
        let f = toni_tutorial_ex();
        assert_eq!(8, f.n_atoms());
        assert_eq!(3, f.n_assumptions());
        assert_eq!(3, f.n_rules());
        assert_eq!(
            vec!["a", "b", "c"],
            f.iter_assumptions().map(|a| *a.label()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_assumption_not_in_language() {
        let err = ABAFramework::new(&["a"], &[], &["a", "b"], &[("a", None), ("b", None)])
            .err()
            .unwrap();
        assert_eq!(
            ValidationError::AssumptionNotInLanguage("b".to_string()),
            validation_error(err)
        );
    }

    #[test]
    fn test_rule_head_not_in_language() {
        let err = ABAFramework::new(&["a"], &[("x", vec![])], &["a"], &[("a", None)])
            .err()
            .unwrap();
        assert_eq!(
            ValidationError::RuleAtomNotInLanguage {
                rule: 0,
                atom: "x".to_string()
            },
            validation_error(err)
        );
    }

    #[test]
    fn test_rule_body_not_in_language() {
        let err = ABAFramework::new(
            &["a", "p"],
            &[("p", vec!["a"]), ("p", vec!["y"])],
            &["a"],
            &[("a", None)],
        )
        .err()
        .unwrap();
        assert_eq!(
            ValidationError::RuleAtomNotInLanguage {
                rule: 1,
                atom: "y".to_string()
            },
            validation_error(err)
        );
    }

    #[test]
    fn test_contrary_not_in_language() {
        let err = ABAFramework::new(&["a"], &[], &["a"], &[("a", Some("z"))])
            .err()
            .unwrap();
        assert_eq!(
            ValidationError::ContraryNotInLanguage {
                assumption: "a".to_string(),
                contrary: "z".to_string()
            },
            validation_error(err)
        );
    }

    #[test]
    fn test_missing_contrary_entry() {
        let err = ABAFramework::new(&["a", "b"], &[], &["a", "b"], &[("a", Some("b"))])
            .err()
            .unwrap();
        assert_eq!(
            ValidationError::ContraryKeysMismatch("b".to_string()),
            validation_error(err)
        );
    }

    #[test]
    fn test_contrary_entry_for_non_assumption() {
        let err = ABAFramework::new(&["a", "b"], &[], &["a"], &[("a", None), ("b", Some("a"))])
            .err()
            .unwrap();
        assert_eq!(
            ValidationError::ContraryKeysMismatch("b".to_string()),
            validation_error(err)
        );
    }

    #[test]
    fn test_duplicate_contrary_entry() {
        let err = ABAFramework::new(&["a", "b"], &[], &["a"], &[("a", None), ("a", Some("b"))])
            .err()
            .unwrap();
        assert_eq!(
            ValidationError::ContraryKeysMismatch("a".to_string()),
            validation_error(err)
        );
    }

    #[test]
    fn test_not_flat() {
        let err = ABAFramework::new(
            &["a", "b", "c"],
            &[("c", vec!["a"]), ("b", vec!["a"])],
            &["a", "b"],
            &[("a", Some("c")), ("b", None)],
        )
        .err()
        .unwrap();
        assert_eq!(
            ValidationError::NotFlat("b".to_string()),
            validation_error(err)
        );
    }

    #[test]
    fn test_is_assumption() {
        let f = toni_tutorial_ex();
        assert!(f.is_assumption(&"a").unwrap());
        assert!(!f.is_assumption(&"p").unwrap());
        f.is_assumption(&"z").unwrap_err();
    }

    #[test]
    fn test_get_contrary() {
        let f = toni_tutorial_ex();
        assert_eq!(&"r", f.get_contrary(&"a").unwrap().unwrap().label());
        f.get_contrary(&"p").unwrap_err();
        f.get_contrary(&"z").unwrap_err();
    }

    #[test]
    fn test_iter_rules() {
        let f = toni_tutorial_ex();
        let rules = f.iter_rules().collect::<Vec<_>>();
        assert_eq!(3, rules.len());
        assert_eq!(&"p", rules[0].head().label());
        assert_eq!(
            vec!["a", "q"],
            rules[0].iter_body().map(|a| *a.label()).collect::<Vec<_>>()
        );
        assert_eq!(0, rules[1].iter_body().count());
        assert_eq!(2, rules[2].id());
        assert!(rules[0] == f.iter_rules().next().unwrap());
        assert!(rules[0] != rules[1]);
    }

    #[test]
    fn test_iter_rules_by_head() {
        let f = ABAFramework::new(
            &["a", "p", "q"],
            &[("p", vec!["a"]), ("q", vec![]), ("p", vec![])],
            &["a"],
            &[("a", Some("q"))],
        )
        .unwrap();
        assert_eq!(
            vec![0, 2],
            f.iter_rules_by_head(&"p")
                .unwrap()
                .map(|r| r.id())
                .collect::<Vec<_>>()
        );
        assert_eq!(0, f.iter_rules_by_head(&"a").unwrap().count());
        assert!(f.iter_rules_by_head(&"z").is_err());
    }

    #[test]
    fn test_duplicate_body_atoms() {
        let f = ABAFramework::new(&["a", "p"], &[("p", vec!["a", "a"])], &["a"], &[("a", None)])
            .unwrap();
        assert_eq!(1, f.iter_rules().next().unwrap().body_ids().len());
    }

    #[test]
    fn test_assumption_labels_to_membership() {
        let f = toni_tutorial_ex();
        assert_eq!(
            vec![true, false, true, false, false, false, false, false],
            f.assumption_labels_to_membership(&[&"a", &"c"]).unwrap()
        );
        f.assumption_labels_to_membership(&[&"p"]).unwrap_err();
    }
}
