use super::{
    aba_framework::{AtomType, RuleIds},
    ABAFramework,
};
use crate::utils::LabelType;
use anyhow::{Context, Result};
use std::collections::HashSet;

impl<T> ABAFramework<T>
where
    T: LabelType,
{
    /// Computes the reduct of this framework with respect to a set of assumptions given by their labels.
    ///
    /// The assumptions of the set and the ones it attacks are removed from the language.
    /// Rules involving an attacked assumption are removed, and the assumptions of the set are removed from the bodies of the other rules.
    /// Rules that become identical are merged; the rules of the reduct get new identifiers.
    /// Contraries that are no longer part of the language are replaced by `None`.
    ///
    /// The reduct uses the same kind of closure oracle than this framework.
    /// An error is returned if a label does not refer to an assumption.
    ///
    /// # Example
    ///
    /// ```
    /// # use abadoor::aba::ABAFramework;
    /// let mut framework = ABAFramework::new(
    ///     &["a", "b", "c", "na", "nb", "nc", "p"],
    ///     &[("nb", vec!["a"]), ("p", vec!["a", "c"]), ("nc", vec!["b"])],
    ///     &["a", "b", "c"],
    ///     &[("a", Some("na")), ("b", Some("nb")), ("c", Some("nc"))],
    /// ).unwrap();
    /// let reduct = framework.reduct(&[&"a"]).unwrap();
    /// assert_eq!(vec!["c"], reduct.iter_assumptions().map(|a| *a.label()).collect::<Vec<_>>());
    /// assert_eq!(2, reduct.n_rules());
    /// ```
    pub fn reduct(&mut self, assumptions: &[&T]) -> Result<ABAFramework<T>> {
        let membership = self
            .assumption_labels_to_membership(assumptions)
            .context("while computing a reduct")?;
        self.reduct_by_ids(&membership)
    }

    /// Computes the reduct of this framework with respect to the assumptions flagged in the membership vector.
    pub(crate) fn reduct_by_ids(&mut self, assumptions: &[bool]) -> Result<ABAFramework<T>> {
        let attacked = self.attacked_by_ids(assumptions);
        let is_removed = |i: usize| {
            self.is_assumption_id(i) && (assumptions[i] || attacked[i])
        };
        let kept = (0..self.language().len())
            .map(|i| !is_removed(i))
            .collect::<Vec<bool>>();
        let (language, mapping) = self.language().restrict(&kept);
        let mut seen = HashSet::new();
        let mut rules = vec![];
        for r in self.rule_ids().iter() {
            if r.body.iter().any(|b| attacked[*b] && self.is_assumption_id(*b)) {
                continue;
            }
            let reduced_head = mapping[r.head];
            let reduced_body = r
                .body
                .iter()
                .filter(|b| !assumptions[**b] || !self.is_assumption_id(**b))
                .map(|b| mapping[*b])
                .collect::<Option<Vec<usize>>>();
            if let (Some(head), Some(body)) = (reduced_head, reduced_body) {
                let rule = RuleIds::new(rules.len(), head, body);
                if seen.insert((rule.head, rule.body.clone())) {
                    rules.push(rule);
                }
            }
        }
        let mut atom_type = vec![AtomType::NotAssumption; language.len()];
        for a in self.assumption_ids().iter().filter(|a| kept[**a]) {
            let contrary_index = self.contrary_id(*a).and_then(|c| mapping[c]);
            if let Some(new_a) = mapping[*a] {
                atom_type[new_a] = AtomType::Assumption { contrary_index };
            }
        }
        ABAFramework::from_parts(language, atom_type, rules, self.oracle_factory())
            .context("while computing a reduct")
    }

    /// Restricts this framework to the atoms derivable from the whole set of assumptions.
    ///
    /// Rules which body is not fully derivable are removed, and contraries that are not derivable are replaced by `None`.
    /// The remaining rules keep their identifiers.
    /// The closure oracle is released and rebuilt for the new set of rules.
    ///
    /// # Example
    ///
    /// ```
    /// # use abadoor::aba::ABAFramework;
    /// let mut framework = ABAFramework::new(
    ///     &["a", "b", "p", "q", "x"],
    ///     &[("p", vec!["a"]), ("q", vec!["p", "x"])],
    ///     &["a", "b"],
    ///     &[("a", Some("q")), ("b", Some("p"))],
    /// ).unwrap();
    /// framework.trim().unwrap();
    /// assert_eq!(3, framework.language().len());
    /// assert_eq!(1, framework.n_rules());
    /// assert!(framework.get_contrary(&"a").unwrap().is_none());
    /// ```
    pub fn trim(&mut self) -> Result<()> {
        let all_assumptions = (0..self.language().len())
            .map(|i| self.is_assumption_id(i))
            .collect::<Vec<bool>>();
        let derivable = self.closure_by_ids(&all_assumptions);
        let (language, mapping) = self.language().restrict(&derivable);
        let rules = self
            .rule_ids()
            .iter()
            .filter(|r| r.body.iter().all(|b| derivable[*b]))
            .filter_map(|r| {
                let head = mapping[r.head]?;
                let body = r.body.iter().map(|b| mapping[*b]).collect::<Option<_>>()?;
                Some(RuleIds::new(r.id, head, body))
            })
            .collect();
        let mut atom_type = vec![AtomType::NotAssumption; language.len()];
        for a in self.assumption_ids() {
            if let Some(new_a) = mapping[*a] {
                let contrary_index = self.contrary_id(*a).and_then(|c| mapping[c]);
                atom_type[new_a] = AtomType::Assumption { contrary_index };
            }
        }
        self.replace_structure(language, atom_type, rules)
            .context("while trimming a framework")
    }
}
