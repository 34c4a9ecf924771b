use super::{language::Atom, ABAFramework};
use crate::utils::LabelType;

impl<T> ABAFramework<T>
where
    T: LabelType,
{
    /// Computes the grounded assumption set of the framework.
    ///
    /// The set is computed as an alternating fixpoint:
    /// the assumptions that are not attacked by the assumptions that may still be accepted are accepted,
    /// and the assumptions attacked by the accepted ones are rejected,
    /// until the number of accepted assumptions does not change anymore.
    ///
    /// Assumptions are returned in increasing order of identifiers.
    ///
    /// # Example
    ///
    /// ```
    /// # use abadoor::aba::ABAFramework;
    /// let mut framework = ABAFramework::new(
    ///     &["l1", "l2", "l3"],
    ///     &[("l3", vec!["l1"])],
    ///     &["l1", "l2"],
    ///     &[("l1", Some("l3")), ("l2", None)],
    /// ).unwrap();
    /// let grounded = framework.grounded_assumption_set();
    /// assert_eq!(vec!["l2"], grounded.iter().map(|a| *a.label()).collect::<Vec<_>>());
    /// ```
    pub fn grounded_assumption_set(&mut self) -> Vec<&Atom<T>> {
        self.grounded_assumption_ids()
            .into_iter()
            .map(|i| self.language().get_atom_by_id(i))
            .collect()
    }

    /// Computes the identifiers of the assumptions of the grounded set, in increasing order.
    pub(crate) fn grounded_assumption_ids(&mut self) -> Vec<usize> {
        let n_atoms = self.language().len();
        let complement = |framework: &Self, set: &[bool]| {
            let mut result = vec![false; n_atoms];
            framework
                .assumption_ids()
                .iter()
                .filter(|a| !set[**a])
                .for_each(|a| result[*a] = true);
            result
        };
        let mut defeated = self.attacked_by_ids(&vec![false; n_atoms]);
        let mut previous_len = 0;
        loop {
            let undefeated = complement(self, &defeated);
            let attacked_by_undefeated = self.attacked_by_ids(&undefeated);
            let accepted = complement(self, &attacked_by_undefeated);
            defeated = self.attacked_by_ids(&accepted);
            let accepted_len = accepted.iter().filter(|b| **b).count();
            if accepted_len == previous_len {
                return accepted
                    .iter()
                    .enumerate()
                    .filter_map(|(i, b)| if *b { Some(i) } else { None })
                    .collect();
            }
            previous_len = accepted_len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_labels(f: &mut ABAFramework<&'static str>) -> Vec<&'static str> {
        f.grounded_assumption_set()
            .iter()
            .map(|a| *a.label())
            .collect()
    }

    #[test]
    fn test_self_defeating_assumption() {
        let mut f = ABAFramework::new(
            &["l1", "l2", "l3"],
            &[("l3", vec!["l1"])],
            &["l1", "l2"],
            &[("l1", Some("l3")), ("l2", None)],
        )
        .unwrap();
        assert_eq!(vec!["l2"], grounded_labels(&mut f));
    }

    #[test]
    fn test_mutual_attack() {
        let mut f = ABAFramework::new(
            &["l1", "l2"],
            &[],
            &["l1", "l2"],
            &[("l1", Some("l2")), ("l2", Some("l1"))],
        )
        .unwrap();
        assert!(grounded_labels(&mut f).is_empty());
    }

    #[test]
    fn test_no_attack() {
        let mut f = ABAFramework::new(
            &["a", "b", "c", "p"],
            &[("p", vec!["a", "b"])],
            &["a", "b", "c"],
            &[("a", None), ("b", None), ("c", None)],
        )
        .unwrap();
        assert_eq!(vec!["a", "b", "c"], grounded_labels(&mut f));
    }

    #[test]
    fn test_defended_chain() {
        // c attacks b, b attacks a: grounded = {a, c}
        let mut f = ABAFramework::new(
            &["a", "b", "c", "na", "nb", "nc"],
            &[("na", vec!["b"]), ("nb", vec!["c"])],
            &["a", "b", "c"],
            &[("a", Some("na")), ("b", Some("nb")), ("c", Some("nc"))],
        )
        .unwrap();
        assert_eq!(vec!["a", "c"], grounded_labels(&mut f));
    }

    #[test]
    fn test_attack_by_fact() {
        let mut f = ABAFramework::new(
            &["a", "b", "na", "nb"],
            &[("na", vec![]), ("nb", vec!["a"])],
            &["a", "b"],
            &[("a", Some("na")), ("b", Some("nb"))],
        )
        .unwrap();
        assert_eq!(vec!["b"], grounded_labels(&mut f));
    }

    #[test]
    fn test_grounded_is_stable_and_conflict_free() {
        let mut f = ABAFramework::new(
            &["a", "b", "c", "d", "na", "nb", "nc", "nd"],
            &[
                ("na", vec!["b"]),
                ("nb", vec!["a"]),
                ("nc", vec!["b"]),
                ("nd", vec!["c"]),
            ],
            &["a", "b", "c", "d"],
            &[
                ("a", Some("na")),
                ("b", Some("nb")),
                ("c", Some("nc")),
                ("d", Some("nd")),
            ],
        )
        .unwrap();
        let g1 = f.grounded_assumption_ids();
        let g2 = f.grounded_assumption_ids();
        assert_eq!(g1, g2);
        let mut membership = vec![false; f.language().len()];
        g1.iter().for_each(|i| membership[*i] = true);
        let attacked = f.attacked_by_ids(&membership);
        assert!(g1.iter().all(|i| !attacked[*i]));
    }
}
