use super::{aba_framework::RuleIds, language::Atom, ABAFramework};
use crate::{
    clause,
    sat::{ClosureOracle, ClosureOracleFactory, Literal},
    utils::LabelType,
};
use anyhow::Result;
use std::rc::Rc;

/// Compiles the rules of a framework into definite clauses and answers closure queries through an oracle.
///
/// Atom `i` is represented by the variable `i+1`.
/// A rule `h <- b1, ..., bn` becomes the clause `h ∨ ¬b1 ∨ ... ∨ ¬bn`;
/// facts (rules with an empty body) are not loaded into the oracle but added to the assumed literals of each query.
pub(crate) struct ClosureEngine {
    oracle_factory: Rc<dyn ClosureOracleFactory>,
    clauses: Vec<Vec<Literal>>,
    facts: Vec<Literal>,
    oracle: Option<Box<dyn ClosureOracle>>,
}

fn atom_id_to_literal(id: usize) -> Literal {
    Literal::from(id as isize + 1)
}

fn literal_to_atom_id(l: Literal) -> usize {
    usize::from(l.var()) - 1
}

impl ClosureEngine {
    pub(crate) fn new(oracle_factory: Rc<dyn ClosureOracleFactory>, rules: &[RuleIds]) -> Self {
        let mut clauses = Vec::with_capacity(rules.len());
        let mut facts = vec![];
        for r in rules.iter() {
            if r.body.is_empty() {
                facts.push(atom_id_to_literal(r.head));
            } else {
                let mut cl = clause![];
                cl.push(atom_id_to_literal(r.head));
                cl.extend(r.body.iter().map(|b| atom_id_to_literal(*b).negate()));
                clauses.push(cl);
            }
        }
        facts.sort_unstable();
        facts.dedup();
        let mut engine = ClosureEngine {
            oracle_factory,
            clauses,
            facts,
            oracle: None,
        };
        engine.build_oracle();
        engine
    }

    fn build_oracle(&mut self) -> &mut Box<dyn ClosureOracle> {
        let clauses = &self.clauses;
        let factory = &self.oracle_factory;
        self.oracle.get_or_insert_with(|| {
            let mut oracle = factory.new_oracle();
            clauses.iter().for_each(|cl| oracle.add_clause(cl.clone()));
            oracle
        })
    }

    pub(crate) fn oracle_factory(&self) -> &Rc<dyn ClosureOracleFactory> {
        &self.oracle_factory
    }

    pub(crate) fn release_oracle(&mut self) {
        self.oracle = None;
    }

    /// Returns the membership vector of the atoms derivable from the assumed atoms.
    pub(crate) fn closure(
        &mut self,
        n_atoms: usize,
        assumed: impl Iterator<Item = usize>,
    ) -> Vec<bool> {
        let mut assumptions = self.facts.clone();
        assumptions.extend(assumed.map(atom_id_to_literal));
        let oracle = self.build_oracle();
        debug_assert!(oracle.n_vars() <= n_atoms, "clauses refer to unknown atoms");
        let forced = oracle.propagate(&assumptions);
        let mut derivable = vec![false; n_atoms];
        forced
            .into_iter()
            .filter(|l| l.is_positive())
            .map(literal_to_atom_id)
            .for_each(|i| derivable[i] = true);
        derivable
    }
}

impl<T> ABAFramework<T>
where
    T: LabelType,
{
    /// Computes the deductive closure of a set of assumptions given by their labels.
    ///
    /// The closure is the set of atoms derivable from the assumptions and the rules, including the assumptions themselves.
    /// Atoms are returned in increasing order of identifiers.
    /// An error is returned if a label does not refer to an assumption.
    ///
    /// # Example
    ///
    /// ```
    /// # use abadoor::aba::ABAFramework;
    /// let mut framework = ABAFramework::new(
    ///     &["a", "b", "c", "p", "q", "r", "s", "t"],
    ///     &[("p", vec!["q", "a"]), ("q", vec![]), ("r", vec!["b", "c"])],
    ///     &["a", "b", "c"],
    ///     &[("a", Some("r")), ("b", Some("s")), ("c", Some("t"))],
    /// ).unwrap();
    /// let closure = framework.closure(&[&"a"]).unwrap();
    /// assert_eq!(vec!["a", "p", "q"], closure.iter().map(|a| *a.label()).collect::<Vec<_>>());
    /// ```
    pub fn closure(&mut self, assumptions: &[&T]) -> Result<Vec<&Atom<T>>> {
        let membership = self.assumption_labels_to_membership(assumptions)?;
        let derivable = self.closure_by_ids(&membership);
        Ok(self.atoms_of_membership(&derivable))
    }

    /// Computes the set of assumptions attacked by a set of assumptions given by their labels.
    ///
    /// An assumption is attacked if its contrary is in the closure of the set.
    /// Assumptions without contrary are never attacked.
    /// An error is returned if a label does not refer to an assumption.
    ///
    /// # Example
    ///
    /// ```
    /// # use abadoor::aba::ABAFramework;
    /// let mut framework = ABAFramework::new(
    ///     &["a", "b", "c", "p", "q", "r", "s", "t"],
    ///     &[("p", vec!["q", "a"]), ("q", vec![]), ("r", vec!["b", "c"])],
    ///     &["a", "b", "c"],
    ///     &[("a", Some("r")), ("b", Some("s")), ("c", Some("t"))],
    /// ).unwrap();
    /// let attacked = framework.attacked(&[&"b", &"c"]).unwrap();
    /// assert_eq!(vec!["a"], attacked.iter().map(|a| *a.label()).collect::<Vec<_>>());
    /// ```
    pub fn attacked(&mut self, assumptions: &[&T]) -> Result<Vec<&Atom<T>>> {
        let membership = self.assumption_labels_to_membership(assumptions)?;
        let attacked = self.attacked_by_ids(&membership);
        Ok(self.atoms_of_membership(&attacked))
    }

    fn atoms_of_membership(&self, membership: &[bool]) -> Vec<&Atom<T>> {
        membership
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(i, _)| self.language().get_atom_by_id(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{CadicalClosureOracleFactory, DefaultClosureOracleFactory};
    use paste::paste;

    fn labels<'a>(atoms: &[&'a Atom<&'static str>]) -> Vec<&'static str> {
        atoms.iter().map(|a| *a.label()).collect()
    }

    fn chain_framework(factory: Rc<dyn ClosureOracleFactory>) -> ABAFramework<&'static str> {
        ABAFramework::new_with_oracle_factory(
            &["a", "b", "x", "y", "z", "f"],
            &[
                ("x", vec!["a"]),
                ("y", vec!["x", "b"]),
                ("z", vec!["y", "f"]),
                ("f", vec![]),
            ],
            &["a", "b"],
            &[("a", Some("z")), ("b", None)],
            factory,
        )
        .unwrap()
    }

    macro_rules! closure_tests {
        ($name: ident, $factory: expr) => {
            paste! {
                #[test]
                fn [<test_closure_of_empty_set_contains_facts_ $name>]() {
                    let mut f = chain_framework(Rc::new($factory));
                    assert_eq!(vec!["f"], labels(&f.closure(&[]).unwrap()));
                }

                #[test]
                fn [<test_closure_chain_ $name>]() {
                    let mut f = chain_framework(Rc::new($factory));
                    assert_eq!(vec!["a", "x", "f"], labels(&f.closure(&[&"a"]).unwrap()));
                    assert_eq!(
                        vec!["a", "b", "x", "y", "z", "f"],
                        labels(&f.closure(&[&"a", &"b"]).unwrap())
                    );
                }

                #[test]
                fn [<test_attacked_ $name>]() {
                    let mut f = chain_framework(Rc::new($factory));
                    assert!(f.attacked(&[&"a"]).unwrap().is_empty());
                    assert_eq!(vec!["a"], labels(&f.attacked(&[&"a", &"b"]).unwrap()));
                }

                #[test]
                fn [<test_closure_after_release_ $name>]() {
                    let mut f = chain_framework(Rc::new($factory));
                    f.release_oracle();
                    assert_eq!(vec!["b", "f"], labels(&f.closure(&[&"b"]).unwrap()));
                }
            }
        };
    }

    closure_tests!(default, DefaultClosureOracleFactory);
    closure_tests!(cadical, CadicalClosureOracleFactory);

    #[test]
    fn test_closure_non_assumption() {
        let mut f = chain_framework(Rc::new(DefaultClosureOracleFactory));
        assert!(f.closure(&[&"x"]).is_err());
        assert!(f.attacked(&[&"unknown"]).is_err());
    }

    #[test]
    fn test_closure_is_monotonic() {
        let mut f = chain_framework(Rc::new(DefaultClosureOracleFactory));
        let small = labels(&f.closure(&[&"b"]).unwrap());
        let big = labels(&f.closure(&[&"a", &"b"]).unwrap());
        assert!(small.iter().all(|l| big.contains(l)));
    }

    fn assumption_subsets() -> Vec<Vec<&'static str>> {
        vec![vec![], vec!["a"], vec!["b"], vec!["a", "b"]]
    }

    #[test]
    fn test_closure_is_idempotent() {
        let mut f = chain_framework(Rc::new(DefaultClosureOracleFactory));
        for s in assumption_subsets() {
            let labels_of_s = s.iter().collect::<Vec<_>>();
            let first = labels(&f.closure(&labels_of_s).unwrap());
            let assumed = first
                .iter()
                .filter(|l| f.is_assumption(*l).unwrap())
                .copied()
                .collect::<Vec<_>>();
            let second = labels(&f.closure(&assumed.iter().collect::<Vec<_>>()).unwrap());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_attacked_is_monotonic() {
        let mut f = ABAFramework::new(
            &["a", "b", "c", "p", "q"],
            &[("p", vec!["a", "b"]), ("q", vec!["c"])],
            &["a", "b", "c"],
            &[("a", Some("q")), ("b", None), ("c", Some("p"))],
        )
        .unwrap();
        let all = ["a", "b", "c"];
        for small_mask in 0..8usize {
            for big_mask in (0..8usize).filter(|m| m & small_mask == small_mask) {
                let small = (0..3)
                    .filter(|i| small_mask & (1 << i) != 0)
                    .map(|i| &all[i])
                    .collect::<Vec<_>>();
                let big = (0..3)
                    .filter(|i| big_mask & (1 << i) != 0)
                    .map(|i| &all[i])
                    .collect::<Vec<_>>();
                let attacked_by_small = labels(&f.attacked(&small).unwrap());
                let attacked_by_big = labels(&f.attacked(&big).unwrap());
                assert!(attacked_by_small.iter().all(|l| attacked_by_big.contains(l)));
            }
        }
        assert_eq!(vec!["c"], labels(&f.attacked(&[&"a", &"b"]).unwrap()));
    }

    #[test]
    fn test_oracle_holds_rule_atoms_only() {
        let mut engine = ClosureEngine::new(
            Rc::new(DefaultClosureOracleFactory),
            &[
                RuleIds {
                    id: 0,
                    head: 2,
                    body: vec![0],
                },
                RuleIds {
                    id: 1,
                    head: 5,
                    body: vec![],
                },
            ],
        );
        assert_eq!(3, engine.build_oracle().n_vars());
        assert_eq!(
            vec![true, false, true, false, false, true],
            engine.closure(6, [0].into_iter())
        );
    }

    #[test]
    fn test_self_attack() {
        let mut f = ABAFramework::new(&["a", "p"], &[("p", vec!["a"])], &["a"], &[("a", Some("p"))])
            .unwrap();
        assert_eq!(vec!["a"], labels(&f.attacked(&[&"a"]).unwrap()));
        assert!(f.attacked(&[]).unwrap().is_empty());
    }
}
