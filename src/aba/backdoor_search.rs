use super::{
    labeling::{AssumptionLabel, Labeling},
    language::Atom,
    ABAFramework,
};
use crate::utils::{retain_maximal_sets, LabelType};
use anyhow::{anyhow, Context, Result};

/// A closure computed for a given version of a labeling.
#[derive(Default)]
struct CachedClosure {
    version: Option<usize>,
    derivable: Vec<bool>,
}

/// Propagates labels over the assumptions of a framework, answering the closure queries the propagation rules need.
struct LabelingPropagator<'a, T>
where
    T: LabelType,
{
    framework: &'a mut ABAFramework<T>,
    labeling: Labeling,
    in_closure: CachedClosure,
    not_out_closure: CachedClosure,
}

impl<'a, T> LabelingPropagator<'a, T>
where
    T: LabelType,
{
    fn new(framework: &'a mut ABAFramework<T>) -> Self {
        let labeling = Labeling::new(framework.language().len());
        LabelingPropagator {
            framework,
            labeling,
            in_closure: CachedClosure::default(),
            not_out_closure: CachedClosure::default(),
        }
    }

    /// Returns `true` iff the contrary of the assumption is derivable from the assumptions labeled IN.
    ///
    /// Assumptions without contrary get `false`.
    fn contrary_derivable_from_in(&mut self, assumption: usize) -> bool {
        let contrary = match self.framework.contrary_id(assumption) {
            Some(c) => c,
            None => return false,
        };
        let version = self.labeling.version();
        if self.in_closure.version != Some(version) {
            let in_set = self.labeling.in_set();
            self.in_closure.derivable = self.framework.closure_by_ids(&in_set);
            self.in_closure.version = Some(version);
        }
        self.in_closure.derivable[contrary]
    }

    /// Returns `true` iff the contrary of the assumption is derivable from the assumptions not labeled OUT.
    ///
    /// Assumptions without contrary get `false`.
    fn contrary_derivable_from_not_out(&mut self, assumption: usize) -> bool {
        let contrary = match self.framework.contrary_id(assumption) {
            Some(c) => c,
            None => return false,
        };
        let version = self.labeling.version();
        if self.not_out_closure.version != Some(version) {
            let not_out_set = self.labeling.not_out_set();
            self.not_out_closure.derivable = self.framework.closure_by_ids(&not_out_set);
            self.not_out_closure.version = Some(version);
        }
        self.not_out_closure.derivable[contrary]
    }

    /// Applies a rule to an assumption, returning `true` iff its label changed.
    fn apply<R>(&mut self, rule: &R, assumption: usize) -> bool
    where
        R: PropagationRule,
    {
        if !rule.is_candidate(self.labeling.get(assumption)) {
            return false;
        }
        match rule.update(self, assumption) {
            Some(label) => {
                self.labeling.set(assumption, label);
                true
            }
            None => false,
        }
    }

    /// Applies a rule by rounds until no label changes.
    ///
    /// Each round considers the assumptions that were candidates at its beginning, in increasing order of identifiers.
    fn propagate_to_fixpoint<R>(&mut self, rule: &R)
    where
        R: PropagationRule,
    {
        loop {
            let candidates = self
                .framework
                .assumption_ids()
                .iter()
                .copied()
                .filter(|a| rule.is_candidate(self.labeling.get(*a)))
                .collect::<Vec<usize>>();
            let mut changed = false;
            for a in candidates {
                changed |= self.apply(rule, a);
            }
            if !changed {
                break;
            }
        }
    }
}

/// A rule updating the label of a single assumption, used by the generic fixpoint of [`LabelingPropagator`].
trait PropagationRule {
    /// Returns `true` iff an assumption with this label may be updated by this rule.
    fn is_candidate(&self, label: Option<AssumptionLabel>) -> bool;

    /// Returns the new label of a candidate assumption, or `None` if it must not change.
    fn update<T>(&self, propagator: &mut LabelingPropagator<T>, assumption: usize) -> Option<AssumptionLabel>
    where
        T: LabelType;
}

/// Labels the unset assumptions: OUT if attacked by the IN ones, IN if not attacked by the ones that are not OUT.
struct ForwardRule;

impl PropagationRule for ForwardRule {
    fn is_candidate(&self, label: Option<AssumptionLabel>) -> bool {
        label.is_none()
    }

    fn update<T>(&self, propagator: &mut LabelingPropagator<T>, assumption: usize) -> Option<AssumptionLabel>
    where
        T: LabelType,
    {
        if propagator.contrary_derivable_from_in(assumption) {
            Some(AssumptionLabel::Out)
        } else if !propagator.contrary_derivable_from_not_out(assumption) {
            Some(AssumptionLabel::In)
        } else {
            None
        }
    }
}

/// Demotes to UNDEC the IN assumptions still attacked by the ones that are not OUT, and the OUT assumptions not attacked by the IN ones.
struct CorrectiveRule;

impl PropagationRule for CorrectiveRule {
    fn is_candidate(&self, label: Option<AssumptionLabel>) -> bool {
        matches!(label, Some(AssumptionLabel::In) | Some(AssumptionLabel::Out))
    }

    fn update<T>(&self, propagator: &mut LabelingPropagator<T>, assumption: usize) -> Option<AssumptionLabel>
    where
        T: LabelType,
    {
        let label = propagator.labeling.get(assumption);
        if (label == Some(AssumptionLabel::In)
            && propagator.contrary_derivable_from_not_out(assumption))
            || (label == Some(AssumptionLabel::Out)
                && !propagator.contrary_derivable_from_in(assumption))
        {
            Some(AssumptionLabel::Undec)
        } else {
            None
        }
    }
}

impl<T> ABAFramework<T>
where
    T: LabelType,
{
    /// Computes the preferred assumption sets of this framework, given a backdoor.
    ///
    /// The backdoor must be a set of assumptions such that removing them from the dependency graph of the framework
    /// leaves no cycle through an assumption (see [`DependencyGraph`](crate::aba::DependencyGraph)).
    /// This precondition is not checked; an invalid backdoor leads to invalid results.
    /// For each guess of the backdoor assumptions that are accepted, the labels of the other assumptions are propagated,
    /// and the guess is kept if the propagation confirms it; the maximal sets among the kept ones are returned.
    ///
    /// The number of guesses is exponential in the size of the backdoor.
    /// An error is returned if a label does not refer to an assumption, or if the backdoor is too large to be enumerated.
    ///
    /// # Example
    ///
    /// ```
    /// # use abadoor::aba::ABAFramework;
    /// let mut framework = ABAFramework::new(
    ///     &["l1", "l2"],
    ///     &[],
    ///     &["l1", "l2"],
    ///     &[("l1", Some("l2")), ("l2", Some("l1"))],
    /// ).unwrap();
    /// let extensions = framework.preferred_assumption_sets_with_backdoor(&[&"l1"]).unwrap();
    /// let labels = extensions
    ///     .iter()
    ///     .map(|e| e.iter().map(|a| *a.label()).collect::<Vec<_>>())
    ///     .collect::<Vec<_>>();
    /// assert_eq!(vec![vec!["l1"], vec!["l2"]], labels);
    /// ```
    pub fn preferred_assumption_sets_with_backdoor(
        &mut self,
        backdoor: &[&T],
    ) -> Result<Vec<Vec<&Atom<T>>>> {
        let membership = self
            .assumption_labels_to_membership(backdoor)
            .context("invalid backdoor")?;
        let backdoor_ids = membership
            .iter()
            .enumerate()
            .filter_map(|(i, b)| if *b { Some(i) } else { None })
            .collect::<Vec<usize>>();
        let extensions = self.preferred_assumption_ids_with_backdoor(&backdoor_ids)?;
        Ok(extensions
            .into_iter()
            .map(|e| {
                e.into_iter()
                    .map(|i| self.language().get_atom_by_id(i))
                    .collect()
            })
            .collect())
    }

    /// Computes the preferred assumption sets of this framework given the identifiers of the backdoor assumptions.
    ///
    /// Sets are sorted vectors of identifiers; the result is sorted.
    pub(crate) fn preferred_assumption_ids_with_backdoor(
        &mut self,
        backdoor: &[usize],
    ) -> Result<Vec<Vec<usize>>> {
        if backdoor.len() >= usize::BITS as usize {
            return Err(anyhow!(
                "cannot enumerate the guesses of a backdoor of size {}",
                backdoor.len()
            ));
        }
        let mut candidates = vec![];
        for guess in 0..(1usize << backdoor.len()) {
            if let Some(in_ids) = self.admissible_candidate(backdoor, guess) {
                candidates.push(in_ids);
            }
        }
        Ok(retain_maximal_sets(candidates))
    }

    /// Checks a guess on the backdoor, returning the set of IN assumptions if the guess is confirmed.
    ///
    /// Bit `i` of the guess is set iff the `i`-th backdoor assumption is guessed IN.
    fn admissible_candidate(&mut self, backdoor: &[usize], guess: usize) -> Option<Vec<usize>> {
        let is_guessed_in = |i: usize| guess & (1 << i) != 0;
        let mut propagator = LabelingPropagator::new(self);
        for (i, a) in backdoor.iter().enumerate() {
            let label = if is_guessed_in(i) {
                AssumptionLabel::In
            } else {
                AssumptionLabel::Out
            };
            propagator.labeling.set(*a, label);
        }
        propagator.propagate_to_fixpoint(&ForwardRule);
        let assumptions = propagator.framework.assumption_ids().to_vec();
        propagator
            .labeling
            .label_unset(&assumptions, AssumptionLabel::Undec);
        let mut changed = false;
        for (i, a) in backdoor.iter().enumerate() {
            let was_in = propagator.labeling.get(*a) == Some(AssumptionLabel::In);
            if propagator.apply(&CorrectiveRule, *a) {
                if was_in && is_guessed_in(i) {
                    return None;
                }
                changed = true;
            }
        }
        if changed {
            propagator.propagate_to_fixpoint(&CorrectiveRule);
        }
        let confirmed = backdoor.iter().enumerate().all(|(i, a)| {
            (propagator.labeling.get(*a) == Some(AssumptionLabel::In)) == is_guessed_in(i)
        });
        if confirmed {
            Some(propagator.labeling.in_ids())
        } else {
            None
        }
    }
}
