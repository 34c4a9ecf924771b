use super::{language::Atom, ABAFramework};
use crate::{
    asp::{acyclicity_backdoor_ids, BackdoorOracle, ExactBackdoorOracle},
    utils::LabelType,
};
use anyhow::{Context, Result};

/// A trait for objects following the steps of a [`PreferredSolver`].
///
/// All the methods have a default implementation doing nothing.
pub trait PreferredListener {
    /// Called when the grounded assumption set is computed.
    fn grounded_computed(&self, _n_assumptions: usize) {}

    /// Called when the framework is reduced by its grounded set and trimmed.
    fn framework_reduced(&self, _n_atoms: usize, _n_assumptions: usize, _n_rules: usize) {}

    /// Called when the backdoor of the reduced framework is computed, with the labels of its assumptions.
    fn backdoor_computed(&self, _backdoor: &[String]) {}

    /// Called when the preferred extensions are computed.
    fn extensions_computed(&self, _n_extensions: usize) {}
}

/// A solver computing the preferred extensions of flat ABA frameworks.
///
/// The grounded assumption set of the framework is computed first.
/// The framework is then reduced by this set and trimmed, a backdoor of the reduced framework is computed,
/// and the preferred extensions of the reduced framework are enumerated using this backdoor.
/// Each of them, joined with the grounded set, gives a preferred extension of the initial framework.
///
/// # Example
///
/// ```
/// # use abadoor::aba::{ABAFramework, PreferredSolver};
/// let mut framework = ABAFramework::new(
///     &["a", "b", "c", "na", "nb", "nc"],
///     &[("na", vec!["b"]), ("nb", vec!["a"]), ("nc", vec!["b"])],
///     &["a", "b", "c"],
///     &[("a", Some("na")), ("b", Some("nb")), ("c", Some("nc"))],
/// ).unwrap();
/// let solver = PreferredSolver::default();
/// let extensions = solver.enumerate(&mut framework).unwrap();
/// let labels = extensions
///     .iter()
///     .map(|e| e.iter().map(|a| *a.label()).collect::<Vec<_>>())
///     .collect::<Vec<_>>();
/// assert_eq!(vec![vec!["a", "c"], vec!["b"]], labels);
/// ```
pub struct PreferredSolver {
    backdoor_oracle: Box<dyn BackdoorOracle>,
    listeners: Vec<Box<dyn PreferredListener>>,
}

impl Default for PreferredSolver {
    fn default() -> Self {
        Self::new(Box::<ExactBackdoorOracle>::default())
    }
}

impl PreferredSolver {
    /// Builds a new solver using the provided backdoor oracle.
    pub fn new(backdoor_oracle: Box<dyn BackdoorOracle>) -> Self {
        PreferredSolver {
            backdoor_oracle,
            listeners: vec![],
        }
    }

    /// Adds a listener to this solver.
    pub fn add_listener(&mut self, listener: Box<dyn PreferredListener>) {
        self.listeners.push(listener);
    }

    /// Computes the grounded assumption set of a framework.
    pub fn grounded<'a, T>(&self, framework: &'a mut ABAFramework<T>) -> Vec<&'a Atom<T>>
    where
        T: LabelType,
    {
        let grounded = framework.grounded_assumption_set();
        self.listeners
            .iter()
            .for_each(|l| l.grounded_computed(grounded.len()));
        grounded
    }

    /// Computes the preferred extensions of a framework.
    ///
    /// Each extension is given by its assumptions, sorted in increasing order of identifiers.
    /// The extensions are sorted and contain no duplicate.
    /// The closure oracle of the framework is released during the computation.
    pub fn enumerate<'a, T>(
        &self,
        framework: &'a mut ABAFramework<T>,
    ) -> Result<Vec<Vec<&'a Atom<T>>>>
    where
        T: LabelType,
    {
        let (grounded, mut reduct) = self.grounded_reduct(framework)?;
        let backdoor = self.compute_backdoor(&reduct)?;
        let reduct_extensions = reduct
            .preferred_assumption_ids_with_backdoor(&backdoor)
            .context("while enumerating the preferred extensions of the reduct")?;
        let mut extensions = reduct_extensions
            .into_iter()
            .map(|e| -> Result<Vec<usize>> {
                let mut extension = e
                    .into_iter()
                    .map(|i| {
                        framework
                            .language()
                            .get_atom(reduct.language().get_atom_by_id(i).label())
                            .map(|a| a.id())
                    })
                    .collect::<Result<Vec<usize>>>()?;
                extension.extend_from_slice(&grounded);
                extension.sort_unstable();
                extension.dedup();
                Ok(extension)
            })
            .collect::<Result<Vec<Vec<usize>>>>()?;
        extensions.sort_unstable();
        extensions.dedup();
        self.listeners
            .iter()
            .for_each(|l| l.extensions_computed(extensions.len()));
        let framework: &'a ABAFramework<T> = framework;
        Ok(extensions
            .into_iter()
            .map(|e| {
                e.into_iter()
                    .map(|i| framework.language().get_atom_by_id(i))
                    .collect()
            })
            .collect())
    }

    /// Computes a minimum backdoor of the framework obtained by reducing the provided one by its grounded set and trimming it.
    ///
    /// The backdoor is returned as assumptions of the provided framework.
    pub fn reduced_framework_backdoor<'a, T>(
        &self,
        framework: &'a mut ABAFramework<T>,
    ) -> Result<Vec<&'a Atom<T>>>
    where
        T: LabelType,
    {
        let (_, reduct) = self.grounded_reduct(framework)?;
        let backdoor = self.compute_backdoor(&reduct)?;
        let framework: &'a ABAFramework<T> = framework;
        backdoor
            .into_iter()
            .map(|i| {
                framework
                    .language()
                    .get_atom(reduct.language().get_atom_by_id(i).label())
            })
            .collect()
    }

    /// Computes the grounded set of a framework, and the trimmed reduct of the framework by this set.
    fn grounded_reduct<T>(
        &self,
        framework: &mut ABAFramework<T>,
    ) -> Result<(Vec<usize>, ABAFramework<T>)>
    where
        T: LabelType,
    {
        let grounded = framework.grounded_assumption_ids();
        self.listeners
            .iter()
            .for_each(|l| l.grounded_computed(grounded.len()));
        let mut membership = vec![false; framework.language().len()];
        grounded.iter().for_each(|i| membership[*i] = true);
        let mut reduct = framework
            .reduct_by_ids(&membership)
            .context("while reducing the framework by its grounded set")?;
        framework.release_oracle();
        reduct
            .trim()
            .context("while trimming the reduct of the framework")?;
        self.listeners.iter().for_each(|l| {
            l.framework_reduced(
                reduct.language().len(),
                reduct.n_assumptions(),
                reduct.n_rules(),
            )
        });
        Ok((grounded, reduct))
    }

    fn compute_backdoor<T>(&self, reduct: &ABAFramework<T>) -> Result<Vec<usize>>
    where
        T: LabelType,
    {
        let backdoor = acyclicity_backdoor_ids(reduct, self.backdoor_oracle.as_ref())?;
        let labels = backdoor
            .iter()
            .map(|i| reduct.language().get_atom_by_id(*i).label().to_string())
            .collect::<Vec<String>>();
        self.listeners
            .iter()
            .for_each(|l| l.backdoor_computed(&labels));
        Ok(backdoor)
    }
}
