use crate::{
    aba::{ABAFramework, Atom, DependencyGraph, MappingError},
    utils::LabelType,
};
use anyhow::{Context, Result};

/// A trait for oracles computing minimum backdoors.
///
/// An oracle is given the fact base of a dependency graph (see [`DependencyGraph::to_facts`])
/// and returns the names of the nodes of a minimum set of assumption nodes which removal leaves no cycle through an assumption.
pub trait BackdoorOracle {
    /// Computes a minimum backdoor of the graph described by the facts.
    fn minimum_backdoor(&self, facts: &str) -> Result<Vec<String>>;
}

/// Computes a minimum acyclicity backdoor of a framework using the provided oracle.
///
/// Assumptions are returned in increasing order of identifiers.
/// If the oracle returns a name that does not refer to an assumption of the framework,
/// an error which root cause is a [`MappingError`] is returned.
///
/// # Example
///
/// ```
/// # use abadoor::aba::ABAFramework;
/// # use abadoor::asp::{acyclicity_backdoor, ExactBackdoorOracle};
/// let framework = ABAFramework::new(
///     &["l1", "l2"],
///     &[],
///     &["l1", "l2"],
///     &[("l1", Some("l2")), ("l2", Some("l1"))],
/// ).unwrap();
/// let backdoor = acyclicity_backdoor(&framework, &ExactBackdoorOracle::default()).unwrap();
/// assert_eq!(1, backdoor.len());
/// ```
pub fn acyclicity_backdoor<'a, T>(
    framework: &'a ABAFramework<T>,
    oracle: &dyn BackdoorOracle,
) -> Result<Vec<&'a Atom<T>>>
where
    T: LabelType,
{
    Ok(acyclicity_backdoor_ids(framework, oracle)?
        .into_iter()
        .map(|i| framework.language().get_atom_by_id(i))
        .collect())
}

pub(crate) fn acyclicity_backdoor_ids<T>(
    framework: &ABAFramework<T>,
    oracle: &dyn BackdoorOracle,
) -> Result<Vec<usize>>
where
    T: LabelType,
{
    let facts = DependencyGraph::new(framework).to_facts();
    let names = oracle
        .minimum_backdoor(&facts)
        .context("while computing a backdoor")?;
    let mut backdoor = names
        .iter()
        .map(|n| match DependencyGraph::node_id(n) {
            Some(i) if i < framework.language().len() && framework.is_assumption_id(i) => Ok(i),
            _ => Err(MappingError::UnknownBackdoorElement(n.to_string())),
        })
        .collect::<Result<Vec<usize>, MappingError>>()
        .context("while reading a backdoor")?;
    backdoor.sort_unstable();
    backdoor.dedup();
    Ok(backdoor)
}
