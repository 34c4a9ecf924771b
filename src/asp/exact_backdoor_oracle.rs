use super::BackdoorOracle;
use crate::aba::DependencyGraph;
use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use permutator::Combination;
use regex::Regex;
use std::collections::HashMap;

const NODE_NAME_PATTERN: &str = r"\s*([^,()\s]+)\s*";

lazy_static! {
    static ref NODE_LINE_PATTERN: Regex =
        Regex::new(&format!(r"^\s*node\({}\)\.\s*$", NODE_NAME_PATTERN)).unwrap();
    static ref ASSUMPTION_LINE_PATTERN: Regex =
        Regex::new(&format!(r"^\s*assumption\({}\)\.\s*$", NODE_NAME_PATTERN)).unwrap();
    static ref EDGE_LINE_PATTERN: Regex = Regex::new(&format!(
        r"^\s*edge\({},{}\)\.\s*$",
        NODE_NAME_PATTERN, NODE_NAME_PATTERN
    ))
    .unwrap();
}

/// An embedded backdoor oracle.
///
/// This oracle reads the fact base and tries the subsets of the assumptions involved in cycles by increasing size,
/// returning the first one that breaks all the cycles through assumptions.
/// The result is thus always of minimum size, but the computation time is exponential in the size of the backdoor.
///
/// # Example
///
/// ```
/// # use abadoor::asp::{BackdoorOracle, ExactBackdoorOracle};
/// let facts = "node(x).\nnode(y).\nassumption(x).\nassumption(y).\nedge(x,y).\nedge(y,x).\n";
/// let backdoor = ExactBackdoorOracle::default().minimum_backdoor(facts).unwrap();
/// assert_eq!(vec!["x".to_string()], backdoor);
/// ```
#[derive(Default)]
pub struct ExactBackdoorOracle;

struct NamedGraph {
    names: Vec<String>,
    graph: DependencyGraph,
}

fn read_facts(facts: &str) -> Result<NamedGraph> {
    let mut names = Vec::new();
    let mut name_to_id = HashMap::new();
    let mut node_id = |name: &str| -> usize {
        *name_to_id.entry(name.to_string()).or_insert_with(|| {
            names.push(name.to_string());
            names.len() - 1
        })
    };
    let mut assumptions = Vec::new();
    let mut edges = Vec::new();
    for (i, line) in facts.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(c) = NODE_LINE_PATTERN.captures(line) {
            node_id(&c[1]);
        } else if let Some(c) = ASSUMPTION_LINE_PATTERN.captures(line) {
            assumptions.push(node_id(&c[1]));
        } else if let Some(c) = EDGE_LINE_PATTERN.captures(line) {
            let from = node_id(&c[1]);
            let to = node_id(&c[2]);
            edges.push((from, to));
        } else {
            return Err(anyhow!(r#"unexpected fact at line {}: "{}""#, i + 1, line));
        }
    }
    let graph = DependencyGraph::new_from_parts(names.len(), &assumptions, &edges);
    Ok(NamedGraph { names, graph })
}

impl BackdoorOracle for ExactBackdoorOracle {
    fn minimum_backdoor(&self, facts: &str) -> Result<Vec<String>> {
        let NamedGraph { names, graph } = read_facts(facts)?;
        let to_names = |ids: &[usize]| -> Vec<String> {
            ids.iter().map(|i| names[*i].clone()).collect()
        };
        if graph.breaks_assumption_cycles(&[]) {
            return Ok(vec![]);
        }
        let candidates = graph.assumptions_on_cycles();
        for k in 1..=candidates.len() {
            for subset in candidates.combination(k) {
                let ids = subset.into_iter().copied().collect::<Vec<usize>>();
                if graph.breaks_assumption_cycles(&ids) {
                    return Ok(to_names(&ids));
                }
            }
        }
        Ok(to_names(&candidates))
    }
}
