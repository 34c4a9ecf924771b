use super::ABAFramework;
use crate::utils::LabelType;

/// The dependency graph of an ABA framework.
///
/// Nodes are the atoms of the framework, identified by their ids.
/// There is an edge from each atom of a rule body to the head of the rule,
/// and an edge from the contrary of each assumption to the assumption.
///
/// A backdoor is a set of assumptions such that, once they are removed from the graph, no cycle goes through an assumption.
/// Cycles involving only atoms that are not assumptions come from rules depending on each other; they are not taken into account.
///
/// # Example
///
/// ```
/// # use abadoor::aba::{ABAFramework, DependencyGraph};
/// let framework = ABAFramework::new(
///     &["l1", "l2"],
///     &[],
///     &["l1", "l2"],
///     &[("l1", Some("l2")), ("l2", Some("l1"))],
/// ).unwrap();
/// let graph = DependencyGraph::new(&framework);
/// assert!(!graph.breaks_assumption_cycles(&[]));
/// assert!(graph.breaks_assumption_cycles(&[0]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    is_assumption: Vec<bool>,
    successors: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Builds the dependency graph of a framework.
    pub fn new<T>(framework: &ABAFramework<T>) -> Self
    where
        T: LabelType,
    {
        let n_nodes = framework.language().len();
        let mut edges = Vec::new();
        for r in framework.iter_rules() {
            let head = r.head().id();
            edges.extend(r.body_ids().iter().map(|b| (*b, head)));
        }
        for a in framework.assumption_ids() {
            if let Some(c) = framework.contrary_id(*a) {
                edges.push((c, *a));
            }
        }
        Self::new_from_parts(n_nodes, framework.assumption_ids(), &edges)
    }

    /// Builds a graph given its number of nodes, its assumption nodes and its edges.
    ///
    /// Duplicate edges are merged.
    ///
    /// # Panics
    ///
    /// Panics if a node id is not lower than the number of nodes.
    pub fn new_from_parts(n_nodes: usize, assumptions: &[usize], edges: &[(usize, usize)]) -> Self {
        let mut is_assumption = vec![false; n_nodes];
        assumptions.iter().for_each(|a| is_assumption[*a] = true);
        let mut successors = vec![vec![]; n_nodes];
        edges
            .iter()
            .for_each(|(from, to)| successors[*from].push(*to));
        successors.iter_mut().for_each(|s| {
            s.sort_unstable();
            s.dedup();
        });
        DependencyGraph {
            is_assumption,
            successors,
        }
    }

    /// Returns the number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.successors.len()
    }

    /// Returns the ids of the assumption nodes.
    pub fn iter_assumptions(&self) -> impl Iterator<Item = usize> + '_ {
        self.is_assumption
            .iter()
            .enumerate()
            .filter_map(|(i, b)| if *b { Some(i) } else { None })
    }

    /// Iterates over the edges, sorted by source and then by target.
    pub fn iter_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.successors
            .iter()
            .enumerate()
            .flat_map(|(from, s)| s.iter().map(move |to| (from, *to)))
    }

    /// Returns the name of a node in the fact base.
    pub fn node_name(id: usize) -> String {
        format!("a{}", id)
    }

    /// Returns the id of a node given its name in the fact base, if this name is valid.
    ///
    /// ```
    /// # use abadoor::aba::DependencyGraph;
    /// assert_eq!(Some(12), DependencyGraph::node_id(&DependencyGraph::node_name(12)));
    /// assert_eq!(None, DependencyGraph::node_id("b12"));
    /// ```
    pub fn node_id(name: &str) -> Option<usize> {
        name.strip_prefix('a').and_then(|s| s.parse().ok())
    }

    /// Renders this graph as a fact base, one fact per line.
    ///
    /// Each node `i` is named `ai`; facts are `node/1`, `assumption/1` and `edge/2`.
    ///
    /// ```
    /// # use abadoor::aba::DependencyGraph;
    /// let graph = DependencyGraph::new_from_parts(2, &[0], &[(1, 0)]);
    /// assert_eq!("node(a0).\nnode(a1).\nassumption(a0).\nedge(a1,a0).\n", graph.to_facts());
    /// ```
    pub fn to_facts(&self) -> String {
        let nodes = (0..self.n_nodes()).map(|i| format!("node({}).\n", Self::node_name(i)));
        let assumptions = self
            .iter_assumptions()
            .map(|a| format!("assumption({}).\n", Self::node_name(a)));
        let edges = self.iter_edges().map(|(from, to)| {
            format!("edge({},{}).\n", Self::node_name(from), Self::node_name(to))
        });
        nodes.chain(assumptions).chain(edges).collect()
    }

    /// Returns `true` iff no cycle goes through an assumption once the backdoor nodes are removed.
    pub fn breaks_assumption_cycles(&self, backdoor: &[usize]) -> bool {
        let mut removed = vec![false; self.n_nodes()];
        backdoor.iter().for_each(|b| removed[*b] = true);
        self.iter_assumptions()
            .filter(|a| !removed[*a])
            .all(|a| !self.reaches_itself(a, &removed))
    }

    /// Returns the assumptions that are involved in a cycle.
    ///
    /// Any backdoor can be restricted to these assumptions.
    pub fn assumptions_on_cycles(&self) -> Vec<usize> {
        let removed = vec![false; self.n_nodes()];
        self.iter_assumptions()
            .filter(|a| self.reaches_itself(*a, &removed))
            .collect()
    }

    fn reaches_itself(&self, node: usize, removed: &[bool]) -> bool {
        let mut visited = vec![false; self.n_nodes()];
        let mut to_visit = vec![node];
        while let Some(current) = to_visit.pop() {
            for next in self.successors[current].iter() {
                if *next == node {
                    return true;
                }
                if !removed[*next] && !visited[*next] {
                    visited[*next] = true;
                    to_visit.push(*next);
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_of_framework() {
        let f = ABAFramework::new(
            &["a", "b", "p", "q"],
            &[("p", vec!["a", "b"]), ("q", vec!["a"]), ("p", vec!["a"])],
            &["a", "b"],
            &[("a", Some("p")), ("b", None)],
        )
        .unwrap();
        let g = DependencyGraph::new(&f);
        assert_eq!(4, g.n_nodes());
        assert_eq!(vec![0, 1], g.iter_assumptions().collect::<Vec<_>>());
        assert_eq!(
            vec![(0, 2), (0, 3), (1, 2), (2, 0)],
            g.iter_edges().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_to_facts() {
        let f = ABAFramework::new(
            &["a", "p"],
            &[("p", vec!["a"])],
            &["a"],
            &[("a", Some("p"))],
        )
        .unwrap();
        assert_eq!(
            "node(a0).\nnode(a1).\nassumption(a0).\nedge(a0,a1).\nedge(a1,a0).\n",
            DependencyGraph::new(&f).to_facts()
        );
    }

    #[test]
    fn test_empty_graph() {
        let g = DependencyGraph::new_from_parts(0, &[], &[]);
        assert_eq!("", g.to_facts());
        assert!(g.breaks_assumption_cycles(&[]));
    }

    #[test]
    fn test_self_loop() {
        let g = DependencyGraph::new_from_parts(1, &[0], &[(0, 0)]);
        assert!(!g.breaks_assumption_cycles(&[]));
        assert!(g.breaks_assumption_cycles(&[0]));
        assert_eq!(vec![0], g.assumptions_on_cycles());
    }

    #[test]
    fn test_cycle_without_assumptions_is_ignored() {
        let g = DependencyGraph::new_from_parts(3, &[0], &[(0, 1), (1, 2), (2, 1)]);
        assert!(g.breaks_assumption_cycles(&[]));
        assert!(g.assumptions_on_cycles().is_empty());
    }

    #[test]
    fn test_cycle_through_two_assumptions() {
        // 0 -> 2 -> 1 -> 3 -> 0
        let g = DependencyGraph::new_from_parts(4, &[0, 1], &[(0, 2), (2, 1), (1, 3), (3, 0)]);
        assert!(!g.breaks_assumption_cycles(&[]));
        assert!(g.breaks_assumption_cycles(&[0]));
        assert!(g.breaks_assumption_cycles(&[1]));
        assert_eq!(vec![0, 1], g.assumptions_on_cycles());
    }

    #[test]
    fn test_two_cycles() {
        let g = DependencyGraph::new_from_parts(
            5,
            &[0, 1, 2],
            &[(0, 3), (3, 1), (1, 0), (1, 4), (4, 2), (2, 1)],
        );
        assert!(!g.breaks_assumption_cycles(&[0]));
        assert!(!g.breaks_assumption_cycles(&[2]));
        assert!(g.breaks_assumption_cycles(&[1]));
        assert!(g.breaks_assumption_cycles(&[0, 2]));
    }

    #[test]
    fn test_node_names() {
        assert_eq!("a3", DependencyGraph::node_name(3));
        assert_eq!(Some(3), DependencyGraph::node_id("a3"));
        assert_eq!(None, DependencyGraph::node_id("a"));
        assert_eq!(None, DependencyGraph::node_id("3"));
    }
}
