use super::{ClosureOracle, Literal};

/// An embedded oracle performing unit propagation.
///
/// Clauses are indexed by the literals they contain.
/// When a literal becomes true, only the clauses containing its negation are visited.
/// The assignment is cleared at the beginning of each query, while the clause index is kept.
#[derive(Default)]
pub struct UnitPropagator {
    clauses: Vec<Vec<Literal>>,
    occurrences: Vec<Vec<usize>>,
    unit_clauses: Vec<usize>,
    has_empty_clause: bool,
    n_vars: usize,
    values: Vec<Option<bool>>,
}

fn lit_code(l: Literal) -> usize {
    let v = usize::from(l.var()) - 1;
    if l.is_positive() {
        v << 1
    } else {
        (v << 1) | 1
    }
}

impl UnitPropagator {
    fn reserve(&mut self, n_vars: usize) {
        if n_vars > self.n_vars {
            self.n_vars = n_vars;
            self.occurrences.resize(n_vars << 1, vec![]);
        }
    }

    fn value_of(&self, l: Literal) -> Option<bool> {
        self.values[usize::from(l.var())].map(|b| b == l.is_positive())
    }

    // Returns `false` in case of a conflict.
    fn assign(&mut self, l: Literal, trail: &mut Vec<Literal>) -> bool {
        match self.value_of(l) {
            Some(b) => b,
            None => {
                self.values[usize::from(l.var())] = Some(l.is_positive());
                trail.push(l);
                true
            }
        }
    }

    fn propagate_trail(&mut self, trail: &mut Vec<Literal>, mut next: usize) -> bool {
        while next < trail.len() {
            let falsified = trail[next].negate();
            next += 1;
            for occ_index in 0..self.occurrences[lit_code(falsified)].len() {
                let clause_index = self.occurrences[lit_code(falsified)][occ_index];
                let mut unassigned = None;
                let mut n_unassigned = 0;
                let mut satisfied = false;
                for l in &self.clauses[clause_index] {
                    match self.value_of(*l) {
                        Some(true) => {
                            satisfied = true;
                            break;
                        }
                        Some(false) => {}
                        None => {
                            n_unassigned += 1;
                            unassigned = Some(*l);
                        }
                    }
                }
                if satisfied {
                    continue;
                }
                match (n_unassigned, unassigned) {
                    (0, _) => return false,
                    (1, Some(l)) => {
                        self.assign(l, trail);
                    }
                    _ => {}
                }
            }
        }
        true
    }
}

impl ClosureOracle for UnitPropagator {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        let mut cl = cl;
        cl.sort_unstable();
        cl.dedup();
        let max_var = cl.iter().map(|l| usize::from(l.var())).max().unwrap_or(0);
        self.reserve(max_var);
        let clause_index = self.clauses.len();
        match cl.len() {
            0 => self.has_empty_clause = true,
            1 => self.unit_clauses.push(clause_index),
            _ => {}
        }
        cl.iter()
            .for_each(|l| self.occurrences[lit_code(*l)].push(clause_index));
        self.clauses.push(cl);
    }

    fn propagate(&mut self, assumptions: &[Literal]) -> Vec<Literal> {
        let max_var = assumptions
            .iter()
            .map(|l| usize::from(l.var()))
            .max()
            .unwrap_or(0);
        self.reserve(max_var);
        self.values.clear();
        self.values.resize(1 + self.n_vars, None);
        let mut trail = Vec::with_capacity(self.n_vars);
        if self.has_empty_clause {
            return trail;
        }
        for a in assumptions {
            if !self.assign(*a, &mut trail) {
                return trail;
            }
        }
        for i in 0..self.unit_clauses.len() {
            let l = self.clauses[self.unit_clauses[i]][0];
            if !self.assign(l, &mut trail) {
                return trail;
            }
        }
        self.propagate_trail(&mut trail, 0);
        trail
    }

    fn n_vars(&self) -> usize {
        self.n_vars
    }
}
