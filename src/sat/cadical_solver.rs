use super::{ClosureOracle, Literal};
use cadical::Solver as CadicalCSolver;

/// An oracle based on the CaDiCaL SAT solver.
///
/// CaDiCaL does not give access to its propagation routine.
/// Instead, a positive literal is reported as forced iff it is assumed or if the clauses,
/// the assumptions and the negation of the literal are unsatisfiable.
/// For sets of definite Horn clauses queried under positive assumptions, as the ones built from ABA rules,
/// this is exactly the set of literals set to true by unit propagation.
/// Negative literals forced by propagation are not reported, except the assumed ones.
///
/// In case the clauses and the assumptions are unsatisfiable, only the assumptions are returned.
#[derive(Default)]
pub struct CadicalOracle {
    solver: CadicalCSolver,
    n_vars: usize,
}

impl ClosureOracle for CadicalOracle {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.n_vars = cl
            .iter()
            .map(|l| usize::from(l.var()))
            .fold(self.n_vars, usize::max);
        self.solver
            .add_clause(cl.into_iter().map(|l| isize::from(l) as i32))
    }

    fn propagate(&mut self, assumptions: &[Literal]) -> Vec<Literal> {
        let assumed = assumptions
            .iter()
            .map(|l| isize::from(*l) as i32)
            .collect::<Vec<i32>>();
        if self.solver.solve_with(assumed.iter().copied()) != Some(true) {
            return assumptions.to_vec();
        }
        let candidates = (1..=self.solver.max_variable())
            .filter(|v| self.solver.value(*v) == Some(true) && !assumed.contains(v))
            .collect::<Vec<i32>>();
        let mut forced = assumptions.to_vec();
        for candidate in candidates {
            let is_entailed = self
                .solver
                .solve_with(assumed.iter().copied().chain(std::iter::once(-candidate)))
                == Some(false);
            if is_entailed {
                forced.push(Literal::from(candidate));
            }
        }
        forced
    }

    fn n_vars(&self) -> usize {
        self.n_vars
    }
}
