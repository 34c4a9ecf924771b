//! A module containing the material needed to handle Assumption-based Argumentation frameworks.

mod aba_framework;
pub use aba_framework::ABAFramework;
pub use aba_framework::Rule;

mod aba_reduce;

mod backdoor_search;

mod closure_engine;

mod dependency_graph;
pub use dependency_graph::DependencyGraph;

mod errors;
pub use errors::MappingError;
pub use errors::ValidationError;

mod grounded_semantics;

mod labeling;
pub use labeling::AssumptionLabel;

mod language;
pub use language::Atom;
pub use language::Language;

mod preferred_semantics_solver;
pub use preferred_semantics_solver::PreferredListener;
pub use preferred_semantics_solver::PreferredSolver;

mod problem;
pub use problem::Problem;
