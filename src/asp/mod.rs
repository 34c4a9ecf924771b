//! Oracles computing minimum acyclicity backdoors of ABA frameworks.
//!
//! A backdoor is computed from the fact base of the [`DependencyGraph`](crate::aba::DependencyGraph) of a framework.
//! Two oracles are provided: an embedded exact search, and a client for an external ASP solver like Clingo.

mod backdoor_oracle;
pub use backdoor_oracle::acyclicity_backdoor;
pub(crate) use backdoor_oracle::acyclicity_backdoor_ids;
pub use backdoor_oracle::BackdoorOracle;

mod exact_backdoor_oracle;
pub use exact_backdoor_oracle::ExactBackdoorOracle;

mod external_asp_solver;
pub use external_asp_solver::ExternalAspBackdoorOracle;
pub use external_asp_solver::ACYCLICITY_BACKDOOR_ENCODING;
