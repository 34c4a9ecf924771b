//! Propositional oracles answering the deductive closure queries of ABA frameworks.

mod cadical_solver;
pub use cadical_solver::CadicalOracle;

mod closure_oracle;
pub use closure_oracle::default_oracle_factory;
pub use closure_oracle::CadicalClosureOracleFactory;
pub use closure_oracle::ClosureOracle;
pub use closure_oracle::ClosureOracleFactory;
pub use closure_oracle::DefaultClosureOracleFactory;
pub use closure_oracle::Literal;
pub use closure_oracle::Variable;

mod unit_propagator;
pub use unit_propagator::UnitPropagator;
