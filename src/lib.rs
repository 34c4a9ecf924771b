//! Abadoor is a reasoner for flat Assumption-based Argumentation frameworks.
//!
//! Preferred assumption sets are enumerated by first computing the grounded assumption set,
//! reducing the framework by it, and then searching the admissible candidates guided by a minimum acyclicity backdoor.

#![warn(missing_docs)]

pub mod aba;

pub mod asp;

pub mod io;

pub mod sat;

pub mod utils;
