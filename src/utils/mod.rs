//! Miscellaneous components used in the library.

mod label;
pub use label::LabelType;

mod maximal_sets;
pub use maximal_sets::retain_maximal_sets;
