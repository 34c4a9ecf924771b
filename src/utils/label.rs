use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// The trait for atom labels.
///
/// Atoms may be labeled by any type implementing some traits allowing their use in maps and their display.
/// This trait is just a shortcut used to combine them.
///
/// Simple types like [usize] and [String] implements [LabelType].
pub trait LabelType: Clone + Debug + Display + Eq + Hash {}
impl<T: Clone + Debug + Display + Eq + Hash> LabelType for T {}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_label_type<T: LabelType>(_: &T) -> bool {
        true
    }

    #[test]
    fn test_common_label_types() {
        assert!(is_label_type(&1usize));
        assert!(is_label_type(&"a"));
        assert!(is_label_type(&"a".to_string()));
    }
}
