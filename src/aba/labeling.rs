use std::fmt::Display;

/// The label given to an assumption while building an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssumptionLabel {
    /// The assumption is accepted.
    In,
    /// The assumption is rejected.
    Out,
    /// The assumption is neither accepted nor rejected.
    Undec,
}

impl Display for AssumptionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssumptionLabel::In => write!(f, "IN"),
            AssumptionLabel::Out => write!(f, "OUT"),
            AssumptionLabel::Undec => write!(f, "UNDEC"),
        }
    }
}

/// A partial labeling of the assumptions of a framework, indexed by atom identifiers.
///
/// Each modification increments a version number,
/// allowing the closures computed from a labeling to be reused until it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Labeling {
    labels: Vec<Option<AssumptionLabel>>,
    version: usize,
}

impl Labeling {
    pub(crate) fn new(n_atoms: usize) -> Self {
        Labeling {
            labels: vec![None; n_atoms],
            version: 0,
        }
    }

    pub(crate) fn get(&self, id: usize) -> Option<AssumptionLabel> {
        self.labels[id]
    }

    pub(crate) fn set(&mut self, id: usize, label: AssumptionLabel) {
        if self.labels[id] != Some(label) {
            self.labels[id] = Some(label);
            self.version += 1;
        }
    }

    pub(crate) fn version(&self) -> usize {
        self.version
    }

    /// Returns the membership vector of the atoms labeled IN.
    pub(crate) fn in_set(&self) -> Vec<bool> {
        self.labels
            .iter()
            .map(|l| *l == Some(AssumptionLabel::In))
            .collect()
    }

    /// Returns the membership vector of the atoms not labeled OUT.
    ///
    /// Atoms that are not assumptions are flagged too; closure queries ignore them.
    pub(crate) fn not_out_set(&self) -> Vec<bool> {
        self.labels
            .iter()
            .map(|l| *l != Some(AssumptionLabel::Out))
            .collect()
    }

    /// Sets the label of all the provided atoms that are unlabeled.
    pub(crate) fn label_unset(&mut self, ids: &[usize], label: AssumptionLabel) {
        for i in ids {
            if self.labels[*i].is_none() {
                self.set(*i, label);
            }
        }
    }

    /// Returns the identifiers of the atoms labeled IN, in increasing order.
    pub(crate) fn in_ids(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(i, l)| {
                if *l == Some(AssumptionLabel::In) {
                    Some(i)
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_labeling_is_unset() {
        let l = Labeling::new(3);
        assert!((0..3).all(|i| l.get(i).is_none()));
        assert_eq!(vec![false; 3], l.in_set());
        assert_eq!(vec![true; 3], l.not_out_set());
    }

    #[test]
    fn test_version_changes_on_modification_only() {
        let mut l = Labeling::new(2);
        assert_eq!(0, l.version());
        l.set(0, AssumptionLabel::In);
        assert_eq!(1, l.version());
        l.set(0, AssumptionLabel::In);
        assert_eq!(1, l.version());
        l.set(0, AssumptionLabel::Undec);
        assert_eq!(2, l.version());
    }

    #[test]
    fn test_sets() {
        let mut l = Labeling::new(4);
        l.set(0, AssumptionLabel::In);
        l.set(1, AssumptionLabel::Out);
        l.set(3, AssumptionLabel::In);
        assert_eq!(vec![true, false, false, true], l.in_set());
        assert_eq!(vec![true, false, true, true], l.not_out_set());
        assert_eq!(vec![0, 3], l.in_ids());
    }

    #[test]
    fn test_label_unset() {
        let mut l = Labeling::new(3);
        l.set(0, AssumptionLabel::Out);
        l.label_unset(&[0, 1], AssumptionLabel::Undec);
        assert_eq!(Some(AssumptionLabel::Out), l.get(0));
        assert_eq!(Some(AssumptionLabel::Undec), l.get(1));
        assert_eq!(None, l.get(2));
    }

    #[test]
    fn test_display() {
        assert_eq!("IN", AssumptionLabel::In.to_string());
        assert_eq!("OUT", AssumptionLabel::Out.to_string());
        assert_eq!("UNDEC", AssumptionLabel::Undec.to_string());
    }
}
