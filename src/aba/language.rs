use crate::utils::LabelType;
use anyhow::{anyhow, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Display;

/// Handles an atom of the language.
///
/// Each atom has a label and an identifier which are unique in a language.
/// Identifiers are dense: the atoms of a language of size `n` have the identifiers `0` to `n-1`.
/// This uniqueness condition imposes atoms are made from [Language] objects, and not directly by the [Atom] struct.
///
/// Identifiers are only meaningful inside the language that created them;
/// a framework built by a transformation (reduct, trim) renumbers its atoms, while labels are kept.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Atom<T>
where
    T: LabelType,
{
    id: usize,
    label: T,
}

impl<T> Atom<T>
where
    T: LabelType,
{
    /// Returns the label of the atom.
    pub fn label(&self) -> &T {
        &self.label
    }

    /// Returns the id of the atom.
    pub fn id(&self) -> usize {
        self.id
    }
}

impl<T> Display for Atom<T>
where
    T: LabelType,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// The arena of the atoms that may be used in an ABA framework.
///
/// # Example
///
/// ```
/// # use abadoor::aba::Language;
/// let language = Language::new_with_labels(&["a", "b", "c", "p", "q", "r", "s", "t"]);
/// for (i,s) in language.iter().enumerate() {
///     assert_eq!(i, language.get_atom(s.label()).unwrap().id());
///     assert_eq!(s, language.get_atom_by_id(i));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Language<T>
where
    T: LabelType,
{
    atoms: Vec<Atom<T>>,
    label_to_id: HashMap<T, usize>,
}

impl<T> Language<T>
where
    T: LabelType,
{
    /// Builds a new language given the labels of the atoms.
    ///
    /// Each atom will be assigned an id equal to its index in the provided slice of labels.
    /// If a label appears multiple times, the first occurrence is the only one that is considered.
    ///
    /// # Example
    ///
    /// ```
    /// # use abadoor::aba::Language;
    /// let language = Language::new_with_labels(&["a", "b", "a"]);
    /// assert_eq!(2, language.len());
    /// ```
    pub fn new_with_labels(labels: &[T]) -> Self {
        let mut label_to_id = HashMap::with_capacity(labels.len());
        let mut atoms = Vec::with_capacity(labels.len());
        for l in labels.iter() {
            if let Entry::Vacant(e) = label_to_id.entry(l.clone()) {
                e.insert(atoms.len());
                atoms.push(Atom {
                    id: atoms.len(),
                    label: l.clone(),
                });
            }
        }
        Language { atoms, label_to_id }
    }

    /// Builds the sub-language made of the atoms flagged in `keep`.
    ///
    /// Atoms keep their relative order and get new dense identifiers.
    /// The second member of the returned tuple maps the identifiers of this language to the ones of the sub-language.
    pub(crate) fn restrict(&self, keep: &[bool]) -> (Language<T>, Vec<Option<usize>>) {
        let mut mapping = vec![None; self.len()];
        let mut labels = Vec::with_capacity(self.len());
        for atom in self.atoms.iter().filter(|a| keep[a.id]) {
            mapping[atom.id] = Some(labels.len());
            labels.push(atom.label.clone());
        }
        (Language::new_with_labels(&labels), mapping)
    }

    /// Returns the number of atoms in the language.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Returns `true` iff the language has no atom.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Returns the atom associated to a label.
    ///
    /// An error is returned if no atom corresponds to the provided label.
    pub fn get_atom(&self, label: &T) -> Result<&Atom<T>> {
        self.label_to_id
            .get(label)
            .map(|i| &self.atoms[*i])
            .ok_or_else(|| anyhow!("no such atom: {}", label))
    }

    /// Returns the id of the atom associated to a label, or `None` if it does not exist.
    pub(crate) fn try_get_id(&self, label: &T) -> Option<usize> {
        self.label_to_id.get(label).copied()
    }

    /// Returns the atom with the corresponding identifier.
    ///
    /// # Panics
    ///
    /// Panics if no atom has the corresponding identifier.
    pub fn get_atom_by_id(&self, id: usize) -> &Atom<T> {
        &self.atoms[id]
    }

    /// Provides an iterator to the atoms, in increasing order of identifiers.
    pub fn iter(&self) -> impl Iterator<Item = &Atom<T>> {
        self.atoms.iter()
    }
}
