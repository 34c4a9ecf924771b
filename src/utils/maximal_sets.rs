/// Keeps the subset-maximal sets of a collection.
///
/// Sets are given as sorted vectors of identifiers.
/// Duplicates are removed before maximality is checked, so each maximal set appears once in the result.
/// The result is sorted.
///
/// # Example
///
/// ```
/// # use abadoor::utils::retain_maximal_sets;
/// let sets = vec![vec![0], vec![0, 1], vec![2], vec![0, 1]];
/// assert_eq!(vec![vec![0, 1], vec![2]], retain_maximal_sets(sets));
/// ```
pub fn retain_maximal_sets(mut sets: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    sets.sort_unstable();
    sets.dedup();
    (0..sets.len())
        .filter(|i| {
            !sets
                .iter()
                .enumerate()
                .any(|(j, other)| *i != j && is_subset(&sets[*i], other))
        })
        .map(|i| sets[i].clone())
        .collect()
}

fn is_subset(small: &[usize], big: &[usize]) -> bool {
    if small.len() > big.len() {
        return false;
    }
    let mut big_iter = big.iter();
    small.iter().all(|x| big_iter.any(|y| y == x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_subset() {
        assert!(is_subset(&[], &[]));
        assert!(is_subset(&[], &[1]));
        assert!(is_subset(&[1, 3], &[0, 1, 2, 3]));
        assert!(!is_subset(&[1, 4], &[0, 1, 2, 3]));
        assert!(!is_subset(&[0, 1], &[1]));
    }

    #[test]
    fn test_empty_collection() {
        assert!(retain_maximal_sets(vec![]).is_empty());
    }

    #[test]
    fn test_only_empty_set() {
        assert_eq!(vec![Vec::<usize>::new()], retain_maximal_sets(vec![vec![], vec![]]));
    }

    #[test]
    fn test_chain() {
        assert_eq!(
            vec![vec![0, 1, 2]],
            retain_maximal_sets(vec![vec![0], vec![], vec![0, 1, 2], vec![1, 2]])
        );
    }

    #[test]
    fn test_incomparable() {
        assert_eq!(
            vec![vec![0, 2], vec![1, 2]],
            retain_maximal_sets(vec![vec![1, 2], vec![2], vec![0, 2]])
        );
    }

    #[test]
    fn test_result_is_its_own_maximal_sets() {
        let sets = vec![vec![0, 3], vec![1], vec![0], vec![1, 3], vec![2]];
        let maximal = retain_maximal_sets(sets);
        assert_eq!(maximal, retain_maximal_sets(maximal.clone()));
    }
}
