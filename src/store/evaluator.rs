//! Answer evaluation.

/// Compare a selection against the correct options as unordered sets.
///
/// The same rule covers single and multiple choice questions.
///
/// ```
/// use quiz_review::check_answer;
///
/// assert!(check_answer(&[0, 2], &[2, 0]));
/// assert!(!check_answer(&[0, 1], &[0, 2]));
/// assert!(!check_answer(&[0], &[0, 1]));
/// ```
pub fn check_answer(selected: &[usize], correct: &[usize]) -> bool {
    selected.len() == correct.len()
        && selected.iter().all(|option| correct.contains(option))
        && correct.iter().all(|option| selected.contains(option))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every subset of `0..n`, as index vectors.
    fn subsets(n: usize) -> Vec<Vec<usize>> {
        (0..1u32 << n)
            .map(|mask| (0..n).filter(|i| mask & (1 << i) != 0).collect())
            .collect()
    }

    #[test]
    fn test_single_choice() {
        assert!(check_answer(&[1], &[1]));
        assert!(!check_answer(&[0], &[1]));
        assert!(!check_answer(&[], &[1]));
    }

    #[test]
    fn test_order_independent() {
        assert!(check_answer(&[2, 0, 1], &[0, 1, 2]));
    }

    #[test]
    fn test_symmetric_and_reflexive() {
        let sets = subsets(4);
        for a in &sets {
            assert!(check_answer(a, a));
            for b in &sets {
                assert_eq!(check_answer(a, b), check_answer(b, a), "{:?} vs {:?}", a, b);
                assert_eq!(check_answer(a, b), a == b);
            }
        }
    }
}
