use std::collections::HashSet;

use uuid::Uuid;

/// Position for a row appended to a sibling set. New rows go after the
/// current maximum without renumbering, so gaps may exist until the next
/// reorder writes a dense 0..n-1 assignment.
pub fn next_position(max_position: Option<i32>) -> i32 {
    max_position.map_or(0, |max| max + 1)
}

/// True when `supplied` is exactly a permutation of `owned`: same length, no
/// duplicates, no foreign ids. Reorder requests failing this check are
/// dropped silently so the existence of other users' rows is never confirmed.
pub fn is_same_id_set(owned: &[Uuid], supplied: &[Uuid]) -> bool {
    if owned.len() != supplied.len() {
        return false;
    }

    let owned_set: HashSet<Uuid> = owned.iter().copied().collect();
    let supplied_set: HashSet<Uuid> = supplied.iter().copied().collect();

    supplied_set.len() == supplied.len() && owned_set == supplied_set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_position_starts_at_zero_for_empty_sibling_set() {
        assert_eq!(next_position(None), 0);
    }

    #[test]
    fn next_position_appends_after_max_even_with_gaps() {
        // Positions {0, 2, 5} can exist after non-atomic deletes.
        assert_eq!(next_position(Some(5)), 6);
    }

    #[test]
    fn accepts_exact_permutation() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        assert!(is_same_id_set(&[a, b, c], &[c, a, b]));
    }

    #[test]
    fn rejects_foreign_id() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(!is_same_id_set(&[a, b], &[a, Uuid::new_v4()]));
    }

    #[test]
    fn rejects_missing_and_duplicated_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(!is_same_id_set(&[a, b], &[a]));
        assert!(!is_same_id_set(&[a, b], &[a, a]));
    }
}
