//! Costume numbering policy.
//!
//! Costume numbers are unique among the costumes of one character. An
//! omitted number becomes `max + 1` (or `1` for the first costume). A
//! requested number that is already taken is rejected, and the error carries
//! the number that would have been assigned instead.

use crate::error::CoreError;

/// Smallest number a costume may carry.
pub const FIRST_COSTUME_NUMBER: i32 = 1;

/// Unique index over `(character_id, costume_number)`.
pub const COSTUME_NUMBER_CONSTRAINT: &str = "uq_costumes_character_number";

/// Unique index allowing one measurements record per character.
pub const MEASUREMENTS_CHARACTER_CONSTRAINT: &str = "uq_measurements_character_id";

/// Whether `err` is the store rejecting a costume number another writer took
/// first.
pub fn is_costume_number_conflict(err: &CoreError) -> bool {
    matches!(err, CoreError::Conflict(msg) if msg.contains(COSTUME_NUMBER_CONSTRAINT))
}

/// The number assigned when the caller does not supply one.
pub fn next_costume_number(existing: &[i32]) -> i32 {
    existing
        .iter()
        .copied()
        .max()
        .map_or(FIRST_COSTUME_NUMBER, |max| max.saturating_add(1))
}

/// Decide the number for a new or updated costume.
///
/// `existing` must not include the costume being updated, so a costume may
/// always keep its own number.
pub fn resolve_costume_number(
    existing: &[i32],
    requested: Option<i32>,
) -> Result<i32, CoreError> {
    let Some(number) = requested else {
        return Ok(next_costume_number(existing));
    };

    if number < FIRST_COSTUME_NUMBER {
        return Err(CoreError::Validation(format!(
            "costume_number must be at least {FIRST_COSTUME_NUMBER}, got {number}"
        )));
    }

    if existing.contains(&number) {
        return Err(CoreError::DuplicateSequenceNumber {
            number,
            next_free: next_costume_number(existing),
        });
    }

    Ok(number)
}

/// Numbers for `count` pre-allocated costumes of a fresh character.
pub fn preallocated_numbers(count: i32) -> impl Iterator<Item = i32> {
    FIRST_COSTUME_NUMBER..FIRST_COSTUME_NUMBER + count.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn first_costume_is_number_one() {
        assert_eq!(next_costume_number(&[]), 1);
        assert_eq!(resolve_costume_number(&[], None).unwrap(), 1);
    }

    #[test]
    fn omitted_number_is_max_plus_one_even_with_gaps() {
        assert_eq!(resolve_costume_number(&[1, 2, 4], None).unwrap(), 5);
    }

    #[test]
    fn taken_number_reports_next_free() {
        assert_matches!(
            resolve_costume_number(&[1, 2, 4], Some(2)),
            Err(CoreError::DuplicateSequenceNumber { number: 2, next_free: 5 })
        );
    }

    #[test]
    fn free_gap_number_is_accepted() {
        assert_eq!(resolve_costume_number(&[1, 2, 4], Some(3)).unwrap(), 3);
    }

    #[test]
    fn non_positive_numbers_are_rejected() {
        assert_matches!(
            resolve_costume_number(&[], Some(0)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            resolve_costume_number(&[1], Some(-3)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn only_the_costume_index_counts_as_a_number_conflict() {
        let taken = CoreError::Conflict(format!(
            "Duplicate value violates {COSTUME_NUMBER_CONSTRAINT}"
        ));
        assert!(is_costume_number_conflict(&taken));
        let other = CoreError::Conflict(format!(
            "Duplicate value violates {MEASUREMENTS_CHARACTER_CONSTRAINT}"
        ));
        assert!(!is_costume_number_conflict(&other));
        assert!(!is_costume_number_conflict(&CoreError::Validation(
            COSTUME_NUMBER_CONSTRAINT.to_string()
        )));
    }

    #[test]
    fn preallocation_numbers_from_one() {
        assert_eq!(preallocated_numbers(3).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(preallocated_numbers(0).count(), 0);
        assert_eq!(preallocated_numbers(-1).count(), 0);
    }
}
