use std::collections::HashMap;

use crate::{
    db::RatingSource,
    models::{ItemId, PairedRatings, Score, UserId},
};

/// Pairs up the scores two users gave to the items they both rated
///
/// Tuples are `(score_a, score_b)` in `user_a`'s item order. Users with no
/// shared items produce an empty vector.
pub fn pair_histories<S>(source: &S, user_a: UserId, user_b: UserId) -> PairedRatings
where
    S: RatingSource + ?Sized,
{
    pair_with_history(&source.ratings_for_user(user_a), source, user_b)
}

/// Pairs an already loaded history against another user's ratings
///
/// Lets a caller comparing one user against many read that user's ratings once.
pub fn pair_with_history<S>(
    history: &[(ItemId, Score)],
    source: &S,
    other_user: UserId,
) -> PairedRatings
where
    S: RatingSource + ?Sized,
{
    let other: HashMap<_, _> = source.ratings_for_user(other_user).into_iter().collect();

    history
        .iter()
        .filter_map(|(item_id, score_a)| other.get(item_id).map(|&score_b| (*score_a, score_b)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::RatingSnapshot,
        models::{ItemId, Rating},
    };

    fn snapshot() -> RatingSnapshot {
        vec![
            Rating::new(UserId(1), ItemId(10), 5),
            Rating::new(UserId(1), ItemId(20), 3),
            Rating::new(UserId(1), ItemId(30), 1),
            Rating::new(UserId(2), ItemId(30), 2),
            Rating::new(UserId(2), ItemId(10), 4),
            Rating::new(UserId(2), ItemId(40), 5),
            Rating::new(UserId(3), ItemId(50), 5),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_pairs_only_shared_items() {
        let pairs = pair_histories(&snapshot(), UserId(1), UserId(2));
        assert_eq!(pairs, vec![(5, 4), (1, 2)]);
    }

    #[test]
    fn test_pairing_is_symmetric_up_to_swap() {
        let source = snapshot();
        let forward = pair_histories(&source, UserId(1), UserId(2));
        let mut backward: Vec<_> = pair_histories(&source, UserId(2), UserId(1))
            .into_iter()
            .map(|(b, a)| (a, b))
            .collect();
        let mut forward_sorted = forward.clone();

        forward_sorted.sort();
        backward.sort();
        assert_eq!(forward_sorted, backward);
    }

    #[test]
    fn test_no_shared_items_is_empty() {
        assert!(pair_histories(&snapshot(), UserId(1), UserId(3)).is_empty());
    }

    #[test]
    fn test_pair_with_loaded_history_matches() {
        let source = snapshot();
        let history = source.ratings_for_user(UserId(1));

        assert_eq!(
            pair_with_history(&history, &source, UserId(2)),
            pair_histories(&source, UserId(1), UserId(2))
        );
        assert!(pair_with_history(&[], &source, UserId(2)).is_empty());
    }

    #[test]
    fn test_unknown_user_is_empty() {
        assert!(pair_histories(&snapshot(), UserId(1), UserId(99)).is_empty());
    }
}
