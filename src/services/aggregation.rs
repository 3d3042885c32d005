use crate::{
    db::RatingSource,
    error::PredictionError,
    models::{ItemId, RatingScale, Similarity},
};

/// Blends the neighbors' scores for an item into one predicted score
///
/// Positively correlated neighbors contribute `r * score`. Everyone else
/// contributes `|r| * (complement_base - score)`, so a neighbor who tends to
/// disagree pushes the prediction toward the opposite end of the scale. The sum
/// is divided by the total `|r|`.
///
/// A coefficient of exactly zero takes the disagreeing branch with zero weight
/// and so leaves both the sum and the denominator unchanged.
///
/// Every neighbor must have rated `item_id`; one who has not is reported as
/// [`PredictionError::MissingNeighborRating`]. When the total weight is zero the
/// result is [`PredictionError::NoSignal`].
pub fn aggregate_prediction<S>(
    source: &S,
    item_id: ItemId,
    neighbors: &[Similarity],
    scale: RatingScale,
) -> Result<f64, PredictionError>
where
    S: RatingSource + ?Sized,
{
    let complement_base = f64::from(scale.complement_base());
    let mut positive = 0.0;
    let mut negative = 0.0;
    let mut denominator = 0.0;

    for neighbor in neighbors {
        let score = source
            .score_of(neighbor.user_id, item_id)
            .map_err(|_| PredictionError::MissingNeighborRating {
                user_id: neighbor.user_id,
                item_id,
            })?;
        let score = f64::from(score);
        let r = neighbor.coefficient;

        if r > 0.0 {
            positive += r * score;
        } else {
            negative += -r * (complement_base - score);
        }
        denominator += r.abs();
    }

    if denominator == 0.0 {
        return Err(PredictionError::NoSignal { item_id });
    }

    Ok((positive + negative) / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::RatingSnapshot,
        models::{Rating, UserId},
    };

    const ITEM: ItemId = ItemId(242);

    fn similarity(user: i32, coefficient: f64) -> Similarity {
        Similarity {
            user_id: UserId(user),
            coefficient,
        }
    }

    fn snapshot(scores: &[(i32, i32)]) -> RatingSnapshot {
        scores
            .iter()
            .map(|&(user, score)| Rating::new(UserId(user), ITEM, score))
            .collect()
    }

    #[test]
    fn test_mixed_correlations() {
        let source = snapshot(&[(1, 5), (2, 5)]);
        let neighbors = [similarity(1, 0.8), similarity(2, -0.5)];

        let predicted =
            aggregate_prediction(&source, ITEM, &neighbors, RatingScale::default()).unwrap();

        // (0.8 * 5 + 0.5 * (6 - 5)) / 1.3
        assert!((predicted - 4.5 / 1.3).abs() < 1e-12);
        assert!((predicted - 3.4615).abs() < 1e-4);
    }

    #[test]
    fn test_only_positive_is_weighted_mean() {
        let source = snapshot(&[(1, 4), (2, 2)]);
        let neighbors = [similarity(1, 0.75), similarity(2, 0.25)];

        let predicted =
            aggregate_prediction(&source, ITEM, &neighbors, RatingScale::default()).unwrap();
        assert!((predicted - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_negative_neighbor_is_reflected() {
        let source = snapshot(&[(1, 1)]);
        let neighbors = [similarity(1, -1.0)];

        let predicted =
            aggregate_prediction(&source, ITEM, &neighbors, RatingScale::default()).unwrap();
        assert!((predicted - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_complement_follows_scale() {
        let source = snapshot(&[(1, 2)]);
        let neighbors = [similarity(1, -0.5)];

        let predicted =
            aggregate_prediction(&source, ITEM, &neighbors, RatingScale::new(1, 10)).unwrap();
        assert!((predicted - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_correlation_is_neutral() {
        let source = snapshot(&[(1, 4), (2, 1)]);
        let with_zero = [similarity(1, 0.5), similarity(2, 0.0)];
        let without_zero = [similarity(1, 0.5)];

        let a = aggregate_prediction(&source, ITEM, &with_zero, RatingScale::default()).unwrap();
        let b =
            aggregate_prediction(&source, ITEM, &without_zero, RatingScale::default()).unwrap();
        assert_eq!(a, b);
        assert!((a - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_neighbors_has_no_signal() {
        let source = snapshot(&[]);
        assert_eq!(
            aggregate_prediction(&source, ITEM, &[], RatingScale::default()),
            Err(PredictionError::NoSignal { item_id: ITEM })
        );
    }

    #[test]
    fn test_all_zero_correlations_have_no_signal() {
        let source = snapshot(&[(1, 3), (2, 4)]);
        let neighbors = [similarity(1, 0.0), similarity(2, 0.0)];
        assert_eq!(
            aggregate_prediction(&source, ITEM, &neighbors, RatingScale::default()),
            Err(PredictionError::NoSignal { item_id: ITEM })
        );
    }

    #[test]
    fn test_missing_neighbor_rating() {
        let source = snapshot(&[(1, 3)]);
        let neighbors = [similarity(1, 0.4), similarity(7, 0.9)];
        assert_eq!(
            aggregate_prediction(&source, ITEM, &neighbors, RatingScale::default()),
            Err(PredictionError::MissingNeighborRating {
                user_id: UserId(7),
                item_id: ITEM,
            })
        );
    }

    #[test]
    fn test_result_is_not_clamped() {
        // Far outside the scale on purpose: clamping belongs to the caller
        let source = snapshot(&[(1, 9)]);
        let neighbors = [similarity(1, 0.3)];
        let predicted =
            aggregate_prediction(&source, ITEM, &neighbors, RatingScale::default()).unwrap();
        assert!((predicted - 9.0).abs() < 1e-12);
    }
}
