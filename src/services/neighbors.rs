use crate::{
    db::RatingSource,
    models::{Similarity, UserId},
};

use super::{pairing::pair_with_history, pearson::pearson};

/// Computes the similarity between the target user and each candidate
///
/// The target itself is filtered out of `candidates` first. Candidates with no
/// shared items or an undefined correlation are skipped. Output keeps the
/// candidates' order.
pub fn rank_neighbors<S>(source: &S, target: UserId, candidates: &[UserId]) -> Vec<Similarity>
where
    S: RatingSource + ?Sized,
{
    let others: Vec<UserId> = candidates
        .iter()
        .copied()
        .filter(|&candidate| candidate != target)
        .collect();

    let history = source.ratings_for_user(target);

    others
        .into_iter()
        .filter_map(|user_id| {
            let pairs = pair_with_history(&history, source, user_id);
            if pairs.is_empty() {
                return None;
            }

            match pearson(&pairs) {
                Some(coefficient) => Some(Similarity {
                    user_id,
                    coefficient,
                }),
                None => {
                    tracing::trace!(
                        target_user = %target,
                        user_id = %user_id,
                        shared = pairs.len(),
                        "Undefined similarity, skipping neighbor"
                    );
                    None
                }
            }
        })
        .collect()
}
