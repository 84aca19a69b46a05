use std::cmp::Ordering;

use super::matrix::RatingMatrix;
use super::predictor::predict_at;
use super::similarity::SimilarityMatrix;
use crate::models::Recommendation;

/// Top-N recommendations for one user
///
/// Every video the user has not rated is scored with the k-NN predictor and the
/// best `top_n` are returned, highest score first. Equal scores are ordered by
/// video id ascending. An unknown user gets an empty list.
///
/// Cost per user is O(videos * (videos + k log k)).
pub fn rank(
    user_id: &str,
    matrix: &RatingMatrix,
    similarity: &SimilarityMatrix,
    k: usize,
    top_n: usize,
) -> Vec<Recommendation> {
    let Some(row) = matrix.user_position(user_id) else {
        return Vec::new();
    };

    let ratings = matrix.user_row(row);
    let mut scored: Vec<(usize, f64)> = ratings
        .indexed_iter()
        .filter(|&(_, &rating)| rating == 0.0)
        .map(|(col, _)| (col, predict_at(row, col, matrix, similarity, k)))
        .collect();

    // Columns are in ascending video id order, so comparing positions breaks ties by id
    scored.sort_by(|a, b| by_score_desc(a.1, b.1).then_with(|| a.0.cmp(&b.0)));
    scored.truncate(top_n);

    let videos = matrix.videos();
    scored
        .into_iter()
        .map(|(col, score)| Recommendation::new(videos[col].clone(), score))
        .collect()
}

fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
