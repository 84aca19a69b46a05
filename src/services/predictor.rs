use super::matrix::RatingMatrix;
use super::similarity::SimilarityMatrix;
use crate::models::VideoId;

/// Estimates a user's rating for a video from their ratings of similar videos
///
/// Takes the `k` rated videos most similar to the target (excluding the target
/// itself) and returns the similarity-weighted mean of the user's ratings for
/// them. Returns `0.0` when the user or video is unknown, when the user has no
/// other rated videos, or when the selected similarities sum to zero.
pub fn predict(
    user_id: &str,
    target_video_id: &VideoId,
    matrix: &RatingMatrix,
    similarity: &SimilarityMatrix,
    k: usize,
) -> f64 {
    match (
        matrix.user_position(user_id),
        matrix.video_position(target_video_id),
    ) {
        (Some(row), Some(target)) => predict_at(row, target, matrix, similarity, k),
        _ => 0.0,
    }
}

/// Position-based form of [`predict`] used by the ranker
pub(crate) fn predict_at(
    row: usize,
    target: usize,
    matrix: &RatingMatrix,
    similarity: &SimilarityMatrix,
    k: usize,
) -> f64 {
    let ratings = matrix.user_row(row);

    let mut neighbours: Vec<(usize, f64)> = ratings
        .indexed_iter()
        .filter(|&(col, &rating)| col != target && rating > 0.0)
        .map(|(col, _)| (col, similarity.at(target, col)))
        .collect();

    // Most similar first; equal similarities keep column (video id) order
    neighbours.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    neighbours.truncate(k);

    let (weighted, weights) = neighbours
        .iter()
        .fold((0.0, 0.0), |(weighted, weights), &(col, sim)| {
            (weighted + sim * ratings[col], weights + sim)
        });

    if weights == 0.0 {
        0.0
    } else {
        weighted / weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(rows: &[(&str, &str, f64)]) -> (RatingMatrix, SimilarityMatrix) {
        let matrix = RatingMatrix::build(
            rows.iter()
                .map(|(u, v, r)| (u.to_string(), (*v).into(), *r)),
        );
        let similarity = SimilarityMatrix::compute(&matrix);
        (matrix, similarity)
    }

    #[test]
    fn test_weighted_average_of_neighbours() {
        let (matrix, similarity) = setup(&[
            ("u1", "a", 5.0),
            ("u1", "b", 1.5),
            ("u2", "b", 5.0),
            ("u2", "c", 5.0),
        ]);

        // Only b is similar to c for u1, so the prediction is u1's rating of b
        let predicted = predict("u1", &"c".into(), &matrix, &similarity, 5);
        assert!((predicted - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_matches_manual_computation() {
        let (matrix, similarity) = setup(&[
            ("u1", "a", 4.0),
            ("u1", "b", 2.0),
            ("u2", "a", 1.0),
            ("u2", "c", 3.0),
            ("u3", "b", 5.0),
            ("u3", "c", 2.0),
        ]);

        let s_ca = similarity.get(&"c".into(), &"a".into());
        let s_cb = similarity.get(&"c".into(), &"b".into());
        let expected = (s_ca * 4.0 + s_cb * 2.0) / (s_ca + s_cb);

        let predicted = predict("u1", &"c".into(), &matrix, &similarity, 2);
        assert!((predicted - expected).abs() < 1e-12);
    }

    #[test]
    fn test_k_limits_neighbours() {
        let (matrix, similarity) = setup(&[
            ("u1", "a", 4.0),
            ("u1", "b", 2.0),
            ("u2", "a", 1.0),
            ("u2", "c", 3.0),
            ("u3", "b", 5.0),
            ("u3", "c", 2.0),
        ]);

        let s_ca = similarity.get(&"c".into(), &"a".into());
        let s_cb = similarity.get(&"c".into(), &"b".into());
        let best_rating = if s_ca >= s_cb { 4.0 } else { 2.0 };

        let predicted = predict("u1", &"c".into(), &matrix, &similarity, 1);
        assert!((predicted - best_rating).abs() < 1e-12);
    }

    #[test]
    fn test_tied_neighbours_at_k_boundary_keep_id_order() {
        // a and b mirror each other across u2/u3 and u1/u4, so both are
        // exactly as similar to t while u1 rates them differently
        let (matrix, similarity) = setup(&[
            ("u1", "a", 5.0),
            ("u1", "b", 1.0),
            ("u2", "a", 2.0),
            ("u2", "b", 3.0),
            ("u2", "t", 1.0),
            ("u3", "a", 3.0),
            ("u3", "b", 2.0),
            ("u3", "t", 1.0),
            ("u4", "a", 1.0),
            ("u4", "b", 5.0),
        ]);

        let s_ta = similarity.get(&"t".into(), &"a".into());
        let s_tb = similarity.get(&"t".into(), &"b".into());
        assert!(s_ta > 0.0);
        assert_eq!(s_ta, s_tb);

        // Only one neighbour fits; the tie goes to the lower id
        let top_one = predict("u1", &"t".into(), &matrix, &similarity, 1);
        assert!((top_one - 5.0).abs() < 1e-12);

        let top_two = predict("u1", &"t".into(), &matrix, &similarity, 2);
        assert!((top_two - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_similar_neighbours_yields_zero() {
        let (matrix, similarity) = setup(&[("u1", "a", 5.0), ("u2", "b", 5.0)]);
        assert_eq!(predict("u1", &"b".into(), &matrix, &similarity, 3), 0.0);
    }

    #[test]
    fn test_k_zero_yields_zero() {
        let (matrix, similarity) = setup(&[("u1", "a", 5.0), ("u1", "b", 5.0), ("u2", "b", 1.0)]);
        assert_eq!(predict("u2", &"a".into(), &matrix, &similarity, 0), 0.0);
    }

    #[test]
    fn test_target_excluded_from_neighbours() {
        // u1 rated only the target, so there is nothing to predict from
        let (matrix, similarity) = setup(&[("u1", "a", 5.0), ("u2", "a", 3.0), ("u2", "b", 3.0)]);
        assert_eq!(predict("u1", &"a".into(), &matrix, &similarity, 3), 0.0);
    }

    #[test]
    fn test_unknown_user_or_video() {
        let (matrix, similarity) = setup(&[("u1", "a", 5.0)]);
        assert_eq!(predict("ghost", &"a".into(), &matrix, &similarity, 3), 0.0);
        assert_eq!(predict("u1", &"ghost".into(), &matrix, &similarity, 3), 0.0);
    }
}
