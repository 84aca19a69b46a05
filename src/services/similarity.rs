use ndarray::Array2;
use std::collections::HashMap;

use super::matrix::RatingMatrix;
use crate::models::VideoId;

/// Item-item cosine similarity over the columns of a [`RatingMatrix`]
///
/// Uses the same column positions as the matrix it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    video_index: HashMap<VideoId, usize>,
    values: Array2<f64>,
}

impl SimilarityMatrix {
    /// Computes the full symmetric similarity matrix
    ///
    /// A video with no ratings has zero magnitude and similarity 0 to every
    /// video, itself included. Cost is O(videos^2 * users).
    pub fn compute(matrix: &RatingMatrix) -> Self {
        let n = matrix.videos().len();
        let norms: Vec<f64> = (0..n)
            .map(|col| {
                let column = matrix.video_column(col);
                column.dot(&column).sqrt()
            })
            .collect();

        let mut values = Array2::<f64>::zeros((n, n));
        for a in 0..n {
            if norms[a] == 0.0 {
                continue;
            }
            let column_a = matrix.video_column(a);
            values[[a, a]] = 1.0;
            for b in (a + 1)..n {
                if norms[b] == 0.0 {
                    continue;
                }
                let dot = column_a.dot(&matrix.video_column(b));
                let sim = dot / (norms[a] * norms[b]);
                values[[a, b]] = sim;
                values[[b, a]] = sim;
            }
        }

        let video_index = matrix
            .videos()
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        Self {
            video_index,
            values,
        }
    }

    /// Similarity by video id, 0 for unknown videos
    pub fn get(&self, video_a: &VideoId, video_b: &VideoId) -> f64 {
        match (self.video_index.get(video_a), self.video_index.get(video_b)) {
            (Some(&a), Some(&b)) => self.values[[a, b]],
            _ => 0.0,
        }
    }

    pub fn at(&self, a: usize, b: usize) -> f64 {
        self.values[[a, b]]
    }

    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
