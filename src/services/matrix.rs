use ndarray::{Array2, ArrayView1};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{UserId, VideoId};

/// Dense user x video rating matrix
///
/// Rows are users and columns are videos, both sorted by id so positions are
/// stable for the lifetime of the matrix. A cell of `0.0` means "not rated";
/// a rating that averages to exactly zero is indistinguishable from no rating.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    users: Vec<UserId>,
    videos: Vec<VideoId>,
    user_index: HashMap<UserId, usize>,
    video_index: HashMap<VideoId, usize>,
    values: Array2<f64>,
}

impl RatingMatrix {
    /// Builds the matrix from `(user, video, rating)` triples
    ///
    /// Duplicate `(user, video)` pairs are averaged.
    pub fn build<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = (UserId, VideoId, f64)>,
    {
        let mut sums: BTreeMap<(UserId, VideoId), (f64, usize)> = BTreeMap::new();
        let mut videos: BTreeSet<VideoId> = BTreeSet::new();

        for (user_id, video_id, rating) in ratings {
            videos.insert(video_id.clone());
            let entry = sums.entry((user_id, video_id)).or_insert((0.0, 0));
            entry.0 += rating;
            entry.1 += 1;
        }

        let users: Vec<UserId> = sums
            .keys()
            .map(|(user_id, _)| user_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let videos: Vec<VideoId> = videos.into_iter().collect();

        let user_index: HashMap<UserId, usize> = users
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        let video_index: HashMap<VideoId, usize> = videos
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut values = Array2::<f64>::zeros((users.len(), videos.len()));
        for ((user_id, video_id), (sum, count)) in &sums {
            let row = user_index[user_id];
            let col = video_index[video_id];
            values[[row, col]] = sum / *count as f64;
        }

        Self {
            users,
            videos,
            user_index,
            video_index,
            values,
        }
    }

    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn videos(&self) -> &[VideoId] {
        &self.videos
    }

    pub fn user_position(&self, user_id: &str) -> Option<usize> {
        self.user_index.get(user_id).copied()
    }

    pub fn video_position(&self, video_id: &VideoId) -> Option<usize> {
        self.video_index.get(video_id).copied()
    }

    /// Rating for a pair, `0.0` when unknown or unrated
    pub fn rating(&self, user_id: &str, video_id: &VideoId) -> f64 {
        match (self.user_position(user_id), self.video_position(video_id)) {
            (Some(row), Some(col)) => self.values[[row, col]],
            _ => 0.0,
        }
    }

    /// All ratings of one user, indexed by video position
    pub fn user_row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    /// All ratings of one video, indexed by user position
    pub fn video_column(&self, col: usize) -> ArrayView1<'_, f64> {
        self.values.column(col)
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
