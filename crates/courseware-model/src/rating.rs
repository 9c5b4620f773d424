//! Course rating aggregation.

use serde::{Deserialize, Serialize};

pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

/// A single learner rating of a course or class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: String,
    pub stars: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Aggregated view over a set of ratings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Number of ratings with a valid star value.
    pub count: usize,
    /// Mean star value, 0.0 when there are no valid ratings.
    pub average: f64,
    /// Ratings per star value; index 0 holds one-star ratings.
    pub distribution: [usize; MAX_STARS as usize],
    /// Ratings ignored because their star value was out of range.
    pub rejected: usize,
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        let mut summary = Self::default();
        let mut total: u64 = 0;
        for rating in ratings {
            if !(MIN_STARS..=MAX_STARS).contains(&rating.stars) {
                summary.rejected += 1;
                continue;
            }
            summary.count += 1;
            summary.distribution[usize::from(rating.stars - MIN_STARS)] += 1;
            total += u64::from(rating.stars);
        }
        if summary.count > 0 {
            summary.average = total as f64 / summary.count as f64;
        }
        summary
    }

    /// Average rounded to one decimal place for display.
    pub fn display_average(&self) -> f64 {
        (self.average * 10.0).round() / 10.0
    }

    /// Share of ratings with the given star value, in percent.
    pub fn share_percent(&self, stars: u8) -> u32 {
        if self.count == 0 || !(MIN_STARS..=MAX_STARS).contains(&stars) {
            return 0;
        }
        let bucket = self.distribution[usize::from(stars - MIN_STARS)];
        ((bucket as f64 / self.count as f64) * 100.0).round() as u32
    }
}
