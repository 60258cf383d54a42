//! Eligibility rule for collected pull requests
//!
//! Drops unreviewed PRs and rubber-stamp resolutions — both carry no
//! signal for the downstream analysis.

use std::time::Duration;

use crate::types::PullRequestRecord;

/// Thresholds for keeping a pull request in the output.
#[derive(Debug, Clone)]
pub struct FilterRule {
    /// At least this many reviews
    pub min_reviews: i64,
    /// Resolution must take strictly longer than this
    pub min_resolution: Duration,
}

impl Default for FilterRule {
    fn default() -> Self {
        Self {
            min_reviews: 1,
            min_resolution: Duration::from_secs(3600),
        }
    }
}

impl FilterRule {
    /// Pure predicate: no side effects, no network.
    ///
    /// Resolution time is `closed_at` when present, else `merged_at`; a
    /// record with neither has no defined resolution and is ineligible.
    pub fn is_eligible(&self, pr: &PullRequestRecord) -> bool {
        if pr.reviews < self.min_reviews {
            return false;
        }
        let Some(resolved) = pr.closed_at.or(pr.merged_at) else {
            return false;
        };
        let elapsed = (resolved - pr.created_at).num_seconds();
        elapsed > self.min_resolution.as_secs() as i64
    }
}
