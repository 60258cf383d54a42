//! Collection tunables
//!
//! Everything here is static configuration fixed for the life of a run;
//! nothing is renegotiated at runtime.

use std::time::Duration;

use prospector_core::RetryPolicy;

use crate::filter::FilterRule;

/// Tunables for one collection run.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    /// Search predicate handed to the upstream sort
    pub search_query: String,
    /// Target repository count (fewer if upstream exhausts first)
    pub max_repos: usize,
    /// Page size for the repository search
    pub repo_page_size: u32,
    /// Page size for per-repository pull requests (upstream max 100)
    pub pr_page_size: u32,
    /// Safety cap on PR pages walked per repository; bounds worst-case
    /// latency for repositories with very deep history
    pub max_pr_pages: usize,
    /// Repositories below this merged+closed PR count are never scheduled
    pub min_pull_requests: i64,
    /// Concurrent worker tasks
    pub workers: usize,
    /// Minimum delay between successive page fetches
    pub throttle: Duration,
    pub retry: RetryPolicy,
    pub filter: FilterRule,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            search_query: "stars:>1000 sort:stars-desc".to_string(),
            max_repos: 200,
            repo_page_size: 20,
            pr_page_size: 100,
            max_pr_pages: 50,
            min_pull_requests: 100,
            workers: 8,
            throttle: Duration::from_millis(300),
            retry: RetryPolicy::default(),
            filter: FilterRule::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = CollectConfig::default();
        assert_eq!(config.max_repos, 200);
        assert_eq!(config.pr_page_size, 100);
        assert_eq!(config.min_pull_requests, 100);
        assert!(config.workers >= 1);
        assert!(!config.throttle.is_zero());
    }
}
