//! Flattened output rows
//!
//! One row per eligible (repository, pull request) pair. The column set is
//! fixed for the life of a run; serde field names are the CSV headers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{PullRequestRecord, PullState, RepositorySummary};

#[derive(Debug, Clone, Serialize)]
pub struct OutputRow {
    pub repo_name: String,
    pub repo_owner: String,
    pub repo_url: String,
    pub repo_stars: i64,
    #[serde(rename = "repo_createdAt")]
    pub repo_created_at: DateTime<Utc>,
    #[serde(rename = "repo_pushedAt")]
    pub repo_pushed_at: Option<DateTime<Utc>>,
    #[serde(rename = "repo_isFork")]
    pub repo_is_fork: bool,
    #[serde(rename = "repo_isArchived")]
    pub repo_is_archived: bool,
    pub repo_releases: i64,
    #[serde(rename = "repo_defaultBranch")]
    pub repo_default_branch: Option<String>,
    pub pr_number: i64,
    pub pr_title: String,
    pub pr_url: String,
    pub pr_author: Option<String>,
    pub pr_state: PullState,
    #[serde(rename = "pr_createdAt")]
    pub pr_created_at: DateTime<Utc>,
    #[serde(rename = "pr_closedAt")]
    pub pr_closed_at: Option<DateTime<Utc>>,
    #[serde(rename = "pr_mergedAt")]
    pub pr_merged_at: Option<DateTime<Utc>>,
    pub pr_reviews: i64,
    pub pr_description_len: usize,
    pub pr_participants: i64,
    pub pr_comments: i64,
    pub pr_additions: i64,
    pub pr_deletions: i64,
    pub pr_changed_files: i64,
}

impl OutputRow {
    pub fn new(repo: &RepositorySummary, pr: &PullRequestRecord) -> Self {
        Self {
            repo_name: repo.name.clone(),
            repo_owner: repo.owner.clone(),
            repo_url: repo.url.clone(),
            repo_stars: repo.stars,
            repo_created_at: repo.created_at,
            repo_pushed_at: repo.pushed_at,
            repo_is_fork: repo.is_fork,
            repo_is_archived: repo.is_archived,
            repo_releases: repo.releases,
            repo_default_branch: repo.default_branch.clone(),
            pr_number: pr.number,
            pr_title: pr.title.clone(),
            pr_url: pr.url.clone(),
            pr_author: pr.author.clone(),
            pr_state: pr.state,
            pr_created_at: pr.created_at,
            pr_closed_at: pr.closed_at,
            pr_merged_at: pr.merged_at,
            pr_reviews: pr.reviews,
            pr_description_len: pr.description_len,
            pr_participants: pr.participants,
            pr_comments: pr.comments,
            pr_additions: pr.additions,
            pr_deletions: pr.deletions,
            pr_changed_files: pr.changed_files,
        }
    }
}
