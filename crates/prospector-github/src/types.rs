//! Response envelopes and domain records
//!
//! The `*Data` / `*Connection` types mirror the GraphQL payload shapes;
//! `RepositorySummary` and `PullRequestRecord` are the in-memory records
//! the pipeline actually passes around. Both records are immutable once
//! converted from a response node.

use chrono::{DateTime, Utc};
use prospector_core::page::PageCursor;
use serde::{Deserialize, Serialize};

// === Shared payload fragments ===

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

impl From<PageInfo> for PageCursor {
    fn from(info: PageInfo) -> Self {
        Self {
            end_cursor: info.end_cursor,
            has_next_page: info.has_next_page,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    pub login: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

// === Repository search payload ===

#[derive(Debug, Deserialize)]
pub struct SearchData {
    pub search: SearchConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConnection {
    #[serde(default)]
    pub edges: Vec<SearchEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct SearchEdge {
    pub node: RepositoryNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_fork: bool,
    #[serde(default)]
    pub is_archived: bool,
    pub stargazer_count: i64,
    pub owner: Actor,
    #[serde(default)]
    pub releases: TotalCount,
    pub default_branch_ref: Option<NamedRef>,
    pub pull_requests: TotalCount,
}

// === Pull request payload ===

#[derive(Debug, Deserialize)]
pub struct PullsData {
    pub repository: Option<RepositoryPulls>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryPulls {
    pub pull_requests: PullConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullConnection {
    pub total_count: i64,
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<PullNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullNode {
    pub number: i64,
    pub title: String,
    pub url: String,
    pub state: PullState,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub author: Option<Actor>,
    #[serde(default)]
    pub body_text: Option<String>,
    pub reviews: TotalCount,
    pub participants: TotalCount,
    pub comments: TotalCount,
    pub additions: i64,
    pub deletions: i64,
    pub changed_files: i64,
}

/// Only MERGED and CLOSED are ever requested from upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PullState {
    Merged,
    Closed,
}

// === Domain records ===

/// One candidate repository from the search phase.
#[derive(Debug, Clone)]
pub struct RepositorySummary {
    pub owner: String,
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub is_fork: bool,
    pub is_archived: bool,
    pub stars: i64,
    pub releases: i64,
    pub default_branch: Option<String>,
    /// Merged + closed PR count, used for the qualification threshold
    pub pull_request_total: i64,
}

impl RepositorySummary {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl From<RepositoryNode> for RepositorySummary {
    fn from(node: RepositoryNode) -> Self {
        Self {
            owner: node.owner.login,
            name: node.name,
            url: node.url,
            created_at: node.created_at,
            pushed_at: node.pushed_at,
            is_fork: node.is_fork,
            is_archived: node.is_archived,
            stars: node.stargazer_count,
            releases: node.releases.total_count,
            default_branch: node.default_branch_ref.map(|r| r.name),
            pull_request_total: node.pull_requests.total_count,
        }
    }
}

/// One merged or closed pull request, unfiltered.
#[derive(Debug, Clone)]
pub struct PullRequestRecord {
    pub number: i64,
    pub title: String,
    pub url: String,
    /// Absent when the author's account was deleted
    pub author: Option<String>,
    pub state: PullState,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub reviews: i64,
    pub description_len: usize,
    pub participants: i64,
    pub comments: i64,
    pub additions: i64,
    pub deletions: i64,
    pub changed_files: i64,
}

impl From<PullNode> for PullRequestRecord {
    fn from(node: PullNode) -> Self {
        Self {
            number: node.number,
            title: node.title,
            url: node.url,
            author: node.author.map(|a| a.login),
            state: node.state,
            created_at: node.created_at,
            closed_at: node.closed_at,
            merged_at: node.merged_at,
            reviews: node.reviews.total_count,
            description_len: node
                .body_text
                .as_deref()
                .unwrap_or("")
                .chars()
                .count(),
            participants: node.participants.total_count,
            comments: node.comments.total_count,
            additions: node.additions,
            deletions: node.deletions,
            changed_files: node.changed_files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_search_page() {
        let payload = serde_json::json!({
            "search": {
                "edges": [{
                    "node": {
                        "name": "linux",
                        "url": "https://github.com/torvalds/linux",
                        "createdAt": "2011-09-04T22:48:12Z",
                        "pushedAt": "2024-06-01T00:00:00Z",
                        "isFork": false,
                        "isArchived": false,
                        "stargazerCount": 170000,
                        "owner": { "login": "torvalds" },
                        "releases": { "totalCount": 0 },
                        "defaultBranchRef": { "name": "master" },
                        "pullRequests": { "totalCount": 1234 }
                    }
                }],
                "pageInfo": { "hasNextPage": true, "endCursor": "Y3Vyc29yOjIw" }
            }
        });
        let data: SearchData = serde_json::from_value(payload).unwrap();
        assert_eq!(data.search.edges.len(), 1);
        assert!(data.search.page_info.has_next_page);

        let repo = RepositorySummary::from(
            data.search.edges.into_iter().next().unwrap().node,
        );
        assert_eq!(repo.full_name(), "torvalds/linux");
        assert_eq!(repo.stars, 170000);
        assert_eq!(repo.default_branch.as_deref(), Some("master"));
        assert_eq!(repo.pull_request_total, 1234);
    }

    #[test]
    fn deserialize_repo_without_default_branch() {
        let payload = serde_json::json!({
            "name": "empty",
            "url": "https://github.com/o/empty",
            "createdAt": "2020-01-01T00:00:00Z",
            "pushedAt": null,
            "stargazerCount": 2000,
            "owner": { "login": "o" },
            "defaultBranchRef": null,
            "pullRequests": { "totalCount": 0 }
        });
        let node: RepositoryNode = serde_json::from_value(payload).unwrap();
        let repo = RepositorySummary::from(node);
        assert!(repo.pushed_at.is_none());
        assert!(repo.default_branch.is_none());
        assert_eq!(repo.releases, 0);
        assert!(!repo.is_fork);
    }

    fn pull_node_json() -> serde_json::Value {
        serde_json::json!({
            "number": 42,
            "title": "Fix the frobnicator",
            "url": "https://github.com/o/r/pull/42",
            "state": "MERGED",
            "createdAt": "2024-01-01T00:00:00Z",
            "closedAt": "2024-01-02T00:00:00Z",
            "mergedAt": "2024-01-02T00:00:00Z",
            "author": { "login": "octocat" },
            "bodyText": "Fixes the frobnicator by re-aligning the splines.",
            "reviews": { "totalCount": 3 },
            "participants": { "totalCount": 4 },
            "comments": { "totalCount": 7 },
            "additions": 120,
            "deletions": 30,
            "changedFiles": 5
        })
    }

    #[test]
    fn deserialize_pull_page() {
        let payload = serde_json::json!({
            "repository": {
                "pullRequests": {
                    "totalCount": 500,
                    "pageInfo": { "hasNextPage": false, "endCursor": null },
                    "nodes": [pull_node_json()]
                }
            }
        });
        let data: PullsData = serde_json::from_value(payload).unwrap();
        let pulls = data.repository.unwrap().pull_requests;
        assert_eq!(pulls.total_count, 500);
        assert!(!pulls.page_info.has_next_page);

        let pr = PullRequestRecord::from(pulls.nodes.into_iter().next().unwrap());
        assert_eq!(pr.number, 42);
        assert_eq!(pr.author.as_deref(), Some("octocat"));
        assert_eq!(pr.state, PullState::Merged);
        assert_eq!(pr.reviews, 3);
        assert_eq!(pr.changed_files, 5);
    }

    #[test]
    fn deleted_author_and_missing_body() {
        let mut node = pull_node_json();
        node["author"] = serde_json::Value::Null;
        node["bodyText"] = serde_json::Value::Null;
        node["state"] = serde_json::json!("CLOSED");
        node["mergedAt"] = serde_json::Value::Null;

        let pr = PullRequestRecord::from(serde_json::from_value::<PullNode>(node).unwrap());
        assert!(pr.author.is_none());
        assert_eq!(pr.description_len, 0);
        assert_eq!(pr.state, PullState::Closed);
        assert!(pr.merged_at.is_none());
    }

    #[test]
    fn description_len_counts_chars() {
        let mut node = pull_node_json();
        node["bodyText"] = serde_json::json!("héllo");
        let pr = PullRequestRecord::from(serde_json::from_value::<PullNode>(node).unwrap());
        assert_eq!(pr.description_len, 5);
    }

    #[test]
    fn unknown_state_rejected() {
        let mut node = pull_node_json();
        node["state"] = serde_json::json!("OPEN");
        assert!(serde_json::from_value::<PullNode>(node).is_err());
    }

    #[test]
    fn page_info_converts_to_cursor() {
        let info = PageInfo {
            has_next_page: true,
            end_cursor: Some("abc".to_string()),
        };
        let cursor = PageCursor::from(info);
        assert!(cursor.has_next_page);
        assert_eq!(cursor.end_cursor.as_deref(), Some("abc"));
    }
}
