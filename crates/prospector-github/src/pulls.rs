//! PR fetcher — walks one repository's merged/closed pull requests

use indicatif::ProgressBar;
use prospector_core::page::{Page, Paginator};
use prospector_core::{ApiError, execute_with_retry};

use crate::client::GraphQLClient;
use crate::config::CollectConfig;
use crate::queries;
use crate::types::{PullRequestRecord, PullsData};

/// Fetch a repository's pull requests, newest first, unfiltered.
///
/// The walk is capped at `config.max_pr_pages` pages; repositories with
/// deeper history than the cap are truncated, and the truncation is logged
/// so it never passes silently.
pub fn fetch_pull_requests(
    client: &GraphQLClient,
    owner: &str,
    name: &str,
    config: &CollectConfig,
    pb: &ProgressBar,
) -> Result<Vec<PullRequestRecord>, ApiError> {
    let label = format!("{owner}/{name}");

    let fetch = |cursor: Option<&str>| -> Result<Page<PullRequestRecord>, ApiError> {
        let data: PullsData = execute_with_retry(&label, &config.retry, || {
            client.execute(
                queries::REPOSITORY_PULL_REQUESTS,
                serde_json::json!({
                    "owner": owner,
                    "name": name,
                    "cursor": cursor,
                    "pageSize": config.pr_page_size,
                }),
            )
        })?;
        let pulls = data
            .repository
            .ok_or_else(|| ApiError::Malformed(format!("repository {label} missing from response")))?
            .pull_requests;
        Ok(Page {
            items: pulls.nodes.into_iter().map(PullRequestRecord::from).collect(),
            page_info: pulls.page_info.into(),
        })
    };

    let mut pager = Paginator::new(fetch, config.throttle).page_cap(config.max_pr_pages);
    let mut records = Vec::new();
    let mut pages = 0usize;
    while let Some(page) = pager.next() {
        records.extend(page?);
        pages += 1;
        pb.set_message(format!("page {pages}, {} PRs fetched", records.len()));
        log::debug!("{label}: page {pages}, {} PRs fetched", records.len());
    }
    if pager.hit_page_cap() {
        log::warn!(
            "{label}: stopped after {} pages; deeper history not fetched",
            config.max_pr_pages
        );
    }

    Ok(records)
}
