//! Repository lister — walks the search connection for candidates

use prospector_core::page::{Page, Paginator};
use prospector_core::{ApiError, ProgressContext, execute_with_retry};

use crate::client::GraphQLClient;
use crate::config::CollectConfig;
use crate::queries;
use crate::types::{RepositorySummary, SearchData};

/// Enumerate candidate repositories, most popular first, truncated to
/// `config.max_repos`. Fewer upstream matches than the target is not an
/// error — the smaller set is returned as-is.
pub fn list_repositories(
    client: &GraphQLClient,
    config: &CollectConfig,
    progress: &ProgressContext,
) -> Result<Vec<RepositorySummary>, ApiError> {
    let pb = progress.stage_line("search");
    pb.set_message("querying most-starred repositories...");

    let fetch = |cursor: Option<&str>| -> Result<Page<RepositorySummary>, ApiError> {
        let data: SearchData = execute_with_retry("repository search", &config.retry, || {
            client.execute(
                queries::SEARCH_REPOSITORIES,
                serde_json::json!({
                    "searchQuery": config.search_query,
                    "cursor": cursor,
                    "pageSize": config.repo_page_size,
                }),
            )
        })?;
        Ok(Page {
            items: data
                .search
                .edges
                .into_iter()
                .map(|edge| RepositorySummary::from(edge.node))
                .collect(),
            page_info: data.search.page_info.into(),
        })
    };

    let pager = Paginator::new(fetch, config.throttle).item_cap(config.max_repos);
    let mut repos = Vec::new();
    for page in pager {
        let items = match page {
            Ok(items) => items,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };
        repos.extend(items);
        log::info!("collected {} repositories", repos.len());
        pb.set_message(format!("{} repositories", repos.len()));
    }
    pb.finish_and_clear();

    Ok(repos)
}
