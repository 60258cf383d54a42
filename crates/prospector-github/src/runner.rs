//! Collection pipeline orchestration
//!
//! Lists candidates, drops those below the PR-count threshold before any
//! task is created, then fans the rest out across a bounded worker pool.
//! Each completed task's rows go to the sink immediately, in completion
//! order; a failed task is logged with its repository and never disturbs
//! its siblings.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::Context;
use indicatif::ProgressBar;
use prospector_core::{ApiError, CsvSink, ProgressContext, WorkQueue, is_shutdown_requested};

use crate::client::GraphQLClient;
use crate::config::CollectConfig;
use crate::pulls::fetch_pull_requests;
use crate::repos::list_repositories;
use crate::row::OutputRow;
use crate::types::RepositorySummary;

/// Run the whole collection pipeline.
pub fn run(
    client: &GraphQLClient,
    config: &CollectConfig,
    sink: &CsvSink,
    progress: &ProgressContext,
) -> anyhow::Result<RunSummary> {
    let start = Instant::now();

    let repos =
        list_repositories(client, config, progress).context("repository search failed")?;
    let listed = repos.len();
    log::info!("{listed} candidate repositories");

    let queue = WorkQueue::filtered(repos, |r| r.pull_request_total >= config.min_pull_requests);
    let qualifying = queue.total();
    log::info!(
        "{qualifying} of {listed} repositories meet the {}-PR threshold",
        config.min_pull_requests
    );

    let overall = progress.overall_bar(qualifying as u64);
    let (completed, failed) = fan_out(
        &queue,
        config.workers,
        sink,
        progress,
        &overall,
        |repo, pb| process_repository(client, config, repo, pb),
    );
    overall.finish_and_clear();

    let summary = RunSummary {
        repos_listed: listed,
        repos_qualifying: qualifying,
        repos_completed: completed,
        repos_failed: failed,
        rows_written: sink.rows_written(),
        elapsed: start.elapsed(),
    };
    summary.log();
    Ok(summary)
}

/// One repository's task: fetch, filter per item, join into rows.
fn process_repository(
    client: &GraphQLClient,
    config: &CollectConfig,
    repo: &RepositorySummary,
    pb: &ProgressBar,
) -> Result<Vec<OutputRow>, ApiError> {
    pb.set_message("fetching pull requests...");
    let records = fetch_pull_requests(client, &repo.owner, &repo.name, config, pb)?;
    Ok(records
        .iter()
        .filter(|pr| config.filter.is_eligible(pr))
        .map(|pr| OutputRow::new(repo, pr))
        .collect())
}

/// Fan `task` across the queue on `workers` scoped threads.
///
/// Completed tasks append to the sink from the worker thread, so rows land
/// as soon as their repository finishes. Task errors are contained here:
/// logged with the repository identity, counted, nothing more.
fn fan_out<F>(
    queue: &WorkQueue<RepositorySummary>,
    workers: usize,
    sink: &CsvSink,
    progress: &ProgressContext,
    overall: &ProgressBar,
    task: F,
) -> (usize, usize)
where
    F: Fn(&RepositorySummary, &ProgressBar) -> Result<Vec<OutputRow>, ApiError> + Sync,
{
    let completed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    rayon::scope(|s| {
        for _ in 0..workers {
            s.spawn(|_| {
                while let Some(repo) = queue.next() {
                    if is_shutdown_requested() {
                        break;
                    }
                    let pb = progress.repo_bar(&repo.full_name());
                    let outcome = task(repo, &pb);
                    pb.finish_and_clear();
                    overall.inc(1);

                    match outcome {
                        Ok(rows) => {
                            if rows.is_empty() {
                                log::debug!("{}: no eligible pull requests", repo.full_name());
                                completed.fetch_add(1, Ordering::Relaxed);
                                continue;
                            }
                            match sink.append(&rows) {
                                Ok(n) => {
                                    completed.fetch_add(1, Ordering::Relaxed);
                                    log::info!(
                                        "{}: {n} eligible PRs written ({} total)",
                                        repo.full_name(),
                                        sink.rows_written()
                                    );
                                }
                                Err(e) => {
                                    failed.fetch_add(1, Ordering::Relaxed);
                                    log::error!(
                                        "{}: failed to write rows: {e}",
                                        repo.full_name()
                                    );
                                }
                            }
                        }
                        Err(e) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                            log::error!("{}: {e}", repo.full_name());
                        }
                    }
                }
            });
        }
    });

    (completed.into_inner(), failed.into_inner())
}

/// Outcome of one collection run.
#[derive(Debug)]
pub struct RunSummary {
    pub repos_listed: usize,
    pub repos_qualifying: usize,
    pub repos_completed: usize,
    pub repos_failed: usize,
    pub rows_written: usize,
    pub elapsed: std::time::Duration,
}

impl RunSummary {
    pub fn log(&self) {
        log::info!("=== Collection Summary ===");
        log::info!(
            "Repositories: {} listed, {} qualifying, {} completed ({} failed)",
            self.repos_listed,
            self.repos_qualifying,
            self.repos_completed,
            self.repos_failed
        );
        log::info!("Eligible pull requests written: {}", self.rows_written);
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());
    }
}
