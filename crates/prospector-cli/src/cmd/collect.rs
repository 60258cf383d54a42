//! Collect subcommand - run the harvest pipeline

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;
use prospector_core::{CsvSink, RetryPolicy, SharedProgress};
use prospector_github::{CollectConfig, FilterRule, GraphQLClient};

use crate::config::Config;

#[derive(Args, Debug, Default)]
pub struct CollectArgs {
    /// Output CSV path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target number of repositories
    #[arg(long)]
    pub max_repos: Option<usize>,

    /// Number of concurrent workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Repository search query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Milliseconds between page fetches
    #[arg(long)]
    pub throttle_ms: Option<u64>,

    /// Maximum retry attempts for transient failures
    #[arg(long)]
    pub max_retries: Option<u32>,
}

pub fn run(args: CollectArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    // Missing credential aborts before any work is scheduled
    let Some(token) = config.github.token.clone() else {
        bail!("no API token: set GITHUB_TOKEN or github.token in prospector.toml");
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.output.path.clone());
    let collect = build_config(&args, config);

    let client = GraphQLClient::new(&config.github.endpoint, token);
    let sink = CsvSink::open(&output)
        .with_context(|| format!("cannot open output file {}", output.display()))?;

    let summary = prospector_github::run(&client, &collect, &sink, progress)?;

    progress.println(format!(
        "{} eligible pull requests written to {}",
        summary.rows_written,
        output.display()
    ));
    Ok(())
}

/// File config plus CLI overrides, flattened into pipeline tunables.
fn build_config(args: &CollectArgs, config: &Config) -> CollectConfig {
    let c = &config.collect;
    CollectConfig {
        search_query: args.query.clone().unwrap_or_else(|| c.search_query.clone()),
        max_repos: args.max_repos.unwrap_or(c.max_repos),
        repo_page_size: c.repo_page_size,
        pr_page_size: c.pr_page_size,
        max_pr_pages: c.max_pr_pages,
        min_pull_requests: c.min_pull_requests,
        workers: args.workers.unwrap_or(c.workers),
        throttle: Duration::from_millis(args.throttle_ms.unwrap_or(c.throttle_ms)),
        retry: RetryPolicy {
            max_retries: args.max_retries.unwrap_or(config.http.max_retries),
            base: config.http.backoff_base,
            cap: Duration::from_secs(config.http.backoff_cap_secs),
        },
        filter: FilterRule {
            min_reviews: c.min_reviews,
            min_resolution: Duration::from_secs(c.min_resolution_secs),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_config_flows_through() {
        let mut config = Config::default();
        config.collect.max_repos = 50;
        config.collect.min_pull_requests = 42;
        config.http.max_retries = 2;

        let collect = build_config(&CollectArgs::default(), &config);
        assert_eq!(collect.max_repos, 50);
        assert_eq!(collect.min_pull_requests, 42);
        assert_eq!(collect.retry.max_retries, 2);
    }

    #[test]
    fn cli_flags_override_file() {
        let config = Config::default();
        let args = CollectArgs {
            max_repos: Some(5),
            workers: Some(2),
            query: Some("stars:>50000".to_string()),
            throttle_ms: Some(1000),
            max_retries: Some(1),
            ..CollectArgs::default()
        };

        let collect = build_config(&args, &config);
        assert_eq!(collect.max_repos, 5);
        assert_eq!(collect.workers, 2);
        assert_eq!(collect.search_query, "stars:>50000");
        assert_eq!(collect.throttle, Duration::from_millis(1000));
        assert_eq!(collect.retry.max_retries, 1);
        // Untouched tunables keep file defaults
        assert_eq!(collect.pr_page_size, 100);
    }

    #[test]
    fn filter_thresholds_from_file() {
        let mut config = Config::default();
        config.collect.min_reviews = 2;
        config.collect.min_resolution_secs = 7200;

        let collect = build_config(&CollectArgs::default(), &config);
        assert_eq!(collect.filter.min_reviews, 2);
        assert_eq!(collect.filter.min_resolution, Duration::from_secs(7200));
    }
}
