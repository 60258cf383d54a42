//! GitHub GraphQL source for the pull-request harvester
//!
//! Lists popular repositories via the search connection, walks each
//! repository's merged/closed pull requests, filters out unreviewed and
//! instantly-resolved ones, and joins the survivors into output rows.

pub mod client;
pub mod config;
pub mod filter;
pub mod pulls;
pub mod queries;
pub mod repos;
pub mod row;
pub mod runner;
pub mod types;

pub use client::GraphQLClient;
pub use config::CollectConfig;
pub use filter::FilterRule;
pub use row::OutputRow;
pub use runner::{RunSummary, run};
pub use types::{PullRequestRecord, PullState, RepositorySummary};
