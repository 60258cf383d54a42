//! Prospector Core - shared infrastructure for the pull-request harvester
//!
//! Error taxonomy, retry/backoff, cursor pagination, the CSV sink, and the
//! worker-pool plumbing used by the GitHub collection pipeline.

pub mod error;
pub mod http;
pub mod logging;
pub mod page;
pub mod progress;
pub mod retry;
pub mod shutdown;
pub mod sink;
pub mod work_queue;

// Re-exports for convenience
pub use error::ApiError;
pub use http::{SHARED_RUNTIME, http_client};
pub use logging::{IndicatifLogger, init_logging};
pub use page::{Page, PageCursor, Paginator};
pub use progress::{ProgressContext, SharedProgress};
pub use retry::{RetryPolicy, execute_with_retry};
pub use shutdown::{is_shutdown_requested, request_shutdown, shutdown_flag};
pub use sink::CsvSink;
pub use work_queue::WorkQueue;
