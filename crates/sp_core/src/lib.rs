//! Core utilities shared between the ServerProbe crates.
//!
//! # Contains
//! - Logging macros
//! - Error types
//! - The probe directory and its config
//! - The [`Platform`] (mod-loader) enum
//! - A helper for running many async jobs at once

mod config;
mod error;
/// Common utilities for working with files.
pub mod file_utils;
mod platform;
/// Logging macros.
pub mod print;

pub use config::{ProbeConfig, DEFAULT_FILE_LIMIT, DEFAULT_JOBS};
pub use error::{IntoIoError, IoError, JsonFileError};
use futures::StreamExt;
pub use platform::Platform;
pub use print::{LoggingState, LOGGER};

/// Perform multiple async tasks concurrently.
///
/// At most `limit` tasks are polled at once
/// (`None` for no limit). Outputs come back in
/// completion order, not input order.
pub async fn do_jobs<T>(
    results: impl Iterator<Item = impl std::future::Future<Output = T>>,
    limit: Option<usize>,
) -> Vec<T> {
    let mut tasks = futures::stream::FuturesUnordered::new();
    let mut outputs = Vec::new();

    for result in results {
        tasks.push(result);
        if limit.is_some_and(|limit| tasks.len() >= limit) {
            if let Some(task) = tasks.next().await {
                outputs.push(task);
            }
        }
    }

    while let Some(task) = tasks.next().await {
        outputs.push(task);
    }
    outputs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn jobs_all_complete() {
        let mut out = do_jobs((0..100).map(|n| async move { n * 2 }), Some(8)).await;
        out.sort_unstable();
        assert_eq!(out, (0..100).map(|n| n * 2).collect::<Vec<_>>());

        let out = do_jobs((0..5).map(|n| async move { n }), None).await;
        assert_eq!(out.len(), 5);
    }
}
