// file: src/logging/logger.rs
// version: 1.0.1
// guid: c7c546e0-c3e4-4dc1-b1c1-e26f4b8ba551

//! Logger initialization and operation spans

use crate::Result;
use tracing::Instrument;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the given verbosity flags
pub fn filter_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Initialize the logging system
///
/// Logs go to stderr so they never interleave with output captured from
/// `az`, and never end up inside an interactive SSH session's stdout.
pub fn init_logger(verbose: bool, quiet: bool) -> Result<()> {
    let filter = EnvFilter::new(filter_directive(verbose, quiet));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .without_time()
                .compact(),
        )
        .try_init()
        .map_err(|e| crate::error::AzaError::config(format!("Failed to initialize logger: {}", e)))?;

    Ok(())
}

/// Run a future inside a named operation span
pub async fn with_async_operation_span<F, Fut, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = R>,
{
    let span = tracing::info_span!("operation", name = operation);
    async move { f().await }.instrument(span).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(false, false), "info");
        assert_eq!(filter_directive(true, false), "debug");
        // quiet wins over verbose
        assert_eq!(filter_directive(true, true), "error");
    }

    #[test]
    fn test_init_logger_twice_fails_gracefully() {
        // The global subscriber can only be installed once per process;
        // the second call must surface an error instead of panicking.
        let _ = init_logger(false, false);
        let second = init_logger(true, false);
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn test_with_async_operation_span() {
        let result = with_async_operation_span("async_test_operation", || async {
            tokio::task::yield_now().await;
            42
        })
        .await;

        assert_eq!(result, 42);
    }
}
