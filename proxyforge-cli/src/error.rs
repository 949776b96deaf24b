// ============================================================================
// proxyforge-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses the core error type. Setup steps that only exist in the
// front end (creating directories, opening the run log, installing the
// logger) are wrapped with context into CoreError::OperationFailed.

use proxyforge_core::{CoreError, CoreResult};

use std::fmt;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Extension trait for adding context to errors in the CLI.
pub trait CliErrorContext<T> {
    /// Add context using a closure (for lazy evaluation).
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: fmt::Display,
{
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| CoreError::OperationFailed(format!("{}: {}", f(), e)))
    }
}
