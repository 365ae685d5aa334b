//! Error types for the picker-search crate.
//!
//! All errors use stable string messages suitable for display and
//! programmatic handling. Query text never appears in error messages.

/// Errors that can occur when constructing or driving a search controller.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid aggregation configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The controller's session task has shut down and accepts no commands.
    #[error("search controller is closed")]
    Closed,
}

/// Convenience type alias for picker-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_config() {
        let err = SearchError::Config("burn_in_period must be greater than zero".into());
        assert_eq!(
            err.to_string(),
            "config error: burn_in_period must be greater than zero"
        );
    }

    #[test]
    fn display_closed() {
        assert_eq!(SearchError::Closed.to_string(), "search controller is closed");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
