//! Host reachability interface

use async_trait::async_trait;

/// Why a reachability check did not succeed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectivityError {
    /// The check ran and reported the host as unreachable
    #[error("host unreachable: {0}")]
    Unreachable(String),

    /// The check itself could not be run
    #[error("connectivity check could not run: {0}")]
    Invocation(String),

    /// The check did not finish in time
    #[error("connectivity check timed out after {0:?}")]
    TimedOut(std::time::Duration),
}

/// A lightweight reachability probe against a single hostname
#[async_trait]
pub trait ConnectivityCheck: Send + Sync {
    /// Succeeds when the host answered
    async fn check(&self, hostname: &str) -> Result<(), ConnectivityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysUp;

    #[async_trait]
    impl ConnectivityCheck for AlwaysUp {
        async fn check(&self, _hostname: &str) -> Result<(), ConnectivityError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let check: Box<dyn ConnectivityCheck> = Box::new(AlwaysUp);
        assert!(check.check("web-01").await.is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = ConnectivityError::Unreachable("exit status: 4".to_string());
        assert_eq!(err.to_string(), "host unreachable: exit status: 4");
    }
}
