//! Engine error types.
//!
//! The inbound path never fails: malformed topics degrade to store-only
//! recording and absent widgets make updaters silent no-ops. Only
//! construction can reject its arguments.

use thiserror::Error;

/// Errors from dashboard construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Every materialized topic must sit under a non-empty namespace.
    #[error("topic prefix must not be empty")]
    EmptyPrefix,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_stable() {
        assert_eq!(Error::EmptyPrefix.to_string(), "topic prefix must not be empty");
    }
}
