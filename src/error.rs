use thiserror::Error;

/// Terminal failure of a value or an executor operation.
///
/// Every failure in this crate is final for the value it affects: nothing is
/// retried, and a future that resolves to an error stays resolved to that
/// same error for every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed or inconvertible input value proto.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Service transfer, literal conversion, or platform bootstrap failure.
    #[error("internal: {0}")]
    Internal(String),
    /// Unsupported value proto shape, or an operation not implemented yet.
    #[error("unimplemented: {0}")]
    Unimplemented(String),
}
