pub mod booking;
pub mod engine;
pub mod payment;
pub mod repository;
pub mod reservation;
pub mod slot;
pub mod staging;
pub mod ticket;
pub mod validate;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// Malformed or incomplete client input. Nothing was written.
    #[error("{0}")]
    Validation(String),
    /// The request conflicts with current state (used ticket, plate mismatch).
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    /// The payment gateway rejected the invoice; compensating rollback ran.
    #[error("{message}")]
    Gateway { message: String },
    #[error("storage error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("{0}")]
    Internal(String),
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
