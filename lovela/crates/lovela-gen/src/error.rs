use thiserror::Error;

/// Errors the emitter can raise outside of its normal diagnostic-bag flow —
/// the writer failing is the only one that actually matters in practice.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write generated source: {0}")]
    Write(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, EmitError>;
