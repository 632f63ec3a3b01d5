use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceMapError {
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("invalid span: {0:?}")]
    InvalidSpan(crate::span::Span),
}
