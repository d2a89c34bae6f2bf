pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("unknown ranker: {0:?}")]
    UnknownRanker(String),

    #[error("unknown acyclicer: {0:?}")]
    UnknownAcyclicer(String),

    #[error("invalid input: {0}")]
    InvariantViolation(String),

    #[error("computed coordinates exceed the representable range")]
    CoordinateOverflow,
}
