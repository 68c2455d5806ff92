use thiserror::Error;

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("noun must not be empty")]
    EmptyNoun,

    #[error("noun must be alphabetic, got {0:?}")]
    InvalidNoun(String),

    #[error("count pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}
