use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
  /// No items were supplied to build a tree from.
  #[error("cannot build a merkle tree from an empty list of items")]
  EmptyInput,

  /// A content item or the hash strategy failed to produce a digest.
  #[error("hash error: {0}")]
  Hash(String),

  /// The requested content is not a leaf of the tree.
  #[error("content not found in the tree")]
  NotFound,

  #[error("invalid digest length: expected {expected} bytes, got {actual}")]
  InvalidDigestLength { expected: usize, actual: usize },

  /// Content equality was evaluated across incompatible content kinds.
  #[error("type mismatch: expected {expected}, found {found}")]
  TypeMismatch { expected: &'static str, found: &'static str },

  /// The pair ordering returned indices that are not a permutation of the pair.
  #[error("pair ordering returned ({first}, {second}) for the pair ({left}, {right})")]
  InvalidOrdering { left: usize, right: usize, first: usize, second: usize },
}

impl Error {
  pub fn hash<E: std::fmt::Display>(err: E) -> Self {
    Error::Hash(err.to_string())
  }
}
