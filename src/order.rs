//! Canonical ordering of sibling digests before they are hashed together.
//!
//! An ordering receives the left and right child of a pair, each with its index within the level,
//! and returns the two indices in the order the digests must be concatenated. The same ordering
//! must be used when a tree is built and when its proofs are verified.

/// Decides the concatenation order of a sibling pair.
pub trait PairOrdering: Send + Sync {
  /// Return `(first, second)`, which must be `(left, right)` or `(right, left)`.
  fn order(&self, left: usize, left_digest: &[u8], right: usize, right_digest: &[u8]) -> (usize, usize);

  /// `true` when the result does not depend on which side each digest came from. Verification
  /// then ignores the leaf position carried by a proof.
  fn is_commutative(&self) -> bool {
    false
  }
}

/// Place the byte-wise smaller digest first.
///
/// `combine(a, b) == combine(b, a)` for every pair, which lets proofs omit left/right tags.
#[derive(Debug, Default, Clone, Copy)]
pub struct SortedPair;

impl PairOrdering for SortedPair {
  fn order(&self, left: usize, left_digest: &[u8], right: usize, right_digest: &[u8]) -> (usize, usize) {
    if left_digest > right_digest { (right, left) } else { (left, right) }
  }

  fn is_commutative(&self) -> bool {
    true
  }
}

/// Keep the tree position: left child first.
#[derive(Debug, Default, Clone, Copy)]
pub struct Positional;

impl PairOrdering for Positional {
  fn order(&self, left: usize, _left_digest: &[u8], right: usize, _right_digest: &[u8]) -> (usize, usize) {
    (left, right)
  }
}

impl<F> PairOrdering for F
where
  F: Fn(usize, &[u8], usize, &[u8]) -> (usize, usize) + Send + Sync,
{
  fn order(&self, left: usize, left_digest: &[u8], right: usize, right_digest: &[u8]) -> (usize, usize) {
    self(left, left_digest, right, right_digest)
  }
}
