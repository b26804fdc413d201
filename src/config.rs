use std::fmt;
use std::sync::Arc;

use crate::hash::{HashStrategy, Keccak256};
use crate::order::{PairOrdering, SortedPair};
use crate::{Content, Digest, Error, Result};

/// How a content digest becomes a leaf digest.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LeafMode {
  /// The content digest is the leaf digest, unmodified.
  #[default]
  Raw,
  /// The leaf digest is the configured hash applied to the content digest.
  Hashed,
}

/// Hash and ordering strategies shared by a tree and every verification of its proofs.
#[derive(Clone)]
pub struct TreeConfig {
  hash: Arc<dyn HashStrategy>,
  order: Arc<dyn PairOrdering>,
  leaf_mode: LeafMode,
}

impl TreeConfig {
  pub fn new<H, O>(hash: H, order: O) -> Self
  where
    H: HashStrategy + 'static,
    O: PairOrdering + 'static,
  {
    Self::from_arcs(Arc::new(hash), Arc::new(order))
  }

  pub fn from_arcs(hash: Arc<dyn HashStrategy>, order: Arc<dyn PairOrdering>) -> Self {
    TreeConfig { hash, order, leaf_mode: LeafMode::Raw }
  }

  pub fn with_leaf_mode(mut self, leaf_mode: LeafMode) -> Self {
    self.leaf_mode = leaf_mode;
    self
  }

  pub fn hash(&self) -> &dyn HashStrategy {
    self.hash.as_ref()
  }

  pub fn order(&self) -> &dyn PairOrdering {
    self.order.as_ref()
  }

  pub fn leaf_mode(&self) -> LeafMode {
    self.leaf_mode
  }

  pub fn digest_len(&self) -> usize {
    self.hash.output_len()
  }

  /// Leaf digest of `content` under this configuration's [`LeafMode`].
  pub fn leaf_digest<C: Content + ?Sized>(&self, content: &C) -> Result<Digest> {
    let digest = content.digest()?;
    let digest = match self.leaf_mode {
      LeafMode::Raw => digest,
      LeafMode::Hashed => self.hash.hash(digest.as_bytes())?,
    };
    self.check_len(&digest)?;
    Ok(digest)
  }

  /// Digest of the parent of `left` and `right`, the children at `index` and `index + 1`.
  pub fn combine(&self, index: usize, left: &Digest, right: &Digest) -> Result<Digest> {
    let (first, second) = self.order.order(index, left.as_bytes(), index + 1, right.as_bytes());
    let (first, second) = match (first.checked_sub(index), second.checked_sub(index)) {
      (Some(0), Some(1)) => (left, right),
      (Some(1), Some(0)) => (right, left),
      _ => return Err(Error::InvalidOrdering { left: index, right: index + 1, first, second }),
    };
    let digest = self.hash.hash_pair(first.as_bytes(), second.as_bytes())?;
    self.check_len(&digest)?;
    Ok(digest)
  }

  pub(crate) fn check_len(&self, digest: &Digest) -> Result<()> {
    let expected = self.hash.output_len();
    if digest.len() != expected {
      return Err(Error::InvalidDigestLength { expected, actual: digest.len() });
    }
    Ok(())
  }
}

/// Keccak-256 with sorted pairs and raw leaves.
impl Default for TreeConfig {
  fn default() -> Self {
    TreeConfig::new(Keccak256, SortedPair)
  }
}

impl fmt::Debug for TreeConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TreeConfig")
      .field("hash", &self.hash.name())
      .field("commutative", &self.order.is_commutative())
      .field("leaf_mode", &self.leaf_mode)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::hash::Blake3;
  use crate::order::Positional;

  #[test]
  fn sorted_combine_is_commutative() {
    let config = TreeConfig::default();
    let a = Keccak256.hash(b"a").unwrap();
    let b = Keccak256.hash(b"b").unwrap();
    assert_eq!(config.combine(0, &a, &b).unwrap(), config.combine(0, &b, &a).unwrap());
    assert_eq!(config.combine(0, &a, &b).unwrap(), config.combine(6, &b, &a).unwrap());
  }

  #[test]
  fn positional_combine_depends_on_sides() {
    let config = TreeConfig::new(Blake3, Positional);
    let a = Blake3.hash(b"a").unwrap();
    let b = Blake3.hash(b"b").unwrap();
    assert_ne!(config.combine(0, &a, &b).unwrap(), config.combine(0, &b, &a).unwrap());
    assert_eq!(Blake3.hash_pair(a.as_bytes(), b.as_bytes()).unwrap(), config.combine(2, &a, &b).unwrap());
  }

  #[test]
  fn combine_with_itself() {
    let config = TreeConfig::default();
    let a = Keccak256.hash(b"a").unwrap();
    let expected = Keccak256.hash_pair(a.as_bytes(), a.as_bytes()).unwrap();
    assert_eq!(expected, config.combine(0, &a, &a).unwrap());
  }

  #[test]
  fn broken_ordering_is_rejected() {
    let config = TreeConfig::new(Keccak256, |l: usize, _: &[u8], _: usize, _: &[u8]| (l, l));
    let a = Keccak256.hash(b"a").unwrap();
    let result = config.combine(2, &a, &a);
    assert_eq!(Err(Error::InvalidOrdering { left: 2, right: 3, first: 2, second: 2 }), result);
  }

  #[test]
  fn leaf_digest_modes() {
    let content = Keccak256.hash(b"content").unwrap();
    let raw = TreeConfig::default();
    assert_eq!(content, raw.leaf_digest(&content).unwrap());
    let hashed = TreeConfig::default().with_leaf_mode(LeafMode::Hashed);
    assert_eq!(Keccak256.hash(content.as_bytes()).unwrap(), hashed.leaf_digest(&content).unwrap());
  }

  #[test]
  fn raw_leaf_of_wrong_length() {
    let config = TreeConfig::default();
    let short = Digest::from([0u8; 20]);
    assert_eq!(Err(Error::InvalidDigestLength { expected: 32, actual: 20 }), config.leaf_digest(&short));
  }
}
