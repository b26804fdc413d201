//! Inclusion proofs.
//!
//! A [`Proof`] lists the sibling digests met on the way from a leaf to the root. It carries no
//! left/right tags: the verifier rebuilds each pair from the parity of the leaf index and hands
//! it to the same [`PairOrdering`](crate::PairOrdering) that built the tree. With a commutative
//! ordering such as [`SortedPair`](crate::SortedPair) the index does not influence the result at
//! all.

use tracing::debug;

use crate::{Content, Digest, Error, Result, Tree, TreeConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
  index: usize,
  siblings: Vec<Digest>,
  root: Digest,
}

impl Proof {
  pub fn new(index: usize, siblings: Vec<Digest>, root: Digest) -> Self {
    Proof { index, siblings, root }
  }

  /// Position of the proven leaf.
  pub fn index(&self) -> usize {
    self.index
  }

  /// Sibling digests ordered from the leaf level up to just below the root.
  pub fn siblings(&self) -> &[Digest] {
    &self.siblings
  }

  pub fn root(&self) -> &Digest {
    &self.root
  }

  pub fn len(&self) -> usize {
    self.siblings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.siblings.is_empty()
  }

  /// Verify `leaf` against the root recorded in this proof.
  pub fn verify(&self, leaf: &Digest, config: &TreeConfig) -> Result<bool> {
    verify(leaf, self, &self.root, config)
  }
}

impl Tree {
  /// Proof for the first leaf whose digest matches `target`, together with that leaf's index.
  pub fn generate_path<C: Content + ?Sized>(&self, target: &C) -> Result<(Proof, usize)> {
    let digest = self.config().leaf_digest(target)?;
    let index = self.position(&digest).ok_or(Error::NotFound)?;
    Ok((self.proof_at(index)?, index))
  }

  /// Proof for the leaf at `index`.
  pub fn proof_at(&self, index: usize) -> Result<Proof> {
    if index >= self.leaf_count() {
      return Err(Error::NotFound);
    }
    let mut siblings = Vec::with_capacity(self.depth());
    let mut i = index;
    for level in 0..self.depth() {
      siblings.push(self.level(level)[i ^ 1].digest.clone());
      i /= 2;
    }
    debug!(index, len = siblings.len(), "merkle proof generated");
    Ok(Proof::new(index, siblings, self.root().clone()))
  }

  /// `true` if `target` is a leaf of this tree and its path hashes up to the stored root.
  pub fn verify_content<C: Content + ?Sized>(&self, target: &C) -> Result<bool> {
    match self.generate_path(target) {
      Ok((proof, index)) => verify(&self.level(0)[index].digest, &proof, self.root(), self.config()),
      Err(Error::NotFound) => Ok(false),
      Err(err) => Err(err),
    }
  }
}

/// Recompute the root from `leaf` and `proof` and compare it with `root`.
///
/// A proof that does not lead to `root` yields `Ok(false)`. Digests whose length differs from the
/// configured hash output fail with [`Error::InvalidDigestLength`].
pub fn verify(leaf: &Digest, proof: &Proof, root: &Digest, config: &TreeConfig) -> Result<bool> {
  config.check_len(leaf)?;
  config.check_len(root)?;
  for sibling in &proof.siblings {
    config.check_len(sibling)?;
  }

  let mut acc = leaf.clone();
  if config.order().is_commutative() {
    for sibling in &proof.siblings {
      acc = config.combine(0, &acc, sibling)?;
    }
  } else {
    let mut i = proof.index;
    for sibling in &proof.siblings {
      acc = if i % 2 == 0 { config.combine(i, &acc, sibling)? } else { config.combine(i - 1, sibling, &acc)? };
      i /= 2;
    }
  }

  let valid = &acc == root;
  if !valid {
    debug!(index = proof.index, computed = %acc, expected = %root, "merkle proof does not match root");
  }
  Ok(valid)
}
