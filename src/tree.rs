use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::{Content, Digest, Error, Result, TreeConfig};

/// Number of pairs in a level above which the level is hashed on the rayon pool.
#[cfg(feature = "parallel")]
pub const PARALLEL_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
  /// Digest of the input item at the same index.
  Leaf,
  /// Parent of the nodes at `left` and `right` in the level below.
  Branch { left: usize, right: usize },
  /// Copy of the last node of an odd-sized level, at index `of` in the same level.
  Padding { of: usize },
}

/// Node representation in the hash tree.
///
/// Nodes are stored per level; the parent of the node at `index` is at `index / 2` in the level
/// above and its sibling is at `index ^ 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
  pub index: usize,
  pub digest: Digest,
  pub kind: NodeKind,
}

impl Node {
  fn new_leaf(index: usize, digest: Digest) -> Self {
    Node { index, digest, kind: NodeKind::Leaf }
  }

  fn new_internal(index: usize, digest: Digest) -> Self {
    let branch = NodeKind::Branch { left: 2 * index, right: 2 * index + 1 };
    Node { index, digest, kind: branch }
  }

  fn new_padding(of: &Node) -> Self {
    Node { index: of.index + 1, digest: of.digest.clone(), kind: NodeKind::Padding { of: of.index } }
  }

  pub fn is_leaf(&self) -> bool {
    matches!(self.kind, NodeKind::Leaf)
  }

  pub fn is_padding(&self) -> bool {
    matches!(self.kind, NodeKind::Padding { .. })
  }
}

/// Immutable binary Merkle tree built once from an ordered list of items.
///
/// `levels[0]` holds the leaves and the last level holds only the root. Every level below the root
/// has an even number of nodes: an odd level is completed by duplicating its last node.
#[derive(Clone)]
pub struct Tree {
  levels: Vec<Vec<Node>>,
  leaf_count: usize,
  config: TreeConfig,
}

impl Tree {
  /// Build a tree over `items` in the given order.
  pub fn build<C: Content>(items: &[C], config: TreeConfig) -> Result<Self> {
    if items.is_empty() {
      return Err(Error::EmptyInput);
    }

    let mut leaves = Vec::with_capacity(items.len() + 1);
    for (i, item) in items.iter().enumerate() {
      leaves.push(Node::new_leaf(i, config.leaf_digest(item)?));
    }
    Self::check_duplicates(items, &leaves);

    let mut levels = Vec::with_capacity(usize::BITS as usize);
    let mut current = leaves;
    loop {
      if current.len() % 2 == 1 {
        let padding = Node::new_padding(&current[current.len() - 1]);
        current.push(padding);
      }
      let next = Self::combine_level(&config, &current)?;
      trace!(level = levels.len(), nodes = current.len(), "merkle level hashed");
      levels.push(current);
      if next.len() == 1 {
        levels.push(next);
        break;
      }
      current = next;
    }

    let tree = Tree { levels, leaf_count: items.len(), config };
    debug!(
      leaves = tree.leaf_count,
      depth = tree.depth(),
      hash = tree.config.hash().name(),
      root = %tree.root(),
      "merkle tree built"
    );
    Ok(tree)
  }

  /// Proofs always resolve to the first occurrence of a digest, so repeated digests are only
  /// reported. Equal digests for unequal content indicate a collision in the content hashing.
  fn check_duplicates<C: Content>(items: &[C], leaves: &[Node]) {
    let mut seen = HashMap::with_capacity(leaves.len());
    for leaf in leaves {
      match seen.entry(&leaf.digest) {
        Entry::Vacant(e) => {
          e.insert(leaf.index);
        }
        Entry::Occupied(e) => {
          let first = *e.get();
          let (other, digest) = (leaf.index, &leaf.digest);
          match items[other].equals(&items[first]) {
            Ok(true) => debug!(first, duplicate = other, "duplicate content, proofs resolve to the first occurrence"),
            Ok(false) => warn!(first, other, %digest, "distinct content with identical digests"),
            Err(err) => warn!(first, other, %digest, %err, "identical digests for content that cannot be compared"),
          }
        }
      }
    }
  }

  #[cfg(feature = "parallel")]
  fn combine_level(config: &TreeConfig, nodes: &[Node]) -> Result<Vec<Node>> {
    use rayon::prelude::*;
    if nodes.len() / 2 < PARALLEL_THRESHOLD {
      return Self::combine_level_sequential(config, nodes);
    }
    nodes
      .par_chunks(2)
      .enumerate()
      .map(|(k, pair)| Self::combine_pair(config, k, pair))
      .collect()
  }

  #[cfg(not(feature = "parallel"))]
  fn combine_level(config: &TreeConfig, nodes: &[Node]) -> Result<Vec<Node>> {
    Self::combine_level_sequential(config, nodes)
  }

  fn combine_level_sequential(config: &TreeConfig, nodes: &[Node]) -> Result<Vec<Node>> {
    debug_assert!(nodes.len() % 2 == 0);
    nodes
      .chunks(2)
      .enumerate()
      .map(|(k, pair)| Self::combine_pair(config, k, pair))
      .collect()
  }

  fn combine_pair(config: &TreeConfig, k: usize, pair: &[Node]) -> Result<Node> {
    let digest = config.combine(2 * k, &pair[0].digest, &pair[1].digest)?;
    Ok(Node::new_internal(k, digest))
  }

  /// Digest of the root node.
  pub fn root(&self) -> &Digest {
    &self.levels[self.levels.len() - 1][0].digest
  }

  pub fn config(&self) -> &TreeConfig {
    &self.config
  }

  /// Number of items the tree was built from, excluding padding.
  pub fn leaf_count(&self) -> usize {
    self.leaf_count
  }

  /// Number of levels above the leaves, which is also the length of every proof.
  pub fn depth(&self) -> usize {
    self.levels.len() - 1
  }

  /// Leaf digests including the padding leaf, if any.
  pub fn leaves(&self) -> impl Iterator<Item = &Digest> {
    self.levels[0].iter().map(|node| &node.digest)
  }

  /// All levels from the leaves up to the root.
  pub fn levels(&self) -> impl DoubleEndedIterator<Item = &[Node]> {
    self.levels.iter().map(Vec::as_slice)
  }

  pub(crate) fn level(&self, level: usize) -> &[Node] {
    &self.levels[level]
  }

  /// Position of the first leaf whose digest is `digest`.
  pub fn position(&self, digest: &Digest) -> Option<usize> {
    self.levels[0][..self.leaf_count].iter().position(|node| &node.digest == digest)
  }

  /// Recompute every internal digest from the leaves and compare with the stored nodes.
  pub fn verify_tree(&self) -> Result<bool> {
    for nodes in &self.levels {
      for node in nodes {
        if let NodeKind::Padding { of } = node.kind
          && nodes[of].digest != node.digest
        {
          return Ok(false);
        }
      }
    }
    for (level, pair) in self.levels.windows(2).enumerate() {
      let (below, above) = (&pair[0], &pair[1]);
      for node in above.iter().filter(|node| !node.is_padding()) {
        let NodeKind::Branch { left, right } = node.kind else {
          return Ok(false);
        };
        let digest = self.config.combine(left, &below[left].digest, &below[right].digest)?;
        if digest != node.digest {
          debug!(level = level + 1, index = node.index, "merkle node digest mismatch");
          return Ok(false);
        }
      }
    }
    Ok(true)
  }
}

impl fmt::Debug for Tree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Tree")
      .field("root", self.root())
      .field("leaf_count", &self.leaf_count)
      .field("depth", &self.depth())
      .field("config", &self.config)
      .finish()
  }
}

impl fmt::Display for Tree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (level, nodes) in self.levels.iter().enumerate().rev() {
      writeln!(f, "level {level}:")?;
      for node in nodes {
        match node.kind {
          NodeKind::Leaf => writeln!(f, "  [{}] {} leaf", node.index, node.digest)?,
          NodeKind::Branch { left, right } => writeln!(f, "  [{}] {} <{left},{right}>", node.index, node.digest)?,
          NodeKind::Padding { of } => writeln!(f, "  [{}] {} copy of [{of}]", node.index, node.digest)?,
        }
      }
    }
    Ok(())
  }
}
