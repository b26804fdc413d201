//! Binary Merkle tree over caller-supplied content.
//!
//! A [`Tree`] is built once from an ordered list of [`Content`] items and a [`TreeConfig`], which
//! names the [`HashStrategy`] used to combine siblings and the [`PairOrdering`] deciding in which
//! order two siblings are concatenated. The tree exposes its root and produces [`Proof`]s that
//! [`verify`] checks with nothing but the leaf digest, the proof, the root and the same config.
//!
//! ```
//! use merkletree::{Digest, HashStrategy, Keccak256, Tree, TreeConfig, verify};
//!
//! let items = ["A", "B", "C"].map(|s| Keccak256.hash(s.as_bytes()).unwrap());
//! let config = TreeConfig::default();
//! let tree = Tree::build(&items, config.clone()).unwrap();
//! let (proof, index) = tree.generate_path(&items[1]).unwrap();
//! assert_eq!(1, index);
//! assert!(verify(&items[1], &proof, tree.root(), &config).unwrap());
//! ```

pub mod config;
pub mod content;
pub mod digest;
pub mod error;
pub mod hash;
pub mod order;
pub mod proof;
pub mod tree;

pub use config::{LeafMode, TreeConfig};
pub use content::Content;
pub use digest::Digest;
pub use error::{Error, Result};
pub use hash::{Blake3, HashFn, HashStrategy, Keccak256, Sha3_256};
pub use order::{PairOrdering, Positional, SortedPair};
pub use proof::{Proof, verify};
pub use tree::{Node, NodeKind, Tree};

/// SplitMix64 finalizer, used to derive reproducible pseudo-random test data.
pub fn splitmix64(x: u64) -> u64 {
  let mut z = x.wrapping_add(0x9e3779b97f4a7c15);
  z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
  z ^ (z >> 31)
}
