use std::fmt;

/// Owned hash value of a leaf or an internal node.
///
/// The length is decided by the [`HashStrategy`](crate::HashStrategy) in use and stays fixed for the
/// lifetime of a tree.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Digest(Vec<u8>);

impl Digest {
  pub fn new(bytes: Vec<u8>) -> Self {
    Digest(bytes)
  }

  pub fn from_slice(bytes: &[u8]) -> Self {
    Digest(bytes.to_vec())
  }

  /// Parse a hex string with an optional `0x` prefix.
  pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    Ok(Digest(hex::decode(s)?))
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn to_hex(&self) -> String {
    hex::encode(&self.0)
  }
}

impl AsRef<[u8]> for Digest {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

impl From<Vec<u8>> for Digest {
  fn from(bytes: Vec<u8>) -> Self {
    Digest(bytes)
  }
}

impl<const N: usize> From<[u8; N]> for Digest {
  fn from(bytes: [u8; N]) -> Self {
    Digest(bytes.to_vec())
  }
}

impl From<blake3::Hash> for Digest {
  fn from(hash: blake3::Hash) -> Self {
    Digest(hash.as_bytes().to_vec())
  }
}

impl fmt::Display for Digest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{}", self.to_hex())
  }
}

impl fmt::Debug for Digest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Digest(0x{})", self.to_hex())
  }
}
