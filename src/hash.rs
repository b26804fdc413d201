use sha3::Digest as _;

use crate::{Digest, Error, Result};

/// One-way hash primitive used to combine sibling digests.
///
/// Implementations must be deterministic and always produce `output_len()` bytes.
pub trait HashStrategy: Send + Sync {
  fn name(&self) -> &str;

  fn output_len(&self) -> usize;

  fn hash(&self, data: &[u8]) -> Result<Digest>;

  /// Hash the concatenation `first || second`.
  fn hash_pair(&self, first: &[u8], second: &[u8]) -> Result<Digest> {
    let mut buffer = Vec::with_capacity(first.len() + second.len());
    buffer.extend_from_slice(first);
    buffer.extend_from_slice(second);
    self.hash(&buffer)
  }
}

/// Legacy Keccak-256 as used by Ethereum.
#[derive(Debug, Default, Clone, Copy)]
pub struct Keccak256;

impl HashStrategy for Keccak256 {
  fn name(&self) -> &str {
    "keccak256"
  }

  fn output_len(&self) -> usize {
    32
  }

  fn hash(&self, data: &[u8]) -> Result<Digest> {
    Ok(Digest::new(sha3::Keccak256::digest(data).to_vec()))
  }

  fn hash_pair(&self, first: &[u8], second: &[u8]) -> Result<Digest> {
    let mut hasher = sha3::Keccak256::new();
    hasher.update(first);
    hasher.update(second);
    Ok(Digest::new(hasher.finalize().to_vec()))
  }
}

/// FIPS 202 SHA3-256.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha3_256;

impl HashStrategy for Sha3_256 {
  fn name(&self) -> &str {
    "sha3-256"
  }

  fn output_len(&self) -> usize {
    32
  }

  fn hash(&self, data: &[u8]) -> Result<Digest> {
    Ok(Digest::new(sha3::Sha3_256::digest(data).to_vec()))
  }

  fn hash_pair(&self, first: &[u8], second: &[u8]) -> Result<Digest> {
    let mut hasher = sha3::Sha3_256::new();
    hasher.update(first);
    hasher.update(second);
    Ok(Digest::new(hasher.finalize().to_vec()))
  }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Blake3;

impl HashStrategy for Blake3 {
  fn name(&self) -> &str {
    "blake3"
  }

  fn output_len(&self) -> usize {
    blake3::OUT_LEN
  }

  fn hash(&self, data: &[u8]) -> Result<Digest> {
    Ok(blake3::hash(data).into())
  }

  fn hash_pair(&self, first: &[u8], second: &[u8]) -> Result<Digest> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(first);
    hasher.update(second);
    Ok(hasher.finalize().into())
  }
}

/// Adapts a plain function or closure into a [`HashStrategy`].
///
/// ```
/// use merkletree::{Digest, HashFn, HashStrategy};
///
/// let xor = HashFn::new("xor", 1, |data: &[u8]| Ok(Digest::new(vec![data.iter().fold(0, |a, b| a ^ b)])));
/// assert_eq!(Digest::new(vec![3]), xor.hash(&[1, 2]).unwrap());
/// ```
pub struct HashFn<F> {
  name: String,
  output_len: usize,
  f: F,
}

impl<F> HashFn<F>
where
  F: Fn(&[u8]) -> Result<Digest> + Send + Sync,
{
  pub fn new(name: &str, output_len: usize, f: F) -> Self {
    HashFn { name: name.to_string(), output_len, f }
  }
}

impl<F> HashStrategy for HashFn<F>
where
  F: Fn(&[u8]) -> Result<Digest> + Send + Sync,
{
  fn name(&self) -> &str {
    &self.name
  }

  fn output_len(&self) -> usize {
    self.output_len
  }

  fn hash(&self, data: &[u8]) -> Result<Digest> {
    let digest = (self.f)(data)?;
    if digest.len() != self.output_len {
      return Err(Error::InvalidDigestLength { expected: self.output_len, actual: digest.len() });
    }
    Ok(digest)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keccak256_known_vector() {
    // keccak256("") as used for empty accounts in Ethereum
    let expected = Digest::from_hex("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470").unwrap();
    assert_eq!(expected, Keccak256.hash(&[]).unwrap());
  }

  #[test]
  fn sha3_256_known_vector() {
    let expected = Digest::from_hex("a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a").unwrap();
    assert_eq!(expected, Sha3_256.hash(&[]).unwrap());
  }

  #[test]
  fn hash_pair_equals_hash_of_concatenation() {
    let strategies: [&dyn HashStrategy; 3] = [&Keccak256, &Sha3_256, &Blake3];
    for strategy in strategies {
      let pair = strategy.hash_pair(b"hello", b"world").unwrap();
      assert_eq!(strategy.hash(b"helloworld").unwrap(), pair, "{}", strategy.name());
      assert_eq!(strategy.output_len(), pair.len());
    }
  }

  #[test]
  fn hash_fn_rejects_wrong_length() {
    let broken = HashFn::new("broken", 32, |data: &[u8]| Ok(Digest::from_slice(data)));
    assert_eq!(Err(Error::InvalidDigestLength { expected: 32, actual: 3 }), broken.hash(b"abc"));
  }
}
