use std::any::{Any, type_name};

use crate::{Digest, Error, Result};

/// Access to the concrete type behind a `dyn Content`. Implemented for every `'static` type.
pub trait AsAny: Any {
  fn as_any(&self) -> &dyn Any;
  fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
  fn as_any(&self) -> &dyn Any {
    self
  }

  fn type_name(&self) -> &'static str {
    type_name::<T>()
  }
}

/// An item that can be committed to by a tree.
///
/// Implementors must be `'static` because [`equals`](Content::equals) resolves the other item
/// through [`Any`]. Content that borrows its data has to be committed through an owned type or
/// through its precomputed [`Digest`].
///
/// ```
/// use merkletree::{Content, Digest, Result, content::downcast};
///
/// struct Note(String);
///
/// impl Content for Note {
///   fn digest(&self) -> Result<Digest> {
///     Ok(blake3::hash(self.0.as_bytes()).into())
///   }
///
///   fn equals(&self, other: &dyn Content) -> Result<bool> {
///     Ok(self.0 == downcast::<Note>(other)?.0)
///   }
/// }
/// ```
pub trait Content: AsAny {
  /// Deterministic digest of this item.
  fn digest(&self) -> Result<Digest>;

  /// Compare with another item; fails with [`Error::TypeMismatch`] when `other` is not of a
  /// compatible kind.
  fn equals(&self, other: &dyn Content) -> Result<bool>;
}

/// Resolve `other` to `T` or fail with [`Error::TypeMismatch`].
pub fn downcast<T: Content>(other: &dyn Content) -> Result<&T> {
  other
    .as_any()
    .downcast_ref::<T>()
    .ok_or(Error::TypeMismatch { expected: type_name::<T>(), found: other.type_name() })
}

/// A precomputed leaf digest.
impl Content for Digest {
  fn digest(&self) -> Result<Digest> {
    Ok(self.clone())
  }

  fn equals(&self, other: &dyn Content) -> Result<bool> {
    Ok(self == downcast::<Digest>(other)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Word(&'static str);

  impl Content for Word {
    fn digest(&self) -> Result<Digest> {
      Ok(blake3::hash(self.0.as_bytes()).into())
    }

    fn equals(&self, other: &dyn Content) -> Result<bool> {
      Ok(self.0 == downcast::<Word>(other)?.0)
    }
  }

  #[test]
  fn equals_same_kind() {
    assert!(Word("a").equals(&Word("a")).unwrap());
    assert!(!Word("a").equals(&Word("b")).unwrap());
  }

  #[test]
  fn equals_across_kinds_is_type_mismatch() {
    let digest = Digest::from([1, 2, 3]);
    match Word("a").equals(&digest) {
      Err(Error::TypeMismatch { expected, found }) => {
        assert!(expected.ends_with("Word"), "{expected}");
        assert!(found.ends_with("Digest"), "{found}");
      }
      other => panic!("unexpected: {other:?}"),
    }
    assert!(matches!(digest.equals(&Word("a")), Err(Error::TypeMismatch { .. })));
  }

  #[test]
  fn digest_is_its_own_content() {
    let digest = Digest::from([9u8; 32]);
    assert_eq!(digest, Content::digest(&digest).unwrap());
    assert!(digest.equals(&Digest::from([9u8; 32])).unwrap());
  }
}
