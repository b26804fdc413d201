use std::fmt;
use std::str::FromStr;

use byteorder::{BigEndian, ByteOrder};
use merkletree::content::downcast;
use merkletree::{Content, Digest, Error, HashStrategy, Keccak256};

pub const ADDRESS_LEN: usize = 20;

/// An amount credited to an account address, committed as
/// `keccak256(address || amount as 32-byte big-endian)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
  pub address: [u8; ADDRESS_LEN],
  pub amount: u128,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseAllocationError {
  #[error("expected ADDRESS:AMOUNT")]
  MissingAmount,
  #[error("invalid address: {0}")]
  Address(#[from] hex::FromHexError),
  #[error("address must be {ADDRESS_LEN} bytes, got {0}")]
  AddressLength(usize),
  #[error("invalid amount: {0}")]
  Amount(#[from] std::num::ParseIntError),
}

impl Allocation {
  /// The three allocations of one ether each used by the demo.
  pub fn samples() -> Result<Vec<Allocation>, ParseAllocationError> {
    [
      "0x30afBFe6B5eBC2F5f008F819fc0Eb1E71ad5B265:1000000000000000000",
      "0x1b57b3A1d5b4aa8E218F54FafB00975699463e6e:1000000000000000000",
      "0xAA293A146aAf9E05BeDD1Ff29B0da5bD8BE70955:1000000000000000000",
    ]
    .iter()
    .map(|s| s.parse())
    .collect()
  }

  pub fn encode(&self) -> Vec<u8> {
    let mut buffer = vec![0u8; ADDRESS_LEN + 32];
    buffer[..ADDRESS_LEN].copy_from_slice(&self.address);
    BigEndian::write_u128(&mut buffer[ADDRESS_LEN + 16..], self.amount);
    buffer
  }
}

impl FromStr for Allocation {
  type Err = ParseAllocationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (address, amount) = s.split_once(':').ok_or(ParseAllocationError::MissingAmount)?;
    let bytes = hex::decode(address.trim().trim_start_matches("0x"))?;
    let address: [u8; ADDRESS_LEN] =
      bytes.as_slice().try_into().map_err(|_| ParseAllocationError::AddressLength(bytes.len()))?;
    let amount = amount.trim().parse::<u128>()?;
    Ok(Allocation { address, amount })
  }
}

impl fmt::Display for Allocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{}:{}", hex::encode(self.address), self.amount)
  }
}

impl Content for Allocation {
  fn digest(&self) -> merkletree::Result<Digest> {
    Keccak256.hash(&self.encode())
  }

  fn equals(&self, other: &dyn Content) -> Result<bool, Error> {
    let other = downcast::<Allocation>(other)?;
    Ok(self.address == other.address && self.amount == other.amount)
  }
}
