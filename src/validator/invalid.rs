use super::*;

/// Why a transaction's token claim is not provenance-valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalid {
  Format(slp::Error),
  InsufficientInputs,
  InsufficientValidInputs,
  InvalidBatonParent,
  MissingBatonParent,
  NftChildBaton,
  NftChildDecimals,
  NftChildMint,
  NftChildQuantity,
  NftChildSend,
  NftParentDag,
  NftParentMissing,
  NftParentQuantity,
  Seeded,
  TokenTypeMismatch,
}

impl Display for Invalid {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Self::Format(err) => write!(f, "SLP OP_RETURN parsing error (format error: {err})"),
      Self::InsufficientInputs => write!(f, "token outputs are greater than possible inputs"),
      Self::InsufficientValidInputs => write!(f, "token outputs are greater than valid inputs"),
      Self::InvalidBatonParent => write!(f, "MINT transaction with invalid baton parent"),
      Self::MissingBatonParent => write!(
        f,
        "MINT transaction must have at least 1 candidate baton parent input"
      ),
      Self::NftChildBaton => write!(f, "NFT1 child GENESIS cannot have a mint baton"),
      Self::NftChildDecimals => write!(f, "NFT1 child GENESIS must have 0 decimals"),
      Self::NftChildMint => write!(f, "NFT1 child cannot have MINT transactions"),
      Self::NftChildQuantity => write!(f, "NFT1 child GENESIS quantity must be 1"),
      Self::NftChildSend => write!(
        f,
        "NFT1 child SEND must transfer a quantity of 1 to output 1"
      ),
      Self::NftParentDag => write!(f, "NFT1 child GENESIS does not have valid parent DAG"),
      Self::NftParentMissing => write!(
        f,
        "NFT1 child GENESIS does not have a valid NFT1 parent input"
      ),
      Self::NftParentQuantity => write!(
        f,
        "NFT1 child's parent has SLP output that is not greater than zero"
      ),
      Self::Seeded => write!(f, "validity supplied by trusted source"),
      Self::TokenTypeMismatch => write!(f, "SLP version/type mismatch from valid parent"),
    }
  }
}
