use super::*;

/// Identifier of a token: the id of its GENESIS transaction, in display byte order.
#[derive(
  Debug, PartialEq, Eq, Copy, Clone, Hash, PartialOrd, Ord, DeserializeFromStr, SerializeDisplay,
)]
pub struct TokenId([u8; 32]);

impl TokenId {
  pub const fn from_bytes(bytes: [u8; 32]) -> Self {
    Self(bytes)
  }

  pub fn as_bytes(&self) -> &[u8; 32] {
    &self.0
  }

  pub(crate) fn decode(push: &[u8]) -> Result<Self, Error> {
    push
      .try_into()
      .map(Self)
      .map_err(|_| Error::FieldLength {
        field: "token id",
        expected: 32,
        actual: push.len(),
      })
  }
}

impl From<Txid> for TokenId {
  fn from(txid: Txid) -> Self {
    let mut bytes = txid.to_byte_array();
    bytes.reverse();
    Self(bytes)
  }
}

impl From<TokenId> for Txid {
  fn from(token_id: TokenId) -> Self {
    let mut bytes = token_id.0;
    bytes.reverse();
    Txid::from_byte_array(bytes)
  }
}

impl Display for TokenId {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", hex::encode(self.0))
  }
}

#[derive(Debug, PartialEq)]
pub enum ParseError {
  Hex(hex::FromHexError),
  Length(usize),
}

impl Display for ParseError {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Self::Hex(err) => write!(f, "invalid token id hex: {err}"),
      Self::Length(len) => write!(f, "token id must be 32 bytes, got {len}"),
    }
  }
}

impl std::error::Error for ParseError {}

impl FromStr for TokenId {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let bytes = hex::decode(s).map_err(ParseError::Hex)?;
    let len = bytes.len();
    bytes
      .try_into()
      .map(Self)
      .map_err(|_| ParseError::Length(len))
  }
}
