use super::*;

/// Token version carried in the second push of every message.
#[derive(
  Debug, Default, PartialEq, Eq, Copy, Clone, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum TokenType {
  #[default]
  Fungible,
  NftChild,
  NftGroup,
}

impl TokenType {
  pub const fn code(self) -> u8 {
    match self {
      Self::Fungible => 0x01,
      Self::NftChild => 0x41,
      Self::NftGroup => 0x81,
    }
  }

  /// Decode the big-endian token type push, which may be one or two bytes.
  pub(crate) fn decode(push: &[u8]) -> Result<Self, Error> {
    let code = match push {
      [code] => u16::from(*code),
      [high, low] => u16::from_be_bytes([*high, *low]),
      _ => return Err(Error::TokenTypeLength(push.len())),
    };

    Self::try_from(code)
  }
}

impl From<TokenType> for u8 {
  fn from(token_type: TokenType) -> Self {
    token_type.code()
  }
}

impl TryFrom<u16> for TokenType {
  type Error = Error;

  fn try_from(code: u16) -> Result<Self, Error> {
    match code {
      0x01 => Ok(Self::Fungible),
      0x41 => Ok(Self::NftChild),
      0x81 => Ok(Self::NftGroup),
      _ => Err(Error::TokenType(code)),
    }
  }
}

impl TryFrom<u8> for TokenType {
  type Error = Error;

  fn try_from(code: u8) -> Result<Self, Error> {
    Self::try_from(u16::from(code))
  }
}

impl Display for TokenType {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(
      f,
      "{}",
      match self {
        Self::Fungible => "fungible",
        Self::NftChild => "nft-child",
        Self::NftGroup => "nft-group",
      }
    )
  }
}

impl FromStr for TokenType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "fungible" => Ok(Self::Fungible),
      "nft-child" => Ok(Self::NftChild),
      "nft-group" => Ok(Self::NftGroup),
      _ => {
        let code = match s.strip_prefix("0x") {
          Some(hex) => u16::from_str_radix(hex, 16),
          None => s.parse(),
        }
        .map_err(|_| Error::TokenTypeName(s.into()))?;

        Self::try_from(code)
      }
    }
  }
}
