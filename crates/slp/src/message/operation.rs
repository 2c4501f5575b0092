use super::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transaction_type", rename_all = "UPPERCASE")]
pub enum Operation {
  Genesis(Genesis),
  Mint(Mint),
  Send(Transfer),
}

impl Operation {
  pub fn transaction_type(&self) -> &'static str {
    match self {
      Self::Genesis(_) => "GENESIS",
      Self::Mint(_) => "MINT",
      Self::Send(_) => "SEND",
    }
  }
}
