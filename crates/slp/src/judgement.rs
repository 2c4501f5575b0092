use super::*;

/// What an output carries, as far as SLP is concerned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Judgement {
  #[default]
  Unknown,
  NotSlp,
  SlpToken {
    amount: u64,
  },
  SlpBaton,
  InvalidTokenDag,
  InvalidBatonDag,
}

impl Judgement {
  /// Classify output `vout` of the transaction whose first output is
  /// `metadata`. Unparseable metadata classifies as `NotSlp`.
  pub fn classify(metadata: &Script, vout: u32) -> (Self, Option<Message>) {
    match Message::decipher(metadata) {
      Ok(message) => (Self::of(&message, vout), Some(message)),
      Err(_) => (Self::NotSlp, None),
    }
  }

  pub fn of(message: &Message, vout: u32) -> Self {
    match &message.operation {
      Operation::Genesis(Genesis {
        mint_baton_vout,
        quantity,
        ..
      })
      | Operation::Mint(Mint {
        mint_baton_vout,
        quantity,
        ..
      }) => {
        if mint_baton_vout.map(u32::from) == Some(vout) {
          Self::SlpBaton
        } else if vout == 1 && *quantity > 0 {
          Self::SlpToken { amount: *quantity }
        } else {
          Self::NotSlp
        }
      }
      Operation::Send(transfer) => match transfer.quantity(vout) {
        Some(amount) if vout > 0 => Self::SlpToken { amount },
        _ => Self::NotSlp,
      },
    }
  }

  /// Whether the output's validity depends on its transaction's token DAG.
  pub fn is_slp(self) -> bool {
    matches!(self, Self::SlpToken { .. } | Self::SlpBaton)
  }

  /// Downgrade after the owning transaction failed validation.
  pub fn invalidate(self) -> Self {
    match self {
      Self::SlpToken { .. } => Self::InvalidTokenDag,
      Self::SlpBaton => Self::InvalidBatonDag,
      other => other,
    }
  }
}
