use super::*;

/// Token input a transaction draws on, as recorded during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
  pub txid: Txid,
  pub vout: u32,
  pub token_type: TokenType,
  pub valid: Option<bool>,
  /// Token quantity the consumed output carries, or `None` for a mint baton.
  pub quantity: Option<u64>,
}

/// Snapshot of the validator's record for one transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationEntry {
  pub validity: Option<bool>,
  pub in_progress: bool,
  pub message: Option<Message>,
  pub parents: Vec<Parent>,
  pub reason: Option<String>,
}

pub(super) enum State {
  Pending(Validity),
  Resolved(bool),
}

pub(super) struct Entry {
  pub(super) message: Option<Message>,
  pub(super) parents: Vec<Parent>,
  pub(super) reason: Option<Invalid>,
  pub(super) state: State,
}

impl Entry {
  pub(super) fn pending(validity: Validity) -> Self {
    Self {
      message: None,
      parents: Vec::new(),
      reason: None,
      state: State::Pending(validity),
    }
  }

  pub(super) fn snapshot(&self) -> ValidationEntry {
    ValidationEntry {
      validity: match self.state {
        State::Pending(_) => None,
        State::Resolved(valid) => Some(valid),
      },
      in_progress: matches!(self.state, State::Pending(_)),
      message: self.message.clone(),
      parents: self.parents.clone(),
      reason: self.reason.as_ref().map(Invalid::to_string),
    }
  }
}
