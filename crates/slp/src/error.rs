/// Broad category of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
  /// The script is not a well formed message.
  Format,
  /// A field is well formed but holds a value the protocol forbids.
  Range,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  #[error("decimals {0} greater than 9")]
  Decimals(u8),
  #[error("{field} must be {expected} bytes, got {actual}")]
  FieldLength {
    field: &'static str,
    expected: usize,
    actual: usize,
  },
  #[error("{operation} takes {expected} fields, got {actual}")]
  FieldCount {
    operation: &'static str,
    expected: usize,
    actual: usize,
  },
  #[error("invalid script in OP_RETURN")]
  InvalidScript,
  #[error("mint baton output {0} must be 2 or greater")]
  MintBatonOutput(u8),
  #[error("{0}")]
  NftChild(&'static str),
  #[error("transaction has no outputs")]
  NoOutputs,
  #[error("script does not begin with OP_RETURN")]
  NotOpReturn,
  #[error("{field} must be 0 or {expected} bytes, got {actual}")]
  OptionalFieldLength {
    field: &'static str,
    expected: usize,
    actual: usize,
  },
  #[error("non-pushdata opcode in OP_RETURN")]
  Opcode,
  #[error("OP_0 push in OP_RETURN")]
  OpZero,
  #[error("missing SLP protocol identifier")]
  ProtocolIdentifier,
  #[error("push of {0} bytes exceeds 255 bytes")]
  PushSize(usize),
  #[error("script of {0} bytes exceeds 223 bytes")]
  ScriptSize(usize),
  #[error("SEND takes 1 to 19 output quantities, got {0}")]
  SendOutputs(usize),
  #[error("token type must be 1 or 2 bytes, got {0}")]
  TokenTypeLength(usize),
  #[error("unsupported token type {0:#04x}")]
  TokenType(u16),
  #[error("unrecognized token type `{0}`")]
  TokenTypeName(String),
  #[error("unrecognized transaction type")]
  TransactionType,
  #[error("missing {0}")]
  Truncated(&'static str),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Decimals(_) | Self::MintBatonOutput(_) | Self::NftChild(_) | Self::SendOutputs(_) => {
        ErrorKind::Range
      }
      _ => ErrorKind::Format,
    }
  }
}
