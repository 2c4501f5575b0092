//! Types for encoding and decoding Simple Ledger Protocol token messages.

use {
  bitcoin::{
    hashes::Hash,
    opcodes,
    script::Instruction,
    Script, ScriptBuf, Transaction, Txid,
  },
  serde::{Deserialize, Serialize},
  serde_with::{serde_as, DeserializeFromStr, SerializeDisplay},
  std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
  },
};

pub use {
  error::{Error, ErrorKind},
  judgement::Judgement,
  message::{encode_genesis, encode_mint, encode_send, Genesis, Message, Mint, Operation, Transfer},
  token_id::TokenId,
  token_type::TokenType,
};

mod error;
mod judgement;
mod message;
mod push;
mod token_id;
mod token_type;

/// Protocol identifier pushed immediately after OP_RETURN.
pub const LOKAD_ID: [u8; 4] = *b"SLP\0";

/// Largest OP_RETURN script an encoded message may occupy.
pub const MAX_SCRIPT_SIZE: usize = 223;

/// Largest number of token outputs a SEND may declare.
pub const MAX_SEND_OUTPUTS: usize = 19;

pub const MAX_DECIMALS: u8 = 9;
