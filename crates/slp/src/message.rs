use super::*;

pub use {genesis::Genesis, mint::Mint, operation::Operation, transfer::Transfer};

mod genesis;
mod mint;
mod operation;
mod transfer;

/// A decoded SLP OP_RETURN message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  pub token_type: TokenType,
  pub operation: Operation,
}

impl Message {
  /// Decode the message carried by a transaction's first output.
  pub fn from_transaction(transaction: &Transaction) -> Result<Self, Error> {
    let output = transaction.output.first().ok_or(Error::NoOutputs)?;
    Self::decipher(&output.script_pubkey)
  }

  pub fn decipher(script: &Script) -> Result<Self, Error> {
    let pushes = push::pushes(script)?;

    if pushes.first() != Some(&&LOKAD_ID[..]) {
      return Err(Error::ProtocolIdentifier);
    }

    let token_type = TokenType::decode(pushes.get(1).ok_or(Error::Truncated("token type"))?)?;

    let fields = pushes.get(3..).unwrap_or_default();

    let operation = match *pushes.get(2).ok_or(Error::Truncated("transaction type"))? {
      b"GENESIS" => Operation::Genesis(Genesis::decode(fields)?),
      b"MINT" => Operation::Mint(Mint::decode(fields)?),
      b"SEND" => Operation::Send(Transfer::decode(fields)?),
      _ => return Err(Error::TransactionType),
    };

    Ok(Self {
      token_type,
      operation,
    })
  }

  /// Encode as an OP_RETURN script, enforcing the protocol's range rules.
  pub fn encipher(&self) -> Result<ScriptBuf, Error> {
    self.check()?;

    let mut script = vec![opcodes::all::OP_RETURN.to_u8()];

    push::push(&LOKAD_ID, &mut script)?;
    push::push(&[self.token_type.code()], &mut script)?;
    push::push(self.operation.transaction_type().as_bytes(), &mut script)?;

    match &self.operation {
      Operation::Genesis(genesis) => genesis.encode(&mut script)?,
      Operation::Mint(mint) => mint.encode(&mut script)?,
      Operation::Send(transfer) => transfer.encode(&mut script)?,
    }

    if script.len() > MAX_SCRIPT_SIZE {
      return Err(Error::ScriptSize(script.len()));
    }

    Ok(ScriptBuf::from_bytes(script))
  }

  /// The token this message concerns. A GENESIS creates the token whose id is
  /// the id of the transaction carrying it.
  pub fn token_id(&self, txid: Txid) -> TokenId {
    match &self.operation {
      Operation::Genesis(_) => txid.into(),
      Operation::Mint(mint) => mint.token_id,
      Operation::Send(transfer) => transfer.token_id,
    }
  }

  pub fn mint_baton_vout(&self) -> Option<u8> {
    match &self.operation {
      Operation::Genesis(genesis) => genesis.mint_baton_vout,
      Operation::Mint(mint) => mint.mint_baton_vout,
      Operation::Send(_) => None,
    }
  }

  /// Token quantity this message assigns to output `vout`.
  pub fn quantity(&self, vout: u32) -> Option<u64> {
    match &self.operation {
      Operation::Genesis(Genesis { quantity, .. }) | Operation::Mint(Mint { quantity, .. }) => {
        (vout == 1).then_some(*quantity)
      }
      Operation::Send(transfer) => transfer.quantity(vout),
    }
  }

  fn check(&self) -> Result<(), Error> {
    match &self.operation {
      Operation::Genesis(genesis) => {
        if genesis.decimals > MAX_DECIMALS {
          return Err(Error::Decimals(genesis.decimals));
        }

        check_mint_baton_vout(genesis.mint_baton_vout)?;

        if self.token_type == TokenType::NftChild {
          if genesis.quantity != 1 {
            return Err(Error::NftChild("NFT child GENESIS quantity must be 1"));
          }

          if genesis.decimals != 0 {
            return Err(Error::NftChild("NFT child GENESIS decimals must be 0"));
          }

          if genesis.mint_baton_vout.is_some() {
            return Err(Error::NftChild("NFT child GENESIS cannot create a mint baton"));
          }
        }
      }
      Operation::Mint(mint) => {
        if self.token_type == TokenType::NftChild {
          return Err(Error::NftChild("NFT child tokens cannot be minted"));
        }

        check_mint_baton_vout(mint.mint_baton_vout)?;
      }
      Operation::Send(transfer) => {
        let amounts = transfer.amounts();

        if amounts.is_empty() || amounts.len() > MAX_SEND_OUTPUTS {
          return Err(Error::SendOutputs(amounts.len()));
        }

        if self.token_type == TokenType::NftChild && amounts != [1] {
          return Err(Error::NftChild(
            "NFT child SEND must transfer a quantity of 1 to output 1",
          ));
        }
      }
    }

    Ok(())
  }
}

pub fn encode_genesis(token_type: TokenType, genesis: Genesis) -> Result<ScriptBuf, Error> {
  Message {
    token_type,
    operation: Operation::Genesis(genesis),
  }
  .encipher()
}

pub fn encode_mint(
  token_type: TokenType,
  token_id: TokenId,
  mint_baton_vout: Option<u8>,
  quantity: u64,
) -> Result<ScriptBuf, Error> {
  Message {
    token_type,
    operation: Operation::Mint(Mint {
      token_id,
      mint_baton_vout,
      quantity,
    }),
  }
  .encipher()
}

pub fn encode_send(
  token_type: TokenType,
  token_id: TokenId,
  amounts: &[u64],
) -> Result<ScriptBuf, Error> {
  Message {
    token_type,
    operation: Operation::Send(Transfer::new(token_id, amounts.iter().copied())),
  }
  .encipher()
}

fn check_mint_baton_vout(mint_baton_vout: Option<u8>) -> Result<(), Error> {
  match mint_baton_vout {
    Some(vout) if vout < 2 => Err(Error::MintBatonOutput(vout)),
    _ => Ok(()),
  }
}

fn decode_quantity(push: &[u8]) -> Result<u64, Error> {
  push
    .try_into()
    .map(u64::from_be_bytes)
    .map_err(|_| Error::FieldLength {
      field: "quantity",
      expected: 8,
      actual: push.len(),
    })
}

fn decode_mint_baton_vout(push: &[u8]) -> Result<Option<u8>, Error> {
  match push {
    [] => Ok(None),
    [vout @ (2..)] => Ok(Some(*vout)),
    [vout] => Err(Error::MintBatonOutput(*vout)),
    _ => Err(Error::OptionalFieldLength {
      field: "mint baton output",
      expected: 1,
      actual: push.len(),
    }),
  }
}

fn encode_quantity(quantity: u64, script: &mut Vec<u8>) -> Result<(), Error> {
  push::push(&quantity.to_be_bytes(), script)
}

fn encode_mint_baton_vout(mint_baton_vout: Option<u8>, script: &mut Vec<u8>) -> Result<(), Error> {
  push::push(mint_baton_vout.as_slice(), script)
}

#[cfg(test)]
mod tests {
  use {super::*, pretty_assertions::assert_eq};

  const TOKEN_ID: TokenId = TokenId::from_bytes([0xab; 32]);

  fn script(hex: &str) -> ScriptBuf {
    ScriptBuf::from_bytes(hex::decode(hex).unwrap())
  }

  fn genesis(quantity: u64) -> Message {
    Message {
      token_type: TokenType::Fungible,
      operation: Operation::Genesis(Genesis {
        quantity,
        ..Default::default()
      }),
    }
  }

  fn send(token_type: TokenType, amounts: &[u64]) -> Message {
    Message {
      token_type,
      operation: Operation::Send(Transfer::new(TOKEN_ID, amounts.iter().copied())),
    }
  }

  #[track_caller]
  fn case(message: Message) {
    let script = message.encipher().unwrap();
    assert_eq!(Message::decipher(&script).unwrap(), message);
  }

  #[test]
  fn empty_genesis_matches_reference_encoding() {
    assert_eq!(
      hex::encode(genesis(100).encipher().unwrap().as_bytes()),
      "6a04534c500001010747454e455349534c004c004c004c0001004c00080000000000000064",
    );
  }

  #[test]
  fn convenience_encoders() {
    assert_eq!(
      encode_genesis(
        TokenType::Fungible,
        Genesis {
          quantity: 100,
          ..Default::default()
        }
      )
      .unwrap(),
      genesis(100).encipher().unwrap(),
    );
    assert_eq!(
      Message::decipher(&encode_mint(TokenType::Fungible, TOKEN_ID, Some(2), 0).unwrap()).unwrap(),
      Message {
        token_type: TokenType::Fungible,
        operation: Operation::Mint(Mint {
          token_id: TOKEN_ID,
          mint_baton_vout: Some(2),
          quantity: 0,
        }),
      },
    );
    assert_eq!(
      Message::decipher(&encode_send(TokenType::Fungible, TOKEN_ID, &[1, u64::MAX]).unwrap())
        .unwrap(),
      send(TokenType::Fungible, &[1, u64::MAX]),
    );
    assert_eq!(
      encode_mint(TokenType::NftChild, TOKEN_ID, None, 1),
      Err(Error::NftChild("NFT child tokens cannot be minted")),
    );
  }

  #[test]
  fn reference_genesis_decodes() {
    assert_eq!(
      Message::decipher(&script(
        "6a04534c500001010747454e455349534c004c004c004c0001004c00080000000000000064"
      ))
      .unwrap(),
      genesis(100),
    );
  }

  #[test]
  fn genesis_with_all_fields() {
    case(Message {
      token_type: TokenType::NftGroup,
      operation: Operation::Genesis(Genesis {
        ticker: b"TOK".to_vec(),
        name: b"Token".to_vec(),
        document_uri: b"https://example.com".to_vec(),
        document_hash: Some([1; 32]),
        decimals: 9,
        mint_baton_vout: Some(2),
        quantity: u64::MAX,
      }),
    });
  }

  #[test]
  fn mint() {
    case(Message {
      token_type: TokenType::Fungible,
      operation: Operation::Mint(Mint {
        token_id: TOKEN_ID,
        mint_baton_vout: Some(255),
        quantity: 1000,
      }),
    });

    case(Message {
      token_type: TokenType::NftGroup,
      operation: Operation::Mint(Mint {
        token_id: TOKEN_ID,
        mint_baton_vout: None,
        quantity: 0,
      }),
    });
  }

  #[test]
  fn send_outputs_carry_sentinel() {
    let message = send(TokenType::Fungible, &[5, 6]);
    let Operation::Send(transfer) = &message.operation else {
      panic!();
    };
    assert_eq!(transfer.outputs, [0, 5, 6]);
    case(message);
  }

  #[test]
  fn send_with_maximum_outputs() {
    case(send(TokenType::Fungible, &[u64::MAX; 19]));
  }

  #[test]
  fn send_output_count_is_checked_on_encode() {
    assert_eq!(
      send(TokenType::Fungible, &[]).encipher(),
      Err(Error::SendOutputs(0))
    );
    assert_eq!(
      send(TokenType::Fungible, &[1; 20]).encipher(),
      Err(Error::SendOutputs(20))
    );
  }

  #[test]
  fn send_output_count_is_checked_on_decode() {
    let mut script = vec![0x6a];
    push::push(&LOKAD_ID, &mut script).unwrap();
    push::push(&[1], &mut script).unwrap();
    push::push(b"SEND", &mut script).unwrap();
    push::push(&[0xab; 32], &mut script).unwrap();
    for _ in 0..20 {
      push::push(&[0; 8], &mut script).unwrap();
    }
    assert_eq!(
      Message::decipher(&ScriptBuf::from_bytes(script)),
      Err(Error::SendOutputs(20))
    );
  }

  #[test]
  fn decimals_out_of_range() {
    let message = Message {
      token_type: TokenType::Fungible,
      operation: Operation::Genesis(Genesis {
        decimals: 10,
        ..Default::default()
      }),
    };
    assert_eq!(message.encipher(), Err(Error::Decimals(10)));
    assert_eq!(message.encipher().unwrap_err().kind(), ErrorKind::Range);
  }

  #[test]
  fn mint_baton_vout_out_of_range() {
    let message = Message {
      token_type: TokenType::Fungible,
      operation: Operation::Mint(Mint {
        token_id: TOKEN_ID,
        mint_baton_vout: Some(1),
        quantity: 1,
      }),
    };
    assert_eq!(message.encipher(), Err(Error::MintBatonOutput(1)));
  }

  #[test]
  fn oversized_script_is_rejected() {
    let message = Message {
      token_type: TokenType::Fungible,
      operation: Operation::Genesis(Genesis {
        ticker: vec![b'A'; 100],
        name: vec![b'B'; 100],
        quantity: 1,
        ..Default::default()
      }),
    };
    assert!(matches!(message.encipher(), Err(Error::ScriptSize(_))));
  }

  #[test]
  fn oversized_field_is_rejected() {
    let message = Message {
      token_type: TokenType::Fungible,
      operation: Operation::Genesis(Genesis {
        name: vec![b'B'; 256],
        quantity: 1,
        ..Default::default()
      }),
    };
    assert_eq!(message.encipher(), Err(Error::PushSize(256)));
  }

  #[test]
  fn nft_child_rules_are_checked_on_encode() {
    let child = |quantity, decimals, mint_baton_vout| Message {
      token_type: TokenType::NftChild,
      operation: Operation::Genesis(Genesis {
        decimals,
        mint_baton_vout,
        quantity,
        ..Default::default()
      }),
    };

    assert!(child(1, 0, None).encipher().is_ok());
    assert!(matches!(
      child(2, 0, None).encipher(),
      Err(Error::NftChild(_))
    ));
    assert!(matches!(
      child(1, 1, None).encipher(),
      Err(Error::NftChild(_))
    ));
    assert!(matches!(
      child(1, 0, Some(2)).encipher(),
      Err(Error::NftChild(_))
    ));
    assert!(matches!(
      send(TokenType::NftChild, &[2]).encipher(),
      Err(Error::NftChild(_))
    ));
    assert!(send(TokenType::NftChild, &[1]).encipher().is_ok());
  }

  #[test]
  fn token_type_variants_decode() {
    case(send(TokenType::NftChild, &[1]));
    case(send(TokenType::NftGroup, &[1, 2, 3]));
  }

  #[test]
  fn two_byte_token_type_decodes() {
    let message = Message::decipher(&script(
      "6a04534c50000200410453454e4420abababababababababababababababababababababababababababababababab080000000000000001",
    ))
    .unwrap();
    assert_eq!(message, send(TokenType::NftChild, &[1]));
  }

  #[test]
  fn format_errors() {
    #[track_caller]
    fn error(hex: &str, expected: Error) {
      let err = Message::decipher(&script(hex)).unwrap_err();
      assert_eq!(err, expected);
      assert_eq!(err.kind(), ErrorKind::Format);
    }

    error("", Error::NotOpReturn);
    error("6a", Error::ProtocolIdentifier);
    error("6a04534c5001", Error::ProtocolIdentifier);
    error("6a04534c5000", Error::Truncated("token type"));
    error("6a04534c50000101", Error::Truncated("transaction type"));
    error("6a04534c5000010104424f4f4d", Error::TransactionType);
    error("6a04534c5000010200", Error::OpZero);
    error("6a04534c5000010251", Error::Opcode);
    error("6a04534c500001010453454e44", Error::Truncated("token id"));
    error(
      "6a04534c5000010104534e4544",
      Error::TransactionType,
    );
    error(
      "6a04534c50000101044d494e54",
      Error::FieldCount {
        operation: "MINT",
        expected: 3,
        actual: 0,
      },
    );
  }

  #[test]
  fn wrong_quantity_length() {
    let mut script = vec![0x6a];
    push::push(&LOKAD_ID, &mut script).unwrap();
    push::push(&[1], &mut script).unwrap();
    push::push(b"MINT", &mut script).unwrap();
    push::push(&[0xab; 32], &mut script).unwrap();
    push::push(&[], &mut script).unwrap();
    push::push(&[0; 7], &mut script).unwrap();
    assert_eq!(
      Message::decipher(&ScriptBuf::from_bytes(script)),
      Err(Error::FieldLength {
        field: "quantity",
        expected: 8,
        actual: 7
      })
    );
  }

  #[test]
  fn wrong_document_hash_length() {
    let mut script = vec![0x6a];
    push::push(&LOKAD_ID, &mut script).unwrap();
    push::push(&[1], &mut script).unwrap();
    push::push(b"GENESIS", &mut script).unwrap();
    push::push(&[], &mut script).unwrap();
    push::push(&[], &mut script).unwrap();
    push::push(&[], &mut script).unwrap();
    push::push(&[1; 31], &mut script).unwrap();
    push::push(&[0], &mut script).unwrap();
    push::push(&[], &mut script).unwrap();
    push::push(&[0; 8], &mut script).unwrap();
    assert_eq!(
      Message::decipher(&ScriptBuf::from_bytes(script)),
      Err(Error::OptionalFieldLength {
        field: "document hash",
        expected: 32,
        actual: 31
      })
    );
  }

  #[test]
  fn range_errors_on_decode() {
    let mut script = vec![0x6a];
    push::push(&LOKAD_ID, &mut script).unwrap();
    push::push(&[1], &mut script).unwrap();
    push::push(b"GENESIS", &mut script).unwrap();
    push::push(&[], &mut script).unwrap();
    push::push(&[], &mut script).unwrap();
    push::push(&[], &mut script).unwrap();
    push::push(&[], &mut script).unwrap();
    push::push(&[10], &mut script).unwrap();
    push::push(&[], &mut script).unwrap();
    push::push(&[0; 8], &mut script).unwrap();
    let err = Message::decipher(&ScriptBuf::from_bytes(script)).unwrap_err();
    assert_eq!(err, Error::Decimals(10));
    assert_eq!(err.kind(), ErrorKind::Range);
  }

  #[test]
  fn mint_baton_vout_is_checked_on_decode() {
    let mint = |baton: &[u8]| {
      let mut script = vec![0x6a];
      push::push(&LOKAD_ID, &mut script).unwrap();
      push::push(&[1], &mut script).unwrap();
      push::push(b"MINT", &mut script).unwrap();
      push::push(TOKEN_ID.as_bytes(), &mut script).unwrap();
      push::push(baton, &mut script).unwrap();
      push::push(&[0; 8], &mut script).unwrap();
      Message::decipher(&ScriptBuf::from_bytes(script)).map(|message| message.mint_baton_vout())
    };

    assert_eq!(mint(&[]), Ok(None));
    assert_eq!(mint(&[1]), Err(Error::MintBatonOutput(1)));
    assert_eq!(mint(&[2]), Ok(Some(2)));
    assert_eq!(mint(&[255]), Ok(Some(255)));
    assert!(matches!(
      mint(&[2, 3]),
      Err(Error::OptionalFieldLength { .. })
    ));
  }

  #[test]
  fn from_transaction_uses_first_output() {
    use bitcoin::{absolute::LockTime, transaction::Version, Amount, TxOut};

    let mut transaction = Transaction {
      version: Version::TWO,
      lock_time: LockTime::ZERO,
      input: Vec::new(),
      output: Vec::new(),
    };

    assert_eq!(
      Message::from_transaction(&transaction),
      Err(Error::NoOutputs)
    );

    transaction.output.push(TxOut {
      value: Amount::ZERO,
      script_pubkey: genesis(7).encipher().unwrap(),
    });

    assert_eq!(Message::from_transaction(&transaction), Ok(genesis(7)));
  }

  #[test]
  fn token_id() {
    let txid = "959a6818cba5af8aba391d3f7649f5f6a5ceb6cdcd2c2a3dcb5d2fbfc4b08e98"
      .parse::<Txid>()
      .unwrap();
    assert_eq!(genesis(1).token_id(txid), TokenId::from(txid));
    assert_eq!(send(TokenType::Fungible, &[1]).token_id(txid), TOKEN_ID);
  }

  #[test]
  fn quantity() {
    assert_eq!(genesis(5).quantity(1), Some(5));
    assert_eq!(genesis(5).quantity(2), None);
    let message = send(TokenType::Fungible, &[5, 6]);
    assert_eq!(message.quantity(0), Some(0));
    assert_eq!(message.quantity(2), Some(6));
    assert_eq!(message.quantity(3), None);
  }

  #[test]
  fn serde() {
    let message = send(TokenType::Fungible, &[5]);
    let json = serde_json::to_string(&message).unwrap();
    assert_eq!(
      json,
      format!(
        r#"{{"token_type":1,"operation":{{"transaction_type":"SEND","token_id":"{TOKEN_ID}","outputs":[0,5]}}}}"#
      )
    );
    assert_eq!(serde_json::from_str::<Message>(&json).unwrap(), message);
  }
}
