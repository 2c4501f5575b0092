use super::*;

/// Issuance of additional supply, authorized by spending the mint baton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mint {
  pub token_id: TokenId,
  pub mint_baton_vout: Option<u8>,
  pub quantity: u64,
}

impl Mint {
  pub(crate) fn decode(fields: &[&[u8]]) -> Result<Self, Error> {
    let [token_id, mint_baton_vout, quantity] = fields else {
      return Err(Error::FieldCount {
        operation: "MINT",
        expected: 3,
        actual: fields.len(),
      });
    };

    Ok(Self {
      token_id: TokenId::decode(token_id)?,
      mint_baton_vout: decode_mint_baton_vout(mint_baton_vout)?,
      quantity: decode_quantity(quantity)?,
    })
  }

  pub(crate) fn encode(&self, script: &mut Vec<u8>) -> Result<(), Error> {
    push::push(self.token_id.as_bytes(), script)?;
    encode_mint_baton_vout(self.mint_baton_vout, script)?;
    encode_quantity(self.quantity, script)
  }
}
