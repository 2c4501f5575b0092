use super::*;

/// Creation of a new token. The GENESIS quantity is assigned to output 1.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
  #[serde_as(as = "serde_with::hex::Hex")]
  pub ticker: Vec<u8>,
  #[serde_as(as = "serde_with::hex::Hex")]
  pub name: Vec<u8>,
  #[serde_as(as = "serde_with::hex::Hex")]
  pub document_uri: Vec<u8>,
  #[serde_as(as = "Option<serde_with::hex::Hex>")]
  pub document_hash: Option<[u8; 32]>,
  pub decimals: u8,
  pub mint_baton_vout: Option<u8>,
  pub quantity: u64,
}

impl Genesis {
  pub(crate) fn decode(fields: &[&[u8]]) -> Result<Self, Error> {
    let [ticker, name, document_uri, document_hash, decimals, mint_baton_vout, quantity] = fields
    else {
      return Err(Error::FieldCount {
        operation: "GENESIS",
        expected: 7,
        actual: fields.len(),
      });
    };

    let document_hash = match document_hash.len() {
      0 => None,
      len => Some(
        (*document_hash)
          .try_into()
          .map_err(|_| Error::OptionalFieldLength {
            field: "document hash",
            expected: 32,
            actual: len,
          })?,
      ),
    };

    let decimals = match **decimals {
      [decimals] if decimals > MAX_DECIMALS => return Err(Error::Decimals(decimals)),
      [decimals] => decimals,
      _ => {
        return Err(Error::FieldLength {
          field: "decimals",
          expected: 1,
          actual: decimals.len(),
        })
      }
    };

    Ok(Self {
      ticker: ticker.to_vec(),
      name: name.to_vec(),
      document_uri: document_uri.to_vec(),
      document_hash,
      decimals,
      mint_baton_vout: decode_mint_baton_vout(mint_baton_vout)?,
      quantity: decode_quantity(quantity)?,
    })
  }

  pub(crate) fn encode(&self, script: &mut Vec<u8>) -> Result<(), Error> {
    push::push(&self.ticker, script)?;
    push::push(&self.name, script)?;
    push::push(&self.document_uri, script)?;
    push::push(
      self
        .document_hash
        .as_ref()
        .map(<[u8; 32]>::as_slice)
        .unwrap_or_default(),
      script,
    )?;
    push::push(&[self.decimals], script)?;
    encode_mint_baton_vout(self.mint_baton_vout, script)?;
    encode_quantity(self.quantity, script)
  }
}
