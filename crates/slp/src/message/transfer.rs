use super::*;

/// A SEND. `outputs[0]` is always zero, so `outputs[vout]` is the quantity
/// assigned to output `vout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
  pub token_id: TokenId,
  pub outputs: Vec<u64>,
}

impl Transfer {
  pub fn new(token_id: TokenId, amounts: impl IntoIterator<Item = u64>) -> Self {
    Self {
      token_id,
      outputs: std::iter::once(0).chain(amounts).collect(),
    }
  }

  /// Quantities assigned to outputs 1 and up.
  pub fn amounts(&self) -> &[u64] {
    self.outputs.get(1..).unwrap_or_default()
  }

  pub fn quantity(&self, vout: u32) -> Option<u64> {
    self
      .outputs
      .get(usize::try_from(vout).ok()?)
      .copied()
  }

  pub fn total(&self) -> u128 {
    self.amounts().iter().copied().map(u128::from).sum()
  }

  pub(crate) fn decode(fields: &[&[u8]]) -> Result<Self, Error> {
    let (token_id, amounts) = fields.split_first().ok_or(Error::Truncated("token id"))?;

    let token_id = TokenId::decode(token_id)?;

    if amounts.is_empty() || amounts.len() > MAX_SEND_OUTPUTS {
      return Err(Error::SendOutputs(amounts.len()));
    }

    let amounts = amounts
      .iter()
      .map(|amount| decode_quantity(amount))
      .collect::<Result<Vec<u64>, Error>>()?;

    Ok(Self::new(token_id, amounts))
  }

  pub(crate) fn encode(&self, script: &mut Vec<u8>) -> Result<(), Error> {
    push::push(self.token_id.as_bytes(), script)?;

    for amount in self.amounts() {
      encode_quantity(*amount, script)?;
    }

    Ok(())
  }
}
