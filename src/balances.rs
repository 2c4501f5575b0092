use super::*;

/// An unspent output, along with the metadata output of the transaction that
/// created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
  pub outpoint: OutPoint,
  #[serde(with = "bitcoin::amount::serde::as_sat")]
  pub value: Amount,
  pub metadata: ScriptBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedUtxo {
  pub outpoint: OutPoint,
  #[serde(with = "bitcoin::amount::serde::as_sat")]
  pub value: Amount,
  pub message: Option<Message>,
  pub judgement: Judgement,
}

/// A wallet's UTXO set partitioned by judgement, with per-token balances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balances {
  pub token_balances: BTreeMap<TokenId, BigDecimal>,
  pub token_utxos: BTreeMap<TokenId, Vec<ClassifiedUtxo>>,
  pub baton_utxos: BTreeMap<TokenId, Vec<ClassifiedUtxo>>,
  pub non_slp_utxos: Vec<ClassifiedUtxo>,
  pub invalid_token_utxos: Vec<ClassifiedUtxo>,
  pub invalid_baton_utxos: Vec<ClassifiedUtxo>,
  #[serde(with = "bitcoin::amount::serde::as_sat")]
  pub satoshis_available: Amount,
  #[serde(with = "bitcoin::amount::serde::as_sat")]
  pub satoshis_locked_in_tokens: Amount,
  #[serde(with = "bitcoin::amount::serde::as_sat")]
  pub satoshis_locked_in_batons: Amount,
  #[serde(with = "bitcoin::amount::serde::as_sat")]
  pub satoshis_in_invalid_tokens: Amount,
  #[serde(with = "bitcoin::amount::serde::as_sat")]
  pub satoshis_in_invalid_batons: Amount,
}

impl Default for Balances {
  fn default() -> Self {
    Self {
      token_balances: BTreeMap::new(),
      token_utxos: BTreeMap::new(),
      baton_utxos: BTreeMap::new(),
      non_slp_utxos: Vec::new(),
      invalid_token_utxos: Vec::new(),
      invalid_baton_utxos: Vec::new(),
      satoshis_available: Amount::ZERO,
      satoshis_locked_in_tokens: Amount::ZERO,
      satoshis_locked_in_batons: Amount::ZERO,
      satoshis_in_invalid_tokens: Amount::ZERO,
      satoshis_in_invalid_batons: Amount::ZERO,
    }
  }
}

impl Balances {
  /// Number of UTXOs across all buckets.
  pub fn len(&self) -> usize {
    self.token_utxos.values().map(Vec::len).sum::<usize>()
      + self.baton_utxos.values().map(Vec::len).sum::<usize>()
      + self.non_slp_utxos.len()
      + self.invalid_token_utxos.len()
      + self.invalid_baton_utxos.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn insert(&mut self, utxo: ClassifiedUtxo) {
    let token_id = utxo
      .message
      .as_ref()
      .map(|message| message.token_id(utxo.outpoint.txid));

    match (utxo.judgement, token_id) {
      (Judgement::SlpToken { amount }, Some(token_id)) => {
        *self.token_balances.entry(token_id).or_default() += BigDecimal::from(amount);
        self.satoshis_locked_in_tokens += utxo.value;
        self.token_utxos.entry(token_id).or_default().push(utxo);
      }
      (Judgement::SlpBaton, Some(token_id)) => {
        self.satoshis_locked_in_batons += utxo.value;
        self.baton_utxos.entry(token_id).or_default().push(utxo);
      }
      (Judgement::InvalidTokenDag, _) => {
        self.satoshis_in_invalid_tokens += utxo.value;
        self.invalid_token_utxos.push(utxo);
      }
      (Judgement::InvalidBatonDag, _) => {
        self.satoshis_in_invalid_batons += utxo.value;
        self.invalid_baton_utxos.push(utxo);
      }
      _ => {
        self.satoshis_available += utxo.value;
        self.non_slp_utxos.push(utxo);
      }
    }
  }
}

/// Classify `utxos` and partition them into balances. Token and baton outputs
/// whose transactions `validator` does not vouch for are downgraded to their
/// invalid-DAG judgements. Validity is requested once, for all distinct
/// token-bearing transactions.
pub async fn summarize(
  utxos: Vec<Utxo>,
  validator: &impl Validate,
) -> Result<Balances, validator::Error> {
  let count = utxos.len();

  let classified = utxos
    .into_iter()
    .map(|utxo| {
      let (judgement, message) = Judgement::classify(&utxo.metadata, utxo.outpoint.vout);
      ClassifiedUtxo {
        outpoint: utxo.outpoint,
        value: utxo.value,
        message,
        judgement,
      }
    })
    .collect::<Vec<ClassifiedUtxo>>();

  let txids = classified
    .iter()
    .filter(|utxo| utxo.judgement.is_slp())
    .map(|utxo| utxo.outpoint.txid)
    .collect::<BTreeSet<Txid>>()
    .into_iter()
    .collect::<Vec<Txid>>();

  log::debug!(
    "Validating {} transactions for {count} utxos",
    txids.len()
  );

  let valid = validator
    .validate_many(&txids)
    .await?
    .into_iter()
    .collect::<HashSet<Txid>>();

  let mut balances = Balances::default();

  for mut utxo in classified {
    if utxo.judgement.is_slp() && !valid.contains(&utxo.outpoint.txid) {
      utxo.judgement = utxo.judgement.invalidate();
    }

    balances.insert(utxo);
  }

  assert_eq!(
    balances.len(),
    count,
    "utxo buckets do not partition the input set"
  );

  Ok(balances)
}
