use super::*;

type Batch = Shared<BoxFuture<'static, Result<Arc<HashMap<Txid, Arc<Transaction>>>, Error>>>;

#[derive(Clone)]
pub(super) enum Slot {
  Pending(Batch),
  Ready(Arc<Transaction>),
}

/// Decode a retrieved raw transaction, checking that it hashes to `expected`
/// when an id was requested.
pub(super) fn parse(expected: Option<Txid>, hex: &str) -> Result<Transaction, Error> {
  let malformed = |message: String| Error::Malformed {
    txid: expected,
    message,
  };

  if !re::RAW_TRANSACTION.is_match(hex) {
    return Err(malformed(
      "expected at least 61 bytes of hex-encoded data".into(),
    ));
  }

  let bytes = hex::decode(hex).map_err(|err| malformed(err.to_string()))?;

  let transaction = consensus::deserialize::<Transaction>(&bytes)
    .map_err(|err| malformed(err.to_string()))?;

  if let Some(expected) = expected {
    let actual = transaction.compute_txid();
    if actual != expected {
      return Err(Error::TxidMismatch { expected, actual });
    }
  }

  Ok(transaction)
}

impl<F: Fetch + 'static> Inner<F> {
  pub(super) fn insert_transaction(&self, txid: Txid, transaction: Arc<Transaction>) {
    self
      .transactions
      .lock()
      .unwrap()
      .insert(txid, Slot::Ready(transaction));
  }

  pub(super) async fn transaction(
    self: &Arc<Self>,
    txid: Txid,
    token: &CancellationToken,
  ) -> Result<Arc<Transaction>, Error> {
    loop {
      let slot = self.slots(&[txid], token).pop();

      let result = match slot {
        Some((txid, slot)) => self.wait(txid, slot).await,
        None => Err(Error::MissingTransaction { txid }),
      };

      match result {
        Err(Error::Cancelled) if !token.is_cancelled() => continue,
        result => return result,
      }
    }
  }

  /// Transactions for `txids`, in order. Ids not already cached or in flight
  /// are requested from the fetcher in a single batch.
  pub(super) async fn transactions(
    self: &Arc<Self>,
    txids: &[Txid],
    token: &CancellationToken,
  ) -> Result<Vec<Arc<Transaction>>, Error> {
    'retry: loop {
      let mut transactions = Vec::with_capacity(txids.len());

      for (txid, slot) in self.slots(txids, token) {
        match self.wait(txid, slot).await {
          Ok(transaction) => transactions.push(transaction),
          Err(Error::Cancelled) if !token.is_cancelled() => continue 'retry,
          Err(err) => return Err(err),
        }
      }

      return Ok(transactions);
    }
  }

  fn slots(self: &Arc<Self>, txids: &[Txid], token: &CancellationToken) -> Vec<(Txid, Slot)> {
    let mut cache = self.transactions.lock().unwrap();

    let missing = txids
      .iter()
      .filter(|txid| !cache.contains_key(*txid))
      .copied()
      .collect::<BTreeSet<Txid>>();

    let batch = {
      let inner = Arc::clone(self);
      let token = token.clone();
      let missing = missing.iter().copied().collect::<Vec<Txid>>();
      async move {
        token
          .run_until_cancelled(inner.fetch(missing))
          .await
          .unwrap_or(Err(Error::Cancelled))
      }
      .boxed()
      .shared()
    };

    txids
      .iter()
      .map(|txid| {
        let slot = cache
          .entry(*txid)
          .or_insert_with(|| Slot::Pending(batch.clone()))
          .clone();
        (*txid, slot)
      })
      .collect()
  }

  async fn wait(&self, txid: Txid, slot: Slot) -> Result<Arc<Transaction>, Error> {
    let batch = match slot {
      Slot::Ready(transaction) => return Ok(transaction),
      Slot::Pending(batch) => batch,
    };

    let result = batch.clone().await.and_then(|transactions| {
      transactions
        .get(&txid)
        .cloned()
        .ok_or(Error::MissingTransaction { txid })
    });

    let mut cache = self.transactions.lock().unwrap();

    match result {
      Ok(transaction) => {
        cache.insert(txid, Slot::Ready(transaction.clone()));
        Ok(transaction)
      }
      Err(err) => {
        cache.retain(|_, slot| !matches!(slot, Slot::Pending(pending) if pending.ptr_eq(&batch)));
        Err(err)
      }
    }
  }

  async fn fetch(
    self: Arc<Self>,
    txids: Vec<Txid>,
  ) -> Result<Arc<HashMap<Txid, Arc<Transaction>>>, Error> {
    log::debug!("Fetching {} raw transactions", txids.len());

    let hexes = self
      .fetcher
      .fetch(&txids)
      .await
      .map_err(|err| Error::Retrieval {
        count: txids.len(),
        message: format!("{err:#}"),
      })?;

    if hexes.len() != txids.len() {
      return Err(Error::ResponseCount {
        expected: txids.len(),
        actual: hexes.len(),
      });
    }

    txids
      .into_iter()
      .zip(hexes)
      .map(|(txid, hex)| Ok((txid, Arc::new(parse(Some(txid), &hex)?))))
      .collect::<Result<HashMap<Txid, Arc<Transaction>>, Error>>()
      .map(Arc::new)
  }
}
