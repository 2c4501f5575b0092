//! Token DAG validation.
//!
//! A transaction's token claim is valid when the outputs it spends trace back
//! through valid transactions to the token's GENESIS. Results are memoized
//! per transaction id for the lifetime of the [`Validator`], and each id is
//! resolved at most once: concurrent requests for the same id share a single
//! resolution task.

use {
  super::*,
  futures::future::{self, BoxFuture, FutureExt, Shared},
  slp::{Genesis, Mint},
  tokio_util::sync::CancellationToken,
};

pub use self::{
  entry::{Parent, ValidationEntry},
  error::Error,
  invalid::Invalid,
};

use self::{
  entry::{Entry, State},
  transactions::Slot,
};

mod entry;
mod error;
mod invalid;
mod transactions;

type Validity = Shared<BoxFuture<'static, Result<bool, Error>>>;

/// Request-level restrictions. A transaction outside the filter is reported
/// invalid without affecting its memoized validity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
  pub token_id: Option<TokenId>,
  pub token_type: Option<TokenType>,
}

/// Validity oracle used by [`summarize`](crate::summarize).
#[async_trait]
pub trait Validate: Send + Sync {
  /// The subset of `txids` that are valid, deduplicated, in input order.
  async fn validate_many(&self, txids: &[Txid]) -> Result<Vec<Txid>, Error>;
}

enum Verdict {
  Valid,
  Invalid(Invalid),
}

pub struct Validator<F> {
  inner: Arc<Inner<F>>,
}

impl<F> Clone for Validator<F> {
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
    }
  }
}

struct Inner<F> {
  entries: Mutex<HashMap<Txid, Entry>>,
  fetcher: F,
  transactions: Mutex<HashMap<Txid, Slot>>,
}

impl<F: Fetch + 'static> Validator<F> {
  pub fn new(fetcher: F) -> Self {
    Self {
      inner: Arc::new(Inner {
        entries: default(),
        fetcher,
        transactions: default(),
      }),
    }
  }

  /// Whether `txid`'s token claim is valid. Must be called from within a tokio
  /// runtime.
  ///
  /// Dropping the returned future cancels resolution work it started that no
  /// other request is waiting on.
  pub async fn is_valid(&self, txid: Txid, filter: Filter) -> Result<bool, Error> {
    let token = CancellationToken::new();
    let _guard = token.clone().drop_guard();

    log::info!("Validating {txid}");

    let valid = self.inner.check(txid, filter, &token).await?;

    log::info!("{txid} is {}", if valid { "valid" } else { "invalid" });

    Ok(valid)
  }

  /// Validate `txids` concurrently, returning the valid subset in input order.
  pub async fn validate_many(&self, txids: &[Txid]) -> Result<Vec<Txid>, Error> {
    let mut seen = HashSet::new();

    let txids = txids
      .iter()
      .copied()
      .filter(|txid| seen.insert(*txid))
      .collect::<Vec<Txid>>();

    let results =
      future::try_join_all(txids.iter().map(|txid| self.is_valid(*txid, default()))).await?;

    Ok(
      txids
        .into_iter()
        .zip(results)
        .filter_map(|(txid, valid)| valid.then_some(txid))
        .collect(),
    )
  }

  /// Record a validity result obtained from a trusted source. An existing
  /// result for the same transaction is kept.
  pub fn seed(
    &self,
    hex: &str,
    valid: bool,
    token_id: Option<TokenId>,
    token_type: Option<TokenType>,
  ) -> Result<Txid, Error> {
    let transaction = transactions::parse(None, hex)?;

    let txid = transaction.compute_txid();

    let message = Message::from_transaction(&transaction).ok();

    if token_id.is_some() || token_type.is_some() {
      let matches = message.as_ref().is_some_and(|message| {
        token_id.is_none_or(|token_id| message.token_id(txid) == token_id)
          && token_type.is_none_or(|token_type| message.token_type == token_type)
      });

      if !matches {
        return Err(Error::SeedMismatch { txid });
      }
    }

    self.inner.insert_transaction(txid, Arc::new(transaction));

    self
      .inner
      .entries
      .lock()
      .unwrap()
      .entry(txid)
      .or_insert_with(|| Entry {
        message,
        parents: Vec::new(),
        reason: (!valid).then_some(Invalid::Seeded),
        state: State::Resolved(valid),
      });

    Ok(txid)
  }

  pub fn entry(&self, txid: Txid) -> Option<ValidationEntry> {
    self
      .inner
      .entries
      .lock()
      .unwrap()
      .get(&txid)
      .map(Entry::snapshot)
  }

  pub fn reason(&self, txid: Txid) -> Option<Invalid> {
    self
      .inner
      .entries
      .lock()
      .unwrap()
      .get(&txid)
      .and_then(|entry| entry.reason.clone())
  }

  /// Raw transaction `txid`, from the validator's cache or its fetcher.
  pub async fn transaction(&self, txid: Txid) -> Result<Arc<Transaction>, Error> {
    let token = CancellationToken::new();
    let _guard = token.clone().drop_guard();
    self.inner.transaction(txid, &token).await
  }
}

#[async_trait]
impl<F: Fetch + 'static> Validate for Validator<F> {
  async fn validate_many(&self, txids: &[Txid]) -> Result<Vec<Txid>, Error> {
    Validator::validate_many(self, txids).await
  }
}

impl<F: Fetch + 'static> Inner<F> {
  async fn check(
    self: &Arc<Self>,
    txid: Txid,
    filter: Filter,
    token: &CancellationToken,
  ) -> Result<bool, Error> {
    if filter != Filter::default() {
      let transaction = self.transaction(txid, token).await?;

      if let Ok(message) = Message::from_transaction(&transaction) {
        if let Some(token_id) = filter.token_id {
          if message.token_id(txid) != token_id {
            log::info!("{txid} is for token {}, not {token_id}", message.token_id(txid));
            return Ok(false);
          }
        }

        if let Some(token_type) = filter.token_type {
          if message.token_type != token_type {
            log::info!(
              "{txid} has token type {}, not {token_type}",
              message.token_type
            );
            return Ok(false);
          }
        }
      }
    }

    self.validity(txid, token).await
  }

  async fn validity(
    self: &Arc<Self>,
    txid: Txid,
    token: &CancellationToken,
  ) -> Result<bool, Error> {
    loop {
      let validity = {
        let mut entries = self.entries.lock().unwrap();

        match entries.get(&txid).map(|entry| &entry.state) {
          Some(State::Resolved(valid)) => return Ok(*valid),
          Some(State::Pending(validity)) => validity.clone(),
          None => {
            let validity = Arc::clone(self).spawn(txid, token.clone());
            entries.insert(txid, Entry::pending(validity.clone()));
            validity
          }
        }
      };

      match token.run_until_cancelled(validity).await {
        None => return Err(Error::Cancelled),
        // the request that started the resolution was abandoned
        Some(Err(Error::Cancelled)) if !token.is_cancelled() => continue,
        Some(result) => return result,
      }
    }
  }

  fn spawn(self: Arc<Self>, txid: Txid, token: CancellationToken) -> Validity {
    tokio::spawn(async move {
      let result = token
        .run_until_cancelled(Arc::clone(&self).resolve(txid, token.clone()))
        .await
        .unwrap_or(Err(Error::Cancelled));

      self.settle(txid, &result);

      result.map(|verdict| matches!(verdict, Verdict::Valid))
    })
    .map(move |joined| {
      joined.unwrap_or_else(|err| {
        Err(Error::Task {
          txid,
          message: err.to_string(),
        })
      })
    })
    .boxed()
    .shared()
  }

  fn settle(&self, txid: Txid, result: &Result<Verdict, Error>) {
    let mut entries = self.entries.lock().unwrap();

    match result {
      Ok(verdict) => {
        if let Some(entry) = entries.get_mut(&txid) {
          match verdict {
            Verdict::Valid => entry.state = State::Resolved(true),
            Verdict::Invalid(invalid) => {
              log::info!("{txid} is invalid: {invalid}");
              entry.state = State::Resolved(false);
              entry.reason = Some(invalid.clone());
            }
          }
        }
      }
      Err(err) => {
        log::debug!("Validation of {txid} failed: {err}");
        if let Some(Entry {
          state: State::Pending(_),
          ..
        }) = entries.get(&txid)
        {
          entries.remove(&txid);
        }
      }
    }
  }

  fn update(&self, txid: Txid, f: impl FnOnce(&mut Entry)) {
    if let Some(entry) = self.entries.lock().unwrap().get_mut(&txid) {
      f(entry);
    }
  }

  fn resolve(
    self: Arc<Self>,
    txid: Txid,
    token: CancellationToken,
  ) -> BoxFuture<'static, Result<Verdict, Error>> {
    async move {
      let transaction = self.transaction(txid, &token).await?;

      let message = match Message::from_transaction(&transaction) {
        Ok(message) => message,
        Err(err) => return Ok(Verdict::Invalid(Invalid::Format(err))),
      };

      self.update(txid, |entry| entry.message = Some(message.clone()));

      match &message.operation {
        Operation::Genesis(genesis) if message.token_type == TokenType::NftChild => {
          self
            .nft_child_genesis(txid, &transaction, genesis, &token)
            .await
        }
        Operation::Genesis(_) => Ok(Verdict::Valid),
        Operation::Mint(_) | Operation::Send(_) => {
          self.spends(txid, &transaction, &message, &token).await
        }
      }
    }
    .boxed()
  }

  async fn nft_child_genesis(
    self: &Arc<Self>,
    txid: Txid,
    transaction: &Transaction,
    genesis: &Genesis,
    token: &CancellationToken,
  ) -> Result<Verdict, Error> {
    if genesis.quantity != 1 {
      return Ok(Verdict::Invalid(Invalid::NftChildQuantity));
    }

    if genesis.mint_baton_vout.is_some() {
      return Ok(Verdict::Invalid(Invalid::NftChildBaton));
    }

    if genesis.decimals != 0 {
      return Ok(Verdict::Invalid(Invalid::NftChildDecimals));
    }

    let Some(input) = transaction.input.first() else {
      return Ok(Verdict::Invalid(Invalid::NftParentMissing));
    };

    let OutPoint { txid: parent, vout } = input.previous_output;

    let group = match Message::from_transaction(&*self.transaction(parent, token).await?) {
      Ok(message) if message.token_type == TokenType::NftGroup => message,
      _ => return Ok(Verdict::Invalid(Invalid::NftParentMissing)),
    };

    // group quantity at the output the child GENESIS consumes
    let quantity = group.quantity(vout).unwrap_or_default();

    self.update(txid, |entry| {
      entry.parents = vec![Parent {
        txid: parent,
        vout,
        token_type: group.token_type,
        valid: None,
        quantity: Some(quantity),
      }];
    });

    if quantity == 0 {
      return Ok(Verdict::Invalid(Invalid::NftParentQuantity));
    }

    let valid = self
      .check(
        parent,
        Filter {
          token_id: None,
          token_type: Some(TokenType::NftGroup),
        },
        token,
      )
      .await?;

    self.update(txid, |entry| {
      for parent in &mut entry.parents {
        parent.valid = Some(valid);
      }
    });

    Ok(if valid {
      Verdict::Valid
    } else {
      Verdict::Invalid(Invalid::NftParentDag)
    })
  }

  /// Validate a MINT or SEND against the token inputs it spends.
  async fn spends(
    self: &Arc<Self>,
    txid: Txid,
    transaction: &Transaction,
    message: &Message,
    token: &CancellationToken,
  ) -> Result<Verdict, Error> {
    if message.token_type == TokenType::NftChild
      && matches!(message.operation, Operation::Mint(_))
    {
      return Ok(Verdict::Invalid(Invalid::NftChildMint));
    }

    let token_id = message.token_id(txid);

    let previous = self
      .transactions(
        &transaction
          .input
          .iter()
          .map(|input| input.previous_output.txid)
          .collect::<Vec<Txid>>(),
        token,
      )
      .await?;

    let mut parents = Vec::new();

    for (input, parent) in transaction.input.iter().zip(previous) {
      let Ok(parent_message) = Message::from_transaction(&parent) else {
        continue;
      };

      let OutPoint { txid: parent, vout } = input.previous_output;

      if parent_message.token_id(parent) != token_id {
        continue;
      }

      let quantity = match (&message.operation, &parent_message.operation) {
        (
          Operation::Mint(_),
          Operation::Genesis(Genesis {
            mint_baton_vout, ..
          })
          | Operation::Mint(Mint {
            mint_baton_vout, ..
          }),
        ) if mint_baton_vout.map(u32::from) == Some(vout) => None,
        (Operation::Send(_), Operation::Send(transfer)) => match transfer.quantity(vout) {
          Some(quantity) => Some(quantity),
          None => continue,
        },
        (Operation::Send(_), Operation::Genesis(_) | Operation::Mint(_)) if vout == 1 => {
          parent_message.quantity(vout)
        }
        _ => continue,
      };

      parents.push(Parent {
        txid: parent,
        vout,
        token_type: parent_message.token_type,
        valid: None,
        quantity,
      });
    }

    self.update(txid, |entry| entry.parents = parents.clone());

    match &message.operation {
      Operation::Mint(_) if parents.is_empty() => {
        return Ok(Verdict::Invalid(Invalid::MissingBatonParent));
      }
      Operation::Send(transfer) => {
        if message.token_type == TokenType::NftChild && transfer.amounts() != [1] {
          return Ok(Verdict::Invalid(Invalid::NftChildSend));
        }

        if sum(&parents, |_| true) < transfer.total() {
          return Ok(Verdict::Invalid(Invalid::InsufficientInputs));
        }
      }
      _ => {}
    }

    let ids = parents
      .iter()
      .map(|parent| parent.txid)
      .collect::<BTreeSet<Txid>>()
      .into_iter()
      .collect::<Vec<Txid>>();

    let validity = future::try_join_all(ids.iter().map(|id| self.validity(*id, token)))
      .await?
      .into_iter()
      .zip(ids)
      .map(|(valid, id)| (id, valid))
      .collect::<HashMap<Txid, bool>>();

    for parent in &mut parents {
      parent.valid = validity.get(&parent.txid).copied();
    }

    self.update(txid, |entry| entry.parents = parents.clone());

    let valid = |parent: &Parent| parent.valid == Some(true);

    match &message.operation {
      Operation::Mint(_) => {
        if parents.iter().filter(|&parent| valid(parent)).count() != 1 {
          return Ok(Verdict::Invalid(Invalid::InvalidBatonParent));
        }
      }
      Operation::Send(transfer) => {
        if sum(&parents, valid) < transfer.total() {
          return Ok(Verdict::Invalid(Invalid::InsufficientValidInputs));
        }
      }
      Operation::Genesis(_) => {}
    }

    if parents
      .iter()
      .any(|parent| valid(parent) && parent.token_type != message.token_type)
    {
      return Ok(Verdict::Invalid(Invalid::TokenTypeMismatch));
    }

    Ok(Verdict::Valid)
  }
}

fn sum(parents: &[Parent], include: impl Fn(&Parent) -> bool) -> u128 {
  parents
    .iter()
    .filter(|&parent| include(parent))
    .filter_map(|parent| parent.quantity)
    .map(u128::from)
    .sum()
}
