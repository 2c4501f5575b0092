use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Balances {
  #[arg(required = true, num_args = 1.., help = "Summarize unspent <OUTPOINTS>.")]
  outpoints: Vec<OutPoint>,
}

impl Balances {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let validator = Validator::new(settings.fetcher()?);

    let balances = runtime()?.block_on(async {
      let transactions = futures::future::try_join_all(
        self
          .outpoints
          .iter()
          .map(|outpoint| validator.transaction(outpoint.txid)),
      )
      .await?;

      let utxos = self
        .outpoints
        .into_iter()
        .zip(transactions)
        .map(|(outpoint, transaction)| {
          let output = usize::try_from(outpoint.vout)
            .ok()
            .and_then(|vout| transaction.output.get(vout))
            .ok_or_else(|| anyhow!("output {outpoint} does not exist"))?;

          let metadata = transaction
            .output
            .first()
            .map(|output| output.script_pubkey.clone())
            .unwrap_or_default();

          Ok(Utxo {
            outpoint,
            value: output.value,
            metadata,
          })
        })
        .collect::<Result<Vec<Utxo>>>()?;

      log::info!("Summarizing {} utxos", utxos.len());

      Ok::<crate::Balances, Error>(summarize(utxos, &validator).await?)
    })?;

    Ok(Some(Box::new(balances)))
  }
}
