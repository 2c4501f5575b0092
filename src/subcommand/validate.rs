use super::*;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub transactions: Vec<Status>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Status {
  pub txid: Txid,
  pub valid: bool,
  pub reason: Option<String>,
}

#[derive(Debug, Parser)]
pub(crate) struct Validate {
  #[arg(required = true, num_args = 1.., help = "Validate <TXIDS>.")]
  txids: Vec<Txid>,
  #[arg(long, help = "Only accept transactions for <TOKEN_ID>.")]
  token_id: Option<TokenId>,
  #[arg(long, help = "Only accept transactions of <TOKEN_TYPE>.")]
  token_type: Option<TokenType>,
}

impl Validate {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let validator = Validator::new(settings.fetcher()?);

    let filter = Filter {
      token_id: self.token_id,
      token_type: self.token_type,
    };

    let results = runtime()?.block_on(futures::future::try_join_all(
      self
        .txids
        .iter()
        .map(|txid| validator.is_valid(*txid, filter)),
    ))?;

    Ok(Some(Box::new(Output {
      transactions: self
        .txids
        .into_iter()
        .zip(results)
        .map(|(txid, valid)| Status {
          txid,
          valid,
          reason: (!valid).then(|| match validator.reason(txid) {
            Some(reason) => reason.to_string(),
            None => "transaction is not for the requested token".into(),
          }),
        })
        .collect(),
    })))
  }
}
