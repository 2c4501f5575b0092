use super::*;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub message: Message,
  pub token_id: Option<TokenId>,
}

#[derive(Debug, Parser)]
#[clap(group(
  ArgGroup::new("input")
    .required(true)
    .args(&["script", "transaction"]),
))]
pub(crate) struct Decode {
  #[arg(help = "Decode hex-encoded OP_RETURN <SCRIPT>.")]
  script: Option<String>,
  #[arg(
    long,
    help = "Decode the first output of hex-encoded raw <TRANSACTION>."
  )]
  transaction: Option<String>,
}

impl Decode {
  pub(crate) fn run(self) -> SubcommandResult {
    let output = if let Some(script) = self.script {
      let script = hex::decode(script.trim()).context("invalid script hex")?;

      let message = Message::decipher(&ScriptBuf::from_bytes(script))?;

      Output {
        token_id: match message.operation {
          Operation::Genesis(_) => None,
          Operation::Mint(ref mint) => Some(mint.token_id),
          Operation::Send(ref transfer) => Some(transfer.token_id),
        },
        message,
      }
    } else if let Some(transaction) = self.transaction {
      let transaction = consensus::deserialize::<Transaction>(
        &hex::decode(transaction.trim()).context("invalid transaction hex")?,
      )
      .context("invalid transaction")?;

      let message = Message::from_transaction(&transaction)?;

      Output {
        token_id: Some(message.token_id(transaction.compute_txid())),
        message,
      }
    } else {
      bail!("either <SCRIPT> or --transaction is required");
    };

    Ok(Some(Box::new(output)))
  }
}
