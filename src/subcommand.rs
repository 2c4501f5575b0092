use super::*;

pub mod balances;
pub mod decode;
pub mod encode;
pub mod validate;

#[derive(Debug, Parser)]
pub(crate) enum Subcommand {
  #[command(about = "Summarize token balances of unspent outputs")]
  Balances(balances::Balances),
  #[command(about = "Decode an SLP OP_RETURN script")]
  Decode(decode::Decode),
  #[command(subcommand, about = "Encode an SLP OP_RETURN script")]
  Encode(encode::Encode),
  #[command(about = "Check token DAG validity of transactions")]
  Validate(validate::Validate),
}

impl Subcommand {
  pub(crate) fn run(self, options: Options) -> SubcommandResult {
    match self {
      Self::Balances(balances) => balances.run(Settings::load(options)?),
      Self::Decode(decode) => decode.run(),
      Self::Encode(encode) => encode.run(),
      Self::Validate(validate) => validate.run(Settings::load(options)?),
    }
  }
}

pub type SubcommandResult = Result<Option<Box<dyn Output>>>;

pub trait Output: Send {
  fn print_json(&self);
}

impl<T> Output for T
where
  T: Serialize + Send,
{
  fn print_json(&self) {
    serde_json::to_writer_pretty(io::stdout(), self).ok();
    println!();
  }
}

fn runtime() -> Result<Runtime> {
  tokio::runtime::Builder::new_multi_thread()
    .enable_all()
    .build()
    .context("failed to start async runtime")
}
