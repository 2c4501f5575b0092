use super::*;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub script: String,
}

#[derive(Debug, Parser)]
pub(crate) enum Encode {
  #[command(about = "Encode a GENESIS message")]
  Genesis(Genesis),
  #[command(about = "Encode a MINT message")]
  Mint(Mint),
  #[command(about = "Encode a SEND message")]
  Send(Transfer),
}

impl Encode {
  pub(crate) fn run(self) -> SubcommandResult {
    let script = match self {
      Self::Genesis(genesis) => genesis.script()?,
      Self::Mint(mint) => slp::encode_mint(
        mint.token_type,
        mint.token_id,
        mint.mint_baton_vout,
        mint.quantity,
      )?,
      Self::Send(send) => slp::encode_send(send.token_type, send.token_id, &send.amounts)?,
    };

    Ok(Some(Box::new(Output {
      script: hex::encode(script.as_bytes()),
    })))
  }
}

#[derive(Debug, Parser)]
pub(crate) struct Genesis {
  #[arg(long, default_value = "fungible", help = "Create a token of <TOKEN_TYPE>.")]
  token_type: TokenType,
  #[arg(long, default_value = "", help = "Token <TICKER>.")]
  ticker: String,
  #[arg(long, default_value = "", help = "Token <NAME>.")]
  name: String,
  #[arg(long, default_value = "", help = "Token <DOCUMENT_URI>.")]
  document_uri: String,
  #[arg(
    long,
    value_parser = parse_document_hash,
    help = "Hex-encoded 32-byte <DOCUMENT_HASH>."
  )]
  document_hash: Option<[u8; 32]>,
  #[arg(long, default_value_t = 0, help = "Display token amounts with <DECIMALS> places.")]
  decimals: u8,
  #[arg(long, help = "Create a mint baton at output <MINT_BATON_VOUT>.")]
  mint_baton_vout: Option<u8>,
  #[arg(long, help = "Issue <QUANTITY> tokens to output 1.")]
  quantity: u64,
}

impl Genesis {
  fn script(self) -> Result<ScriptBuf, slp::Error> {
    slp::encode_genesis(
      self.token_type,
      slp::Genesis {
        ticker: self.ticker.into_bytes(),
        name: self.name.into_bytes(),
        document_uri: self.document_uri.into_bytes(),
        document_hash: self.document_hash,
        decimals: self.decimals,
        mint_baton_vout: self.mint_baton_vout,
        quantity: self.quantity,
      },
    )
  }
}

#[derive(Debug, Parser)]
pub(crate) struct Mint {
  #[arg(long, default_value = "fungible", help = "Mint a token of <TOKEN_TYPE>.")]
  token_type: TokenType,
  #[arg(help = "Mint more of <TOKEN_ID>.")]
  token_id: TokenId,
  #[arg(long, help = "Pass the mint baton to output <MINT_BATON_VOUT>.")]
  mint_baton_vout: Option<u8>,
  #[arg(long, help = "Mint <QUANTITY> tokens to output 1.")]
  quantity: u64,
}

#[derive(Debug, Parser)]
pub(crate) struct Transfer {
  #[arg(long, default_value = "fungible", help = "Send a token of <TOKEN_TYPE>.")]
  token_type: TokenType,
  #[arg(help = "Send <TOKEN_ID>.")]
  token_id: TokenId,
  #[arg(
    required = true,
    num_args = 1..,
    help = "Send <AMOUNTS> to outputs 1, 2, and so on."
  )]
  amounts: Vec<u64>,
}

fn parse_document_hash(s: &str) -> Result<[u8; 32]> {
  let bytes = hex::decode(s).context("invalid document hash hex")?;
  let len = bytes.len();
  bytes
    .try_into()
    .map_err(|_| anyhow!("document hash must be 32 bytes, got {len}"))
}
