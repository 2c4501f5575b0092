use super::*;

/// Failure to answer a validity question. Invalidity itself is never an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(context(suffix(false)), visibility(pub(crate)))]
pub enum Error {
  #[snafu(display("validation cancelled"))]
  Cancelled,
  #[snafu(display("malformed raw transaction{}: {message}", txid.map(|txid| format!(" {txid}")).unwrap_or_default()))]
  Malformed { txid: Option<Txid>, message: String },
  #[snafu(display("raw transaction {txid} missing from fetch response"))]
  MissingTransaction { txid: Txid },
  #[snafu(display("fetcher returned {actual} raw transactions for {expected} ids"))]
  ResponseCount { expected: usize, actual: usize },
  #[snafu(display("failed to fetch {count} raw transactions: {message}"))]
  Retrieval { count: usize, message: String },
  #[snafu(display("seeded transaction {txid} does not match the supplied token id or type"))]
  SeedMismatch { txid: Txid },
  #[snafu(display("validation task for {txid} failed: {message}"))]
  Task { txid: Txid, message: String },
  #[snafu(display("fetched transaction {actual} does not match requested id {expected}"))]
  TxidMismatch { expected: Txid, actual: Txid },
}

impl Error {
  /// Whether the error came from the raw transaction source rather than from
  /// the validator itself.
  pub fn is_retrieval(&self) -> bool {
    matches!(
      self,
      Self::Malformed { .. }
        | Self::MissingTransaction { .. }
        | Self::ResponseCount { .. }
        | Self::Retrieval { .. }
        | Self::TxidMismatch { .. }
    )
  }
}
