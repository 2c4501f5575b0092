#![allow(clippy::result_large_err, clippy::type_complexity)]
#![deny(
  clippy::cast_lossless,
  clippy::cast_possible_truncation,
  clippy::cast_possible_wrap,
  clippy::cast_sign_loss
)]

use {
  self::{
    arguments::Arguments,
    config::Config,
    error::{ResultExt, SnafuError},
    settings::Settings,
    subcommand::{Subcommand, SubcommandResult},
  },
  anyhow::{anyhow, bail, ensure, Context, Error},
  async_trait::async_trait,
  bigdecimal::BigDecimal,
  bitcoin::{consensus, Amount, OutPoint, ScriptBuf, Transaction, Txid},
  bitcoincore_rpc::Auth,
  clap::{ArgGroup, Parser},
  lazy_static::lazy_static,
  regex::Regex,
  reqwest::Url,
  serde::{Deserialize, Serialize},
  slp::{Judgement, Message, Operation, TokenId, TokenType},
  snafu::{Backtrace, ErrorCompat, Snafu},
  std::{
    backtrace::BacktraceStatus,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    env,
    ffi::OsString,
    fmt::{self, Display, Formatter},
    fs::File,
    io,
    path::{Path, PathBuf},
    process,
    str::FromStr,
    sync::{Arc, Mutex},
  },
  tokio::runtime::Runtime,
};

pub use self::{
  balances::{summarize, Balances, ClassifiedUtxo, Utxo},
  chain::Chain,
  fetcher::{Fetch, RpcFetcher},
  options::Options,
  validator::{Filter, Validate, ValidationEntry, Validator},
};


#[cfg(test)]
use self::test::*;

pub mod arguments;
pub mod balances;
pub mod chain;
mod config;
mod error;
pub mod fetcher;
pub mod options;
mod re;
pub mod settings;
pub mod subcommand;
pub mod validator;

type Result<T = (), E = Error> = std::result::Result<T, E>;
type SnafuResult<T = (), E = SnafuError> = std::result::Result<T, E>;

fn default<T: Default>() -> T {
  Default::default()
}

pub fn main() {
  env_logger::init();

  let args = Arguments::parse();

  match args.run() {
    Err(err) => {
      eprintln!("error: {err}");

      if let SnafuError::Anyhow { err } = err {
        for (i, err) in err.chain().skip(1).enumerate() {
          if i == 0 {
            eprintln!();
            eprintln!("because:");
          }

          eprintln!("- {err}");
        }

        if env::var_os("RUST_BACKTRACE")
          .map(|val| val == "1")
          .unwrap_or_default()
        {
          eprintln!("{}", err.backtrace());
        }
      } else {
        for (i, err) in err.iter_chain().skip(1).enumerate() {
          if i == 0 {
            eprintln!();
            eprintln!("because:");
          }

          eprintln!("- {err}");
        }

        if let Some(backtrace) = err.backtrace() {
          if backtrace.status() == BacktraceStatus::Captured {
            eprintln!("backtrace:");
            eprintln!("{backtrace}");
          }
        }
      }

      process::exit(1);
    }
    Ok(output) => {
      if let Some(output) = output {
        output.print_json();
      }
    }
  }
}
