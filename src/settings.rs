use super::*;

#[derive(Default, Debug, Clone)]
pub struct Settings {
  bitcoin_data_dir: Option<PathBuf>,
  bitcoin_rpc_password: Option<String>,
  bitcoin_rpc_url: Option<String>,
  bitcoin_rpc_username: Option<String>,
  chain: Chain,
  cookie_file: Option<PathBuf>,
}

impl Settings {
  pub fn load(options: Options) -> Result<Self> {
    let config = match &options.config {
      Some(path) => Config::load(path)?,
      None => match &options.config_dir {
        Some(dir) if dir.join(Config::FILE_NAME).exists() => {
          Config::load(&dir.join(Config::FILE_NAME))?
        }
        Some(_) | None => Config::default(),
      },
    };

    Self::merge(options, config)
  }

  fn merge(options: Options, config: Config) -> Result<Self> {
    let chain = Self::setting_typed(
      options
        .regtest
        .then_some(Chain::Regtest)
        .or(options.testnet.then_some(Chain::Testnet))
        .or(options.chain_argument),
      Some("CHAIN"),
      config.chain,
      Chain::Mainnet,
    )?;

    Ok(Self {
      bitcoin_data_dir: Self::setting(
        options.bitcoin_data_dir.as_deref().and_then(Path::to_str),
        Some("BITCOIN_DATA_DIR"),
        config.bitcoin_data_dir.as_deref().and_then(Path::to_str),
        None,
      )?
      .map(PathBuf::from),
      bitcoin_rpc_password: Self::setting(
        options.bitcoin_rpc_password.as_deref(),
        Some("BITCOIN_RPC_PASSWORD"),
        config.bitcoin_rpc_password.as_deref(),
        None,
      )?,
      bitcoin_rpc_url: Self::setting(
        options.bitcoin_rpc_url.as_deref(),
        Some("BITCOIN_RPC_URL"),
        config.bitcoin_rpc_url.as_deref(),
        None,
      )?,
      bitcoin_rpc_username: Self::setting(
        options.bitcoin_rpc_username.as_deref(),
        Some("BITCOIN_RPC_USERNAME"),
        config.bitcoin_rpc_username.as_deref(),
        None,
      )?,
      chain,
      cookie_file: Self::setting(
        options.cookie_file.as_deref().and_then(Path::to_str),
        Some("COOKIE_FILE"),
        config.cookie_file.as_deref().and_then(Path::to_str),
        None,
      )?
      .map(PathBuf::from),
    })
  }

  pub(crate) fn auth(&self) -> Result<Auth> {
    match (&self.bitcoin_rpc_username, &self.bitcoin_rpc_password) {
      (Some(username), Some(password)) => Ok(Auth::UserPass(username.clone(), password.clone())),
      (None, Some(_)) => Err(anyhow!("no bitcoind rpc username specified")),
      (Some(_), None) => Err(anyhow!("no bitcoind rpc password specified")),
      (None, None) => Ok(Auth::CookieFile(self.cookie_file()?)),
    }
  }

  pub fn chain(&self) -> Chain {
    self.chain
  }

  pub(crate) fn cookie_file(&self) -> Result<PathBuf> {
    if let Some(cookie_file) = &self.cookie_file {
      return Ok(cookie_file.clone());
    }

    let path = if let Some(bitcoin_data_dir) = &self.bitcoin_data_dir {
      bitcoin_data_dir.clone()
    } else if cfg!(target_os = "linux") {
      dirs::home_dir()
        .ok_or_else(|| anyhow!("failed to get cookie file path: could not get home dir"))?
        .join(".bitcoin")
    } else {
      dirs::data_dir()
        .ok_or_else(|| anyhow!("failed to get cookie file path: could not get data dir"))?
        .join("Bitcoin")
    };

    Ok(self.chain().join_with_data_dir(&path).join(".cookie"))
  }

  /// Raw transaction fetcher backed by the configured Bitcoin Core node.
  pub fn fetcher(&self) -> Result<RpcFetcher> {
    let rpc_url = self.rpc_url();

    let auth = self.auth()?;

    log::info!("Connecting to Bitcoin Core at {rpc_url}");

    if let Auth::CookieFile(cookie_file) = &auth {
      log::info!(
        "Using credentials from cookie file at `{}`",
        cookie_file.display()
      );

      ensure!(
        cookie_file.is_file(),
        "cookie file `{}` does not exist",
        cookie_file.display()
      );
    }

    RpcFetcher::new(&rpc_url, auth)
      .with_context(|| format!("failed to create Bitcoin Core RPC client for `{rpc_url}`"))
  }

  pub(crate) fn rpc_url(&self) -> String {
    self
      .bitcoin_rpc_url
      .clone()
      .unwrap_or(format!("127.0.0.1:{}", self.chain().default_rpc_port()))
  }

  fn setting_typed<T: FromStr<Err = Error>>(
    arg_value: Option<T>,
    env_key: Option<&str>,
    config_value: Option<T>,
    default_value: T,
  ) -> Result<T> {
    if let Some(arg_value) = arg_value {
      return Ok(arg_value);
    }

    if let Some(env_key) = env_key {
      if let Some(env_value) = Self::env(env_key)? {
        return env_value
          .parse()
          .with_context(|| anyhow!("failed to parse {env_key}"));
      }
    }

    if let Some(config_value) = config_value {
      return Ok(config_value);
    }

    Ok(default_value)
  }

  fn setting(
    arg_value: Option<&str>,
    env_key: Option<&str>,
    config_value: Option<&str>,
    default_value: Option<&str>,
  ) -> Result<Option<String>> {
    if let Some(arg_value) = arg_value {
      return Ok(Some(arg_value.into()));
    }

    if let Some(env_key) = env_key {
      if let Some(env_value) = Self::env(env_key)? {
        return Ok(Some(env_value));
      }
    }

    Ok(config_value.or(default_value).map(str::to_string))
  }

  fn env(key: &str) -> Result<Option<String>> {
    let variable = format!("SLP_{key}");

    match env::var(&variable) {
      Ok(value) => Ok(Some(value)),
      Err(env::VarError::NotPresent) => Ok(None),
      Err(env::VarError::NotUnicode(value)) => {
        Err(error::EnvVarUnicode { value, variable }.build().into())
      }
    }
  }
}
