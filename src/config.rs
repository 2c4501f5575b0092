use super::*;

#[derive(Deserialize, Default, PartialEq, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
  pub(crate) bitcoin_data_dir: Option<PathBuf>,
  pub(crate) bitcoin_rpc_password: Option<String>,
  pub(crate) bitcoin_rpc_url: Option<String>,
  pub(crate) bitcoin_rpc_username: Option<String>,
  pub(crate) chain: Option<Chain>,
  pub(crate) cookie_file: Option<PathBuf>,
}

impl Config {
  pub(crate) const FILE_NAME: &'static str = "slp.yaml";

  pub(crate) fn load(path: &Path) -> SnafuResult<Self> {
    let file = File::open(path).snafu_context(error::Io { path })?;
    serde_yaml::from_reader(file).snafu_context(error::ConfigParse { path })
  }
}
