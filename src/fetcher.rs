use {
  super::*,
  serde_json::{json, Value},
};

/// Source of raw transactions for the validator.
#[async_trait]
pub trait Fetch: Send + Sync {
  /// Fetch hex-encoded raw transactions, one per id, in the order requested.
  async fn fetch(&self, txids: &[Txid]) -> Result<Vec<String>>;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for Arc<T> {
  async fn fetch(&self, txids: &[Txid]) -> Result<Vec<String>> {
    (**self).fetch(txids).await
  }
}

/// Fetches raw transactions from Bitcoin Core with batched
/// `getrawtransaction` JSON-RPC calls.
#[derive(Clone, Debug)]
pub struct RpcFetcher {
  client: reqwest::Client,
  password: String,
  url: Url,
  username: String,
}

#[derive(Deserialize, Debug)]
struct JsonResponse<T> {
  error: Option<JsonError>,
  id: usize,
  result: Option<T>,
}

#[derive(Deserialize, Debug)]
struct JsonError {
  code: i32,
  message: String,
}

impl Display for JsonError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "JSON-RPC error: code: {}, message: {}",
      self.code, self.message
    )
  }
}

impl std::error::Error for JsonError {}

impl RpcFetcher {
  pub fn new(url: &str, auth: Auth) -> Result<Self> {
    let url = if url.starts_with("http://") || url.starts_with("https://") {
      url.to_string()
    } else {
      format!("http://{url}")
    };

    let url = Url::parse(&url).with_context(|| format!("invalid rpc url `{url}`"))?;

    let (Some(username), Some(password)) = auth.get_user_pass()? else {
      bail!("no rpc credentials available");
    };

    Ok(Self {
      client: reqwest::Client::new(),
      password,
      url,
      username,
    })
  }

  fn request(txids: &[Txid]) -> Value {
    Value::Array(
      txids
        .iter()
        .enumerate()
        .map(|(i, txid)| {
          json!({
            "jsonrpc": "2.0",
            "id": i,
            "method": "getrawtransaction",
            "params": [txid.to_string()],
          })
        })
        .collect(),
    )
  }

  fn parse(expected: usize, body: &[u8]) -> Result<Vec<String>> {
    let mut responses = serde_json::from_slice::<Vec<JsonResponse<String>>>(body)
      .context("failed to parse batched JSON-RPC response")?;

    if let Some(err) = responses.iter().find_map(|response| response.error.as_ref()) {
      bail!("getrawtransaction failed: {err}");
    }

    // batched responses may arrive in any order
    responses.sort_by_key(|response| response.id);

    ensure!(
      responses.len() == expected,
      "expected {expected} responses in batched JSON-RPC response, got {}",
      responses.len(),
    );

    for (i, response) in responses.iter().enumerate() {
      ensure!(
        i == response.id,
        "missing response in batched JSON-RPC response"
      );
    }

    responses
      .into_iter()
      .map(|response| {
        response
          .result
          .ok_or_else(|| anyhow!("missing result for batched JSON-RPC response"))
      })
      .collect()
  }
}

#[async_trait]
impl Fetch for RpcFetcher {
  async fn fetch(&self, txids: &[Txid]) -> Result<Vec<String>> {
    if txids.is_empty() {
      return Ok(Vec::new());
    }

    log::debug!("Requesting {} raw transactions from {}", txids.len(), self.url);

    let response = self
      .client
      .post(self.url.clone())
      .basic_auth(&self.username, Some(&self.password))
      .json(&Self::request(txids))
      .send()
      .await
      .with_context(|| format!("failed to connect to Bitcoin Core RPC at `{}`", self.url))?;

    let body = response
      .bytes()
      .await
      .context("failed to read JSON-RPC response body")?;

    Self::parse(txids.len(), &body)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_scheme_is_added() {
    let fetcher = RpcFetcher::new(
      "127.0.0.1:8332",
      Auth::UserPass("foo".into(), "bar".into()),
    )
    .unwrap();
    assert_eq!(fetcher.url.as_str(), "http://127.0.0.1:8332/");

    let fetcher = RpcFetcher::new(
      "https://example.com/rpc",
      Auth::UserPass("foo".into(), "bar".into()),
    )
    .unwrap();
    assert_eq!(fetcher.url.as_str(), "https://example.com/rpc");
  }

  #[test]
  fn credentials_are_required() {
    assert_eq!(
      RpcFetcher::new("127.0.0.1:8332", Auth::None)
        .unwrap_err()
        .to_string(),
      "no rpc credentials available"
    );
  }

  #[test]
  fn request_is_batched() {
    let request = RpcFetcher::request(&[txid(1), txid(2)]);
    assert_eq!(request[0]["id"], 0);
    assert_eq!(request[1]["id"], 1);
    assert_eq!(request[1]["method"], "getrawtransaction");
    assert_eq!(request[1]["params"][0], txid(2).to_string());
  }

  #[test]
  fn responses_are_sorted_by_id() {
    let body = r#"[
      {"id": 1, "result": "bb", "error": null},
      {"id": 0, "result": "aa", "error": null}
    ]"#;

    assert_eq!(
      RpcFetcher::parse(2, body.as_bytes()).unwrap(),
      ["aa".to_string(), "bb".to_string()]
    );
  }

  #[test]
  fn any_error_fails_the_batch() {
    let body = r#"[
      {"id": 0, "result": "aa", "error": null},
      {"id": 1, "result": null, "error": {"code": -5, "message": "No such mempool or blockchain transaction"}}
    ]"#;

    assert_eq!(
      RpcFetcher::parse(2, body.as_bytes())
        .unwrap_err()
        .to_string(),
      "getrawtransaction failed: JSON-RPC error: code: -5, message: No such mempool or blockchain transaction"
    );
  }

  #[test]
  fn missing_responses_are_an_error() {
    let body = r#"[{"id": 1, "result": "bb", "error": null}]"#;
    assert!(RpcFetcher::parse(1, body.as_bytes()).is_err());
    assert!(RpcFetcher::parse(2, body.as_bytes()).is_err());
  }

  #[test]
  fn malformed_json_is_an_error() {
    assert_eq!(
      RpcFetcher::parse(1, b"foo").unwrap_err().to_string(),
      "failed to parse batched JSON-RPC response"
    );
  }
}
