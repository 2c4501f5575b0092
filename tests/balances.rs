use super::*;

#[test]
fn balances() {
  let funding = funding(1);
  let genesis = genesis(&funding, 1000);
  let token_id = TokenId::from(genesis.compute_txid());
  let valid = send(&[outpoint(&genesis, 1)], token_id, &[400, 600]);
  let overspend = send(&[outpoint(&funding, 1)], token_id, &[50]);

  let node = MockNode::spawn(&[&funding, &genesis, &valid, &overspend]);

  let output = CommandBuilder::new(format!(
    "balances {} {} {} {} {}",
    outpoint(&genesis, 2),
    outpoint(&valid, 1),
    outpoint(&valid, 2),
    outpoint(&overspend, 1),
    outpoint(&funding, 1),
  ))
  .node(&node)
  .run_and_deserialize_output::<Value>();

  let token = token_id.to_string();

  assert_eq!(
    output["token_balances"][&token]
      .to_string()
      .trim_matches('"'),
    "1000"
  );
  assert_eq!(output["token_utxos"][&token].as_array().unwrap().len(), 2);
  assert_eq!(output["baton_utxos"][&token].as_array().unwrap().len(), 1);
  assert_eq!(
    output["baton_utxos"][&token][0]["judgement"],
    json!("SLP_BATON")
  );
  assert_eq!(output["invalid_token_utxos"].as_array().unwrap().len(), 1);
  assert_eq!(output["invalid_baton_utxos"].as_array().unwrap().len(), 0);
  assert_eq!(output["non_slp_utxos"].as_array().unwrap().len(), 1);
  assert_eq!(output["satoshis_available"], json!(1000));
  assert_eq!(output["satoshis_locked_in_tokens"], json!(2000));
  assert_eq!(output["satoshis_locked_in_batons"], json!(1000));
  assert_eq!(output["satoshis_in_invalid_tokens"], json!(1000));
  assert_eq!(output["satoshis_in_invalid_batons"], json!(0));
}

#[test]
fn missing_output_is_an_error() {
  let funding = funding(1);

  CommandBuilder::new(format!("balances {}", outpoint(&funding, 5)))
    .node(&MockNode::spawn(&[&funding]))
    .expected_exit_code(1)
    .stderr_regex("error: output .*:5 does not exist\n")
    .run_and_extract_stdout();
}
