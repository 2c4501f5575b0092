use {
  super::*,
  slp_validator::subcommand::validate::{Output, Status},
};

#[test]
fn valid_send_chain() {
  let funding = funding(1);
  let genesis = genesis(&funding, 1000);
  let token_id = TokenId::from(genesis.compute_txid());
  let first = send(&[outpoint(&genesis, 1)], token_id, &[500, 500]);
  let second = send(
    &[outpoint(&first, 1), outpoint(&first, 2)],
    token_id,
    &[300, 700],
  );

  let node = MockNode::spawn(&[&funding, &genesis, &first, &second]);

  pretty_assert_eq!(
    CommandBuilder::new(format!("validate {}", second.compute_txid()))
      .node(&node)
      .run_and_deserialize_output::<Output>(),
    Output {
      transactions: vec![Status {
        txid: second.compute_txid(),
        valid: true,
        reason: None,
      }],
    }
  );
}

#[test]
fn invalid_transactions_have_reasons() {
  let funding = funding(1);
  let genesis = genesis(&funding, 1000);
  let token_id = TokenId::from(genesis.compute_txid());
  let overspend = send(&[outpoint(&genesis, 1)], token_id, &[2000]);

  pretty_assert_eq!(
    CommandBuilder::new(format!(
      "validate {} {}",
      overspend.compute_txid(),
      funding.compute_txid(),
    ))
    .node(&MockNode::spawn(&[&funding, &genesis, &overspend]))
    .run_and_deserialize_output::<Output>(),
    Output {
      transactions: vec![
        Status {
          txid: overspend.compute_txid(),
          valid: false,
          reason: Some("token outputs are greater than possible inputs".into()),
        },
        Status {
          txid: funding.compute_txid(),
          valid: false,
          reason: Some(
            "SLP OP_RETURN parsing error (format error: script does not begin with OP_RETURN)"
              .into()
          ),
        },
      ],
    }
  );
}

#[test]
fn token_id_filter() {
  let funding = funding(1);
  let genesis = genesis(&funding, 1000);

  let node = MockNode::spawn(&[&genesis]);

  let output = CommandBuilder::new(format!(
    "validate {} --token-id {}",
    genesis.compute_txid(),
    "33".repeat(32),
  ))
  .node(&node)
  .run_and_deserialize_output::<Output>();

  assert!(!output.transactions[0].valid);
  assert_eq!(
    output.transactions[0].reason.as_deref(),
    Some("transaction is not for the requested token")
  );

  let output = CommandBuilder::new(format!(
    "validate {txid} --token-id {txid} --token-type fungible",
    txid = genesis.compute_txid(),
  ))
  .node(&node)
  .run_and_deserialize_output::<Output>();

  assert!(output.transactions[0].valid);
}

#[test]
fn missing_transaction_is_an_error() {
  let funding = funding(1);
  let genesis = genesis(&funding, 1000);
  let token_id = TokenId::from(genesis.compute_txid());
  let send = send(&[outpoint(&genesis, 1)], token_id, &[1000]);

  CommandBuilder::new(format!("validate {}", send.compute_txid()))
    .node(&MockNode::spawn(&[&send]))
    .expected_exit_code(1)
    .stderr_regex("error: failed to fetch 1 raw transactions: getrawtransaction failed: .*\n")
    .run_and_extract_stdout();
}

#[test]
fn txids_are_required() {
  CommandBuilder::new("validate")
    .expected_exit_code(2)
    .stderr_regex(".*required.*")
    .run_and_extract_stdout();
}
