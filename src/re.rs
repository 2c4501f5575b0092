use super::*;

fn re(s: &'static str) -> Regex {
  Regex::new(&format!("^{s}$")).unwrap()
}

lazy_static! {
  pub(crate) static ref RAW_TRANSACTION: Regex = re(r"([0-9a-fA-F]{2}){61,}");
}
