fn main() {
  slp_validator::main();
}
