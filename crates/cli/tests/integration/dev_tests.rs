use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn dev_runs_package_refresh_and_server() {
  let env = TestEnv::new();

  env
    .vpbuild_cmd()
    .arg("dev")
    .assert()
    .success()
    .stdout(predicate::str::contains("Dev server exited"));

  let calls = env.calls();
  assert_eq!(calls.len(), 3);
  assert!(calls[0].starts_with("wasm-pack build --dev --target web"));
  assert_eq!(calls[1], "npm install");
  assert_eq!(calls[2], "npm start");
}

#[test]
fn dev_stops_when_packaging_fails() {
  let env = TestEnv::new();
  env.write_tool("wasm-pack", "exit 4");

  env
    .vpbuild_cmd()
    .arg("dev")
    .assert()
    .failure()
    .stderr(predicate::str::contains("dev packaging failed"));

  assert!(env.calls().is_empty());
}
