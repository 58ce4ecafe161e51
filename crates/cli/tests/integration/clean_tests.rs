use std::fs;

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn clean_removes_build_outputs() {
  let env = TestEnv::new();
  env.vpbuild_cmd().arg("build").assert().success();

  env
    .vpbuild_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Clean complete"));

  assert!(env.files_in(&env.public_dir()).is_empty());
  assert!(env.files_in(&env.module_dir()).is_empty());
}

#[test]
fn clean_then_build_recovers_from_stale_staging() {
  let env = TestEnv::new();
  fs::create_dir_all(env.staging_dir()).unwrap();

  env.vpbuild_cmd().arg("build").assert().failure();
  env.vpbuild_cmd().arg("clean").assert().success();
  env.vpbuild_cmd().arg("build").assert().success();

  assert_eq!(env.files_in(&env.public_dir()), vec!["viewport_bg.wasm"]);
}

#[test]
fn clean_json_output_is_valid() {
  let env = TestEnv::new();

  env
    .vpbuild_cmd()
    .args(["clean", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("removed_staging"))
    .stdout(predicate::str::contains("removed_paths"));
}
