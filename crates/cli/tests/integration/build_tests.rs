use std::fs;

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn build_debug_distributes_artifacts() {
  let env = TestEnv::new();

  env
    .vpbuild_cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Built debug bundle"));

  assert_eq!(env.files_in(&env.public_dir()), vec!["viewport_bg.wasm"]);
  assert_eq!(
    env.files_in(&env.module_dir()),
    vec!["viewport.d.ts", "viewport.js", "viewport_bg.wasm.d.ts"]
  );
  assert!(!env.staging_dir().exists());
}

#[test]
fn build_without_profile_uses_debug_output() {
  let env = TestEnv::new();

  env.vpbuild_cmd().arg("build").assert().success();

  let calls = env.calls();
  assert!(calls[0].starts_with("cargo build --manifest-path"));
  assert!(!calls[0].contains("--release"));
  assert!(calls[0].contains("--target wasm32-unknown-unknown"));
  assert!(calls[1].contains("--target web --out-dir"));
  assert!(calls[1].ends_with("wasm32-unknown-unknown/debug/viewport.wasm"));
}

#[test]
fn build_release_uses_release_output() {
  let env = TestEnv::new();

  env
    .vpbuild_cmd()
    .args(["build", "release"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Built release bundle"));

  let calls = env.calls();
  assert!(calls[0].starts_with("cargo build --release"));
  assert!(calls[1].ends_with("wasm32-unknown-unknown/release/viewport.wasm"));
}

#[test]
fn unrecognized_profile_builds_debug() {
  let env = TestEnv::new();

  env
    .vpbuild_cmd()
    .args(["build", "fast"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Built debug bundle"));
}

#[test]
fn hyphenated_release_is_not_a_flag() {
  let env = TestEnv::new();

  env
    .vpbuild_cmd()
    .args(["build", "--release"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Built debug bundle"))
    .stderr(predicate::str::contains("unrecognized profile"));

  assert!(!env.calls()[0].contains("--release"));
}

#[test]
fn known_flags_still_parse_after_build() {
  let env = TestEnv::new();

  env
    .vpbuild_cmd()
    .args(["build", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"profile\": \"debug\""));
}

#[test]
fn distributed_loader_is_patched() {
  let env = TestEnv::new();

  env.vpbuild_cmd().arg("build").assert().success();

  let loader = fs::read_to_string(env.module_dir().join("viewport.js")).unwrap();
  assert!(!loader.contains("import.meta.url"));
  assert!(loader.contains("const ret = window.globalThis.globalThis;"));
}

#[test]
fn rerun_is_byte_identical() {
  let env = TestEnv::new();
  let snapshot = |env: &TestEnv| -> Vec<Vec<u8>> {
    ["viewport.js", "viewport.d.ts", "viewport_bg.wasm.d.ts"]
      .iter()
      .map(|name| fs::read(env.module_dir().join(name)).unwrap())
      .collect()
  };

  env.vpbuild_cmd().arg("build").assert().success();
  let first = snapshot(&env);
  env.vpbuild_cmd().arg("build").assert().success();
  let second = snapshot(&env);

  assert_eq!(first, second);
}

#[test]
fn existing_staging_aborts_before_any_tool_runs() {
  let env = TestEnv::new();
  fs::create_dir_all(env.staging_dir()).unwrap();

  env
    .vpbuild_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("staging directory already exists"));

  assert!(env.calls().is_empty());
  assert!(env.files_in(&env.public_dir()).is_empty());
  assert!(env.files_in(&env.module_dir()).is_empty());
  assert!(env.staging_dir().exists());
}

#[test]
fn compiler_failure_surfaces_diagnostics_and_distributes_nothing() {
  let env = TestEnv::new();
  env.write_tool(
    "cargo",
    "echo 'error[E0425]: cannot find value `x` in this scope' >&2\nexit 101",
  );

  env
    .vpbuild_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("error[E0425]: cannot find value `x` in this scope"))
    .stderr(predicate::str::contains("compilation failed"));

  assert!(env.calls().iter().all(|c| !c.starts_with("wasm-bindgen")));
  assert!(env.files_in(&env.public_dir()).is_empty());
  assert!(env.files_in(&env.module_dir()).is_empty());
  assert!(!env.staging_dir().exists());
}

#[test]
fn compiler_failure_removes_previous_outputs() {
  let env = TestEnv::new();
  env.vpbuild_cmd().arg("build").assert().success();
  env.write_tool("cargo", "exit 1");

  env.vpbuild_cmd().arg("build").assert().failure();

  assert!(env.files_in(&env.public_dir()).is_empty());
  assert!(env.files_in(&env.module_dir()).is_empty());
}

#[test]
fn generator_missing_output_fails() {
  let env = TestEnv::new();
  env.write_tool("wasm-bindgen", "exit 0");

  env
    .vpbuild_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("did not produce"));

  assert!(!env.staging_dir().exists());
  assert!(env.files_in(&env.public_dir()).is_empty());
}

#[test]
fn build_json_output_is_valid() {
  let env = TestEnv::new();

  let output = env
    .vpbuild_cmd()
    .args(["build", "release", "-o", "json"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["profile"], "release");
  assert_eq!(json["artifacts"].as_array().map(Vec::len), Some(4));
}
