//! Shared test helpers for CLI integration tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Loader in the shape `wasm-bindgen --target web` emits.
pub const FAKE_LOADER: &str = r#"let wasm;
export function __wbg_globalThis_1d39714405582d3c() { return handleError(function () {
    const ret = globalThis.globalThis;
    return addHeapObject(ret);
}, arguments) };
async function __wbg_init(input) {
    if (typeof input === 'undefined') {
        input = new URL('viewport_bg.wasm', import.meta.url);
    }
    return __wbg_load(await fetch(input));
}
export default __wbg_init;
"#;

/// Isolated project with fake external tools.
///
/// The temp directory holds the project root (`viewport/`, `frontend/`) and a
/// `bin/` directory with scripts standing in for cargo, wasm-bindgen,
/// wasm-pack and npm. Every tool appends its arguments to `calls.log`.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    fs::create_dir_all(env.root().join("viewport")).unwrap();
    fs::create_dir_all(env.root().join("frontend").join("public")).unwrap();
    fs::create_dir_all(env.bin_dir()).unwrap();

    env.write_tool("cargo", &env.logging("cargo"));
    env.write_tool("wasm-bindgen", &env.fake_bindgen_script());
    env.write_tool("wasm-pack", &env.logging("wasm-pack"));
    env.write_tool("npm", &env.logging("npm"));
    env
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn bin_dir(&self) -> PathBuf {
    self.temp.path().join("bin")
  }

  pub fn log_path(&self) -> PathBuf {
    self.temp.path().join("calls.log")
  }

  pub fn calls(&self) -> Vec<String> {
    fs::read_to_string(self.log_path())
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  pub fn public_dir(&self) -> PathBuf {
    self.root().join("frontend").join("public")
  }

  pub fn module_dir(&self) -> PathBuf {
    self.root().join("frontend").join("src").join("wasm")
  }

  pub fn staging_dir(&self) -> PathBuf {
    self.root().join("temp")
  }

  /// Replace a fake tool with the given script body.
  pub fn write_tool(&self, name: &str, body: &str) {
    let path = self.bin_dir().join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  }

  fn logging(&self, name: &str) -> String {
    format!("echo \"{name} $*\" >> '{}'", self.log_path().display())
  }

  fn fake_bindgen_script(&self) -> String {
    format!(
      r#"{log}
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    --out-dir) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
printf '\0asm\1\0\0\0' > "$out/viewport_bg.wasm"
echo 'export const memory: WebAssembly.Memory;' > "$out/viewport_bg.wasm.d.ts"
echo 'export default function __wbg_init(input?: string): Promise<any>;' > "$out/viewport.d.ts"
cat > "$out/viewport.js" <<'LOADER'
{loader}LOADER"#,
      log = self.logging("wasm-bindgen"),
      loader = FAKE_LOADER,
    )
  }

  /// Names of the files directly inside `dir`, sorted.
  pub fn files_in(&self, dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
      return Vec::new();
    };
    let mut names: Vec<String> = entries
      .filter_map(|e| e.ok())
      .map(|e| e.file_name().to_string_lossy().into_owned())
      .collect();
    names.sort();
    names
  }

  /// Get a pre-configured Command for the vpbuild binary.
  ///
  /// Points `--root` at the project and each tool variable at its fake.
  pub fn vpbuild_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("vpbuild");
    cmd.env("CARGO", self.bin_dir().join("cargo"));
    cmd.env("WASM_BINDGEN", self.bin_dir().join("wasm-bindgen"));
    cmd.env("WASM_PACK", self.bin_dir().join("wasm-pack"));
    cmd.env("NPM", self.bin_dir().join("npm"));
    cmd.env_remove("RUST_LOG");
    cmd.arg("--root").arg(self.root());
    cmd
  }
}
