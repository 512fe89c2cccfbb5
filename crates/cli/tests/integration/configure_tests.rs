use predicates::prelude::*;

use super::common::{TestEnv, read, stdout_json};

#[test]
fn configure_writes_engine_handoff() {
  let env = TestEnv::empty();
  env.add_sdk("hl2sdk-tf2");

  env
    .build_cmd()
    .arg("configure")
    .arg("--hl2sdk-root")
    .arg(env.sdk_root())
    .args(["--targets", "x86_64", "--enable-optimize"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Build configured"))
    .stdout(predicate::str::contains("tf2 (present)"));

  let handoff: serde_json::Value = serde_json::from_str(&read(&env.path("build/navbot-build.json"))).unwrap();
  assert_eq!(handoff["version"], 1);
  assert_eq!(handoff["sdk_selector"], "present");
  assert_eq!(handoff["sdks"][0]["name"], "tf2");
  assert_eq!(handoff["targets"], serde_json::json!(["x86_64"]));
  assert_eq!(handoff["compiler_flags"], serde_json::json!(["-O3"]));
  assert_eq!(handoff["defines"], serde_json::json!(["EXT_VPROF_ENABLED"]));
}

#[test]
fn configure_json_output_reflects_flags() {
  let env = TestEnv::empty();

  let output = env
    .build_cmd()
    .arg("configure")
    .arg("--hl2sdk-root")
    .arg(env.sdk_root())
    .args([
      "--targets",
      "x86,x86_64,x86",
      "--enable-debug",
      "--enable-lto",
      "--enable-asan",
      "--debug-mode",
      "--disable-vprof",
      "--enable-symbol-upload",
      "--arch-ext-level",
      "2",
      "--format",
      "json",
    ])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json = stdout_json(&output.stdout);
  assert_eq!(json["targets"], serde_json::json!(["x86", "x86_64"]));
  assert_eq!(json["debug_symbols"], true);
  assert_eq!(json["lto"], true);
  assert_eq!(json["sanitizer"], true);
  assert_eq!(json["debug_mode"], true);
  assert_eq!(json["disable_vprof"], true);
  assert_eq!(json["symbol_upload"], true);
  assert_eq!(json["arch_extensions"], "avx2");
  assert_eq!(json["sdks"], serde_json::json!([]));
}

#[test]
fn configure_explicit_sdk_list_ignores_presence() {
  let env = TestEnv::empty();

  let output = env
    .build_cmd()
    .arg("configure")
    .arg("--hl2sdk-root")
    .arg(env.sdk_root())
    .args(["-s", "css,tf2", "--targets", "x86_64", "--format", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json = stdout_json(&output.stdout);
  assert_eq!(json["sdk_selector"], "css,tf2");
  assert_eq!(json["sdks"][0]["name"], "css");
  assert_eq!(json["sdks"][1]["name"], "tf2");
}

#[test]
fn configure_none_skips_sdk_build() {
  let env = TestEnv::empty();
  env.add_sdk("hl2sdk-tf2");

  env
    .build_cmd()
    .arg("configure")
    .arg("--hl2sdk-root")
    .arg(env.sdk_root())
    .args(["--sdks", "none", "--targets", "x86_64"])
    .assert()
    .success()
    .stdout(predicate::str::contains("SDK build skipped"));
}

#[test]
fn configure_reads_sdk_root_from_environment() {
  let env = TestEnv::empty();
  env.add_sdk("hl2sdk-bms");

  let output = env
    .build_cmd()
    .env("HL2SDKROOT", env.sdk_root())
    .args(["configure", "--targets", "x86_64", "--format", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json = stdout_json(&output.stdout);
  assert_eq!(json["sdk_root"], env.sdk_root().to_string_lossy().as_ref());
  assert_eq!(json["sdks"][0]["name"], "bms");
}

#[test]
fn configure_unknown_sdk_fails_without_writing() {
  let env = TestEnv::empty();

  env
    .build_cmd()
    .arg("configure")
    .arg("--hl2sdk-root")
    .arg(env.sdk_root())
    .args(["--sdks", "tf2,portal3", "--targets", "x86_64"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown SDK 'portal3'"));

  assert!(!env.path("build/navbot-build.json").exists());
}

#[test]
fn configure_rejects_out_of_range_arch_level() {
  let env = TestEnv::empty();

  env
    .build_cmd()
    .arg("configure")
    .arg("--hl2sdk-root")
    .arg(env.sdk_root())
    .args(["--arch-ext-level", "4", "--targets", "x86_64"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid architecture extension level 4"));
}

#[test]
fn configure_rejects_unknown_target() {
  let env = TestEnv::empty();

  env
    .build_cmd()
    .arg("configure")
    .arg("--hl2sdk-root")
    .arg(env.sdk_root())
    .args(["--targets", "arm64"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid target list"));
}

#[test]
fn configure_rejects_missing_sourcemod_path() {
  let env = TestEnv::empty();

  env
    .build_cmd()
    .arg("configure")
    .arg("--hl2sdk-root")
    .arg(env.sdk_root())
    .arg("--sm-path")
    .arg(env.path("sourcemod"))
    .args(["--targets", "x86_64"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("SourceMod path does not exist"));
}

#[test]
fn configure_honours_build_dir() {
  let env = TestEnv::empty();
  let build_dir = env.path("out/engine");

  env
    .build_cmd()
    .arg("configure")
    .arg("--hl2sdk-root")
    .arg(env.sdk_root())
    .arg("--build-dir")
    .arg(&build_dir)
    .args(["--targets", "x86"])
    .assert()
    .success();

  assert!(build_dir.join("navbot-build.json").exists());
  assert!(!env.path("build/navbot-build.json").exists());
}

#[test]
fn configure_logs_to_stderr_only() {
  let env = TestEnv::empty();

  env
    .build_cmd()
    .arg("configure")
    .arg("--hl2sdk-root")
    .arg(env.sdk_root())
    .args(["--targets", "x86_64"])
    .assert()
    .success()
    .stderr(predicate::str::contains("configuring build"))
    .stderr(predicate::str::contains("wrote engine input"))
    .stdout(predicate::str::contains("configuring build").not());
}
