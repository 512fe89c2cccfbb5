use predicates::prelude::*;

use super::common::{TestEnv, read, stdout_json};

const PACKAGE: &str = "output/addons/sourcemod";

#[test]
fn package_copies_release_binaries_by_extension() {
  let env = TestEnv::with_project();
  env.write_file("build/bin/x86_64/release/ext.so", "elf");
  env.write_file("build/bin/x86_64/release/ext.pdb", "pdb");
  env.write_file("build/bin/x86_64/release/notes.txt", "not shipped");

  env
    .build_cmd()
    .arg("package")
    .assert()
    .success()
    .stdout(predicate::str::contains("Package created"))
    .stdout(predicate::str::contains("x86_64"));

  let extensions = env.path(&format!("{PACKAGE}/extensions/x64"));
  assert_eq!(read(&extensions.join("ext.so")), "elf");
  assert_eq!(read(&extensions.join("ext.pdb")), "pdb");
  assert!(!extensions.join("notes.txt").exists());
}

#[test]
fn package_lays_out_assets_and_autoload() {
  let env = TestEnv::with_project();
  env.write_file("build/bin/x86/release/navbot.ext.so", "elf32");

  env.build_cmd().arg("package").assert().success();

  let package = env.path(PACKAGE);
  assert!(package.join("configs/navbot/tf").is_dir());
  assert!(package.join("gamedata/navbot.games/game.tf.txt").is_file());
  assert!(package.join("scripting/include/navbot.inc").is_file());
  assert!(package.join("translations/navbot.phrases.txt").is_file());
  assert!(package.join("extensions/navbot.autoload").is_file());
  assert!(package.join("extensions/navbot.ext.so").is_file());
  assert!(!package.join("extensions/x64/navbot.ext.so").exists());
}

#[test]
fn package_without_binaries_warns_and_succeeds() {
  let env = TestEnv::with_project();

  env
    .build_cmd()
    .arg("package")
    .assert()
    .success()
    .stderr(predicate::str::contains("No release binaries for x86"))
    .stderr(predicate::str::contains("No release binaries for x86_64"));

  assert!(env.path(&format!("{PACKAGE}/extensions/x64")).is_dir());
}

#[test]
fn package_json_output_is_valid() {
  let env = TestEnv::with_project();
  env.write_file("build/bin/x86_64/release/ext.so", "elf");

  let output = env
    .build_cmd()
    .args(["package", "--format", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json = stdout_json(&output.stdout);
  assert_eq!(json["packaged_archs"], serde_json::json!(["x86_64"]));
  assert_eq!(json["skipped_archs"], serde_json::json!(["x86"]));
  assert_eq!(json["digest"].as_str().map(str::len), Some(64));
  assert_eq!(json["layout"].as_array().map(Vec::len), Some(6));
}

#[test]
fn package_is_repeatable() {
  let env = TestEnv::with_project();
  env.write_file("build/bin/x86_64/release/ext.so", "elf");

  let digest = || {
    let output = env
      .build_cmd()
      .args(["package", "--format", "json"])
      .output()
      .unwrap();
    assert!(output.status.success());
    stdout_json(&output.stdout)["digest"].clone()
  };

  assert_eq!(digest(), digest());
}

#[test]
fn package_honours_output_and_bins_overrides() {
  let env = TestEnv::with_project();
  env.write_file("artifacts/x86_64/release/ext.so", "elf");
  let output = env.path("dist");

  env
    .build_cmd()
    .arg("package")
    .arg("--output")
    .arg(&output)
    .arg("--bins")
    .arg(env.path("artifacts"))
    .assert()
    .success();

  assert!(output.join("addons/sourcemod/extensions/x64/ext.so").is_file());
  assert!(!env.path("output").exists());
}

#[test]
fn package_missing_autoload_fails_before_writing() {
  let env = TestEnv::with_project();
  std::fs::remove_file(env.path("extension/navbot.autoload")).unwrap();

  env
    .build_cmd()
    .arg("package")
    .assert()
    .failure()
    .stderr(predicate::str::contains("navbot.autoload"));

  assert!(!env.path("output").exists());
}
