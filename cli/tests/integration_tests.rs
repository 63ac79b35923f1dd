use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};

fn cookbook_meta(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cookbook-meta"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run cookbook-meta")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Creates `<root>/<name>/recipes/*.rb` and returns the cookbook directory.
fn write_cookbook(root: &Path, name: &str, recipes: &[&str]) -> PathBuf {
    let dir = root.join(name);
    let recipes_dir = dir.join("recipes");
    fs::create_dir_all(&recipes_dir).expect("failed to create recipes dir");
    for recipe in recipes {
        fs::write(recipes_dir.join(recipe), "# recipe\n").expect("failed to write recipe");
    }
    dir
}

fn write_document(root: &Path, file: &str, document: &Value) -> PathBuf {
    let path = root.join(file);
    fs::write(&path, serde_json::to_string_pretty(document).unwrap())
        .expect("failed to write document");
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

// ---------------------------------------------------------------------------
// compare / check
// ---------------------------------------------------------------------------

#[test]
fn compare_prints_ordering() {
    let output = cookbook_meta(&["compare", "1.10", "1.9"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), ">");

    let output = cookbook_meta(&["compare", "8", "8.0"]);
    assert_eq!(stdout(&output).trim(), "=");

    let output = cookbook_meta(&["compare", "0.9.1", "0.10"]);
    assert_eq!(stdout(&output).trim(), "<");
}

#[test]
fn compare_rejects_non_numeric_versions() {
    let output = cookbook_meta(&["compare", "1.x", "1.0"]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("error:"));
}

#[test]
fn check_succeeds_when_constraint_holds() {
    let output = cookbook_meta(&["check", "9.04", ">= 8.04"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("satisfies"));
}

#[test]
fn check_fails_when_constraint_does_not_hold() {
    let output = cookbook_meta(&["check", "10.04", "<< 10.04"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("does not satisfy"));
}

#[test]
fn check_reports_malformed_expression() {
    let output = cookbook_meta(&["check", "1.0", "about 1.0"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("about 1.0"));
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

#[test]
fn generate_discovers_recipes() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_cookbook(root.path(), "mysql", &["server.rb", "default.rb", "notes.txt"]);

    let output = cookbook_meta(&["generate", path_arg(&dir)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let document: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(document["name"], "mysql");
    assert_eq!(document["maintainer"], "Your Name");
    assert_eq!(document["recipes"], json!({ "mysql": "", "mysql::server": "" }));
    assert_eq!(
        document["providing"],
        json!({ "mysql": [">= 0.0.0"], "mysql::server": [">= 0.0.0"] })
    );
}

#[test]
fn generate_applies_config_and_name_override() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_cookbook(root.path(), "checkout", &["default.rb"]);
    let config = root.path().join("cookbook-meta.yml");
    fs::write(
        &config,
        "defaults:\n  maintainer: Bobo T. Clown\n  license: Clown License v1\n",
    )
    .unwrap();

    let output = cookbook_meta(&[
        "generate",
        path_arg(&dir),
        "--name",
        "circus",
        "--config",
        path_arg(&config),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let document: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(document["name"], "circus");
    assert_eq!(document["maintainer"], "Bobo T. Clown");
    assert_eq!(document["maintainer_email"], "youremail@example.com");
    assert_eq!(document["license"], "Clown License v1");
    assert_eq!(document["recipes"], json!({ "circus": "" }));
}

#[test]
fn generate_writes_output_file() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_cookbook(root.path(), "apache2", &["default.rb", "mod_ssl.rb"]);
    let target = root.path().join("out").join("metadata.json");

    let output = cookbook_meta(&[
        "generate",
        path_arg(&dir),
        "--output",
        path_arg(&target),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("2 recipe(s)"));

    let document: Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(document["name"], "apache2");
    assert!(document["recipes"].get("apache2::mod_ssl").is_some());
}

#[test]
fn generate_emits_yaml() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_cookbook(root.path(), "ntp", &["default.rb"]);

    let output = cookbook_meta(&["generate", path_arg(&dir), "--format", "yaml"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("name: ntp"));
}

#[test]
fn generated_yaml_reads_back() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_cookbook(root.path(), "ntp", &["default.rb", "undo.rb"]);
    let target = root.path().join("metadata.yaml");

    let output = cookbook_meta(&[
        "generate",
        path_arg(&dir),
        "--format",
        "yaml",
        "--output",
        path_arg(&target),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = cookbook_meta(&["validate", path_arg(&target)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = cookbook_meta(&["show", path_arg(&target)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let document: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(document["name"], "ntp");
    assert_eq!(document["recipes"], json!({ "ntp": "", "ntp::undo": "" }));
    assert_eq!(document["providing"]["ntp::undo"], json!([">= 0.0.0"]));
}

#[test]
fn validate_reports_malformed_yaml_with_path() {
    let root = tempfile::tempdir().unwrap();
    let bad = root.path().join("broken.yml");
    fs::write(&bad, "name: [unterminated\n").unwrap();

    let output = cookbook_meta(&["validate", path_arg(&bad)]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("broken.yml"));
}

#[test]
fn generate_reports_missing_config() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_cookbook(root.path(), "ntp", &[]);
    let missing = root.path().join("absent.yml");

    let output = cookbook_meta(&["generate", path_arg(&dir), "--config", path_arg(&missing)]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("absent.yml"));
}

// ---------------------------------------------------------------------------
// show / validate
// ---------------------------------------------------------------------------

fn valid_document() -> Value {
    json!({
        "name": "test_cookbook",
        "maintainer": "Bobo T. Clown",
        "platforms": { "ubuntu": [">= 8.04", "<< 10.04"] },
        "dependencies": { "openssl": [], "mysql": [" >= 1.0 "] },
        "attributes": {
            "mysql/bind_address": {
                "display_name": "MySQL Bind Address",
                "default": "127.0.0.1"
            }
        },
        "recipes": { "test_cookbook": "It, um... tests stuff?" }
    })
}

#[test]
fn show_normalizes_document() {
    let root = tempfile::tempdir().unwrap();
    let path = write_document(root.path(), "metadata.json", &valid_document());

    let output = cookbook_meta(&["show", path_arg(&path)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let document: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(document["dependencies"]["openssl"], json!([">= 0.0.0"]));
    assert_eq!(document["dependencies"]["mysql"], json!([">= 1.0"]));
    assert_eq!(document["license"], "Apache v2.0");
    assert_eq!(document["attributes"]["mysql/bind_address"]["type"], "string");
    assert_eq!(document["attributes"]["mysql/bind_address"]["required"], false);
    assert_eq!(
        document["providing"]["test_cookbook"],
        json!([">= 0.0.0"])
    );
}

#[test]
fn show_is_stable_across_reloads() {
    let root = tempfile::tempdir().unwrap();
    let first = write_document(root.path(), "first.json", &valid_document());

    let output = cookbook_meta(&["show", path_arg(&first)]);
    assert!(output.status.success());
    let second = root.path().join("second.json");
    fs::write(&second, stdout(&output)).unwrap();

    let again = cookbook_meta(&["show", path_arg(&second)]);
    assert!(again.status.success());
    assert_eq!(stdout(&output), stdout(&again));
}

#[test]
fn validate_counts_documents() {
    let root = tempfile::tempdir().unwrap();
    let a = write_document(root.path(), "a.json", &valid_document());
    let b = write_document(root.path(), "b.json", &json!({ "name": "minimal" }));

    let output = cookbook_meta(&["validate", path_arg(&a), path_arg(&b)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Validated 2 metadata document(s)."));
}

#[test]
fn validate_names_the_failing_document() {
    let root = tempfile::tempdir().unwrap();
    let good = write_document(root.path(), "good.json", &valid_document());
    let bad = write_document(
        root.path(),
        "bad.json",
        &json!({ "name": "broken", "dependencies": { "apt": ["~> 1.0"] } }),
    );

    let output = cookbook_meta(&["validate", path_arg(&good), path_arg(&bad)]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("bad.json"), "stderr: {err}");
    assert!(err.contains("~> 1.0"), "stderr: {err}");
}

#[test]
fn validate_rejects_bad_attribute_options() {
    let root = tempfile::tempdir().unwrap();
    let bad = write_document(
        root.path(),
        "bad.json",
        &json!({ "name": "broken", "attributes": { "a/b": { "type": "integer" } } }),
    );

    let output = cookbook_meta(&["validate", path_arg(&bad)]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("a/b"));
}

// ---------------------------------------------------------------------------
// init-config
// ---------------------------------------------------------------------------

#[test]
fn init_config_output_is_loadable() {
    let root = tempfile::tempdir().unwrap();
    let config = root.path().join("cookbook-meta.yml");

    let output = cookbook_meta(&["init-config", path_arg(&config)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let raw = fs::read_to_string(&config).unwrap();
    assert!(raw.contains("recipes_dir: recipes"));

    let dir = write_cookbook(root.path(), "ntp", &["default.rb"]);
    let output = cookbook_meta(&["generate", path_arg(&dir), "--config", path_arg(&config)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn verbose_logs_to_stderr_only() {
    let root = tempfile::tempdir().unwrap();
    let path = write_document(root.path(), "metadata.json", &valid_document());

    let output = cookbook_meta(&["-v", "show", path_arg(&path)]);
    assert!(output.status.success());
    assert!(serde_json::from_str::<Value>(&stdout(&output)).is_ok());
    assert!(stderr(&output).contains("DEBUG"));
}
