// tests/config_test.rs
use revstamp::config::{load_config, parse_config, Config};
use revstamp::version_file::FileKind;
use revstamp::RevStampError;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert!(config.targets.is_empty());
    assert!(!config.commit.enabled);
    assert!(!config.commit.push);
    assert_eq!(config.commit.message, "Update version to {version} ***NO_CI***");
    assert_eq!(config.commit.remote, "origin");
    assert_eq!(config.commit.author_name, "revstamp");
    assert_eq!(config.commit.author_email, "revstamp@localhost");
}

#[test]
fn test_load_from_fixture() {
    let config = load_config(Some(fixture("revstamp.toml").as_str())).expect("Failed to load test config");

    assert_eq!(config.targets.len(), 2);
    assert_eq!(config.targets[0].kind, FileKind::SdkManifest);
    assert_eq!(config.targets[0].files, "src/**/*.csproj;!src/legacy/**");
    assert_eq!(config.targets[1].kind, FileKind::NativeResource);
    assert!(config.commit.enabled);
    assert!(config.commit.push);
    assert_eq!(config.commit.render_message("1.2.3.4"), "Bump build to 1.2.3.4 [skip ci]");
    assert_eq!(config.commit.remote, "origin");
    assert!(config.behavior.commit_on_partial_failure);
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[[targets]]
kind = "build-script"
files = "build.gradle.kts"

[commit]
remote = "upstream"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.targets[0].kind, FileKind::BuildScript);
    assert_eq!(config.commit.remote, "upstream");
    assert!(!config.commit.enabled);
    assert!(!config.behavior.commit_on_partial_failure);
}

#[test]
fn test_missing_custom_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");
    let err = load_config(Some(path.to_str().unwrap())).unwrap_err();
    assert!(matches!(err, RevStampError::Config(_)));
}

#[test]
fn test_malformed_toml_is_an_error() {
    assert!(matches!(
        parse_config("[[targets]\nkind ="),
        Err(RevStampError::Config(_))
    ));
}

#[test]
#[serial]
fn test_load_from_current_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("revstamp.toml"),
        "[[targets]]\nkind = \"manifest-json\"\nfiles = \"package.json\"\n",
    )
    .unwrap();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let config = load_config(None);
    env::set_current_dir(previous).unwrap();

    let config = config.unwrap();
    assert_eq!(config.targets[0].kind, FileKind::ManifestJson);
    assert_eq!(config.targets[0].files, "package.json");
}
