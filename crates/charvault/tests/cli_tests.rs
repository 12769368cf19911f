//! CLI integration tests.
//!
//! These tests exercise the CLI commands end-to-end against a temporary vault.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

struct Vault {
    home: TempDir,
}

impl Vault {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> std::path::PathBuf {
        self.home.path().join("data")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_charvault"))
            .args(args)
            .arg("--data-dir")
            .arg(self.data_dir())
            .current_dir(self.home.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join("config"))
            .env("XDG_STATE_HOME", self.home.path().join("state"))
            .env_remove("CHARVAULT_CONFIG_CONTENT")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute command")
    }

    fn write_character(&self, name: &str, description: &str) -> std::path::PathBuf {
        let path = self.home.path().join(format!("{name}.json"));
        let json = serde_json::json!({
            "id": "chr_cli",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "sections": {
                "name": {"kind": "text", "value": "Aldric"},
                "description": {"kind": "text", "value": description},
            }
        });
        std::fs::write(&path, json.to_string()).expect("Failed to write character");
        path
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn import(vault: &Vault, file: &Path) -> String {
    let output = vault.run(&["import", &file.to_string_lossy()]);
    assert!(output.status.success(), "import failed: {:?}", output);
    let out = stdout(&output);
    let start = out.find("(snapshot ").expect("snapshot id in output") + "(snapshot ".len();
    out[start..].trim_end().trim_end_matches(')').to_string()
}

#[test]
fn test_help_command() {
    let vault = Vault::new();
    let output = vault.run(&["--help"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Review and restore character snapshots"));
    assert!(out.contains("restore"));
}

#[test]
fn test_list_without_snapshots() {
    let vault = Vault::new();
    let output = vault.run(&["list", "chr_nobody"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("No snapshots found"));
}

#[test]
fn test_import_diff_restore_roundtrip() {
    let vault = Vault::new();
    let first = import(&vault, &vault.write_character("v1", "A tall knight."));
    import(&vault, &vault.write_character("v2", "A tall knight of the crown."));

    let list = stdout(&vault.run(&["list", "chr_cli"]));
    assert!(list.contains(&first));
    assert_eq!(list.matches("Import").count(), 2);

    let diff = vault.run(&["diff", "chr_cli", "--snapshot", &first]);
    assert!(diff.status.success());
    let diff = stdout(&diff);
    assert!(diff.contains("Description (changed"));
    assert!(diff.contains("{+ of the crown+}"));

    let restore = vault.run(&["restore", "chr_cli", &first, "--yes"]);
    assert!(restore.status.success(), "restore failed: {:?}", restore);
    assert!(stdout(&restore).contains("Restored all sections of Aldric"));

    let after = stdout(&vault.run(&["diff", "chr_cli", "--snapshot", &first]));
    assert!(after.contains("No differences."));
}

#[test]
fn test_restore_rejects_unknown_section() {
    let vault = Vault::new();
    let first = import(&vault, &vault.write_character("v1", "A tall knight."));

    let output = vault.run(&["restore", "chr_cli", &first, "--section", "weapon", "--yes"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown section"));
}
