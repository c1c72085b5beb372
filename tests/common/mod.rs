//! Common test utilities and helpers

use csvdelta::output::{delta_path, RunSummary};
use csvdelta::{DeltaError, Partition, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test fixture manager for creating temporary test environments
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the root path of the test fixture
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a test CSV file with sample data (no quoting)
    pub fn create_csv(&self, name: &str, data: &[Vec<&str>]) -> Result<PathBuf> {
        let path = self.root().join(name);
        let mut content = String::new();

        for row in data {
            content.push_str(&row.join(","));
            content.push('\n');
        }

        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a test CSV file with raw string content
    pub fn create_csv_raw(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a file that is not valid UTF-8 after the header
    pub fn create_corrupted_file(&self, name: &str) -> Result<PathBuf> {
        let path = self.root().join(name);
        fs::write(&path, b"id,val\n1,\x00\x01\xff\xfe\n")?;
        Ok(path)
    }

    /// Create a large CSV file with `id` as the first column
    pub fn create_large_csv(&self, name: &str, rows: usize, cols: usize) -> Result<PathBuf> {
        let path = self.root().join(name);
        let mut content = String::from("id");

        for i in 1..cols {
            content.push_str(&format!(",col_{}", i));
        }
        content.push('\n');

        for row in 0..rows {
            content.push_str(&format!("key_{}", row));
            for col in 1..cols {
                content.push_str(&format!(",value_{}_{}", row, col));
            }
            content.push('\n');
        }

        fs::write(&path, content)?;
        Ok(path)
    }

    /// Output prefix inside the fixture directory
    pub fn prefix(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    pub fn output_path(&self, prefix: &str, partition: Partition) -> PathBuf {
        delta_path(&self.prefix(prefix), partition)
    }

    /// Read a delta output back as raw records, header included
    pub fn read_output(&self, prefix: &str, partition: Partition) -> Vec<Vec<String>> {
        let path = self.output_path(prefix, partition);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .unwrap_or_else(|e| panic!("Should be able to open {}: {}", path.display(), e));

        reader
            .records()
            .map(|r| r.expect("Output should be valid CSV").iter().map(String::from).collect())
            .collect()
    }

    /// Keys (first column) of the data rows of an output
    pub fn output_keys(&self, prefix: &str, partition: Partition) -> Vec<String> {
        self.read_output(prefix, partition)
            .into_iter()
            .skip(1)
            .map(|row| row.into_iter().next().unwrap_or_default())
            .collect()
    }

    /// Assert that none of the three outputs exist for `prefix`
    pub fn assert_no_outputs(&self, prefix: &str) {
        for partition in Partition::ALL {
            let path = self.output_path(prefix, partition);
            assert!(!path.exists(), "Output should not exist: {}", path.display());
        }
    }
}

/// Helper for running CLI commands in tests
pub struct CliTestRunner {
    fixture: TestFixture,
}

impl CliTestRunner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fixture: TestFixture::new()?,
        })
    }

    pub fn fixture(&self) -> &TestFixture {
        &self.fixture
    }

    /// Run csvdelta with the given arguments and return the summary
    pub fn run_command(&self, args: &[&str]) -> Result<RunSummary> {
        use clap::Parser;
        use csvdelta::cli::Cli;
        use csvdelta::commands::execute_command;

        let mut cmd_args = vec!["csvdelta"];
        cmd_args.extend(args);
        cmd_args.push("--no-progress");

        let cli = Cli::try_parse_from(cmd_args).expect("Arguments should parse");
        execute_command(&cli)
    }

    /// Compare two fixture files, writing outputs under `prefix`
    pub fn run_delta(&self, older: &Path, newer: &Path, prefix: &str) -> Result<RunSummary> {
        let prefix = self.fixture.prefix(prefix);
        self.run_command(&[
            older.to_str().unwrap(),
            newer.to_str().unwrap(),
            prefix.to_str().unwrap(),
        ])
    }

    /// Run a command and expect it to succeed
    pub fn expect_success(&self, args: &[&str]) -> RunSummary {
        self.run_command(args).expect("Command should succeed")
    }

    /// Run a command and expect it to fail
    pub fn expect_failure(&self, args: &[&str]) -> DeltaError {
        self.run_command(args).expect_err("Command should fail")
    }
}

/// The built `csvdelta` binary, run from `dir` with `RUST_LOG` cleared
pub fn csvdelta_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_csvdelta"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

/// Sample data generators for testing
pub mod sample_data {
    pub fn reference_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["id", "val"],
            vec!["K1", "x"],
            vec!["K2", "y"],
            vec!["K3", "z"],
        ]
    }

    pub fn current_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["id", "val"],
            vec!["K1", "x"],
            vec!["K2", "Y"], // Value changed
            vec!["K4", "w"], // New row, K3 removed
        ]
    }

    pub fn products_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["id", "name", "price"],
            vec!["1", "Apple", "1.50"],
            vec!["2", "Banana", "0.75"],
            vec!["3", "Cherry", "2.00"],
        ]
    }

    pub fn updated_products_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["id", "name", "price"],
            vec!["1", "Apple", "1.60"], // Price changed
            vec!["2", "Banana", "0.75"],
            vec!["4", "Date", "3.00"], // New row, Cherry removed
        ]
    }
}

/// Assertion helpers for test validation
pub mod assertions {
    use std::path::Path;

    /// Assert that a file exists and is not empty
    pub fn assert_file_exists_and_not_empty(path: &Path) {
        assert!(path.exists(), "File should exist: {}", path.display());
        let metadata = std::fs::metadata(path).expect("Should be able to read file metadata");
        assert!(metadata.len() > 0, "File should not be empty: {}", path.display());
    }

    /// Assert that a JSON value contains expected keys
    pub fn assert_json_contains_keys(json: &serde_json::Value, keys: &[&str]) {
        for key in keys {
            assert!(json.get(key).is_some(), "JSON should contain key '{}'", key);
        }
    }
}
