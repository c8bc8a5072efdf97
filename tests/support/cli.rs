use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch home for one CLI test: its own state and config paths.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn state(&self) -> PathBuf {
        self.dir.path().join("ledger.json")
    }

    pub fn config(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.config();
        std::fs::write(&path, contents).expect("write config");
        path
    }

    /// `overunder` pointed at this workspace's files, clock pinned to `at`.
    pub fn at(&self, at: u64) -> Command {
        let mut cmd = cargo_bin_cmd!("overunder");
        cmd.arg("--state")
            .arg(self.state())
            .arg("--config")
            .arg(self.config())
            .arg("--at")
            .arg(at.to_string())
            .env_remove("RUST_LOG");
        cmd
    }
}
