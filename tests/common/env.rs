//! Test environment for isolated assetry runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use super::fixtures::{source_files, CONFIG};

/// Result of running the assetry binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Parsed NDJSON lines of stdout
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad json {l:?}: {e}")))
            .collect()
    }
}

impl From<Output> for TestResult {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// An isolated project directory
pub struct TestEnv {
    pub project_root: TempDir,
}

impl TestEnv {
    /// Empty project without configuration
    pub fn empty() -> Self {
        Self {
            project_root: tempfile::tempdir().unwrap(),
        }
    }

    /// Configuration plus the two-application source tree
    pub fn two_apps() -> Self {
        let env = Self::empty();
        env.write("assetry.toml", CONFIG);
        for (relative, content) in source_files() {
            env.write(&format!("src/{relative}"), content);
        }
        env
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("cannot read {relative}: {e}"))
    }

    /// Files below `relative`, as sorted slash-separated paths
    pub fn list(&self, relative: &str) -> Vec<String> {
        list_files(&self.path(relative))
    }

    /// The single file in `dir` whose name is `<stem>-<10 hex>.<ext>`
    pub fn fingerprinted(&self, dir: &str, original: &str) -> String {
        let (stem, ext) = original.rsplit_once('.').unwrap();
        let matches: Vec<String> = self
            .list(dir)
            .into_iter()
            .filter(|name| is_fingerprint_of(name, stem, ext))
            .collect();
        assert_eq!(matches.len(), 1, "expected one {original} in {dir}: {matches:?}");
        matches.into_iter().next().unwrap()
    }

    /// Command for the assetry binary, run from the project root
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_assetry"));
        cmd.args(args)
            .current_dir(self.project_root.path())
            .env_remove("ASSETRY_DEST")
            .env_remove("ASSETRY_SRC")
            .env_remove("ASSETRY_MAIN_SCRIPT")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.command(args).output().unwrap().into()
    }
}

pub fn list_files(dir: &Path) -> Vec<String> {
    let mut files = Vec::new();
    if !dir.exists() {
        return files;
    }
    for entry in ignore::WalkBuilder::new(dir).standard_filters(false).build() {
        let entry = entry.unwrap();
        if entry.file_type().is_some_and(|t| t.is_file()) {
            let relative = entry.path().strip_prefix(dir).unwrap();
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
    files.sort();
    files
}

/// `name` is `<stem>-<10 lowercase hex>.<ext>`
pub fn is_fingerprint_of(name: &str, stem: &str, ext: &str) -> bool {
    let Some(rest) = name.strip_prefix(stem).and_then(|r| r.strip_prefix('-')) else {
        return false;
    };
    let Some(hash) = rest.strip_suffix(ext).and_then(|r| r.strip_suffix('.')) else {
        return false;
    };
    hash.len() == 10 && hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}
