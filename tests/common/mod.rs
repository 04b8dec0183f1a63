//! Common test utilities for revlock integration tests

use std::path::PathBuf;

use revlock::command::{CommandIntent, FakeCommandRunner};
use revlock::install_root::InstallRoot;
use revlock::resolver::DependencyFetcher;
use tempfile::TempDir;

/// A test workspace with its own install root
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Directory holding revlock.yaml and revlock.lock
    pub path: PathBuf,
    /// Install root (REVLOCK_PATH)
    pub root: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("project");
        let root = temp.path().join("root");
        std::fs::create_dir_all(&path).expect("Failed to create workspace directory");
        Self { temp, path, root }
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    pub fn install_root(&self) -> InstallRoot {
        InstallRoot::new(&self.root)
    }

    /// Create an installed source tree with a backend marker
    pub fn create_source_tree(&self, dependency_path: &str, marker: &str) -> PathBuf {
        let tree = self.install_root().path_for(dependency_path);
        std::fs::create_dir_all(tree.join(marker)).expect("Failed to create source tree");
        tree
    }

    /// Fetcher backed by a fake runner whose downloads create git trees and whose revision
    /// queries print `rev-<last path segment>`
    pub fn fake_fetcher(&self) -> DependencyFetcher<FakeCommandRunner> {
        let runner = FakeCommandRunner::new();
        runner.simulate_downloads(".git");
        runner.when_intent(CommandIntent::CurrentVersion, |spec| {
            let name = spec
                .dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            Ok(format!("rev-{name}\n"))
        });
        DependencyFetcher::new(runner, self.install_root())
    }
}
