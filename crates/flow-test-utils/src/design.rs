//! [`TestDesign`] builder for design configuration files.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary design directory.
pub struct TestDesign {
    temp_dir: TempDir,
}

impl Default for TestDesign {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDesign {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("TestDesign::new: failed to create temp dir"),
        }
    }

    /// Return the design directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `path` relative to the design directory.
    pub fn path(&self, path: &str) -> PathBuf {
        self.root().join(path)
    }

    /// Write `contents` to `name`, creating parent directories.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    /// Write `value` as pretty-printed JSON to `name`.
    pub fn write_json(&self, name: &str, value: &serde_json::Value) -> PathBuf {
        let text = serde_json::to_string_pretty(value).unwrap();
        self.write(name, &text)
    }

    /// Assert that the file at `name` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, name: &str, content: &str) {
        let full_path = self.path(name);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
