//! Normalized path handling for cross-platform compatibility

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path stored in one canonical spelling.
///
/// PDK locations and design directories end up inside configuration values
/// and diagnostics, where they are compared as strings. Separators are
/// forward slashes, repeated separators and `.` segments are dropped, and
/// there is no trailing slash except on the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

fn canonical_spelling(raw: &str) -> String {
    let raw = raw.replace('\\', "/");
    let rooted = raw.starts_with('/');
    let segments: Vec<&str> = raw
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();

    match (rooted, segments.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => ".".to_string(),
        (true, false) => format!("/{}", segments.join("/")),
        (false, false) => segments.join("/"),
    }
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: canonical_spelling(&path.as_ref().to_string_lossy()),
        }
    }

    /// Anchor `path` at the current directory. Symlinks are left alone.
    pub fn absolute(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let absolute = std::path::absolute(path).map_err(|source| Error::Absolute {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(dunce::simplified(&absolute)))
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// The platform-native form, for I/O.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    pub fn join(&self, segment: &str) -> Self {
        if self.inner == "." {
            return Self::new(segment);
        }
        Self {
            inner: canonical_spelling(&format!("{}/{segment}", self.inner)),
        }
    }

    pub fn parent(&self) -> Option<Self> {
        let (head, _) = self.inner.rsplit_once('/')?;
        let inner = if head.is_empty() { "/" } else { head };
        Some(Self {
            inner: inner.to_string(),
        })
    }

    pub fn file_name(&self) -> Option<&str> {
        let name = match self.inner.rsplit_once('/') {
            Some((_, name)) => name,
            None => self.inner.as_str(),
        };
        (!name.is_empty() && name != ".").then_some(name)
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// The text after the last dot of the file name. Dotfiles have none.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Some(ext),
            _ => None,
        }
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_redundant_segments() {
        assert_eq!(NormalizedPath::new("pdks//sky130A/./libs.tech/").as_str(), "pdks/sky130A/libs.tech");
        assert_eq!(NormalizedPath::new("//").as_str(), "/");
        assert_eq!(NormalizedPath::new("./").as_str(), ".");
    }

    #[test]
    fn relative_parent_stops_at_the_first_segment() {
        assert!(NormalizedPath::new("config.json").parent().is_none());
        assert_eq!(NormalizedPath::new(".").join("a").as_str(), "a");
    }
}
