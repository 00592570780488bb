//! Keys with resolver-level meaning

/// Keys the resolver extracts and injects itself. They are never reported
/// as unknown.
pub struct SpecialKeys;

impl SpecialKeys {
    pub const PDK: &'static str = "PDK";
    pub const PDK_ROOT: &'static str = "PDK_ROOT";
    pub const STD_CELL_LIBRARY: &'static str = "STD_CELL_LIBRARY";
    pub const DESIGN_DIR: &'static str = "DESIGN_DIR";

    pub const ALL: [&'static str; 4] = [
        Self::PDK,
        Self::PDK_ROOT,
        Self::STD_CELL_LIBRARY,
        Self::DESIGN_DIR,
    ];

    pub fn contains(key: &str) -> bool {
        Self::ALL.contains(&key)
    }
}

/// Top-level key holding run metadata in modern configuration files.
pub const META_KEY: &str = "meta";

/// Which leftover keys are silently ignored instead of warned about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeyPolicy {
    /// A key containing any of these substrings is ignored.
    pub ignored_markers: Vec<String>,
    /// Keys ignored by exact name.
    pub ignored_keys: Vec<String>,
}

impl UnknownKeyPolicy {
    /// A policy that warns about every unknown key.
    pub fn strict() -> Self {
        Self {
            ignored_markers: Vec::new(),
            ignored_keys: Vec::new(),
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.ignored_markers.push(marker.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.ignored_keys.push(key.into());
        self
    }

    pub fn is_exempt(&self, key: &str) -> bool {
        self.ignored_keys.iter().any(|k| k == key)
            || self.ignored_markers.iter().any(|m| key.contains(m.as_str()))
    }
}

/// Tool option passthroughs (`*_OPT*`) and the `//` comment key.
impl Default for UnknownKeyPolicy {
    fn default() -> Self {
        Self::strict().with_marker("_OPT").with_key("//")
    }
}
