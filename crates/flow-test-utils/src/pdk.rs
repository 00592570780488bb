//! [`TestPdkRoot`] builder for PDK resolution scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the PDK [`TestPdkRoot::standard`] installs.
pub const STANDARD_PDK: &str = "testpdk";
/// Library the standard PDK selects when none is given.
pub const STANDARD_SCL: &str = "test_sc_hd";
/// Second library of the standard PDK.
pub const ALTERNATE_SCL: &str = "test_sc_hs";

/// Base configuration of the standard PDK.
pub const STANDARD_PDK_CONFIG: &str = r#"# Test PDK base configuration
set ::env(VDD_PIN) VPWR
set ::env(GND_PIN) VGND
set ::env(VDD_PIN_VOLTAGE) 1.80

if { ![info exists ::env(STD_CELL_LIBRARY)] } {
    set ::env(STD_CELL_LIBRARY) test_sc_hd
}

set ::env(TECH_LEFS) "nom_* $::env(PDK_ROOT)/$::env(PDK)/libs.ref/$::env(STD_CELL_LIBRARY)/techlef/nom.tlef"
set ::env(DEFAULT_CORNER) nom_tt_025C_1v80
set ::env(STA_CORNERS) "nom_tt_025C_1v80 min_ff_n40C_1v95 max_ss_100C_1v60"
set ::env(FP_IO_HLAYER) met3
set ::env(FP_IO_VLAYER) met2
set ::env(RT_MIN_LAYER) met1
set ::env(RT_MAX_LAYER) met5
set ::env(DEFAULT_MAX_TRAN) 0.75
"#;

/// High-density library overrides of the standard PDK.
pub const STANDARD_SCL_CONFIG: &str = r#"# High density library
set ::env(PLACE_SITE) unithd
set ::env(FILL_CELL) "test_sc_hd__fill_1 test_sc_hd__fill_2"
set ::env(DECAP_CELL) test_sc_hd__decap_3
set ::env(CELL_LEFS) "$::env(PDK_ROOT)/$::env(PDK)/libs.ref/$::env(STD_CELL_LIBRARY)/lef/cells.lef"
set ::env(SYNTH_DRIVING_CELL) test_sc_hd__inv_2
"#;

/// High-speed library overrides of the standard PDK.
pub const ALTERNATE_SCL_CONFIG: &str = r#"# High speed library
set ::env(PLACE_SITE) uniths
set ::env(FILL_CELL) test_sc_hs__fill_1
set ::env(CELL_LEFS) "$::env(PDK_ROOT)/$::env(PDK)/libs.ref/$::env(STD_CELL_LIBRARY)/lef/cells.lef"
set ::env(SYNTH_DRIVING_CELL) test_sc_hs__inv_4
set ::env(RT_MAX_LAYER) met4
"#;

/// A temporary PDK root laid out as `<root>/<pdk>/libs.tech/openlane/...`.
///
/// # Example
///
/// ```rust,no_run
/// use flow_test_utils::TestPdkRoot;
///
/// let root = TestPdkRoot::standard();
/// root.add_entry("testpdk_v2");
/// assert!(root.root().join("testpdk").exists());
/// ```
pub struct TestPdkRoot {
    temp_dir: TempDir,
}

impl Default for TestPdkRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPdkRoot {
    /// Create an empty PDK root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("TestPdkRoot::new: failed to create temp dir"),
        }
    }

    /// Create a root holding [`STANDARD_PDK`] with both test libraries.
    pub fn standard() -> Self {
        let root = Self::new();
        root.write_pdk_config(STANDARD_PDK, STANDARD_PDK_CONFIG);
        root.write_scl_config(STANDARD_PDK, STANDARD_SCL, STANDARD_SCL_CONFIG);
        root.write_scl_config(STANDARD_PDK, ALTERNATE_SCL, ALTERNATE_SCL_CONFIG);
        root
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `<root>/<pdk>`
    pub fn pdk_dir(&self, pdk: &str) -> PathBuf {
        self.root().join(pdk)
    }

    fn flow_dir(&self, pdk: &str) -> PathBuf {
        self.pdk_dir(pdk).join("libs.tech").join("openlane")
    }

    /// Write the base configuration script of `pdk`.
    pub fn write_pdk_config(&self, pdk: &str, script: &str) -> PathBuf {
        let dir = self.flow_dir(pdk);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.tcl");
        fs::write(&path, script).unwrap();
        path
    }

    /// Write the configuration script of library `scl` of `pdk`.
    pub fn write_scl_config(&self, pdk: &str, scl: &str, script: &str) -> PathBuf {
        let dir = self.flow_dir(pdk).join(scl);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.tcl");
        fs::write(&path, script).unwrap();
        path
    }

    /// Create an empty directory directly under the root, such as a
    /// near-miss PDK name.
    pub fn add_entry(&self, name: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }
}
