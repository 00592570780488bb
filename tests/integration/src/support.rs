//! Shared setup for the end-to-end tests

#![allow(dead_code)]

use std::path::PathBuf;

use flow_config::{ConfigLoader, Error, InvalidConfig, LoadOptions, Loaded, PdkRootLocator, VariableRef};
use flow_test_utils::{TestDesign, TestPdkRoot};

/// A loader over the built-in catalog that ignores the host's PDK setup.
pub fn loader() -> ConfigLoader {
    ConfigLoader::new(flow_vars::catalog()).with_locator(PdkRootLocator::isolated())
}

pub fn flow(loader: &ConfigLoader) -> Vec<VariableRef> {
    loader.catalog().flow_common.clone()
}

pub fn options(root: &TestPdkRoot) -> LoadOptions {
    LoadOptions::new().with_pdk_root(root.root())
}

pub fn write_design(design: &TestDesign, value: serde_json::Value) -> PathBuf {
    design.write_json("config.json", &value)
}

/// Load `value` as a JSON design over the standard PDK.
pub fn load_json(root: &TestPdkRoot, value: serde_json::Value) -> Result<Loaded, Error> {
    let design = TestDesign::new();
    let path = write_design(&design, value);
    let loader = loader();
    loader.load(path, &flow(&loader), &options(root))
}

pub fn expect_invalid(result: Result<Loaded, Error>) -> InvalidConfig {
    match result {
        Err(Error::Invalid(invalid)) => invalid,
        Err(other) => panic!("expected an aggregated error, got {other}"),
        Ok(loaded) => panic!("expected an error, got {:?}", loaded.config),
    }
}
