//! Tests for interactive configurations
//!
//! Kept in one test so the process-wide slot is only touched once.

mod common;

use flow_config::{ConfigLayer, InteractiveRequest, Value, current_interactive};
use flow_test_utils::TestPdkRoot;
use flow_test_utils::pdk::STANDARD_PDK;
use pretty_assertions::assert_eq;
use std::sync::Arc;

use common::loader;

#[test]
fn test_interactive_configuration_lifecycle() {
    let root = TestPdkRoot::standard();
    let loader = loader();

    let first = loader
        .interactive(InteractiveRequest::new("spm", STANDARD_PDK).with_pdk_root(root.root()))
        .unwrap();
    assert!(Arc::ptr_eq(&current_interactive().unwrap(), &first));
    assert_eq!(first["DESIGN_NAME"], Value::from("spm"));

    let config = loader
        .interactive(
            InteractiveRequest::new("counter", STANDARD_PDK)
                .with_pdk_root(root.root())
                .with_value("CLOCK_PERIOD", "5"),
        )
        .unwrap();
    assert!(config.is_interactive());
    assert_eq!(config["DESIGN_NAME"], Value::from("counter"));
    assert_eq!(config["CLOCK_PERIOD"], Value::from("5"));
    assert_eq!(config["VDD_PIN"], Value::from("VPWR"));
    assert!(config.to_markdown().unwrap().starts_with("# Interactive Configuration"));

    let published = current_interactive().unwrap();
    assert!(Arc::ptr_eq(&published, &config));

    let err = loader
        .interactive(
            InteractiveRequest::new("bad", STANDARD_PDK)
                .with_pdk_root(root.root())
                .with_value("DIODE_INSERTION_STRATEGY", 1),
        )
        .unwrap_err();
    assert_eq!(err.as_invalid().unwrap().layer, ConfigLayer::Defaults);
    assert!(Arc::ptr_eq(&current_interactive().unwrap(), &config));
}
