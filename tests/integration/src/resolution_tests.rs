//! End-to-end resolution of designs over a PDK with the built-in catalog

mod support;

use flow_config::{ConfigInput, ConfigLayer, DiagnosticKind, LoadOptions, Value};
use flow_test_utils::pdk::{ALTERNATE_SCL, STANDARD_PDK, STANDARD_SCL};
use flow_test_utils::{TestDesign, TestPdkRoot};
use pretty_assertions::assert_eq;
use serde_json::json;

use support::{expect_invalid, flow, load_json, loader, options, write_design};

#[test]
fn test_standard_pdk_resolves_without_warnings() {
    let root = TestPdkRoot::standard();
    let loaded = load_json(&root, json!({"PDK": STANDARD_PDK, "DESIGN_NAME": "spm"})).unwrap();

    assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
    let config = &loaded.config;
    assert_eq!(config["STD_CELL_LIBRARY"], Value::from(STANDARD_SCL));
    assert_eq!(config["PLACE_SITE"], Value::from("unithd"));
    assert_eq!(config["CLOCK_PERIOD"], Value::from(10));
    assert_eq!(config["FP_PDN_VERTICAL_HALO"], config["FP_PDN_HORIZONTAL_HALO"]);
    assert_eq!(config["VDD_PIN_VOLTAGE"], Value::number_from_str("1.80").unwrap());
    assert_eq!(
        config["STA_CORNERS"],
        Value::List(vec![
            Value::from("nom_tt_025C_1v80"),
            Value::from("min_ff_n40C_1v95"),
            Value::from("max_ss_100C_1v60"),
        ])
    );
}

#[test]
fn test_design_beats_library_beats_pdk() {
    let root = TestPdkRoot::standard();
    let loaded = load_json(
        &root,
        json!({
            "PDK": STANDARD_PDK,
            "STD_CELL_LIBRARY": ALTERNATE_SCL,
            "DESIGN_NAME": "spm",
            "FP_IO_HLAYER": "met4",
        }),
    )
    .unwrap();
    let config = &loaded.config;

    // library over PDK
    assert_eq!(config["RT_MAX_LAYER"], Value::from("met4"));
    assert_eq!(config["PLACE_SITE"], Value::from("uniths"));
    // design over PDK
    assert_eq!(config["FP_IO_HLAYER"], Value::from("met4"));
    // PDK value the library leaves alone
    assert_eq!(config["RT_MIN_LAYER"], Value::from("met1"));
    assert_eq!(config["DECAP_CELL"], Value::Null);
}

#[test]
fn test_overrides_beat_the_design_file() {
    let root = TestPdkRoot::standard();
    let design = TestDesign::new();
    let path = write_design(
        &design,
        json!({"PDK": STANDARD_PDK, "DESIGN_NAME": "spm", "CLOCK_PERIOD": 25}),
    );
    let loader = loader();
    let loaded = loader
        .load(path, &flow(&loader), &options(&root).with_override("CLOCK_PERIOD=12.5"))
        .unwrap();

    assert_eq!(loaded.config["CLOCK_PERIOD"], Value::number_from_str("12.5").unwrap());
}

#[test]
fn test_reloading_a_resolved_configuration_is_idempotent() {
    let root = TestPdkRoot::standard();
    let first = load_json(
        &root,
        json!({
            "PDK": STANDARD_PDK,
            "DESIGN_NAME": "spm",
            "VERILOG_FILES": "dir::src/spm.v",
            "CLOCK_PERIOD": "10.50",
            "EXTRA_SPEFS": "inner min.spef nom.spef max.spef",
        }),
    )
    .unwrap();

    let loader = loader();
    let second = loader
        .load(
            ConfigInput::Mapping(first.config.to_raw_map()),
            &flow(&loader),
            &LoadOptions::new().with_design_dir(&first.design_dir),
        )
        .unwrap();

    assert!(second.warnings.is_empty(), "{:?}", second.warnings);
    assert_eq!(second.config.values(), first.config.values());
    assert_eq!(second.config.meta(), first.config.meta());
}

#[test]
fn test_deprecated_names_are_renamed_with_a_warning() {
    let root = TestPdkRoot::standard();
    let loaded = load_json(
        &root,
        json!({"PDK": STANDARD_PDK, "DESIGN_NAME": "spm", "SYNTH_MAX_FANOUT": 4, "IO_PCT": "25"}),
    )
    .unwrap();

    assert_eq!(loaded.config["MAX_FANOUT_CONSTRAINT"], Value::from(4));
    assert_eq!(loaded.config["IO_DELAY_CONSTRAINT"], Value::from(25));
    assert!(!loaded.config.contains_key("SYNTH_MAX_FANOUT"));
    let deprecated: Vec<_> = loaded
        .warnings
        .iter()
        .filter(|w| w.kind == DiagnosticKind::Deprecated)
        .filter_map(|w| w.key.as_deref())
        .collect();
    assert_eq!(deprecated, vec!["SYNTH_MAX_FANOUT", "IO_PCT"]);
}

#[test]
fn test_unknown_and_removed_keys_warn_but_resolve() {
    let root = TestPdkRoot::standard();
    let loaded = load_json(
        &root,
        json!({
            "PDK": STANDARD_PDK,
            "DESIGN_NAME": "spm",
            "GLB_RT_MAXLAYER": 5,
            "PL_OPT_TARGET": 1,
            "//": "comment",
            "SOMETHING_ELSE": true,
        }),
    )
    .unwrap();

    let messages: Vec<String> = loaded.warnings.iter().map(|w| w.to_string()).collect();
    assert_eq!(
        messages,
        vec![
            "'GLB_RT_MAXLAYER' has been removed: Use RT_MAX_LAYER instead.".to_string(),
            "Unknown key 'SOMETHING_ELSE' provided.".to_string(),
        ]
    );
    assert!(!loaded.config.contains_key("SOMETHING_ELSE"));
}

#[test]
fn test_every_design_error_is_reported_at_once() {
    let root = TestPdkRoot::standard();
    let invalid = expect_invalid(load_json(
        &root,
        json!({
            "PDK": STANDARD_PDK,
            "CLOCK_PERIOD": "fast",
            "DIODE_ON_PORTS": "sideways",
            "GRT_REPAIR_ANTENNAS": "maybe",
        }),
    ));

    assert_eq!(invalid.layer, ConfigLayer::Design);
    let keys: Vec<_> = invalid.errors.iter().filter_map(|e| e.key.as_deref()).collect();
    assert_eq!(
        keys,
        vec!["DESIGN_NAME", "CLOCK_PERIOD", "GRT_REPAIR_ANTENNAS", "DIODE_ON_PORTS"]
    );
}

#[test]
fn test_broken_pdk_files_are_reported_by_layer() {
    let root = TestPdkRoot::standard();
    root.write_pdk_config(
        STANDARD_PDK,
        "set ::env(STD_CELL_LIBRARY) test_sc_hd\nset ::env(VDD_PIN) VPWR\n",
    );
    let invalid = expect_invalid(load_json(&root, json!({"PDK": STANDARD_PDK, "DESIGN_NAME": "spm"})));

    assert_eq!(invalid.layer, ConfigLayer::PdkFiles);
    assert!(invalid.errors.iter().any(|e| e.key.as_deref() == Some("GND_PIN")));
    assert!(invalid.errors.iter().all(|e| e.kind == DiagnosticKind::Compile));
}

#[test]
fn test_tcl_designs_see_the_pdk_and_report_deprecation() {
    let root = TestPdkRoot::standard();
    let design = TestDesign::new();
    let path = design.write(
        "config.tcl",
        "set ::env(PDK) testpdk\n\
         set ::env(DESIGN_NAME) spm\n\
         set ::env(CLOCK_PERIOD) 15\n\
         set ::env(VERILOG_FILES) \"$::env(DESIGN_DIR)/src/spm.v\"\n\
         if { $::env(STD_CELL_LIBRARY) == \"test_sc_hd\" } {\n\
             set ::env(FP_IO_VLAYER) met4\n\
         }\n",
    );
    let loader = loader();
    let loaded = loader.load(path, &flow(&loader), &options(&root)).unwrap();

    assert_eq!(loaded.warnings[0].kind, DiagnosticKind::Deprecated);
    assert_eq!(loaded.config["CLOCK_PERIOD"], Value::from(15));
    assert_eq!(loaded.config["FP_IO_VLAYER"], Value::from("met4"));
    let Value::List(files) = &loaded.config["VERILOG_FILES"] else {
        panic!("VERILOG_FILES is not a list");
    };
    assert!(files[0].to_string().ends_with("src/spm.v"));
}

#[test]
fn test_interactive_configuration_uses_flow_defaults() {
    let root = TestPdkRoot::standard();
    let request = flow_config::InteractiveRequest::new("spm", STANDARD_PDK)
        .with_pdk_root(root.root())
        .with_value("CLOCK_PORT", "clk");
    let config = loader().interactive(request).unwrap();

    assert!(config.is_interactive());
    assert_eq!(config["DESIGN_NAME"], Value::from("spm"));
    assert_eq!(config["CLOCK_PORT"], Value::from("clk"));
    assert_eq!(config["IO_DELAY_CONSTRAINT"], Value::from(20));
}
