//! Legacy keys rewritten through the built-in catalog

mod support;

use std::path::PathBuf;

use flow_config::{ConfigLayer, DiagnosticKind, Value};
use flow_test_utils::TestPdkRoot;
use flow_test_utils::pdk::{STANDARD_PDK, STANDARD_SCL, STANDARD_SCL_CONFIG};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use support::{expect_invalid, load_json, loader};

#[rstest]
#[case(0, false, false, "none")]
#[case(3, true, false, "none")]
#[case(4, false, false, "none")]
#[case(6, true, true, "in")]
fn test_diode_strategies_map_to_new_variables(
    #[case] strategy: i64,
    #[case] repair: bool,
    #[case] heuristic: bool,
    #[case] ports: &str,
) {
    let root = TestPdkRoot::standard();
    let loaded = load_json(
        &root,
        json!({"PDK": STANDARD_PDK, "DESIGN_NAME": "spm", "DIODE_INSERTION_STRATEGY": strategy}),
    )
    .unwrap();
    let config = &loaded.config;

    assert_eq!(config["GRT_REPAIR_ANTENNAS"], Value::from(repair));
    assert_eq!(config["RUN_HEURISTIC_DIODE_INSERTION"], Value::from(heuristic));
    assert_eq!(config["DIODE_ON_PORTS"], Value::from(ports));
    assert!(!config.contains_key("DIODE_INSERTION_STRATEGY"));
    assert_eq!(loaded.warnings.len(), 1);
    assert_eq!(loaded.warnings[0].kind, DiagnosticKind::Migrated);
}

#[rstest]
#[case(json!(1))]
#[case(json!(2))]
#[case(json!(5))]
#[case(json!(7))]
#[case(json!(-1))]
#[case(json!("often"))]
fn test_unavailable_diode_strategies_are_errors(#[case] strategy: serde_json::Value) {
    let root = TestPdkRoot::standard();
    let invalid = expect_invalid(load_json(
        &root,
        json!({"PDK": STANDARD_PDK, "DESIGN_NAME": "spm", "DIODE_INSERTION_STRATEGY": strategy}),
    ));

    assert_eq!(invalid.layer, ConfigLayer::Design);
    assert_eq!(invalid.errors.len(), 1);
    assert_eq!(invalid.errors[0].kind, DiagnosticKind::InvalidLegacyValue);
    assert!(invalid.errors[0].message.contains("is not available in this flow"));
}

#[test]
fn test_explicit_values_lose_to_the_migrated_strategy() {
    let root = TestPdkRoot::standard();
    let loaded = load_json(
        &root,
        json!({
            "PDK": STANDARD_PDK,
            "DESIGN_NAME": "spm",
            "DIODE_INSERTION_STRATEGY": "3",
            "GRT_REPAIR_ANTENNAS": false,
        }),
    )
    .unwrap();

    assert_eq!(loaded.config["GRT_REPAIR_ANTENNAS"], Value::from(true));
}

#[test]
fn test_library_diode_strategy_reaches_the_design() {
    let root = TestPdkRoot::standard();
    root.write_scl_config(
        STANDARD_PDK,
        STANDARD_SCL,
        &format!("{STANDARD_SCL_CONFIG}set ::env(DIODE_INSERTION_STRATEGY) 0\n"),
    );

    let pdk = loader().load_pdk(STANDARD_PDK, None, Some(root.root())).unwrap();
    assert_eq!(
        pdk.warnings.iter().map(|w| w.kind).collect::<Vec<_>>(),
        vec![DiagnosticKind::Migrated]
    );
    assert_eq!(pdk.values.get("GRT_REPAIR_ANTENNAS"), Some(&Value::from(false)));

    let loaded = load_json(&root, json!({"PDK": STANDARD_PDK, "DESIGN_NAME": "spm"})).unwrap();
    assert_eq!(loaded.config["GRT_REPAIR_ANTENNAS"], Value::from(false));
    assert_eq!(loaded.config["RUN_HEURISTIC_DIODE_INSERTION"], Value::from(false));
    assert_eq!(loaded.config["DIODE_ON_PORTS"], Value::from("none"));
}

#[test]
fn test_extra_spefs_become_macro_records() {
    let root = TestPdkRoot::standard();
    let loaded = load_json(
        &root,
        json!({
            "PDK": STANDARD_PDK,
            "DESIGN_NAME": "spm",
            "EXTRA_SPEFS": "inner_a a.min.spef a.nom.spef a.max.spef inner_b b.min.spef b.nom.spef b.max.spef",
        }),
    )
    .unwrap();

    let macros = loaded.config["MACROS"].as_map().unwrap();
    assert_eq!(macros.keys().collect::<Vec<_>>(), vec!["inner_a", "inner_b"]);
    let record = macros["inner_b"].as_map().unwrap();
    assert_eq!(record["module"], Value::from("inner_b"));
    assert_eq!(record["gds"], Value::List(vec![Value::Path(PathBuf::new())]));
    let spef = record["spef"].as_map().unwrap();
    assert_eq!(spef["nom_*"], Value::List(vec![Value::from("b.nom.spef")]));
    assert_eq!(
        loaded.warnings.iter().map(|w| w.kind).collect::<Vec<_>>(),
        vec![DiagnosticKind::Migrated]
    );
}

#[test]
fn test_extra_spefs_merge_into_existing_macros() {
    let root = TestPdkRoot::standard();
    let loaded = load_json(
        &root,
        json!({
            "PDK": STANDARD_PDK,
            "DESIGN_NAME": "spm",
            "MACROS": {"hard": {"module": "hard", "gds": ["dir::hard.gds"]}},
            "EXTRA_SPEFS": ["soft", "s.min", "s.nom", "s.max"],
        }),
    )
    .unwrap();

    let macros = loaded.config["MACROS"].as_map().unwrap();
    assert_eq!(macros.keys().collect::<Vec<_>>(), vec!["hard", "soft"]);
}

#[rstest]
#[case(json!("inner a.min a.nom"))]
#[case(json!(42))]
fn test_malformed_extra_spefs_are_legacy_errors(#[case] spefs: serde_json::Value) {
    let root = TestPdkRoot::standard();
    let invalid = expect_invalid(load_json(
        &root,
        json!({"PDK": STANDARD_PDK, "DESIGN_NAME": "spm", "EXTRA_SPEFS": spefs}),
    ));

    assert_eq!(invalid.errors.len(), 1);
    assert_eq!(invalid.errors[0].key.as_deref(), Some("EXTRA_SPEFS"));
    assert_eq!(invalid.errors[0].kind, DiagnosticKind::InvalidLegacyValue);
}
