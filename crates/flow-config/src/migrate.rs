//! Translation of legacy keys into their current shapes
//!
//! Runs on the working set before any variable compiles. A legacy value that
//! cannot be translated is an error; a translated one leaves a single warning.

use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::map::ConfigMap;
use crate::value::{Mapping, Value};
use crate::Result;

pub const DIODE_INSERTION_STRATEGY: &str = "DIODE_INSERTION_STRATEGY";
pub const GRT_REPAIR_ANTENNAS: &str = "GRT_REPAIR_ANTENNAS";
pub const RUN_HEURISTIC_DIODE_INSERTION: &str = "RUN_HEURISTIC_DIODE_INSERTION";
pub const DIODE_ON_PORTS: &str = "DIODE_ON_PORTS";
pub const EXTRA_SPEFS: &str = "EXTRA_SPEFS";
pub const MACROS: &str = "MACROS";

/// Strategies with no equivalent in the current flow.
pub const UNSUPPORTED_DIODE_STRATEGIES: [i64; 3] = [1, 2, 5];
const MAX_DIODE_STRATEGY: i64 = 6;

/// Geometry reference given to macros translated from `EXTRA_SPEFS`, replaced
/// by an empty path once validation finishes.
pub const MACRO_GDS_PLACEHOLDER: &str = "/dev/null";

const DIODE_DOCS: &str = "See 'Migrating DIODE_INSERTION_STRATEGY' in the docs for more info.";
const MACRO_DOCS: &str =
    "It is recommended that you update your configuration to use the Macro object.";

/// What the migration pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Migration {
    pub diode_strategy: Option<i64>,
    pub translated_macros: bool,
}

impl Migration {
    /// Keys the pass wrote into the working set.
    pub fn produced_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.diode_strategy.is_some() {
            keys.extend([GRT_REPAIR_ANTENNAS, RUN_HEURISTIC_DIODE_INSERTION, DIODE_ON_PORTS]);
        }
        if self.translated_macros {
            keys.push(MACROS);
        }
        keys
    }
}

/// Rewrite legacy keys in `working`.
pub fn migrate(working: &mut ConfigMap, diagnostics: &mut Diagnostics) -> Result<Migration> {
    let diode_strategy = migrate_diode_strategy(working, diagnostics)?;
    let translated_macros = migrate_extra_spefs(working, diagnostics)?;
    Ok(Migration {
        diode_strategy,
        translated_macros,
    })
}

fn parse_strategy(value: &Value) -> Option<i64> {
    match value {
        Value::Number(_) => value.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn migrate_diode_strategy(working: &mut ConfigMap, diagnostics: &mut Diagnostics) -> Result<Option<i64>> {
    let raw = match working.remove(DIODE_INSERTION_STRATEGY)? {
        None | Some(Value::Null) => return Ok(None),
        Some(raw) => raw,
    };

    let strategy = match parse_strategy(&raw) {
        Some(s) if (0..=MAX_DIODE_STRATEGY).contains(&s) && !UNSUPPORTED_DIODE_STRATEGIES.contains(&s) => s,
        _ => {
            diagnostics.error(Diagnostic::for_key(
                DiagnosticKind::InvalidLegacyValue,
                DIODE_INSERTION_STRATEGY,
                format!("DIODE_INSERTION_STRATEGY '{raw}' is not available in this flow. {DIODE_DOCS}"),
            ));
            return Ok(None);
        }
    };

    diagnostics.warn(Diagnostic::for_key(
        DiagnosticKind::Migrated,
        DIODE_INSERTION_STRATEGY,
        format!("The DIODE_INSERTION_STRATEGY variable has been deprecated. {DIODE_DOCS}"),
    ));

    let repair_antennas = matches!(strategy, 3 | 6);
    let heuristic = matches!(strategy, 5 | 6);
    working.insert(GRT_REPAIR_ANTENNAS, repair_antennas)?;
    working.insert(RUN_HEURISTIC_DIODE_INSERTION, heuristic)?;
    working.insert(DIODE_ON_PORTS, if heuristic { "in" } else { "none" })?;
    tracing::debug!(strategy, repair_antennas, heuristic, "Migrated diode insertion strategy");
    Ok(Some(strategy))
}

fn migrate_extra_spefs(working: &mut ConfigMap, diagnostics: &mut Diagnostics) -> Result<bool> {
    let raw = match working.remove(EXTRA_SPEFS)? {
        None | Some(Value::Null) => return Ok(false),
        Some(raw) => raw,
    };

    let invalid = |message: String| Diagnostic::for_key(DiagnosticKind::InvalidLegacyValue, EXTRA_SPEFS, message);

    let elements: Vec<Value> = match raw {
        Value::String(s) => s.split_whitespace().map(Value::from).collect(),
        Value::List(items) => items,
        other => {
            diagnostics.error(invalid(format!(
                "Invalid type for 'EXTRA_SPEFS': {}. {MACRO_DOCS}",
                other.type_name()
            )));
            return Ok(false);
        }
    };

    if elements.len() % 4 != 0 {
        diagnostics.error(invalid(format!(
            "Invalid value for 'EXTRA_SPEFS': Element count not divisible by four. {MACRO_DOCS}"
        )));
        return Ok(false);
    }

    let mut macros = match working.get(MACROS) {
        None | Some(Value::Null) => Mapping::new(),
        Some(Value::Map(existing)) => existing.clone(),
        Some(other) => {
            diagnostics.error(Diagnostic::for_key(
                DiagnosticKind::InvalidLegacyValue,
                MACROS,
                format!(
                    "Invalid type for 'MACROS': {}: cannot merge 'EXTRA_SPEFS' into it. {MACRO_DOCS}",
                    other.type_name()
                ),
            ));
            return Ok(false);
        }
    };

    diagnostics.warn(Diagnostic::for_key(
        DiagnosticKind::Migrated,
        EXTRA_SPEFS,
        "The configuration variable 'EXTRA_SPEFS' is deprecated. Check the docs on how to use the new 'MACROS' configuration variable.",
    ));

    for quad in elements.chunks_exact(4) {
        let module = quad[0].to_string();
        let mut spef = Mapping::new();
        spef.insert("min_*".to_string(), Value::List(vec![quad[1].clone()]));
        spef.insert("nom_*".to_string(), Value::List(vec![quad[2].clone()]));
        spef.insert("max_*".to_string(), Value::List(vec![quad[3].clone()]));

        let mut record = Mapping::new();
        record.insert("module".to_string(), Value::String(module.clone()));
        record.insert(
            "gds".to_string(),
            Value::List(vec![Value::from(MACRO_GDS_PLACEHOLDER)]),
        );
        record.insert("spef".to_string(), Value::Map(spef));
        macros.insert(module, Value::Map(record));
    }

    tracing::debug!(count = elements.len() / 4, "Translated EXTRA_SPEFS into macro records");
    working.insert(MACROS, Value::Map(macros))?;
    Ok(true)
}

fn is_placeholder(value: &Value) -> bool {
    match value {
        Value::String(s) => s == MACRO_GDS_PLACEHOLDER,
        Value::Path(p) => p.as_os_str() == MACRO_GDS_PLACEHOLDER,
        _ => false,
    }
}

/// Replace placeholder geometry references in compiled macro records with
/// an empty path.
pub fn finalize_macros(finalized: &mut ConfigMap) -> Result<()> {
    let mut macros = match finalized.get(MACROS) {
        Some(Value::Map(macros)) => macros.clone(),
        _ => return Ok(()),
    };

    for record in macros.values_mut() {
        let Some(gds) = record.as_map_mut().and_then(|r| r.get_mut("gds")) else {
            continue;
        };
        match gds {
            Value::List(items) => {
                for item in items.iter_mut().filter(|item| is_placeholder(item)) {
                    *item = Value::Path(Default::default());
                }
            }
            single if is_placeholder(single) => *single = Value::Path(Default::default()),
            _ => {}
        }
    }

    finalized.insert(MACROS, Value::Map(macros))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::path::PathBuf;

    fn run(pairs: Vec<(&str, Value)>) -> (ConfigMap, Diagnostics, Migration) {
        let mut working: ConfigMap = pairs.into_iter().collect();
        let mut diagnostics = Diagnostics::new();
        let migration = migrate(&mut working, &mut diagnostics).unwrap();
        (working, diagnostics, migration)
    }

    #[rstest]
    #[case(Value::from(0), false, false, "none")]
    #[case(Value::from(3), true, false, "none")]
    #[case(Value::from(4), false, false, "none")]
    #[case(Value::from(6), true, true, "in")]
    #[case(Value::from("3"), true, false, "none")]
    fn accepted_strategies(
        #[case] strategy: Value,
        #[case] repair: bool,
        #[case] heuristic: bool,
        #[case] ports: &str,
    ) {
        let (working, diagnostics, _) = run(vec![(DIODE_INSERTION_STRATEGY, strategy)]);
        assert!(diagnostics.errors.is_empty());
        assert_eq!(diagnostics.warnings.len(), 1);
        assert!(!working.contains_key(DIODE_INSERTION_STRATEGY));
        assert_eq!(working.get(GRT_REPAIR_ANTENNAS), Some(&Value::Bool(repair)));
        assert_eq!(working.get(RUN_HEURISTIC_DIODE_INSERTION), Some(&Value::Bool(heuristic)));
        assert_eq!(working.get(DIODE_ON_PORTS), Some(&Value::from(ports)));
    }

    #[rstest]
    #[case(Value::from(1))]
    #[case(Value::from(2))]
    #[case(Value::from(5))]
    #[case(Value::from(7))]
    #[case(Value::from(-1))]
    #[case(Value::from("fast"))]
    fn rejected_strategies(#[case] strategy: Value) {
        let (working, diagnostics, _) = run(vec![(DIODE_INSERTION_STRATEGY, strategy)]);
        assert_eq!(diagnostics.errors.len(), 1);
        assert!(diagnostics.warnings.is_empty());
        assert_eq!(diagnostics.errors[0].kind, DiagnosticKind::InvalidLegacyValue);
        for key in [GRT_REPAIR_ANTENNAS, RUN_HEURISTIC_DIODE_INSERTION, DIODE_ON_PORTS, MACROS] {
            assert!(!working.contains_key(key), "{key} should not be set");
        }
    }

    #[test]
    fn produced_keys_follow_what_was_translated() {
        let (_, _, diode) = run(vec![(DIODE_INSERTION_STRATEGY, Value::from(3))]);
        assert_eq!(
            diode.produced_keys(),
            vec![GRT_REPAIR_ANTENNAS, RUN_HEURISTIC_DIODE_INSERTION, DIODE_ON_PORTS]
        );
        let (_, _, spefs) = run(vec![(EXTRA_SPEFS, Value::from("ram a b c"))]);
        assert_eq!(spefs.produced_keys(), vec![MACROS]);
        assert!(Migration::default().produced_keys().is_empty());
    }

    #[test]
    fn null_strategy_is_ignored() {
        let (working, diagnostics, migration) = run(vec![(DIODE_INSERTION_STRATEGY, Value::Null)]);
        assert_eq!(diagnostics, Diagnostics::new());
        assert_eq!(migration, Migration::default());
        assert!(working.is_empty());
    }

    #[test]
    fn extra_spefs_become_macro_records() {
        let (working, diagnostics, migration) = run(vec![(
            EXTRA_SPEFS,
            Value::from("ram a.spef b.spef c.spef rom d.spef e.spef f.spef"),
        )]);
        assert!(migration.translated_macros);
        assert!(diagnostics.errors.is_empty());
        assert_eq!(diagnostics.warnings.len(), 1);

        let macros = working.get(MACROS).and_then(Value::as_map).unwrap();
        assert_eq!(macros.keys().collect::<Vec<_>>(), vec!["ram", "rom"]);
        assert_eq!(
            macros["rom"].to_json(),
            serde_json::json!({
                "module": "rom",
                "gds": ["/dev/null"],
                "spef": {"min_*": ["d.spef"], "nom_*": ["e.spef"], "max_*": ["f.spef"]}
            })
        );
    }

    #[test]
    fn extra_spefs_merge_into_existing_macros() {
        let mut existing = Mapping::new();
        existing.insert("cpu".to_string(), Value::Map(Mapping::new()));
        let (working, _, _) = run(vec![
            (MACROS, Value::Map(existing)),
            (EXTRA_SPEFS, Value::List(vec!["ram".into(), "a".into(), "b".into(), "c".into()])),
        ]);
        let macros = working.get(MACROS).and_then(Value::as_map).unwrap();
        assert_eq!(macros.keys().collect::<Vec<_>>(), vec!["cpu", "ram"]);
    }

    #[test]
    fn uneven_extra_spefs_create_nothing() {
        let (working, diagnostics, migration) = run(vec![(
            EXTRA_SPEFS,
            Value::List(["a", "b", "c", "d", "e", "f", "g"].into_iter().map(Value::from).collect()),
        )]);
        assert!(!migration.translated_macros);
        assert_eq!(diagnostics.errors.len(), 1);
        assert!(!working.contains_key(MACROS));
        assert!(!working.contains_key(EXTRA_SPEFS));
    }

    #[test]
    fn extra_spefs_of_wrong_type() {
        let (_, diagnostics, _) = run(vec![(EXTRA_SPEFS, Value::from(4))]);
        assert_eq!(diagnostics.errors.len(), 1);
        assert!(diagnostics.errors[0].message.contains("Invalid type"));
    }

    #[test]
    fn placeholders_become_empty_paths() {
        let (working, _, _) = run(vec![(EXTRA_SPEFS, Value::from("ram a b c"))]);
        let mut finalized = working.unlocked();
        finalize_macros(&mut finalized).unwrap();
        let record = &finalized.get(MACROS).and_then(Value::as_map).unwrap()["ram"];
        assert_eq!(
            record.as_map().unwrap()["gds"],
            Value::List(vec![Value::Path(PathBuf::new())])
        );
    }
}
