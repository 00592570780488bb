//! Variable lists and removed-key tables the resolver validates against

use indexmap::IndexMap;

use crate::variable::VariableRef;

/// Keys the flow no longer reads, each with an explanatory note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedTable(IndexMap<String, String>);

impl RemovedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, note: impl Into<String>) -> Self {
        self.0.insert(key.into(), note.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RemovedTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Every variable list the resolver needs.
///
/// Order matters: variables compile in list order, and a default may only
/// reference a variable compiled before it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Variables a PDK defines
    pub technology: Vec<VariableRef>,
    /// Removed keys checked while loading PDK files
    pub technology_removed: RemovedTable,
    /// Flow variables every interactive session gets
    pub flow_common: Vec<VariableRef>,
    /// Removed keys checked while loading designs
    pub removed: RemovedTable,
}

impl Catalog {
    pub fn new(technology: Vec<VariableRef>) -> Self {
        Self {
            technology,
            ..Self::default()
        }
    }

    pub fn with_technology_removed(mut self, removed: RemovedTable) -> Self {
        self.technology_removed = removed;
        self
    }

    pub fn with_flow_common(mut self, variables: Vec<VariableRef>) -> Self {
        self.flow_common = variables;
        self
    }

    pub fn with_removed(mut self, removed: RemovedTable) -> Self {
        self.removed = removed;
        self
    }

    /// Technology variables followed by `flow`, skipping names already present.
    pub fn design_variables(&self, flow: &[VariableRef]) -> Vec<VariableRef> {
        let mut variables = self.technology.clone();
        for variable in flow {
            if !variables.iter().any(|v| v.name() == variable.name()) {
                variables.push(VariableRef::clone(variable));
            }
        }
        variables
    }

    /// Technology variables followed by the common flow variables.
    pub fn interactive_variables(&self) -> Vec<VariableRef> {
        self.design_variables(&self.flow_common)
    }
}
