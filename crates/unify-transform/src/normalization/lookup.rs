//! Named code tables (education levels, qualification frameworks).

use std::collections::BTreeMap;

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTransformer {
    name: String,
    exact: BTreeMap<String, String>,
    folded: BTreeMap<String, String>,
}

impl LookupTransformer {
    pub fn new(name: impl Into<String>, values: BTreeMap<String, String>) -> Self {
        let folded = values
            .iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v.clone()))
            .collect();
        Self {
            name: name.into(),
            exact: values,
            folded,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` when the code is not in the table.
    pub fn transform(&self, raw: &str) -> Option<String> {
        let code = raw.trim();
        let found = self
            .exact
            .get(code)
            .or_else(|| self.folded.get(&code.to_lowercase()))
            .cloned();
        if found.is_none() {
            warn!(lookup = %self.name, "code not found in lookup table");
        }
        found
    }
}
