//! Source reliability configuration from TOML (`[sources]` section)
//!
//! Each key is a source id, each value its reliability rank (higher is
//! more trusted). The ranks are static for a run.
//!
//! ```toml
//! [sources]
//! doubao = 3
//! deepseek = 2
//! tongyi = 1
//! ```

use annoquorum_domain::ReliabilityTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSourcesConfig {
    pub ranks: BTreeMap<String, u32>,
}

impl FileSourcesConfig {
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ranks.keys().map(String::as_str)
    }

    pub fn to_table(&self) -> ReliabilityTable {
        ReliabilityTable::from_pairs(self.ranks.iter().map(|(id, rank)| (id.as_str(), *rank)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annoquorum_domain::SourceId;

    #[test]
    fn test_sources_deserialize_to_table() {
        let toml_str = r#"
[sources]
doubao = 3
deepseek = 2
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let table = config.sources.to_table();
        assert_eq!(table.len(), 2);
        assert!(table.is_top(&SourceId::from("doubao")));
        assert!(table.is_second(&SourceId::from("deepseek")));
    }
}
