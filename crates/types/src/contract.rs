//! Contract metadata as published on the ledger.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered sequence of organization identifiers that is authorized to
/// jointly execute a contract.
///
/// Execution groups are position-sensitive, role-ordered collaborations, not
/// unordered sets, so matching compares length and every position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecPattern(pub Vec<String>);

impl ExecPattern {
    /// Build a pattern from any iterable of org identifiers.
    pub fn new<I, S>(orgs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(orgs.into_iter().map(Into::into).collect())
    }

    /// Position-wise comparison against a requested org sequence.
    ///
    /// A pattern matches only when it has the same length as `requested` and
    /// every element is equal at the same position.
    pub fn matches(&self, requested: &[String]) -> bool {
        self.0.len() == requested.len() && self.0.iter().zip(requested).all(|(pattern_org, requested_org)| pattern_org == requested_org)
    }

    /// Organizations in this pattern, in role order.
    pub fn orgs(&self) -> &[String] {
        &self.0
    }
}

/// Contract metadata fetched from the ledger.
///
/// Owned by the external ledger service and read-only to the resolver. The
/// declare maps associate dependency slot names with declare uids; the
/// bindings for those uids live in the private content store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    /// Ledger-assigned contract uid.
    pub uid: u64,

    /// Raw contract source, compiled on demand.
    pub source: String,

    /// Named data dependency slots, name -> declare uid.
    #[serde(default)]
    pub data_declares: IndexMap<String, u64>,

    /// Named function dependency slots, name -> declare uid.
    #[serde(default)]
    pub function_declares: IndexMap<String, u64>,

    /// Authorized execution groups; satisfying any one pattern suffices.
    #[serde(default)]
    pub exec_patterns: Vec<ExecPattern>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_matches_same_order() {
        let pattern = ExecPattern::new(["orgA", "orgB"]);
        let requested = vec!["orgA".to_string(), "orgB".to_string()];
        assert!(pattern.matches(&requested));
    }

    #[test]
    fn test_pattern_rejects_reordered_orgs() {
        let pattern = ExecPattern::new(["orgA", "orgB"]);
        let requested = vec!["orgB".to_string(), "orgA".to_string()];
        assert!(!pattern.matches(&requested));
    }

    #[test]
    fn test_pattern_rejects_length_mismatch() {
        let pattern = ExecPattern::new(["orgA", "orgB"]);
        let shorter = vec!["orgA".to_string()];
        let longer = vec!["orgA".to_string(), "orgB".to_string(), "orgC".to_string()];
        assert!(!pattern.matches(&shorter));
        assert!(!pattern.matches(&longer));
    }

    #[test]
    fn test_contract_metadata_deserializes_camel_case() {
        let raw = r#"{
            "uid": 7,
            "source": "main := x + y",
            "dataDeclares": {"x": 10},
            "functionDeclares": {"sum": 11},
            "execPatterns": [["orgA", "orgB"]]
        }"#;

        let contract: ContractMetadata = serde_json::from_str(raw).unwrap();
        assert_eq!(contract.uid, 7);
        assert_eq!(contract.data_declares.get("x"), Some(&10));
        assert_eq!(contract.function_declares.get("sum"), Some(&11));
        assert_eq!(contract.exec_patterns.len(), 1);
        assert_eq!(contract.exec_patterns[0].orgs(), ["orgA", "orgB"]);
    }
}
