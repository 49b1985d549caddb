//! Batch result accumulator.

use serde::Serialize;
use serde_json::Value;

/// Outcome of one reconciliation batch.
///
/// Built incrementally by the active state handler and finalized once at
/// the end of a run: `changed` ORs per-item changes, `failed` is true
/// iff any per-item error was recorded, `msg` summarises what happened
/// (errors semicolon-joined on failure), and `response` collects the raw
/// controller envelope of every operation that ran.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModuleResult {
    pub changed: bool,
    pub failed: bool,
    pub msg: String,
    pub stdout: String,
    pub stderr: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Value>,
}

impl ModuleResult {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reports_no_change_no_failure() {
        let result = ModuleResult::new();
        assert!(!result.changed);
        assert!(!result.failed);
        assert!(result.response.is_empty());
    }

    #[test]
    fn serializes_without_empty_optionals() {
        let result = ModuleResult {
            msg: "No changes needed".into(),
            ..ModuleResult::new()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["changed"], false);
        assert!(json.get("response").is_none());
        assert!(json.get("diff").is_none());
    }
}
