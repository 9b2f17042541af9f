use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::mapping::MappingTable;
use crate::types::ConditionResolution;

/// Domain constants steering condition resolution.
///
/// The override table and the last-resort pair encode organisation-specific
/// naming conventions. They are data, not rules: new conventions go here,
/// the resolution algorithm stays untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Condition keys whose true-branch key does not follow the generic
    /// `Html:` naming convention, mapped to their true-branch key directly.
    pub overrides: Vec<(String, String)>,
    /// Single condition title honoured as a last resort...
    pub fallback_title: String,
    /// ...and the true-branch key it resolves to.
    pub fallback_key: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            overrides: vec![(
                "ab-ubegraenset-fuldmagt".to_string(),
                "Html:x-fuldmagtsbetingelse".to_string(),
            )],
            fallback_title: "Ubegrænset fuldmagt".to_string(),
            fallback_key: "Html:x-fuldmagtsbetingelse".to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn override_for(&self, condition_key: &str) -> Option<&str> {
        self.overrides
            .iter()
            .find(|(k, _)| k == condition_key)
            .map(|(_, v)| v.as_str())
    }
}

/// Resolves a condition title into a `(condition_key, true_result_key)`
/// pair. Tiers, first success wins:
///
/// 1. title lookup; no key means both outputs stay absent,
/// 2. the config override table,
/// 3. an exact `Html:<condition_key>` value in the table,
/// 4. any `Html:`-prefixed value containing the key's suffix (the part
///    after the first `-`, or failing that the first `:`), insertion order,
/// 5. the config's single last-resort title.
///
/// A key without a true-branch key is a partial resolution; the caller
/// renders the occurrence as plain literal text.
pub fn resolve_condition(
    condition_title: &str,
    table: &MappingTable,
    config: &ResolverConfig,
) -> ConditionResolution {
    let Some(condition_key) = table.key_for(condition_title) else {
        debug!("condition title {:?} not in mapping table", condition_title);
        return ConditionResolution {
            condition_title: condition_title.to_string(),
            condition_key: None,
            true_result_key: None,
        };
    };

    let true_result_key = if let Some(over) = config.override_for(condition_key) {
        trace!("condition key {:?}: override table hit", condition_key);
        Some(over.to_string())
    } else {
        exact_html_value(condition_key, table)
            .or_else(|| suffix_html_value(condition_key, table))
            .or_else(|| {
                if condition_title == config.fallback_title {
                    trace!("condition title {:?}: last-resort fallback", condition_title);
                    Some(config.fallback_key.clone())
                } else {
                    None
                }
            })
    };

    if true_result_key.is_none() {
        debug!(
            "condition key {:?} resolved without a true-branch key",
            condition_key
        );
    }

    ConditionResolution {
        condition_title: condition_title.to_string(),
        condition_key: Some(condition_key.to_string()),
        true_result_key,
    }
}

fn exact_html_value(condition_key: &str, table: &MappingTable) -> Option<String> {
    let wanted = format!("Html:{condition_key}");
    table
        .entries()
        .iter()
        .find(|e| e.key == wanted)
        .map(|e| e.key.clone())
}

fn suffix_html_value(condition_key: &str, table: &MappingTable) -> Option<String> {
    let suffix = condition_key
        .split_once('-')
        .or_else(|| condition_key.split_once(':'))
        .map(|(_, rest)| rest)?;
    table
        .entries()
        .iter()
        .find(|e| e.key.starts_with("Html:") && e.key.contains(suffix))
        .map(|e| e.key.clone())
}
