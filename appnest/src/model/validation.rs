//! Component roadmap produced by the validation agent.

use serde::{Deserialize, Serialize};

/// The validation agent's component plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationPlan {
    /// Planned components, in build order.
    #[serde(default)]
    pub component_roadmap: Vec<RoadmapEntry>,

    /// Number of components planned.
    #[serde(default)]
    pub total_components_planned: u32,
}

impl ValidationPlan {
    /// Parses an agent response, falling back to an empty plan.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::error!(error = %err, "validation agent output was not valid JSON, using empty plan");
                Self::default()
            }
        }
    }
}

/// One planned component in the roadmap.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoadmapEntry {
    /// Component identifier.
    pub component_id: String,

    /// Component kind (e.g. "dashboard", "crud").
    #[serde(default)]
    pub component_type: String,

    /// Build priority, 1 first.
    #[serde(default)]
    pub priority: u32,

    /// Short rationale.
    #[serde(default)]
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_yields_empty_default() {
        let plan = ValidationPlan::parse_or_default("");
        assert!(plan.component_roadmap.is_empty());
        assert_eq!(plan.total_components_planned, 0);
    }

    #[test]
    fn test_parse_valid_plan() {
        let raw = r#"{
            "component_roadmap": [
                {"component_id": "dashboard", "component_type": "dashboard", "priority": 1}
            ],
            "total_components_planned": 1
        }"#;
        let plan = ValidationPlan::parse_or_default(raw);
        assert_eq!(plan.total_components_planned, 1);
        assert_eq!(plan.component_roadmap[0].component_id, "dashboard");
    }
}
