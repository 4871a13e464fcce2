//! Business flow configuration - Externally supplied ordered steps

use serde::{Deserialize, Serialize};

/// Direction of cargo movement a flow handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowDirection {
    Inbound,
    Outbound,
}

/// One configured step of a business process flow.
///
/// `from_status`/`to_status` are optional on the wire; the sequencer rejects a step
/// that lacks either before it is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFlowStep {
    pub code: String,

    #[serde(default)]
    pub from_status: Option<String>,

    #[serde(default)]
    pub to_status: Option<String>,
}

impl BusinessFlowStep {
    pub fn new(code: impl Into<String>, from_status: impl Into<String>, to_status: impl Into<String>) -> Self {
        BusinessFlowStep {
            code: code.into(),
            from_status: Some(from_status.into()),
            to_status: Some(to_status.into()),
        }
    }
}

/// A named business process flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFlow {
    pub name: String,

    #[serde(default)]
    pub direction: Option<FlowDirection>,

    /// Steps in configured order
    #[serde(default)]
    pub steps: Vec<BusinessFlowStep>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_json_shape() {
        let json = r#"{
            "name": "stuffing",
            "direction": "OUTBOUND",
            "steps": [
                {"code": "select", "fromStatus": "IN_STORAGE", "toStatus": "SELECTED"},
                {"code": "inspect", "fromStatus": "SELECTED"},
                {"code": "stuffing", "fromStatus": "INSPECTED", "toStatus": "STUFFED"}
            ]
        }"#;
        let flow: BusinessFlow = serde_json::from_str(json).unwrap();
        assert_eq!(flow.direction, Some(FlowDirection::Outbound));
        assert_eq!(flow.steps.len(), 3);
        assert_eq!(flow.steps[0].code, "select");
        assert!(flow.steps[1].to_status.is_none());
    }

    #[test]
    fn test_flow_without_steps() {
        let flow: BusinessFlow = serde_json::from_str(r#"{"name":"empty"}"#).unwrap();
        assert!(flow.steps.is_empty());
        assert!(flow.direction.is_none());
    }
}
