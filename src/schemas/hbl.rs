//! HBL destuff status schema - Per-document destuff progress for one container

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WorkingStatus;

/// Outcome classification of a destuff inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DestuffClassification {
    /// Cargo matched the document
    Passed,
    /// Cargo did not match the document
    Unmatched,
    /// Decision deferred
    OnHold,
}

impl std::fmt::Display for DestuffClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DestuffClassification::Passed => write!(f, "passed"),
            DestuffClassification::Unmatched => write!(f, "unmatched"),
            DestuffClassification::OnHold => write!(f, "on-hold"),
        }
    }
}

/// The recorded result of destuffing one HBL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestuffResult {
    pub recorded_at: DateTime<Utc>,

    #[serde(default)]
    pub document: Option<String>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub note: Option<String>,

    pub classification: DestuffClassification,

    #[serde(default)]
    pub on_hold: bool,
}

/// Destuff progress of a single HBL inside a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HblDestuffStatus {
    pub hbl_id: String,

    #[serde(default)]
    pub hbl_code: Option<String>,

    #[serde(default)]
    pub packing_list_id: Option<String>,

    #[serde(default)]
    pub packing_list_number: Option<String>,

    #[serde(default)]
    pub bypass_storage_flag: bool,

    #[serde(default)]
    pub destuff_status: WorkingStatus,

    #[serde(default)]
    pub inspection_session_id: Option<String>,

    #[serde(default)]
    pub destuff_result: Option<DestuffResult>,
}

impl HblDestuffStatus {
    /// Create a waiting HBL with no result
    pub fn new(hbl_id: impl Into<String>) -> Self {
        HblDestuffStatus {
            hbl_id: hbl_id.into(),
            hbl_code: None,
            packing_list_id: None,
            packing_list_number: None,
            bypass_storage_flag: false,
            destuff_status: WorkingStatus::Waiting,
            inspection_session_id: None,
            destuff_result: None,
        }
    }

    pub fn with_packing_list(mut self, packing_list_id: impl Into<String>) -> Self {
        self.packing_list_id = Some(packing_list_id.into());
        self
    }

    pub fn with_destuff_status(mut self, status: WorkingStatus) -> Self {
        self.destuff_status = status;
        self
    }

    /// Whether this HBL no longer blocks container completion.
    ///
    /// A done or on-hold status only counts once a destuff result backs it.
    pub fn is_settled(&self) -> bool {
        self.has_settled_status() && self.destuff_result.is_some()
    }

    fn has_settled_status(&self) -> bool {
        matches!(
            self.destuff_status,
            WorkingStatus::Done | WorkingStatus::OnHold
        )
    }

    /// Check the status/result consistency rules; returns the first violation found
    pub fn consistency_error(&self) -> Option<String> {
        match (&self.destuff_result, self.has_settled_status()) {
            (Some(_), false) => {
                return Some(format!(
                    "HBL {} has a destuff result but status {}",
                    self.hbl_id, self.destuff_status
                ))
            }
            (None, true) => {
                return Some(format!(
                    "HBL {} is {} without a destuff result",
                    self.hbl_id, self.destuff_status
                ))
            }
            _ => {}
        }
        if let Some(result) = &self.destuff_result {
            if result.classification == DestuffClassification::OnHold
                && self.destuff_status != WorkingStatus::OnHold
            {
                return Some(format!(
                    "HBL {} is classified on-hold but status is {}",
                    self.hbl_id, self.destuff_status
                ));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(classification: DestuffClassification) -> DestuffResult {
        DestuffResult {
            recorded_at: Utc::now(),
            document: None,
            image: None,
            note: None,
            classification,
            on_hold: classification == DestuffClassification::OnHold,
        }
    }

    #[test]
    fn test_new_hbl_is_waiting_and_consistent() {
        let hbl = HblDestuffStatus::new("hbl-1");
        assert_eq!(hbl.destuff_status, WorkingStatus::Waiting);
        assert!(!hbl.is_settled());
        assert!(hbl.consistency_error().is_none());
    }

    #[test]
    fn test_settled_without_result_is_inconsistent() {
        let hbl = HblDestuffStatus::new("hbl-1").with_destuff_status(WorkingStatus::Done);
        assert!(hbl.consistency_error().unwrap().contains("without a destuff result"));
        assert!(!hbl.is_settled());
    }

    #[test]
    fn test_settled_requires_result() {
        let mut hbl = HblDestuffStatus::new("hbl-1").with_destuff_status(WorkingStatus::Done);
        assert!(!hbl.is_settled());

        hbl.destuff_result = Some(result(DestuffClassification::Passed));
        assert!(hbl.is_settled());
    }

    #[test]
    fn test_result_without_settled_status_is_inconsistent() {
        let mut hbl = HblDestuffStatus::new("hbl-1").with_destuff_status(WorkingStatus::InProgress);
        hbl.destuff_result = Some(result(DestuffClassification::Passed));
        assert!(hbl.consistency_error().is_some());
    }

    #[test]
    fn test_on_hold_classification_requires_on_hold_status() {
        let mut hbl = HblDestuffStatus::new("hbl-1").with_destuff_status(WorkingStatus::Done);
        hbl.destuff_result = Some(result(DestuffClassification::OnHold));
        assert!(hbl.consistency_error().unwrap().contains("classified on-hold"));

        let fixed = hbl.with_destuff_status(WorkingStatus::OnHold);
        assert!(fixed.consistency_error().is_none());
    }

    #[test]
    fn test_hbl_json_defaults() {
        let hbl: HblDestuffStatus = serde_json::from_str(r#"{"hblId":"hbl-9"}"#).unwrap();
        assert_eq!(hbl.destuff_status, WorkingStatus::Waiting);
        assert!(!hbl.bypass_storage_flag);
        assert!(hbl.destuff_result.is_none());
    }

    #[test]
    fn test_classification_serialization() {
        assert_eq!(serde_json::to_string(&DestuffClassification::OnHold).unwrap(), "\"on-hold\"");
        assert_eq!(serde_json::to_string(&DestuffClassification::Unmatched).unwrap(), "\"unmatched\"");
    }
}
