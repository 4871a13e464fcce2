//! Destuff completion aggregation and result recording

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schemas::{DestuffClassification, DestuffResult, HblDestuffStatus, WorkingStatus};

/// Request to record the destuff result of one HBL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestuffResultRequest {
    #[serde(default)]
    pub document: Option<String>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub note: Option<String>,

    /// Defer the decision on this HBL
    #[serde(default)]
    pub on_hold: bool,

    /// Cargo did not match the document; ignored when `on_hold` is set
    #[serde(default)]
    pub unmatched: bool,
}

/// Whether every planned HBL of a container has been settled (done or on-hold).
///
/// An empty list is not complete: a container needs at least one planned HBL,
/// or an explicit "nothing was loaded" declaration handled by the completion rule.
pub fn is_container_destuff_complete(hbls: &[HblDestuffStatus]) -> bool {
    !hbls.is_empty() && hbls.iter().all(HblDestuffStatus::is_settled)
}

/// HBLs still blocking completion
pub fn pending_hbls(hbls: &[HblDestuffStatus]) -> Vec<&HblDestuffStatus> {
    hbls.iter().filter(|h| !h.is_settled()).collect()
}

/// Record a destuff result, replacing any earlier one.
///
/// Never mutates the input. Recording twice leaves exactly the latest result, and the
/// destuff status reflects only the latest on-hold flag.
pub fn record_destuff_result(
    hbl: &HblDestuffStatus,
    request: &DestuffResultRequest,
    now: DateTime<Utc>,
) -> HblDestuffStatus {
    let (status, classification) = if request.on_hold {
        (WorkingStatus::OnHold, DestuffClassification::OnHold)
    } else if request.unmatched {
        (WorkingStatus::Done, DestuffClassification::Unmatched)
    } else {
        (WorkingStatus::Done, DestuffClassification::Passed)
    };

    let mut next = hbl.clone();
    next.destuff_status = status;
    next.destuff_result = Some(DestuffResult {
        recorded_at: now,
        document: request.document.clone(),
        image: request.image.clone(),
        note: request.note.clone(),
        classification,
        on_hold: request.on_hold,
    });
    next
}
