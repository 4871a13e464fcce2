//! Status vocabularies and the wire-code normalizer
//!
//! Container working status:
//! waiting → in-progress → done, with in-progress ⇄ on-hold as the only excursion.
//!
//! Plan status:
//! PENDING → IN_PROGRESS → DONE, with IN_PROGRESS → PENDING when a plan is set aside.

use crate::schemas::{PlanStatus, WorkingStatus};

/// Every container working status, in progression order
pub const CONTAINER_STATES: &[WorkingStatus] = &[
    WorkingStatus::Waiting,
    WorkingStatus::InProgress,
    WorkingStatus::OnHold,
    WorkingStatus::Done,
];

/// Every plan status, in progression order
pub const PLAN_STATES: &[PlanStatus] = &[
    PlanStatus::Pending,
    PlanStatus::InProgress,
    PlanStatus::Done,
];

/// Translate a raw status code into a working status.
///
/// Accepts both the upper-snake wire codes (`IN_PROGRESS`, `ON_HOLD`) and the
/// kebab working form (`in-progress`). Unknown or absent codes return `None`,
/// which callers must treat as "keep the current status".
pub fn normalize_working_status(raw: Option<&str>) -> Option<WorkingStatus> {
    let code = raw?.trim().to_ascii_uppercase().replace(['-', ' '], "_");
    match code.as_str() {
        "WAITING" => Some(WorkingStatus::Waiting),
        "IN_PROGRESS" => Some(WorkingStatus::InProgress),
        "DONE" => Some(WorkingStatus::Done),
        "ON_HOLD" => Some(WorkingStatus::OnHold),
        _ => None,
    }
}

/// The upper-snake wire code for a working status
pub fn to_wire_status(status: WorkingStatus) -> &'static str {
    match status {
        WorkingStatus::Waiting => "WAITING",
        WorkingStatus::InProgress => "IN_PROGRESS",
        WorkingStatus::Done => "DONE",
        WorkingStatus::OnHold => "ON_HOLD",
    }
}

/// Pick the working status of an incoming record.
///
/// The explicit working status wins; the legacy raw status is consulted only when
/// the explicit one is absent or unrecognized; otherwise `current` is preserved.
pub fn resolve_working_status(
    explicit: Option<&str>,
    legacy: Option<&str>,
    current: Option<WorkingStatus>,
) -> Option<WorkingStatus> {
    normalize_working_status(explicit)
        .or_else(|| normalize_working_status(legacy))
        .or(current)
}

/// Working statuses a container may move to from `current`.
pub fn allowed_container_targets(current: WorkingStatus) -> Vec<WorkingStatus> {
    match current {
        WorkingStatus::Waiting => vec![WorkingStatus::InProgress],
        WorkingStatus::InProgress => vec![WorkingStatus::OnHold, WorkingStatus::Done],
        WorkingStatus::OnHold => vec![WorkingStatus::InProgress],
        WorkingStatus::Done => vec![],
    }
}

/// Plan statuses a plan may move to from `current`.
pub fn allowed_plan_targets(current: PlanStatus) -> Vec<PlanStatus> {
    match current {
        PlanStatus::Pending => vec![PlanStatus::InProgress],
        PlanStatus::InProgress => vec![PlanStatus::Done, PlanStatus::Pending],
        PlanStatus::Done => vec![],
    }
}

pub fn is_terminal_container_status(status: WorkingStatus) -> bool {
    status == WorkingStatus::Done
}

pub fn is_terminal_plan_status(status: PlanStatus) -> bool {
    status == PlanStatus::Done
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_wire_codes() {
        assert_eq!(normalize_working_status(Some("WAITING")), Some(WorkingStatus::Waiting));
        assert_eq!(normalize_working_status(Some("IN_PROGRESS")), Some(WorkingStatus::InProgress));
        assert_eq!(normalize_working_status(Some("DONE")), Some(WorkingStatus::Done));
        assert_eq!(normalize_working_status(Some("ON_HOLD")), Some(WorkingStatus::OnHold));
    }

    #[test]
    fn test_normalize_kebab_forms() {
        assert_eq!(normalize_working_status(Some("in-progress")), Some(WorkingStatus::InProgress));
        assert_eq!(normalize_working_status(Some(" on-hold ")), Some(WorkingStatus::OnHold));
        assert_eq!(normalize_working_status(Some("done")), Some(WorkingStatus::Done));
    }

    #[test]
    fn test_normalize_unknown_is_none() {
        assert_eq!(normalize_working_status(None), None);
        assert_eq!(normalize_working_status(Some("")), None);
        assert_eq!(normalize_working_status(Some("SEALED")), None);
    }

    #[test]
    fn test_wire_status_round_trip() {
        for status in CONTAINER_STATES {
            assert_eq!(normalize_working_status(Some(to_wire_status(*status))), Some(*status));
        }
    }

    #[test]
    fn test_resolve_explicit_wins() {
        assert_eq!(
            resolve_working_status(Some("done"), Some("IN_PROGRESS"), Some(WorkingStatus::Waiting)),
            Some(WorkingStatus::Done)
        );
    }

    #[test]
    fn test_resolve_legacy_fallback() {
        assert_eq!(
            resolve_working_status(None, Some("ON_HOLD"), None),
            Some(WorkingStatus::OnHold)
        );
        assert_eq!(
            resolve_working_status(Some("garbage"), Some("ON_HOLD"), None),
            Some(WorkingStatus::OnHold)
        );
    }

    #[test]
    fn test_resolve_preserves_current() {
        assert_eq!(
            resolve_working_status(Some("???"), None, Some(WorkingStatus::InProgress)),
            Some(WorkingStatus::InProgress)
        );
        assert_eq!(resolve_working_status(None, None, None), None);
    }

    #[test]
    fn test_allowed_container_targets() {
        assert_eq!(allowed_container_targets(WorkingStatus::Waiting), vec![WorkingStatus::InProgress]);
        assert_eq!(
            allowed_container_targets(WorkingStatus::InProgress),
            vec![WorkingStatus::OnHold, WorkingStatus::Done]
        );
        assert_eq!(allowed_container_targets(WorkingStatus::OnHold), vec![WorkingStatus::InProgress]);
        assert!(allowed_container_targets(WorkingStatus::Done).is_empty());
    }

    #[test]
    fn test_allowed_plan_targets() {
        assert_eq!(allowed_plan_targets(PlanStatus::Pending), vec![PlanStatus::InProgress]);
        assert!(allowed_plan_targets(PlanStatus::InProgress).contains(&PlanStatus::Done));
        assert!(allowed_plan_targets(PlanStatus::Done).is_empty());
    }

    #[test]
    fn test_terminal_states() {
        assert!(is_terminal_container_status(WorkingStatus::Done));
        assert!(!is_terminal_container_status(WorkingStatus::OnHold));
        assert!(is_terminal_plan_status(PlanStatus::Done));
        assert!(!is_terminal_plan_status(PlanStatus::InProgress));
    }
}
