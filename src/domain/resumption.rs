//! Plan resumption gate

use crate::schemas::Plan;

/// Decision of the resumption gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDecision {
    pub allowed: bool,
    /// The first failed rule, when not allowed
    pub reason: Option<String>,
}

impl ResumeDecision {
    fn allow() -> Self {
        ResumeDecision {
            allowed: true,
            reason: None,
        }
    }

    fn deny(reason: &str) -> Self {
        ResumeDecision {
            allowed: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// Decide whether a pending plan may re-enter active work.
///
/// Rules are checked in order and the first failure supplies the reason:
/// containers present, equipment booked, port notified, no other active plan.
/// `system_has_active_plan` must come from a store query made at decision time
/// and must not count the plan being resumed.
pub fn can_resume(plan: &Plan, system_has_active_plan: bool) -> ResumeDecision {
    if plan.containers.is_empty() {
        return ResumeDecision::deny("plan has no containers");
    }
    if !plan.equipment_booked {
        return ResumeDecision::deny("equipment not booked");
    }
    if !plan.port_notified {
        return ResumeDecision::deny("port not notified");
    }
    if system_has_active_plan {
        return ResumeDecision::deny("another plan is already in progress");
    }
    ResumeDecision::allow()
}
