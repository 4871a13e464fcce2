//! Validation rules for container, plan and package transaction transitions

use crate::schemas::{
    CargoLoadedStatus, HblDestuffStatus, PackageTransaction, Plan, PlanStatus, PlanType,
    TransactionStatus, WorkingStatus,
};

use super::destuff::{is_container_destuff_complete, pending_hbls};
use super::resumption::can_resume;
use super::states::{
    allowed_container_targets, allowed_plan_targets, is_terminal_container_status,
    is_terminal_plan_status,
};

/// Kind of rule a rejected transition broke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Source state is terminal
    TerminalState,
    /// Target is not reachable from the source state
    IllegalSource,
    /// Transition exists but its precondition is not met
    PreconditionNotMet,
}

/// Result of a validation check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// Which kind of rule failed (if valid is false)
    pub kind: Option<ViolationKind>,

    /// Reason for failure (if valid is false)
    pub reason: Option<String>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        ValidationResult {
            valid: true,
            kind: None,
            reason: None,
        }
    }

    /// Create a failed validation result
    pub fn failure(kind: ViolationKind, reason: impl Into<String>) -> Self {
        ValidationResult {
            valid: false,
            kind: Some(kind),
            reason: Some(reason.into()),
        }
    }

    fn precondition(reason: impl Into<String>) -> Self {
        Self::failure(ViolationKind::PreconditionNotMet, reason)
    }
}

/// What the container validator needs to know about the container's surroundings
#[derive(Debug, Clone)]
pub struct ContainerContext<'a> {
    /// Status of the owning plan
    pub plan_status: PlanStatus,

    /// Type of the owning plan
    pub plan_type: PlanType,

    /// HBLs planned into the container
    pub hbls: &'a [HblDestuffStatus],

    /// Cargo-loaded status declared with the completion request
    pub cargo_loaded: Option<CargoLoadedStatus>,
}

/// What the plan validator needs to know about the rest of the system
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanContext {
    /// Another plan is IN_PROGRESS, according to a store query made at decision time
    pub system_has_active_plan: bool,
}

/// Validate entering "in-progress" from "waiting" (unseal)
pub fn can_unseal(plan_status: PlanStatus) -> ValidationResult {
    if plan_status != PlanStatus::InProgress {
        return ValidationResult::precondition(format!(
            "plan is {}, not IN_PROGRESS",
            plan_status
        ));
    }
    ValidationResult::success()
}

/// Validate entering "done".
///
/// An explicit `empty` declaration completes the container on its own. Otherwise a
/// destuffing container needs every HBL settled, and other plan types need a
/// declared cargo-loaded status.
pub fn can_complete_container(ctx: &ContainerContext<'_>) -> ValidationResult {
    if ctx.cargo_loaded == Some(CargoLoadedStatus::Empty) {
        return ValidationResult::success();
    }

    match ctx.plan_type {
        PlanType::Destuffing => {
            if ctx.hbls.is_empty() {
                return ValidationResult::precondition(
                    "container has no planned HBLs and was not declared empty",
                );
            }
            if !is_container_destuff_complete(ctx.hbls) {
                let pending: Vec<&str> = pending_hbls(ctx.hbls)
                    .iter()
                    .map(|h| h.hbl_id.as_str())
                    .collect();
                return ValidationResult::precondition(format!(
                    "HBLs not yet destuffed: {}",
                    pending.join(", ")
                ));
            }
            ValidationResult::success()
        }
        PlanType::Receiving | PlanType::Stuffing => {
            if ctx.cargo_loaded.is_none() {
                return ValidationResult::precondition("cargo loaded status not declared");
            }
            ValidationResult::success()
        }
    }
}

/// Validate a container working-status transition
pub fn validate_container_transition(
    current: WorkingStatus,
    target: WorkingStatus,
    ctx: &ContainerContext<'_>,
) -> ValidationResult {
    if is_terminal_container_status(current) {
        return ValidationResult::failure(
            ViolationKind::TerminalState,
            format!("container is {} and accepts no further transitions", current),
        );
    }

    if !allowed_container_targets(current).contains(&target) {
        return ValidationResult::failure(
            ViolationKind::IllegalSource,
            format!("cannot transition container from {} to {}", current, target),
        );
    }

    match (current, target) {
        (WorkingStatus::Waiting, WorkingStatus::InProgress) => can_unseal(ctx.plan_status),
        (_, WorkingStatus::Done) => can_complete_container(ctx),
        _ => ValidationResult::success(),
    }
}

/// Validate a plan status transition
pub fn validate_plan_transition(
    plan: &Plan,
    target: PlanStatus,
    ctx: &PlanContext,
) -> ValidationResult {
    let current = plan.status;
    if is_terminal_plan_status(current) {
        return ValidationResult::failure(
            ViolationKind::TerminalState,
            format!("plan {} is DONE and accepts no further transitions", plan.code),
        );
    }

    if !allowed_plan_targets(current).contains(&target) {
        return ValidationResult::failure(
            ViolationKind::IllegalSource,
            format!("cannot transition plan from {} to {}", current, target),
        );
    }

    match target {
        PlanStatus::InProgress => {
            let decision = can_resume(plan, ctx.system_has_active_plan);
            if !decision.allowed {
                return ValidationResult::precondition(
                    decision.reason.unwrap_or_else(|| "plan cannot resume".to_string()),
                );
            }
            ValidationResult::success()
        }
        PlanStatus::Done => {
            if plan.containers.is_empty() {
                return ValidationResult::precondition("plan has no containers");
            }
            if !plan.all_containers_done() {
                let open = plan
                    .containers
                    .iter()
                    .filter(|c| c.working_status != WorkingStatus::Done)
                    .count();
                return ValidationResult::precondition(format!(
                    "{} container(s) not done",
                    open
                ));
            }
            ValidationResult::success()
        }
        PlanStatus::Pending => ValidationResult::success(),
    }
}

/// Validate closing a package transaction
pub fn validate_transaction_close(txn: &PackageTransaction) -> ValidationResult {
    if txn.status == TransactionStatus::Done {
        return ValidationResult::failure(
            ViolationKind::TerminalState,
            format!("transaction {} is already DONE", txn.code),
        );
    }
    ValidationResult::success()
}

/// Validate opening a new transaction on a packing list for a flow.
///
/// At most one IN_PROGRESS transaction may exist per packing list and flow.
pub fn can_open_transaction(
    existing: &[PackageTransaction],
    packing_list_id: &str,
    business_process_flow: &str,
) -> ValidationResult {
    let open = existing.iter().find(|t| {
        t.is_open()
            && t.packing_list_id.as_deref() == Some(packing_list_id)
            && t.business_process_flow == business_process_flow
    });
    if let Some(txn) = open {
        return ValidationResult::precondition(format!(
            "packing list {} already has transaction {} in progress for {}",
            packing_list_id, txn.code, business_process_flow
        ));
    }
    ValidationResult::success()
}
