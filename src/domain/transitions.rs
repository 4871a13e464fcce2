//! State transition logic
//!
//! Pure functions that validate a requested action and, when legal, return the updated
//! entity with its timestamp and actor stamps applied. Inputs are never mutated.

use chrono::{DateTime, Utc};

use crate::errors::{CfsError, Result};
use crate::schemas::{
    CargoLoadedStatus, PackageTransaction, Plan, PlanContainer, PlanStatus, TransactionStatus,
    WorkingStatus,
};

use super::states::is_terminal_container_status;
use super::validation::{
    validate_container_transition, validate_plan_transition, validate_transaction_close,
    ContainerContext, PlanContext, ValidationResult, ViolationKind,
};

/// Result of a state transition attempt
#[derive(Debug)]
pub enum TransitionResult<T> {
    /// Successful transition with the updated entity
    Success {
        /// The entity with updated state and stamps
        next: T,
    },
    /// Rejected transition
    Error {
        kind: ViolationKind,
        from: String,
        to: String,
        /// Description of why the transition failed
        error: String,
    },
}

impl<T> TransitionResult<T> {
    /// Check if the transition was successful
    pub fn is_success(&self) -> bool {
        matches!(self, TransitionResult::Success { .. })
    }

    /// Check if the transition failed
    pub fn is_error(&self) -> bool {
        matches!(self, TransitionResult::Error { .. })
    }

    /// Get the updated entity if the transition was successful
    pub fn value(self) -> Option<T> {
        match self {
            TransitionResult::Success { next } => Some(next),
            TransitionResult::Error { .. } => None,
        }
    }

    /// Get the error message if the transition failed
    pub fn error(self) -> Option<String> {
        match self {
            TransitionResult::Success { .. } => None,
            TransitionResult::Error { error, .. } => Some(error),
        }
    }

    /// Convert into a crate `Result`.
    ///
    /// Illegal or terminal transitions become `IllegalTransition`, unmet preconditions
    /// become `PreconditionFailed` carrying the reason.
    pub fn into_result(self, entity: &str) -> Result<T> {
        match self {
            TransitionResult::Success { next } => Ok(next),
            TransitionResult::Error {
                kind: ViolationKind::PreconditionNotMet,
                error,
                ..
            } => Err(CfsError::PreconditionFailed(error)),
            TransitionResult::Error { from, to, .. } => Err(CfsError::illegal(entity, from, to)),
        }
    }

    fn rejected(validation: ValidationResult, from: impl ToString, to: impl ToString) -> Self {
        TransitionResult::Error {
            kind: validation.kind.unwrap_or(ViolationKind::IllegalSource),
            from: from.to_string(),
            to: to.to_string(),
            error: validation
                .reason
                .unwrap_or_else(|| "Transition validation failed".to_string()),
        }
    }
}

/// A workflow action on a container
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerAction {
    /// Break the seal and start work
    Unseal { unsealed_at: Option<DateTime<Utc>> },
    /// Apply a new seal, optionally parking the container on hold
    Reseal {
        new_seal_number: String,
        on_hold: bool,
        note: Option<String>,
    },
    /// Finish work on the container
    Complete {
        occurred_at: Option<DateTime<Utc>>,
        notes: Option<String>,
        cargo_loaded: Option<CargoLoadedStatus>,
    },
}

impl ContainerAction {
    /// Working status the action moves the container into
    pub fn target(&self) -> WorkingStatus {
        match self {
            ContainerAction::Unseal { .. } => WorkingStatus::InProgress,
            ContainerAction::Reseal { on_hold: true, .. } => WorkingStatus::OnHold,
            ContainerAction::Reseal { on_hold: false, .. } => WorkingStatus::InProgress,
            ContainerAction::Complete { .. } => WorkingStatus::Done,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContainerAction::Unseal { .. } => "unseal",
            ContainerAction::Reseal { .. } => "reseal",
            ContainerAction::Complete { .. } => "complete",
        }
    }

    /// Whether the action may be taken from `current` at all
    pub fn accepts_source(&self, current: WorkingStatus) -> bool {
        match self {
            ContainerAction::Unseal { .. } => current == WorkingStatus::Waiting,
            ContainerAction::Reseal { .. } => {
                matches!(current, WorkingStatus::InProgress | WorkingStatus::OnHold)
            }
            ContainerAction::Complete { .. } => current == WorkingStatus::InProgress,
        }
    }
}

/// A workflow action on a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    /// PENDING → IN_PROGRESS through the resumption gate
    Resume,
    /// IN_PROGRESS → PENDING
    Suspend,
    /// IN_PROGRESS → DONE once every container is done
    Complete,
}

impl PlanAction {
    pub fn target(self) -> PlanStatus {
        match self {
            PlanAction::Resume => PlanStatus::InProgress,
            PlanAction::Suspend => PlanStatus::Pending,
            PlanAction::Complete => PlanStatus::Done,
        }
    }
}

/// Apply a container action.
///
/// The completion request's cargo-loaded declaration overrides whatever the context
/// carried, so callers may pass a context with `cargo_loaded: None`.
pub fn apply_container_action(
    container: &PlanContainer,
    action: &ContainerAction,
    ctx: &ContainerContext<'_>,
    actor: &str,
    now: DateTime<Utc>,
) -> TransitionResult<PlanContainer> {
    let from = container.working_status;
    let to = action.target();

    if !is_terminal_container_status(from) && !action.accepts_source(from) {
        return TransitionResult::Error {
            kind: ViolationKind::IllegalSource,
            from: from.to_string(),
            to: to.to_string(),
            error: format!("cannot {} a container that is {}", action.name(), from),
        };
    }

    let mut effective = ctx.clone();
    if let ContainerAction::Complete { cargo_loaded, .. } = action {
        effective.cargo_loaded = *cargo_loaded;
    }

    let validation = validate_container_transition(from, to, &effective);
    if !validation.valid {
        return TransitionResult::rejected(validation, from, to);
    }

    let mut next = container.clone().with_working_status(to);
    match action {
        ContainerAction::Unseal { unsealed_at } => {
            next.unsealed_at = Some(unsealed_at.unwrap_or(now));
            next.unsealed_by = Some(actor.to_string());
        }
        ContainerAction::Reseal {
            new_seal_number,
            note,
            ..
        } => {
            next.resealed_at = Some(now);
            next.resealed_by = Some(actor.to_string());
            next.new_seal_number = Some(new_seal_number.clone());
            next.reseal_note = note.clone();
        }
        ContainerAction::Complete {
            occurred_at,
            notes,
            cargo_loaded,
        } => {
            next.completed_at = Some(occurred_at.unwrap_or(now));
            next.completed_by = Some(actor.to_string());
            next.completion_notes = notes.clone();
            if cargo_loaded.is_some() {
                next.cargo_loaded_status = *cargo_loaded;
            }
        }
    }

    TransitionResult::Success { next }
}

/// Apply a plan action. Container working statuses are never touched.
pub fn apply_plan_action(
    plan: &Plan,
    action: PlanAction,
    ctx: &PlanContext,
    now: DateTime<Utc>,
) -> TransitionResult<Plan> {
    let from = plan.status;
    let to = action.target();

    let validation = validate_plan_transition(plan, to, ctx);
    if !validation.valid {
        return TransitionResult::rejected(validation, from, to);
    }

    let mut next = plan.clone().with_status(to);
    match action {
        PlanAction::Resume => {
            next.pending_since = None;
            if next.execution_start_at.is_none() {
                next.execution_start_at = Some(now);
            }
        }
        PlanAction::Suspend => {
            next.pending_since = Some(now);
        }
        PlanAction::Complete => {
            next.execution_end_at = Some(now);
        }
    }

    TransitionResult::Success { next }
}

/// Close a package transaction (IN_PROGRESS → DONE)
pub fn close_transaction(
    txn: &PackageTransaction,
    now: DateTime<Utc>,
) -> TransitionResult<PackageTransaction> {
    let validation = validate_transaction_close(txn);
    if !validation.valid {
        return TransitionResult::rejected(validation, txn.status, TransactionStatus::Done);
    }
    let mut next = txn.clone().with_status(TransactionStatus::Done);
    next.ended_at = Some(now);
    TransitionResult::Success { next }
}
