//! Domain logic for plan, container and package transaction workflows

mod destuff;
mod resumption;
mod seal;
mod sequencer;
mod states;
mod transitions;
mod validation;


pub use destuff::{
    is_container_destuff_complete, pending_hbls, record_destuff_result, DestuffResultRequest,
};
pub use resumption::{can_resume, ResumeDecision};
pub use seal::{check_seal_eligibility, is_seal_eligible, SealCheck};
pub use sequencer::{
    resolve_active_step, validate_steps, ActiveStep, StageCompletion, StepCursor, StepError,
};
pub use states::{
    allowed_container_targets, allowed_plan_targets, is_terminal_container_status,
    is_terminal_plan_status, normalize_working_status, resolve_working_status, to_wire_status,
    CONTAINER_STATES, PLAN_STATES,
};
pub use transitions::{
    apply_container_action, apply_plan_action, close_transaction, ContainerAction, PlanAction,
    TransitionResult,
};
pub use validation::{
    can_complete_container, can_open_transaction, can_unseal, validate_container_transition,
    validate_plan_transition, validate_transaction_close, ContainerContext, PlanContext,
    ValidationResult, ViolationKind,
};
