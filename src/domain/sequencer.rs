//! Business-flow step sequencing
//!
//! The step list comes from external flow configuration and is authoritative:
//! it is never reordered, deduplicated or extended here. Completing a stage does
//! not advance the cursor; only explicit navigation moves it.

use thiserror::Error;

use crate::errors::CfsError;
use crate::schemas::BusinessFlowStep;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("no steps configured")]
    NoStepsConfigured,

    #[error("step {index} ({code}) has no fromStatus")]
    MissingFromStatus { index: usize, code: String },

    #[error("step {index} ({code}) has no toStatus")]
    MissingToStatus { index: usize, code: String },

    #[error("no step starts from position status {0}")]
    NotFound(String),

    #[error("step index {index} out of range (0..{len})")]
    OutOfRange { index: usize, len: usize },
}

impl From<StepError> for CfsError {
    fn from(err: StepError) -> Self {
        match err {
            StepError::MissingFromStatus { .. } | StepError::MissingToStatus { .. } => {
                CfsError::MissingField(err.to_string())
            }
            StepError::NotFound(_) => CfsError::NotFound(err.to_string()),
            StepError::NoStepsConfigured | StepError::OutOfRange { .. } => {
                CfsError::PreconditionFailed(err.to_string())
            }
        }
    }
}

/// The step a package transaction is currently in, and the one after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStep<'a> {
    pub index: usize,
    pub step: &'a BusinessFlowStep,
    pub next: Option<&'a BusinessFlowStep>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Check that the list is non-empty and every step carries both statuses.
pub fn validate_steps(steps: &[BusinessFlowStep]) -> Result<(), StepError> {
    if steps.is_empty() {
        return Err(StepError::NoStepsConfigured);
    }
    for (index, step) in steps.iter().enumerate() {
        if is_blank(&step.from_status) {
            return Err(StepError::MissingFromStatus {
                index,
                code: step.code.clone(),
            });
        }
        if is_blank(&step.to_status) {
            return Err(StepError::MissingToStatus {
                index,
                code: step.code.clone(),
            });
        }
    }
    Ok(())
}

/// Find the first configured step whose `fromStatus` equals the current position status.
pub fn resolve_active_step<'a>(
    steps: &'a [BusinessFlowStep],
    current_position_status: &str,
) -> Result<ActiveStep<'a>, StepError> {
    validate_steps(steps)?;
    let index = steps
        .iter()
        .position(|s| s.from_status.as_deref() == Some(current_position_status))
        .ok_or_else(|| StepError::NotFound(current_position_status.to_string()))?;
    Ok(ActiveStep {
        index,
        step: &steps[index],
        next: steps.get(index + 1),
    })
}

/// Signal emitted when a stage's action completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCompletion {
    pub step_code: String,
    pub index: usize,
    /// The caller must invalidate and re-fetch the underlying data
    pub refresh_required: bool,
}

/// Cursor over a validated flow, moved only by explicit navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCursor {
    steps: Vec<BusinessFlowStep>,
    active: usize,
}

impl StepCursor {
    /// Start at the first step
    pub fn new(steps: Vec<BusinessFlowStep>) -> Result<Self, StepError> {
        validate_steps(&steps)?;
        Ok(StepCursor { steps, active: 0 })
    }

    /// Start at the step the current position status belongs to
    pub fn resume(steps: Vec<BusinessFlowStep>, current_position_status: &str) -> Result<Self, StepError> {
        let active = resolve_active_step(&steps, current_position_status)?.index;
        Ok(StepCursor { steps, active })
    }

    pub fn steps(&self) -> &[BusinessFlowStep] {
        &self.steps
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &BusinessFlowStep {
        &self.steps[self.active]
    }

    /// Peek at the following step without moving
    pub fn next_step(&self) -> Option<&BusinessFlowStep> {
        self.steps.get(self.active + 1)
    }

    pub fn is_last(&self) -> bool {
        self.active + 1 == self.steps.len()
    }

    /// Explicit navigation to any configured step
    pub fn select(&mut self, index: usize) -> Result<&BusinessFlowStep, StepError> {
        if index >= self.steps.len() {
            return Err(StepError::OutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        self.active = index;
        Ok(&self.steps[index])
    }

    /// Report completion of the active stage. The cursor stays where it is.
    pub fn complete_active(&self) -> StageCompletion {
        StageCompletion {
            step_code: self.active().code.clone(),
            index: self.active,
            refresh_required: true,
        }
    }
}
