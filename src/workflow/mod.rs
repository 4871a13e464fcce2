//! Workflow orchestration
//!
//! Every action re-fetches the entity from the store, evaluates the pure validators
//! from `crate::domain`, and writes the result back. Only one action may be in flight
//! per plan; a concurrent request is rejected as busy and the caller re-fetches.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::domain::{
    apply_container_action, apply_plan_action, can_open_transaction, check_seal_eligibility,
    close_transaction, is_container_destuff_complete, record_destuff_result, ContainerAction,
    ContainerContext, DestuffResultRequest, PlanAction, PlanContext, SealCheck, StepCursor,
    TransitionResult,
};
use crate::errors::{CfsError, Result};
use crate::schemas::{
    CargoLoadedStatus, HblDestuffStatus, PackageTransaction, Plan, PlanContainer,
    TransactionFilter, WorkingStatus,
};
use crate::store::WorkflowStore;

/// Releases the in-flight key when dropped
struct InFlight<'a> {
    keys: &'a Mutex<HashSet<String>>,
    key: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        keys.remove(&self.key);
    }
}

/// Log a rejected transition and convert it into a crate result
fn settle<T>(result: TransitionResult<T>, entity: &str, id: &str) -> Result<T> {
    if let TransitionResult::Error { from, to, error, .. } = &result {
        tracing::warn!(entity = entity, id = id, %from, %to, reason = %error, "transition rejected");
    }
    result.into_result(entity)
}

pub struct WorkflowService<S: WorkflowStore> {
    store: Arc<S>,
    actor: String,
    in_flight: Mutex<HashSet<String>>,
}

impl<S: WorkflowStore> WorkflowService<S> {
    pub fn new(store: Arc<S>, actor: impl Into<String>) -> Self {
        WorkflowService {
            store,
            actor: actor.into(),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    fn begin(&self, key: String) -> Result<InFlight<'_>> {
        let mut keys = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !keys.insert(key.clone()) {
            return Err(CfsError::Busy(format!("an action on {} is already in flight", key)));
        }
        Ok(InFlight {
            keys: &self.in_flight,
            key,
        })
    }

    // ===== PLAN ACTIONS =====

    /// PENDING → IN_PROGRESS through the resumption gate.
    ///
    /// The "another plan is active" input is a store query made now, excluding this plan.
    pub async fn resume_plan(&self, plan_id: &str) -> Result<Plan> {
        let _guard = self.begin(plan_id.to_string())?;
        let plan = self.store.get_plan(plan_id).await?;
        let others = self.store.count_active_plans(Some(plan_id)).await?;
        let ctx = PlanContext {
            system_has_active_plan: others > 0,
        };
        self.finish_plan_action(&plan, PlanAction::Resume, &ctx).await
    }

    /// IN_PROGRESS → PENDING
    pub async fn suspend_plan(&self, plan_id: &str) -> Result<Plan> {
        let _guard = self.begin(plan_id.to_string())?;
        let plan = self.store.get_plan(plan_id).await?;
        self.finish_plan_action(&plan, PlanAction::Suspend, &PlanContext::default())
            .await
    }

    /// IN_PROGRESS → DONE once every container is done
    pub async fn complete_plan(&self, plan_id: &str) -> Result<Plan> {
        let _guard = self.begin(plan_id.to_string())?;
        let plan = self.store.get_plan(plan_id).await?;
        self.finish_plan_action(&plan, PlanAction::Complete, &PlanContext::default())
            .await
    }

    async fn finish_plan_action(&self, plan: &Plan, action: PlanAction, ctx: &PlanContext) -> Result<Plan> {
        let next = settle(apply_plan_action(plan, action, ctx, Utc::now()), "plan", &plan.id)?;
        let saved = self.store.save_plan(&next).await?;
        tracing::info!(
            plan = %saved.code,
            from = %plan.status,
            to = %saved.status,
            "plan transition applied"
        );
        Ok(saved)
    }

    // ===== CONTAINER ACTIONS =====

    /// Break the seal; the plan must be IN_PROGRESS
    pub async fn unseal_container(
        &self,
        plan_id: &str,
        container_id: &str,
        unsealed_at: Option<DateTime<Utc>>,
    ) -> Result<PlanContainer> {
        self.act_on_container(plan_id, container_id, ContainerAction::Unseal { unsealed_at })
            .await
    }

    /// Apply a new seal. With `on_hold` the container is parked; without it an on-hold
    /// container returns to work.
    pub async fn reseal_container(
        &self,
        plan_id: &str,
        container_id: &str,
        new_seal_number: &str,
        on_hold: bool,
        note: Option<String>,
    ) -> Result<PlanContainer> {
        let new_seal_number = new_seal_number.trim();
        if new_seal_number.is_empty() {
            return Err(CfsError::MissingField("newSealNumber".to_string()));
        }
        let action = ContainerAction::Reseal {
            new_seal_number: new_seal_number.to_string(),
            on_hold,
            note,
        };
        self.act_on_container(plan_id, container_id, action).await
    }

    pub async fn complete_container(
        &self,
        plan_id: &str,
        container_id: &str,
        occurred_at: Option<DateTime<Utc>>,
        notes: Option<String>,
        cargo_loaded: Option<CargoLoadedStatus>,
    ) -> Result<PlanContainer> {
        let action = ContainerAction::Complete {
            occurred_at,
            notes,
            cargo_loaded,
        };
        self.act_on_container(plan_id, container_id, action).await
    }

    async fn act_on_container(
        &self,
        plan_id: &str,
        container_id: &str,
        action: ContainerAction,
    ) -> Result<PlanContainer> {
        let _guard = self.begin(plan_id.to_string())?;
        let plan = self.store.get_plan(plan_id).await?;
        let container = find_container(&plan, container_id)?;

        let ctx = ContainerContext {
            plan_status: plan.status,
            plan_type: plan.plan_type,
            hbls: &container.hbls,
            cargo_loaded: container.cargo_loaded_status,
        };
        let result = apply_container_action(container, &action, &ctx, &self.actor, Utc::now());
        let next = settle(result, "container", container_id)?;

        let from = container.working_status;
        self.store
            .save_plan(&plan.clone().with_container_replaced(next.clone()))
            .await?;
        tracing::info!(
            plan = %plan.code,
            container = %container_id,
            action = action.name(),
            %from,
            to = %next.working_status,
            "container transition applied"
        );
        Ok(next)
    }

    // ===== DESTUFF =====

    /// Record the destuff result of one HBL, replacing any earlier result.
    ///
    /// The container must be in-progress or on-hold.
    pub async fn record_destuff_result(
        &self,
        plan_id: &str,
        container_id: &str,
        hbl_id: &str,
        request: &DestuffResultRequest,
    ) -> Result<HblDestuffStatus> {
        let _guard = self.begin(plan_id.to_string())?;
        let plan = self.store.get_plan(plan_id).await?;
        let container = find_container(&plan, container_id)?;

        if !matches!(
            container.working_status,
            WorkingStatus::InProgress | WorkingStatus::OnHold
        ) {
            tracing::warn!(container = %container_id, status = %container.working_status, "destuff result rejected");
            return Err(CfsError::PreconditionFailed(format!(
                "container is {}, not in-progress or on-hold",
                container.working_status
            )));
        }

        let hbl = container
            .hbl(hbl_id)
            .ok_or_else(|| CfsError::NotFound(format!("hbl {} in container {}", hbl_id, container_id)))?;
        let next = record_destuff_result(hbl, request, Utc::now());

        let updated = container.clone().with_hbl_replaced(next.clone());
        let complete = is_container_destuff_complete(&updated.hbls);
        self.store
            .save_plan(&plan.clone().with_container_replaced(updated))
            .await?;

        tracing::info!(
            container = %container_id,
            hbl = %hbl_id,
            status = %next.destuff_status,
            destuff_complete = complete,
            "destuff result recorded"
        );
        Ok(next)
    }

    // ===== SEALING & TRANSACTIONS =====

    /// Evaluate seal eligibility against the transactions on every packing list of the
    /// container, as stored right now.
    pub async fn check_seal(&self, plan_id: &str, container_id: &str) -> Result<SealCheck> {
        let plan = self.store.get_plan(plan_id).await?;
        let container = find_container(&plan, container_id)?;
        let packing_list_ids = container.all_packing_list_ids();

        let mut by_packing_list = HashMap::new();
        for packing_list_id in &packing_list_ids {
            let txns = self
                .store
                .list_transactions(&TransactionFilter::for_packing_list(packing_list_id.clone()))
                .await?;
            by_packing_list.insert(packing_list_id.clone(), txns);
        }

        let check = check_seal_eligibility(container.working_status, &packing_list_ids, &by_packing_list);
        tracing::debug!(
            container = %container_id,
            eligible = check.eligible,
            reason = check.reason.as_deref().unwrap_or(""),
            "seal check"
        );
        Ok(check)
    }

    /// Open a new transaction; at most one may be in progress per packing list and flow
    pub async fn open_transaction(&self, txn: PackageTransaction) -> Result<PackageTransaction> {
        let packing_list_id = txn
            .packing_list_id
            .clone()
            .ok_or_else(|| CfsError::MissingField("packingListId".to_string()))?;
        let _guard = self.begin(format!("packing-list:{}", packing_list_id))?;

        let existing = self
            .store
            .list_transactions(&TransactionFilter::for_packing_list(packing_list_id.clone()))
            .await?;
        let validation = can_open_transaction(&existing, &packing_list_id, &txn.business_process_flow);
        if !validation.valid {
            let reason = validation.reason.unwrap_or_default();
            tracing::warn!(packing_list = %packing_list_id, reason = %reason, "transaction open rejected");
            return Err(CfsError::PreconditionFailed(reason));
        }

        let saved = self.store.save_transaction(&txn).await?;
        tracing::info!(
            transaction = %saved.code,
            packing_list = %packing_list_id,
            flow = %saved.business_process_flow,
            "transaction opened"
        );
        Ok(saved)
    }

    /// IN_PROGRESS → DONE
    pub async fn close_transaction(&self, transaction_id: &str) -> Result<PackageTransaction> {
        let _guard = self.begin(format!("transaction:{}", transaction_id))?;
        let txn = self.store.get_transaction(transaction_id).await?;
        let next = settle(close_transaction(&txn, Utc::now()), "transaction", transaction_id)?;
        let saved = self.store.save_transaction(&next).await?;
        tracing::info!(transaction = %saved.code, "transaction closed");
        Ok(saved)
    }

    /// Position a step cursor on the step the package's position status belongs to
    pub async fn resolve_flow_step(&self, flow_name: &str, position_status: &str) -> Result<StepCursor> {
        let flow = self.store.get_business_flow(flow_name).await?;
        let cursor = StepCursor::resume(flow.steps, position_status)?;
        tracing::debug!(
            flow = %flow_name,
            step = %cursor.active().code,
            index = cursor.active_index(),
            "flow step resolved"
        );
        Ok(cursor)
    }
}

fn find_container<'a>(plan: &'a Plan, container_id: &str) -> Result<&'a PlanContainer> {
    plan.container(container_id)
        .ok_or_else(|| CfsError::NotFound(format!("container {} in plan {}", container_id, plan.code)))
}
