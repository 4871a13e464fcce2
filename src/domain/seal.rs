//! Seal eligibility
//!
//! A container may be sealed only while it is in progress, has documented cargo,
//! and no package transaction on any of its packing lists is still open.

use std::collections::HashMap;

use crate::schemas::{PackageTransaction, WorkingStatus};

/// Outcome of a seal check, with the failed rule when not eligible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealCheck {
    pub eligible: bool,
    pub reason: Option<String>,
}

impl SealCheck {
    fn eligible() -> Self {
        SealCheck {
            eligible: true,
            reason: None,
        }
    }

    fn blocked(reason: impl Into<String>) -> Self {
        SealCheck {
            eligible: false,
            reason: Some(reason.into()),
        }
    }
}

/// Evaluate seal eligibility and report why it fails.
///
/// Packing lists with no entry in `transactions_by_packing_list`, or an empty entry,
/// count as having no open work.
pub fn check_seal_eligibility(
    container_status: WorkingStatus,
    packing_list_ids: &[String],
    transactions_by_packing_list: &HashMap<String, Vec<PackageTransaction>>,
) -> SealCheck {
    if container_status != WorkingStatus::InProgress {
        return SealCheck::blocked(format!(
            "container is {}, not in-progress",
            container_status
        ));
    }

    if packing_list_ids.is_empty() {
        return SealCheck::blocked("container has no packing lists assigned");
    }

    for packing_list_id in packing_list_ids {
        let open = transactions_by_packing_list
            .get(packing_list_id)
            .and_then(|txns| txns.iter().find(|t| t.is_open()));
        if let Some(txn) = open {
            return SealCheck::blocked(format!(
                "transaction {} on packing list {} is still in progress",
                txn.code, packing_list_id
            ));
        }
    }

    SealCheck::eligible()
}

/// Whether the container may be sealed
pub fn is_seal_eligible(
    container_status: WorkingStatus,
    packing_list_ids: &[String],
    transactions_by_packing_list: &HashMap<String, Vec<PackageTransaction>>,
) -> bool {
    check_seal_eligibility(container_status, packing_list_ids, transactions_by_packing_list).eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::TransactionStatus;

    fn txn(id: &str, pl: &str, status: TransactionStatus) -> PackageTransaction {
        PackageTransaction::new(id, id.to_uppercase(), "stuffing")
            .with_packing_list(pl)
            .with_status(status)
    }

    fn pls(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scenario_a_open_transaction_blocks() {
        let mut map = HashMap::new();
        map.insert("pl-1".to_string(), vec![txn("t-1", "pl-1", TransactionStatus::Done)]);
        map.insert("pl-2".to_string(), vec![txn("t-2", "pl-2", TransactionStatus::InProgress)]);

        let check = check_seal_eligibility(WorkingStatus::InProgress, &pls(&["pl-1", "pl-2"]), &map);
        assert!(!check.eligible);
        assert!(check.reason.unwrap().contains("pl-2"));
    }

    #[test]
    fn test_scenario_b_all_done_is_eligible() {
        let mut map = HashMap::new();
        map.insert("pl-1".to_string(), vec![txn("t-1", "pl-1", TransactionStatus::Done)]);
        map.insert("pl-2".to_string(), vec![txn("t-2", "pl-2", TransactionStatus::Done)]);

        assert!(is_seal_eligible(WorkingStatus::InProgress, &pls(&["pl-1", "pl-2"]), &map));
    }

    #[test]
    fn test_not_in_progress_is_never_eligible() {
        let map = HashMap::new();
        for status in [WorkingStatus::Waiting, WorkingStatus::OnHold, WorkingStatus::Done] {
            assert!(!is_seal_eligible(status, &pls(&["pl-1"]), &map));
        }
    }

    #[test]
    fn test_no_packing_lists_is_not_eligible() {
        let check = check_seal_eligibility(WorkingStatus::InProgress, &[], &HashMap::new());
        assert!(!check.eligible);
        assert_eq!(
            check.reason.as_deref(),
            Some("container has no packing lists assigned")
        );
    }

    #[test]
    fn test_packing_list_without_transactions_does_not_block() {
        let mut map = HashMap::new();
        map.insert("pl-2".to_string(), Vec::new());
        assert!(is_seal_eligible(WorkingStatus::InProgress, &pls(&["pl-1", "pl-2"]), &map));
    }

    #[test]
    fn test_transactions_on_unlisted_packing_lists_are_ignored() {
        let mut map = HashMap::new();
        map.insert("pl-9".to_string(), vec![txn("t-9", "pl-9", TransactionStatus::InProgress)]);
        assert!(is_seal_eligible(WorkingStatus::InProgress, &pls(&["pl-1"]), &map));
    }
}
