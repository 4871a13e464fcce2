//! Package transaction schema - Packages moving through a business process flow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TransactionStatus;

/// One package line within a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageItem {
    pub package_id: String,

    /// Current position status, matched against flow step from/to statuses
    #[serde(default)]
    pub position_status: Option<String>,

    #[serde(default)]
    pub condition_status: Option<String>,

    #[serde(default)]
    pub regulatory_status: Option<String>,
}

/// A tracked unit of package handling work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageTransaction {
    pub id: String,

    pub code: String,

    pub status: TransactionStatus,

    /// Business process flow name (e.g. "warehouse-delivery")
    pub business_process_flow: String,

    #[serde(default)]
    pub party_name: Option<String>,

    #[serde(default)]
    pub party_type: Option<String>,

    #[serde(default)]
    pub packing_list_id: Option<String>,

    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub items: Vec<PackageItem>,
}

impl PackageTransaction {
    /// Create a new in-progress transaction
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        business_process_flow: impl Into<String>,
    ) -> Self {
        PackageTransaction {
            id: id.into(),
            code: code.into(),
            status: TransactionStatus::InProgress,
            business_process_flow: business_process_flow.into(),
            party_name: None,
            party_type: None,
            packing_list_id: None,
            ended_at: None,
            items: Vec::new(),
        }
    }

    pub fn with_packing_list(mut self, packing_list_id: impl Into<String>) -> Self {
        self.packing_list_id = Some(packing_list_id.into());
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == TransactionStatus::InProgress
    }
}

/// List filter for package transactions; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub packing_list_id: Option<String>,
    pub status: Option<TransactionStatus>,
    pub business_process_flow: Option<String>,
}

impl TransactionFilter {
    pub fn for_packing_list(packing_list_id: impl Into<String>) -> Self {
        TransactionFilter {
            packing_list_id: Some(packing_list_id.into()),
            ..Default::default()
        }
    }

    pub fn matches(&self, txn: &PackageTransaction) -> bool {
        if let Some(pl) = &self.packing_list_id {
            if txn.packing_list_id.as_deref() != Some(pl.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if txn.status != status {
                return false;
            }
        }
        if let Some(flow) = &self.business_process_flow {
            if &txn.business_process_flow != flow {
                return false;
            }
        }
        true
    }
}
