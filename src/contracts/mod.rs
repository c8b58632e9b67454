//! Contracts
//!
//! Contract tracking: title, free-form status (default "Draft"), and a
//! metadata bag (dates, value, client) persisted as one jsonb column.

pub mod handlers;
pub mod store;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use store::{ContractStore, MemContractStore, PgContractStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub meta: ContractMeta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

impl ContractMeta {
    fn merge(&mut self, patch: ContractMeta) {
        if patch.start_date.is_some() {
            self.start_date = patch.start_date;
        }
        if patch.end_date.is_some() {
            self.end_date = patch.end_date;
        }
        if patch.value.is_some() {
            self.value = patch.value;
        }
        if patch.client.is_some() {
            self.client = patch.client;
        }
    }
}

fn default_status() -> String {
    "Draft".to_string()
}

#[derive(Debug, Deserialize)]
pub struct NewContract {
    pub title: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(flatten)]
    pub meta: ContractMeta,
}

impl Contract {
    pub fn create(input: NewContract) -> Contract {
        Contract {
            id: Uuid::new_v4(),
            title: input.title,
            status: input.status,
            created_at: Utc::now(),
            meta: input.meta,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContractPatch {
    pub title: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub meta: ContractMeta,
}

impl ContractPatch {
    pub fn apply(self, contract: &mut Contract) {
        if let Some(title) = self.title {
            contract.title = title;
        }
        if let Some(status) = self.status {
            contract.status = status;
        }
        contract.meta.merge(self.meta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults_to_draft() {
        let input: NewContract = serde_json::from_value(serde_json::json!({
            "title": "Advisory retainer",
            "value": 25000.0,
        }))
        .unwrap();
        let contract = Contract::create(input);
        assert_eq!(contract.status, "Draft");
        assert_eq!(contract.meta.value, Some(25000.0));
    }

    #[test]
    fn test_patch_merges_per_field() {
        let input: NewContract = serde_json::from_value(serde_json::json!({
            "title": "Advisory retainer",
            "client": "Acme",
        }))
        .unwrap();
        let mut contract = Contract::create(input);

        let patch: ContractPatch =
            serde_json::from_value(serde_json::json!({ "status": "Signed" })).unwrap();
        patch.apply(&mut contract);

        assert_eq!(contract.status, "Signed");
        assert_eq!(contract.meta.client.as_deref(), Some("Acme"));
    }
}
