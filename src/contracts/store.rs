//! Contract store: one trait, two backends.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{Contract, ContractMeta, ContractPatch};
use crate::store::{MemCollection, StoreError};

#[async_trait]
pub trait ContractStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Contract>, StoreError>;

    async fn insert(&self, contract: Contract) -> Result<(), StoreError>;

    async fn update(&self, id: Uuid, patch: ContractPatch) -> Result<Contract, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

pub struct PgContractStore {
    pool: PgPool,
}

impl PgContractStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn contract_from_row(row: &sqlx::postgres::PgRow) -> Contract {
    Contract {
        id: row.get("id"),
        title: row.get("title"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        meta: row.get::<Json<ContractMeta>, _>("metadata").0,
    }
}

#[async_trait]
impl ContractStore for PgContractStore {
    async fn list(&self) -> Result<Vec<Contract>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, title, status, created_at, metadata FROM contracts ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(contract_from_row).collect())
    }

    async fn insert(&self, contract: Contract) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO contracts (id, title, status, created_at, metadata)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(contract.id)
        .bind(&contract.title)
        .bind(&contract.status)
        .bind(contract.created_at)
        .bind(Json(&contract.meta))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: ContractPatch) -> Result<Contract, StoreError> {
        let row = sqlx::query("SELECT id, title, status, created_at, metadata FROM contracts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        let mut contract = contract_from_row(&row);
        patch.apply(&mut contract);

        sqlx::query("UPDATE contracts SET title = $2, status = $3, metadata = $4 WHERE id = $1")
            .bind(id)
            .bind(&contract.title)
            .bind(&contract.status)
            .bind(Json(&contract.meta))
            .execute(&self.pool)
            .await?;

        Ok(contract)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct MemContractStore {
    contracts: MemCollection<Contract>,
}

impl MemContractStore {
    pub fn new() -> Self {
        Self {
            contracts: MemCollection::new(),
        }
    }
}

impl Default for MemContractStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContractStore for MemContractStore {
    async fn list(&self) -> Result<Vec<Contract>, StoreError> {
        Ok(self.contracts.all())
    }

    async fn insert(&self, contract: Contract) -> Result<(), StoreError> {
        self.contracts.insert_first(contract);
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: ContractPatch) -> Result<Contract, StoreError> {
        self.contracts
            .update_first(|c| c.id == id, |c| patch.apply(c))
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        if self.contracts.remove_where(|c| c.id == id) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
