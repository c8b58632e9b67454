//! Contract HTTP handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::{Contract, ContractPatch, NewContract};
use crate::auth::handlers::OkResponse;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct ContractList {
    pub contracts: Vec<Contract>,
}

#[derive(Debug, Serialize)]
pub struct ContractBody {
    pub contract: Contract,
}

/// `GET /api/contracts`
pub async fn list_contracts(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<ContractList>, ApiError> {
    let contracts = state.contracts.list().await?;
    Ok(Json(ContractList { contracts }))
}

/// `POST /api/contracts`
pub async fn create_contract(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Json(input): Json<NewContract>,
) -> Result<Json<ContractBody>, ApiError> {
    let contract = Contract::create(input);
    state.contracts.insert(contract.clone()).await?;
    Ok(Json(ContractBody { contract }))
}

/// `PUT /api/contracts/{id}`
pub async fn update_contract(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<ContractPatch>,
) -> Result<Json<ContractBody>, ApiError> {
    let contract = state
        .contracts
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Contract"))?;
    Ok(Json(ContractBody { contract }))
}

/// `DELETE /api/contracts/{id}`
pub async fn delete_contract(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .contracts
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Contract"))?;
    Ok(Json(OkResponse { ok: true }))
}
