//! Route handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::dispatch::{DispatchError, TriggerRequest, TriggerStage};
use crate::http::response::{status_for, Deployed};
use crate::http::server::AppState;
use crate::security::ClientIp;

/// `GET /hooks`: every registered project name.
pub async fn list_hooks(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.dispatcher.registry().names().to_vec())
}

/// `POST /hook/{name}/{env}`.
pub async fn trigger_hook(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Path((name, env)): Path<(String, String)>,
) -> Result<Deployed, DispatchError> {
    run_trigger(&state, TriggerRequest::new(name, env, ip)).await
}

/// Query form: `/hook?name=<name>&env=<env>`.
#[derive(Debug, Default, Deserialize)]
pub struct TriggerQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub env: String,
}

/// `GET|POST /hook?name=..&env=..`. Missing parameters are empty strings.
pub async fn trigger_hook_query(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Query(query): Query<TriggerQuery>,
) -> Result<Deployed, DispatchError> {
    run_trigger(&state, TriggerRequest::new(query.name, query.env, ip)).await
}

async fn run_trigger(state: &AppState, request: TriggerRequest) -> Result<Deployed, DispatchError> {
    let result = state.dispatcher.dispatch(&request).await;

    let status = match &result {
        Ok(_) => axum::http::StatusCode::OK,
        Err(e) => status_for(e),
    };
    tracing::info!(
        stage = %TriggerStage::Responded,
        project = %request.project,
        environment = %request.environment,
        status = status.as_u16(),
        "Trigger answered"
    );

    result.map(Deployed)
}
