use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::StoreBackend;
use crate::version::GIT_VERSION;

#[derive(Clone)]
pub struct HealthState {
    pub store: StoreBackend,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    git_version: &'static str,
    store: &'static str,
}

pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        git_version: GIT_VERSION,
        store: state.store.as_str(),
    })
}
