//! JSON views of the same data the pages render. Anonymous callers get
//! empty results rather than an error.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::middleware::OptionalAuthUser;
use crate::models::Session;
use crate::services::{FitnessService, ReleaseList, ReleaseService};

#[derive(Clone)]
pub struct ApiState {
    pub fitness: FitnessService,
    pub releases: ReleaseService,
}

pub async fn list_sessions(
    State(state): State<ApiState>,
    OptionalAuthUser(user): OptionalAuthUser,
) -> Json<Vec<Session>> {
    match user {
        Some(user) => Json(state.fitness.list_for_user(&user.email).await),
        None => Json(Vec::new()),
    }
}

pub async fn get_session(
    State(state): State<ApiState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Path(id): Path<String>,
) -> Json<Option<Session>> {
    match user {
        Some(user) => Json(state.fitness.get_one(&user.email, &id).await),
        None => Json(None),
    }
}

pub async fn list_releases(
    State(state): State<ApiState>,
    Path(year): Path<String>,
) -> Json<ReleaseList> {
    Json(state.releases.list(&year).await)
}
