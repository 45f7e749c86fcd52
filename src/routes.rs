use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::handlers::{api, fitness, health, journal, quick};
use crate::middleware::IdentityConfig;

pub fn create_router(
    fitness_state: fitness::FitnessState,
    journal_state: journal::JournalState,
    api_state: api::ApiState,
    health_state: health::HealthState,
    identity: IdentityConfig,
) -> Router {
    Router::new()
        // Fit routes
        .route("/", get(fitness::home))
        .route("/history", get(fitness::history))
        .route("/session/start", get(fitness::start))
        .route("/session/{id}", get(fitness::summary))
        .route("/session/{id}/exercises", get(fitness::select))
        .route(
            "/session/{id}/record",
            get(fitness::record_page).post(fitness::save),
        )
        .route(
            "/session/{id}/records/{record_id}/delete",
            post(fitness::delete),
        )
        .with_state(fitness_state)
        // Journal routes
        .route("/journal", get(journal::index))
        .route("/journal/timeline", get(journal::timeline))
        .route("/journal/releases/{id}", get(journal::release))
        .with_state(journal_state)
        // JSON API
        .route("/api/sessions", get(api::list_sessions))
        .route("/api/sessions/{id}", get(api::get_session))
        .route("/api/releases/{year}", get(api::list_releases))
        .with_state(api_state)
        .route("/health", get(health::health_check))
        .with_state(health_state)
        .route("/quick", get(quick::index))
        // Identity source via Extension layer
        .layer(Extension(identity))
}
