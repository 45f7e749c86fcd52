#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;

use nina::config::StoreBackend;
use nina::handlers::{api, fitness, health, journal};
use nina::middleware::IdentityConfig;
use nina::services::{FitnessService, ReleaseService};
use nina::store::{MemoryTableStore, TableStore};

pub const USER: &str = "nina@example.com";
pub const IDENTITY_HEADER: &str = "x-forwarded-email";

pub fn setup_test_store() -> Arc<MemoryTableStore> {
    Arc::new(MemoryTableStore::new())
}

pub struct TestApp {
    pub router: Router,
    pub fitness: FitnessService,
    pub releases: ReleaseService,
}

pub fn create_test_app(store: Arc<MemoryTableStore>) -> Router {
    create_test_app_with_services(store).router
}

pub fn create_test_app_with_services(store: Arc<MemoryTableStore>) -> TestApp {
    let store: Arc<dyn TableStore> = store;
    let fitness = FitnessService::new(store.clone(), "FitnessSessions");
    let releases = ReleaseService::new(store, "releases");
    let router = build_router(
        fitness.clone(),
        releases.clone(),
        IdentityConfig::from_header(IDENTITY_HEADER),
        StoreBackend::Memory,
    );

    TestApp {
        router,
        fitness,
        releases,
    }
}

/// No store at all: reads are empty, releases come from the examples.
pub fn create_unconfigured_app(identity: IdentityConfig) -> Router {
    build_router(
        FitnessService::unconfigured(),
        ReleaseService::unconfigured(),
        identity,
        StoreBackend::Disabled,
    )
}

fn build_router(
    fitness: FitnessService,
    releases: ReleaseService,
    identity: IdentityConfig,
    store: StoreBackend,
) -> Router {
    let fitness_state = fitness::FitnessState {
        fitness: fitness.clone(),
    };
    let journal_state = journal::JournalState {
        releases: releases.clone(),
        release_year: "2026".to_string(),
    };
    let api_state = api::ApiState { fitness, releases };
    let health_state = health::HealthState { store };

    nina::routes::create_router(
        fitness_state,
        journal_state,
        api_state,
        health_state,
        identity,
    )
}

pub fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(user) = user {
        builder = builder.header(IDENTITY_HEADER, user);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(user) = user {
        builder = builder.header(IDENTITY_HEADER, user);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

pub fn extract_cookie_header(set_cookie: &str) -> String {
    // Extract just the cookie name=value part for use in Cookie header
    set_cookie.split(';').next().unwrap_or("").to_string()
}
