use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, OptionalAuthUser};
use crate::models::Release;
use crate::presentation::{markdown, App, TimelineLayout};
use crate::services::ReleaseService;

#[derive(Clone)]
pub struct JournalState {
    pub releases: ReleaseService,
    /// Year shown when a request does not name one.
    pub release_year: String,
}

impl JournalState {
    fn year(&self, query: &YearQuery) -> String {
        query
            .year
            .as_deref()
            .map(str::trim)
            .filter(|y| !y.is_empty())
            .unwrap_or(&self.release_year)
            .to_string()
    }
}

// Templates
#[derive(Template)]
#[template(path = "journal/index.html")]
struct IndexTemplate {
    app: App,
    user: Option<AuthUser>,
    year: String,
    releases: Vec<ReleaseRow>,
    is_fixture: bool,
}

#[derive(Template)]
#[template(path = "journal/timeline.html")]
struct TimelineTemplate {
    app: App,
    user: Option<AuthUser>,
    year: String,
    layout: TimelineLayout,
    is_fixture: bool,
}

#[derive(Template)]
#[template(path = "journal/release.html")]
struct ReleaseTemplate {
    app: App,
    user: Option<AuthUser>,
    year: String,
    release: ReleaseRow,
    body_html: String,
}

struct ReleaseRow {
    id: String,
    title: String,
    date_label: String,
    apps: Vec<String>,
}

impl ReleaseRow {
    fn new(release: &Release) -> Self {
        Self {
            id: release.id.clone(),
            title: release.title.clone(),
            date_label: release.date.format("%B %-d, %Y").to_string(),
            apps: release.apps.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct YearQuery {
    year: Option<String>,
}

pub async fn index(
    State(state): State<JournalState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Query(query): Query<YearQuery>,
) -> Result<Response> {
    let year = state.year(&query);
    let list = state.releases.list(&year).await;

    // Newest first on the index; the timeline reads left to right.
    let releases = list.releases.iter().rev().map(ReleaseRow::new).collect();

    let template = IndexTemplate {
        app: App::Journal,
        user,
        year,
        releases,
        is_fixture: list.is_fixture(),
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

pub async fn timeline(
    State(state): State<JournalState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Query(query): Query<YearQuery>,
) -> Result<Response> {
    let year = state.year(&query);
    let list = state.releases.list(&year).await;

    let template = TimelineTemplate {
        app: App::Journal,
        user,
        year,
        layout: TimelineLayout::new(&list.releases),
        is_fixture: list.is_fixture(),
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

pub async fn release(
    State(state): State<JournalState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Path(id): Path<String>,
    Query(query): Query<YearQuery>,
) -> Result<Response> {
    let year = state.year(&query);
    let release = state
        .releases
        .get_one(&year, &id)
        .await
        .ok_or_else(|| AppError::NotFound("Release not found".to_string()))?;

    let template = ReleaseTemplate {
        app: App::Journal,
        user,
        year,
        body_html: markdown::render(&release.body),
        release: ReleaseRow::new(&release),
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}
