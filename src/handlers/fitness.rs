use std::fmt;
use std::str::FromStr;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use chrono::{NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer};

use crate::catalog::EXERCISES;
use crate::error::{AppError, Result};
use crate::flash::{create_flash_cookie, take_flash, Flash};
use crate::middleware::{AuthUser, OptionalAuthUser};
use crate::models::{ExerciseDefinition, InputKind, Session, TimeUnit};
use crate::presentation::{format_duration, App, RecordLine};
use crate::recorder::stopwatch::ADJUST_STEP;
use crate::recorder::{Draft, SaveOutcome, SessionRecorder};
use crate::services::FitnessService;

const RECENT_SESSIONS: usize = 5;
const SAVE_FAILED: &str = "Failed to save session";

#[derive(Clone)]
pub struct FitnessState {
    pub fitness: FitnessService,
}

// Templates
#[derive(Template)]
#[template(path = "fit/home.html")]
struct HomeTemplate {
    app: App,
    user: Option<AuthUser>,
    today: String,
    recent: Vec<SessionRow>,
}

#[derive(Template)]
#[template(path = "fit/history.html")]
struct HistoryTemplate {
    app: App,
    user: Option<AuthUser>,
    sessions: Vec<SessionRow>,
}

#[derive(Template)]
#[template(path = "fit/session_summary.html")]
struct SummaryTemplate {
    app: App,
    user: Option<AuthUser>,
    session_id: String,
    date_label: String,
    count: usize,
    lines: Vec<RecordLine>,
    notice: Option<&'static str>,
    error: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "fit/session_select.html")]
struct SelectTemplate {
    app: App,
    user: Option<AuthUser>,
    session_id: String,
    date_label: String,
    exercises: &'static [ExerciseDefinition],
}

#[derive(Template)]
#[template(path = "fit/session_record.html")]
struct RecordTemplate {
    app: App,
    user: Option<AuthUser>,
    session_id: String,
    form: RecordForm,
}

struct SessionRow {
    id: String,
    date_label: String,
    count: usize,
}

impl SessionRow {
    fn new(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            date_label: session.date.format("%a, %b %-d, %Y").to_string(),
            count: session.exercises.len(),
        }
    }
}

/// A link that reloads the record page with an adjusted draft.
struct Control {
    label: String,
    href: String,
}

/// Everything the record-exercise page shows for one draft.
struct RecordForm {
    exercise_id: &'static str,
    label: &'static str,
    record_id: Option<String>,
    value: u32,
    value_caption: &'static str,
    value_display: String,
    sets: u32,
    weight: f64,
    distance: f64,
    show_sets: bool,
    show_weight: bool,
    show_distance: bool,
    stopwatch: Option<String>,
    stopwatch_running: bool,
    value_controls: Vec<Control>,
    quick_picks: Vec<Control>,
    set_controls: Vec<Control>,
    weight_controls: Vec<Control>,
    distance_picks: Vec<Control>,
}

impl RecordForm {
    /// `now` is the current unix second, used to read a running stopwatch.
    fn new(session_id: &str, draft: &Draft, now: i64) -> Self {
        let def = draft.exercise;
        let minutes = def.kind.is_timed() && def.time_unit() == TimeUnit::Minutes;
        let step = |label: &str, apply: fn(&mut Draft)| {
            control(session_id, draft, label.to_string(), apply)
        };

        let watch = def.uses_stopwatch().then(|| draft.stopwatch());
        let running = watch.is_some_and(|w| w.is_running());
        let value = watch.map_or(draft.value, |w| w.seconds_at(now));

        let (value_caption, value_display) = match def.kind {
            InputKind::Reps | InputKind::RepsWeight => ("Reps", value.to_string()),
            _ if minutes => ("Minutes", format!("{}m", value)),
            _ => ("Seconds", format_duration(value)),
        };

        let value_controls = if def.uses_stopwatch() {
            let toggle = if running { "Pause" } else { "Start" };
            vec![
                control(session_id, draft, toggle.to_string(), move |d: &mut Draft| {
                    d.toggle_stopwatch(now)
                }),
                step("-15s", |d| d.adjust_value(-ADJUST_STEP)),
                step("+15s", |d| d.adjust_value(ADJUST_STEP)),
                step("Reset", |d| d.reset_stopwatch()),
            ]
        } else {
            vec![
                step("-1", |d| d.adjust_value(-1)),
                step("+1", |d| d.adjust_value(1)),
            ]
        };

        let quick_picks = def
            .default_values
            .iter()
            .map(|&v| {
                let label = match def.kind {
                    InputKind::Reps | InputKind::RepsWeight => v.to_string(),
                    _ if minutes => format!("{}m", v),
                    _ => format_duration(v),
                };
                control(session_id, draft, label, move |d: &mut Draft| d.set_value(v))
            })
            .collect();

        let set_controls = if def.tracks_sets() {
            vec![
                step("-1 set", |d| d.adjust_multiplier(-1)),
                step("+1 set", |d| d.adjust_multiplier(1)),
            ]
        } else {
            Vec::new()
        };

        let weight_controls = if def.kind.has_weight() {
            vec![
                step("-5 kg", |d| d.adjust_weight(-1)),
                step("+5 kg", |d| d.adjust_weight(1)),
            ]
        } else {
            Vec::new()
        };

        let distance_picks = if def.kind.has_distance() {
            def.default_distances
                .iter()
                .map(|&km| {
                    control(session_id, draft, format!("{} km", km), move |d: &mut Draft| {
                        d.set_distance(km)
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            exercise_id: def.id,
            label: def.label,
            record_id: draft.editing_record_id.clone(),
            value,
            value_caption,
            value_display,
            sets: draft.multiplier,
            weight: draft.weight,
            distance: draft.distance,
            show_sets: def.tracks_sets(),
            show_weight: def.kind.has_weight(),
            show_distance: def.kind.has_distance(),
            stopwatch: watch.map(|w| w.display_at(now)),
            stopwatch_running: running,
            value_controls,
            quick_picks,
            set_controls,
            weight_controls,
            distance_picks,
        }
    }
}

fn control(
    session_id: &str,
    draft: &Draft,
    label: String,
    apply: impl FnOnce(&mut Draft),
) -> Control {
    let mut next = draft.clone();
    apply(&mut next);
    Control {
        label,
        href: draft_href(session_id, &next),
    }
}

fn draft_href(session_id: &str, draft: &Draft) -> String {
    let mut href = format!(
        "/session/{}/record?exercise={}&value={}&sets={}",
        session_id, draft.exercise.id, draft.value, draft.multiplier
    );
    if let Some(id) = &draft.editing_record_id {
        href.push_str(&format!("&record={}", id));
    }
    if draft.exercise.kind.has_weight() {
        href.push_str(&format!("&weight={}", draft.weight));
    }
    if draft.exercise.kind.has_distance() {
        href.push_str(&format!("&distance={}", draft.distance));
    }
    if let Some(started) = draft.stopwatch_started {
        href.push_str(&format!("&started={}", started));
    }
    href
}

// Query params
#[derive(Deserialize)]
pub struct StartQuery {
    date: Option<String>,
}

/// Draft values, from the record page query string or its form.
#[derive(Debug, Default, Deserialize)]
pub struct DraftParams {
    exercise: Option<String>,
    record: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    value: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    weight: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    sets: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    distance: Option<f64>,
    /// Unix second a running stopwatch was started.
    #[serde(default, deserialize_with = "blank_as_none")]
    started: Option<i64>,
}

/// Cleared number inputs submit `name=`; treat that as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

impl DraftParams {
    fn apply(&self, draft: &mut Draft) {
        if let Some(value) = self.value {
            draft.set_value(value);
        }
        if let Some(sets) = self.sets {
            draft.set_multiplier(sets);
        }
        if let Some(weight) = self.weight {
            draft.set_weight(weight);
        }
        if let Some(distance) = self.distance {
            draft.set_distance(distance);
        }
    }
}

/// A stored session, or a fresh one for a date-like id.
async fn load_session(fitness: &FitnessService, user: &AuthUser, id: &str) -> Result<Session> {
    if let Some(session) = fitness.get_one(&user.email, id).await {
        return Ok(session);
    }
    Session::date_from_id(id)
        .map(|date| Session::start(&user.email, date))
        .ok_or_else(|| AppError::NotFound("Invalid session date".to_string()))
}

/// Walk the recorder to the record-exercise view for the given params.
fn open_draft(session: Session, params: &DraftParams) -> Result<SessionRecorder> {
    let mut recorder = SessionRecorder::new(session);

    let record = params.record.as_deref().filter(|s| !s.is_empty());
    let exercise = params.exercise.as_deref().filter(|s| !s.is_empty());
    match (record, exercise) {
        (Some(record_id), _) => recorder.edit_record(record_id)?,
        (None, Some(exercise_id)) => {
            recorder.open_catalog()?;
            recorder.select_exercise(exercise_id)?;
        }
        (None, None) => return Err(AppError::BadRequest("No exercise selected".to_string())),
    }

    params.apply(recorder.draft_mut()?);
    if let Some(started) = params.started {
        recorder.start_stopwatch(started)?;
    }
    Ok(recorder)
}

fn date_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

fn render_summary(
    recorder: &SessionRecorder,
    user: AuthUser,
    notice: Option<&'static str>,
    error: Option<&'static str>,
) -> Result<Html<String>> {
    let session = recorder.session();
    let lines = recorder
        .summary()
        .into_iter()
        .map(|entry| RecordLine::new(entry.record, entry.status))
        .collect();

    let template = SummaryTemplate {
        app: App::Fit,
        user: Some(user),
        session_id: session.id.clone(),
        date_label: date_label(session.date),
        count: recorder.record_count(),
        lines,
        notice,
        error,
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}

/// Redirect to the summary on commit; otherwise show the failed record in place.
fn finish_write(
    recorder: &SessionRecorder,
    user: AuthUser,
    outcome: SaveOutcome,
    jar: CookieJar,
    flash: Flash,
) -> Result<Response> {
    match outcome {
        SaveOutcome::Committed => {
            let to = format!("/session/{}", recorder.session().id);
            Ok((jar.add(create_flash_cookie(flash)), Redirect::to(&to)).into_response())
        }
        SaveOutcome::Failed(_) => {
            Ok(render_summary(recorder, user, None, Some(SAVE_FAILED))?.into_response())
        }
    }
}

// Handlers
pub async fn home(
    State(state): State<FitnessState>,
    OptionalAuthUser(user): OptionalAuthUser,
) -> Result<Response> {
    let recent = match &user {
        Some(user) => state
            .fitness
            .list_for_user(&user.email)
            .await
            .iter()
            .take(RECENT_SESSIONS)
            .map(SessionRow::new)
            .collect(),
        None => Vec::new(),
    };

    let template = HomeTemplate {
        app: App::Fit,
        user,
        today: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
        recent,
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

pub async fn start(_auth_user: AuthUser, Query(query): Query<StartQuery>) -> Result<Response> {
    let today = chrono::Local::now().date_naive();
    let date = match query.date.as_deref().filter(|s| !s.is_empty()) {
        Some(s) => Session::date_from_id(s)
            .ok_or_else(|| AppError::Validation("Invalid date".to_string()))?,
        None => today,
    };

    if date > today {
        return Err(AppError::Validation(
            "Cannot log a session in the future".to_string(),
        ));
    }

    Ok(Redirect::to(&format!("/session/{}", date.format("%Y-%m-%d"))).into_response())
}

pub async fn history(State(state): State<FitnessState>, auth_user: AuthUser) -> Result<Response> {
    let sessions = state
        .fitness
        .list_for_user(&auth_user.email)
        .await
        .iter()
        .map(SessionRow::new)
        .collect();

    let template = HistoryTemplate {
        app: App::Fit,
        user: Some(auth_user),
        sessions,
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

pub async fn summary(
    State(state): State<FitnessState>,
    auth_user: AuthUser,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Response> {
    let session = load_session(&state.fitness, &auth_user, &id).await?;
    let recorder = SessionRecorder::new(session);
    let (jar, flash) = take_flash(jar);

    let page = render_summary(&recorder, auth_user, flash.map(|f| f.message()), None)?;
    Ok((jar, page).into_response())
}

pub async fn select(
    State(state): State<FitnessState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let session = load_session(&state.fitness, &auth_user, &id).await?;
    let mut recorder = SessionRecorder::new(session);
    recorder.open_catalog()?;

    let session = recorder.session();
    let template = SelectTemplate {
        app: App::Fit,
        session_id: session.id.clone(),
        date_label: date_label(session.date),
        exercises: EXERCISES,
        user: Some(auth_user),
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

pub async fn record_page(
    State(state): State<FitnessState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Query(params): Query<DraftParams>,
) -> Result<Response> {
    let session = load_session(&state.fitness, &auth_user, &id).await?;
    let recorder = open_draft(session, &params)?;
    let draft = recorder
        .draft()
        .ok_or_else(|| AppError::Internal("Draft missing after selection".to_string()))?;

    let template = RecordTemplate {
        app: App::Fit,
        session_id: recorder.session().id.clone(),
        form: RecordForm::new(&recorder.session().id, draft, Utc::now().timestamp()),
        user: Some(auth_user),
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

pub async fn save(
    State(state): State<FitnessState>,
    OptionalAuthUser(user): OptionalAuthUser,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(params): Form<DraftParams>,
) -> Result<Response> {
    let user = user.ok_or(AppError::Unauthorized)?;
    let session = load_session(&state.fitness, &user, &id).await?;
    let mut recorder = open_draft(session, &params)?;

    let outcome = recorder.save_record(&state.fitness).await?;
    tracing::debug!(
        "Saved record to session {} for {}: {:?}",
        recorder.session().id,
        user.email,
        outcome
    );

    finish_write(&recorder, user, outcome, jar, Flash::Saved)
}

pub async fn delete(
    State(state): State<FitnessState>,
    OptionalAuthUser(user): OptionalAuthUser,
    jar: CookieJar,
    Path((id, record_id)): Path<(String, String)>,
) -> Result<Response> {
    let user = user.ok_or(AppError::Unauthorized)?;
    let session = state
        .fitness
        .get_one(&user.email, &id)
        .await
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    let mut recorder = SessionRecorder::new(session);
    recorder.edit_record(&record_id)?;
    let outcome = recorder.delete_record(&state.fitness).await?;

    finish_write(&recorder, user, outcome, jar, Flash::Deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_draft_href_carries_kind_fields() {
        let mut draft = Draft::new(catalog::find("goblet-squats").unwrap());
        draft.set_value(8);
        let href = draft_href("2026-03-01", &draft);
        assert_eq!(
            href,
            "/session/2026-03-01/record?exercise=goblet-squats&value=8&sets=1&weight=12"
        );

        let running = Draft::new(catalog::find("running").unwrap());
        assert!(draft_href("s", &running).ends_with("&distance=0"));
    }

    #[test]
    fn test_record_form_controls() {
        let planks = Draft::new(catalog::find("planks").unwrap());
        let form = RecordForm::new("s", &planks, 1_000);
        assert_eq!(form.stopwatch.as_deref(), Some("00:00"));
        assert!(!form.stopwatch_running);
        assert_eq!(form.value_controls.len(), 4);
        assert_eq!(form.value_controls[0].label, "Start");
        assert!(form.value_controls[0].href.ends_with("&started=1000"));
        assert!(form.value_controls[2].href.contains("value=15"));
        assert!(form.show_sets);

        let stretching = Draft::new(catalog::find("stretching").unwrap());
        let form = RecordForm::new("s", &stretching, 1_000);
        assert_eq!(form.stopwatch, None);
        assert_eq!(form.value_caption, "Minutes");
        assert!(!form.show_sets);
    }

    #[test]
    fn test_running_stopwatch_form() {
        let mut planks = Draft::new(catalog::find("planks").unwrap());
        planks.set_value(30);
        planks.start_stopwatch(1_000);

        let form = RecordForm::new("s", &planks, 1_045);
        assert!(form.stopwatch_running);
        assert_eq!(form.stopwatch.as_deref(), Some("01:15"));
        assert_eq!(form.value, 75);
        assert_eq!(form.value_display, "1m 15s");

        let pause = &form.value_controls[0];
        assert_eq!(pause.label, "Pause");
        assert!(pause.href.contains("value=75"));
        assert!(!pause.href.contains("started="));

        // Adjusting keeps the stopwatch running.
        assert!(form.value_controls[2].href.contains("value=45"));
        assert!(form.value_controls[2].href.ends_with("&started=1000"));
    }

    #[test]
    fn test_stopwatch_param_rejected_for_rep_exercises() {
        let session = Session::start("u", NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let params = DraftParams {
            exercise: Some("pushups".to_string()),
            started: Some(1_000),
            ..Default::default()
        };
        let err = open_draft(session, &params).err().unwrap();
        assert!(matches!(
            err,
            AppError::Recorder(crate::recorder::RecorderError::NoStopwatch)
        ));
    }

    #[test]
    fn test_blank_numbers_are_absent() {
        let params: DraftParams =
            serde_json::from_str(r#"{"exercise":"pushups","value":"","weight":" "}"#).unwrap();
        assert_eq!(params.value, None);
        assert_eq!(params.weight, None);

        let params: DraftParams = serde_json::from_str(r#"{"value":"12"}"#).unwrap();
        assert_eq!(params.value, Some(12));

        assert!(serde_json::from_str::<DraftParams>(r#"{"value":"ten"}"#).is_err());
    }

    #[test]
    fn test_open_draft_requires_selection() {
        let session = Session::start("u", NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let err = open_draft(session, &DraftParams::default()).err().unwrap();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_open_draft_applies_values() {
        let session = Session::start("u", NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let params = DraftParams {
            exercise: Some("pushups".to_string()),
            record: Some(String::new()),
            value: Some(10),
            sets: Some(2),
            ..Default::default()
        };
        let recorder = open_draft(session, &params).unwrap();
        let draft = recorder.draft().unwrap();
        assert_eq!(draft.value, 10);
        assert_eq!(draft.multiplier, 2);
        assert!(!draft.is_editing());
    }
}
