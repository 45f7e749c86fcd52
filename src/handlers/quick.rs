use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, OptionalAuthUser};
use crate::presentation::App;

#[derive(Template)]
#[template(path = "quick.html")]
struct QuickTemplate {
    app: App,
    user: Option<AuthUser>,
}

pub async fn index(OptionalAuthUser(user): OptionalAuthUser) -> Result<Response> {
    let template = QuickTemplate {
        app: App::Quick,
        user,
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}
