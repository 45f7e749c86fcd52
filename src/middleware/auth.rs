use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};

/// Where the caller's identity comes from. Installed as a router extension.
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    /// Lower-case header name set by the authenticating proxy.
    pub header: String,
    /// When set, every request is this user.
    pub mock_identity: Option<String>,
}

impl IdentityConfig {
    pub fn from_header(header: impl Into<String>) -> Self {
        Self {
            header: header.into().to_ascii_lowercase(),
            mock_identity: None,
        }
    }

    pub fn mock(identity: impl Into<String>) -> Self {
        Self {
            header: crate::config::DEFAULT_IDENTITY_HEADER.to_string(),
            mock_identity: Some(identity.into()),
        }
    }

    fn resolve(&self, parts: &Parts) -> Option<AuthUser> {
        if let Some(email) = &self.mock_identity {
            return Some(AuthUser {
                email: email.clone(),
            });
        }

        let email = parts
            .headers
            .get(self.header.as_str())?
            .to_str()
            .ok()?
            .trim();

        if email.is_empty() {
            return None;
        }
        Some(AuthUser {
            email: email.to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
}

fn identity(parts: &Parts) -> Option<AuthUser> {
    match parts.extensions.get::<IdentityConfig>() {
        Some(config) => config.resolve(parts),
        None => {
            tracing::warn!("No identity config installed; treating request as anonymous");
            None
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity(parts).ok_or(AuthRedirect)
    }
}

pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/").into_response()
    }
}

// Optional auth - doesn't redirect, just returns None when anonymous
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(identity(parts)))
    }
}
