use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;

pub const FLASH_COOKIE_NAME: &str = "flash";

/// One-shot notices carried across a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Saved,
    Deleted,
}

impl Flash {
    pub fn code(&self) -> &'static str {
        match self {
            Flash::Saved => "saved",
            Flash::Deleted => "deleted",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "saved" => Some(Flash::Saved),
            "deleted" => Some(Flash::Deleted),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Flash::Saved => "Exercise saved",
            Flash::Deleted => "Exercise deleted",
        }
    }
}

pub fn create_flash_cookie(flash: Flash) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE_NAME, flash.code()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(30))
        .build()
}

pub fn get_flash(jar: &CookieJar) -> Option<Flash> {
    jar.get(FLASH_COOKIE_NAME)
        .and_then(|cookie| Flash::from_code(cookie.value()))
}

pub fn remove_flash_cookie() -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

/// Read the pending notice and clear it from the jar.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    match get_flash(&jar) {
        Some(flash) => (jar.add(remove_flash_cookie()), Some(flash)),
        None => (jar, None),
    }
}
