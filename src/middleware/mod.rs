pub mod auth;

pub use auth::{AuthRedirect, AuthUser, IdentityConfig, OptionalAuthUser};
