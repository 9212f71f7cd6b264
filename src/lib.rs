//! Typed client for a redirector service: create and delete key → URL
//! redirects, with a fixed authorization header on every request.

pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod response;
pub mod services;

pub use config::Config;
pub use error::{Error, Result};
pub use fetch::auth::AuthorizationInterceptor;
pub use infra::redirector::RedirectorClient;
pub use response::RedirectResponse;
pub use services::call::RedirectCall;
pub use services::redirect_api::RedirectApi;
