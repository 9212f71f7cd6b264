//! HTTP implementation of [`RedirectApi`](crate::services::redirect_api::RedirectApi).

mod client;

pub use client::RedirectorClient;
