//! Transport seam for redirector requests.
//!
//! [`HttpClient`] is the async trait every sender implements. [`BasicClient`]
//! is the bare `reqwest` transport and [`Pipeline`] puts an ordered chain of
//! [`Interceptor`]s in front of one. Authentication stages live in [`auth`].

mod client;
mod basic;
pub mod auth;
pub mod pipeline;
#[cfg(test)]
pub(crate) mod testing;

pub use client::HttpClient;
pub use basic::BasicClient;
pub use pipeline::{Interceptor, Next, Pipeline};
