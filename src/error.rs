//! Error type shared by the redirector client.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was empty. Raised before any request is built.
    #[error("missing required argument `{0}`")]
    MissingArgument(&'static str),

    /// A required argument was present but unusable.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },

    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request to redirector failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode redirector response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Non-success status whose body was not a redirector response.
    #[error("redirector returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The blocking executor could not start its runtime.
    #[error("failed to start runtime for blocking call: {0}")]
    Runtime(#[from] std::io::Error),

    /// The service answered but reported `success: false`.
    #[error("redirector rejected the request: {0}")]
    Rejected(String),
}
