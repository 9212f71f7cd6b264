//! Abstract view of the redirector's remote API.

pub mod call;
pub mod redirect_api;
