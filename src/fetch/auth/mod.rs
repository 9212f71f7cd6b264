//! Interceptors that authenticate outgoing requests.

mod authorization;

pub use authorization::AuthorizationInterceptor;
