//! Trait for the redirector's remote operations.

use crate::error::Result;
use crate::services::call::RedirectCall;

/// The two operations a redirector exposes.
///
/// Both methods only validate their arguments and prepare the request; no
/// I/O happens until the returned [`RedirectCall`] is executed. An empty or
/// blank argument fails with [`Error::MissingArgument`](crate::Error::MissingArgument).
pub trait RedirectApi {
    /// Creates the redirect `key` → `url`, replacing any existing one.
    fn create(&self, url: &str, key: &str) -> Result<RedirectCall>;

    /// Deletes the redirect stored under `key`.
    fn delete(&self, key: &str) -> Result<RedirectCall>;
}
