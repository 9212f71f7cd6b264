//! Deferred invocation handle for a single redirector request.

use crate::error::{Error, Result};
use crate::fetch::{HttpClient, Pipeline};
use crate::response::RedirectResponse;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue, USER_AGENT};
use reqwest::{Method, Request, Url};
use tokio::task::JoinHandle;
use tracing::debug;

/// A prepared request that has not been sent yet.
///
/// Execute it with [`execute`](Self::execute) from async code,
/// [`execute_blocking`](Self::execute_blocking) from plain threads, or hand
/// the result to a callback with [`enqueue`](Self::enqueue). Cloning is cheap
/// and each clone sends its own request.
#[derive(Debug, Clone)]
pub struct RedirectCall {
    pipeline: Pipeline,
    method: Method,
    url: Url,
    body: Option<String>,
    user_agent: HeaderValue,
}

impl RedirectCall {
    pub(crate) fn new(
        pipeline: Pipeline,
        method: Method,
        url: Url,
        body: Option<String>,
        user_agent: HeaderValue,
    ) -> Self {
        Self {
            pipeline,
            method,
            url,
            body,
            user_agent,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Builds the request this call sends. Pipeline stages have not run yet,
    /// so interceptor headers are absent.
    pub fn request(&self) -> Request {
        let mut req = Request::new(self.method.clone(), self.url.clone());
        let headers = req.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, self.user_agent.clone());

        if let Some(body) = &self.body {
            req.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            );
            *req.body_mut() = Some(body.clone().into());
        }
        req
    }

    /// Sends the request through the client's pipeline.
    ///
    /// A body that decodes as a [`RedirectResponse`] is returned whatever the
    /// status, since the service reports failures as JSON with status 500.
    #[tracing::instrument(skip(self), fields(method = %self.method, url = %self.url))]
    pub async fn execute(self) -> Result<RedirectResponse> {
        let response = self.pipeline.execute(self.request()).await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "Redirector responded");

        match serde_json::from_str::<RedirectResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(Error::Status { status, body }),
            Err(e) => Err(Error::Decode(e)),
        }
    }

    /// Sends the request on a private single-threaded runtime and waits for
    /// the result.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a tokio runtime.
    pub fn execute_blocking(self) -> Result<RedirectResponse> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.execute())
    }

    /// Spawns the call on the current tokio runtime and passes its result to
    /// `callback` once it completes.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn enqueue<F>(self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<RedirectResponse>) + Send + 'static,
    {
        tokio::spawn(async move { callback(self.execute().await) })
    }
}
