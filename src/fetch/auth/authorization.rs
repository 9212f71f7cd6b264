use crate::error::{Error, Result};
use crate::fetch::pipeline::{Interceptor, Next, Pipeline};
use crate::infra::redirector::RedirectorClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use reqwest::{Request, Response};

/// A pipeline stage that sets a fixed header on every outgoing request.
///
/// The header defaults to `Authorization` and `expect` is the value the
/// redirector compares it against. Any value the request already carries
/// under that name is replaced, not appended to.
///
/// ```no_run
/// use redirector_client::fetch::auth::AuthorizationInterceptor;
///
/// let rule = AuthorizationInterceptor::new("s3cret")?;
/// let custom = AuthorizationInterceptor::with_header("X-Redirector-Token", "s3cret")?;
/// # Ok::<(), redirector_client::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AuthorizationInterceptor {
    header: HeaderName,
    expect: HeaderValue,
}

impl AuthorizationInterceptor {
    pub fn new(expect: &str) -> Result<Self> {
        Self::with_header(AUTHORIZATION.as_str(), expect)
    }

    pub fn with_header(header: &str, expect: &str) -> Result<Self> {
        if header.is_empty() {
            return Err(Error::MissingArgument("header"));
        }
        if expect.is_empty() {
            return Err(Error::MissingArgument("expect"));
        }

        let header = HeaderName::from_bytes(header.as_bytes()).map_err(|e| Error::InvalidHeader {
            name: header.to_string(),
            reason: e.to_string(),
        })?;
        let mut expect = HeaderValue::from_str(expect).map_err(|e| Error::InvalidHeader {
            name: header.to_string(),
            reason: e.to_string(),
        })?;
        expect.set_sensitive(true);

        Ok(Self { header, expect })
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    /// Returns `pipeline` with this interceptor appended as its last stage.
    pub fn attach_to_pipeline(&self, pipeline: &Pipeline) -> Pipeline {
        pipeline.with_stage(self.clone())
    }

    /// Rebuilds an already constructed client so its requests also pass
    /// through this interceptor. The original client keeps its old pipeline.
    pub fn attach_to_client(&self, client: &RedirectorClient) -> RedirectorClient {
        client.with_pipeline(self.attach_to_pipeline(client.pipeline()))
    }
}

#[async_trait]
impl Interceptor for AuthorizationInterceptor {
    async fn intercept(&self, mut req: Request, next: Next<'_>) -> reqwest::Result<Response> {
        tracing::trace!(header = %self.header, url = %req.url(), "Attaching authorization header");
        req.headers_mut().insert(self.header.clone(), self.expect.clone());
        next.run(req).await
    }

    fn name(&self) -> &'static str {
        "authorization"
    }
}
