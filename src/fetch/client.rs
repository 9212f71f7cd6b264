use async_trait::async_trait;
use reqwest::{Request, Response};

/// Anything that can send a fully built request: the bare transport, or a
/// [`Pipeline`](super::Pipeline) of interceptors in front of one.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
