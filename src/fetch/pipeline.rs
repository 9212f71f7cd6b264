//! Ordered interceptor chain in front of a transport.
//!
//! A [`Pipeline`] is immutable once built. Adding a stage with
//! [`Pipeline::with_stage`] returns a new pipeline sharing the transport and
//! the existing stages, so a pipeline already handed to a client can be
//! extended without touching that client.

use super::client::HttpClient;
use async_trait::async_trait;
use reqwest::{Request, Response};
use std::fmt;
use std::sync::Arc;

/// One stage of a [`Pipeline`].
///
/// Implementations may rewrite the request before calling [`Next::run`] and
/// may inspect the response it returns. Stages run concurrently for
/// concurrent requests, so they must not rely on per-call mutable state.
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn intercept(&self, req: Request, next: Next<'_>) -> reqwest::Result<Response>;

    fn name(&self) -> &'static str {
        "interceptor"
    }
}

/// The remainder of the chain after the current stage.
pub struct Next<'a> {
    stages: &'a [Arc<dyn Interceptor>],
    transport: &'a dyn HttpClient,
}

impl Next<'_> {
    pub async fn run(self, req: Request) -> reqwest::Result<Response> {
        match self.stages.split_first() {
            Some((stage, rest)) => {
                let next = Next {
                    stages: rest,
                    transport: self.transport,
                };
                stage.intercept(req, next).await
            }
            None => self.transport.execute(req).await,
        }
    }
}

#[derive(Clone)]
pub struct Pipeline {
    transport: Arc<dyn HttpClient>,
    stages: Arc<[Arc<dyn Interceptor>]>,
}

impl Pipeline {
    pub fn new(transport: impl HttpClient + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            stages: Vec::new().into(),
        }
    }

    /// Returns a copy of this pipeline with `stage` appended after the
    /// existing stages. `self` is left unchanged.
    pub fn with_stage(&self, stage: impl Interceptor + 'static) -> Self {
        let mut stages = self.stages.to_vec();
        stages.push(Arc::new(stage));
        Self {
            transport: Arc::clone(&self.transport),
            stages: stages.into(),
        }
    }

    /// Number of stages, excluding the transport.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|stage| stage.name())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HttpClient for Pipeline {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        let next = Next {
            stages: &self.stages,
            transport: self.transport.as_ref(),
        };
        next.run(req).await
    }
}
