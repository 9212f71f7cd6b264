//! In-memory transport for exercising pipelines without a network.

use super::client::HttpClient;
use async_trait::async_trait;
use reqwest::{Request, Response};
use std::sync::{Arc, Mutex};

/// Records every request it receives and answers with a canned JSON body.
#[derive(Clone)]
pub(crate) struct RecordingClient {
    requests: Arc<Mutex<Vec<Request>>>,
    status: u16,
    body: String,
}

impl RecordingClient {
    pub(crate) fn new(status: u16, body: &str) -> Self {
        Self {
            requests: Arc::default(),
            status,
            body: body.to_string(),
        }
    }

    pub(crate) fn ok() -> Self {
        Self::new(200, r#"{"success":true,"error":null}"#)
    }

    pub(crate) fn take(&self) -> Vec<Request> {
        std::mem::take(&mut *self.requests.lock().unwrap())
    }

    pub(crate) fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpClient for RecordingClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.requests.lock().unwrap().push(req);
        let response = http::Response::builder()
            .status(self.status)
            .header("content-type", "application/json")
            .body(self.body.clone())
            .unwrap();
        Ok(Response::from(response))
    }
}
