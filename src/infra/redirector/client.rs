use reqwest::header::HeaderValue;
use reqwest::{Method, Url};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::auth::AuthorizationInterceptor;
use crate::fetch::{BasicClient, HttpClient, Pipeline};
use crate::services::call::RedirectCall;
use crate::services::redirect_api::RedirectApi;

/// Client bound to one redirector instance.
///
/// ```no_run
/// use redirector_client::{AuthorizationInterceptor, Config, RedirectApi, RedirectorClient};
///
/// # async fn run() -> redirector_client::Result<()> {
/// let config = Config::load();
/// let rule = AuthorizationInterceptor::new("s3cret")?;
/// let client = RedirectorClient::new(&rule, None, &config)?;
///
/// let response = client.create("https://example.com/", "docs")?.execute().await?;
/// assert!(response.success);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RedirectorClient {
    pipeline: Pipeline,
    base_url: Url,
    user_agent: HeaderValue,
}

impl RedirectorClient {
    /// Builds a client on a fresh `reqwest` transport with `rule` as its only
    /// pipeline stage. `base_url` overrides `config.base_url`.
    pub fn new(
        rule: &AuthorizationInterceptor,
        base_url: Option<&str>,
        config: &Config,
    ) -> Result<Self> {
        let pipeline = rule.attach_to_pipeline(&Pipeline::new(BasicClient::new()));
        Self::from_pipeline(pipeline, base_url, config)
    }

    /// Builds a client on `transport` with an empty pipeline.
    pub fn with_transport(
        transport: impl HttpClient + 'static,
        base_url: Option<&str>,
        config: &Config,
    ) -> Result<Self> {
        Self::from_pipeline(Pipeline::new(transport), base_url, config)
    }

    pub fn from_pipeline(
        pipeline: Pipeline,
        base_url: Option<&str>,
        config: &Config,
    ) -> Result<Self> {
        let base_url = parse_base_url(base_url.unwrap_or(config.base_url.as_str()))?;
        let user_agent = config.user_agent();
        let user_agent = HeaderValue::from_str(&user_agent).map_err(|e| Error::InvalidHeader {
            name: user_agent.clone(),
            reason: e.to_string(),
        })?;

        debug!(base_url = %base_url, pipeline = ?pipeline, "Redirector client built");
        Ok(Self {
            pipeline,
            base_url,
            user_agent,
        })
    }

    /// Same client with its pipeline replaced by `pipeline`.
    pub fn with_pipeline(&self, pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, action: &str, key: &str) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url only admits http(s), which always has a path
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(action).push(key);
        }
        url
    }

    fn call(&self, method: Method, url: Url, body: Option<String>) -> RedirectCall {
        RedirectCall::new(
            self.pipeline.clone(),
            method,
            url,
            body,
            self.user_agent.clone(),
        )
    }
}

impl RedirectApi for RedirectorClient {
    fn create(&self, url: &str, key: &str) -> Result<RedirectCall> {
        require("url", url)?;
        require_key(key)?;
        let endpoint = self.endpoint("create", key);
        Ok(self.call(Method::POST, endpoint, Some(url.to_string())))
    }

    fn delete(&self, key: &str) -> Result<RedirectCall> {
        require_key(key)?;
        let endpoint = self.endpoint("delete", key);
        Ok(self.call(Method::DELETE, endpoint, None))
    }
}

fn require(name: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::MissingArgument(name))
    } else {
        Ok(())
    }
}

/// Keys become a single path segment. URL normalization drops `.` and `..`
/// segments, so those keys would address a different endpoint.
fn require_key(key: &str) -> Result<()> {
    require("key", key)?;
    if key == "." || key == ".." {
        return Err(Error::InvalidArgument {
            name: "key",
            reason: "`.` and `..` are not valid path segments",
        });
    }
    Ok(())
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let invalid = |reason: String| Error::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme `{other}`"))),
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::RecordingClient;
    use crate::response::RedirectResponse;

    fn client(transport: &RecordingClient, base_url: &str) -> RedirectorClient {
        RedirectorClient::with_transport(transport.clone(), Some(base_url), &Config::default())
            .unwrap()
    }

    #[test]
    fn test_default_base_url_from_config() {
        let rule = AuthorizationInterceptor::new("token").unwrap();
        let client = RedirectorClient::new(&rule, None, &Config::default()).unwrap();

        assert_eq!(client.base_url().as_str(), "https://seeleft.de/go/api/v1/");
        assert_eq!(client.pipeline().len(), 1);
    }

    #[test]
    fn test_base_url_override_is_verbatim() {
        let rule = AuthorizationInterceptor::new("token").unwrap();
        let config = Config {
            base_url: "https://configured.test/".to_string(),
            ..Config::default()
        };

        let client = RedirectorClient::new(&rule, Some("https://x/"), &config).unwrap();
        assert_eq!(client.base_url().as_str(), "https://x/");

        let client = RedirectorClient::new(&rule, None, &config).unwrap();
        assert_eq!(client.base_url().as_str(), "https://configured.test/");
    }

    #[test]
    fn test_invalid_base_url_fails_at_construction() {
        let transport = RecordingClient::ok();
        let invalid = [
            "",
            "not a url",
            "ftp://host/",
            "mailto:someone@example.com",
            "https://h/?q=1",
        ];
        for url in invalid {
            let result =
                RedirectorClient::with_transport(transport.clone(), Some(url), &Config::default());
            assert!(
                matches!(result, Err(Error::InvalidBaseUrl { .. })),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_create_request_shape() {
        let transport = RecordingClient::ok();
        let client = client(&transport, "https://seeleft.de/go/api/v1/");

        let call = client.create("https://example.com/page", "docs").unwrap();
        let req = call.request();

        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.url().as_str(), "https://seeleft.de/go/api/v1/create/docs");
        assert_eq!(req.headers()["content-type"], "text/plain; charset=utf-8");
        assert_eq!(req.headers()["accept"], "application/json");
        assert_eq!(
            req.body().and_then(|b| b.as_bytes()),
            Some("https://example.com/page".as_bytes())
        );
        assert_eq!(call.body(), Some("https://example.com/page"));
    }

    #[test]
    fn test_delete_request_shape() {
        let transport = RecordingClient::ok();
        let client = client(&transport, "https://h/api");

        let req = client.delete("docs").unwrap().request();

        assert_eq!(req.method(), &Method::DELETE);
        assert_eq!(req.url().as_str(), "https://h/api/delete/docs");
        assert!(req.body().is_none());
        assert!(req.headers().get("content-type").is_none());
    }

    #[test]
    fn test_key_is_encoded_as_single_segment() {
        let transport = RecordingClient::ok();
        let client = client(&transport, "https://h/");

        let call = client.delete("a/b c?").unwrap();
        assert_eq!(call.url().as_str(), "https://h/delete/a%2Fb%20c%3F");
    }

    #[test]
    fn test_user_agent_carries_client_version() {
        let transport = RecordingClient::ok();
        let config = Config {
            client_version: Some("9.9.9".to_string()),
            ..Config::default()
        };
        let client = RedirectorClient::with_transport(transport, None, &config).unwrap();

        let req = client.delete("k").unwrap().request();
        assert_eq!(req.headers()["user-agent"], "redirector-client/9.9.9");
    }

    #[test]
    fn test_missing_arguments_fail_before_io() {
        let transport = RecordingClient::ok();
        let client = client(&transport, "https://h/");

        assert!(matches!(client.create("", "k"), Err(Error::MissingArgument("url"))));
        assert!(matches!(client.create("u", ""), Err(Error::MissingArgument("key"))));
        assert!(matches!(client.create("u", "  "), Err(Error::MissingArgument("key"))));
        assert!(matches!(client.delete(""), Err(Error::MissingArgument("key"))));
        assert_eq!(transport.count(), 0);
    }

    #[test]
    fn test_dot_segment_keys_are_rejected() {
        let transport = RecordingClient::ok();
        let client = client(&transport, "https://h/api/");

        for key in [".", ".."] {
            assert!(matches!(
                client.delete(key),
                Err(Error::InvalidArgument { name: "key", .. })
            ));
            assert!(matches!(
                client.create("https://example.com/", key),
                Err(Error::InvalidArgument { name: "key", .. })
            ));
        }
        assert_eq!(transport.count(), 0);

        // dots inside a key are fine
        let call = client.delete("...").unwrap();
        assert_eq!(call.url().as_str(), "https://h/api/delete/...");
        let call = client.delete("v1.2").unwrap();
        assert_eq!(call.url().as_str(), "https://h/api/delete/v1.2");
    }

    #[tokio::test]
    async fn test_nothing_is_sent_until_executed() {
        let transport = RecordingClient::ok();
        let client = client(&transport, "https://h/");

        let call = client.create("https://example.com/", "k").unwrap();
        assert_eq!(transport.count(), 0);

        let response = call.clone().execute().await.unwrap();
        assert_eq!(response, RedirectResponse::ok());
        call.execute().await.unwrap();
        assert_eq!(transport.count(), 2);
    }

    #[tokio::test]
    async fn test_failure_body_is_returned_on_server_error() {
        let transport = RecordingClient::new(
            500,
            r#"{"success":false,"error":{"name":"Error","message":"Invalid url: nope"}}"#,
        );
        let client = client(&transport, "https://h/");

        let response = client.create("nope", "k").unwrap().execute().await.unwrap();
        assert_eq!(response, RedirectResponse::failed("Invalid url: nope"));
    }

    #[tokio::test]
    async fn test_status_without_json_body() {
        let transport = RecordingClient::new(401, "Unauthorized");
        let client = client(&transport, "https://h/");

        let err = client.delete("k").unwrap().execute().await.unwrap_err();
        match err {
            Error::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let transport = RecordingClient::new(200, "<html></html>");
        let client = client(&transport, "https://h/");

        let err = client.delete("k").unwrap().execute().await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_enqueue_delivers_result_to_callback() {
        let transport = RecordingClient::ok();
        let client = client(&transport, "https://h/");
        let (tx, rx) = tokio::sync::oneshot::channel();

        client
            .delete("k")
            .unwrap()
            .enqueue(move |result| {
                let _ = tx.send(result);
            })
            .await
            .unwrap();

        let response = rx.await.unwrap().unwrap();
        assert!(response.success);
        assert_eq!(transport.count(), 1);
    }
}
