//! Client layer: builds authenticated requests, sends them and classifies the outcome.

mod context;

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub use context::{CallContext, ContextError};

use crate::domain::{ApiKey, ApiSecret, ValidationError};
use crate::error::{ApiError, as_api_error};
use crate::messages::MessagesService;
use crate::transport::{
    CONTENT_TYPE_JSON, HttpRequest, HttpTransport, ReqwestTransport, build_url, encode_json_body,
};

/// Default SignalAds API root.
pub const DEFAULT_BASE_URL: &str = "https://panel.signalads.com/api/v1";

/// Default timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
/// API key and secret sent with every request.
pub struct Credentials {
    api_key: ApiKey,
    api_secret: ApiSecret,
}

impl Credentials {
    /// Validate and pair the API key and secret. Both must be non-empty.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            api_key: ApiKey::new(api_key)?,
            api_secret: ApiSecret::new(api_secret)?,
        })
    }

    pub fn from_parts(api_key: ApiKey, api_secret: ApiSecret) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn api_secret(&self) -> &ApiSecret {
        &self.api_secret
    }

    fn push_headers(&self, headers: &mut Vec<(&'static str, String)>) {
        headers.push((ApiKey::HEADER, self.api_key.as_str().to_owned()));
        headers.push((ApiSecret::HEADER, self.api_secret.as_str().to_owned()));
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SignalAdsClient`].
///
/// Use the predicates in [`crate::error`] (or [`SignalAdsError::api_error`]) to
/// inspect API failures; they see through [`SignalAdsError::Context`].
pub enum SignalAdsError {
    /// A required argument was missing; nothing was sent.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The URL or JSON body could not be built; nothing was sent.
    #[error("failed to build request: {0}")]
    RequestBuild(#[source] Box<dyn StdError + Send + Sync>),

    /// Network failure (DNS, connect, TLS, timeout) or the call's context ended.
    #[error("request failed: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The server answered with a non-2xx status.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// A 2xx body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),

    /// An error annotated by a convenience method.
    #[error("{context}: {source}")]
    Context {
        context: &'static str,
        #[source]
        source: Box<SignalAdsError>,
    },
}

impl SignalAdsError {
    pub(crate) fn context(self, context: &'static str) -> Self {
        Self::Context {
            context,
            source: Box::new(self),
        }
    }

    /// The error with every [`SignalAdsError::Context`] layer removed.
    pub fn root(&self) -> &SignalAdsError {
        let mut current = self;
        while let Self::Context { source, .. } = current {
            current = &**source;
        }
        current
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        as_api_error(self)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.root(), Self::Validation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self.root(), Self::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self.root(), Self::Decode(_))
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SignalAdsClient`].
///
/// Use this when you need a different base URL, timeout, user-agent or HTTP client.
pub struct SignalAdsClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
    http_client: Option<reqwest::Client>,
}

impl SignalAdsClientBuilder {
    /// Create a builder with [`DEFAULT_BASE_URL`] and [`DEFAULT_TIMEOUT`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            http_client: None,
        }
    }

    /// Override the API root. Request paths are appended to it verbatim.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Timeout applied to each request, from connect until the body is read.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header. Ignored when [`Self::http_client`] is set.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a preconfigured `reqwest` client (proxies, pools, custom TLS).
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build a [`SignalAdsClient`].
    pub fn build(self) -> Result<SignalAdsClient, SignalAdsError> {
        let client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                builder
                    .build()
                    .map_err(|err| SignalAdsError::Transport(Box::new(err)))?
            }
        };

        Ok(SignalAdsClient {
            credentials: self.credentials,
            base_url: self.base_url,
            timeout: self.timeout,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// SignalAds API client.
///
/// One instance can serve concurrent calls; nothing is mutated after construction.
/// The generic verbs ([`get`](Self::get), [`post`](Self::post), [`put`](Self::put),
/// [`delete`](Self::delete), [`execute`](Self::execute)) reach any endpoint, and
/// [`messages`](Self::messages) wraps the messaging endpoints.
///
/// Every request carries `Content-Type: application/json`,
/// `Accept: application/json`, `X-API-Key` and `X-API-Secret`.
pub struct SignalAdsClient {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
    http: Arc<dyn HttpTransport>,
}

impl SignalAdsClient {
    /// Create a client with the default base URL and timeout.
    ///
    /// For more customization, use [`SignalAdsClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    pub fn builder(credentials: Credentials) -> SignalAdsClientBuilder {
        SignalAdsClientBuilder::new(credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Messaging endpoints (send, list, status, account info).
    pub fn messages(&self) -> MessagesService<'_> {
        MessagesService::new(self)
    }

    /// `GET {base_url}{path}` with optional query parameters, decoding the body into `T`.
    pub async fn get<T>(
        &self,
        ctx: &CallContext,
        path: &str,
        query: Option<&BTreeMap<String, String>>,
    ) -> Result<T, SignalAdsError>
    where
        T: DeserializeOwned,
    {
        let body = self.execute::<()>(ctx, Method::GET, path, None, query).await?;
        decode(&body)
    }

    /// `POST {base_url}{path}` with an optional JSON body, decoding the response into `T`.
    pub async fn post<B, T>(
        &self,
        ctx: &CallContext,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, SignalAdsError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(ctx, Method::POST, path, body, None).await?;
        decode(&body)
    }

    /// `PUT {base_url}{path}` with an optional JSON body, decoding the response into `T`.
    pub async fn put<B, T>(
        &self,
        ctx: &CallContext,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, SignalAdsError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(ctx, Method::PUT, path, body, None).await?;
        decode(&body)
    }

    /// `DELETE {base_url}{path}`, decoding the response into `T`.
    pub async fn delete<T>(&self, ctx: &CallContext, path: &str) -> Result<T, SignalAdsError>
    where
        T: DeserializeOwned,
    {
        let body = self
            .execute::<()>(ctx, Method::DELETE, path, None, None)
            .await?;
        decode(&body)
    }

    /// Send one request and return the raw 2xx body without decoding it.
    ///
    /// Errors:
    /// - [`SignalAdsError::RequestBuild`] when the URL or body cannot be built,
    /// - [`SignalAdsError::Transport`] for network failures and when `ctx` is
    ///   cancelled or its deadline passes (the request is aborted),
    /// - [`SignalAdsError::Api`] for any non-2xx status, classified by
    ///   [`ApiError::from_response`].
    pub async fn execute<B>(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&BTreeMap<String, String>>,
    ) -> Result<Vec<u8>, SignalAdsError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(ctx, method, path, body, query)?;
        ctx.check()
            .map_err(|err| SignalAdsError::Transport(Box::new(err)))?;

        debug!(method = %request.method, path, "sending request");
        // Dropping the losing branch aborts the in-flight request.
        let response = tokio::select! {
            biased;
            reason = ctx.done() => {
                debug!(path, reason = %reason, "request aborted by context");
                return Err(SignalAdsError::Transport(Box::new(reason)));
            }
            response = self.http.send(request) => response.map_err(SignalAdsError::Transport)?,
        };
        debug!(path, status = response.status, "received response");

        if !response.is_success() {
            let api_error = ApiError::from_response(response.status, &response.body);
            debug!(
                path,
                status = api_error.status_code,
                code = %api_error.code,
                "API returned an error"
            );
            return Err(SignalAdsError::Api(api_error));
        }

        Ok(response.body)
    }

    fn build_request<B>(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&BTreeMap<String, String>>,
    ) -> Result<HttpRequest, SignalAdsError>
    where
        B: Serialize + ?Sized,
    {
        let url = build_url(&self.base_url, path, query)
            .map_err(|err| SignalAdsError::RequestBuild(Box::new(err)))?;
        let body =
            encode_json_body(body).map_err(|err| SignalAdsError::RequestBuild(Box::new(err)))?;

        let mut headers = vec![
            ("Content-Type", CONTENT_TYPE_JSON.to_owned()),
            ("Accept", CONTENT_TYPE_JSON.to_owned()),
        ];
        self.credentials.push_headers(&mut headers);

        let timeout = ctx
            .remaining()
            .map_or(self.timeout, |left| left.min(self.timeout));

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: Some(timeout),
        })
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, SignalAdsError> {
    serde_json::from_slice(body).map_err(|err| SignalAdsError::Decode(Box::new(err)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde_json::{Value, json};
    use tokio_util::sync::CancellationToken;

    use crate::error::{self, codes};
    use crate::transport::{BoxFuture, HttpResponse};

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        requests: Vec<HttpRequest>,
        response_status: u16,
        response_body: Vec<u8>,
        hang: bool,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<Vec<u8>>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    requests: Vec::new(),
                    response_status,
                    response_body: response_body.into(),
                    hang: false,
                })),
            }
        }

        fn hanging() -> Self {
            let transport = Self::new(200, "{}");
            transport.state.lock().unwrap().hang = true;
            transport
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.state.lock().unwrap().requests.clone()
        }

        fn last_request(&self) -> HttpRequest {
            self.requests().pop().expect("no request was sent")
        }
    }

    impl HttpTransport for FakeTransport {
        fn send<'a>(
            &'a self,
            request: HttpRequest,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let (status, body, hang) = {
                    let mut state = self.state.lock().unwrap();
                    state.requests.push(request);
                    (
                        state.response_status,
                        state.response_body.clone(),
                        state.hang,
                    )
                };
                if hang {
                    std::future::pending::<()>().await;
                }
                Ok(HttpResponse { status, body })
            })
        }
    }

    fn make_client(transport: FakeTransport) -> SignalAdsClient {
        SignalAdsClient {
            credentials: Credentials::new("test-key", "test-secret").unwrap(),
            base_url: "https://example.invalid/api/v1".to_owned(),
            timeout: Duration::from_secs(5),
            http: Arc::new(transport),
        }
    }

    fn context_error(err: &SignalAdsError) -> Option<ContextError> {
        match err.root() {
            SignalAdsError::Transport(source) => source.downcast_ref::<ContextError>().copied(),
            _ => None,
        }
    }

    #[tokio::test]
    async fn get_sends_headers_and_query() {
        let transport = FakeTransport::new(200, r#"{"status":"ok"}"#);
        let client = make_client(transport.clone());
        let query = BTreeMap::from([("test".to_owned(), "value".to_owned())]);

        let result: HashMap<String, String> = client
            .get(&CallContext::background(), "/test", Some(&query))
            .await
            .unwrap();
        assert_eq!(result.get("status").map(String::as_str), Some("ok"));

        let request = transport.last_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.url.as_str(),
            "https://example.invalid/api/v1/test?test=value"
        );
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.header("X-API-Key"), Some("test-key"));
        assert_eq!(request.header("X-API-Secret"), Some("test-secret"));
        assert_eq!(request.body, None);
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn post_serializes_json_body() {
        let transport = FakeTransport::new(200, r#"{"id":"1"}"#);
        let client = make_client(transport.clone());
        let body = json!({"to": "+1234567890", "message": "hi"});

        let result: Value = client
            .post(&CallContext::background(), "/send-message/single", Some(&body))
            .await
            .unwrap();
        assert_eq!(result["id"], "1");

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.url.as_str(),
            "https://example.invalid/api/v1/send-message/single"
        );
        let sent: Value = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[tokio::test]
    async fn put_and_delete_use_their_methods() {
        let transport = FakeTransport::new(200, "{}");
        let client = make_client(transport.clone());
        let ctx = CallContext::background();

        let _: Value = client
            .put(&ctx, "/resource/1", Some(&json!({"name": "x"})))
            .await
            .unwrap();
        let _: Value = client.delete(&ctx, "/resource/1").await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::PUT);
        assert!(requests[0].body.is_some());
        assert_eq!(requests[1].method, Method::DELETE);
        assert_eq!(requests[1].body, None);
    }

    #[tokio::test]
    async fn error_body_becomes_api_error_with_backfilled_status() {
        let transport = FakeTransport::new(400, r#"{"message":"Test error"}"#);
        let client = make_client(transport);

        let err = client
            .get::<Value>(&CallContext::background(), "/test", None)
            .await
            .unwrap_err();
        let api_error = err.api_error().expect("typed API error");
        assert_eq!(api_error.message, "Test error");
        assert_eq!(api_error.status_code, 400);
        assert_eq!(err.to_string(), "Test error");
        assert!(error::is_bad_request(&err));
    }

    #[tokio::test]
    async fn non_json_error_body_is_synthesized_from_status() {
        let transport = FakeTransport::new(503, "upstream down");
        let client = make_client(transport);

        let err = client
            .get::<Value>(&CallContext::background(), "/test", None)
            .await
            .unwrap_err();
        assert_eq!(error::error_code_of(&err), codes::SERVICE_UNAVAILABLE);
        assert_eq!(error::status_code_of(&err), 503);
        assert_eq!(err.to_string(), "API error: status 503, body: upstream down");
    }

    #[tokio::test]
    async fn invalid_success_body_is_decode_error() {
        let transport = FakeTransport::new(200, "{ not json }");
        let client = make_client(transport);

        let err = client
            .get::<Value>(&CallContext::background(), "/test", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SignalAdsError::Decode(_)));
        assert!(!error::is_api_error(&err));
    }

    #[tokio::test]
    async fn mismatched_success_body_is_decode_error() {
        #[derive(Debug, serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            id: String,
        }

        let transport = FakeTransport::new(200, r#"{"id": 42}"#);
        let client = make_client(transport);

        let err = client
            .get::<Expected>(&CallContext::background(), "/test", None)
            .await
            .unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn empty_success_body_fails_to_decode() {
        let transport = FakeTransport::new(200, "");
        let client = make_client(transport);

        let err = client
            .get::<Value>(&CallContext::background(), "/test", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SignalAdsError::Decode(_)));
    }

    #[tokio::test]
    async fn execute_returns_raw_body_without_decoding() {
        let transport = FakeTransport::new(204, "");
        let client = make_client(transport.clone());

        let body = client
            .execute::<()>(
                &CallContext::background(),
                Method::DELETE,
                "/resource/1",
                None,
                None,
            )
            .await
            .unwrap();
        assert!(body.is_empty());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn unserializable_body_is_request_build_error() {
        let transport = FakeTransport::new(200, "{}");
        let client = make_client(transport.clone());
        let body = BTreeMap::from([((1, 2), "tuple keys are not JSON")]);

        let err = client
            .post::<_, Value>(&CallContext::background(), "/test", Some(&body))
            .await
            .unwrap_err();
        assert!(matches!(err, SignalAdsError::RequestBuild(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn invalid_base_url_is_request_build_error() {
        let transport = FakeTransport::new(200, "{}");
        let mut client = make_client(transport.clone());
        client.base_url = "not a url".to_owned();

        let err = client
            .get::<Value>(&CallContext::background(), "/test", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SignalAdsError::RequestBuild(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn cancelled_context_fails_before_sending() {
        let transport = FakeTransport::new(200, "{}");
        let client = make_client(transport.clone());
        let token = CancellationToken::new();
        token.cancel();

        let err = client
            .get::<Value>(&CallContext::with_cancellation(token), "/test", None)
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(context_error(&err), Some(ContextError::Canceled));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn cancellation_aborts_in_flight_request() {
        let transport = FakeTransport::hanging();
        let client = make_client(transport.clone());
        let token = CancellationToken::new();
        let ctx = CallContext::with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
        let err = client.get::<Value>(&ctx, "/test", None).await.unwrap_err();
        canceller.await.unwrap();

        assert_eq!(context_error(&err), Some(ContextError::Canceled));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn deadline_aborts_in_flight_request() {
        let transport = FakeTransport::hanging();
        let client = make_client(transport);
        let ctx = CallContext::with_timeout(Duration::from_millis(20));

        let err = client.get::<Value>(&ctx, "/test", None).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(context_error(&err), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn request_timeout_is_capped_by_context_deadline() {
        let transport = FakeTransport::new(200, "{}");
        let client = make_client(transport.clone());

        let ctx = CallContext::with_timeout(Duration::from_secs(1));
        client.get::<Value>(&ctx, "/test", None).await.unwrap();
        let timeout = transport.last_request().timeout.unwrap();
        assert!(timeout <= Duration::from_secs(1));
        assert!(timeout > Duration::ZERO);

        let ctx = CallContext::with_timeout(Duration::from_secs(60));
        client.get::<Value>(&ctx, "/test", None).await.unwrap();
        assert_eq!(
            transport.last_request().timeout,
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn context_wrapping_keeps_api_error_visible() {
        let err = SignalAdsError::Api(ApiError::not_found()).context("failed to get message status");
        assert_eq!(
            err.to_string(),
            "failed to get message status: Resource not found"
        );
        assert!(error::is_not_found(&err));
        assert_eq!(err.api_error(), Some(&ApiError::not_found()));
        assert!(matches!(err.root(), SignalAdsError::Api(_)));
    }

    #[test]
    fn credentials_validate_inputs() {
        assert!(Credentials::new("", "secret").is_err());
        assert!(Credentials::new("key", "").is_err());
        let credentials = Credentials::new("key", "secret").unwrap();
        assert_eq!(credentials.api_key().as_str(), "key");
        assert_eq!(credentials.api_secret().as_str(), "secret");
    }

    #[test]
    fn new_uses_defaults() {
        let client = SignalAdsClient::new(Credentials::new("key", "secret").unwrap());
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides_are_applied() {
        let client = SignalAdsClient::builder(Credentials::new("key", "secret").unwrap())
            .base_url("https://custom.example.com/api")
            .timeout(Duration::from_secs(60))
            .user_agent("signalads-tests")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://custom.example.com/api");
        assert_eq!(client.timeout(), Duration::from_secs(60));

        let client = SignalAdsClient::builder(Credentials::new("key", "secret").unwrap())
            .http_client(reqwest::Client::new())
            .build()
            .unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }
}
