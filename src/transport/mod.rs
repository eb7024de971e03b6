//! Transport layer: HTTP and wire-format details (URL building, JSON bodies, lenient decoding).

mod money;
mod null;
pub(crate) mod timestamp;

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use url::Url;

pub(crate) use null::null_as_default;

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub(crate) const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub(crate) struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    #[cfg(test)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

pub(crate) trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    pub client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = self.client.request(request.method, request.url);
            for (name, value) in request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }
            if let Some(timeout) = request.timeout {
                builder = builder.timeout(timeout);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?.to_vec();
            Ok(HttpResponse { status, body })
        })
    }
}

/// Join `base_url` and `path` verbatim, then merge `query` into the query string.
///
/// A query parameter replaces every existing pair with the same key. The merged
/// query is re-encoded with keys in sorted order.
pub(crate) fn build_url(
    base_url: &str,
    path: &str,
    query: Option<&BTreeMap<String, String>>,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{base_url}{path}"))?;

    if let Some(query) = query.filter(|query| !query.is_empty()) {
        let mut pairs = url
            .query_pairs()
            .filter(|(key, _)| !query.contains_key(&**key))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect::<Vec<_>>();
        pairs.extend(query.iter().map(|(key, value)| (key.clone(), value.clone())));
        pairs.sort_by(|left, right| left.0.cmp(&right.0));

        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    Ok(url)
}

pub(crate) fn encode_json_body<B>(body: Option<&B>) -> Result<Option<Vec<u8>>, serde_json::Error>
where
    B: Serialize + ?Sized,
{
    body.map(serde_json::to_vec).transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn build_url_concatenates_verbatim() {
        let url = build_url("https://example.invalid/api/v1", "/messages", None).unwrap();
        assert_eq!(url.as_str(), "https://example.invalid/api/v1/messages");

        let url = build_url("https://example.invalid/api/v1/", "/messages", None).unwrap();
        assert_eq!(url.as_str(), "https://example.invalid/api/v1//messages");
    }

    #[test]
    fn build_url_encodes_query_parameters() {
        let params = query(&[("per_page", "10"), ("page", "2"), ("q", "a b&c")]);
        let url = build_url("https://example.invalid", "/messages", Some(&params)).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.invalid/messages?page=2&per_page=10&q=a+b%26c"
        );
    }

    #[test]
    fn build_url_parameters_replace_existing_pairs() {
        let params = query(&[("page", "3")]);
        let url = build_url(
            "https://example.invalid",
            "/messages?page=1&page=2&status=sent",
            Some(&params),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.invalid/messages?page=3&status=sent"
        );
    }

    #[test]
    fn build_url_leaves_query_alone_when_params_are_empty() {
        let url = build_url(
            "https://example.invalid",
            "/messages?z=1&a=2",
            Some(&BTreeMap::new()),
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://example.invalid/messages?z=1&a=2");
    }

    #[test]
    fn build_url_rejects_invalid_base() {
        assert!(build_url("not a url", "/messages", None).is_err());
    }

    #[test]
    fn encode_json_body_handles_absent_body() {
        assert_eq!(encode_json_body::<()>(None).unwrap(), None);

        let body = json!({"to": "+1"});
        let encoded = encode_json_body(Some(&body)).unwrap().unwrap();
        assert_eq!(encoded, br#"{"to":"+1"}"#.to_vec());
    }
}
