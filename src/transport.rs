//! Thin HTTP wrapper over the venue's REST API.
//!
//! Attaches identity/auth headers, performs GET/POST/form-POST, and
//! normalizes every response into the `{code, data, message}` envelope.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SdkError};

/// Header carrying the caller's wallet address on every request.
const ADDRESS_HEADER: &str = "x-meridian-address";

/// The `{code, data, message}` wrapper used by every server response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    // No `default` attribute here: serde already maps a missing field to
    // `None`, and the attribute would force a `T: Default` bound onto the
    // derived `Deserialize` impl.
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// `code == 200` signals success by convention; anything else becomes a
    /// `Server` error carrying the server message verbatim when present.
    pub fn into_data(self) -> Result<T> {
        match self.check()?.data {
            Some(data) => Ok(data),
            None => Err(SdkError::Server {
                code: 200,
                message: "missing response payload".to_string(),
            }),
        }
    }

    /// Like [`Envelope::into_data`] but tolerates a success envelope with no
    /// payload.
    pub fn into_data_or_default(self) -> Result<T>
    where
        T: Default,
    {
        Ok(self.check()?.data.unwrap_or_default())
    }

    fn check(self) -> Result<Self> {
        if self.code == 200 {
            Ok(self)
        } else {
            Err(SdkError::Server {
                code: self.code,
                message: self
                    .message
                    .unwrap_or_else(|| format!("request failed with code {}", self.code)),
            })
        }
    }
}

/// List payloads arrive either bare (`[...]`) or wrapped (`{"data": [...]}`);
/// both normalize to a plain `Vec`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Bare(items) => items,
            ListPayload::Wrapped { data } => data,
        }
    }
}

impl<T> Default for ListPayload<T> {
    fn default() -> Self {
        ListPayload::Bare(Vec::new())
    }
}

/// Ordered flat key/value fields for a form-urlencoded POST.
#[derive(Debug, Clone, Default)]
pub struct FormBody {
    fields: Vec<(String, String)>,
}

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    /// Absent values are omitted from the body entirely.
    pub fn opt_field(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    /// Structured values are JSON-stringified into a single field.
    pub fn json_field(self, key: &str, value: &impl Serialize) -> Result<Self> {
        let encoded = serde_json::to_string(value)?;
        Ok(self.field(key, encoded))
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.fields
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP client bound to one base URL and one caller identity.
pub struct HttpClient {
    client: Client,
    base_url: String,
    address: String,
    auth_token: Option<String>,
}

impl HttpClient {
    pub fn new(base_url: &str, address: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            address: address.to_string(),
            auth_token: None,
        })
    }

    /// Set or replace the bearer auth token. Not thread-safe for rotation:
    /// callers must not rotate the token while requests are in flight.
    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.auth_token = token;
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Envelope<T>> {
        let url = format!("{}{}", self.base_url, path);
        self.execute(self.client.get(&url).query(query)).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Envelope<T>> {
        let url = format!("{}{}", self.base_url, path);
        self.execute(self.client.post(&url).json(body)).await
    }

    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &FormBody,
    ) -> Result<Envelope<T>> {
        let url = format!("{}{}", self.base_url, path);
        self.execute(self.client.post(&url).form(body.pairs())).await
    }

    fn decorate(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(ADDRESS_HEADER, &self.address);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Envelope<T>> {
        let response = self
            .decorate(builder)
            .send()
            .await
            .map_err(|e| SdkError::Transport(transport_message(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SdkError::Transport(transport_message(&e)))?;

        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => {
                // No parseable envelope; prefer a server-supplied message
                // field, fall back to the HTTP status.
                let message = serde_json::from_str::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|v| v.get("message")?.as_str().map(str::to_string))
                    .unwrap_or_else(|| format!("HTTP {}", status));
                Err(SdkError::Transport(message))
            }
            Err(parse_err) => Err(SdkError::Serialization(format!(
                "unexpected response body: {}",
                parse_err
            ))),
        }
    }
}

fn transport_message(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Row {
        id: u64,
    }

    #[test]
    fn test_list_payload_shapes_normalize_identically() {
        let bare: ListPayload<Row> = serde_json::from_str(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        let wrapped: ListPayload<Row> =
            serde_json::from_str(r#"{"data": [{"id": 1}, {"id": 2}]}"#).unwrap();
        assert_eq!(bare.into_vec(), wrapped.into_vec());
    }

    #[test]
    fn test_envelope_server_message_verbatim() {
        let envelope: Envelope<Row> =
            serde_json::from_str(r#"{"code": 404, "message": "not found"}"#).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.to_string(), "not found");
        assert!(matches!(err, SdkError::Server { code: 404, .. }));
    }

    #[test]
    fn test_envelope_missing_message_fallback() {
        let envelope: Envelope<Row> = serde_json::from_str(r#"{"code": 500}"#).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.to_string(), "request failed with code 500");
    }

    #[test]
    fn test_envelope_success_unwraps_data() {
        let envelope: Envelope<Row> =
            serde_json::from_str(r#"{"code": 200, "data": {"id": 7}}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap(), Row { id: 7 });
    }

    #[test]
    fn test_envelope_missing_data_needs_no_default_bound() {
        // Row implements no Default; a missing data field must still
        // deserialize to None
        let envelope: Envelope<Row> = serde_json::from_str(r#"{"code": 200}"#).unwrap();
        assert!(envelope.data.is_none());
        assert!(envelope.message.is_none());
    }

    #[test]
    fn test_envelope_success_without_payload_defaults() {
        let envelope: Envelope<ListPayload<Row>> =
            serde_json::from_str(r#"{"code": 200}"#).unwrap();
        assert!(envelope.into_data_or_default().unwrap().into_vec().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_surfaces_as_transport_error_within_bound() {
        use std::time::{Duration, Instant};

        // Accepts the TCP connection into the backlog but never responds
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = HttpClient::new(
            &format!("http://{}", addr),
            "TestAddress111",
            Duration::from_millis(300),
        )
        .unwrap();

        let started = Instant::now();
        let err = client
            .get::<serde_json::Value>("/api/v1/account/info", &[])
            .await
            .unwrap_err();
        let elapsed = started.elapsed();

        match err {
            SdkError::Transport(message) => assert!(!message.is_empty()),
            other => panic!("expected transport error, got {:?}", other),
        }
        assert!(elapsed < Duration::from_secs(5), "took {:?}", elapsed);
    }

    #[test]
    fn test_form_body_omits_absent_and_stringifies_json() {
        let hashes = vec!["0xaa".to_string(), "0xbb".to_string()];
        let body = FormBody::new()
            .field("symbol", "BTC-PERP")
            .opt_field("price", None::<String>)
            .json_field("orderHashes", &hashes)
            .unwrap();

        assert_eq!(body.get("symbol"), Some("BTC-PERP"));
        assert_eq!(body.get("price"), None);
        assert_eq!(body.get("orderHashes"), Some(r#"["0xaa","0xbb"]"#));
    }
}
