use crate::http_client::Transport;
use hyper::StatusCode;
use reqwest::Url;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt::Display;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch document: {} {status_text}", .status.as_u16())]
    Fetch {
        status: StatusCode,
        status_text: String,
    },
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to reach {url}: {message}")]
    Transport { url: String, message: String },
}

impl LoadError {
    pub(crate) fn transport(url: impl Display, err: impl Display) -> Self {
        Self::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// The fetched document, kept loosely typed. Each section is guarded on its
/// own so a bad `projects` never hides good `skills` and vice versa.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioDocument(Value);

impl PortfolioDocument {
    pub fn projects(&self) -> Option<&[Value]> {
        match self.0.get("projects") {
            Some(Value::Array(projects)) => Some(projects.as_slice()),
            Some(other) => {
                debug!("ignoring projects of unexpected type: {}", kind(other));
                None
            }
            None => None,
        }
    }

    pub fn skills(&self) -> Option<&Map<String, Value>> {
        match self.0.get("skills") {
            Some(Value::Object(skills)) => Some(skills),
            Some(other) => {
                debug!("ignoring skills of unexpected type: {}", kind(other));
                None
            }
            None => None,
        }
    }
}

impl From<Value> for PortfolioDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Text of a scalar the way a browser would print it. `null`, arrays and
/// objects have no label.
pub(crate) fn label(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(it) => Some(Cow::Borrowed(it.as_str())),
        Value::Number(it) => Some(Cow::Owned(it.to_string())),
        Value::Bool(it) => Some(Cow::Owned(it.to_string())),
        _ => None,
    }
}

/// Fetches `source_path` relative to `base` and parses it as JSON.
pub async fn load<T: Transport>(
    transport: &T,
    base: &Url,
    source_path: &str,
) -> Result<PortfolioDocument, LoadError> {
    let url = base
        .join(source_path)
        .map_err(|err| LoadError::transport(source_path, err))?;
    let fetched = transport.fetch(&url).await?;
    if !fetched.status.is_success() {
        return Err(LoadError::Fetch {
            status: fetched.status,
            status_text: fetched
                .status
                .canonical_reason()
                .unwrap_or_default()
                .to_string(),
        });
    }
    let value = serde_json::from_slice::<Value>(&fetched.body)?;
    debug!("loaded {}", url.as_str());
    Ok(PortfolioDocument(value))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::http_client::Fetched;
    use hyper::body::Bytes;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers every fetch with the same canned response and records the urls.
    pub(crate) struct StubTransport {
        status: StatusCode,
        body: &'static str,
        pub(crate) requested: Mutex<Vec<String>>,
    }

    impl StubTransport {
        pub(crate) fn new(status: StatusCode, body: &'static str) -> Self {
            Self {
                status,
                body,
                requested: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn ok(body: &'static str) -> Self {
            Self::new(StatusCode::OK, body)
        }
    }

    impl Transport for StubTransport {
        async fn fetch(&self, url: &Url) -> Result<Fetched, LoadError> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(Fetched {
                status: self.status,
                body: Bytes::from_static(self.body.as_bytes()),
            })
        }
    }

    fn base() -> Url {
        Url::parse("https://example.com/portfolio/index.html").unwrap()
    }

    #[tokio::test]
    async fn test_load_resolves_relative_path() {
        let transport = StubTransport::ok("{}");
        load(&transport, &base(), "./data.json").await.unwrap();
        load(&transport, &base(), "../data.json").await.unwrap();
        assert_eq!(
            vec![
                "https://example.com/portfolio/data.json".to_string(),
                "https://example.com/data.json".to_string(),
            ],
            *transport.requested.lock().unwrap()
        );
    }

    #[tokio::test]
    async fn test_load_non_success_status() {
        let transport = StubTransport::new(StatusCode::NOT_FOUND, "not here");
        let err = load(&transport, &base(), "./data.json").await.unwrap_err();
        match &err {
            LoadError::Fetch {
                status,
                status_text,
            } => {
                assert_eq!(StatusCode::NOT_FOUND, *status);
                assert_eq!("Not Found", status_text.as_str());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!("failed to fetch document: 404 Not Found", err.to_string());
    }

    #[tokio::test]
    async fn test_load_invalid_json() {
        let transport = StubTransport::ok("{\"projects\": [");
        let err = load(&transport, &base(), "./data.json").await.unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[tokio::test]
    async fn test_load_keeps_unknown_keys_and_shapes() {
        let transport = StubTransport::ok(r#"{"projects":{"a":1},"skills":[],"extra":true}"#);
        let document = load(&transport, &base(), "./data.json").await.unwrap();
        assert!(document.projects().is_none());
        assert!(document.skills().is_none());
    }

    #[test]
    fn test_sections_are_guarded_independently() {
        let document = PortfolioDocument::from(json!({
            "skills": { "Languages": ["Rust"] }
        }));
        assert!(document.projects().is_none());
        assert_eq!(1, document.skills().unwrap().len());
        let document = PortfolioDocument::from(json!({
            "projects": [{ "name": "A" }],
            "skills": "none"
        }));
        assert_eq!(1, document.projects().unwrap().len());
        assert!(document.skills().is_none());
    }

    #[test]
    fn test_label() {
        assert_eq!(Some("Rust"), label(&json!("Rust")).as_deref());
        assert_eq!(Some("2024"), label(&json!(2024)).as_deref());
        assert_eq!(Some("true"), label(&json!(true)).as_deref());
        assert!(label(&Value::Null).is_none());
        assert!(label(&json!(["a"])).is_none());
        assert!(label(&json!({"a": 1})).is_none());
    }

    #[test]
    fn test_non_object_document() {
        let document = PortfolioDocument::from(json!([1, 2, 3]));
        assert!(document.projects().is_none());
        assert!(document.skills().is_none());
    }
}
