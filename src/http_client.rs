use crate::loader::LoadError;
use hyper::StatusCode;
use hyper::body::Bytes;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Url};
use std::io::ErrorKind;
use tracing::debug;

const JSON: HeaderValue = HeaderValue::from_static("application/json");
const USER_AGENT: HeaderValue = HeaderValue::from_static(concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION")
));

/// Raw outcome of a fetch: whatever status the other side answered with, and
/// the body as received.
pub struct Fetched {
    pub status: StatusCode,
    pub body: Bytes,
}

pub trait Transport {
    async fn fetch(&self, url: &Url) -> Result<Fetched, LoadError>;
}

pub(crate) fn json_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, JSON);
    Client::builder()
        .use_rustls_tls()
        .user_agent(USER_AGENT)
        .redirect(Policy::limited(10))
        .default_headers(headers)
        .deflate(true)
        .gzip(true)
        .brotli(true)
        .zstd(true)
        .build()
}

/// `http(s)` through reqwest, `file` through the filesystem, the way a browser
/// resolves a relative fetch for a served or a local page.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: json_client()?,
        })
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<Fetched, LoadError> {
        match url.scheme() {
            "http" | "https" => {
                debug!("GET {}", url.as_str());
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|err| LoadError::transport(url, err))?;
                let status = response.status();
                let body = response
                    .bytes()
                    .await
                    .map_err(|err| LoadError::transport(url, err))?;
                Ok(Fetched { status, body })
            }
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| LoadError::transport(url, "not a local path"))?;
                debug!("READ {}", path.display());
                match tokio::fs::read(&path).await {
                    Ok(body) => Ok(Fetched {
                        status: StatusCode::OK,
                        body: Bytes::from(body),
                    }),
                    Err(err) if err.kind() == ErrorKind::NotFound => Ok(Fetched {
                        status: StatusCode::NOT_FOUND,
                        body: Bytes::new(),
                    }),
                    Err(err) => Err(LoadError::transport(url, err)),
                }
            }
            scheme => Err(LoadError::transport(
                url,
                format!("unsupported scheme {scheme}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "portfolio_renderer_{}_{name}",
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let path = temp_file("data.json", "{\"projects\":[]}");
        let transport = HttpTransport::new().unwrap();
        let fetched = transport
            .fetch(&Url::from_file_path(&path).unwrap())
            .await
            .unwrap();
        assert_eq!(StatusCode::OK, fetched.status);
        assert_eq!(b"{\"projects\":[]}".as_slice(), fetched.body.as_ref());
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_local_file_is_not_found() {
        let path = std::env::temp_dir().join("portfolio_renderer_missing_data.json");
        let transport = HttpTransport::new().unwrap();
        let fetched = transport
            .fetch(&Url::from_file_path(&path).unwrap())
            .await
            .unwrap();
        assert_eq!(StatusCode::NOT_FOUND, fetched.status);
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let transport = HttpTransport::new().unwrap();
        let result = transport
            .fetch(&Url::parse("ftp://example.com/data.json").unwrap())
            .await;
        assert!(matches!(result, Err(LoadError::Transport { .. })));
    }
}
