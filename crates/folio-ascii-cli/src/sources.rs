use anyhow::Result;
use folio_ascii_core::{ImageSource, LoadError};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// Whether a source string should be fetched over HTTP
pub fn is_remote(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Reads images from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl ImageSource for FsSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, LoadError>> + Send {
        let path = url.to_string();
        async move {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| LoadError::Io { url: path.clone(), source })?;
            debug!("Read {} bytes from {}", bytes.len(), path);
            Ok(bytes)
        }
    }
}

/// Fetches images over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        info!("Initializing HTTP image source (timeout: {:?})", timeout);

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl ImageSource for HttpSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, LoadError>> + Send {
        let request = self.client.get(url);
        let url = url.to_string();
        async move {
            let response = request.send().await.map_err(|e| LoadError::Fetch {
                url: url.clone(),
                message: e.to_string(),
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    url,
                    status: status.as_u16(),
                });
            }

            let bytes = response.bytes().await.map_err(|e| LoadError::Fetch {
                url: url.clone(),
                message: e.to_string(),
            })?;

            debug!("Fetched {} bytes from {}", bytes.len(), url);
            Ok(bytes.to_vec())
        }
    }
}

/// HTTP for http(s) URLs, filesystem for everything else
#[derive(Debug, Clone)]
pub struct AutoSource {
    fs: FsSource,
    http: HttpSource,
}

impl AutoSource {
    pub fn new(http_timeout: Duration) -> Result<Self> {
        Ok(Self {
            fs: FsSource,
            http: HttpSource::new(http_timeout)?,
        })
    }
}

impl ImageSource for AutoSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, LoadError>> + Send {
        let remote = is_remote(url);
        async move {
            if remote {
                self.http.fetch(url).await
            } else {
                self.fs.fetch(url).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_ascii_core::synthetic;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn png_bytes() -> Vec<u8> {
        synthetic::to_png_bytes(&synthetic::solid(2, 2, [1, 2, 3])).unwrap()
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("http://host/a.png"));
        assert!(is_remote("HTTPS://host/a.png"));
        assert!(!is_remote("assets/covers/a.png"));
        assert!(!is_remote("/tmp/http.png"));
        assert!(!is_remote("ht"));
    }

    #[tokio::test]
    async fn test_fs_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cover.png");
        std::fs::write(&file, png_bytes()).unwrap();

        let bytes = FsSource.fetch(file.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, png_bytes());
    }

    #[tokio::test]
    async fn test_fs_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing.png");

        let result = FsSource.fetch(file.to_str().unwrap()).await;
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[tokio::test]
    async fn test_http_source_fetches_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/covers/a.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = HttpSource::new(Duration::from_secs(5)).unwrap();
        let bytes = source.fetch(&format!("{}/covers/a.png", mock_server.uri())).await.unwrap();

        assert_eq!(bytes, png_bytes());
    }

    #[tokio::test]
    async fn test_http_source_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/covers/missing.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let source = HttpSource::new(Duration::from_secs(5)).unwrap();
        let result = source.fetch(&format!("{}/covers/missing.png", mock_server.uri())).await;

        assert!(matches!(result, Err(LoadError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_auto_source_dispatches() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/remote.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"remote".to_vec()))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("local.png");
        std::fs::write(&file, b"local").unwrap();

        let source = AutoSource::new(Duration::from_secs(5)).unwrap();

        let remote = source.fetch(&format!("{}/remote.png", mock_server.uri())).await.unwrap();
        let local = source.fetch(file.to_str().unwrap()).await.unwrap();

        assert_eq!(remote, b"remote");
        assert_eq!(local, b"local");
    }
}
