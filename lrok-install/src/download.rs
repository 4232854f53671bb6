use std::io::Write;
use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::LOCATION;
use reqwest::{redirect, Client, Response, StatusCode};
use tempfile::NamedTempFile;

use crate::error::{InstallError, Result};

pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Fetches release archives, following redirects by hand so the hop count is bounded
pub struct Downloader {
    http_client: Client,
    max_redirects: usize,
}

impl Downloader {
    pub fn new(max_redirects: usize, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("lrok-install/", env!("CARGO_PKG_VERSION")))
            .redirect(redirect::Policy::none());

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            max_redirects,
        })
    }

    /// Download `url` into a temporary file inside `dir`.
    ///
    /// The file name starts with `archive_name`. The returned handle deletes
    /// the file when dropped, so callers that bail out early leave nothing behind.
    pub async fn download(
        &self,
        url: &str,
        dir: &Path,
        archive_name: &str,
    ) -> Result<NamedTempFile> {
        tracing::info!("Downloading {}", url);

        let response = self.follow_redirects(url).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(InstallError::DownloadFailed {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }

        let mut temp_file = tempfile::Builder::new()
            .prefix(&format!("{archive_name}."))
            .suffix(".download")
            .tempfile_in(dir)
            .map_err(|e| InstallError::filesystem("create temporary file in", dir, e))?;

        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            temp_file
                .write_all(&chunk)
                .map_err(|e| InstallError::filesystem("write", temp_file.path(), e))?;
            written += chunk.len() as u64;
        }

        temp_file
            .flush()
            .map_err(|e| InstallError::filesystem("flush", temp_file.path(), e))?;

        tracing::debug!("Wrote {} bytes to {}", written, temp_file.path().display());
        Ok(temp_file)
    }

    /// Issue GET requests until a non-redirect response arrives
    async fn follow_redirects(&self, url: &str) -> Result<Response> {
        let mut current = url.to_string();
        let mut hops = 0;

        loop {
            let response = self.http_client.get(&current).send().await?;
            let status = response.status();

            if !is_redirect(status) {
                return Ok(response);
            }

            if hops >= self.max_redirects {
                return Err(InstallError::TooManyRedirects {
                    url: current,
                    status: status.as_u16(),
                    max: self.max_redirects,
                });
            }

            let next = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|location| response.url().join(location).ok())
                .ok_or_else(|| InstallError::InvalidRedirect {
                    url: current.clone(),
                    status: status.as_u16(),
                })?;

            tracing::debug!("HTTP {} from {}, following to {}", status, current, next);
            current = next.to_string();
            hops += 1;
        }
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_download_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1.0.0/lrok.tar.gz")
            .with_status(200)
            .with_body("archive-bytes")
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let downloader = Downloader::new(DEFAULT_MAX_REDIRECTS, None).unwrap();
        let file = downloader
            .download(
                &format!("{}/v1.0.0/lrok.tar.gz", server.url()),
                dir.path(),
                "lrok.tar.gz",
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(fs::read(file.path()).unwrap(), b"archive-bytes");
        assert_eq!(file.path().parent().unwrap(), dir.path());
        let name = file.path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("lrok.tar.gz."));
    }

    #[tokio::test]
    async fn test_follows_redirect_chain() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let first = server
            .mock("GET", "/first")
            .with_status(302)
            .with_header("location", &format!("{url}/second"))
            .create_async()
            .await;
        let second = server
            .mock("GET", "/second")
            .with_status(302)
            .with_header("location", "/final")
            .create_async()
            .await;
        let last = server
            .mock("GET", "/final")
            .with_status(200)
            .with_body("payload")
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let downloader = Downloader::new(DEFAULT_MAX_REDIRECTS, None).unwrap();
        let file = downloader
            .download(&format!("{url}/first"), dir.path(), "asset.tar.gz")
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        last.assert_async().await;
        assert_eq!(fs::read(file.path()).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_too_many_redirects() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/loop")
            .with_status(302)
            .with_header("location", "/loop")
            .expect(3)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let downloader = Downloader::new(2, None).unwrap();
        let err = downloader
            .download(&format!("{}/loop", server.url()), dir.path(), "asset.tar.gz")
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(
            err,
            InstallError::TooManyRedirects {
                status: 302,
                max: 2,
                ..
            }
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_redirect_then_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _redirect = server
            .mock("GET", "/moved")
            .with_status(301)
            .with_header("location", "/gone")
            .create_async()
            .await;
        let _gone = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let downloader = Downloader::new(DEFAULT_MAX_REDIRECTS, None).unwrap();
        let err = downloader
            .download(&format!("{}/moved", server.url()), dir.path(), "asset.tar.gz")
            .await
            .unwrap_err();

        match err {
            InstallError::DownloadFailed { url, status } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/gone"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_redirect_without_location() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/nowhere")
            .with_status(302)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let downloader = Downloader::new(DEFAULT_MAX_REDIRECTS, None).unwrap();
        let err = downloader
            .download(&format!("{}/nowhere", server.url()), dir.path(), "a.tar.gz")
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::InvalidRedirect { status: 302, .. }));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let dir = tempdir().unwrap();
        let downloader = Downloader::new(DEFAULT_MAX_REDIRECTS, None).unwrap();
        let err = downloader
            .download("http://127.0.0.1:1/asset.tar.gz", dir.path(), "asset.tar.gz")
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::Http(_)));
    }

    #[tokio::test]
    async fn test_timeout_gives_up_on_silent_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let dir = tempdir().unwrap();
        let downloader = Downloader::new(5, Some(Duration::from_millis(200))).unwrap();
        let err = downloader
            .download(&format!("http://{addr}/asset.tar.gz"), dir.path(), "asset.tar.gz")
            .await
            .unwrap_err();

        match err {
            InstallError::Http(e) => assert!(e.is_timeout(), "expected timeout, got {e}"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        server.abort();
    }

    #[tokio::test]
    async fn test_temp_file_removed_on_drop() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/asset")
            .with_status(200)
            .with_body("data")
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let downloader = Downloader::new(DEFAULT_MAX_REDIRECTS, None).unwrap();
        let file = downloader
            .download(&format!("{}/asset", server.url()), dir.path(), "asset")
            .await
            .unwrap();
        let path = file.path().to_path_buf();
        assert!(path.exists());

        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_is_redirect() {
        assert!(is_redirect(StatusCode::MOVED_PERMANENTLY));
        assert!(is_redirect(StatusCode::FOUND));
        assert!(is_redirect(StatusCode::TEMPORARY_REDIRECT));
        assert!(!is_redirect(StatusCode::OK));
        assert!(!is_redirect(StatusCode::NOT_MODIFIED));
        assert!(!is_redirect(StatusCode::NOT_FOUND));
    }
}
