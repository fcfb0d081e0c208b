//! Papers service client: course index, paper listings, upload and download.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;

use crate::{Config, Course, Paper, PapersError};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Status and body of a response that is interpreted by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A multipart upload: text fields plus one file part named `file`.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub fields: Vec<(&'static str, String)>,
    pub file_name: String,
    pub file_bytes: Vec<u8>,
}

/// The backend holding the course index, paper listings and stored files.
pub trait PapersService: Send + Sync {
    /// `GET /courses`.
    fn courses(&self) -> BoxFuture<'_, Result<Vec<Course>, PapersError>>;

    /// `GET /papers`, scoped to one course when `course_title` is given.
    /// A `null` body yields an empty list.
    fn papers<'a>(
        &'a self,
        course_title: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Vec<Paper>, PapersError>>;

    /// `POST /upload`. Any HTTP status is returned as-is; only transport
    /// failures are errors.
    fn upload(&self, request: UploadRequest) -> BoxFuture<'_, Result<RawResponse, PapersError>>;

    /// Direct link to a stored paper.
    fn download_url(&self, filename: &str) -> String;

    /// Fetch a stored paper into `dest_dir`, returning the written path.
    fn download<'a>(
        &'a self,
        filename: &'a str,
        dest_dir: &'a Path,
    ) -> BoxFuture<'a, Result<PathBuf, PapersError>>;
}

/// [`PapersService`] over HTTP.
pub struct HttpPapersService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPapersService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PapersError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("papers-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, PapersError> {
        Self::new(&config.base_url, config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, PapersError> {
        tracing::debug!(url, "GET");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(PapersError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Direct link to a stored paper under `base_url`.
pub fn download_url(base_url: &str, filename: &str) -> String {
    format!(
        "{}/download?filename={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(filename)
    )
}

/// File name a download is saved under: the last path component of the
/// storage key, so a key can never escape the destination directory.
pub fn download_file_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "paper.pdf".to_string())
}

/// In-progress path for `target`: the full file name plus `.part`, so
/// `a.pdf` and `a.doc` never share one.
fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}

impl PapersService for HttpPapersService {
    fn courses(&self) -> BoxFuture<'_, Result<Vec<Course>, PapersError>> {
        Box::pin(async move {
            let url = format!("{}/courses", self.base_url);
            Ok(self.get_json::<Vec<Course>>(&url).await?.unwrap_or_default())
        })
    }

    fn papers<'a>(
        &'a self,
        course_title: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Vec<Paper>, PapersError>> {
        Box::pin(async move {
            let mut url = format!("{}/papers", self.base_url);
            if let Some(title) = course_title.filter(|t| !t.is_empty()) {
                url.push_str(&format!("?course_title={}", urlencoding::encode(title)));
            }
            Ok(self.get_json::<Vec<Paper>>(&url).await?.unwrap_or_default())
        })
    }

    fn upload(&self, request: UploadRequest) -> BoxFuture<'_, Result<RawResponse, PapersError>> {
        Box::pin(async move {
            let mut form = reqwest::multipart::Form::new();
            for (name, value) in request.fields {
                form = form.text(name, value);
            }
            let part =
                reqwest::multipart::Part::bytes(request.file_bytes).file_name(request.file_name);
            form = form.part("file", part);

            let url = format!("{}/upload", self.base_url);
            tracing::debug!(url, "POST");
            let resp = self.client.post(&url).multipart(form).send().await?;
            let status = resp.status().as_u16();
            let body = resp.text().await?;
            Ok(RawResponse { status, body })
        })
    }

    fn download_url(&self, filename: &str) -> String {
        download_url(&self.base_url, filename)
    }

    fn download<'a>(
        &'a self,
        filename: &'a str,
        dest_dir: &'a Path,
    ) -> BoxFuture<'a, Result<PathBuf, PapersError>> {
        Box::pin(async move {
            let url = self.download_url(filename);
            tracing::debug!(url, "GET (download)");
            let resp = self.client.get(&url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(PapersError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            tokio::fs::create_dir_all(dest_dir).await?;
            let target = dest_dir.join(download_file_name(filename));
            let partial = partial_path(&target);
            let written = async {
                let mut file = tokio::fs::File::create(&partial).await?;
                let mut stream = resp.bytes_stream();
                while let Some(chunk) = stream.next().await {
                    file.write_all(&chunk?).await?;
                }
                file.flush().await?;
                drop(file);
                tokio::fs::rename(&partial, &target).await?;
                Ok::<(), PapersError>(())
            }
            .await;

            if let Err(e) = written {
                tracing::warn!(path = %partial.display(), error = %e, "download failed, removing partial file");
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
            tracing::info!(path = %target.display(), "downloaded paper");
            Ok(target)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_url_encodes_filename() {
        let svc = HttpPapersService::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(svc.base_url(), "http://localhost:8080");
        assert_eq!(
            svc.download_url("2024 os/cat1.pdf"),
            "http://localhost:8080/download?filename=2024%20os%2Fcat1.pdf"
        );
    }

    #[test]
    fn partial_path_keeps_the_extension() {
        let pdf = partial_path(Path::new("/tmp/a.pdf"));
        let doc = partial_path(Path::new("/tmp/a.doc"));
        assert_eq!(pdf, Path::new("/tmp/a.pdf.part"));
        assert_eq!(doc, Path::new("/tmp/a.doc.part"));
    }

    #[test]
    fn download_file_name_strips_directories() {
        assert_eq!(download_file_name("123-paper.pdf"), "123-paper.pdf");
        assert_eq!(download_file_name("../../etc/passwd"), "passwd");
        assert_eq!(download_file_name(""), "paper.pdf");
    }

    #[test]
    fn raw_response_success_range() {
        let ok = RawResponse {
            status: 201,
            body: String::new(),
        };
        let bad = RawResponse {
            status: 413,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
