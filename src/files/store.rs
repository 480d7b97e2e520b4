//! Flat file store rooted at the serving directory
//!
//! Only the last `/`-delimited segment of a request path is used as the file
//! name, so every request resolves directly inside the serving directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::http::mime;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode, OCTET_STREAM};

/// Reads and writes files named by request paths
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Create a store serving files from `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Resolve a request path to `directory / basename(path)`
    pub fn resolve(&self, path: &str) -> PathBuf {
        let name = path.rsplit('/').next().unwrap_or(path);
        self.directory.join(name)
    }

    /// Handle a `/files` request
    ///
    /// POST stores the request body and always produces a response; a POST
    /// without a body line is a write failure. Any other method reads the
    /// file; when it does not exist (or is not a regular file) no response is
    /// produced and the caller decides what to send.
    pub async fn handle(&self, request: &Request) -> Option<Response> {
        let target = self.resolve(&request.path);

        if request.is_post() {
            let response = match request.body.as_deref() {
                Some(body) => self.store(&target, body).await,
                None => {
                    tracing::error!(
                        path = %target.display(),
                        "Error writing file: request has no body"
                    );
                    Response::internal_error(OCTET_STREAM)
                }
            };
            return Some(response);
        }

        if !is_regular_file(&target).await {
            tracing::debug!(path = %target.display(), "No such file");
            return None;
        }

        Some(self.fetch(&target).await)
    }

    async fn store(&self, target: &Path, contents: &str) -> Response {
        match write_atomic(&self.directory, target, contents).await {
            Ok(()) => {
                tracing::info!(
                    path = %target.display(),
                    bytes = contents.len(),
                    "File stored"
                );
                Response::created()
            }
            Err(e) => {
                tracing::error!(
                    path = %target.display(),
                    error = %e,
                    "Error writing file"
                );
                Response::internal_error(OCTET_STREAM)
            }
        }
    }

    async fn fetch(&self, target: &Path) -> Response {
        let content_type = mime::content_type_for(target);

        match tokio::fs::read_to_string(target).await {
            Ok(text) => ResponseBuilder::new(StatusCode::OK)
                .content_type(content_type)
                .body(text.into_bytes())
                .build(),
            Err(e) => {
                tracing::error!(
                    path = %target.display(),
                    error = %e,
                    "Error reading file"
                );
                Response::internal_error(content_type)
            }
        }
    }
}

async fn is_regular_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

/// Write `contents` to a temporary file in `directory`, then rename it over
/// `target`. Readers and concurrent writers only ever see a complete file.
///
/// The temporary file is created with the same mode a plain create would
/// get (0666 less the process umask).
async fn write_atomic(directory: &Path, target: &Path, contents: &str) -> anyhow::Result<()> {
    let directory = directory.to_path_buf();
    let target = target.to_path_buf();
    let contents = contents.to_owned();

    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }

        let mut tmp = builder
            .tempfile_in(&directory)
            .with_context(|| format!("creating temporary file in {}", directory.display()))?;
        tmp.write_all(contents.as_bytes())
            .context("writing temporary file")?;
        tmp.persist(&target)
            .map_err(|e| e.error)
            .with_context(|| format!("replacing {}", target.display()))?;
        Ok(())
    })
    .await?
}
