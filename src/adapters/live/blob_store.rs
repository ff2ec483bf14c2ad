//! Live adapter for the `BlobStore` port over HTTP.
//!
//! `GET {base}/files/{id}` returns the file body, its MIME type in
//! `Content-Type` and the original filename in `X-File-Name`.
//! `DELETE {base}/files/{id}` removes it. Both map 404 to `NotFound`.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::debug;
use url::Url;

use super::{ensure_success, transport};
use crate::config::BlobStoreConfig;
use crate::ports::{BlobStore, PortError, PortFuture, PortResult, TransientFile};

/// Header carrying the uploaded filename.
pub const FILE_NAME_HEADER: &str = "x-file-name";

/// Transient store reached over HTTP.
pub struct HttpBlobStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBlobStore {
    /// Creates a client for the configured store.
    #[must_use]
    pub fn new(config: &BlobStoreConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    /// `{base}/files/{id}` with the id encoded as a single path segment.
    fn file_url(&self, id: &str) -> PortResult<Url> {
        let invalid = || PortError::Upstream(format!("invalid blob store URL {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|()| invalid())?.pop_if_empty().extend(["files", id]);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl BlobStore for HttpBlobStore {
    fn fetch<'a>(&'a self, id: &'a str) -> PortFuture<'a, TransientFile> {
        Box::pin(async move {
            let what = format!("fetch transient file {id}");
            debug!(id, "fetching transient file");
            let response = self
                .authorize(self.client.get(self.file_url(id)?))
                .send()
                .await
                .map_err(transport(&what))?;
            if response.status() == StatusCode::NOT_FOUND {
                return Err(PortError::NotFound(format!("transient file {id}")));
            }
            let response = ensure_success(response, &what).await?;

            let (name, mime_type) = {
                let headers = response.headers();
                let header = |name: &str| {
                    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
                };
                (
                    header(FILE_NAME_HEADER).unwrap_or_else(|| id.to_string()),
                    header(CONTENT_TYPE.as_str())
                        .unwrap_or_else(|| "application/octet-stream".to_string()),
                )
            };
            let content = response.bytes().await.map_err(transport(&what))?.to_vec();

            Ok(TransientFile { id: id.to_string(), name, mime_type, content })
        })
    }

    fn delete<'a>(&'a self, id: &'a str) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let what = format!("delete transient file {id}");
            let response = self
                .authorize(self.client.delete(self.file_url(id)?))
                .send()
                .await
                .map_err(transport(&what))?;
            if response.status() == StatusCode::NOT_FOUND {
                return Err(PortError::NotFound(format!("transient file {id}")));
            }
            ensure_success(response, &what).await?;
            Ok(())
        })
    }
}
