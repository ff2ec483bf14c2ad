//! Live adapter for the `ObjectStore` port: `PUT {endpoint}/{bucket}/{key}`.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use super::{ensure_success, transport};
use crate::config::ObjectStoreConfig;
use crate::ports::{ObjectStore, PortFuture, PutObject};

/// Object store reached over HTTP.
pub struct HttpObjectStore {
    client: Client,
    bucket_url: String,
    token: Option<String>,
}

impl HttpObjectStore {
    /// Creates a client for the configured bucket.
    #[must_use]
    pub fn new(config: &ObjectStoreConfig) -> Self {
        Self {
            client: Client::new(),
            bucket_url: format!(
                "{}/{}",
                config.url.trim_end_matches('/'),
                config.bucket.trim_matches('/')
            ),
            token: config.token.clone(),
        }
    }
}

impl ObjectStore for HttpObjectStore {
    fn put<'a>(&'a self, object: &'a PutObject) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let what = format!("upload {}", object.key);
            debug!(key = %object.key, bytes = object.content.len(), "uploading object");
            let mut request = self
                .client
                .put(format!("{}/{}", self.bucket_url, object.key))
                .header(CONTENT_TYPE, &object.mime_type)
                .body(object.content.clone());
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
            let response = request.send().await.map_err(transport(&what))?;
            ensure_success(response, &what).await?;
            Ok(())
        })
    }
}
