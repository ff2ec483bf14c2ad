//! Live adapters for real external interactions.

pub mod blob_store;
pub mod clock;
pub mod filesystem;
pub mod mailer;
pub mod object_store;

use reqwest::Response;

use crate::ports::{PortError, PortResult};

/// Maps a non-success response to a [`PortError::Upstream`] carrying the body.
pub(crate) async fn ensure_success(response: Response, what: &str) -> PortResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    if body.is_empty() {
        Err(PortError::Upstream(format!("{what} failed with status {}", status.as_u16())))
    } else {
        Err(PortError::Upstream(format!("{what} failed with status {}: {body}", status.as_u16())))
    }
}

/// Maps a transport error to a [`PortError::Upstream`].
pub(crate) fn transport(what: &str) -> impl FnOnce(reqwest::Error) -> PortError + '_ {
    move |e| PortError::Upstream(format!("{what} request failed: {e}"))
}
