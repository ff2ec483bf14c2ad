//! Recording adapter for the `Mailer` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{Email, Mailer, PortFuture};

/// Records outgoing mail while delegating to an inner mailer.
pub struct RecordingMailer {
    inner: Box<dyn Mailer>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingMailer {
    /// Creates a new recording mailer wrapping the given implementation.
    pub fn new(inner: Box<dyn Mailer>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Mailer for RecordingMailer {
    fn send<'a>(&'a self, email: &'a Email) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let result = self.inner.send(email).await;
            record_result(&self.recorder, "mail", "send", email, &result);
            result
        })
    }
}
