//! Replaying adapter for the `Mailer` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{Email, Mailer, PortFuture};

/// Serves recorded send results.
pub struct ReplayingMailer {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingMailer {
    /// Creates a replaying mailer backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Mailer for ReplayingMailer {
    fn send<'a>(&'a self, _email: &'a Email) -> PortFuture<'a, ()> {
        let output = next_output(&self.replayer, "mail", "send");
        Box::pin(async move { replay_result(output, "mail::send") })
    }
}
