//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::blob_store::HttpBlobStore;
use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::mailer::HttpMailer;
use crate::adapters::live::object_store::HttpObjectStore;
use crate::adapters::recording::{
    RecordingBlobStore, RecordingClock, RecordingFileSystem, RecordingMailer,
    RecordingObjectStore,
};
use crate::adapters::replaying::{
    ReplayingBlobStore, ReplayingClock, ReplayingFileSystem, ReplayingMailer,
    ReplayingObjectStore,
};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::config::Config;
use crate::ports::{
    BlobStore, Clock, Email, FileSystem, Mailer, ObjectStore, PortError, PortFuture, PutObject,
    TransientFile,
};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Clock for batch timestamps.
    pub clock: Box<dyn Clock>,
    /// Local filesystem.
    pub fs: Box<dyn FileSystem>,
    /// Transient upload store.
    pub blobs: Box<dyn BlobStore>,
    /// Durable object store.
    pub objects: Box<dyn ObjectStore>,
    /// Outgoing mail.
    pub mailer: Box<dyn Mailer>,
}

impl ServiceContext {
    /// Creates a live context from the configuration.
    ///
    /// Collaborators without configuration get an adapter that fails every
    /// call with an upstream error naming the missing setting, so commands
    /// that never touch them still run.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            blobs: match &config.blob_store {
                Some(c) => Box::new(HttpBlobStore::new(c)),
                None => Box::new(Unconfigured("blob store (COHORT_BLOB_URL)")),
            },
            objects: match &config.object_store {
                Some(c) => Box::new(HttpObjectStore::new(c)),
                None => Box::new(Unconfigured("object store (COHORT_STORE_URL)")),
            },
            mailer: match &config.mail {
                Some(c) => Box::new(HttpMailer::new(c)),
                None => Box::new(Unconfigured("mailer (COHORT_MAIL_URL)")),
            },
        }
    }

    /// Creates a live context whose interactions are recorded into a new
    /// session under `root`.
    ///
    /// The returned session must be finished after the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(config: &Config, root: &Path) -> Result<(Self, RecordingSession), String> {
        use std::sync::Arc;

        let session = RecordingSession::new(root)?;
        let live = Self::live(config);
        let ctx = Self {
            clock: Box::new(RecordingClock::new(live.clock, Arc::clone(&session.clock))),
            fs: Box::new(RecordingFileSystem::new(live.fs, Arc::clone(&session.fs))),
            blobs: Box::new(RecordingBlobStore::new(live.blobs, Arc::clone(&session.blobs))),
            objects: Box::new(RecordingObjectStore::new(
                live.objects,
                Arc::clone(&session.objects),
            )),
            mailer: Box::new(RecordingMailer::new(live.mailer, Arc::clone(&session.mail))),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a single cassette file that holds
    /// interactions for every port.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let replayer = || CassetteConfig::load(path);
        Ok(Self {
            clock: Box::new(ReplayingClock::new(replayer()?)),
            fs: Box::new(ReplayingFileSystem::new(replayer()?)),
            blobs: Box::new(ReplayingBlobStore::new(replayer()?)),
            objects: Box::new(ReplayingObjectStore::new(replayer()?)),
            mailer: Box::new(ReplayingMailer::new(replayer()?)),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Without a cassette, the clock and filesystem fall back to the live
    /// adapters and the network ports fail every call.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(LiveClock),
            },
            fs: match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(LiveFileSystem),
            },
            blobs: match replayers.blobs {
                Some(r) => Box::new(ReplayingBlobStore::new(r)),
                None => Box::new(Unconfigured("blob store cassette")),
            },
            objects: match replayers.objects {
                Some(r) => Box::new(ReplayingObjectStore::new(r)),
                None => Box::new(Unconfigured("object store cassette")),
            },
            mailer: match replayers.mail {
                Some(r) => Box::new(ReplayingMailer::new(r)),
                None => Box::new(Unconfigured("mailer cassette")),
            },
        })
    }
}

/// Stand-in for a collaborator that has no configuration.
struct Unconfigured(&'static str);

impl Unconfigured {
    fn fail<T: Send + 'static>(&self) -> PortFuture<'static, T> {
        let err = PortError::Upstream(format!("{} is not configured", self.0));
        Box::pin(async move { Err(err) })
    }
}

impl BlobStore for Unconfigured {
    fn fetch<'a>(&'a self, _id: &'a str) -> PortFuture<'a, TransientFile> {
        self.fail()
    }

    fn delete<'a>(&'a self, _id: &'a str) -> PortFuture<'a, ()> {
        self.fail()
    }
}

impl ObjectStore for Unconfigured {
    fn put<'a>(&'a self, _object: &'a PutObject) -> PortFuture<'a, ()> {
        self.fail()
    }
}

impl Mailer for Unconfigured {
    fn send<'a>(&'a self, _email: &'a Email) -> PortFuture<'a, ()> {
        self.fail()
    }
}
