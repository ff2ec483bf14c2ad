//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use cohort::adapters::live::filesystem::LiveFileSystem;
use cohort::context::ServiceContext;
use cohort::form::{AnswerValue, FormAnswer, FormResponse};
use cohort::ports::{
    BlobStore, Clock, Email, Mailer, ObjectStore, PortError, PortFuture, PutObject, TransientFile,
};

/// Batch timestamp used by every harness: 2025-03-15T14:30:00Z.
pub const BATCH_MILLIS: i64 = 1_742_049_000_000;

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.timestamp_millis_opt(BATCH_MILLIS).unwrap())
}

#[derive(Clone, Default)]
pub struct MemoryBlobs {
    pub files: Arc<Mutex<HashMap<String, TransientFile>>>,
    pub deleted: Arc<Mutex<Vec<String>>>,
    pub fail_deletes: bool,
}

impl MemoryBlobs {
    pub fn with_file(self, id: &str, name: &str, mime_type: &str, content: &[u8]) -> Self {
        self.files.lock().unwrap().insert(
            id.to_string(),
            TransientFile {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: mime_type.to_string(),
                content: content.to_vec(),
            },
        );
        self
    }
}

impl BlobStore for MemoryBlobs {
    fn fetch<'a>(&'a self, id: &'a str) -> PortFuture<'a, TransientFile> {
        let result = self
            .files
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("transient file {id}")));
        Box::pin(async move { result })
    }

    fn delete<'a>(&'a self, id: &'a str) -> PortFuture<'a, ()> {
        let result = if self.fail_deletes {
            Err(PortError::Upstream("delete refused".to_string()))
        } else {
            self.deleted.lock().unwrap().push(id.to_string());
            Ok(())
        };
        Box::pin(async move { result })
    }
}

#[derive(Clone, Default)]
pub struct MemoryObjects {
    pub puts: Arc<Mutex<Vec<PutObject>>>,
    pub fail_suffix: Option<&'static str>,
}

impl MemoryObjects {
    pub fn keys(&self) -> Vec<String> {
        self.puts.lock().unwrap().iter().map(|o| o.key.clone()).collect()
    }

    pub fn content(&self, key: &str) -> Option<String> {
        self.puts
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.key == key)
            .map(|o| String::from_utf8(o.content.clone()).unwrap())
    }
}

impl ObjectStore for MemoryObjects {
    fn put<'a>(&'a self, object: &'a PutObject) -> PortFuture<'a, ()> {
        let result = match self.fail_suffix {
            Some(suffix) if object.key.ends_with(suffix) => {
                Err(PortError::Upstream(format!("put {} refused", object.key)))
            }
            _ => {
                self.puts.lock().unwrap().push(object.clone());
                Ok(())
            }
        };
        Box::pin(async move { result })
    }
}

#[derive(Clone, Default)]
pub struct MemoryMailer {
    pub sent: Arc<Mutex<Vec<Email>>>,
}

impl Mailer for MemoryMailer {
    fn send<'a>(&'a self, email: &'a Email) -> PortFuture<'a, ()> {
        self.sent.lock().unwrap().push(email.clone());
        Box::pin(async { Ok(()) })
    }
}

pub fn context(
    blobs: &MemoryBlobs,
    objects: &MemoryObjects,
    mailer: &MemoryMailer,
) -> ServiceContext {
    ServiceContext {
        clock: Box::new(fixed_clock()),
        fs: Box::new(LiveFileSystem),
        blobs: Box::new(blobs.clone()),
        objects: Box::new(objects.clone()),
        mailer: Box::new(mailer.clone()),
    }
}

pub fn response(answers: &[(&str, AnswerValue)]) -> FormResponse {
    FormResponse {
        respondent_email: Some("pi@lab.test".to_string()),
        submitted_at: Some("2025-03-15T14:29:58Z".to_string()),
        answers: answers
            .iter()
            .map(|(q, a)| FormAnswer { question: (*q).to_string(), answer: a.clone() })
            .collect(),
    }
}

/// A complete submission: "My Study", 3 participants, config `blob-config`,
/// one extra upload `blob-extra`.
pub fn standard_response() -> FormResponse {
    response(&[
        ("Experiment name", AnswerValue::Text("My Study".to_string())),
        ("Number of participants", AnswerValue::Integer(3)),
        ("Experiment configuration file", AnswerValue::List(vec!["blob-config".to_string()])),
        ("Additional experiment files", AnswerValue::List(vec!["blob-extra".to_string()])),
    ])
}

pub fn standard_blobs() -> MemoryBlobs {
    MemoryBlobs::default()
        .with_file("blob-config", "Study.yaml", "text/yaml", b"title: Pilot\n")
        .with_file("blob-extra", "Consent Form.pdf", "application/pdf", b"%PDF-1.4")
}
