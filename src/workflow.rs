//! The onboarding run: form response in, stored artifacts and mailed links out.
//!
//! Steps run strictly in order and the first failure aborts the run. The
//! only tolerated failure is deleting a transient upload after it has been
//! stored durably. The link email is the last step, so a researcher never
//! receives links whose manifest failed to upload.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::batch::generate_batch;
use crate::context::ServiceContext;
use crate::error::OnboardError;
use crate::experiment::ExperimentConfig;
use crate::form::{FormResponse, FormSchema};
use crate::naming;
use crate::ports::{Attachment, Email, PutObject, TransientFile};

/// MIME type of the manifest upload.
pub const MANIFEST_MIME: &str = "text/csv";

/// MIME type of the link list attachment.
pub const LINKS_MIME: &str = "text/plain";

/// Settings an onboarding run needs besides the collaborators.
#[derive(Debug, Clone)]
pub struct OnboardingSettings {
    /// Endpoint participant links point at.
    pub base_url: String,
    /// How form questions map to fields.
    pub schema: FormSchema,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnboardingReceipt {
    /// Experiment label as submitted.
    pub experiment_name: String,
    /// Sanitized storage prefix.
    pub prefix: String,
    /// Keys of the migrated artifacts, configuration file first.
    pub artifact_keys: Vec<String>,
    /// Key of the completion manifest.
    pub manifest_key: String,
    /// Number of participant links issued.
    pub participant_count: usize,
    /// Who received the links.
    pub recipient: String,
}

/// Runs the whole onboarding for one form response.
///
/// # Errors
///
/// Returns the first failing step's error; see [`OnboardError::kind`].
pub async fn run_onboarding(
    ctx: &ServiceContext,
    settings: &OnboardingSettings,
    response: &FormResponse,
) -> Result<OnboardingReceipt, OnboardError> {
    let request = settings.schema.extract(response)?;
    let span = info_span!(
        "onboard",
        run_id = %Uuid::new_v4(),
        experiment = %request.experiment_name,
    );

    async move {
        info!(
            participants = request.participant_count,
            files = 1 + request.additional_file_ids.len(),
            "onboarding started"
        );
        let name = request.experiment_name.as_str();

        let mut files = Vec::with_capacity(1 + request.additional_file_ids.len());
        let config_file = fetch_file(ctx, &request.config_file_id).await?;
        let config = ExperimentConfig::from_bytes(&config_file.content).map_err(|source| {
            OnboardError::ConfigFile { file: config_file.name.clone(), source }
        })?;
        info!(file = %config_file.name, keys = ?config.keys(), "configuration validated");
        files.push(config_file);
        for id in &request.additional_file_ids {
            files.push(fetch_file(ctx, id).await?);
        }

        let artifact_keys = plan_artifact_keys(name, &files)?;
        for (file, key) in files.into_iter().zip(&artifact_keys) {
            store_file(ctx, file, key).await?;
        }

        let batch = generate_batch(request.participant_count, name, ctx.clock.as_ref())?;

        let manifest_key = naming::manifest_key(name);
        let manifest = PutObject::text(&manifest_key, MANIFEST_MIME, &batch.render_manifest());
        ctx.objects.put(&manifest).await.map_err(OnboardError::port("upload manifest"))?;
        info!(key = %manifest_key, "manifest uploaded");

        let links = batch.render_url_list(&settings.base_url);
        let email = link_email(&request.recipient, name, &links, batch.len());
        ctx.mailer.send(&email).await.map_err(OnboardError::port("send participant links"))?;
        info!(recipient = %request.recipient, "participant links sent");

        Ok(OnboardingReceipt {
            experiment_name: request.experiment_name.clone(),
            prefix: naming::storage_prefix(name),
            artifact_keys,
            manifest_key,
            participant_count: batch.len(),
            recipient: request.recipient.clone(),
        })
    }
    .instrument(span)
    .await
}

async fn fetch_file(ctx: &ServiceContext, file_id: &str) -> Result<TransientFile, OnboardError> {
    ctx.blobs
        .fetch(file_id)
        .await
        .map_err(OnboardError::port(format!("fetch transient file {file_id}")))
}

/// Storage keys for the fetched uploads, in order.
///
/// Two uploads may not share a key, and no upload may take the manifest's key.
fn plan_artifact_keys(
    experiment_name: &str,
    files: &[TransientFile],
) -> Result<Vec<String>, OnboardError> {
    let manifest_key = naming::manifest_key(experiment_name);
    let mut owners: HashMap<String, &str> = HashMap::with_capacity(files.len());
    let mut keys = Vec::with_capacity(files.len());
    for file in files {
        let key = naming::artifact_key(experiment_name, &file.name);
        if key == manifest_key {
            return Err(OnboardError::KeyConflict {
                key,
                file: file.name.clone(),
                other: "the participant manifest".to_string(),
            });
        }
        if let Some(other) = owners.insert(key.clone(), &file.name) {
            return Err(OnboardError::KeyConflict {
                key,
                file: file.name.clone(),
                other: format!("upload {other:?}"),
            });
        }
        keys.push(key);
    }
    Ok(keys)
}

/// Uploads one fetched file under `key`, then drops the transient copy.
async fn store_file(
    ctx: &ServiceContext,
    file: TransientFile,
    key: &str,
) -> Result<(), OnboardError> {
    let object =
        PutObject { key: key.to_string(), mime_type: file.mime_type, content: file.content };
    ctx.objects.put(&object).await.map_err(OnboardError::port(format!("upload {key}")))?;
    info!(%key, "artifact stored");

    if let Err(err) = ctx.blobs.delete(&file.id).await {
        warn!(file_id = %file.id, error = %err, "could not delete transient file; continuing");
    }
    Ok(())
}

fn link_email(recipient: &str, experiment_name: &str, links: &str, count: usize) -> Email {
    Email {
        to: recipient.to_string(),
        subject: format!("Participant links for {experiment_name}"),
        body: format!(
            "Your experiment \"{experiment_name}\" is ready.\n\n\
             The attached file lists {count} participant links, one per line. \
             Give each participant exactly one link; completion is tracked per link.\n"
        ),
        attachments: vec![Attachment {
            filename: naming::links_filename(experiment_name),
            mime_type: LINKS_MIME.to_string(),
            content: links.as_bytes().to_vec(),
        }],
    }
}
