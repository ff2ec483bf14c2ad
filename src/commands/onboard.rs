//! `cohort onboard` command.

use std::path::Path;

use tracing::error;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::form::{FormResponse, FormSchema};
use crate::workflow::{run_onboarding, OnboardingReceipt, OnboardingSettings};

/// Execute the `onboard` command for one form response file.
///
/// # Errors
///
/// Returns an error string if configuration is incomplete, the response
/// cannot be read, or any onboarding step fails.
pub fn run_with_context(
    ctx: &ServiceContext,
    config: &Config,
    response_path: &Path,
) -> Result<String, String> {
    let settings = settings(ctx, config)?;
    let json = ctx
        .fs
        .read_to_string(response_path)
        .map_err(|e| format!("Failed to read {}: {e}", response_path.display()))?;
    let response = FormResponse::from_json(&json).map_err(|e| e.to_string())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?;

    let receipt = runtime.block_on(run_onboarding(ctx, &settings, &response)).map_err(|e| {
        error!(kind = ?e.kind(), error = %e, "onboarding aborted");
        e.to_string()
    })?;
    Ok(summary(&receipt))
}

fn settings(ctx: &ServiceContext, config: &Config) -> Result<OnboardingSettings, String> {
    let base_url = config.require_base_url().map_err(|e| e.to_string())?.to_string();
    let schema = match &config.form_schema {
        Some(path) => {
            let yaml = ctx
                .fs
                .read_to_string(path)
                .map_err(|e| format!("Failed to read form schema {}: {e}", path.display()))?;
            FormSchema::from_yaml(&yaml)
                .map_err(|e| format!("Failed to parse form schema {}: {e}", path.display()))?
        }
        None => FormSchema::default(),
    };
    Ok(OnboardingSettings { base_url, schema })
}

fn summary(receipt: &OnboardingReceipt) -> String {
    let mut lines = vec![format!(
        "Onboarded {:?}: {} participant links sent to {}",
        receipt.experiment_name, receipt.participant_count, receipt.recipient
    )];
    lines.extend(receipt.artifact_keys.iter().map(|k| format!("  stored   {k}")));
    lines.push(format!("  manifest {}", receipt.manifest_key));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_base_url_before_reading_anything() {
        let ctx = ServiceContext::live(&Config::default());
        let err = run_with_context(&ctx, &Config::default(), Path::new("/nonexistent.json"))
            .unwrap_err();
        assert_eq!(err, "COHORT_BASE_URL is not set");
    }

    #[test]
    fn summary_lists_every_key() {
        let receipt = OnboardingReceipt {
            experiment_name: "My Study".to_string(),
            prefix: "my_study".to_string(),
            artifact_keys: vec!["my_study/study.yaml".to_string()],
            manifest_key: "my_study/participant_ids.csv".to_string(),
            participant_count: 3,
            recipient: "pi@lab.test".to_string(),
        };
        assert_eq!(
            summary(&receipt),
            "Onboarded \"My Study\": 3 participant links sent to pi@lab.test\n  \
             stored   my_study/study.yaml\n  manifest my_study/participant_ids.csv"
        );
    }

    #[test]
    fn unreachable_collaborators_abort_with_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.json");
        std::fs::write(
            &path,
            r#"{"respondent_email": "pi@lab.test", "answers": [
                {"question": "Experiment name", "answer": "Pilot"},
                {"question": "Number of participants", "answer": 2},
                {"question": "Experiment configuration file", "answer": ["blob-1"]}
            ]}"#,
        )
        .unwrap();
        let config =
            Config { base_url: Some("https://run.lab.test/".to_string()), ..Config::default() };
        let ctx = ServiceContext::live(&config);

        let err = run_with_context(&ctx, &config, &path).unwrap_err();
        assert!(err.starts_with("fetch transient file blob-1: upstream failure"));
    }
}
