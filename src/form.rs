//! Form responses and the schema that turns them into onboarding requests.
//!
//! Form answers are keyed by the literal question text. [`FormSchema`] maps
//! each logical field to its question once, and [`FormSchema::extract`]
//! validates the whole response up front.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a form response.
#[derive(Debug, Error)]
pub enum FormError {
    /// The response is not valid JSON of the expected shape.
    #[error("malformed form response: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A required question has no answer.
    #[error("missing field {field}: no answer to {question:?}")]
    MissingField {
        /// Logical field name.
        field: &'static str,
        /// Question text that was looked up.
        question: String,
    },
    /// An answer is present but unusable.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Logical field name.
        field: &'static str,
        /// What was wrong with the answer.
        reason: String,
    },
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormAnswer {
    /// Question text exactly as shown on the form.
    pub question: String,
    /// The answer.
    pub answer: AnswerValue,
}

/// An answer value: free text, a number, or a list (file upload ids, checkboxes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Free text.
    Text(String),
    /// A numeric answer.
    Integer(i64),
    /// Several values, e.g. uploaded file ids.
    List(Vec<String>),
}

impl AnswerValue {
    fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Integer(_) => false,
            Self::List(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }

    fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Integer(n) => n.to_string(),
            Self::List(items) => items.join(", "),
        }
    }

    fn as_list(&self) -> Vec<String> {
        match self {
            Self::Text(s) => {
                s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
            }
            Self::Integer(n) => vec![n.to_string()],
            Self::List(items) => {
                items
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }
        }
    }
}

/// A submitted form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormResponse {
    /// Email of the respondent, when the form collects it.
    #[serde(default)]
    pub respondent_email: Option<String>,
    /// Submission time as reported by the form service.
    #[serde(default)]
    pub submitted_at: Option<String>,
    /// Answers in form order.
    #[serde(default)]
    pub answers: Vec<FormAnswer>,
}

impl FormResponse {
    /// Parses a response from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Malformed`] if the JSON does not match.
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the non-blank answer to a question, matched on trimmed text.
    #[must_use]
    pub fn answer(&self, question: &str) -> Option<&AnswerValue> {
        let question = question.trim();
        self.answers
            .iter()
            .find(|a| a.question.trim() == question)
            .map(|a| &a.answer)
            .filter(|a| !a.is_blank())
    }
}

/// A form question and whether it must be answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question text as shown on the form.
    pub text: String,
    /// Whether a missing answer is an error.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl Question {
    fn required(text: &str) -> Self {
        Self { text: text.to_string(), required: true }
    }

    fn optional(text: &str) -> Self {
        Self { text: text.to_string(), required: false }
    }
}

/// Maps onboarding fields to form questions.
///
/// Loadable from YAML; fields left out keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSchema {
    /// Experiment label.
    pub experiment_name: Question,
    /// Number of participant links to issue.
    pub participant_count: Question,
    /// Where links are sent. Falls back to the respondent email when unanswered.
    pub recipient_email: Question,
    /// Upload id of the experiment configuration file.
    pub config_file: Question,
    /// Upload ids of further artifacts to migrate.
    pub additional_files: Question,
}

impl Default for FormSchema {
    fn default() -> Self {
        Self {
            experiment_name: Question::required("Experiment name"),
            participant_count: Question::required("Number of participants"),
            recipient_email: Question::optional("Email address for participant links"),
            config_file: Question::required("Experiment configuration file"),
            additional_files: Question::optional("Additional experiment files"),
        }
    }
}

/// Typed onboarding input extracted from a form response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingRequest {
    /// Experiment label as entered.
    pub experiment_name: String,
    /// Number of participant links to issue.
    pub participant_count: usize,
    /// Recipient of the link list.
    pub recipient: String,
    /// Transient upload id of the configuration file.
    pub config_file_id: String,
    /// Transient upload ids of additional artifacts.
    pub additional_file_ids: Vec<String>,
}

impl FormSchema {
    /// Parses a schema override from YAML.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the document does not match.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Validates a response against the schema.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingField`] for unanswered required questions
    /// and [`FormError::InvalidValue`] for a participant count that is not a
    /// positive integer or a config answer naming more than one file.
    pub fn extract(&self, response: &FormResponse) -> Result<OnboardingRequest, FormError> {
        let experiment_name =
            lookup(response, "experiment_name", &self.experiment_name)?.map(AnswerValue::as_text);
        let count = lookup(response, "participant_count", &self.participant_count)?;
        let recipient = lookup(response, "recipient_email", &self.recipient_email)?
            .map(AnswerValue::as_text)
            .or_else(|| response.respondent_email.clone().filter(|e| !e.trim().is_empty()));
        let config_files =
            lookup(response, "config_file", &self.config_file)?.map(AnswerValue::as_list);
        let additional_file_ids = lookup(response, "additional_files", &self.additional_files)?
            .map(AnswerValue::as_list)
            .unwrap_or_default();

        let experiment_name =
            experiment_name.ok_or_else(|| missing("experiment_name", &self.experiment_name))?;
        let participant_count = parse_count(
            count.ok_or_else(|| missing("participant_count", &self.participant_count))?,
        )?;
        let recipient = recipient.ok_or_else(|| missing("recipient_email", &self.recipient_email))?;
        let config_file_id = match config_files.as_deref() {
            Some([id]) => id.clone(),
            Some([]) | None => return Err(missing("config_file", &self.config_file)),
            Some(ids) => {
                return Err(FormError::InvalidValue {
                    field: "config_file",
                    reason: format!("expected one file, got {}", ids.len()),
                })
            }
        };

        Ok(OnboardingRequest {
            experiment_name,
            participant_count,
            recipient,
            config_file_id,
            additional_file_ids,
        })
    }
}

fn lookup<'r>(
    response: &'r FormResponse,
    field: &'static str,
    question: &Question,
) -> Result<Option<&'r AnswerValue>, FormError> {
    match response.answer(&question.text) {
        Some(answer) => Ok(Some(answer)),
        None if question.required => Err(missing(field, question)),
        None => Ok(None),
    }
}

fn missing(field: &'static str, question: &Question) -> FormError {
    FormError::MissingField { field, question: question.text.clone() }
}

fn parse_count(answer: &AnswerValue) -> Result<usize, FormError> {
    let invalid = |reason: String| FormError::InvalidValue { field: "participant_count", reason };
    let count = match answer {
        AnswerValue::Integer(n) => *n,
        other => {
            let text = other.as_text();
            text.parse::<i64>().map_err(|_| invalid(format!("{text:?} is not an integer")))?
        }
    };
    if count <= 0 {
        return Err(invalid(format!("{count} is not positive")));
    }
    usize::try_from(count).map_err(|_| invalid(format!("{count} is too large")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(answers: &[(&str, AnswerValue)]) -> FormResponse {
        FormResponse {
            respondent_email: Some("owner@lab.test".to_string()),
            submitted_at: None,
            answers: answers
                .iter()
                .map(|(q, a)| FormAnswer { question: (*q).to_string(), answer: a.clone() })
                .collect(),
        }
    }

    fn text(s: &str) -> AnswerValue {
        AnswerValue::Text(s.to_string())
    }

    fn complete() -> Vec<(&'static str, AnswerValue)> {
        vec![
            ("Experiment name", text("My Study")),
            ("Number of participants", AnswerValue::Integer(3)),
            ("Experiment configuration file", AnswerValue::List(vec!["blob-1".to_string()])),
        ]
    }

    #[test]
    fn extracts_required_fields() {
        let request = FormSchema::default().extract(&response(&complete())).unwrap();
        assert_eq!(request.experiment_name, "My Study");
        assert_eq!(request.participant_count, 3);
        assert_eq!(request.recipient, "owner@lab.test");
        assert_eq!(request.config_file_id, "blob-1");
        assert!(request.additional_file_ids.is_empty());
    }

    #[test]
    fn explicit_recipient_wins_over_respondent() {
        let mut answers = complete();
        answers.push(("Email address for participant links", text("pi@lab.test")));
        answers.push(("Additional experiment files", text("blob-2, blob-3")));
        let request = FormSchema::default().extract(&response(&answers)).unwrap();
        assert_eq!(request.recipient, "pi@lab.test");
        assert_eq!(request.additional_file_ids, vec!["blob-2", "blob-3"]);
    }

    #[test]
    fn missing_required_question_is_reported_by_field() {
        let answers: Vec<_> =
            complete().into_iter().filter(|(q, _)| *q != "Experiment name").collect();
        let err = FormSchema::default().extract(&response(&answers)).unwrap_err();
        match err {
            FormError::MissingField { field, question } => {
                assert_eq!(field, "experiment_name");
                assert_eq!(question, "Experiment name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_answer_counts_as_missing() {
        let mut answers = complete();
        answers[0].1 = text("   ");
        let err = FormSchema::default().extract(&response(&answers)).unwrap_err();
        assert!(matches!(err, FormError::MissingField { field: "experiment_name", .. }));
    }

    #[test]
    fn no_recipient_anywhere_is_missing() {
        let mut form = response(&complete());
        form.respondent_email = None;
        let err = FormSchema::default().extract(&form).unwrap_err();
        assert!(matches!(err, FormError::MissingField { field: "recipient_email", .. }));
    }

    #[test]
    fn count_must_be_positive_integer() {
        for bad in [text("zero"), text("-2"), AnswerValue::Integer(0)] {
            let mut answers = complete();
            answers[1].1 = bad;
            let err = FormSchema::default().extract(&response(&answers)).unwrap_err();
            assert!(matches!(err, FormError::InvalidValue { field: "participant_count", .. }));
        }
    }

    #[test]
    fn count_accepts_text_digits() {
        let mut answers = complete();
        answers[1].1 = text(" 12 ");
        let request = FormSchema::default().extract(&response(&answers)).unwrap();
        assert_eq!(request.participant_count, 12);
    }

    #[test]
    fn more_than_one_config_file_is_rejected() {
        let mut answers = complete();
        answers[2].1 = AnswerValue::List(vec!["a".to_string(), "b".to_string()]);
        let err = FormSchema::default().extract(&response(&answers)).unwrap_err();
        assert!(matches!(err, FormError::InvalidValue { field: "config_file", .. }));
    }

    #[test]
    fn question_match_ignores_surrounding_whitespace() {
        let mut answers = complete();
        answers[0].0 = "  Experiment name ";
        assert!(FormSchema::default().extract(&response(&answers)).is_ok());
    }

    #[test]
    fn parses_json_response() {
        let json = r#"{
            "respondent_email": "owner@lab.test",
            "answers": [
                {"question": "Experiment name", "answer": "Pilot"},
                {"question": "Number of participants", "answer": 2},
                {"question": "Experiment configuration file", "answer": ["blob-9"]}
            ]
        }"#;
        let form = FormResponse::from_json(json).unwrap();
        let request = FormSchema::default().extract(&form).unwrap();
        assert_eq!(request.experiment_name, "Pilot");
        assert_eq!(request.participant_count, 2);
        assert_eq!(request.config_file_id, "blob-9");
    }

    #[test]
    fn schema_override_keeps_unlisted_defaults() {
        let schema = FormSchema::from_yaml("experiment_name:\n  text: Study title\n").unwrap();
        assert_eq!(schema.experiment_name.text, "Study title");
        assert!(schema.experiment_name.required);
        assert_eq!(schema.participant_count, FormSchema::default().participant_count);
    }
}
