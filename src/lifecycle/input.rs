//! Request payloads of the lifecycle operations

use super::LifecycleError;
use crate::app_config::PublishingConfig;
use crate::orm::localized_texts::TextType;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::HashSet;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TextInput {
    #[validate(length(min = 2, max = 3))]
    pub language: String,
    pub text_type: TextType,
    #[validate(length(min = 1, max = 4000))]
    pub value: String,
}

/// Content of a new version.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DraftInput {
    pub organization_id: Option<i32>,
    pub texts: Vec<TextInput>,
    #[serde(default)]
    pub data: serde_json::Value,
    #[validate(length(min = 1, max = 100))]
    pub user: String,
}

impl DraftInput {
    /// Field validation plus the rules that span several texts.
    pub fn check(&self, publishing: &PublishingConfig) -> Result<(), LifecycleError> {
        self.validate()?;

        let mut seen = HashSet::new();
        for text in &self.texts {
            text.validate()?;
            if !publishing.is_supported_language(&text.language) {
                return Err(LifecycleError::Validation(format!(
                    "unsupported language '{}'",
                    text.language
                )));
            }
            if !seen.insert((text.language.as_str(), text.text_type)) {
                return Err(LifecycleError::Validation(format!(
                    "duplicate {:?} text for language '{}'",
                    text.text_type, text.language
                )));
            }
        }

        if self.name_languages().is_empty() {
            return Err(LifecycleError::Validation(
                "at least one language needs a name".to_string(),
            ));
        }
        if !(self.data.is_object() || self.data.is_null()) {
            return Err(LifecycleError::Validation(
                "data must be a JSON object".to_string(),
            ));
        }
        Ok(())
    }

    /// Languages that carry a name, in input order.
    pub fn name_languages(&self) -> Vec<&str> {
        self.texts
            .iter()
            .filter(|t| t.text_type == TextType::Name)
            .map(|t| t.language.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublishRequest {
    /// Empty means every language of the version
    #[serde(default)]
    pub languages: Vec<String>,
    /// Publish later instead of now
    pub publish_at: Option<NaiveDateTime>,
    pub archive_at: Option<NaiveDateTime>,
    #[validate(length(min = 1, max = 100))]
    pub user: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ArchiveRequest {
    /// Empty means every language of the version
    #[serde(default)]
    pub languages: Vec<String>,
    /// Archive later instead of now
    pub archive_at: Option<NaiveDateTime>,
    #[validate(length(min = 1, max = 100))]
    pub user: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewRequest {
    #[validate(length(min = 2, max = 3))]
    pub language: String,
    #[validate(length(min = 1, max = 100))]
    pub user: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FailedPublishRequest {
    #[validate(length(min = 2, max = 3))]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RestoreRequest {
    #[validate(length(min = 1, max = 100))]
    pub user: String,
}
