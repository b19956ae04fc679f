use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// Path of the offending setting (e.g., "skip_files[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to build skip file patterns: {0}")]
    GlobError(#[from] globset::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings read from `extra.contao.transifex` in `composer.json`.
///
/// Every field may also be given on the command line; see
/// [`ToolboxSettings::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolboxSettings {
    /// Remote project slug.
    pub project: Option<String>,
    /// Prefix for remote resource names.
    pub prefix: Option<String>,
    /// Contao language root (holds `en/`, `de/`, ...).
    #[serde(alias = "languagesCto")]
    pub languages_cto: Option<PathBuf>,
    /// XLIFF root (holds `en/`, `de/`, ...).
    #[serde(alias = "languagesTx")]
    pub languages_tx: Option<PathBuf>,
    /// Glob patterns over domain names that are never converted.
    #[serde(alias = "skipFiles")]
    pub skip_files: Vec<String>,
    #[serde(alias = "baseLanguage")]
    pub base_language: Option<String>,
}

pub const DEFAULT_BASE_LANGUAGE: &str = "en";

impl ToolboxSettings {
    /// Overlays `overrides` on top of `self`; set values win.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            project: overrides.project.or(self.project),
            prefix: overrides.prefix.or(self.prefix),
            languages_cto: overrides.languages_cto.or(self.languages_cto),
            languages_tx: overrides.languages_tx.or(self.languages_tx),
            skip_files: if overrides.skip_files.is_empty() {
                self.skip_files
            } else {
                overrides.skip_files
            },
            base_language: overrides.base_language.or(self.base_language),
        }
    }

    #[must_use]
    pub fn base_language(&self) -> &str {
        self.base_language.as_deref().unwrap_or(DEFAULT_BASE_LANGUAGE)
    }

    /// # Errors
    /// - Language roots are not configured
    /// - Base language is empty
    /// - Invalid skip pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.languages_cto.as_ref().is_none_or(|p| p.as_os_str().is_empty()) {
            errors.push(ValidationError::new(
                "languages_cto",
                "Unable to determine the Contao language root folder. Pass --contao or set extra.contao.transifex.languages_cto",
            ));
        }

        if self.languages_tx.as_ref().is_none_or(|p| p.as_os_str().is_empty()) {
            errors.push(ValidationError::new(
                "languages_tx",
                "Unable to determine the XLIFF root folder. Pass --xliff or set extra.contao.transifex.languages_tx",
            ));
        }

        if self.base_language().trim().is_empty() {
            errors.push(ValidationError::new("base_language", "The base language cannot be empty"));
        }

        for (index, pattern) in self.skip_files.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("skip_files[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    fn valid() -> ToolboxSettings {
        ToolboxSettings {
            languages_cto: Some(PathBuf::from("contao/languages")),
            languages_tx: Some(PathBuf::from(".tx")),
            ..ToolboxSettings::default()
        }
    }

    #[rstest]
    fn validate_valid_settings() {
        assert_that!(valid().validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_composer_section() {
        let json = r#"{
            "project": "my-extension",
            "prefix": "core-",
            "languages_cto": "src/Resources/contao/languages",
            "languages_tx": ".tx",
            "skip_files": ["tl_old*"]
        }"#;

        let settings: ToolboxSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.project, some(eq("my-extension")));
        assert_that!(settings.prefix, some(eq("core-")));
        assert_that!(settings.skip_files, elements_are![eq("tl_old*")]);
        assert_that!(settings.base_language(), eq("en"));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: ToolboxSettings = serde_json::from_str("{}").unwrap();

        assert_that!(settings, eq(&ToolboxSettings::default()));
    }

    #[rstest]
    fn merge_prefers_overrides() {
        let file = ToolboxSettings {
            project: Some("from-file".to_string()),
            skip_files: vec!["a".to_string()],
            ..valid()
        };
        let cli = ToolboxSettings {
            project: Some("from-cli".to_string()),
            base_language: Some("de".to_string()),
            ..ToolboxSettings::default()
        };

        let merged = file.merge(cli);

        assert_that!(merged.project, some(eq("from-cli")));
        assert_that!(merged.base_language(), eq("de"));
        assert_that!(merged.skip_files, elements_are![eq("a")]);
        assert_that!(merged.languages_tx, some(eq(&PathBuf::from(".tx"))));
    }

    #[rstest]
    fn validate_missing_roots() {
        let result = ToolboxSettings::default().validate();

        assert_that!(
            result,
            err(elements_are![
                field!(ValidationError.field_path, eq("languages_cto")),
                field!(ValidationError.field_path, eq("languages_tx"))
            ])
        );
    }

    #[rstest]
    fn validate_invalid_skip_pattern() {
        let settings = ToolboxSettings {
            skip_files: vec!["ok".to_string(), "tl_[broken".to_string()],
            ..valid()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("skip_files[1]")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern")),
                field!(ValidationError.message, contains_substring("tl_[broken"))
            ]])
        );
    }

    #[rstest]
    fn validate_empty_base_language() {
        let settings = ToolboxSettings { base_language: Some(String::new()), ..valid() };

        assert_that!(
            settings.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("base_language"))])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let errors = ToolboxSettings::default().validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. languages_cto"));
        assert_that!(error_message, contains_substring("2. languages_tx"));
    }
}
