//! Resolved project layout used by the converters.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::{
    ConfigError,
    ToolboxSettings,
    loader,
};

/// Validated, absolute view of [`ToolboxSettings`].
///
/// Built once per run; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Project {
    name: Option<String>,
    prefix: String,
    contao_dir: PathBuf,
    xliff_dir: PathBuf,
    base_language: String,
    skip_files: GlobSet,
}

impl Project {
    /// Loads `composer.json` below `workspace_root`, overlays `overrides`
    /// and resolves the result.
    ///
    /// # Errors
    /// - `composer.json` cannot be read or parsed
    /// - The merged settings do not validate
    pub fn load(workspace_root: &Path, overrides: ToolboxSettings) -> Result<Self, ConfigError> {
        tracing::debug!("Loading project for workspace: {:?}", workspace_root);

        let settings = loader::load_from_workspace(workspace_root)?.map_or_else(
            ToolboxSettings::default,
            |ws| {
                tracing::debug!("Loaded workspace settings: {:?}", ws);
                ws
            },
        );

        Self::from_settings(workspace_root, settings.merge(overrides))
    }

    /// Resolves relative directories against `base_dir`.
    ///
    /// # Errors
    /// Returns [`ConfigError::ValidationErrors`] when `settings` is incomplete.
    pub fn from_settings(base_dir: &Path, settings: ToolboxSettings) -> Result<Self, ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        let resolve = |dir: Option<&PathBuf>| {
            let dir = dir.cloned().unwrap_or_default();
            if dir.is_absolute() { dir } else { base_dir.join(dir) }
        };

        let project = Self {
            contao_dir: resolve(settings.languages_cto.as_ref()),
            xliff_dir: resolve(settings.languages_tx.as_ref()),
            base_language: settings.base_language().to_string(),
            skip_files: build_glob_set(&settings.skip_files)?,
            prefix: settings.prefix.unwrap_or_default(),
            name: settings.project,
        };
        tracing::debug!(
            contao = %project.contao_dir.display(),
            xliff = %project.xliff_dir.display(),
            base = %project.base_language,
            "Project resolved"
        );
        Ok(project)
    }

    /// Remote project slug, if configured.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn contao_dir(&self) -> &Path {
        &self.contao_dir
    }

    #[must_use]
    pub fn xliff_dir(&self) -> &Path {
        &self.xliff_dir
    }

    #[must_use]
    pub fn base_language(&self) -> &str {
        &self.base_language
    }

    /// Domains excluded from conversion.
    #[must_use]
    pub const fn skip_files(&self) -> &GlobSet {
        &self.skip_files
    }

    /// Remote resource slug for a domain: `<prefix><domain>`.
    #[must_use]
    pub fn resource_name(&self, domain: &str) -> String {
        format!("{}{domain}", self.prefix)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    fn load_merges_composer_and_overrides() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("composer.json"),
            r#"{"extra": {"contao": {"transifex": {
                "project": "ext",
                "prefix": "core-",
                "languages_cto": "contao/languages",
                "languages_tx": ".tx",
                "skip_files": ["tl_old*"]
            }}}}"#,
        )
        .unwrap();
        let overrides =
            ToolboxSettings { base_language: Some("de".to_string()), ..ToolboxSettings::default() };

        let project = Project::load(temp_dir.path(), overrides).unwrap();

        assert_that!(project.name(), some(eq("ext")));
        assert_that!(project.base_language(), eq("de"));
        assert_eq!(project.contao_dir(), temp_dir.path().join("contao/languages"));
        assert_eq!(project.xliff_dir(), temp_dir.path().join(".tx"));
        assert_that!(project.skip_files().is_match("tl_old_news"), eq(true));
        assert_that!(project.resource_name("tl_news"), eq("core-tl_news"));
    }

    #[rstest]
    fn load_without_composer_uses_overrides_only() {
        let temp_dir = TempDir::new().unwrap();
        let overrides = ToolboxSettings {
            languages_cto: Some(PathBuf::from("/abs/contao")),
            languages_tx: Some(PathBuf::from("xliff")),
            ..ToolboxSettings::default()
        };

        let project = Project::load(temp_dir.path(), overrides).unwrap();

        assert_that!(project.contao_dir(), eq(Path::new("/abs/contao")));
        assert_eq!(project.xliff_dir(), temp_dir.path().join("xliff"));
        assert_that!(project.base_language(), eq("en"));
        assert_that!(project.prefix(), eq(""));
    }

    #[rstest]
    fn load_rejects_incomplete_settings() {
        let temp_dir = TempDir::new().unwrap();

        let result = Project::load(temp_dir.path(), ToolboxSettings::default());

        assert!(matches!(result, Err(ConfigError::ValidationErrors(errors)) if errors.len() == 2));
    }
}
