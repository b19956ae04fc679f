//! Directory-level conversion between the Contao and XLIFF trees.
//!
//! Both directions walk every non-base language and every domain file,
//! run the key-level [`sync_from`](crate::sync::sync_from) passes and
//! optionally remove destination files that were not produced by the run.

mod cleanup;
mod from_xliff;
mod to_xliff;

use std::collections::BTreeSet;
use std::path::{
    Path,
    PathBuf,
};
use std::time::SystemTime;

use crate::config::Project;
use crate::error::Result;
use crate::scan;

/// Per-run switches; built once from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Restrict the run to these languages. `None` means all.
    pub only_languages: Option<Vec<String>>,
    /// Delete destination files that this run did not produce.
    pub cleanup: bool,
}

impl ConvertOptions {
    /// Parses the `languages` argument: `all` or a comma separated list.
    #[must_use]
    pub fn with_languages(mut self, languages: &str) -> Self {
        let languages = languages.trim();
        self.only_languages = if languages.is_empty() || languages == "all" {
            None
        } else {
            Some(
                languages
                    .split(',')
                    .map(str::trim)
                    .filter(|lang| !lang.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        };
        self
    }

    #[must_use]
    pub const fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }
}

/// What a run changed on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Languages that were processed, in processing order.
    pub languages: Vec<String>,
    /// Destination files that were saved.
    pub written: Vec<PathBuf>,
    /// Destination files removed by cleanup.
    pub removed: Vec<PathBuf>,
}

/// Runs conversions for one project.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'a> {
    project: &'a Project,
    options: &'a ConvertOptions,
}

impl<'a> Converter<'a> {
    #[must_use]
    pub const fn new(project: &'a Project, options: &'a ConvertOptions) -> Self {
        Self { project, options }
    }

    /// Non-base languages below `root`, honoring the language filter.
    fn languages(&self, root: &Path) -> Result<Vec<String>> {
        let base = self.project.base_language();
        let languages = scan::determine_languages(root, self.options.only_languages.as_deref())?;
        Ok(languages.into_iter().filter(|lang| lang != base).collect())
    }

    /// Applies cleanup to `dir` if enabled, recording removed files.
    fn finish_language(
        &self,
        dir: &Path,
        manifest: &BTreeSet<String>,
        summary: &mut ConvertSummary,
    ) -> Result<()> {
        if !self.options.cleanup {
            return Ok(());
        }
        let removed = cleanup::remove_obsolete_files(dir, manifest)?;
        summary.removed.extend(removed);
        Ok(())
    }
}

/// Last modification time of `path`, if it exists.
fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::all("all", None)]
    #[case::empty("", None)]
    #[case::single("de", Some(vec!["de"]))]
    #[case::list("de, fr,,it", Some(vec!["de", "fr", "it"]))]
    fn test_with_languages(#[case] input: &str, #[case] expected: Option<Vec<&str>>) {
        let options = ConvertOptions::default().with_languages(input);

        let expected = expected.map(|langs| langs.into_iter().map(str::to_string).collect());
        assert_that!(options.only_languages, eq(&expected));
    }
}
