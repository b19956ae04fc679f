//! Directory scanning for language directories and domain files.

use std::path::{
    Path,
    PathBuf,
};

use globset::GlobSet;
use ignore::WalkBuilder;

use crate::error::{
    Result,
    SyncError,
};

/// Immediate children of `dir`, unfiltered by ignore files.
fn children(dir: &Path) -> impl Iterator<Item = ignore::DirEntry> {
    WalkBuilder::new(dir)
        .standard_filters(false)
        .max_depth(Some(1))
        .follow_links(true)
        .build()
        .filter_map(|result| match result {
            Ok(entry) if entry.depth() == 1 => Some(entry),
            Ok(_) => None,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                None
            }
        })
}

/// Language directories below `root`.
///
/// A language directory has a two-letter name. When `filter` is given,
/// only languages listed there are kept. The result is sorted.
pub fn determine_languages(root: &Path, filter: Option<&[String]>) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(SyncError::Configuration(format!(
            "The path {} does not exist.",
            root.display()
        )));
    }

    tracing::debug!(root = %root.display(), "Scanning for languages");
    let mut languages = Vec::new();
    for entry in children(root) {
        if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let wanted = filter.is_none_or(|only| only.iter().any(|lang| *lang == name));
        if name.chars().count() == 2 && wanted {
            tracing::debug!(language = %name, "using");
            languages.push(name);
        } else {
            tracing::debug!(language = %name, "not using");
        }
    }

    languages.sort();
    Ok(languages)
}

/// File names directly in `dir` ending in `.{extension}`, sorted.
///
/// Files whose domain (stem) matches `skip` are left out. A missing
/// directory yields no files.
#[must_use]
pub fn domain_files(dir: &Path, extension: &str, skip: &GlobSet) -> Vec<String> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<String> = children(dir)
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == extension))
        .filter_map(|entry| {
            let domain = entry.path().file_stem()?.to_string_lossy().into_owned();
            if skip.is_match(&domain) {
                tracing::debug!(%domain, "Skipping ignored domain");
                return None;
            }
            Some(entry.file_name().to_string_lossy().into_owned())
        })
        .collect();

    files.sort();
    files
}

/// Regular files directly in `dir`. A missing directory yields nothing.
pub(crate) fn files_in(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    children(dir)
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use globset::{
        Glob,
        GlobSetBuilder,
    };
    use googletest::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    fn language_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["en", "de", "fr", "pt_BR", "templates"] {
            fs::create_dir(temp_dir.path().join(dir)).unwrap();
        }
        fs::write(temp_dir.path().join("it"), "not a directory").unwrap();
        temp_dir
    }

    #[rstest]
    fn test_determine_languages_all() {
        let temp_dir = language_tree();

        let languages = determine_languages(temp_dir.path(), None).unwrap();

        assert_eq!(languages, vec!["de", "en", "fr"]);
    }

    #[rstest]
    fn test_determine_languages_with_filter() {
        let temp_dir = language_tree();
        let filter = vec!["fr".to_string(), "en".to_string(), "xx".to_string()];

        let languages = determine_languages(temp_dir.path(), Some(&filter)).unwrap();

        assert_eq!(languages, vec!["en", "fr"]);
    }

    #[googletest::test]
    fn test_determine_languages_missing_root() {
        let temp_dir = TempDir::new().unwrap();

        let result = determine_languages(&temp_dir.path().join("missing"), None);

        expect_that!(
            result.map_err(|e| e.to_string()),
            err(contains_substring("does not exist"))
        );
    }

    #[rstest]
    fn test_domain_files_filters_extension_and_skip_list() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["tl_news.php", "default.php", "modules.php", "notes.txt", "tl_old.php"] {
            fs::write(temp_dir.path().join(name), "<?php").unwrap();
        }
        fs::create_dir(temp_dir.path().join("sub.php")).unwrap();
        let mut builder = GlobSetBuilder::new();
        builder.add(Glob::new("tl_old").unwrap());
        builder.add(Glob::new("mod*").unwrap());
        let skip = builder.build().unwrap();

        let files = domain_files(temp_dir.path(), "php", &skip);

        assert_eq!(files, vec!["default.php", "tl_news.php"]);
    }

    #[rstest]
    fn test_domain_files_missing_directory() {
        let temp_dir = TempDir::new().unwrap();

        let files = domain_files(&temp_dir.path().join("nope"), "xlf", &GlobSet::empty());

        assert!(files.is_empty());
    }
}
