//! Test helpers shared by several test modules.
#![cfg(test)]

use crate::translation::{
    FileFormat,
    TranslationFile,
};

/// Builds an in-memory Contao file for `language` with the given values.
pub(crate) fn contao_file(language: &str, entries: &[(&str, &str)]) -> TranslationFile {
    let mut file =
        TranslationFile::new(format!("/contao/{language}/default.php"), FileFormat::Contao);
    file.set_target_language(language);
    for (key, value) in entries {
        file.set_source(key, *value);
    }
    file
}

/// Builds an in-memory XLIFF file from `(key, source, target)` triples.
pub(crate) fn xliff_file(entries: &[(&str, &str, Option<&str>)]) -> TranslationFile {
    let mut file = TranslationFile::new("/xliff/de/default.xlf", FileFormat::Xliff);
    file.set_source_language("en");
    file.set_target_language("de");
    file.set_original("default");
    for (key, source, target) in entries {
        file.set_source(key, *source);
        if let Some(target) = target {
            file.set_target(key, *target);
        }
    }
    file
}

/// Flattens a file into comparable `(key, source, target)` rows.
pub(crate) fn snapshot(file: &TranslationFile) -> Vec<(String, Option<String>, Option<String>)> {
    file.units()
        .map(|(key, unit)| (key.to_string(), unit.source.clone(), unit.target.clone()))
        .collect()
}
