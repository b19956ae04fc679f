//! XLIFF → Contao: write translated targets back into the Contao tree.

use std::collections::BTreeSet;

use super::{
    ConvertSummary,
    Converter,
    modified_time,
};
use crate::error::Result;
use crate::scan;
use crate::sync::sync_from;
use crate::translation::{
    FileFormat,
    TranslationFile,
};
use crate::types::ValueSlot;

impl Converter<'_> {
    /// Updates `<contao>/<lang>/<domain>.php` from every XLIFF file of
    /// every non-base language.
    ///
    /// Only target texts are copied. Keys without a translation are
    /// removed from the Contao file.
    ///
    /// # Errors
    /// - The XLIFF root does not exist
    /// - A Contao or XLIFF file cannot be read, parsed or written
    pub fn from_xliff(&self) -> Result<ConvertSummary> {
        let xliff_root = self.project.xliff_dir();
        let base_language = self.project.base_language();

        let mut summary = ConvertSummary::default();
        for language in self.languages(xliff_root)? {
            tracing::info!(%language, "processing language");

            let source_dir = xliff_root.join(&language);
            let dest_dir = self.project.contao_dir().join(&language);
            let domains = scan::domain_files(
                &source_dir,
                FileFormat::Xliff.extension(),
                self.project.skip_files(),
            );

            let mut manifest = BTreeSet::new();
            for file_name in &domains {
                tracing::debug!(file = %file_name, "processing file");

                let source_path = source_dir.join(file_name);
                let source = TranslationFile::open(&source_path, FileFormat::Xliff)?;

                let dest_name = format!("{}.{}", source.domain(), FileFormat::Contao.extension());
                let mut dest = TranslationFile::open(dest_dir.join(&dest_name), FileFormat::Contao)?;
                dest.set_source_language(base_language);
                dest.set_target_language(&language);
                dest.set_original(source.domain());
                if let Some(time) = modified_time(&source_path) {
                    dest.set_date_from(time);
                }

                sync_from(&source, &mut dest, ValueSlot::Target, true);

                if dest.exists_on_disk() || !dest.is_empty() {
                    dest.save()?;
                    summary.written.push(dest.path().to_path_buf());
                }
                manifest.insert(dest_name);
            }

            self.finish_language(&dest_dir, &manifest, &mut summary)?;
            summary.languages.push(language);
        }

        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;
    use std::path::{
        Path,
        PathBuf,
    };

    use googletest::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    use crate::config::{
        Project,
        ToolboxSettings,
    };
    use crate::converter::{
        ConvertOptions,
        Converter,
    };
    use crate::translation::{
        FileFormat,
        TranslationFile,
    };

    const XLIFF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file datatype="php" original="default" source-language="en" target-language="de">
    <body>
      <trans-unit id="MSC.yes">
        <source>Yes</source>
        <target>Ja</target>
      </trans-unit>
      <trans-unit id="MSC.no">
        <source>No</source>
      </trans-unit>
    </body>
  </file>
</xliff>
"#;

    fn project(root: &Path) -> Project {
        let settings = ToolboxSettings {
            languages_cto: Some(PathBuf::from("contao")),
            languages_tx: Some(PathBuf::from("xliff")),
            ..ToolboxSettings::default()
        };
        Project::from_settings(root, settings).unwrap()
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[rstest]
    fn test_writes_translated_targets_only() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "xliff/de/default.xlf", XLIFF);
        write(temp_dir.path(), "xliff/en/default.xlf", XLIFF);
        write(
            temp_dir.path(),
            "contao/de/default.php",
            "<?php\n$GLOBALS['TL_LANG']['MSC']['no'] = 'Nein';\n$GLOBALS['TL_LANG']['MSC']['gone'] = 'Weg';\n",
        );
        let project = project(temp_dir.path());
        let options = ConvertOptions::default();

        let summary = Converter::new(&project, &options).from_xliff().unwrap();

        let dest_path = temp_dir.path().join("contao/de/default.php");
        assert_eq!(summary.languages, vec!["de"]);
        assert_eq!(summary.written, vec![dest_path.clone()]);
        let dest = TranslationFile::open(&dest_path, FileFormat::Contao).unwrap();
        assert_eq!(dest.keys().collect::<Vec<_>>(), vec!["MSC.yes"]);
        assert_eq!(dest.value("MSC.yes"), Some("Ja"));
        assert!(!temp_dir.path().join("contao/en/default.php").exists());
    }

    #[googletest::test]
    fn test_untranslated_domain_creates_no_file() {
        let temp_dir = TempDir::new().unwrap();
        write(
            temp_dir.path(),
            "xliff/fr/default.xlf",
            &XLIFF.replace("<target>Ja</target>", "").replace("\"de\"", "\"fr\""),
        );
        let project = project(temp_dir.path());
        let options = ConvertOptions::default();

        let summary = Converter::new(&project, &options).from_xliff().unwrap();

        expect_that!(summary.written, is_empty());
        expect_that!(temp_dir.path().join("contao/fr/default.php").exists(), eq(false));
    }

    #[googletest::test]
    fn test_cleanup_removes_contao_files_without_xliff() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "xliff/de/default.xlf", XLIFF);
        write(temp_dir.path(), "contao/de/tl_old.php", "<?php\n");
        let project = project(temp_dir.path());
        let options = ConvertOptions::default().with_cleanup(true);

        let summary = Converter::new(&project, &options).from_xliff().unwrap();

        expect_that!(
            summary.removed,
            elements_are![eq(&temp_dir.path().join("contao/de/tl_old.php"))]
        );
        expect_that!(temp_dir.path().join("contao/de/default.php").is_file(), eq(true));
    }
}
