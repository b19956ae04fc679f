//! Contao → XLIFF: refresh interchange files from the Contao tree.

use std::collections::BTreeSet;

use super::{
    ConvertSummary,
    Converter,
    modified_time,
};
use crate::error::{
    Result,
    SyncError,
};
use crate::scan;
use crate::sync::sync_from;
use crate::translation::{
    FileFormat,
    TranslationFile,
};
use crate::types::ValueSlot;

/// Data type tag written into every generated XLIFF `<file>`.
const DATA_TYPE: &str = "php";

impl Converter<'_> {
    /// Updates `<xliff>/<lang>/<domain>.xlf` for every non-base language.
    ///
    /// Source texts come from the base language, targets from the
    /// language's own Contao file. Keys the base no longer defines are
    /// dropped.
    ///
    /// # Errors
    /// - The Contao root does not exist
    /// - A Contao or XLIFF file cannot be read, parsed or written
    pub fn to_xliff(&self) -> Result<ConvertSummary> {
        let contao_root = self.project.contao_dir();
        let base_language = self.project.base_language();
        let base_dir = contao_root.join(base_language);
        let domains =
            scan::domain_files(&base_dir, FileFormat::Contao.extension(), self.project.skip_files());
        tracing::debug!(count = domains.len(), dir = %base_dir.display(), "Found base files");

        let mut summary = ConvertSummary::default();
        for language in self.languages(contao_root)? {
            tracing::info!(%language, "processing language");

            let dest_dir = self.project.xliff_dir().join(&language);
            std::fs::create_dir_all(&dest_dir).map_err(|e| SyncError::io(&dest_dir, e))?;

            let mut manifest = BTreeSet::new();
            for file_name in &domains {
                tracing::debug!(file = %file_name, "processing file");

                let base_path = base_dir.join(file_name);
                let variant_path = contao_root.join(&language).join(file_name);
                let base = TranslationFile::open(&base_path, FileFormat::Contao)?;
                let variant = TranslationFile::open(&variant_path, FileFormat::Contao)?;

                let dest_name = format!("{}.{}", base.domain(), FileFormat::Xliff.extension());
                let mut dest = TranslationFile::open(dest_dir.join(&dest_name), FileFormat::Xliff)?;
                dest.set_data_type(DATA_TYPE);
                dest.set_source_language(base_language);
                dest.set_target_language(&language);
                dest.set_original(base.domain());
                let modified = modified_time(&variant_path).or_else(|| modified_time(&base_path));
                if let Some(time) = modified {
                    dest.set_date_from(time);
                }

                sync_from(&variant, &mut dest, ValueSlot::Target, false);
                sync_from(&base, &mut dest, ValueSlot::Source, true);

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
