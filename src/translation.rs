//! In-memory translation file shared by both on-disk formats.

use std::path::{
    Path,
    PathBuf,
};
use std::time::SystemTime;

use chrono::{
    DateTime,
    SecondsFormat,
    Utc,
};
use indexmap::IndexMap;

use crate::codec::{
    self,
    ParsedDocument,
};
use crate::error::{
    Result,
    SyncError,
};
use crate::types::{
    TranslationUnit,
    ValueSlot,
};

/// On-disk representation of a translation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Contao PHP language file (`$GLOBALS['TL_LANG'][...] = ...;`).
    Contao,
    /// XLIFF 1.2 document.
    Xliff,
}

impl FileFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Contao => "php",
            Self::Xliff => "xlf",
        }
    }

    /// Contao files carry a single text per key; both slots address it.
    #[must_use]
    pub const fn is_monolingual(self) -> bool {
        matches!(self, Self::Contao)
    }
}

/// File-level attributes of an interchange document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub data_type: Option<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub original: Option<String>,
    pub date: Option<String>,
}

/// Ordered key → unit mapping bound to a path and a format.
#[derive(Debug, Clone)]
pub struct TranslationFile {
    path: PathBuf,
    format: FileFormat,
    /// File stem, fixed at construction.
    domain: String,
    units: IndexMap<String, TranslationUnit>,
    metadata: Metadata,
    /// Whether the file was present when it was opened.
    on_disk: bool,
}

impl TranslationFile {
    /// Creates an empty file bound to `path`; nothing is read.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, format: FileFormat) -> Self {
        let path = path.into();
        let domain =
            path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();

        Self {
            path,
            format,
            domain,
            units: IndexMap::new(),
            metadata: Metadata::default(),
            on_disk: false,
        }
    }

    /// Reads `path` if it exists.
    ///
    /// A missing file yields an empty instance; a malformed one is a
    /// [`SyncError::Parse`].
    pub fn open(path: impl Into<PathBuf>, format: FileFormat) -> Result<Self> {
        let mut file = Self::new(path, format);
        if !file.path.is_file() {
            tracing::trace!(path = %file.path.display(), "Translation file not found, starting empty");
            return Ok(file);
        }

        let text =
            std::fs::read_to_string(&file.path).map_err(|e| SyncError::io(&file.path, e))?;
        file.load(&text)?;
        file.on_disk = true;
        Ok(file)
    }

    /// Parses `text` as if it had been read from `path`.
    pub fn from_text(path: impl Into<PathBuf>, format: FileFormat, text: &str) -> Result<Self> {
        let mut file = Self::new(path, format);
        file.load(text)?;
        Ok(file)
    }

    fn load(&mut self, text: &str) -> Result<()> {
        let ParsedDocument { units, metadata } = match self.format {
            FileFormat::Contao => codec::contao::parse(&self.path, text)?,
            FileFormat::Xliff => codec::xliff::parse(&self.path, text)?,
        };
        self.units = units;
        self.metadata = metadata;
        Ok(())
    }

    /// Serializes the file in its own format.
    pub fn render(&self) -> Result<String> {
        match self.format {
            FileFormat::Contao => Ok(codec::contao::render(self)),
            FileFormat::Xliff => codec::xliff::render(self),
        }
    }

    /// Writes the file, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let text = self.render()?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
        }
        std::fs::write(&self.path, text).map_err(|e| SyncError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), keys = self.units.len(), "Saved translation file");
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn format(&self) -> FileFormat {
        self.format
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub const fn exists_on_disk(&self) -> bool {
        self.on_disk
    }

    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Language of the translated text, falling back to the source language.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.metadata.target_language.as_deref().or(self.metadata.source_language.as_deref())
    }

    pub fn set_data_type(&mut self, data_type: impl Into<String>) {
        self.metadata.data_type = Some(data_type.into());
    }

    pub fn set_source_language(&mut self, language: impl Into<String>) {
        self.metadata.source_language = Some(language.into());
    }

    pub fn set_target_language(&mut self, language: impl Into<String>) {
        self.metadata.target_language = Some(language.into());
    }

    pub fn set_original(&mut self, original: impl Into<String>) {
        self.metadata.original = Some(original.into());
    }

    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.metadata.date = Some(date.to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    pub fn set_date_from(&mut self, time: SystemTime) {
        self.set_date(DateTime::<Utc>::from(time));
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    pub fn units(&self) -> impl Iterator<Item = (&str, &TranslationUnit)> {
        self.units.iter().map(|(key, unit)| (key.as_str(), unit))
    }

    #[must_use]
    pub fn unit(&self, key: &str) -> Option<&TranslationUnit> {
        self.units.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.units.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Best available value: target, else source.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.units.get(key).and_then(TranslationUnit::best_value)
    }

    /// Value stored in `slot`. Monolingual files answer every slot with
    /// their single text.
    #[must_use]
    pub fn unit_value(&self, key: &str, slot: ValueSlot) -> Option<&str> {
        let unit = self.units.get(key)?;
        if self.format.is_monolingual() { unit.source.as_deref() } else { unit.get(slot) }
    }

    /// Stores `value` into `slot`, creating the unit at the end if needed.
    pub fn set_value(&mut self, key: &str, slot: ValueSlot, value: impl Into<String>) {
        let slot = if self.format.is_monolingual() { ValueSlot::Source } else { slot };
        if let Some(unit) = self.units.get_mut(key) {
            unit.set(slot, value);
        } else {
            let mut unit = TranslationUnit::default();
            unit.set(slot, value);
            self.units.insert(key.to_string(), unit);
        }
    }

    pub fn set_source(&mut self, key: &str, value: impl Into<String>) {
        self.set_value(key, ValueSlot::Source, value);
    }

    pub fn set_target(&mut self, key: &str, value: impl Into<String>) {
        self.set_value(key, ValueSlot::Target, value);
    }

    /// Removes `key`; returns whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.units.shift_remove(key).is_some()
    }
}
