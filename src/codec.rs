//! Readers and writers for the two on-disk formats.

pub mod contao;
pub mod xliff;

use indexmap::IndexMap;

use crate::translation::Metadata;
use crate::types::TranslationUnit;

/// Result of parsing a document, before it is bound to a file.
#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub units: IndexMap<String, TranslationUnit>,
    pub metadata: Metadata,
}
