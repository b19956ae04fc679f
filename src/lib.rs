//! contao-xliff
//!
//! Keeps XLIFF translation files in sync with Contao PHP language files.
//!
//! The base-language Contao dictionary is authoritative for source texts
//! and for which keys exist. Translated texts are pulled from each
//! language's Contao files into XLIFF (`to-xliff`) or pushed back from
//! XLIFF into Contao (`from-xliff`).

pub mod codec;
pub mod config;
pub mod converter;
pub mod error;
pub mod remote;
pub mod scan;
pub mod sync;
mod test_utils;
pub mod translation;
pub mod types;

pub use converter::{
    ConvertOptions,
    ConvertSummary,
    Converter,
};
pub use error::{
    Result,
    SyncError,
};
pub use translation::{
    FileFormat,
    TranslationFile,
};
pub use types::{
    TranslationUnit,
    ValueSlot,
};
