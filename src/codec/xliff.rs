//! XLIFF 1.2 reader and writer.

use std::fmt::Display;
use std::path::Path;

use quick_xml::events::{
    BytesDecl,
    BytesEnd,
    BytesStart,
    BytesText,
    Event,
};
use quick_xml::{
    Reader,
    Writer,
};

use super::ParsedDocument;
use crate::error::{
    Result,
    SyncError,
};
use crate::translation::TranslationFile;
use crate::types::{
    TranslationUnit,
    ValueSlot,
};

const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";

/// Parses an XLIFF document into units and file-level metadata.
///
/// Only the first `<file>` element contributes metadata; units from every
/// `<file>` are merged. Content of `<alt-trans>` is ignored.
pub fn parse(path: &Path, text: &str) -> Result<ParsedDocument> {
    let mut reader = Reader::from_str(text);
    let mut state = ParseState::new(path);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => state.open(&e)?,
            Ok(Event::Empty(e)) => {
                state.open(&e)?;
                state.close(e.local_name().as_ref());
            }
            Ok(Event::End(e)) => state.close(e.local_name().as_ref()),
            Ok(Event::Text(e)) => {
                if state.capturing() {
                    let text = e.unescape().map_err(|err| SyncError::parse(path, err.to_string()))?;
                    state.push_text(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if state.capturing() {
                    state.push_text(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(SyncError::parse(
                    path,
                    format!("{err} (at byte {})", reader.buffer_position()),
                ));
            }
            Ok(_) => {}
        }
    }

    state.finish()
}

/// Element-level state while walking the event stream.
struct ParseState<'a> {
    path: &'a Path,
    document: ParsedDocument,
    depth: usize,
    seen_root: bool,
    seen_file: bool,
    /// Nesting depth inside an ignored subtree (`<alt-trans>`).
    skip_depth: usize,
    unit: Option<(String, TranslationUnit)>,
    capture: Option<(ValueSlot, String)>,
}

impl<'a> ParseState<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            document: ParsedDocument::default(),
            depth: 0,
            seen_root: false,
            seen_file: false,
            skip_depth: 0,
            unit: None,
            capture: None,
        }
    }

    const fn capturing(&self) -> bool {
        self.capture.is_some() && self.skip_depth == 0
    }

    fn push_text(&mut self, text: &str) {
        if let Some((_, buffer)) = &mut self.capture {
            buffer.push_str(text);
        }
    }

    fn open(&mut self, element: &BytesStart<'_>) -> Result<()> {
        self.depth += 1;
        let name = element.local_name();
        let name = name.as_ref();

        if !self.seen_root {
            if name != b"xliff" {
                return Err(SyncError::parse(
                    self.path,
                    format!("expected <xliff> root element, found <{}>", String::from_utf8_lossy(name)),
                ));
            }
            self.seen_root = true;
            return Ok(());
        }

        if self.skip_depth > 0 || name == b"alt-trans" {
            self.skip_depth += 1;
            return Ok(());
        }

        match name {
            b"file" if !self.seen_file => {
                self.seen_file = true;
                let metadata = &mut self.document.metadata;
                metadata.data_type = attribute(self.path, element, b"datatype")?;
                metadata.original = attribute(self.path, element, b"original")?;
                metadata.source_language = attribute(self.path, element, b"source-language")?;
                metadata.target_language = attribute(self.path, element, b"target-language")?;
                metadata.date = attribute(self.path, element, b"date")?;
            }
            b"trans-unit" => {
                let Some(id) = attribute(self.path, element, b"id")? else {
                    return Err(SyncError::parse(self.path, "<trans-unit> without id attribute"));
                };
                self.unit = Some((id, TranslationUnit::default()));
            }
            b"source" if self.unit.is_some() && self.capture.is_none() => {
                self.capture = Some((ValueSlot::Source, String::new()));
            }
            b"target" if self.unit.is_some() && self.capture.is_none() => {
                self.capture = Some((ValueSlot::Target, String::new()));
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        self.depth = self.depth.saturating_sub(1);
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return;
        }

        match name {
            b"source" | b"target" => {
                let slot = if name == b"source" { ValueSlot::Source } else { ValueSlot::Target };
                if let Some((capture_slot, text)) = self.capture.take_if(|(s, _)| *s == slot)
                    && let Some((_, unit)) = &mut self.unit
                {
                    unit.set(capture_slot, text);
                }
            }
            b"trans-unit" => {
                if let Some((id, unit)) = self.unit.take() {
                    self.document.units.insert(id, unit);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Result<ParsedDocument> {
        if !self.seen_root {
            return Err(SyncError::parse(self.path, "document has no <xliff> root element"));
        }
        if self.depth != 0 {
            return Err(SyncError::parse(self.path, "unexpected end of document"));
        }
        Ok(self.document)
    }
}

fn attribute(path: &Path, element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|err| SyncError::parse(path, err.to_string()))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr.unescape_value().map_err(|err| SyncError::parse(path, err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Renders `file` as an XLIFF 1.2 document.
///
/// `original` and `source-language` are mandatory in XLIFF and must have
/// been set; the remaining attributes are written only when present.
/// A unit without a recorded source gets no `<source>` element, so it
/// reads back as unset rather than empty.
pub fn render(file: &TranslationFile) -> Result<String> {
    let metadata = file.metadata();
    let original = metadata
        .original
        .as_deref()
        .ok_or(SyncError::MissingParameter { owner: "XliffFile", name: "original" })?;
    let source_language = metadata
        .source_language
        .as_deref()
        .ok_or(SyncError::MissingParameter { owner: "XliffFile", name: "source-language" })?;

    let mut out = XliffWriter { path: file.path(), writer: Writer::new_with_indent(Vec::new(), b' ', 2) };
    out.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    out.emit(Event::Start(
        BytesStart::new("xliff").with_attributes([("version", "1.2"), ("xmlns", XLIFF_NAMESPACE)]),
    ))?;

    let mut file_element = BytesStart::new("file");
    if let Some(data_type) = metadata.data_type.as_deref() {
        file_element.push_attribute(("datatype", data_type));
    }
    file_element.push_attribute(("original", original));
    file_element.push_attribute(("source-language", source_language));
    if let Some(target_language) = metadata.target_language.as_deref() {
        file_element.push_attribute(("target-language", target_language));
    }
    if let Some(date) = metadata.date.as_deref() {
        file_element.push_attribute(("date", date));
    }
    out.emit(Event::Start(file_element))?;
    out.emit(Event::Start(BytesStart::new("body")))?;

    for (key, unit) in file.units() {
        out.emit(Event::Start(BytesStart::new("trans-unit").with_attributes([("id", key)])))?;
        if let Some(source) = unit.source.as_deref() {
            out.text_element("source", source)?;
        }
        if let Some(target) = unit.target.as_deref() {
            out.text_element("target", target)?;
        }
        out.emit(Event::End(BytesEnd::new("trans-unit")))?;
    }

    out.emit(Event::End(BytesEnd::new("body")))?;
    out.emit(Event::End(BytesEnd::new("file")))?;
    out.emit(Event::End(BytesEnd::new("xliff")))?;

    let mut text = String::from_utf8(out.writer.into_inner())
        .map_err(|err| SyncError::parse(file.path(), err.to_string()))?;
    text.push('\n');
    Ok(text)
}

/// Indenting writer that reports failures against the target path.
struct XliffWriter<'a> {
    path: &'a Path,
    writer: Writer<Vec<u8>>,
}

impl XliffWriter<'_> {
    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(|err| write_error(self.path, &err))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        if text.is_empty() {
            return self.emit(Event::Empty(BytesStart::new(name)));
        }
        self.emit(Event::Start(BytesStart::new(name)))?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.emit(Event::End(BytesEnd::new(name)))
    }
}

fn write_error(path: &Path, error: &dyn Display) -> SyncError {
    SyncError::io(path, std::io::Error::other(error.to_string()))
}
