//! Contao PHP language files.
//!
//! A language file is a sequence of assignments below
//! `$GLOBALS['TL_LANG']`. Each scalar leaf becomes one unit whose key is
//! the dot-joined path of array keys below `TL_LANG`:
//!
//! ```php
//! $GLOBALS['TL_LANG']['MSC']['yes'] = 'Yes';                 // MSC.yes
//! $GLOBALS['TL_LANG']['tl_content']['title'] = ['T', 'Help']; // tl_content.title.0, .1
//! ```
//!
//! An assignment replaces everything previously stored at or below its
//! path. Array keys containing `.` are rejected since they could not be
//! told apart from nesting.

mod lexer;

use std::fmt::Write as _;
use std::path::Path;

use indexmap::IndexMap;

use self::lexer::{
    Spanned,
    Token,
};
use super::ParsedDocument;
use crate::error::{
    Result,
    SyncError,
};
use crate::translation::TranslationFile;
use crate::types::TranslationUnit;

const NAMESPACE: &str = "TL_LANG";

/// Evaluated right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    /// `None` for `false`, `null` and `''`.
    Scalar(Option<String>),
    Array(Vec<(String, Value)>),
}

/// Parses a Contao language file.
///
/// Blank input yields an empty document. Anything that is not an
/// assignment of literals below `$GLOBALS['TL_LANG']` is an error.
pub fn parse(path: &Path, text: &str) -> Result<ParsedDocument> {
    let mut document = ParsedDocument::default();
    if text.trim().is_empty() {
        return Ok(document);
    }

    let tokens = lexer::tokenize(text).map_err(|e| SyncError::parse(path, e.to_string()))?;
    if tokens.first().map(|t| &t.token) != Some(&Token::OpenTag) {
        return Err(SyncError::parse(path, "missing <?php open tag"));
    }

    let mut parser = Parser { path, tokens, pos: 0 };
    while let Some((segments, value)) = parser.next_statement()? {
        assign(&segments, value, &mut document.units);
    }
    Ok(document)
}

/// Stores `value` at `segments`, replacing the previous subtree in place.
///
/// Scalars stored at an ancestor path are dropped.
fn assign(segments: &[String], value: Value, units: &mut IndexMap<String, TranslationUnit>) {
    let mut ancestor = String::new();
    for (depth, segment) in segments.iter().enumerate().take(segments.len().saturating_sub(1)) {
        if depth > 0 {
            ancestor.push('.');
        }
        ancestor.push_str(segment);
        units.shift_remove(&ancestor);
    }

    let root = segments.join(".");
    let nested = format!("{root}.");
    let in_subtree = |key: &str| key == root || key.starts_with(&nested);
    let position = units.keys().position(|key| in_subtree(key.as_str()));
    units.retain(|key, _| !in_subtree(key.as_str()));

    let mut leaves = Vec::new();
    flatten(root.clone(), value, &mut leaves);
    match position {
        Some(mut index) => {
            for (key, unit) in leaves {
                units.shift_insert(index, key, unit);
                index += 1;
            }
        }
        None => units.extend(leaves),
    }
}

fn flatten(prefix: String, value: Value, leaves: &mut Vec<(String, TranslationUnit)>) {
    match value {
        Value::Scalar(text) => {
            leaves.push((prefix, TranslationUnit { source: text, target: None }));
        }
        Value::Array(entries) => {
            for (key, value) in entries {
                flatten(format!("{prefix}.{key}"), value, leaves);
            }
        }
    }
}

struct Parser<'a> {
    path: &'a Path,
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|s| s.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl std::fmt::Display) -> SyncError {
        let line = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |s| s.line);
        SyncError::parse(self.path, format!("{message} on line {line}"))
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected {expected:?}, found {:?}", self.peek())))
        }
    }

    /// Returns the next assignment as (key path, value), skipping
    /// statements that carry no translations.
    fn next_statement(&mut self) -> Result<Option<(Vec<String>, Value)>> {
        loop {
            match self.peek() {
                None => return Ok(None),
                Some(Token::OpenTag | Token::CloseTag | Token::Semicolon) => {
                    self.pos += 1;
                }
                Some(Token::Ident(word))
                    if matches!(word.to_ascii_lowercase().as_str(), "declare" | "namespace" | "use") =>
                {
                    self.skip_statement();
                }
                Some(Token::Variable(name)) if name == "GLOBALS" => {
                    self.pos += 1;
                    return self.assignment().map(Some);
                }
                Some(other) => return Err(self.error(format!("unexpected {other:?}"))),
            }
        }
    }

    fn skip_statement(&mut self) {
        while let Some(token) = self.advance() {
            if token == Token::Semicolon {
                break;
            }
        }
    }

    fn assignment(&mut self) -> Result<(Vec<String>, Value)> {
        self.expect(&Token::LBracket)?;
        match self.advance() {
            Some(Token::Str(name)) if name == NAMESPACE => {}
            _ => return Err(self.error(format!("only $GLOBALS['{NAMESPACE}'] is supported"))),
        }
        self.expect(&Token::RBracket)?;

        let mut segments = Vec::new();
        while self.peek() == Some(&Token::LBracket) {
            self.pos += 1;
            segments.push(self.array_key()?);
            self.expect(&Token::RBracket)?;
        }
        if segments.is_empty() {
            return Err(self.error(format!("assignment to $GLOBALS['{NAMESPACE}'] needs a key")));
        }

        self.expect(&Token::Assign)?;
        let value = self.expression()?;
        match self.peek() {
            Some(Token::Semicolon) => self.pos += 1,
            Some(Token::CloseTag) | None => {}
            Some(other) => return Err(self.error(format!("expected ';', found {other:?}"))),
        }
        Ok((segments, value))
    }

    fn array_key(&mut self) -> Result<String> {
        match self.advance() {
            Some(Token::Str(key) | Token::Number(key)) => self.segment(key),
            other => Err(self.error(format!("unsupported array key {other:?}"))),
        }
    }

    fn segment(&self, key: String) -> Result<String> {
        if key.contains('.') {
            return Err(self.error(format!("array key '{key}' must not contain '.'")));
        }
        Ok(key)
    }

    /// `term ('.' term)*`; concatenation is only defined for scalars.
    fn expression(&mut self) -> Result<Value> {
        let first = self.term()?;
        if self.peek() != Some(&Token::Dot) {
            return Ok(first);
        }

        let mut joined = self.scalar_text(first)?;
        while self.peek() == Some(&Token::Dot) {
            self.pos += 1;
            let next = self.term()?;
            joined.push_str(&self.scalar_text(next)?);
        }
        Ok(Value::Scalar(Some(joined).filter(|s| !s.is_empty())))
    }

    fn scalar_text(&self, value: Value) -> Result<String> {
        match value {
            Value::Scalar(text) => Ok(text.unwrap_or_default()),
            Value::Array(_) => Err(self.error("cannot concatenate an array")),
        }
    }

    fn term(&mut self) -> Result<Value> {
        match self.advance() {
            Some(Token::Str(text)) => Ok(Value::Scalar(Some(text).filter(|s| !s.is_empty()))),
            Some(Token::Number(number)) => Ok(Value::Scalar(Some(number))),
            Some(Token::Minus) => match self.advance() {
                Some(Token::Number(number)) => Ok(Value::Scalar(Some(format!("-{number}")))),
                other => Err(self.error(format!("expected number after '-', found {other:?}"))),
            },
            Some(Token::LBracket) => self.array_items(&Token::RBracket),
            Some(Token::Ident(word)) => match word.to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Scalar(Some("1".to_string()))),
                "false" | "null" => Ok(Value::Scalar(None)),
                "array" => {
                    self.expect(&Token::LParen)?;
                    self.array_items(&Token::RParen)
                }
                _ => Err(self.error(format!("unsupported expression '{word}'"))),
            },
            other => Err(self.error(format!("unsupported expression {other:?}"))),
        }
    }

    /// Array entries up to `close`. Implicit keys continue after the
    /// highest integer key seen so far, as in PHP.
    fn array_items(&mut self, close: &Token) -> Result<Value> {
        let mut entries: Vec<(String, Value)> = Vec::new();
        // `None` once the largest integer key is taken.
        let mut next_index: Option<i64> = Some(0);

        loop {
            if self.peek() == Some(close) {
                self.pos += 1;
                break;
            }

            let first = self.expression()?;
            let (key, value) = if self.peek() == Some(&Token::DoubleArrow) {
                self.pos += 1;
                let key = self.scalar_text(first)?;
                let key = self.segment(key)?;
                (key, self.expression()?)
            } else {
                let index = next_index
                    .ok_or_else(|| self.error("cannot append after the largest integer key"))?;
                (index.to_string(), first)
            };
            if let Ok(index) = key.parse::<i64>() {
                next_index = next_index.zip(index.checked_add(1)).map(|(next, after)| next.max(after));
            }

            if let Some(existing) = entries.iter_mut().find(|(k, _)| *k == key) {
                existing.1 = value;
            } else {
                entries.push((key, value));
            }

            match self.peek() {
                Some(Token::Comma) => self.pos += 1,
                Some(token) if token == close => {}
                other => return Err(self.error(format!("expected ',' in array, found {other:?}"))),
            }
        }
        Ok(Value::Array(entries))
    }
}

/// Renders `file` as a Contao language file.
pub fn render(file: &TranslationFile) -> String {
    let mut out = String::from("<?php\n\n/**\n");
    out.push_str(" * This file is generated from XLIFF translations.\n");
    out.push_str(" * Changes made here are overwritten by the next conversion.\n");
    if let Some(language) = file.language() {
        let _ = writeln!(out, " *\n * language: {language}");
    }
    if let Some(date) = file.metadata().date.as_deref() {
        let _ = writeln!(out, " * last-updated: {date}");
    }
    out.push_str(" */\n\n");

    for (key, unit) in file.units() {
        let _ = write!(out, "$GLOBALS['{NAMESPACE}']");
        for segment in key.split('.') {
            if is_index(segment) {
                let _ = write!(out, "[{segment}]");
            } else {
                let _ = write!(out, "['{}']", quote(segment));
            }
        }
        let _ = writeln!(out, " = '{}';", quote(unit.source.as_deref().unwrap_or_default()));
    }
    out
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'))
}

fn quote(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}
