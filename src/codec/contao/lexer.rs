//! Tokenizer for the subset of PHP used by Contao language files.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token {
    OpenTag,
    CloseTag,
    /// `$name`, without the dollar sign.
    Variable(String),
    Ident(String),
    /// Decoded string literal.
    Str(String),
    Number(String),
    LBracket,
    RBracket,
    LParen,
    RParen,
    Assign,
    DoubleArrow,
    Comma,
    Semicolon,
    Dot,
    Minus,
    Other(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Spanned {
    pub(super) token: Token,
    pub(super) line: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} on line {line}")]
pub(super) struct LexError {
    pub(super) line: usize,
    pub(super) message: String,
}

/// Splits `text` into tokens. Text before `<?php` is ignored.
pub(super) fn tokenize(text: &str) -> Result<Vec<Spanned>, LexError> {
    let mut lexer = Lexer { chars: text.chars().collect(), pos: 0, line: 1, tokens: Vec::new() };
    lexer.run()?;
    Ok(lexer.tokens)
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    tokens: Vec<Spanned>,
}

impl Lexer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern.chars().enumerate().all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError { line: self.line, message: message.into() }
    }

    fn push(&mut self, token: Token, line: usize) {
        self.tokens.push(Spanned { token, line });
    }

    fn run(&mut self) -> Result<(), LexError> {
        // Inline content before the open tag.
        while self.peek().is_some() && !self.starts_with("<?php") {
            self.bump();
        }

        while let Some(c) = self.peek() {
            let line = self.line;
            if c.is_whitespace() {
                self.bump();
            } else if self.starts_with("<?php") {
                self.pos += 5;
                self.push(Token::OpenTag, line);
            } else if self.starts_with("?>") {
                self.pos += 2;
                self.push(Token::CloseTag, line);
            } else if self.starts_with("//") || c == '#' {
                self.skip_line_comment();
            } else if self.starts_with("/*") {
                self.skip_block_comment()?;
            } else if c == '\'' {
                self.bump();
                let value = self.single_quoted()?;
                self.push(Token::Str(value), line);
            } else if c == '"' {
                self.bump();
                let value = self.double_quoted()?;
                self.push(Token::Str(value), line);
            } else if c == '$' {
                self.bump();
                let name = self.word();
                if name.is_empty() {
                    return Err(self.error("expected variable name after '$'"));
                }
                self.push(Token::Variable(name), line);
            } else if c.is_ascii_digit() {
                let number = self.word();
                self.push(Token::Number(number), line);
            } else if c.is_alphabetic() || c == '_' || c == '\\' {
                let ident = self.word();
                self.push(Token::Ident(ident), line);
            } else {
                self.punctuation(c, line);
            }
        }
        Ok(())
    }

    fn punctuation(&mut self, c: char, line: usize) {
        self.bump();
        let token = match c {
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '.' => Token::Dot,
            '-' => Token::Minus,
            '=' if self.peek() == Some('>') => {
                self.bump();
                Token::DoubleArrow
            }
            '=' => Token::Assign,
            other => Token::Other(other),
        };
        self.push(token, line);
    }

    /// Identifier-like run: letters, digits, `_`, `\` and (for numbers) `.`.
    fn word(&mut self) -> String {
        let numeric = self.peek().is_some_and(|c| c.is_ascii_digit());
        let mut out = String::new();
        while let Some(c) = self.peek() {
            let accepted = c.is_alphanumeric()
                || c == '_'
                || c == '\\'
                || (numeric && c == '.' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit()));
            if !accepted {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            // A close tag ends a line comment as well.
            if c == '\n' || self.starts_with("?>") {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.line;
        self.pos += 2;
        while self.peek().is_some() {
            if self.starts_with("*/") {
                self.pos += 2;
                return Ok(());
            }
            self.bump();
        }
        Err(LexError { line: start, message: "unterminated comment".to_string() })
    }

    fn single_quoted(&mut self) -> Result<String, LexError> {
        let start = self.line;
        let mut out = String::new();
        while let Some(c) = self.bump() {
            match c {
                '\'' => return Ok(out),
                '\\' if matches!(self.peek(), Some('\'' | '\\')) => {
                    if let Some(escaped) = self.bump() {
                        out.push(escaped);
                    }
                }
                other => out.push(other),
            }
        }
        Err(LexError { line: start, message: "unterminated string".to_string() })
    }

    fn double_quoted(&mut self) -> Result<String, LexError> {
        let start = self.line;
        let mut out = String::new();
        while let Some(c) = self.bump() {
            match c {
                '"' => return Ok(out),
                '$' if self.peek().is_some_and(|n| n.is_alphabetic() || n == '_' || n == '{') => {
                    return Err(self.error("variable interpolation is not supported"));
                }
                '\\' => self.escape(&mut out),
                other => out.push(other),
            }
        }
        Err(LexError { line: start, message: "unterminated string".to_string() })
    }

    fn escape(&mut self, out: &mut String) {
        let Some(c) = self.peek() else {
            out.push('\\');
            return;
        };
        let simple = match c {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            'v' => Some('\u{0b}'),
            'e' => Some('\u{1b}'),
            'f' => Some('\u{0c}'),
            '\\' => Some('\\'),
            '$' => Some('$'),
            '"' => Some('"'),
            _ => None,
        };
        if let Some(decoded) = simple {
            self.bump();
            out.push(decoded);
            return;
        }

        if c == 'x' && self.peek_at(1).is_some_and(|h| h.is_ascii_hexdigit()) {
            self.bump();
            let digits = self.take_while_max(2, |h| h.is_ascii_hexdigit());
            push_code_point(out, u32::from_str_radix(&digits, 16).ok());
        } else if c == 'u' && self.peek_at(1) == Some('{') {
            self.bump();
            self.bump();
            let digits = self.take_while_max(6, |h| h.is_ascii_hexdigit());
            if self.peek() == Some('}') {
                self.bump();
            }
            push_code_point(out, u32::from_str_radix(&digits, 16).ok());
        } else if ('0'..='7').contains(&c) {
            let digits = self.take_while_max(3, |o| ('0'..='7').contains(&o));
            push_code_point(out, u32::from_str_radix(&digits, 8).ok());
        } else {
            // Unknown escapes are kept verbatim.
            out.push('\\');
        }
    }

    fn take_while_max(&mut self, max: usize, accept: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while out.len() < max {
            match self.peek() {
                Some(c) if accept(c) => {
                    out.push(c);
                    self.bump();
                }
                _ => break,
            }
        }
        out
    }
}

fn push_code_point(out: &mut String, code: Option<u32>) {
    if let Some(c) = code.and_then(char::from_u32) {
        out.push(c);
    }
}
