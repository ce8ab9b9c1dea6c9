//! Test case extraction from C++ suite sources
//!
//! A small tokenizer recognizes the signature shape of a test function:
//! return-type keyword, identifier, empty argument list. Comments and
//! literals are skipped so commented-out tests are never registered.

use serde::Serialize;

use crate::config::ExtractConfig;

// ============================================================================
// Types
// ============================================================================

/// One extracted test function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    /// Registered name (identifier with the configured prefix stripped)
    pub name: String,

    /// Full function identifier as written in the source
    pub function: String,

    /// 1-based line of the identifier
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Number,
    Punct(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// 1-based source line
    pub line: usize,
}

impl Token<'_> {
    fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == text
    }

    fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

const RAW_STRING_PREFIXES: &[&str] = &["R", "LR", "uR", "UR", "u8R"];

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, line: 1 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) {
        // Opening `/*` already consumed
        while let Some(c) = self.bump() {
            if c == '*' && self.peek() == Some('/') {
                self.bump();
                return;
            }
        }
    }

    /// Skip a quoted literal; the opening quote is already consumed
    fn skip_quoted(&mut self, quote: char) {
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.bump();
                    self.bump();
                }
                '\n' => return,
                _ if c == quote => {
                    self.bump();
                    return;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Skip `R"delim( ... )delim"`; positioned on the opening quote
    fn skip_raw_string(&mut self) {
        self.bump();
        let delim_start = self.pos;
        while let Some(c) = self.peek() {
            if c == '(' || c == '\n' {
                break;
            }
            self.bump();
        }
        let closing = format!("){}\"", &self.src[delim_start..self.pos]);
        match self.src[self.pos..].find(&closing) {
            Some(offset) => {
                let end = self.pos + offset + closing.len();
                while self.pos < end {
                    self.bump();
                }
            }
            None => {
                while self.bump().is_some() {}
            }
        }
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        loop {
            let c = self.peek()?;
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if c == '/' && self.peek_second() == Some('/') {
                self.skip_line_comment();
                continue;
            }
            if c == '/' && self.peek_second() == Some('*') {
                self.bump();
                self.bump();
                self.skip_block_comment();
                continue;
            }
            if c == '"' || c == '\'' {
                self.bump();
                self.skip_quoted(c);
                continue;
            }

            let start = self.pos;
            let line = self.line;

            if is_ident_start(c) {
                while self.peek().is_some_and(is_ident_continue) {
                    self.bump();
                }
                let text = &self.src[start..self.pos];
                if self.peek() == Some('"') && RAW_STRING_PREFIXES.contains(&text) {
                    self.skip_raw_string();
                    continue;
                }
                return Some(Token {
                    kind: TokenKind::Ident,
                    text,
                    line,
                });
            }

            if c.is_ascii_digit() {
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '.' || c == '\'' || c == '_')
                {
                    self.bump();
                }
                return Some(Token {
                    kind: TokenKind::Number,
                    text: &self.src[start..self.pos],
                    line,
                });
            }

            self.bump();
            return Some(Token {
                kind: TokenKind::Punct(c),
                text: &self.src[start..self.pos],
                line,
            });
        }
    }
}

/// Tokenize C++ source, dropping comments and literals
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(source);
    std::iter::from_fn(|| lexer.next_token()).collect()
}

// ============================================================================
// Extraction
// ============================================================================

/// Extract test cases in order of appearance.
///
/// Duplicates are kept; forward declarations (`void name();`) are skipped.
pub fn extract_test_cases(source: &str, config: &ExtractConfig) -> Vec<TestCase> {
    let tokens = tokenize(source);
    let mut cases = Vec::new();

    for (i, window) in tokens.windows(4).enumerate() {
        let [ret, name, open, close] = window else {
            continue;
        };
        if !ret.is_ident(&config.return_type)
            || name.kind != TokenKind::Ident
            || !open.is_punct('(')
            || !close.is_punct(')')
        {
            continue;
        }
        if tokens.get(i + 4).is_some_and(|next| next.is_punct(';')) {
            continue;
        }

        let Some(bare) = name.text.strip_prefix(config.strip_prefix.as_str()) else {
            continue;
        };
        if bare.is_empty() {
            continue;
        }

        cases.push(TestCase {
            name: bare.to_string(),
            function: name.text.to_string(),
            line: name.line,
        });
    }

    tracing::debug!("Extracted {} test case(s)", cases.len());
    cases
}

/// Names only, in order
pub fn extract_test_names(source: &str, config: &ExtractConfig) -> Vec<String> {
    extract_test_cases(source, config)
        .into_iter()
        .map(|case| case.name)
        .collect()
}

// ============================================================================
// Block scanning
// ============================================================================

/// Index of the `}` matching the `{` at `open`
pub fn find_block_end(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.is_punct('{') {
            depth += 1;
        } else if token.is_punct('}') {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// 1-based (opening, closing) lines of the first anonymous namespace
pub fn find_anonymous_namespace(tokens: &[Token<'_>]) -> Option<(usize, usize)> {
    let open = tokens
        .windows(2)
        .position(|w| w[0].is_ident("namespace") && w[1].is_punct('{'))?
        + 1;
    let close = find_block_end(tokens, open)?;
    Some((tokens[open - 1].line, tokens[close].line))
}

/// 1-based (first, last) lines of a top-level `<ret> <name>(...) { ... }`
/// definition, starting at the return type
pub fn find_function_definition(
    tokens: &[Token<'_>],
    return_type: &str,
    name: &str,
) -> Option<(usize, usize)> {
    let start = tokens.windows(3).position(|w| {
        w[0].is_ident(return_type) && w[1].is_ident(name) && w[2].is_punct('(')
    })?;
    let body = start + tokens[start..].iter().position(|t| t.is_punct('{'))?;
    if tokens[start..body].iter().any(|t| t.is_punct(';')) {
        return None;
    }
    let close = find_block_end(tokens, body)?;
    Some((tokens[start].line, tokens[close].line))
}
