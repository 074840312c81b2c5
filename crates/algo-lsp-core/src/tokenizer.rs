//! Line-oriented lexical classifier for syntax highlighting.
//!
//! The scan is single pass and fail-soft: every step consumes at least one
//! character and anything unrecognised becomes an unclassified token. The only
//! state carried from one line to the next is [`LineScanState`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::symbols::TypeRegistry;
use crate::vocabulary::{Vocabulary, WordClass};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Keyword,
    Type,
    Builtin,
    Atom,
    Operator,
    String,
    Number,
    Punctuation,
    Comment,
    /// Name introduced by a type declaration.
    Definition,
    Identifier,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Type => "type",
            TokenKind::Builtin => "builtin",
            TokenKind::Atom => "atom",
            TokenKind::Operator => "operator",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Comment => "comment",
            TokenKind::Definition => "definition",
            TokenKind::Identifier => "identifier",
        }
    }
}

impl From<WordClass> for TokenKind {
    fn from(class: WordClass) -> Self {
        match class {
            WordClass::Keyword => TokenKind::Keyword,
            WordClass::Type => TokenKind::Type,
            WordClass::Builtin => TokenKind::Builtin,
            WordClass::Atom => TokenKind::Atom,
            WordClass::Operator => TokenKind::Operator,
        }
    }
}

/// A span of one line. Offsets are bytes; `kind` is `None` for whitespace and
/// for characters no rule accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: Option<TokenKind>,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// State handed from line N to line N+1 within one top-to-bottom scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineScanState {
    /// The previous word was the type declaration keyword.
    pub expect_type_name: bool,
    /// Lower-cased type names declared so far in this scan.
    pub user_types: BTreeSet<String>,
}

impl LineScanState {
    /// State at the first line of a fresh scan.
    pub fn new() -> Self {
        Self::default()
    }
}

const OPERATORS: [&str; 12] = ["<-", ":=", "<=", ">=", "<>", "<", ">", "+", "-", "*", "/", "="];
const PUNCTUATION: &[char] = &[';', ':', ',', '[', ']', '(', ')', '{', '}', '^', '&', '.'];

pub struct Tokenizer<'v> {
    vocabulary: &'v Vocabulary,
    registry: Option<&'v TypeRegistry>,
}

impl<'v> Tokenizer<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self {
            vocabulary,
            registry: None,
        }
    }

    /// Also classify names found in `registry` as types.
    pub fn with_registry(vocabulary: &'v Vocabulary, registry: &'v TypeRegistry) -> Self {
        Self {
            vocabulary,
            registry: Some(registry),
        }
    }

    /// Pure form: classify `line` under `state` and return the state for the
    /// next line.
    pub fn tokenize_line(&self, line: &str, state: &LineScanState) -> (Vec<Token>, LineScanState) {
        let mut next = state.clone();
        let tokens = self.scan_line(line, &mut next);
        (tokens, next)
    }

    /// Classify `line`, updating `state` in place.
    pub fn scan_line(&self, line: &str, state: &mut LineScanState) -> Vec<Token> {
        let mut scanner = LineScanner::new(line);
        let mut tokens = Vec::new();

        while !scanner.is_done() {
            let start = scanner.pos;
            let kind = self.next_token(&mut scanner, state);
            debug_assert!(scanner.pos > start, "tokenizer must always advance");
            tokens.push(Token {
                kind,
                start,
                end: scanner.pos,
            });
        }
        tokens
    }

    /// Scan a whole document from a fresh state.
    pub fn scan_document(&self, text: &str) -> Vec<Vec<Token>> {
        let mut state = LineScanState::new();
        text.lines()
            .map(|line| self.scan_line(line, &mut state))
            .collect()
    }

    fn next_token(&self, s: &mut LineScanner<'_>, state: &mut LineScanState) -> Option<TokenKind> {
        if s.eat_whitespace() {
            return None;
        }
        if s.eat_comment() {
            return Some(TokenKind::Comment);
        }
        if s.eat_string() {
            return Some(TokenKind::String);
        }
        if s.eat_number() {
            return Some(TokenKind::Number);
        }
        if s.eat_str("->") {
            return Some(TokenKind::Operator);
        }
        if OPERATORS.iter().any(|op| s.eat_str(op)) {
            return Some(TokenKind::Operator);
        }
        if s.eat_char_in(PUNCTUATION) {
            return Some(TokenKind::Punctuation);
        }
        if let Some(word) = s.eat_word() {
            return Some(self.classify_word(word, state));
        }

        s.bump();
        None
    }

    fn classify_word(&self, word: &str, state: &mut LineScanState) -> TokenKind {
        let lower = word.to_lowercase();

        if state.expect_type_name {
            state.expect_type_name = false;
            state.user_types.insert(lower);
            return TokenKind::Definition;
        }
        if lower == self.vocabulary.type_keyword() {
            state.expect_type_name = true;
            return TokenKind::Keyword;
        }
        if let Some(class) = self.vocabulary.classify(&lower) {
            return class.into();
        }
        if state.user_types.contains(&lower) {
            return TokenKind::Type;
        }
        if self.registry.is_some_and(|r| r.contains(&lower)) {
            return TokenKind::Type;
        }
        TokenKind::Identifier
    }
}

/// Cursor over one line.
struct LineScanner<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> LineScanner<'a> {
    fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.line.len()
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn eat_char_in(&mut self, set: &[char]) -> bool {
        match self.peek() {
            Some(c) if set.contains(&c) => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        self.pos - start
    }

    fn eat_whitespace(&mut self) -> bool {
        self.eat_while(char::is_whitespace) > 0
    }

    /// `//` or `#` (not followed by a digit) to end of line.
    fn eat_comment(&mut self) -> bool {
        let rest = self.rest();
        let hash_comment = rest.starts_with('#')
            && !rest[1..].starts_with(|c: char| c.is_ascii_digit());
        if rest.starts_with("//") || hash_comment {
            self.pos = self.line.len();
            true
        } else {
            false
        }
    }

    /// Double or single quoted, backslash escapes, unterminated strings run to
    /// the end of the line.
    fn eat_string(&mut self) -> bool {
        let Some(quote) = self.peek().filter(|c| *c == '"' || *c == '\'') else {
            return false;
        };
        self.bump();
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == quote {
                break;
            }
        }
        true
    }

    /// Digits, optionally followed by `.` and more digits.
    fn eat_number(&mut self) -> bool {
        if self.eat_while(|c| c.is_ascii_digit()) == 0 {
            return false;
        }
        if self.eat_str(".") {
            self.eat_while(|c| c.is_ascii_digit());
        }
        true
    }

    /// Identifier with internal hyphens; a hyphen before `>` is left for the
    /// arrow operator.
    fn eat_word(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.peek().is_some_and(is_word_start) {
            return None;
        }
        self.bump();
        loop {
            self.eat_while(is_word_char);
            let rest = self.rest();
            if rest.starts_with('-') && !rest[1..].starts_with('>') {
                self.bump();
            } else {
                break;
            }
        }
        Some(&self.line[start..self.pos])
    }
}

fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{C0}'..='\u{FF}').contains(&c)
}

fn is_word_start(c: char) -> bool {
    is_latin_letter(c) || c == '_'
}

fn is_word_char(c: char) -> bool {
    is_word_start(c) || c.is_ascii_digit()
}
