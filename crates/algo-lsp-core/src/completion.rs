//! Context-aware completion for Algo documents.
//!
//! A request first checks a small table of grammar positions (loop headers,
//! declarations). If one applies, its suggestions are returned alone.
//! Otherwise every vocabulary table, the snippet table, the declared variables
//! and the declared record types are filtered by the word left of the cursor,
//! then deduplicated and ranked.

use std::cmp::Ordering;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::position::{byte_offset, Position};
use crate::symbols::{extract_record_types_with, extract_variables};
use crate::vocabulary::Vocabulary;

/// The kind of a suggestion. Declaration order is ranking priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Variable,
    Snippet,
    Keyword,
    Type,
    Builtin,
    Atom,
    Operator,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Variable => "variable",
            SuggestionKind::Snippet => "snippet",
            SuggestionKind::Keyword => "keyword",
            SuggestionKind::Type => "type",
            SuggestionKind::Builtin => "builtin",
            SuggestionKind::Atom => "atom",
            SuggestionKind::Operator => "operator",
        }
    }

    /// Lower sorts first.
    pub fn priority(&self) -> u8 {
        *self as u8
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Inserted text; the template body for snippets.
    pub text: String,
    pub display_text: String,
    pub kind: SuggestionKind,
    /// Lower-case word the typed fragment is compared with.
    pub key: String,
}

impl Suggestion {
    fn new(text: impl Into<String>, display_text: impl Into<String>, kind: SuggestionKind) -> Self {
        let text = text.into();
        let key = text.to_lowercase();
        Self {
            text,
            display_text: display_text.into(),
            kind,
            key,
        }
    }

    fn keyed(mut self, key: &str) -> Self {
        self.key = key.to_lowercase();
        self
    }

    /// Whether accepting this suggestion inserts several lines.
    pub fn is_multiline(&self) -> bool {
        self.text.contains('\n')
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub items: Vec<Suggestion>,
    pub replace_from: Position,
    pub replace_to: Position,
}

impl CompletionResult {
    fn empty_at(cursor: Position) -> Self {
        Self {
            items: Vec::new(),
            replace_from: cursor,
            replace_to: cursor,
        }
    }
}

/// Syntactic positions with a fixed suggestion list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrammarContext {
    /// `Var|`: a declaration type follows.
    AfterVarKeyword,
    /// `x :|` in a program with a variable section.
    AfterDeclarationColon,
    /// `Pour i|`: the loop assignment follows.
    AfterLoopVariable,
    /// `Pour i := 0|`: the range keyword follows.
    AfterLoopStart,
    /// `Pour i := 0 a 10|`: the body keyword follows.
    AfterLoopBounds,
}

const LOOP_HEADER: &str = r"\bPour\s+[a-z_][a-z0-9_-]*\s*";
const BOUND: &str = r"(?:\d+\s*|[a-z_][a-z0-9_-]*\s+)";

/// Evaluated in order against the text between line start and cursor.
static GRAMMAR_CONTEXTS: Lazy<Vec<(GrammarContext, Regex)>> = Lazy::new(|| {
    let table = [
        (GrammarContext::AfterVarKeyword, r"(?i)\bVar\s*$".to_string()),
        (GrammarContext::AfterDeclarationColon, r":\s*$".to_string()),
        (GrammarContext::AfterLoopVariable, format!(r"(?i){LOOP_HEADER}$")),
        (
            GrammarContext::AfterLoopStart,
            format!(r"(?i){LOOP_HEADER}(?::=|<-)\s*{BOUND}$"),
        ),
        (
            GrammarContext::AfterLoopBounds,
            format!(r"(?i){LOOP_HEADER}(?::=|<-)\s*{BOUND}\ba\s+{BOUND}$"),
        ),
    ];
    table
        .into_iter()
        .map(|(context, pattern)| {
            let regex = Regex::new(&pattern).expect("grammar context pattern is valid");
            (context, regex)
        })
        .collect()
});

static VAR_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bvar\b").expect("var keyword pattern is valid"));

/// Grammar position of the cursor, given the line text before it.
pub fn detect_context(before_cursor: &str, document: &str) -> Option<GrammarContext> {
    GRAMMAR_CONTEXTS
        .iter()
        .find(|(context, regex)| {
            regex.is_match(before_cursor)
                && (*context != GrammarContext::AfterDeclarationColon
                    || VAR_KEYWORD.is_match(document))
        })
        .map(|(context, _)| *context)
}

/// Start column (in characters) and lower-cased text of the word ending at
/// the end of `before_cursor`.
pub fn word_fragment(before_cursor: &str) -> (usize, String) {
    let chars: Vec<char> = before_cursor.chars().collect();
    let mut start = chars.len();
    while start > 0 && is_fragment_char(chars[start - 1]) {
        start -= 1;
    }
    let fragment: String = chars[start..].iter().collect();
    (start, fragment.to_lowercase())
}

fn is_fragment_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

pub struct CompletionEngine<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> CompletionEngine<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Ranked suggestions for `cursor` in `document`. Never fails: positions
    /// outside the document give an empty list.
    pub fn compute(&self, document: &str, cursor: Position) -> CompletionResult {
        let lines: Vec<&str> = document.lines().collect();
        let line = match lines.get(cursor.line) {
            Some(line) => *line,
            // The line after a trailing newline exists but is empty.
            None if cursor.line == lines.len() => "",
            None => return CompletionResult::empty_at(cursor),
        };

        let column = cursor.column.min(line.chars().count());
        let cursor = Position::new(cursor.line, column);
        let before_cursor = &line[..byte_offset(line, column)];

        if let Some(context) = detect_context(before_cursor, document) {
            let items = self.context_suggestions(context);
            tracing::debug!(?context, count = items.len(), "grammar position completion");
            // An empty context list falls through to prefix completion.
            if !items.is_empty() {
                return CompletionResult {
                    items,
                    replace_from: cursor,
                    replace_to: cursor,
                };
            }
        }

        let (start, fragment) = word_fragment(before_cursor);
        let items = self.prefix_suggestions(document, &fragment);
        tracing::debug!(fragment = %fragment, count = items.len(), "prefix completion");

        CompletionResult {
            items,
            replace_from: Position::new(cursor.line, start),
            replace_to: cursor,
        }
    }

    /// Fixed suggestions of a grammar position.
    pub fn context_suggestions(&self, context: GrammarContext) -> Vec<Suggestion> {
        let types = self.vocabulary.types();
        match context {
            GrammarContext::AfterVarKeyword => types
                .iter()
                .map(|t| Suggestion::new(format!(": {t};"), format!(": {t}"), SuggestionKind::Type))
                .collect(),
            GrammarContext::AfterDeclarationColon => types
                .iter()
                .map(|t| Suggestion::new(format!("{t};"), t.as_str(), SuggestionKind::Type))
                .collect(),
            GrammarContext::AfterLoopVariable => vec![
                Suggestion::new(":= ", ":=", SuggestionKind::Operator),
                Suggestion::new("<- ", "<-", SuggestionKind::Operator),
            ],
            GrammarContext::AfterLoopStart => {
                vec![Suggestion::new("a ", "a (to)", SuggestionKind::Keyword)]
            }
            GrammarContext::AfterLoopBounds => {
                vec![Suggestion::new("Faire", "Faire", SuggestionKind::Keyword)]
            }
        }
    }

    fn prefix_suggestions(&self, document: &str, fragment: &str) -> Vec<Suggestion> {
        let mut candidates = self.candidates(document);
        candidates.retain(|s| s.key.starts_with(fragment));

        // A snippet supersedes the bare keyword it expands.
        candidates.retain(|s| {
            s.kind != SuggestionKind::Keyword || !self.vocabulary.has_snippet(&s.key)
        });

        let mut seen = HashSet::new();
        candidates.retain(|s| seen.insert((s.text.clone(), s.kind)));

        candidates.sort_by(|a, b| rank(a, b, fragment));
        candidates
    }

    /// Every suggestion source, in collection order.
    fn candidates(&self, document: &str) -> Vec<Suggestion> {
        let vocab = self.vocabulary;
        let mut out = Vec::new();

        out.extend(vocab.snippets().iter().map(|s| {
            Suggestion::new(s.body.as_str(), s.label.as_str(), SuggestionKind::Snippet).keyed(&s.trigger)
        }));
        let plain = [
            (vocab.keywords(), SuggestionKind::Keyword),
            (vocab.types(), SuggestionKind::Type),
        ];
        for (words, kind) in plain {
            out.extend(words.iter().map(|w| Suggestion::new(w.as_str(), w.as_str(), kind)));
        }
        out.extend(vocab.builtins().iter().map(|b| {
            let call = format!("{b}()");
            Suggestion::new(call.clone(), call, SuggestionKind::Builtin).keyed(b)
        }));
        let plain = [
            (vocab.atoms(), SuggestionKind::Atom),
            (vocab.operators(), SuggestionKind::Operator),
        ];
        for (words, kind) in plain {
            out.extend(words.iter().map(|w| Suggestion::new(w.as_str(), w.as_str(), kind)));
        }

        out.extend(extract_variables(document).into_iter().map(|v| {
            let display = format!("{} : {}", v.name, v.type_name);
            Suggestion::new(v.name, display, SuggestionKind::Variable)
        }));
        out.extend(
            extract_record_types_with(document, vocab.type_keyword())
                .into_iter()
                .map(|t| {
                    let display = format!("{} (Enregistrement)", t.name);
                    Suggestion::new(t.name, display, SuggestionKind::Type)
                }),
        );
        out
    }
}

/// Exact matches first, then kind priority, then insertion text.
fn rank(a: &Suggestion, b: &Suggestion, fragment: &str) -> Ordering {
    let a_exact = a.key == fragment;
    let b_exact = b.key == fragment;
    b_exact
        .cmp(&a_exact)
        .then_with(|| a.kind.priority().cmp(&b.kind.priority()))
        .then_with(|| a.text.to_lowercase().cmp(&b.text.to_lowercase()))
        .then_with(|| a.text.cmp(&b.text))
}

/// Completions with the built-in Algo vocabulary.
pub fn compute_completions(document: &str, cursor: Position) -> CompletionResult {
    CompletionEngine::new(Vocabulary::algo()).compute(document, cursor)
}
