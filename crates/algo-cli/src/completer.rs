use std::sync::Arc;

use algo_lsp_core::position::byte_offset;
use algo_lsp_core::{CompletionEngine, CompletionResult, Position, Vocabulary};
use rustyline::completion::{Completer, Pair};
use rustyline::hint::Hinter;
use rustyline::Context;

/// Completion and hints for the line being edited, computed against the lines
/// already entered in the session.
pub struct EngineCompleter {
    vocabulary: Arc<Vocabulary>,
    session: Vec<String>,
}

impl EngineCompleter {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            vocabulary,
            session: Vec::new(),
        }
    }

    pub fn session(&self) -> &[String] {
        &self.session
    }

    pub fn push_line(&mut self, line: &str) {
        self.session.push(line.to_string());
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }

    /// Engine result for `line` with the cursor at byte `pos`.
    fn compute(&self, line: &str, pos: usize) -> CompletionResult {
        let mut document = self.session.join("\n");
        if !self.session.is_empty() {
            document.push('\n');
        }
        document.push_str(line);

        let column = line[..pos].chars().count();
        let cursor = Position::new(self.session.len(), column);
        CompletionEngine::new(&self.vocabulary).compute(&document, cursor)
    }

    /// Byte offset where the replacement starts, and the candidates.
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let result = self.compute(line, pos);
        let start = byte_offset(line, result.replace_from.column);

        let pairs = result
            .items
            .iter()
            .map(|s| Pair {
                display: format!("{:<28} {}", s.display_text, s.kind.as_str()),
                replacement: s.text.clone(),
            })
            .collect();
        (start, pairs)
    }

    /// Rest of the best single-line suggestion for the word before the cursor.
    pub fn hint_for(&self, line: &str, pos: usize) -> Option<String> {
        if pos < line.len() {
            return None;
        }

        let result = self.compute(line, pos);
        let typed = &line[byte_offset(line, result.replace_from.column)..pos];
        let typed_chars = typed.chars().count();
        if typed_chars < 2 {
            return None;
        }

        let best = result.items.first().filter(|s| !s.is_multiline())?;
        if !best.text.to_lowercase().starts_with(&typed.to_lowercase()) {
            return None;
        }
        let remaining: String = best.text.chars().skip(typed_chars).collect();
        if remaining.is_empty() {
            None
        } else {
            Some(remaining)
        }
    }
}

impl Completer for EngineCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

impl Hinter for EngineCompleter {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        self.hint_for(line, pos)
    }
}
