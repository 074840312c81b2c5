use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;
use std::sync::Arc;

use algo_lsp_core::{LineScanState, Tokenizer, Vocabulary};
use nu_ansi_term::Color;

use crate::completer::EngineCompleter;
use crate::highlighter::highlight_line;

pub struct ReplHelper {
    vocabulary: Arc<Vocabulary>,
    completer: EngineCompleter,
    /// Scan state after the last committed line
    state: LineScanState,
}

impl ReplHelper {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            completer: EngineCompleter::new(vocabulary.clone()),
            vocabulary,
            state: LineScanState::new(),
        }
    }

    /// Record a finished line so later lines see its declarations.
    pub fn commit(&mut self, line: &str) {
        let tokenizer = Tokenizer::new(&self.vocabulary);
        tokenizer.scan_line(line, &mut self.state);
        self.completer.push_line(line);
    }

    pub fn reset(&mut self) {
        self.state = LineScanState::new();
        self.completer.clear();
    }

    pub fn session(&self) -> &[String] {
        self.completer.session()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }
}

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<Self::Hint> {
        self.completer.hint(line, pos, ctx)
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let tokenizer = Tokenizer::new(&self.vocabulary);
        // Highlighting the edit buffer must not advance the committed state.
        let mut state = self.state.clone();
        Cow::Owned(highlight_line(&tokenizer, line, &mut state))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(Color::DarkGray.paint(hint).to_string())
    }
}

impl Validator for ReplHelper {}
