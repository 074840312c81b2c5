use algo_lsp_core::{Position as CorePosition, TypeRegistry, Vocabulary};
use tower_lsp::lsp_types::Position;

/// Represents an open document in the LSP server
pub struct Document {
    /// The current text content of the document
    text: String,
    /// Lines of the document (cached for position calculations)
    lines: Vec<String>,
}

impl Document {
    pub fn new(text: String) -> Self {
        let lines = split_lines(&text);
        Self { text, lines }
    }

    pub fn update_text(&mut self, new_text: String) {
        self.lines = split_lines(&new_text);
        self.text = new_text;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Record type names declared anywhere in the document with the
    /// vocabulary's type keyword.
    pub fn type_registry(&self, vocabulary: &Vocabulary) -> TypeRegistry {
        TypeRegistry::from_document_with(&self.text, vocabulary.type_keyword())
    }

    /// Core position (character column) for an LSP position (UTF-16 column).
    pub fn to_core_position(&self, position: Position) -> CorePosition {
        let line = position.line as usize;
        let column = self
            .lines
            .get(line)
            .map(|text| utf16_to_char_column(text, position.character))
            .unwrap_or(position.character as usize);
        CorePosition::new(line, column)
    }

    /// LSP position for a core position.
    pub fn to_lsp_position(&self, position: CorePosition) -> Position {
        let character = self
            .lines
            .get(position.line)
            .map(|text| char_to_utf16_column(text, position.column))
            .unwrap_or(position.column as u32);
        Position::new(position.line as u32, character)
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(|s| s.to_string()).collect()
}

/// Character index reached after `utf16` code units of `line`, clamped to
/// the line length.
pub fn utf16_to_char_column(line: &str, utf16: u32) -> usize {
    let mut units = 0u32;
    for (index, ch) in line.chars().enumerate() {
        if units >= utf16 {
            return index;
        }
        units += ch.len_utf16() as u32;
    }
    line.chars().count()
}

/// UTF-16 width of the first `column` characters of `line`.
pub fn char_to_utf16_column(line: &str, column: usize) -> u32 {
    line.chars().take(column).map(|c| c.len_utf16() as u32).sum()
}

/// UTF-16 width of `line[..byte]`.
pub fn byte_to_utf16_column(line: &str, byte: usize) -> u32 {
    line[..byte].encode_utf16().count() as u32
}
