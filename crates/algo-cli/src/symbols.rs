/// Declaration listing for Algo documents
/// Collects the variables of the `Var` section and the declared record types
use algo_lsp_core::{extract_record_types_with, extract_variables, Vocabulary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: String,
    /// Declared type; `None` for record types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// 1-based line of the declaration
    pub line: usize,
}

/// Extract declared symbols, ordered by line
pub fn extract_symbols(source: &str, vocabulary: &Vocabulary) -> Vec<Symbol> {
    let mut symbols: Vec<Symbol> = extract_variables(source)
        .into_iter()
        .map(|v| Symbol {
            name: v.name,
            kind: "variable".to_string(),
            type_name: Some(v.type_name),
            line: v.line + 1,
        })
        .collect();

    symbols.extend(
        extract_record_types_with(source, vocabulary.type_keyword())
            .into_iter()
            .map(|t| Symbol {
                name: t.name,
                kind: "record_type".to_string(),
                type_name: None,
                line: t.line + 1,
            }),
    );

    // Stable: declaration order is kept within a line
    symbols.sort_by_key(|s| s.line);
    symbols
}
