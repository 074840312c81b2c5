//! Declaration scanning.
//! Extracts declared variables and record type names from raw document text.
//! Nothing here is cached: callers rescan on every request.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// First `Var` section keyword.
static VAR_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bvar\s+").expect("var section pattern is valid"));

/// Keyword closing the variable section.
static SECTION_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:debut|const)\b").expect("section end pattern is valid")
});

/// `a, b[10] : Entier` style clause; group 1 holds the name list, group 2 the type.
static VAR_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)((?:[a-z_][a-z0-9_-]*\s*(?:\[\d+\]\s*)*,\s*)*[a-z_][a-z0-9_-]*)\s*(?:\[\d+\]\s*)*:\s*(\^?[a-z]+)",
    )
    .expect("variable clause pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredVariable {
    pub name: String,
    pub type_name: String,
    /// Zero-based line of the declaration.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredRecordType {
    pub name: String,
    pub line: usize,
}

/// Variables declared in the first `Var` section of `text`.
pub fn extract_variables(text: &str) -> Vec<DeclaredVariable> {
    let Some(section) = VAR_SECTION.find(text) else {
        return Vec::new();
    };

    let block_start = section.end();
    let block_end = SECTION_END
        .find_at(text, block_start)
        .map(|m| m.start())
        .unwrap_or(text.len());
    let block = &text[block_start..block_end];

    let mut variables = Vec::new();
    for clause in VAR_CLAUSE.captures_iter(block) {
        let (Some(names), Some(type_name)) = (clause.get(1), clause.get(2)) else {
            continue;
        };
        let line = line_of(text, block_start + names.start());
        for raw in names.as_str().split(',') {
            let name = raw.split('[').next().unwrap_or_default().trim();
            if name.is_empty() {
                continue;
            }
            variables.push(DeclaredVariable {
                name: name.to_string(),
                type_name: type_name.as_str().to_string(),
                line,
            });
        }
    }
    variables
}

/// Record types declared with `Type Name =`, first occurrence wins.
pub fn extract_record_types(text: &str) -> Vec<DeclaredRecordType> {
    extract_record_types_with(text, "type")
}

/// Same as [`extract_record_types`] with a custom declaration keyword.
pub fn extract_record_types_with(text: &str, type_keyword: &str) -> Vec<DeclaredRecordType> {
    let keyword = type_keyword.to_lowercase();
    let mut seen = BTreeSet::new();
    let mut types = Vec::new();

    for (line, content) in text.lines().enumerate() {
        let Some(name) = record_type_name(content, &keyword) else {
            continue;
        };
        if seen.insert(name.to_string()) {
            types.push(DeclaredRecordType {
                name: name.to_string(),
                line,
            });
        }
    }
    types
}

/// Matches `^\s*<keyword>\s+<ident>\s*=` on a single line.
fn record_type_name<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.trim_start();
    let head = rest.get(..keyword.len())?;
    if head.to_lowercase() != keyword {
        return None;
    }
    let after = &rest[keyword.len()..];
    if !after.starts_with(char::is_whitespace) {
        return None;
    }
    let after = after.trim_start();

    let mut chars = after.char_indices();
    let (_, first) = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let end = chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        .map(|(i, _)| i)
        .unwrap_or(after.len());

    let (name, tail) = after.split_at(end);
    tail.trim_start().starts_with('=').then_some(name)
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count()
}

/// Document-scoped set of record type names, stored lower-cased.
///
/// A host may build one from the whole text and hand it to the tokenizer so
/// that a type used above its declaration still highlights as a type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    names: BTreeSet<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(text: &str) -> Self {
        Self::from_document_with(text, "type")
    }

    pub fn from_document_with(text: &str, type_keyword: &str) -> Self {
        extract_record_types_with(text, type_keyword)
            .into_iter()
            .map(|t| t.name)
            .collect()
    }

    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(name.to_lowercase())
    }

    pub fn contains(&self, lower: &str) -> bool {
        self.names.contains(lower)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = TypeRegistry::new();
        for name in iter {
            registry.insert(name.as_ref());
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_variables() {
        let vars = extract_variables("Var\n  x : Entier;\n  nom : Chaine;\nDebut\nFin.");
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].name, "x");
        assert_eq!(vars[0].type_name, "Entier");
        assert_eq!(vars[0].line, 1);
        assert_eq!(vars[1].name, "nom");
        assert_eq!(vars[1].line, 2);
    }

    #[test]
    fn test_extract_name_lists_and_arrays() {
        let vars = extract_variables("Var\n  i, j : Entier;\n  t[10], m[3][4] : Reel;\nDebut");
        let names: Vec<&str> = vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["i", "j", "t", "m"]);
        assert_eq!(vars[3].type_name, "Reel");
    }

    #[test]
    fn test_extract_pointer_and_hyphenated_names() {
        let vars = extract_variables("Var\n  p : ^Entier;\n  mon-compteur : Entier;\nDebut");
        assert_eq!(vars[0].type_name, "^Entier");
        assert_eq!(vars[1].name, "mon-compteur");
    }

    #[test]
    fn test_variables_stop_at_body() {
        let vars = extract_variables("Var\n  x : Entier;\nDebut\n  y : Entier;\nFin.");
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn test_variables_stop_at_const() {
        let vars = extract_variables("Var\n  x : Entier;\nConst\n  y : Entier;");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "x");
    }

    #[test]
    fn test_no_var_section() {
        assert!(extract_variables("Debut\nEcrire(1);\nFin.").is_empty());
        assert!(extract_variables("").is_empty());
    }

    #[test]
    fn test_extract_record_types() {
        let text = "Type Point = Enregistrement\nDebut\n x : Entier;\nFin;\n  type cellule=Enregistrement\nType Point = Enregistrement";
        let types = extract_record_types(text);
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].name, "Point");
        assert_eq!(types[0].line, 0);
        assert_eq!(types[1].name, "cellule");
        assert_eq!(types[1].line, 4);
    }

    #[test]
    fn test_record_type_requires_equals() {
        assert!(extract_record_types("Type Point\nTypePoint = x").is_empty());
    }

    #[test]
    fn test_registry_is_lowercase() {
        let registry = TypeRegistry::from_document("Type Point = Enregistrement");
        assert!(registry.contains("point"));
        assert!(!registry.contains("Point"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_custom_type_keyword() {
        let types = extract_record_types_with("Structure Noeud = Enregistrement", "Structure");
        assert_eq!(types[0].name, "Noeud");
    }
}
