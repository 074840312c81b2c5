//! Word tables of the Algo language.
//!
//! A [`Vocabulary`] is built once from [`VocabularyTables`] and then only read.
//! The tokenizer and the completion engine borrow it, so two documents (or two
//! differently configured editors) never share mutable lexical state.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::VocabularyError;

/// Fixed word categories, in lookup precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordClass {
    Keyword,
    Type,
    Builtin,
    Atom,
    Operator,
}

impl WordClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordClass::Keyword => "keyword",
            WordClass::Type => "type",
            WordClass::Builtin => "builtin",
            WordClass::Atom => "atom",
            WordClass::Operator => "operator",
        }
    }
}

/// A multi-line insertion template offered by the completion engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Lower-case word that selects the snippet.
    pub trigger: String,
    /// Label shown in the completion list.
    pub label: String,
    /// Text inserted when the snippet is accepted.
    pub body: String,
}

impl Snippet {
    fn new(trigger: &str, label: &str, body: &str) -> Self {
        Self {
            trigger: trigger.to_string(),
            label: label.to_string(),
            body: body.to_string(),
        }
    }
}

/// Serializable form of a vocabulary. Missing fields in a JSON override fall
/// back to the built-in Algo tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyTables {
    /// Reserved words, in the spelling offered by completion.
    pub keywords: Vec<String>,
    /// Extra spellings highlighted as keywords but never suggested.
    pub keyword_aliases: Vec<String>,
    pub types: Vec<String>,
    pub builtins: Vec<String>,
    pub atoms: Vec<String>,
    /// Word-form operators (`Mod`, `Et`, ...).
    pub operators: Vec<String>,
    /// Keyword whose following word names a new record type.
    pub type_keyword: String,
    pub snippets: Vec<Snippet>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for VocabularyTables {
    fn default() -> Self {
        Self {
            keywords: words(&[
                "Algorithme",
                "Var",
                "Const",
                "Debut",
                "Fin",
                "Si",
                "Alors",
                "Sinon",
                "FinSi",
                "Fin Si",
                "Pour",
                "Faire",
                "FinPour",
                "Fin Pour",
                "TantQue",
                "Tant Que",
                "FinTantQue",
                "Fin Tant Que",
                "Repeter",
                "Jusqua",
                "Ecrire",
                "Lire",
                "Retourner",
                "Fonction",
                "Procedure",
                "Tableau",
                "NIL",
                "Type",
                "Enregistrement",
            ]),
            keyword_aliases: words(&["fsi", "tant", "que", "de"]),
            types: words(&["Entier", "Reel", "Chaine", "Booleen", "Caractere"]),
            builtins: words(&["Longueur", "Concat", "Allouer", "Liberer", "Taille"]),
            atoms: words(&["Vrai", "Faux"]),
            operators: words(&["Mod", "Div", "Et", "Ou", "Non"]),
            type_keyword: "Type".to_string(),
            snippets: default_snippets(),
        }
    }
}

fn default_snippets() -> Vec<Snippet> {
    const WHILE_BODY: &str = "TantQue condition Faire\n    // Code ici\nFinTantQue;";
    const REPEAT_BODY: &str = "Repeter\n    // Code ici\nJusqua condition;";

    vec![
        Snippet::new(
            "algorithme",
            "Algorithme (full structure)",
            "Algorithme NomAlgorithme;\nVar\n    i, j : Entier;\nDebut\n    Ecrire(\"Debut de l'algorithme\");\n    \nFin.",
        ),
        Snippet::new(
            "pour",
            "Pour ... Faire (loop)",
            "Pour i := 0 a 10 Faire\n    // Code ici\nFinPour;",
        ),
        Snippet::new(
            "si",
            "Si ... Alors (if)",
            "Si condition Alors\n    // Code ici\nFin Si;",
        ),
        Snippet::new("tantque", "TantQue ... Faire (while)", WHILE_BODY),
        Snippet::new("tanque", "Tanque (alias for TantQue)", WHILE_BODY),
        Snippet::new("repeter", "Repeter ... Jusqua (loop)", REPEAT_BODY),
        Snippet::new("repre", "Repre (alias for Repeter)", REPEAT_BODY),
        Snippet::new("ecrire", "Ecrire(\"\") (print)", "Ecrire(\"\");"),
        Snippet::new("lire", "Lire(\"\") (read)", "Lire(\"\");"),
        Snippet::new(
            "type",
            "Type ... = Enregistrement (record)",
            "Type NomType = Enregistrement\nDebut\n    champ : Entier;\nFin;",
        ),
        Snippet::new(
            "enregistrement",
            "Enregistrement (record body)",
            "Enregistrement\nDebut\n    champ : Entier;\nFin;",
        ),
        Snippet::new(
            "fonction",
            "Fonction ... (function)",
            "Fonction NomFonction(param : Entier) : Entier\nVar\n    res : Entier;\nDebut\n    // Code ici\n    Retourner res;\nFin;",
        ),
        Snippet::new(
            "procedure",
            "Procedure ... (procedure)",
            "Procedure NomProcedure(param : Entier)\nVar\n    \nDebut\n    // Code ici\nFin;",
        ),
    ]
}

/// Immutable, indexed vocabulary.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    tables: VocabularyTables,
    index: HashMap<String, WordClass>,
    type_keyword: String,
}

static ALGO_VOCABULARY: Lazy<Vocabulary> =
    Lazy::new(|| Vocabulary::build(VocabularyTables::default()));

impl Vocabulary {
    /// Validate `tables` and build the lookup index.
    pub fn new(tables: VocabularyTables) -> Result<Self, VocabularyError> {
        validate(&tables)?;
        Ok(Self::build(tables))
    }

    /// The built-in Algo vocabulary.
    pub fn algo() -> &'static Vocabulary {
        &ALGO_VOCABULARY
    }

    pub fn from_json_str(json: &str) -> Result<Self, VocabularyError> {
        let tables: VocabularyTables = serde_json::from_str(json)?;
        Self::new(tables)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    fn build(mut tables: VocabularyTables) -> Self {
        for snippet in &mut tables.snippets {
            snippet.trigger = snippet.trigger.to_lowercase();
        }

        let mut index = HashMap::new();
        let ordered: [(&[String], WordClass); 6] = [
            (&tables.keywords, WordClass::Keyword),
            (&tables.keyword_aliases, WordClass::Keyword),
            (&tables.types, WordClass::Type),
            (&tables.builtins, WordClass::Builtin),
            (&tables.atoms, WordClass::Atom),
            (&tables.operators, WordClass::Operator),
        ];
        for (list, class) in ordered {
            for word in list {
                // Multi-word spellings ("Fin Si") only exist for completion.
                if word.contains(char::is_whitespace) {
                    continue;
                }
                index.entry(word.to_lowercase()).or_insert(class);
            }
        }

        let type_keyword = tables.type_keyword.to_lowercase();
        Self {
            tables,
            index,
            type_keyword,
        }
    }

    /// Category of a lower-cased word, if it belongs to a fixed table.
    pub fn classify(&self, lower: &str) -> Option<WordClass> {
        self.index.get(lower).copied()
    }

    /// Lower-cased type declaration keyword.
    pub fn type_keyword(&self) -> &str {
        &self.type_keyword
    }

    pub fn keywords(&self) -> &[String] {
        &self.tables.keywords
    }

    pub fn types(&self) -> &[String] {
        &self.tables.types
    }

    pub fn builtins(&self) -> &[String] {
        &self.tables.builtins
    }

    pub fn atoms(&self) -> &[String] {
        &self.tables.atoms
    }

    pub fn operators(&self) -> &[String] {
        &self.tables.operators
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.tables.snippets
    }

    /// Whether a snippet is triggered by the lower-cased `word`.
    pub fn has_snippet(&self, word: &str) -> bool {
        self.tables.snippets.iter().any(|s| s.trigger == word)
    }

    pub fn tables(&self) -> &VocabularyTables {
        &self.tables
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary::algo().clone()
    }
}

fn validate(tables: &VocabularyTables) -> Result<(), VocabularyError> {
    let lists: [(&'static str, &[String]); 6] = [
        ("keywords", &tables.keywords),
        ("keyword_aliases", &tables.keyword_aliases),
        ("types", &tables.types),
        ("builtins", &tables.builtins),
        ("atoms", &tables.atoms),
        ("operators", &tables.operators),
    ];
    for (table, list) in lists {
        if list.iter().any(|w| w.trim().is_empty()) {
            return Err(VocabularyError::EmptyEntry { table });
        }
    }
    if tables.type_keyword.trim().is_empty() {
        return Err(VocabularyError::EmptyEntry {
            table: "type_keyword",
        });
    }
    if let Some(snippet) = tables.snippets.iter().find(|s| s.trigger.trim().is_empty()) {
        return Err(VocabularyError::EmptySnippetTrigger {
            label: snippet.label.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_case_insensitive_on_lowered_input() {
        let vocab = Vocabulary::algo();
        assert_eq!(vocab.classify("debut"), Some(WordClass::Keyword));
        assert_eq!(vocab.classify("entier"), Some(WordClass::Type));
        assert_eq!(vocab.classify("longueur"), Some(WordClass::Builtin));
        assert_eq!(vocab.classify("vrai"), Some(WordClass::Atom));
        assert_eq!(vocab.classify("mod"), Some(WordClass::Operator));
        assert_eq!(vocab.classify("compteur"), None);
    }

    #[test]
    fn test_aliases_are_keywords() {
        let vocab = Vocabulary::algo();
        for alias in ["fsi", "tant", "que", "de", "finsi", "fintantque"] {
            assert_eq!(vocab.classify(alias), Some(WordClass::Keyword), "{alias}");
        }
    }

    #[test]
    fn test_multi_word_spellings_not_indexed() {
        let vocab = Vocabulary::algo();
        assert_eq!(vocab.classify("fin si"), None);
        assert!(vocab.keywords().iter().any(|k| k == "Fin Si"));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let vocab = Vocabulary::from_json_str(r#"{ "builtins": ["Racine"] }"#).unwrap();
        assert_eq!(vocab.classify("racine"), Some(WordClass::Builtin));
        assert_eq!(vocab.classify("longueur"), None);
        assert_eq!(vocab.classify("entier"), Some(WordClass::Type));
        assert_eq!(vocab.type_keyword(), "type");
    }

    #[test]
    fn test_empty_entry_rejected() {
        let err = Vocabulary::from_json_str(r#"{ "atoms": ["Vrai", " "] }"#).unwrap_err();
        assert!(matches!(err, VocabularyError::EmptyEntry { table: "atoms" }));
    }

    #[test]
    fn test_empty_snippet_trigger_rejected() {
        let json = r#"{ "snippets": [{ "trigger": "", "label": "x", "body": "y" }] }"#;
        let err = Vocabulary::from_json_str(json).unwrap_err();
        assert!(matches!(err, VocabularyError::EmptySnippetTrigger { .. }));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            Vocabulary::from_json_str("{ not json"),
            Err(VocabularyError::Json(_))
        ));
    }

    #[test]
    fn test_snippet_lookup() {
        let vocab = Vocabulary::algo();
        assert!(vocab.has_snippet("ecrire"));
        assert!(vocab.has_snippet("tanque"));
        assert!(!vocab.has_snippet("debut"));
        assert_eq!(vocab.snippets().len(), 13);
    }

    #[test]
    fn test_snippet_triggers_are_lowered() {
        let json = r#"{ "snippets": [{ "trigger": "Si", "label": "si", "body": "Si c Alors\nFin Si" }] }"#;
        let vocab = Vocabulary::from_json_str(json).unwrap();
        assert_eq!(vocab.snippets()[0].trigger, "si");
        assert!(vocab.has_snippet("si"));
    }

    #[test]
    fn test_word_class_as_str() {
        assert_eq!(WordClass::Keyword.as_str(), "keyword");
        assert_eq!(WordClass::Operator.as_str(), "operator");
    }
}
