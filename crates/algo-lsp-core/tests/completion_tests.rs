//! Completion engine behaviour on whole documents

use algo_lsp_core::{compute_completions, CompletionResult, Position, SuggestionKind};
use indoc::indoc;

fn kinds_and_texts(result: &CompletionResult) -> Vec<(SuggestionKind, &str)> {
    result
        .items
        .iter()
        .map(|s| (s.kind, s.text.as_str()))
        .collect()
}

#[test]
fn end_to_end_print_snippet() {
    let doc = "Var\n  x : Entier;\nDebut\nEcr\nFin.";
    let result = compute_completions(doc, Position::new(3, 3));

    assert_eq!(result.items[0].kind, SuggestionKind::Snippet);
    assert_eq!(result.items[0].text, "Ecrire(\"\");");
    assert_eq!(result.items[0].display_text, "Ecrire(\"\") (print)");
    assert!(!result
        .items
        .iter()
        .any(|s| s.kind == SuggestionKind::Keyword && s.text == "Ecrire"));
    assert_eq!(result.replace_from, Position::new(3, 0));
    assert_eq!(result.replace_to, Position::new(3, 3));
}

#[test]
fn keyword_with_snippet_only_offers_snippet() {
    let result = compute_completions("si", Position::new(0, 2));
    let si: Vec<_> = result
        .items
        .iter()
        .filter(|s| s.key == "si")
        .collect();
    assert_eq!(si.len(), 1);
    assert_eq!(si[0].kind, SuggestionKind::Snippet);
    // `Sinon` has no snippet and is still offered.
    assert!(result.items.iter().any(|s| s.text == "Sinon"));
}

#[test]
fn exact_variable_match_ranks_first() {
    let doc = indoc! {"
        Var
            tab : Entier;
        Debut
            tab
        Fin.
    "};
    let result = compute_completions(doc, Position::new(3, 7));
    assert_eq!(result.items[0].kind, SuggestionKind::Variable);
    assert_eq!(result.items[0].text, "tab");
    assert_eq!(result.items[0].display_text, "tab : Entier");
    assert!(result.items.iter().any(|s| s.text == "Tableau"));
}

#[test]
fn exact_keyword_beats_longer_variable() {
    let doc = "Var\n  finale : Entier;\nDebut\nfin\nFin.";
    let result = compute_completions(doc, Position::new(3, 3));
    assert_eq!(result.items[0].text, "Fin");
    assert_eq!(result.items[1].kind, SuggestionKind::Variable);
}

#[test]
fn ranking_by_kind_then_text() {
    let doc = "Var\n  compte : Entier;\nDebut\nc\nFin.";
    let result = compute_completions(doc, Position::new(3, 1));
    let kinds: Vec<SuggestionKind> = result.items.iter().map(|s| s.kind).collect();
    let mut sorted = kinds.clone();
    sorted.sort_by_key(|k| k.priority());
    assert_eq!(kinds, sorted);

    assert_eq!(result.items[0].text, "compte");
    let keywords: Vec<&str> = result
        .items
        .iter()
        .filter(|s| s.kind == SuggestionKind::Keyword)
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(keywords, vec!["Const"]);
    let types: Vec<&str> = result
        .items
        .iter()
        .filter(|s| s.kind == SuggestionKind::Type)
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(types, vec!["Caractere", "Chaine"]);
}

#[test]
fn after_var_keyword_only_primitive_types() {
    let doc = "Var\n  Entree : Entier;\nDebut\nFin.";
    let result = compute_completions(doc, Position::new(0, 3));
    assert_eq!(
        kinds_and_texts(&result),
        vec![
            (SuggestionKind::Type, ": Entier;"),
            (SuggestionKind::Type, ": Reel;"),
            (SuggestionKind::Type, ": Chaine;"),
            (SuggestionKind::Type, ": Booleen;"),
            (SuggestionKind::Type, ": Caractere;"),
        ]
    );
}

#[test]
fn after_declaration_colon() {
    let doc = "Var\n  x : \nDebut\nFin.";
    let result = compute_completions(doc, Position::new(1, 6));
    assert_eq!(result.items.len(), 5);
    assert_eq!(result.items[0].text, "Entier;");
    assert_eq!(result.items[0].display_text, "Entier");
}

#[test]
fn counting_loop_header_walkthrough() {
    let doc = "Var\n  i : Entier;\nDebut\nPour i := 0 a 10 \nFin.";

    let after_var = compute_completions(doc, Position::new(3, 6));
    assert_eq!(kinds_and_texts(&after_var), vec![
        (SuggestionKind::Operator, ":= "),
        (SuggestionKind::Operator, "<- "),
    ]);

    let after_start = compute_completions(doc, Position::new(3, 12));
    assert_eq!(kinds_and_texts(&after_start), vec![(SuggestionKind::Keyword, "a ")]);

    let after_bounds = compute_completions(doc, Position::new(3, 17));
    assert_eq!(kinds_and_texts(&after_bounds), vec![(SuggestionKind::Keyword, "Faire")]);
}

#[test]
fn declared_record_types_are_suggested() {
    let doc = indoc! {"
        Type Cellule = Enregistrement
        Debut
            valeur : Entier;
        Fin;
        Var
            c : Cel
    "};
    // Once a word follows the colon, declared record names complete.
    let result = compute_completions(doc, Position::new(5, 11));
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].kind, SuggestionKind::Type);
    assert_eq!(result.items[0].text, "Cellule");
    assert_eq!(result.items[0].display_text, "Cellule (Enregistrement)");
}

#[test]
fn duplicates_collapse_by_text_and_kind() {
    let doc = "Var\n  x : Entier;\n  x : Reel;\nDebut\nx\nFin.";
    let result = compute_completions(doc, Position::new(4, 1));
    let variables = result
        .items
        .iter()
        .filter(|s| s.kind == SuggestionKind::Variable)
        .count();
    assert_eq!(variables, 1);
}

#[test]
fn empty_and_odd_documents_never_fail() {
    assert!(compute_completions("", Position::new(3, 3)).items.is_empty());
    assert!(!compute_completions("", Position::new(0, 0)).items.is_empty());
    let garbage = "\u{0}\u{7f}\"'''\n@@@ :::\n";
    for line in 0..4 {
        for column in 0..8 {
            let _ = compute_completions(garbage, Position::new(line, column));
        }
    }
}
