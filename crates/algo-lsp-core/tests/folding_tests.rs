//! Fold resolution over realistic Algo programs

use algo_lsp_core::{fold_ranges, resolve_fold, BlockKind, Position};
use indoc::indoc;

fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[test]
fn nested_loops_close_on_their_own_end() {
    let doc = lines(indoc! {"
        Pour i := 1 a 3 Faire
            Pour j := 1 a 3 Faire
                Ecrire(i * j);
            Fin Pour
        Fin Pour
    "});

    let outer = resolve_fold(&doc, 0).unwrap();
    assert_eq!(outer.kind, BlockKind::ForLoop);
    assert_eq!(outer.end, Position::new(4, 0));

    let inner = resolve_fold(&doc, 1).unwrap();
    assert_eq!(inner.start, Position::new(1, 25));
    assert_eq!(inner.end, Position::new(3, 0));
}

#[test]
fn nested_loops_with_longer_inner_body() {
    let doc = lines(indoc! {"
        Pour i := 1 a 3 Faire
            Pour j := 1 a 3 Faire
                Ecrire(i);
                Ecrire(j);
            FinPour;
            Ecrire(\"ligne\");
        FinPour;
    "});

    assert_eq!(resolve_fold(&doc, 0).unwrap().end_line(), 6);
    assert_eq!(resolve_fold(&doc, 1).unwrap().end_line(), 4);
}

#[test]
fn header_without_body_is_rejected() {
    let doc = lines("Repeter\nJusqua x > 0;");
    assert_eq!(resolve_fold(&doc, 0), None);

    let doc = lines("Debut\nFin.");
    assert_eq!(resolve_fold(&doc, 0), None);
}

#[test]
fn range_spans_from_header_end_to_closing_line_start() {
    let doc = lines(indoc! {"
        Algorithme Somme;
        Var
            a, b : Entier;
            s : Entier;
        Debut
            s := a + b;
            Ecrire(s);
        Fin.
    "});

    let vars = resolve_fold(&doc, 1).unwrap();
    assert_eq!(vars.kind, BlockKind::Variables);
    assert_eq!(vars.start, Position::new(1, 3));
    assert_eq!(vars.end, Position::new(4, 0));

    let body = resolve_fold(&doc, 4).unwrap();
    assert_eq!(body.kind, BlockKind::Body);
    assert_eq!(body.end, Position::new(7, 0));

    // Statements and the closing line open nothing.
    assert_eq!(resolve_fold(&doc, 5), None);
    assert_eq!(resolve_fold(&doc, 7), None);
}

#[test]
fn conditional_and_alternative_blocks() {
    let doc = lines(indoc! {"
        Si x > 0 Alors
            Ecrire(\"positif\");
            x := x - 1;
        Sinon
            Ecrire(\"negatif\");
            x := x + 1;
        Fin Si
    "});

    let folds = fold_ranges(&doc);
    assert_eq!(folds.len(), 2);
    assert_eq!(folds[0].kind, BlockKind::Conditional);
    assert_eq!(folds[0].end_line(), 6);
    assert_eq!(folds[1].kind, BlockKind::Alternative);
    assert_eq!(folds[1].start_line(), 3);
    assert_eq!(folds[1].end_line(), 6);
}

#[test]
fn functions_and_procedures() {
    let doc = lines(indoc! {"
        Fonction Carre(n : Entier) : Entier
        Debut
            Retourner n * n;
        Fin Fonction
        Procedure Afficher(n : Entier)
        Debut
            Ecrire(n);
        Fin Procedure
    "});

    let function = resolve_fold(&doc, 0).unwrap();
    assert_eq!(function.kind, BlockKind::Function);
    assert_eq!(function.end_line(), 3);

    let procedure = resolve_fold(&doc, 4).unwrap();
    assert_eq!(procedure.kind, BlockKind::Procedure);
    assert_eq!(procedure.end_line(), 7);
}

#[test]
fn while_loop_spellings() {
    let doc = lines("Tant Que x > 0 Faire\n  a;\n  b;\nFin Tant Que");
    assert_eq!(resolve_fold(&doc, 0).unwrap().kind, BlockKind::WhileLoop);

    // The header needs a condition between `Que` and `Faire`.
    let doc = lines("Tant Que Faire\n  a;\n  b;\nFin Tant Que");
    assert_eq!(resolve_fold(&doc, 0), None);
}

#[test]
fn accented_header_columns_are_characters() {
    let doc = lines("Si été > 0 Alors\n  a;\n  b;\nFin Si");
    let range = resolve_fold(&doc, 0).unwrap();
    assert_eq!(range.start, Position::new(0, 16));
}
