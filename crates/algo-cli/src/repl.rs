use std::sync::Arc;

use algo_lsp_core::{fold_ranges, Vocabulary};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::highlighter::highlight_code;
use crate::repl_helper::ReplHelper;

const COMMANDS: [&str; 5] = [":quit", ":show", ":folds", ":clear", ":help"];

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Quit,
    Show,
    Folds,
    Clear,
    Help,
    Unknown {
        name: &'a str,
        suggestion: Option<&'static str>,
    },
    Code(&'a str),
}

fn parse_command(line: &str) -> ReplCommand<'_> {
    let trimmed = line.trim();
    if !trimmed.starts_with(':') {
        return ReplCommand::Code(line);
    }
    match trimmed {
        ":quit" | ":q" => ReplCommand::Quit,
        ":show" => ReplCommand::Show,
        ":folds" => ReplCommand::Folds,
        ":clear" => ReplCommand::Clear,
        ":help" => ReplCommand::Help,
        name => ReplCommand::Unknown {
            name,
            suggestion: closest_command(name),
        },
    }
}

/// Known command closest to a mistyped one
fn closest_command(name: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .map(|cmd| (strsim::jaro_winkler(name, cmd), *cmd))
        .filter(|(score, _)| *score > 0.8)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, cmd)| cmd)
}

fn print_help() {
    println!("Enter Algo lines; they accumulate into a session document.");
    println!("  :show    print the session with highlighting");
    println!("  :folds   list foldable blocks of the session");
    println!("  :clear   start a new session");
    println!("  :quit    exit");
}

pub fn run_repl(vocabulary: Arc<Vocabulary>) -> anyhow::Result<()> {
    let mut editor: Editor<ReplHelper, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(ReplHelper::new(vocabulary)));

    println!("Algo REPL {}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for commands, :quit to exit.");

    loop {
        let line = match editor.readline("algo> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        if !line.trim().is_empty() {
            editor.add_history_entry(line.as_str())?;
        }

        let Some(helper) = editor.helper_mut() else {
            break;
        };
        match parse_command(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Help => print_help(),
            ReplCommand::Clear => helper.reset(),
            ReplCommand::Show => {
                let source = helper.session().join("\n");
                println!("{}", highlight_code(&source, helper.vocabulary()));
            }
            ReplCommand::Folds => {
                let folds = fold_ranges(helper.session());
                if folds.is_empty() {
                    println!("No foldable blocks");
                }
                for fold in folds {
                    println!(
                        "  {}..{} {}",
                        fold.start_line() + 1,
                        fold.end_line() + 1,
                        fold.kind.as_str()
                    );
                }
            }
            ReplCommand::Unknown { name, suggestion } => match suggestion {
                Some(cmd) => eprintln!("Unknown command '{}'. Did you mean '{}'?", name, cmd),
                None => eprintln!("Unknown command '{}'. Type :help for commands.", name),
            },
            ReplCommand::Code(code) => {
                tracing::debug!(line = code, "session line");
                helper.commit(code);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(":quit"), ReplCommand::Quit);
        assert_eq!(parse_command("  :show "), ReplCommand::Show);
        assert_eq!(parse_command("  x := 1;"), ReplCommand::Code("  x := 1;"));
    }

    #[test]
    fn test_typo_suggests_command() {
        assert_eq!(
            parse_command(":qiut"),
            ReplCommand::Unknown {
                name: ":qiut",
                suggestion: Some(":quit"),
            }
        );
        assert_eq!(closest_command(":zzzzzz"), None);
    }
}
