//! Console command parsing. One line of input maps to one user action.
use extractor_core::{KeyEvent, Msg, Selection, PRESETS};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  url <text>             edit the URL field
  blur                   leave the URL field (starts the preload debounce)
  cursor <start> [end]   move the schema caret or select a byte range
  type <text>            type text into the schema at the caret
  tab | shift-tab | enter
                         schema editor keys
  example <n>            load preset n
  query <text>           generate a schema from a description
  submit                 Fetch Data
  close                  close the notification
  show                   render the current state
  help                   this text
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Msg(Msg),
    /// Key press handled by the schema editor at the current selection.
    Key(KeyEvent),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("no example {0}; pick 1..={max}", max = PRESETS.len())]
    NoSuchExample(usize),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let trimmed = line.trim_start();
    let (word, rest) = match trimmed.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    let command = match word {
        "url" => Command::Msg(Msg::UrlChanged(rest.to_string())),
        "blur" => Command::Msg(Msg::UrlCommitted),
        "cursor" => Command::Msg(Msg::SchemaSelectionChanged(parse_selection(rest)?)),
        "type" => Command::Msg(Msg::SchemaTyped(unescape(rest))),
        "tab" => Command::Key(KeyEvent::tab()),
        "shift-tab" => Command::Key(KeyEvent::shift_tab()),
        "enter" => Command::Key(KeyEvent::enter()),
        "example" => Command::Msg(Msg::ExampleSelected(parse_example(rest)?)),
        "query" => Command::Msg(Msg::SchemaQuerySubmitted(rest.trim().to_string())),
        "submit" => Command::Msg(Msg::SubmitClicked),
        "close" => Command::Msg(Msg::NotificationClosed),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_selection(args: &str) -> Result<Selection, CommandError> {
    let bad = CommandError::BadArgument {
        command: "cursor",
        expected: "<start> [end]",
    };
    let mut offsets = args.split_whitespace().map(str::parse::<usize>);
    let start = match offsets.next() {
        Some(Ok(start)) => start,
        _ => return Err(bad),
    };
    let end = match offsets.next() {
        None => start,
        Some(Ok(end)) => end,
        Some(Err(_)) => return Err(bad),
    };
    if offsets.next().is_some() {
        return Err(bad);
    }
    Ok(Selection::new(start, end))
}

/// Presets are numbered from 1 on the console.
fn parse_example(args: &str) -> Result<usize, CommandError> {
    let number = args
        .trim()
        .parse::<usize>()
        .map_err(|_| CommandError::BadArgument {
            command: "example",
            expected: "a preset number",
        })?;
    if number == 0 || number > PRESETS.len() {
        return Err(CommandError::NoSuchExample(number));
    }
    Ok(number - 1)
}

/// `\n`, `\t` and `\\` let a single console line carry multi-line text.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use extractor_core::{KeyEvent, Msg, Selection};

    use super::{parse, Command, CommandError};

    fn msg(line: &str) -> Msg {
        match parse(line) {
            Ok(Some(Command::Msg(msg))) => msg,
            other => panic!("expected a msg for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn url_keeps_text_verbatim() {
        assert_eq!(
            msg("url https://books.toscrape.com/"),
            Msg::UrlChanged("https://books.toscrape.com/".to_string())
        );
        assert_eq!(msg("url"), Msg::UrlChanged(String::new()));
    }

    #[test]
    fn cursor_accepts_caret_or_range() {
        assert_eq!(
            msg("cursor 4"),
            Msg::SchemaSelectionChanged(Selection::caret(4))
        );
        assert_eq!(
            msg("cursor 2 9"),
            Msg::SchemaSelectionChanged(Selection::new(2, 9))
        );
        assert!(matches!(
            parse("cursor x"),
            Err(CommandError::BadArgument { .. })
        ));
        assert!(matches!(
            parse("cursor 1 2 3"),
            Err(CommandError::BadArgument { .. })
        ));
    }

    #[test]
    fn type_unescapes_newlines_and_tabs() {
        assert_eq!(
            msg("type a\\n\\tb\\\\c"),
            Msg::SchemaTyped("a\n\tb\\c".to_string())
        );
    }

    #[test]
    fn editor_keys() {
        assert_eq!(parse("tab").unwrap(), Some(Command::Key(KeyEvent::tab())));
        assert_eq!(
            parse("shift-tab").unwrap(),
            Some(Command::Key(KeyEvent::shift_tab()))
        );
        assert_eq!(
            parse("enter").unwrap(),
            Some(Command::Key(KeyEvent::enter()))
        );
    }

    #[test]
    fn examples_are_one_based() {
        assert_eq!(msg("example 1"), Msg::ExampleSelected(0));
        assert_eq!(msg("example 3"), Msg::ExampleSelected(2));
        assert_eq!(parse("example 0"), Err(CommandError::NoSuchExample(0)));
        assert_eq!(parse("example 4"), Err(CommandError::NoSuchExample(4)));
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse("   \n").unwrap(), None);
        assert_eq!(
            parse("fetch"),
            Err(CommandError::Unknown("fetch".to_string()))
        );
        assert_eq!(parse("quit").unwrap(), Some(Command::Quit));
        assert_eq!(msg("submit"), Msg::SubmitClicked);
    }
}
