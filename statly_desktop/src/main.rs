//! Statly - status bar for the active file.
//!
//! Usage: statly [--settings FILE] [FILE...]
//!
//! Opens the given files, then reads editing commands from stdin and
//! prints the status line after each one.

use statly_core::Session;
use statly_ui::{StatusBar, StatusBarSettings, WidgetRegistry};
use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

const USAGE: &str = "Usage: statly [--settings FILE] [FILE...]";

const HELP: &str = "\
Commands:
  open PATH     open a file
  new NAME      open an empty untitled file
  next | prev   switch tabs
  tab N         switch to tab N (1-based)
  close         close the active tab
  insert TEXT   append TEXT to the active document
  newline       append a line break
  delete N      remove the last N characters
  save          save the active document
  help          show this help
  quit          exit";

/// Command line options.
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    settings: Option<PathBuf>,
    files: Vec<PathBuf>,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Options, String> {
    let mut options = Options::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                let path = args.next().ok_or("--settings needs a file")?;
                options.settings = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option {flag}")),
            _ => options.files.push(PathBuf::from(&arg)),
        }
    }
    Ok(options)
}

/// A command read from stdin.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Open(PathBuf),
    New(String),
    Next,
    Prev,
    Tab(usize),
    Close,
    Insert(String),
    Newline,
    Delete(usize),
    Save,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Self, String> {
        let (name, rest) = match line.split_once(' ') {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let argument = |what: &str| {
            if rest.is_empty() {
                Err(format!("{name} needs {what}"))
            } else {
                Ok(rest.to_string())
            }
        };
        let count = |what: &str| {
            argument(what)?
                .parse::<usize>()
                .map_err(|e| format!("{name}: {e}"))
        };

        match name {
            "open" => argument("a path").map(|p| Command::Open(PathBuf::from(p))),
            "new" => argument("a name").map(Command::New),
            "next" => Ok(Command::Next),
            "prev" => Ok(Command::Prev),
            "tab" => match count("a tab number")? {
                0 => Err("tab numbers start at 1".to_string()),
                n => Ok(Command::Tab(n - 1)),
            },
            "close" => Ok(Command::Close),
            "insert" => argument("text").map(Command::Insert),
            "newline" => Ok(Command::Newline),
            "delete" => count("a count").map(Command::Delete),
            "save" => Ok(Command::Save),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(format!("Unknown command {name:?}, try help")),
        }
    }
}

/// Applies an editing command to the session's workspace.
fn apply(session: &Session, command: &Command) -> io::Result<()> {
    let mut workspace = session.workspace().borrow_mut();
    match command {
        Command::Open(path) => {
            workspace.open_file(path)?;
        }
        Command::New(name) => {
            workspace.open_text(name.as_str(), "");
        }
        Command::Next => workspace.next_tab(),
        Command::Prev => workspace.prev_tab(),
        Command::Tab(index) => workspace.switch_to_tab(*index),
        Command::Close => {
            workspace.close_active_buffer();
        }
        Command::Insert(text) => append(&mut workspace, text),
        Command::Newline => append(&mut workspace, "\n"),
        Command::Delete(n) => match workspace.active_document_mut() {
            Some(doc) => {
                let len = doc.char_len();
                doc.remove(len.saturating_sub(*n), len);
            }
            None => log::warn!("No text to delete from"),
        },
        Command::Save => workspace.save_active()?,
        Command::Help | Command::Quit => {}
    }
    Ok(())
}

fn append(workspace: &mut statly_core::Workspace, text: &str) {
    match workspace.active_document_mut() {
        Some(doc) => {
            let end = doc.char_len();
            doc.insert(end, text);
        }
        None => log::warn!("No text to edit"),
    }
}

fn load_settings(path: Option<&PathBuf>) -> StatusBarSettings {
    match path {
        Some(path) => StatusBarSettings::load(path).unwrap_or_else(|e| {
            log::warn!("Using default settings, {}: {}", path.display(), e);
            StatusBarSettings::default()
        }),
        None => StatusBarSettings::default(),
    }
}

/// Delivers pending events, repaints and prints the status line.
fn refresh(session: &Session, bar: &mut StatusBar) {
    session.dispatch();
    let repainted = bar.process_repaints();
    log::debug!("Repainted {:?}", repainted);
    println!("{}", bar.render(bar.settings().width()));
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            process::exit(2);
        }
    };

    log::info!("Starting Statly");

    let mut session = Session::new();
    for path in &options.files {
        log::info!("Opening file: {}", path.display());
        if let Err(e) = session.workspace().borrow_mut().open_file(path) {
            log::error!("Failed to open file '{}': {}", path.display(), e);
        }
    }

    let mut bar = StatusBar::new(load_settings(options.settings.as_ref()));
    let registry = WidgetRegistry::with_defaults();
    for factory in registry.factories() {
        bar.add_widget(factory, &session);
    }
    refresh(&session, &mut bar);

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read command: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match Command::parse(line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => eprintln!("{}", HELP),
            Ok(command) => {
                if let Err(e) = apply(&session, &command) {
                    log::error!("{}: {}", line, e);
                }
            }
            Err(e) => log::warn!("{}", e),
        }
        refresh(&session, &mut bar);
    }

    bar.dispose();
    session.close();
    log::info!("Statly exited");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        let options = parse_args(args(&["--settings", "bar.json", "a.txt", "b.rs"])).unwrap();
        assert_eq!(options.settings, Some(PathBuf::from("bar.json")));
        assert_eq!(options.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.rs")]);

        assert!(parse_args(args(&["--settings"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
        assert_eq!(parse_args(args(&[])).unwrap(), Options::default());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("open src/main.rs"),
            Ok(Command::Open(PathBuf::from("src/main.rs")))
        );
        assert_eq!(
            Command::parse("insert hello  world"),
            Ok(Command::Insert("hello  world".to_string()))
        );
        assert_eq!(Command::parse("tab 2"), Ok(Command::Tab(1)));
        assert_eq!(Command::parse("delete 3"), Ok(Command::Delete(3)));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("open").is_err());
        assert!(Command::parse("tab 0").is_err());
        assert!(Command::parse("delete many").is_err());
        assert!(Command::parse("frobnicate").is_err());
    }

    #[test]
    fn test_apply_edits() {
        let session = Session::new();
        apply(&session, &Command::New("scratch".to_string())).unwrap();
        apply(&session, &Command::Insert("abc".to_string())).unwrap();
        apply(&session, &Command::Newline).unwrap();
        apply(&session, &Command::Insert("de".to_string())).unwrap();
        apply(&session, &Command::Delete(1)).unwrap();

        let workspace = session.workspace().borrow();
        let doc = workspace.active_document().unwrap();
        assert_eq!(doc.text(), "abc\nd");
    }

    #[test]
    fn test_apply_without_file() {
        let session = Session::new();
        apply(&session, &Command::Insert("abc".to_string())).unwrap();
        apply(&session, &Command::Close).unwrap();
        assert!(apply(&session, &Command::Save).is_err());
        assert!(apply(&session, &Command::Open(PathBuf::from("/nonexistent/statly"))).is_err());
    }
}
