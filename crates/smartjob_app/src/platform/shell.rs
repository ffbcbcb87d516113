//! Line commands accepted by the interactive shell.
use std::path::{Path, PathBuf};

use smartjob_core::PDF_MIME_TYPE;

pub(crate) const HELP_TEXT: &str = "\
Commands:
  login <username> <password>   log in, creating the account on first use
  logout                        forget the stored session
  status                        show the current state
  upload [path] [mime]          upload a CV (runs in the background)
  rate <1-5>                    pick a feedback rating
  comment <text>                set the feedback comment
  send                          submit the feedback form
  feedback <1-5> [comment]      pick a rating and submit at once
  help                          show this text
  quit                          leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellCommand {
    Login { username: String, password: String },
    Logout,
    Status,
    Upload {
        path: Option<PathBuf>,
        mime: Option<String>,
    },
    Rate(u8),
    Comment(String),
    Send,
    Feedback { rating: u8, comment: Option<String> },
    Help,
    Quit,
    Empty,
}

pub(crate) fn parse(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    match word.to_ascii_lowercase().as_str() {
        "" => Ok(ShellCommand::Empty),
        "login" => match args.as_slice() {
            [username, password] => Ok(ShellCommand::Login {
                username: (*username).to_string(),
                password: (*password).to_string(),
            }),
            _ => Err("usage: login <username> <password>".to_string()),
        },
        "logout" => Ok(ShellCommand::Logout),
        "status" => Ok(ShellCommand::Status),
        "upload" => match args.as_slice() {
            [] => Ok(ShellCommand::Upload {
                path: None,
                mime: None,
            }),
            [path] => Ok(ShellCommand::Upload {
                path: Some(PathBuf::from(path)),
                mime: None,
            }),
            [path, mime] => Ok(ShellCommand::Upload {
                path: Some(PathBuf::from(path)),
                mime: Some((*mime).to_string()),
            }),
            _ => Err("usage: upload [path] [mime]".to_string()),
        },
        "rate" => match args.as_slice() {
            [value] => parse_rating(value).map(ShellCommand::Rate),
            _ => Err("usage: rate <1-5>".to_string()),
        },
        "comment" => Ok(ShellCommand::Comment(rest.to_string())),
        "send" => Ok(ShellCommand::Send),
        "feedback" => {
            let (value, comment) = match rest.split_once(char::is_whitespace) {
                Some((value, comment)) => (value, Some(comment.trim().to_string())),
                None => (rest, None),
            };
            if value.is_empty() {
                return Err("usage: feedback <1-5> [comment]".to_string());
            }
            let rating = parse_rating(value)?;
            Ok(ShellCommand::Feedback { rating, comment })
        }
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

/// Out-of-range values still parse; the state machine rejects them.
fn parse_rating(value: &str) -> Result<u8, String> {
    value
        .parse::<u8>()
        .map_err(|_| format!("'{value}' is not a rating"))
}

/// MIME type a browser file picker would report for this path.
pub(crate) fn guess_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => PDF_MIME_TYPE,
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
