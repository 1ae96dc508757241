//! Parsing of operator command lines.
//!
//! Step numbers on the command line are 1-based, as displayed; they are
//! converted to 0-based indices here.

use mp4label_core::timestamp;
use mp4label_session::Action;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command `{0}`, type `help` for a list")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Forwarded to the session as-is.
    Act(Action),
    /// Print where the player should seek for step `index`.
    Seek { index: usize },
    Show,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
open <file>          open a video, saving pending edits first
title <text>         set the tutorial title
tutorial on|off      mark the video as tutorial / not a tutorial
add                  append a step at 00:00.000
insert <time>        insert a step below the selection (seconds or mm:ss.SSS)
select <n>           select step n
desc <n> <text>      set the description of step n
ts <n> <mm:ss.SSS>   set the timestamp of step n
rm <n>               remove step n
mv <from> <to>       move a step
seek <n>             show the seek position of step n
save                 validate and save now
delete               delete the saved annotation
show                 print the annotation
status               print the autosave status
quit                 save pending edits and exit";

impl Command {
    /// Parse a non-blank input line. Returns `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "open" => {
                let filename = required(rest, "open <file>")?;
                Self::Act(Action::OpenVideo {
                    filename: filename.to_string(),
                })
            }
            "title" => Self::Act(Action::SetTitle(rest.to_string())),
            "tutorial" => match rest.to_ascii_lowercase().as_str() {
                "on" | "yes" | "true" => Self::Act(Action::SetTutorial(true)),
                "off" | "no" | "false" => Self::Act(Action::SetTutorial(false)),
                _ => return Err(CommandError::Usage("tutorial on|off")),
            },
            "add" => Self::Act(Action::AddStep),
            "insert" => {
                let seconds = parse_position(rest).ok_or(CommandError::Usage("insert <time>"))?;
                Self::Act(Action::InsertAtTime { seconds })
            }
            "select" => Self::Act(Action::Select {
                index: step_index(rest, "select <n>")?,
            }),
            "desc" => {
                let (n, text) = split_first(rest);
                Self::Act(Action::SetDescription {
                    index: step_index(n, "desc <n> <text>")?,
                    text: text.to_string(),
                })
            }
            "ts" => {
                let (n, text) = split_first(rest);
                Self::Act(Action::SetTimestamp {
                    index: step_index(n, "ts <n> <mm:ss.SSS>")?,
                    text: required(text, "ts <n> <mm:ss.SSS>")?.to_string(),
                })
            }
            "rm" => Self::Act(Action::RemoveStep {
                index: step_index(rest, "rm <n>")?,
            }),
            "mv" => {
                let (from, to) = split_first(rest);
                Self::Act(Action::MoveStep {
                    from: step_index(from, "mv <from> <to>")?,
                    to: step_index(to, "mv <from> <to>")?,
                })
            }
            "seek" => Self::Seek {
                index: step_index(rest, "seek <n>")?,
            },
            "save" => Self::Act(Action::Save),
            "delete" => Self::Act(Action::Delete),
            "show" => Self::Show,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn required<'a>(text: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if text.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(text)
    }
}

fn split_first(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (text, ""),
    }
}

/// Convert a displayed 1-based step number to an index.
fn step_index(text: &str, usage: &'static str) -> Result<usize, CommandError> {
    match text.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::Usage(usage)),
    }
}

/// Playback position as plain seconds or a `mm:ss[.SSS]` timestamp.
fn parse_position(text: &str) -> Option<f64> {
    if text.contains(':') {
        return timestamp::try_parse(text).ok();
    }
    text.parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn act(line: &str) -> Action {
        match Command::parse(line) {
            Ok(Some(Command::Act(action))) => action,
            other => panic!("expected an action for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn step_numbers_are_one_based() {
        assert_eq!(act("select 1"), Action::Select { index: 0 });
        assert_eq!(act("rm 3"), Action::RemoveStep { index: 2 });
        assert_eq!(act("mv 2 1"), Action::MoveStep { from: 1, to: 0 });
        assert_matches!(Command::parse("select 0"), Err(CommandError::Usage(_)));
    }

    #[test]
    fn description_keeps_inner_spaces() {
        assert_eq!(
            act("desc 2   Loosen the  wheel nuts"),
            Action::SetDescription {
                index: 1,
                text: "Loosen the  wheel nuts".into()
            }
        );
    }

    #[test]
    fn title_may_be_cleared() {
        assert_eq!(act("title"), Action::SetTitle(String::new()));
    }

    #[test]
    fn insert_accepts_seconds_or_timestamp() {
        assert_eq!(act("insert 12.5"), Action::InsertAtTime { seconds: 12.5 });
        assert_eq!(act("insert 01:02.500"), Action::InsertAtTime { seconds: 62.5 });
        assert_matches!(Command::parse("insert soon"), Err(CommandError::Usage(_)));
        assert_matches!(Command::parse("insert -1"), Err(CommandError::Usage(_)));
    }

    #[test]
    fn tutorial_toggle() {
        assert_eq!(act("tutorial off"), Action::SetTutorial(false));
        assert_eq!(act("TUTORIAL On"), Action::SetTutorial(true));
        assert_matches!(Command::parse("tutorial maybe"), Err(CommandError::Usage(_)));
    }

    #[test]
    fn non_session_commands() {
        assert_eq!(Command::parse("seek 4"), Ok(Some(Command::Seek { index: 3 })));
        assert_eq!(Command::parse("quit"), Ok(Some(Command::Quit)));
        assert_eq!(
            Command::parse("frobnicate"),
            Err(CommandError::Unknown("frobnicate".into()))
        );
    }
}
