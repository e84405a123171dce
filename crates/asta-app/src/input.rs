// Line input parsing and command dispatch.
//
// Translates one line typed at the prompt into a UserCommand for the session.
// Numbers typed by the user are 1-based, matching what the view prints.

use std::path::PathBuf;

use thiserror::Error;

use asta_core::draft::roles::Role;

use crate::protocol::UserCommand;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (type 'help')")]
    UnknownCommand(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{value}' is not a valid {argument}")]
    InvalidNumber {
        argument: &'static str,
        value: String,
    },

    #[error("'{0}' is not a role (use A, C, D or P)")]
    InvalidRole(String),
}

pub const HELP: &str = "\
Commands (slots and positions start at 1):
  team <name>               set the team name
  bid <slot> <value>        set a bid
  step <slot> <+n|-n>       step a bid up or down
  move-bid <from> <to>      move a bid to another slot
  move-role <from> <to>     move a role to another slot
  pick <A|C|D|P> <name>     add a candidate to a preference list
  move <A|C|D|P> <from> <to>  reorder a preference list
  export [dir]              write the plan to a JSON file
  import <file>             replace the plan with a JSON file
  reset                     discard the saved plan and start over
  show | help | quit";

/// Split off the first whitespace-delimited word, returning it and the
/// trimmed remainder.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.find(char::is_whitespace) {
        Some(at) => (&text[..at], text[at..].trim()),
        None => (text, ""),
    }
}

fn require<'a>(
    word: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, InputError> {
    if word.is_empty() {
        Err(InputError::MissingArgument { command, argument })
    } else {
        Ok(word)
    }
}

/// Parse a 1-based position into a 0-based index.
fn position(word: &str, command: &'static str, argument: &'static str) -> Result<usize, InputError> {
    let word = require(word, command, argument)?;
    match word.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(InputError::InvalidNumber {
            argument,
            value: word.to_string(),
        }),
    }
}

fn amount(word: &str, command: &'static str, argument: &'static str) -> Result<i64, InputError> {
    let word = require(word, command, argument)?;
    word.parse::<i64>().map_err(|_| InputError::InvalidNumber {
        argument,
        value: word.to_string(),
    })
}

fn role(word: &str, command: &'static str) -> Result<Role, InputError> {
    let word = require(word, command, "a role")?;
    Role::from_code(word).ok_or_else(|| InputError::InvalidRole(word.to_string()))
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<UserCommand, InputError> {
    let (command, rest) = split_word(line);
    if command.is_empty() {
        return Err(InputError::Empty);
    }

    match command.to_lowercase().as_str() {
        "team" => Ok(UserCommand::SetTeamName(rest.to_string())),
        "bid" => {
            let (slot, rest) = split_word(rest);
            let (value, _) = split_word(rest);
            Ok(UserCommand::SetBid {
                slot: position(slot, "bid", "slot")?,
                value: amount(value, "bid", "value")?,
            })
        }
        "step" => {
            let (slot, rest) = split_word(rest);
            let (delta, _) = split_word(rest);
            Ok(UserCommand::StepBid {
                slot: position(slot, "step", "slot")?,
                delta: amount(delta, "step", "amount")?,
            })
        }
        "move-bid" | "move-role" => {
            let name = if command.eq_ignore_ascii_case("move-bid") {
                "move-bid"
            } else {
                "move-role"
            };
            let (from, rest) = split_word(rest);
            let (to, _) = split_word(rest);
            let from = position(from, name, "source slot")?;
            let to = position(to, name, "target slot")?;
            Ok(if name == "move-bid" {
                UserCommand::MoveBid { from, to }
            } else {
                UserCommand::MoveRole { from, to }
            })
        }
        "pick" => {
            let (code, candidate) = split_word(rest);
            let role = role(code, "pick")?;
            let candidate = require(candidate, "pick", "a candidate name")?;
            Ok(UserCommand::SelectCandidate {
                role,
                candidate: candidate.to_string(),
            })
        }
        "move" => {
            let (code, rest) = split_word(rest);
            let role = role(code, "move")?;
            let (from, rest) = split_word(rest);
            let (to, _) = split_word(rest);
            Ok(UserCommand::MoveCandidate {
                role,
                from: position(from, "move", "source position")?,
                to: position(to, "move", "target position")?,
            })
        }
        "export" => Ok(UserCommand::Export {
            dir: (!rest.is_empty()).then(|| PathBuf::from(rest)),
        }),
        "import" => {
            let path = require(rest, "import", "a file path")?;
            Ok(UserCommand::Import {
                path: PathBuf::from(path),
            })
        }
        "reset" => Ok(UserCommand::Reset),
        "show" => Ok(UserCommand::Show),
        "help" | "?" => Ok(UserCommand::Help),
        "quit" | "exit" | "q" => Ok(UserCommand::Quit),
        _ => Err(InputError::UnknownCommand(command.to_string())),
    }
}
