// Messages between the command front end and the session.

use std::path::PathBuf;

use asta_core::draft::roles::Role;
use asta_core::draft::MutationError;

/// A user action. Slot and list positions are 0-based here; the text front
/// end converts from the 1-based numbers it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    SetTeamName(String),
    SetBid { slot: usize, value: i64 },
    StepBid { slot: usize, delta: i64 },
    MoveBid { from: usize, to: usize },
    MoveRole { from: usize, to: usize },
    SelectCandidate { role: Role, candidate: String },
    MoveCandidate { role: Role, from: usize, to: usize },
    /// Export to the given directory, or the configured export directory.
    Export { dir: Option<PathBuf> },
    Import { path: PathBuf },
    /// Clear the stored plan and start over from the defaults.
    Reset,
    Show,
    Help,
    Quit,
}

/// What a command did to the session.
#[derive(Debug)]
pub enum CommandOutcome {
    /// A new snapshot was accepted and written to the store.
    Updated,
    /// The edit was refused; plan and store are unchanged.
    Rejected(MutationError),
    Exported(PathBuf),
    ExportFailed(String),
    Imported,
    /// The file was unreadable or failed validation; plan unchanged.
    ImportFailed(String),
    Reset,
    /// Nothing to change (view-only commands).
    Unchanged,
    Quit,
}
