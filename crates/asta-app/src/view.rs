// Plain-text rendering of the session for the command front end.

use std::fmt::Write;

use asta_core::draft::ledger::BudgetLedger;
use asta_core::draft::roles::Role;

use crate::app::Session;
use crate::protocol::CommandOutcome;

/// How many entries of each preference list the overview shows.
pub const LIST_PREVIEW: usize = 10;

/// Stepper labels for one slot, e.g. `[-10 -1 +1 +10]`. Disabled steps are
/// shown as dots so columns stay aligned.
fn stepper_controls(session: &Session, slot: usize) -> String {
    let bids = &session.selection().bids;
    let steps = &session.config.league.bid_steps;

    let mut deltas: Vec<i64> = steps.iter().rev().map(|&s| -i64::from(s)).collect();
    deltas.extend(steps.iter().map(|&s| i64::from(s)));

    let labels: Vec<String> = deltas
        .into_iter()
        .map(|delta| {
            let label = format!("{delta:+}");
            if session.ledger().can_step(bids, slot, delta) {
                label
            } else {
                ".".repeat(label.len())
            }
        })
        .collect();
    format!("[{}]", labels.join(" "))
}

fn render_slots(session: &Session, out: &mut String) {
    let selection = session.selection();
    let _ = writeln!(out, "Slot  Bid  Role  Steps");
    for (slot, bid) in selection.bids.iter().enumerate() {
        let role = selection
            .roles
            .get(slot)
            .map(Role::code)
            .unwrap_or("-");
        let _ = writeln!(
            out,
            "{:>4}  {:>3}  {:<4}  {}",
            slot + 1,
            bid,
            role,
            stepper_controls(session, slot)
        );
    }
}

fn render_list(session: &Session, role: Role, out: &mut String) {
    let ids = session.selection().preferences.list(role);
    let _ = writeln!(out, "{} ({}):", role.list_name(), ids.len());
    for (pos, id) in ids.iter().take(LIST_PREVIEW).enumerate() {
        match session.pool.lookup(role, id) {
            Some(info) if role == Role::Goalkeeper => {
                let _ = writeln!(out, "  {:>3}. {} ({})", pos + 1, id, info.value);
            }
            Some(info) => {
                let _ = writeln!(out, "  {:>3}. {} - {} ({})", pos + 1, id, info.team, info.value);
            }
            None => {
                let _ = writeln!(out, "  {:>3}. {}", pos + 1, id);
            }
        }
    }
    if ids.len() > LIST_PREVIEW {
        let _ = writeln!(out, "       ... {} more", ids.len() - LIST_PREVIEW);
    }
}

/// Full overview of the current plan.
pub fn render(session: &Session) -> String {
    let selection = session.selection();
    let mut out = String::new();

    let team = if selection.team_name.is_empty() {
        "(unnamed)"
    } else {
        selection.team_name.as_str()
    };
    let _ = writeln!(out, "{} - {}", session.config.league.name, team);

    let remaining = session.remaining();
    let _ = write!(
        out,
        "Planned {} / {} credits, remaining {}",
        BudgetLedger::total(&selection.bids),
        session.ledger().total_budget(),
        remaining
    );
    if remaining < 0 {
        let _ = write!(out, " (over budget)");
    }
    let _ = writeln!(out);
    match session.last_saved() {
        Some(stamp) => {
            let _ = writeln!(out, "Last saved {stamp}");
        }
        None => {
            let _ = writeln!(out, "Not saved");
        }
    }
    if !BudgetLedger::is_monotonic(&selection.bids) {
        let _ = writeln!(out, "Warning: bids are not ordered from highest to lowest");
    }
    let _ = writeln!(out);

    render_slots(session, &mut out);
    for role in Role::ALL {
        let _ = writeln!(out);
        render_list(session, role, &mut out);
    }
    out
}

/// One-line notice for a command result. `None` when there is nothing to say
/// beyond the refreshed overview.
pub fn render_outcome(outcome: &CommandOutcome) -> Option<String> {
    match outcome {
        CommandOutcome::Updated | CommandOutcome::Unchanged | CommandOutcome::Quit => None,
        CommandOutcome::Rejected(e) => Some(format!("Not applied: {e}")),
        CommandOutcome::Exported(path) => Some(format!("Exported to {}", path.display())),
        CommandOutcome::ExportFailed(message) => Some(format!("Export failed: {message}")),
        CommandOutcome::Imported => Some("Plan imported".to_string()),
        CommandOutcome::ImportFailed(message) => {
            Some(format!("Import failed: {message}; plan unchanged"))
        }
        CommandOutcome::Reset => Some("Plan reset to defaults".to_string()),
    }
}
