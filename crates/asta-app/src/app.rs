// Session orchestration.
//
// The session is the single owner of the current plan. Every command either
// produces a new snapshot, which replaces the current one and is written to
// the store straight away, or is refused and leaves both untouched.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use asta_core::config::Config;
use asta_core::draft::ledger::BudgetLedger;
use asta_core::draft::selection::Selection;
use asta_core::draft::MutationError;
use asta_core::persist::{self, Persistence};
use asta_core::pool::CandidatePool;
use asta_core::store::Database;

use crate::protocol::{CommandOutcome, UserCommand};

/// The local store as opened at startup.
pub struct OpenedStore {
    pub db: Database,
    /// The configured file could not be opened; edits last only until exit.
    pub in_memory_fallback: bool,
}

fn open_store_file(db_path: &str) -> anyhow::Result<Database> {
    if let Some(parent) = Path::new(db_path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Database::open(db_path)
}

/// Open the store at `db_path`. A store that cannot be opened is logged and
/// replaced by an in-memory one so the session can still run.
pub fn open_store(db_path: &str) -> anyhow::Result<OpenedStore> {
    match open_store_file(db_path) {
        Ok(db) => {
            info!("Database opened at {}", db_path);
            Ok(OpenedStore {
                db,
                in_memory_fallback: false,
            })
        }
        Err(e) => {
            warn!("Store unavailable at {}: {:#}; plan kept in memory only", db_path, e);
            let db = Database::open(":memory:").context("failed to open in-memory store")?;
            Ok(OpenedStore {
                db,
                in_memory_fallback: true,
            })
        }
    }
}

pub struct Session {
    pub config: Config,
    pub pool: CandidatePool,
    ledger: BudgetLedger,
    persistence: Persistence,
    selection: Selection,
}

impl Session {
    /// Restore the stored plan, or build and store the default one.
    pub fn start(config: Config, pool: CandidatePool, persistence: Persistence) -> Self {
        let ledger = config.ledger();
        let selection = match persistence.load() {
            Some(saved) => {
                info!(
                    "Restored plan '{}' from store key '{}'",
                    saved.team_name,
                    persistence.key()
                );
                saved
            }
            None => {
                let fresh = config.default_selection(pool.candidate_ids());
                info!("No saved plan; starting from defaults");
                persistence.save(&fresh);
                fresh
            }
        };

        Session {
            config,
            pool,
            ledger,
            persistence,
            selection,
        }
    }

    /// The current snapshot.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn ledger(&self) -> &BudgetLedger {
        &self.ledger
    }

    /// Store timestamp of the last successful save.
    pub fn last_saved(&self) -> Option<String> {
        self.persistence.last_saved()
    }

    /// Credits left under the current plan.
    pub fn remaining(&self) -> i64 {
        self.selection.remaining(&self.ledger)
    }

    fn commit(&mut self, next: Selection) {
        self.persistence.save(&next);
        self.selection = next;
    }

    fn apply(&mut self, result: Result<Selection, MutationError>) -> CommandOutcome {
        match result {
            Ok(next) => {
                self.commit(next);
                CommandOutcome::Updated
            }
            Err(e) => {
                info!("Rejected edit: {}", e);
                CommandOutcome::Rejected(e)
            }
        }
    }

    fn export_dir(&self, dir: Option<PathBuf>) -> PathBuf {
        dir.unwrap_or_else(|| PathBuf::from(&self.config.data_paths.export_dir))
    }

    async fn import(&mut self, path: &Path) -> CommandOutcome {
        match persist::import_from_file(path).await {
            Ok(imported) => {
                if !BudgetLedger::is_monotonic(&imported.bids) || imported.remaining(&self.ledger) < 0 {
                    warn!("Imported plan breaks bid ordering or budget; keeping it as-is");
                }
                self.commit(imported);
                CommandOutcome::Imported
            }
            Err(e) => {
                warn!("Import of {} failed: {}", path.display(), e);
                CommandOutcome::ImportFailed(e.to_string())
            }
        }
    }

    /// Apply one user command.
    pub async fn handle_command(&mut self, command: UserCommand) -> CommandOutcome {
        let ledger = self.ledger;
        match command {
            UserCommand::SetTeamName(name) => {
                let next = self.selection.with_team_name(&name);
                self.commit(next);
                CommandOutcome::Updated
            }
            UserCommand::SetBid { slot, value } => {
                let result = self.selection.set_bid(&ledger, slot, value);
                self.apply(result)
            }
            UserCommand::StepBid { slot, delta } => {
                let result = self.selection.step_bid(&ledger, slot, delta);
                self.apply(result)
            }
            UserCommand::MoveBid { from, to } => {
                let result = self.selection.reorder_bids(from, to);
                self.apply(result)
            }
            UserCommand::MoveRole { from, to } => {
                let result = self.selection.reorder_roles(from, to);
                self.apply(result)
            }
            UserCommand::SelectCandidate { role, candidate } => {
                let result = self.selection.select_candidate(role, &candidate);
                self.apply(result)
            }
            UserCommand::MoveCandidate { role, from, to } => {
                let result = self.selection.reorder_candidates(role, from, to);
                self.apply(result)
            }
            UserCommand::Export { dir } => {
                let dir = self.export_dir(dir);
                match persist::export_to_file(&self.selection, &dir).await {
                    Ok(path) => CommandOutcome::Exported(path),
                    Err(e) => {
                        warn!("Export failed: {}", e);
                        CommandOutcome::ExportFailed(e.to_string())
                    }
                }
            }
            UserCommand::Import { path } => self.import(&path).await,
            UserCommand::Reset => {
                self.persistence.clear();
                let fresh = self.config.default_selection(self.pool.candidate_ids());
                self.commit(fresh);
                info!("Plan reset to defaults");
                CommandOutcome::Reset
            }
            UserCommand::Show | UserCommand::Help => CommandOutcome::Unchanged,
            UserCommand::Quit => CommandOutcome::Quit,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
