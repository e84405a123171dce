// Candidate pool: the read-only player document the default plan is built
// from, and lookups of each candidate's display values.

pub mod builder;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::draft::preferences::PreferenceLists;
use crate::draft::roles::Role;

/// A player candidate, ranked by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub team: String,
    /// Season price estimate.
    pub value: u32,
}

/// A team goalkeeping slot, ranked by team name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goalkeeper {
    pub team: String,
    /// Price estimate of the team's best goalkeeper.
    pub value: u32,
}

/// The full candidate document (`players-data.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePool {
    pub strikers: Vec<Player>,
    pub centrals: Vec<Player>,
    pub defenders: Vec<Player>,
    pub goalkeepers: Vec<Goalkeeper>,
}

/// Display record for a ranked candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateInfo<'a> {
    pub id: &'a str,
    /// Team affiliation; for goalkeepers this is the id itself.
    pub team: &'a str,
    pub value: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse candidate pool {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

impl CandidatePool {
    fn players(&self, role: Role) -> Option<&[Player]> {
        match role {
            Role::Striker => Some(&self.strikers),
            Role::Central => Some(&self.centrals),
            Role::Defender => Some(&self.defenders),
            Role::Goalkeeper => None,
        }
    }

    /// Candidate ids per role in document order: player names, and team
    /// names for goalkeepers.
    pub fn candidate_ids(&self) -> PreferenceLists {
        let names = |players: &[Player]| -> Vec<String> {
            players.iter().map(|p| p.name.clone()).collect()
        };
        PreferenceLists {
            strikers: names(&self.strikers),
            centrals: names(&self.centrals),
            defenders: names(&self.defenders),
            goalkeepers: self.goalkeepers.iter().map(|g| g.team.clone()).collect(),
        }
    }

    /// Display values for `id` in the `role` list. `None` when the pool does
    /// not know the candidate (plans imported from elsewhere may hold any id).
    pub fn lookup(&self, role: Role, id: &str) -> Option<CandidateInfo<'_>> {
        match self.players(role) {
            Some(players) => players.iter().find(|p| p.name == id).map(|p| CandidateInfo {
                id: &p.name,
                team: &p.team,
                value: p.value,
            }),
            None => self
                .goalkeepers
                .iter()
                .find(|g| g.team == id)
                .map(|g| CandidateInfo {
                    id: &g.team,
                    team: &g.team,
                    value: g.value,
                }),
        }
    }

    pub fn len(&self) -> usize {
        self.strikers.len() + self.centrals.len() + self.defenders.len() + self.goalkeepers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a candidate document from its JSON text.
pub fn parse_pool(text: &str, path: &str) -> Result<CandidatePool, PoolError> {
    serde_json::from_str(text).map_err(|e| PoolError::Json {
        path: path.to_string(),
        source: e,
    })
}

/// Read the candidate document once at startup. There is no retry; a failure
/// here is terminal for the session.
pub async fn load_pool(path: &Path) -> Result<CandidatePool, PoolError> {
    let path_str = path.display().to_string();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PoolError::Io {
            path: path_str.clone(),
            source: e,
        })?;
    let pool = parse_pool(&text, &path_str)?;
    info!(
        "Loaded candidate pool from {}: {} strikers, {} centrals, {} defenders, {} goalkeeper teams",
        path_str,
        pool.strikers.len(),
        pool.centrals.len(),
        pool.defenders.len(),
        pool.goalkeepers.len()
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "strikers": [
            {"name": "Lautaro", "team": "Inter", "value": 38},
            {"name": "Kean", "team": "Fiorentina", "value": 25}
        ],
        "centrals": [{"name": "Barella", "team": "Inter", "value": 18}],
        "defenders": [{"name": "Bastoni", "team": "Inter", "value": 14}],
        "goalkeepers": [{"team": "Napoli", "value": 19}, {"team": "Inter", "value": 20}]
    }"#;

    #[test]
    fn candidate_ids_keep_document_order() {
        let pool = parse_pool(SAMPLE, "sample").unwrap();
        let ids = pool.candidate_ids();
        assert_eq!(ids.strikers, vec!["Lautaro", "Kean"]);
        assert_eq!(ids.centrals, vec!["Barella"]);
        assert_eq!(ids.goalkeepers, vec!["Napoli", "Inter"]);
        assert_eq!(pool.len(), 6);
    }

    #[test]
    fn lookup_finds_players_by_name_and_keepers_by_team() {
        let pool = parse_pool(SAMPLE, "sample").unwrap();
        let kean = pool.lookup(Role::Striker, "Kean").unwrap();
        assert_eq!(kean.team, "Fiorentina");
        assert_eq!(kean.value, 25);

        let inter = pool.lookup(Role::Goalkeeper, "Inter").unwrap();
        assert_eq!(inter.value, 20);

        // Names are scoped to the role's list.
        assert!(pool.lookup(Role::Central, "Kean").is_none());
        assert!(pool.lookup(Role::Striker, "Inter").is_none());
    }

    #[test]
    fn malformed_document_is_a_load_failure() {
        let err = parse_pool(r#"{"strikers": []}"#, "broken.json").unwrap_err();
        assert!(matches!(err, PoolError::Json { ref path, .. } if path == "broken.json"));
    }

    #[tokio::test]
    async fn load_pool_reads_file() {
        let dir = std::env::temp_dir().join("asta_pool_test_load");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("players-data.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let pool = load_pool(&path).await.unwrap();
        assert_eq!(pool.strikers.len(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn load_pool_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("asta_pool_test_missing/none.json");
        let err = load_pool(&path).await.unwrap_err();
        assert!(matches!(err, PoolError::Io { ref path, .. } if path.ends_with("none.json")));
    }
}
