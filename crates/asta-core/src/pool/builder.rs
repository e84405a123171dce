// Offline pool builder: regenerates `players-data.json` from the league's
// CSV quotation exports.
//
// Each role has its own file with `Nome`, `Squadra` and `Qt.A` columns.
// Goalkeepers are collapsed to one entry per team carrying the team's best
// quotation.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::{CandidatePool, Goalkeeper, Player, PoolError};

pub const STRIKERS_CSV: &str = "attaccanti.csv";
pub const CENTRALS_CSV: &str = "centrocampisti.csv";
pub const DEFENDERS_CSV: &str = "difensori.csv";
pub const GOALKEEPERS_CSV: &str = "portieri.csv";

/// One quotation row. Extra columns in the export are ignored.
#[derive(Debug, Deserialize)]
struct RawQuotation {
    #[serde(rename = "Nome", default)]
    name: String,
    #[serde(rename = "Squadra")]
    team: String,
    #[serde(rename = "Qt.A")]
    value: f64,
}

/// Quotations are fractional in some exports; prices are whole credits,
/// dropping the fraction.
fn to_credits(raw: &RawQuotation) -> Option<u32> {
    if !raw.value.is_finite() || raw.value < 0.0 || raw.value > f64::from(u32::MAX) {
        return None;
    }
    Some(raw.value.trunc() as u32)
}

fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawQuotation>() {
        match result {
            Ok(raw) => {
                let name = raw.name.trim();
                if name.is_empty() {
                    warn!("skipping quotation row without a player name");
                    continue;
                }
                let Some(value) = to_credits(&raw) else {
                    warn!("skipping player '{}': invalid Qt.A value {}", name, raw.value);
                    continue;
                };
                players.push(Player {
                    name: name.to_string(),
                    team: raw.team.trim().to_string(),
                    value,
                });
            }
            Err(e) => {
                warn!("skipping malformed quotation row: {}", e);
            }
        }
    }
    Ok(players)
}

fn load_goalkeepers_from_reader<R: Read>(rdr: R) -> Result<Vec<Goalkeeper>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut teams: Vec<Goalkeeper> = Vec::new();
    let mut index_by_team: HashMap<String, usize> = HashMap::new();

    for result in reader.deserialize::<RawQuotation>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed goalkeeper row: {}", e);
                continue;
            }
        };
        let team = raw.team.trim();
        let Some(value) = to_credits(&raw) else {
            warn!("skipping goalkeeper of '{}': invalid Qt.A value {}", team, raw.value);
            continue;
        };
        match index_by_team.get(team) {
            Some(&idx) => {
                let entry = &mut teams[idx];
                entry.value = entry.value.max(value);
            }
            None => {
                index_by_team.insert(team.to_string(), teams.len());
                teams.push(Goalkeeper {
                    team: team.to_string(),
                    value,
                });
            }
        }
    }

    // Stable: equal values keep first-seen order.
    teams.sort_by(|a, b| b.value.cmp(&a.value));
    Ok(teams)
}

fn open_csv(dir: &Path, file_name: &str) -> Result<(std::fs::File, String), PoolError> {
    let path = dir.join(file_name);
    let path_str = path.display().to_string();
    let file = std::fs::File::open(&path).map_err(|e| PoolError::Io {
        path: path_str.clone(),
        source: e,
    })?;
    Ok((file, path_str))
}

fn load_players_file(dir: &Path, file_name: &str) -> Result<Vec<Player>, PoolError> {
    let (file, path) = open_csv(dir, file_name)?;
    load_players_from_reader(file).map_err(|e| PoolError::Csv { path, source: e })
}

/// Build the candidate pool from the four quotation CSVs in `dir`.
pub fn build_pool(dir: &Path) -> Result<CandidatePool, PoolError> {
    let strikers = load_players_file(dir, STRIKERS_CSV)?;
    let centrals = load_players_file(dir, CENTRALS_CSV)?;
    let defenders = load_players_file(dir, DEFENDERS_CSV)?;
    let (file, path) = open_csv(dir, GOALKEEPERS_CSV)?;
    let goalkeepers =
        load_goalkeepers_from_reader(file).map_err(|e| PoolError::Csv { path, source: e })?;

    let pool = CandidatePool {
        strikers,
        centrals,
        defenders,
        goalkeepers,
    };
    info!("Built candidate pool with {} entries from {}", pool.len(), dir.display());
    Ok(pool)
}

/// Write the pool as pretty-printed JSON, creating parent directories.
pub fn write_pool(pool: &CandidatePool, path: &Path) -> Result<(), PoolError> {
    let path_str = path.display().to_string();
    let io_err = |e| PoolError::Io {
        path: path_str.clone(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(pool).map_err(|e| PoolError::Json {
        path: path_str.clone(),
        source: e,
    })?;
    std::fs::write(path, json).map_err(io_err)
}
