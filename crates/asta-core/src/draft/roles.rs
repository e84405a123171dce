// Role tags and the draft-order role sequence.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::order::reorder;
use super::MutationError;

/// Squad role of a draft slot. Serialized with the league's one-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "A")]
    Striker,
    #[serde(rename = "C")]
    Central,
    #[serde(rename = "D")]
    Defender,
    #[serde(rename = "P")]
    Goalkeeper,
}

/// Role order used when no plan exists yet: 6 strikers, 8 centrals,
/// 8 defenders and the goalkeeper team.
pub const DEFAULT_ROLES: [Role; 23] = {
    use Role::*;
    [
        Striker, Striker, Striker, Central, Central, Central, Defender, Defender, Defender,
        Defender, Goalkeeper, Striker, Striker, Striker, Central, Central, Central, Central,
        Central, Defender, Defender, Defender, Defender,
    ]
};

impl Role {
    pub const ALL: [Role; 4] = [Role::Striker, Role::Central, Role::Defender, Role::Goalkeeper];

    /// Parse a one-letter league code (`A`, `C`, `D`, `P`), case-insensitive.
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Some(Role::Striker),
            "C" => Some(Role::Central),
            "D" => Some(Role::Defender),
            "P" => Some(Role::Goalkeeper),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Role::Striker => "A",
            Role::Central => "C",
            Role::Defender => "D",
            Role::Goalkeeper => "P",
        }
    }

    /// Name of the preference list holding candidates for this role.
    pub fn list_name(&self) -> &'static str {
        match self {
            Role::Striker => "strikers",
            Role::Central => "centrals",
            Role::Defender => "defenders",
            Role::Goalkeeper => "goalkeepers",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Striker => "striker",
            Role::Central => "central",
            Role::Defender => "defender",
            Role::Goalkeeper => "goalkeeper",
        };
        f.write_str(name)
    }
}

/// Move a role tag to a new draft position. The multiset of tags never
/// changes; only their order does.
pub fn reorder_roles(roles: &[Role], from: usize, to: usize) -> Result<Vec<Role>, MutationError> {
    reorder(roles, from, to)
}

/// Number of slots assigned to each role.
pub fn role_counts(roles: &[Role]) -> HashMap<Role, usize> {
    let mut counts = HashMap::new();
    for role in roles {
        *counts.entry(*role).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roles_match_squad_composition() {
        let counts = role_counts(&DEFAULT_ROLES);
        assert_eq!(counts.get(&Role::Striker), Some(&6));
        assert_eq!(counts.get(&Role::Central), Some(&8));
        assert_eq!(counts.get(&Role::Defender), Some(&8));
        assert_eq!(counts.get(&Role::Goalkeeper), Some(&1));
    }

    #[test]
    fn codes_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
        assert_eq!(Role::from_code("p"), Some(Role::Goalkeeper));
        assert_eq!(Role::from_code("X"), None);
    }

    #[test]
    fn serializes_as_league_code() {
        let json = serde_json::to_string(&[Role::Striker, Role::Goalkeeper]).unwrap();
        assert_eq!(json, r#"["A","P"]"#);
        let back: Vec<Role> = serde_json::from_str(r#"["C","D"]"#).unwrap();
        assert_eq!(back, vec![Role::Central, Role::Defender]);
    }

    #[test]
    fn reorder_keeps_role_counts() {
        let moved = reorder_roles(&DEFAULT_ROLES, 10, 0).unwrap();
        assert_eq!(moved[0], Role::Goalkeeper);
        assert_eq!(role_counts(&moved), role_counts(&DEFAULT_ROLES));
    }

    #[test]
    fn reorder_out_of_range_is_rejected() {
        assert!(matches!(
            reorder_roles(&DEFAULT_ROLES, 0, 23),
            Err(MutationError::IndexOutOfRange { index: 23, len: 23 })
        ));
    }
}
