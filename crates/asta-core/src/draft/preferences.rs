// Per-role candidate preference lists.
//
// Strikers, centrals and defenders are ranked by player name; goalkeepers by
// team name, since a goalkeeper is bought as the whole team's goalkeeping
// slot. A candidate can sit in at most one list.

use serde::{Deserialize, Serialize};

use super::order::reorder;
use super::roles::Role;
use super::MutationError;

/// The four ranked candidate lists of a draft plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceLists {
    pub strikers: Vec<String>,
    pub centrals: Vec<String>,
    pub defenders: Vec<String>,
    pub goalkeepers: Vec<String>,
}

impl PreferenceLists {
    /// The ranked list for `role`.
    pub fn list(&self, role: Role) -> &[String] {
        match role {
            Role::Striker => &self.strikers,
            Role::Central => &self.centrals,
            Role::Defender => &self.defenders,
            Role::Goalkeeper => &self.goalkeepers,
        }
    }

    fn list_mut(&mut self, role: Role) -> &mut Vec<String> {
        match role {
            Role::Striker => &mut self.strikers,
            Role::Central => &mut self.centrals,
            Role::Defender => &mut self.defenders,
            Role::Goalkeeper => &mut self.goalkeepers,
        }
    }

    /// Which list currently holds `candidate`, if any.
    pub fn holder_of(&self, candidate: &str) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|&role| self.list(role).iter().any(|c| c == candidate))
    }

    /// Append `candidate` to the end of the `role` list.
    ///
    /// Refused when the candidate is already ranked in any of the four lists,
    /// including `role` itself.
    pub fn select(&self, role: Role, candidate: &str) -> Result<Self, MutationError> {
        if let Some(held_by) = self.holder_of(candidate) {
            return Err(MutationError::AlreadySelected {
                candidate: candidate.to_string(),
                held_by,
            });
        }

        let mut updated = self.clone();
        updated.list_mut(role).push(candidate.to_string());
        Ok(updated)
    }

    /// Move a candidate within the `role` list. The other lists are untouched.
    pub fn reorder(&self, role: Role, from: usize, to: usize) -> Result<Self, MutationError> {
        let moved = reorder(self.list(role), from, to)?;
        let mut updated = self.clone();
        *updated.list_mut(role) = moved;
        Ok(updated)
    }

    /// Total number of ranked candidates across all lists.
    pub fn len(&self) -> usize {
        Role::ALL.iter().map(|&role| self.list(role).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
