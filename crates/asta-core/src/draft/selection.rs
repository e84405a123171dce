// Selection state: the complete draft plan that is persisted and exported.

use serde::{Deserialize, Serialize};

use super::ledger::{reorder_bids, BudgetLedger, DEFAULT_BIDS};
use super::preferences::PreferenceLists;
use super::roles::{reorder_roles, Role, DEFAULT_ROLES};
use super::MutationError;

/// One manager's plan: team name, bid curve, role order and the four ranked
/// candidate lists.
///
/// Every mutation returns a new snapshot and leaves `self` as it was, so a
/// refused edit can never leave a half-applied plan behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub team_name: String,
    pub bids: Vec<u32>,
    pub roles: Vec<Role>,
    #[serde(flatten)]
    pub preferences: PreferenceLists,
}

impl Selection {
    /// Fresh plan with the standard bid curve and role order. `candidates`
    /// holds every pool candidate in document order.
    pub fn create_default(candidates: PreferenceLists) -> Self {
        Self::with_defaults(candidates, &DEFAULT_BIDS, &DEFAULT_ROLES)
    }

    /// Fresh plan with a league-specific bid curve and role order.
    pub fn with_defaults(candidates: PreferenceLists, bids: &[u32], roles: &[Role]) -> Self {
        Self {
            team_name: String::new(),
            bids: bids.to_vec(),
            roles: roles.to_vec(),
            preferences: candidates,
        }
    }

    pub fn with_team_name(&self, team_name: &str) -> Self {
        Self {
            team_name: team_name.to_string(),
            ..self.clone()
        }
    }

    pub fn remaining(&self, ledger: &BudgetLedger) -> i64 {
        ledger.remaining(&self.bids)
    }

    pub fn set_bid(
        &self,
        ledger: &BudgetLedger,
        index: usize,
        value: i64,
    ) -> Result<Self, MutationError> {
        let bids = ledger.set_bid(&self.bids, index, value)?;
        Ok(Self { bids, ..self.clone() })
    }

    pub fn step_bid(
        &self,
        ledger: &BudgetLedger,
        index: usize,
        delta: i64,
    ) -> Result<Self, MutationError> {
        let bids = ledger.step_bid(&self.bids, index, delta)?;
        Ok(Self { bids, ..self.clone() })
    }

    pub fn reorder_bids(&self, from: usize, to: usize) -> Result<Self, MutationError> {
        let bids = reorder_bids(&self.bids, from, to)?;
        Ok(Self { bids, ..self.clone() })
    }

    pub fn reorder_roles(&self, from: usize, to: usize) -> Result<Self, MutationError> {
        let roles = reorder_roles(&self.roles, from, to)?;
        Ok(Self { roles, ..self.clone() })
    }

    pub fn select_candidate(&self, role: Role, candidate: &str) -> Result<Self, MutationError> {
        let preferences = self.preferences.select(role, candidate)?;
        Ok(Self {
            preferences,
            ..self.clone()
        })
    }

    pub fn reorder_candidates(
        &self,
        role: Role,
        from: usize,
        to: usize,
    ) -> Result<Self, MutationError> {
        let preferences = self.preferences.reorder(role, from, to)?;
        Ok(Self {
            preferences,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::roles::role_counts;

    fn candidates() -> PreferenceLists {
        PreferenceLists {
            strikers: vec!["Lautaro".into(), "Kean".into()],
            centrals: vec!["Barella".into()],
            defenders: vec!["Bastoni".into()],
            goalkeepers: vec!["Inter".into(), "Juventus".into()],
        }
    }

    #[test]
    fn default_plan_spends_exactly_the_budget() {
        let plan = Selection::create_default(candidates());
        let ledger = BudgetLedger::default();
        assert_eq!(plan.team_name, "");
        assert_eq!(plan.bids.len(), 23);
        assert_eq!(plan.roles.len(), 23);
        assert_eq!(plan.remaining(&ledger), 0);
        assert_eq!(plan.preferences, candidates());
    }

    #[test]
    fn serializes_to_flat_camel_case_record() {
        let plan = Selection::create_default(candidates()).with_team_name("FC Test");
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["teamName"], "FC Test");
        assert_eq!(value["bids"][0], 100);
        assert_eq!(value["roles"][10], "P");
        assert_eq!(value["strikers"][1], "Kean");
        assert_eq!(value["goalkeepers"][0], "Inter");
        assert!(value.get("preferences").is_none());

        let back: Selection = serde_json::from_value(value).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn rejected_bid_leaves_snapshot_unchanged() {
        let plan = Selection::create_default(candidates());
        let ledger = BudgetLedger::default();
        assert!(plan.set_bid(&ledger, 0, 150).is_err());
        assert_eq!(plan.bids, DEFAULT_BIDS.to_vec());
    }

    #[test]
    fn accepted_edits_produce_new_snapshots() {
        let ledger = BudgetLedger::default();
        let plan = Selection::create_default(candidates());
        let cheaper = plan.step_bid(&ledger, 0, -10).unwrap();
        let richer = cheaper.step_bid(&ledger, 0, 10).unwrap();
        assert_eq!(cheaper.bids[0], 90);
        assert_eq!(richer.bids[0], 100);
        assert_eq!(plan.bids[0], 100);
    }

    #[test]
    fn role_reorder_is_a_permutation() {
        let plan = Selection::create_default(candidates());
        let moved = plan.reorder_roles(10, 22).unwrap();
        assert_eq!(moved.roles[22], Role::Goalkeeper);
        assert_eq!(role_counts(&moved.roles), role_counts(&plan.roles));
    }

    #[test]
    fn candidates_cannot_be_booked_twice() {
        let plan = Selection::create_default(candidates())
            .select_candidate(Role::Striker, "Retegui")
            .unwrap();
        assert_eq!(plan.preferences.strikers.last().map(String::as_str), Some("Retegui"));
        assert!(plan.select_candidate(Role::Striker, "Retegui").is_err());
        assert!(plan.select_candidate(Role::Central, "Retegui").is_err());
    }

    #[test]
    fn candidate_reorder_changes_one_list() {
        let plan = Selection::create_default(candidates());
        let moved = plan.reorder_candidates(Role::Goalkeeper, 1, 0).unwrap();
        assert_eq!(moved.preferences.goalkeepers, vec!["Juventus", "Inter"]);
        assert_eq!(moved.preferences.strikers, plan.preferences.strikers);
    }
}
