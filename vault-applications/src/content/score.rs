//! Vault score history
//!
//! Every point award is appended to a shared history; a founder's score is
//! the clamped sum of their entries.

use crate::auth::identity::clamp_score;
use crate::storage::StorageGateway;
use crate::ApplicationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub user_id: String,
    /// Signed; penalties are negative
    pub points: i64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ScoreLedger {
    gateway: StorageGateway,
}

impl ScoreLedger {
    pub fn new(gateway: StorageGateway) -> Self {
        Self { gateway }
    }

    pub fn award(&self, user_id: &str, points: i64, reason: &str) -> ApplicationResult<ScoreEntry> {
        let entry = ScoreEntry {
            user_id: user_id.to_string(),
            points,
            reason: reason.to_string(),
            timestamp: Utc::now(),
        };

        self.gateway
            .update(&self.gateway.keys().score_history, |history: &mut Vec<ScoreEntry>| {
                history.push(entry.clone())
            })?;

        debug!(user_id = user_id, points = points, reason = reason, "Points awarded");
        Ok(entry)
    }

    pub fn history_for(&self, user_id: &str) -> Vec<ScoreEntry> {
        let history: Vec<ScoreEntry> = self.gateway.load(&self.gateway.keys().score_history);
        history
            .into_iter()
            .filter(|entry| entry.user_id == user_id)
            .collect()
    }

    /// Sum of the user's history, clamped into 0..=100
    pub fn score_for(&self, user_id: &str) -> u8 {
        let total: i64 = self
            .history_for(user_id)
            .iter()
            .map(|entry| entry.points)
            .sum();
        clamp_score(total)
    }
}

/// Label for a score band
pub fn score_category(score: u8) -> &'static str {
    match score {
        90.. => "Elite",
        75..=89 => "Advanced",
        60..=74 => "Proficient",
        40..=59 => "Developing",
        _ => "Beginner",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageKeys};
    use std::sync::Arc;

    fn ledger() -> ScoreLedger {
        ScoreLedger::new(StorageGateway::new(
            Arc::new(MemoryStore::new()),
            StorageKeys::default(),
        ))
    }

    #[test]
    fn test_score_caps_at_100() {
        let ledger = ledger();
        for _ in 0..12 {
            ledger.award("u1", 10, "endorsement").unwrap();
        }
        assert_eq!(ledger.score_for("u1"), 100);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let ledger = ledger();
        ledger.award("u1", 10, "signup").unwrap();
        ledger.award("u1", -25, "penalty").unwrap();
        assert_eq!(ledger.score_for("u1"), 0);
    }

    #[test]
    fn test_history_is_per_user() {
        let ledger = ledger();
        ledger.award("u1", 10, "signup").unwrap();
        ledger.award("u2", 5, "endorsement").unwrap();

        assert_eq!(ledger.history_for("u1").len(), 1);
        assert_eq!(ledger.score_for("u2"), 5);
        assert_eq!(ledger.score_for("nobody"), 0);
    }

    #[test]
    fn test_categories() {
        assert_eq!(score_category(95), "Elite");
        assert_eq!(score_category(90), "Elite");
        assert_eq!(score_category(75), "Advanced");
        assert_eq!(score_category(60), "Proficient");
        assert_eq!(score_category(40), "Developing");
        assert_eq!(score_category(39), "Beginner");
        assert_eq!(score_category(0), "Beginner");
    }
}
