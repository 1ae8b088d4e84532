use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use replyline_protocol::types::ActivationStatus;
use replyline_rules::DeployedRule;

#[derive(Debug, Clone)]
struct Entry {
    rule: DeployedRule,
    revision: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    entries: Vec<Entry>,
    next_revision: u64,
    /// Bumped by every full refetch.
    generation: u64,
    stale: HashSet<String>,
}

impl StoreState {
    fn position(&self, automation_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.rule.automation_id == automation_id)
    }

    fn bump(&mut self) -> u64 {
        self.next_revision += 1;
        self.next_revision
    }
}

/// Receipt of an optimistic status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub previous: ActivationStatus,
    pub revision: u64,
    pub generation: u64,
}

/// Receipt of an optimistic removal.
#[derive(Debug, Clone)]
pub struct Removal {
    pub index: usize,
    pub rule: DeployedRule,
    pub generation: u64,
}

/// Result of trying to undo an optimistic change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollback {
    Applied,
    /// A later local command touched the rule; local state may diverge.
    Superseded,
    /// A full refetch replaced the list, which already shows backend state.
    Refetched,
}

/// Locally held list of deployed automations, in backend order.
///
/// Every local mutation stamps the rule with a fresh revision so that a late
/// compensation can tell whether another command touched the rule since.
#[derive(Debug, Default, Clone)]
pub struct DeployedRuleStore {
    inner: Arc<RwLock<StoreState>>,
}

impl DeployedRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole list with a fresh refetch and clears stale marks.
    pub fn replace_all(&self, rules: Vec<DeployedRule>) {
        let mut inner = self.inner.write();
        let mut entries = Vec::with_capacity(rules.len());
        for rule in rules {
            let revision = inner.bump();
            entries.push(Entry { rule, revision });
        }
        inner.entries = entries;
        inner.generation += 1;
        inner.stale.clear();
    }

    pub fn snapshot(&self) -> Vec<DeployedRule> {
        let inner = self.inner.read();
        inner.entries.iter().map(|entry| entry.rule.clone()).collect()
    }

    pub fn get(&self, automation_id: &str) -> Option<DeployedRule> {
        let inner = self.inner.read();
        inner
            .position(automation_id)
            .map(|index| inner.entries[index].rule.clone())
    }

    pub fn status(&self, automation_id: &str) -> Option<ActivationStatus> {
        let inner = self.inner.read();
        inner
            .position(automation_id)
            .map(|index| inner.entries[index].rule.activation_status)
    }

    pub fn revision(&self, automation_id: &str) -> Option<u64> {
        let inner = self.inner.read();
        inner
            .position(automation_id)
            .map(|index| inner.entries[index].revision)
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Inserts a newly submitted rule or replaces the one with the same id.
    pub fn upsert(&self, rule: DeployedRule) -> u64 {
        let mut inner = self.inner.write();
        let revision = inner.bump();
        match inner.position(&rule.automation_id) {
            Some(index) => inner.entries[index] = Entry { rule, revision },
            None => inner.entries.push(Entry { rule, revision }),
        }
        revision
    }

    pub fn set_status(
        &self,
        automation_id: &str,
        status: ActivationStatus,
    ) -> Option<StatusChange> {
        let mut inner = self.inner.write();
        let index = inner.position(automation_id)?;
        let revision = inner.bump();
        let entry = &mut inner.entries[index];
        let previous = entry.rule.activation_status;
        entry.rule.activation_status = status;
        entry.revision = revision;
        let generation = inner.generation;
        Some(StatusChange {
            previous,
            revision,
            generation,
        })
    }

    /// Puts `change.previous` back if nothing touched the rule since `change`.
    pub fn revert_status(&self, automation_id: &str, change: StatusChange) -> Rollback {
        let mut inner = self.inner.write();
        if inner.generation != change.generation {
            return Rollback::Refetched;
        }
        let Some(index) = inner.position(automation_id) else {
            return Rollback::Superseded;
        };
        if inner.entries[index].revision != change.revision {
            return Rollback::Superseded;
        }
        let revision = inner.bump();
        let entry = &mut inner.entries[index];
        entry.rule.activation_status = change.previous;
        entry.revision = revision;
        Rollback::Applied
    }

    pub fn remove(&self, automation_id: &str) -> Option<Removal> {
        let mut inner = self.inner.write();
        let index = inner.position(automation_id)?;
        let entry = inner.entries.remove(index);
        Some(Removal {
            index,
            rule: entry.rule,
            generation: inner.generation,
        })
    }

    /// Re-inserts a removed rule at its old position unless a refetch ran
    /// or the id reappeared in the meantime.
    pub fn restore(&self, removal: Removal) -> Rollback {
        let mut inner = self.inner.write();
        if inner.generation != removal.generation {
            return Rollback::Refetched;
        }
        if inner.position(&removal.rule.automation_id).is_some() {
            return Rollback::Superseded;
        }
        let revision = inner.bump();
        let index = removal.index.min(inner.entries.len());
        inner.entries.insert(
            index,
            Entry {
                rule: removal.rule,
                revision,
            },
        );
        Rollback::Applied
    }

    pub fn mark_stale(&self, automation_id: &str) {
        self.inner.write().stale.insert(automation_id.to_string());
    }

    /// Whether some local state is known to diverge from the backend.
    pub fn needs_reconcile(&self) -> bool {
        !self.inner.read().stale.is_empty()
    }

    pub fn stale_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.read().stale.iter().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use replyline_core::Platform;
    use replyline_protocol::types::{AutomationKind, HealthStatus};
    use replyline_rules::{RuleDraft, RuleTelemetry};

    pub(crate) fn rule(id: &str, status: ActivationStatus) -> DeployedRule {
        let mut config = RuleDraft::named(format!("Rule {id}"));
        config.id = Some(id.to_string());
        DeployedRule {
            automation_id: id.to_string(),
            platform: Platform::Instagram,
            kind: AutomationKind::CommentReply,
            config,
            activation_status: status,
            telemetry: RuleTelemetry {
                health_status: HealthStatus::Healthy,
                execution_count: 0,
                cumulative_cost: 0.0,
                last_triggered_at: None,
            },
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn stale_revert_is_refused() {
        let store = DeployedRuleStore::new();
        store.replace_all(vec![rule("a", ActivationStatus::Active)]);

        let pause = store
            .set_status("a", ActivationStatus::Paused)
            .expect("rule exists");
        let resume = store
            .set_status("a", ActivationStatus::Active)
            .expect("rule exists");

        assert_eq!(store.revert_status("a", pause), Rollback::Superseded);
        assert_eq!(store.revert_status("a", resume), Rollback::Applied);
        assert_eq!(store.status("a"), Some(ActivationStatus::Paused));
    }

    #[test]
    fn restore_puts_rule_back_in_place() {
        let store = DeployedRuleStore::new();
        store.replace_all(vec![
            rule("a", ActivationStatus::Active),
            rule("b", ActivationStatus::Paused),
            rule("c", ActivationStatus::Active),
        ]);

        let removal = store.remove("b").expect("rule exists");
        assert_eq!(store.len(), 2);
        assert_eq!(store.restore(removal), Rollback::Applied);

        let ids: Vec<String> = store
            .snapshot()
            .into_iter()
            .map(|rule| rule.automation_id)
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn restore_after_refetch_is_refused() {
        let store = DeployedRuleStore::new();
        store.replace_all(vec![rule("a", ActivationStatus::Active)]);
        let removal = store.remove("a").expect("rule exists");
        store.replace_all(Vec::new());
        assert_eq!(store.restore(removal), Rollback::Refetched);
        assert!(store.is_empty());
    }

    #[test]
    fn revert_after_refetch_reports_refetched() {
        let store = DeployedRuleStore::new();
        store.replace_all(vec![rule("a", ActivationStatus::Active)]);
        let pause = store
            .set_status("a", ActivationStatus::Paused)
            .expect("rule exists");
        store.replace_all(vec![rule("a", ActivationStatus::Paused)]);
        assert_eq!(store.revert_status("a", pause), Rollback::Refetched);
        assert_eq!(store.status("a"), Some(ActivationStatus::Paused));
    }

    #[test]
    fn refetch_clears_stale_marks() {
        let store = DeployedRuleStore::new();
        store.mark_stale("a");
        assert!(store.needs_reconcile());
        store.replace_all(Vec::new());
        assert!(!store.needs_reconcile());
    }
}
