//! Pause, reactivate and delete as command objects.
//!
//! A command applies its local change as soon as it is dispatched, before
//! the backend is called. When the backend fails or answers
//! `success: false`, the command compensates: the old status is put back, or
//! the deleted rule is re-inserted where it was. If another command touched
//! the rule in the meantime the compensation is skipped and the rule is
//! marked stale instead, to be fixed by the next [`RuleLifecycle::reconcile`].

use std::fmt;
use std::sync::Arc;

use replyline_protocol::payload::SubmitPayload;
use replyline_protocol::types::{ActivationStatus, AutomationKind};
use replyline_rules::{build_submission, AccountContext, DeployedRule, RuleDraft};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::{ActivationAction, AutomationApi};
use crate::error::{ClientError, LifecycleError};
use crate::store::{DeployedRuleStore, Removal, Rollback, StatusChange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Pause,
    Reactivate,
    Delete,
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecycleAction::Pause => "pause",
            LifecycleAction::Reactivate => "reactivate",
            LifecycleAction::Delete => "delete",
        };
        f.write_str(label)
    }
}

#[derive(Debug)]
enum Compensation {
    Status(StatusChange),
    Reinsert(Removal),
}

/// A dispatched command whose local change is already visible.
#[must_use = "the backend is only called when the command is resolved"]
pub struct PendingCommand<A: ?Sized> {
    correlation_id: Uuid,
    automation_id: String,
    kind: AutomationKind,
    action: LifecycleAction,
    compensation: Compensation,
    api: Arc<A>,
    store: DeployedRuleStore,
}

impl<A> PendingCommand<A>
where
    A: AutomationApi + ?Sized,
{
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn action(&self) -> LifecycleAction {
        self.action
    }

    /// Calls the backend and compensates on failure.
    pub async fn resolve(self) -> Result<(), LifecycleError> {
        let remote = match self.action {
            LifecycleAction::Pause => {
                self.api
                    .set_activation(self.kind, &self.automation_id, ActivationAction::Pause)
                    .await
            }
            LifecycleAction::Reactivate => {
                self.api
                    .set_activation(self.kind, &self.automation_id, ActivationAction::Activate)
                    .await
            }
            LifecycleAction::Delete => self.api.delete(self.kind, &self.automation_id).await,
        };
        let result = remote.and_then(|envelope| envelope.into_result().map_err(ClientError::from));

        match result {
            Ok(_) => {
                debug!(
                    correlation_id = %self.correlation_id,
                    automation_id = %self.automation_id,
                    action = %self.action,
                    "lifecycle command committed"
                );
                Ok(())
            }
            Err(err) => {
                self.compensate(&err);
                Err(LifecycleError::Remote(err))
            }
        }
    }

    fn compensate(self, err: &ClientError) {
        let rollback = match self.compensation {
            Compensation::Status(change) => self.store.revert_status(&self.automation_id, change),
            Compensation::Reinsert(removal) => self.store.restore(removal),
        };
        match rollback {
            Rollback::Applied => warn!(
                correlation_id = %self.correlation_id,
                automation_id = %self.automation_id,
                action = %self.action,
                error = %err,
                "lifecycle command failed; local change rolled back"
            ),
            Rollback::Refetched => warn!(
                correlation_id = %self.correlation_id,
                automation_id = %self.automation_id,
                action = %self.action,
                error = %err,
                "lifecycle command failed; list was refetched since"
            ),
            Rollback::Superseded => {
                self.store.mark_stale(&self.automation_id);
                warn!(
                    correlation_id = %self.correlation_id,
                    automation_id = %self.automation_id,
                    action = %self.action,
                    error = %err,
                    "lifecycle command failed after a later change; marked for reconcile"
                );
            }
        }
    }
}

/// Deployed automations of one connected account.
pub struct RuleLifecycle<A: ?Sized> {
    api: Arc<A>,
    store: DeployedRuleStore,
    platform_user_id: String,
}

impl<A> RuleLifecycle<A>
where
    A: AutomationApi + ?Sized,
{
    pub fn new(api: Arc<A>, platform_user_id: impl Into<String>) -> Self {
        Self::with_store(api, DeployedRuleStore::new(), platform_user_id)
    }

    pub fn with_store(
        api: Arc<A>,
        store: DeployedRuleStore,
        platform_user_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            store,
            platform_user_id: platform_user_id.into(),
        }
    }

    pub fn store(&self) -> &DeployedRuleStore {
        &self.store
    }

    pub fn rules(&self) -> Vec<DeployedRule> {
        self.store.snapshot()
    }

    /// Applies `action` locally and returns the command that confirms it
    /// with the backend.
    pub fn dispatch(
        &self,
        automation_id: &str,
        action: LifecycleAction,
    ) -> Result<PendingCommand<A>, LifecycleError> {
        let rule = self
            .store
            .get(automation_id)
            .ok_or_else(|| LifecycleError::NotFound(automation_id.to_string()))?;

        let allowed = match action {
            LifecycleAction::Pause => rule.activation_status == ActivationStatus::Active,
            LifecycleAction::Reactivate => rule.activation_status == ActivationStatus::Paused,
            LifecycleAction::Delete => true,
        };
        if !allowed {
            return Err(LifecycleError::InvalidTransition {
                automation_id: automation_id.to_string(),
                from: rule.activation_status,
                action,
            });
        }

        let missing = || LifecycleError::NotFound(automation_id.to_string());
        let compensation = match action {
            LifecycleAction::Pause => Compensation::Status(
                self.store
                    .set_status(automation_id, ActivationStatus::Paused)
                    .ok_or_else(missing)?,
            ),
            LifecycleAction::Reactivate => Compensation::Status(
                self.store
                    .set_status(automation_id, ActivationStatus::Active)
                    .ok_or_else(missing)?,
            ),
            LifecycleAction::Delete => {
                Compensation::Reinsert(self.store.remove(automation_id).ok_or_else(missing)?)
            }
        };

        let correlation_id = Uuid::new_v4();
        debug!(
            %correlation_id,
            automation_id,
            %action,
            from = %rule.activation_status,
            "applied lifecycle command locally"
        );

        Ok(PendingCommand {
            correlation_id,
            automation_id: automation_id.to_string(),
            kind: rule.kind,
            action,
            compensation,
            api: Arc::clone(&self.api),
            store: self.store.clone(),
        })
    }

    pub async fn pause(&self, automation_id: &str) -> Result<(), LifecycleError> {
        self.dispatch(automation_id, LifecycleAction::Pause)?
            .resolve()
            .await
    }

    pub async fn reactivate(&self, automation_id: &str) -> Result<(), LifecycleError> {
        self.dispatch(automation_id, LifecycleAction::Reactivate)?
            .resolve()
            .await
    }

    pub async fn delete(&self, automation_id: &str) -> Result<(), LifecycleError> {
        self.dispatch(automation_id, LifecycleAction::Delete)?
            .resolve()
            .await
    }

    /// Refetches the list and replaces local state with it. Records that
    /// cannot be read back are skipped. Returns the number of rules kept.
    pub async fn reconcile(&self) -> Result<usize, LifecycleError> {
        let records = self
            .api
            .list(&self.platform_user_id)
            .await?
            .into_result()
            .map_err(ClientError::from)?
            .unwrap_or_default();

        let mut rules = Vec::with_capacity(records.len());
        for record in records {
            let automation_id = record.automation_id.clone();
            match DeployedRule::try_from(record) {
                Ok(rule) => rules.push(rule),
                Err(err) => warn!(%automation_id, error = %err, "skipping unreadable automation"),
            }
        }

        let count = rules.len();
        self.store.replace_all(rules);
        debug!(count, "reconciled deployed automations");
        Ok(count)
    }

    /// Validates, serializes and submits `draft`. The stored list is updated
    /// with the rule the backend returns, if any.
    pub async fn submit(
        &self,
        kind: AutomationKind,
        draft: &RuleDraft,
        account: &AccountContext,
    ) -> Result<Option<DeployedRule>, LifecycleError> {
        let payload = build_submission(kind, draft, account)?;
        self.submit_payload(&payload).await
    }

    pub async fn submit_payload(
        &self,
        payload: &SubmitPayload,
    ) -> Result<Option<DeployedRule>, LifecycleError> {
        debug!(
            kind = %payload.kind(),
            name = payload.name(),
            update = payload.automation_id().is_some(),
            "submitting automation"
        );
        let record = self
            .api
            .submit(payload)
            .await?
            .into_result()
            .map_err(ClientError::from)?;

        match record {
            Some(record) => {
                let rule = DeployedRule::try_from(record)?;
                self.store.upsert(rule.clone());
                debug!(automation_id = %rule.automation_id, kind = %payload.kind(), "automation submitted");
                Ok(Some(rule))
            }
            None => {
                debug!(name = payload.name(), "automation submitted without a record");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::rule;
    use async_trait::async_trait;
    use futures::poll;
    use parking_lot::Mutex;
    use replyline_core::Platform;
    use replyline_protocol::envelope::ApiEnvelope;
    use replyline_protocol::knowledge::{KnowledgeUploadRequest, KnowledgeUploadResponse};
    use replyline_protocol::record::DeployedRuleRecord;
    use replyline_rules::TriggerSpec;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::task::Poll;
    use tokio::sync::Notify;

    /// Scripted backend; lifecycle calls wait on `gate` when one is set.
    #[derive(Default)]
    struct FakeApi {
        gate: Option<Arc<Notify>>,
        answers: Mutex<VecDeque<Result<ApiEnvelope<Value>, ClientError>>>,
        listing: Mutex<Vec<Value>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn answering(answers: Vec<Result<ApiEnvelope<Value>, ClientError>>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                ..Self::default()
            }
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        async fn answer(&self, call: String) -> Result<ApiEnvelope<Value>, ClientError> {
            self.calls.lock().push(call);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.answers
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(ApiEnvelope::ok(Value::Null)))
        }
    }

    #[async_trait]
    impl AutomationApi for FakeApi {
        async fn submit(
            &self,
            payload: &SubmitPayload,
        ) -> Result<ApiEnvelope<DeployedRuleRecord>, ClientError> {
            self.calls.lock().push(format!("submit {}", payload.kind()));
            let record = json!({
                "automation_id": "new-1",
                "platform": "instagram",
                "automation_type": payload.kind(),
                "name": payload.name(),
                "trigger_type": "KEYWORD",
                "keywords": "hello",
                "activation_status": "ACTIVE",
                "created_at": "2026-06-01T09:00:00Z"
            });
            serde_json::from_value(record)
                .map(ApiEnvelope::ok)
                .map_err(|err| ClientError::Decode(err.to_string()))
        }

        async fn list(
            &self,
            _platform_user_id: &str,
        ) -> Result<ApiEnvelope<Vec<DeployedRuleRecord>>, ClientError> {
            let records = self
                .listing
                .lock()
                .iter()
                .filter_map(|value| serde_json::from_value(value.clone()).ok())
                .collect();
            Ok(ApiEnvelope::ok(records))
        }

        async fn set_activation(
            &self,
            _kind: AutomationKind,
            automation_id: &str,
            action: ActivationAction,
        ) -> Result<ApiEnvelope<Value>, ClientError> {
            self.answer(format!("{} {automation_id}", action.path_segment()))
                .await
        }

        async fn delete(
            &self,
            _kind: AutomationKind,
            automation_id: &str,
        ) -> Result<ApiEnvelope<Value>, ClientError> {
            self.answer(format!("delete {automation_id}")).await
        }

        async fn upload_knowledge(
            &self,
            _request: &KnowledgeUploadRequest,
        ) -> Result<ApiEnvelope<KnowledgeUploadResponse>, ClientError> {
            Err(ClientError::Http("not scripted".into()))
        }
    }

    fn lifecycle_with(api: FakeApi, rules: Vec<DeployedRule>) -> RuleLifecycle<FakeApi> {
        let lifecycle = RuleLifecycle::new(Arc::new(api), "ig-1");
        lifecycle.store().replace_all(rules);
        lifecycle
    }

    #[tokio::test]
    async fn pause_is_visible_before_the_backend_answers() {
        let gate = Arc::new(Notify::new());
        let lifecycle = lifecycle_with(
            FakeApi::default().gated(Arc::clone(&gate)),
            vec![rule("a", ActivationStatus::Active)],
        );

        let mut pause = Box::pin(lifecycle.pause("a"));
        assert!(matches!(poll!(pause.as_mut()), Poll::Pending));
        assert_eq!(lifecycle.store().status("a"), Some(ActivationStatus::Paused));

        gate.notify_one();
        pause.await.expect("committed");
        assert_eq!(lifecycle.store().status("a"), Some(ActivationStatus::Paused));
    }

    #[tokio::test]
    async fn dispatch_applies_synchronously() {
        let lifecycle = lifecycle_with(FakeApi::default(), vec![rule("a", ActivationStatus::Active)]);
        let command = lifecycle
            .dispatch("a", LifecycleAction::Pause)
            .expect("dispatch");
        assert_eq!(lifecycle.store().status("a"), Some(ActivationStatus::Paused));
        command.resolve().await.expect("committed");
    }

    #[tokio::test]
    async fn rejected_pause_is_rolled_back() {
        let lifecycle = lifecycle_with(
            FakeApi::answering(vec![Ok(ApiEnvelope::failed("Quota exceeded"))]),
            vec![rule("a", ActivationStatus::Active)],
        );

        let err = lifecycle.pause("a").await.expect_err("rejected");
        assert_eq!(err.user_message(), "Quota exceeded");
        assert_eq!(lifecycle.store().status("a"), Some(ActivationStatus::Active));
        assert!(!lifecycle.store().needs_reconcile());
    }

    #[tokio::test]
    async fn failed_delete_reinserts_at_original_position() {
        let lifecycle = lifecycle_with(
            FakeApi::answering(vec![Err(ClientError::Http("connection reset".into()))]),
            vec![
                rule("a", ActivationStatus::Active),
                rule("b", ActivationStatus::Active),
                rule("c", ActivationStatus::Paused),
            ],
        );

        let command = lifecycle
            .dispatch("b", LifecycleAction::Delete)
            .expect("dispatch");
        assert!(lifecycle.store().get("b").is_none());

        command.resolve().await.expect_err("transport failure");
        let ids: Vec<String> = lifecycle
            .rules()
            .into_iter()
            .map(|rule| rule.automation_id)
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn superseded_failure_marks_rule_for_reconcile() {
        let lifecycle = lifecycle_with(
            FakeApi::answering(vec![
                Err(ClientError::Http("timeout".into())),
                Ok(ApiEnvelope::ok(Value::Null)),
            ]),
            vec![rule("a", ActivationStatus::Active)],
        );

        let pause = lifecycle
            .dispatch("a", LifecycleAction::Pause)
            .expect("dispatch pause");
        let reactivate = lifecycle
            .dispatch("a", LifecycleAction::Reactivate)
            .expect("dispatch reactivate");

        pause.resolve().await.expect_err("pause fails");
        assert_eq!(lifecycle.store().status("a"), Some(ActivationStatus::Active));
        assert_eq!(lifecycle.store().stale_ids(), ["a"]);

        reactivate.resolve().await.expect("reactivate commits");
    }

    #[tokio::test]
    async fn failure_after_refetch_leaves_the_fresh_list_alone() {
        let gate = Arc::new(Notify::new());
        let api = FakeApi::answering(vec![Err(ClientError::Http("timeout".into()))])
            .gated(Arc::clone(&gate));
        *api.listing.lock() = vec![json!({
            "automation_id": "b",
            "platform": "instagram",
            "automation_type": "COMMENT_REPLY",
            "name": "Other",
            "activation_status": "ACTIVE",
            "created_at": "2026-01-01T00:00:00Z"
        })];
        let lifecycle = lifecycle_with(
            api,
            vec![
                rule("a", ActivationStatus::Active),
                rule("b", ActivationStatus::Active),
            ],
        );

        let delete = lifecycle
            .dispatch("a", LifecycleAction::Delete)
            .expect("dispatch delete");
        assert_eq!(lifecycle.reconcile().await.expect("reconcile"), 1);

        gate.notify_one();
        delete.resolve().await.expect_err("delete fails");
        assert!(lifecycle.store().get("a").is_none());
        assert!(!lifecycle.store().needs_reconcile());
    }

    #[tokio::test]
    async fn invalid_transitions_touch_nothing() {
        let lifecycle = lifecycle_with(FakeApi::default(), vec![rule("p", ActivationStatus::Paused)]);
        let err = lifecycle.pause("p").await.expect_err("already paused");
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
        assert!(matches!(
            lifecycle.reactivate("missing").await,
            Err(LifecycleError::NotFound(_))
        ));
        assert_eq!(lifecycle.store().status("p"), Some(ActivationStatus::Paused));
    }

    #[tokio::test]
    async fn reconcile_replaces_local_state_and_telemetry() {
        let api = FakeApi::default();
        *api.listing.lock() = vec![
            json!({
                "automation_id": "a",
                "platform": "instagram",
                "automation_type": "COMMENT_REPLY",
                "name": "Pricing",
                "activation_status": "PAUSED",
                "health_status": "CRITICAL",
                "execution_count": 41,
                "cumulative_cost": 1.25,
                "created_at": "2026-01-01T00:00:00Z"
            }),
            json!({
                "automation_id": "broken",
                "platform": "instagram",
                "automation_type": "DM_KEYWORD_REPLY",
                "name": "Broken",
                "reply_template_type": "IMAGE",
                "activation_status": "ACTIVE",
                "created_at": "2026-01-01T00:00:00Z"
            }),
        ];
        let lifecycle = lifecycle_with(api, vec![rule("a", ActivationStatus::Active)]);
        lifecycle.store().mark_stale("a");

        assert_eq!(lifecycle.reconcile().await.expect("reconcile"), 1);
        let refreshed = lifecycle.store().get("a").expect("rule a");
        assert_eq!(refreshed.activation_status, ActivationStatus::Paused);
        assert_eq!(refreshed.telemetry.execution_count, 41);
        assert!(!lifecycle.store().needs_reconcile());
    }

    #[tokio::test]
    async fn submit_stores_returned_rule() {
        let lifecycle = lifecycle_with(FakeApi::default(), Vec::new());
        let mut draft = RuleDraft::named("Greeting");
        draft.trigger = TriggerSpec::Keyword {
            keywords: ["hello"].into_iter().collect(),
            match_type: Default::default(),
        };
        let account = AccountContext::new(Platform::Instagram, "ig-1", "prov-1");

        let rule = lifecycle
            .submit(AutomationKind::CommentReply, &draft, &account)
            .await
            .expect("submit")
            .expect("record returned");
        assert_eq!(rule.automation_id, "new-1");
        assert_eq!(lifecycle.store().len(), 1);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_backend() {
        let api = Arc::new(FakeApi::default());
        let lifecycle = RuleLifecycle::new(Arc::clone(&api), "ig-1");
        let account = AccountContext::new(Platform::Instagram, "ig-1", "prov-1");

        let err = lifecycle
            .submit(AutomationKind::CommentReply, &RuleDraft::default(), &account)
            .await
            .expect_err("invalid");
        assert_eq!(err.user_message(), "Please enter a name for the automation.");
        assert!(api.calls.lock().is_empty());
    }
}
