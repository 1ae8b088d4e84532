use std::sync::Arc;
use std::time::Duration;

use futures::poll;
use replyline::replyline_client::{
    ClientError, HttpAutomationClient, LifecycleAction, LifecycleError,
};
use replyline::replyline_rules::{ActivationStatus, AutomationKind, TriggerSpec};
use replyline::RuleLifecycle;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(id: &str, kind: &str, status: &str) -> Value {
    json!({
        "automation_id": id,
        "platform": "instagram",
        "automation_type": kind,
        "name": format!("Rule {id}"),
        "trigger_type": "KEYWORD",
        "keywords": "price,discount",
        "match_type": "CONTAINS",
        "activation_status": status,
        "health_status": "HEALTHY",
        "execution_count": 4,
        "cumulative_cost": "0.12",
        "created_at": "2026-06-01T09:30:00Z"
    })
}

async fn seeded(server: &MockServer) -> anyhow::Result<RuleLifecycle<HttpAutomationClient>> {
    Mock::given(method("GET"))
        .and(path("/api/automations"))
        .and(query_param("platform_user_id", "ig-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                record("auto-1", "COMMENT_REPLY", "ACTIVE"),
                record("auto-2", "DM_KEYWORD_REPLY", "PAUSED"),
                record("auto-3", "COMMENT_TO_DM", "ACTIVE")
            ]
        })))
        .mount(server)
        .await;

    let client = HttpAutomationClient::with_base_url(&format!("{}/api", server.uri()))?;
    let lifecycle = RuleLifecycle::new(Arc::new(client), "ig-42");
    assert_eq!(lifecycle.reconcile().await?, 3);
    Ok(lifecycle)
}

#[tokio::test]
async fn pause_is_visible_before_the_backend_answers() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let lifecycle = seeded(&server).await?;
    Mock::given(method("POST"))
        .and(path("/api/automations/comment-reply/auto-1/pause"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let command = lifecycle.dispatch("auto-1", LifecycleAction::Pause)?;
    let mut in_flight = Box::pin(command.resolve());
    assert!(poll!(in_flight.as_mut()).is_pending());
    assert_eq!(
        lifecycle.store().status("auto-1"),
        Some(ActivationStatus::Paused)
    );

    in_flight.await?;
    assert_eq!(
        lifecycle.store().status("auto-1"),
        Some(ActivationStatus::Paused)
    );
    assert!(!lifecycle.store().needs_reconcile());
    Ok(())
}

#[tokio::test]
async fn server_error_rolls_the_pause_back() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let lifecycle = seeded(&server).await?;
    Mock::given(method("POST"))
        .and(path("/api/automations/comment-to-dm/auto-3/pause"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream timeout"))
        .mount(&server)
        .await;

    let err = lifecycle.pause("auto-3").await.expect_err("backend failed");
    assert!(matches!(
        err,
        LifecycleError::Remote(ClientError::UnexpectedStatus { .. })
    ));
    assert_eq!(
        lifecycle.store().status("auto-3"),
        Some(ActivationStatus::Active)
    );
    Ok(())
}

#[tokio::test]
async fn rejected_delete_puts_the_rule_back_in_place() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let lifecycle = seeded(&server).await?;
    Mock::given(method("DELETE"))
        .and(path("/api/automations/dm-keyword-reply/auto-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Automation is locked by another editor."
        })))
        .mount(&server)
        .await;

    let err = lifecycle.delete("auto-2").await.expect_err("rejected");
    assert_eq!(err.user_message(), "Automation is locked by another editor.");

    let ids: Vec<String> = lifecycle
        .rules()
        .into_iter()
        .map(|rule| rule.automation_id)
        .collect();
    assert_eq!(ids, ["auto-1", "auto-2", "auto-3"]);
    Ok(())
}

#[tokio::test]
async fn reactivating_an_active_rule_never_calls_the_backend() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let lifecycle = seeded(&server).await?;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let err = lifecycle.reactivate("auto-1").await.expect_err("already active");
    assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    Ok(())
}

#[tokio::test]
async fn reconciled_rules_open_in_the_editor() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let lifecycle = seeded(&server).await?;

    let rule = lifecycle
        .store()
        .get("auto-2")
        .expect("reconciled rule");
    assert_eq!(rule.kind, AutomationKind::DmKeywordReply);
    assert_eq!(rule.telemetry.execution_count, 4);

    let session = rule.edit();
    assert_eq!(session.draft.id.as_deref(), Some("auto-2"));
    match &session.draft.trigger {
        TriggerSpec::Keyword { keywords, .. } => assert_eq!(keywords.joined(), "price,discount"),
        other => panic!("unexpected trigger {other:?}"),
    }
    Ok(())
}
