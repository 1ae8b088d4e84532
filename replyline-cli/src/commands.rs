use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::*;
use replyline_client::{
    upload_batch, ClientError, HttpAutomationClient, KnowledgeDocument, LifecycleError,
    RuleLifecycle,
};
use replyline_core::serde_utils::to_pretty_json;
use replyline_core::{ClientConfig, ConfigError};
use replyline_rules::{
    build_submission, check_submission, load_drafts, AccountContext, ActivationStatus,
    DeployedRule, DraftDocument, DraftError, HealthStatus, LoadError,
};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error("{name}: {source}")]
    Draft {
        name: String,
        #[source]
        source: DraftError,
    },
    #[error("{0} of the drafts are invalid")]
    InvalidDrafts(usize),
    #[error("failed to render payload: {0}")]
    Render(String),
}

impl CliError {
    pub fn user_message(&self) -> String {
        match self {
            CliError::Config(err) => format!("Configuration problem: {err}"),
            CliError::Load(err) => err.user_message(),
            CliError::Client(err) => err.user_message(),
            CliError::Lifecycle(err) => err.user_message(),
            CliError::Draft { name, source } => format!("{name}: {}", source.user_message()),
            other => other.to_string(),
        }
    }
}

fn account_context(config: &ClientConfig) -> Result<AccountContext, CliError> {
    Ok(AccountContext::from_config(config)?)
}

fn connect(config: &ClientConfig) -> Result<RuleLifecycle<HttpAutomationClient>, CliError> {
    let client = HttpAutomationClient::new(config)?;
    let platform_user_id = config.require_platform_user_id()?;
    debug!(api_url = %config.api_url, platform = %config.platform.as_str(), "connecting");
    Ok(RuleLifecycle::new(Arc::new(client), platform_user_id))
}

pub fn check(path: &Path) -> Result<(), CliError> {
    let documents = load_drafts(path)?;
    let mut invalid = 0;
    for document in &documents {
        match check_submission(document.kind, &document.draft) {
            Ok(()) => println!(
                "{} {} ({})",
                "✔".green().bold(),
                document.draft.name.bold(),
                document.kind
            ),
            Err(err) => {
                invalid += 1;
                println!(
                    "{} {} ({}): {}",
                    "✘".red().bold(),
                    document.draft.name.bold(),
                    document.kind,
                    err
                );
            }
        }
    }

    if invalid > 0 {
        return Err(CliError::InvalidDrafts(invalid));
    }
    println!("{} drafts are valid", documents.len());
    Ok(())
}

fn submission(
    document: &DraftDocument,
    account: &AccountContext,
) -> Result<replyline_protocol::payload::SubmitPayload, CliError> {
    build_submission(document.kind, &document.draft, account).map_err(|source| CliError::Draft {
        name: document.draft.name.clone(),
        source,
    })
}

pub fn render(config: &ClientConfig, path: &Path) -> Result<(), CliError> {
    let account = account_context(config)?;
    for document in load_drafts(path)? {
        let payload = submission(&document, &account)?;
        let rendered =
            to_pretty_json(&payload).map_err(|err| CliError::Render(err.to_string()))?;
        println!("{}", format!("# {} ({})", document.draft.name, document.kind).dimmed());
        println!("{rendered}");
    }
    Ok(())
}

pub async fn deploy(config: &ClientConfig, path: &Path) -> Result<(), CliError> {
    let documents = load_drafts(path)?;
    let account = account_context(config)?;
    let lifecycle = connect(config)?;

    // Validate everything before the first submission.
    let payloads = documents
        .iter()
        .map(|document| submission(document, &account))
        .collect::<Result<Vec<_>, _>>()?;
    info!(count = payloads.len(), "submitting drafts");

    for payload in &payloads {
        match lifecycle.submit_payload(payload).await? {
            Some(rule) => println!(
                "{} {} (id: {})",
                "✔ Automation deployed:".green().bold(),
                rule.name().bold(),
                rule.automation_id
            ),
            None => println!(
                "{} {}",
                "✔ Automation deployed:".green().bold(),
                payload.name().bold()
            ),
        }
    }
    Ok(())
}

pub async fn list(config: &ClientConfig) -> Result<(), CliError> {
    let lifecycle = connect(config)?;
    lifecycle.reconcile().await?;
    let rules = lifecycle.rules();
    if rules.is_empty() {
        println!("No automations deployed yet.");
        return Ok(());
    }
    for rule in &rules {
        print_rule(rule);
    }
    Ok(())
}

fn print_rule(rule: &DeployedRule) {
    let status = match rule.activation_status {
        ActivationStatus::Active => rule.activation_status.to_string().green(),
        ActivationStatus::Paused => rule.activation_status.to_string().yellow(),
        ActivationStatus::Inactive => rule.activation_status.to_string().dimmed(),
    };
    let health = match rule.telemetry.health_status {
        HealthStatus::Healthy => rule.telemetry.health_status.to_string().green(),
        HealthStatus::Warning => rule.telemetry.health_status.to_string().yellow(),
        HealthStatus::Critical => rule.telemetry.health_status.to_string().red(),
    };
    println!("{} {} [{}]", rule.name().bold(), rule.automation_id.dimmed(), rule.kind);
    println!("  Status: {status}  Health: {health}");
    println!(
        "  Executions: {}  Cost: {:.2}",
        rule.telemetry.execution_count, rule.telemetry.cumulative_cost
    );
    if let Some(at) = rule.telemetry.last_triggered_at {
        println!("  Last triggered: {}", at.to_rfc3339());
    }
}

async fn with_fresh_list(
    config: &ClientConfig,
) -> Result<RuleLifecycle<HttpAutomationClient>, CliError> {
    let lifecycle = connect(config)?;
    lifecycle.reconcile().await?;
    Ok(lifecycle)
}

pub async fn pause(config: &ClientConfig, automation_id: &str) -> Result<(), CliError> {
    let lifecycle = with_fresh_list(config).await?;
    lifecycle.pause(automation_id).await?;
    println!("{} {automation_id}", "⏸ Automation paused:".yellow().bold());
    Ok(())
}

pub async fn activate(config: &ClientConfig, automation_id: &str) -> Result<(), CliError> {
    let lifecycle = with_fresh_list(config).await?;
    lifecycle.reactivate(automation_id).await?;
    println!("{} {automation_id}", "▶ Automation reactivated:".green().bold());
    Ok(())
}

pub async fn delete(config: &ClientConfig, automation_id: &str) -> Result<(), CliError> {
    let lifecycle = with_fresh_list(config).await?;
    lifecycle.delete(automation_id).await?;
    println!("{} {automation_id}", "✔ Automation deleted:".green().bold());
    Ok(())
}

pub async fn upload(config: &ClientConfig, files: &[PathBuf]) -> Result<(), CliError> {
    let documents = files
        .iter()
        .map(|path| KnowledgeDocument::from_path(path))
        .collect::<Result<Vec<_>, _>>()?;
    let client = HttpAutomationClient::new(config)?;
    let platform_user_id = config.require_platform_user_id()?;

    let uploaded = upload_batch(&client, platform_user_id, &documents).await?;
    for (document, response) in documents.iter().zip(&uploaded) {
        println!(
            "{} {} (id: {})",
            "✔ Uploaded:".green().bold(),
            document.file_name.bold(),
            response.file_id
        );
    }
    Ok(())
}
