//! tasksms CLI entry point.
//!
//! Sends one notification per invocation: a task reminder, a daily summary,
//! an AI insight digest, or raw text. `check` verifies gateway credentials.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use tasksms::config::{default_config_path, load_config_or_default, Config};
use tasksms::credentials::{load_default_credentials, GatewayCredentials};
use tasksms::preferences::NotificationKind;
use tasksms::sms::{DryRunGateway, HttpSmsGateway, SmsGateway, SmsNotifier};
use tasksms::task::Task;

/// tasksms — SMS task reminders, summaries and insight digests.
#[derive(Parser)]
#[command(name = "tasksms", version, about)]
struct Cli {
    /// Path to config.toml (default: ~/.tasksms/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print messages instead of delivering them.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Send even when preferences or quiet hours would hold the message back.
    #[arg(long, global = true)]
    force: bool,

    /// Also write JSON logs to daily files in this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Report whether gateway credentials are configured.
    Check {
        /// Also authenticate against the gateway.
        #[arg(long)]
        connect: bool,
    },
    /// Send raw text. Without --to, stdin is `recipient\nmessage...`.
    Send {
        /// Recipient phone number.
        #[arg(long)]
        to: Option<String>,
        /// Message text (default: read stdin).
        #[arg(long)]
        text: Option<String>,
    },
    /// Send a reminder for one JSON task.
    Remind {
        /// Path to the task JSON, or `-` for stdin.
        #[arg(long)]
        task: String,
        /// Recipient phone number (default: sms.phone_number).
        #[arg(long)]
        to: Option<String>,
    },
    /// Send a daily summary for a JSON array of tasks.
    Summary {
        /// Path to the tasks JSON, or `-` for stdin.
        #[arg(long)]
        tasks: String,
        /// Recipient phone number (default: sms.phone_number).
        #[arg(long)]
        to: Option<String>,
    },
    /// Send an AI insight digest.
    Insights {
        /// Path to the insight text, or `-` for stdin.
        #[arg(long)]
        file: String,
        /// Recipient phone number (default: sms.phone_number).
        #[arg(long)]
        to: Option<String>,
    },
}

/// A fully parsed notification waiting for delivery.
enum Outgoing {
    Reminder(Task),
    Summary(Vec<Task>),
    Insights(String),
    Text(String),
}

impl Outgoing {
    fn kind(&self) -> NotificationKind {
        match self {
            Self::Reminder(_) => NotificationKind::TaskReminder,
            Self::Summary(_) => NotificationKind::DailySummary,
            Self::Insights(_) => NotificationKind::AiInsights,
            Self::Text(_) => NotificationKind::Text,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logging_guard = match &cli.log_dir {
        Some(dir) => Some(tasksms::logging::init_production(dir)?),
        None => {
            tasksms::logging::init_cli();
            None
        }
    };

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = load_config_or_default(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let (to, outgoing) = match cli.command {
        Command::Check { connect } => return handle_check(&config, connect).await,
        Command::Send { to, text } => parse_text(to, text)?,
        Command::Remind { task, to } => {
            let raw = read_input(&task)?;
            let task: Task = serde_json::from_str(&raw).context("failed to parse task JSON")?;
            (to, Outgoing::Reminder(task))
        }
        Command::Summary { tasks, to } => {
            let raw = read_input(&tasks)?;
            let tasks: Vec<Task> =
                serde_json::from_str(&raw).context("failed to parse tasks JSON")?;
            (to, Outgoing::Summary(tasks))
        }
        Command::Insights { file, to } => (to, Outgoing::Insights(read_input(&file)?)),
    };

    handle_send(&config, to, outgoing, cli.dry_run, cli.force).await
}

/// Report credential presence, optionally proving them against the gateway.
async fn handle_check(config: &Config, connect: bool) -> anyhow::Result<()> {
    let credentials = load_default_credentials(&config.gateway)?;
    if !GatewayCredentials::is_configured(&credentials, &config.gateway) {
        println!(
            "SMS credentials not configured (set {} and {})",
            config.gateway.identity_env, config.gateway.secret_env
        );
        anyhow::bail!("SMS credentials not configured");
    }
    println!("SMS credentials configured");

    if connect {
        let account = GatewayCredentials::resolve(&credentials, &config.gateway)?;
        HttpSmsGateway::connect(&config.gateway.base_url, &account)
            .await
            .context("failed to authenticate with SMS gateway")?;
        println!("SMS gateway reachable at {}", config.gateway.base_url);
    }
    Ok(())
}

/// Resolve the recipient, apply preferences, and deliver.
async fn handle_send(
    config: &Config,
    to: Option<String>,
    outgoing: Outgoing,
    dry_run: bool,
    force: bool,
) -> anyhow::Result<()> {
    let recipient = to
        .or_else(|| config.sms.phone_number.clone())
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("no recipient: pass --to or set sms.phone_number"))?;

    let kind = outgoing.kind();
    if !force {
        let now = chrono::Local::now().time();
        if let Err(reason) = config.sms.check(kind, now) {
            info!(%kind, %reason, "notification suppressed");
            return Ok(());
        }
    }

    let dry_run_gateway = dry_run.then(|| Arc::new(DryRunGateway::new()));
    let gateway: Arc<dyn SmsGateway> = match &dry_run_gateway {
        Some(gateway) => Arc::clone(gateway) as Arc<dyn SmsGateway>,
        None => {
            let credentials = load_default_credentials(&config.gateway)?;
            let account = GatewayCredentials::resolve(&credentials, &config.gateway)?;
            Arc::new(
                HttpSmsGateway::connect(&config.gateway.base_url, &account)
                    .await
                    .context("failed to authenticate with SMS gateway")?,
            )
        }
    };

    let notifier =
        SmsNotifier::new(gateway).with_insights_limit(config.limits.insights_max_chars);
    let delivered = match &outgoing {
        Outgoing::Reminder(task) => notifier.send_task_reminder(&recipient, task).await,
        Outgoing::Summary(tasks) => notifier.send_daily_summary(&recipient, tasks).await,
        Outgoing::Insights(insights) => notifier.send_ai_insights(&recipient, insights).await,
        Outgoing::Text(text) => notifier.send_text(&recipient, text).await,
    };

    if let Some(gateway) = dry_run_gateway {
        for message in gateway.sent() {
            println!("{}", message.body);
        }
    }

    if !delivered {
        anyhow::bail!("{kind} was not delivered");
    }
    Ok(())
}

/// Build a raw text message from flags and stdin.
fn parse_text(
    to: Option<String>,
    text: Option<String>,
) -> anyhow::Result<(Option<String>, Outgoing)> {
    let text = match text {
        Some(text) => text,
        None => read_input("-")?,
    };

    if to.is_some() {
        return Ok((to, Outgoing::Text(text.trim_end_matches('\n').to_owned())));
    }

    let (recipient, message) = text
        .split_once('\n')
        .ok_or_else(|| anyhow::anyhow!("expected recipient on the first line of stdin"))?;
    Ok((
        Some(recipient.trim().to_owned()),
        Outgoing::Text(message.trim_end_matches('\n').to_owned()),
    ))
}

/// Read a file, or stdin when `path` is `-`.
fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
}
