use std::fs::File;
use std::io::{self, Read};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand};
use identity::IdentityRecord;
use identity::verify::{VerifyError, check_signature};
use serde_json::{Value, json};

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("health check failed: HTTP {0}")]
    Unhealthy(u16),
    #[error("failed to read {path}: {source}")]
    Input { path: String, source: io::Error },
    #[error(transparent)]
    Record(#[from] identity::RecordError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("missing bot token; set {0}")]
    MissingBotToken(String),
    #[error("signature check failed: {0}")]
    Signature(#[from] VerifyError),
}

#[derive(Parser, Debug)]
#[command(name = "tglogin-cli", about = "Inspect and verify Telegram login payloads")]
struct Cli {
    #[arg(long, env = "TGLOGIN_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the host server answers `/healthz`.
    Ping,
    /// Decode a payload and report whether it is still inside the session window.
    Inspect(PayloadArgs),
    /// Inspect a payload and check its signature against the bot token.
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
struct PayloadArgs {
    #[arg(default_value = "-", help = "Payload JSON file path, or - for stdin")]
    input: String,

    #[arg(long, help = "Evaluate freshness at this Unix time instead of now")]
    now: Option<i64>,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    #[command(flatten)]
    payload: PayloadArgs,

    #[arg(long, default_value = "TELEGRAM_BOT_TOKEN", help = "Environment variable holding the bot token")]
    bot_token_env: String,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Ping => run_ping(&cli.base_url).await,
        Command::Inspect(args) => run_inspect(&args),
        Command::Verify(args) => run_verify(&args),
    }
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}/healthz", base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Unhealthy(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

fn run_inspect(args: &PayloadArgs) -> Result<(), CliError> {
    let record = load_record(&args.input)?;
    let now = args.now.unwrap_or_else(now_secs);
    print_json(&summarize(&record, now))
}

fn run_verify(args: &VerifyArgs) -> Result<(), CliError> {
    let record = load_record(&args.payload.input)?;
    let token = std::env::var(&args.bot_token_env)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| CliError::MissingBotToken(args.bot_token_env.clone()))?;
    check_signature(&record, token.trim())?;

    let now = args.payload.now.unwrap_or_else(now_secs);
    let mut summary = summarize(&record, now);
    summary["signature"] = json!("valid");
    print_json(&summary)
}

fn load_record(input: &str) -> Result<IdentityRecord, CliError> {
    let raw = read_input(input)?;
    parse_record(&raw)
}

fn read_input(input: &str) -> Result<String, CliError> {
    let mut raw = String::new();
    let result = if input == "-" {
        io::stdin().read_to_string(&mut raw)
    } else {
        File::open(input).and_then(|mut file| file.read_to_string(&mut raw))
    };
    result.map_err(|source| CliError::Input { path: input.to_owned(), source })?;
    Ok(raw)
}

/// Decode a payload. Accepts the bare record, or a `localStorage` export
/// shaped as `{"telegram_user": "<record json>"}`.
fn parse_record(raw: &str) -> Result<IdentityRecord, CliError> {
    let value: Value = serde_json::from_str(raw.trim())?;
    if let Some(Value::String(inner)) = value.get("telegram_user") {
        return Ok(IdentityRecord::from_json(inner)?);
    }
    Ok(IdentityRecord::from_value(value)?)
}

fn summarize(record: &IdentityRecord, now: i64) -> Value {
    json!({
        "id": record.id,
        "name": record.display_name(),
        "handle": record.handle(),
        "auth_date": record.auth_date,
        "age_secs": record.age_secs(now),
        "fresh": record.is_fresh(now),
    })
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
