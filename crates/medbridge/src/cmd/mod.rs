use std::time::Duration;

use clap::{Args, Subcommand};
use medbridge::content::AiTask;

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod simulate;
pub mod summarize;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a host session and content client in-process and print the exchange.
    Simulate(SimulateArgs),
    /// Decode a raw bridge message or injected dispatch script.
    Decode(DecodeArgs),
    /// Ask the AI endpoint for advice or a caregiver draft.
    Summarize(SummarizeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Simulate(args) => simulate::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Summarize(args) => summarize::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Medicine to schedule.
    #[arg(long, default_value = "Metformin")]
    pub medicine: String,
    /// Daily reminder times (comma-separated HH:MM).
    #[arg(long, value_delimiter = ',', default_value = "08:00,20:00")]
    pub times: Vec<String>,
    /// Also share this text through the host share sheet.
    #[arg(long, value_name = "TEXT")]
    pub share: Option<String>,
    /// Reply to failed requests at once instead of letting them time out.
    #[arg(long)]
    pub error_replies: bool,
    /// Per-request timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Message JSON or dispatch script; `-` reads stdin.
    pub input: String,
}

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// AI task.
    #[arg(long)]
    pub task: AiTask,
    /// Task context as a JSON object.
    #[arg(long, default_value = "{}")]
    pub context: String,
    /// Endpoint URL.
    #[arg(long, env = "MEDBRIDGE_AI_ENDPOINT")]
    pub endpoint: String,
    /// Extra attempts after a rate-limited response.
    #[arg(long, default_value = "2")]
    pub max_retries: u32,
    /// Backoff step; retry n waits n times this (e.g. 3s).
    #[arg(long, default_value = "3s")]
    pub backoff: String,
    /// Per-attempt timeout (e.g. 30s).
    #[arg(long, default_value = "30s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| io_error("failed to start runtime", err))
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }
}
