use medbridge::content::{AiConfig, AiOutcome, HttpEndpoint, SummaryClient};
use serde_json::Value;

use crate::cmd::{parse_duration, runtime, SummarizeArgs};
use crate::exit::{CliError, CliResult, OFFLINE, SUCCESS, USAGE};
use crate::output::{print_ai_response, OutputFormat};

pub fn run(args: SummarizeArgs, format: OutputFormat) -> CliResult<i32> {
    let context: Value = serde_json::from_str(&args.context)
        .map_err(|err| CliError::new(USAGE, format!("--context is not valid JSON: {err}")))?;
    if !context.is_object() {
        return Err(CliError::new(USAGE, "--context must be a JSON object"));
    }

    let config = AiConfig {
        max_retries: args.max_retries,
        backoff_step: parse_duration(&args.backoff)?,
        request_timeout: parse_duration(&args.timeout)?,
    };
    let endpoint = HttpEndpoint::new(&args.endpoint, config.request_timeout)
        .map_err(|err| CliError::new(USAGE, format!("invalid endpoint: {err}")))?;
    let client = SummaryClient::new(endpoint, config);

    let rt = runtime()?;
    match rt.block_on(client.run(args.task, context)) {
        AiOutcome::Ready(response) => {
            print_ai_response(&response, format);
            Ok(SUCCESS)
        }
        AiOutcome::Offline => Err(CliError::new(
            OFFLINE,
            format!("AI unavailable for {} (offline)", args.task),
        )),
    }
}
