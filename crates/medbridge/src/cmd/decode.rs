use std::io::Read;

use medbridge::message::decode;
use medbridge::transport::{extract_injected, is_injected};

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, message_error, transport_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = read_input(&args.input)?;
    let json = unwrap_envelope(input.trim())?;
    let msg = decode(&json).map_err(|err| message_error("not a bridge message", err))?;
    print_message(&msg, Some(&json), format);
    Ok(SUCCESS)
}

fn read_input(arg: &str) -> CliResult<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(buf)
}

fn unwrap_envelope(input: &str) -> CliResult<String> {
    if is_injected(input) {
        extract_injected(input).map_err(|err| transport_error("bad dispatch script", err))
    } else {
        Ok(input.to_string())
    }
}

#[cfg(test)]
mod tests {
    use medbridge::transport::inject_script;

    use super::*;

    #[test]
    fn unwrap_envelope_passes_plain_json_through() {
        assert_eq!(unwrap_envelope("{\"a\":1}").unwrap(), "{\"a\":1}");
    }

    #[test]
    fn unwrap_envelope_extracts_script() {
        let script = inject_script("{\"event\":\"READY\"}").unwrap();
        assert_eq!(unwrap_envelope(&script).unwrap(), "{\"event\":\"READY\"}");
    }
}
