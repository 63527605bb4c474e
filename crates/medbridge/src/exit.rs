use std::fmt;
use std::io;

use medbridge::content::BridgeError;
use medbridge::message::MessageError;
use medbridge::transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
/// Dependency unavailable (EX_UNAVAILABLE); the AI endpoint went offline.
pub const OFFLINE: i32 = 69;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Envelope(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn message_error(context: &str, err: MessageError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn bridge_error(context: &str, err: BridgeError) -> CliError {
    match err {
        BridgeError::Timeout { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
        BridgeError::Rejected { .. } => CliError::new(FAILURE, format!("{context}: {err}")),
        BridgeError::Message(err) => message_error(context, err),
        BridgeError::Transport(err) => transport_error(context, err),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use medbridge::message::EventType;

    use super::*;

    #[test]
    fn bridge_errors_map_to_exit_codes() {
        let timeout = BridgeError::Timeout {
            event: EventType::ScheduleLoad,
            timeout: Duration::from_millis(100),
        };
        assert_eq!(bridge_error("load", timeout).code, TIMEOUT);
        assert_eq!(
            bridge_error("load", BridgeError::Transport(TransportError::Detached)).code,
            TRANSPORT_ERROR
        );
        assert_eq!(bridge_error("load", BridgeError::Closed).code, INTERNAL);
    }

    #[test]
    fn envelope_errors_are_invalid_data() {
        let err = transport_error("decode", TransportError::Envelope("bad".into()));
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode: "));
    }
}
