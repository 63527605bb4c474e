//! Host → content script envelope.
//!
//! The host cannot post into the rendering surface directly; it injects a
//! script that re-dispatches the message as a DOM `message` event. The
//! serialized message is JSON-string-encoded a second time so that it
//! survives embedding as a JavaScript string literal.

use crate::error::{Result, TransportError};
use crate::traits::Transport;

const SCRIPT_PREFIX: &str = "window.dispatchEvent(new MessageEvent('message',{data:";
const SCRIPT_SUFFIX: &str = "}));true;";

/// Wrap serialized message JSON in a dispatch script.
pub fn inject_script(json: &str) -> Result<String> {
    let literal =
        serde_json::to_string(json).map_err(|err| TransportError::Envelope(err.to_string()))?;
    Ok(format!("{SCRIPT_PREFIX}{literal}{SCRIPT_SUFFIX}"))
}

/// Returns true if `raw` looks like a dispatch script.
pub fn is_injected(raw: &str) -> bool {
    raw.starts_with(SCRIPT_PREFIX) && raw.ends_with(SCRIPT_SUFFIX)
}

/// Recover the exact message JSON from a dispatch script.
pub fn extract_injected(script: &str) -> Result<String> {
    let literal = script
        .strip_prefix(SCRIPT_PREFIX)
        .and_then(|rest| rest.strip_suffix(SCRIPT_SUFFIX))
        .ok_or_else(|| TransportError::Envelope("missing dispatch wrapper".to_string()))?;

    serde_json::from_str::<String>(literal).map_err(|err| TransportError::Envelope(err.to_string()))
}

/// Transport adapter that delivers every message as a dispatch script.
#[derive(Debug)]
pub struct InjectingTransport<T> {
    inner: T,
}

impl<T: Transport> InjectingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for InjectingTransport<T> {
    fn post(&self, raw: &str) -> Result<()> {
        let script = inject_script(raw)?;
        self.inner.post(&script)
    }

    fn is_attached(&self) -> bool {
        self.inner.is_attached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::channel;

    #[test]
    fn script_shape() {
        let script = inject_script(r#"{"a":1}"#).unwrap();
        assert_eq!(
            script,
            r#"window.dispatchEvent(new MessageEvent('message',{data:"{\"a\":1}"}));true;"#
        );
        assert!(is_injected(&script));
    }

    #[test]
    fn extract_recovers_exact_json() {
        let json = r#"{"event":"READY","payload":{"note":"quote \" and </script>"}}"#;
        let script = inject_script(json).unwrap();
        assert_eq!(extract_injected(&script).unwrap(), json);
    }

    #[test]
    fn extract_rejects_plain_json() {
        let err = extract_injected(r#"{"event":"READY"}"#).unwrap_err();
        assert!(matches!(err, TransportError::Envelope(_)));
        assert!(!is_injected(r#"{"event":"READY"}"#));
    }

    #[tokio::test]
    async fn injecting_transport_wraps_each_post() {
        let (inner, mut rx) = channel("host-to-content");
        let transport = InjectingTransport::new(inner);
        assert!(transport.is_attached());

        transport.post(r#"{"n":1}"#).unwrap();
        let delivered = rx.recv().await.unwrap();
        assert!(is_injected(&delivered));
        assert_eq!(extract_injected(&delivered).unwrap(), r#"{"n":1}"#);
    }

    #[test]
    fn injecting_transport_propagates_detach() {
        let (inner, _rx) = channel("host-to-content");
        inner.detach();
        let transport = InjectingTransport::new(inner);
        assert!(matches!(
            transport.post("{}").unwrap_err(),
            TransportError::Detached
        ));
    }
}
