/// Title used for the share sheet when the request carries none.
pub const DEFAULT_SHARE_TITLE: &str = "Medicine Companion";

/// Body text of every dose reminder.
pub const DEFAULT_NOTIFICATION_BODY: &str = "Tap to log your dose";

/// What the router does when a handler fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log and send nothing; the content side sees its request time out.
    #[default]
    Silent,
    /// Reply at once on the request's reply event with `{success:false, error}`.
    ErrorReply,
}

/// Host-side behavior knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub failure_policy: FailurePolicy,
    pub share_title: String,
    pub notification_body: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Silent,
            share_title: DEFAULT_SHARE_TITLE.to_string(),
            notification_body: DEFAULT_NOTIFICATION_BODY.to_string(),
        }
    }
}
