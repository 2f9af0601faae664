use std::time::Duration;

/// Core error type.
///
/// Adapter crates map their client errors into this type so the startup path
/// can tell a rate limit apart from a credential problem or an unreachable chat.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("flood wait: retry after {}s", .wait.as_secs())]
    FloodWait { wait: Duration },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("chat unreachable: {0}")]
    ChatUnreachable(String),

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    /// How long the server asked us to wait. Only rate limits are retryable.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::FloodWait { wait } => Some(*wait),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A fatal startup failure. Every variant terminates the process.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Fatal Login Error! Please check your BOT_TOKEN, API_ID, and API_HASH. Reason: {0}")]
    InvalidCredentials(#[source] Error),

    #[error("Bot failed to start due to an unexpected error: {0}")]
    Login(#[source] Error),

    #[error("Bot has failed to access the log group/channel. Make sure that you have added your bot to your log group/channel.")]
    LogChannelUnreachable(#[source] Error),

    #[error("Bot has failed to send startup message to the log group/channel. Reason: {0}")]
    Announcement(#[source] Error),

    #[error("Please promote your bot as an admin in your log group/channel.")]
    NotAdministrator,

    #[error("Failed to check bot's admin status in the log group/channel. Reason: {0}")]
    AdminCheck(#[source] Error),
}

impl StartupError {
    /// Process exit code for a failed startup; every startup failure is fatal.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
